//! A list request: which page, under which filter

use ayur_core::pagination::PageRequest;

use crate::filters::QueryParams;

/// Page request plus filter, as sent to a collection endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery<F> {
    pub page: PageRequest,
    pub filter: F,
}

impl<F> ListQuery<F> {
    pub fn new(page: PageRequest, filter: F) -> Self {
        Self { page, filter }
    }
}

impl<F: QueryParams> ListQuery<F> {
    /// `page` and `limit` first, then the active filter values
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.page.to_string()),
            ("limit".to_string(), self.page.limit.to_string()),
        ];
        pairs.extend(self.filter.query_pairs());
        pairs
    }

    /// URL-encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }
}
