//! Revenue transactions
//!
//! Collection: `/admin/revenue/transactions`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use ayur_core::traits::{Id, Identifiable, Resource, Timestamped};
use ayur_core::types::default_currency;

use crate::party::PartyRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Payment,
    Refund,
    Payout,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Refund => "refund",
            Self::Payout => "payout",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_label(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_label(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(alias = "_id")]
    pub id: Id,

    #[serde(default)]
    pub appointment_id: Option<Id>,

    #[serde(default)]
    pub patient: Option<PartyRef>,

    #[serde(default)]
    pub practitioner: Option<PartyRef>,

    pub amount: f64,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub status: TransactionStatus,

    pub created_at: DateTime<Utc>,
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for Transaction {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

impl Resource for Transaction {
    const TYPE_NAME: &'static str = "Transaction";
    const COLLECTION_PATH: &'static str = "/admin/revenue/transactions";
}

/// Headline numbers above the transaction table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub pending_amount: f64,
    #[serde(default)]
    pub refunded_amount: f64,
    #[serde(default)]
    pub transaction_count: u64,
}

impl RevenueSummary {
    /// Totals over a set of transactions; completed payments count as revenue
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Self::default();
        for tx in transactions {
            summary.transaction_count += 1;
            match (tx.transaction_type, tx.status) {
                (TransactionType::Payment, TransactionStatus::Completed) => {
                    summary.total_revenue += tx.amount
                }
                (TransactionType::Payment, TransactionStatus::Pending) => {
                    summary.pending_amount += tx.amount
                }
                (TransactionType::Refund, TransactionStatus::Completed)
                | (_, TransactionStatus::Refunded) => summary.refunded_amount += tx.amount,
                _ => {}
            }
        }
        summary
    }

    pub fn net_revenue(&self) -> f64 {
        self.total_revenue - self.refunded_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(amount: f64, kind: TransactionType, status: TransactionStatus) -> Transaction {
        Transaction {
            id: "t".into(),
            appointment_id: None,
            patient: None,
            practitioner: None,
            amount,
            currency: default_currency(),
            method: None,
            transaction_type: kind,
            status,
            created_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn test_summary_buckets() {
        let txs = vec![
            tx(1000.0, TransactionType::Payment, TransactionStatus::Completed),
            tx(500.0, TransactionType::Payment, TransactionStatus::Completed),
            tx(300.0, TransactionType::Payment, TransactionStatus::Pending),
            tx(200.0, TransactionType::Refund, TransactionStatus::Completed),
            tx(50.0, TransactionType::Payment, TransactionStatus::Failed),
        ];
        let summary = RevenueSummary::from_transactions(&txs);
        assert_eq!(summary.transaction_count, 5);
        assert_eq!(summary.total_revenue, 1500.0);
        assert_eq!(summary.pending_amount, 300.0);
        assert_eq!(summary.refunded_amount, 200.0);
        assert_eq!(summary.net_revenue(), 1300.0);
    }

    #[test]
    fn test_currency_defaults_to_inr() {
        let t: Transaction = serde_json::from_str(
            r#"{"id":"t1","amount":10,"type":"payment","status":"completed",
                "createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(t.currency, "INR");
    }
}
