//! Terminal rendering of pages, records and notices

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

use ayur_core::Pager;
use ayur_models::{
    Appointment, AuditLog, Content, Notification, Patient, Practitioner, Transaction, User,
};
use ayur_queries::{Filterable, WireLabel};
use ayur_services::{ListManager, Notice, NoticeLevel, Notifier, Origin};

/// Notices go to stderr so stdout stays pipeable
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let marker = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{marker}] {}", notice.message);
    }
}

/// One table row per record
pub trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn date_of(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

impl Row for User {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "ROLE", "ACTIVE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.role.wire_label(),
            yes_no(self.is_active),
        ]
    }
}

impl Row for Practitioner {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "SPECIALIZATION", "LICENSE", "VERIFICATION", "ACTIVE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.specialization.clone(),
            self.license_number.clone(),
            self.verification_status.wire_label(),
            yes_no(self.is_active),
        ]
    }
}

impl Row for Patient {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "PHONE", "ACTIVE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
            yes_no(self.is_active),
        ]
    }
}

impl Row for Appointment {
    const HEADERS: &'static [&'static str] =
        &["ID", "START", "PATIENT", "PRACTITIONER", "TYPE", "STATUS", "FEE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            date_of(&self.start_time),
            self.patient.name.clone(),
            self.practitioner.name.clone(),
            self.appointment_type.wire_label(),
            self.status.wire_label(),
            format!("{:.2}", self.fee),
        ]
    }
}

impl Row for Notification {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE", "TYPE", "AUDIENCE", "READ"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.notification_type.wire_label(),
            self.audience.wire_label(),
            yes_no(self.is_read),
        ]
    }
}

impl Row for AuditLog {
    const HEADERS: &'static [&'static str] = &["TIME", "ACTOR", "ACTION", "RESOURCE", "SEVERITY"];

    fn cells(&self) -> Vec<String> {
        let resource = match &self.resource_id {
            Some(id) => format!("{}/{}", self.resource_type, id),
            None => self.resource_type.clone(),
        };
        vec![
            date_of(&self.timestamp),
            self.actor
                .as_ref()
                .map_or_else(|| "system".to_string(), |a| a.name.clone()),
            self.action.clone(),
            resource,
            self.severity.wire_label(),
        ]
    }
}

impl Row for Content {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE", "TYPE", "STATUS", "TAGS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.content_type.wire_label(),
            self.status.wire_label(),
            self.tags.join(", "),
        ]
    }
}

impl Row for Transaction {
    const HEADERS: &'static [&'static str] = &["ID", "DATE", "TYPE", "STATUS", "AMOUNT"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            date_of(&self.created_at),
            self.transaction_type.wire_label(),
            self.status.wire_label(),
            format!("{:.2} {}", self.amount, self.currency),
        ]
    }
}

/// Render `rows` as left-aligned columns
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

pub fn render_pager(pager: &Pager, total: u64) -> String {
    let buttons = pager
        .buttons
        .iter()
        .map(|b| {
            if *b == pager.current {
                format!("[{b}]")
            } else {
                b.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "page {} of {} ({} total)  {}",
        pager.current,
        pager.total_pages.max(1),
        total,
        buttons
    )
}

/// Print the current page of a list screen
pub fn print_page<R: Filterable + Row>(list: &ListManager<R>) {
    let state = list.state();
    let rows: Vec<Vec<String>> = state.records.iter().map(Row::cells).collect();
    let mut stdout = io::stdout().lock();
    if rows.is_empty() {
        let _ = writeln!(stdout, "No {} found", R::TYPE_NAME.to_lowercase());
    } else {
        let _ = write!(stdout, "{}", render_table(R::HEADERS, &rows));
    }
    let _ = writeln!(stdout, "{}", render_pager(&state.pager(), state.total));
    if state.origin == Origin::Mock {
        let _ = writeln!(stdout, "(showing sample data, the backend is unreachable)");
    }
}

/// Print one record in full
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_aligns_columns() {
        let table = render_table(
            &["ID", "NAME"],
            &[
                vec!["1".into(), "Meera Nair".into()],
                vec!["22".into(), "Arjun".into()],
            ],
        );
        assert_eq!(table, "ID  NAME\n1   Meera Nair\n22  Arjun\n");
    }

    #[test]
    fn test_pager_marks_current_page() {
        let pager = Pager::new(2, 30, 10);
        assert_eq!(render_pager(&pager, 30), "page 2 of 3 (30 total)  1 [2] 3");
    }
}
