//! Plain-text rendering of dashboard tables.

use chrono::{DateTime, Local};
use clinic_types::{Activity, Doctor, Fee, Patient, Visit};

/// A record that can be shown as one table row.
pub trait Tabular {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number<N: ToString>(value: Option<N>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

impl Tabular for Doctor {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Email", "Phone", "Speciality"];

    fn cells(&self) -> Vec<String> {
        vec![
            number(self.doctor_id),
            self.doctor_name.clone(),
            text(&self.doctor_email),
            text(&self.doctor_phone),
            text(&self.doctor_speciality),
        ]
    }
}

impl Tabular for Patient {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Email", "Phone", "Address"];

    fn cells(&self) -> Vec<String> {
        vec![
            number(self.patient_id),
            self.patient_name.clone(),
            text(&self.patient_email),
            text(&self.patient_phone),
            text(&self.patient_address),
        ]
    }
}

impl Tabular for Visit {
    const HEADERS: &'static [&'static str] = &["ID", "Type ID", "Type", "Minutes", "Date", "Fee"];

    fn cells(&self) -> Vec<String> {
        vec![
            number(self.visit_id),
            number(self.visit_type_id),
            text(&self.visit_type),
            number(self.visit_duration),
            text(&self.visit_date),
            money(self.visit_fee),
        ]
    }
}

impl Tabular for Fee {
    const HEADERS: &'static [&'static str] = &["ID", "Type ID", "Type", "Amount"];

    fn cells(&self) -> Vec<String> {
        vec![
            number(self.fee_id),
            number(self.visit_type_id),
            text(&self.visit_type),
            money(self.amount),
        ]
    }
}

impl Tabular for Activity {
    const HEADERS: &'static [&'static str] = &["ID", "Action", "Entity", "User", "When"];

    fn cells(&self) -> Vec<String> {
        vec![
            number(self.activity_id),
            text(&self.action),
            text(&self.entity),
            text(&self.user_email),
            text(&self.timestamp),
        ]
    }
}

/// Renders rows under a header line, each column padded to its widest cell.
pub fn table<T: Tabular>(rows: &[T]) -> String {
    let body: Vec<Vec<String>> = rows.iter().map(Tabular::cells).collect();
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = T::HEADERS.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![line(&header, &widths)];
    lines.extend(body.iter().map(|row| line(row, &widths)));
    lines.join("\n")
}

fn line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Renders one record as `Header: value` lines.
pub fn details<T: Tabular>(row: &T) -> String {
    T::HEADERS
        .iter()
        .zip(row.cells())
        .map(|(header, cell)| format!("{header}: {cell}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describes when a table was last fetched, in local time.
pub fn freshness(last_fetched: Option<i64>) -> String {
    match last_fetched.and_then(DateTime::from_timestamp_millis) {
        Some(at) => format!(
            "updated {}",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => "never loaded".to_string(),
    }
}
