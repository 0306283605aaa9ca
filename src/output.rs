//! Output rendering for the command line
//!
//! Lists render as aligned tables, pretty JSON or CSV. Single records and
//! dashboards render as JSON or as a table of their own.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::api::{HealthStatus, ServiceHealth};
use crate::cache::ResidentProfile;
use crate::models::{
    Appointment, Carer, Doctor, FamilyMember, FoodEntry, IamRole, IamUser, Notification,
    PaymentRequest, Receipt, Resident,
};
use crate::workflows::PatientSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {other}. Use table, json or csv")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output is not valid UTF-8")]
    Encoding,
}

/// A record that can be shown as one row of a table
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

/// Render a list in the requested format
pub fn render<T: Tabular + Serialize>(items: &[T], format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Csv => csv_string(T::headers(), items.iter().map(Tabular::row)),
        OutputFormat::Table => Ok(table(T::headers(), items.iter().map(Tabular::row))),
    }
}

/// Render one record; tables and CSV show it as a single row
pub fn render_one<T: Tabular + Serialize>(item: &T, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
        _ => render(std::slice::from_ref(item), format),
    }
}

/// Render `label: value` pairs, or the serialized value as JSON
pub fn render_summary<T: Serialize>(
    value: &T,
    pairs: &[(&str, String)],
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Csv => csv_string(
            &["field", "value"],
            pairs.iter().map(|(k, v)| vec![k.to_string(), v.clone()]),
        ),
        OutputFormat::Table => {
            let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            Ok(pairs
                .iter()
                .map(|(k, v)| format!("{:<width$}  {}", format!("{k}:"), v, width = width + 1))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

/// Aligned columns with a dashed rule under the header
pub fn table(headers: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows.into_iter().collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.iter().map(|h| h.to_string()).collect())];
    let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push("-".repeat(total));
    if rows.is_empty() {
        out.push("(no results)".to_string());
    }
    out.extend(rows.into_iter().map(line));
    out.join("\n")
}

fn csv_string(
    headers: &[&str],
    rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<String, OutputError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Csv(e.into_error().into()))?;
    let text = String::from_utf8(bytes).map_err(|_| OutputError::Encoding)?;
    Ok(text.trim_end().to_string())
}

fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

impl Tabular for Resident {
    fn headers() -> &'static [&'static str] {
        &["ID", "DNI", "Name", "Birth date", "City"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            cell(&self.dni),
            self.full_name(),
            cell(&self.birth_date),
            cell(&self.city),
        ]
    }
}

impl Tabular for Appointment {
    fn headers() -> &'static [&'static str] {
        &["ID", "Resident", "Doctor", "Date", "Time", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            cell(&self.resident_id),
            cell(&self.doctor_id),
            cell(&self.date),
            self.time.map(|t| t.to_string()).unwrap_or_default(),
            cell(&self.status),
        ]
    }
}

impl Tabular for Receipt {
    fn headers() -> &'static [&'static str] {
        &["ID", "Resident", "Type", "Issued", "Due", "Total", "Paid", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.receipt_id),
            cell(&self.resident_id),
            cell(&self.kind),
            cell(&self.issue_date),
            cell(&self.due_date),
            money(self.total_amount),
            money(self.amount_paid),
            if self.is_paid() { "paid" } else { "pending" }.to_string(),
        ]
    }
}

impl Tabular for Notification {
    fn headers() -> &'static [&'static str] {
        &["ID", "Status", "Type", "Title", "From", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            self.effective_status().to_string(),
            cell(&self.kind),
            self.headline().to_string(),
            cell(&self.sender),
            cell(&self.created_at),
        ]
    }
}

impl Tabular for FoodEntry {
    fn headers() -> &'static [&'static str] {
        &["ID", "Meal", "Date", "Time", "Description", "Added by"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.meal.to_string(),
            self.date.clone(),
            self.time.clone(),
            self.description.clone(),
            cell(&self.added_by),
        ]
    }
}

impl Tabular for PaymentRequest {
    fn headers() -> &'static [&'static str] {
        &["ID", "Period", "Concept", "Amount", "Status", "Requested by", "Payer"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.period.clone(),
            self.concept.clone(),
            self.amount.clone(),
            self.status.to_string(),
            cell(&self.requester),
            self.payer.clone().or_else(|| self.payer_id.clone()).unwrap_or_default(),
        ]
    }
}

impl Tabular for Doctor {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "License", "Specialty", "Phone"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            self.full_name.as_ref().map(|n| n.display()).unwrap_or_default(),
            cell(&self.license_number),
            cell(&self.specialty),
            self.contact_info
                .as_ref()
                .and_then(|c| c.phone.clone())
                .unwrap_or_default(),
        ]
    }
}

impl Tabular for Carer {
    fn headers() -> &'static [&'static str] {
        &["ID", "DNI", "Name", "Email"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            cell(&self.dni),
            cell(&self.full_name),
            cell(&self.email),
        ]
    }
}

impl Tabular for FamilyMember {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Relationship", "Resident"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            self.full_name.as_ref().map(|n| n.display()).unwrap_or_default(),
            cell(&self.relationship),
            cell(&self.linked_resident_id),
        ]
    }
}

impl Tabular for IamUser {
    fn headers() -> &'static [&'static str] {
        &["ID", "Username", "Roles"]
    }

    fn row(&self) -> Vec<String> {
        vec![cell(&self.id), cell(&self.username), self.roles.join(",")]
    }
}

impl Tabular for IamRole {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name"]
    }

    fn row(&self) -> Vec<String> {
        vec![cell(&self.id), cell(&self.name)]
    }
}

impl Tabular for ServiceHealth {
    fn headers() -> &'static [&'static str] {
        &["Service", "Status", "Detail", "URL"]
    }

    fn row(&self) -> Vec<String> {
        let (state, detail) = match &self.status {
            HealthStatus::Ok { items: Some(n) } => ("ok", format!("{n} items")),
            HealthStatus::Ok { items: None } => ("ok", String::new()),
            HealthStatus::Failed { status, message } => (
                "failed",
                match status {
                    Some(code) => format!("{code} {message}"),
                    None => message.clone(),
                },
            ),
        };
        vec![
            self.name.to_string(),
            state.to_string(),
            detail,
            self.url.clone(),
        ]
    }
}

impl Tabular for PatientSummary {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "DNI", "Last check", "Next appointment"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.resident_id),
            self.name.clone(),
            cell(&self.dni),
            cell(&self.last_check),
            cell(&self.next_appointment),
        ]
    }
}

impl Tabular for ResidentProfile {
    fn headers() -> &'static [&'static str] {
        &["ID", "Resident", "Age", "Status", "Family member", "Relationship"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.resident.id.clone(),
            self.resident.name.clone(),
            self.resident.age.to_string(),
            cell(&self.resident.general_status),
            self.family_member.username.clone(),
            self.family_member.relationship.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residents() -> Vec<Resident> {
        vec![
            Resident {
                id: Some(1),
                dni: Some("12345678".into()),
                first_name: Some("Rosa".into()),
                last_name: Some("Perez".into()),
                city: Some("Lima".into()),
                ..Resident::default()
            },
            Resident {
                id: Some(22),
                first_name: Some("Juan, Jr.".into()),
                ..Resident::default()
            },
        ]
    }

    #[test]
    fn test_table_alignment() {
        let out = render(&residents(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  DNI       Name        Birth date  City");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "1   12345678  Rosa Perez              Lima");
        assert_eq!(lines[3], "22            Juan, Jr.");
    }

    #[test]
    fn test_empty_table() {
        let out = render::<Carer>(&[], OutputFormat::Table).unwrap();
        assert!(out.ends_with("(no results)"));
    }

    #[test]
    fn test_csv_quotes_commas() {
        let out = render(&residents(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID,DNI,Name,Birth date,City");
        assert_eq!(lines[1], "1,12345678,Rosa Perez,,Lima");
        assert_eq!(lines[2], "22,,\"Juan, Jr.\",,");
    }

    #[test]
    fn test_json_is_camel_case() {
        let out = render_one(&residents()[0], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["firstName"], "Rosa");
    }

    #[test]
    fn test_summary_table() {
        let pairs = [("Email", "a@b.com".to_string()), ("Role", "doctor".to_string())];
        let out = render_summary(&(), &pairs, OutputFormat::Table).unwrap();
        assert_eq!(out, "Email:  a@b.com\nRole:   doctor");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
