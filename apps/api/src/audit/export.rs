//! Export formatter — serializes a queried set of entries to JSON or CSV.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::models::AuditEntry;

pub const CSV_HEADER: &str =
    "id,actorId,actorEmail,actionKind,description,severity,timestamp,success,ipAddress";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

pub fn render(entries: &[AuditEntry], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => to_json(entries),
        ExportFormat::Csv => Ok(to_csv(entries)),
    }
}

/// Pretty-printed JSON array.
pub fn to_json(entries: &[AuditEntry]) -> Result<String, ExportError> {
    serde_json::to_string_pretty(entries).map_err(|e| ExportError::Failed(e.to_string()))
}

/// RFC 4180 CSV with a fixed column order (see `CSV_HEADER`).
pub fn to_csv(entries: &[AuditEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for entry in entries {
        let timestamp = entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        let row = [
            entry.id.as_str(),
            entry.actor_id.as_str(),
            entry.actor_email.as_deref().unwrap_or(""),
            entry.action.as_str(),
            entry.description.as_str(),
            entry.severity.as_str(),
            timestamp.as_str(),
            if entry.success { "true" } else { "false" },
            entry.ip_address.as_deref().unwrap_or(""),
        ];
        lines.push(
            row.iter()
                .map(|field| escape_field(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

/// Quotes the field when it contains a comma, quote or line break; inner quotes are doubled.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::models::AuditAction;
    use crate::audit::query::tests::entry_at;

    /// Minimal RFC 4180 reader used to check that exports parse back losslessly.
    fn parse_csv(input: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, in_quotes) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                ('"', true) => in_quotes = false,
                ('"', false) if field.is_empty() => in_quotes = true,
                (',', false) => row.push(std::mem::take(&mut field)),
                ('\n', false) => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(c),
            }
        }
        row.push(field);
        rows.push(row);
        rows
    }

    #[test]
    fn test_csv_header_is_fixed() {
        let csv = to_csv(&[]);
        assert_eq!(csv, CSV_HEADER);
    }

    #[test]
    fn test_csv_row_column_order() {
        let mut entry = entry_at("user-001", AuditAction::UserLogin, false, 0);
        entry.actor_email = Some("test@example.com".to_string());
        entry.ip_address = Some("10.0.0.1".to_string());
        let csv = to_csv(&[entry.clone()]);
        let rows = parse_csv(&csv);
        assert_eq!(rows.len(), 2);
        let row = &rows[1];
        assert_eq!(row[0], entry.id);
        assert_eq!(row[1], "user-001");
        assert_eq!(row[2], "test@example.com");
        assert_eq!(row[3], "user.login");
        assert_eq!(row[5], "low");
        assert_eq!(row[6], "2026-10-18T12:00:00.000Z");
        assert_eq!(row[7], "false");
        assert_eq!(row[8], "10.0.0.1");
    }

    #[test]
    fn test_csv_round_trips_description_with_quotes_and_commas() {
        let mut entry = entry_at("admin", AuditAction::AdminUserCreated, true, 0);
        entry.description = r#"Created "test, user", then said "hi""#.to_string();
        let csv = to_csv(&[entry.clone()]);
        let rows = parse_csv(&csv);
        assert_eq!(rows[1][4], entry.description);
        assert_eq!(rows[1].len(), 9);
    }

    #[test]
    fn test_csv_round_trips_multiline_description() {
        let mut entry = entry_at("admin", AuditAction::SystemError, false, 0);
        entry.description = "line one\nline two".to_string();
        let rows = parse_csv(&to_csv(&[entry.clone()]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][4], entry.description);
    }

    #[test]
    fn test_plain_fields_are_not_quoted() {
        assert_eq!(escape_field("plain text"), "plain text");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"x\""), "\"say \"\"x\"\"\"");
    }

    #[test]
    fn test_json_export_is_pretty_array() {
        let entries = vec![entry_at("a", AuditAction::UserLogout, true, 0)];
        let json = to_json(&entries).unwrap();
        assert!(json.starts_with("[\n"));
        let parsed: Vec<AuditEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_format_parses_from_lowercase() {
        let f: ExportFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(f, ExportFormat::Csv);
        assert_eq!(ExportFormat::Json.content_type(), "application/json");
    }
}
