use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use log::{debug, warn};

use crate::config::ColumnMap;
use crate::error::LoadError;
use crate::models::Ticket;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%b/%y %I:%M %p",
    "%d/%b/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%b/%y"];

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub columns: ColumnMap,
    /// Tried before the built-in formats.
    pub date_format: Option<String>,
}

/// Parses a timestamp cell into the calendar date it falls on.
pub fn parse_date(value: &str, custom_format: Option<&str>) -> Option<NaiveDate> {
    let value = value.trim();

    if let Some(format) = custom_format {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.date());
        }
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        })
}

struct ColumnIndex {
    id: usize,
    created: usize,
    resolved: usize,
    status: usize,
}

impl ColumnIndex {
    fn locate(
        headers: &StringRecord,
        columns: &ColumnMap,
        path: &Path,
    ) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            id: find(columns.id.as_str())?,
            created: find(columns.created.as_str())?,
            resolved: find(columns.resolved.as_str())?,
            status: find(columns.status.as_str())?,
        })
    }
}

pub fn load_tickets(path: &Path, options: &LoadOptions) -> Result<Vec<Ticket>, LoadError> {
    let reader = csv::Reader::from_path(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_tickets(reader, path, options)
}

fn read_tickets<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
    options: &LoadOptions,
) -> Result<Vec<Ticket>, LoadError> {
    let record_error = |source| LoadError::Record {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(record_error)?.clone();
    let index = ColumnIndex::locate(&headers, &options.columns, path)?;
    let custom_format = options.date_format.as_deref();
    let mut tickets = Vec::new();

    for (offset, result) in reader.records().enumerate() {
        let record = result.map_err(record_error)?;
        let row = offset + 1;
        let cell = |i: usize| record.get(i).unwrap_or("").trim();

        let date = |i: usize, column: &str| {
            parse_date(cell(i), custom_format).ok_or_else(|| LoadError::DateParse {
                path: path.to_path_buf(),
                row,
                column: column.to_string(),
                value: cell(i).to_string(),
            })
        };

        let created_at = date(index.created, options.columns.created.as_str())?;
        let resolved_at = if cell(index.resolved).is_empty() {
            None
        } else {
            Some(date(index.resolved, options.columns.resolved.as_str())?)
        };

        let ticket = Ticket {
            id: cell(index.id).to_string(),
            created_at,
            resolved_at,
            resolution_status: cell(index.status).to_string(),
        };

        if let Some(resolved_at) = ticket.resolved_at {
            if resolved_at < ticket.created_at {
                warn!(
                    "{} resolved on {} before it was created on {}",
                    ticket.id, resolved_at, ticket.created_at
                );
            }
        }

        tickets.push(ticket);
    }

    debug!("loaded {} tickets from {}", tickets.len(), path.display());
    Ok(tickets)
}
