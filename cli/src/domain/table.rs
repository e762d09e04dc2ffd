//! Fixed-width server table.
//!
//! Column widths are expressed in tab stops of [`TAB_WIDTH`] characters, so
//! `("id", 5)` reserves a 40-character column.

use alamo_common::ServerRecord;

use crate::domain::error::FormatError;

pub const TAB_WIDTH: usize = 8;

/// Ordered `(field, width)` pairs.
pub type ColumnSpec = [(&'static str, usize)];

/// Columns printed by `alamo server list`.
pub const SERVER_COLUMNS: &ColumnSpec = &[("id", 5), ("name", 3), ("status", 2), ("addresses", 4)];

/// Render a header line plus one line per record.
///
/// A value wider than its column is printed whole and followed by a single
/// space so the next column still starts on a separate word.
///
/// # Errors
///
/// Returns `FormatError::UnknownField` if a column names a field that server
/// records do not have.
pub fn format_table(
    columns: &ColumnSpec,
    records: &[ServerRecord],
) -> Result<Vec<String>, FormatError> {
    for (field, _) in columns {
        if !is_known_field(field) {
            return Err(FormatError::UnknownField((*field).to_string()));
        }
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(render_line(columns, |field| field.to_string()));
    for record in records {
        lines.push(render_line(columns, |field| {
            field_value(record, field).unwrap_or_default()
        }));
    }
    Ok(lines)
}

/// Display value of a named field, addresses flattened to `a,b`.
#[must_use]
pub fn field_value(record: &ServerRecord, field: &str) -> Option<String> {
    let value = match field {
        "id" => record.id.clone(),
        "name" => record.name.clone(),
        "status" => record.status.clone(),
        "addresses" => record
            .all_addresses()
            .map(|a| a.addr.as_str())
            .collect::<Vec<_>>()
            .join(","),
        "created" => record.created.map(|t| t.to_rfc3339()).unwrap_or_default(),
        "updated" => record.updated.map(|t| t.to_rfc3339()).unwrap_or_default(),
        _ => return None,
    };
    Some(value)
}

fn is_known_field(field: &str) -> bool {
    field_value(&ServerRecord::default(), field).is_some()
}

fn render_line(columns: &ColumnSpec, value: impl Fn(&str) -> String) -> String {
    let mut line = String::new();
    for (field, width) in columns {
        let cell = value(field);
        let col = width * TAB_WIDTH;
        let len = cell.chars().count();
        line.push_str(&cell);
        if len < col {
            line.push_str(&" ".repeat(col - len));
        } else {
            line.push(' ');
        }
    }
    line.truncate(line.trim_end().len());
    line
}
