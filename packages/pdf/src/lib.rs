#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF table extraction for maritime data sources.
//!
//! Port authorities, terminal operators, and shipping agents publish line-ups
//! and port-call schedules as PDF bulletins. After an external converter has
//! turned a PDF page into plain text, this crate recovers the tabular
//! structure from that text using one of two parsers:
//!
//! - [`AlignedTable`] handles tables whose columns are vertically aligned by
//!   character position: each word is assigned to the header column with the
//!   nearest horizontal offset.
//! - [`ErosionTable`] handles tables whose columns overlap or reflow so that
//!   positional alignment fails. Given a typed [`schema::TableSchema`], it
//!   *erodes* each line from the left and/or right, matching and stripping
//!   one column's value at a time.
//!
//! Neither parser performs any I/O; both operate on in-memory text and yield
//! lazy iterators of records. Malformed rows are logged and skipped so a
//! single bad line never aborts extraction of the rest of a table.

pub mod align;
pub mod erosion;
pub mod fields;
pub mod schema;
pub mod text;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

pub use align::AlignedTable;
pub use erosion::ErosionTable;
pub use schema::{Column, ColumnType, Side, Strategy, TableSchema};

/// Errors that can cross the parsing boundary.
///
/// Per-row structural failures never surface here; they are logged and the
/// offending row is skipped.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The schema declares no columns.
    #[error("table schema must declare at least one column")]
    NoColumns,

    /// The schema declares no header-stop markers.
    #[error("table schema must declare at least one header stop marker")]
    NoHeaderStop,

    /// No line in the document matched a header-stop marker.
    #[error("while parsing '{0}', could not find the position of the first line in the table")]
    HeaderNotFound(String),

    /// A pattern built from the schema failed to compile.
    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// A single typed cell value extracted from a table row.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Free text.
    Str(String),
    /// Whole number.
    Int(i64),
    /// Decimal number (already converted to a dot decimal separator).
    Float(f64),
    /// Parsed timestamp; date-only formats default the time to midnight.
    Date(NaiveDateTime),
    /// An optional column that was legitimately absent on this row.
    Null,
}

impl Value {
    /// Returns the inner string if this value is [`Value::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// One parsed table row, keyed by column display name.
pub type Record = BTreeMap<String, Value>;
