//! Typed table schema for the erosion parser.
//!
//! A schema is declared once per table layout and reused for every line of
//! that table. It is plain immutable data: the parser never mutates it, and
//! the same schema value can drive concurrent parses of independent
//! documents.
//!
//! Schemas can be built in code or deserialized from a JSON config file:
//!
//! ```json
//! {
//!   "columns": [
//!     { "name": "vessel", "type": "str" },
//!     { "name": "berth", "type": "enum", "values": ["NORTH", "SOUTH"] },
//!     { "name": "eta", "type": "date", "templates": ["%d/%m/%Y %H:%M"] },
//!     { "name": "tonnage", "type": "int", "optional": true }
//!   ],
//!   "header_stop": ["TONNAGE"],
//!   "start": "right"
//! }
//! ```

use serde::Deserialize;

/// The declared type of one table column.
///
/// Types drive the erosion parser's side-anchored matching: knowing that a
/// column holds, say, a date lets the parser locate its exact extent inside
/// a line even when columns visually overlap.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnType {
    /// Free text of arbitrary length. Its extent is inferred from the
    /// neighbouring typed columns.
    Str,

    /// A whole number (`\d+`).
    Int,

    /// A decimal number. The decimal separator is configured on the parser
    /// (default `,`, the common case in European port documents).
    Float,

    /// One of a fixed set of literal values (berth names, cargo operations,
    /// vessel status codes, ...). Longer literals win over shorter ones that
    /// are their prefix or suffix.
    Enum {
        /// The literal values this column may hold.
        values: Vec<String>,
    },

    /// A timestamp matching one of the given `strftime`-style templates,
    /// tried in order (e.g. `["%d/%m/%Y %H:%M", "%d/%m/%Y"]`).
    Date {
        /// Candidate `strftime` templates.
        templates: Vec<String>,
    },

    /// A single non-whitespace character, returned as-is.
    Char,
}

/// Which end of a line a column is matched and eroded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Erode from the start of the line.
    #[default]
    Left,
    /// Erode from the end of the line.
    Right,
}

impl Side {
    /// The opposite side.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// The order in which a line's columns are eroded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One pass in declared order, left-to-right when the start side is
    /// [`Side::Left`], right-to-left otherwise.
    #[default]
    Linear,

    /// Ping-pong between both ends of the declared column list, starting
    /// from the configured side.
    Alternating,
}

/// One logical table column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    /// Display name used as the output record key. `None` parses and erodes
    /// the column but discards its value (useful for separator columns the
    /// caller does not care about).
    #[serde(default)]
    pub name: Option<String>,

    /// The column's declared type.
    #[serde(flatten)]
    pub kind: ColumnType,

    /// Whether the column may legitimately be absent on some rows. A failed
    /// match on an optional column yields [`crate::Value::Null`] instead of
    /// rejecting the row.
    #[serde(default)]
    pub optional: bool,
}

impl Column {
    /// Creates a mandatory named column.
    #[must_use]
    pub fn new(name: &str, kind: ColumnType) -> Self {
        Self {
            name: Some(name.to_owned()),
            kind,
            optional: false,
        }
    }

    /// Creates a column whose parsed value is discarded from emitted
    /// records.
    #[must_use]
    pub const fn discard(kind: ColumnType) -> Self {
        Self {
            name: None,
            kind,
            optional: false,
        }
    }

    /// Marks the column as possibly absent.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Whether this is an untyped free-text column.
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self.kind, ColumnType::Str)
    }
}

/// The full declaration of one table layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableSchema {
    /// Ordered column descriptors; order encodes the table's left-to-right
    /// layout.
    pub columns: Vec<Column>,

    /// Literal strings marking the header row: the first line ending with
    /// one of these (after accent normalization) is the header, and parsing
    /// starts on the following line.
    pub header_stop: Vec<String>,

    /// Which end of each line erosion begins from.
    #[serde(default)]
    pub start: Side,

    /// How columns are ordered during erosion.
    #[serde(default)]
    pub strategy: Strategy,
}

impl TableSchema {
    /// Creates a schema with the default start side ([`Side::Left`]) and
    /// strategy ([`Strategy::Linear`]).
    #[must_use]
    pub fn new(columns: Vec<Column>, header_stop: &[&str]) -> Self {
        Self {
            columns,
            header_stop: header_stop.iter().map(|s| (*s).to_owned()).collect(),
            start: Side::default(),
            strategy: Strategy::default(),
        }
    }

    /// Sets the side erosion starts from.
    #[must_use]
    pub const fn with_start(mut self, side: Side) -> Self {
        self.start = side;
        self
    }

    /// Sets the erosion strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}
