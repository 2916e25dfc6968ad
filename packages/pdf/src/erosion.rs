//! Typed erosion-based table extraction.
//!
//! Handles tables the positional parser ([`crate::align`]) cannot: columns
//! that visually overlap or reflow, so no fixed character offset separates
//! them. Given a typed [`TableSchema`], each line is *eroded* from the left
//! and/or right end: the next declared column's type matcher is anchored to
//! the current side of the shrinking remainder, and its matched text is
//! stripped once it is found.
//!
//! Free-text columns have no intrinsic extent, so their boundary is found by
//! probing successive whitespace chunks of the line against the next typed
//! column; two adjacent free-text columns fall back to a separator-run gap
//! heuristic.
//!
//! A malformed row is logged and skipped; only configuration problems and a
//! missing header abort the whole document.

use std::collections::VecDeque;

use regex::Regex;

use crate::schema::{Column, ColumnType, Side, Strategy, TableSchema};
use crate::text::{pattern_on_side, remove_accents, remove_first_on_left, remove_first_on_right};
use crate::{Record, TableError, Value, fields};

/// Per-line parsing state.
///
/// Created fresh for each body line and discarded once the line's record is
/// emitted or the line is rejected; nothing survives across lines.
#[derive(Debug)]
struct LineCursor {
    /// The not-yet-eroded remainder of the line.
    line: String,
    /// Which end of the remainder the current column is matched against.
    side: Side,
    /// Per-column flag: matched (or skipped as optional) already.
    parsed: Vec<bool>,
}

impl LineCursor {
    fn new(line: &str, side: Side, column_count: usize) -> Self {
        Self {
            line: line.trim().to_owned(),
            side,
            parsed: vec![false; column_count],
        }
    }

    fn parsed_count(&self) -> usize {
        self.parsed.iter().filter(|done| **done).count()
    }

    /// Removes the first occurrence of `matched` from the current side.
    ///
    /// Only that occurrence is removed; this deliberately does not assume
    /// the match sits exactly at the line's edge, since discriminating
    /// patterns may have skipped over separator characters.
    fn erode(&mut self, matched: &str) {
        self.line = match self.side {
            Side::Left => remove_first_on_left(&self.line, matched),
            Side::Right => remove_first_on_right(&self.line, matched),
        };
    }

    fn trim_in_place(&mut self) {
        if self.line.trim().len() != self.line.len() {
            self.line = self.line.trim().to_owned();
        }
    }
}

/// A structural failure confined to a single row.
///
/// Never crosses [`ErosionTable::parse`]; rows failing this way are logged
/// and skipped.
#[derive(Debug, thiserror::Error)]
enum RowError {
    /// A mandatory column's matcher found nothing on its side of the line.
    #[error("could not match {kind} on the {side} side of line: \"{line}\"")]
    ColumnNotMatched {
        kind: &'static str,
        side: Side,
        line: String,
    },

    /// The whole line was consumed while probing for the column that bounds
    /// a free-text column.
    #[error("could not match a {kind} next to a string on the {side} side of line: \"{line}\"")]
    NextColumnNotFound {
        kind: &'static str,
        side: Side,
        line: String,
    },

    /// A free-text column ate the entire remainder.
    #[error("could not match string on the {side} side of line: \"{line}\"")]
    StringNotMatched { side: Side, line: String },

    /// The gap heuristic found no separator run splitting the remainder
    /// into the expected number of pieces.
    #[error("could not split adjacent string columns on line: \"{line}\"")]
    GapHeuristicFailed { line: String },

    /// The schema interleaves two free-text columns in a way the heuristics
    /// cannot disambiguate.
    #[error("two string columns separated only by optional columns are not supported")]
    AdjacentStrings,
}

const fn kind_name(kind: &ColumnType) -> &'static str {
    match kind {
        ColumnType::Str => "a string",
        ColumnType::Int => "an integer",
        ColumnType::Float => "a float",
        ColumnType::Enum { .. } => "an enumeration value",
        ColumnType::Date { .. } => "a date",
        ColumnType::Char => "a character",
    }
}

/// Parser for tables whose columns cannot be separated by position.
#[derive(Debug, Clone)]
pub struct ErosionTable {
    schema: TableSchema,
    decimal_separator: char,
    /// Name used in log messages, typically the source file name.
    source: String,
}

impl ErosionTable {
    /// Creates a parser for the given schema.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NoColumns`] or [`TableError::NoHeaderStop`]
    /// when the schema is incomplete, and [`TableError::Regex`] when a
    /// pattern generated from the schema does not compile. These are
    /// programmer errors; they are raised here rather than surfacing later
    /// during parsing.
    pub fn new(schema: TableSchema) -> Result<Self, TableError> {
        if schema.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        if schema.header_stop.is_empty() {
            return Err(TableError::NoHeaderStop);
        }

        for column in &schema.columns {
            for pattern in column_patterns(column) {
                for side in [Side::Left, Side::Right] {
                    Regex::new(&pattern_on_side(&pattern, side, ".*"))?;
                }
            }
        }

        Ok(Self {
            schema,
            decimal_separator: ',',
            source: "<memory>".to_owned(),
        })
    }

    /// Sets the decimal separator used by float columns (default `,`).
    #[must_use]
    pub const fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Sets the source name used in log messages.
    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        source.clone_into(&mut self.source);
        self
    }

    /// Parses already-extracted PDF text into a lazy sequence of records.
    ///
    /// The iterator yields one record per successfully parsed body line, in
    /// document order; rows that fail structurally are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::HeaderNotFound`] when no line ends with one of
    /// the schema's header-stop markers; nothing is parsed in that case.
    pub fn parse<'a>(
        &'a self,
        content: &'a str,
    ) -> Result<impl Iterator<Item = Record> + 'a, TableError> {
        let header_line = self.find_header(content)?;

        Ok(content
            .lines()
            .enumerate()
            .skip(header_line + 1)
            .filter_map(move |(lineno, line)| self.parse_line(lineno, line)))
    }

    /// Finds the header row: the first line whose accent-normalized trimmed
    /// text ends with an accent-normalized header-stop marker.
    fn find_header(&self, content: &str) -> Result<usize, TableError> {
        let stops: Vec<String> = self
            .schema
            .header_stop
            .iter()
            .map(|stop| remove_accents(stop))
            .collect();

        for (lineno, line) in content.lines().enumerate() {
            let clean = remove_accents(line.trim());
            if stops.iter().any(|stop| clean.ends_with(stop.as_str())) {
                return Ok(lineno);
            }
        }

        Err(TableError::HeaderNotFound(self.source.clone()))
    }

    /// Parses one body line; `None` means the line was empty or rejected.
    fn parse_line(&self, lineno: usize, raw: &str) -> Option<Record> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        let mut cursor = LineCursor::new(line, self.schema.start, self.schema.columns.len());
        let result = match self.schema.strategy {
            Strategy::Linear => self.linear_strategy(&mut cursor),
            Strategy::Alternating => self.alternating_strategy(&mut cursor),
        };

        match result {
            Ok(record) => Some(record),
            Err(e) => {
                log::error!(
                    "{}:{}: could not parse line: \"{line}\": {e}",
                    self.source,
                    lineno + 1,
                );
                None
            }
        }
    }

    /// Erodes columns in declared order, reversed when starting from the
    /// right. The cursor side stays on the start side for the whole line.
    fn linear_strategy(&self, cursor: &mut LineCursor) -> Result<Record, RowError> {
        let count = self.schema.columns.len();
        let order: Vec<usize> = match self.schema.start {
            Side::Left => (0..count).collect(),
            Side::Right => (0..count).rev().collect(),
        };

        let mut record = Record::new();
        for col_idx in order {
            let value = self.parse_column(cursor, col_idx, true)?;
            if let Some(name) = &self.schema.columns[col_idx].name {
                record.insert(name.clone(), value);
            }
        }
        Ok(record)
    }

    /// Erodes columns alternately from both ends of the declared list,
    /// starting from the configured side; the cursor side tracks whichever
    /// end is currently being consumed.
    fn alternating_strategy(&self, cursor: &mut LineCursor) -> Result<Record, RowError> {
        let mut remaining: VecDeque<usize> = (0..self.schema.columns.len()).collect();
        let mut from_front = self.schema.start == Side::Left;

        let mut record = Record::new();
        loop {
            let Some(col_idx) = (if from_front {
                remaining.pop_front()
            } else {
                remaining.pop_back()
            }) else {
                break;
            };

            cursor.side = if from_front { Side::Left } else { Side::Right };
            let value = self.parse_column(cursor, col_idx, true)?;
            if let Some(name) = &self.schema.columns[col_idx].name {
                record.insert(name.clone(), value);
            }

            from_front = !from_front;
        }
        Ok(record)
    }

    /// Matches one column on the cursor's side of the line.
    ///
    /// With `erode` set, a successful match is stripped from the line and
    /// the matched-column counter advances; without it the column is only
    /// probed (used while bounding a free-text column).
    fn parse_column(
        &self,
        cursor: &mut LineCursor,
        col_idx: usize,
        erode: bool,
    ) -> Result<Value, RowError> {
        cursor.trim_in_place();
        let column = &self.schema.columns[col_idx];

        let outcome: Option<(Value, String)> = match &column.kind {
            ColumnType::Char => {
                fields::match_char(&cursor.line, cursor.side).map(|c| (Value::Str(c.clone()), c))
            }
            ColumnType::Int => fields::match_int(&cursor.line, cursor.side)
                .map(|(value, matched)| (Value::Int(value), matched)),
            ColumnType::Float => {
                fields::match_float(&cursor.line, cursor.side, self.decimal_separator)
                    .map(|(value, matched)| (Value::Float(value), matched))
            }
            ColumnType::Enum { values } => fields::match_enum(&cursor.line, cursor.side, values)
                .map(|matched| (Value::Str(matched.clone()), matched)),
            ColumnType::Date { templates } => {
                fields::match_date(&cursor.line, cursor.side, templates)
                    .map(|(value, matched)| (Value::Date(value), matched))
            }
            ColumnType::Str => {
                let matched = self.parse_str(cursor, col_idx)?;
                Some((Value::Str(matched.clone()), matched))
            }
        };

        match outcome {
            Some((value, matched)) => {
                if erode {
                    cursor.parsed[col_idx] = true;
                    if !matched.is_empty() {
                        cursor.erode(&matched);
                    }
                }
                Ok(value)
            }
            None if column.optional => {
                if erode {
                    cursor.parsed[col_idx] = true;
                }
                Ok(Value::Null)
            }
            None => Err(RowError::ColumnNotMatched {
                kind: kind_name(&column.kind),
                side: cursor.side,
                line: cursor.line.clone(),
            }),
        }
    }

    /// Determines the extent of a free-text column.
    ///
    /// A string has no intrinsic shape, so its boundary is wherever the
    /// *next* typed column starts matching. Optional columns that fail to
    /// match are skipped over; when the string is the last column on its
    /// side, the whole remainder is the value.
    fn parse_str(&self, cursor: &mut LineCursor, col_idx: usize) -> Result<String, RowError> {
        let columns = &self.schema.columns;
        let following: Vec<usize> = match cursor.side {
            Side::Left => (col_idx + 1..columns.len()).collect(),
            Side::Right => (0..col_idx).rev().collect(),
        };

        let saved_line = cursor.line.clone();
        let mut visited = false;

        for next_col_idx in following {
            if cursor.parsed[next_col_idx] {
                // Already consumed from the other end (alternating
                // strategy); it cannot bound this string.
                continue;
            }
            visited = true;

            if columns[next_col_idx].is_str() {
                if columns.len() - cursor.parsed_count() == 2 {
                    // Only two strings remain; fall back to splitting on a
                    // run of separator characters.
                    self.gap_heuristic(cursor)?;
                    break;
                }
                return Err(RowError::AdjacentStrings);
            }

            match self.probe_next_column(cursor, next_col_idx) {
                Ok(()) => break,
                Err(e) => {
                    if columns[next_col_idx].optional {
                        // That column may be absent entirely; restore the
                        // line and bound the string with the one after it.
                        cursor.line.clone_from(&saved_line);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        if !visited {
            // Last column on this side: the remainder is the string.
            return Ok(cursor.line.trim().to_owned());
        }

        if cursor.line.is_empty() {
            cursor.line.clone_from(&saved_line);
            return Err(RowError::StringNotMatched {
                side: cursor.side,
                line: saved_line,
            });
        }

        // Whatever was consumed from the anchored side is the string value.
        let consumed = saved_line.chars().count() - cursor.line.chars().count();
        let total = saved_line.chars().count();
        let matched: String = match cursor.side {
            Side::Left => saved_line.chars().take(consumed).collect(),
            Side::Right => saved_line.chars().skip(total - consumed).collect(),
        };

        cursor.line = saved_line;
        Ok(matched.trim().to_owned())
    }

    /// Erodes whitespace chunks off the string side until `next_col_idx`
    /// matches the shrinking remainder.
    fn probe_next_column(
        &self,
        cursor: &mut LineCursor,
        next_col_idx: usize,
    ) -> Result<(), RowError> {
        let mut bits: Vec<String> = cursor
            .line
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        if cursor.side == Side::Right {
            bits.reverse();
        }

        let is_optional = self.schema.columns[next_col_idx].optional;
        let mut last_line = cursor.line.clone();

        for bit in bits {
            last_line.clone_from(&cursor.line);
            cursor.erode(&bit);

            match self.parse_column(cursor, next_col_idx, false) {
                Ok(value) => {
                    if value.is_null() {
                        // The next column may be glued to this chunk with no
                        // whitespace (a unit stuck to a number, say); try to
                        // match it on the opposite side of the chunk itself.
                        let (reverse, not_matched) =
                            self.reverse_match_on_removed_bit(cursor, &bit, next_col_idx);
                        match reverse {
                            Some(_) => {
                                // Keep only the fragment of the chunk that
                                // did not reverse-match; it belongs to the
                                // string.
                                cursor.line.clone_from(&last_line);
                                cursor.erode(&not_matched);
                            }
                            None if is_optional => continue,
                            None => {}
                        }
                    }
                    break;
                }
                // No match yet; move one chunk further into the line.
                Err(_) => continue,
            }
        }

        if cursor.line.is_empty() {
            return Err(RowError::NextColumnNotFound {
                kind: kind_name(&self.schema.columns[next_col_idx].kind),
                side: cursor.side,
                line: last_line,
            });
        }
        Ok(())
    }

    /// Probes `next_col_idx` against `bit` alone, from the opposite side.
    ///
    /// Returns the matched value (if any) and the part of `bit` that did not
    /// participate in the match.
    fn reverse_match_on_removed_bit(
        &self,
        cursor: &mut LineCursor,
        bit: &str,
        next_col_idx: usize,
    ) -> (Option<Value>, String) {
        let old_side = cursor.side;
        let old_line = std::mem::replace(&mut cursor.line, bit.to_owned());
        cursor.side = old_side.flip();

        let was_parsed = cursor.parsed[next_col_idx];
        let value = match self.parse_column(cursor, next_col_idx, true) {
            Ok(value) => {
                // The probe marked the column as parsed; undo it.
                cursor.parsed[next_col_idx] = was_parsed;
                if value.is_null() { None } else { Some(value) }
            }
            Err(_) => None,
        };

        let not_matched = std::mem::replace(&mut cursor.line, old_line);
        cursor.side = old_side;
        (value, not_matched)
    }

    /// Splits two adjacent free-text columns on a run of separator
    /// characters.
    ///
    /// Tries runs of 5 down to 1 non-word characters, looking for the width
    /// whose split yields exactly as many pieces as there are unparsed
    /// columns. Runs shorter than 2 are indistinguishable from the spaces
    /// inside a free-text value, so the line is rejected in that case.
    fn gap_heuristic(&self, cursor: &mut LineCursor) -> Result<(), RowError> {
        let remaining = self.schema.columns.len() - cursor.parsed_count();

        for width in (1..=5).rev() {
            let Some(separator) = Regex::new(&format!(r"\W{{{width}}}")).ok() else {
                break;
            };

            let matched: Option<String> = {
                let pieces: Vec<&str> = separator
                    .split(&cursor.line)
                    .filter(|piece| !piece.is_empty())
                    .collect();
                if pieces.len() != remaining {
                    continue;
                }
                if width < 2 {
                    break;
                }
                let piece_idx = match cursor.side {
                    Side::Left => 0,
                    Side::Right => 1,
                };
                pieces.get(piece_idx).map(|piece| piece.trim().to_owned())
            };

            if let Some(matched) = matched {
                cursor.erode(&matched);
                return Ok(());
            }
            break;
        }

        Err(RowError::GapHeuristicFailed {
            line: cursor.line.clone(),
        })
    }
}

fn column_patterns(column: &Column) -> Vec<String> {
    match &column.kind {
        ColumnType::Str => Vec::new(),
        ColumnType::Int => vec![r"\d+".to_owned()],
        ColumnType::Float => vec![r"\d+,\d+".to_owned()],
        ColumnType::Char => vec![r"\S".to_owned()],
        ColumnType::Enum { values } => values.iter().map(|value| regex::escape(value)).collect(),
        ColumnType::Date { templates } => templates
            .iter()
            .map(|template| fields::date_template_regex(template))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::schema::{Column, ColumnType, Side, Strategy, TableSchema};

    fn date(y: i32, mo: u32, d: u32) -> Value {
        Value::Date(
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    fn enum_kind(values: &[&str]) -> ColumnType {
        ColumnType::Enum {
            values: values.iter().map(|v| (*v).to_owned()).collect(),
        }
    }

    fn date_kind(templates: &[&str]) -> ColumnType {
        ColumnType::Date {
            templates: templates.iter().map(|t| (*t).to_owned()).collect(),
        }
    }

    #[test]
    fn construction_requires_columns_and_header_stop() {
        let err = ErosionTable::new(TableSchema::new(Vec::new(), &["X"])).unwrap_err();
        assert!(matches!(err, TableError::NoColumns));

        let err = ErosionTable::new(TableSchema::new(
            vec![Column::new("a", ColumnType::Int)],
            &[],
        ))
        .unwrap_err();
        assert!(matches!(err, TableError::NoHeaderStop));
    }

    #[test]
    fn generated_patterns_compile_for_every_column_type() {
        let schema = TableSchema::new(
            vec![
                Column::new("a", ColumnType::Int),
                Column::new("b", ColumnType::Float),
                Column::new("c", enum_kind(&["X", "LONGER X"])),
                Column::new("d", date_kind(&["%d/%m/%Y %H:%M", "%Y"])),
                Column::new("e", ColumnType::Char),
                Column::new("f", ColumnType::Str),
            ],
            &["HEADER"],
        );
        assert!(ErosionTable::new(schema).is_ok());
    }

    #[test]
    fn header_not_found_is_fatal() {
        let table = ErosionTable::new(TableSchema::new(
            vec![Column::new("a", ColumnType::Int)],
            &["TONNAGE"],
        ))
        .unwrap();

        let err = table.parse("no header here\n1\n2\n").map(|_| ()).unwrap_err();
        assert!(matches!(err, TableError::HeaderNotFound(_)));
    }

    #[test]
    fn header_stop_matches_ignoring_accents() {
        let table = ErosionTable::new(TableSchema::new(
            vec![Column::new("n", ColumnType::Int)],
            &["DARSENA"],
        ))
        .unwrap();

        let records: Vec<_> = table.parse("MUELLE  DÁRSENA\n42\n").unwrap().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["n"], Value::Int(42));
    }

    #[test]
    fn string_enum_date_from_the_right() {
        let schema = TableSchema::new(
            vec![
                Column::new("col1", ColumnType::Str),
                Column::new("col2", enum_kind(&["A", "B"])),
                Column::new("col3", date_kind(&["%Y"])),
            ],
            &["HEADER"],
        )
        .with_start(Side::Right);
        let table = ErosionTable::new(schema).unwrap();

        let records: Vec<_> = table.parse("HEADER\nfree text A 2015\n").unwrap().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["col1"], Value::Str("free text".to_owned()));
        assert_eq!(records[0]["col2"], Value::Str("A".to_owned()));
        assert_eq!(records[0]["col3"], date(2015, 1, 1));
    }

    #[test]
    fn erosion_is_symmetric_under_mirroring() {
        let right = TableSchema::new(
            vec![
                Column::new("name", ColumnType::Str),
                Column::new("status", enum_kind(&["LOADING"])),
                Column::new("year", date_kind(&["%Y"])),
            ],
            &["HEADER"],
        )
        .with_start(Side::Right);

        let left = TableSchema::new(
            vec![
                Column::new("year", date_kind(&["%Y"])),
                Column::new("status", enum_kind(&["LOADING"])),
                Column::new("name", ColumnType::Str),
            ],
            &["HEADER"],
        );

        let from_right: Vec<_> = ErosionTable::new(right)
            .unwrap()
            .parse("HEADER\nsea princess LOADING 2015\n")
            .unwrap()
            .collect();
        let from_left: Vec<_> = ErosionTable::new(left)
            .unwrap()
            .parse("HEADER\n2015 LOADING sea princess\n")
            .unwrap()
            .collect();

        assert_eq!(from_right, from_left);
        assert_eq!(from_right[0]["name"], Value::Str("sea princess".to_owned()));
        assert_eq!(from_right[0]["status"], Value::Str("LOADING".to_owned()));
        assert_eq!(from_right[0]["year"], date(2015, 1, 1));
    }

    #[test]
    fn optional_column_misses_yield_null() {
        let schema = TableSchema::new(
            vec![
                Column::new("qty", ColumnType::Int).optional(),
                Column::new("status", enum_kind(&["LOADED", "WAITING"])),
            ],
            &["HEADER"],
        );
        let table = ErosionTable::new(schema).unwrap();

        let records: Vec<_> = table
            .parse("HEADER\n120 LOADED\nWAITING\n")
            .unwrap()
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["qty"], Value::Int(120));
        assert_eq!(records[0]["status"], Value::Str("LOADED".to_owned()));
        assert_eq!(records[1]["qty"], Value::Null);
        assert_eq!(records[1]["status"], Value::Str("WAITING".to_owned()));
    }

    #[test]
    fn mandatory_miss_rejects_only_that_line() {
        let schema = TableSchema::new(
            vec![
                Column::new("id", ColumnType::Int),
                Column::new("name", ColumnType::Str),
            ],
            &["HEADER"],
        );
        let table = ErosionTable::new(schema).unwrap();

        let mut content = String::from("HEADER\n");
        for i in 0..10 {
            if i == 4 {
                content.push_str("not-a-number broken row\n");
            } else {
                content.push_str(&format!("{i} vessel {i}\n"));
            }
        }

        let records: Vec<_> = table.parse(&content).unwrap().collect();
        assert_eq!(records.len(), 9);
        assert_eq!(records[0]["id"], Value::Int(0));
        assert_eq!(records[8]["id"], Value::Int(9));
    }

    #[test]
    fn string_bounded_by_next_typed_column() {
        let schema = TableSchema::new(
            vec![
                Column::new("vessel", ColumnType::Str),
                Column::new("eta", date_kind(&["%d/%m/%Y"])),
                Column::new("berth", ColumnType::Str),
            ],
            &["HEADER"],
        );
        let table = ErosionTable::new(schema).unwrap();

        let records: Vec<_> = table
            .parse("HEADER\nSEA PRINCESS 01/02/2024 NORTH QUAY\n")
            .unwrap()
            .collect();
        assert_eq!(records[0]["vessel"], Value::Str("SEA PRINCESS".to_owned()));
        assert_eq!(records[0]["eta"], date(2024, 2, 1));
        assert_eq!(records[0]["berth"], Value::Str("NORTH QUAY".to_owned()));
    }

    #[test]
    fn string_skips_missing_optional_column_to_next_bound() {
        let schema = TableSchema::new(
            vec![
                Column::new("vessel", ColumnType::Str),
                Column::new("qty", ColumnType::Float).optional(),
                Column::new("year", date_kind(&["%Y"])),
            ],
            &["HEADER"],
        );
        let table = ErosionTable::new(schema).unwrap();

        let records: Vec<_> = table
            .parse("HEADER\nGAS CHEM VENUS 12,5 2018\nGAS CHEM VENUS 2018\n")
            .unwrap()
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0]["vessel"],
            Value::Str("GAS CHEM VENUS".to_owned())
        );
        assert_eq!(records[0]["qty"], Value::Float(12.5));
        assert_eq!(records[0]["year"], date(2018, 1, 1));
        assert_eq!(records[1]["qty"], Value::Null);
        assert_eq!(records[1]["year"], date(2018, 1, 1));
    }

    #[test]
    fn gap_heuristic_splits_two_strings_on_separator_run() {
        let schema = TableSchema::new(
            vec![
                Column::new("vessel", ColumnType::Str),
                Column::new("agent", ColumnType::Str),
            ],
            &["HEADER"],
        );
        let table = ErosionTable::new(schema).unwrap();

        let records: Vec<_> = table
            .parse("HEADER\nSEA PRINCESS    GLOBAL SHIPPING CO\n")
            .unwrap()
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["vessel"], Value::Str("SEA PRINCESS".to_owned()));
        assert_eq!(
            records[0]["agent"],
            Value::Str("GLOBAL SHIPPING CO".to_owned())
        );
    }

    #[test]
    fn gap_heuristic_rejects_single_space_gaps() {
        let schema = TableSchema::new(
            vec![
                Column::new("a", ColumnType::Str),
                Column::new("b", ColumnType::Str),
            ],
            &["HEADER"],
        );
        let table = ErosionTable::new(schema).unwrap();

        // Every gap is a single space; no way to tell the columns apart.
        let records: Vec<_> = table.parse("HEADER\none two\n").unwrap().collect();
        assert!(records.is_empty());
    }

    #[test]
    fn discarded_columns_are_stripped_from_records() {
        let schema = TableSchema::new(
            vec![
                Column::new("id", ColumnType::Int),
                Column::discard(enum_kind(&["LOAD", "DISCH"])),
                Column::new("vessel", ColumnType::Str),
            ],
            &["HEADER"],
        );
        let table = ErosionTable::new(schema).unwrap();

        let records: Vec<_> = table.parse("HEADER\n7 LOAD AFRA STAR\n").unwrap().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0]["id"], Value::Int(7));
        assert_eq!(records[0]["vessel"], Value::Str("AFRA STAR".to_owned()));
    }

    #[test]
    fn alternating_strategy_consumes_both_ends() {
        let schema = TableSchema::new(
            vec![
                Column::new("id", ColumnType::Int),
                Column::new("vessel", ColumnType::Str),
                Column::new("year", date_kind(&["%Y"])),
            ],
            &["HEADER"],
        )
        .with_strategy(Strategy::Alternating);
        let table = ErosionTable::new(schema).unwrap();

        // id from the left, year from the right, the string takes what is
        // left in the middle.
        let records: Vec<_> = table
            .parse("HEADER\n12 BALTIC WIND 2019\n")
            .unwrap()
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], Value::Int(12));
        assert_eq!(records[0]["vessel"], Value::Str("BALTIC WIND".to_owned()));
        assert_eq!(records[0]["year"], date(2019, 1, 1));
    }

    #[test]
    fn float_decimal_separator_is_configurable() {
        let schema = TableSchema::new(
            vec![Column::new("draft", ColumnType::Float)],
            &["HEADER"],
        );
        let table = ErosionTable::new(schema).unwrap().with_decimal_separator('.');

        let records: Vec<_> = table.parse("HEADER\n11.40\n").unwrap().collect();
        assert_eq!(records[0]["draft"], Value::Float(11.4));
    }

    #[test]
    fn empty_lines_are_skipped_silently() {
        let schema = TableSchema::new(vec![Column::new("n", ColumnType::Int)], &["HEADER"]);
        let table = ErosionTable::new(schema).unwrap();

        let records: Vec<_> = table.parse("HEADER\n\n1\n   \n2\n").unwrap().collect();
        assert_eq!(records.len(), 2);
    }
}
