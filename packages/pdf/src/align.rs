//! Column-position table extraction from PDF text.
//!
//! Recovers a table from text whose columns are vertically aligned by
//! character position, as produced by most PDF-to-text converters for
//! fixed-layout tables. No type information is needed: each word of a body
//! line is assigned to the header column whose horizontal offset is nearest.
//!
//! For tables whose columns overlap or reflow, see [`crate::erosion`].

use std::collections::BTreeMap;

/// Maximum distance (in characters) at which a word can still be assigned
/// to a column. Words farther than this from every column are dropped.
const MAX_ASSIGN_DISTANCE: usize = 1000;

/// A table recovered from position-aligned text.
///
/// The header line defines the column names and their character offsets;
/// every following line (up to an optional end line) is a body row.
#[derive(Debug, Clone)]
pub struct AlignedTable {
    /// Column names taken from the header line, deduplicated.
    columns: Vec<String>,
    /// Starting character offset of each header word.
    column_offsets: Vec<usize>,
    /// Body lines between the header and the table end.
    body: Vec<String>,
}

/// Splits a line into words with their starting character offsets.
///
/// Offsets are character positions, not byte positions, so they line up
/// with what a monospace PDF rendering shows.
#[must_use]
pub fn indexed_words(line: &str) -> Vec<(String, usize)> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut start = 0;

    // Trailing space closes out the final word.
    for (i, c) in line.chars().chain(std::iter::once(' ')).enumerate() {
        if c.is_whitespace() {
            if !current.is_empty() {
                words.push((std::mem::take(&mut current), start));
            }
        } else {
            if current.is_empty() {
                start = i;
            }
            current.push(c);
        }
    }

    words
}

impl AlignedTable {
    /// Creates a table whose header is the first line, parsing to the end of
    /// the content.
    #[must_use]
    pub fn new(content: &str) -> Self {
        Self::with_bounds(content, 0, None)
    }

    /// Creates a table whose header is the first line containing `marker`.
    ///
    /// Returns `None` if no line contains the marker.
    #[must_use]
    pub fn with_header_marker(content: &str, marker: &str) -> Option<Self> {
        let header_line = content.lines().position(|line| line.contains(marker))?;
        Some(Self::with_bounds(content, header_line, None))
    }

    /// Creates a table with explicit header and (exclusive) end line indices.
    #[must_use]
    pub fn with_bounds(content: &str, header_line: usize, end_line: Option<usize>) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let header = lines.get(header_line).copied().unwrap_or_default();

        let mut columns = Vec::new();
        let mut column_offsets = Vec::new();
        for (word, offset) in indexed_words(header) {
            columns.push(word);
            column_offsets.push(offset);
        }

        // Rename duplicate column names: second occurrence of `name`
        // becomes `name_1`, third `name_2`, and so on.
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for name in &mut columns {
            let count = counts.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                *name = format!("{name}_{}", *count - 1);
            }
        }

        let body_end = end_line.unwrap_or(lines.len()).min(lines.len());
        let body = lines
            .get(header_line + 1..body_end)
            .unwrap_or_default()
            .iter()
            .map(|line| (*line).to_owned())
            .collect();

        Self {
            columns,
            column_offsets,
            body,
        }
    }

    /// The deduplicated column names, in header order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Parses the body with smart distance enabled and lowercased keys.
    ///
    /// See [`Self::parse_with`].
    pub fn parse(&self) -> impl Iterator<Item = BTreeMap<String, String>> + '_ {
        self.parse_with(true, true)
    }

    /// Parses the body lines into records.
    ///
    /// Each word is assigned to the column with the nearest header offset by
    /// absolute character distance. With `smart_distance` enabled, a word is
    /// only eligible for a column if its span reaches at least as far right
    /// as that column's offset; this resolves ties in favour of the column
    /// to the left when a value is wider than its header. Words that match
    /// no column (or sit `MAX_ASSIGN_DISTANCE` characters or more from all
    /// of them) are dropped, words sharing a column are joined with a
    /// single space, and lines assigning no words yield no record.
    ///
    /// Malformed lines contribute nothing; no error escapes.
    pub fn parse_with(
        &self,
        smart_distance: bool,
        lowercase: bool,
    ) -> impl Iterator<Item = BTreeMap<String, String>> + '_ {
        self.body.iter().filter_map(move |line| {
            let mut assigned: BTreeMap<usize, Vec<String>> = BTreeMap::new();

            for (word, index) in indexed_words(line) {
                let word_end = index + word.chars().count();
                let mut min_distance = MAX_ASSIGN_DISTANCE;
                let mut nearest = None;

                for (i, &offset) in self.column_offsets.iter().enumerate() {
                    let distance = offset.abs_diff(index);
                    if distance < min_distance && (!smart_distance || word_end >= offset) {
                        min_distance = distance;
                        nearest = Some(i);
                    }
                }

                if let Some(i) = nearest {
                    assigned.entry(i).or_default().push(word);
                }
            }

            if assigned.is_empty() {
                return None;
            }

            let record = assigned
                .into_iter()
                .map(|(i, words)| {
                    let key = if lowercase {
                        self.columns[i].to_lowercase()
                    } else {
                        self.columns[i].clone()
                    };
                    (key, words.join(" "))
                })
                .collect();
            Some(record)
        })
    }
}
