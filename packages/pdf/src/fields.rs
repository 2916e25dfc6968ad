//! Typed field matchers for the erosion parser.
//!
//! Each matcher tests the anchored side of an already-trimmed line for one
//! column type and returns the parsed value together with the exact text
//! that matched (so the caller can erode it). A `None` means the side does
//! not hold a value of that type; whether that is an error is decided by
//! the caller based on the column's optionality.
//!
//! The matchers are pure functions of the line text and side, which keeps
//! them testable in isolation from the erosion state machine.

use chrono::NaiveDateTime;
use chrono::format::{Parsed, StrftimeItems, parse};
use regex::Regex;

use crate::schema::Side;
use crate::text::pattern_on_side;

/// Compiles a side-anchored regex.
///
/// All dynamic fragments fed in here are escaped, so compilation only fails
/// on a programming error; that case is logged and treated as a non-match.
fn side_regex(pattern: &str, side: Side, discriminating: &str) -> Option<Regex> {
    let anchored = pattern_on_side(pattern, side, discriminating);
    match Regex::new(&anchored) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("generated pattern failed to compile: {anchored}: {e}");
            None
        }
    }
}

/// Matches an integer (`\d+`) on the given side of `line`.
///
/// The `[^0-9]` discriminator keeps the match from absorbing digits that
/// belong to an adjacent column.
#[must_use]
pub fn match_int(line: &str, side: Side) -> Option<(i64, String)> {
    let re = side_regex(r"\d+", side, "[^0-9]")?;
    let caps = re.captures(line)?;
    let matched = caps.get(1)?.as_str();
    let value = matched.parse().ok()?;
    Some((value, matched.to_owned()))
}

/// Matches a decimal number on the given side of `line`.
///
/// The decimal separator is configurable (`,` in most European port
/// documents); it is replaced with `.` before conversion.
#[must_use]
pub fn match_float(line: &str, side: Side, decimal_separator: char) -> Option<(f64, String)> {
    let sep = regex::escape(&decimal_separator.to_string());
    let re = side_regex(&format!(r"\d+{sep}\d+"), side, "[^0-9]")?;
    let caps = re.captures(line)?;
    let matched = caps.get(1)?.as_str();
    let value = matched
        .replace(decimal_separator, ".")
        .parse()
        .ok()?;
    Some((value, matched.to_owned()))
}

/// Matches one of a fixed set of literal values on the given side of `line`.
///
/// Values are tried longest first so that no literal is matched as a
/// spurious prefix or suffix of a longer one (`"SOME VALUE"` beats
/// `"VALUE"`). The matched literal doubles as the eroded text.
#[must_use]
pub fn match_enum(line: &str, side: Side, values: &[String]) -> Option<String> {
    let mut ordered: Vec<&String> = values.iter().collect();
    ordered.sort_by_key(|v| std::cmp::Reverse(v.chars().count()));

    for value in ordered {
        let re = side_regex(&regex::escape(value), side, " ")?;
        if re.is_match(line) {
            return Some(value.clone());
        }
    }
    None
}

/// Matches a single non-whitespace character on the given side of `line`,
/// returned as-is.
#[must_use]
pub fn match_char(line: &str, side: Side) -> Option<String> {
    let re = side_regex(r"\S", side, " ")?;
    let caps = re.captures(line)?;
    Some(caps.get(1)?.as_str().to_owned())
}

/// Matches a date on the given side of `line` against `strftime`-style
/// templates, tried in order.
///
/// Each template is first translated into a regex (see
/// [`date_template_regex`]); the first template whose regex matches decides
/// the extent of the value. The value is then parsed with that exact
/// template, falling back to [`parse_flexible`] when the exact parse fails.
#[must_use]
pub fn match_date(line: &str, side: Side, templates: &[String]) -> Option<(NaiveDateTime, String)> {
    log::debug!("looking for a date on a side of line: \"{line}\"");

    for template in templates {
        let re = side_regex(&date_template_regex(template), side, ".*")?;
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let matched = caps.get(1)?.as_str();
        let date = parse_exact(matched, template).or_else(|| parse_flexible(matched))?;
        return Some((date, matched.to_owned()));
    }
    None
}

/// Parses a date against one or more `strftime` templates, falling back to
/// free-form parsing when none applies exactly.
#[must_use]
pub fn parse_date(value: &str, templates: &[&str]) -> Option<NaiveDateTime> {
    for template in templates {
        if let Some(date) = parse_exact(value, template) {
            return Some(date);
        }
    }
    parse_flexible(value)
}

/// Translates a `strftime` template into a regex matching its rendered form.
///
/// `%d %H %M %m %y %S` become exactly two digits, `%Y` exactly four, and
/// `%I` an hour from 1 to 12 with an optional leading zero. Everything else
/// is matched literally.
#[must_use]
pub fn date_template_regex(template: &str) -> String {
    let mut out = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.next() {
                Some('d' | 'H' | 'M' | 'm' | 'y' | 'S') => out.push_str(r"\d{2}"),
                Some('Y') => out.push_str(r"\d{4}"),
                Some('I') => out.push_str("(?:1[0-2]|0?[1-9])"),
                Some(other) => {
                    // Unknown specifier: match it literally.
                    out.push('%');
                    out.push_str(&regex::escape(&other.to_string()));
                }
                None => out.push('%'),
            }
        } else {
            out.push_str(&regex::escape(&c.to_string()));
        }
    }

    out
}

/// Parses `value` with exactly the given `strftime` template.
///
/// Unlike [`NaiveDateTime::parse_from_str`], incomplete templates are
/// allowed: absent fields default (year to 1900, month and day to 1, time
/// to midnight), so `"2015"` with `"%Y"` yields 2015-01-01 00:00:00.
#[must_use]
pub fn parse_exact(value: &str, template: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, value, StrftimeItems::new(template)).ok()?;

    if parsed.year().is_none() {
        parsed.set_year(1900).ok()?;
    }
    if parsed.month().is_none() {
        parsed.set_month(1).ok()?;
    }
    if parsed.day().is_none() {
        parsed.set_day(1).ok()?;
    }
    if parsed.hour_div_12().is_none() {
        if parsed.hour_mod_12().is_some() {
            // A 12-hour clock value without an AM/PM marker reads as AM.
            parsed.set_ampm(false).ok()?;
        } else {
            parsed.set_hour(0).ok()?;
        }
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0).ok()?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0).ok()?;
    }

    let date = parsed.to_naive_date().ok()?;
    let time = parsed.to_naive_time().ok()?;
    Some(date.and_time(time))
}

/// Best-effort parsing of a date string with no known template.
///
/// Cascades through the formats seen across maritime PDF sources,
/// day-first variants before month-first, datetimes before bare dates.
#[must_use]
pub fn parse_flexible(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d-%m-%Y %H:%M",
        "%d.%m.%Y %H:%M",
        "%d %b %Y %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%d/%m/%Y",
        "%d-%m-%Y",
        "%d.%m.%Y",
        "%d/%m/%y",
        "%d %b %Y",
        "%d %B %Y",
        "%b %d, %Y",
        "%B %d, %Y",
    ];

    let value = value.trim();

    for format in DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(value, format) {
            return Some(date.and_time(chrono::NaiveTime::MIN));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike as _};

    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn int_matches_on_each_side() {
        assert_eq!(
            match_int("123 MV EXAMPLE", Side::Left),
            Some((123, "123".to_owned()))
        );
        assert_eq!(
            match_int("MV EXAMPLE 456", Side::Right),
            Some((456, "456".to_owned()))
        );
        assert_eq!(match_int("MV EXAMPLE", Side::Left), None);
    }

    #[test]
    fn int_discriminator_stops_at_adjacent_digits() {
        // Right-side match takes only the trailing digit run, not digits
        // separated by a letter.
        assert_eq!(
            match_int("BERTH9 12", Side::Right),
            Some((12, "12".to_owned()))
        );
    }

    #[test]
    fn float_uses_configured_decimal_separator() {
        assert_eq!(
            match_float("12,5 rest", Side::Left, ','),
            Some((12.5, "12,5".to_owned()))
        );
        assert_eq!(
            match_float("rest 7.25", Side::Right, '.'),
            Some((7.25, "7.25".to_owned()))
        );
        assert_eq!(match_float("12 rest", Side::Left, ','), None);
    }

    #[test]
    fn enum_prefers_longest_literal() {
        let values = vec!["VALUE".to_owned(), "SOME VALUE".to_owned()];
        assert_eq!(
            match_enum("cargo SOME VALUE", Side::Right, &values),
            Some("SOME VALUE".to_owned())
        );
        assert_eq!(
            match_enum("cargo VALUE", Side::Right, &values),
            Some("VALUE".to_owned())
        );
    }

    #[test]
    fn enum_requires_side_anchor() {
        let values = vec!["LOAD".to_owned()];
        assert_eq!(match_enum("LOAD 123", Side::Left, &values), Some("LOAD".to_owned()));
        assert_eq!(match_enum("123 LOAD x", Side::Left, &values), None);
    }

    #[test]
    fn char_returns_raw_character() {
        assert_eq!(match_char("* rest", Side::Left), Some("*".to_owned()));
        assert_eq!(match_char("rest E", Side::Right), Some("E".to_owned()));
    }

    #[test]
    fn template_regex_substitutions() {
        assert_eq!(date_template_regex("%d/%m/%Y"), r"\d{2}/\d{2}/\d{4}");
        assert_eq!(date_template_regex("%H:%M"), r"\d{2}:\d{2}");
        assert_eq!(date_template_regex("%I"), "(?:1[0-2]|0?[1-9])");
        // Literal text is escaped.
        assert_eq!(date_template_regex("%Y."), r"\d{4}\.");
    }

    #[test]
    fn date_matches_first_applicable_template() {
        let templates = vec!["%d/%m/%Y %H:%M".to_owned(), "%d/%m/%Y".to_owned()];
        let (date, matched) = match_date("MV X 01/02/2024 13:30", Side::Right, &templates).unwrap();
        assert_eq!(date, dt(2024, 2, 1, 13, 30));
        assert_eq!(matched, "01/02/2024 13:30");

        let (date, matched) = match_date("MV X 01/02/2024", Side::Right, &templates).unwrap();
        assert_eq!(date, dt(2024, 2, 1, 0, 0));
        assert_eq!(matched, "01/02/2024");
    }

    #[test]
    fn year_only_template_defaults_to_january_first() {
        let templates = vec!["%Y".to_owned()];
        let (date, matched) = match_date("free text A 2015", Side::Right, &templates).unwrap();
        assert_eq!(date, dt(2015, 1, 1, 0, 0));
        assert_eq!(matched, "2015");
    }

    #[test]
    fn parse_date_exact_then_fallback() {
        assert_eq!(
            parse_date("01-01-2015 00:00", &["%d-%m-%Y %H:%M"]),
            Some(dt(2015, 1, 1, 0, 0))
        );
        // No template applies; the free-form fallback picks it up.
        assert_eq!(
            parse_date("2015-06-07", &["%d-%m-%Y %H:%M"]),
            Some(dt(2015, 6, 7, 0, 0))
        );
        assert_eq!(parse_date("not a date", &["%Y"]), None);
    }

    #[test]
    fn twelve_hour_clock_without_marker_reads_as_am() {
        let parsed = parse_exact("11", "%I").unwrap();
        assert_eq!(parsed.hour(), 11);
        let parsed = parse_exact("12/05/2024 3", "%d/%m/%Y %I").unwrap();
        assert_eq!(parsed.hour(), 3);
    }

    #[test]
    fn flexible_parses_common_formats() {
        assert_eq!(parse_flexible("2024-03-05 10:20:30"), Some(dt(2024, 3, 5, 10, 20).with_second(30).unwrap()));
        assert_eq!(parse_flexible("05/03/2024"), Some(dt(2024, 3, 5, 0, 0)));
        assert_eq!(parse_flexible("05 Mar 2024"), Some(dt(2024, 3, 5, 0, 0)));
        assert_eq!(parse_flexible("gibberish"), None);
    }
}
