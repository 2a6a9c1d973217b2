//! Field extraction rules for feed entries.
//!
//! Each rule is a separate function so the heuristics (teacher name, group
//! code) can be tested on their own.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

/// Group codes look like `RT1`, `RT11`, `RT112`.
static GROUP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RT\d+").expect("group code pattern is valid"));

static GROUP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^RT\d+").expect("group line pattern is valid"));

/// Marker of the export footer the feed producer appends to descriptions.
const EXPORT_MARKER: &str = "Exporté";

const COMPACT_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Normalize line endings and join folded lines.
///
/// A line break followed by a single space or tab continues the previous
/// line; the break and that one whitespace character are removed.
pub fn unfold(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("\n ", "")
        .replace("\n\t", "")
}

/// Undo text escaping: `\n` / `\N` become newlines, `\,` `\;` `\\` lose the backslash.
/// Unknown escapes are kept verbatim.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Parse a compact UTC timestamp (`20260121T123000Z`).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), COMPACT_UTC_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

/// Best-effort teacher name from an entry description.
///
/// Descriptions look like `RT112\nDROUHIN Frederic\n(Exporté le:03/01/2026 15:11)`.
/// Group lines, the export footer and very short lines are skipped; the first
/// remaining line mixing upper and lower case letters is taken as the name.
pub fn extract_teacher(description: &str) -> String {
    description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !GROUP_LINE.is_match(line))
        .filter(|line| !line.contains(EXPORT_MARKER))
        .filter(|line| line.chars().count() > 3)
        .find(|line| line.chars().any(char::is_uppercase) && line.chars().any(char::is_lowercase))
        .map(str::to_string)
        .unwrap_or_default()
}

/// First group code found in the description, or an empty string.
pub fn extract_group(description: &str) -> String {
    GROUP_CODE
        .find(description)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unfold_joins_continuation_lines() {
        assert_eq!(unfold("SUMMARY:Hello \r\n world\r\nUID:1"), "SUMMARY:Hello world\nUID:1");
        assert_eq!(unfold("DESCRIPTION:ab\n\tcd"), "DESCRIPTION:abcd");
        // Only the first whitespace character belongs to the fold
        assert_eq!(unfold("LOCATION:GRI\n  F 012"), "LOCATION:GRI F 012");
    }

    #[test]
    fn test_unescape_text() {
        assert_eq!(unescape_text(r"GRI_F_012\, GRI_F_013"), "GRI_F_012, GRI_F_013");
        assert_eq!(unescape_text(r"\n\nRT112\nDROUHIN"), "\n\nRT112\nDROUHIN");
        assert_eq!(unescape_text(r"a\;b\\c\Nd"), "a;b\\c\nd");
        assert_eq!(unescape_text(r"keep \x and trailing \"), r"keep \x and trailing \");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("20260121T123000Z"),
            Some(Utc.with_ymd_and_hms(2026, 1, 21, 12, 30, 0).unwrap())
        );
        assert_eq!(parse_timestamp("20260121T123000"), None);
        assert_eq!(parse_timestamp("20260121"), None);
        assert_eq!(parse_timestamp("garbage"), None);
    }

    #[test]
    fn test_extract_teacher() {
        let description = "\n\nRT112\nDROUHIN Frederic\n(Exporté le:03/01/2026 15:11)\n";
        assert_eq!(extract_teacher(description), "DROUHIN Frederic");
    }

    #[test]
    fn test_extract_teacher_absent() {
        assert_eq!(extract_teacher("\n\nRT11\n(Exporté le:03/01/2026 15:11)\n"), "");
        assert_eq!(extract_teacher("RT112"), "");
        assert_eq!(extract_teacher(""), "");
        // All caps lines are not names
        assert_eq!(extract_teacher("AMPHI B\nRT1"), "");
    }

    #[test]
    fn test_extract_teacher_skips_short_lines() {
        assert_eq!(extract_teacher("Ab\nMARTIN Claire"), "MARTIN Claire");
    }

    #[test]
    fn test_extract_group_first_match_wins() {
        assert_eq!(extract_group("\n\nRT112\nDROUHIN Frederic"), "RT112");
        assert_eq!(extract_group("RT11 RT12"), "RT11");
        assert_eq!(extract_group("no group here"), "");
    }
}
