//! Calendar feed parsing and ICS export.
//!
//! Parsing is deliberately line-oriented rather than a full RFC 5545 reader:
//! one malformed entry must never cost the rest of the feed.

mod extract;
mod generate;
mod parse;

pub use extract::{extract_group, extract_teacher, parse_timestamp, unescape_text, unfold};
pub use generate::generate_ics;
pub use parse::{ParsedFeed, parse_feed, parse_feed_report};
