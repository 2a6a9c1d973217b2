//! Feed parsing: raw calendar text to typed events.

use std::collections::HashMap;

use tracing::debug;

use crate::event::{Event, EventKind, EventStatus};
use crate::ics::extract::{
    extract_group, extract_teacher, parse_timestamp, unescape_text, unfold,
};

const ENTRY_BEGIN: &str = "BEGIN:VEVENT";
const ENTRY_END: &str = "END:VEVENT";

/// Events parsed from a feed, with the number of entries that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub events: Vec<Event>,
    pub skipped: usize,
}

/// Parse feed text into events sorted by start time.
///
/// Never fails: entries missing a required field are skipped, and text that
/// contains no entries at all yields an empty list.
pub fn parse_feed(raw: &str) -> Vec<Event> {
    parse_feed_report(raw).events
}

/// Parse feed text, also counting the entries that had to be skipped.
pub fn parse_feed_report(raw: &str) -> ParsedFeed {
    let unfolded = unfold(raw);

    let mut events: Vec<Event> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0;

    for (index, block) in entry_blocks(&unfolded).enumerate() {
        let Some(event) = parse_entry(block) else {
            debug!(entry = index, "skipping feed entry with missing or invalid required fields");
            skipped += 1;
            continue;
        };

        // Duplicate ids: the last occurrence replaces the earlier one in place
        match positions.get(&event.id) {
            Some(&position) => {
                debug!(id = %event.id, "duplicate entry id, keeping last occurrence");
                events[position] = event;
            }
            None => {
                positions.insert(event.id.clone(), events.len());
                events.push(event);
            }
        }
    }

    events.sort_by_key(|e| e.start_time);

    ParsedFeed { events, skipped }
}

/// Split unfolded feed text into entry blocks. The text before the first
/// entry marker is the calendar header and is dropped.
fn entry_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split(ENTRY_BEGIN).skip(1).map(|fragment| match fragment.find(ENTRY_END) {
        Some(end) => &fragment[..end],
        None => fragment,
    })
}

/// Build an event from one entry block, or `None` if a required field is missing.
fn parse_entry(block: &str) -> Option<Event> {
    let id = find_property(block, "UID")?.trim().to_string();
    if id.is_empty() {
        return None;
    }

    let title = unescape_text(find_property(block, "SUMMARY")?).trim().to_string();
    let start_time = parse_timestamp(find_property(block, "DTSTART")?)?;
    let end_time = parse_timestamp(find_property(block, "DTEND")?)?;

    let location = find_property(block, "LOCATION")
        .map(|v| unescape_text(v).trim().to_string())
        .unwrap_or_default();
    let description = find_property(block, "DESCRIPTION")
        .map(|v| unescape_text(v).trim().to_string())
        .unwrap_or_default();
    let last_modified = find_property(block, "LAST-MODIFIED").and_then(parse_timestamp);

    Some(Event {
        teacher: extract_teacher(&description),
        group: extract_group(&description),
        kind: EventKind::from_title(&title),
        status: EventStatus::Normal,
        id,
        title,
        start_time,
        end_time,
        location,
        description,
        last_modified,
    })
}

/// Value of the first top-level property called `name` in the block.
///
/// Property parameters (`DTSTART;TZID=...`) are ignored when matching, and
/// properties of nested components (e.g. `VALARM`) are not visible.
fn find_property<'a>(block: &'a str, name: &str) -> Option<&'a str> {
    let mut depth = 0usize;

    for line in block.lines() {
        let Some((head, value)) = line.split_once(':') else {
            continue;
        };
        let prop_name = head.split(';').next().unwrap_or(head).trim();

        if prop_name.eq_ignore_ascii_case("BEGIN") {
            depth += 1;
            continue;
        }
        if prop_name.eq_ignore_ascii_case("END") {
            depth = depth.saturating_sub(1);
            continue;
        }

        if depth == 0 && prop_name.eq_ignore_ascii_case(name) {
            return Some(value);
        }
    }

    None
}
