//! ICS export of a cached snapshot.

use icalendar::{Calendar, Component, EventLike};

use crate::event::Event;

const COMPACT_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Generate a calendar document containing every event of the snapshot.
pub fn generate_ics(events: &[Event]) -> String {
    let mut cal = Calendar::new();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.id);
        ics_event.summary(&event.title);

        ics_event.add_property("DTSTART", event.start_time.format(COMPACT_UTC_FORMAT).to_string());
        ics_event.add_property("DTEND", event.end_time.format(COMPACT_UTC_FORMAT).to_string());
        if let Some(last_modified) = event.last_modified {
            ics_event.add_property(
                "LAST-MODIFIED",
                last_modified.format(COMPACT_UTC_FORMAT).to_string(),
            );
        }

        if !event.location.is_empty() {
            ics_event.location(&event.location);
        }

        if !event.description.is_empty() {
            ics_event.description(&event.description);
        }

        ics_event.add_property("CATEGORIES", event.kind.label());

        cal.push(ics_event.done());
    }

    strip_ics_bloat(&cal.done().to_string())
}

/// Replace the library PRODID and drop the default CALSCALE line.
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:-//timetable//EN\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, EventStatus};
    use crate::ics::parse_feed;
    use chrono::{TimeZone, Utc};

    fn course(id: &str, title: &str, day: u32) -> Event {
        Event {
            id: id.to_string(),
            title: title.to_string(),
            start_time: Utc.with_ymd_and_hms(2026, 2, day, 8, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2026, 2, day, 10, 0, 0).unwrap(),
            location: "GRI_F_012".to_string(),
            description: "DROUHIN Frederic".to_string(),
            teacher: "DROUHIN Frederic".to_string(),
            group: "RT112".to_string(),
            kind: EventKind::from_title(title),
            status: EventStatus::Modified,
            last_modified: Some(Utc.with_ymd_and_hms(2026, 1, 3, 14, 11, 29).unwrap()),
        }
    }

    #[test]
    fn test_exported_snapshot_parses_back() {
        let events = vec![course("a", "TP Réseaux", 2), course("b", "CM Physique", 3)];

        let ics = generate_ics(&events);
        assert!(ics.contains("PRODID:-//timetable//EN"));
        assert!(!ics.contains("CALSCALE"));

        let parsed = parse_feed(&ics);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "a");
        assert_eq!(parsed[0].title, "TP Réseaux");
        assert_eq!(parsed[0].location, "GRI_F_012");
        assert_eq!(parsed[0].start_time, events[0].start_time);
        assert_eq!(parsed[0].last_modified, events[0].last_modified);
        assert_eq!(parsed[1].teacher, "DROUHIN Frederic");
        // Status is sync state, not feed data
        assert_eq!(parsed[1].status, EventStatus::Normal);
    }

    #[test]
    fn test_multiline_description_survives_export() {
        let mut event = course("a", "TD Anglais", 4);
        event.description = "RT112\nDROUHIN Frederic\n(Exporté le:03/01/2026 15:11)".to_string();
        event.last_modified = None;

        let parsed = parse_feed(&generate_ics(&[event.clone()]));

        assert_eq!(parsed[0].description, event.description);
        assert_eq!(parsed[0].teacher, "DROUHIN Frederic");
        assert_eq!(parsed[0].group, "RT112");
        assert_eq!(parsed[0].last_modified, None);
    }
}
