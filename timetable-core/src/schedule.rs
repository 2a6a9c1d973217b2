//! Read-side queries over a snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::event::Event;

/// Events grouped by the UTC day they start on, days in ascending order.
pub fn group_by_day(events: &[Event]) -> BTreeMap<NaiveDate, Vec<&Event>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Event>> = BTreeMap::new();
    for event in events {
        days.entry(event.start_time.date_naive()).or_default().push(event);
    }
    days
}

/// Events starting within `[from, to]`, both ends included.
pub fn filter_by_range(events: &[Event], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| e.start_time >= from && e.start_time <= to)
        .collect()
}

/// Monday 00:00 and the last instant of Sunday for the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    let start = monday.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start + Duration::days(7) - Duration::milliseconds(1);
    (start, end)
}

/// Events of the Monday to Sunday week containing `day`.
pub fn week_of(events: &[Event], day: NaiveDate) -> Vec<&Event> {
    let (from, to) = week_bounds(day);
    filter_by_range(events, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, EventStatus};
    use chrono::TimeZone;

    fn at(id: &str, day: u32, hour: u32) -> Event {
        let start = Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap();
        Event {
            id: id.to_string(),
            title: format!("TD {id}"),
            start_time: start,
            end_time: start + Duration::hours(1),
            location: String::new(),
            description: String::new(),
            teacher: String::new(),
            group: String::new(),
            kind: EventKind::Tutorial,
            status: EventStatus::Normal,
            last_modified: Some(start),
        }
    }

    fn ids(events: Vec<&Event>) -> Vec<&str> {
        events.into_iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_group_by_day() {
        let events = vec![at("a", 19, 8), at("b", 19, 14), at("c", 21, 8)];
        let days = group_by_day(&events);

        let keys: Vec<_> = days.keys().map(|d| d.day()).collect();
        assert_eq!(keys, vec![19, 21]);
        assert_eq!(days[&NaiveDate::from_ymd_opt(2026, 1, 19).unwrap()].len(), 2);
    }

    #[test]
    fn test_range_is_inclusive() {
        let events = vec![at("a", 19, 8), at("b", 20, 8), at("c", 21, 8)];
        let from = Utc.with_ymd_and_hms(2026, 1, 19, 8, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap();

        assert_eq!(ids(filter_by_range(&events, from, to)), vec!["a", "b"]);
    }

    #[test]
    fn test_week_runs_monday_to_sunday() {
        // 2026-01-19 is a Monday
        let events = vec![
            at("sunday-before", 18, 23),
            at("monday", 19, 0),
            at("sunday", 25, 23),
            at("next-monday", 26, 0),
        ];

        let wednesday = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
        assert_eq!(ids(week_of(&events, wednesday)), vec!["monday", "sunday"]);

        let sunday = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
        assert_eq!(week_bounds(sunday).0.day(), 19);
    }
}
