//! Timetable event types.
//!
//! Events are produced by the feed parser and annotated by the diff. They
//! are stored as JSON in the snapshot, so every field round-trips through serde.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single scheduled activity (class, exam, break) taken from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// UID assigned by the feed producer. The only key used to match events across syncs.
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// Derived from the description, empty when no line looks like a name.
    #[serde(default)]
    pub teacher: String,
    /// Derived from the description, empty when no group code is present.
    #[serde(default)]
    pub group: String,
    pub kind: EventKind,
    #[serde(default)]
    pub status: EventStatus,
    /// Upstream LAST-MODIFIED, unset when the feed entry carries none.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Event {
    /// Formatted start/end range, e.g. `2026-01-21 12:30–16:00 UTC`.
    pub fn render_time_range(&self) -> String {
        if self.start_time.date_naive() == self.end_time.date_naive() {
            format!(
                "{}–{} UTC",
                self.start_time.format("%Y-%m-%d %H:%M"),
                self.end_time.format("%H:%M")
            )
        } else {
            format!(
                "{} – {} UTC",
                self.start_time.format("%Y-%m-%d %H:%M"),
                self.end_time.format("%Y-%m-%d %H:%M")
            )
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Activity type, classified from the event title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Lecture,
    Tutorial,
    Lab,
    Project,
    Exam,
    Break,
    Other,
}

impl EventKind {
    /// Classify a title. The first matching rule wins, in the order
    /// break, exam, project, lab, tutorial, lecture.
    pub fn from_title(title: &str) -> Self {
        let upper = title.to_uppercase();

        if upper.contains("VACANCES") {
            EventKind::Break
        } else if upper.contains("EXAM") {
            EventKind::Exam
        } else if upper.contains("SAE") {
            EventKind::Project
        } else if has_course_code(&upper, "TP") {
            EventKind::Lab
        } else if has_course_code(&upper, "TD") {
            EventKind::Tutorial
        } else if has_course_code(&upper, "CM") {
            EventKind::Lecture
        } else {
            EventKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Lecture => "lecture",
            EventKind::Tutorial => "tutorial",
            EventKind::Lab => "lab",
            EventKind::Project => "project",
            EventKind::Exam => "exam",
            EventKind::Break => "break",
            EventKind::Other => "other",
        }
    }
}

/// Two-letter course codes count when they open the title or are followed by a space.
fn has_course_code(upper_title: &str, code: &str) -> bool {
    upper_title.starts_with(code) || upper_title.contains(&format!("{code} "))
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sync status of an event, set by the diff and never by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Normal,
    Modified,
    Cancelled,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Normal => write!(f, "normal"),
            EventStatus::Modified => write!(f, "modified"),
            EventStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_priority_order() {
        assert_eq!(EventKind::from_title("Vacances de Noël"), EventKind::Break);
        assert_eq!(EventKind::from_title("Examen SAE 1.05"), EventKind::Exam);
        assert_eq!(EventKind::from_title("SAE 1.05 Traiter des données"), EventKind::Project);
        assert_eq!(EventKind::from_title("TP Réseaux"), EventKind::Lab);
        assert_eq!(EventKind::from_title("R1.04 TD Systèmes"), EventKind::Tutorial);
        assert_eq!(EventKind::from_title("CM Physique"), EventKind::Lecture);
        assert_eq!(
            EventKind::from_title("R1.12 PPP Connaître son champ d'activité"),
            EventKind::Other
        );
    }

    #[test]
    fn test_course_code_inside_a_word_is_ignored() {
        assert_eq!(EventKind::from_title("R2.03 STPX"), EventKind::Other);
        assert_eq!(EventKind::from_title("R2.03 Anglais TP"), EventKind::Other);
        assert_eq!(EventKind::from_title("R2.03 TP Anglais"), EventKind::Lab);
    }
}
