//! Colored terminal rendering for timetable-core types.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use timetable_core::{ChangeKind, ChangeRecord, Event, EventStatus, SyncOutcome};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ChangeKind {
    fn render(&self) -> String {
        let symbol = self.symbol();
        match self {
            ChangeKind::Created => symbol.green().to_string(),
            ChangeKind::Modified => symbol.yellow().to_string(),
            ChangeKind::Cancelled => symbol.red().to_string(),
        }
    }
}

fn colorize_change(kind: ChangeKind, text: &str) -> String {
    match kind {
        ChangeKind::Created => text.green().to_string(),
        ChangeKind::Modified => text.yellow().to_string(),
        ChangeKind::Cancelled => text.red().to_string(),
    }
}

impl Render for ChangeRecord {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.kind.render(),
            colorize_change(self.kind, &self.title),
            self.details.dimmed()
        )
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let time = format!(
            "{}–{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        );
        let title = match self.status {
            EventStatus::Normal => self.title.clone(),
            EventStatus::Modified => self.title.yellow().to_string(),
            EventStatus::Cancelled => self.title.red().strikethrough().to_string(),
        };

        let mut line = format!("{} {} {}", time.dimmed(), title, format!("[{}]", self.kind).cyan());
        if !self.location.is_empty() {
            line.push_str(&format!(" {}", self.location.dimmed()));
        }
        if !self.teacher.is_empty() {
            line.push_str(&format!(" {}", self.teacher.dimmed()));
        }
        line
    }
}

impl Render for NaiveDate {
    fn render(&self) -> String {
        self.format("%A %d %B").to_string().bold().to_string()
    }
}

/// Threshold for compact view (show counts instead of individual changes)
const COMPACT_THRESHOLD: usize = 10;

impl Render for SyncOutcome {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        if let Some(error) = &self.error {
            lines.push(format!("   {}", error.red()));
        }

        if self.changes.is_empty() {
            if self.success {
                lines.push("   No changes".dimmed().to_string());
            }
        } else if self.changes.len() <= COMPACT_THRESHOLD {
            for change in &self.changes {
                lines.push(format!("   {}", change.render()));
            }
        } else {
            let count = |kind: ChangeKind| self.changes.iter().filter(|c| c.kind == kind).count();
            for (kind, label) in [
                (ChangeKind::Created, "new"),
                (ChangeKind::Modified, "changed"),
                (ChangeKind::Cancelled, "cancelled"),
            ] {
                let n = count(kind);
                if n > 0 {
                    let text = format!("({} {} {})", n, label, pluralize("event", n));
                    lines.push(format!("   {} {}", kind.render(), colorize_change(kind, &text)));
                }
            }
        }

        lines.join("\n")
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 { word.to_string() } else { format!("{word}s") }
}
