use blake3::Hasher;

use crate::event::Event;

/// Order-independent content hash of an event list.
///
/// Events are hashed sorted by id, so two feeds listing the same entries in a
/// different order share a fingerprint. Sync status is not part of the content.
pub fn fingerprint(events: &[Event]) -> String {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut hasher = Hasher::new();
    for event in sorted {
        let start = event.start_time.to_rfc3339();
        let end = event.end_time.to_rfc3339();
        let last_modified = event.last_modified.map(|t| t.to_rfc3339()).unwrap_or_default();

        for field in [
            event.id.as_str(),
            event.title.as_str(),
            start.as_str(),
            end.as_str(),
            event.location.as_str(),
            event.description.as_str(),
            last_modified.as_str(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update(&[0x1f]);
        }
        hasher.update(&[0x1e]);
    }

    hasher.finalize().to_hex().to_string()
}
