use chrono::Duration;

/// Feed used when no URL is configured.
pub const DEFAULT_FEED_URL: &str = "https://www.emploisdutemps.uha.fr/jsp/custom/modules/plannings/anonymous_cal.jsp?data=60dc6b2fb1eac2554ee1103516dc50b4e04e91d0526fa823618ff6fa9e7d7198dd65eb4f5911f810ef6a36d3b58d61bf314d669fae9ca422200cb711a9b76537,1";

/// How long a change record keeps its event flagged, in minutes.
pub const CHANGE_EXPIRY_MINUTES: i64 = 60;

pub fn change_expiry() -> Duration {
    Duration::minutes(CHANGE_EXPIRY_MINUTES)
}

/// Storage key of the serialized event snapshot.
pub const EVENTS_KEY: &str = "events.json";

/// Storage key of the last successful sync time (RFC 3339 text).
pub const LAST_SYNC_KEY: &str = "last_sync";

/// Storage key of the serialized change ledger.
pub const CHANGES_KEY: &str = "changes.json";
