use chrono::{TimeZone, Utc};

/// UTC timestamps as handled internally by the server.
pub type DateTimeUtc = chrono::DateTime<Utc>;

/// A UTC timestamp as carried inside messages.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize)]
pub struct DateTime(DateTimeUtc);

impl DateTime {
    pub fn now() -> DateTime {
        DateTime(Utc::now())
    }

    /// The protocol's null instant (the epoch). Response shells carry this
    /// until the publish path stamps them.
    pub fn null() -> DateTime {
        DateTime(Utc.timestamp(0, 0))
    }

    pub fn is_null(&self) -> bool {
        self.0.timestamp() == 0 && self.0.timestamp_subsec_nanos() == 0
    }

    pub fn as_chrono(&self) -> &DateTimeUtc {
        &self.0
    }
}

impl Default for DateTime {
    fn default() -> DateTime {
        DateTime::null()
    }
}

impl From<DateTimeUtc> for DateTime {
    fn from(value: DateTimeUtc) -> DateTime {
        DateTime(value)
    }
}

impl From<DateTime> for DateTimeUtc {
    fn from(value: DateTime) -> DateTimeUtc {
        value.0
    }
}
