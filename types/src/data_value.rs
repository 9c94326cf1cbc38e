use crate::date_time::DateTime;
use crate::status_code::StatusCode;
use crate::variant::Variant;

/// A value observed for a monitored item, together with the quality and
/// source timestamp the sampler attached to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataValue {
    pub value: Variant,
    pub status: StatusCode,
    pub source_timestamp: DateTime,
}

impl DataValue {
    /// A good-quality value observed now.
    pub fn new<V>(value: V) -> DataValue
    where
        V: Into<Variant>,
    {
        DataValue {
            value: value.into(),
            status: StatusCode::Good,
            source_timestamp: DateTime::now(),
        }
    }

    pub fn new_at<V>(value: V, source_timestamp: DateTime) -> DataValue
    where
        V: Into<Variant>,
    {
        DataValue {
            value: value.into(),
            status: StatusCode::Good,
            source_timestamp,
        }
    }
}
