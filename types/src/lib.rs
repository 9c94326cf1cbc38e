//! The types crate holds the data and service types shared by the client and
//! server halves of telemon. Everything here is encoding-agnostic plain data;
//! turning these into wire messages is the transport codec's problem.

#[macro_use]
extern crate serde_derive;

pub mod data_value;
pub mod date_time;
pub mod diagnostic_info;
pub mod service_types;
pub mod status_code;
pub mod variant;

pub use crate::data_value::DataValue;
pub use crate::date_time::{DateTime, DateTimeUtc};
pub use crate::diagnostic_info::DiagnosticInfo;
pub use crate::status_code::StatusCode;
pub use crate::variant::Variant;

/// Intervals negotiated with clients are expressed in fractional milliseconds.
pub type Duration = f64;

#[cfg(test)]
mod tests;
