//! OBD-II Channel Definitions
//!
//! Canonical sensor channels recognized by the analyzer, the Torque CSV
//! header variants that map onto them, and their physical plausibility data.

mod alias;
mod channel;

pub use alias::{ChannelMap, HeaderMapping, MappedColumn};
pub use channel::{is_error_sentinel, Channel, DEVICE_ERROR_FLOOR};
