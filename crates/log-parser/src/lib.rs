//! OBD2 Log Parsing
//!
//! Decodes raw CSV bytes from a Torque log into a validated header mapping
//! and an ordered sequence of raw records. Malformed rows are padded and
//! recorded as warnings; only a structurally unusable stream is fatal.

mod error;
mod parser;
mod record;

pub use error::{ParseError, ParseWarning};
pub use parser::LogParser;
pub use record::{ParsedLog, RawRecord};
