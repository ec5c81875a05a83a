//! CSV Log Parser

use csv::ReaderBuilder;
use obd_channels::ChannelMap;
use tracing::{debug, warn};

use crate::error::{ParseError, ParseWarning, MIN_COLUMNS};
use crate::record::{ParsedLog, RawRecord};

/// UTF-8 byte order mark some exports prepend
const BOM: &[u8] = b"\xef\xbb\xbf";

/// Parser for Torque CSV log uploads
pub struct LogParser {
    channels: ChannelMap,
}

impl LogParser {
    /// Create a parser with the built-in channel alias table
    pub fn new() -> Self {
        Self {
            channels: ChannelMap::default(),
        }
    }

    /// Parse raw upload bytes into records.
    ///
    /// The extension check belongs to the caller; the content itself is
    /// re-validated structurally here.
    pub fn parse(&self, bytes: &[u8]) -> Result<ParsedLog, ParseError> {
        let text = ensure_text(bytes)?;

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(text.as_bytes());

        let mut rows = reader.records();

        let header_row = match rows.next() {
            Some(row) => row?,
            None => return Err(ParseError::MissingHeader),
        };

        let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
        validate_header(&headers)?;

        let mapping = self.channels.map_headers(&headers);
        debug!(
            total_columns = headers.len(),
            recognized = mapping.mapped.len(),
            unmapped = mapping.unmapped.len(),
            "header mapping complete"
        );

        let expected = headers.len();
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        for row in rows {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let found = row.len();

            if found != expected {
                warn!(line, expected, found, "row column count mismatch");
                warnings.push(ParseWarning::ColumnCountMismatch {
                    line,
                    expected,
                    found,
                });
            }

            // Pad short rows with missing markers, drop excess trailing cells
            let mut values: Vec<Option<String>> =
                row.iter().take(expected).map(|cell| Some(cell.to_string())).collect();
            values.resize(expected, None);

            records.push(RawRecord { line, values });
        }

        if records.is_empty() {
            return Err(ParseError::NoDataRows);
        }

        Ok(ParsedLog {
            headers,
            mapping,
            records,
            warnings,
        })
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject byte streams that cannot be CSV text
fn ensure_text(bytes: &[u8]) -> Result<&str, ParseError> {
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);

    if bytes.contains(&0) {
        return Err(ParseError::BinaryContent("NUL byte in stream"));
    }

    std::str::from_utf8(bytes).map_err(|_| ParseError::BinaryContent("invalid UTF-8"))
}

/// A header row must be wide enough and must actually name columns
fn validate_header(headers: &[String]) -> Result<(), ParseError> {
    if headers.len() < MIN_COLUMNS {
        return Err(ParseError::NotDelimited(headers.len()));
    }

    let has_names = headers
        .iter()
        .any(|cell| cell.chars().any(|c| c.is_alphabetic()));
    if !has_names {
        return Err(ParseError::MissingHeader);
    }

    Ok(())
}
