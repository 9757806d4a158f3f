//! Human-readable file sizes

use byte_unit::Byte;

/// Format a byte count using decimal units with one fractional digit
pub fn format_size(bytes: u64) -> String {
    Byte::from_bytes(bytes as u128)
        .get_appropriate_unit(false)
        .format(1)
}
