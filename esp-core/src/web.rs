//! Validierung des `rgb`-Parameters der HTTP-Schnittstelle
//!
//! Format: drei durch Kommas getrennte Ganzzahlen `R,G,B` im Bereich 0..=255.
//! Leerzeichen um die Zahlen werden toleriert.

use crate::status::{Reason, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    #[error("expected exactly three comma-separated values")]
    FieldCount,
    #[error("value is not an integer")]
    NotANumber,
    #[error("value outside 0..=255")]
    OutOfRange,
}

impl From<FormatError> for Status {
    fn from(_: FormatError) -> Self {
        Status::error(Reason::InvalidFormat)
    }
}

/// Parst `"R,G,B"` in drei Kanalwerte
///
/// # Beispiele
///
/// ```
/// # use esp_core::{parse_rgb_triple, FormatError};
/// assert_eq!(parse_rgb_triple("255, 0,16"), Ok([255, 0, 16]));
/// assert_eq!(parse_rgb_triple("1,2"), Err(FormatError::FieldCount));
/// ```
pub fn parse_rgb_triple(input: &str) -> Result<[i32; 3], FormatError> {
    let mut channels = [0i32; 3];
    let mut fields = input.split(',');

    for channel in channels.iter_mut() {
        let field = fields.next().ok_or(FormatError::FieldCount)?.trim();
        let value: i32 = field.parse().map_err(|_| FormatError::NotANumber)?;
        if !(0..=255).contains(&value) {
            return Err(FormatError::OutOfRange);
        }
        *channel = value;
    }
    if fields.next().is_some() {
        return Err(FormatError::FieldCount);
    }
    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_triples() {
        assert_eq!(parse_rgb_triple("0,0,0"), Ok([0, 0, 0]));
        assert_eq!(parse_rgb_triple("255,128,1"), Ok([255, 128, 1]));
        assert_eq!(parse_rgb_triple(" 10 , 20 , 30 "), Ok([10, 20, 30]));
    }

    #[test]
    fn test_wrong_field_count() {
        assert_eq!(parse_rgb_triple(""), Err(FormatError::NotANumber));
        assert_eq!(parse_rgb_triple("1,2"), Err(FormatError::FieldCount));
        assert_eq!(parse_rgb_triple("1,2,3,4"), Err(FormatError::FieldCount));
    }

    #[test]
    fn test_not_numbers() {
        assert_eq!(parse_rgb_triple("a,b,c"), Err(FormatError::NotANumber));
        assert_eq!(parse_rgb_triple("1,,3"), Err(FormatError::NotANumber));
        assert_eq!(parse_rgb_triple("1.5,2,3"), Err(FormatError::NotANumber));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(parse_rgb_triple("256,0,0"), Err(FormatError::OutOfRange));
        assert_eq!(parse_rgb_triple("0,-1,0"), Err(FormatError::OutOfRange));
    }

    #[test]
    fn test_maps_to_invalid_format() {
        assert_eq!(
            Status::from(FormatError::OutOfRange),
            Status::error(Reason::InvalidFormat)
        );
    }
}
