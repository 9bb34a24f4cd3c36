//! Signal Filter für den IR-Kanal
//!
//! Zustandslos: jede Dekodierung wird einzeln bewertet.

use crate::types::IrDecode;

/// "Taste wird noch gehalten" / kein Signal (alle 64 Bits gesetzt)
pub const REPEAT_SENTINEL: u64 = u64::MAX;

/// `true` wenn der Code als neues Event geloggt werden soll
///
/// Verworfen wird nur der Repeat-Sentinel, unabhängig vom Protokoll.
/// Unbekannte Protokolle werden akzeptiert.
pub fn accept(decode: &IrDecode) -> bool {
    decode.value != REPEAT_SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IrProtocol;

    #[test]
    fn test_repeat_sentinel_rejected() {
        let repeat = IrDecode {
            value: u64::MAX,
            bits: 0,
            protocol: IrProtocol::Nec,
        };
        assert!(!accept(&repeat));
    }

    #[test]
    fn test_sentinel_rejected_for_any_protocol() {
        let raw = IrDecode {
            value: REPEAT_SENTINEL,
            bits: 64,
            protocol: IrProtocol::Unknown,
        };
        assert!(!accept(&raw));
    }

    #[test]
    fn test_unknown_protocol_accepted() {
        let unknown = IrDecode {
            value: 0x1234_5678,
            bits: 32,
            protocol: IrProtocol::Unknown,
        };
        assert!(accept(&unknown));
    }

    #[test]
    fn test_zero_code_accepted() {
        let zero = IrDecode {
            value: 0,
            bits: 12,
            protocol: IrProtocol::Sony,
        };
        assert!(accept(&zero));
    }
}
