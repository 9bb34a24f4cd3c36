//! IR-Protokoll-Decoder
//!
//! Eingabe ist ein Rohmitschnitt: abwechselnd Mark/Space-Dauern in µs,
//! beginnend mit dem ersten Mark (Trägersignal an). Die Pause nach dem
//! letzten Mark gehört nicht mehr zum Frame.
//!
//! Unterstützt: NEC (inkl. Repeat-Frame), Sony SIRC 12/15/20, RC5, RC6 Mode 0.
//! Alles andere wird über einen FNV-Hash der Dauer-Vergleiche auf einen
//! 32-Bit Wert abgebildet (`IrProtocol::Unknown`).

use heapless::Vec;

use crate::filter::REPEAT_SENTINEL;
use crate::types::{IrDecode, IrProtocol};

/// Maximale Anzahl Dauern pro Mitschnitt (NEC braucht 67)
pub const MAX_CAPTURE_LEN: usize = 128;

/// Kürzere Mitschnitte sind Rauschen (NEC-Repeat ausgenommen)
pub const MIN_CAPTURE_LEN: usize = 6;

/// Rohmitschnitt wie er vom Capture-Task geliefert wird
pub type IrCapture = Vec<u16, MAX_CAPTURE_LEN>;

// Toleranz: 25 % der Soll-Dauer plus 100 µs
const TOLERANCE_PERCENT: u32 = 25;
const TOLERANCE_SLACK_US: u32 = 100;

const NEC_HDR_MARK: u32 = 9000;
const NEC_HDR_SPACE: u32 = 4500;
const NEC_RPT_SPACE: u32 = 2250;
const NEC_BIT_MARK: u32 = 560;
const NEC_ONE_SPACE: u32 = 1690;
const NEC_ZERO_SPACE: u32 = 560;
const NEC_BITS: usize = 32;

const SONY_HDR_MARK: u32 = 2400;
const SONY_SPACE: u32 = 600;
const SONY_ONE_MARK: u32 = 1200;
const SONY_ZERO_MARK: u32 = 600;
const SONY_LENGTHS: [usize; 3] = [12, 15, 20];

const RC5_UNIT: u32 = 889;
const RC5_RAW_BITS: usize = 14;

const RC6_HDR_MARK: u32 = 2666;
const RC6_HDR_SPACE: u32 = 889;
const RC6_UNIT: u32 = 444;
const RC6_BITS: usize = 20;
// Mode (3 Bit), dann das doppelt breite Toggle-Bit
const RC6_TOGGLE_INDEX: usize = 3;

const FNV_PRIME_32: u32 = 16_777_619;
const FNV_BASIS_32: u32 = 2_166_136_261;

/// Halbbit-Pegel (true = Mark), für die Manchester-Protokolle
type Halves = Vec<bool, { 2 * MAX_CAPTURE_LEN }>;

/// Dekodiert einen Rohmitschnitt
///
/// Gibt `None` zurück wenn der Mitschnitt zu kurz für jede Interpretation ist.
pub fn decode(raw: &[u16]) -> Option<IrDecode> {
    decode_nec(raw)
        .or_else(|| decode_sony(raw))
        .or_else(|| decode_rc6(raw))
        .or_else(|| decode_rc5(raw))
        .or_else(|| decode_hash(raw))
}

fn matches(measured: u16, nominal: u32) -> bool {
    let measured = u32::from(measured);
    let tolerance = nominal * TOLERANCE_PERCENT / 100 + TOLERANCE_SLACK_US;
    measured + tolerance >= nominal && measured <= nominal + tolerance
}

fn decode_nec(raw: &[u16]) -> Option<IrDecode> {
    let (&leader, rest) = raw.split_first()?;
    if !matches(leader, NEC_HDR_MARK) {
        return None;
    }
    let space = *rest.first()?;

    // Repeat-Frame: Leader, kurze Pause, Stop-Mark
    if matches(space, NEC_RPT_SPACE) {
        let stop = *rest.get(1)?;
        if matches(stop, NEC_BIT_MARK) && raw.len() <= 4 {
            return Some(IrDecode {
                value: REPEAT_SENTINEL,
                bits: 0,
                protocol: IrProtocol::Nec,
            });
        }
        return None;
    }

    if !matches(space, NEC_HDR_SPACE) {
        return None;
    }
    let body = &rest[1..];
    if body.len() < 2 * NEC_BITS + 1 {
        return None;
    }

    let mut value = 0u64;
    for pair in body[..2 * NEC_BITS].chunks_exact(2) {
        if !matches(pair[0], NEC_BIT_MARK) {
            return None;
        }
        let bit = if matches(pair[1], NEC_ONE_SPACE) {
            1
        } else if matches(pair[1], NEC_ZERO_SPACE) {
            0
        } else {
            return None;
        };
        value = (value << 1) | bit;
    }
    if !matches(body[2 * NEC_BITS], NEC_BIT_MARK) {
        return None;
    }

    Some(IrDecode {
        value,
        bits: NEC_BITS as u16,
        protocol: IrProtocol::Nec,
    })
}

fn decode_sony(raw: &[u16]) -> Option<IrDecode> {
    let (&leader, body) = raw.split_first()?;
    if !matches(leader, SONY_HDR_MARK) {
        return None;
    }
    // Paare aus (Space, Mark); das Bit steckt in der Mark-Länge
    let bits = body.len() / 2;
    if !SONY_LENGTHS.contains(&bits) {
        return None;
    }

    let mut value = 0u64;
    for pair in body.chunks_exact(2) {
        if !matches(pair[0], SONY_SPACE) {
            return None;
        }
        let bit = if matches(pair[1], SONY_ONE_MARK) {
            1
        } else if matches(pair[1], SONY_ZERO_MARK) {
            0
        } else {
            return None;
        };
        value = (value << 1) | bit;
    }

    Some(IrDecode {
        value,
        bits: bits as u16,
        protocol: IrProtocol::Sony,
    })
}

/// Zerlegt Dauern in Halbbit-Einheiten (gerundet, 1..=3 Einheiten pro Dauer)
fn expand(raw: &[u16], unit: u32, halves: &mut Halves) -> Option<()> {
    for (i, &duration) in raw.iter().enumerate() {
        let mark = i % 2 == 0;
        let units = (u32::from(duration) + unit / 2) / unit;
        if units == 0 || units > 3 {
            return None;
        }
        for _ in 0..units {
            halves.push(mark).ok()?;
        }
    }
    Some(())
}

fn decode_rc5(raw: &[u16]) -> Option<IrDecode> {
    if !matches(*raw.first()?, RC5_UNIT) {
        return None;
    }

    // Erste Hälfte des Startbits ist Space und fehlt im Mitschnitt
    let mut halves = Halves::new();
    halves.push(false).ok()?;
    expand(raw, RC5_UNIT, &mut halves)?;
    // Endet der Frame mit Mark, fehlt der abschließende Space
    if halves.len() == 2 * RC5_RAW_BITS - 1 {
        halves.push(false).ok()?;
    }
    if halves.len() != 2 * RC5_RAW_BITS {
        return None;
    }

    let mut value = 0u64;
    for (index, pair) in halves.chunks_exact(2).enumerate() {
        // RC5: 1 = Space→Mark, 0 = Mark→Space
        let bit = match (pair[0], pair[1]) {
            (false, true) => 1,
            (true, false) => 0,
            _ => return None,
        };
        if index == 0 {
            if bit != 1 {
                return None;
            }
            continue;
        }
        value = (value << 1) | bit;
    }

    Some(IrDecode {
        value,
        bits: (RC5_RAW_BITS - 1) as u16,
        protocol: IrProtocol::Rc5,
    })
}

fn decode_rc6(raw: &[u16]) -> Option<IrDecode> {
    if raw.len() < 3 || !matches(raw[0], RC6_HDR_MARK) || !matches(raw[1], RC6_HDR_SPACE) {
        return None;
    }

    let mut halves = Halves::new();
    expand(&raw[2..], RC6_UNIT, &mut halves)?;
    // Startbit (2) + Daten (2 je Bit) + breiteres Toggle-Bit (2 zusätzlich)
    let expected = 2 + 2 * RC6_BITS + 2;
    if halves.len() == expected - 1 {
        halves.push(false).ok()?;
    }
    if halves.len() != expected {
        return None;
    }

    // Startbit muss 1 sein (RC6: 1 = Mark→Space)
    if !(halves[0] && !halves[1]) {
        return None;
    }

    let mut value = 0u64;
    let mut index = 2;
    for bit in 0..RC6_BITS {
        let width = if bit == RC6_TOGGLE_INDEX { 2 } else { 1 };
        let first = &halves[index..index + width];
        let second = &halves[index + width..index + 2 * width];
        let level = first[0];
        if first.iter().any(|&h| h != level) || second.iter().any(|&h| h == level) {
            return None;
        }
        value = (value << 1) | u64::from(level);
        index += 2 * width;
    }

    Some(IrDecode {
        value,
        bits: RC6_BITS as u16,
        protocol: IrProtocol::Rc6,
    })
}

/// 0 = kürzer, 1 = etwa gleich, 2 = länger (20 % Schwelle)
fn compare(old: u16, new: u16) -> u32 {
    let (old, new) = (u32::from(old), u32::from(new));
    if new * 10 < old * 8 {
        0
    } else if old * 10 < new * 8 {
        2
    } else {
        1
    }
}

fn decode_hash(raw: &[u16]) -> Option<IrDecode> {
    if raw.len() < MIN_CAPTURE_LEN {
        return None;
    }
    let hash = raw.windows(3).fold(FNV_BASIS_32, |hash, w| {
        hash.wrapping_mul(FNV_PRIME_32) ^ compare(w[0], w[2])
    });
    Some(IrDecode {
        value: u64::from(hash),
        bits: 32,
        protocol: IrProtocol::Unknown,
    })
}
