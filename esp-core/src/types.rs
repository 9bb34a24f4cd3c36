//! Core Types für den Color-Event-Logger
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use rgb::RGB8;

use crate::color::to_hex24;

/// Sentinel für Timestamps solange die Uhr nicht synchronisiert ist
pub const UNKNOWN_TIME: &str = "UNKNOWN_TIME";

/// Quelle eines Events
///
/// Wird als `Who`-Spalte in die CSV-Datei geschrieben.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventSource {
    /// Physischer Taster
    Button,
    /// Infrarot-Fernbedienung
    IrReceiver,
    /// HTTP-Request
    Web,
}

impl EventSource {
    /// Tag wie er in der Log-Datei steht (ohne Kommas/Zeilenumbrüche)
    pub fn tag(self) -> &'static str {
        match self {
            EventSource::Button => "button",
            EventSource::IrReceiver => "ir_receiver",
            EventSource::Web => "web",
        }
    }
}

/// Wall-Clock Zeitstempel eines Events
///
/// `Unknown` solange NTP noch nicht synchronisiert hat. Das Event wird
/// trotzdem geloggt, nur mit dem Sentinel-String.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Synced(NaiveDateTime),
    Unknown,
}

impl From<Option<NaiveDateTime>> for Timestamp {
    fn from(value: Option<NaiveDateTime>) -> Self {
        match value {
            Some(time) => Timestamp::Synced(time),
            None => Timestamp::Unknown,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Format: %Y-%m-%dT%H:%M:%S (ohne Zeitzonen-Suffix)
            Timestamp::Synced(t) => write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                t.year(),
                t.month(),
                t.day(),
                t.hour(),
                t.minute(),
                t.second()
            ),
            Timestamp::Unknown => f.write_str(UNKNOWN_TIME),
        }
    }
}

/// Rechnet UNIX-Sekunden plus Zeitzonen-Offset in lokale Zeit um
///
/// Gibt `None` zurück wenn der Wert außerhalb des darstellbaren Bereichs liegt.
pub fn local_time(unix_secs: i64, tz_offset_secs: i64) -> Option<NaiveDateTime> {
    let secs = unix_secs.checked_add(tz_offset_secs)?;
    DateTime::from_timestamp(secs, 0).map(|t| t.naive_utc())
}

/// Ein akzeptiertes Event - existiert nur als Zeile im Log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: Timestamp,
    /// Millisekunden seit Boot (monoton)
    pub uptime_ms: u64,
    pub color: RGB8,
    pub source: EventSource,
}

impl fmt::Display for Event {
    /// CSV-Zeile ohne Zeilenumbruch: `<timestamp>,<uptime_ms>,<RRGGBB>,<who>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{:06X},{}",
            self.timestamp,
            self.uptime_ms,
            to_hex24(self.color),
            self.source.tag()
        )
    }
}

/// IR-Protokolle die der Decoder erkennt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrProtocol {
    Nec,
    Sony,
    Rc5,
    Rc6,
    Unknown,
}

impl IrProtocol {
    pub fn name(self) -> &'static str {
        match self {
            IrProtocol::Nec => "NEC",
            IrProtocol::Sony => "SONY",
            IrProtocol::Rc5 => "RC5",
            IrProtocol::Rc6 => "RC6",
            IrProtocol::Unknown => "UNKNOWN",
        }
    }
}

/// Ergebnis einer IR-Dekodierung
///
/// Lebt nur für einen Receive-Callback: wird gefiltert, in eine Farbe
/// umgerechnet und danach verworfen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IrDecode {
    pub value: u64,
    pub bits: u16,
    pub protocol: IrProtocol,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Timestamp {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Timestamp::Synced(t) => defmt::write!(
                fmt,
                "{}-{}-{}T{}:{}:{}",
                t.year(),
                t.month(),
                t.day(),
                t.hour(),
                t.minute(),
                t.second()
            ),
            Timestamp::Unknown => defmt::write!(fmt, "UNKNOWN_TIME"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Event {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Event {{ ts: {}, uptime: {}ms, rgb: ({}, {}, {}), who: {} }}",
            self.timestamp,
            self.uptime_ms,
            self.color.r,
            self.color.g,
            self.color.b,
            self.source.tag()
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IrDecode {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "IrDecode {{ {}: {=u64:#x} ({} bits) }}",
            self.protocol.name(),
            self.value,
            self.bits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core::fmt::Write;
    use heapless::String;

    fn render<T: fmt::Display>(value: &T) -> String<96> {
        let mut out = String::new();
        write!(out, "{}", value).unwrap();
        out
    }

    #[test]
    fn test_timestamp_iso_format() {
        let t = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        assert_eq!(render(&Timestamp::Synced(t)).as_str(), "2025-03-07T09:05:01");
    }

    #[test]
    fn test_timestamp_unknown_sentinel() {
        assert_eq!(render(&Timestamp::from(None::<NaiveDateTime>)).as_str(), "UNKNOWN_TIME");
    }

    #[test]
    fn test_local_time_applies_offset() {
        // 2024-01-01T00:00:00Z + 8h
        let t = local_time(1_704_067_200, 8 * 3600).unwrap();
        assert_eq!(render(&Timestamp::Synced(t)).as_str(), "2024-01-01T08:00:00");
    }

    #[test]
    fn test_event_row() {
        let event = Event {
            timestamp: Timestamp::Unknown,
            uptime_ms: 1234,
            color: RGB8 { r: 0x0A, g: 0xBC, b: 0x01 },
            source: EventSource::IrReceiver,
        };
        assert_eq!(
            render(&event).as_str(),
            "UNKNOWN_TIME,1234,0ABC01,ir_receiver"
        );
    }

    #[test]
    fn test_source_tags_have_no_separators() {
        for source in [EventSource::Button, EventSource::IrReceiver, EventSource::Web] {
            assert!(!source.tag().contains(','));
            assert!(!source.tag().contains('\n'));
        }
    }
}
