//! Liest den Export-Rahmen aus einem Byte-Strom
//!
//! Der Strom ist in der Praxis der serielle Port, in den Tests ein `Cursor`.

use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use esp_core::{ExportFrame, FrameLine};
use tracing::{debug, warn};

/// Ergebnis einer Sammel-Runde
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Collected {
    pub rows: Vec<String>,
    /// `CSV_END` wurde vor dem Timeout gesehen
    pub complete: bool,
}

/// Sammelt alle Zeilen zwischen `CSV_START` und `CSV_END`
///
/// Bricht nach `timeout` ab und gibt zurück, was bis dahin ankam.
/// Read-Timeouts des Ports sind kein Fehler, nur das Ende des Stroms.
pub fn collect_rows<R: Read>(port: &mut R, timeout: Duration) -> Result<Collected> {
    let deadline = Instant::now() + timeout;
    let mut frame = ExportFrame::new();
    let mut collected = Collected::default();
    let mut pending: Vec<u8> = Vec::new();
    let mut buffer = [0u8; 256];

    while Instant::now() < deadline {
        let n = match port.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                continue;
            }
            Err(e) => return Err(e).context("failed to read from serial port"),
        };

        for &byte in &buffer[..n] {
            if byte != b'\n' {
                pending.push(byte);
                continue;
            }
            let line = String::from_utf8_lossy(&pending).into_owned();
            pending.clear();

            match frame.feed(&line) {
                FrameLine::Started => debug!("frame started"),
                FrameLine::Row(row) => collected.rows.push(row.to_string()),
                FrameLine::Finished => {
                    collected.complete = true;
                    return Ok(collected);
                }
                FrameLine::Ignored => {
                    if line.trim().starts_with("ERROR:") {
                        warn!("device reported {}", line.trim());
                    }
                }
            }
        }
    }

    if frame.is_started() {
        warn!("timed out before CSV_END, keeping {} rows", collected.rows.len());
    }
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn collect(input: &str) -> Collected {
        collect_rows(&mut Cursor::new(input.as_bytes().to_vec()), TIMEOUT).unwrap()
    }

    #[test]
    fn test_collects_rows_between_markers() {
        let input = "ESP32-LOGGER_READY\r\nOK:FILESYSTEM_READY\r\n\
                     CSV_START\r\n\
                     Timestamp(ISO8601),Uptime(ms),Color(HEX),Who\r\n\
                     UNKNOWN_TIME,12,FF00AA,button\r\n\
                     CSV_END\r\n\
                     --------------------------\r\n";

        let collected = collect(input);

        assert!(collected.complete);
        assert_eq!(
            collected.rows,
            vec![
                "Timestamp(ISO8601),Uptime(ms),Color(HEX),Who",
                "UNKNOWN_TIME,12,FF00AA,button",
            ]
        );
    }

    #[test]
    fn test_drops_status_and_empty_lines_inside_frame() {
        let input = "CSV_START\n\nOK:DATA_SAVED\nrow-1\nERROR:CSV_OPEN_FAIL\nCSV_END\n";

        let collected = collect(input);

        assert_eq!(collected.rows, vec!["row-1"]);
    }

    #[test]
    fn test_lines_after_end_are_ignored() {
        let collected = collect("CSV_START\na\nCSV_END\nb\n");
        assert_eq!(collected.rows, vec!["a"]);
    }

    #[test]
    fn test_incomplete_frame() {
        let collected = collect("CSV_START\na\nb");

        assert!(!collected.complete);
        assert_eq!(collected.rows, vec!["a"]);
    }

    #[test]
    fn test_no_frame() {
        let collected = collect("ERROR:CSV_NOT_FOUND\r\n");

        assert!(!collected.complete);
        assert!(collected.rows.is_empty());
    }

    /// Port der zwischen den Daten in Read-Timeouts läuft
    struct SlowPort {
        chunks: Vec<Option<&'static [u8]>>,
    }

    impl Read for SlowPort {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            match self.chunks.remove(0) {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                }
                None => Err(ErrorKind::TimedOut.into()),
            }
        }
    }

    #[test]
    fn test_read_timeouts_are_skipped() {
        let mut port = SlowPort {
            chunks: vec![
                None,
                Some(b"CSV_ST"),
                None,
                Some(b"ART\nrow"),
                None,
                Some(b"\nCSV_END\n"),
            ],
        };

        let collected = collect_rows(&mut port, TIMEOUT).unwrap();

        assert!(collected.complete);
        assert_eq!(collected.rows, vec!["row"]);
    }
}
