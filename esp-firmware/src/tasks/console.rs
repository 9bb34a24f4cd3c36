// Console Reader Task - setzt UART-Bytes zu Kommando-Zeilen zusammen
use defmt::{Debug2Format, info, warn};
use esp_hal::Async;
use esp_hal::uart::UartRx;

use crate::{ConsoleLine, ConsoleLineSender};

/// Console Reader Task
///
/// Liest UART0 RX, trennt an `\n` und reicht jede Zeile an den Control-Loop.
/// `\r` wird verworfen. Zu lange Zeilen werden bis zum nächsten `\n` ignoriert.
#[embassy_executor::task]
pub async fn console_reader_task(mut rx: UartRx<'static, Async>, lines: ConsoleLineSender) {
    info!("CONSOLE: Reader task started");

    let mut buffer = [0u8; 32];
    let mut line = ConsoleLine::new();
    let mut overflow = false;

    loop {
        let n = match rx.read_async(&mut buffer).await {
            Ok(n) => n,
            Err(e) => {
                warn!("CONSOLE: read failed: {}", Debug2Format(&e));
                continue;
            }
        };

        for &byte in &buffer[..n] {
            match byte {
                b'\n' => {
                    if overflow {
                        warn!("CONSOLE: line too long, dropped");
                    } else {
                        lines.send(line.clone()).await;
                    }
                    line.clear();
                    overflow = false;
                }
                b'\r' => {}
                _ if overflow => {}
                _ => {
                    // Nur ASCII, Rest ist kein gültiges Kommando
                    let ch = if byte.is_ascii() { byte as char } else { '?' };
                    if line.push(ch).is_err() {
                        overflow = true;
                    }
                }
            }
        }
    }
}
