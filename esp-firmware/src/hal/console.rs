// Konsolen-Ausgabe über UART0
//
// Einziger Schreiber ist der Control-Loop. Blockierendes Schreiben ist
// hier gewollt: Export-Zeilen dürfen sich nicht mit anderen Ausgaben mischen.

use defmt::{Debug2Format, warn};
use esp_core::ConsoleWriter;
use esp_hal::Async;
use esp_hal::uart::UartTx;

pub struct UartConsole<'a> {
    tx: UartTx<'a, Async>,
}

impl<'a> UartConsole<'a> {
    pub fn new(tx: UartTx<'a, Async>) -> Self {
        Self { tx }
    }

    fn write_all(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            match self.tx.write(bytes) {
                Ok(0) => {}
                Ok(n) => bytes = &bytes[n..],
                Err(e) => {
                    warn!("CONSOLE: write failed: {}", Debug2Format(&e));
                    return;
                }
            }
        }
    }
}

impl ConsoleWriter for UartConsole<'_> {
    fn write_line(&mut self, line: &str) {
        self.write_all(line.as_bytes());
        self.write_all(b"\r\n");
    }
}
