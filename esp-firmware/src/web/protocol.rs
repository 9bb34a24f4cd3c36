// HTTP-Protokoll-Definitionen
// Query-Parameter und Antworten des Farb-Endpoints

use core::fmt::Write;

use esp_core::Status;
use heapless::String;
use serde::Deserialize;

/// Query von `GET /color?rgb=R,G,B`
///
/// `rgb` ist optional, damit ein fehlender Parameter als
/// `ERROR:INVALID_FORMAT` beantwortet wird statt mit einem Extractor-Fehler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColorQuery {
    #[serde(default)]
    pub rgb: Option<String<24>>,
}

/// Status-Token als Antwort-Body, z.B. `OK:COLOR_SET`
pub fn status_body(status: Status) -> String<32> {
    let mut body = String::new();
    // Längstes Token hat 26 Zeichen
    let _ = write!(body, "{}", status);
    body
}
