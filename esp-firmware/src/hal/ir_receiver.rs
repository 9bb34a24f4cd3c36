// IR-Empfänger: dekodiert die Mitschnitte des Capture-Tasks
//
// Der Capture-Task nimmt nach jedem Mitschnitt erst wieder auf, wenn
// `resume()` das Signal setzt. Nicht dekodierbare Mitschnitte (Rauschen)
// werden hier direkt quittiert.

use defmt::debug;
use esp_core::{IrDecode, IrDecoder, ir};

use crate::{IrCaptureReceiver, IrResumeSignal};

pub struct IrReceiver {
    captures: IrCaptureReceiver,
    resume: &'static IrResumeSignal,
}

impl IrReceiver {
    pub fn new(captures: IrCaptureReceiver, resume: &'static IrResumeSignal) -> Self {
        Self { captures, resume }
    }
}

impl IrDecoder for IrReceiver {
    fn poll(&mut self) -> Option<IrDecode> {
        let raw = self.captures.try_receive().ok()?;
        match ir::decode(&raw) {
            Some(decoded) => Some(decoded),
            None => {
                debug!("IR: {} durations, not decodable", raw.len());
                self.resume.signal(());
                None
            }
        }
    }

    fn resume(&mut self) {
        self.resume.signal(());
    }
}
