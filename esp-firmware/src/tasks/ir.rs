// IR Capture Task - misst Mark/Space-Dauern am Empfänger-Pin
use defmt::{debug, info};
use embassy_time::{Duration, Instant, with_timeout};
use esp_core::ir::IrCapture;
use esp_hal::gpio::{Input, InputConfig, Pull};

use crate::config::IR_FRAME_GAP_US;
use crate::{IrCaptureSender, IrResumeSignal};

/// IR Capture Task
///
/// Wartet auf die erste fallende Flanke (Empfänger ist active-low, LOW = Mark),
/// misst dann jede Flanke bis eine Pause länger als `IR_FRAME_GAP_US` den
/// Frame beendet. Der Mitschnitt geht an den Control-Loop; danach wird erst
/// nach `resume()` wieder aufgenommen.
#[embassy_executor::task]
pub async fn ir_capture_task(
    pin: esp_hal::peripherals::GPIO4<'static>,
    captures: IrCaptureSender,
    resume: &'static IrResumeSignal,
) {
    let mut input = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
    info!("IR: Capture task started");

    loop {
        let capture = capture_frame(&mut input).await;
        debug!("IR: captured {} durations", capture.len());

        captures.send(capture).await;
        resume.wait().await;
    }
}

async fn capture_frame(input: &mut Input<'_>) -> IrCapture {
    input.wait_for_falling_edge().await;

    let mut capture = IrCapture::new();
    let mut last_edge = Instant::now();
    let gap = Duration::from_micros(IR_FRAME_GAP_US);

    while with_timeout(gap, input.wait_for_any_edge()).await.is_ok() {
        let now = Instant::now();
        let micros = (now - last_edge).as_micros().min(u64::from(u16::MAX)) as u16;
        last_edge = now;
        if capture.push(micros).is_err() {
            // Überlanger Frame: Rest verwerfen, bis Ruhe herrscht
            while with_timeout(gap, input.wait_for_any_edge()).await.is_ok() {}
            break;
        }
    }
    capture
}
