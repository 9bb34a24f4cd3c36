// Control-Loop Task - einziger Besitzer von Log, LED und Konsolen-Ausgabe
use defmt::info;
use embassy_time::{Duration, Timer};
use esp_core::control::{COMMANDS_HINT, READY_BANNER};
use esp_core::{
    ButtonInput, Clock, ConsoleWriter, IrDecoder, LogStorage, Recorder, RecorderConfig,
    SmartLedWriter, Trigger,
};
use esp_hal_smartled::smart_led_buffer;

use crate::config::{DEBOUNCE_MS, FLASH_MS, LOOP_YIELD_MS, RMT_CLOCK_MHZ};
use crate::hal::{ButtonPin, FlashFs, IrReceiver, RmtLedWriter, SystemClock, UartConsole};
use crate::{ConsoleLineReceiver, StatusReceiver, WebColorReceiver};

/// Eingänge des Control-Loops
pub struct ControlInputs<B, D> {
    pub button: B,
    pub ir: D,
    pub lines: ConsoleLineReceiver,
    pub web_colors: WebColorReceiver,
    pub statuses: StatusReceiver,
}

/// Control-Loop Logik ohne Hardware-Initialisierung
///
/// Reihenfolge pro Durchlauf: Web-Request, Taster, IR, Konsole,
/// Status-Meldungen der Netzwerk-Tasks, LED-Tick. Jede Quelle wird
/// höchstens einmal bedient, danach gibt der Loop die CPU kurz ab.
pub async fn control_logic<S, L, C, B, D, W>(
    mut recorder: Recorder<S, L, C>,
    mut inputs: ControlInputs<B, D>,
    mut out: W,
) -> !
where
    S: LogStorage,
    L: SmartLedWriter,
    C: Clock,
    B: ButtonInput,
    D: IrDecoder,
    W: ConsoleWriter,
{
    out.write_line(READY_BANNER);
    let boot = recorder.boot();
    out.write_status(boot);
    out.write_line(COMMANDS_HINT);
    info!("CONTROL: ready, storage {}", boot);

    loop {
        if let Ok([r, g, b]) = inputs.web_colors.try_receive() {
            if let Some(status) = recorder.dispatch(Trigger::Web { r, g, b }) {
                out.write_status(status);
            }
        }

        if let Some(status) = recorder.poll_button(&mut inputs.button) {
            out.write_status(status);
        }

        if let Some(status) = recorder.poll_ir(&mut inputs.ir) {
            out.write_status(status);
        }

        if let Ok(line) = inputs.lines.try_receive() {
            recorder.handle_line(&line, &mut out);
        }

        while let Ok(status) = inputs.statuses.try_receive() {
            out.write_status(status);
        }

        recorder.tick();

        Timer::after(Duration::from_millis(LOOP_YIELD_MS)).await;
    }
}

/// Control-Loop Task
///
/// Initialisiert die LED (RMT-Buffer lebt im Task) und startet `control_logic()`.
#[embassy_executor::task]
pub async fn control_loop_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    storage: FlashFs,
    clock: SystemClock,
    seed: u64,
    inputs: ControlInputs<ButtonPin<'static>, IrReceiver>,
    console: UartConsole<'static>,
) {
    // Buffer für SmartLED Daten (1 LED)
    let mut rmt_buffer = smart_led_buffer!(1);
    let led = RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer);

    let config = RecorderConfig {
        debounce_ms: DEBOUNCE_MS,
        flash_ms: FLASH_MS,
    };
    let recorder = Recorder::new(storage, led, clock, seed, config);

    control_logic(recorder, inputs, console).await
}
