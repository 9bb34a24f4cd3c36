//! Recorder - führt alle Event-Quellen zusammen
//!
//! Einziger Besitzer von Storage Log, Indicator und Farb-Policy. Jede Quelle
//! läuft über denselben Pfad: Trigger → (Filter) → Farbe → LED → Log-Zeile.
//! Fehler werden hier in Status-Tokens umgewandelt und nie weitergereicht.

use rgb::RGB8;

use crate::color::{ColorPolicy, clamp_channel};
use crate::control::{CSV_END, CSV_START, Command, HELP_BOX};
use crate::filter;
use crate::indicator::{FLASH_MS, Indicator};
use crate::sources::{ButtonDebouncer, DEBOUNCE_MS, Trigger};
use crate::status::{Reason, Status};
use crate::storage::CsvLog;
use crate::traits::{ButtonInput, Clock, ConsoleWriter, IrDecoder, LogStorage, SmartLedWriter};
use crate::types::{Event, EventSource};

/// Zeitkonstanten des Recorders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    pub debounce_ms: u64,
    pub flash_ms: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            flash_ms: FLASH_MS,
        }
    }
}

pub struct Recorder<S, L, C> {
    log: CsvLog<S>,
    indicator: Indicator<L>,
    clock: C,
    colors: ColorPolicy,
    button: ButtonDebouncer,
}

impl<S, L, C> Recorder<S, L, C>
where
    S: LogStorage,
    L: SmartLedWriter,
    C: Clock,
{
    /// `seed` initialisiert die Farb-Policy (auf dem Gerät aus dem Hardware-RNG)
    pub fn new(storage: S, led: L, clock: C, seed: u64, config: RecorderConfig) -> Self {
        Self {
            log: CsvLog::new(storage),
            indicator: Indicator::new(led, config.flash_ms),
            clock,
            colors: ColorPolicy::new(seed),
            button: ButtonDebouncer::new(config.debounce_ms),
        }
    }

    /// Dateisystem mounten und Log anlegen, liefert den Boot-Status
    pub fn boot(&mut self) -> Status {
        let status = self.log.boot_status();
        info!("BOOT: storage {}", status.reason.as_str());
        status
    }

    /// Gemeinsamer Pfad aller Quellen: LED setzen, Zeile anhängen
    pub fn emit(&mut self, color: RGB8, source: EventSource) -> Status {
        let now = self.clock.uptime_ms();
        self.indicator.flash(color, now);

        let event = Event {
            timestamp: self.clock.wall_clock().into(),
            uptime_ms: now,
            color,
            source,
        };
        match self.log.append(&event) {
            Ok(()) => {
                info!("EVENT: {}", event);
                Status::ok(Reason::DataSaved)
            }
            Err(e) => {
                warn!("EVENT: append failed: {}", e);
                e.into()
            }
        }
    }

    /// Wertet einen Trigger aus
    ///
    /// Gibt `None` zurück wenn der Trigger verworfen wurde (IR-Repeat).
    pub fn dispatch(&mut self, trigger: Trigger) -> Option<Status> {
        let color = match trigger {
            Trigger::Button => self.colors.random_color(),
            Trigger::Ir(decode) => {
                if !filter::accept(&decode) {
                    debug!("IR: repeat dropped");
                    return None;
                }
                info!(
                    "IR: {} code {} ({} bits)",
                    decode.protocol.name(),
                    decode.value,
                    decode.bits
                );
                self.colors.color_for_signal(decode.value)
            }
            Trigger::Web { r, g, b } => RGB8 {
                r: clamp_channel(r),
                g: clamp_channel(g),
                b: clamp_channel(b),
            },
        };
        Some(self.emit(color, trigger.source()))
    }

    /// Taster abfragen, ein Event pro entprelltem Druck
    pub fn poll_button<B: ButtonInput>(&mut self, button: &mut B) -> Option<Status> {
        let now = self.clock.uptime_ms();
        if self.button.update(button.is_active(), now) {
            self.dispatch(Trigger::Button)
        } else {
            None
        }
    }

    /// IR-Decoder abfragen; der Empfänger wird nach jedem Code wieder freigegeben
    pub fn poll_ir<D: IrDecoder>(&mut self, ir: &mut D) -> Option<Status> {
        let decode = ir.poll()?;
        let status = self.dispatch(Trigger::Ir(decode));
        ir.resume();
        status
    }

    /// Eine Konsolen-Zeile bearbeiten
    ///
    /// Leere Zeilen werden ignoriert, sonst folgt auf die Antwort die Help-Box.
    pub fn handle_line<W: ConsoleWriter>(&mut self, line: &str, out: &mut W) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match Command::try_from(line) {
            Ok(command) => self.execute(command, out),
            Err(e) => {
                warn!("CONSOLE: unknown command");
                out.write_status(e.into());
            }
        }
        for row in HELP_BOX {
            out.write_line(row);
        }
    }

    pub fn execute<W: ConsoleWriter>(&mut self, command: Command, out: &mut W) {
        match command {
            Command::Ping => out.write_status(Status::ok(Reason::Pong)),
            Command::Export => self.export(out),
            Command::Clear => match self.log.clear() {
                Ok(()) => out.write_status(Status::ok(Reason::CsvCleared)),
                Err(e) => out.write_status(e.into()),
            },
            Command::SetColor { r, g, b } => {
                if let Some(status) = self.dispatch(Trigger::Web { r, g, b }) {
                    out.write_status(status);
                }
            }
        }
    }

    fn export<W: ConsoleWriter>(&mut self, out: &mut W) {
        let lines = match self.log.export_all() {
            Ok(lines) => lines,
            Err(e) => {
                out.write_status(e.into());
                return;
            }
        };
        out.write_line(CSV_START);
        for line in lines {
            match line {
                Ok(line) => out.write_line(&line),
                Err(e) => {
                    out.write_status(e.into());
                    break;
                }
            }
        }
        out.write_line(CSV_END);
    }

    /// LED nach Ablauf des Flash-Fensters ausschalten
    pub fn tick(&mut self) {
        let now = self.clock.uptime_ms();
        self.indicator.tick(now);
    }

    pub fn log(&self) -> &CsvLog<S> {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut CsvLog<S> {
        &mut self.log
    }

    pub fn indicator(&self) -> &Indicator<L> {
        &self.indicator
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
