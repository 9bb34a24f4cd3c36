//! esp-export - lädt das Color-Event-Log vom Gerät
//!
//! Schickt `export` über die serielle Konsole, sammelt die Zeilen zwischen
//! `CSV_START` und `CSV_END` und schreibt sie in eine lokale CSV-Datei.
//!
//! Benutzung:
//!   esp-export --port /dev/ttyUSB0
//!   esp-export --port COM5 --output log.csv --timeout 10

mod collect;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serialport::ClearBuffer;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::collect::collect_rows;

/// Wartezeit nach dem Öffnen (viele Boards resetten beim Öffnen des Ports)
const SETTLE_TIME: Duration = Duration::from_secs(2);

/// Read-Timeout pro Aufruf, die Gesamtzeit regelt `--timeout`
const READ_POLL: Duration = Duration::from_millis(10);

#[derive(Parser, Debug)]
#[command(name = "esp-export")]
#[command(about = "Download the color event log over the serial console")]
struct Args {
    /// Serial port of the logger (e.g. /dev/ttyUSB0, COM5)
    #[arg(short, long)]
    port: String,

    /// Baud rate of the console
    #[arg(short, long, default_value_t = 115_200)]
    baud: u32,

    /// Seconds to wait for the complete export
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    /// Output file
    #[arg(short, long, default_value = "esp32_data.csv")]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let mut port = serialport::new(&args.port, args.baud)
        .timeout(READ_POLL)
        .open()
        .with_context(|| format!("failed to open serial port '{}'", args.port))?;

    thread::sleep(SETTLE_TIME);
    port.clear(ClearBuffer::All)
        .context("failed to clear serial buffers")?;

    port.write_all(b"export\n")
        .context("failed to send export command")?;
    port.flush().context("failed to flush serial port")?;
    info!("waiting for CSV data...");

    let collected = collect_rows(&mut port, Duration::from_secs(args.timeout))?;
    if collected.rows.is_empty() {
        bail!("no CSV data received");
    }

    fs::write(&args.output, collected.rows.join("\n"))
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        "received {} rows, saved to {}",
        collected.rows.len(),
        args.output.display()
    );

    for row in &collected.rows {
        println!("{row}");
    }
    Ok(())
}
