// SNTP Task - synchronisiert die Wall-Clock über NTP
use core::net::{SocketAddr, SocketAddrV4};

use defmt::{Debug2Format, error, info, warn};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, Stack};
use embassy_time::{Duration, Instant, Timer, with_timeout};
use esp_core::{Clock, Reason, Status, Timestamp};
use sntpc::{NtpContext, NtpTimestampGenerator, get_time};

use crate::StatusSender;
use crate::config::{
    NTP_BUFFER_SIZE, NTP_LOCAL_PORT, NTP_PORT, NTP_RESYNC_SECS, NTP_RETRY_SECS, NTP_SERVERS,
    NTP_TIMEOUT_SECS, TZ_OFFSET_SECS,
};
use crate::hal::SystemClock;
use crate::hal::clock::set_unix_time;

/// Fehler eines Synchronisations-Versuchs
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
enum SyncError {
    Dns,
    Timeout,
    Protocol,
}

/// Lokale Zeitbasis für sntpc (Round-Trip-Messung), läuft ab Boot
#[derive(Debug, Clone, Copy, Default)]
struct UptimeTimestamp {
    micros: u64,
}

impl NtpTimestampGenerator for UptimeTimestamp {
    fn init(&mut self) {
        self.micros = Instant::now().as_micros();
    }

    fn timestamp_sec(&self) -> u64 {
        self.micros / 1_000_000
    }

    fn timestamp_subsec_micros(&self) -> u32 {
        (self.micros % 1_000_000) as u32
    }
}

/// SNTP Task
///
/// Wartet auf eine IP-Adresse, fragt dann die NTP-Server der Reihe nach.
/// Erfolg: Boot-Zeitpunkt setzen, nach `NTP_RESYNC_SECS` erneut.
/// Fehlschlag: `ERROR:TIME_SYNC_FAIL` an die Konsole, nach `NTP_RETRY_SECS` erneut.
#[embassy_executor::task]
pub async fn sntp_task(stack: &'static Stack<'static>, status: StatusSender) {
    let mut rx_meta = [PacketMetadata::EMPTY; 4];
    let mut rx_buffer = [0u8; NTP_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; 4];
    let mut tx_buffer = [0u8; NTP_BUFFER_SIZE];

    stack.wait_config_up().await;

    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    if let Err(e) = socket.bind(NTP_LOCAL_PORT) {
        error!("SNTP: Failed to bind UDP socket: {}", Debug2Format(&e));
        status.send(Status::error(Reason::TimeSyncFail)).await;
        return;
    }

    let context = NtpContext::new(UptimeTimestamp::default());
    let clock = SystemClock::new(TZ_OFFSET_SECS);

    loop {
        match sync_once(stack, &socket, context).await {
            Ok(unix_secs) => {
                set_unix_time(unix_secs);
                info!("SNTP: Time synced: {}", Timestamp::from(clock.wall_clock()));
                Timer::after(Duration::from_secs(NTP_RESYNC_SECS)).await;
            }
            Err(e) => {
                warn!("SNTP: Sync failed: {}", e);
                status.send(Status::error(Reason::TimeSyncFail)).await;
                Timer::after(Duration::from_secs(NTP_RETRY_SECS)).await;
            }
        }
    }
}

/// Ein Durchlauf über alle Server, liefert UNIX-Sekunden
async fn sync_once(
    stack: &Stack<'static>,
    socket: &UdpSocket<'_>,
    context: NtpContext<UptimeTimestamp>,
) -> Result<i64, SyncError> {
    let mut last_error = SyncError::Dns;

    for server in NTP_SERVERS {
        let addresses = match stack.dns_query(server, DnsQueryType::A).await {
            Ok(addresses) => addresses,
            Err(e) => {
                warn!("SNTP: DNS lookup for {} failed: {}", server, Debug2Format(&e));
                last_error = SyncError::Dns;
                continue;
            }
        };
        let Some(&address) = addresses.first() else {
            continue;
        };
        #[allow(unreachable_patterns)]
        let target = match address {
            IpAddress::Ipv4(v4) => SocketAddr::V4(SocketAddrV4::new(v4, NTP_PORT)),
            _ => continue,
        };

        let request = get_time(target, socket, context);
        match with_timeout(Duration::from_secs(NTP_TIMEOUT_SECS), request).await {
            Ok(Ok(result)) => return Ok(i64::from(result.sec())),
            Ok(Err(e)) => {
                warn!("SNTP: {} answered badly: {}", server, Debug2Format(&e));
                last_error = SyncError::Protocol;
            }
            Err(_) => {
                warn!("SNTP: {} timed out", server);
                last_error = SyncError::Timeout;
            }
        }
    }

    Err(last_error)
}
