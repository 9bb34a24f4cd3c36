// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_core::{Reason, Status};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};

use crate::StatusSender;
use crate::config::{WIFI_CONNECT_TIMEOUT_SECS, WIFI_PASSWORD, WIFI_SSID};

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Verbindet mit Access Point
/// - Überwacht Verbindung und reconnected bei Bedarf
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            // Configure WiFi station mode
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(5)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(5)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        // Connect to AP
        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(5)).await;
                continue;
            }
        }

        // Wait for disconnect
        controller
            .wait_for_event(esp_radio::wifi::WifiEvent::StaDisconnected)
            .await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Wartet höchstens `WIFI_CONNECT_TIMEOUT_SECS` auf eine IP-Adresse.
/// Bei Timeout geht `ERROR:WIFI_CONNECT_FAIL` an die Konsole, die Verbindung
/// wird im Hintergrund weiter versucht.
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>, status: StatusSender) {
    let timeout = Timer::after(Duration::from_secs(WIFI_CONNECT_TIMEOUT_SECS));
    if let Either::Second(()) = select(stack.wait_config_up(), timeout).await {
        warn!(
            "WiFi: No IP address after {}s",
            WIFI_CONNECT_TIMEOUT_SECS
        );
        status.send(Status::error(Reason::WifiConnectFail)).await;
        stack.wait_config_up().await;
    }

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  IP:      {}", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  DNS:     {}", Debug2Format(&config.dns_servers));
    }
}
