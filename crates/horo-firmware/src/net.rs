//! WiFi bring-up, the embassy-net runner and the one-shot SNTP sync.

use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpEndpoint, Runner, Stack};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer, with_timeout};
use esp_radio::wifi::{
    ClientConfiguration, Configuration, WifiController, WifiDevice, WifiEvent, WifiState,
};
use log::{debug, info, warn};
use thiserror_no_std::Error;

use crate::wall_clock::WallClockSync;

/// Set once by [`sntp_task`] when the epoch is known. The render loop polls
/// it with `try_take`, so a tick never waits on the network.
pub static WALL_CLOCK_SYNC: Signal<CriticalSectionRawMutex, WallClockSync> = Signal::new();

const SSID: &str = env!("WIFI_SSID");
const PASSWORD: &str = env!("WIFI_PASSWORD");

const SNTP_HOST: &str = "pool.ntp.org";
const SNTP_PORT: u16 = 123;
const SNTP_PACKET_LEN: usize = 48;
/// Leap indicator 0, version 4, client mode.
const SNTP_REQUEST_HEAD: u8 = 0x23;
/// Seconds from the NTP era origin (1900) to the Unix epoch (1970).
const NTP_UNIX_DELTA: u32 = 2_208_988_800;

const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SntpError {
    #[error("hostname did not resolve to an address")]
    NoAddress,
    #[error("dns lookup failed: {0:?}")]
    Dns(#[from] embassy_net::dns::Error),
    #[error("socket bind failed: {0:?}")]
    Bind(#[from] embassy_net::udp::BindError),
    #[error("request send failed: {0:?}")]
    Send(#[from] embassy_net::udp::SendError),
    #[error("reply receive failed: {0:?}")]
    Recv(#[from] embassy_net::udp::RecvError),
    #[error("no reply within the timeout")]
    Timeout,
    #[error("short reply of {0} bytes")]
    ShortReply(usize),
    #[error("server is not synchronized itself")]
    Unsynchronized,
}

/// Keeps the station associated with the configured network, reconnecting
/// with a backoff whenever the link drops.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    debug!("wifi connection task started");
    loop {
        if esp_radio::wifi::wifi_state() == WifiState::StaConnected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            warn!("wifi link lost");
            Timer::after(RETRY_DELAY).await;
        }
        if !matches!(controller.is_started(), Ok(true)) {
            let config = Configuration::Client(ClientConfiguration {
                ssid: SSID.try_into().expect("SSID fits the wifi configuration"),
                password: PASSWORD
                    .try_into()
                    .expect("password fits the wifi configuration"),
                ..Default::default()
            });
            controller
                .set_configuration(&config)
                .expect("static wifi configuration is valid");
            controller
                .start_async()
                .await
                .expect("wifi controller failed to start");
        }
        info!("connecting to {SSID}");
        match controller.connect_async().await {
            Ok(()) => info!("wifi connected"),
            Err(err) => {
                warn!("wifi connect failed: {err:?}");
                Timer::after(RETRY_DELAY).await;
            }
        }
    }
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Queries the NTP pool until one request succeeds, signals the epoch fix
/// and exits. The clock runs on uptime from there on.
#[embassy_executor::task]
pub async fn sntp_task(stack: Stack<'static>) {
    stack.wait_config_up().await;
    info!("network up, requesting time from {SNTP_HOST}");
    loop {
        match query_sntp(stack).await {
            Ok(sync) => {
                info!("wall clock synced at unix {}", sync.unix_seconds);
                WALL_CLOCK_SYNC.signal(sync);
                return;
            }
            Err(err) => {
                warn!("sntp attempt failed: {err}");
                Timer::after(RETRY_DELAY).await;
            }
        }
    }
}

async fn query_sntp(stack: Stack<'static>) -> Result<WallClockSync, SntpError> {
    let addresses = stack.dns_query(SNTP_HOST, DnsQueryType::A).await?;
    let address = addresses.first().copied().ok_or(SntpError::NoAddress)?;
    debug!("{SNTP_HOST} resolved to {address}");

    let mut rx_meta = [PacketMetadata::EMPTY; 4];
    let mut rx_buffer = [0u8; 128];
    let mut tx_meta = [PacketMetadata::EMPTY; 4];
    let mut tx_buffer = [0u8; 128];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket.bind(SNTP_PORT)?;

    let mut request = [0u8; SNTP_PACKET_LEN];
    request[0] = SNTP_REQUEST_HEAD;
    socket
        .send_to(&request, IpEndpoint::new(address, SNTP_PORT))
        .await?;

    let mut reply = [0u8; SNTP_PACKET_LEN];
    let (len, _) = with_timeout(Duration::from_secs(2), socket.recv_from(&mut reply))
        .await
        .map_err(|_| SntpError::Timeout)??;
    let at = Instant::now();

    if len < SNTP_PACKET_LEN {
        return Err(SntpError::ShortReply(len));
    }
    // Leap indicator 3 or stratum 0 means the server has no time to offer.
    if reply[0] >> 6 == 3 || reply[1] == 0 {
        return Err(SntpError::Unsynchronized);
    }

    let transmit = u32::from_be_bytes([reply[40], reply[41], reply[42], reply[43]]);
    let unix_seconds = u64::from(transmit.wrapping_sub(NTP_UNIX_DELTA));
    Ok(WallClockSync { unix_seconds, at })
}
