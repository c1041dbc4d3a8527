use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Public address used only to pick the outbound interface; nothing is sent.
const ROUTE_PROBE_TARGET: &str = "8.8.8.8:80";

/// The address this machine uses to reach the outside world, or loopback
/// when that cannot be determined.
pub fn detect_local_ip() -> IpAddr {
    detect_local_ip_via(ROUTE_PROBE_TARGET)
}

pub fn detect_local_ip_via(target: &str) -> IpAddr {
    match outbound_ip(target) {
        Ok(ip) => ip,
        Err(e) => {
            tracing::warn!(error = %e, "Could not determine local IP, using loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn outbound_ip(target: &str) -> io::Result<IpAddr> {
    // Connecting a UDP socket only selects a route; no packet leaves the host
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(target)?;
    Ok(socket.local_addr()?.ip())
}
