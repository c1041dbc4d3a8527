use std::net::{IpAddr, SocketAddr};

use crate::domain::errors::{DomainError, Result};

/// Port the viewer page and stream are served on unless configured otherwise.
pub const DEFAULT_HTTP_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    ip: IpAddr,
    port: u16,
}

impl ServerConfig {
    pub fn new(ip: IpAddr, port: u16) -> Result<Self> {
        Self::validate_port(port)?;
        Ok(Self { ip, port })
    }

    /// Port 0: the OS picks a free port at bind time.
    pub fn ephemeral(ip: IpAddr) -> Self {
        Self { ip, port: 0 }
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    fn validate_port(port: u16) -> Result<()> {
        if port == 0 {
            return Err(DomainError::InvalidPort);
        }
        Ok(())
    }
}
