use std::net::{IpAddr, Ipv4Addr};

use rtsp_formats::consts::common::RTSP_DEFAULT_PORT;

#[derive(Debug, Clone)]
pub struct RtspServerConfig {
    pub address: IpAddr,
    pub port: u16,
    /// Answer HTTP requests through the registered handler instead of
    /// closing the connection.
    pub http_enabled: bool,
}

impl Default for RtspServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: RTSP_DEFAULT_PORT,
            http_enabled: false,
        }
    }
}
