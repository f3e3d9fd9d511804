use std::net::Ipv4Addr;

use sap_formats::SAP_PORT;

use crate::scope::SapScope;

#[derive(Debug, Clone)]
pub struct SapServerConfig {
    /// Scopes whose multicast groups are joined for reception.
    pub listen_scopes: Vec<SapScope>,
    /// Scopes announcements are transmitted on.
    pub send_scopes: Vec<SapScope>,
    pub port: u16,
    /// Interface for IPv4 multicast membership.
    pub ipv4_interface: Ipv4Addr,
    /// Interface index for IPv6 multicast membership, 0 for the default.
    pub ipv6_interface: u32,
}

impl Default for SapServerConfig {
    fn default() -> Self {
        Self {
            listen_scopes: vec![SapScope::Ipv4Global],
            send_scopes: vec![SapScope::Ipv4Global],
            port: SAP_PORT,
            ipv4_interface: Ipv4Addr::UNSPECIFIED,
            ipv6_interface: 0,
        }
    }
}
