//! Collaborator interface for DNS-SD style service discovery.
//!
//! The discovery and transport core never speaks multicast DNS itself; an
//! external library implements this trait and delivers events through the
//! registered callbacks.

#[derive(Debug, Clone)]
pub enum DiscoveryEvent {
    Discovered {
        service_type: String,
        name: String,
        domain: String,
        host: Option<String>,
        port: u16,
        txt: Vec<(String, String)>,
    },
    Terminated,
    Error(String),
}

pub type DiscoveryCallback = Box<dyn FnMut(DiscoveryEvent) + Send>;

/// Opaque handle to a running browse/resolve/publish operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceHandle(pub u64);

pub trait ServiceDiscovery {
    type Error;

    fn browse(
        &mut self,
        service_type: &str,
        domain: &str,
        callback: DiscoveryCallback,
    ) -> Result<ServiceHandle, Self::Error>;

    fn resolve(
        &mut self,
        service_type: &str,
        name: &str,
        domain: &str,
        callback: DiscoveryCallback,
    ) -> Result<ServiceHandle, Self::Error>;

    #[allow(clippy::too_many_arguments)]
    fn publish_service(
        &mut self,
        service_type: &str,
        name: &str,
        host: &str,
        port: u16,
        txt: &[(String, String)],
        callback: DiscoveryCallback,
    ) -> Result<ServiceHandle, Self::Error>;

    fn add_record(
        &mut self,
        service: ServiceHandle,
        rrtype: u16,
        rdata: &[u8],
        ttl: u32,
    ) -> Result<(), Self::Error>;

    fn stop(&mut self, service: ServiceHandle);
}
