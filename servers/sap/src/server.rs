use std::{
    collections::HashMap,
    io,
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use sap_formats::{
    SAP_TTL,
    engine::{SapEngine, SapEngineConfig, SapEvent},
};
use sdp_formats::session::SessionDescription;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::{net::UdpSocket, sync::mpsc::UnboundedSender};
use utils::net::NetworkAddress;

use crate::{
    config::SapServerConfig,
    errors::{SapServerError, SapServerResult},
    scope::SapScope,
};

/// Multicast front end of the announcement engine: joins the configured
/// scopes, feeds received datagrams into the engine, re-announces locally
/// owned sessions on the engine's cadence and forwards directory events to
/// the embedder.
pub struct SapServer {
    config: SapServerConfig,
    engine: SapEngine,
    socket_v4: Option<UdpSocket>,
    socket_v6: Option<UdpSocket>,
    /// Descriptions of sessions owned by this host, for re-announcement.
    local_sessions: HashMap<(u16, NetworkAddress), SessionDescription>,
    event_sender: UnboundedSender<SapEvent>,
    rx_buffer: Vec<u8>,
}

fn bind_reusable(addr: SocketAddr) -> io::Result<std::net::UdpSocket> {
    let domain = match addr {
        SocketAddr::V4(_) => Domain::IPV4,
        SocketAddr::V6(_) => Domain::IPV6,
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    if addr.is_ipv6() {
        socket.set_only_v6(true)?;
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    Ok(socket.into())
}

impl SapServer {
    pub async fn start(
        config: SapServerConfig,
        engine_config: SapEngineConfig,
        event_sender: UnboundedSender<SapEvent>,
    ) -> SapServerResult<Self> {
        if config.listen_scopes.is_empty() && config.send_scopes.is_empty() {
            return Err(SapServerError::InvalidConfig(
                "neither listen nor send scopes configured".to_owned(),
            ));
        }

        let wants_v4 = |scopes: &[SapScope]| scopes.iter().any(|scope| !scope.is_ipv6());
        let wants_v6 = |scopes: &[SapScope]| scopes.iter().any(|scope| scope.is_ipv6());

        let mut socket_v4 = None;
        if wants_v4(&config.listen_scopes) || wants_v4(&config.send_scopes) {
            let std_socket = bind_reusable(SocketAddr::new(
                IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
                config.port,
            ))?;
            let socket = UdpSocket::from_std(std_socket)?;
            socket.set_multicast_ttl_v4(SAP_TTL)?;
            for scope in &config.listen_scopes {
                if let IpAddr::V4(group) = scope.group() {
                    socket.join_multicast_v4(group, config.ipv4_interface)?;
                    tracing::info!("joined multicast group {}", group);
                }
            }
            socket_v4 = Some(socket);
        }

        let mut socket_v6 = None;
        if wants_v6(&config.listen_scopes) || wants_v6(&config.send_scopes) {
            let std_socket = bind_reusable(SocketAddr::new(
                IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED),
                config.port,
            ))?;
            let socket = UdpSocket::from_std(std_socket)?;
            for scope in &config.listen_scopes {
                if let IpAddr::V6(group) = scope.group() {
                    socket.join_multicast_v6(&group, config.ipv6_interface)?;
                    tracing::info!("joined multicast group {}", group);
                }
            }
            socket_v6 = Some(socket);
        }

        tracing::info!("sap server is up with config: {:?}", config);
        Ok(Self {
            config,
            engine: SapEngine::new(engine_config),
            socket_v4,
            socket_v6,
            local_sessions: HashMap::new(),
            event_sender,
            rx_buffer: vec![0; 65536],
        })
    }

    pub fn engine(&self) -> &SapEngine {
        &self.engine
    }

    /// Registers a locally owned session and announces it on every send
    /// scope. Also used to publish an updated description.
    pub async fn session_add(
        &mut self,
        hash: u16,
        origin: NetworkAddress,
        sdp: SessionDescription,
    ) -> SapServerResult<()> {
        let message = self.engine.build_announcement(hash, origin, &sdp)?;
        self.local_sessions.insert((hash, origin), sdp);
        self.send_to_scopes(&message).await
    }

    /// Announces a deletion and forgets the session.
    pub async fn session_remove(
        &mut self,
        hash: u16,
        origin: NetworkAddress,
    ) -> SapServerResult<()> {
        let Some(sdp) = self.local_sessions.remove(&(hash, origin)) else {
            return Err(SapServerError::InvalidConfig(format!(
                "session {:#06x}@{} is not registered",
                hash, origin
            )));
        };
        let message = self.engine.build_deletion(hash, origin, &sdp)?;
        self.send_to_scopes(&message).await
    }

    async fn send_to_scopes(&self, message: &[u8]) -> SapServerResult<()> {
        for scope in &self.config.send_scopes {
            let target = SocketAddr::new(scope.group(), self.config.port);
            let socket = match target {
                SocketAddr::V4(_) => self.socket_v4.as_ref(),
                SocketAddr::V6(_) => self.socket_v6.as_ref(),
            };
            let Some(socket) = socket else {
                continue;
            };
            if let Err(err) = socket.send_to(message, target).await {
                tracing::error!("sending announcement to {} failed: {}", target, err);
            } else {
                tracing::debug!("sent {} announcement bytes to {}", message.len(), target);
            }
        }
        Ok(())
    }

    /// One non-blocking pass: at most one datagram per socket, then one
    /// engine tick.
    pub async fn process(&mut self) -> SapServerResult<()> {
        let mut received = Vec::new();
        for socket in [self.socket_v4.as_ref(), self.socket_v6.as_ref()]
            .into_iter()
            .flatten()
        {
            match socket.try_recv_from(&mut self.rx_buffer) {
                Ok((len, from)) => {
                    tracing::trace!("received {} bytes from {}", len, from);
                    received.push(self.rx_buffer[..len].to_vec());
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {}
                Err(err) => return Err(err.into()),
            }
        }
        let mut events = Vec::new();
        for datagram in received {
            events.extend(self.engine.handle_message(&datagram));
        }
        events.extend(self.engine.process());
        for event in events {
            self.dispatch_event(event).await?;
        }
        Ok(())
    }

    async fn dispatch_event(&mut self, event: SapEvent) -> SapServerResult<()> {
        match event {
            SapEvent::AnnouncementRequest { hash, origin, .. } => {
                let Some(sdp) = self.local_sessions.get(&(hash, origin)).cloned() else {
                    tracing::warn!(
                        "announcement requested for unknown session {:#06x}@{}",
                        hash,
                        origin
                    );
                    return Ok(());
                };
                let message = self.engine.build_announcement(hash, origin, &sdp)?;
                self.send_to_scopes(&message).await?;
            }
            event => {
                // directory changes are the embedder's business
                let _ = self.event_sender.send(event);
            }
        }
        Ok(())
    }

    /// Cooperative loop around [`SapServer::process`], waking on socket
    /// readability or a coarse tick for the timers.
    pub async fn run(&mut self) -> SapServerResult<()> {
        let mut ticker = tokio::time::interval(Duration::from_millis(500));
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                result = Self::readable(&self.socket_v4), if self.socket_v4.is_some() => result?,
                result = Self::readable(&self.socket_v6), if self.socket_v6.is_some() => result?,
            }
            self.process().await?;
        }
    }

    async fn readable(socket: &Option<UdpSocket>) -> io::Result<()> {
        match socket {
            Some(socket) => socket.readable().await,
            None => futures::future::pending().await,
        }
    }
}
