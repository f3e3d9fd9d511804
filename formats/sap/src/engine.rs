//! Announcement engine: session directory, message handling policies and
//! the re-announcement / timeout scheduler.
//!
//! The engine is a plain value owned by the embedder; it never touches
//! sockets. Feed received datagrams into [`SapEngine::handle_message`],
//! call [`SapEngine::process`] on the embedder's cadence, and transmit
//! whatever [`SapEngine::build_announcement`] returns.

use std::{fmt, sync::Arc};

use sdp_formats::{SDP_MIMETYPE, session::SessionDescription};
use tokio_util::bytes::Bytes;
use utils::{
    net::NetworkAddress,
    random,
    system::{
        time::{Clock, SystemClock, Timestamp},
        timer::{Timer, TimerState},
    },
};

use crate::{
    SAP_BANDWIDTH_BPS, SAP_MIN_INTERVAL_SEC, SAP_MIN_TIMEOUT_SEC,
    errors::SapResult,
    packet::{SapMessageType, SapPacket, split_body},
    session::{
        SapSession, SessionHandle, SessionSource, SessionTable, message_signature,
    },
};

pub type DecompressFn = Box<dyn Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync>;

pub struct SapEngineConfig {
    /// Announcement bandwidth budget in bits per second.
    pub bandwidth_bps: u32,
    pub min_interval_sec: u32,
    pub min_timeout_sec: u32,
    /// Accept messages with a zero hash (SAPv2 recommends dropping them).
    pub allow_zero_hash: bool,
    /// Drop payloads whose MIME type is not `application/sdp`.
    pub sdp_only: bool,
    /// Silently ignore announcements whose signature matches the stored one.
    pub filter_duplicates: bool,
    /// Directory capacity; a full directory drops unknown announcements but
    /// still accepts updates and deletions for known sessions.
    pub max_sessions: Option<usize>,
    /// Hook for compressed payloads; without it they are dropped.
    pub decompress: Option<DecompressFn>,
    pub clock: Arc<dyn Clock>,
}

impl Default for SapEngineConfig {
    fn default() -> Self {
        Self {
            bandwidth_bps: SAP_BANDWIDTH_BPS,
            min_interval_sec: SAP_MIN_INTERVAL_SEC,
            min_timeout_sec: SAP_MIN_TIMEOUT_SEC,
            allow_zero_hash: false,
            sdp_only: true,
            filter_duplicates: true,
            max_sessions: None,
            decompress: None,
            clock: Arc::new(SystemClock),
        }
    }
}

impl fmt::Debug for SapEngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SapEngineConfig")
            .field("bandwidth_bps", &self.bandwidth_bps)
            .field("min_interval_sec", &self.min_interval_sec)
            .field("min_timeout_sec", &self.min_timeout_sec)
            .field("allow_zero_hash", &self.allow_zero_hash)
            .field("sdp_only", &self.sdp_only)
            .field("filter_duplicates", &self.filter_duplicates)
            .field("max_sessions", &self.max_sessions)
            .field("decompress", &self.decompress.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum SapEvent {
    New {
        session: SessionHandle,
        hash: u16,
        origin: NetworkAddress,
        payload_type: Option<String>,
        payload: Bytes,
    },
    Updated {
        session: SessionHandle,
        hash: u16,
        origin: NetworkAddress,
        payload_type: Option<String>,
        payload: Bytes,
    },
    Deleted {
        hash: u16,
        origin: NetworkAddress,
        payload: Bytes,
    },
    Timeout {
        hash: u16,
        origin: NetworkAddress,
    },
    /// A locally owned session is due for re-announcement.
    AnnouncementRequest {
        session: SessionHandle,
        hash: u16,
        origin: NetworkAddress,
    },
}

/// Interval computation result; `announce_sec` is `interval_sec` with the
/// transmission jitter applied.
#[derive(Debug, Clone, Copy)]
pub struct ComputedTimes {
    pub interval_sec: u32,
    pub announce_sec: u32,
    pub timeout_sec: u32,
}

#[derive(Debug)]
pub struct SapEngine {
    config: SapEngineConfig,
    sessions: SessionTable,
    /// Size of the last transmitted announcement, drives the interval.
    announcement_size: u16,
    announcement_sec: u32,
    timeout_sec: u32,
    announcement_timer: Timer,
    timeout_timer: Timer,
}

impl SapEngine {
    pub fn new(config: SapEngineConfig) -> Self {
        let timeout_sec = config.min_timeout_sec;
        Self {
            config,
            sessions: SessionTable::new(),
            announcement_size: 0,
            announcement_sec: 0,
            timeout_sec,
            announcement_timer: Timer::new(),
            timeout_timer: Timer::new(),
        }
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    pub fn timeout_window_sec(&self) -> u32 {
        self.timeout_sec
    }

    pub fn announcement_interval_sec(&self) -> u32 {
        self.announcement_sec
    }

    /// Announcement and timeout windows for a directory of `no_of_ads`
    /// sessions and the given last-announcement size.
    pub fn compute_times(&self, no_of_ads: usize, announcement_size: u16) -> ComputedTimes {
        if no_of_ads == 0 || announcement_size == 0 {
            return ComputedTimes {
                interval_sec: 0,
                announce_sec: 0,
                timeout_sec: self.config.min_timeout_sec,
            };
        }
        let raw =
            8 * announcement_size as u64 * no_of_ads as u64 / self.config.bandwidth_bps.max(1) as u64;
        let interval_sec = (raw as u32).max(self.config.min_interval_sec);
        // next transmission jittered uniformly within +- interval / 3
        let span = 2 * (interval_sec as i64) / 3;
        let offset = if span > 0 {
            (random::random_u32() as i64).rem_euclid(span) - interval_sec as i64 / 3
        } else {
            0
        };
        ComputedTimes {
            interval_sec,
            announce_sec: (interval_sec as i64 + offset).max(1) as u32,
            timeout_sec: (10 * interval_sec).max(self.config.min_timeout_sec),
        }
    }

    /// Handles one received datagram, returning the resulting directory
    /// events. Malformed or filtered messages are dropped without error.
    pub fn handle_message(&mut self, msg: &[u8]) -> Vec<SapEvent> {
        let mut events = Vec::new();
        let packet = match SapPacket::parse(msg) {
            Ok(packet) => packet,
            Err(err) => {
                tracing::debug!("dropping malformed sap message: {}", err);
                return events;
            }
        };
        if packet.encrypted {
            tracing::debug!("dropping encrypted sap message from {}", packet.origin);
            return events;
        }
        if packet.hash == 0 && !self.config.allow_zero_hash {
            tracing::debug!("dropping sap message with zero hash from {}", packet.origin);
            return events;
        }

        let existing = self.sessions.find(packet.hash, &packet.origin);
        if let Some(handle) = existing
            && let Some(session) = self.sessions.get(handle)
            && session.source == SessionSource::Local
        {
            // our own announcement echoed back by the network
            return events;
        }

        let body = if packet.compressed {
            let Some(decompress) = self.config.decompress.as_ref() else {
                tracing::debug!("dropping compressed sap message, no decompressor configured");
                return events;
            };
            match decompress(&packet.body) {
                Some(data) if !data.is_empty() => Bytes::from(data),
                _ => {
                    tracing::debug!("dropping sap message that failed to decompress");
                    return events;
                }
            }
        } else {
            packet.body.clone()
        };

        let (payload_type, payload) = match split_body(packet.message_type, &body) {
            Ok(split) => split,
            Err(err) => {
                tracing::debug!("dropping sap message with bad payload framing: {}", err);
                return events;
            }
        };
        if self.config.sdp_only && payload_type.is_some() {
            tracing::debug!(
                "dropping sap message with payload type {:?}",
                payload_type
            );
            return events;
        }

        let now = self.config.clock.now_ms();
        match packet.message_type {
            SapMessageType::Announce => {
                let signature = message_signature(msg);
                if let Some(handle) = existing {
                    let Some(session) = self.sessions.get_mut(handle) else {
                        return events;
                    };
                    if self.config.filter_duplicates && session.signature == signature {
                        session.last_activity = now;
                        return events;
                    }
                    session.last_activity = now;
                    session.signature = signature;
                    session.payload = payload.clone();
                    session.payload_type = payload_type.clone();
                    session.originator = parse_originator(&payload);
                    events.push(SapEvent::Updated {
                        session: handle,
                        hash: packet.hash,
                        origin: packet.origin,
                        payload_type,
                        payload,
                    });
                } else {
                    if let Some(max) = self.config.max_sessions
                        && self.sessions.len() >= max
                    {
                        tracing::warn!(
                            "session directory full ({} entries), dropping announcement from {}",
                            max,
                            packet.origin
                        );
                        return events;
                    }
                    let handle = self.sessions.insert(SapSession {
                        source: SessionSource::Remote,
                        hash: packet.hash,
                        origin: packet.origin,
                        last_activity: now,
                        payload: payload.clone(),
                        payload_type: payload_type.clone(),
                        originator: parse_originator(&payload),
                        signature,
                    });
                    events.push(SapEvent::New {
                        session: handle,
                        hash: packet.hash,
                        origin: packet.origin,
                        payload_type,
                        payload,
                    });
                }
            }
            SapMessageType::Delete => {
                events.push(SapEvent::Deleted {
                    hash: packet.hash,
                    origin: packet.origin,
                    payload,
                });
                if let Some(handle) = existing {
                    self.sessions.remove(handle);
                }
            }
        }
        events
    }

    /// One cooperative tick: evict timed-out sessions, re-arm the timeout
    /// timer, emit announcement requests for due local sessions, re-arm the
    /// announcement timer.
    pub fn process(&mut self) -> Vec<SapEvent> {
        let now = self.config.clock.now_ms();
        let mut events = Vec::new();
        self.timeouts_cleanup(now, &mut events);
        self.set_timeout_timer(now);
        self.announcement_check(now, &mut events);
        self.set_announcement_timer(now);
        events
    }

    fn timeouts_cleanup(&mut self, now: Timestamp, events: &mut Vec<SapEvent>) {
        if self.timeout_timer.state(now) != TimerState::Expired {
            return;
        }
        let timeout_after_ms = 1000 * self.timeout_sec as u64;
        for handle in self.sessions.handles() {
            let Some(session) = self.sessions.get(handle) else {
                continue;
            };
            if session.source != SessionSource::Remote {
                continue;
            }
            let age = now.saturating_sub(session.last_activity);
            if age > timeout_after_ms {
                tracing::info!(
                    "session {:#06x}@{} timed out after {} ms",
                    session.hash,
                    session.origin,
                    age
                );
                events.push(SapEvent::Timeout {
                    hash: session.hash,
                    origin: session.origin,
                });
                self.sessions.remove(handle);
            }
        }
        self.timeout_timer.unset();
    }

    fn set_timeout_timer(&mut self, now: Timestamp) {
        if self.sessions.remote_count() == 0 {
            return;
        }
        if self.timeout_timer.state(now) != TimerState::Unset {
            return;
        }
        let times = self.compute_times(self.sessions.len(), self.announcement_size);
        self.timeout_sec = times.timeout_sec;
        let delay = self.delay_until_oldest(SessionSource::Remote, 1000 * self.timeout_sec as u64, now);
        self.timeout_timer.set(now, delay);
    }

    fn announcement_check(&mut self, now: Timestamp, events: &mut Vec<SapEvent>) {
        if self.announcement_timer.state(now) != TimerState::Expired {
            return;
        }
        let due_after_ms = 1000 * self.announcement_sec as u64;
        for handle in self.sessions.handles() {
            let Some(session) = self.sessions.get(handle) else {
                continue;
            };
            if session.source != SessionSource::Local {
                continue;
            }
            if now.saturating_sub(session.last_activity) > due_after_ms {
                events.push(SapEvent::AnnouncementRequest {
                    session: handle,
                    hash: session.hash,
                    origin: session.origin,
                });
            }
        }
        self.announcement_timer.unset();
    }

    fn set_announcement_timer(&mut self, now: Timestamp) {
        if self.sessions.local_count() == 0 || self.announcement_size == 0 {
            return;
        }
        if self.announcement_timer.state(now) != TimerState::Unset {
            return;
        }
        let times = self.compute_times(self.sessions.len(), self.announcement_size);
        self.announcement_sec = times.announce_sec;
        let delay =
            self.delay_until_oldest(SessionSource::Local, 1000 * self.announcement_sec as u64, now);
        self.announcement_timer.set(now, delay);
    }

    /// Milliseconds until the oldest `source` session reaches `after_ms` of
    /// inactivity; 0 when one already has.
    fn delay_until_oldest(&self, source: SessionSource, after_ms: u64, now: Timestamp) -> u64 {
        let mut oldest = 0u64;
        for (_, session) in self.sessions.iter() {
            if session.source != source {
                continue;
            }
            let age = now.saturating_sub(session.last_activity);
            if age > oldest {
                oldest = age;
                if oldest > after_ms {
                    return 0;
                }
            }
        }
        after_ms - oldest
    }

    /// Builds an announcement datagram for a locally owned session and
    /// registers (or refreshes) its directory record.
    pub fn build_announcement(
        &mut self,
        hash: u16,
        origin: NetworkAddress,
        sdp: &SessionDescription,
    ) -> SapResult<Bytes> {
        let payload = sdp.to_string();
        let packet = SapPacket::build(
            SapMessageType::Announce,
            hash,
            &origin,
            Some(SDP_MIMETYPE),
            payload.as_bytes(),
        )?;
        self.announcement_size = packet.len() as u16;

        let now = self.config.clock.now_ms();
        match self.sessions.find(hash, &origin) {
            Some(handle) => {
                if let Some(session) = self.sessions.get_mut(handle) {
                    session.last_activity = now;
                    session.payload = Bytes::from(payload.into_bytes());
                    session.originator = Some(sdp.originator.clone());
                }
            }
            None => {
                if let Some(max) = self.config.max_sessions
                    && self.sessions.len() >= max
                {
                    tracing::warn!(
                        "session directory full, local session {:#06x} not tracked",
                        hash
                    );
                } else {
                    self.sessions.insert(SapSession {
                        source: SessionSource::Local,
                        hash,
                        origin,
                        last_activity: now,
                        payload: Bytes::from(payload.into_bytes()),
                        payload_type: None,
                        originator: Some(sdp.originator.clone()),
                        signature: message_signature(&packet),
                    });
                }
            }
        }
        Ok(packet)
    }

    /// Builds a deletion datagram (`o=` line payload) and drops the local
    /// directory record.
    pub fn build_deletion(
        &mut self,
        hash: u16,
        origin: NetworkAddress,
        sdp: &SessionDescription,
    ) -> SapResult<Bytes> {
        let payload = sdp.origin_line();
        let packet = SapPacket::build(
            SapMessageType::Delete,
            hash,
            &origin,
            Some(SDP_MIMETYPE),
            payload.as_bytes(),
        )?;
        self.announcement_size = packet.len() as u16;
        if let Some(handle) = self.sessions.find(hash, &origin) {
            self.sessions.remove(handle);
        }
        Ok(packet)
    }
}

fn parse_originator(payload: &[u8]) -> Option<sdp_formats::session::Originator> {
    let text = std::str::from_utf8(payload).ok()?;
    text.parse::<SessionDescription>()
        .ok()
        .map(|doc| doc.originator)
}
