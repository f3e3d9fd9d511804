//! Session directory records and their slab storage.

use sdp_formats::session::Originator;
use tokio_util::bytes::Bytes;
use utils::{net::NetworkAddress, system::time::Timestamp};

/// Whether a record is owned by this host (announced by us) or was observed
/// on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Local,
    Remote,
}

/// Stable reference to a directory slot; remains valid until the session is
/// removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub(crate) usize);

/// One announced session, identified by (message hash, originating IP).
#[derive(Debug, Clone)]
pub struct SapSession {
    pub source: SessionSource,
    pub hash: u16,
    pub origin: NetworkAddress,
    pub last_activity: Timestamp,
    /// Current full payload, copied in.
    pub payload: Bytes,
    pub payload_type: Option<String>,
    /// Parsed originator when the payload is a readable session description.
    pub originator: Option<Originator>,
    /// Signature of the last accepted wire message.
    pub signature: u8,
}

/// Additive 8-bit signature of a wire message, for duplicate suppression.
pub fn message_signature(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    (sum ^ 0xff).wrapping_add(1)
}

/// Slab of session records with stable indices and a free list. Local and
/// remote sessions are counted separately; a record's classification is
/// captured before removal so the counters always reflect it.
#[derive(Debug, Default)]
pub struct SessionTable {
    slots: Vec<Option<SapSession>>,
    free: Vec<usize>,
    local: usize,
    remote: usize,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.local + self.remote
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn local_count(&self) -> usize {
        self.local
    }

    pub fn remote_count(&self) -> usize {
        self.remote
    }

    pub fn get(&self, handle: SessionHandle) -> Option<&SapSession> {
        self.slots.get(handle.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, handle: SessionHandle) -> Option<&mut SapSession> {
        self.slots.get_mut(handle.0).and_then(|slot| slot.as_mut())
    }

    pub fn find(&self, hash: u16, origin: &NetworkAddress) -> Option<SessionHandle> {
        self.iter()
            .find(|(_, session)| session.hash == hash && session.origin == *origin)
            .map(|(handle, _)| handle)
    }

    pub fn insert(&mut self, session: SapSession) -> SessionHandle {
        match session.source {
            SessionSource::Local => self.local += 1,
            SessionSource::Remote => self.remote += 1,
        }
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(session);
                SessionHandle(index)
            }
            None => {
                self.slots.push(Some(session));
                SessionHandle(self.slots.len() - 1)
            }
        }
    }

    pub fn remove(&mut self, handle: SessionHandle) -> Option<SapSession> {
        let session = self.slots.get_mut(handle.0).and_then(|slot| slot.take())?;
        // classification captured from the removed record, not the slot
        match session.source {
            SessionSource::Local => self.local -= 1,
            SessionSource::Remote => self.remote -= 1,
        }
        self.free.push(handle.0);
        Some(session)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SessionHandle, &SapSession)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|session| (SessionHandle(index), session)))
    }

    pub fn handles(&self) -> Vec<SessionHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }
}
