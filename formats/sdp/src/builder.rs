use url::Url;

use crate::{
    attributes::{
        CapabilityConfig, MediaClock, PtimeCapability, media_direction::MediaDirection,
        refclk::RefClockSource, rtpmap::RtpMap,
    },
    session::{
        Connection, Encoding, IpFamily, Level, Originator, RefClock, SessionDescription, Stream,
    },
};

#[derive(Debug, Default)]
pub struct SessionBuilder {
    doc: SessionDescription,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn originator(
        mut self,
        username: &str,
        session_id: &str,
        session_version: &str,
        family: IpFamily,
        address: &str,
    ) -> Self {
        self.doc.originator = Originator {
            username: username.to_owned(),
            session_id: session_id.to_owned(),
            session_version: session_version.to_owned(),
            family,
            address: address.to_owned(),
        };
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.doc.name = name.to_owned();
        self
    }

    pub fn info(mut self, info: &str) -> Self {
        self.doc.info = Some(info.to_owned());
        self
    }

    pub fn uri(mut self, uri: Url) -> Self {
        self.doc.uri = Some(uri);
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.doc.email = Some(email.to_owned());
        self
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.doc.phone = Some(phone.to_owned());
        self
    }

    pub fn tool(mut self, tool: &str) -> Self {
        self.doc.tool = tool.to_owned();
        self
    }

    pub fn charset(mut self, charset: &str) -> Self {
        self.doc.charset = Some(charset.to_owned());
        self
    }

    pub fn mode(mut self, mode: MediaDirection) -> Self {
        self.doc.mode = Some(mode);
        self
    }

    pub fn ptp_domain(mut self, domain: u8) -> Self {
        self.doc.ptp_domain = Some(domain);
        self
    }

    pub fn mediaclk_offset(mut self, offset: u32) -> Self {
        self.doc.mediaclk = Some(MediaClock { offset });
        self
    }

    pub fn sync_time(mut self, sync_time: u32) -> Self {
        self.doc.sync_time = Some(sync_time);
        self
    }

    pub fn connection(
        mut self,
        family: IpFamily,
        address: &str,
        ttl: Option<u8>,
        naddr: u8,
    ) -> Self {
        self.doc.connections.push(Connection {
            level: Level::Session,
            family,
            address: address.to_owned(),
            ttl,
            naddr,
        });
        self
    }

    pub fn refclk(mut self, source: RefClockSource) -> Self {
        self.doc.refclks.push(RefClock {
            level: Level::Session,
            source,
        });
        self
    }

    /// Appends a stream; its encodings, connections and reference clocks are
    /// re-tagged with the new stream index.
    pub fn stream(mut self, stream: StreamBuilder) -> Self {
        let index = self.doc.streams.len();
        self.doc.streams.push(stream.stream);
        for rtpmap in stream.encodings {
            self.doc.encodings.push(Encoding {
                level: Level::Stream(index),
                rtpmap,
            });
        }
        for source in stream.refclks {
            self.doc.refclks.push(RefClock {
                level: Level::Stream(index),
                source,
            });
        }
        for mut connection in stream.connections {
            connection.level = Level::Stream(index);
            self.doc.connections.push(connection);
        }
        self
    }

    pub fn build(self) -> SessionDescription {
        self.doc
    }
}

#[derive(Debug, Default)]
pub struct StreamBuilder {
    stream: Stream,
    encodings: Vec<RtpMap>,
    refclks: Vec<RefClockSource>,
    connections: Vec<Connection>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn port(mut self, port: u16) -> Self {
        self.stream.port = port;
        self
    }

    pub fn nports(mut self, nports: u16) -> Self {
        self.stream.nports = Some(nports);
        self
    }

    pub fn info(mut self, info: &str) -> Self {
        self.stream.info = Some(info.to_owned());
        self
    }

    pub fn mode(mut self, mode: MediaDirection) -> Self {
        self.stream.mode = Some(mode);
        self
    }

    /// Adds an encoding row and lists its payload type on the `m=` line.
    pub fn encoding(mut self, rtpmap: RtpMap) -> Self {
        self.stream.payload_types.push(rtpmap.payload_type);
        self.encodings.push(rtpmap);
        self
    }

    pub fn ptime_us(mut self, ptime_us: u16) -> Self {
        self.stream.ptime_us = Some(ptime_us);
        self
    }

    pub fn maxptime_us(mut self, maxptime_us: u16) -> Self {
        self.stream.maxptime_us = Some(maxptime_us);
        self
    }

    pub fn ptime_cap(mut self, index: u8, ptime_us: u16) -> Self {
        self.stream.ptime_caps.push(PtimeCapability { index, ptime_us });
        self
    }

    pub fn cap_cfg(mut self, cfg: CapabilityConfig) -> Self {
        self.stream.cap_cfg = Some(cfg);
        self
    }

    pub fn refclk(mut self, source: RefClockSource) -> Self {
        self.refclks.push(source);
        self
    }

    pub fn mediaclk_offset(mut self, offset: u32) -> Self {
        self.stream.mediaclk = Some(MediaClock { offset });
        self
    }

    pub fn sync_time(mut self, sync_time: u32) -> Self {
        self.stream.sync_time = Some(sync_time);
        self
    }

    pub fn connection(
        mut self,
        family: IpFamily,
        address: &str,
        ttl: Option<u8>,
        naddr: u8,
    ) -> Self {
        self.connections.push(Connection {
            level: Level::Session,
            family,
            address: address.to_owned(),
            ttl,
            naddr,
        });
        self
    }
}
