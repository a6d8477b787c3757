//! # Protocol Variants
//!
//! A protocol revision is a static table of packet rules plus an optional link to the
//! revision it derives from. Looking up a packet walks the chain from the outermost
//! revision to the base and uses the first rule found, so a derived revision only
//! restates the packets whose layout changed.
//!
//! The user status fragment, which several packets embed, is resolved the same way
//! but always from the outermost revision. A base-revision writer for a packet that
//! embeds a status therefore picks up the derived revision's status layout without
//! being restated.
//!
//! [`ProtocolVariant`] binds a revision to a reader role, a compression framer, and a
//! diagnostic sink. It is immutable and can be shared across threads.

use crate::config::{CodecConfig, VariantConfig};
use crate::core::cursor::ByteCursor;
use crate::core::frame::{CompressionFramer, FrameHeader, RawPacket};
use crate::error::{ProtocolError, Result};
use crate::protocol::packet_type::{PacketType, Role};
use crate::protocol::payload::Payload;
use crate::types::UserStatus;
use crate::utils::metrics::{DiagnosticSink, TracingSink};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::instrument;

/// Decodes one packet body
pub type ReadFn = fn(&ProtocolVariant, &mut ByteCursor) -> Result<Payload>;

/// Encodes one payload into the body of the given packet
pub type WriteFn = fn(&ProtocolVariant, PacketType, &Payload, &mut ByteCursor) -> Result<()>;

/// Encoding rule for one packet type
pub struct PacketRule {
    pub packet: PacketType,
    pub read: ReadFn,
    pub write: WriteFn,
}

impl fmt::Debug for PacketRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketRule")
            .field("packet", &self.packet)
            .finish_non_exhaustive()
    }
}

/// Layout of the user status fragment
pub struct StatusRule {
    pub read: fn(&mut ByteCursor) -> Result<UserStatus>,
    pub write: fn(&UserStatus, &mut ByteCursor),
}

impl fmt::Debug for StatusRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusRule").finish_non_exhaustive()
    }
}

/// One link of a revision chain
#[derive(Debug)]
pub struct Revision {
    pub version: u32,
    pub name: &'static str,
    pub description: &'static str,
    /// Packets this revision defines or restates
    pub rules: &'static [PacketRule],
    /// Status fragment override, if the layout changed in this revision
    pub status: Option<StatusRule>,
    pub parent: Option<&'static Revision>,
}

impl Revision {
    /// Iterate from this revision down to the base
    pub fn chain(&'static self) -> impl Iterator<Item = &'static Revision> {
        std::iter::successors(Some(self), |revision| revision.parent)
    }

    /// First rule for `packet` along the chain
    pub fn rule(&'static self, packet: PacketType) -> Option<&'static PacketRule> {
        self.chain()
            .find_map(|revision| revision.rules.iter().find(|rule| rule.packet == packet))
    }

    /// Status layout of the outermost revision that defines one
    pub fn status_rule(&'static self) -> Option<&'static StatusRule> {
        self.chain().find_map(|revision| revision.status.as_ref())
    }
}

/// Summary of a supported revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub version: u32,
    pub name: &'static str,
    pub description: &'static str,
    /// Version of the revision this one derives from
    pub base: Option<u32>,
}

impl From<&Revision> for ClientInfo {
    fn from(revision: &Revision) -> Self {
        Self {
            version: revision.version,
            name: revision.name,
            description: revision.description,
            base: revision.parent.map(|parent| parent.version),
        }
    }
}

/// Result of decoding a buffer holding several frames.
///
/// Decoding stops at the first error; every packet decoded before it is kept.
#[derive(Debug, Default)]
pub struct PacketBatch {
    pub packets: Vec<(PacketType, Payload)>,
    pub error: Option<ProtocolError>,
}

impl PacketBatch {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discard partial results if decoding failed
    pub fn into_result(self) -> Result<Vec<(PacketType, Payload)>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.packets),
        }
    }
}

/// Extract the expected payload variant, or fail with `InvalidPayloadVariant`
macro_rules! unpack {
    ($payload:expr, $packet:expr, $pattern:pat => $value:expr) => {
        match $payload {
            $pattern => $value,
            other => {
                return Err($crate::error::ProtocolError::InvalidPayloadVariant {
                    expected: $packet,
                    actual: other.packet_type(),
                })
            }
        }
    };
}

pub(crate) use unpack;

/// A protocol revision bound to a role and diagnostics
#[derive(Debug, Clone)]
pub struct ProtocolVariant {
    revision: &'static Revision,
    config: VariantConfig,
    role: Role,
    framer: CompressionFramer,
    sink: Arc<dyn DiagnosticSink>,
}

impl ProtocolVariant {
    /// Server-role variant with default compression and tracing diagnostics
    pub fn new(revision: &'static Revision) -> Self {
        let config = VariantConfig::new(revision.version);
        let framer = CompressionFramer::new(
            crate::config::DEFAULT_COMPRESSION_LEVEL,
            !config.disable_compression(),
        );
        Self {
            revision,
            config,
            role: Role::default(),
            framer,
            sink: Arc::new(TracingSink::default()),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.framer = CompressionFramer::new(level, !self.config.disable_compression());
        self
    }

    /// Apply role, compression level, and logging settings
    pub fn configured(self, config: &CodecConfig) -> Self {
        self.with_role(config.role)
            .with_compression_level(config.compression_level)
            .with_sink(Arc::new(TracingSink::new(&config.logging)))
    }

    pub fn version(&self) -> u32 {
        self.config.version()
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn revision(&self) -> &'static Revision {
        self.revision
    }

    pub fn info(&self) -> ClientInfo {
        ClientInfo::from(self.revision)
    }

    /// Whether any revision in the chain has a rule for `packet`
    pub fn implements(&self, packet: PacketType) -> bool {
        self.revision.rule(packet).is_some()
    }

    /// Packets this revision restates instead of inheriting
    pub fn overridden_packets(&self) -> Vec<PacketType> {
        self.revision.rules.iter().map(|rule| rule.packet).collect()
    }

    /// Every packet the chain can encode or decode, in id order
    pub fn implemented_packets(&self) -> Vec<PacketType> {
        PacketType::ALL
            .iter()
            .copied()
            .filter(|packet| self.implements(*packet))
            .collect()
    }

    /// Chat link markup understood by this revision's clients
    pub fn format_chat_link(&self, text: &str, url: &str) -> String {
        format!("[{url} {text}]")
    }

    /// Decode a user status with the outermost status layout
    pub fn read_status(&self, cursor: &mut ByteCursor) -> Result<UserStatus> {
        (self.status_rule()?.read)(cursor)
    }

    /// Encode a user status with the outermost status layout
    pub fn write_status(&self, status: &UserStatus, cursor: &mut ByteCursor) -> Result<()> {
        (self.status_rule()?.write)(status, cursor);
        Ok(())
    }

    fn status_rule(&self) -> Result<&'static StatusRule> {
        self.revision
            .status_rule()
            .ok_or(ProtocolError::UnimplementedForRevision {
                packet: PacketType::OsuUserStatus,
                version: self.version(),
            })
    }

    fn rule(&self, packet: PacketType) -> Result<&'static PacketRule> {
        self.revision
            .rule(packet)
            .ok_or(ProtocolError::UnimplementedForRevision {
                packet,
                version: self.version(),
            })
    }

    /// Decode an uncompressed packet body
    pub fn decode_payload(&self, packet: PacketType, bytes: &[u8]) -> Result<Payload> {
        let rule = self.rule(packet)?;
        let mut cursor = ByteCursor::from(bytes);
        (rule.read)(self, &mut cursor)
    }

    /// Encode a payload into an uncompressed packet body
    pub fn encode_payload(&self, packet: PacketType, payload: &Payload) -> Result<Vec<u8>> {
        let rule = self.rule(packet)?;
        if payload.packet_type() != packet {
            return Err(ProtocolError::InvalidPayloadVariant {
                expected: packet,
                actual: payload.packet_type(),
            });
        }

        let mut cursor = ByteCursor::new();
        (rule.write)(self, packet, payload, &mut cursor)?;
        Ok(cursor.into_vec())
    }

    /// Read one frame from `cursor`.
    ///
    /// A frame that is not fully buffered yields `BoundsViolation` and consumes
    /// nothing. Any other error steps past the frame, so the next call reads the
    /// frame after it. A rejected header whose body is not yet buffered consumes
    /// only the header.
    pub fn read_packet(&self, cursor: &mut ByteCursor) -> Result<(PacketType, Payload)> {
        let result = self
            .framer
            .read_frame(cursor, self.role)
            .and_then(|raw| self.decode_raw(raw));
        self.observe_read(result)
    }

    /// Encode `payload` as `packet` and append the frame to `cursor`
    pub fn write_packet(
        &self,
        cursor: &mut ByteCursor,
        packet: PacketType,
        payload: &Payload,
    ) -> Result<()> {
        let frame = self.encode_frame(packet, payload)?;
        cursor.write(&frame);
        Ok(())
    }

    /// Encode a payload under its own packet type
    pub fn write_payload(&self, cursor: &mut ByteCursor, payload: &Payload) -> Result<()> {
        self.write_packet(cursor, payload.packet_type(), payload)
    }

    /// Decode every complete frame in `data`.
    ///
    /// Trailing bytes shorter than a header end the batch without error.
    pub fn read_many(&self, data: &[u8]) -> PacketBatch {
        let mut cursor = ByteCursor::from(data);
        let mut batch = PacketBatch::default();

        while cursor.remaining() >= self.config.header_size() {
            match self.read_packet(&mut cursor) {
                Ok(packet) => batch.packets.push(packet),
                Err(error) => {
                    batch.error = Some(error);
                    break;
                }
            }
        }
        batch
    }

    /// Concatenate the frames of every payload
    pub fn write_many(&self, payloads: &[Payload]) -> Result<Vec<u8>> {
        let mut cursor = ByteCursor::new();
        for payload in payloads {
            self.write_payload(&mut cursor, payload)?;
        }
        Ok(cursor.into_vec())
    }

    /// Read one frame from an async stream.
    ///
    /// Suspends on the header and body reads only. If the future is dropped midway
    /// the stream may sit inside a frame and must be discarded.
    #[instrument(skip(self, reader), level = "debug", fields(version = self.version()))]
    pub async fn read_packet_async<R>(&self, reader: &mut R) -> Result<(PacketType, Payload)>
    where
        R: AsyncRead + Unpin,
    {
        let result: Result<(PacketType, Payload)> = async {
            let mut header = [0u8; crate::config::HEADER_SIZE];
            reader.read_exact(&mut header).await?;
            let header = FrameHeader::parse(&header, self.role)?;

            let mut body = vec![0u8; header.length];
            reader.read_exact(&mut body).await?;

            let raw = self.framer.unwrap_body(header, &body)?;
            self.decode_raw(raw)
        }
        .await;
        self.observe_read(result)
    }

    /// Write one frame to an async stream and flush it.
    ///
    /// The frame is fully encoded before the first write, so encoding errors never
    /// leave a partial frame on the stream.
    #[instrument(skip(self, writer, payload), level = "debug", fields(version = self.version()))]
    pub async fn write_packet_async<W>(&self, writer: &mut W, payload: &Payload) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let frame = self.encode_frame(payload.packet_type(), payload)?;
        writer.write_all(&frame).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Validate a frame header against this variant's role
    pub fn parse_header(&self, bytes: &[u8]) -> Result<FrameHeader> {
        self.observe_read(FrameHeader::parse(bytes, self.role))
    }

    /// Decompress and decode a body whose header has already been validated
    pub fn decode_frame(&self, header: FrameHeader, body: &[u8]) -> Result<(PacketType, Payload)> {
        let result = self
            .framer
            .unwrap_body(header, body)
            .and_then(|raw| self.decode_raw(raw));
        self.observe_read(result)
    }

    fn decode_raw(&self, raw: RawPacket) -> Result<(PacketType, Payload)> {
        let payload = self.decode_payload(raw.packet, &raw.bytes)?;
        self.sink
            .packet_read(self.version(), raw.packet, raw.bytes.len());
        Ok((raw.packet, payload))
    }

    /// Build a complete frame for `payload` encoded as `packet`
    pub fn encode_frame(&self, packet: PacketType, payload: &Payload) -> Result<Vec<u8>> {
        let result = self.try_encode_frame(packet, payload);
        match &result {
            Ok(frame) => self.sink.packet_written(
                self.version(),
                packet,
                frame.len() - crate::config::HEADER_SIZE,
            ),
            Err(error) => self.sink.write_failed(self.version(), error),
        }
        result
    }

    fn try_encode_frame(&self, packet: PacketType, payload: &Payload) -> Result<Vec<u8>> {
        if !packet.writable_by(self.role) {
            return Err(ProtocolError::DirectionMismatch {
                packet,
                role: self.role,
            });
        }

        let bytes = self.encode_payload(packet, payload)?;
        self.framer.encode_frame(&RawPacket { packet, bytes })
    }

    fn observe_read<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            self.sink.read_failed(self.version(), error);
        }
        result
    }
}
