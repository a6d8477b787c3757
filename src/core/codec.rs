//! Tokio codec for framed Bancho streams.
//!
//! Pair it with `tokio_util::codec::Framed` (or `FramedRead`/`FramedWrite`) to turn
//! any `AsyncRead + AsyncWrite` into a stream of decoded packets and a sink of
//! payloads. The decoder only splits bytes off its buffer once a whole frame has
//! arrived, so dropping a pending read never loses part of a frame.

use crate::config::HEADER_SIZE;
use crate::error::{ProtocolError, Result};
use crate::protocol::packet_type::PacketType;
use crate::protocol::payload::Payload;
use crate::protocol::variant::ProtocolVariant;
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

/// Frames packets for one side of a connection
#[derive(Debug, Clone)]
pub struct BanchoCodec {
    variant: ProtocolVariant,
}

impl BanchoCodec {
    pub fn new(variant: ProtocolVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> &ProtocolVariant {
        &self.variant
    }
}

impl Decoder for BanchoCodec {
    type Item = (PacketType, Payload);
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        // Reject bad headers before buffering their body
        let header = self.variant.parse_header(&src[..HEADER_SIZE])?;
        let total = HEADER_SIZE + header.length;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let frame = src.split_to(total);
        self.variant
            .decode_frame(header, &frame[HEADER_SIZE..])
            .map(Some)
    }
}

impl Encoder<Payload> for BanchoCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Payload, dst: &mut BytesMut) -> Result<()> {
        <Self as Encoder<&Payload>>::encode(self, &item, dst)
    }
}

impl Encoder<&Payload> for BanchoCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: &Payload, dst: &mut BytesMut) -> Result<()> {
        let frame = self.variant.encode_frame(item.packet_type(), item)?;
        dst.extend_from_slice(&frame);
        Ok(())
    }
}
