//! UDP datagram sections.
//!
//! The checksum is computed over three sections, always in this order:
//!
//! ```text
//! PseudoHeader  protocol | src (2 words) | dst (2 words)
//! UdpHeader     length | src port | dst port | length
//! Payload       every remaining word
//! ```
//!
//! The UDP header is read from the wire as source port, destination port,
//! length and checksum. Its length word is read once and summed twice: the
//! leading copy is the pseudo-header's UDP length field, the trailing one is
//! the header's own. The wire checksum word is consumed but never summed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::{self, word_to_hex};
use crate::ip::IpProtocol;
use crate::stream::WordCursor;
use crate::{Checksumable, PacketError, Section};

/// Which part of the datagram a section holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum SectionKind {
    PseudoHeader,
    UdpHeader,
    Payload,
}

impl SectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::PseudoHeader => "IP Pseudo-Header",
            SectionKind::UdpHeader => "UDP Header",
            SectionKind::Payload => "UDP Payload",
        }
    }

    /// Number of words the section contributes, `None` when variable.
    pub fn size(&self) -> Option<usize> {
        match self {
            SectionKind::PseudoHeader => Some(PseudoHeader::SIZE),
            SectionKind::UdpHeader => Some(UdpHeader::SIZE),
            SectionKind::Payload => None,
        }
    }
}

/// A named, ordered run of words.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct PacketSection {
    kind: SectionKind,
    words: Vec<u16>,
}

impl PacketSection {
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }
}

impl<S: Section> From<&S> for PacketSection {
    fn from(section: &S) -> Self {
        Self {
            kind: section.kind(),
            words: section.words(),
        }
    }
}

impl Checksumable for PacketSection {
    fn operands(&self) -> Vec<u16> {
        self.words.clone()
    }
}

fn truncated(what: &str, cursor: &WordCursor<'_>, needed: usize) -> PacketError {
    PacketError::malformed(
        format!(
            "{} needs {} words at byte {}, only {} left",
            what,
            needed,
            cursor.position(),
            cursor.remaining_words()
        ),
        &hex::encode(cursor.rest_bytes()),
    )
}

/// IP pseudo-header: protocol word plus the source and destination fields.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct PseudoHeader {
    protocol: IpProtocol,
    src: [u16; 2],
    dst: [u16; 2],
}

impl PseudoHeader {
    /// Words contributed to the checksum.
    pub const SIZE: usize = 5;
    /// Words read from the stream.
    const WIRE_WORDS: usize = 4;

    /// Stages the four address words at the cursor, then moves past them.
    pub fn read(cursor: &mut WordCursor<'_>, protocol: IpProtocol) -> Result<Self, PacketError> {
        let staged = cursor
            .peek(Self::WIRE_WORDS)
            .ok_or_else(|| truncated("pseudo-header", cursor, Self::WIRE_WORDS))?;
        let header = Self {
            protocol,
            src: [staged[0], staged[1]],
            dst: [staged[2], staged[3]],
        };
        cursor.take(Self::WIRE_WORDS);
        Ok(header)
    }

    pub fn protocol(&self) -> IpProtocol {
        self.protocol
    }

    pub fn src(&self) -> [u16; 2] {
        self.src
    }

    pub fn dst(&self) -> [u16; 2] {
        self.dst
    }
}

impl Section for PseudoHeader {
    fn kind(&self) -> SectionKind {
        SectionKind::PseudoHeader
    }

    fn words(&self) -> Vec<u16> {
        vec![
            self.protocol.as_word(),
            self.src[0],
            self.src[1],
            self.dst[0],
            self.dst[1],
        ]
    }
}

impl fmt::Display for PseudoHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "~~~ {} ~~~", self.kind().name())?;
        writeln!(f, "Protocol ID: {}", word_to_hex(self.protocol.as_word()))?;
        writeln!(f, "Source: {} {}", word_to_hex(self.src[0]), word_to_hex(self.src[1]))?;
        writeln!(f, "Destination: {} {}", word_to_hex(self.dst[0]), word_to_hex(self.dst[1]))
    }
}

/// UDP header as read from the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct UdpHeader {
    src_port: u16,
    dst_port: u16,
    length: u16,
    checksum: u16,
}

impl UdpHeader {
    /// Words contributed to the checksum.
    pub const SIZE: usize = 4;
    /// Words read from the stream (8 bytes).
    const WIRE_WORDS: usize = 4;

    /// Reads the four header words at the cursor and moves past them.
    pub fn read(cursor: &mut WordCursor<'_>) -> Result<Self, PacketError> {
        let wire = cursor
            .take(Self::WIRE_WORDS)
            .ok_or_else(|| truncated("UDP header", cursor, Self::WIRE_WORDS))?;
        Ok(Self {
            src_port: wire[0],
            dst_port: wire[1],
            length: wire[2],
            checksum: wire[3],
        })
    }

    pub fn src_port(&self) -> u16 {
        self.src_port
    }

    pub fn dst_port(&self) -> u16 {
        self.dst_port
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    /// Checksum carried on the wire. Not summed, not compared.
    pub fn wire_checksum(&self) -> u16 {
        self.checksum
    }
}

impl Section for UdpHeader {
    fn kind(&self) -> SectionKind {
        SectionKind::UdpHeader
    }

    fn words(&self) -> Vec<u16> {
        vec![self.length, self.src_port, self.dst_port, self.length]
    }
}

impl fmt::Display for UdpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "~~~ {} ~~~", self.kind().name())?;
        writeln!(f, "Source Port: {}", word_to_hex(self.src_port))?;
        writeln!(f, "Destination Port: {}", word_to_hex(self.dst_port))?;
        writeln!(f, "UDP Length: {}", word_to_hex(self.length))
    }
}

/// Everything after the UDP header, padding included.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Payload {
    words: Vec<u16>,
}

impl Payload {
    /// Takes every word left at the cursor.
    pub fn read(cursor: &mut WordCursor<'_>) -> Self {
        Self {
            words: cursor.take_rest(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Section for Payload {
    fn kind(&self) -> SectionKind {
        SectionKind::Payload
    }

    fn words(&self) -> Vec<u16> {
        self.words.clone()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "~~~ {} ~~~", self.kind().name())?;
        let words: Vec<String> = self.words.iter().map(|&w| word_to_hex(w)).collect();
        writeln!(f, "[{}]", words.join(", "))
    }
}
