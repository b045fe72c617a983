//! Datagram decoder.
//!
//! Turns a hex stream into the three checksum sections. See [`crate::udp`]
//! for the section layout.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{DecoderConfig, ScanMode};
use crate::hex::{self, word_to_hex};
use crate::ip::{self, IpProtocol, Ipv4Header};
use crate::stream::HexStream;
use crate::udp::{PacketSection, Payload, PseudoHeader, UdpHeader};
use crate::{Checksumable, PacketError, Section};

/// Words between the protocol marker and the start of the address words.
const MARKER_TO_REGION_WORDS: usize = 2;
/// Bytes of address words staged into the pseudo-header.
const ADDRESS_BYTES: usize = 8;

/// Byte offsets where the sections start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    addresses: usize,
    header: usize,
}

/// A decoded UDP datagram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Datagram {
    region_start: usize,
    raw: Vec<u16>,
    pseudo_header: PseudoHeader,
    header: UdpHeader,
    payload: Payload,
}

impl Datagram {
    /// Decodes `input` with the default configuration.
    pub fn parse(input: &str) -> Result<Self, PacketError> {
        DatagramDecoder::default().decode(input)
    }

    pub fn pseudo_header(&self) -> &PseudoHeader {
        &self.pseudo_header
    }

    pub fn header(&self) -> &UdpHeader {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Byte offset of the UDP region in the original stream.
    pub fn region_start(&self) -> usize {
        self.region_start
    }

    /// The three sections, in checksum order.
    pub fn sections(&self) -> [PacketSection; 3] {
        [
            PacketSection::from(&self.pseudo_header),
            PacketSection::from(&self.header),
            PacketSection::from(&self.payload),
        ]
    }

    /// Every word of the UDP region, formatted as hex.
    pub fn raw_words_hex(&self) -> Vec<String> {
        self.raw.iter().map(|&w| word_to_hex(w)).collect()
    }

    /// Section dump followed by the checksum line.
    pub fn report(&self) -> Result<String, PacketError> {
        let checksum = self.calculate_checksum()?;
        Ok(format!("{}>>> UDP Checksum: {}", self, word_to_hex(checksum)))
    }
}

impl Checksumable for Datagram {
    fn operands(&self) -> Vec<u16> {
        let mut operands = self.pseudo_header.words();
        operands.extend(self.header.words());
        operands.extend(self.payload.words());
        operands
    }
}

impl fmt::Display for Datagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "~~~ Datagram ~~~")?;
        write!(f, "{}{}{}", self.pseudo_header, self.header, self.payload)
    }
}

/// Decodes hex streams into [`Datagram`]s.
#[derive(Debug, Clone, Default)]
pub struct DatagramDecoder {
    config: DecoderConfig,
}

impl DatagramDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Creates a new decoder builder.
    pub fn builder() -> DatagramDecoderBuilder {
        DatagramDecoderBuilder::new()
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes a hex string.
    ///
    /// # Returns
    /// - `Ok(Datagram)` - The decoded sections
    /// - `Err(PacketError::MalformedInput)` - If the input is not whole hex
    ///   words, the UDP region cannot be located, or it is too short
    pub fn decode(&self, input: &str) -> Result<Datagram, PacketError> {
        let stream = HexStream::parse(input)?;
        self.decode_stream(&stream)
    }

    /// Decodes an already parsed stream.
    pub fn decode_stream(&self, stream: &HexStream) -> Result<Datagram, PacketError> {
        let region = self.locate(stream)?;
        debug!(
            "UDP region at byte {}, header at byte {}",
            region.addresses, region.header
        );

        let mut cursor = stream.cursor_at(region.addresses);
        let pseudo_header = PseudoHeader::read(&mut cursor, self.config.protocol)?;
        cursor.seek(region.header);
        let header = UdpHeader::read(&mut cursor)?;
        let payload = Payload::read(&mut cursor);
        debug!("decoded {} payload words", payload.len());

        Ok(Datagram {
            region_start: region.addresses,
            raw: hex::to_words(&stream.as_bytes()[region.addresses..]),
            pseudo_header,
            header,
            payload,
        })
    }

    fn locate(&self, stream: &HexStream) -> Result<Region, PacketError> {
        let protocol = self.config.protocol;
        match self.config.scan {
            ScanMode::FirstMatch => {
                let marker = stream
                    .words()
                    .position(|word| (word & 0x00FF) as u8 == protocol.number())
                    .ok_or_else(|| marker_not_found(protocol, stream))?;
                debug!("protocol marker found at word {}", marker);

                let addresses = (marker + MARKER_TO_REGION_WORDS) * 2;
                Ok(Region {
                    addresses,
                    header: addresses + ADDRESS_BYTES,
                })
            }
            ScanMode::Ipv4Header => {
                let header = Ipv4Header::parse(stream.as_bytes())?;
                if header.protocol() != protocol {
                    return Err(PacketError::malformed(
                        format!(
                            "IPv4 protocol field is {}, expected {}",
                            header.protocol().number(),
                            protocol.number()
                        ),
                        &hex::encode(stream.as_bytes()),
                    ));
                }
                Ok(Region {
                    addresses: ip::ADDRESSES_OFFSET,
                    header: header.header_length(),
                })
            }
        }
    }
}

fn marker_not_found(protocol: IpProtocol, stream: &HexStream) -> PacketError {
    PacketError::malformed(
        format!("protocol marker {:02x} not found", protocol.number()),
        &hex::encode(stream.as_bytes()),
    )
}

/// Builder for [`DatagramDecoder`].
#[derive(Debug, Default)]
pub struct DatagramDecoderBuilder {
    protocol: Option<IpProtocol>,
    scan: Option<ScanMode>,
}

impl DatagramDecoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the protocol number to scan for.
    pub fn protocol(mut self, protocol: IpProtocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Sets how the UDP region is located.
    pub fn scan(mut self, scan: ScanMode) -> Self {
        self.scan = Some(scan);
        self
    }

    pub fn build(self) -> DatagramDecoder {
        let defaults = DecoderConfig::default();
        DatagramDecoder::new(DecoderConfig {
            protocol: self.protocol.unwrap_or(defaults.protocol),
            scan: self.scan.unwrap_or(defaults.scan),
        })
    }
}
