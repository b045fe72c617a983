//! Decode an IPv4/UDP datagram from a hex dump and recompute its UDP checksum.
//!
//! The input is a flat string of hex digits. The decoder finds the UDP
//! region, splits it into the IP pseudo-header, the UDP header and the
//! payload, and the checksum engine folds their words with the RFC 1071
//! one's-complement sum. It features:
//!
//! - A standalone Internet checksum engine over 16-bit words
//! - A cursor-based decoder that never mutates the input buffer
//! - Two ways of locating the UDP region (first-match heuristic, IPv4 header)
//! - Serialization support via Serde
//!
//! ```
//! use udpsum::{Checksumable, Datagram};
//!
//! let datagram = Datagram::parse(udpsum::input::SAMPLE_HEX_STREAM).unwrap();
//! assert_eq!(datagram.calculate_checksum().unwrap(), 0x99cb);
//! ```

pub mod checksum;
pub mod config;
pub mod datagram;
pub mod error;
pub mod hex;
pub mod input;
pub mod ip;
pub mod stream;
pub mod udp;

pub use config::{DecoderConfig, ScanMode};
pub use datagram::{Datagram, DatagramDecoder};
pub use error::PacketError;
pub use udp::{PacketSection, SectionKind};

/// A part of the datagram that contributes words to the checksum.
pub trait Section {
    /// Which section this is.
    fn kind(&self) -> SectionKind;

    /// The words this section contributes, in summing order.
    fn words(&self) -> Vec<u16>;
}

/// Trait for anything whose words can be checksummed.
pub trait Checksumable {
    /// The words fed to the checksum engine, in order.
    fn operands(&self) -> Vec<u16>;

    /// Calculate the Internet checksum over [`Checksumable::operands`].
    ///
    /// # Returns
    /// - `Ok(u16)` - The complemented, folded sum
    /// - `Err(PacketError::EmptyOperands)` - If there are no operands
    fn calculate_checksum(&self) -> Result<u16, PacketError> {
        checksum::checksum(&self.operands())
    }
}

/// Decodes `input` with the default configuration and returns its checksum.
pub fn udp_checksum(input: &str) -> Result<u16, PacketError> {
    Datagram::parse(input)?.calculate_checksum()
}
