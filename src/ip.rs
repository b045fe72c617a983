use std::fmt;

use serde::{Deserialize, Serialize};
use crate::PacketError;

/// IP protocol number, as carried in the IPv4 protocol field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct IpProtocol(u8);

impl IpProtocol {
    pub const UDP: IpProtocol = IpProtocol(17);

    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    pub const fn number(&self) -> u8 {
        self.0
    }

    /// The protocol number widened to a 16-bit word, as summed in the pseudo-header.
    pub const fn as_word(&self) -> u16 {
        self.0 as u16
    }
}

impl Default for IpProtocol {
    fn default() -> Self {
        IpProtocol::UDP
    }
}

/// IPv4 address representation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct Ipv4Address([u8; 4]);

impl Ipv4Address {
    pub fn new(addr: [u8; 4]) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

/// Byte offset of the protocol field in an IPv4 header.
const PROTOCOL_OFFSET: usize = 9;
/// Byte offset of the source address; the destination follows it.
pub const ADDRESSES_OFFSET: usize = 12;
/// Smallest valid IHL (5 32-bit words, no options).
const MIN_IHL: u8 = 5;

/// Read-only view of the IPv4 header fields the decoder relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ipv4Header {
    version: u8,
    ihl: u8,
    total_length: u16,
    protocol: IpProtocol,
    src_addr: Ipv4Address,
    dst_addr: Ipv4Address,
}

impl Ipv4Header {
    /// Parses the fixed part of an IPv4 header from the start of `bytes`.
    ///
    /// # Returns
    /// - `Ok(Ipv4Header)` - The parsed header
    /// - `Err(PacketError)` - If the version is not 4, the IHL is below 5,
    ///   or `bytes` is shorter than the header claims
    pub fn parse(bytes: &[u8]) -> Result<Self, PacketError> {
        let first = *bytes
            .first()
            .ok_or_else(|| PacketError::malformed("empty IPv4 header", ""))?;
        let version = first >> 4;
        let ihl = first & 0x0F;

        if version != 4 {
            return Err(PacketError::malformed(
                format!("unsupported IP version {}", version),
                &crate::hex::encode(&bytes[..1]),
            ));
        }
        if ihl < MIN_IHL {
            return Err(PacketError::malformed(
                format!("IHL {} below minimum", ihl),
                &crate::hex::encode(&bytes[..1]),
            ));
        }

        let header_len = ihl as usize * 4;
        if bytes.len() < header_len {
            return Err(PacketError::malformed(
                format!("IPv4 header needs {} bytes, got {}", header_len, bytes.len()),
                &crate::hex::encode(bytes),
            ));
        }

        let addr = |at: usize| {
            Ipv4Address::new([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        Ok(Self {
            version,
            ihl,
            total_length: u16::from_be_bytes([bytes[2], bytes[3]]),
            protocol: IpProtocol::new(bytes[PROTOCOL_OFFSET]),
            src_addr: addr(ADDRESSES_OFFSET),
            dst_addr: addr(ADDRESSES_OFFSET + 4),
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn total_length(&self) -> u16 {
        self.total_length
    }

    pub fn protocol(&self) -> IpProtocol {
        self.protocol
    }

    pub fn src_addr(&self) -> Ipv4Address {
        self.src_addr
    }

    pub fn dst_addr(&self) -> Ipv4Address {
        self.dst_addr
    }

    /// Header length in bytes, options included.
    pub fn header_length(&self) -> usize {
        self.ihl as usize * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;

    #[test]
    fn test_parse_header() {
        let bytes = hex::decode("45a00028d545000040114cfba9fe01e9a9fe01ff").unwrap();
        let header = Ipv4Header::parse(&bytes).unwrap();

        assert_eq!(header.version(), 4);
        assert_eq!(header.header_length(), 20);
        assert_eq!(header.total_length(), 0x28);
        assert_eq!(header.protocol(), IpProtocol::UDP);
        assert_eq!(header.src_addr().to_string(), "169.254.1.233");
        assert_eq!(header.dst_addr(), Ipv4Address::new([169, 254, 1, 255]));
    }

    #[test]
    fn test_parse_rejects_invalid_headers() {
        // IPv6 version nibble
        let bytes = hex::decode("60000000000000000000000000000000000000000000").unwrap();
        assert!(Ipv4Header::parse(&bytes).is_err());

        // IHL of 4
        let bytes = hex::decode("4400001c00010000401100000a0000010a000002").unwrap();
        assert!(Ipv4Header::parse(&bytes).is_err());

        // IHL of 6 with only 20 bytes available
        let bytes = hex::decode("4600001c00010000401100000a0000010a000002").unwrap();
        assert!(Ipv4Header::parse(&bytes).is_err());

        assert!(Ipv4Header::parse(&[]).is_err());
    }
}
