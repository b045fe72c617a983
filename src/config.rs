//! Decoder configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ip::IpProtocol;
use crate::PacketError;

/// How the decoder finds where the UDP region begins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    /// Take the first word whose low byte equals the protocol number and
    /// start two words after it.
    ///
    /// This assumes a 20-byte IPv4 header and matches anywhere in the
    /// stream, so an earlier word that happens to end in the protocol byte
    /// (an identification field of `0x??11`, say) moves the region.
    #[default]
    FirstMatch,
    /// Parse the IPv4 header at the start of the stream, check its protocol
    /// field and honor its IHL, so options are skipped.
    Ipv4Header,
}

impl FromStr for ScanMode {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-match" => Ok(ScanMode::FirstMatch),
            "ipv4-header" => Ok(ScanMode::Ipv4Header),
            other => Err(PacketError::malformed("unknown scan mode", other)),
        }
    }
}

/// Settings for [`crate::datagram::DatagramDecoder`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct DecoderConfig {
    /// Protocol number searched for and summed as the first pseudo-header word.
    pub protocol: IpProtocol,
    pub scan: ScanMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.protocol, IpProtocol::UDP);
        assert_eq!(config.scan, ScanMode::FirstMatch);
    }

    #[test]
    fn test_scan_mode_from_str() {
        assert_eq!("first-match".parse::<ScanMode>().unwrap(), ScanMode::FirstMatch);
        assert_eq!("ipv4-header".parse::<ScanMode>().unwrap(), ScanMode::Ipv4Header);
        assert!("ipv6".parse::<ScanMode>().is_err());
    }
}
