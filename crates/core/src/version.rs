use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Date-coded packet version (`YYYYMMDD` as an integer, e.g. `20130724`).
///
/// Negotiated once during the login exchange and fixed for the lifetime of
/// a session. Every version-gated layout compares against literal
/// thresholds with `>=` / `<` only, so thresholds partition the version
/// space into mutually exclusive ranges.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd,
    Serialize, Deserialize)]
pub struct PacketVersion(u32);

impl PacketVersion {
    pub const ZERO: PacketVersion = PacketVersion(0);

    pub const fn new(value: u32) -> PacketVersion {
        Self(value)
    }

    pub fn as_u32(&self) -> u32 { self.0 }

    pub fn is_valid(&self) -> bool { self.0 != 0 }
}

impl fmt::Display for PacketVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PacketVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s.parse()
            .map_err(|_| anyhow!("invalid packet version {s:?}"))?;
        Ok(PacketVersion(value))
    }
}

/// Sub-dialect of the eAthena family. A session has exactly one active
/// variant; tmwAthena sessions are always `Main`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Display, EnumString,
    Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ServerVariant {
    #[default]
    Main,
    Re,
    Zero,
}

/// The negotiated version registry for one session.
///
/// Constructed from handshake data at connect time and read-only after
/// that. Handlers consult this (or the `ServerFeatures` facade built on
/// top of it) for every version-gated layout decision.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct NetworkVersion {
    pub packet: PacketVersion,
    pub variant: ServerVariant,
}

impl NetworkVersion {
    pub fn new(packet: PacketVersion, variant: ServerVariant) -> NetworkVersion {
        Self { packet, variant }
    }

    pub fn at_least(&self, threshold: u32) -> bool {
        self.packet.as_u32() >= threshold
    }

    pub fn below(&self, threshold: u32) -> bool {
        self.packet.as_u32() < threshold
    }

    /// `true` only on main-variant servers at or above `threshold`.
    pub fn main_at_least(&self, threshold: u32) -> bool {
        self.variant == ServerVariant::Main && self.at_least(threshold)
    }

    /// `true` only on renewal servers at or above `threshold`.
    pub fn re_at_least(&self, threshold: u32) -> bool {
        self.variant == ServerVariant::Re && self.at_least(threshold)
    }

    /// `true` only on zero-type servers at or above `threshold`.
    pub fn zero_at_least(&self, threshold: u32) -> bool {
        self.variant == ServerVariant::Zero && self.at_least(threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        let version = NetworkVersion::new(
            PacketVersion::new(20130724), ServerVariant::Main);
        assert!(version.at_least(20130724));
        assert!(!version.below(20130724));
        assert!(version.below(20130725));
    }

    #[test]
    fn variant_comparisons_require_matching_variant() {
        let re = NetworkVersion::new(
            PacketVersion::new(20160600), ServerVariant::Re);
        assert!(re.re_at_least(20151104));
        assert!(!re.main_at_least(20151104));
        assert!(!re.zero_at_least(20151104));
        assert!(re.at_least(20151104));
    }

    #[test]
    fn parses_date_coded_versions() {
        let version: PacketVersion = "20141022".parse().unwrap();
        assert_eq!(version, PacketVersion::new(20141022));
        assert!("2014x".parse::<PacketVersion>().is_err());
    }
}
