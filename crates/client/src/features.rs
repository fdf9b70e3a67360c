use athena::NetworkVersion;

use crate::ServerFamily;

/// Version thresholds behind the named capability queries. Handlers gate
/// on the query, never on these constants directly, so the policy stays
/// in one place.
pub mod thresholds {
    pub const BANK: u32 = 20130724;
    pub const MAIL2: u32 = 20140416;
    pub const MOVE_PET: u32 = 20131108;
    pub const KILLER_ID: u32 = 20120716;
    pub const EXTENDED_INVENTORY: u32 = 20150226;
    pub const EXTENDED_DROPS_POSITION: u32 = 20180000;
    pub const BUYING_STORE: u32 = 20100303;
    pub const SEARCH_STORE: u32 = 20100601;
    pub const CASH_SHOP: u32 = 20110222;
}

/// Capability queries over the negotiated version, one implementation per
/// server family. The weaker family answers `false` rather than being
/// absent, so callers never need family-specific conditionals.
pub trait ServerFeatures: Send + Sync {
    fn have_server_version(&self) -> bool { false }
    fn have_bank(&self) -> bool { false }
    fn have_mail2(&self) -> bool { false }
    fn have_move_pet(&self) -> bool { false }
    fn have_killer_id(&self) -> bool { false }
    fn have_extended_inventory(&self) -> bool { false }
    fn have_extended_drops_position(&self) -> bool { false }
    fn have_vending(&self) -> bool { false }
    fn have_buying_store(&self) -> bool { false }
    fn have_search_store(&self) -> bool { false }
    fn have_cash_shop(&self) -> bool { false }
    fn have_auction(&self) -> bool { false }
    fn have_mercenary(&self) -> bool { false }
    fn have_homunculus(&self) -> bool { false }
    fn have_battleground(&self) -> bool { false }
    fn have_friends(&self) -> bool { false }
}

/// tmwAthena froze long before any of the gated features landed; only
/// the custom version-exchange packets exist there.
#[derive(Debug, Clone, Copy, Default)]
pub struct TmwaFeatures;

impl ServerFeatures for TmwaFeatures {
    fn have_server_version(&self) -> bool { true }
}

#[derive(Debug, Clone, Copy)]
pub struct EathenaFeatures {
    version: NetworkVersion,
}

impl EathenaFeatures {
    pub fn new(version: NetworkVersion) -> EathenaFeatures {
        Self { version }
    }
}

impl ServerFeatures for EathenaFeatures {
    fn have_server_version(&self) -> bool { true }

    fn have_bank(&self) -> bool {
        self.version.at_least(thresholds::BANK)
    }

    fn have_mail2(&self) -> bool {
        self.version.at_least(thresholds::MAIL2)
    }

    fn have_move_pet(&self) -> bool {
        self.version.at_least(thresholds::MOVE_PET)
    }

    fn have_killer_id(&self) -> bool {
        self.version.at_least(thresholds::KILLER_ID)
    }

    fn have_extended_inventory(&self) -> bool {
        self.version.at_least(thresholds::EXTENDED_INVENTORY)
    }

    fn have_extended_drops_position(&self) -> bool {
        self.version.at_least(thresholds::EXTENDED_DROPS_POSITION)
    }

    fn have_vending(&self) -> bool { true }

    fn have_buying_store(&self) -> bool {
        self.version.at_least(thresholds::BUYING_STORE)
    }

    fn have_search_store(&self) -> bool {
        self.version.at_least(thresholds::SEARCH_STORE)
    }

    fn have_cash_shop(&self) -> bool {
        self.version.at_least(thresholds::CASH_SHOP)
    }

    fn have_auction(&self) -> bool { true }

    fn have_mercenary(&self) -> bool { true }

    fn have_homunculus(&self) -> bool { true }

    fn have_battleground(&self) -> bool { true }

    fn have_friends(&self) -> bool { true }
}

pub fn features_for(family: ServerFamily, version: NetworkVersion)
    -> Box<dyn ServerFeatures>
{
    match family {
        ServerFamily::TmwAthena => Box::new(TmwaFeatures),
        ServerFamily::EAthena => Box::new(EathenaFeatures::new(version)),
    }
}

#[cfg(test)]
mod tests {
    use athena::{PacketVersion, ServerVariant};

    use super::*;

    fn version(packet: u32) -> NetworkVersion {
        NetworkVersion::new(PacketVersion::new(packet), ServerVariant::Main)
    }

    #[test]
    fn bank_threshold_is_inclusive() {
        assert!(!EathenaFeatures::new(version(20130723)).have_bank());
        assert!(EathenaFeatures::new(version(20130724)).have_bank());
    }

    #[test]
    fn tmwa_answers_false_instead_of_missing() {
        let features = features_for(ServerFamily::TmwAthena, version(20990101));
        assert!(!features.have_bank());
        assert!(!features.have_mail2());
        assert!(features.have_server_version());
    }
}
