use athena::NetworkVersion;

use crate::features::{features_for, ServerFeatures};
use crate::outbox::Outbox;
use crate::state::GameState;
use crate::ServerFamily;

/// One connection's worth of protocol context: the negotiated version
/// registry (immutable after construction), the family's capability
/// queries, the outgoing packet queue, and the session-local game state.
///
/// Handlers and receivers take `&mut Session`, which confines all
/// mutation to the caller's thread; the protocol layer itself has no
/// internal concurrency.
pub struct Session {
    family: ServerFamily,
    version: NetworkVersion,
    pub features: Box<dyn ServerFeatures>,
    pub out: Outbox,
    pub state: GameState,
}

impl Session {
    pub fn new(family: ServerFamily, version: NetworkVersion) -> Session {
        Self {
            family,
            version,
            features: features_for(family, version),
            out: Outbox::new(),
            state: GameState::default(),
        }
    }

    pub fn family(&self) -> ServerFamily { self.family }

    pub fn version(&self) -> NetworkVersion { self.version }
}

#[cfg(test)]
mod tests {
    use athena::{PacketVersion, ServerVariant};

    use super::*;

    fn version(packet: u32) -> NetworkVersion {
        NetworkVersion::new(PacketVersion::new(packet), ServerVariant::Main)
    }

    #[test]
    fn session_carries_its_family_capabilities() {
        let sess = Session::new(ServerFamily::EAthena, version(20150513));
        assert!(sess.features.have_bank());
        assert!(sess.features.have_extended_inventory());

        let sess = Session::new(ServerFamily::TmwAthena, version(20150513));
        assert!(!sess.features.have_bank());
        assert!(sess.features.have_server_version());
    }
}
