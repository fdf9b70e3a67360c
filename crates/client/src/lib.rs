use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use athena::{PacketVersion, ServerVariant};

pub mod connection;
pub mod dispatch;
pub(crate) mod ea;
pub mod eathena;
pub mod features;
pub mod handlers;
pub mod markets;
pub mod outbox;
pub mod session;
pub mod state;
pub mod tmwa;

pub use dispatch::Dispatcher;
pub use features::ServerFeatures;
pub use handlers::Handlers;
pub use outbox::Outbox;
pub use session::Session;
pub use state::{GameEvent, GameState};

/// Client-side inventory slots are zero-based; the wire numbers them from
/// this offset. Every packet carrying an inventory slot applies it exactly
/// once.
pub const INVENTORY_OFFSET: u16 = 2;

/// Wire offset for storage slots, same rule as [`INVENTORY_OFFSET`].
pub const STORAGE_OFFSET: u16 = 1;

/// The two supported server protocol dialects. Opcodes are only
/// meaningful within one family; a session binds one family at connect
/// time and never switches.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, EnumString,
    Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ServerFamily {
    #[strum(serialize = "tmwathena")]
    TmwAthena,
    #[strum(serialize = "eathena")]
    EAthena,
}

/// Connect-time configuration, supplied by the launcher/login flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub hostname: String,
    pub port: u16,
    pub family: ServerFamily,
    #[serde(default)]
    pub variant: ServerVariant,
    /// Negotiated during the version exchange; zero until known.
    #[serde(default)]
    pub packet_version: PacketVersion,
}
