pub mod version;
pub mod wire;

pub use version::{NetworkVersion, PacketVersion, ServerVariant};
pub use wire::{BufferUnderrun, Endian, MessageReader, MessageWriter};

/// Server-assigned identifier of a being (player, monster, NPC, pet, ...).
///
/// Opaque to the protocol layer: it is only ever serialized as a 4-byte
/// little-endian integer.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BeingId(u32);

impl BeingId {
    pub const ZERO: BeingId = BeingId::from_u32(0);

    pub fn is_valid(&self) -> bool { *self != Self::ZERO }

    pub fn as_u32(&self) -> u32 { self.0 }

    pub const fn from_u32(value: u32) -> BeingId {
        Self(value)
    }
}

/// Item type identifier, serialized as 2 bytes on older layouts and
/// 4 bytes on newer eAthena layouts.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ItemId(u32);

impl ItemId {
    pub const ZERO: ItemId = ItemId::from_u32(0);

    pub fn is_valid(&self) -> bool { *self != Self::ZERO }

    pub fn as_u32(&self) -> u32 { self.0 }

    pub fn as_u16(&self) -> u16 { self.0 as u16 }

    pub const fn from_u32(value: u32) -> ItemId {
        Self(value)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ItemType {
    Healing = 0,
    Unknown = 1,
    #[default]
    Usable = 2,
    Etc = 3,
    Weapon = 4,
    Armor = 5,
    Card = 6,
    PetEgg = 7,
    PetArmor = 8,
    Unknown2 = 9,
    Ammo = 10,
    DelayConsume = 11,
    Cash = 18,
}

impl ItemType {
    pub fn from_u8(value: u8) -> Option<ItemType> {
        match value {
            0 => Some(ItemType::Healing),
            1 => Some(ItemType::Unknown),
            2 => Some(ItemType::Usable),
            3 => Some(ItemType::Etc),
            4 => Some(ItemType::Weapon),
            5 => Some(ItemType::Armor),
            6 => Some(ItemType::Card),
            7 => Some(ItemType::PetEgg),
            8 => Some(ItemType::PetArmor),
            9 => Some(ItemType::Unknown2),
            10 => Some(ItemType::Ammo),
            11 => Some(ItemType::DelayConsume),
            18 => Some(ItemType::Cash),
            _ => None,
        }
    }

    /// Stackable item types fold multiple units into a single shop entry;
    /// equipment always occupies one entry per unit.
    pub fn is_stackable(&self) -> bool {
        !matches!(self, ItemType::Weapon | ItemType::Armor
            | ItemType::PetArmor | ItemType::PetEgg)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Down = 1,
    DownLeft = 3,
    Left = 2,
    UpLeft = 6,
    Up = 4,
    UpRight = 12,
    Right = 8,
    DownRight = 9,
}

impl Direction {
    /// Translate from the eAthena wire encoding (0..=8) into client
    /// direction bits. 8 is an observed alias for right.
    pub fn from_server_dir(value: u8) -> Option<Direction> {
        match value {
            0 => Some(Direction::Down),
            1 => Some(Direction::DownLeft),
            2 => Some(Direction::Left),
            3 => Some(Direction::UpLeft),
            4 => Some(Direction::Up),
            5 => Some(Direction::UpRight),
            6 => Some(Direction::Right),
            7 => Some(Direction::DownRight),
            8 => Some(Direction::Right),
            _ => None,
        }
    }
}
