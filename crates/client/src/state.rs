use std::collections::{HashMap, VecDeque};

use athena::{BeingId, ItemId, ItemType};
use bitflags::bitflags;

bitflags! {
    /// Equip-position bitmask as it appears on the wire. Older packets
    /// carry only the low 16 bits.
    #[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
    pub struct EquipPosition: u32 {
        const LEGS = 0x0001;
        const FIGHT1 = 0x0002;
        const GLOVES = 0x0004;
        const RING2 = 0x0008;
        const RING1 = 0x0010;
        const FIGHT2 = 0x0020;
        const FEET = 0x0040;
        const NECK = 0x0080;
        const HEAD = 0x0100;
        const TORSO = 0x0200;
        const EVOL_RING1 = 0x0400;
        const EVOL_RING2 = 0x0800;
        const PROJECTILE = 0x8000;
    }
}

/// Equipment slots as the client models them. The wire carries
/// [`EquipPosition`] bitmasks; `from_position` picks the slot for the
/// lowest set bit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EquipSlot {
    Legs,
    Fight1,
    Gloves,
    Ring2,
    Ring1,
    Fight2,
    Feet,
    Neck,
    Head,
    Torso,
    EvolRing1,
    EvolRing2,
    Projectile,
}

const EQUIP_POINTS: [EquipSlot; 13] = [
    EquipSlot::Legs,
    EquipSlot::Fight1,
    EquipSlot::Gloves,
    EquipSlot::Ring2,
    EquipSlot::Ring1,
    EquipSlot::Fight2,
    EquipSlot::Feet,
    EquipSlot::Neck,
    EquipSlot::Head,
    EquipSlot::Torso,
    EquipSlot::EvolRing1,
    EquipSlot::EvolRing2,
    EquipSlot::Projectile,
];

impl EquipSlot {
    pub fn from_position(mask: u32) -> Option<EquipSlot> {
        let position = EquipPosition::from_bits_truncate(mask);
        if position.is_empty() {
            return None;
        }
        if position.contains(EquipPosition::PROJECTILE) {
            return Some(EquipSlot::Projectile);
        }
        let bit = position.bits().trailing_zeros() as usize;
        EQUIP_POINTS.get(bit).copied()
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub item_type: ItemType,
    pub quantity: i32,
    pub refine: u8,
    pub equipped: bool,
    pub identified: bool,
    pub damaged: bool,
}

/// A slot-indexed item container (inventory or storage), slots zero-based
/// on the client side.
#[derive(Debug, Default)]
pub struct ItemContainer {
    items: HashMap<u16, Item>,
}

impl ItemContainer {
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn item(&self, slot: u16) -> Option<&Item> {
        self.items.get(&slot)
    }

    pub fn item_mut(&mut self, slot: u16) -> Option<&mut Item> {
        self.items.get_mut(&slot)
    }

    pub fn set_item(&mut self, slot: u16, item: Item) {
        self.items.insert(slot, item);
    }

    pub fn remove_at(&mut self, slot: u16) {
        self.items.remove(&slot);
    }

    /// Add to the stack in `slot`, merging with an existing stack of the
    /// same item id.
    pub fn add_amount(&mut self, slot: u16, id: ItemId, amount: i32) {
        match self.items.get_mut(&slot) {
            Some(item) if item.id == id => item.quantity += amount,
            _ => {
                self.items.insert(slot, Item {
                    id,
                    quantity: amount,
                    ..Item::default()
                });
            }
        }
    }

    /// Remove `amount` from the stack in `slot`, dropping the slot when
    /// it reaches zero.
    pub fn take_amount(&mut self, slot: u16, amount: i32) {
        if let Some(item) = self.items.get_mut(&slot) {
            item.quantity -= amount;
            if item.quantity <= 0 {
                self.items.remove(&slot);
            }
        }
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

#[derive(Debug, Default)]
pub struct Equipment {
    slots: HashMap<EquipSlot, u16>,
}

impl Equipment {
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn set(&mut self, slot: EquipSlot, inventory_slot: u16) {
        self.slots.insert(slot, inventory_slot);
    }

    pub fn unset(&mut self, slot: EquipSlot) {
        self.slots.remove(&slot);
    }

    pub fn get(&self, slot: EquipSlot) -> Option<u16> {
        self.slots.get(&slot).copied()
    }
}

/// One line of an open buy or sell dialog.
///
/// `quantity` is what the player owns (or what the shop advertises);
/// `used_quantity` is what the player has staged for the pending
/// transaction. Packet construction folds staged amounts back into
/// `quantity` atomically with the enqueue, so the two never diverge from
/// the bytes actually sent.
#[derive(Debug, Clone, Copy)]
pub struct ShopItem {
    pub inv_slot: u16,
    pub id: ItemId,
    pub item_type: ItemType,
    pub price: i32,
    pub quantity: i32,
    pub used_quantity: i32,
}

impl ShopItem {
    pub fn increase_quantity(&mut self, delta: i32) {
        self.quantity += delta;
    }

    pub fn increase_used_quantity(&mut self, delta: i32) {
        self.used_quantity += delta;
    }
}

/// The shop dialog currently open, if any. Receivers populate it from the
/// buy/sell list packets; handlers consume it when the player confirms.
#[derive(Debug, Default)]
pub struct ShopState {
    pub npc: BeingId,
    pub items: Vec<ShopItem>,
}

#[derive(Debug, Clone, Copy)]
pub struct FloorItem {
    pub id: BeingId,
    pub item_id: ItemId,
    pub x: u16,
    pub y: u16,
    pub sub_x: u8,
    pub sub_y: u8,
    pub amount: u16,
    pub identified: bool,
}

#[derive(Debug, Clone)]
pub struct Being {
    pub id: BeingId,
    pub job: u16,
    pub x: u16,
    pub y: u16,
    pub direction: athena::Direction,
}

/// Staged storage rows between the storage-items packets and the
/// storage-status packet that commits them.
#[derive(Debug, Clone, Copy)]
pub struct StagedStorageItem {
    pub slot: u16,
    pub id: ItemId,
    pub amount: i32,
    pub refine: u8,
    pub identified: bool,
}

/// Decoded protocol events for the (excluded) UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ServerNotice(String),
    PickupFailed { item: ItemId, reason: u8 },
    PickedUp { item: ItemId, amount: i32 },
    EquipFailed,
    ItemUseFailed,
    NpcMessage { npc: BeingId, text: String },
    NpcNext { npc: BeingId },
    NpcCloseDialog { npc: BeingId },
    NpcChoice { npc: BeingId, choices: Vec<String> },
    NpcIntegerInput { npc: BeingId },
    NpcStringInput { npc: BeingId },
    NpcBuySellChoice { npc: BeingId },
    ShopOpened { npc: BeingId, buying: bool },
    NpcBuyResponse { success: bool },
    NpcSellResponse { success: bool },
    StorageOpened { size: u16 },
    StorageClosed,
    BankStatus { money: i64, reason: u16 },
    AttackRange(i32),
}

/// Session-local game state touched by the protocol layer.
///
/// Single-threaded by design: handlers and receivers borrow it mutably
/// from the session; nothing here is shared across threads.
#[derive(Debug, Default)]
pub struct GameState {
    pub inventory: ItemContainer,
    pub storage: ItemContainer,
    pub equipment: Equipment,
    pub shop: ShopState,
    pub floor_items: HashMap<BeingId, FloorItem>,
    pub beings: HashMap<BeingId, Being>,
    pub staged_storage: Vec<StagedStorageItem>,
    pub storage_size: u16,
    pub storage_open: bool,
    pub current_npc: BeingId,
    pub homunculus: BeingId,
    pub mercenary: BeingId,
    pub bank_money: i64,
    pub attack_range: i32,
    pub events: VecDeque<GameEvent>,
}

impl GameState {
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub fn next_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equip_slot_from_position_mask() {
        assert_eq!(EquipSlot::from_position(0), None);
        assert_eq!(EquipSlot::from_position(0x8000), Some(EquipSlot::Projectile));
        assert_eq!(EquipSlot::from_position(0x0001), Some(EquipSlot::Legs));
        assert_eq!(EquipSlot::from_position(0x0100), Some(EquipSlot::Head));
        // Lowest set bit wins when several are present.
        assert_eq!(EquipSlot::from_position(0x0102), Some(EquipSlot::Fight1));
    }

    #[test]
    fn container_merges_same_item_stacks() {
        let mut inventory = ItemContainer::default();
        inventory.add_amount(3, ItemId::from_u32(512), 2);
        inventory.add_amount(3, ItemId::from_u32(512), 5);
        assert_eq!(inventory.item(3).unwrap().quantity, 7);

        inventory.take_amount(3, 7);
        assert!(inventory.item(3).is_none());
    }
}
