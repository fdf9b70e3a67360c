use athena::{BufferUnderrun, ItemType, MessageReader};

use crate::dispatch::{PacketLength, PacketSpec, PacketTable};
use crate::ea;
use crate::session::Session;
use crate::state::{EquipSlot, FloorItem, GameEvent, Item, StagedStorageItem};
use crate::tmwa::protocol::*;
use crate::{INVENTORY_OFFSET, STORAGE_OFFSET};

pub fn table() -> PacketTable {
    let mut table = PacketTable::new();
    let mut add = |opcode: u16, length: PacketLength, recv| {
        table.insert(opcode, PacketSpec { length, recv });
    };

    add(SMSG_SERVER_VERSION_RESPONSE, PacketLength::Fixed(10),
        ea::server_version);
    add(SMSG_GM_CHAT, PacketLength::Variable, ea::gm_chat);

    add(SMSG_PLAYER_INVENTORY, PacketLength::Variable, inventory_list);
    add(SMSG_PLAYER_INVENTORY_ADD, PacketLength::Fixed(23), inventory_add);
    add(SMSG_PLAYER_INVENTORY_REMOVE, PacketLength::Fixed(6),
        ea::inventory_remove);
    add(SMSG_ITEM_USE_RESPONSE, PacketLength::Fixed(7), ea::item_use_response);
    add(SMSG_PLAYER_EQUIPMENT, PacketLength::Variable, equipment_list);
    add(SMSG_PLAYER_EQUIP, PacketLength::Fixed(7), player_equip);
    add(SMSG_PLAYER_UNEQUIP, PacketLength::Fixed(7), player_unequip);
    add(SMSG_PLAYER_ATTACK_RANGE, PacketLength::Fixed(4), ea::attack_range);
    add(SMSG_PLAYER_ARROW_EQUIP, PacketLength::Fixed(4), ea::arrow_equip);

    add(SMSG_ITEM_VISIBLE, PacketLength::Fixed(17), item_visible);
    add(SMSG_ITEM_DROPPED, PacketLength::Fixed(17), item_visible);
    add(SMSG_ITEM_REMOVE, PacketLength::Fixed(6), ea::item_remove);

    add(SMSG_PLAYER_STORAGE_ITEMS, PacketLength::Variable, storage_items);
    add(SMSG_PLAYER_STORAGE_STATUS, PacketLength::Fixed(6), ea::storage_status);
    add(SMSG_PLAYER_STORAGE_ADD, PacketLength::Fixed(21), storage_add);
    add(SMSG_PLAYER_STORAGE_REMOVE, PacketLength::Fixed(8), ea::storage_remove);
    add(SMSG_PLAYER_STORAGE_CLOSE, PacketLength::Fixed(2), ea::storage_close);

    add(SMSG_NPC_MESSAGE, PacketLength::Variable, ea::npc_message);
    add(SMSG_NPC_NEXT, PacketLength::Fixed(6), ea::npc_next);
    add(SMSG_NPC_CLOSE, PacketLength::Fixed(6), ea::npc_close);
    add(SMSG_NPC_CHOICE, PacketLength::Variable, ea::npc_choice);
    add(SMSG_NPC_INT_INPUT, PacketLength::Fixed(6), ea::npc_int_input);
    add(SMSG_NPC_STR_INPUT, PacketLength::Fixed(6), ea::npc_str_input);
    add(SMSG_NPC_BUY_SELL_CHOICE, PacketLength::Fixed(6),
        ea::npc_buy_sell_choice);
    add(SMSG_NPC_BUY, PacketLength::Variable, ea::npc_buy_list);
    add(SMSG_NPC_SELL, PacketLength::Variable, ea::npc_sell_list);
    add(SMSG_NPC_BUY_RESPONSE, PacketLength::Fixed(3), ea::npc_buy_response);
    add(SMSG_NPC_SELL_RESPONSE, PacketLength::Fixed(3), ea::npc_sell_response);

    add(SMSG_BEING_VISIBLE, PacketLength::Fixed(54), ea::being_visible);
    add(SMSG_BEING_MOVE, PacketLength::Fixed(60), ea::being_move);
    add(SMSG_BEING_REMOVE, PacketLength::Fixed(7), ea::being_remove);

    table
}

fn inventory_list(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    sess.state.inventory.clear();
    while msg.remaining() > 0 {
        let index = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
        let id = msg.read_u16("item id")? as u32;
        let item_type = msg.read_u8("item type")?;
        let identified = msg.read_u8("identified")?;
        let amount = msg.read_u16("amount")?;
        msg.skip(2, "arrow")?;
        msg.skip(8, "cards")?;
        sess.state.inventory.set_item(index, Item {
            id: athena::ItemId::from_u32(id),
            item_type: ItemType::from_u8(item_type)
                .unwrap_or(ItemType::Unknown),
            quantity: amount as i32,
            identified: identified != 0,
            ..Item::default()
        });
    }
    Ok(())
}

fn inventory_add(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let index = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
    let amount = msg.read_u16("amount")? as i32;
    let id = athena::ItemId::from_u32(msg.read_u16("item id")? as u32);
    let _identified = msg.read_u8("identified")?;
    msg.skip(1, "attribute")?;
    msg.skip(1, "refine")?;
    msg.skip(8, "cards")?;
    msg.skip(2, "equip type")?;
    msg.skip(1, "item type")?;
    let err = msg.read_u8("status")?;

    if err != 0 {
        sess.state.push_event(GameEvent::PickupFailed { item: id, reason: err });
    } else {
        sess.state.inventory.add_amount(index, id, amount);
        sess.state.push_event(GameEvent::PickedUp { item: id, amount });
    }
    Ok(())
}

fn equipment_list(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    while msg.remaining() > 0 {
        let index = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
        let id = athena::ItemId::from_u32(msg.read_u16("item id")? as u32);
        let item_type = msg.read_u8("item type")?;
        let identified = msg.read_u8("identify")?;
        msg.skip(2, "equip type?")?;
        let equipped = msg.read_u16("equip type")?;
        msg.skip(1, "attribute")?;
        let refine = msg.read_u8("refine")?;
        msg.skip(8, "cards")?;

        sess.state.inventory.set_item(index, Item {
            id,
            item_type: ItemType::from_u8(item_type)
                .unwrap_or(ItemType::Unknown),
            quantity: 1,
            refine,
            equipped: equipped != 0,
            identified: identified != 0,
            damaged: false,
        });
        if let Some(slot) = EquipSlot::from_position(equipped as u32) {
            sess.state.equipment.set(slot, index);
        }
    }
    Ok(())
}

// tmwAthena inverts the flag relative to later forks: zero means failure.
fn player_equip(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let index = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
    let position = msg.read_u16("equip point")?;
    let flag = msg.read_u8("flag")?;
    if flag == 0 {
        sess.state.push_event(GameEvent::EquipFailed);
        return Ok(());
    }
    if let Some(item) = sess.state.inventory.item_mut(index) {
        item.equipped = true;
    }
    if let Some(slot) = EquipSlot::from_position(position as u32) {
        sess.state.equipment.set(slot, index);
    }
    Ok(())
}

fn player_unequip(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let index = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
    let position = msg.read_u16("equip point")?;
    let flag = msg.read_u8("flag")?;
    if flag == 0 {
        return Ok(());
    }
    if let Some(item) = sess.state.inventory.item_mut(index) {
        item.equipped = false;
    }
    if let Some(slot) = EquipSlot::from_position(position as u32) {
        sess.state.equipment.unset(slot);
    }
    Ok(())
}

fn item_visible(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let id = msg.read_being_id("object id")?;
    let item_id = athena::ItemId::from_u32(msg.read_u16("item id")? as u32);
    let identified = msg.read_u8("identified")? != 0;
    let x = msg.read_u16("x")?;
    let y = msg.read_u16("y")?;
    let amount = msg.read_u16("amount")?;
    let sub_x = msg.read_u8("sub x")?;
    let sub_y = msg.read_u8("sub y")?;
    sess.state.floor_items.insert(id, FloorItem {
        id, item_id, x, y, sub_x, sub_y, amount, identified,
    });
    Ok(())
}

fn storage_items(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    // Staged until the storage-status packet commits the whole list.
    sess.state.staged_storage.clear();
    while msg.remaining() > 0 {
        let slot = msg.read_u16("index")?.wrapping_sub(STORAGE_OFFSET);
        let id = athena::ItemId::from_u32(msg.read_u16("item id")? as u32);
        msg.skip(1, "item type")?;
        let identified = msg.read_u8("identified")?;
        let amount = msg.read_u16("amount")? as i32;
        msg.skip(2, "arrow")?;
        msg.skip(8, "cards")?;
        sess.state.staged_storage.push(StagedStorageItem {
            slot, id, amount, refine: 0, identified: identified != 0,
        });
    }
    Ok(())
}

fn storage_add(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let slot = msg.read_u16("index")?.wrapping_sub(STORAGE_OFFSET);
    let amount = msg.read_i32("amount")?;
    let id = athena::ItemId::from_u32(msg.read_u16("item id")? as u32);
    msg.skip(1, "identified")?;
    msg.skip(1, "attribute")?;
    msg.skip(1, "refine")?;
    msg.skip(8, "card")?;
    sess.state.storage.add_amount(slot, id, amount);
    Ok(())
}

#[cfg(test)]
mod tests {
    use athena::{ItemId, NetworkVersion, PacketVersion, ServerVariant};

    use crate::ServerFamily;

    use super::*;

    fn session() -> Session {
        Session::new(ServerFamily::TmwAthena, NetworkVersion::new(
            PacketVersion::new(0), ServerVariant::Main))
    }

    #[test]
    fn inventory_add_reverses_the_wire_offset() {
        let mut sess = session();
        let mut body = Vec::new();
        body.extend_from_slice(&5u16.to_le_bytes());      // wire index
        body.extend_from_slice(&2u16.to_le_bytes());      // amount
        body.extend_from_slice(&512u16.to_le_bytes());    // item id
        body.extend_from_slice(&[1, 0, 0]);               // identified, attr, refine
        body.extend_from_slice(&[0; 8]);                  // cards
        body.extend_from_slice(&[0, 0, 2, 0]);            // equip type, type, status

        inventory_add(&mut sess, &mut MessageReader::new(&body)).unwrap();

        assert_eq!(sess.state.inventory.item(3).unwrap().quantity, 2);
        assert_eq!(sess.state.next_event(), Some(GameEvent::PickedUp {
            item: ItemId::from_u32(512), amount: 2,
        }));
    }

    #[test]
    fn failed_pickup_leaves_inventory_untouched() {
        let mut sess = session();
        let mut body = Vec::new();
        body.extend_from_slice(&5u16.to_le_bytes());
        body.extend_from_slice(&2u16.to_le_bytes());
        body.extend_from_slice(&512u16.to_le_bytes());
        body.extend_from_slice(&[1, 0, 0]);
        body.extend_from_slice(&[0; 8]);
        body.extend_from_slice(&[0, 0, 2, 1]);            // status 1: too heavy

        inventory_add(&mut sess, &mut MessageReader::new(&body)).unwrap();

        assert!(sess.state.inventory.is_empty());
        assert_eq!(sess.state.next_event(), Some(GameEvent::PickupFailed {
            item: ItemId::from_u32(512), reason: 1,
        }));
    }

    #[test]
    fn storage_commits_on_status_packet() {
        let mut sess = session();
        let mut body = Vec::new();
        body.extend_from_slice(&3u16.to_le_bytes());      // wire slot
        body.extend_from_slice(&640u16.to_le_bytes());    // item id
        body.extend_from_slice(&[3, 1]);                  // type, identified
        body.extend_from_slice(&7u16.to_le_bytes());      // amount
        body.extend_from_slice(&[0; 10]);                 // arrow, cards
        storage_items(&mut sess, &mut MessageReader::new(&body)).unwrap();

        // Not visible until the status packet arrives.
        assert!(sess.state.storage.is_empty());
        assert!(!sess.state.storage_open);

        let status = [1u8, 0, 100, 0];
        ea::storage_status(&mut sess, &mut MessageReader::new(&status)).unwrap();

        assert!(sess.state.storage_open);
        assert_eq!(sess.state.storage_size, 100);
        assert_eq!(sess.state.storage.item(2).unwrap().quantity, 7);
        assert_eq!(sess.state.next_event(),
            Some(GameEvent::StorageOpened { size: 100 }));
    }

    #[test]
    fn npc_choice_splits_colon_separated_menu() {
        let mut sess = session();
        let mut body = Vec::new();
        body.extend_from_slice(&9u32.to_le_bytes());
        body.extend_from_slice(b"Buy:Sell:Leave");
        ea::npc_choice(&mut sess, &mut MessageReader::new(&body)).unwrap();

        assert_eq!(sess.state.next_event(), Some(GameEvent::NpcChoice {
            npc: athena::BeingId::from_u32(9),
            choices: vec!["Buy".into(), "Sell".into(), "Leave".into()],
        }));
    }

    #[test]
    fn sell_list_joins_inventory_data() {
        let mut sess = session();
        sess.state.inventory.set_item(4, Item {
            id: ItemId::from_u32(512),
            item_type: ItemType::Usable,
            quantity: 9,
            identified: true,
            ..Item::default()
        });

        let mut body = Vec::new();
        body.extend_from_slice(&6u16.to_le_bytes());      // wire index (slot 4)
        body.extend_from_slice(&10i32.to_le_bytes());     // price
        body.extend_from_slice(&8i32.to_le_bytes());      // overcharge
        ea::npc_sell_list(&mut sess, &mut MessageReader::new(&body)).unwrap();

        let item = &sess.state.shop.items[0];
        assert_eq!(item.inv_slot, 4);
        assert_eq!(item.id, ItemId::from_u32(512));
        assert_eq!(item.quantity, 9);
        assert_eq!(item.used_quantity, 0);
    }
}
