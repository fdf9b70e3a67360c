//! Receivers for the historic Athena packets whose layout both families
//! still share. Family modules register these in their dispatch tables
//! next to their own divergent decoders.

use athena::{BufferUnderrun, ItemType, MessageReader};

use crate::session::Session;
use crate::state::{Being, GameEvent, ShopItem};
use crate::INVENTORY_OFFSET;

pub(crate) fn server_version(_sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    msg.skip(4, "version bytes")?;
    msg.skip(4, "options")?;
    Ok(())
}

pub(crate) fn gm_chat(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let text = msg.read_string(msg.remaining(), "announcement")?;
    sess.state.push_event(GameEvent::ServerNotice(text));
    Ok(())
}

pub(crate) fn inventory_remove(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let index = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
    let amount = msg.read_u16("amount")? as i32;
    sess.state.inventory.take_amount(index, amount);
    Ok(())
}

pub(crate) fn item_use_response(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let index = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
    let amount = msg.read_u16("amount")? as i32;
    let success = msg.read_u8("success")?;
    if success == 0 {
        sess.state.push_event(GameEvent::ItemUseFailed);
    } else if amount <= 0 {
        sess.state.inventory.remove_at(index);
    } else if let Some(item) = sess.state.inventory.item_mut(index) {
        // The server reports the remaining stack, not a delta.
        item.quantity = amount;
    }
    Ok(())
}

pub(crate) fn attack_range(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let range = msg.read_i16("range")? as i32;
    sess.state.attack_range = range;
    sess.state.push_event(GameEvent::AttackRange(range));
    Ok(())
}

pub(crate) fn item_remove(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let id = msg.read_being_id("object id")?;
    sess.state.floor_items.remove(&id);
    Ok(())
}

/// Commits the staged storage rows; until this packet arrives the item
/// list packets have no visible effect.
pub(crate) fn storage_status(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    msg.skip(2, "slots used")?;
    let size = msg.read_u16("slots total")?;

    sess.state.storage.clear();
    let staged = std::mem::take(&mut sess.state.staged_storage);
    for item in staged {
        sess.state.storage.set_item(item.slot, crate::state::Item {
            id: item.id,
            item_type: ItemType::Unknown,
            quantity: item.amount,
            refine: item.refine,
            identified: item.identified,
            ..crate::state::Item::default()
        });
    }
    sess.state.storage_size = size;
    sess.state.storage_open = true;
    sess.state.push_event(GameEvent::StorageOpened { size });
    Ok(())
}

pub(crate) fn storage_remove(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let slot = msg.read_u16("index")?.wrapping_sub(crate::STORAGE_OFFSET);
    let amount = msg.read_i32("amount")?;
    sess.state.storage.take_amount(slot, amount);
    Ok(())
}

pub(crate) fn storage_close(sess: &mut Session, _msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    sess.state.storage_open = false;
    sess.state.push_event(GameEvent::StorageClosed);
    Ok(())
}

pub(crate) fn arrow_equip(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let index = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
    if let Some(item) = sess.state.inventory.item_mut(index) {
        item.equipped = true;
    }
    sess.state.equipment.set(crate::state::EquipSlot::Projectile, index);
    Ok(())
}

pub(crate) fn npc_message(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = msg.read_being_id("npc id")?;
    let text = msg.read_string(msg.remaining(), "text")?;
    sess.state.current_npc = npc;
    sess.state.push_event(GameEvent::NpcMessage { npc, text });
    Ok(())
}

pub(crate) fn npc_next(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = msg.read_being_id("npc id")?;
    sess.state.push_event(GameEvent::NpcNext { npc });
    Ok(())
}

// Both families acknowledge the close with the same 0x0146 packet; the
// server keeps the script waiting until it arrives.
pub(crate) fn npc_close(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = msg.read_being_id("npc id")?;
    let mut out = athena::MessageWriter::new();
    out.begin(0x0146);
    out.write_being_id(npc, "npc id");
    sess.out.queue(out.finish());
    sess.state.push_event(GameEvent::NpcCloseDialog { npc });
    Ok(())
}

pub(crate) fn npc_choice(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = msg.read_being_id("npc id")?;
    let menu = msg.read_string(msg.remaining(), "menu")?;
    let choices = menu.split(':')
        .filter(|choice| !choice.is_empty())
        .map(str::to_owned)
        .collect();
    sess.state.push_event(GameEvent::NpcChoice { npc, choices });
    Ok(())
}

pub(crate) fn npc_int_input(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = msg.read_being_id("npc id")?;
    sess.state.push_event(GameEvent::NpcIntegerInput { npc });
    Ok(())
}

pub(crate) fn npc_str_input(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = msg.read_being_id("npc id")?;
    sess.state.push_event(GameEvent::NpcStringInput { npc });
    Ok(())
}

pub(crate) fn npc_buy_sell_choice(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = msg.read_being_id("npc id")?;
    sess.state.current_npc = npc;
    sess.state.push_event(GameEvent::NpcBuySellChoice { npc });
    Ok(())
}

pub(crate) fn npc_buy_list(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = sess.state.current_npc;
    sess.state.shop.npc = npc;
    sess.state.shop.items.clear();
    while msg.remaining() > 0 {
        let price = msg.read_i32("price")?;
        msg.skip(4, "discounted price")?;
        let item_type = msg.read_u8("item type")?;
        let id = athena::ItemId::from_u32(msg.read_u16("item id")? as u32);
        sess.state.shop.items.push(ShopItem {
            inv_slot: 0,
            id,
            item_type: ItemType::from_u8(item_type)
                .unwrap_or(ItemType::Unknown),
            price,
            quantity: 0,
            used_quantity: 0,
        });
    }
    sess.state.push_event(GameEvent::ShopOpened { npc, buying: true });
    Ok(())
}

pub(crate) fn npc_sell_list(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let npc = sess.state.current_npc;
    sess.state.shop.npc = npc;
    sess.state.shop.items.clear();
    while msg.remaining() > 0 {
        let slot = msg.read_u16("index")?.wrapping_sub(INVENTORY_OFFSET);
        let price = msg.read_i32("price")?;
        msg.skip(4, "overcharge price")?;
        let (id, item_type, quantity) = match sess.state.inventory.item(slot) {
            Some(item) => (item.id, item.item_type, item.quantity),
            None => (athena::ItemId::ZERO, ItemType::Unknown, 0),
        };
        sess.state.shop.items.push(ShopItem {
            inv_slot: slot,
            id,
            item_type,
            price,
            quantity,
            used_quantity: 0,
        });
    }
    sess.state.push_event(GameEvent::ShopOpened { npc, buying: false });
    Ok(())
}

pub(crate) fn npc_buy_response(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let flag = msg.read_u8("flag")?;
    sess.state.push_event(GameEvent::NpcBuyResponse { success: flag == 0 });
    Ok(())
}

pub(crate) fn npc_sell_response(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let flag = msg.read_u8("flag")?;
    sess.state.push_event(GameEvent::NpcSellResponse { success: flag == 0 });
    Ok(())
}

pub(crate) fn being_visible(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let id = msg.read_being_id("being id")?;
    msg.skip(2, "speed")?;
    msg.skip(6, "status effects")?;
    let job = msg.read_u16("job")?;
    msg.skip(6, "looks")?;
    msg.skip(12, "equipment looks")?;
    msg.skip(4, "guild id")?;
    msg.skip(6, "emblem, manner, opt3")?;
    msg.skip(2, "karma, gender")?;
    let (x, y, dir) = msg.read_coordinates("position")?;
    msg.skip(5, "unused")?;
    let direction = athena::Direction::from_server_dir(dir).unwrap_or_default();
    sess.state.beings.insert(id, Being { id, job, x, y, direction });
    Ok(())
}

pub(crate) fn being_move(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let id = msg.read_being_id("being id")?;
    msg.skip(2, "speed")?;
    msg.skip(6, "status effects")?;
    let job = msg.read_u16("job")?;
    msg.skip(6, "looks")?;
    msg.skip(4, "tick")?;
    msg.skip(12, "equipment looks")?;
    msg.skip(4, "guild id")?;
    msg.skip(6, "emblem, manner, opt3")?;
    msg.skip(2, "karma, gender")?;
    let (_, _, dst_x, dst_y) = msg.read_coordinate_pair("movement")?;
    msg.skip(5, "unused")?;
    sess.state.beings
        .entry(id)
        .and_modify(|being| {
            being.x = dst_x;
            being.y = dst_y;
        })
        .or_insert(Being {
            id, job, x: dst_x, y: dst_y,
            direction: athena::Direction::default(),
        });
    Ok(())
}

pub(crate) fn being_remove(sess: &mut Session, msg: &mut MessageReader)
    -> Result<(), BufferUnderrun>
{
    let id = msg.read_being_id("being id")?;
    msg.skip(1, "dead flag")?;
    sess.state.beings.remove(&id);
    Ok(())
}
