use athena::{BeingId, ItemId, MessageWriter};

use crate::handlers::{self, BuySellChoice, Handlers, MailOpenType};
use crate::markets;
use crate::session::Session;
use crate::tmwa::protocol::*;
use crate::INVENTORY_OFFSET;

pub fn handlers() -> Handlers {
    Handlers {
        login: Box::new(Login),
        inventory: Box::new(Inventory),
        npc: Box::new(Npc),
        skill: Box::new(Skill),
        trade: Box::new(Trade),
        guild: Box::new(Guild),
        friends: Box::new(Unsupported),
        mail: Box::new(Unsupported),
        pet: Box::new(Unsupported),
        mercenary: Box::new(Unsupported),
        homunculus: Box::new(Unsupported),
        auction: Box::new(Unsupported),
        vending: Box::new(Unsupported),
        buying_store: Box::new(Unsupported),
        bank: Box::new(Unsupported),
        battleground: Box::new(Unsupported),
        search_store: Box::new(Unsupported),
        cash_shop: Box::new(Unsupported),
    }
}

struct Login;

impl handlers::LoginHandler for Login {
    fn request_server_version(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_SERVER_VERSION_REQUEST);
        sess.out.queue(out.finish());
    }

    fn login(&self, sess: &mut Session, username: &str, password: &str) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_LOGIN_REGISTER);
        out.write_i32(0, "client version");
        out.write_string(username, 24, "username");
        out.write_string(password, 24, "password");
        // 0x03: client can handle the gender and version extensions.
        out.write_u8(0x03, "flags");
        sess.out.queue(out.finish());
    }

    fn disconnect(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_CLIENT_DISCONNECT);
        sess.out.queue(out.finish());
    }
}

struct Inventory;

impl handlers::InventoryHandler for Inventory {
    fn equip_item(&self, sess: &mut Session, slot: u16) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_PLAYER_EQUIP);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_i16(0, "unused");
        sess.out.queue(out.finish());
    }

    fn unequip_item(&self, sess: &mut Session, slot: u16) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_PLAYER_UNEQUIP);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        sess.out.queue(out.finish());
    }

    fn use_item(&self, sess: &mut Session, slot: u16) {
        let item_id = sess.state.inventory.item(slot)
            .map_or(ItemId::ZERO, |item| item.id);
        let mut out = MessageWriter::new();
        out.begin(CMSG_PLAYER_INVENTORY_USE);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_u32(item_id.as_u32(), "item id");
        sess.out.queue(out.finish());
    }

    fn drop_item(&self, sess: &mut Session, slot: u16, amount: u16) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_PLAYER_INVENTORY_DROP);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_u16(amount, "amount");
        sess.out.queue(out.finish());
    }

    fn pickup_item(&self, sess: &mut Session, floor_item: BeingId) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_ITEM_PICKUP);
        out.write_being_id(floor_item, "object id");
        sess.out.queue(out.finish());
    }

    fn move_to_storage(&self, sess: &mut Session, slot: u16, amount: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_MOVE_TO_STORAGE);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_i32(amount, "amount");
        sess.out.queue(out.finish());
    }

    fn move_from_storage(&self, sess: &mut Session, slot: u16, amount: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_MOVE_FROM_STORAGE);
        out.write_u16(slot + crate::STORAGE_OFFSET, "index");
        out.write_i32(amount, "amount");
        sess.out.queue(out.finish());
    }

    fn close_storage(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_CLOSE_STORAGE);
        sess.out.queue(out.finish());
    }
}

struct Npc;

impl handlers::NpcHandler for Npc {
    fn talk(&self, sess: &mut Session, npc: BeingId) {
        sess.state.current_npc = npc;
        let mut out = MessageWriter::new();
        out.begin(CMSG_NPC_TALK);
        out.write_being_id(npc, "npc id");
        out.write_u8(0, "unused");
        sess.out.queue(out.finish());
    }

    fn next_dialog(&self, sess: &mut Session, npc: BeingId) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_NPC_NEXT_REQUEST);
        out.write_being_id(npc, "npc id");
        sess.out.queue(out.finish());
    }

    fn close_dialog(&self, sess: &mut Session, npc: BeingId) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_NPC_CLOSE);
        out.write_being_id(npc, "npc id");
        sess.out.queue(out.finish());
    }

    fn list_input(&self, sess: &mut Session, npc: BeingId, value: u8) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_NPC_LIST_CHOICE);
        out.write_being_id(npc, "npc id");
        out.write_u8(value, "choice");
        sess.out.queue(out.finish());
    }

    fn integer_input(&self, sess: &mut Session, npc: BeingId, value: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_NPC_INT_RESPONSE);
        out.write_being_id(npc, "npc id");
        out.write_i32(value, "value");
        sess.out.queue(out.finish());
    }

    fn string_input(&self, sess: &mut Session, npc: BeingId, value: &str) {
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_NPC_STR_RESPONSE);
        out.write_being_id(npc, "npc id");
        out.write_bytes(value.as_bytes(), "value");
        out.write_u8(0, "terminator");
        sess.out.queue(out.finish());
    }

    fn buy_sell_request(&self, sess: &mut Session, npc: BeingId,
        choice: BuySellChoice)
    {
        let mut out = MessageWriter::new();
        out.begin(CMSG_NPC_BUY_SELL_REQUEST);
        out.write_being_id(npc, "npc id");
        out.write_u8(choice as u8, "action");
        sess.out.queue(out.finish());
    }

    fn buy_items(&self, sess: &mut Session) {
        let Some(plan) = markets::plan(&sess.state.shop.items) else {
            return;
        };
        if plan.entries.is_empty() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_NPC_BUY_REQUEST);
        for entry in &plan.entries {
            out.write_u16(entry.amount as u16, "amount");
            out.write_u16(entry.id.as_u16(), "item id");
        }
        sess.out.queue(out.finish());
        markets::apply(&plan, &mut sess.state.shop.items);
    }

    fn sell_items(&self, sess: &mut Session) {
        let Some(plan) = markets::plan(&sess.state.shop.items) else {
            return;
        };
        if plan.entries.is_empty() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_NPC_SELL_REQUEST);
        for entry in &plan.entries {
            out.write_u16(entry.inv_slot + INVENTORY_OFFSET, "index");
            out.write_u16(entry.amount as u16, "amount");
        }
        sess.out.queue(out.finish());
        markets::apply(&plan, &mut sess.state.shop.items);
    }
}

struct Skill;

impl handlers::SkillHandler for Skill {
    fn use_on_being(&self, sess: &mut Session, skill: u16, level: u16,
        target: BeingId)
    {
        let mut out = MessageWriter::new();
        out.begin(CMSG_SKILL_USE_BEING);
        out.write_u16(level, "level");
        out.write_u16(skill, "skill id");
        out.write_being_id(target, "target id");
        sess.out.queue(out.finish());
    }

    fn use_on_position(&self, sess: &mut Session, skill: u16, level: u16,
        x: u16, y: u16)
    {
        let mut out = MessageWriter::new();
        out.begin(CMSG_SKILL_USE_POSITION);
        out.write_u16(level, "level");
        out.write_u16(skill, "skill id");
        out.write_u16(x, "x");
        out.write_u16(y, "y");
        sess.out.queue(out.finish());
    }

    fn use_on_map(&self, sess: &mut Session, skill: u16, map: &str) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_SKILL_USE_MAP);
        out.write_u16(skill, "skill id");
        out.write_string(map, 16, "map name");
        sess.out.queue(out.finish());
    }
}

struct Trade;

impl handlers::TradeHandler for Trade {
    fn request(&self, sess: &mut Session, being: BeingId) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_TRADE_REQUEST);
        out.write_being_id(being, "player id");
        sess.out.queue(out.finish());
    }

    fn respond(&self, sess: &mut Session, accept: bool) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_TRADE_RESPONSE);
        out.write_u8(if accept { 3 } else { 4 }, "answer");
        sess.out.queue(out.finish());
    }

    fn add_item(&self, sess: &mut Session, slot: u16, amount: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_TRADE_ITEM_ADD_REQUEST);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_i32(amount, "amount");
        sess.out.queue(out.finish());
    }

    fn set_money(&self, sess: &mut Session, amount: i32) {
        // Money travels as item index zero.
        let mut out = MessageWriter::new();
        out.begin(CMSG_TRADE_ITEM_ADD_REQUEST);
        out.write_u16(0, "index");
        out.write_i32(amount, "amount");
        sess.out.queue(out.finish());
    }

    fn confirm(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_TRADE_ADD_COMPLETE);
        sess.out.queue(out.finish());
    }

    fn finish(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_TRADE_OK);
        sess.out.queue(out.finish());
    }

    fn cancel(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_TRADE_CANCEL_REQUEST);
        sess.out.queue(out.finish());
    }
}

struct Guild;

impl handlers::GuildHandler for Guild {
    fn create(&self, sess: &mut Session, name: &str) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_GUILD_CREATE);
        out.write_i32(0, "unused");
        out.write_string(name, 24, "guild name");
        sess.out.queue(out.finish());
    }

    fn invite(&self, sess: &mut Session, being: BeingId) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_GUILD_INVITE);
        out.write_being_id(being, "account id");
        out.write_i32(0, "unused");
        out.write_i32(0, "unused");
        sess.out.queue(out.finish());
    }

    fn invite_response(&self, sess: &mut Session, guild_id: i32, accept: bool) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_GUILD_INVITE_REPLY);
        out.write_i32(guild_id, "guild id");
        out.write_i32(i32::from(accept), "answer");
        sess.out.queue(out.finish());
    }

    fn leave(&self, sess: &mut Session, guild_id: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_GUILD_LEAVE);
        out.write_i32(guild_id, "guild id");
        out.write_i32(0, "account id");
        out.write_i32(0, "char id");
        out.write_string("", 40, "reason");
        sess.out.queue(out.finish());
    }

    fn kick(&self, sess: &mut Session, guild_id: i32, account: BeingId) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_GUILD_EXPULSION);
        out.write_i32(guild_id, "guild id");
        out.write_being_id(account, "account id");
        out.write_i32(0, "char id");
        out.write_string("", 40, "reason");
        sess.out.queue(out.finish());
    }

    fn chat(&self, sess: &mut Session, text: &str) {
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_GUILD_MESSAGE);
        out.write_bytes(text.as_bytes(), "message");
        sess.out.queue(out.finish());
    }
}

/// Subsystems the tmwAthena server never grew. Calls are accepted and
/// do nothing, so callers need no family-specific conditionals.
struct Unsupported;

impl handlers::FriendsHandler for Unsupported {
    fn invite(&self, _sess: &mut Session, _name: &str) {}
    fn invite_response(&self, _sess: &mut Session, _account: BeingId,
        _char_id: i32, _accept: bool) {}
    fn remove(&self, _sess: &mut Session, _account: BeingId, _char_id: i32) {}
}

impl handlers::MailHandler for Unsupported {
    fn open_mailbox(&self, _sess: &mut Session, _open_type: MailOpenType) {}
    fn close_mailbox(&self, _sess: &mut Session) {}
    fn refresh_mail_list(&self, _sess: &mut Session, _open_type: MailOpenType,
        _mail_id: i64) {}
    fn next_page(&self, _sess: &mut Session, _open_type: MailOpenType,
        _mail_id: i64) {}
    fn read_mail(&self, _sess: &mut Session, _open_type: MailOpenType,
        _mail_id: i64) {}
    fn delete_mail(&self, _sess: &mut Session, _open_type: MailOpenType,
        _mail_id: i64) {}
    fn request_money(&self, _sess: &mut Session, _open_type: MailOpenType,
        _mail_id: i64) {}
    fn request_items(&self, _sess: &mut Session, _open_type: MailOpenType,
        _mail_id: i64) {}
    fn open_write_mail(&self, _sess: &mut Session, _receiver: &str) {}
    fn cancel_write_mail(&self, _sess: &mut Session) {}
    fn add_item(&self, _sess: &mut Session, _slot: u16, _amount: u16) {}
    fn remove_item(&self, _sess: &mut Session, _slot: u16, _amount: u16) {}
    fn send_mail(&self, _sess: &mut Session, _from: &str, _to: &str,
        _title: &str, _body: &str, _money: i64) {}
    fn check_name(&self, _sess: &mut Session, _name: &str) {}
}

impl handlers::PetHandler for Unsupported {
    fn move_pet(&self, _sess: &mut Session, _pet: BeingId, _x: u16, _y: u16) {}
    fn emote(&self, _sess: &mut Session, _emote: u8) {}
    fn feed(&self, _sess: &mut Session) {}
    fn drop_loot(&self, _sess: &mut Session) {}
    fn return_to_egg(&self, _sess: &mut Session) {}
}

impl handlers::MercenaryHandler for Unsupported {
    fn fire(&self, _sess: &mut Session) {}
    fn move_to_master(&self, _sess: &mut Session) {}
    fn attack(&self, _sess: &mut Session, _target: BeingId, _keep: bool) {}
}

impl handlers::HomunculusHandler for Unsupported {
    fn set_name(&self, _sess: &mut Session, _name: &str) {}
    fn move_to_master(&self, _sess: &mut Session) {}
    fn attack(&self, _sess: &mut Session, _target: BeingId, _keep: bool) {}
    fn feed(&self, _sess: &mut Session) {}
    fn fire(&self, _sess: &mut Session) {}
}

impl handlers::AuctionHandler for Unsupported {
    fn cancel_registration(&self, _sess: &mut Session) {}
    fn set_item(&self, _sess: &mut Session, _slot: u16, _amount: i32) {}
    fn register(&self, _sess: &mut Session, _now_price: i32, _max_price: i32,
        _hours: i16) {}
    fn cancel(&self, _sess: &mut Session, _auction_id: i32) {}
    fn close_own(&self, _sess: &mut Session, _auction_id: i32) {}
    fn bid(&self, _sess: &mut Session, _auction_id: i32, _money: i32) {}
    fn search(&self, _sess: &mut Session, _kind: i16, _auction_id: i32,
        _text: &str, _page: i16) {}
}

impl handlers::VendingHandler for Unsupported {
    fn close(&self, _sess: &mut Session) {}
    fn open(&self, _sess: &mut Session, _being: BeingId) {}
    fn create_shop(&self, _sess: &mut Session, _name: &str, _flag: bool) {}
    fn buy_item(&self, _sess: &mut Session, _vender: BeingId, _index: u16,
        _amount: u16) {}
}

impl handlers::BuyingStoreHandler for Unsupported {
    fn create(&self, _sess: &mut Session, _name: &str, _max_money: i32,
        _flag: bool) {}
    fn close(&self, _sess: &mut Session) {}
    fn open(&self, _sess: &mut Session, _being: BeingId) {}
    fn sell(&self, _sess: &mut Session, _account: BeingId, _store_id: i32,
        _slot: u16, _id: ItemId, _amount: u16) {}
}

impl handlers::BankHandler for Unsupported {
    fn deposit(&self, _sess: &mut Session, _money: i32) {}
    fn withdraw(&self, _sess: &mut Session, _money: i32) {}
    fn check(&self, _sess: &mut Session) {}
}

impl handlers::BattlegroundHandler for Unsupported {
    fn register(&self, _sess: &mut Session, _kind: u16, _name: &str) {}
    fn leave(&self, _sess: &mut Session) {}
}

impl handlers::SearchStoreHandler for Unsupported {
    fn search(&self, _sess: &mut Session, _kind: u8, _min_price: i32,
        _max_price: i32, _items: &[ItemId]) {}
    fn next_page(&self, _sess: &mut Session) {}
    fn close(&self, _sess: &mut Session) {}
}

impl handlers::CashShopHandler for Unsupported {
    fn buy_item(&self, _sess: &mut Session, _points: i32, _id: ItemId,
        _amount: u16) {}
    fn close(&self, _sess: &mut Session) {}
}

#[cfg(test)]
mod tests {
    use athena::{ItemType, NetworkVersion, PacketVersion, ServerVariant};

    use crate::handlers::{InventoryHandler, NpcHandler};
    use crate::handlers::BankHandler;
    use crate::state::ShopItem;
    use crate::ServerFamily;

    use super::*;

    fn session() -> Session {
        Session::new(ServerFamily::TmwAthena, NetworkVersion::new(
            PacketVersion::new(0), ServerVariant::Main))
    }

    #[test]
    fn drop_item_applies_the_inventory_offset() {
        let mut sess = session();
        Inventory.drop_item(&mut sess, 0, 1);
        let packet = sess.out.pop().unwrap();
        assert_eq!(packet, vec![0xa2, 0x00, 0x02, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn move_from_storage_applies_the_storage_offset() {
        let mut sess = session();
        Inventory.move_from_storage(&mut sess, 0, 1);
        let packet = sess.out.pop().unwrap();
        assert_eq!(&packet[..4], &[0xf5, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn unsupported_subsystem_is_a_silent_noop() {
        let mut sess = session();
        Unsupported.deposit(&mut sess, 1000);
        assert!(sess.out.is_empty());
        assert!(sess.state.next_event().is_none());
    }

    #[test]
    fn sell_sends_slots_and_folds_staged_amounts() {
        let mut sess = session();
        sess.state.shop.items.push(ShopItem {
            inv_slot: 4,
            id: athena::ItemId::from_u32(512),
            item_type: ItemType::Usable,
            price: 10,
            quantity: 2,
            used_quantity: 3,
        });
        Npc.sell_items(&mut sess);

        let packet = sess.out.pop().unwrap();
        // opcode + length + one entry (index, amount)
        assert_eq!(packet, vec![0xc9, 0x00, 0x08, 0x00, 0x06, 0x00, 0x03, 0x00]);
        assert_eq!(sess.state.shop.items[0].quantity, 5);
        assert_eq!(sess.state.shop.items[0].used_quantity, 0);
    }

    #[test]
    fn oversized_sell_sends_nothing_and_keeps_state() {
        let mut sess = session();
        sess.state.shop.items.push(ShopItem {
            inv_slot: 1,
            id: athena::ItemId::from_u32(1201),
            item_type: ItemType::Weapon,
            price: 50,
            quantity: 0,
            used_quantity: 101,
        });
        Npc.sell_items(&mut sess);

        assert!(sess.out.is_empty());
        assert_eq!(sess.state.shop.items[0].used_quantity, 101);
    }
}
