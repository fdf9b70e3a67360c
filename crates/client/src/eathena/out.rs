use athena::{BeingId, ItemId, MessageWriter};
use tracing::warn;

use crate::eathena::protocol::*;
use crate::handlers::{self, BuySellChoice, Handlers, MailOpenType};
use crate::markets;
use crate::session::Session;
use crate::{INVENTORY_OFFSET, STORAGE_OFFSET};

/// Revisions in which the mail subsystem packets appeared. The rewrite
/// landed piecemeal, so nearly every operation has its own date.
mod mail {
    pub const CLOSE_MAILBOX: u32 = 20131211;
    pub const LIST: u32 = 20131218;
    pub const READ: u32 = 20131223;
    pub const SEND: u32 = 20131230;
    pub const OPEN_MAILBOX: u32 = 20140212;
    pub const MONEY_ITEMS_CANCEL: u32 = 20140326;
    pub const OPEN_WRITE: u32 = 20140416;
    pub const CHECK_NAME: u32 = 20140423;
    /// From here the send packet carries a receiving character id.
    pub const SEND_CHAR_ID: u32 = 20160600;
}

/// The equip request grew a 4-byte position mask in this revision.
const EQUIP_POSITION_WIDE: u32 = 20130320;

pub fn handlers() -> Handlers {
    Handlers {
        login: Box::new(Login),
        inventory: Box::new(Inventory),
        npc: Box::new(Npc),
        skill: Box::new(Skill),
        trade: Box::new(Trade),
        guild: Box::new(Guild),
        friends: Box::new(Friends),
        mail: Box::new(Mail),
        pet: Box::new(Pet),
        mercenary: Box::new(Mercenary),
        homunculus: Box::new(Homunculus),
        auction: Box::new(Auction),
        vending: Box::new(Vending),
        buying_store: Box::new(BuyingStore),
        bank: Box::new(Bank),
        battleground: Box::new(Battleground),
        search_store: Box::new(SearchStore),
        cash_shop: Box::new(CashShop),
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
        out.write_u32(sess.version().packet.as_u32(), "client version");
        out.write_string(username, 24, "username");
        out.write_string(password, 24, "password");
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
        if sess.version().at_least(EQUIP_POSITION_WIDE) {
            out.begin(CMSG_PLAYER_EQUIP2);
            out.write_u16(slot + INVENTORY_OFFSET, "index");
            out.write_u32(0, "position");
        } else {
            out.begin(CMSG_PLAYER_EQUIP);
            out.write_u16(slot + INVENTORY_OFFSET, "index");
            out.write_u16(0, "position");
        }
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
        out.write_u16(slot + STORAGE_OFFSET, "index");
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

struct Friends;

impl handlers::FriendsHandler for Friends {
    fn invite(&self, sess: &mut Session, name: &str) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_FRIENDS_ADD_PLAYER);
        out.write_string(name, 24, "name");
        sess.out.queue(out.finish());
    }

    fn invite_response(&self, sess: &mut Session, account: BeingId,
        char_id: i32, accept: bool)
    {
        let mut out = MessageWriter::new();
        out.begin(CMSG_FRIENDS_REQUEST_ACK);
        out.write_being_id(account, "account id");
        out.write_i32(char_id, "char id");
        out.write_i32(i32::from(accept), "accept");
        sess.out.queue(out.finish());
    }

    fn remove(&self, sess: &mut Session, account: BeingId, char_id: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_FRIENDS_DELETE_PLAYER);
        out.write_being_id(account, "account id");
        out.write_i32(char_id, "char id");
        sess.out.queue(out.finish());
    }
}

struct Mail;

impl handlers::MailHandler for Mail {
    fn open_mailbox(&self, sess: &mut Session, open_type: MailOpenType) {
        if sess.version().below(mail::OPEN_MAILBOX) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_OPEN_MAILBOX);
        out.write_u8(open_type as u8, "open type");
        out.write_i64(0, "mail id");
        sess.out.queue(out.finish());
    }

    fn close_mailbox(&self, sess: &mut Session) {
        if sess.version().below(mail::CLOSE_MAILBOX) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_CLOSE_MAILBOX);
        sess.out.queue(out.finish());
    }

    fn refresh_mail_list(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64)
    {
        if sess.version().below(mail::LIST) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_REFRESH_MAIL_LIST);
        out.write_u8(open_type as u8, "open type");
        out.write_i64(mail_id, "mail id");
        sess.out.queue(out.finish());
    }

    fn next_page(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64)
    {
        if sess.version().below(mail::LIST) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_NEXT_PAGE);
        out.write_u8(open_type as u8, "open type");
        out.write_i64(mail_id, "mail id");
        sess.out.queue(out.finish());
    }

    fn read_mail(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64)
    {
        if sess.version().below(mail::READ) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_READ_MAIL);
        out.write_u8(open_type as u8, "open type");
        out.write_i64(mail_id, "mail id");
        sess.out.queue(out.finish());
    }

    fn delete_mail(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64)
    {
        if sess.version().below(mail::LIST) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_DELETE_MAIL);
        out.write_u8(open_type as u8, "open type");
        out.write_i64(mail_id, "mail id");
        sess.out.queue(out.finish());
    }

    // Unlike the other mail packets, the id precedes the open type here.
    fn request_money(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64)
    {
        if sess.version().below(mail::MONEY_ITEMS_CANCEL) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_REQUEST_MONEY);
        out.write_i64(mail_id, "mail id");
        out.write_u8(open_type as u8, "open type");
        sess.out.queue(out.finish());
    }

    fn request_items(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64)
    {
        if sess.version().below(mail::MONEY_ITEMS_CANCEL) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_REQUEST_ITEMS);
        out.write_i64(mail_id, "mail id");
        out.write_u8(open_type as u8, "open type");
        sess.out.queue(out.finish());
    }

    fn open_write_mail(&self, sess: &mut Session, receiver: &str) {
        if sess.version().below(mail::OPEN_WRITE) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_OPEN_WRITE_MAIL);
        out.write_string(receiver, 24, "receiver name");
        sess.out.queue(out.finish());
    }

    fn cancel_write_mail(&self, sess: &mut Session) {
        if sess.version().below(mail::MONEY_ITEMS_CANCEL) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_CANCEL_WRITE_MAIL);
        sess.out.queue(out.finish());
    }

    fn add_item(&self, sess: &mut Session, slot: u16, amount: u16) {
        if sess.version().below(mail::OPEN_WRITE) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_ADD_ITEM_TO_MAIL);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_u16(amount, "amount");
        sess.out.queue(out.finish());
    }

    fn remove_item(&self, sess: &mut Session, slot: u16, amount: u16) {
        if sess.version().below(mail::OPEN_WRITE) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_REMOVE_ITEM_MAIL);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_u16(amount, "amount");
        sess.out.queue(out.finish());
    }

    fn send_mail(&self, sess: &mut Session, from: &str, to: &str,
        title: &str, body: &str, money: i64)
    {
        if sess.version().below(mail::SEND) {
            return;
        }
        // Field sizes include the NUL terminators.
        let title_len = title.len() + 1;
        let body_len = body.len() + 1;
        let total = 2 + 2 + 24 + 24 + 8 + 2 + 2 + title_len + body_len;
        if total > 32767 - 4 {
            warn!("mail message too big ({total} bytes), not sent");
            return;
        }

        let mut out = MessageWriter::new();
        out.begin_var(CMSG_MAIL2_SEND_MAIL);
        out.write_string(to, 24, "to");
        out.write_string(from, 24, "from");
        out.write_i64(money, "money");
        out.write_u16(title_len as u16, "title length");
        out.write_u16(body_len as u16, "body length");
        if sess.version().at_least(mail::SEND_CHAR_ID) {
            out.write_i32(0, "receiver char id");
        }
        out.write_string(title, title_len, "title");
        out.write_string(body, body_len, "body");
        sess.out.queue(out.finish());
    }

    fn check_name(&self, sess: &mut Session, name: &str) {
        if sess.version().below(mail::CHECK_NAME) {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_MAIL2_CHECK_NAME);
        out.write_string(name, 24, "name");
        sess.out.queue(out.finish());
    }
}

struct Pet;

impl handlers::PetHandler for Pet {
    fn move_pet(&self, sess: &mut Session, pet: BeingId, x: u16, y: u16) {
        if !sess.features.have_move_pet() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_PET_MOVE_TO);
        out.write_being_id(pet, "pet id");
        out.write_u16(x, "x");
        out.write_u16(y, "y");
        sess.out.queue(out.finish());
    }

    fn emote(&self, sess: &mut Session, emote: u8) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_PET_EMOTE);
        out.write_u8(emote, "emote");
        sess.out.queue(out.finish());
    }

    fn feed(&self, sess: &mut Session) {
        menu_action(sess, 1);
    }

    fn drop_loot(&self, sess: &mut Session) {
        // "Performance"; loot drop shares the menu packet.
        menu_action(sess, 2);
    }

    fn return_to_egg(&self, sess: &mut Session) {
        menu_action(sess, 3);
    }
}

fn menu_action(sess: &mut Session, action: u8) {
    let mut out = MessageWriter::new();
    out.begin(CMSG_PET_MENU_ACTION);
    out.write_u8(action, "action");
    sess.out.queue(out.finish());
}

struct Mercenary;

impl handlers::MercenaryHandler for Mercenary {
    fn fire(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_MERCENARY_ACTION);
        out.write_u8(2, "action");
        sess.out.queue(out.finish());
    }

    fn move_to_master(&self, sess: &mut Session) {
        let mercenary = sess.state.mercenary;
        if !mercenary.is_valid() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_HOMMERC_MOVE_TO_MASTER);
        out.write_being_id(mercenary, "mercenary id");
        sess.out.queue(out.finish());
    }

    fn attack(&self, sess: &mut Session, target: BeingId, keep: bool) {
        let mercenary = sess.state.mercenary;
        if !mercenary.is_valid() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_HOMMERC_ATTACK);
        out.write_being_id(mercenary, "mercenary id");
        out.write_being_id(target, "target id");
        out.write_u8(u8::from(keep), "keep");
        sess.out.queue(out.finish());
    }
}

struct Homunculus;

impl handlers::HomunculusHandler for Homunculus {
    fn set_name(&self, sess: &mut Session, name: &str) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_HOMMERC_SET_NAME);
        out.write_string(name, 24, "name");
        sess.out.queue(out.finish());
    }

    fn move_to_master(&self, sess: &mut Session) {
        let homunculus = sess.state.homunculus;
        if !homunculus.is_valid() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_HOMMERC_MOVE_TO_MASTER);
        out.write_being_id(homunculus, "homunculus id");
        sess.out.queue(out.finish());
    }

    fn attack(&self, sess: &mut Session, target: BeingId, keep: bool) {
        let homunculus = sess.state.homunculus;
        if !homunculus.is_valid() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_HOMMERC_ATTACK);
        out.write_being_id(homunculus, "homunculus id");
        out.write_being_id(target, "target id");
        out.write_u8(u8::from(keep), "keep");
        sess.out.queue(out.finish());
    }

    fn feed(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_HOMUNCULUS_MENU);
        out.write_i16(0, "type");
        out.write_u8(1, "command");
        sess.out.queue(out.finish());
    }

    fn fire(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_HOMUNCULUS_MENU);
        out.write_i16(0, "type");
        out.write_u8(2, "command");
        sess.out.queue(out.finish());
    }
}

struct Auction;

impl handlers::AuctionHandler for Auction {
    fn cancel_registration(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_AUCTION_CANCEL_REQUEST);
        out.write_u16(0, "type");
        sess.out.queue(out.finish());
    }

    fn set_item(&self, sess: &mut Session, slot: u16, amount: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_AUCTION_SET_ITEM);
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_i32(amount, "amount");
        sess.out.queue(out.finish());
    }

    fn register(&self, sess: &mut Session, now_price: i32, max_price: i32,
        hours: i16)
    {
        let mut out = MessageWriter::new();
        out.begin(CMSG_AUCTION_REGISTER);
        out.write_i32(now_price, "now price");
        out.write_i32(max_price, "max price");
        out.write_i16(hours, "hours");
        sess.out.queue(out.finish());
    }

    fn cancel(&self, sess: &mut Session, auction_id: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_AUCTION_CANCEL);
        out.write_i32(auction_id, "auction id");
        sess.out.queue(out.finish());
    }

    fn close_own(&self, sess: &mut Session, auction_id: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_AUCTION_CLOSE);
        out.write_i32(auction_id, "auction id");
        sess.out.queue(out.finish());
    }

    fn bid(&self, sess: &mut Session, auction_id: i32, money: i32) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_AUCTION_BID);
        out.write_i32(auction_id, "auction id");
        out.write_i32(money, "money");
        sess.out.queue(out.finish());
    }

    fn search(&self, sess: &mut Session, kind: i16, auction_id: i32,
        text: &str, page: i16)
    {
        let mut out = MessageWriter::new();
        out.begin(CMSG_AUCTION_SEARCH);
        out.write_i16(kind, "search type");
        out.write_i32(auction_id, "auction id");
        out.write_string(text, 24, "search text");
        out.write_i16(page, "page");
        sess.out.queue(out.finish());
    }
}

struct Vending;

impl handlers::VendingHandler for Vending {
    fn close(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_VENDING_CLOSE);
        sess.out.queue(out.finish());
    }

    fn open(&self, sess: &mut Session, being: BeingId) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_VENDING_LIST_REQUEST);
        out.write_being_id(being, "vender id");
        sess.out.queue(out.finish());
    }

    fn create_shop(&self, sess: &mut Session, name: &str, flag: bool) {
        let Some(plan) = markets::plan(&sess.state.shop.items) else {
            return;
        };
        if plan.entries.is_empty() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_VENDING_CREATE);
        out.write_string(name, 80, "shop name");
        out.write_u8(u8::from(flag), "flag");
        for entry in &plan.entries {
            out.write_u16(entry.inv_slot + INVENTORY_OFFSET, "index");
            out.write_u16(entry.amount as u16, "amount");
            out.write_i32(entry.price, "price");
        }
        sess.out.queue(out.finish());
        markets::apply(&plan, &mut sess.state.shop.items);
    }

    fn buy_item(&self, sess: &mut Session, vender: BeingId, index: u16,
        amount: u16)
    {
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_VENDING_BUY);
        out.write_being_id(vender, "vender id");
        out.write_u16(amount, "amount");
        out.write_u16(index, "index");
        sess.out.queue(out.finish());
    }
}

struct BuyingStore;

impl handlers::BuyingStoreHandler for BuyingStore {
    fn create(&self, sess: &mut Session, name: &str, max_money: i32,
        flag: bool)
    {
        if !sess.features.have_buying_store() {
            return;
        }
        let Some(plan) = markets::plan(&sess.state.shop.items) else {
            return;
        };
        if plan.entries.is_empty() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_BUYINGSTORE_CREATE);
        out.write_i32(max_money, "limit money");
        out.write_u8(u8::from(flag), "flag");
        out.write_string(name, 80, "store name");
        for entry in &plan.entries {
            out.write_u16(entry.id.as_u16(), "item id");
            out.write_u16(entry.amount as u16, "amount");
            out.write_i32(entry.price, "price");
        }
        sess.out.queue(out.finish());
        markets::apply(&plan, &mut sess.state.shop.items);
    }

    fn close(&self, sess: &mut Session) {
        if !sess.features.have_buying_store() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_BUYINGSTORE_CLOSE);
        sess.out.queue(out.finish());
    }

    fn open(&self, sess: &mut Session, being: BeingId) {
        if !sess.features.have_buying_store() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_BUYINGSTORE_OPEN);
        out.write_being_id(being, "account id");
        sess.out.queue(out.finish());
    }

    fn sell(&self, sess: &mut Session, account: BeingId, store_id: i32,
        slot: u16, id: ItemId, amount: u16)
    {
        if !sess.features.have_buying_store() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_BUYINGSTORE_SELL);
        out.write_being_id(account, "account id");
        out.write_i32(store_id, "store id");
        out.write_u16(slot + INVENTORY_OFFSET, "index");
        out.write_u16(id.as_u16(), "item id");
        out.write_u16(amount, "amount");
        sess.out.queue(out.finish());
    }
}

struct Bank;

impl handlers::BankHandler for Bank {
    fn deposit(&self, sess: &mut Session, money: i32) {
        if !sess.features.have_bank() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_BANK_DEPOSIT);
        out.write_u32(0, "account id");
        out.write_i32(money, "money");
        sess.out.queue(out.finish());
    }

    fn withdraw(&self, sess: &mut Session, money: i32) {
        if !sess.features.have_bank() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_BANK_WITHDRAW);
        out.write_u32(0, "account id");
        out.write_i32(money, "money");
        sess.out.queue(out.finish());
    }

    fn check(&self, sess: &mut Session) {
        if !sess.features.have_bank() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_BANK_CHECK);
        out.write_u32(0, "account id");
        sess.out.queue(out.finish());
    }
}

struct Battleground;

impl handlers::BattlegroundHandler for Battleground {
    fn register(&self, sess: &mut Session, kind: u16, name: &str) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_BATTLE_REGISTER);
        out.write_u16(kind, "battle type");
        out.write_string(name, 24, "battleground name");
        sess.out.queue(out.finish());
    }

    fn leave(&self, sess: &mut Session) {
        let mut out = MessageWriter::new();
        out.begin(CMSG_BATTLE_LEAVE);
        sess.out.queue(out.finish());
    }
}

struct SearchStore;

impl handlers::SearchStoreHandler for SearchStore {
    fn search(&self, sess: &mut Session, kind: u8, min_price: i32,
        max_price: i32, items: &[ItemId])
    {
        if !sess.features.have_search_store() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_SEARCHSTORE_SEARCH);
        out.write_u8(kind, "search type");
        out.write_i32(max_price, "max price");
        out.write_i32(min_price, "min price");
        out.write_u8(items.len() as u8, "item count");
        out.write_u8(0, "card count");
        for id in items {
            out.write_u16(id.as_u16(), "item id");
        }
        sess.out.queue(out.finish());
    }

    fn next_page(&self, sess: &mut Session) {
        if !sess.features.have_search_store() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_SEARCHSTORE_NEXT_PAGE);
        sess.out.queue(out.finish());
    }

    fn close(&self, sess: &mut Session) {
        if !sess.features.have_search_store() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_SEARCHSTORE_CLOSE);
        sess.out.queue(out.finish());
    }
}

struct CashShop;

impl handlers::CashShopHandler for CashShop {
    fn buy_item(&self, sess: &mut Session, points: i32, id: ItemId,
        amount: u16)
    {
        if !sess.features.have_cash_shop() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin_var(CMSG_CASH_SHOP_BUY);
        out.write_i32(points, "points");
        out.write_u16(1, "item count");
        out.write_u16(amount, "amount");
        out.write_u16(id.as_u16(), "item id");
        sess.out.queue(out.finish());
    }

    fn close(&self, sess: &mut Session) {
        if !sess.features.have_cash_shop() {
            return;
        }
        let mut out = MessageWriter::new();
        out.begin(CMSG_CASH_SHOP_CLOSE);
        sess.out.queue(out.finish());
    }
}

#[cfg(test)]
mod tests {
    use athena::{NetworkVersion, PacketVersion, ServerVariant};

    use crate::handlers::{BankHandler, InventoryHandler, MailHandler};
    use crate::ServerFamily;

    use super::*;

    fn session(packet: u32) -> Session {
        Session::new(ServerFamily::EAthena, NetworkVersion::new(
            PacketVersion::new(packet), ServerVariant::Main))
    }

    #[test]
    fn bank_deposit_layout() {
        let mut sess = session(20130724);
        Bank.deposit(&mut sess, 1000);
        let packet = sess.out.pop().unwrap();
        assert_eq!(packet, vec![0xa7, 0x09, 0x00, 0x00, 0x00, 0x00,
            0xe8, 0x03, 0x00, 0x00]);
    }

    #[test]
    fn bank_is_silent_before_its_revision() {
        let mut sess = session(20130723);
        Bank.deposit(&mut sess, 1000);
        Bank.withdraw(&mut sess, 1000);
        Bank.check(&mut sess);
        assert!(sess.out.is_empty());
    }

    #[test]
    fn send_mail_grows_by_char_id_at_the_boundary() {
        let mut sess = session(20160599);
        Mail.send_mail(&mut sess, "Alice", "Bob", "hi", "text", 0);
        let old = sess.out.pop().unwrap();

        let mut sess = session(20160600);
        Mail.send_mail(&mut sess, "Alice", "Bob", "hi", "text", 0);
        let new = sess.out.pop().unwrap();

        assert_eq!(new.len(), old.len() + 4);
        // to(24) + from(24) + money(8) + 2 + 2, then the char id.
        assert_eq!(&new[64..68], &[0, 0, 0, 0]);
        // Identical up to the char id, bar the length field.
        assert_eq!(&old[4..64], &new[4..64]);
    }

    #[test]
    fn send_mail_terminates_title_and_body() {
        let mut sess = session(20140000);
        Mail.send_mail(&mut sess, "Alice", "Bob", "hi", "text", 42);
        let packet = sess.out.pop().unwrap();
        // title: "hi\0", body: "text\0" at the tail.
        assert_eq!(&packet[packet.len() - 8..], b"hi\0text\0");
        assert_eq!(packet.len(), 4 + 24 + 24 + 8 + 2 + 2 + 3 + 5);
    }

    #[test]
    fn mail_below_revision_is_silent() {
        let mut sess = session(20131210);
        Mail.open_mailbox(&mut sess, MailOpenType::Mail);
        Mail.close_mailbox(&mut sess);
        Mail.send_mail(&mut sess, "a", "b", "t", "b", 0);
        assert!(sess.out.is_empty());
    }

    #[test]
    fn equip_uses_the_wide_mask_from_20130320() {
        let mut sess = session(20130319);
        Inventory.equip_item(&mut sess, 0);
        assert_eq!(sess.out.pop().unwrap(),
            vec![0xa9, 0x00, 0x02, 0x00, 0x00, 0x00]);

        let mut sess = session(20130320);
        Inventory.equip_item(&mut sess, 0);
        assert_eq!(sess.out.pop().unwrap(),
            vec![0x98, 0x09, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }
}
