use athena::{BeingId, ItemId, NetworkVersion};

use crate::session::Session;
use crate::{eathena, tmwa, ServerFamily};

/// Which mailbox a mail operation addresses.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum MailOpenType {
    #[default]
    Mail = 0,
    Account = 1,
    Return = 2,
}

/// Player's answer to the buy-or-sell NPC prompt.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BuySellChoice {
    Buy = 0,
    Sell = 1,
}

/// Outgoing handlers, one trait per game subsystem.
///
/// Every method builds at most one packet into the session outbox.
/// Operations a family does not support, or that the negotiated version
/// predates, build nothing and mutate nothing; they never error.

pub trait LoginHandler {
    fn request_server_version(&self, sess: &mut Session);
    fn login(&self, sess: &mut Session, username: &str, password: &str);
    fn disconnect(&self, sess: &mut Session);
}

pub trait InventoryHandler {
    fn equip_item(&self, sess: &mut Session, slot: u16);
    fn unequip_item(&self, sess: &mut Session, slot: u16);
    fn use_item(&self, sess: &mut Session, slot: u16);
    fn drop_item(&self, sess: &mut Session, slot: u16, amount: u16);
    fn pickup_item(&self, sess: &mut Session, floor_item: BeingId);
    fn move_to_storage(&self, sess: &mut Session, slot: u16, amount: i32);
    fn move_from_storage(&self, sess: &mut Session, slot: u16, amount: i32);
    fn close_storage(&self, sess: &mut Session);
}

pub trait NpcHandler {
    fn talk(&self, sess: &mut Session, npc: BeingId);
    fn next_dialog(&self, sess: &mut Session, npc: BeingId);
    fn close_dialog(&self, sess: &mut Session, npc: BeingId);
    fn list_input(&self, sess: &mut Session, npc: BeingId, value: u8);
    fn integer_input(&self, sess: &mut Session, npc: BeingId, value: i32);
    fn string_input(&self, sess: &mut Session, npc: BeingId, value: &str);
    fn buy_sell_request(&self, sess: &mut Session, npc: BeingId,
        choice: BuySellChoice);
    /// Send the staged buy transaction from the open shop dialog.
    fn buy_items(&self, sess: &mut Session);
    /// Send the staged sell transaction from the open shop dialog.
    fn sell_items(&self, sess: &mut Session);
}

pub trait SkillHandler {
    fn use_on_being(&self, sess: &mut Session, skill: u16, level: u16,
        target: BeingId);
    fn use_on_position(&self, sess: &mut Session, skill: u16, level: u16,
        x: u16, y: u16);
    fn use_on_map(&self, sess: &mut Session, skill: u16, map: &str);
}

pub trait TradeHandler {
    fn request(&self, sess: &mut Session, being: BeingId);
    fn respond(&self, sess: &mut Session, accept: bool);
    fn add_item(&self, sess: &mut Session, slot: u16, amount: i32);
    fn set_money(&self, sess: &mut Session, amount: i32);
    fn confirm(&self, sess: &mut Session);
    fn finish(&self, sess: &mut Session);
    fn cancel(&self, sess: &mut Session);
}

pub trait GuildHandler {
    fn create(&self, sess: &mut Session, name: &str);
    fn invite(&self, sess: &mut Session, being: BeingId);
    fn invite_response(&self, sess: &mut Session, guild_id: i32, accept: bool);
    fn leave(&self, sess: &mut Session, guild_id: i32);
    fn kick(&self, sess: &mut Session, guild_id: i32, account: BeingId);
    fn chat(&self, sess: &mut Session, text: &str);
}

pub trait FriendsHandler {
    fn invite(&self, sess: &mut Session, name: &str);
    fn invite_response(&self, sess: &mut Session, account: BeingId,
        char_id: i32, accept: bool);
    fn remove(&self, sess: &mut Session, account: BeingId, char_id: i32);
}

pub trait MailHandler {
    fn open_mailbox(&self, sess: &mut Session, open_type: MailOpenType);
    fn close_mailbox(&self, sess: &mut Session);
    fn refresh_mail_list(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64);
    fn next_page(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64);
    fn read_mail(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64);
    fn delete_mail(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64);
    fn request_money(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64);
    fn request_items(&self, sess: &mut Session, open_type: MailOpenType,
        mail_id: i64);
    fn open_write_mail(&self, sess: &mut Session, receiver: &str);
    fn cancel_write_mail(&self, sess: &mut Session);
    fn add_item(&self, sess: &mut Session, slot: u16, amount: u16);
    fn remove_item(&self, sess: &mut Session, slot: u16, amount: u16);
    fn send_mail(&self, sess: &mut Session, from: &str, to: &str,
        title: &str, body: &str, money: i64);
    fn check_name(&self, sess: &mut Session, name: &str);
}

pub trait PetHandler {
    fn move_pet(&self, sess: &mut Session, pet: BeingId, x: u16, y: u16);
    fn emote(&self, sess: &mut Session, emote: u8);
    fn feed(&self, sess: &mut Session);
    fn drop_loot(&self, sess: &mut Session);
    fn return_to_egg(&self, sess: &mut Session);
}

pub trait MercenaryHandler {
    fn fire(&self, sess: &mut Session);
    fn move_to_master(&self, sess: &mut Session);
    fn attack(&self, sess: &mut Session, target: BeingId, keep: bool);
}

pub trait HomunculusHandler {
    fn set_name(&self, sess: &mut Session, name: &str);
    fn move_to_master(&self, sess: &mut Session);
    fn attack(&self, sess: &mut Session, target: BeingId, keep: bool);
    fn feed(&self, sess: &mut Session);
    fn fire(&self, sess: &mut Session);
}

pub trait AuctionHandler {
    fn cancel_registration(&self, sess: &mut Session);
    fn set_item(&self, sess: &mut Session, slot: u16, amount: i32);
    fn register(&self, sess: &mut Session, now_price: i32, max_price: i32,
        hours: i16);
    fn cancel(&self, sess: &mut Session, auction_id: i32);
    fn close_own(&self, sess: &mut Session, auction_id: i32);
    fn bid(&self, sess: &mut Session, auction_id: i32, money: i32);
    fn search(&self, sess: &mut Session, kind: i16, auction_id: i32,
        text: &str, page: i16);
}

pub trait VendingHandler {
    fn close(&self, sess: &mut Session);
    fn open(&self, sess: &mut Session, being: BeingId);
    /// Open own shop from the staged sell list.
    fn create_shop(&self, sess: &mut Session, name: &str, flag: bool);
    fn buy_item(&self, sess: &mut Session, vender: BeingId, index: u16,
        amount: u16);
}

pub trait BuyingStoreHandler {
    /// Open own buying store from the staged buy list.
    fn create(&self, sess: &mut Session, name: &str, max_money: i32,
        flag: bool);
    fn close(&self, sess: &mut Session);
    fn open(&self, sess: &mut Session, being: BeingId);
    fn sell(&self, sess: &mut Session, account: BeingId, store_id: i32,
        slot: u16, id: ItemId, amount: u16);
}

pub trait BankHandler {
    fn deposit(&self, sess: &mut Session, money: i32);
    fn withdraw(&self, sess: &mut Session, money: i32);
    fn check(&self, sess: &mut Session);
}

pub trait BattlegroundHandler {
    fn register(&self, sess: &mut Session, kind: u16, name: &str);
    fn leave(&self, sess: &mut Session);
}

pub trait SearchStoreHandler {
    fn search(&self, sess: &mut Session, kind: u8, min_price: i32,
        max_price: i32, items: &[ItemId]);
    fn next_page(&self, sess: &mut Session);
    fn close(&self, sess: &mut Session);
}

pub trait CashShopHandler {
    fn buy_item(&self, sess: &mut Session, points: i32, id: ItemId,
        amount: u16);
    fn close(&self, sess: &mut Session);
}

/// The full outgoing surface of one protocol family, bound at connect
/// time. Replaces per-subsystem mutable globals with one injected bundle.
pub struct Handlers {
    pub login: Box<dyn LoginHandler>,
    pub inventory: Box<dyn InventoryHandler>,
    pub npc: Box<dyn NpcHandler>,
    pub skill: Box<dyn SkillHandler>,
    pub trade: Box<dyn TradeHandler>,
    pub guild: Box<dyn GuildHandler>,
    pub friends: Box<dyn FriendsHandler>,
    pub mail: Box<dyn MailHandler>,
    pub pet: Box<dyn PetHandler>,
    pub mercenary: Box<dyn MercenaryHandler>,
    pub homunculus: Box<dyn HomunculusHandler>,
    pub auction: Box<dyn AuctionHandler>,
    pub vending: Box<dyn VendingHandler>,
    pub buying_store: Box<dyn BuyingStoreHandler>,
    pub bank: Box<dyn BankHandler>,
    pub battleground: Box<dyn BattlegroundHandler>,
    pub search_store: Box<dyn SearchStoreHandler>,
    pub cash_shop: Box<dyn CashShopHandler>,
}

/// The protocol family selector: bind the concrete handler set for the
/// session's server family. The session itself carries the negotiated
/// version; handlers consult it per call.
pub fn handlers_for(family: ServerFamily) -> Handlers {
    match family {
        ServerFamily::TmwAthena => tmwa::handlers(),
        ServerFamily::EAthena => eathena::handlers(),
    }
}

/// Convenience: one session plus its family's handlers.
pub fn create_session(family: ServerFamily, version: NetworkVersion)
    -> (Session, Handlers)
{
    (Session::new(family, version), handlers_for(family))
}

#[cfg(test)]
mod tests {
    use athena::{PacketVersion, ServerVariant};

    use super::*;

    fn version(packet: u32) -> NetworkVersion {
        NetworkVersion::new(PacketVersion::new(packet), ServerVariant::Main)
    }

    #[test]
    fn families_build_their_own_equip_packet() {
        let (mut sess, handlers) =
            create_session(ServerFamily::TmwAthena, version(0));
        handlers.inventory.equip_item(&mut sess, 0);
        let tmwa_packet = sess.out.pop().unwrap();
        assert_eq!(&tmwa_packet[..2], &[0xa9, 0x00]);

        let (mut sess, handlers) =
            create_session(ServerFamily::EAthena, version(20150513));
        handlers.inventory.equip_item(&mut sess, 0);
        let ea_packet = sess.out.pop().unwrap();
        assert_eq!(&ea_packet[..2], &[0x98, 0x09]);
    }

    #[test]
    fn unsupported_subsystems_stay_silent() {
        let (mut sess, handlers) =
            create_session(ServerFamily::TmwAthena, version(0));
        handlers.bank.deposit(&mut sess, 100);
        handlers.mail.close_mailbox(&mut sess);
        handlers.pet.feed(&mut sess);
        assert!(sess.out.is_empty());
        assert!(sess.state.next_event().is_none());
    }
}
