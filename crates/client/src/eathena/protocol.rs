//! eAthena-lineage opcodes. The historic table is shared with tmwAthena;
//! everything in the `0x09xx`/`0x0axx` ranges arrived with the dated
//! protocol revisions and is gated by version in the handlers.

pub const CMSG_SERVER_VERSION_REQUEST: u16 = 0x7530;
pub const CMSG_CLIENT_DISCONNECT: u16 = 0x7532;
pub const CMSG_LOGIN_REGISTER: u16 = 0x0064;

pub const CMSG_PLAYER_INVENTORY_USE: u16 = 0x00a7;
pub const CMSG_PLAYER_INVENTORY_DROP: u16 = 0x00a2;
pub const CMSG_PLAYER_EQUIP: u16 = 0x00a9;
/// Replaces [`CMSG_PLAYER_EQUIP`] from 20130320: the position mask grew
/// to 4 bytes.
pub const CMSG_PLAYER_EQUIP2: u16 = 0x0998;
pub const CMSG_PLAYER_UNEQUIP: u16 = 0x00ab;
pub const CMSG_ITEM_PICKUP: u16 = 0x009f;
pub const CMSG_MOVE_TO_STORAGE: u16 = 0x00f3;
pub const CMSG_MOVE_FROM_STORAGE: u16 = 0x00f5;
pub const CMSG_CLOSE_STORAGE: u16 = 0x00f7;

pub const CMSG_NPC_TALK: u16 = 0x0090;
pub const CMSG_NPC_NEXT_REQUEST: u16 = 0x00b9;
pub const CMSG_NPC_CLOSE: u16 = 0x0146;
pub const CMSG_NPC_LIST_CHOICE: u16 = 0x00b8;
pub const CMSG_NPC_INT_RESPONSE: u16 = 0x0143;
pub const CMSG_NPC_STR_RESPONSE: u16 = 0x01d5;
pub const CMSG_NPC_BUY_SELL_REQUEST: u16 = 0x00c5;
pub const CMSG_NPC_BUY_REQUEST: u16 = 0x00c8;
pub const CMSG_NPC_SELL_REQUEST: u16 = 0x00c9;

pub const CMSG_SKILL_USE_BEING: u16 = 0x0113;
pub const CMSG_SKILL_USE_POSITION: u16 = 0x0116;
pub const CMSG_SKILL_USE_MAP: u16 = 0x011b;

pub const CMSG_TRADE_REQUEST: u16 = 0x00e4;
pub const CMSG_TRADE_RESPONSE: u16 = 0x00e6;
pub const CMSG_TRADE_ITEM_ADD_REQUEST: u16 = 0x00e8;
pub const CMSG_TRADE_ADD_COMPLETE: u16 = 0x00eb;
pub const CMSG_TRADE_OK: u16 = 0x00ef;
pub const CMSG_TRADE_CANCEL_REQUEST: u16 = 0x00ed;

pub const CMSG_GUILD_CREATE: u16 = 0x0165;
pub const CMSG_GUILD_INVITE: u16 = 0x0168;
pub const CMSG_GUILD_INVITE_REPLY: u16 = 0x016b;
pub const CMSG_GUILD_LEAVE: u16 = 0x0159;
pub const CMSG_GUILD_EXPULSION: u16 = 0x015b;
pub const CMSG_GUILD_MESSAGE: u16 = 0x017e;

pub const CMSG_FRIENDS_ADD_PLAYER: u16 = 0x0202;
pub const CMSG_FRIENDS_REQUEST_ACK: u16 = 0x0208;
pub const CMSG_FRIENDS_DELETE_PLAYER: u16 = 0x0203;

pub const CMSG_MAIL2_OPEN_MAILBOX: u16 = 0x0ac0;
pub const CMSG_MAIL2_CLOSE_MAILBOX: u16 = 0x09e9;
pub const CMSG_MAIL2_REFRESH_MAIL_LIST: u16 = 0x0ac1;
pub const CMSG_MAIL2_NEXT_PAGE: u16 = 0x09ee;
pub const CMSG_MAIL2_READ_MAIL: u16 = 0x09ea;
pub const CMSG_MAIL2_DELETE_MAIL: u16 = 0x09f6;
pub const CMSG_MAIL2_REQUEST_MONEY: u16 = 0x09f8;
pub const CMSG_MAIL2_REQUEST_ITEMS: u16 = 0x09fa;
pub const CMSG_MAIL2_OPEN_WRITE_MAIL: u16 = 0x0a08;
pub const CMSG_MAIL2_CANCEL_WRITE_MAIL: u16 = 0x0a03;
pub const CMSG_MAIL2_ADD_ITEM_TO_MAIL: u16 = 0x0a04;
pub const CMSG_MAIL2_REMOVE_ITEM_MAIL: u16 = 0x0a06;
pub const CMSG_MAIL2_SEND_MAIL: u16 = 0x0a6e;
pub const CMSG_MAIL2_CHECK_NAME: u16 = 0x0a13;

pub const CMSG_PET_MENU_ACTION: u16 = 0x01a1;
pub const CMSG_PET_MOVE_TO: u16 = 0x0b11;
pub const CMSG_PET_EMOTE: u16 = 0x0b0c;

pub const CMSG_MERCENARY_ACTION: u16 = 0x029f;
pub const CMSG_HOMMERC_SET_NAME: u16 = 0x0231;
pub const CMSG_HOMMERC_MOVE_TO_MASTER: u16 = 0x0234;
pub const CMSG_HOMMERC_ATTACK: u16 = 0x0233;
pub const CMSG_HOMUNCULUS_MENU: u16 = 0x022d;

pub const CMSG_AUCTION_CANCEL_REQUEST: u16 = 0x024b;
pub const CMSG_AUCTION_SET_ITEM: u16 = 0x024c;
pub const CMSG_AUCTION_REGISTER: u16 = 0x024d;
pub const CMSG_AUCTION_CANCEL: u16 = 0x024e;
pub const CMSG_AUCTION_CLOSE: u16 = 0x025d;
pub const CMSG_AUCTION_BID: u16 = 0x024f;
pub const CMSG_AUCTION_SEARCH: u16 = 0x0251;

pub const CMSG_VENDING_CLOSE: u16 = 0x012e;
pub const CMSG_VENDING_LIST_REQUEST: u16 = 0x0130;
pub const CMSG_VENDING_CREATE: u16 = 0x01b2;
pub const CMSG_VENDING_BUY: u16 = 0x0134;

pub const CMSG_BUYINGSTORE_CREATE: u16 = 0x0811;
pub const CMSG_BUYINGSTORE_CLOSE: u16 = 0x0815;
pub const CMSG_BUYINGSTORE_OPEN: u16 = 0x0817;
pub const CMSG_BUYINGSTORE_SELL: u16 = 0x0819;

pub const CMSG_BANK_DEPOSIT: u16 = 0x09a7;
pub const CMSG_BANK_WITHDRAW: u16 = 0x09a9;
pub const CMSG_BANK_CHECK: u16 = 0x09ab;

pub const CMSG_BATTLE_REGISTER: u16 = 0x08d7;
pub const CMSG_BATTLE_LEAVE: u16 = 0x08da;

pub const CMSG_SEARCHSTORE_SEARCH: u16 = 0x0835;
pub const CMSG_SEARCHSTORE_NEXT_PAGE: u16 = 0x0838;
pub const CMSG_SEARCHSTORE_CLOSE: u16 = 0x083b;

pub const CMSG_CASH_SHOP_BUY: u16 = 0x0848;
pub const CMSG_CASH_SHOP_CLOSE: u16 = 0x084a;

pub const SMSG_SERVER_VERSION_RESPONSE: u16 = 0x7531;
pub const SMSG_GM_CHAT: u16 = 0x009a;

pub const SMSG_PLAYER_INVENTORY: u16 = 0x0991;
pub const SMSG_PLAYER_INVENTORY_ADD: u16 = 0x0990;
pub const SMSG_PLAYER_INVENTORY_REMOVE: u16 = 0x00af;
pub const SMSG_ITEM_USE_RESPONSE: u16 = 0x00a8;
pub const SMSG_PLAYER_EQUIPMENT: u16 = 0x0992;
pub const SMSG_PLAYER_EQUIP: u16 = 0x0999;
pub const SMSG_PLAYER_UNEQUIP: u16 = 0x099a;
pub const SMSG_PLAYER_ATTACK_RANGE: u16 = 0x013a;
pub const SMSG_PLAYER_ARROW_EQUIP: u16 = 0x013c;

pub const SMSG_ITEM_VISIBLE: u16 = 0x009d;
pub const SMSG_ITEM_DROPPED: u16 = 0x009e;
pub const SMSG_ITEM_REMOVE: u16 = 0x00a1;

pub const SMSG_PLAYER_STORAGE_ITEMS: u16 = 0x0995;
pub const SMSG_PLAYER_STORAGE_STATUS: u16 = 0x00f2;
pub const SMSG_PLAYER_STORAGE_ADD: u16 = 0x0a0a;
pub const SMSG_PLAYER_STORAGE_REMOVE: u16 = 0x00f6;
pub const SMSG_PLAYER_STORAGE_CLOSE: u16 = 0x00f8;

pub const SMSG_NPC_MESSAGE: u16 = 0x00b4;
pub const SMSG_NPC_NEXT: u16 = 0x00b5;
pub const SMSG_NPC_CLOSE: u16 = 0x00b6;
pub const SMSG_NPC_CHOICE: u16 = 0x00b7;
pub const SMSG_NPC_INT_INPUT: u16 = 0x0142;
pub const SMSG_NPC_STR_INPUT: u16 = 0x01d4;
pub const SMSG_NPC_BUY_SELL_CHOICE: u16 = 0x00c4;
pub const SMSG_NPC_BUY: u16 = 0x00c6;
pub const SMSG_NPC_SELL: u16 = 0x00c7;
pub const SMSG_NPC_BUY_RESPONSE: u16 = 0x00ca;
pub const SMSG_NPC_SELL_RESPONSE: u16 = 0x00cb;

pub const SMSG_BANK_STATUS: u16 = 0x09a6;
pub const SMSG_BANK_DEPOSIT_ACK: u16 = 0x09a8;
pub const SMSG_BANK_WITHDRAW_ACK: u16 = 0x09aa;

pub const SMSG_BEING_VISIBLE: u16 = 0x0078;
pub const SMSG_BEING_MOVE: u16 = 0x007b;
pub const SMSG_BEING_REMOVE: u16 = 0x0080;
