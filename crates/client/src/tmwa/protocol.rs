//! tmwAthena opcodes, client-to-server (`CMSG_`) and server-to-client
//! (`SMSG_`). The `0x753x` range is the custom version exchange this
//! family added on top of the historic Athena table.

pub const CMSG_SERVER_VERSION_REQUEST: u16 = 0x7530;
pub const CMSG_CLIENT_DISCONNECT: u16 = 0x7532;
pub const CMSG_LOGIN_REGISTER: u16 = 0x0064;

pub const CMSG_PLAYER_INVENTORY_USE: u16 = 0x00a7;
pub const CMSG_PLAYER_INVENTORY_DROP: u16 = 0x00a2;
pub const CMSG_PLAYER_EQUIP: u16 = 0x00a9;
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

pub const SMSG_SERVER_VERSION_RESPONSE: u16 = 0x7531;
pub const SMSG_GM_CHAT: u16 = 0x009a;

pub const SMSG_PLAYER_INVENTORY: u16 = 0x01ee;
pub const SMSG_PLAYER_INVENTORY_ADD: u16 = 0x00a0;
pub const SMSG_PLAYER_INVENTORY_REMOVE: u16 = 0x00af;
pub const SMSG_ITEM_USE_RESPONSE: u16 = 0x00a8;
pub const SMSG_PLAYER_EQUIPMENT: u16 = 0x00a4;
pub const SMSG_PLAYER_EQUIP: u16 = 0x00aa;
pub const SMSG_PLAYER_UNEQUIP: u16 = 0x00ac;
pub const SMSG_PLAYER_ATTACK_RANGE: u16 = 0x013a;
pub const SMSG_PLAYER_ARROW_EQUIP: u16 = 0x013c;

pub const SMSG_ITEM_VISIBLE: u16 = 0x009d;
pub const SMSG_ITEM_DROPPED: u16 = 0x009e;
pub const SMSG_ITEM_REMOVE: u16 = 0x00a1;

pub const SMSG_PLAYER_STORAGE_ITEMS: u16 = 0x01f0;
pub const SMSG_PLAYER_STORAGE_STATUS: u16 = 0x00f2;
pub const SMSG_PLAYER_STORAGE_ADD: u16 = 0x00f4;
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

pub const SMSG_BEING_VISIBLE: u16 = 0x0078;
pub const SMSG_BEING_MOVE: u16 = 0x007b;
pub const SMSG_BEING_REMOVE: u16 = 0x0080;
