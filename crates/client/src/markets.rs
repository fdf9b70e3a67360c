use tracing::debug;

use athena::ItemId;

use crate::state::ShopItem;

/// Hard cap on wire entries in one bulk shop packet. Inclusive: exactly
/// this many entries is still valid.
pub const MARKET_BATCH_CAP: usize = 100;

/// One wire entry of a planned bulk transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleEntry {
    /// Index into the shop item list this entry came from.
    pub item_index: usize,
    pub id: ItemId,
    pub inv_slot: u16,
    pub price: i32,
    pub amount: i32,
}

/// A validated bulk transaction: every entry qualifies and the cap holds.
///
/// Planning and applying are separate steps so the packet bytes and the
/// resulting bookkeeping can be tested independently; a handler performs
/// both under one call, never one without the other.
#[derive(Debug, Default)]
pub struct SalePlan {
    pub entries: Vec<SaleEntry>,
}

/// Plan a bulk transaction over the staged shop items.
///
/// Zero used-quantity rows are skipped. Stackable items fold their whole
/// staged amount into one entry; non-stackable items produce one entry
/// per unit. Returns `None` when the entry count would exceed the cap,
/// in which case the caller must send nothing and mutate nothing.
pub fn plan(items: &[ShopItem]) -> Option<SalePlan> {
    let mut entries = Vec::new();
    for (item_index, item) in items.iter().enumerate() {
        if item.used_quantity == 0 {
            continue;
        }
        if item.item_type.is_stackable() {
            entries.push(SaleEntry {
                item_index,
                id: item.id,
                inv_slot: item.inv_slot,
                price: item.price,
                amount: item.used_quantity,
            });
        } else {
            for _ in 0..item.used_quantity {
                entries.push(SaleEntry {
                    item_index,
                    id: item.id,
                    inv_slot: item.inv_slot,
                    price: item.price,
                    amount: 1,
                });
            }
        }
        if entries.len() > MARKET_BATCH_CAP {
            debug!("bulk transaction aborted: {} entries over cap", entries.len());
            return None;
        }
    }
    Some(SalePlan { entries })
}

/// Fold the staged amounts of every planned item back into its quantity.
/// Called exactly once, after the packet for `plan` has been enqueued.
pub fn apply(plan: &SalePlan, items: &mut [ShopItem]) {
    for entry in &plan.entries {
        let item = &mut items[entry.item_index];
        if item.used_quantity != 0 {
            let used = item.used_quantity;
            item.increase_quantity(used);
            item.increase_used_quantity(-used);
        }
    }
}

#[cfg(test)]
mod tests {
    use athena::ItemType;

    use super::*;

    fn shop_item(id: u32, item_type: ItemType, used: i32) -> ShopItem {
        ShopItem {
            inv_slot: 0,
            id: ItemId::from_u32(id),
            item_type,
            price: 10,
            quantity: 0,
            used_quantity: used,
        }
    }

    #[test]
    fn zero_quantity_rows_are_skipped() {
        let items = vec![
            shop_item(1, ItemType::Usable, 0),
            shop_item(2, ItemType::Usable, 3),
        ];
        let plan = plan(&items).unwrap();
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].id, ItemId::from_u32(2));
        assert_eq!(plan.entries[0].amount, 3);
    }

    #[test]
    fn non_stackables_expand_one_entry_per_unit() {
        let items = vec![shop_item(7, ItemType::Weapon, 3)];
        let plan = plan(&items).unwrap();
        assert_eq!(plan.entries.len(), 3);
        assert!(plan.entries.iter().all(|e| e.amount == 1));
    }

    #[test]
    fn cap_is_inclusive_at_exactly_one_hundred() {
        let items = vec![shop_item(7, ItemType::Weapon, 100)];
        assert!(plan(&items).is_some());

        let items = vec![shop_item(7, ItemType::Weapon, 101)];
        assert!(plan(&items).is_none());
    }

    #[test]
    fn apply_folds_used_into_quantity() {
        let mut items = vec![shop_item(2, ItemType::Usable, 3)];
        items[0].quantity = 5;
        let plan = plan(&items).unwrap();
        apply(&plan, &mut items);
        assert_eq!(items[0].quantity, 8);
        assert_eq!(items[0].used_quantity, 0);
    }

    #[test]
    fn apply_touches_each_item_once_despite_expansion() {
        let mut items = vec![shop_item(7, ItemType::Weapon, 2)];
        let plan = plan(&items).unwrap();
        assert_eq!(plan.entries.len(), 2);
        apply(&plan, &mut items);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].used_quantity, 0);
    }
}
