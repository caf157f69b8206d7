//! Inventory ledger.
//!
//! Items are plain names. The ledger keeps insertion order and duplicates,
//! and removals match the exact name.

use tracing::debug;

/// Appends every found item, preserving order and duplicates.
pub fn add_items(inventory: &mut Vec<String>, found: &[String]) {
    inventory.extend(found.iter().cloned());
}

/// Removes the first exact match for each used item.
///
/// A used item that is not in the inventory is skipped; the generator's view
/// of the inventory can drift from ours.
pub fn remove_items(inventory: &mut Vec<String>, used: &[String]) {
    for item in used {
        match inventory.iter().position(|held| held == item) {
            Some(index) => {
                inventory.remove(index);
            }
            None => debug!(item = %item, "used item not held; skipping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_add_items_keeps_order_and_duplicates() {
        let mut inventory = names(&["Torch"]);

        add_items(&mut inventory, &names(&["Health Potion", "Torch"]));

        assert_eq!(inventory, names(&["Torch", "Health Potion", "Torch"]));
    }

    #[test]
    fn test_remove_items_removes_first_occurrence_only() {
        let mut inventory = names(&["Torch", "Rope", "Torch"]);

        remove_items(&mut inventory, &names(&["Torch"]));

        assert_eq!(inventory, names(&["Rope", "Torch"]));
    }

    #[test]
    fn test_remove_items_missing_item_is_a_no_op() {
        let mut inventory = names(&["Rope"]);

        remove_items(&mut inventory, &names(&["Lantern", "rope"]));

        assert_eq!(inventory, names(&["Rope"]));
    }

    #[test]
    fn test_add_then_remove_restores_length() {
        let mut inventory = names(&["Rope", "Rusty Dagger"]);
        let before = inventory.len();

        add_items(&mut inventory, &names(&["Rusty Dagger"]));
        remove_items(&mut inventory, &names(&["Rusty Dagger"]));

        assert_eq!(inventory.len(), before);
    }
}
