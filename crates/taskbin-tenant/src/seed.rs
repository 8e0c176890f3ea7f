//! Default item set applied to every newly provisioned tenant.
//!
//! The seed list is a static ordered list of raw attribute bags,
//! embedded at compile time and applied verbatim through the validated
//! create path.

use std::sync::LazyLock;

use serde_json::Value;

static SEED_ITEMS: LazyLock<Vec<Value>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../seed_items.json"))
        .expect("seed_items.json must be a JSON array of attribute bags")
});

/// The default item bags, in application order.
pub fn seed_items() -> &'static [Value] {
    &SEED_ITEMS
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskbin_core::validate::{CREATE_FIELDS, validate};

    #[test]
    fn seed_list_is_non_empty() {
        assert!(!seed_items().is_empty());
    }

    #[test]
    fn every_seed_bag_passes_create_validation() {
        for bag in seed_items() {
            validate(bag, CREATE_FIELDS).expect("seed bag must validate");
        }
    }
}
