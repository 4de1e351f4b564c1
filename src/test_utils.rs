//! Shared test utilities for `MenuBuddy`.
//!
//! This module provides the reference "Joe's" menu used across the unit tests,
//! plus helpers for building cart lines and selections with sensible defaults.

use crate::core::{
    catalog::{Catalog, MenuItem},
    cart::Cart,
    selection::SelectionController,
};

/// A small menu exercising every catalog feature.
///
/// * `burger`: 8.00, "Size" (`ONE_OF`, min 1) Small/Large(+2.00) and
///   "Extras" (`MANY_OF`, max 2) Cheese(+1.00)/Bacon(+1.50)/Onion(-0.25 "no onion" credit)
/// * `fries`: 3.50 without option groups
/// * `soda`: 2.00, unavailable
pub const BURGER_MENU_JSON: &str = r#"{
    "restaurant": { "name": "Joe's", "phone": "+1 (555) 010-2030", "contact": "12 Main St" },
    "categories": [
        {
            "id": "mains",
            "name": "Mains",
            "items": [
                {
                    "id": "burger",
                    "title": "Burger",
                    "price": 8.00,
                    "optionGroups": [
                        {
                            "id": "size",
                            "name": "Size",
                            "type": "ONE_OF",
                            "min": 1,
                            "max": 1,
                            "options": [
                                { "id": "small", "name": "Small" },
                                { "id": "large", "name": "Large", "priceDelta": 2.00 }
                            ]
                        },
                        {
                            "id": "extras",
                            "name": "Extras",
                            "type": "MANY_OF",
                            "min": 0,
                            "max": 2,
                            "options": [
                                { "id": "cheese", "name": "Cheese", "priceDelta": 1.00 },
                                { "id": "bacon", "name": "Bacon", "priceDelta": "1.50" },
                                { "id": "onion", "name": "No onion", "priceDelta": -0.25 }
                            ]
                        }
                    ]
                },
                { "id": "fries", "title": "Fries", "price": 3.50 }
            ]
        },
        {
            "id": "drinks",
            "name": "Drinks",
            "items": [
                { "id": "soda", "title": "Soda", "price": "2.00", "available": false }
            ]
        }
    ]
}"#;

/// Parses [`BURGER_MENU_JSON`].
///
/// # Panics
/// Panics if the fixture no longer parses, which is a bug in the fixture.
#[must_use]
#[allow(clippy::expect_used)]
pub fn burger_catalog() -> Catalog {
    Catalog::from_json(BURGER_MENU_JSON).expect("fixture menu must parse")
}

/// Returns the burger item from the fixture catalog.
///
/// # Panics
/// Panics if the fixture lost its burger.
#[must_use]
#[allow(clippy::expect_used)]
pub fn burger() -> MenuItem {
    burger_catalog()
        .find_item("burger")
        .cloned()
        .expect("fixture has a burger")
}

/// Opens a customization for `item`, toggles each `(group, option)` pair in order,
/// and confirms it into `cart`.
///
/// # Panics
/// Panics if the resulting selection is invalid.
#[allow(clippy::expect_used)]
pub fn confirm_selection(cart: &mut Cart, item: &MenuItem, picks: &[(&str, &str)]) {
    let mut controller = SelectionController::default();
    controller.open(item.clone(), None);
    for (group, option) in picks {
        controller.toggle(group, option);
    }
    controller
        .confirm(cart)
        .expect("selection should be valid");
}
