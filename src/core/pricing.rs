//! Pricing engine - pure functions over [`Money`].
//!
//! Nothing in here reads the catalog: a line's unit price is computed once, from the
//! base price and the chosen options captured at add time, and stored on the line.

use crate::core::{cart::ChosenOption, money::Money};

/// Base price plus the sum of every chosen option's delta.
#[must_use]
pub fn unit_price(base_price: Money, options: &[ChosenOption]) -> Money {
    base_price + options.iter().map(|o| o.price_delta).sum::<Money>()
}

/// Unit price multiplied by quantity.
#[must_use]
pub fn line_total(unit_price: Money, quantity: u32) -> Money {
    unit_price.times(quantity)
}
