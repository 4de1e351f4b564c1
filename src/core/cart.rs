//! Cart business logic - the ordered, in-memory collection of priced line items.
//!
//! Each line is one distinct (menu item, chosen options) combination. Lines are unique
//! by [`LineId`]; adding a combination that is already in the cart bumps its quantity
//! instead of appending a second line. Every mutation returns a [`CartChange`] so the
//! interface layer can decide what to redraw.
//!
//! Operating on a line id that is not in the cart is a silent no-op
//! ([`CartChange::Unchanged`]) so that repeated UI actions stay harmless.

use crate::core::{money::Money, pricing};
use std::fmt;
use tracing::debug;

/// A modifier option as it was chosen, captured with its price at add time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChosenOption {
    /// Id of the option group this choice belongs to
    pub group_id: String,
    /// Display name of the option group
    pub group_name: String,
    /// Id of the chosen option
    pub option_id: String,
    /// Display name of the chosen option
    pub name: String,
    /// Price adjustment locked in when the line was created
    pub price_delta: Money,
}

/// Identity of a cart line.
///
/// Derived from the menu item id and the set of chosen options, independent of the
/// order in which the options were picked. A line without options is identified by
/// the bare item id.
///
/// Each id component is form-encoded before it is joined, so ids containing `[`, `]`,
/// `/` or `,` cannot make two different combinations look alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(String);

impl LineId {
    /// Computes the id for `item_id` with the given choices.
    #[must_use]
    pub fn derive(item_id: &str, options: &[ChosenOption]) -> Self {
        let item = encode_component(item_id);
        if options.is_empty() {
            return Self(item);
        }
        let mut keys: Vec<String> = options
            .iter()
            .map(|o| {
                format!(
                    "{}/{}",
                    encode_component(&o.group_id),
                    encode_component(&o.option_id)
                )
            })
            .collect();
        keys.sort_unstable();
        keys.dedup();
        Self(format!("{item}[{}]", keys.join(",")))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Leaves alphanumerics and `*-._` as they are; the delimiters above never survive.
fn encode_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Identity, see [`LineId::derive`]
    pub line_id: LineId,
    /// Menu item this line was built from
    pub item_id: String,
    /// Item title at add time
    pub title: String,
    /// Item base price at add time
    pub base_price: Money,
    /// Chosen options in the item's definition order
    pub options: Vec<ChosenOption>,
    /// Base price plus option deltas, never recomputed from the menu
    pub unit_price: Money,
    /// Always at least one while the line is in the cart
    pub quantity: u32,
}

impl LineItem {
    /// Builds a fresh line with quantity 1, pricing it and deriving its id.
    #[must_use]
    pub fn new(
        item_id: &str,
        title: &str,
        base_price: Money,
        options: Vec<ChosenOption>,
    ) -> Self {
        Self {
            line_id: LineId::derive(item_id, &options),
            item_id: item_id.to_string(),
            title: title.to_string(),
            base_price,
            unit_price: pricing::unit_price(base_price, &options),
            options,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        pricing::line_total(self.unit_price, self.quantity)
    }
}

/// What a cart mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended
    Added {
        /// Id of the new line
        line_id: LineId,
    },
    /// An existing line's quantity went up because the same combination was added again
    Incremented {
        /// Id of the line
        line_id: LineId,
        /// New quantity
        quantity: u32,
    },
    /// A line's content or quantity was changed in place
    Updated {
        /// Id of the line after the update
        line_id: LineId,
        /// Quantity after the update
        quantity: u32,
    },
    /// A line was removed
    Removed {
        /// Id of the removed line
        line_id: LineId,
    },
    /// Every line was removed
    Cleared,
    /// Nothing happened (unknown line id, empty interaction, ...)
    Unchanged,
}

impl CartChange {
    /// Whether the cart contents changed.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Whether and how the cart panel is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CartVisibility {
    /// Cart is empty; nothing shown
    #[default]
    Hidden,
    /// Cart has lines; summary bar only
    ShownCollapsed,
    /// Cart has lines; full line list shown
    ShownExpanded,
}

/// Aggregate figures for the whole cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of line quantities
    pub item_count: u64,
    /// Sum of unit price times quantity over all lines
    pub grand_total: Money,
}

/// The shopping cart for one session.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<LineItem>,
    visibility: CartVisibility,
}

impl Cart {
    /// Creates an empty, hidden cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Finds a line by id.
    #[must_use]
    pub fn find_line(&self, line_id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.line_id.as_str() == line_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Current panel state.
    #[must_use]
    pub const fn visibility(&self) -> CartVisibility {
        self.visibility
    }

    /// Adds an item that has no option groups.
    ///
    /// Equivalent to confirming a customization with nothing selected: the line id is
    /// the item id and the unit price is the base price.
    pub fn add_simple(&mut self, item_id: &str, title: &str, price: Money) -> CartChange {
        self.add_line(LineItem::new(item_id, title, price, Vec::new()))
    }

    /// Merges `line` into the cart: bumps the quantity of a line with the same id,
    /// or appends it with quantity 1.
    pub fn add_line(&mut self, mut line: LineItem) -> CartChange {
        let change = if let Some(existing) = self.position(line.line_id.as_str()) {
            let existing = &mut self.lines[existing];
            existing.quantity = existing.quantity.saturating_add(1);
            CartChange::Incremented {
                line_id: existing.line_id.clone(),
                quantity: existing.quantity,
            }
        } else {
            line.quantity = 1;
            let line_id = line.line_id.clone();
            self.lines.push(line);
            CartChange::Added { line_id }
        };
        debug!("Cart add: {:?}", change);
        self.sync_visibility();
        change
    }

    /// Replaces the content of the line `old_line_id` with `line`, keeping its quantity.
    ///
    /// If the new content resolves to the id of a different line already in the cart,
    /// the two lines merge and their quantities are summed. If `old_line_id` is no
    /// longer in the cart, `line` is added as a fresh line.
    pub fn replace_line(&mut self, old_line_id: &str, mut line: LineItem) -> CartChange {
        let Some(index) = self.position(old_line_id) else {
            return self.add_line(line);
        };

        let quantity = self.lines[index].quantity;
        let change = match self.position(line.line_id.as_str()) {
            Some(other) if other != index => {
                let merged = &mut self.lines[other];
                merged.quantity = merged.quantity.saturating_add(quantity);
                let change = CartChange::Updated {
                    line_id: merged.line_id.clone(),
                    quantity: merged.quantity,
                };
                self.lines.remove(index);
                change
            }
            _ => {
                line.quantity = quantity;
                let change = CartChange::Updated {
                    line_id: line.line_id.clone(),
                    quantity,
                };
                self.lines[index] = line;
                change
            }
        };
        debug!("Cart replace of {}: {:?}", old_line_id, change);
        self.sync_visibility();
        change
    }

    /// Adds `delta` to a line's quantity, removing the line when the result drops to zero
    /// or below. Unknown ids are ignored.
    pub fn change_quantity(&mut self, line_id: &str, delta: i64) -> CartChange {
        let Some(index) = self.position(line_id) else {
            return CartChange::Unchanged;
        };
        if delta == 0 {
            return CartChange::Unchanged;
        }

        let new_quantity = i64::from(self.lines[index].quantity).saturating_add(delta);
        let change = if new_quantity <= 0 {
            let removed = self.lines.remove(index);
            CartChange::Removed {
                line_id: removed.line_id,
            }
        } else {
            let line = &mut self.lines[index];
            line.quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
            CartChange::Updated {
                line_id: line.line_id.clone(),
                quantity: line.quantity,
            }
        };
        debug!("Cart quantity change on {}: {:?}", line_id, change);
        self.sync_visibility();
        change
    }

    /// Removes a line. Unknown ids are ignored.
    pub fn remove(&mut self, line_id: &str) -> CartChange {
        let Some(index) = self.position(line_id) else {
            return CartChange::Unchanged;
        };
        let removed = self.lines.remove(index);
        debug!("Removed cart line {}", removed.line_id);
        self.sync_visibility();
        CartChange::Removed {
            line_id: removed.line_id,
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) -> CartChange {
        self.lines.clear();
        self.sync_visibility();
        debug!("Cart cleared");
        CartChange::Cleared
    }

    /// Item count and grand total, computed from the current lines on every call.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals {
            item_count: self.lines.iter().map(|l| u64::from(l.quantity)).sum(),
            grand_total: self.lines.iter().map(LineItem::line_total).sum(),
        }
    }

    /// Flips between collapsed and expanded. Has no effect while the cart is hidden.
    pub fn toggle_expanded(&mut self) -> CartVisibility {
        self.visibility = match self.visibility {
            CartVisibility::Hidden => CartVisibility::Hidden,
            CartVisibility::ShownCollapsed => CartVisibility::ShownExpanded,
            CartVisibility::ShownExpanded => CartVisibility::ShownCollapsed,
        };
        self.visibility
    }

    fn position(&self, line_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.line_id.as_str() == line_id)
    }

    // Empty means hidden; the first line shows the cart collapsed.
    fn sync_visibility(&mut self) {
        if self.lines.is_empty() {
            self.visibility = CartVisibility::Hidden;
        } else if self.visibility == CartVisibility::Hidden {
            self.visibility = CartVisibility::ShownCollapsed;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::selection::SelectionController;
    use crate::test_utils::{burger, confirm_selection};
    use proptest::prelude::*;

    fn chosen(group: &str, id: &str, cents: i64) -> ChosenOption {
        ChosenOption {
            group_id: group.to_string(),
            group_name: group.to_string(),
            option_id: id.to_string(),
            name: id.to_string(),
            price_delta: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_line_id_without_options_is_item_id() {
        assert_eq!(LineId::derive("fries", &[]).as_str(), "fries");
    }

    #[test]
    fn test_line_id_ignores_option_order() {
        let a = [chosen("size", "large", 200), chosen("extras", "cheese", 100)];
        let b = [chosen("extras", "cheese", 100), chosen("size", "large", 200)];
        assert_eq!(LineId::derive("burger", &a), LineId::derive("burger", &b));
        assert_ne!(LineId::derive("burger", &a), LineId::derive("burger", &a[..1]));
        assert_ne!(LineId::derive("burger", &a), LineId::derive("wrap", &a));
    }

    #[test]
    fn test_line_id_delimiters_in_ids_do_not_collide() {
        // A simple item whose id spells out another item's option suffix
        let plain = LineId::derive("combo[size/large]", &[]);
        let customized = LineId::derive("combo", &[chosen("size", "large", 100)]);
        assert_ne!(plain, customized);

        // One option id that looks like two picks in the same group
        let single = LineId::derive("bowl", &[chosen("g", "x,g/y", 0)]);
        let pair = LineId::derive("bowl", &[chosen("g", "x", 0), chosen("g", "y", 0)]);
        assert_ne!(single, pair);

        // Plain ids keep their readable form
        assert_eq!(customized.as_str(), "combo[size/large]");
    }

    #[test]
    fn test_look_alike_combinations_stay_separate_lines() {
        let mut cart = Cart::new();
        cart.add_simple("combo[size/large]", "Combo Deal", Money::from_cents(2000));
        let change = cart.add_line(LineItem::new(
            "combo",
            "Combo",
            Money::from_cents(500),
            vec![chosen("size", "large", 100)],
        ));

        assert!(matches!(change, CartChange::Added { .. }));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.lines()[1].unit_price, Money::from_cents(600));
        assert_eq!(cart.totals().grand_total, Money::from_cents(2600));
    }

    #[test]
    fn test_add_simple_appends_then_increments() {
        let mut cart = Cart::new();
        assert_eq!(cart.visibility(), CartVisibility::Hidden);

        let change = cart.add_simple("fries", "Fries", Money::from_cents(350));
        assert_eq!(
            change,
            CartChange::Added {
                line_id: LineId::derive("fries", &[])
            }
        );
        assert_eq!(cart.visibility(), CartVisibility::ShownCollapsed);

        let change = cart.add_simple("fries", "Fries", Money::from_cents(350));
        assert!(matches!(change, CartChange::Incremented { quantity: 2, .. }));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.totals().grand_total, Money::from_cents(700));
    }

    #[test]
    fn test_add_simple_matches_empty_confirm() {
        let mut simple = Cart::new();
        simple.add_simple("fries", "Fries", Money::from_cents(350));

        let mut confirmed = Cart::new();
        confirmed.add_line(LineItem::new("fries", "Fries", Money::from_cents(350), Vec::new()));

        assert_eq!(simple.lines(), confirmed.lines());
    }

    #[test]
    fn test_change_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_simple("fries", "Fries", Money::from_cents(350));
        cart.add_simple("fries", "Fries", Money::from_cents(350));
        cart.add_simple("fries", "Fries", Money::from_cents(350));

        let change = cart.change_quantity("fries", -3);
        assert!(matches!(change, CartChange::Removed { .. }));
        assert!(cart.find_line("fries").is_none());
        assert_eq!(cart.visibility(), CartVisibility::Hidden);
    }

    #[test]
    fn test_change_quantity_negative_overshoot_removes_line() {
        let mut cart = Cart::new();
        cart.add_simple("fries", "Fries", Money::from_cents(350));
        assert!(matches!(
            cart.change_quantity("fries", -10),
            CartChange::Removed { .. }
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_updates_in_place() {
        let mut cart = Cart::new();
        cart.add_simple("fries", "Fries", Money::from_cents(350));
        let change = cart.change_quantity("fries", 4);
        assert!(matches!(change, CartChange::Updated { quantity: 5, .. }));
        assert_eq!(cart.totals().item_count, 5);
    }

    #[test]
    fn test_totals_saturate_on_huge_lines() {
        let mut cart = Cart::new();
        let price = Money::from_cents(5_000_000_000_000_000_000);
        cart.add_simple("gold", "Gold", price);
        cart.add_simple("gold", "Gold", price);
        cart.add_simple("ingot", "Ingot", price);

        let totals = cart.totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.grand_total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_lookup_misses_are_no_ops() {
        let mut cart = Cart::new();
        cart.add_simple("fries", "Fries", Money::from_cents(350));

        assert_eq!(cart.change_quantity("nope", 1), CartChange::Unchanged);
        assert_eq!(cart.remove("nope"), CartChange::Unchanged);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_and_clear_hide_cart() {
        let mut cart = Cart::new();
        cart.add_simple("fries", "Fries", Money::from_cents(350));
        cart.add_simple("cola", "Cola", Money::from_cents(200));

        cart.remove("fries");
        assert_eq!(cart.visibility(), CartVisibility::ShownCollapsed);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.visibility(), CartVisibility::Hidden);
    }

    #[test]
    fn test_visibility_resets_to_collapsed_after_emptying() {
        let mut cart = Cart::new();
        assert_eq!(cart.toggle_expanded(), CartVisibility::Hidden);

        cart.add_simple("fries", "Fries", Money::from_cents(350));
        assert_eq!(cart.toggle_expanded(), CartVisibility::ShownExpanded);

        // Adding more keeps the expanded state
        cart.add_simple("cola", "Cola", Money::from_cents(200));
        assert_eq!(cart.visibility(), CartVisibility::ShownExpanded);

        cart.clear();
        cart.add_simple("fries", "Fries", Money::from_cents(350));
        assert_eq!(cart.visibility(), CartVisibility::ShownCollapsed);
    }

    #[test]
    fn test_unit_price_locked_at_add_time() {
        let mut item = burger();
        let mut cart = Cart::new();
        confirm_selection(&mut cart, &item, &[("size", "large")]);

        // A later menu price change does not reach lines already in the cart
        item.price = Money::from_cents(9999);
        assert_eq!(cart.lines()[0].unit_price, Money::from_cents(1000));
    }

    #[test]
    fn test_replace_line_keeps_quantity() {
        let mut cart = Cart::new();
        let small = LineItem::new("burger", "Burger", Money::from_cents(800), vec![chosen(
            "size", "small", 0,
        )]);
        let large = LineItem::new("burger", "Burger", Money::from_cents(800), vec![chosen(
            "size", "large", 200,
        )]);
        let small_id = small.line_id.clone();
        cart.add_line(small.clone());
        cart.add_line(small);

        let change = cart.replace_line(small_id.as_str(), large.clone());
        assert_eq!(
            change,
            CartChange::Updated {
                line_id: large.line_id.clone(),
                quantity: 2
            }
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].unit_price, Money::from_cents(1000));
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_replace_line_merges_into_existing_combination() {
        let mut cart = Cart::new();
        let small = LineItem::new("burger", "Burger", Money::from_cents(800), vec![chosen(
            "size", "small", 0,
        )]);
        let large = LineItem::new("burger", "Burger", Money::from_cents(800), vec![chosen(
            "size", "large", 200,
        )]);
        cart.add_line(large.clone());
        cart.add_line(small.clone());
        cart.add_line(small.clone());

        cart.replace_line(small.line_id.as_str(), large.clone());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].line_id, large.line_id);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_replace_missing_line_adds_fresh() {
        let mut cart = Cart::new();
        let change = cart.replace_line(
            "gone",
            LineItem::new("fries", "Fries", Money::from_cents(350), Vec::new()),
        );
        assert!(matches!(change, CartChange::Added { .. }));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Confirm(usize),
        Edit(usize, usize),
        ChangeQuantity(usize, i64),
        Remove(usize),
        Clear,
        Toggle,
    }

    const PRODUCTS: [(&str, i64); 4] = [("fries", 350), ("cola", 199), ("pie", 1), ("steak", 2_495)];

    // Burger picks; every combination includes a size so it always confirms.
    const BURGER_PICKS: [&[(&str, &str)]; 4] = [
        &[("size", "small")],
        &[("size", "large")],
        &[("size", "large"), ("extras", "cheese")],
        &[("size", "small"), ("extras", "bacon"), ("extras", "onion")],
    ];

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0..PRODUCTS.len()).prop_map(Op::Add),
            3 => (0..BURGER_PICKS.len()).prop_map(Op::Confirm),
            2 => (0..8usize, 0..BURGER_PICKS.len()).prop_map(|(l, p)| Op::Edit(l, p)),
            3 => (0..PRODUCTS.len(), -4i64..5).prop_map(|(i, d)| Op::ChangeQuantity(i, d)),
            1 => (0..PRODUCTS.len()).prop_map(Op::Remove),
            1 => Just(Op::Clear),
            1 => Just(Op::Toggle),
        ]
    }

    fn apply(cart: &mut Cart, op: Op) {
        match op {
            Op::Add(i) => {
                let (id, cents) = PRODUCTS[i];
                cart.add_simple(id, id, Money::from_cents(cents));
            }
            Op::Confirm(p) => confirm_selection(cart, &burger(), BURGER_PICKS[p]),
            Op::Edit(l, p) => {
                // Only burger lines can be customized; anything else is skipped
                let Some(line) = cart
                    .lines()
                    .get(l)
                    .filter(|line| line.item_id == "burger")
                    .cloned()
                else {
                    return;
                };
                let mut controller = SelectionController::default();
                controller.open(burger(), Some(&line));
                for (group, option) in BURGER_PICKS[p] {
                    controller.toggle(group, option);
                }
                controller.confirm(cart).unwrap();
            }
            Op::ChangeQuantity(i, d) => {
                cart.change_quantity(PRODUCTS[i].0, d);
            }
            Op::Remove(i) => {
                cart.remove(PRODUCTS[i].0);
            }
            Op::Clear => {
                cart.clear();
            }
            Op::Toggle => {
                cart.toggle_expanded();
            }
        }
    }

    proptest! {
        /// Grand total always equals the exact sum of unit price times quantity.
        #[test]
        fn grand_total_matches_line_sum(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut cart = Cart::new();
            for op in ops {
                apply(&mut cart, op);

                let expected: i64 = cart
                    .lines()
                    .iter()
                    .map(|l| l.unit_price.cents() * i64::from(l.quantity))
                    .sum();
                prop_assert_eq!(cart.totals().grand_total.cents(), expected);
                prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));

                // Visibility tracks emptiness after every operation
                let hidden = cart.visibility() == CartVisibility::Hidden;
                prop_assert_eq!(hidden, cart.is_empty());
            }
        }

        /// Line ids are unique no matter how lines were added, confirmed or edited.
        #[test]
        fn line_ids_stay_unique(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut cart = Cart::new();
            for op in ops {
                let adds_one = matches!(op, Op::Add(_) | Op::Confirm(_));
                let before = cart.totals().item_count;
                apply(&mut cart, op.clone());
                if adds_one {
                    prop_assert_eq!(cart.totals().item_count, before + 1);
                } else if matches!(op, Op::Edit(..)) {
                    // Edits move quantity between lines but never create or drop any
                    prop_assert_eq!(cart.totals().item_count, before);
                }

                let mut ids: Vec<&str> = cart.lines().iter().map(|l| l.line_id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), cart.len());
            }
        }
    }
}
