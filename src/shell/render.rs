//! Text rendering for the shell.
//!
//! Core state is first mapped to small view models (plain data, no formatting
//! decisions in the core) and then laid out as text.

use crate::{
    core::{
        cart::{Cart, CartChange, CartVisibility, LineItem},
        catalog::{Catalog, GroupKind, OptionGroup},
        money::Money,
        order::format_price_delta,
        selection::Customization,
    },
    errors::Result,
};
use std::fmt::Write as _;

/// One cart line as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// 1-based position, usable in place of the line id
    pub position: usize,
    /// Item title
    pub title: String,
    /// Quantity
    pub quantity: u32,
    /// Unit price times quantity
    pub total: Money,
    /// Chosen option names, comma separated
    pub options: String,
}

/// Maps the cart lines to view models.
#[must_use]
pub fn cart_view(cart: &Cart) -> Vec<CartLineView> {
    cart.lines()
        .iter()
        .enumerate()
        .map(|(index, line)| line_view(index + 1, line))
        .collect()
}

fn line_view(position: usize, line: &LineItem) -> CartLineView {
    CartLineView {
        position,
        title: line.title.clone(),
        quantity: line.quantity,
        total: line.line_total(),
        options: line
            .options
            .iter()
            .map(|o| o.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Describes how many choices a group takes, e.g. "choose 1, required".
#[must_use]
pub fn constraint_label(group: &OptionGroup) -> String {
    let max = group.max();
    match (group.kind, group.min) {
        (GroupKind::OneOf, 0) => "optional, choose 1".to_string(),
        (GroupKind::OneOf, _) => "choose 1, required".to_string(),
        (GroupKind::ManyOf, 0) => format!("choose up to {max}"),
        (GroupKind::ManyOf, min) if min == max => format!("choose {min}, required"),
        (GroupKind::ManyOf, min) => format!("choose {min} to {max}, required"),
    }
}

fn with_delta(name: &str, delta: Money) -> String {
    format_price_delta(delta).map_or_else(|| name.to_string(), |a| format!("{name} ({a})"))
}

/// Lays out the whole menu by category.
///
/// # Errors
/// Returns [`crate::errors::Error::Format`] if the text cannot be written.
pub fn render_menu(catalog: &Catalog) -> Result<String> {
    let mut text = catalog.restaurant.name.clone();
    if let Some(contact) = &catalog.restaurant.contact {
        write!(&mut text, "\n{contact}")?;
    }
    for category in &catalog.categories {
        write!(&mut text, "\n\n== {} ==", category.name)?;
        for item in &category.items {
            write!(&mut text, "\n  {:<10} {}  {}", item.id, item.title, item.price)?;
            if !item.available {
                text.push_str("  [unavailable]");
            } else if item.has_options() {
                text.push_str("  (customizable)");
            }
            if let Some(description) = &item.description {
                write!(&mut text, "\n             {description}")?;
            }
        }
    }
    Ok(text)
}

/// Lays out the open customization with checkboxes and validity.
///
/// # Errors
/// Returns [`crate::errors::Error::Format`] if the text cannot be written.
pub fn render_customization(customization: &Customization) -> Result<String> {
    let item = customization.item();
    let state = customization.state();
    let mut text = format!("Customizing {} ({})", item.title, item.price);
    for group in &item.option_groups {
        write!(
            &mut text,
            "\n  {} [{}] ({})",
            group.name,
            group.id,
            constraint_label(group)
        )?;
        for option in &group.options {
            let mark = if state.is_selected(&group.id, &option.id) {
                "x"
            } else {
                " "
            };
            write!(
                &mut text,
                "\n    [{mark}] {:<10} {}",
                option.id,
                with_delta(&option.name, option.price_delta)
            )?;
        }
    }
    match customization.validate() {
        Ok(()) => text.push_str("\nReady: type `confirm` to add it."),
        Err(e) => write!(&mut text, "\nNot ready: {e}")?,
    }
    Ok(text)
}

/// Lays out the cart according to its visibility.
///
/// # Errors
/// Returns [`crate::errors::Error::Format`] if the text cannot be written.
pub fn render_cart(cart: &Cart) -> Result<String> {
    let totals = cart.totals();
    let text = match cart.visibility() {
        CartVisibility::Hidden => "Your cart is empty.".to_string(),
        CartVisibility::ShownCollapsed => format!(
            "Cart: {} item(s), {} (`toggle` to expand)",
            totals.item_count, totals.grand_total
        ),
        CartVisibility::ShownExpanded => {
            let mut text = String::from("Cart:");
            for line in cart_view(cart) {
                write!(
                    &mut text,
                    "\n  {}. {} × {}  {}",
                    line.position, line.title, line.quantity, line.total
                )?;
                if !line.options.is_empty() {
                    write!(&mut text, "\n       {}", line.options)?;
                }
            }
            write!(
                &mut text,
                "\nTotal: {} item(s), {}",
                totals.item_count, totals.grand_total
            )?;
            text
        }
    };
    Ok(text)
}

/// One-line acknowledgement of a cart mutation.
#[must_use]
pub fn describe_change(change: &CartChange, cart: &Cart) -> String {
    let title = |id: &str| {
        cart.find_line(id)
            .map_or_else(|| id.to_string(), |line| line.title.clone())
    };
    match change {
        CartChange::Added { line_id } => format!("✅ Added {} to the cart.", title(line_id.as_str())),
        CartChange::Incremented { line_id, quantity } | CartChange::Updated { line_id, quantity } => {
            format!("✅ {} × {quantity} in the cart.", title(line_id.as_str()))
        }
        CartChange::Removed { line_id } => format!("🗑️ Removed {line_id}."),
        CartChange::Cleared => "🗑️ Cart cleared.".to_string(),
        CartChange::Unchanged => "Nothing changed.".to_string(),
    }
}
