//! Storefront - the single owned aggregate behind one browsing session.
//!
//! Holds the catalog, the cart and the customization slot, and routes interface
//! events to them. Every operation runs to completion and hands back what changed;
//! the interface layer reads the rest (cart lines, totals, validity) from here.

use crate::{
    core::{
        cart::{Cart, CartChange, CartVisibility, Totals},
        catalog::Catalog,
        order::{self, DispatchPayload},
        selection::{Customization, SelectionController},
    },
    errors::{Error, Result},
};
use tracing::{debug, info};
use url::Url;

/// Outcome of choosing a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemChoice {
    /// The item has no options and went straight into the cart
    Added(CartChange),
    /// A customization was opened for the item
    Customizing,
    /// No item with that id exists
    Missing,
}

/// Catalog, cart and customization state for one session.
#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: Catalog,
    cart: Cart,
    selection: SelectionController,
    dispatch_base_url: Url,
}

impl Storefront {
    /// Starts a session with an empty cart.
    #[must_use]
    pub fn new(catalog: Catalog, dispatch_base_url: Url) -> Self {
        info!(
            "Storefront ready for '{}' with dispatch via {}",
            catalog.restaurant.name, dispatch_base_url
        );
        Self {
            catalog,
            cart: Cart::new(),
            selection: SelectionController::default(),
            dispatch_base_url,
        }
    }

    /// The loaded menu.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The open customization, if any.
    #[must_use]
    pub const fn customization(&self) -> Option<&Customization> {
        self.selection.active()
    }

    /// Whether the open customization may be confirmed.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.selection.is_valid()
    }

    /// Handles the user picking a menu item.
    ///
    /// Items without options are added directly; items with options open a
    /// customization (replacing any that was open).
    ///
    /// # Errors
    /// Returns [`Error::ItemUnavailable`] for items marked unavailable.
    pub fn choose_item(&mut self, item_id: &str) -> Result<ItemChoice> {
        let Some(item) = self.catalog.find_item(item_id) else {
            debug!("Ignoring unknown item '{}'", item_id);
            return Ok(ItemChoice::Missing);
        };
        if !item.available {
            return Err(Error::ItemUnavailable {
                item_id: item.id.clone(),
            });
        }

        if item.has_options() {
            self.selection.open(item.clone(), None);
            Ok(ItemChoice::Customizing)
        } else {
            Ok(ItemChoice::Added(self.cart.add_simple(
                &item.id,
                &item.title,
                item.price,
            )))
        }
    }

    /// Opens the edit flow for a cart line, pre-filled with its choices.
    ///
    /// Returns false when the line or its menu item no longer exists.
    pub fn edit_line(&mut self, line_id: &str) -> bool {
        let Some(line) = self.cart.find_line(line_id) else {
            return false;
        };
        let Some(item) = self.catalog.find_item(&line.item_id) else {
            return false;
        };
        self.selection.open(item.clone(), Some(line));
        true
    }

    /// Toggles an option in the open customization. See [`SelectionController::toggle`].
    pub fn toggle_option(&mut self, group_id: &str, option_id: &str) -> bool {
        self.selection.toggle(group_id, option_id)
    }

    /// Confirms the open customization into the cart.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when an option group is under- or over-selected;
    /// the cart is unchanged and the customization stays open.
    pub fn confirm(&mut self) -> Result<CartChange> {
        self.selection.confirm(&mut self.cart)
    }

    /// Closes the open customization without touching the cart.
    pub fn cancel(&mut self) -> bool {
        self.selection.cancel()
    }

    /// See [`Cart::change_quantity`].
    pub fn change_quantity(&mut self, line_id: &str, delta: i64) -> CartChange {
        self.cart.change_quantity(line_id, delta)
    }

    /// See [`Cart::remove`].
    pub fn remove(&mut self, line_id: &str) -> CartChange {
        self.cart.remove(line_id)
    }

    /// See [`Cart::clear`].
    pub fn clear(&mut self) -> CartChange {
        self.cart.clear()
    }

    /// See [`Cart::toggle_expanded`].
    pub fn toggle_cart(&mut self) -> CartVisibility {
        self.cart.toggle_expanded()
    }

    /// See [`Cart::totals`].
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.cart.totals()
    }

    /// Builds the order message and deep-link for the current cart.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCart`] if the cart has no lines.
    pub fn checkout(&self) -> Result<DispatchPayload> {
        order::prepare_dispatch(&self.cart, &self.catalog.restaurant, &self.dispatch_base_url)
    }
}
