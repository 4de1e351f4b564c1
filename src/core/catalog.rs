//! Menu catalog - the read-only tree of categories, items, option groups and options.
//!
//! The catalog is loaded once per session from a JSON document and validated before
//! anything else touches it. Any structural problem is reported as [`Error::Catalog`],
//! which is terminal: there is no partial-catalog mode and no retry.

use crate::{
    core::money::Money,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// The whole menu document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// The restaurant the menu belongs to
    pub restaurant: Restaurant,
    /// Menu sections in display order
    pub categories: Vec<Category>,
}

/// Restaurant details used for the order header and checkout target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Display name, used as the order header
    pub name: String,
    /// Messaging phone number orders are dispatched to
    pub phone: String,
    /// Free-form contact line (address, hours, ...)
    #[serde(default)]
    pub contact: Option<String>,
}

/// A named section of the menu.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category id
    pub id: String,
    /// Display name
    pub name: String,
    /// Items in display order
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A single orderable dish or drink.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Unique item id across the whole catalog
    pub id: String,
    /// Display title, copied onto cart lines
    pub title: String,
    /// Optional blurb shown under the title
    #[serde(default)]
    pub description: Option<String>,
    /// Base price before modifiers
    pub price: Money,
    /// Unavailable items are listed but cannot be ordered
    #[serde(default = "default_available")]
    pub available: bool,
    /// Modifier groups in definition order
    #[serde(default)]
    pub option_groups: Vec<OptionGroup>,
}

const fn default_available() -> bool {
    true
}

/// How many options of a group may be chosen at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupKind {
    /// Radio-style: choosing an option replaces the previous choice
    OneOf,
    /// Checkbox-style: options toggle independently up to the group maximum
    ManyOf,
}

/// A set of modifier options attached to a menu item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGroup {
    /// Group id, unique within its item
    pub id: String,
    /// Display name ("Size", "Extras", ...)
    pub name: String,
    /// Selection behaviour
    #[serde(rename = "type")]
    pub kind: GroupKind,
    /// Minimum number of choices; above zero makes the group mandatory
    #[serde(default)]
    pub min: u32,
    /// Declared maximum, see [`OptionGroup::max`] for the effective value
    #[serde(default, rename = "max")]
    pub declared_max: Option<u32>,
    /// Options in definition order
    #[serde(default)]
    pub options: Vec<ModifierOption>,
}

/// A single modifier choice.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierOption {
    /// Option id, unique within its group
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional blurb
    #[serde(default)]
    pub description: Option<String>,
    /// Price adjustment, may be negative; absent means zero
    #[serde(default)]
    pub price_delta: Money,
}

impl OptionGroup {
    /// Effective maximum number of choices.
    ///
    /// `ONE_OF` groups are capped at one regardless of what the menu declares. A
    /// `MANY_OF` group without a declared maximum allows every option.
    #[must_use]
    pub fn max(&self) -> u32 {
        match self.kind {
            GroupKind::OneOf => 1,
            GroupKind::ManyOf => self
                .declared_max
                .unwrap_or_else(|| u32::try_from(self.options.len()).unwrap_or(u32::MAX)),
        }
    }

    /// Whether at least one option must be chosen.
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.min > 0
    }

    /// Looks up an option of this group by id.
    #[must_use]
    pub fn find_option(&self, option_id: &str) -> Option<&ModifierOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    fn validate(&self, item_id: &str) -> Result<()> {
        let context = format!("item '{item_id}', option group '{}'", self.id);
        if self.id.trim().is_empty() {
            return Err(Error::catalog(format!(
                "item '{item_id}' has an option group without an id"
            )));
        }
        if self.kind == GroupKind::OneOf && self.min > 1 {
            return Err(Error::catalog(format!(
                "{context}: ONE_OF group cannot require {} choices",
                self.min
            )));
        }
        if self.max() < self.min {
            return Err(Error::catalog(format!(
                "{context}: max {} is below min {}",
                self.max(),
                self.min
            )));
        }
        if usize::try_from(self.min).unwrap_or(usize::MAX) > self.options.len() {
            return Err(Error::catalog(format!(
                "{context}: requires {} choices but only has {} options",
                self.min,
                self.options.len()
            )));
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if option.id.trim().is_empty() {
                return Err(Error::catalog(format!("{context}: option without an id")));
            }
            if !seen.insert(option.id.as_str()) {
                return Err(Error::catalog(format!(
                    "{context}: duplicate option id '{}'",
                    option.id
                )));
            }
            if !option.price_delta.within_menu_limit() {
                return Err(Error::catalog(format!(
                    "{context}: option '{}' price delta {} exceeds {}",
                    option.id,
                    option.price_delta,
                    Money::MENU_LIMIT
                )));
            }
        }
        Ok(())
    }
}

impl MenuItem {
    /// Whether choosing this item needs a customization step.
    ///
    /// Items whose groups are all empty behave like items without groups.
    #[must_use]
    pub fn has_options(&self) -> bool {
        self.option_groups.iter().any(|g| !g.options.is_empty())
    }

    /// Looks up an option group of this item by id.
    #[must_use]
    pub fn find_group(&self, group_id: &str) -> Option<&OptionGroup> {
        self.option_groups.iter().find(|g| g.id == group_id)
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::catalog(format!(
                "menu item '{}' has no id",
                self.title
            )));
        }
        if self.title.trim().is_empty() {
            return Err(Error::catalog(format!("menu item '{}' has no title", self.id)));
        }
        if self.price.is_negative() {
            return Err(Error::catalog(format!(
                "menu item '{}' has negative price {}",
                self.id, self.price
            )));
        }
        if !self.price.within_menu_limit() {
            return Err(Error::catalog(format!(
                "menu item '{}' price {} exceeds {}",
                self.id,
                self.price,
                Money::MENU_LIMIT
            )));
        }
        let mut seen = HashSet::new();
        for group in &self.option_groups {
            group.validate(&self.id)?;
            if !seen.insert(group.id.as_str()) {
                return Err(Error::catalog(format!(
                    "menu item '{}' has duplicate option group id '{}'",
                    self.id, group.id
                )));
            }
        }
        Ok(())
    }
}

impl Catalog {
    /// Parses and validates a catalog from JSON text.
    ///
    /// # Errors
    /// Returns [`Error::Catalog`] if the JSON is malformed, required fields are
    /// missing, or the catalog violates a structural rule.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| Error::catalog(format!("Failed to parse menu data: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks the structural rules the rest of the core relies on.
    ///
    /// # Errors
    /// Returns [`Error::Catalog`] describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.restaurant.name.trim().is_empty() {
            return Err(Error::catalog("restaurant name is missing"));
        }
        if !self.restaurant.phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(Error::catalog(format!(
                "restaurant phone '{}' contains no digits",
                self.restaurant.phone
            )));
        }

        let mut category_ids = HashSet::new();
        let mut item_ids = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(Error::catalog(format!(
                    "duplicate category id '{}'",
                    category.id
                )));
            }
            for item in &category.items {
                item.validate()?;
                if !item_ids.insert(item.id.as_str()) {
                    return Err(Error::catalog(format!(
                        "duplicate menu item id '{}'",
                        item.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Iterates over every item in category order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Finds a menu item by id, returning None if no such item exists.
    #[must_use]
    pub fn find_item(&self, item_id: &str) -> Option<&MenuItem> {
        self.items().find(|item| item.id == item_id)
    }
}

/// Reads and validates the catalog file at `path`.
///
/// This is the single asynchronous boundary of the core. A failure here ends the
/// session; callers should surface the error and stop.
///
/// # Errors
/// Returns [`Error::Catalog`] if the file cannot be read or is not a valid catalog.
pub async fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path_ref = path.as_ref();
    debug!("Loading menu catalog from {:?}", path_ref);
    let contents = tokio::fs::read_to_string(path_ref)
        .await
        .map_err(|e| Error::catalog(format!("Failed to read menu file {path_ref:?}: {e}")))?;
    let catalog = Catalog::from_json(&contents)?;
    info!(
        "Loaded menu for '{}': {} categories, {} items",
        catalog.restaurant.name,
        catalog.categories.len(),
        catalog.items().count()
    );
    Ok(catalog)
}
