//! Option selection - the modal customization step between choosing an item and
//! putting it in the cart.
//!
//! Only one item can be under customization at a time. The controller holds a single
//! slot: opening a new customization while one is open silently replaces it.

use crate::{
    core::{
        cart::{Cart, CartChange, ChosenOption, LineId, LineItem},
        catalog::{GroupKind, MenuItem},
    },
    errors::{Error, Result},
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace, warn};

/// Which options are checked, keyed by option group id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    chosen: BTreeMap<String, BTreeSet<String>>,
}

impl SelectionState {
    /// Number of options chosen in a group.
    #[must_use]
    pub fn count(&self, group_id: &str) -> usize {
        self.chosen.get(group_id).map_or(0, BTreeSet::len)
    }

    /// Whether a specific option is chosen.
    #[must_use]
    pub fn is_selected(&self, group_id: &str, option_id: &str) -> bool {
        self.chosen
            .get(group_id)
            .is_some_and(|set| set.contains(option_id))
    }

    fn insert(&mut self, group_id: &str, option_id: &str) {
        self.chosen
            .entry(group_id.to_string())
            .or_default()
            .insert(option_id.to_string());
    }

    fn remove(&mut self, group_id: &str, option_id: &str) {
        if let Some(set) = self.chosen.get_mut(group_id) {
            set.remove(option_id);
        }
    }

    fn replace(&mut self, group_id: &str, option_id: &str) {
        let set = self.chosen.entry(group_id.to_string()).or_default();
        set.clear();
        set.insert(option_id.to_string());
    }
}

/// An open customization: the item, the choices so far, and the line being edited.
#[derive(Debug, Clone)]
pub struct Customization {
    item: MenuItem,
    editing: Option<LineId>,
    state: SelectionState,
}

impl Customization {
    /// The item being customized.
    #[must_use]
    pub const fn item(&self) -> &MenuItem {
        &self.item
    }

    /// The cart line being edited, if this is an edit rather than a new add.
    #[must_use]
    pub const fn editing(&self) -> Option<&LineId> {
        self.editing.as_ref()
    }

    /// Current choices.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Checks every option group of the item against its bounds.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for the first group, in definition order, whose
    /// selection count falls outside `min..=max`.
    pub fn validate(&self) -> Result<()> {
        for group in &self.item.option_groups {
            let selected = self.state.count(&group.id);
            let count = u32::try_from(selected).unwrap_or(u32::MAX);
            if count < group.min || count > group.max() {
                return Err(Error::Validation {
                    group_id: group.id.clone(),
                    group_name: group.name.clone(),
                    selected,
                    min: group.min,
                    max: group.max(),
                });
            }
        }
        Ok(())
    }

    /// Resolves the chosen ids into full option records, groups and options in the
    /// item's definition order.
    #[must_use]
    pub fn chosen_options(&self) -> Vec<ChosenOption> {
        self.item
            .option_groups
            .iter()
            .flat_map(|group| {
                group
                    .options
                    .iter()
                    .filter(|option| self.state.is_selected(&group.id, &option.id))
                    .map(|option| ChosenOption {
                        group_id: group.id.clone(),
                        group_name: group.name.clone(),
                        option_id: option.id.clone(),
                        name: option.name.clone(),
                        price_delta: option.price_delta,
                    })
            })
            .collect()
    }
}

/// Drives the customization dialog for one item at a time.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    active: Option<Customization>,
}

impl SelectionController {
    /// Begins customizing `item`.
    ///
    /// With `existing`, the choices are pre-populated from that cart line and a later
    /// [`confirm`](Self::confirm) edits the line instead of adding a new one. Choices
    /// on the line that no longer exist on the item are dropped.
    pub fn open(&mut self, item: MenuItem, existing: Option<&LineItem>) {
        if let Some(previous) = &self.active {
            debug!(
                "Discarding open customization of '{}' for '{}'",
                previous.item.id, item.id
            );
        }

        let mut state = SelectionState::default();
        if let Some(line) = existing {
            for chosen in &line.options {
                let still_offered = item
                    .find_group(&chosen.group_id)
                    .and_then(|g| g.find_option(&chosen.option_id))
                    .is_some();
                if still_offered {
                    state.insert(&chosen.group_id, &chosen.option_id);
                }
            }
        }

        debug!("Opened customization for '{}'", item.id);
        self.active = Some(Customization {
            item,
            editing: existing.map(|line| line.line_id.clone()),
            state,
        });
    }

    /// The open customization, if any.
    #[must_use]
    pub const fn active(&self) -> Option<&Customization> {
        self.active.as_ref()
    }

    /// Whether a customization is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Toggles an option and reports whether the choices changed.
    ///
    /// `ONE_OF` groups switch to the given option. `MANY_OF` groups flip membership,
    /// except that adding beyond the group maximum is silently refused. Unknown groups
    /// or options, or no open customization, are ignored.
    pub fn toggle(&mut self, group_id: &str, option_id: &str) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let Some(group) = active.item.find_group(group_id) else {
            return false;
        };
        if group.find_option(option_id).is_none() {
            return false;
        }

        let selected = active.state.is_selected(group_id, option_id);
        let changed = match group.kind {
            GroupKind::OneOf => {
                if selected {
                    false
                } else {
                    active.state.replace(group_id, option_id);
                    true
                }
            }
            GroupKind::ManyOf => {
                if selected {
                    active.state.remove(group_id, option_id);
                    true
                } else if u32::try_from(active.state.count(group_id)).unwrap_or(u32::MAX)
                    >= group.max()
                {
                    false
                } else {
                    active.state.insert(group_id, option_id);
                    true
                }
            }
        };
        trace!(
            "Toggle {}/{} on '{}': changed={}",
            group_id, option_id, active.item.id, changed
        );
        changed
    }

    /// Whether the current choices satisfy every group's bounds.
    /// Always false when nothing is open.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.validate().is_ok())
    }

    /// Puts the customized item into `cart` and closes the customization.
    ///
    /// An edit replaces the original line and keeps its quantity; a new add bumps the
    /// quantity of an identical line or appends a new one. With nothing open this
    /// returns [`CartChange::Unchanged`].
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if a group is under- or over-selected. The cart is
    /// untouched and the customization stays open so the user can fix it.
    pub fn confirm(&mut self, cart: &mut Cart) -> Result<CartChange> {
        let Some(active) = self.active.as_ref() else {
            return Ok(CartChange::Unchanged);
        };
        if let Err(e) = active.validate() {
            warn!("Rejected customization of '{}': {}", active.item.id, e);
            return Err(e);
        }

        let line = LineItem::new(
            &active.item.id,
            &active.item.title,
            active.item.price,
            active.chosen_options(),
        );
        let change = match &active.editing {
            Some(old) => cart.replace_line(old.as_str(), line),
            None => cart.add_line(line),
        };
        self.active = None;
        Ok(change)
    }

    /// Closes the customization without touching the cart. Returns whether one was open.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}
