//! Unified error types for `MenuBuddy`.
//!
//! Lookups of unknown cart lines or menu items are deliberately absent here:
//! those are silent no-ops everywhere in the core and never surface as errors.

use thiserror::Error;

/// All errors produced by the catalog, cart, checkout and shell layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// The menu catalog is missing or malformed. Terminal for the session.
    #[error("Catalog error: {message}")]
    Catalog {
        /// Human-readable description of the problem
        message: String,
    },

    /// A customization was confirmed while an option group was under- or over-selected.
    #[error(
        "Option group '{group_name}' needs between {min} and {max} choices, {selected} selected"
    )]
    Validation {
        /// Id of the first offending group
        group_id: String,
        /// Display name of the offending group
        group_name: String,
        /// Number of options currently selected in the group
        selected: usize,
        /// Minimum number of choices
        min: u32,
        /// Maximum number of choices
        max: u32,
    },

    /// The chosen menu item is marked unavailable.
    #[error("Item '{item_id}' is currently unavailable")]
    ItemUnavailable {
        /// Id of the unavailable item
        item_id: String,
    },

    /// Checkout was requested with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// A monetary value could not be represented in cents.
    #[error("Invalid amount: {value}")]
    InvalidAmount {
        /// The offending input as written
        value: String,
    },

    /// Input from the interface layer could not be understood.
    #[error("Command error: {message}")]
    Command {
        /// Human-readable description of the problem
        message: String,
    },

    /// Writing formatted text failed.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Catalog`].
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Shorthand for building a [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error ends the session rather than blocking one action.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Catalog { .. } | Self::Config { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
