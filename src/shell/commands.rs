//! Shell command parsing.
//!
//! Turns one line of user input into a [`Command`]. Parsing knows nothing about the
//! menu or the cart; ids are passed through as typed.

use crate::errors::{Error, Result};

/// Usage text printed by `help`.
pub const HELP_TEXT: &str = "Available commands:\n\
    `menu` - Show the menu\n\
    `add <item>` - Add an item, or start customizing it\n\
    `pick <group> <option>` - Toggle an option while customizing\n\
    `confirm` - Put the customized item in the cart\n\
    `cancel` - Stop customizing without changing the cart\n\
    `edit <line>` - Change the options of a cart line\n\
    `qty <line> <delta>` - Change a line's quantity (e.g. `qty 1 +2`, `qty 2 -1`)\n\
    `remove <line>` - Remove a line\n\
    `clear` - Empty the cart\n\
    `cart` - Show the cart\n\
    `toggle` - Expand or collapse the cart\n\
    `checkout` - Build the order message and link\n\
    `quit` - Leave";

/// One parsed user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the menu
    Menu,
    /// Choose a menu item
    Add {
        /// Menu item id
        item_id: String,
    },
    /// Toggle an option in the open customization
    Pick {
        /// Option group id
        group_id: String,
        /// Option id
        option_id: String,
    },
    /// Confirm the open customization
    Confirm,
    /// Cancel the open customization
    Cancel,
    /// Re-open a cart line for customization
    Edit {
        /// Line id or 1-based position
        line: String,
    },
    /// Change a line's quantity by a delta
    Quantity {
        /// Line id or 1-based position
        line: String,
        /// Signed change
        delta: i64,
    },
    /// Remove a line
    Remove {
        /// Line id or 1-based position
        line: String,
    },
    /// Empty the cart
    Clear,
    /// Show the cart
    Cart,
    /// Expand or collapse the cart
    Toggle,
    /// Build the order dispatch
    Checkout,
    /// Show usage
    Help,
    /// Leave the shell
    Quit,
}

fn command_error(message: impl Into<String>) -> Error {
    Error::Command {
        message: message.into(),
    }
}

/// Parses a line of input. Blank lines yield `Ok(None)`.
///
/// # Errors
/// Returns [`Error::Command`] for unknown commands, missing arguments or a
/// non-numeric quantity delta.
pub fn parse_command(input: &str) -> Result<Option<Command>> {
    let mut words = input.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let arg = |index: usize, what: &str| -> Result<String> {
        args.get(index)
            .map(ToString::to_string)
            .ok_or_else(|| command_error(format!("`{name}` needs a {what}")))
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "menu" | "m" => Command::Menu,
        "add" | "a" => Command::Add {
            item_id: arg(0, "menu item id")?,
        },
        "pick" | "p" => Command::Pick {
            group_id: arg(0, "option group id")?,
            option_id: arg(1, "option id")?,
        },
        "confirm" | "ok" => Command::Confirm,
        "cancel" => Command::Cancel,
        "edit" => Command::Edit {
            line: arg(0, "cart line")?,
        },
        "qty" | "q" => {
            let line = arg(0, "cart line")?;
            let raw = arg(1, "quantity change")?;
            let delta = raw
                .parse::<i64>()
                .map_err(|_| command_error(format!("'{raw}' is not a whole number")))?;
            Command::Quantity { line, delta }
        }
        "remove" | "rm" => Command::Remove {
            line: arg(0, "cart line")?,
        },
        "clear" => Command::Clear,
        "cart" | "c" => Command::Cart,
        "toggle" | "t" => Command::Toggle,
        "checkout" | "order" => Command::Checkout,
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(command_error(format!(
                "Unknown command '{other}'. Type `help` for a list."
            )));
        }
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_blank_input() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   \t ").unwrap(), None);
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("menu").unwrap(), Some(Command::Menu));
        assert_eq!(parse_command(" CART ").unwrap(), Some(Command::Cart));
        assert_eq!(parse_command("ok").unwrap(), Some(Command::Confirm));
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(
            parse_command("add burger").unwrap(),
            Some(Command::Add {
                item_id: "burger".to_string()
            })
        );
        assert_eq!(
            parse_command("pick size large").unwrap(),
            Some(Command::Pick {
                group_id: "size".to_string(),
                option_id: "large".to_string()
            })
        );
        assert_eq!(
            parse_command("qty 2 +3").unwrap(),
            Some(Command::Quantity {
                line: "2".to_string(),
                delta: 3
            })
        );
        assert_eq!(
            parse_command("qty fries -1").unwrap(),
            Some(Command::Quantity {
                line: "fries".to_string(),
                delta: -1
            })
        );
    }

    #[test]
    fn test_missing_arguments() {
        for input in ["add", "pick size", "qty 1", "remove", "edit"] {
            assert!(
                matches!(parse_command(input), Err(Error::Command { .. })),
                "expected {input:?} to fail"
            );
        }
    }

    #[test]
    fn test_bad_delta_and_unknown_command() {
        assert!(matches!(
            parse_command("qty 1 lots"),
            Err(Error::Command { message }) if message.contains("lots")
        ));
        assert!(matches!(
            parse_command("dance"),
            Err(Error::Command { message }) if message.contains("dance")
        ));
    }
}
