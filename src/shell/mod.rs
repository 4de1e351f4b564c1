//! Shell layer - the terminal interface over a [`Storefront`].
//!
//! Reads commands line by line, applies them to the storefront and writes back a
//! rendered reply. All formatting lives in [`render`]; the core only reports state.

/// Command parsing
pub mod commands;
/// Text view models and layout
pub mod render;

use crate::{
    core::storefront::{ItemChoice, Storefront},
    errors::{Error, Result},
};
use commands::{Command, HELP_TEXT, parse_command};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, instrument};

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the text and keep reading
    Continue(String),
    /// Print the text and stop
    Quit(String),
}

/// Interactive session state.
pub struct Shell {
    storefront: Storefront,
}

impl Shell {
    /// Wraps a storefront.
    #[must_use]
    pub const fn new(storefront: Storefront) -> Self {
        Self { storefront }
    }

    /// The underlying storefront.
    #[must_use]
    pub const fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    /// Accepts either a line id or a 1-based cart position.
    fn resolve_line(&self, reference: &str) -> String {
        let lines = self.storefront.cart().lines();
        reference
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| lines.get(index))
            .map_or_else(|| reference.to_string(), |line| line.line_id.to_string())
    }

    /// Applies one command.
    ///
    /// # Errors
    /// Returns the storefront's error for refused actions (validation failures,
    /// unavailable items, empty-cart checkout).
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        let text = match command {
            Command::Menu => render::render_menu(self.storefront.catalog())?,
            Command::Help => HELP_TEXT.to_string(),
            Command::Quit => return Ok(Reply::Quit("Bye!".to_string())),
            Command::Add { item_id } => match self.storefront.choose_item(&item_id)? {
                ItemChoice::Added(change) => {
                    render::describe_change(&change, self.storefront.cart())
                }
                ItemChoice::Customizing => self.render_customization()?,
                ItemChoice::Missing => format!("❌ There is no menu item '{item_id}'."),
            },
            Command::Pick {
                group_id,
                option_id,
            } => {
                if self.storefront.customization().is_none() {
                    "Nothing is being customized. Use `add <item>` first.".to_string()
                } else {
                    self.storefront.toggle_option(&group_id, &option_id);
                    self.render_customization()?
                }
            }
            Command::Confirm => {
                let change = self.storefront.confirm()?;
                render::describe_change(&change, self.storefront.cart())
            }
            Command::Cancel => {
                if self.storefront.cancel() {
                    "Customization cancelled.".to_string()
                } else {
                    "Nothing to cancel.".to_string()
                }
            }
            Command::Edit { line } => {
                let line_id = self.resolve_line(&line);
                if self.storefront.edit_line(&line_id) {
                    self.render_customization()?
                } else {
                    format!("❌ No cart line '{line}'.")
                }
            }
            Command::Quantity { line, delta } => {
                let line_id = self.resolve_line(&line);
                let change = self.storefront.change_quantity(&line_id, delta);
                render::describe_change(&change, self.storefront.cart())
            }
            Command::Remove { line } => {
                let line_id = self.resolve_line(&line);
                let change = self.storefront.remove(&line_id);
                render::describe_change(&change, self.storefront.cart())
            }
            Command::Clear => {
                let change = self.storefront.clear();
                render::describe_change(&change, self.storefront.cart())
            }
            Command::Cart => render::render_cart(self.storefront.cart())?,
            Command::Toggle => {
                self.storefront.toggle_cart();
                render::render_cart(self.storefront.cart())?
            }
            Command::Checkout => {
                let payload = self.storefront.checkout()?;
                format!(
                    "{}\n\nPrepared {}. Open this link to send your order:\n{}",
                    payload.message,
                    payload.prepared_at.format("%Y-%m-%d %H:%M UTC"),
                    payload.url
                )
            }
        };
        Ok(Reply::Continue(text))
    }

    fn render_customization(&self) -> Result<String> {
        self.storefront
            .customization()
            .map_or_else(|| Ok(String::new()), render::render_customization)
    }

    /// Parses and applies one line of input, turning refused actions into messages.
    ///
    /// # Errors
    /// Returns terminal errors only; everything else becomes a reply.
    pub fn handle_line(&mut self, input: &str) -> Result<Option<Reply>> {
        let outcome = parse_command(input).and_then(|command| match command {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        });
        match outcome {
            Ok(reply) => Ok(reply),
            Err(e) if e.is_terminal() => Err(e),
            Err(e @ Error::Command { .. }) => Ok(Some(Reply::Continue(format!("❌ {e}")))),
            Err(e) => {
                info!("Action refused: {}", e);
                Ok(Some(Reply::Continue(format!("❌ {e}"))))
            }
        }
    }

    /// Runs the read-apply-print loop until `quit` or end of input.
    ///
    /// # Errors
    /// Returns an error if reading or writing fails.
    #[instrument(skip_all)]
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let greeting = format!(
            "Welcome to {}! Type `menu` to browse or `help` for commands.\n",
            self.storefront.catalog().restaurant.name
        );
        writer.write_all(greeting.as_bytes()).await?;
        writer.flush().await?;

        while let Some(line) = lines.next_line().await? {
            let reply = self.handle_line(&line).inspect_err(|e| {
                error!("Terminal error in shell: {}", e);
            })?;
            match reply {
                None => {}
                Some(Reply::Continue(text)) => {
                    writer.write_all(text.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                }
                Some(Reply::Quit(text)) => {
                    writer.write_all(text.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    break;
                }
            }
            writer.flush().await?;
        }
        writer.flush().await?;
        info!("Shell session ended");
        Ok(())
    }
}
