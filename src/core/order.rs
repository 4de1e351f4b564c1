//! Order formatting and checkout dispatch.
//!
//! Turns the cart into the plain-text order message and the messaging deep-link it
//! is sent through. Opening the link is left to whoever presents it.

use crate::{
    core::{
        cart::{Cart, LineItem},
        catalog::Restaurant,
        money::Money,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use std::fmt::{self, Write as _};
use tracing::info;
use url::Url;

/// Default target for dispatch links.
pub const DEFAULT_DISPATCH_BASE_URL: &str = "https://wa.me";

/// Annotation shown next to an option name for its price delta.
///
/// Positive deltas read `+$2.00`, negative ones `-$0.25`, and zero deltas get no
/// annotation at all. The menu view and the order text both use this rule.
#[must_use]
pub fn format_price_delta(delta: Money) -> Option<String> {
    if delta.is_positive() {
        Some(format!("+{delta}"))
    } else if delta.is_negative() {
        Some(delta.to_string())
    } else {
        None
    }
}

/// Formats the cart as the order message sent to the restaurant.
///
/// Produces a header naming the restaurant, one line per cart line in insertion
/// order, one indented line per option group on that cart line (groups in the item's
/// definition order), and a closing total:
///
/// ```text
/// New order for Joe's
/// Burger × 2 ($25.00)
///   Size: Large (+$2.00)
///   Extras: Cheese (+$1.00), Bacon (+$1.50)
/// Total: $25.00
/// ```
///
/// # Errors
/// Returns [`Error::Format`] if the text cannot be written.
pub fn format_order(cart: &Cart, restaurant_name: &str) -> Result<String> {
    let mut text = format!("New order for {restaurant_name}\n");
    for line in cart.lines() {
        write_line(&mut text, line)?;
    }
    write!(&mut text, "Total: {}", cart.totals().grand_total)?;
    Ok(text)
}

fn write_line(text: &mut String, line: &LineItem) -> fmt::Result {
    writeln!(
        text,
        "{} × {} ({})",
        line.title,
        line.quantity,
        line.line_total()
    )?;

    // Options are stored in definition order, so each group is one contiguous run.
    let mut rest = line.options.as_slice();
    while let Some(first) = rest.first() {
        let run = rest
            .iter()
            .take_while(|o| o.group_id == first.group_id)
            .count();
        let names: Vec<String> = rest[..run]
            .iter()
            .map(|o| match format_price_delta(o.price_delta) {
                Some(annotation) => format!("{} ({annotation})", o.name),
                None => o.name.clone(),
            })
            .collect();
        writeln!(text, "  {}: {}", first.group_name, names.join(", "))?;
        rest = &rest[run..];
    }
    Ok(())
}

/// Everything an external opener needs to hand the order to the messaging app.
#[derive(Debug, Clone)]
pub struct DispatchPayload {
    /// Target phone number, digits only
    pub phone: String,
    /// Formatted order text
    pub message: String,
    /// Deep-link carrying the encoded message
    pub url: Url,
    /// When the payload was built, logged and shown with the link
    pub prepared_at: DateTime<Utc>,
}

/// Strips everything but ASCII digits from a phone number.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Builds `<base>/<phone>?text=<message>` with the message percent-encoded
/// (spaces as `%20`).
///
/// # Errors
/// Returns [`Error::Config`] if `base` cannot carry a path.
pub fn dispatch_url(base: &Url, phone: &str, message: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::config(format!("dispatch URL '{base}' cannot take a path")))?
        .pop_if_empty()
        .push(phone);

    // form_urlencoded writes spaces as '+'; literal '+' is already %2B at this point.
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    url.set_query(Some(&format!("text={encoded}")));
    Ok(url)
}

/// Produces the dispatch payload for the current cart.
///
/// # Errors
/// Returns [`Error::EmptyCart`] if there is nothing to order, [`Error::Config`] if
/// the dispatch URL is unusable, or [`Error::Format`] if the order text cannot be written.
pub fn prepare_dispatch(
    cart: &Cart,
    restaurant: &Restaurant,
    base_url: &Url,
) -> Result<DispatchPayload> {
    if cart.is_empty() {
        return Err(Error::EmptyCart);
    }

    let phone = normalize_phone(&restaurant.phone);
    let message = format_order(cart, &restaurant.name)?;
    let url = dispatch_url(base_url, &phone, &message)?;
    let totals = cart.totals();
    let prepared_at = Utc::now();
    info!(
        "Prepared order for '{}' at {}: {} items, {}",
        restaurant.name,
        prepared_at.to_rfc3339(),
        totals.item_count,
        totals.grand_total
    );

    Ok(DispatchPayload {
        phone,
        message,
        url,
        prepared_at,
    })
}
