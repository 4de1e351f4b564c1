//! Core business logic - framework-agnostic catalog, selection, cart, pricing and
//! order operations. Nothing in here reads input or writes to a terminal.

/// Shopping cart and line items
pub mod cart;
/// Menu catalog model and loading
pub mod catalog;
/// Fixed-point money
pub mod money;
/// Order text and checkout dispatch
pub mod order;
/// Unit price and line total calculations
pub mod pricing;
/// Option selection for the customization step
pub mod selection;
/// Session aggregate tying catalog, cart and selection together
pub mod storefront;
