//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{Product, ProductError, Variant, VariantSelection};
pub use order::{Order, OrderStatus, LineItem};
pub use cart::{Cart, CartError, CartItem};
