//! Domain events

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Cart(CartEvent),
}

/// Every variant means "the cart changed"; listeners that only refresh a
/// badge can ignore the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded { item_id: String, product_id: String, quantity: u32 },
    ItemRemoved { item_id: String },
    Cleared,
}
