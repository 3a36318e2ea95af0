//! Cart Aggregate
//!
//! One cart line per (user, product, color, size). The product page either
//! rejects a repeat add or, on "buy now", reuses the line already there.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::product::{Product, ProductError, VariantSelection};
use crate::domain::events::{CartEvent, DomainEvent};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub color: Option<String>,
    pub size: Option<String>,
    pub stock_quantity: i64,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal { self.price.saturating_mul(Decimal::from(self.quantity)) }

    fn is_line(&self, user_id: &str, product_id: &str, selection: &VariantSelection) -> bool {
        self.user_id == user_id && self.product_id == product_id
            && self.color.as_deref() == selection.color() && self.size.as_deref() == selection.size()
    }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    /// Rebuilds a cart from previously stored lines.
    pub fn from_items(items: Vec<CartItem>) -> Self { Self { items, events: vec![] } }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn items_for<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a CartItem> + 'a {
        self.items.iter().filter(move |i| i.user_id == user_id)
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.line_total()))
    }

    pub fn contains(&self, user_id: &str, product: &Product, selection: &VariantSelection) -> bool {
        self.items.iter().any(|i| i.is_line(user_id, &product.id, selection))
    }

    pub fn add_product(&mut self, user_id: &str, product: &Product, selection: &VariantSelection, quantity: u32) -> Result<&CartItem, CartError> {
        Self::check(product, selection, quantity)?;
        if self.contains(user_id, product, selection) { return Err(CartError::AlreadyInCart); }
        Ok(self.push(user_id, product, selection, quantity))
    }

    /// Same checks as [`Cart::add_product`], but an existing line is kept
    /// as is. Returns whether a line was added.
    pub fn buy_now(&mut self, user_id: &str, product: &Product, selection: &VariantSelection, quantity: u32) -> Result<bool, CartError> {
        Self::check(product, selection, quantity)?;
        if self.contains(user_id, product, selection) { return Ok(false); }
        self.push(user_id, product, selection, quantity);
        Ok(true)
    }

    pub fn remove_item(&mut self, item_id: &str) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { item_id: item_id.to_string() }));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }

    fn check(product: &Product, selection: &VariantSelection, quantity: u32) -> Result<(), CartError> {
        product.validate_selection(selection)?;
        if quantity == 0 { return Err(CartError::InvalidQuantity); }
        let available = product.stock_for(selection);
        if available <= 0 { return Err(CartError::OutOfStock); }
        if i64::from(quantity) > available { return Err(CartError::ExceedsStock { available }); }
        Ok(())
    }

    fn push(&mut self, user_id: &str, product: &Product, selection: &VariantSelection, quantity: u32) -> &CartItem {
        let item = CartItem {
            id: Uuid::new_v4().to_string(), user_id: user_id.to_string(), product_id: product.id.clone(),
            name: product.name.clone(), quantity, price: product.price,
            color: selection.color().map(str::to_string), size: selection.size().map(str::to_string),
            stock_quantity: product.stock_for(selection),
        };
        self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { item_id: item.id.clone(), product_id: item.product_id.clone(), quantity }));
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { Selection(ProductError), InvalidQuantity, OutOfStock, ExceedsStock { available: i64 }, AlreadyInCart, ItemNotFound }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selection(e) => write!(f, "{}", e),
            Self::InvalidQuantity => write!(f, "Invalid quantity"),
            Self::OutOfStock => write!(f, "Out of stock"),
            Self::ExceedsStock { available } => write!(f, "Only {} left in stock", available),
            Self::AlreadyInCart => write!(f, "This product with selected variant is already in your cart."),
            Self::ItemNotFound => write!(f, "Item not found"),
        }
    }
}
impl From<ProductError> for CartError {
    fn from(e: ProductError) -> Self { Self::Selection(e) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::Variant;

    fn tee() -> Product {
        Product {
            id: "P1".into(), name: "Tee".into(), price: Decimal::new(450, 0), stock_quantity: 9,
            variants: vec![
                Variant { color: Some("red".into()), size: Some("M".into()), price: None, stock: Some(3) },
                Variant { color: Some("red".into()), size: Some("L".into()), price: None, stock: Some(1) },
                Variant { color: Some("red".into()), size: Some("S".into()), price: None, stock: Some(0) },
            ],
        }
    }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::new();
        let red_m = VariantSelection::new(Some("red"), Some("M"));
        let item = cart.add_product("U1", &tee(), &red_m, 2).unwrap();
        assert_eq!(item.stock_quantity, 3);
        assert_eq!(cart.subtotal(), Decimal::new(900, 0));
        cart.add_product("U1", &tee(), &VariantSelection::new(Some("red"), Some("L")), 1).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.take_events().len(), 2);
    }

    #[test]
    fn test_duplicate_line_rejected() {
        let mut cart = Cart::new();
        let red_m = VariantSelection::new(Some("red"), Some("M"));
        cart.add_product("U1", &tee(), &red_m, 1).unwrap();
        assert_eq!(cart.add_product("U1", &tee(), &red_m, 1).unwrap_err(), CartError::AlreadyInCart);
        // Another user keeps their own line.
        assert!(cart.add_product("U2", &tee(), &red_m, 1).is_ok());
        assert_eq!(cart.items_for("U1").count(), 1);
    }

    #[test]
    fn test_selection_and_quantity_checked() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_product("U1", &tee(), &VariantSelection::default(), 1).unwrap_err(), CartError::Selection(ProductError::ColorRequired));
        assert_eq!(cart.add_product("U1", &tee(), &VariantSelection::new(Some("red"), None), 1).unwrap_err(), CartError::Selection(ProductError::SizeRequired));
        assert_eq!(cart.add_product("U1", &tee(), &VariantSelection::new(Some("red"), Some("M")), 0).unwrap_err(), CartError::InvalidQuantity);
        assert!(cart.is_empty());
        assert!(cart.take_events().is_empty());
    }

    #[test]
    fn test_stock_limits_quantity() {
        let mut cart = Cart::new();
        let red_l = VariantSelection::new(Some("red"), Some("L"));
        let red_s = VariantSelection::new(Some("red"), Some("S"));
        assert_eq!(cart.add_product("U1", &tee(), &red_l, 2).unwrap_err(), CartError::ExceedsStock { available: 1 });
        assert_eq!(cart.add_product("U1", &tee(), &red_s, 1).unwrap_err(), CartError::OutOfStock);
        assert_eq!(cart.buy_now("U1", &tee(), &red_s, 1).unwrap_err(), CartError::OutOfStock);
        assert_eq!(cart.buy_now("U1", &tee(), &red_l, 5).unwrap_err().to_string(), "Only 1 left in stock");
        assert!(cart.is_empty());
        // Without a matching variant the product-level stock applies.
        let plain = Product { variants: vec![], stock_quantity: 0, ..tee() };
        assert_eq!(cart.add_product("U1", &plain, &VariantSelection::default(), 1).unwrap_err(), CartError::OutOfStock);
        let plain = Product { stock_quantity: 2, ..plain };
        assert!(cart.add_product("U1", &plain, &VariantSelection::default(), 2).is_ok());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_buy_now_reuses_line() {
        let mut cart = Cart::new();
        let red_m = VariantSelection::new(Some("red"), Some("M"));
        assert!(cart.buy_now("U1", &tee(), &red_m, 1).unwrap());
        assert!(!cart.buy_now("U1", &tee(), &red_m, 1).unwrap());
        assert_eq!(cart.item_count(), 1);
        assert!(cart.buy_now("U1", &tee(), &VariantSelection::default(), 1).is_err());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        let id = cart.add_product("U1", &tee(), &VariantSelection::new(Some("red"), Some("M")), 1).unwrap().id.clone();
        assert_eq!(cart.remove_item("missing"), Err(CartError::ItemNotFound));
        cart.remove_item(&id).unwrap();
        cart.clear();
        let events = cart.take_events();
        assert_eq!(events.last(), Some(&DomainEvent::Cart(CartEvent::Cleared)));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_restore_from_storage() {
        let mut cart = Cart::new();
        cart.add_product("U1", &tee(), &VariantSelection::new(Some("red"), Some("M")), 2).unwrap();
        let stored = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored.items(), cart.items());
        assert!(restored.contains("U1", &tee(), &VariantSelection::new(Some("red"), Some("M"))));
        let mut rebuilt = Cart::from_items(restored.items().to_vec());
        assert_eq!(rebuilt.subtotal(), Decimal::new(900, 0));
        assert!(rebuilt.take_events().is_empty());
    }
}
