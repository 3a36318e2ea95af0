//! Product Aggregate

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)] pub color: Option<String>,
    #[serde(default)] pub size: Option<String>,
    #[serde(default)] pub price: Option<Decimal>,
    #[serde(default)] pub stock: Option<i64>,
}

/// Color and size picked on the product page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSelection { pub color: Option<String>, pub size: Option<String> }

impl VariantSelection {
    pub fn new(color: Option<&str>, size: Option<&str>) -> Self {
        Self { color: color.map(str::to_string), size: size.map(str::to_string) }
    }
    pub fn color(&self) -> Option<&str> { present(&self.color) }
    pub fn size(&self) -> Option<&str> { present(&self.size) }
}

impl Variant {
    pub fn color(&self) -> Option<&str> { present(&self.color) }
    pub fn size(&self) -> Option<&str> { present(&self.size) }
}

/// Blank strings count as "not chosen".
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Product {
    pub fn has_colors(&self) -> bool { self.variants.iter().any(|v| v.color().is_some()) }
    pub fn has_sizes(&self) -> bool { self.variants.iter().any(|v| v.size().is_some()) }

    /// Color is checked before size, matching the order the page prompts for them.
    pub fn validate_selection(&self, selection: &VariantSelection) -> Result<(), ProductError> {
        if self.has_colors() && selection.color().is_none() { return Err(ProductError::ColorRequired); }
        if self.has_sizes() && selection.size().is_none() { return Err(ProductError::SizeRequired); }
        Ok(())
    }

    pub fn variant_for(&self, selection: &VariantSelection) -> Option<&Variant> {
        self.variants.iter().find(|v| v.color() == selection.color() && v.size() == selection.size())
    }

    /// Stock for the chosen variant, or the product-level stock when no
    /// variant matches or the variant carries none.
    pub fn stock_for(&self, selection: &VariantSelection) -> i64 {
        self.variant_for(selection).and_then(|v| v.stock).unwrap_or(self.stock_quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ProductError { ColorRequired, SizeRequired }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::ColorRequired => write!(f, "Please select color."), Self::SizeRequired => write!(f, "Please select size.") }
    }
}
