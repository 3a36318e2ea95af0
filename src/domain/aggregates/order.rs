//! Order Aggregate
//!
//! Orders are read-only snapshots fetched from the order backend. Fields the
//! backend may omit deserialize to neutral defaults so that aggregation never
//! has to fail on partial records.

use chrono::{FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use crate::domain::value_objects::{local_date, SellerEmail};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub seller_email: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderStatus { Processing, Shipped, Delivered }

/// Whole numbers are accepted in integer or float form (`2`, `2.0`). Any
/// other value reads as missing instead of failing the whole listing.
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_i64().or_else(|| {
        v.as_f64().filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64).map(|f| f as i64)
    })))
}

impl OrderStatus {
    /// Recognizes the three fulfilment states regardless of case.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        [Self::Processing, Self::Shipped, Self::Delivered].into_iter().find(|s| raw.eq_ignore_ascii_case(s.as_str()))
    }

    pub fn as_str(&self) -> &'static str {
        match self { Self::Processing => "processing", Self::Shipped => "shipped", Self::Delivered => "delivered" }
    }
}

impl LineItem {
    pub fn price(&self) -> Decimal { self.price.unwrap_or_default() }
    pub fn quantity(&self) -> i64 { self.quantity.unwrap_or_default() }
    pub fn amount(&self) -> Decimal { self.price().saturating_mul(Decimal::from(self.quantity())) }
    pub fn is_sold_by(&self, seller: &SellerEmail) -> bool {
        self.seller_email.as_deref().is_some_and(|email| seller.matches(email))
    }
}

impl Order {
    pub fn status(&self) -> Option<OrderStatus> { self.status.as_deref().and_then(OrderStatus::parse) }

    pub fn items_sold_by<'a>(&'a self, seller: &'a SellerEmail) -> impl Iterator<Item = &'a LineItem> + 'a {
        self.items.iter().filter(move |item| item.is_sold_by(seller))
    }

    pub fn is_relevant_to(&self, seller: &SellerEmail) -> bool { self.items_sold_by(seller).next().is_some() }

    /// Units of this order attributed to `seller`.
    pub fn quantity_sold_by(&self, seller: &SellerEmail) -> i64 {
        self.items_sold_by(seller).fold(0i64, |acc, item| acc.saturating_add(item.quantity()))
    }

    /// Calendar day the order was placed, in `zone`. `None` when the
    /// timestamp is missing or unparseable.
    pub fn local_date(&self, zone: &FixedOffset) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(|raw| local_date(raw, zone))
    }

    /// Trailing six characters of the id, as shown in order listings.
    pub fn short_id(&self) -> &str {
        let start = self.id.char_indices().rev().nth(5).map_or(0, |(i, _)| i);
        &self.id[start..]
    }
}
