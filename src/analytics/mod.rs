//! Reseller sales analytics.
//!
//! [`aggregate`] turns a snapshot of backend orders into the figures behind
//! the reseller dashboard. Only line items attributed to the reseller count
//! toward any figure; an order with at least one such item counts once
//! toward the order total.

pub mod bucket;

pub use bucket::{BucketKey, BucketMode};

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use crate::domain::aggregates::{LineItem, Order, OrderStatus};
use crate::domain::value_objects::SellerEmail;

pub const TOP_PRODUCTS: usize = 5;
pub const RECENT_ORDERS: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregationResult {
    pub total_sales: Decimal,
    pub total_orders: usize,
    pub total_products_sold: i64,
    pub average_order_value: Decimal,
    pub today_product_sold: i64,
    /// `(product name, units)`, best sellers first.
    pub top_products: Vec<(String, i64)>,
    pub status_count: StatusCount,
    pub sales_series: SalesSeries,
    pub recent_orders: Vec<RecentOrder>,
}

/// Matching line items per fulfilment state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub processing: u64,
    pub shipped: u64,
    pub delivered: u64,
}

impl StatusCount {
    fn record(&mut self, status: OrderStatus) {
        match status {
            OrderStatus::Processing => self.processing += 1,
            OrderStatus::Shipped => self.shipped += 1,
            OrderStatus::Delivered => self.delivered += 1,
        }
    }

    pub fn total(&self) -> u64 { self.processing + self.shipped + self.delivered }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SalesSeries {
    pub mode: BucketMode,
    pub label: &'static str,
    pub points: Vec<SeriesPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub bucket: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecentOrder {
    pub id: String,
    pub status: String,
    pub item_count: i64,
    pub date: String,
}

#[derive(Default)]
struct Accumulator {
    total_sales: Decimal,
    units: i64,
    today_units: i64,
    products: Vec<(String, i64)>,
    product_slots: HashMap<String, usize>,
    status: StatusCount,
    buckets: BTreeMap<BucketKey, Decimal>,
}

impl Accumulator {
    fn record(&mut self, item: &LineItem, today: bool, status: Option<OrderStatus>, bucket: BucketKey) {
        let amount = item.amount();
        let quantity = item.quantity();
        self.total_sales = self.total_sales.saturating_add(amount);
        self.units = self.units.saturating_add(quantity);
        if today { self.today_units = self.today_units.saturating_add(quantity); }
        if let Some(status) = status { self.status.record(status); }

        // Slots keep first-seen order so equal quantities rank stably.
        let slot = match self.product_slots.get(&item.name) {
            Some(&slot) => slot,
            None => {
                self.products.push((item.name.clone(), 0));
                self.product_slots.insert(item.name.clone(), self.products.len() - 1);
                self.products.len() - 1
            }
        };
        let entry = &mut self.products[slot].1;
        *entry = entry.saturating_add(quantity);

        let total = self.buckets.entry(bucket).or_insert(Decimal::ZERO);
        *total = total.saturating_add(amount);
    }

    fn top_products(mut products: Vec<(String, i64)>) -> Vec<(String, i64)> {
        products.retain(|(_, units)| *units > 0);
        products.sort_by(|a, b| b.1.cmp(&a.1));
        products.truncate(TOP_PRODUCTS);
        products
    }
}

/// Computes the reseller dashboard for `orders`.
///
/// `now` fixes both the "sold today" reference day and the UTC offset every
/// order timestamp is read in. The function is total: missing prices and
/// quantities count as zero, unknown statuses are left out of the status
/// breakdown, and unreadable timestamps land in an `Invalid Date` bucket.
pub fn aggregate(orders: &[Order], reseller: &SellerEmail, mode: BucketMode, now: DateTime<FixedOffset>) -> AggregationResult {
    let zone = *now.offset();
    let today = now.date_naive();
    let relevant: Vec<&Order> = orders.iter().filter(|o| o.is_relevant_to(reseller)).collect();

    let mut acc = Accumulator::default();
    for order in &relevant {
        let date = order.local_date(&zone);
        let status = order.status();
        let bucket = mode.bucket_for(date);
        for item in order.items_sold_by(reseller) {
            acc.record(item, date == Some(today), status, bucket);
        }
    }

    let total_orders = relevant.len();
    let average_order_value = if total_orders > 0 {
        acc.total_sales.checked_div(Decimal::from(total_orders)).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let recent_orders = relevant.iter().take(RECENT_ORDERS).map(|order| RecentOrder {
        id: order.short_id().to_string(),
        status: order.status.clone().unwrap_or_default(),
        item_count: order.quantity_sold_by(reseller),
        date: display_date(order.local_date(&zone)),
    }).collect();

    tracing::debug!(reseller = %reseller, mode = %mode, orders = orders.len(), relevant = total_orders, units = acc.units, "aggregated reseller orders");

    AggregationResult {
        total_sales: acc.total_sales,
        total_orders,
        total_products_sold: acc.units,
        average_order_value,
        today_product_sold: acc.today_units,
        top_products: Accumulator::top_products(acc.products),
        status_count: acc.status,
        sales_series: SalesSeries {
            mode,
            label: mode.chart_label(),
            points: acc.buckets.into_iter().map(|(key, amount)| SeriesPoint { bucket: key.to_string(), amount }).collect(),
        },
        recent_orders,
    }
}

fn display_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| BucketKey::Invalid.to_string(), |d| d.format("%Y-%m-%d").to_string())
}
