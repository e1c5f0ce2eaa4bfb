use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

use crate::util::{format_number, month_label};

/// One raw line of the orders CSV. Every field arrives as an optional
/// string; the loader decides what is required and what has a safe default.
/// Field names match the CSV headers, so no serde renames are needed, and
/// columns we do not consume are ignored by the reader.
#[derive(Debug, Deserialize)]
pub struct RawOrderRow {
    pub order_id: Option<String>,
    pub order_item_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_unique_id: Option<String>,
    pub customer_city: Option<String>,
    pub product_category_name_english: Option<String>,
    pub payment_value: Option<String>,
    pub order_purchase_timestamp: Option<String>,
    pub order_delivered_customer_date: Option<String>,
    pub order_estimated_delivery_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawGeoRow {
    pub customer_unique_id: Option<String>,
    pub geolocation_lat: Option<String>,
    pub geolocation_lng: Option<String>,
}

/// One cleaned order line item.
///
/// `order_id` repeats across the items of a multi-item order, and one row
/// may represent a single payment installment, so row-level sums count each
/// installment once while order-level counts must deduplicate on `order_id`.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_item_id: u32,
    pub customer_id: String,
    pub customer_unique_id: String,
    pub customer_city: String,
    pub product_category: String,
    pub payment_value: f64,
    pub purchase_ts: NaiveDateTime,
    pub delivered_at: Option<NaiveDateTime>,
    pub estimated_delivery: NaiveDateTime,
}

/// One customer map point. Coordinates are passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerLocation {
    pub customer_unique_id: String,
    pub geolocation_lat: f64,
    pub geolocation_lng: f64,
}

/// Explicit "insufficient data" condition for results that are undefined on
/// an empty input (top city, RFM recency, the reduced location set). Kept as
/// a dedicated error type so callers cannot mistake it for a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoData;

impl fmt::Display for NoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insufficient data")
    }
}

impl std::error::Error for NoData {}

// ---------------------------------------------------------------------------
// Engine output types (numeric, comparable keys)
// ---------------------------------------------------------------------------

/// One row per product category; `order_item_count` is the raw item-row
/// count, not a distinct-order count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct CategoryCount {
    pub product_category: String,
    pub order_item_count: usize,
}

/// Calendar-month bucket. The `(year, month)` pair is the comparable key;
/// label formatting belongs to the presentation boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub order_count: usize,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    pub day: NaiveDate,
    pub order_count: usize,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySpend {
    pub day: NaiveDate,
    pub total_spend: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct CityCount {
    pub customer_city: String,
    pub customer_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RfmRow {
    pub customer_unique_id: String,
    pub frequency: usize,
    pub monetary: f64,
    pub recency: i64,
}

/// Delivery outcome of one distinct order, derived from the delivered and
/// estimated delivery dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeliveryStatus {
    #[serde(rename = "On Time")]
    OnTime,
    Late,
    Undelivered,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::OnTime => write!(f, "On Time"),
            DeliveryStatus::Late => write!(f, "Late"),
            DeliveryStatus::Undelivered => write!(f, "Undelivered"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct DeliveryStatusCount {
    pub status: DeliveryStatus,
    pub order_count: usize,
}

/// Headline scalars over the filtered table, exported as `summary.json`.
#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_items: usize,
    pub total_orders: usize,
    pub total_customers: usize,
    pub total_cities: usize,
    pub total_revenue: f64,
    pub avg_daily_spend: f64,
}

// ---------------------------------------------------------------------------
// Rendered report rows (formatted strings for preview/export)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyPerformanceRow {
    pub month: String,
    pub order_count: usize,
    pub total_revenue: String,
}

impl From<&MonthlyBucket> for MonthlyPerformanceRow {
    fn from(b: &MonthlyBucket) -> Self {
        MonthlyPerformanceRow {
            month: month_label(b.year, b.month),
            order_count: b.order_count,
            total_revenue: format_number(b.total_revenue, 2),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DailyPerformanceRow {
    pub day: String,
    pub order_count: usize,
    pub total_revenue: String,
}

impl From<&DailyBucket> for DailyPerformanceRow {
    fn from(b: &DailyBucket) -> Self {
        DailyPerformanceRow {
            day: b.day.to_string(),
            order_count: b.order_count,
            total_revenue: format_number(b.total_revenue, 2),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DailySpendRow {
    pub day: String,
    pub total_spend: String,
}

impl From<&DailySpend> for DailySpendRow {
    fn from(s: &DailySpend) -> Self {
        DailySpendRow {
            day: s.day.to_string(),
            total_spend: format_number(s.total_spend, 2),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RfmTableRow {
    pub customer_unique_id: String,
    pub frequency: usize,
    pub monetary: String,
    pub recency: i64,
}

impl From<&RfmRow> for RfmTableRow {
    fn from(r: &RfmRow) -> Self {
        RfmTableRow {
            customer_unique_id: r.customer_unique_id.clone(),
            frequency: r.frequency,
            monetary: format_number(r.monetary, 2),
            recency: r.recency,
        }
    }
}
