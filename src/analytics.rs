// The analytics core: pure transformations from a filtered order-item table
// to the derived summary tables. Grouping and reduction are separate steps:
// `group_by` partitions rows preserving first-seen group order, and the
// named reducers (`distinct_order_count`, `payment_sum`) collapse each
// group.
use crate::types::{
    CategoryCount, CityCount, DailyBucket, DailySpend, DeliveryStatus, DeliveryStatusCount,
    MonthlyBucket, NoData, OrderRecord, RfmRow, SummaryStats,
};
use crate::util::{average, days_diff};
use chrono::Datelike;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Number of trailing calendar months kept by the monthly performance table.
pub const RECENT_MONTHS_WINDOW: usize = 8;

/// Partition rows by a key, preserving the order in which keys are first
/// seen. Ties that survive a later stable sort therefore keep their
/// discovery order.
fn group_by<'r, K, F>(rows: &'r [OrderRecord], key: F) -> Vec<(K, Vec<&'r OrderRecord>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&OrderRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'r OrderRecord>)> = Vec::new();
    for r in rows {
        let k = key(r);
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(r),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![r]));
            }
        }
    }
    groups
}

/// Number of distinct `order_id` values in a group. One order contributes
/// once no matter how many item rows it spans.
fn distinct_order_count(rows: &[&OrderRecord]) -> usize {
    let orders: HashSet<&str> = rows.iter().map(|r| r.order_id.as_str()).collect();
    orders.len()
}

/// Sum of `payment_value` at item-row granularity, so every installment row
/// contributes.
fn payment_sum(rows: &[&OrderRecord]) -> f64 {
    rows.iter().map(|r| r.payment_value).sum()
}

/// Analytics engine over one immutable, already-filtered snapshot of the
/// orders table. Every operation is pure; recomputing on the same snapshot
/// yields identical output.
pub struct Analytics<'a> {
    rows: &'a [OrderRecord],
}

impl<'a> Analytics<'a> {
    pub fn new(rows: &'a [OrderRecord]) -> Self {
        Analytics { rows }
    }

    /// Item-row counts per product category, descending. Ties keep the
    /// order in which the categories first appear in the input.
    pub fn summarize_order_items(&self) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = group_by(self.rows, |r| r.product_category.clone())
            .into_iter()
            .map(|(product_category, members)| CategoryCount {
                product_category,
                order_item_count: members.len(),
            })
            .collect();
        // Stable sort: equal counts stay in discovery order.
        counts.sort_by(|a, b| b.order_item_count.cmp(&a.order_item_count));
        counts
    }

    /// Distinct-order count and revenue per calendar month, chronological,
    /// truncated to the trailing `window` months present in the data.
    pub fn summarize_monthly(&self, window: usize) -> Vec<MonthlyBucket> {
        let mut buckets: Vec<MonthlyBucket> =
            group_by(self.rows, |r| (r.purchase_ts.year(), r.purchase_ts.month()))
                .into_iter()
                .map(|((year, month), members)| MonthlyBucket {
                    year,
                    month,
                    order_count: distinct_order_count(&members),
                    total_revenue: payment_sum(&members),
                })
                .collect();
        buckets.sort_by_key(|b| (b.year, b.month));
        if buckets.len() > window {
            buckets = buckets.split_off(buckets.len() - window);
        }
        buckets
    }

    /// Distinct-order count and revenue per calendar day, chronological,
    /// without truncation.
    pub fn summarize_daily(&self) -> Vec<DailyBucket> {
        let mut buckets: Vec<DailyBucket> = group_by(self.rows, |r| r.purchase_ts.date())
            .into_iter()
            .map(|(day, members)| DailyBucket {
                day,
                order_count: distinct_order_count(&members),
                total_revenue: payment_sum(&members),
            })
            .collect();
        buckets.sort_by_key(|b| b.day);
        buckets
    }

    /// Total customer spend per calendar day, chronological.
    pub fn summarize_spend_daily(&self) -> Vec<DailySpend> {
        let mut buckets: Vec<DailySpend> = group_by(self.rows, |r| r.purchase_ts.date())
            .into_iter()
            .map(|(day, members)| DailySpend {
                day,
                total_spend: payment_sum(&members),
            })
            .collect();
        buckets.sort_by_key(|b| b.day);
        buckets
    }

    /// Distinct customers per city, descending by count with ties broken by
    /// ascending city name, plus the top city. The top city is undefined on
    /// an empty input and comes back as `Err(NoData)`.
    pub fn summarize_by_city(&self) -> (Vec<CityCount>, Result<String, NoData>) {
        let mut counts: Vec<CityCount> = group_by(self.rows, |r| r.customer_city.clone())
            .into_iter()
            .map(|(customer_city, members)| {
                let customers: HashSet<&str> =
                    members.iter().map(|r| r.customer_id.as_str()).collect();
                CityCount {
                    customer_city,
                    customer_count: customers.len(),
                }
            })
            .collect();
        counts.sort_by(|a, b| {
            b.customer_count
                .cmp(&a.customer_count)
                .then_with(|| a.customer_city.cmp(&b.customer_city))
        });
        let top_city = counts
            .first()
            .map(|c| c.customer_city.clone())
            .ok_or(NoData);
        (counts, top_city)
    }

    /// Recency/Frequency/Monetary per distinct `customer_unique_id`.
    /// Recency is whole days between the latest purchase date anywhere in
    /// the snapshot and the customer's own latest purchase date, so it is
    /// never negative and at least one customer sits at zero. Undefined on
    /// an empty snapshot; no partial table is returned.
    pub fn compute_rfm(&self) -> Result<Vec<RfmRow>, NoData> {
        let recent_date = self
            .rows
            .iter()
            .map(|r| r.purchase_ts.date())
            .max()
            .ok_or(NoData)?;
        let rows = group_by(self.rows, |r| r.customer_unique_id.clone())
            .into_iter()
            .map(|(customer_unique_id, members)| {
                let latest = members
                    .iter()
                    .map(|r| r.purchase_ts.date())
                    .max()
                    .unwrap_or(recent_date);
                RfmRow {
                    customer_unique_id,
                    frequency: distinct_order_count(&members),
                    monetary: payment_sum(&members),
                    recency: days_diff(latest, recent_date),
                }
            })
            .collect();
        Ok(rows)
    }

    /// Delivery outcome counts over distinct orders: delivered at or before
    /// the estimate, delivered after it, or not delivered at all. All three
    /// statuses are always present, in that fixed order.
    pub fn summarize_delivery_status(&self) -> Vec<DeliveryStatusCount> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut on_time = 0usize;
        let mut late = 0usize;
        let mut undelivered = 0usize;
        for r in self.rows {
            if !seen.insert(r.order_id.as_str()) {
                continue;
            }
            match r.delivered_at {
                Some(delivered) if delivered <= r.estimated_delivery => on_time += 1,
                Some(_) => late += 1,
                None => undelivered += 1,
            }
        }
        vec![
            DeliveryStatusCount { status: DeliveryStatus::OnTime, order_count: on_time },
            DeliveryStatusCount { status: DeliveryStatus::Late, order_count: late },
            DeliveryStatusCount { status: DeliveryStatus::Undelivered, order_count: undelivered },
        ]
    }

    /// Headline scalars for the summary export. Tolerates an empty snapshot
    /// by reporting zeros throughout.
    pub fn summary(&self) -> SummaryStats {
        let all: Vec<&OrderRecord> = self.rows.iter().collect();
        let customers: HashSet<&str> = self.rows.iter().map(|r| r.customer_unique_id.as_str()).collect();
        let cities: HashSet<&str> = self.rows.iter().map(|r| r.customer_city.as_str()).collect();
        let daily_spend: Vec<f64> = self
            .summarize_spend_daily()
            .iter()
            .map(|d| d.total_spend)
            .collect();
        SummaryStats {
            total_items: self.rows.len(),
            total_orders: distinct_order_count(&all),
            total_customers: customers.len(),
            total_cities: cities.len(),
            total_revenue: payment_sum(&all),
            avg_daily_spend: average(&daily_spend),
        }
    }
}
