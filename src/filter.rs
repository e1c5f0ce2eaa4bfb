// Date-range filtering over the loaded orders table. Thin by design: the
// analytics engine always receives an already-filtered snapshot.
use crate::types::OrderRecord;
use chrono::NaiveDate;

/// Keep the rows whose purchase date falls in the closed interval
/// `[start, end]`. The comparison is on the date component, so an order
/// placed at 23:59 on `end` is still included.
pub fn filter_by_date(rows: &[OrderRecord], start: NaiveDate, end: NaiveDate) -> Vec<OrderRecord> {
    rows.iter()
        .filter(|r| {
            let d = r.purchase_ts.date();
            d >= start && d <= end
        })
        .cloned()
        .collect()
}

/// Minimum and maximum purchase dates in the table, used as the prompt
/// defaults. `None` for an empty table.
pub fn date_bounds(rows: &[OrderRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = rows.iter().map(|r| r.purchase_ts.date()).min()?;
    let max = rows.iter().map(|r| r.purchase_ts.date()).max()?;
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn order_on(id: &str, ts: &str) -> OrderRecord {
        OrderRecord {
            order_id: id.to_string(),
            order_item_id: 1,
            customer_id: "c1".to_string(),
            customer_unique_id: "u1".to_string(),
            customer_city: "sao paulo".to_string(),
            product_category: "toys".to_string(),
            payment_value: 10.0,
            purchase_ts: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            delivered_at: None,
            estimated_delivery: NaiveDateTime::parse_from_str("2018-12-31 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn interval_is_inclusive_on_both_ends() {
        let rows = vec![
            order_on("A", "2018-01-01 00:00:00"),
            order_on("B", "2018-01-15 12:00:00"),
            order_on("C", "2018-01-31 23:59:59"),
            order_on("D", "2018-02-01 00:00:00"),
        ];
        let kept = filter_by_date(&rows, date("2018-01-01"), date("2018-01-31"));
        let ids: Vec<&str> = kept.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn bounds_cover_the_full_span() {
        let rows = vec![
            order_on("A", "2017-06-02 08:00:00"),
            order_on("B", "2018-03-04 10:00:00"),
        ];
        assert_eq!(date_bounds(&rows), Some((date("2017-06-02"), date("2018-03-04"))));
        assert_eq!(date_bounds(&[]), None);
    }
}
