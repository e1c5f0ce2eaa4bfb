use crate::types::{CustomerLocation, OrderRecord, RawGeoRow, RawOrderRow};
use crate::util::{parse_datetime_safe, parse_f64_safe, parse_u32_safe};
use csv::ReaderBuilder;
use std::error::Error;

/// Per-file load diagnostics, printed by the CLI after each load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

/// Load and type the orders CSV.
///
/// Rows missing a required field (ids, purchase timestamp, estimated
/// delivery, payment) are skipped and counted rather than failing the whole
/// load. The delivered date is genuinely nullable and stays `None` when
/// absent. The returned table is sorted ascending by purchase timestamp.
pub fn load_orders(path: &str) -> Result<(Vec<OrderRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut records: Vec<OrderRecord> = Vec::new();

    for result in rdr.deserialize::<RawOrderRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => { parse_errors += 1; continue; }
        };

        let order_id = match non_empty(row.order_id) { Some(s) => s, None => { parse_errors += 1; continue; } };
        let customer_id = match non_empty(row.customer_id) { Some(s) => s, None => { parse_errors += 1; continue; } };
        let customer_unique_id = match non_empty(row.customer_unique_id) { Some(s) => s, None => { parse_errors += 1; continue; } };
        let purchase_ts = match parse_datetime_safe(row.order_purchase_timestamp.as_deref()) { Some(t) => t, None => { parse_errors += 1; continue; } };
        let estimated_delivery = match parse_datetime_safe(row.order_estimated_delivery_date.as_deref()) { Some(t) => t, None => { parse_errors += 1; continue; } };
        let payment_value = match parse_f64_safe(row.payment_value.as_deref()) { Some(v) if v >= 0.0 => v, _ => { parse_errors += 1; continue; } };

        // Nullable by schema: an undelivered order simply has no date here.
        let delivered_at = parse_datetime_safe(row.order_delivered_customer_date.as_deref());
        let order_item_id = parse_u32_safe(row.order_item_id.as_deref()).unwrap_or(1);

        let customer_city = row.customer_city.unwrap_or_else(|| "unknown".to_string()).trim().to_string();
        let product_category = row
            .product_category_name_english
            .unwrap_or_else(|| "unspecified".to_string())
            .trim()
            .to_string();

        records.push(OrderRecord {
            order_id,
            order_item_id,
            customer_id,
            customer_unique_id,
            customer_city,
            product_category,
            payment_value,
            purchase_ts,
            delivered_at,
            estimated_delivery,
        });
    }

    // The table is kept sorted by purchase timestamp from load time on.
    records.sort_by_key(|r| r.purchase_ts);

    let loaded_rows = records.len();
    let report = LoadReport { total_rows, loaded_rows, parse_errors };
    Ok((records, report))
}

/// Load the geolocation CSV. No deduplication happens here; reducing to one
/// point per customer is the geospatial reducer's job.
pub fn load_geolocation(path: &str) -> Result<(Vec<CustomerLocation>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut points: Vec<CustomerLocation> = Vec::new();

    for result in rdr.deserialize::<RawGeoRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => { parse_errors += 1; continue; }
        };
        let customer_unique_id = match non_empty(row.customer_unique_id) { Some(s) => s, None => { parse_errors += 1; continue; } };
        let geolocation_lat = match parse_f64_safe(row.geolocation_lat.as_deref()) { Some(v) => v, None => { parse_errors += 1; continue; } };
        let geolocation_lng = match parse_f64_safe(row.geolocation_lng.as_deref()) { Some(v) => v, None => { parse_errors += 1; continue; } };

        points.push(CustomerLocation { customer_unique_id, geolocation_lat, geolocation_lng });
    }

    let loaded_rows = points.len();
    let report = LoadReport { total_rows, loaded_rows, parse_errors };
    Ok((points, report))
}

fn non_empty(s: Option<String>) -> Option<String> {
    let s = s?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("orders_report_test_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_orders_skipping_malformed_rows() {
        let csv = "\
order_id,order_item_id,customer_id,customer_unique_id,customer_city,product_category_name_english,payment_value,order_purchase_timestamp,order_delivered_customer_date,order_estimated_delivery_date
B,1,c2,u2,rio,books,20.00,2018-02-10 09:00:00,2018-02-20 10:00:00,2018-02-18 00:00:00
A,1,c1,u1,sao paulo,toys,10.00,2018-01-05 12:00:00,,2018-01-20 00:00:00
,1,c3,u3,rio,toys,5.00,2018-01-06 12:00:00,,2018-01-21 00:00:00
C,1,c4,u4,rio,toys,not-a-number,2018-01-07 12:00:00,,2018-01-22 00:00:00
";
        let path = write_temp("orders.csv", csv);
        let (records, report) = load_orders(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.loaded_rows, 2);
        assert_eq!(report.parse_errors, 2);
        // Sorted by purchase timestamp, not file order.
        assert_eq!(records[0].order_id, "A");
        assert_eq!(records[1].order_id, "B");
        assert!(records[0].delivered_at.is_none());
        assert!(records[1].delivered_at.is_some());
    }

    #[test]
    fn loads_geolocation_points_verbatim() {
        let csv = "\
customer_unique_id,geolocation_lat,geolocation_lng
u1,-23.55,-46.63
u1,-22.90,-43.20
u2,99.99,200.00
bad,,
";
        let path = write_temp("geo.csv", csv);
        let (points, report) = load_geolocation(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.loaded_rows, 3);
        assert_eq!(report.parse_errors, 1);
        // Duplicates and out-of-range coordinates pass through untouched.
        assert_eq!(points[0].customer_unique_id, "u1");
        assert_eq!(points[2].geolocation_lat, 99.99);
    }
}
