// Entry point and high-level CLI flow.
//
// - Option [1] loads the two CSV datasets (orders, geolocation), printing
//   load diagnostics.
// - Option [2] asks for an inclusive date range, recomputes every summary
//   table over the filtered snapshot, prints Markdown previews, and exports
//   one CSV per table plus a JSON summary.
// - After generating reports, the user can choose to go back to the
//   selection menu or exit.
mod analytics;
mod filter;
mod geo;
mod loader;
mod output;
mod types;
mod util;

use analytics::{Analytics, RECENT_MONTHS_WINDOW};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;
use types::{
    CustomerLocation, DailyPerformanceRow, DailySpendRow, MonthlyPerformanceRow, OrderRecord,
    RfmTableRow,
};
use util::{average, format_int, format_number};

// Simple in-memory app state so we only load the CSVs once but can generate
// reports for several date ranges in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        orders: None,
        locations: None,
    })
});

struct AppState {
    orders: Option<Vec<OrderRecord>>,
    locations: Option<Vec<CustomerLocation>>,
}

const ORDERS_PATH: &str = "all_df.csv";
const GEOLOCATION_PATH: &str = "geolocation.csv";

/// Print a prompt and read a single trimmed line from stdin.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    read_line("Enter choice: ")
}

/// Ask the user whether to go back to the report selection menu after
/// generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let resp = read_line("Back to Report Selection (Y/N): ").to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Read one end of the date range. A blank line accepts the dataset bound.
fn prompt_date(label: &str, default: NaiveDate) -> NaiveDate {
    loop {
        let input = read_line(&format!("{} (YYYY-MM-DD, blank = {}): ", label, default));
        if input.is_empty() {
            return default;
        }
        match NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
            Ok(d) => return d,
            Err(_) => println!("Invalid date. Please use YYYY-MM-DD."),
        }
    }
}

/// Handle option [1]: load and type both CSV files.
///
/// On success the tables are stored in `APP_STATE` along with a short
/// textual summary of what happened.
fn handle_load() {
    match loader::load_orders(ORDERS_PATH) {
        Ok((data, report)) => {
            println!(
                "Processing orders dataset... ({} rows read, {} loaded)",
                format_int(report.total_rows as i64),
                format_int(report.loaded_rows as i64)
            );
            println!(
                "Note: {} rows skipped due to parse/validation errors.",
                format_int(report.parse_errors as i64)
            );
            if let Some((min_date, max_date)) = filter::date_bounds(&data) {
                println!("Purchase dates span {} to {}.", min_date, max_date);
            }
            let mut state = APP_STATE.lock().unwrap();
            state.orders = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load {}: {}", ORDERS_PATH, e);
        }
    }
    match loader::load_geolocation(GEOLOCATION_PATH) {
        Ok((points, report)) => {
            println!(
                "Processing geolocation dataset... ({} rows read, {} loaded, {} skipped)",
                format_int(report.total_rows as i64),
                format_int(report.loaded_rows as i64),
                format_int(report.parse_errors as i64)
            );
            let mut state = APP_STATE.lock().unwrap();
            state.locations = Some(points);
        }
        Err(e) => {
            eprintln!("Failed to load {}: {}", GEOLOCATION_PATH, e);
        }
    }
    println!("");
}

/// Handle option [2]: filter to a date range, then generate every report
/// and the JSON summary.
///
/// This function is intentionally side-effectful: it writes one CSV per
/// summary table, a JSON summary, and prints Markdown previews of each
/// report to the console.
fn handle_generate_reports() {
    let (orders, locations) = {
        let state = APP_STATE.lock().unwrap();
        (state.orders.clone(), state.locations.clone())
    };
    let Some(orders) = orders else {
        println!("Error: No data loaded. Please load the datasets first (option 1).\n");
        return;
    };
    let Some((min_date, max_date)) = filter::date_bounds(&orders) else {
        println!("Error: The orders dataset has no rows.\n");
        return;
    };

    let start = prompt_date("Start date", min_date);
    let end = prompt_date("End date", max_date);
    if end < start {
        println!("Error: End date is before start date.\n");
        return;
    }
    let filtered = filter::filter_by_date(&orders, start, end);
    println!(
        "\n{} of {} item rows fall between {} and {}.\n",
        format_int(filtered.len() as i64),
        format_int(orders.len() as i64),
        start,
        end
    );

    println!("Generating reports...");
    println!("Outputs saved to individual files...\n");

    let engine = Analytics::new(&filtered);

    let categories = engine.summarize_order_items();
    let file1 = "order_items_summary.csv";
    if let Err(e) = output::write_csv(file1, &categories) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 1: Order Items by Product Category\n");
    let per_category: Vec<f64> = categories.iter().map(|c| c.order_item_count as f64).collect();
    println!(
        "Total Items: {} | Average per Category: {}\n",
        format_int(filtered.len() as i64),
        format_number(average(&per_category), 2)
    );
    output::preview_table(&categories, 5);
    println!("(Full table exported to {})\n", file1);

    let monthly = engine.summarize_monthly(RECENT_MONTHS_WINDOW);
    let monthly_rows: Vec<MonthlyPerformanceRow> =
        monthly.iter().map(MonthlyPerformanceRow::from).collect();
    let file2 = "monthly_performance.csv";
    if let Err(e) = output::write_csv(file2, &monthly_rows) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 2: Orders and Revenue in Recent Months\n");
    output::preview_table(&monthly_rows, RECENT_MONTHS_WINDOW);
    println!("(Full table exported to {})\n", file2);

    let daily = engine.summarize_daily();
    let daily_rows: Vec<DailyPerformanceRow> =
        daily.iter().map(DailyPerformanceRow::from).collect();
    let file3 = "daily_orders.csv";
    if let Err(e) = output::write_csv(file3, &daily_rows) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 3: Daily Orders\n");
    let order_total: usize = daily.iter().map(|b| b.order_count).sum();
    let revenue_total: f64 = daily.iter().map(|b| b.total_revenue).sum();
    println!(
        "Total Orders: {} | Total Revenue: {}\n",
        format_int(order_total as i64),
        format_number(revenue_total, 2)
    );
    output::preview_table(&daily_rows, 5);
    println!("(Full table exported to {})\n", file3);

    let spend = engine.summarize_spend_daily();
    let spend_rows: Vec<DailySpendRow> = spend.iter().map(DailySpendRow::from).collect();
    let file4 = "customer_spend.csv";
    if let Err(e) = output::write_csv(file4, &spend_rows) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 4: Customer Spend per Day\n");
    let per_day: Vec<f64> = spend.iter().map(|s| s.total_spend).collect();
    let spend_total: f64 = per_day.iter().sum();
    println!(
        "Total Spend: {} | Average Daily Spend: {}\n",
        format_number(spend_total, 2),
        format_number(average(&per_day), 2)
    );
    output::preview_table(&spend_rows, 5);
    println!("(Full table exported to {})\n", file4);

    let (cities, top_city) = engine.summarize_by_city();
    let file5 = "city_distribution.csv";
    if let Err(e) = output::write_csv(file5, &cities) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 5: Customers by City\n");
    match top_city {
        Ok(city) => println!("Most Common City: {}\n", city),
        Err(e) => println!("Most Common City: ({})\n", e),
    }
    output::preview_table(&cities, 5);
    println!("(Full table exported to {})\n", file5);

    println!("Report 6: Customer RFM Segmentation\n");
    match engine.compute_rfm() {
        Ok(rfm) => {
            let rfm_rows: Vec<RfmTableRow> = rfm.iter().map(RfmTableRow::from).collect();
            let file6 = "rfm_table.csv";
            if let Err(e) = output::write_csv(file6, &rfm_rows) {
                eprintln!("Write error: {}", e);
            }
            // Preview the biggest spenders; the export keeps every customer.
            let mut by_monetary = rfm;
            by_monetary.sort_by(|a, b| {
                b.monetary
                    .partial_cmp(&a.monetary)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let preview: Vec<RfmTableRow> = by_monetary.iter().map(RfmTableRow::from).collect();
            output::preview_table(&preview, 5);
            println!("(Full table exported to {})\n", file6);
        }
        Err(e) => println!("Skipped: {}.\n", e),
    }

    let delivery = engine.summarize_delivery_status();
    let file7 = "delivery_status.csv";
    if let Err(e) = output::write_csv(file7, &delivery) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 7: Delivery Status Breakdown\n");
    output::preview_table(&delivery, 3);
    println!("(Full table exported to {})\n", file7);

    let location_rows = locations.unwrap_or_default();
    match geo::reduce(&location_rows) {
        Ok(unique) => {
            let file8 = "customer_locations.csv";
            if let Err(e) = output::write_csv(file8, &unique) {
                eprintln!("Write error: {}", e);
            }
            println!(
                "{} unique customer locations exported to {}.\n",
                format_int(unique.len() as i64),
                file8
            );
        }
        Err(_) => println!("No geospatial data available.\n"),
    }

    let summary = engine.summary();
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"total_orders\": {}, \"total_revenue\": {}}}\n",
        summary.total_orders,
        format_number(summary.total_revenue, 2)
    );
}

fn main() {
    loop {
        println!("E-Commerce Orders Report");
        println!("[1] Load the datasets");
        println!("[2] Generate reports\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
