use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, result_of};

/// Annual columns shown in table output; monthly rows go to CSV.
const ANNUAL_COLUMNS: [&str; 8] = [
    "label",
    "months",
    "base_rent",
    "opex",
    "parking",
    "upfront_costs",
    "total_cost",
    "discounted_cost",
];

const EQUALIZED_COLUMNS: [&str; 7] = [
    "months_in_window",
    "avg_gross_rent_psf_year",
    "avg_cost_psf_year",
    "avg_cost_month",
    "total_cost",
    "npv",
    "discount_rate_annual",
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let result = result_of(value);
    match result {
        Value::Object(res) if res.contains_key("metrics") => print_engine_result(res),
        Value::Object(res) if res.contains_key("metrics_by_scenario") => print_comparison(res),
        Value::Object(res) => print_fields(res),
        other => println!("{}", cell(other)),
    }
    if let Value::Object(envelope) = value {
        print_warnings(envelope);
    }
}

fn print_engine_result(res: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for key in ["scenario_name", "commencement", "expiration", "term_months", "rsf", "discount_rate_annual"] {
        if let Some(v) = res.get(key) {
            builder.push_record([key, &cell(v)]);
        }
    }
    if let Some(Value::Object(metrics)) = res.get("metrics") {
        for (key, v) in metrics {
            builder.push_record([key.as_str(), &cell(v)]);
        }
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(annual)) = res.get("annual") {
        println!("\nAnnual:");
        print_rows(annual, &ANNUAL_COLUMNS);
    }
    if let Some(Value::Object(holdover)) = res.get("holdover") {
        println!(
            "\nHoldover: {} months at {}x, total {}, NPV {}",
            holdover.get("months").map(cell).unwrap_or_default(),
            holdover.get("rent_multiplier").map(cell).unwrap_or_default(),
            holdover.get("total_cost_nominal").map(cell).unwrap_or_default(),
            holdover.get("npv_cost").map(cell).unwrap_or_default(),
        );
    }
}

fn print_comparison(res: &Map<String, Value>) {
    if res.get("needs_custom_window") == Some(&Value::Bool(true)) {
        let message = res.get("message").map(cell).unwrap_or_default();
        println!("Custom window required: {}", message);
        return;
    }
    println!(
        "Window: {} to {} ({}, {} months)",
        res.get("window_start").map(cell).unwrap_or_default(),
        res.get("window_end").map(cell).unwrap_or_default(),
        res.get("window_source").map(cell).unwrap_or_default(),
        res.get("window_months").map(cell).unwrap_or_default(),
    );

    let mut builder = Builder::default();
    let mut header = vec!["scenario".to_string()];
    header.extend(EQUALIZED_COLUMNS.iter().map(|c| c.to_string()));
    builder.push_record(header);
    if let Some(Value::Object(by_scenario)) = res.get("metrics_by_scenario") {
        for (key, metrics) in by_scenario {
            let mut row = vec![key.clone()];
            row.extend(
                EQUALIZED_COLUMNS
                    .iter()
                    .map(|c| metrics.get(*c).map(cell).unwrap_or_default()),
            );
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value], columns: &[&str]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for row in rows {
        builder.push_record(
            columns
                .iter()
                .map(|c| row.get(*c).map(cell).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_warnings(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
