use serde_json::Value;

use super::{cell, result_of};

/// Priority list of headline figures, searched in the result and its
/// `metrics` member.
const PRIORITY_KEYS: [&str; 5] = [
    "npv_cost",
    "total_cost_nominal",
    "term_months",
    "premises_name",
    "name",
];

/// Print just the headline value from the output.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Some(Value::Object(by_scenario)) = result.get("metrics_by_scenario") {
        if result.get("needs_custom_window") == Some(&Value::Bool(true)) {
            println!("needs_custom_window");
            return;
        }
        for (key, metrics) in by_scenario {
            println!("{}: {}", key, metrics.get("npv").map(cell).unwrap_or_default());
        }
        return;
    }

    for scope in [result.get("metrics"), Some(result), Some(value)].into_iter().flatten() {
        for key in PRIORITY_KEYS {
            if let Some(val) = scope.get(key) {
                if !val.is_null() {
                    println!("{}", cell(val));
                    return;
                }
            }
        }
    }

    match result {
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, cell(val));
            }
        }
        other => println!("{}", cell(other)),
    }
}
