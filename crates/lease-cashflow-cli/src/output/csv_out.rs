use serde_json::Value;
use std::io;

use super::{cell, result_of};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout: monthly rows for an engine run, one row
/// per scenario for a comparison, field/value pairs otherwise.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(res) => {
            if let Some(Value::Array(monthly)) = res.get("monthly") {
                write_array_csv(&mut wtr, monthly);
            } else if let Some(Value::Object(by_scenario)) = res.get("metrics_by_scenario") {
                write_keyed_csv(&mut wtr, by_scenario);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in res {
                    let _ = wtr.write_record([key.as_str(), &cell(val)]);
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([&cell(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn write_keyed_csv(wtr: &mut StdoutWriter<'_>, by_key: &serde_json::Map<String, Value>) {
    let Some(Value::Object(first)) = by_key.values().next() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let mut header_row = vec!["scenario"];
    header_row.extend(headers.iter().copied());
    let _ = wtr.write_record(&header_row);

    for (key, item) in by_key {
        let mut row = vec![key.clone()];
        row.extend(headers.iter().map(|h| item.get(*h).map(cell).unwrap_or_default()));
        let _ = wtr.write_record(&row);
    }
}
