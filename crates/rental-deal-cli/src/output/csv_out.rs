use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                if let Some(Value::Array(matrix)) = result.get("matrix") {
                    write_grid_csv(&mut wtr, result, matrix);
                } else if let Some(Value::Array(rows)) = result.get("rows") {
                    // Scenario comparison: one row per scenario
                    write_array_csv(&mut wtr, rows);
                } else {
                    // Two-column CSV: field, value
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in result {
                        write_flattened(&mut wtr, key, val);
                    }
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(*h)
                            .map(format_csv_value)
                            .unwrap_or_default()
                    })
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn write_flattened(wtr: &mut csv::Writer<io::StdoutLock<'_>>, prefix: &str, value: &Value) {
    match value {
        Value::Object(children) => {
            for (key, child) in children {
                write_flattened(wtr, &format!("{}.{}", prefix, key), child);
            }
        }
        _ => {
            let _ = wtr.write_record([prefix, &format_csv_value(value)]);
        }
    }
}

/// Long format: one `offer_price,rate,value` row per grid cell.
fn write_grid_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    result: &serde_json::Map<String, Value>,
    matrix: &[Value],
) {
    let empty = Vec::new();
    let offers = result
        .get("offer_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let rates = result
        .get("rate_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let _ = wtr.write_record(["offer_price", "annual_interest_rate", "value"]);
    for (offer, row) in offers.iter().zip(matrix) {
        if let Value::Array(cells) = row {
            for (rate, cell) in rates.iter().zip(cells) {
                let _ = wtr.write_record([
                    format_csv_value(offer),
                    format_csv_value(rate),
                    format_csv_value(cell),
                ]);
            }
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
