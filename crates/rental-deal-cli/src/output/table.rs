use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) if res_map.contains_key("matrix") => print_grid(res_map),
        Value::Object(res_map) if res_map.contains_key("rows") => {
            print_summary(res_map, &["rows"]);
            if let Some(Value::Array(rows)) = res_map.get("rows") {
                println!();
                print_array_table(rows);
            }
        }
        Value::Object(res_map) => print_summary(res_map, &[]),
        _ => print_flat_object(&Value::Object(envelope.clone())),
    }

    // Print warnings if any
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

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Field/value table with nested objects flattened to dotted keys.
fn print_summary(map: &Map<String, Value>, skip: &[&str]) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if skip.contains(&key.as_str()) {
            continue;
        }
        push_flattened(&mut builder, key, val);
    }
    println!("{}", Table::from(builder));
}

fn push_flattened(builder: &mut Builder, prefix: &str, value: &Value) {
    match value {
        Value::Object(children) => {
            for (key, child) in children {
                push_flattened(builder, &format!("{}.{}", prefix, key), child);
            }
        }
        _ => builder.push_record([prefix.to_string(), format_value(value)]),
    }
}

/// Offer prices down the side, rates across the top.
fn print_grid(map: &Map<String, Value>) {
    let (Some(Value::Array(offers)), Some(Value::Array(rates)), Some(Value::Array(matrix))) =
        (map.get("offer_values"), map.get("rate_values"), map.get("matrix"))
    else {
        print_summary(map, &[]);
        return;
    };

    let mut builder = Builder::default();
    let mut header = vec!["offer \\ rate".to_string()];
    header.extend(rates.iter().map(format_value));
    builder.push_record(header);

    for (offer, row) in offers.iter().zip(matrix) {
        let mut record = vec![format_value(offer)];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_value));
        }
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));

    if let Some(metric) = map.get("metric") {
        println!("\nMetric: {}", format_value(metric));
    }
    if let Some(base) = map.get("base_case_value") {
        println!("Base case: {}", format_value(base));
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        print_summary(map, &[]);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        // Simple array of values
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
