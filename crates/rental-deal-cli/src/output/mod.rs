pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use colored::Colorize;
use serde_json::Value;

use crate::OutputFormat;

/// Render a command result. JSON keeps warnings in the envelope and the
/// table prints its own; csv and minimal send them to stderr so stdout
/// stays machine-readable.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => {
            report_warnings(value);
            csv_out::print_csv(value);
        }
        OutputFormat::Minimal => {
            report_warnings(value);
            minimal::print_minimal(value);
        }
    }
}

fn report_warnings(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings.iter().filter_map(Value::as_str) {
            eprintln!("{}: {}", "warning".yellow().bold(), w);
        }
    }
}
