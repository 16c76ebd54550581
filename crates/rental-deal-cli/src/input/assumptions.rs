use std::path::Path;

use rental_deal_core::deal_analysis::Assumptions;

use super::file;

/// Load an assumptions override file. `.yaml`/`.yml` files are parsed as
/// YAML, anything else as JSON. Sections left out keep their defaults.
pub fn load_assumptions(path: &str) -> Result<Assumptions, Box<dyn std::error::Error>> {
    let (canonical, contents) = file::read_to_string(path)?;
    parse_assumptions(&canonical, &contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
}

pub fn load_or_default(path: Option<&str>) -> Result<Assumptions, Box<dyn std::error::Error>> {
    match path {
        Some(path) => load_assumptions(path),
        None => Ok(Assumptions::default()),
    }
}

fn parse_assumptions(path: &Path, contents: &str) -> Result<Assumptions, Box<dyn std::error::Error>> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        Ok(serde_yaml::from_str(contents)?)
    } else {
        Ok(serde_json::from_str(contents)?)
    }
}
