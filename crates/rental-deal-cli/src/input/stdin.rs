use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialize a piped request body. Interactive terminals and empty pipes
/// yield `None`, so flags take over.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut body = String::new();
    io::stdin().read_to_string(&mut body)?;
    if body.trim().is_empty() {
        return Ok(None);
    }

    let parsed = serde_json::from_str(body.trim())
        .map_err(|e| format!("piped input is not a valid request: {}", e))?;
    Ok(Some(parsed))
}
