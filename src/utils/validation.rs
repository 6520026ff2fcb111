use crate::utils::error::{EtlError, Result};
use url::Url;

/// Checked once after the CLI, TOML file and defaults have been merged, before
/// any request is sent or any file is touched.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// An explorer base URL: absolute, `http` or `https`.
pub fn http_url(field: &str, value: &str) -> Result<Url> {
    if value.is_empty() {
        return Err(invalid(field, value, "URL cannot be empty"));
    }

    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(field, value, format!("Unsupported URL scheme: {}", scheme))),
    }
}

/// A resume point copied from a `Restart with ...` log line. It has to be a
/// transaction listing, otherwise the export would page through something else.
pub fn listing_url(field: &str, value: &str) -> Result<()> {
    let url = http_url(field, value)?;
    if url.path().trim_end_matches('/').ends_with("/transactions") {
        Ok(())
    } else {
        Err(invalid(field, value, "Expected a /transactions listing URL"))
    }
}

/// Output and log paths are opened lazily in append mode, so only obviously
/// unusable names are rejected here.
pub fn file_path(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(field, value, "Path cannot be empty"));
    }
    if value.contains('\0') {
        return Err(invalid(field, value, "Path contains null bytes"));
    }
    Ok(())
}

pub fn at_least(field: &str, value: u64, min: u64) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

/// The token column would be blank on every row.
pub fn non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}
