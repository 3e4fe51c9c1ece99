//! Input validation for content and credentials
//! Bounds every user-supplied field before it reaches the store

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum lengths
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_TEXT_LENGTH: usize = 5_000;
pub const MAX_URL_LENGTH: usize = 2_048;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_USERNAME_LENGTH: usize = 64;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_EMAIL_LENGTH: usize = 254;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid");
}

/// Validate a document id (UUID format)
pub fn validate_id(id: &str) -> Result<uuid::Uuid> {
    uuid::Uuid::parse_str(id).map_err(|e| anyhow!("Invalid id format: {e}"))
}

/// Required, non-blank text bounded by `max`
pub fn validate_required(value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("is required"));
    }
    validate_text(value, max)
}

/// Optional text bounded by `max`
pub fn validate_text(value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(anyhow!("too long: {len} chars (max: {max})"));
    }
    Ok(())
}

/// Absolute http(s) URL
pub fn validate_url(url: &str) -> Result<()> {
    if url.len() > MAX_URL_LENGTH {
        return Err(anyhow!(
            "URL too long: {} chars (max: {MAX_URL_LENGTH})",
            url.len()
        ));
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| anyhow!("URL must start with http:// or https://"))?;

    if rest.is_empty() || rest.starts_with('/') || rest.chars().any(char::is_whitespace) {
        return Err(anyhow!("URL has no host or contains whitespace"));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(anyhow!("email too long (max: {MAX_EMAIL_LENGTH})"));
    }
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(anyhow!("not a valid email address"));
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(anyhow!("too many tags: {} (max: {MAX_TAGS})", tags.len()));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(anyhow!("tags cannot be blank"));
        }
        validate_text(tag, MAX_TAG_LENGTH)?;
    }
    Ok(())
}

/// Admin usernames: alphanumeric plus `-`, `_`, `.`
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(anyhow!("username cannot be empty"));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(anyhow!(
            "username too long: {} chars (max: {MAX_USERNAME_LENGTH})",
            username.len()
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(anyhow!(
            "username contains invalid characters (allowed: alphanumeric, -, _, .)"
        ));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(anyhow!(
            "password too short (min: {MIN_PASSWORD_LENGTH})"
        ));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(anyhow!("password too long (max: {MAX_PASSWORD_LENGTH})"));
    }
    Ok(())
}
