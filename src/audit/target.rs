use url::{ParseError, Url};

use crate::error::AuditError;

/// Accept an absolute URL with both a scheme and an authority.
pub fn parse_target(raw: Option<&str>) -> Result<Url, AuditError> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err(AuditError::MissingUrl);
    }

    if !has_authority_marker(raw) {
        return Err(AuditError::InvalidUrlFormat);
    }

    let url = Url::parse(raw).map_err(|e| match e {
        ParseError::RelativeUrlWithoutBase | ParseError::EmptyHost => AuditError::InvalidUrlFormat,
        _ => AuditError::InvalidUrl,
    })?;

    if url.cannot_be_a_base() || !url.has_host() || url.host_str() == Some("") {
        return Err(AuditError::InvalidUrlFormat);
    }
    Ok(url)
}

/// `Url::parse` repairs `http:host` and `http:\\host` into `http://host`, so the
/// `//` that introduces the authority is checked on the raw text.
fn has_authority_marker(raw: &str) -> bool {
    let Some((scheme, rest)) = raw.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid_scheme && rest.starts_with("//")
}
