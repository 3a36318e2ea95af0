//! Value Objects for storefront analytics

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seller email used to attribute line items to a reseller.
///
/// Stored trimmed and ASCII-lowercased; comparisons against raw emails
/// apply the same normalization to the other side.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SellerEmail(String);

impl SellerEmail {
    pub fn new(value: impl AsRef<str>) -> Result<Self, EmailError> {
        let value = value.as_ref().trim().to_ascii_lowercase();
        if value.is_empty() { return Err(EmailError::Empty); }
        match value.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(Self(value)),
            _ => Err(EmailError::Malformed(value)),
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Whether a raw email taken from order data belongs to this seller.
    pub fn matches(&self, raw: &str) -> bool { raw.trim().eq_ignore_ascii_case(&self.0) }
}

impl fmt::Display for SellerEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl TryFrom<String> for SellerEmail {
    type Error = EmailError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<SellerEmail> for String {
    fn from(email: SellerEmail) -> Self { email.0 }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum EmailError { Empty, Malformed(String) }
impl std::error::Error for EmailError {}
impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Email empty"),
            Self::Malformed(v) => write!(f, "Malformed email: {}", v),
        }
    }
}

/// Parses an order creation timestamp as the order backend emits it.
///
/// Accepts RFC 3339 (`2024-01-01T10:00:00.000Z`), a naive date-time which is
/// read in `zone`, or a bare date which is taken as UTC midnight. Anything
/// else yields `None`.
pub fn parse_timestamp(raw: &str, zone: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(zone));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return zone.from_local_datetime(&naive).single();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return zone.from_local_datetime(&naive).single();
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?).with_timezone(zone))
}

/// Calendar day of a raw timestamp in `zone`.
pub fn local_date(raw: &str, zone: &FixedOffset) -> Option<NaiveDate> {
    parse_timestamp(raw, zone).map(|dt| dt.date_naive())
}
