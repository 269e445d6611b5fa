//! Shared domain types for the parcelmail scraper.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Sentinel the recorder portal renders for a missing parcel identifier.
pub const PARCEL_SENTINEL: &str = "N/A";

/// Newtype for a parcel identifier extracted from the results list.
///
/// A `ParcelId` is the unique-enough key used to deduplicate tokens and to
/// look up ownership detail on the auditor site. Empty and sentinel values
/// never become `ParcelId`s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParcelId(String);

impl ParcelId {
    /// Create a `ParcelId` from raw scraped text.
    ///
    /// Returns `None` for empty, whitespace-only, or `"N/A"` input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == PARCEL_SENTINEL {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deduplicate raw parcel tokens, preserving first-seen order.
///
/// Sentinel and empty tokens are dropped. Running the function over its own
/// output yields the same set.
pub fn dedup_tokens<I, S>(raw: I) -> Vec<ParcelId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for token in raw {
        if let Some(parcel) = ParcelId::new(token.as_ref()) {
            if seen.insert(parcel.clone()) {
                out.push(parcel);
            }
        }
    }
    out
}

/// The full set of fields scraped for one parcel from the auditor site.
///
/// The shape is fixed: a field whose source element was absent holds an
/// empty string (or empty list for owners), never a missing key. The
/// default value doubles as the empty placeholder record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Parcel identifier (caller token, or the on-page heading when present)
    pub parcel_id: String,
    /// Site (property) address
    pub property_address: String,
    /// Property city (fixed literal)
    pub property_city: String,
    /// Property state (fixed literal)
    pub property_state: String,
    /// Property zip code
    pub property_zip: String,
    /// Multi-line legal description
    pub legal_description: String,
    /// Owner names, possibly empty
    pub owner_names: Vec<String>,
    /// Comma-joined form of `owner_names`
    pub owner_names_joined: String,
    /// Owner mailing address
    pub mailing_address: String,
    /// Contact address ("City ST Zip")
    pub contact_address: String,
    /// Bedrooms (dwelling data)
    pub bedrooms: String,
    /// Bathrooms (dwelling data)
    pub bathrooms: String,
    /// Total finished area (dwelling data)
    pub finished_area: String,
    /// Year built (dwelling data)
    pub year_built: String,
    /// Most recent transfer date
    pub transfer_date: String,
    /// Most recent transfer price
    pub transfer_price: String,
    /// Property class
    pub property_class: String,
    /// Rental contact: owner name
    pub owner_name: String,
    /// Rental contact: owner business
    pub owner_business: String,
    /// Rental contact: title
    pub title: String,
    /// Rental contact: address line 1
    pub address1: String,
    /// Rental contact: address line 2
    pub address2: String,
    /// Rental contact: city (prefixed to avoid the property city)
    pub rental_city: String,
    /// Rental contact: state (prefixed to avoid the property state)
    pub rental_state: String,
    /// Rental contact: zip code
    pub zip_code: String,
    /// Rental contact: phone number
    pub phone_number: String,
    /// Rental contact: e-mail address
    pub email: String,
}

impl DetailRecord {
    /// Create a record carrying only the parcel token.
    #[must_use]
    pub fn for_token(token: &str) -> Self {
        Self {
            parcel_id: token.to_string(),
            ..Self::default()
        }
    }

    /// Whether this record is an empty placeholder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parcel_id_valid() {
        let id = ParcelId::new("010-054321-00").expect("valid parcel id");
        assert_eq!(id.as_str(), "010-054321-00");
        assert_eq!(id.to_string(), "010-054321-00");
    }

    #[test]
    fn test_parcel_id_trims() {
        let id = ParcelId::new("  010-054321-00 ").expect("valid parcel id");
        assert_eq!(id.as_str(), "010-054321-00");
    }

    #[test]
    fn test_parcel_id_rejects_sentinel() {
        assert!(ParcelId::new("N/A").is_none());
        assert!(ParcelId::new(" N/A ").is_none());
        assert!(ParcelId::new("").is_none());
        assert!(ParcelId::new("   ").is_none());
    }

    #[test]
    fn test_dedup_tokens_order_and_filtering() {
        let raw = vec!["123", "N/A", "456", "123", "", "456", "789"];
        let deduped = dedup_tokens(raw);
        let strs: Vec<&str> = deduped.iter().map(ParcelId::as_str).collect();
        assert_eq!(strs, vec!["123", "456", "789"]);
    }

    #[test]
    fn test_dedup_tokens_idempotent() {
        let raw = vec!["123", "N/A", "456", "123"];
        let once = dedup_tokens(raw);
        let twice = dedup_tokens(once.iter().map(ParcelId::as_str));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_detail_record_placeholder() {
        assert!(DetailRecord::default().is_empty());

        let record = DetailRecord::for_token("123");
        assert!(!record.is_empty());
        assert_eq!(record.parcel_id, "123");
        assert!(record.owner_names.is_empty());
        assert_eq!(record.property_address, "");
    }
}
