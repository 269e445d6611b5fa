//! Name and address splitting rules for owner rows.

/// Names containing any of these are organizations, kept whole.
const ORG_KEYWORDS: [&str; 6] = ["LLC", "INC", "CORP", "COMPANY", "INVESTMENTS", "ENTERPRISES"];

/// Leading titles stripped before splitting.
const PREFIXES: [&str; 6] = ["Dr.", "Mr.", "Ms.", "Mrs.", "Miss", "Prof."];

/// Trailing suffixes stripped before splitting. Each entry is tried in
/// order against the current remainder, exact string match.
const SUFFIXES: [&str; 8] = ["Jr.", "Sr.", "II", "III", "IV", "Ph.D.", "M.D.", "Esq."];

/// A full name split into its output columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub first_name: String,
    pub last_name: String,
}

/// Split a full owner name into first and last.
///
/// Organization names go whole into `last_name`. Personal names lose any
/// leading title and trailing suffix, then the first whitespace token is
/// the first name and the rest join into the last name; a single token
/// is a first name with no last name.
pub fn split_full_name(full_name: &str) -> NameParts {
    // Keywords match whole words only, so "Prince" and "Vince" are not
    // dragged in by the "INC" entry
    let upper = full_name.to_uppercase();
    let is_org = upper
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .any(|w| ORG_KEYWORDS.contains(&w));
    if is_org {
        return NameParts {
            first_name: String::new(),
            last_name: full_name.trim().to_string(),
        };
    }

    let mut name = full_name.trim().to_string();
    for prefix in PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest.trim().to_string();
        }
    }
    for suffix in SUFFIXES {
        if let Some(rest) = name.strip_suffix(suffix) {
            name = rest.trim().to_string();
        }
    }

    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest: Vec<&str> = parts.collect();

    NameParts {
        first_name: first,
        last_name: rest.join(" "),
    }
}

/// Split a combined "City ST Zip" contact address by whitespace position.
///
/// Missing tokens become empty strings; tokens beyond the third are
/// dropped.
pub fn split_contact_address(contact: &str) -> (String, String, String) {
    let parts: Vec<&str> = contact.split(' ').collect();
    let get = |i: usize| parts.get(i).copied().unwrap_or_default().to_string();
    (get(0), get(1), get(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(first: &str, last: &str) -> NameParts {
        NameParts {
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[test]
    fn test_split_plain_name() {
        assert_eq!(split_full_name("John Smith"), parts("John", "Smith"));
    }

    #[test]
    fn test_split_multi_word_last_name() {
        assert_eq!(
            split_full_name("Maria Del Carmen Lopez"),
            parts("Maria", "Del Carmen Lopez")
        );
    }

    #[test]
    fn test_single_token_is_first_name() {
        assert_eq!(split_full_name("Prince"), parts("Prince", ""));
    }

    #[test]
    fn test_organization_goes_whole_into_last_name() {
        assert_eq!(split_full_name("Acme LLC"), parts("", "Acme LLC"));
        assert_eq!(split_full_name("ACME L.L.C. INC."), parts("", "ACME L.L.C. INC."));
        assert_eq!(
            split_full_name("Buckeye Investments Group"),
            parts("", "Buckeye Investments Group")
        );
    }

    #[test]
    fn test_keyword_substring_is_not_an_organization() {
        assert_eq!(split_full_name("Prince"), parts("Prince", ""));
        assert_eq!(split_full_name("Vince Carter"), parts("Vince", "Carter"));
        assert_eq!(
            split_full_name("Mercorp Smith"),
            parts("Mercorp", "Smith")
        );
    }

    #[test]
    fn test_prefix_and_suffix_stripped() {
        assert_eq!(split_full_name("Mr. John Smith"), parts("John", "Smith"));
        assert_eq!(split_full_name("John Smith Jr."), parts("John", "Smith"));
        assert_eq!(
            split_full_name("Dr. Jane Q Public Ph.D."),
            parts("Jane", "Q Public")
        );
    }

    #[test]
    fn test_split_contact_address() {
        assert_eq!(
            split_contact_address("Columbus OH 43085"),
            ("Columbus".to_string(), "OH".to_string(), "43085".to_string())
        );
        assert_eq!(
            split_contact_address(""),
            (String::new(), String::new(), String::new())
        );
        assert_eq!(
            split_contact_address("Columbus"),
            ("Columbus".to_string(), String::new(), String::new())
        );
        // Tokens past the third are dropped
        assert_eq!(
            split_contact_address("New Albany OH 43054"),
            ("New".to_string(), "Albany".to_string(), "OH".to_string())
        );
    }
}
