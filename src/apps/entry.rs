//! App entry model and the user-qualified key format

use std::cmp::Ordering;
use std::fmt;

use crate::error::KeyParseError;
use crate::platform::IconHandle;

/// User-qualified activity key
///
/// Structured form of the wire format `"{serial}-{component}"`. The serial
/// identifies the user profile that owns the install, the component the
/// `package/class` activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserKey {
    /// Serial of the owning user profile
    pub serial: u64,
    /// Component identifier, `package/class`
    pub component: String,
}

impl UserKey {
    /// Create a key from its parts
    pub fn new(serial: u64, component: impl Into<String>) -> Self {
        Self {
            serial,
            component: component.into(),
        }
    }

    /// Parse the wire format, splitting on the first `-`
    ///
    /// A key with no `-` at all has a missing serial prefix; a prefix that is
    /// not a `u64` is invalid. Both are reported as errors so the caller can
    /// choose the fallback serial.
    pub fn parse(raw: &str) -> Result<Self, KeyParseError> {
        match raw.split_once('-') {
            Some((prefix, component)) => prefix.parse::<u64>().map_or_else(
                |_| Err(KeyParseError::InvalidSerial(raw.to_string())),
                |serial| Ok(Self::new(serial, component)),
            ),
            None => Err(KeyParseError::MissingSerial(raw.to_string())),
        }
    }

    /// Parse the wire format, falling back to `default_serial` on bad input
    ///
    /// When the prefix is missing or non-numeric the whole string is kept as
    /// the component identifier, on the reasoning that a prefix which does
    /// not parse was never a serial to begin with. Listing never aborts on a
    /// malformed key.
    pub fn parse_or_default(raw: &str, default_serial: u64) -> Self {
        use tracing::{debug, warn};

        match Self::parse(raw) {
            Ok(key) => key,
            Err(KeyParseError::MissingSerial(_)) => {
                debug!("key without serial prefix, assuming serial {default_serial}: {raw}");
                Self::new(default_serial, raw)
            }
            Err(KeyParseError::InvalidSerial(_)) => {
                warn!("non-numeric serial prefix, assuming serial {default_serial}: {raw}");
                Self::new(default_serial, raw)
            }
        }
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.serial, self.component)
    }
}

/// One visible app list entry
///
/// Identity is the user-qualified key alone; labels and icons are display
/// data and do not participate in equality.
#[derive(Debug, Clone)]
pub struct AppEntry {
    /// User-qualified activity key
    pub key: UserKey,
    /// Resolved human-readable label
    pub display_name: String,
    /// User-chosen shorthand shown instead of the label when set
    pub display_override: Option<String>,
    /// Opaque icon handle, `None` when unresolved or suppressed
    pub icon: Option<IconHandle>,
}

impl AppEntry {
    /// New entry with no shorthand and no icon
    pub fn new(key: UserKey, display_name: impl Into<String>) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            display_override: None,
            icon: None,
        }
    }

    /// Label used for display and ordering, preferring the user's shorthand
    pub fn sort_label(&self) -> &str {
        self.display_override
            .as_deref()
            .unwrap_or(&self.display_name)
    }
}

impl PartialEq for AppEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for AppEntry {}

/// Sort entries case-insensitively by display label
///
/// Stable, so entries with equal labels keep their relative order. The
/// inverted flag reverses the whole ordering, not just tie-breaks.
pub fn sort_entries(entries: &mut [AppEntry], inverted: bool) {
    entries.sort_by(|a, b| {
        let ord = compare_labels(a.sort_label(), b.sort_label());
        if inverted { ord.reverse() } else { ord }
    });
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(serial: u64, component: &str, label: &str) -> AppEntry {
        AppEntry::new(UserKey::new(serial, component), label)
    }

    fn labels(entries: &[AppEntry]) -> Vec<&str> {
        entries.iter().map(AppEntry::sort_label).collect()
    }

    #[test]
    fn test_parse_well_formed_key() {
        let key = UserKey::parse("10-com.example.mail/.Inbox").unwrap();
        assert_eq!(key.serial, 10);
        assert_eq!(key.component, "com.example.mail/.Inbox");
    }

    #[test]
    fn test_parse_missing_serial() {
        let err = UserKey::parse("com.example.mail/.Inbox").unwrap_err();
        assert!(matches!(err, KeyParseError::MissingSerial(_)));
    }

    #[test]
    fn test_parse_invalid_serial() {
        let err = UserKey::parse("abc-com.example.mail/.Inbox").unwrap_err();
        assert!(matches!(err, KeyParseError::InvalidSerial(_)));
    }

    #[test]
    fn test_parse_splits_on_first_dash_only() {
        let key = UserKey::parse("0-com.foo-bar/.Main").unwrap();
        assert_eq!(key.serial, 0);
        assert_eq!(key.component, "com.foo-bar/.Main");
    }

    #[test]
    fn test_parse_or_default_keeps_whole_string_as_component() {
        let key = UserKey::parse_or_default("com.example.mail/.Inbox", 7);
        assert_eq!(key.serial, 7);
        assert_eq!(key.component, "com.example.mail/.Inbox");

        // A dash inside the package name is not a serial separator
        let key = UserKey::parse_or_default("com.foo-bar/.Main", 7);
        assert_eq!(key.serial, 7);
        assert_eq!(key.component, "com.foo-bar/.Main");
    }

    #[test]
    fn test_display_renders_wire_format() {
        let key = UserKey::new(10, "com.example.mail/.Inbox");
        assert_eq!(key.to_string(), "10-com.example.mail/.Inbox");
    }

    #[test]
    fn test_entry_equality_ignores_display_data() {
        let mut a = entry(0, "com.example.mail/.Inbox", "Mail");
        let b = entry(0, "com.example.mail/.Inbox", "Post");
        a.display_override = Some("M".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn test_sort_label_prefers_override() {
        let mut e = entry(0, "com.example.mail/.Inbox", "Mail");
        assert_eq!(e.sort_label(), "Mail");
        e.display_override = Some("Post".to_string());
        assert_eq!(e.sort_label(), "Post");
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let mut entries = vec![
            entry(0, "a/1", "zulu"),
            entry(0, "b/1", "Alpha"),
            entry(0, "c/1", "mike"),
        ];
        sort_entries(&mut entries, false);
        assert_eq!(labels(&entries), vec!["Alpha", "mike", "zulu"]);
    }

    #[test]
    fn test_inverted_sort_reverses_exactly() {
        let mut forward = vec![
            entry(0, "a/1", "Alpha"),
            entry(0, "b/1", "Bravo"),
            entry(0, "c/1", "Charlie"),
        ];
        let mut inverted = forward.clone();

        sort_entries(&mut forward, false);
        sort_entries(&mut inverted, true);

        forward.reverse();
        assert_eq!(labels(&forward), labels(&inverted));
    }

    #[test]
    fn test_sort_ties_keep_relative_order() {
        let mut entries = vec![
            entry(0, "first/1", "Same"),
            entry(0, "second/1", "same"),
            entry(0, "third/1", "SAME"),
        ];
        sort_entries(&mut entries, false);
        let components: Vec<&str> = entries.iter().map(|e| e.key.component.as_str()).collect();
        assert_eq!(components, vec!["first/1", "second/1", "third/1"]);
    }

    #[test]
    fn test_sort_uses_override_labels() {
        let mut renamed = entry(0, "a/1", "Zulu");
        renamed.display_override = Some("Aardvark".to_string());
        let mut entries = vec![entry(0, "b/1", "Mike"), renamed];

        sort_entries(&mut entries, false);
        assert_eq!(labels(&entries), vec!["Aardvark", "Mike"]);
    }

    // Property-based tests using proptest
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: parsing never panics, whatever the input
            #[test]
            fn parse_never_panics(raw in ".*") {
                let _ = UserKey::parse(&raw);
                let _ = UserKey::parse_or_default(&raw, 0);
            }

            /// Property: well-formed keys round-trip through parse and display
            #[test]
            fn well_formed_keys_round_trip(serial in 0u64..1_000_000, component in "[a-z.]{1,20}/[A-Za-z.]{1,20}") {
                let wire = format!("{serial}-{component}");
                let key = UserKey::parse(&wire).unwrap();
                prop_assert_eq!(key.serial, serial);
                prop_assert_eq!(key.to_string(), wire);
            }

            /// Property: the fallback parse always produces a usable component
            #[test]
            fn fallback_parse_keeps_input_reachable(raw in "[a-z][a-z.-]{0,30}", default_serial in 0u64..100) {
                let key = UserKey::parse_or_default(&raw, default_serial);
                prop_assert!(raw.ends_with(&key.component) || key.component == raw);
            }

            /// Property: sorting is a permutation and inversion reverses it for distinct labels
            #[test]
            fn sort_permutes_and_inverts(raw_labels in prop::collection::btree_set("[A-Za-z]{1,8}", 1..20)) {
                let distinct: Vec<String> = raw_labels.into_iter().collect();
                // Distinct case-insensitively, else inversion may differ on ties
                let mut lowered: Vec<String> = distinct.iter().map(|l| l.to_lowercase()).collect();
                lowered.sort();
                lowered.dedup();
                prop_assume!(lowered.len() == distinct.len());

                let mut forward: Vec<AppEntry> = distinct
                    .iter()
                    .enumerate()
                    .map(|(i, label)| AppEntry::new(UserKey::new(0, format!("pkg{i}/.Main")), label.clone()))
                    .collect();
                let mut inverted = forward.clone();

                sort_entries(&mut forward, false);
                sort_entries(&mut inverted, true);

                // Same multiset of labels survives the sort
                let mut sorted_input = distinct.clone();
                sorted_input.sort();
                let mut sorted_output: Vec<String> =
                    forward.iter().map(|e| e.display_name.clone()).collect();
                sorted_output.sort();
                prop_assert_eq!(sorted_input, sorted_output);

                forward.reverse();
                let fwd: Vec<&str> = forward.iter().map(AppEntry::sort_label).collect();
                let inv: Vec<&str> = inverted.iter().map(AppEntry::sort_label).collect();
                prop_assert_eq!(fwd, inv);
            }
        }
    }
}
