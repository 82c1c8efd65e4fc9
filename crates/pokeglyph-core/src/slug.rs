//! Display name to slug normalization
//!
//! Slugs name both the remote sprite (`<slug>.png`) and the local icon file
//! (`<slug>.txt`), so they have to follow the sprite repository's naming.
//! Only the substitutions below are applied. Anything else passes through
//! untouched and is reported by [`Slug::unlisted_chars`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered substitutions applied after lowercasing
const SUBSTITUTIONS: &[(&str, &str)] = &[
    (" ", "-"),
    (".", ""),
    ("'", ""),
    (":", ""),
    ("♀", "-f"),
    ("♂", "-m"),
    ("é", "e"),
];

/// Filesystem and URL safe identifier derived from a display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Normalize a display name
    pub fn from_name(name: &str) -> Self {
        let mut slug = name.to_lowercase();
        for (from, to) in SUBSTITUTIONS {
            if slug.contains(from) {
                slug = slug.replace(from, to);
            }
        }
        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Characters outside `[a-z0-9-]` that survived normalization.
    ///
    /// A non-empty result means the slug probably does not match any remote
    /// file name.
    pub fn unlisted_chars(&self) -> Vec<char> {
        let mut chars = Vec::new();
        for c in self.0.chars() {
            let listed = c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';
            if !listed && !chars.contains(&c) {
                chars.push(c);
            }
        }
        chars
    }

    /// Whether the slug can be used as a single file name.
    ///
    /// Names that normalize to something containing a path separator, or to
    /// `.`/`..`, would otherwise land outside the variant folder.
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self.0 != "."
            && self.0 != ".."
            && !self.0.contains(['/', '\\', '\0'])
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a display name to its slug string
pub fn normalize(name: &str) -> String {
    Slug::from_name(name).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_names() {
        assert_eq!(normalize("Bulbasaur"), "bulbasaur");
        assert_eq!(normalize("Mr. Mime"), "mr-mime");
        assert_eq!(normalize("Farfetch'd"), "farfetchd");
        assert_eq!(normalize("Type: Null"), "type-null");
    }

    #[test]
    fn test_gender_and_accents() {
        assert_eq!(normalize("Nidoran♀"), "nidoran-f");
        assert_eq!(normalize("Nidoran♂"), "nidoran-m");
        assert_eq!(normalize("Flabébé"), "flabebe");
        assert_eq!(normalize("FLABÉBÉ"), "flabebe");
    }

    #[test]
    fn test_idempotent() {
        let names = [
            "Mr. Mime",
            "Nidoran♀",
            "Type: Null",
            "Flabébé",
            "Mime Jr.",
            "Farfetch’d",
            "Porygon-Z",
        ];
        for name in names {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {name}");
            assert_eq!(normalize(name), once, "not deterministic for {name}");
        }
    }

    #[test]
    fn test_unlisted_chars_are_flagged() {
        assert!(Slug::from_name("Porygon-Z").unlisted_chars().is_empty());
        assert!(Slug::from_name("Porygon2").unlisted_chars().is_empty());
        // Typographic apostrophe is not in the substitution list
        assert_eq!(Slug::from_name("Farfetch’d").unlisted_chars(), vec!['’']);
        assert_eq!(Slug::from_name("Farfetch’d").as_str(), "farfetch’d");
    }

    #[test]
    fn test_path_safety() {
        assert!(Slug::from_name("Mr. Mime").is_path_safe());
        assert!(Slug::from_name("Farfetch’d").is_path_safe());
        assert!(!Slug::from_name("Foo/Bar").is_path_safe());
        assert!(!Slug::from_name("..\\evil").is_path_safe());
        assert!(!Slug::from_name("").is_path_safe());
        // "." is stripped, so ".." becomes empty
        assert_eq!(Slug::from_name("..").as_str(), "");
        assert!(!Slug::from_name("..").is_path_safe());
    }
}
