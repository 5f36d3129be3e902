//! # Code Sample Sets
//!
//! Ordered collections of named variants for a single code block
//! (e.g. the same "create payment" request in cURL, Node.js and Python).
//! Sets are immutable once built; insertion order is display order.

use crate::error::{WidgetError, WidgetResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One named variant of a code sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant key (e.g., "curl", "nodejs")
    pub key: String,

    /// Sample text shown and copied for this variant
    pub body: String,
}

impl Variant {
    pub fn new(key: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body: body.into(),
        }
    }

    /// Display label for this variant's tab
    pub fn label(&self) -> Cow<'static, str> {
        variant_label(&self.key)
    }
}

/// Ordered mapping from variant key to sample body.
///
/// Invariants: at least one variant, unique keys, and a default key that
/// is one of the keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSampleSet", into = "RawSampleSet")]
pub struct CodeSampleSet {
    variants: Vec<Variant>,
    default_index: usize,
}

/// Wire/config shape of a sample set before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSampleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<String>,
    variants: Vec<Variant>,
}

impl CodeSampleSet {
    /// Build a set from `(key, body)` pairs; the first key is the default
    pub fn new<K, B>(variants: impl IntoIterator<Item = (K, B)>) -> WidgetResult<Self>
    where
        K: Into<String>,
        B: Into<String>,
    {
        let variants: Vec<Variant> = variants
            .into_iter()
            .map(|(key, body)| Variant::new(key, body))
            .collect();
        Self::from_variants(variants)
    }

    /// Build a set from already-constructed variants
    pub fn from_variants(variants: Vec<Variant>) -> WidgetResult<Self> {
        if variants.is_empty() {
            return Err(WidgetError::InvalidSampleSet(
                "a sample set needs at least one variant".to_string(),
            ));
        }

        for (i, variant) in variants.iter().enumerate() {
            if variant.key.trim().is_empty() {
                return Err(WidgetError::InvalidSampleSet(format!(
                    "variant #{} has an empty key",
                    i
                )));
            }
            if variants[..i].iter().any(|v| v.key == variant.key) {
                return Err(WidgetError::InvalidSampleSet(format!(
                    "duplicate variant key: {}",
                    variant.key
                )));
            }
        }

        Ok(Self {
            variants,
            default_index: 0,
        })
    }

    /// Builder: use an explicit default key instead of the first one
    pub fn with_default(mut self, key: &str) -> WidgetResult<Self> {
        self.default_index = self.index_of(key).ok_or_else(|| {
            WidgetError::InvalidSampleSet(format!("default key is not a variant: {}", key))
        })?;
        Ok(self)
    }

    /// Body for a variant key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.body.as_str())
    }

    /// Check whether a key belongs to this set
    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Position of a key in display order
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.key == key)
    }

    /// Variant at a display position
    pub fn variant_at(&self, index: usize) -> Option<&Variant> {
        self.variants.get(index)
    }

    /// Keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.key.as_str())
    }

    /// All variants in display order
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// The designated default key
    pub fn default_key(&self) -> &str {
        &self.variants[self.default_index].key
    }

    pub(crate) fn default_index(&self) -> usize {
        self.default_index
    }

    /// Number of variants
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false for a validated set; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl TryFrom<RawSampleSet> for CodeSampleSet {
    type Error = WidgetError;

    fn try_from(raw: RawSampleSet) -> Result<Self, Self::Error> {
        let set = Self::from_variants(raw.variants)?;
        match raw.default {
            Some(key) => set.with_default(&key),
            None => Ok(set),
        }
    }
}

impl From<CodeSampleSet> for RawSampleSet {
    fn from(set: CodeSampleSet) -> Self {
        let default = (set.default_index != 0).then(|| set.default_key().to_string());
        Self {
            default,
            variants: set.variants,
        }
    }
}

/// Known variant keys and their tab labels
pub const VARIANT_LABELS: &[(&str, &str)] = &[
    ("curl", "cURL"),
    ("http", "HTTP"),
    ("nodejs", "Node.js"),
    ("node", "Node.js"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("python", "Python"),
    ("php", "PHP"),
    ("java", "Java"),
    ("kotlin", "Kotlin"),
    ("go", "Go"),
    ("ruby", "Ruby"),
    ("csharp", "C#"),
    ("dotnet", ".NET"),
    ("rust", "Rust"),
    ("swift", "Swift"),
    ("json", "JSON"),
    ("xml", "XML"),
    ("shell", "Shell"),
];

/// Tab label for a variant key; unknown keys fall back to upper case
pub fn variant_label(key: &str) -> Cow<'static, str> {
    VARIANT_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| Cow::Borrowed(*label))
        .unwrap_or_else(|| Cow::Owned(key.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment_samples() -> CodeSampleSet {
        CodeSampleSet::new([
            ("curl", "curl -X POST https://api.example.com/v1/payments"),
            ("nodejs", "await gateway.payments.create({ amount: 1000 })"),
            ("python", "gateway.Payment.create(amount=1000)"),
        ])
        .unwrap()
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let set = payment_samples();
        let keys: Vec<_> = set.keys().collect();
        assert_eq!(keys, vec!["curl", "nodejs", "python"]);
        assert_eq!(set.default_key(), "curl");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let set = payment_samples();
        assert_eq!(set.get("python"), Some("gateway.Payment.create(amount=1000)"));
        assert!(set.contains("nodejs"));
        assert!(!set.contains("ruby"));
        assert_eq!(set.get("ruby"), None);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        let empty: Vec<(&str, &str)> = Vec::new();
        assert!(matches!(
            CodeSampleSet::new(empty),
            Err(WidgetError::InvalidSampleSet(_))
        ));

        let dup = CodeSampleSet::new([("curl", "A"), ("curl", "B")]);
        assert!(matches!(dup, Err(WidgetError::InvalidSampleSet(_))));

        let blank = CodeSampleSet::new([(" ", "A")]);
        assert!(blank.is_err());
    }

    #[test]
    fn test_explicit_default() {
        let set = payment_samples().with_default("python").unwrap();
        assert_eq!(set.default_key(), "python");

        assert!(payment_samples().with_default("cobol").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let set: CodeSampleSet = serde_json::from_str(
            r#"{"default":"nodejs","variants":[{"key":"curl","body":"A"},{"key":"nodejs","body":"B"}]}"#,
        )
        .unwrap();
        assert_eq!(set.default_key(), "nodejs");

        let bad = serde_json::from_str::<CodeSampleSet>(
            r#"{"variants":[{"key":"curl","body":"A"},{"key":"curl","body":"B"}]}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_variant_labels() {
        assert_eq!(variant_label("curl"), "cURL");
        assert_eq!(variant_label("nodejs"), "Node.js");
        assert_eq!(variant_label("csharp"), "C#");
        assert_eq!(variant_label("elixir"), "ELIXIR");
        assert_eq!(Variant::new("php", "<?php").label(), "PHP");
    }
}
