//! # Sample Selector
//!
//! Per-block selection state: which variant of a code sample is shown.
//! The active variant is stored as a position in the set, so it can never
//! point outside the set it was mounted with.

use crate::sample::{variant_label, CodeSampleSet, Variant};
use serde::Serialize;
use tracing::debug;

/// One tab of a block's variant switcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub key: String,
    pub label: String,
    pub active: bool,
}

/// Selection state for one mounted code block
#[derive(Debug, Clone)]
pub struct SampleSelector {
    samples: CodeSampleSet,
    active: usize,
}

impl SampleSelector {
    /// Mount a selector on a sample set, starting at its default key
    pub fn mount(samples: CodeSampleSet) -> Self {
        let active = samples.default_index();
        Self { samples, active }
    }

    /// Make `key` the active variant.
    ///
    /// Returns false and leaves the selection untouched when `key` is not
    /// part of the set.
    pub fn select_variant(&mut self, key: &str) -> bool {
        match self.samples.index_of(key) {
            Some(index) => {
                self.active = index;
                true
            }
            None => {
                debug!("Ignoring selection of unknown variant: {}", key);
                false
            }
        }
    }

    /// Currently active variant
    pub fn active(&self) -> &Variant {
        &self.samples.variants()[self.active]
    }

    /// Key of the active variant
    pub fn active_key(&self) -> &str {
        &self.active().key
    }

    /// Body of the active variant (what is displayed and copied)
    pub fn active_body(&self) -> &str {
        &self.active().body
    }

    /// The sample set this selector was mounted with
    pub fn samples(&self) -> &CodeSampleSet {
        &self.samples
    }

    /// Tabs in display order
    pub fn tabs(&self) -> Vec<Tab> {
        self.samples
            .variants()
            .iter()
            .enumerate()
            .map(|(i, v)| Tab {
                key: v.key.clone(),
                label: variant_label(&v.key).into_owned(),
                active: i == self.active,
            })
            .collect()
    }
}
