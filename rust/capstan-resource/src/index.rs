//! An attribute-indexed set of capabilities.
//!
//! [`CapabilityIndex`] keeps every capability it is given plus, for a fixed
//! set of attribute names, a map from each scalar attribute value to the
//! capabilities carrying it. Equality leaves on an indexed attribute are
//! answered from those buckets; everything else falls back to scanning the
//! current candidates.

use std::collections::{BTreeMap, HashMap, HashSet};

use capstan_filter::{AttrValue, Filter, coercions};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::{CapabilityRef, matching::mandatory_satisfied};

type Buckets = HashMap<AttrValue, IndexSet<CapabilityRef>>;

/// Construction options for a [`CapabilityIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct IndexOptions {
    /// Attribute names to keep per-value buckets for.
    pub indexed_attributes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CapabilityIndex {
    capabilities: IndexSet<CapabilityRef>,
    indices: BTreeMap<String, Buckets>,
}

impl CapabilityIndex {
    /// An index with buckets for each of `indexed_attributes`.
    pub fn new<I, S>(indexed_attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            capabilities: IndexSet::new(),
            indices: indexed_attributes
                .into_iter()
                .map(|name| (name.into(), Buckets::new()))
                .collect(),
        }
    }

    pub fn with_options(options: &IndexOptions) -> Self {
        Self::new(options.indexed_attributes.iter().cloned())
    }

    /// Add a capability. Adding the same handle again has no effect.
    pub fn add(&mut self, capability: CapabilityRef) {
        if !self.capabilities.insert(capability.clone()) {
            return;
        }

        for (name, buckets) in &mut self.indices {
            let Some(value) = capability.attribute(name) else {
                continue;
            };
            for scalar in value.scalars() {
                buckets
                    .entry(scalar.clone())
                    .or_default()
                    .insert(capability.clone());
            }
        }

        tracing::debug!(
            capability = %capability,
            total = self.capabilities.len(),
            "Indexed capability"
        );
    }

    /// Remove a capability by identity. Unknown capabilities are ignored.
    pub fn remove(&mut self, capability: &CapabilityRef) {
        if !self.capabilities.shift_remove(capability) {
            return;
        }

        for (name, buckets) in &mut self.indices {
            let Some(value) = capability.attribute(name) else {
                continue;
            };
            for scalar in value.scalars() {
                if let Some(bucket) = buckets.get_mut(scalar) {
                    bucket.shift_remove(capability);
                    if bucket.is_empty() {
                        buckets.remove(scalar);
                    }
                }
            }
        }

        tracing::debug!(
            capability = %capability,
            total = self.capabilities.len(),
            "Removed capability"
        );
    }

    /// The capabilities selected by `filter`.
    ///
    /// With `obey_mandatory`, capabilities whose mandatory attributes the
    /// filter does not name are dropped (see
    /// [`mandatory_satisfied`](crate::mandatory_satisfied)).
    pub fn matches(&self, filter: &Filter, obey_mandatory: bool) -> IndexSet<CapabilityRef> {
        let candidates = self.capabilities.iter().collect();
        let mut selected = self.select(candidates, filter);

        if obey_mandatory {
            selected.retain(|capability| mandatory_satisfied(capability, filter));
        }

        tracing::debug!(
            filter = %filter,
            candidates = self.capabilities.len(),
            matched = selected.len(),
            "Matched capabilities"
        );

        selected.into_iter().cloned().collect()
    }

    fn select<'a>(
        &'a self,
        candidates: IndexSet<&'a CapabilityRef>,
        filter: &Filter,
    ) -> IndexSet<&'a CapabilityRef> {
        match filter {
            Filter::MatchAll => candidates,
            Filter::And(children) => {
                let mut remaining = candidates;
                for child in children {
                    if remaining.is_empty() {
                        break;
                    }
                    remaining = self.select(remaining, child);
                }
                remaining
            }
            Filter::Or(children) => self.select_any(&candidates, children),
            Filter::Not(children) => {
                let excluded = self.select_any(&candidates, children);
                candidates
                    .into_iter()
                    .filter(|capability| !excluded.contains(capability))
                    .collect()
            }
            Filter::Equal { name, value } => match self.indices.get(name) {
                Some(buckets) => Self::lookup(buckets, &candidates, value),
                None => Self::scan(candidates, filter),
            },
            leaf => Self::scan(candidates, leaf),
        }
    }

    /// Union of each child evaluated against the same candidates.
    fn select_any<'a>(
        &'a self,
        candidates: &IndexSet<&'a CapabilityRef>,
        children: &[Filter],
    ) -> IndexSet<&'a CapabilityRef> {
        let mut selected = IndexSet::new();
        for child in children {
            selected.extend(self.select(candidates.clone(), child));
        }
        selected
    }

    /// Answer an equality from the buckets, trying every typed reading of the
    /// operand so the result agrees with a scan.
    fn lookup<'a>(
        buckets: &'a Buckets,
        candidates: &IndexSet<&'a CapabilityRef>,
        operand: &str,
    ) -> IndexSet<&'a CapabilityRef> {
        coercions(operand)
            .iter()
            .filter_map(|key| buckets.get(key))
            .flatten()
            .filter(|capability| candidates.contains(capability))
            .collect()
    }

    fn scan<'a>(
        candidates: IndexSet<&'a CapabilityRef>,
        leaf: &Filter,
    ) -> IndexSet<&'a CapabilityRef> {
        candidates
            .into_iter()
            .filter(|capability| leaf.matches(capability.attributes()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    pub fn contains(&self, capability: &CapabilityRef) -> bool {
        self.capabilities.contains(capability)
    }

    /// Every capability, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CapabilityRef> {
        self.capabilities.iter()
    }

    /// The attribute names this index keeps buckets for, sorted.
    pub fn indexed_attributes(&self) -> impl Iterator<Item = &str> {
        self.indices.keys().map(String::as_str)
    }

    /// The buckets kept for `attribute`; empty when it is not indexed.
    pub fn buckets(
        &self,
        attribute: &str,
    ) -> impl Iterator<Item = (&AttrValue, &IndexSet<CapabilityRef>)> {
        self.indices.get(attribute).into_iter().flatten()
    }

    /// Snapshot of the buckets for `attribute` as plain sets.
    pub fn bucket_sets(&self, attribute: &str) -> HashMap<AttrValue, HashSet<CapabilityRef>> {
        self.buckets(attribute)
            .map(|(value, bucket)| (value.clone(), bucket.iter().cloned().collect()))
            .collect()
    }
}

impl Extend<CapabilityRef> for CapabilityIndex {
    fn extend<T: IntoIterator<Item = CapabilityRef>>(&mut self, capabilities: T) {
        for capability in capabilities {
            self.add(capability);
        }
    }
}
