use std::collections::HashSet;

use capstan_filter::{AttrValue, Attributes, Filter, Version};
use capstan_resource::{Capability, CapabilityIndex, CapabilityRef, Directives, ResourceId};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["a", "b", "c", "version"];
const WORDS: [&str; 4] = ["x", "y", "1", "2"];
const OPERANDS: [&str; 8] = ["x", "y", "1", "2", "0", " 1 ", "1.0.0", "2.0"];

fn arb_scalar() -> impl Strategy<Value = AttrValue> {
    prop_oneof![
        prop::sample::select(WORDS.to_vec()).prop_map(AttrValue::from),
        (0i64..3).prop_map(AttrValue::Long),
        (0u32..3).prop_map(|major| AttrValue::Version(Version::new(major, 0, 0))),
        (0u32..3).prop_map(|whole| AttrValue::Double(f64::from(whole))),
    ]
}

fn arb_value() -> impl Strategy<Value = AttrValue> {
    prop_oneof![
        3 => arb_scalar(),
        1 => prop::collection::vec(arb_scalar(), 0..3).prop_map(AttrValue::List),
    ]
}

fn arb_capability() -> impl Strategy<Value = CapabilityRef> {
    prop::collection::vec((prop::sample::select(NAMES.to_vec()), arb_value()), 0..4).prop_map(
        |entries| {
            let attributes: Attributes = entries
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect();
            CapabilityRef::new(
                Capability::new(ResourceId::new(0), "test", Directives::new(), attributes)
                    .expect("no mandatory directive"),
            )
        },
    )
}

fn arb_leaf() -> impl Strategy<Value = Filter> {
    (
        prop::sample::select(NAMES.to_vec()),
        prop::sample::select(OPERANDS.to_vec()),
        0u8..4,
    )
        .prop_map(|(name, operand, operator)| {
            let (name, value) = (name.to_string(), operand.to_string());
            match operator {
                0 => Filter::Equal { name, value },
                1 => Filter::LessEqual { name, value },
                2 => Filter::GreaterEqual { name, value },
                _ => Filter::Present { name },
            }
        })
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Filter::And),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Filter::Or),
            prop::collection::vec(inner, 1..3).prop_map(Filter::Not),
        ]
    })
}

fn identities(capabilities: impl IntoIterator<Item = CapabilityRef>) -> HashSet<CapabilityRef> {
    capabilities.into_iter().collect()
}

proptest! {
    #[test]
    fn matches_do_not_depend_on_indexed_attributes(
        capabilities in prop::collection::vec(arb_capability(), 0..12),
        indexed in prop::collection::vec(any::<bool>(), NAMES.len()),
        filter in arb_filter(),
    ) {
        let chosen = NAMES
            .iter()
            .zip(&indexed)
            .filter(|(_, chosen)| **chosen)
            .map(|(name, _)| *name);

        let mut scanning = CapabilityIndex::new(Vec::<String>::new());
        let mut indexing = CapabilityIndex::new(chosen);
        scanning.extend(capabilities.iter().cloned());
        indexing.extend(capabilities.iter().cloned());

        let expected = identities(
            capabilities
                .iter()
                .filter(|capability| filter.matches(capability.attributes()))
                .cloned(),
        );

        prop_assert_eq!(&identities(scanning.matches(&filter, false)), &expected);
        prop_assert_eq!(&identities(indexing.matches(&filter, false)), &expected);
    }

    #[test]
    fn add_then_remove_restores_buckets(
        capabilities in prop::collection::vec(arb_capability(), 0..8),
        extra in arb_capability(),
    ) {
        let mut index = CapabilityIndex::new(NAMES);
        index.extend(capabilities.iter().cloned());

        let before: Vec<_> = NAMES.iter().map(|name| index.bucket_sets(name)).collect();
        let size = index.len();

        index.add(extra.clone());
        prop_assert!(index.contains(&extra));
        index.remove(&extra);

        let after: Vec<_> = NAMES.iter().map(|name| index.bucket_sets(name)).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(index.len(), size);
        prop_assert!(!index.contains(&extra));
    }
}
