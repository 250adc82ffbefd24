use capstan_filter::Filter;

use crate::Capability;

/// Whether `filter` selects `capability`, honoring its mandatory attributes.
pub fn matches(capability: &Capability, filter: &Filter) -> bool {
    filter.matches(capability.attributes()) && mandatory_satisfied(capability, filter)
}

/// Whether every mandatory attribute of `capability` is named by `filter`.
///
/// Only the filter itself and, when it is a conjunction, its immediate
/// children are inspected. A mandatory attribute mentioned deeper, such as
/// under an `|` or `!`, does not count.
pub fn mandatory_satisfied(capability: &Capability, filter: &Filter) -> bool {
    capability
        .mandatory()
        .all(|attribute| names_attribute(filter, attribute))
}

fn names_attribute(filter: &Filter, attribute: &str) -> bool {
    if filter.name() == Some(attribute) {
        return true;
    }
    match filter {
        Filter::And(children) => children
            .iter()
            .any(|child| child.name() == Some(attribute)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Directives, ResourceId, directive};
    use capstan_filter::Attributes;

    fn capability(mandatory: &str) -> anyhow::Result<Capability> {
        let mut attributes = Attributes::new();
        attributes.insert("a".into(), "1".into());
        attributes.insert("b".into(), "2".into());
        let mut directives = Directives::new();
        if !mandatory.is_empty() {
            directives.insert(directive::MANDATORY.into(), mandatory.into());
        }
        Ok(Capability::new(
            ResourceId::new(0),
            "test",
            directives,
            attributes,
        )?)
    }

    #[test]
    fn it_requires_mandatory_attributes_to_be_named() -> anyhow::Result<()> {
        let capability = capability("b")?;
        assert!(!matches(&capability, &Filter::parse("(a=1)")?));
        assert!(matches(&capability, &Filter::parse("(&(a=1)(b=2))")?));
        assert!(matches(&capability, &Filter::parse("(b=2)")?));
        Ok(())
    }

    #[test]
    fn it_only_looks_one_conjunction_deep() -> anyhow::Result<()> {
        let capability = capability("b")?;
        assert!(!matches(&capability, &Filter::parse("(&(a=1)(|(b=2)))")?));
        assert!(!matches(&capability, &Filter::parse("(|(b=2))")?));
        Ok(())
    }

    #[test]
    fn it_matches_without_mandatory_attributes() -> anyhow::Result<()> {
        let capability = capability("")?;
        assert!(matches(&capability, &Filter::parse("(a=1)")?));
        assert!(matches(&capability, &Filter::MatchAll));
        assert!(!matches(&capability, &Filter::parse("(a=2)")?));
        Ok(())
    }

    #[test]
    fn it_negates_when_no_child_matches() -> anyhow::Result<()> {
        let capability = capability("")?;
        assert!(matches(&capability, &Filter::parse("(!(a=2))")?));
        assert!(!matches(&capability, &Filter::parse("(!(a=1)(a=2))")?));
        Ok(())
    }
}
