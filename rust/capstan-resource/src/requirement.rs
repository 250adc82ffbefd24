use std::fmt;

use capstan_filter::{Attributes, Filter};

use crate::{Capability, Directives, ResourceError, ResourceId, directive, matches};

/// Something a resource needs, selected by a filter over capabilities in one
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    owner: ResourceId,
    namespace: String,
    directives: Directives,
    attributes: Attributes,
    filter: Filter,
    optional: bool,
}

impl Requirement {
    /// Create a requirement declared by `owner`.
    ///
    /// The filter is parsed from the `filter` directive when there is one,
    /// and otherwise built from `attributes`. A `resolution:=optional`
    /// directive marks the requirement optional.
    pub fn new(
        owner: ResourceId,
        namespace: impl Into<String>,
        directives: Directives,
        attributes: Attributes,
    ) -> Result<Self, ResourceError> {
        let namespace = namespace.into();

        let filter = match directives.get(directive::FILTER) {
            Some(filter) => {
                Filter::parse(filter).map_err(|source| ResourceError::InvalidFilter {
                    namespace: namespace.clone(),
                    source,
                })?
            }
            None => Filter::from_attributes(&attributes),
        };

        Ok(Self::with_filter(owner, namespace, directives, attributes, filter))
    }

    /// Create a requirement with an already built filter. Any `filter`
    /// directive is kept as declared but not consulted.
    pub fn with_filter(
        owner: ResourceId,
        namespace: impl Into<String>,
        directives: Directives,
        attributes: Attributes,
        filter: Filter,
    ) -> Self {
        let optional = directives
            .get(directive::RESOLUTION)
            .is_some_and(|resolution| resolution == directive::RESOLUTION_OPTIONAL);

        Self {
            owner,
            namespace: namespace.into(),
            directives,
            attributes,
            filter,
            optional,
        }
    }

    pub fn owner(&self) -> ResourceId {
        self.owner
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether `capability` is in this requirement's namespace and passes
    /// its filter, including the mandatory attribute check.
    pub fn is_satisfied_by(&self, capability: &Capability) -> bool {
        capability.namespace() == self.namespace && matches(capability, &self.filter)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}; {}", self.owner, self.namespace, self.filter)?;
        if self.optional {
            write!(f, " (optional)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace;
    use capstan_filter::{FilterError, Version, VersionRange};
    use pretty_assertions::assert_eq;

    fn directives(entries: &[(&str, &str)]) -> Directives {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn it_prefers_the_filter_directive() -> anyhow::Result<()> {
        let mut attributes = Attributes::new();
        attributes.insert("ignored".into(), "yes".into());
        let requirement = Requirement::new(
            ResourceId::new(0),
            namespace::PACKAGE,
            directives(&[(directive::FILTER, "(osgi.wiring.package=com.x)")]),
            attributes,
        )?;
        assert_eq!(requirement.filter().to_string(), "(osgi.wiring.package=com.x)");
        Ok(())
    }

    #[test]
    fn it_synthesizes_a_filter_from_attributes() -> anyhow::Result<()> {
        let mut attributes = Attributes::new();
        attributes.insert(namespace::BUNDLE.into(), "org.example".into());
        attributes.insert(
            "bundle-version".into(),
            VersionRange::at_least(Version::new(1, 0, 0)).into(),
        );
        let requirement = Requirement::new(
            ResourceId::new(0),
            namespace::BUNDLE,
            Directives::new(),
            attributes,
        )?;
        assert_eq!(
            requirement.filter().to_string(),
            "(&(osgi.wiring.bundle=org.example)(bundle-version>=1.0.0))"
        );
        Ok(())
    }

    #[test]
    fn it_keeps_a_prebuilt_filter() -> anyhow::Result<()> {
        let filter = Filter::parse("(osgi.wiring.package=*)")?;
        let requirement = Requirement::with_filter(
            ResourceId::new(2),
            namespace::PACKAGE,
            directives(&[(directive::RESOLUTION, directive::RESOLUTION_DYNAMIC)]),
            Attributes::new(),
            filter.clone(),
        );
        assert_eq!(requirement.filter(), &filter);
        assert_eq!(requirement.owner(), ResourceId::new(2));
        assert!(!requirement.is_optional());
        Ok(())
    }

    #[test]
    fn it_reports_malformed_filter_directives() {
        let result = Requirement::new(
            ResourceId::new(0),
            namespace::SERVICE,
            directives(&[(directive::FILTER, "(objectClass=foo")]),
            Attributes::new(),
        );
        assert!(matches!(
            result,
            Err(ResourceError::InvalidFilter {
                source: FilterError::MissingClosingParenthesis(_),
                ..
            })
        ));
    }

    #[test]
    fn it_derives_optionality_from_resolution() -> anyhow::Result<()> {
        let optional = Requirement::new(
            ResourceId::new(0),
            namespace::PACKAGE,
            directives(&[(directive::RESOLUTION, "optional")]),
            Attributes::new(),
        )?;
        let mandatory = Requirement::new(
            ResourceId::new(0),
            namespace::PACKAGE,
            directives(&[(directive::RESOLUTION, "dynamic")]),
            Attributes::new(),
        )?;
        assert!(optional.is_optional());
        assert!(!mandatory.is_optional());
        assert_eq!(optional.filter(), &Filter::MatchAll);
        Ok(())
    }

    #[test]
    fn it_is_satisfied_only_within_its_namespace() -> anyhow::Result<()> {
        let mut attributes = Attributes::new();
        attributes.insert(namespace::PACKAGE.into(), "com.x".into());
        let capability = Capability::new(
            ResourceId::new(1),
            namespace::PACKAGE,
            Directives::new(),
            attributes.clone(),
        )?;
        let elsewhere = Capability::new(
            ResourceId::new(1),
            namespace::SERVICE,
            Directives::new(),
            attributes,
        )?;
        let requirement = Requirement::new(
            ResourceId::new(0),
            namespace::PACKAGE,
            directives(&[(directive::FILTER, "(osgi.wiring.package=com.x)")]),
            Attributes::new(),
        )?;
        assert!(requirement.is_satisfied_by(&capability));
        assert!(!requirement.is_satisfied_by(&elsewhere));
        Ok(())
    }
}
