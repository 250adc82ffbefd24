//! Generic `Require-Capability` and `Provide-Capability` clauses, whose
//! paths name arbitrary namespaces.

use capstan_filter::Filter;
use capstan_resource::{Capability, Requirement, ResourceId, directive};

use crate::{Clause, Headers, ManifestError, clause::clauses, headers, parse_header, typed};

/// Compile a `Require-Capability` style header value into requirements
/// owned by `owner`.
pub fn parse_requirements(
    owner: ResourceId,
    header: &str,
) -> Result<Vec<Requirement>, ManifestError> {
    requirements(owner, parse_header(header)?)
}

/// Compile a `Provide-Capability` style header value into capabilities
/// owned by `owner`.
pub fn parse_capabilities(
    owner: ResourceId,
    header: &str,
) -> Result<Vec<Capability>, ManifestError> {
    capabilities(owner, parse_header(header)?)
}

pub(crate) fn required(
    owner: ResourceId,
    headers: &Headers,
) -> Result<Vec<Requirement>, ManifestError> {
    requirements(owner, clauses(headers, headers::REQUIRE_CAPABILITY)?)
}

pub(crate) fn provided(
    owner: ResourceId,
    headers: &Headers,
) -> Result<Vec<Capability>, ManifestError> {
    capabilities(owner, clauses(headers, headers::PROVIDE_CAPABILITY)?)
}

fn requirements(
    owner: ResourceId,
    clauses: Vec<Clause>,
) -> Result<Vec<Requirement>, ManifestError> {
    let header = headers::REQUIRE_CAPABILITY;
    let mut requirements = Vec::new();

    for clause in clauses {
        let attributes = typed::typed_attributes(&clause, true, header)?;
        let filter = match clause.directives.get(directive::FILTER) {
            Some(filter) => Filter::parse(filter).map_err(ManifestError::filter(header))?,
            None => Filter::from_attributes(&attributes),
        };

        for namespace in &clause.paths {
            requirements.push(Requirement::with_filter(
                owner,
                namespace.as_str(),
                clause.directives.clone(),
                attributes.clone(),
                filter.clone(),
            ));
        }
    }

    Ok(requirements)
}

fn capabilities(
    owner: ResourceId,
    clauses: Vec<Clause>,
) -> Result<Vec<Capability>, ManifestError> {
    let header = headers::PROVIDE_CAPABILITY;
    let mut capabilities = Vec::new();

    for clause in clauses {
        let attributes = typed::typed_attributes(&clause, false, header)?;
        for namespace in &clause.paths {
            capabilities.push(
                Capability::new(
                    owner,
                    namespace.as_str(),
                    clause.directives.clone(),
                    attributes.clone(),
                )
                .map_err(ManifestError::clause(header))?,
            );
        }
    }

    Ok(capabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_filter::{AttrValue, Version, VersionRange};
    use capstan_resource::namespace;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_uses_the_filter_directive_when_present() -> anyhow::Result<()> {
        let requirements = parse_requirements(
            ResourceId::new(0),
            r#"osgi.ee;filter:="(&(osgi.ee=JavaSE)(version=1.8))";resolution:=optional"#,
        )?;
        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].namespace(), namespace::EXECUTION_ENVIRONMENT);
        assert_eq!(
            requirements[0].filter().to_string(),
            "(&(osgi.ee=JavaSE)(version=1.8))"
        );
        assert!(requirements[0].is_optional());
        Ok(())
    }

    #[test]
    fn it_synthesizes_a_filter_with_version_ranges() -> anyhow::Result<()> {
        let requirements = parse_requirements(
            ResourceId::new(0),
            r#"com.acme.widget;kind=gear;version="[1,2)""#,
        )?;
        assert_eq!(
            requirements[0].attributes()["version"],
            AttrValue::from(VersionRange::parse("[1,2)")?)
        );
        assert_eq!(
            requirements[0].filter().to_string(),
            "(&(kind=gear)(version>=1.0.0)(!(version>=2.0.0)))"
        );
        Ok(())
    }

    #[test]
    fn it_reports_malformed_filter_directives() {
        assert!(matches!(
            parse_requirements(ResourceId::new(0), r#"ns;filter:="(a=1""#),
            Err(ManifestError::Filter { .. })
        ));
    }

    #[test]
    fn it_provides_one_capability_per_namespace() -> anyhow::Result<()> {
        let capabilities = parse_capabilities(
            ResourceId::new(4),
            r#"com.acme.widget;com.acme.gadget;version:Version="1.1";size:Long=3"#,
        )?;
        assert_eq!(capabilities.len(), 2);
        assert_eq!(capabilities[1].namespace(), "com.acme.gadget");
        assert_eq!(capabilities[1].owner(), ResourceId::new(4));
        assert_eq!(
            capabilities[0].attribute("version"),
            Some(&AttrValue::from(Version::new(1, 1, 0)))
        );
        assert_eq!(capabilities[0].attribute("size"), Some(&AttrValue::Long(3)));
        Ok(())
    }

    #[test]
    fn it_checks_mandatory_attributes_of_provided_capabilities() {
        assert!(matches!(
            parse_capabilities(ResourceId::new(0), "ns;mandatory:=missing;present=1"),
            Err(ManifestError::Clause { .. })
        ));
    }
}
