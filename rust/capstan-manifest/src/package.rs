//! `Import-Package`, `DynamicImport-Package` and `Export-Package`.

use std::collections::HashSet;

use capstan_filter::{AttrValue, Attributes, Filter, Version, VersionRange};
use capstan_resource::{
    Capability, Directives, Requirement, ResourceId, attribute, directive, namespace,
};

use crate::{Clause, Headers, ManifestError, bundle::SymbolicName, clause::clauses, headers};

/// One `osgi.wiring.package` requirement per imported package.
pub(crate) fn imports(
    owner: ResourceId,
    headers: &Headers,
) -> Result<Vec<Requirement>, ManifestError> {
    let header = headers::IMPORT_PACKAGE;
    let mut seen = HashSet::new();
    let mut requirements = Vec::new();

    for clause in clauses(headers, header)? {
        let attributes = versioned_attributes(&clause, header, range(header))?;
        for package in &clause.paths {
            check_package(header, package)?;
            if !seen.insert(package.clone()) {
                return Err(ManifestError::DuplicateImport(package.clone()));
            }
        }
        requirements.extend(package_requirements(
            owner,
            &clause,
            &attributes,
            clause.directives.clone(),
        ));
    }

    Ok(requirements)
}

/// One `resolution:=dynamic` package requirement per dynamically imported
/// package or wildcard.
pub(crate) fn dynamic_imports(
    owner: ResourceId,
    headers: &Headers,
) -> Result<Vec<Requirement>, ManifestError> {
    let header = headers::DYNAMIC_IMPORT_PACKAGE;
    let mut requirements = Vec::new();

    for clause in clauses(headers, header)? {
        let attributes = versioned_attributes(&clause, header, range(header))?;
        for package in &clause.paths {
            let reason = if package.starts_with("java.") {
                JAVA_PACKAGE
            } else if package != "*" && package.ends_with('*') && !package.ends_with(".*") {
                "partial package name wildcards are not allowed"
            } else {
                continue;
            };
            return Err(ManifestError::InvalidPackage {
                header,
                package: package.clone(),
                reason,
            });
        }

        let mut directives = clause.directives.clone();
        directives.insert(
            directive::RESOLUTION.to_string(),
            directive::RESOLUTION_DYNAMIC.to_string(),
        );
        requirements.extend(package_requirements(owner, &clause, &attributes, directives));
    }

    Ok(requirements)
}

/// One `osgi.wiring.package` capability per exported package, stamped with
/// the exporting bundle's symbolic name and version.
pub(crate) fn exports(
    owner: ResourceId,
    headers: &Headers,
    bundle: &SymbolicName,
) -> Result<Vec<Capability>, ManifestError> {
    let header = headers::EXPORT_PACKAGE;
    let mut capabilities = Vec::new();

    for clause in clauses(headers, header)? {
        for package in &clause.paths {
            check_package(header, package)?;
        }

        if clause.attributes.contains_key(attribute::BUNDLE_VERSION)
            || clause.attributes.contains_key(attribute::BUNDLE_SYMBOLIC_NAME)
        {
            return Err(ManifestError::ExportDeclaresBundle(clause.paths.join(";")));
        }

        let mut attributes = versioned_attributes(&clause, header, |version| {
            Ok(Version::clean(version).into())
        })?;
        if !attributes.contains_key(attribute::VERSION) {
            attributes.insert(attribute::VERSION.to_string(), Version::EMPTY.into());
        }
        attributes.insert(
            attribute::BUNDLE_SYMBOLIC_NAME.to_string(),
            bundle.name.as_str().into(),
        );
        attributes.insert(
            attribute::BUNDLE_VERSION.to_string(),
            bundle.version.clone().into(),
        );

        for package in &clause.paths {
            let mut exported = Attributes::with_capacity(attributes.len() + 1);
            exported.insert(namespace::PACKAGE.to_string(), package.as_str().into());
            exported.extend(
                attributes
                    .iter()
                    .filter(|(key, _)| *key != namespace::PACKAGE)
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
            capabilities.push(
                Capability::new(owner, namespace::PACKAGE, clause.directives.clone(), exported)
                    .map_err(ManifestError::clause(header))?,
            );
        }
    }

    Ok(capabilities)
}

const JAVA_PACKAGE: &str = "java.* packages are reserved";

fn check_package(header: &'static str, package: &str) -> Result<(), ManifestError> {
    let reason = if package.starts_with("java.") {
        JAVA_PACKAGE
    } else if package == "." {
        "'.' does not name a package"
    } else if package.is_empty() {
        "package names cannot be empty"
    } else {
        return Ok(());
    };
    Err(ManifestError::InvalidPackage {
        header,
        package: package.to_string(),
        reason,
    })
}

fn range(header: &'static str) -> impl Fn(&str) -> Result<AttrValue, ManifestError> {
    move |version| {
        VersionRange::parse(version)
            .map(AttrValue::from)
            .map_err(ManifestError::version(header))
    }
}

/// The clause's attributes with a `specification-version` folded into
/// `version` and converted by `version`. `bundle-version` becomes a range.
fn versioned_attributes(
    clause: &Clause,
    header: &'static str,
    version: impl Fn(&str) -> Result<AttrValue, ManifestError>,
) -> Result<Attributes, ManifestError> {
    let declared = clause.attributes.get(attribute::VERSION);
    let specified = clause.attributes.get(attribute::SPECIFICATION_VERSION);
    if let (Some(declared), Some(specified)) = (declared, specified) {
        if declared.trim() != specified.trim() {
            return Err(ManifestError::VersionMismatch {
                header,
                package: clause.paths.join(";"),
            });
        }
    }

    let mut attributes = Attributes::with_capacity(clause.attributes.len());
    for (key, value) in &clause.attributes {
        match key.as_str() {
            attribute::VERSION | attribute::SPECIFICATION_VERSION => {
                if !attributes.contains_key(attribute::VERSION) {
                    let value = version(declared.unwrap_or(value).as_str())?;
                    attributes.insert(attribute::VERSION.to_string(), value);
                }
            }
            attribute::BUNDLE_VERSION => {
                let value = VersionRange::parse(value).map_err(ManifestError::version(header))?;
                attributes.insert(key.clone(), value.into());
            }
            _ => {
                attributes.insert(key.clone(), value.as_str().into());
            }
        }
    }
    Ok(attributes)
}

/// Package requirements for every path of `clause`. The synthesized filter
/// names the package first and is also recorded as the `filter` directive;
/// the requirements themselves carry no attributes.
fn package_requirements(
    owner: ResourceId,
    clause: &Clause,
    attributes: &Attributes,
    directives: Directives,
) -> Vec<Requirement> {
    clause
        .paths
        .iter()
        .map(|package| {
            let mut selected = Attributes::with_capacity(attributes.len() + 1);
            selected.insert(namespace::PACKAGE.to_string(), package.as_str().into());
            selected.extend(
                attributes
                    .iter()
                    .filter(|(key, _)| *key != namespace::PACKAGE)
                    .map(|(key, value)| (key.clone(), value.clone())),
            );

            let filter = Filter::from_attributes(&selected);
            let mut directives = directives.clone();
            directives.insert(directive::FILTER.to_string(), filter.to_string());
            Requirement::with_filter(
                owner,
                namespace::PACKAGE,
                directives,
                Attributes::new(),
                filter,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn headers(entries: &[(&str, &str)]) -> Headers {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    fn bundle() -> anyhow::Result<SymbolicName> {
        Ok(SymbolicName::from_headers(&headers(&[
            (headers::BUNDLE_SYMBOLIC_NAME, "org.example"),
            (headers::BUNDLE_VERSION, "1.0.0"),
        ]))?)
    }

    #[test]
    fn it_imports_packages_with_version_ranges() -> anyhow::Result<()> {
        let requirements = imports(
            ResourceId::new(0),
            &headers(&[(
                headers::IMPORT_PACKAGE,
                r#"com.x;version="[1,2)",com.y;resolution:=optional"#,
            )]),
        )?;
        assert_eq!(requirements.len(), 2);
        assert_eq!(
            requirements[0].filter().to_string(),
            "(&(osgi.wiring.package=com.x)(version>=1.0.0)(!(version>=2.0.0)))"
        );
        assert_eq!(
            requirements[0].directives()[directive::FILTER],
            requirements[0].filter().to_string()
        );
        assert!(requirements[0].attributes().is_empty());
        assert!(requirements[1].is_optional());
        Ok(())
    }

    #[test]
    fn it_folds_specification_version_into_version() -> anyhow::Result<()> {
        let requirements = imports(
            ResourceId::new(0),
            &headers(&[(headers::IMPORT_PACKAGE, "com.x;specification-version=1.2")]),
        )?;
        assert_eq!(
            requirements[0].filter().to_string(),
            "(&(osgi.wiring.package=com.x)(version>=1.2.0))"
        );

        assert!(matches!(
            imports(
                ResourceId::new(0),
                &headers(&[(
                    headers::IMPORT_PACKAGE,
                    "com.x;version=1.2;specification-version=1.3"
                )]),
            ),
            Err(ManifestError::VersionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn it_rejects_invalid_and_duplicate_imports() {
        for value in ["java.lang", ".", "com.x;com.y,"] {
            assert!(
                matches!(
                    imports(
                        ResourceId::new(0),
                        &headers(&[(headers::IMPORT_PACKAGE, value)])
                    ),
                    Err(ManifestError::InvalidPackage { .. })
                ),
                "{value}"
            );
        }
        assert_eq!(
            imports(
                ResourceId::new(0),
                &headers(&[(headers::IMPORT_PACKAGE, "com.x,com.x")])
            )
            .err(),
            Some(ManifestError::DuplicateImport("com.x".into()))
        );
    }

    #[test]
    fn it_marks_dynamic_imports() -> anyhow::Result<()> {
        let requirements = dynamic_imports(
            ResourceId::new(0),
            &headers(&[(headers::DYNAMIC_IMPORT_PACKAGE, "com.x.*,*")]),
        )?;
        assert_eq!(requirements.len(), 2);
        for requirement in &requirements {
            assert_eq!(
                requirement.directives()[directive::RESOLUTION],
                directive::RESOLUTION_DYNAMIC
            );
        }
        assert_eq!(
            requirements[0].filter().to_string(),
            "(osgi.wiring.package=com.x.*)"
        );
        Ok(())
    }

    #[test]
    fn it_rejects_partial_dynamic_wildcards() {
        for value in ["com.x*", "java.util"] {
            assert!(
                matches!(
                    dynamic_imports(
                        ResourceId::new(0),
                        &headers(&[(headers::DYNAMIC_IMPORT_PACKAGE, value)])
                    ),
                    Err(ManifestError::InvalidPackage { .. })
                ),
                "{value}"
            );
        }
    }

    #[test]
    fn it_exports_packages_stamped_with_the_bundle() -> anyhow::Result<()> {
        let capabilities = exports(
            ResourceId::new(0),
            &headers(&[(headers::EXPORT_PACKAGE, "com.x;com.y;version=2.1,com.z")]),
            &bundle()?,
        )?;
        assert_eq!(capabilities.len(), 3);

        let x = &capabilities[0];
        assert_eq!(
            x.attribute(namespace::PACKAGE),
            Some(&AttrValue::from("com.x"))
        );
        assert_eq!(
            x.attribute(attribute::VERSION),
            Some(&AttrValue::from(Version::new(2, 1, 0)))
        );
        assert_eq!(
            x.attribute(attribute::BUNDLE_SYMBOLIC_NAME),
            Some(&AttrValue::from("org.example"))
        );
        assert_eq!(
            x.attribute(attribute::BUNDLE_VERSION),
            Some(&AttrValue::from(Version::new(1, 0, 0)))
        );
        assert_eq!(
            capabilities[2].attribute(attribute::VERSION),
            Some(&AttrValue::from(Version::EMPTY))
        );
        Ok(())
    }

    #[test]
    fn it_rejects_exports_declaring_the_bundle() -> anyhow::Result<()> {
        let bundle = bundle()?;
        assert!(matches!(
            exports(
                ResourceId::new(0),
                &headers(&[(headers::EXPORT_PACKAGE, "com.x;bundle-version=1.0")]),
                &bundle,
            ),
            Err(ManifestError::ExportDeclaresBundle(_))
        ));
        assert!(matches!(
            exports(
                ResourceId::new(0),
                &headers(&[(headers::EXPORT_PACKAGE, "java.util")]),
                &bundle,
            ),
            Err(ManifestError::InvalidPackage { .. })
        ));
        Ok(())
    }

    #[test]
    fn it_requires_exports_to_carry_their_mandatory_attributes() -> anyhow::Result<()> {
        let result = exports(
            ResourceId::new(0),
            &headers(&[(headers::EXPORT_PACKAGE, "com.x;mandatory:=vendor")]),
            &bundle()?,
        );
        assert!(matches!(result, Err(ManifestError::Clause { .. })));
        Ok(())
    }
}
