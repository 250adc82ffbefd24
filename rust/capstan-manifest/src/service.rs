//! Legacy `Export-Service` and `Import-Service` headers.
//!
//! Both are ignored when the generic capability headers already declare
//! something in the `osgi.service` namespace.

use capstan_filter::{Attributes, Filter};
use capstan_resource::{
    Capability, Directives, Requirement, ResourceId, attribute, directive, namespace,
};

use crate::{Headers, ManifestError, clause::clauses, headers};

/// Append an `osgi.service` capability per `Export-Service` path to
/// `provided`, unless it already holds service capabilities.
pub(crate) fn export_services(
    owner: ResourceId,
    headers: &Headers,
    provided: &mut Vec<Capability>,
) -> Result<(), ManifestError> {
    let header = headers::EXPORT_SERVICE;
    if provided
        .iter()
        .any(|capability| capability.namespace() == namespace::SERVICE)
    {
        if headers.contains_key(header) {
            tracing::warn!(header, "Ignoring legacy service header");
        }
        return Ok(());
    }

    for clause in clauses(headers, header)? {
        for object_class in &clause.paths {
            let mut attributes = Attributes::with_capacity(clause.attributes.len() + 1);
            attributes.insert(
                attribute::OBJECT_CLASS.to_string(),
                object_class.as_str().into(),
            );
            for (key, value) in &clause.attributes {
                attributes.insert(key.clone(), value.as_str().into());
            }

            provided.push(
                Capability::new(owner, namespace::SERVICE, active(), attributes)
                    .map_err(ManifestError::clause(header))?,
            );
        }
    }
    Ok(())
}

/// Append an `osgi.service` requirement per `Import-Service` path to
/// `required`, unless it already holds service requirements.
pub(crate) fn import_services(
    owner: ResourceId,
    headers: &Headers,
    required: &mut Vec<Requirement>,
) -> Result<(), ManifestError> {
    let header = headers::IMPORT_SERVICE;
    if required
        .iter()
        .any(|requirement| requirement.namespace() == namespace::SERVICE)
    {
        if headers.contains_key(header) {
            tracing::warn!(header, "Ignoring legacy service header");
        }
        return Ok(());
    }

    for clause in clauses(headers, header)? {
        for object_class in &clause.paths {
            let mut directives = active();
            if clause.directives.get("availability").map(String::as_str)
                == Some(directive::RESOLUTION_OPTIONAL)
            {
                directives.insert(
                    directive::RESOLUTION.to_string(),
                    directive::RESOLUTION_OPTIONAL.to_string(),
                );
            }
            if clause.directives.get("multiple").map(String::as_str) == Some("true") {
                directives.insert(
                    directive::CARDINALITY.to_string(),
                    directive::CARDINALITY_MULTIPLE.to_string(),
                );
            }

            let source = service_filter(object_class, clause.attributes.get(directive::FILTER));
            let filter = Filter::parse(&source).map_err(ManifestError::filter(header))?;
            directives.insert(directive::FILTER.to_string(), source);

            required.push(Requirement::with_filter(
                owner,
                namespace::SERVICE,
                directives,
                Attributes::new(),
                filter,
            ));
        }
    }
    Ok(())
}

fn active() -> Directives {
    let mut directives = Directives::new();
    directives.insert(
        directive::EFFECTIVE.to_string(),
        directive::EFFECTIVE_ACTIVE.to_string(),
    );
    directives
}

/// Select `object_class`, narrowed by the clause's own filter when it has
/// one. A filter written without its outer parentheses gets them added.
fn service_filter(object_class: &str, filter: Option<&String>) -> String {
    let selection = format!("({}={object_class})", attribute::OBJECT_CLASS);
    match filter {
        None => selection,
        Some(filter) if !filter.starts_with('(') && !filter.ends_with(')') => {
            format!("(&{selection}({filter}))")
        }
        Some(filter) => format!("(&{selection}{filter})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_filter::AttrValue;
    use pretty_assertions::assert_eq;

    fn headers(entries: &[(&str, &str)]) -> Headers {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn it_wraps_bare_service_filters() {
        assert_eq!(service_filter("com.x.Log", None), "(objectClass=com.x.Log)");
        assert_eq!(
            service_filter("com.x.Log", Some(&"name=main".to_string())),
            "(&(objectClass=com.x.Log)(name=main))"
        );
        assert_eq!(
            service_filter("com.x.Log", Some(&"(name=main)".to_string())),
            "(&(objectClass=com.x.Log)(name=main))"
        );
    }

    #[test]
    fn it_exports_legacy_services() -> anyhow::Result<()> {
        let mut provided = Vec::new();
        export_services(
            ResourceId::new(0),
            &headers(&[(headers::EXPORT_SERVICE, "com.x.Log;ranking=10")]),
            &mut provided,
        )?;
        assert_eq!(provided.len(), 1);
        assert_eq!(
            provided[0].attribute(attribute::OBJECT_CLASS),
            Some(&AttrValue::from("com.x.Log"))
        );
        assert_eq!(provided[0].attribute("ranking"), Some(&AttrValue::from("10")));
        assert_eq!(
            provided[0].directives()[directive::EFFECTIVE],
            directive::EFFECTIVE_ACTIVE
        );
        Ok(())
    }

    #[test]
    fn it_imports_legacy_services() -> anyhow::Result<()> {
        let mut required = Vec::new();
        import_services(
            ResourceId::new(0),
            &headers(&[(
                headers::IMPORT_SERVICE,
                r#"com.x.Log;availability:=optional;multiple:=true;filter="(name=main)""#,
            )]),
            &mut required,
        )?;
        assert_eq!(required.len(), 1);
        let requirement = &required[0];
        assert_eq!(
            requirement.filter().to_string(),
            "(&(objectClass=com.x.Log)(name=main))"
        );
        assert!(requirement.is_optional());
        assert_eq!(
            requirement.directives()[directive::CARDINALITY],
            directive::CARDINALITY_MULTIPLE
        );
        assert!(requirement.attributes().is_empty());
        Ok(())
    }

    #[test]
    fn it_defers_to_generic_service_clauses() -> anyhow::Result<()> {
        let generic = crate::parse_requirements(
            ResourceId::new(0),
            "osgi.service;filter:=\"(objectClass=com.y.Other)\"",
        )?;
        let mut required = generic.clone();
        import_services(
            ResourceId::new(0),
            &headers(&[(headers::IMPORT_SERVICE, "com.x.Log")]),
            &mut required,
        )?;
        assert_eq!(required, generic);
        Ok(())
    }
}
