//! `Bundle-RequiredExecutionEnvironment`, compiled into a single
//! `osgi.ee` requirement.

use capstan_filter::{Attributes, Filter, Version};
use capstan_resource::{Directives, Requirement, ResourceId, directive, namespace, parse_delimited};

use crate::{Headers, ManifestError, headers};

/// The `osgi.ee` requirement accepting any of the listed environments, if
/// any are listed.
pub(crate) fn required_environment(
    owner: ResourceId,
    headers: &Headers,
) -> Result<Option<Requirement>, ManifestError> {
    let header = headers::BUNDLE_REQUIRED_EXECUTION_ENVIRONMENT;
    let Some(raw) = headers.get(header) else {
        return Ok(None);
    };

    let mut filters: Vec<String> = parse_delimited(raw, ",", true)
        .iter()
        .filter(|entry| !entry.is_empty())
        .map(|entry| environment_filter(entry))
        .collect();

    let source = match filters.len() {
        0 => return Ok(None),
        1 => filters.remove(0),
        _ => format!("(|{})", filters.concat()),
    };
    tracing::debug!(header, filter = %source, "Parsed manifest header");

    let filter = Filter::parse(&source).map_err(ManifestError::filter(header))?;
    let mut directives = Directives::new();
    directives.insert(directive::FILTER.to_string(), source);

    Ok(Some(Requirement::with_filter(
        owner,
        namespace::EXECUTION_ENVIRONMENT,
        directives,
        Attributes::new(),
        filter,
    )))
}

/// The filter for one `NAME-VERSION[/NAME-VERSION]` entry such as
/// `JavaSE-1.8` or `CDC-1.0/Foundation-1.0`.
fn environment_filter(entry: &str) -> String {
    let names = parse_delimited(entry, "/", true);
    let left_token = names.first().map_or(entry, String::as_str);
    let right_token = names.get(1).map(String::as_str);

    let (mut left, left_version) = split_version(left_token);
    let mut right = right_token.map(split_version);

    let right_version = right.as_ref().and_then(|(_, version)| version.clone());

    let version = match (left_version, right_version) {
        (Some(left_version), Some(right_version)) if left_version != right_version => {
            left = left_token.to_string();
            right = right_token.map(|token| (token.to_string(), None));
            None
        }
        (Some(version), _) | (None, Some(version)) => Some(version),
        (None, None) => None,
    };

    if left == "J2SE" {
        left = "JavaSE".to_string();
    }

    let name = match right {
        Some((right, _)) => format!("({}={left}/{right})", namespace::EXECUTION_ENVIRONMENT),
        None => format!("({}={left})", namespace::EXECUTION_ENVIRONMENT),
    };
    match version {
        Some(version) => format!("(&{name}(version={version}))"),
        None => name,
    }
}

/// Split `NAME-VERSION` into its name and version. When the part after the
/// first dash is not a version the whole token is the name.
fn split_version(token: &str) -> (String, Option<Version>) {
    let parts = parse_delimited(token, "-", true);
    let version = parts.get(1).and_then(|version| Version::parse(version).ok());
    match (parts.first(), version) {
        (Some(name), Some(version)) => (name.clone(), Some(version)),
        _ => (token.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_builds_filters_for_each_entry_form() {
        assert_eq!(
            environment_filter("JavaSE-1.8"),
            "(&(osgi.ee=JavaSE)(version=1.8.0))"
        );
        assert_eq!(
            environment_filter("J2SE-1.5"),
            "(&(osgi.ee=JavaSE)(version=1.5.0))"
        );
        assert_eq!(
            environment_filter("OSGi/Minimum-1.2"),
            "(&(osgi.ee=OSGi/Minimum)(version=1.2.0))"
        );
        assert_eq!(
            environment_filter("CDC-1.0/Foundation-1.0"),
            "(&(osgi.ee=CDC/Foundation)(version=1.0.0))"
        );
        assert_eq!(
            environment_filter("CDC-1.0/Foundation-1.1"),
            "(osgi.ee=CDC-1.0/Foundation-1.1)"
        );
        assert_eq!(environment_filter("AA-BB"), "(osgi.ee=AA-BB)");
    }

    #[test]
    fn it_combines_entries_into_one_requirement() -> anyhow::Result<()> {
        let headers: Headers = [(
            headers::BUNDLE_REQUIRED_EXECUTION_ENVIRONMENT.to_string(),
            "JavaSE-1.8, J2SE-1.5".to_string(),
        )]
        .into_iter()
        .collect();

        let requirement = required_environment(ResourceId::new(0), &headers)?
            .ok_or_else(|| anyhow::anyhow!("missing osgi.ee requirement"))?;
        assert_eq!(requirement.namespace(), namespace::EXECUTION_ENVIRONMENT);
        assert_eq!(
            requirement.directives()[directive::FILTER],
            "(|(&(osgi.ee=JavaSE)(version=1.8.0))(&(osgi.ee=JavaSE)(version=1.5.0)))"
        );
        assert_eq!(
            requirement.filter().to_string(),
            requirement.directives()[directive::FILTER]
        );
        Ok(())
    }

    #[test]
    fn it_skips_an_absent_header() -> anyhow::Result<()> {
        assert_eq!(required_environment(ResourceId::new(0), &Headers::new())?, None);
        Ok(())
    }
}
