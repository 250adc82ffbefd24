//! Bundle-level headers: the manifest version, the symbolic name and
//! version, `Fragment-Host` and `Require-Bundle`.

use capstan_filter::{AttrValue, Attributes, Filter, Version, VersionRange};
use capstan_resource::{
    Capability, Directives, Requirement, ResourceId, attribute, directive, namespace,
};

use crate::{Clause, Headers, ManifestError, clause::clauses, headers, parse_header};

/// The only manifest version that can be compiled.
const MANIFEST_VERSION: &str = "2";

/// A bundle's parsed `Bundle-SymbolicName` clause and its version.
#[derive(Debug, Clone)]
pub(crate) struct SymbolicName {
    pub name: String,
    pub version: Version,
    pub clause: Clause,
}

impl SymbolicName {
    /// Read `Bundle-SymbolicName` and `Bundle-Version`.
    pub fn from_headers(headers: &Headers) -> Result<Self, ManifestError> {
        let raw = headers
            .get(headers::BUNDLE_SYMBOLIC_NAME)
            .ok_or(ManifestError::MissingSymbolicName)?;

        let mut clauses = parse_header(raw)?;
        if clauses.len() > 1 || clauses.iter().any(|clause| clause.paths.len() > 1) {
            return Err(ManifestError::MultipleSymbolicNames(raw.clone()));
        }
        let mut clause = clauses.pop().ok_or(ManifestError::MissingSymbolicName)?;
        let name = clause
            .paths
            .pop()
            .filter(|name| !name.is_empty())
            .ok_or(ManifestError::MissingSymbolicName)?;

        let version = headers
            .get(headers::BUNDLE_VERSION)
            .map(|version| Version::clean(version))
            .unwrap_or(Version::EMPTY);

        Ok(Self {
            name,
            version,
            clause,
        })
    }

    /// The symbolic name clause's attributes with the bundle name and
    /// version stamped on, keyed by `name_key`.
    fn attributes(&self, name_key: &str) -> Attributes {
        let mut attributes: Attributes = self
            .clause
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), AttrValue::from(value.as_str())))
            .collect();
        attributes.insert(name_key.to_string(), self.name.as_str().into());
        attributes.insert(
            attribute::BUNDLE_VERSION.to_string(),
            self.version.clone().into(),
        );
        attributes
    }
}

/// Only manifest version 2 is supported. A missing header means version 1.
pub(crate) fn check_manifest_version(headers: &Headers) -> Result<(), ManifestError> {
    let version = headers
        .get(headers::BUNDLE_MANIFEST_VERSION)
        .map_or("1", |version| version.trim());
    if version == MANIFEST_VERSION {
        Ok(())
    } else {
        Err(ManifestError::UnsupportedManifestVersion(version.to_string()))
    }
}

/// The `osgi.identity` capability.
pub(crate) fn identity(
    owner: ResourceId,
    bundle: &SymbolicName,
    fragment: bool,
) -> Result<Capability, ManifestError> {
    let kind = if fragment {
        attribute::TYPE_FRAGMENT
    } else {
        attribute::TYPE_BUNDLE
    };

    let mut attributes = Attributes::new();
    attributes.insert(namespace::IDENTITY.into(), bundle.name.as_str().into());
    attributes.insert(attribute::TYPE.into(), kind.into());
    attributes.insert(attribute::VERSION.into(), bundle.version.clone().into());

    Ok(Capability::new(
        owner,
        namespace::IDENTITY,
        Directives::new(),
        attributes,
    )?)
}

/// The `osgi.content` capability pointing at where the bundle came from.
pub(crate) fn content(owner: ResourceId, url: &str) -> Result<Capability, ManifestError> {
    let mut attributes = Attributes::new();
    attributes.insert(attribute::URL.into(), url.into());
    Ok(Capability::new(
        owner,
        namespace::CONTENT,
        Directives::new(),
        attributes,
    )?)
}

/// The `osgi.wiring.bundle` capability of a non-fragment bundle, followed
/// by its `osgi.wiring.host` capability unless it refuses fragments.
pub(crate) fn wiring(
    owner: ResourceId,
    bundle: &SymbolicName,
) -> Result<Vec<Capability>, ManifestError> {
    let directives = &bundle.clause.directives;
    let header = headers::BUNDLE_SYMBOLIC_NAME;

    let mut capabilities = vec![
        Capability::new(
            owner,
            namespace::BUNDLE,
            directives.clone(),
            bundle.attributes(namespace::BUNDLE),
        )
        .map_err(ManifestError::clause(header))?,
    ];

    let attachment = directives
        .get(directive::FRAGMENT_ATTACHMENT)
        .map(String::as_str);
    let accepts_fragments = !attachment.is_some_and(|attachment| {
        attachment.eq_ignore_ascii_case(directive::FRAGMENT_ATTACHMENT_NEVER)
    });
    if accepts_fragments {
        capabilities.push(
            Capability::new(
                owner,
                namespace::HOST,
                directives.clone(),
                bundle.attributes(namespace::HOST),
            )
            .map_err(ManifestError::clause(header))?,
        );
    }

    Ok(capabilities)
}

/// The `osgi.wiring.host` requirement of a fragment.
pub(crate) fn fragment_host(
    owner: ResourceId,
    headers: &Headers,
) -> Result<Option<Requirement>, ManifestError> {
    let Some(raw) = headers.get(headers::FRAGMENT_HOST) else {
        return Ok(None);
    };

    let mut clauses = parse_header(raw)?;
    if clauses.len() > 1 || clauses.iter().any(|clause| clause.paths.len() > 1) {
        return Err(ManifestError::MultipleHosts(raw.clone()));
    }
    let Some(clause) = clauses.pop() else {
        return Ok(None);
    };

    let host = wired_requirements(
        owner,
        namespace::HOST,
        &clause,
        Some("0.0.0"),
        headers::FRAGMENT_HOST,
    )?;
    Ok(host.into_iter().next())
}

/// One `osgi.wiring.bundle` requirement per `Require-Bundle` path.
pub(crate) fn require_bundle(
    owner: ResourceId,
    headers: &Headers,
) -> Result<Vec<Requirement>, ManifestError> {
    let mut requirements = Vec::new();
    for clause in clauses(headers, headers::REQUIRE_BUNDLE)? {
        requirements.extend(wired_requirements(
            owner,
            namespace::BUNDLE,
            &clause,
            None,
            headers::REQUIRE_BUNDLE,
        )?);
    }
    Ok(requirements)
}

/// Requirements on a bundle by name, one per path of `clause`.
///
/// `bundle-version`, or `default_version` when it is absent, becomes a
/// range. The bundle name is the first attribute and the synthesized filter
/// is also recorded as the `filter` directive.
fn wired_requirements(
    owner: ResourceId,
    namespace: &str,
    clause: &Clause,
    default_version: Option<&str>,
    header: &'static str,
) -> Result<Vec<Requirement>, ManifestError> {
    let version = clause
        .attributes
        .get(attribute::BUNDLE_VERSION)
        .map(String::as_str)
        .or(default_version)
        .map(VersionRange::parse)
        .transpose()
        .map_err(ManifestError::version(header))?;

    let mut requirements = Vec::new();
    for path in &clause.paths {
        let mut attributes = Attributes::new();
        attributes.insert(namespace.to_string(), path.as_str().into());
        for (key, value) in &clause.attributes {
            if key != namespace {
                attributes.insert(key.clone(), value.as_str().into());
            }
        }
        if let Some(version) = &version {
            attributes.insert(attribute::BUNDLE_VERSION.to_string(), version.clone().into());
        }

        let filter = Filter::from_attributes(&attributes);
        let mut directives = clause.directives.clone();
        directives.insert(directive::FILTER.to_string(), filter.to_string());

        requirements.push(Requirement::with_filter(
            owner, namespace, directives, attributes, filter,
        ));
    }
    Ok(requirements)
}
