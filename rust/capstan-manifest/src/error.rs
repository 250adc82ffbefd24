use capstan_filter::{FilterError, VersionError};
use capstan_resource::ResourceError;
use thiserror::Error;

/// Errors raised while compiling manifest headers.
///
/// Compilation is all-or-nothing: the first error aborts it, and every
/// variant names the header it came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// The header ended in the middle of a parameter.
    #[error("Unable to parse header: {0}")]
    MalformedHeader(String),

    /// A clause declared the same directive or attribute twice.
    #[error("Duplicate '{key}' in: {header}")]
    DuplicateParameter { key: String, header: String },

    #[error("Unsupported 'Bundle-ManifestVersion' value: {0}")]
    UnsupportedManifestVersion(String),

    #[error("Bundle manifest must include bundle symbolic name")]
    MissingSymbolicName,

    #[error("Cannot have multiple symbolic names: {0}")]
    MultipleSymbolicNames(String),

    #[error("Fragments cannot have multiple hosts: {0}")]
    MultipleHosts(String),

    /// A package clause named something that cannot be wired.
    #[error("Invalid package \"{package}\" in {header}: {reason}")]
    InvalidPackage {
        header: &'static str,
        package: String,
        reason: &'static str,
    },

    #[error("Duplicate import: {0}")]
    DuplicateImport(String),

    #[error(
        "Both version and specification-version are specified for {package} in {header}, \
         but they are not equal"
    )]
    VersionMismatch {
        header: &'static str,
        package: String,
    },

    #[error("Exports must not specify bundle symbolic name or bundle version: {0}")]
    ExportDeclaresBundle(String),

    /// A typed attribute declared a type that is not supported.
    #[error("Unknown type \"{kind}\" for attribute {attribute}")]
    UnknownAttributeType { attribute: String, kind: String },

    /// A `List<...>` type was not bracketed properly.
    #[error("Invalid list type \"{kind}\" for attribute {attribute}")]
    InvalidListType { attribute: String, kind: String },

    /// A typed attribute's value could not be converted to its type.
    #[error("Invalid {kind} value \"{value}\" for attribute {attribute}")]
    InvalidAttributeValue {
        attribute: String,
        kind: String,
        value: String,
    },

    #[error("Invalid version in {header}: {source}")]
    Version {
        header: &'static str,
        #[source]
        source: VersionError,
    },

    #[error("Invalid filter in {header}: {source}")]
    Filter {
        header: &'static str,
        #[source]
        source: FilterError,
    },

    #[error("Invalid clause in {header}: {source}")]
    Clause {
        header: &'static str,
        #[source]
        source: ResourceError,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl ManifestError {
    pub(crate) fn version(header: &'static str) -> impl FnOnce(VersionError) -> Self {
        move |source| Self::Version { header, source }
    }

    pub(crate) fn filter(header: &'static str) -> impl FnOnce(FilterError) -> Self {
        move |source| Self::Filter { header, source }
    }

    pub(crate) fn clause(header: &'static str) -> impl FnOnce(ResourceError) -> Self {
        move |source| Self::Clause { header, source }
    }
}
