//! Well-known namespace, attribute and directive names.

/// Capability and requirement namespaces.
pub mod namespace {
    /// Identity of a resource: its symbolic name, version and type.
    pub const IDENTITY: &str = "osgi.identity";
    /// Where the resource's content can be fetched from.
    pub const CONTENT: &str = "osgi.content";
    /// Bundle-level wiring (`Require-Bundle`).
    pub const BUNDLE: &str = "osgi.wiring.bundle";
    /// Fragment attachment (`Fragment-Host`).
    pub const HOST: &str = "osgi.wiring.host";
    /// Package wiring (`Import-Package` / `Export-Package`).
    pub const PACKAGE: &str = "osgi.wiring.package";
    pub const SERVICE: &str = "osgi.service";
    pub const EXECUTION_ENVIRONMENT: &str = "osgi.ee";
}

/// Attribute names.
pub mod attribute {
    pub const VERSION: &str = "version";
    pub const BUNDLE_VERSION: &str = "bundle-version";
    pub const BUNDLE_SYMBOLIC_NAME: &str = "bundle-symbolic-name";
    pub const SPECIFICATION_VERSION: &str = "specification-version";
    pub const TYPE: &str = "type";
    pub const URL: &str = "url";
    pub const OBJECT_CLASS: &str = "objectClass";

    /// `type` of the identity capability of a regular bundle.
    pub const TYPE_BUNDLE: &str = "osgi.bundle";
    /// `type` of the identity capability of a fragment.
    pub const TYPE_FRAGMENT: &str = "osgi.fragment";
}

/// Directive names and well-known directive values.
pub mod directive {
    pub const FILTER: &str = "filter";
    pub const MANDATORY: &str = "mandatory";
    pub const RESOLUTION: &str = "resolution";
    pub const RESOLUTION_OPTIONAL: &str = "optional";
    pub const RESOLUTION_DYNAMIC: &str = "dynamic";
    pub const EFFECTIVE: &str = "effective";
    pub const EFFECTIVE_ACTIVE: &str = "active";
    pub const CARDINALITY: &str = "cardinality";
    pub const CARDINALITY_MULTIPLE: &str = "multiple";
    pub const FRAGMENT_ATTACHMENT: &str = "fragment-attachment";
    pub const FRAGMENT_ATTACHMENT_NEVER: &str = "never";
}
