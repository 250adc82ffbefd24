//! Manifest header names.

use indexmap::IndexMap;

/// Raw manifest headers, header name to unparsed value.
pub type Headers = IndexMap<String, String>;

pub const BUNDLE_MANIFEST_VERSION: &str = "Bundle-ManifestVersion";
pub const BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
pub const BUNDLE_VERSION: &str = "Bundle-Version";
pub const FRAGMENT_HOST: &str = "Fragment-Host";
pub const REQUIRE_BUNDLE: &str = "Require-Bundle";
pub const IMPORT_PACKAGE: &str = "Import-Package";
pub const DYNAMIC_IMPORT_PACKAGE: &str = "DynamicImport-Package";
pub const EXPORT_PACKAGE: &str = "Export-Package";
pub const REQUIRE_CAPABILITY: &str = "Require-Capability";
pub const PROVIDE_CAPABILITY: &str = "Provide-Capability";
/// Legacy service export, superseded by `Provide-Capability`.
pub const EXPORT_SERVICE: &str = "Export-Service";
/// Legacy service import, superseded by `Require-Capability`.
pub const IMPORT_SERVICE: &str = "Import-Service";
pub const BUNDLE_REQUIRED_EXECUTION_ENVIRONMENT: &str = "Bundle-RequiredExecutionEnvironment";
