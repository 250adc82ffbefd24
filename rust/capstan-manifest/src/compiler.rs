use capstan_resource::{Resource, ResourceId, namespace};
use serde::{Deserialize, Serialize};

use crate::{
    Headers, ManifestError, bundle, bundle::SymbolicName, capability, environment, headers,
    package, service,
};

/// Options that change how manifests are compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CompileOptions {
    /// Drop every `osgi.service` requirement from the compiled resource.
    pub remove_service_requirements: bool,
}

/// Compiles raw manifest headers into a [`Resource`].
#[derive(Debug, Clone, Default)]
pub struct ManifestCompiler {
    options: CompileOptions,
}

impl ManifestCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `headers` into the resource `owner`.
    ///
    /// `content` is where the bundle can be fetched from, recorded as an
    /// `osgi.content` capability. Compilation stops at the first invalid
    /// header.
    ///
    /// Capabilities come out as identity, content, bundle and host wiring,
    /// exported packages, then provided capabilities and services.
    /// Requirements come out as host, imported packages, required bundles,
    /// required capabilities and services, execution environment, then
    /// dynamic imports.
    pub fn compile(
        &self,
        owner: ResourceId,
        headers: &Headers,
        content: Option<&str>,
    ) -> Result<Resource, ManifestError> {
        bundle::check_manifest_version(headers)?;
        let symbolic_name = SymbolicName::from_headers(headers)?;
        let fragment = headers.contains_key(headers::FRAGMENT_HOST);

        let mut capabilities = vec![bundle::identity(owner, &symbolic_name, fragment)?];
        if let Some(url) = content {
            capabilities.push(bundle::content(owner, url)?);
        }
        if !fragment {
            capabilities.extend(bundle::wiring(owner, &symbolic_name)?);
        }

        let host = bundle::fragment_host(owner, headers)?;
        let required_bundles = bundle::require_bundle(owner, headers)?;
        let imports = package::imports(owner, headers)?;
        let dynamic_imports = package::dynamic_imports(owner, headers)?;
        let mut required = capability::required(owner, headers)?;
        let environment = environment::required_environment(owner, headers)?;
        let exports = package::exports(owner, headers, &symbolic_name)?;
        let mut provided = capability::provided(owner, headers)?;

        service::export_services(owner, headers, &mut provided)?;
        service::import_services(owner, headers, &mut required)?;
        if self.options.remove_service_requirements {
            required.retain(|requirement| requirement.namespace() != namespace::SERVICE);
        }

        let mut resource = Resource::new(owner);
        for capability in capabilities.into_iter().chain(exports).chain(provided) {
            resource.add_capability(capability)?;
        }
        for requirement in host
            .into_iter()
            .chain(imports)
            .chain(required_bundles)
            .chain(required)
            .chain(environment)
            .chain(dynamic_imports)
        {
            resource.add_requirement(requirement)?;
        }

        tracing::debug!(
            bundle = %symbolic_name.name,
            version = %symbolic_name.version,
            capabilities = resource.capabilities().len(),
            requirements = resource.requirements().len(),
            "Compiled manifest"
        );
        Ok(resource)
    }
}

/// Compile `headers` with default options.
pub fn compile(
    owner: ResourceId,
    headers: &Headers,
    content: Option<&str>,
) -> Result<Resource, ManifestError> {
    ManifestCompiler::default().compile(owner, headers, content)
}
