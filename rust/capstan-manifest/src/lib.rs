//! # capstan-manifest
//!
//! Compiles module manifest headers into a [`Resource`] whose capabilities
//! and requirements can be indexed and matched.
//!
//! Headers use a shared clause grammar (see [`parse_header`]). Each header
//! contributes capabilities, requirements or both, and the first invalid
//! header fails the whole compilation with a [`ManifestError`].
//!
//! ```
//! use capstan_manifest::{Headers, compile};
//! use capstan_resource::{ResourceId, namespace};
//!
//! let headers: Headers = [
//!     ("Bundle-ManifestVersion", "2"),
//!     ("Bundle-SymbolicName", "org.example"),
//!     ("Bundle-Version", "1.0.0"),
//!     ("Import-Package", r#"com.x;version="[1,2)""#),
//! ]
//! .into_iter()
//! .map(|(name, value)| (name.to_string(), value.to_string()))
//! .collect();
//!
//! let resource = compile(ResourceId::new(0), &headers, None).unwrap();
//! let import = resource.requirements_in(namespace::PACKAGE).next().unwrap();
//! assert_eq!(
//!     import.filter().to_string(),
//!     "(&(osgi.wiring.package=com.x)(version>=1.0.0)(!(version>=2.0.0)))"
//! );
//! ```
//!
//! [`Resource`]: capstan_resource::Resource

mod bundle;
mod capability;
mod clause;
mod compiler;
mod environment;
mod error;
pub mod headers;
mod package;
mod service;
mod typed;

pub use capability::{parse_capabilities, parse_requirements};
pub use clause::{Clause, parse_header};
pub use compiler::{CompileOptions, ManifestCompiler, compile};
pub use error::ManifestError;
pub use headers::Headers;
