//! # capstan-resource
//!
//! The capability/requirement data model and the capability index.
//!
//! A [`Resource`] declares [`Capability`]s it provides and [`Requirement`]s
//! it needs. Requirements select capabilities with a
//! [`Filter`](capstan_filter::Filter); a [`CapabilityIndex`] answers those
//! selections over many resources at once.
//!
//! ```
//! use capstan_filter::{Attributes, Filter, Version};
//! use capstan_resource::{
//!     Capability, CapabilityIndex, Directives, Resource, ResourceError, Resources, namespace,
//! };
//!
//! let mut resources = Resources::new();
//! let id = resources
//!     .insert_with(|id| {
//!         let mut resource = Resource::new(id);
//!         let mut attributes = Attributes::new();
//!         attributes.insert(namespace::PACKAGE.into(), "com.example".into());
//!         attributes.insert("version".into(), Version::new(1, 2, 0).into());
//!         resource.add_capability(Capability::new(
//!             id,
//!             namespace::PACKAGE,
//!             Directives::new(),
//!             attributes,
//!         )?)?;
//!         Ok::<_, ResourceError>(resource)
//!     })
//!     .unwrap();
//!
//! let mut index = CapabilityIndex::new([namespace::PACKAGE]);
//! index.extend(resources[id].capabilities().iter().cloned());
//!
//! let filter = Filter::parse("(&(osgi.wiring.package=com.example)(version>=1.0.0))").unwrap();
//! assert_eq!(index.matches(&filter, true).len(), 1);
//! ```

mod capability;
mod delimited;
mod error;
mod index;
mod matching;
mod names;
mod requirement;
mod resource;

pub use capability::{Capability, CapabilityRef, Directives};
pub use delimited::parse_delimited;
pub use error::ResourceError;
pub use index::{CapabilityIndex, IndexOptions};
pub use matching::{mandatory_satisfied, matches};
pub use names::{attribute, directive, namespace};
pub use requirement::Requirement;
pub use resource::{Resource, ResourceId, Resources};
