//! # capstan-filter
//!
//! LDAP-style filter expressions over typed attributes.
//!
//! Capabilities describe themselves with named, typed [`AttrValue`]s and
//! requirements select capabilities with a [`Filter`]:
//!
//! ```text
//! (&(osgi.wiring.package=com.example)(version>=1.0.0)(!(version>=2.0.0)))
//! ```
//!
//! ## Usage
//!
//! ```
//! use capstan_filter::{Attributes, Filter, Version};
//!
//! let filter = Filter::parse("(&(name=foo*)(version>=1.0))").unwrap();
//!
//! let mut attributes = Attributes::new();
//! attributes.insert("name".into(), "foobar".into());
//! attributes.insert("version".into(), Version::new(1, 2, 0).into());
//!
//! assert!(filter.matches(&attributes));
//! assert_eq!(filter.to_string(), "(&(name=foo*)(version>=1.0))");
//! ```

mod compare;
mod convert;
mod error;
mod evaluate;
mod filter;
mod parser;
mod range;
mod substring;
mod value;
mod version;

pub use compare::{compare, coercions};
pub use error::{FilterError, VersionError};
pub use filter::{Filter, Predicate};
pub use range::VersionRange;
pub use substring::{compare_substring, parse_substring};
pub use value::{AttrKind, AttrValue, Attributes};
pub use version::Version;
