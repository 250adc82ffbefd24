use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    sync::Arc,
};

use capstan_filter::{AttrValue, Attributes};
use indexmap::{IndexMap, IndexSet};

use crate::{ResourceError, ResourceId, directive, parse_delimited};

/// Insertion-ordered directive map.
pub type Directives = IndexMap<String, String>;

/// Something a resource provides, described by a namespace and attributes.
///
/// Attributes named in the `mandatory` directive must be mentioned by any
/// filter that wants to select this capability with mandatory checks on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    owner: ResourceId,
    namespace: String,
    directives: Directives,
    attributes: Attributes,
    mandatory: IndexSet<String>,
}

impl Capability {
    /// Create a capability declared by `owner`.
    ///
    /// Fails when the `mandatory` directive names an attribute that is not
    /// present.
    pub fn new(
        owner: ResourceId,
        namespace: impl Into<String>,
        directives: Directives,
        attributes: Attributes,
    ) -> Result<Self, ResourceError> {
        let namespace = namespace.into();
        let mut mandatory = IndexSet::new();

        if let Some(names) = directives.get(directive::MANDATORY) {
            for name in parse_delimited(names, ",", true) {
                if !attributes.contains_key(&name) {
                    return Err(ResourceError::MissingMandatoryAttribute {
                        namespace,
                        attribute: name,
                    });
                }
                mandatory.insert(name);
            }
        }

        Ok(Self {
            owner,
            namespace,
            directives,
            attributes,
            mandatory,
        })
    }

    pub fn owner(&self) -> ResourceId {
        self.owner
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Look up a single attribute.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Names of the mandatory attributes, in directive order.
    pub fn mandatory(&self) -> impl Iterator<Item = &str> {
        self.mandatory.iter().map(String::as_str)
    }

    pub fn is_attribute_mandatory(&self, name: &str) -> bool {
        self.mandatory.contains(name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.owner, self.namespace)?;
        for (name, value) in &self.directives {
            write!(f, "; {name}:={value}")?;
        }
        for (name, value) in &self.attributes {
            write!(f, "; {name}={value}")?;
        }
        Ok(())
    }
}

/// A shared handle to a [`Capability`].
///
/// Two handles are equal only when they point at the same allocation, so
/// distinct capabilities with identical contents stay distinct in sets and
/// indexes.
#[derive(Debug, Clone)]
pub struct CapabilityRef(Arc<Capability>);

impl CapabilityRef {
    pub fn new(capability: Capability) -> Self {
        Self(Arc::new(capability))
    }
}

impl From<Capability> for CapabilityRef {
    fn from(capability: Capability) -> Self {
        Self::new(capability)
    }
}

impl Deref for CapabilityRef {
    type Target = Capability;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for CapabilityRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for CapabilityRef {}

impl Hash for CapabilityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Display for CapabilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
