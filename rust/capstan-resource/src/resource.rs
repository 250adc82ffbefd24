//! Resources and the arena that owns them.
//!
//! A [`Resource`] owns the capabilities and requirements it declares. Each
//! capability and requirement records its owner as a [`ResourceId`] rather
//! than a reference, and the ids are handed out by [`Resources`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Capability, CapabilityRef, Requirement, ResourceError};

/// A handle to a [`Resource`] in a [`Resources`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(usize);

impl ResourceId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit of deployment: an ordered set of capabilities it provides and
/// requirements it declares.
#[derive(Debug, Clone)]
pub struct Resource {
    id: ResourceId,
    capabilities: Vec<CapabilityRef>,
    requirements: Vec<Requirement>,
}

impl Resource {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            capabilities: Vec::new(),
            requirements: Vec::new(),
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Append a capability declared by this resource and return its shared
    /// handle.
    pub fn add_capability(&mut self, capability: Capability) -> Result<CapabilityRef, ResourceError> {
        self.check_owner(capability.owner())?;
        let capability = CapabilityRef::new(capability);
        self.capabilities.push(capability.clone());
        Ok(capability)
    }

    /// Append a requirement declared by this resource.
    pub fn add_requirement(&mut self, requirement: Requirement) -> Result<(), ResourceError> {
        self.check_owner(requirement.owner())?;
        self.requirements.push(requirement);
        Ok(())
    }

    fn check_owner(&self, owner: ResourceId) -> Result<(), ResourceError> {
        if owner == self.id {
            Ok(())
        } else {
            Err(ResourceError::OwnerMismatch {
                expected: self.id,
                found: owner,
            })
        }
    }

    pub fn capabilities(&self) -> &[CapabilityRef] {
        &self.capabilities
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Capabilities in `namespace`, in declaration order.
    pub fn capabilities_in<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = &'a CapabilityRef> + 'a {
        self.capabilities
            .iter()
            .filter(move |capability| capability.namespace() == namespace)
    }

    /// Requirements in `namespace`, in declaration order.
    pub fn requirements_in<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = &'a Requirement> + 'a {
        self.requirements
            .iter()
            .filter(move |requirement| requirement.namespace() == namespace)
    }
}

/// An arena of resources addressed by [`ResourceId`].
#[derive(Debug, Default, Clone)]
pub struct Resources {
    resources: Vec<Resource>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next inserted resource will receive.
    pub fn next_id(&self) -> ResourceId {
        ResourceId(self.resources.len())
    }

    /// Build a resource knowing its id up front and store it.
    ///
    /// Nothing is stored when `build` fails.
    pub fn insert_with<F, E>(&mut self, build: F) -> Result<ResourceId, E>
    where
        F: FnOnce(ResourceId) -> Result<Resource, E>,
        E: From<ResourceError>,
    {
        let id = self.next_id();
        let resource = build(id)?;
        if resource.id() != id {
            return Err(ResourceError::OwnerMismatch {
                expected: id,
                found: resource.id(),
            }
            .into());
        }
        self.resources.push(resource);
        Ok(id)
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Every capability of every resource, in insertion order.
    pub fn capabilities(&self) -> impl Iterator<Item = &CapabilityRef> {
        self.resources
            .iter()
            .flat_map(|resource| resource.capabilities.iter())
    }
}

impl std::ops::Index<ResourceId> for Resources {
    type Output = Resource;

    fn index(&self, id: ResourceId) -> &Self::Output {
        &self.resources[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Directives, namespace};
    use capstan_filter::Attributes;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_rejects_capabilities_of_another_owner() -> anyhow::Result<()> {
        let mut resource = Resource::new(ResourceId::new(1));
        let foreign = Capability::new(
            ResourceId::new(2),
            namespace::PACKAGE,
            Directives::new(),
            Attributes::new(),
        )?;
        assert_eq!(
            resource.add_capability(foreign).err(),
            Some(ResourceError::OwnerMismatch {
                expected: ResourceId::new(1),
                found: ResourceId::new(2)
            })
        );
        assert!(resource.capabilities().is_empty());
        Ok(())
    }

    #[test]
    fn it_keeps_declaration_order() -> anyhow::Result<()> {
        let id = ResourceId::new(0);
        let mut resource = Resource::new(id);
        for namespace in [namespace::IDENTITY, namespace::PACKAGE, namespace::SERVICE] {
            resource.add_capability(Capability::new(
                id,
                namespace,
                Directives::new(),
                Attributes::new(),
            )?)?;
        }
        let namespaces: Vec<_> = resource
            .capabilities()
            .iter()
            .map(|capability| capability.namespace())
            .collect();
        assert_eq!(
            namespaces,
            vec![namespace::IDENTITY, namespace::PACKAGE, namespace::SERVICE]
        );
        assert_eq!(resource.capabilities_in(namespace::PACKAGE).count(), 1);
        Ok(())
    }

    #[test]
    fn it_hands_out_ids_before_building() -> anyhow::Result<()> {
        let mut resources = Resources::new();
        let first = resources.insert_with(|id| Ok::<_, ResourceError>(Resource::new(id)))?;
        let second = resources.insert_with(|id| Ok::<_, ResourceError>(Resource::new(id)))?;
        assert_eq!(first, ResourceId::new(0));
        assert_eq!(second, ResourceId::new(1));
        assert_eq!(resources[second].id(), second);
        Ok(())
    }

    #[test]
    fn it_stores_nothing_when_building_fails() {
        let mut resources = Resources::new();
        let result = resources.insert_with(|id| {
            let mut resource = Resource::new(id);
            resource.add_capability(Capability::new(
                ResourceId::new(9),
                namespace::PACKAGE,
                Directives::new(),
                Attributes::new(),
            )?)?;
            Ok::<_, ResourceError>(resource)
        });
        assert!(result.is_err());
        assert!(resources.is_empty());
        assert_eq!(resources.next_id(), ResourceId::new(0));
    }
}
