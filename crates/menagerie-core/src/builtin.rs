//! The built-in registry: predefined species, experiments and models.
//!
//! The registry is process-wide. It is installed once at bootstrap with
//! [`bootstrap`] (or lazily with [`BuiltInRegistry::defaults`] on first use of
//! [`registry`]) and is read-only afterward, so any number of assemblies may
//! read it concurrently.
//!
//! Built-in descriptions are stored already flattened: each carries the
//! members of its built-in ancestors, so user descriptions inherit from a
//! built-in parent with a single merge.

use std::sync::OnceLock;

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::{
    description::{Description, DescriptionError, DescriptionKind, Member, MemberRole, ParentRef},
    identifier::Id,
    keyword,
    syntax::ElementKind,
};

static REGISTRY: OnceLock<BuiltInRegistry> = OnceLock::new();

/// Errors raised while installing the process-wide registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("the built-in registry is already installed")]
    AlreadyInstalled,
}

/// Installs the process-wide built-in registry.
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyInstalled`] when a registry was already
/// installed, including implicitly by an earlier call to [`registry`].
pub fn bootstrap(registry: BuiltInRegistry) -> Result<&'static BuiltInRegistry, RegistryError> {
    REGISTRY
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    debug!("Built-in registry installed");
    Ok(registry_ref())
}

/// Returns the process-wide built-in registry, installing the defaults if
/// none was bootstrapped.
pub fn registry() -> &'static BuiltInRegistry {
    registry_ref()
}

fn registry_ref() -> &'static BuiltInRegistry {
    REGISTRY.get_or_init(BuiltInRegistry::defaults)
}

/// The set of predefined descriptions available as default parents.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltInRegistry {
    species: IndexMap<Id, Description>,
    experiments: IndexMap<Id, Description>,
    models: IndexMap<Id, Description>,
}

impl BuiltInRegistry {
    /// The default registry: the `agent` species, the `experiment` base and
    /// the root `model`.
    pub fn defaults() -> Self {
        let mut agent = Description::built_in(
            DescriptionKind::Species,
            ElementKind::Species,
            keyword::AGENT,
            None,
        );
        for member in [
            Member::new(MemberRole::Variable, "name").with_facet("type", "string"),
            Member::new(MemberRole::Variable, "location").with_facet("type", "point"),
            Member::new(MemberRole::Variable, "shape").with_facet("type", "geometry"),
            Member::new(MemberRole::Action, "die"),
        ] {
            add_built_in_member(&mut agent, member);
        }

        let mut experiment = Description::built_in(
            DescriptionKind::Experiment,
            ElementKind::Experiment,
            keyword::EXPERIMENT,
            None,
        );
        for member in [
            Member::new(MemberRole::Variable, "seed").with_facet("type", "float"),
            Member::new(MemberRole::Action, "step"),
        ] {
            add_built_in_member(&mut experiment, member);
        }

        let mut root = Description::built_in(
            DescriptionKind::Model,
            ElementKind::Model,
            keyword::MODEL,
            Some(keyword::AGENT),
        );
        for member in [
            Member::new(MemberRole::Variable, "cycle").with_facet("type", "int"),
            Member::new(MemberRole::Variable, "time").with_facet("type", "float"),
            Member::new(MemberRole::Variable, "step").with_facet("type", "float"),
            Member::new(MemberRole::Action, "pause"),
        ] {
            add_built_in_member(&mut root, member);
        }
        inherit_built_in(&mut root, &agent);

        let mut registry = Self {
            species: IndexMap::new(),
            experiments: IndexMap::new(),
            models: IndexMap::new(),
        };
        registry.species.insert(agent.name(), agent);
        registry.experiments.insert(experiment.name(), experiment);
        registry.models.insert(root.name(), root);
        registry
    }

    /// Registers an additional built-in species, flattened against its
    /// built-in parent (the generic base species when it names none).
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Finalized`] if `species` is already closed.
    pub fn with_species(mut self, mut species: Description) -> Result<Self, DescriptionError> {
        let parent_name = match species.parent() {
            Some(ParentRef::BuiltIn(name)) => name,
            _ => Id::new(keyword::AGENT),
        };
        if let Some(parent) = self.species.get(&parent_name) {
            species.inherit_members(parent.name(), parent.members())?;
        }
        self.species.insert(species.name(), species);
        Ok(self)
    }

    /// Registers an additional built-in model, flattened against the root model.
    ///
    /// Models select it with a `parent:` facet in their global section.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::Finalized`] if `model` is already closed.
    pub fn with_model(mut self, mut model: Description) -> Result<Self, DescriptionError> {
        if let Some(root) = self.models.get(&Id::new(keyword::MODEL)) {
            model.inherit_members(root.name(), root.members())?;
        }
        self.models.insert(model.name(), model);
        Ok(self)
    }

    /// Looks up a built-in species.
    pub fn species(&self, name: Id) -> Option<&Description> {
        self.species.get(&name)
    }

    /// Looks up a built-in experiment.
    pub fn experiment(&self, name: Id) -> Option<&Description> {
        self.experiments.get(&name)
    }

    /// Looks up a built-in model.
    pub fn model(&self, name: Id) -> Option<&Description> {
        self.models.get(&name)
    }

    /// Looks up any built-in description, species first.
    pub fn lookup(&self, name: Id) -> Option<&Description> {
        self.species(name)
            .or_else(|| self.experiment(name))
            .or_else(|| self.model(name))
    }

    /// Name of the generic base species.
    pub fn default_species(&self) -> Id {
        Id::new(keyword::AGENT)
    }

    /// Name of the generic base experiment.
    pub fn default_experiment(&self) -> Id {
        Id::new(keyword::EXPERIMENT)
    }

    /// Name of the root model.
    pub fn root_model(&self) -> Id {
        Id::new(keyword::MODEL)
    }
}

fn add_built_in_member(description: &mut Description, member: Member) {
    description
        .add_member(member)
        .expect("default built-ins are open while the registry is built");
}

fn inherit_built_in(description: &mut Description, parent: &Description) {
    description
        .inherit_members(parent.name(), parent.members())
        .expect("default built-ins are open while the registry is built");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = BuiltInRegistry::defaults();

        let agent = registry.species(Id::new("agent")).unwrap();
        assert!(agent.is_built_in());
        assert!(agent.member(MemberRole::Action, "die").is_some());

        let experiment = registry.experiment(Id::new("experiment")).unwrap();
        assert!(experiment.is_experiment());

        let root = registry.model(Id::new("model")).unwrap();
        assert!(root.member(MemberRole::Variable, "cycle").is_some());
        assert!(root.member(MemberRole::Action, "die").is_some());
    }

    #[test]
    fn test_lookup_order() {
        let registry = BuiltInRegistry::defaults();
        assert_eq!(
            registry.lookup(Id::new("agent")).map(Description::kind),
            Some(DescriptionKind::Species)
        );
        assert!(registry.lookup(Id::new("unknown")).is_none());
    }

    #[test]
    fn test_with_model_flattens_root() {
        let mut physics = Description::built_in(
            DescriptionKind::Model,
            ElementKind::Model,
            "physical_world",
            Some("model"),
        );
        physics
            .add_member(Member::new(MemberRole::Variable, "gravity"))
            .unwrap();
        let registry = BuiltInRegistry::defaults().with_model(physics).unwrap();

        let model = registry.model(Id::new("physical_world")).unwrap();
        assert!(model.member(MemberRole::Variable, "gravity").is_some());
        assert!(model.member(MemberRole::Variable, "cycle").is_some());
    }

    #[test]
    fn test_with_species_flattens_agent() {
        let registry = BuiltInRegistry::defaults().with_species(Description::built_in(
            DescriptionKind::Species,
            ElementKind::Species,
            "pedestrian",
            Some("agent"),
        ))
        .unwrap();

        let pedestrian = registry.species(Id::new("pedestrian")).unwrap();
        assert!(pedestrian.member(MemberRole::Variable, "location").is_some());
    }

    #[test]
    fn test_closed_built_in_is_rejected() {
        let mut closed = Description::built_in(
            DescriptionKind::Species,
            ElementKind::Species,
            "boulder",
            Some("agent"),
        );
        closed.close();

        let result = BuiltInRegistry::defaults().with_species(closed);

        assert!(matches!(result, Err(DescriptionError::Finalized(name)) if name == "boulder"));
    }

    #[test]
    fn test_registry_is_process_wide() {
        let first = registry() as *const BuiltInRegistry;
        let second = registry() as *const BuiltInRegistry;
        assert_eq!(first, second);
        assert!(bootstrap(BuiltInRegistry::defaults()).is_err());
    }
}
