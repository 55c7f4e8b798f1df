//! Species types of an assembled model.

use indexmap::IndexMap;

use crate::{
    description::{DescriptionId, ParentRef},
    identifier::Id,
    model::ModelDescription,
};

/// A species (or experiment, or grafted model) usable as a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesType {
    pub name: Id,
    pub description: DescriptionId,
    /// Name of the parent type; `None` for descriptions without a parent.
    pub parent: Option<Id>,
}

/// Name → species type table, with aliases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRegistry {
    types: IndexMap<Id, SpeciesType>,
    aliases: IndexMap<Id, Id>,
}

impl TypeRegistry {
    /// Builds the table from every description of `model` except its root.
    ///
    /// A name declared both by the model and by a graft resolves to the
    /// model's own description, as [`ModelDescription::find`] does.
    pub fn from_model(model: &ModelDescription) -> Self {
        let mut registry = Self::default();
        for (id, description) in model.iter() {
            if id == model.root() {
                continue;
            }
            let shadowed = description.grafted_from().is_some()
                && registry
                    .types
                    .get(&description.name())
                    .is_some_and(|existing| model.description(existing.description).grafted_from().is_none());
            if shadowed {
                continue;
            }
            let parent = description.parent().map(|parent| match parent {
                ParentRef::Declared(parent) => model.description(parent).name(),
                ParentRef::BuiltIn(name) => name,
            });
            registry.types.insert(
                description.name(),
                SpeciesType {
                    name: description.name(),
                    description: id,
                    parent,
                },
            );
        }
        registry
    }

    /// Registers `alias` as another name for the type `target`.
    pub fn alias(&mut self, target: Id, alias: Id) {
        self.aliases.insert(alias, target);
    }

    /// Looks up a type by name or alias.
    pub fn get(&self, name: Id) -> Option<&SpeciesType> {
        let name = self.aliases.get(&name).copied().unwrap_or(name);
        self.types.get(&name)
    }

    pub fn contains(&self, name: Id) -> bool {
        self.get(name).is_some()
    }

    /// Types in the order their descriptions appear in the model.
    pub fn iter(&self) -> impl Iterator<Item = &SpeciesType> {
        self.types.values()
    }

    pub fn aliases(&self) -> impl Iterator<Item = (Id, Id)> {
        self.aliases.iter().map(|(alias, target)| (*alias, *target))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
