//! The model description: the root of an assembled description tree.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::{
    builtin::BuiltInRegistry,
    description::{Description, DescriptionError, DescriptionId, DescriptionKind, ParentRef},
    identifier::Id,
    types::TypeRegistry,
};

/// An assembled model: an arena of descriptions rooted at the model itself.
///
/// Every non-root description has exactly one owner, set when it is added
/// with [`ModelDescription::add_description`] and never changed afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescription {
    descriptions: Vec<Description>,
    alias: Option<Id>,
    project_path: String,
    model_path: String,
    imported_models: IndexSet<Id>,
    alternate_paths: IndexSet<String>,
    micro_species_names: IndexSet<Id>,
    grafts: IndexMap<Id, DescriptionId>,
    types: TypeRegistry,
    registry: &'static BuiltInRegistry,
}

impl ModelDescription {
    /// Creates a model whose root is `root`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not a model description.
    pub fn new(root: Description, registry: &'static BuiltInRegistry) -> Self {
        assert_eq!(
            root.kind(),
            DescriptionKind::Model,
            "the root of a model description must be a model"
        );
        Self {
            descriptions: vec![root],
            alias: None,
            project_path: String::new(),
            model_path: String::new(),
            imported_models: IndexSet::new(),
            alternate_paths: IndexSet::new(),
            micro_species_names: IndexSet::new(),
            grafts: IndexMap::new(),
            types: TypeRegistry::default(),
            registry,
        }
    }

    /// Sets the project and model paths.
    pub fn with_paths(mut self, project_path: impl Into<String>, model_path: impl Into<String>) -> Self {
        self.project_path = project_path.into();
        self.model_path = model_path.into();
        self
    }

    pub fn root(&self) -> DescriptionId {
        DescriptionId::new(0)
    }

    pub fn root_description(&self) -> &Description {
        &self.descriptions[0]
    }

    pub fn name(&self) -> Id {
        self.root_description().name()
    }

    pub fn alias(&self) -> Option<Id> {
        self.alias
    }

    pub fn set_alias(&mut self, alias: Id) {
        self.alias = Some(alias);
    }

    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// The built-in registry this model was assembled against.
    pub fn registry(&self) -> &'static BuiltInRegistry {
        self.registry
    }

    /// Returns the description `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this model.
    pub fn description(&self, id: DescriptionId) -> &Description {
        &self.descriptions[id.index()]
    }

    pub fn get(&self, id: DescriptionId) -> Option<&Description> {
        self.descriptions.get(id.index())
    }

    /// Returns the description `id` for mutation.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this model.
    pub fn description_mut(&mut self, id: DescriptionId) -> &mut Description {
        &mut self.descriptions[id.index()]
    }

    /// Adds `description` as a containment child of `owner`.
    pub fn add_description(
        &mut self,
        owner: DescriptionId,
        mut description: Description,
    ) -> Result<DescriptionId, DescriptionError> {
        let id = DescriptionId::new(self.descriptions.len());
        self.descriptions
            .get_mut(owner.index())
            .ok_or(DescriptionError::Unknown(owner))?
            .push_micro(id)?;
        description.set_owner(owner);
        self.descriptions.push(description);
        Ok(id)
    }

    /// Iterates over every description in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (DescriptionId, &Description)> {
        self.descriptions
            .iter()
            .enumerate()
            .map(|(index, description)| (DescriptionId::new(index), description))
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Containment tree below `start` (inclusive), depth first, owners before
    /// their micro-species.
    pub fn walk(&self, start: DescriptionId) -> Vec<DescriptionId> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.description(id).micro().iter().rev().copied());
        }
        order
    }

    /// Finds a species or experiment by name anywhere in the model.
    ///
    /// The model's own descriptions shadow grafted ones of the same name.
    pub fn find(&self, name: &str) -> Option<DescriptionId> {
        let name = Id::new(name);
        let mut grafted = None;
        for (id, description) in self.iter().skip(1) {
            if description.name() != name || description.is_model() {
                continue;
            }
            if description.grafted_from().is_none() {
                return Some(id);
            }
            grafted.get_or_insert(id);
        }
        grafted
    }

    /// Direct experiments of the model.
    pub fn experiments(&self) -> impl Iterator<Item = DescriptionId> {
        self.root_description()
            .micro()
            .iter()
            .copied()
            .filter(|id| self.description(*id).is_experiment())
    }

    /// The inheritance parent of `id`, looked up in this model or the registry.
    pub fn resolve_parent(&self, id: DescriptionId) -> Option<&Description> {
        match self.description(id).parent()? {
            ParentRef::Declared(parent) => self.get(parent),
            ParentRef::BuiltIn(name) => self.registry.lookup(name),
        }
    }

    /// Name of the inheritance parent of `id`.
    pub fn parent_name(&self, id: DescriptionId) -> Option<Id> {
        self.resolve_parent(id).map(Description::name)
    }

    pub fn imported_models(&self) -> &IndexSet<Id> {
        &self.imported_models
    }

    pub fn set_imported_models(&mut self, names: impl IntoIterator<Item = Id>) {
        self.imported_models = names.into_iter().collect();
    }

    /// Alternate paths in which resources of the model are searched.
    pub fn alternate_paths(&self) -> &IndexSet<String> {
        &self.alternate_paths
    }

    pub fn add_alternate_paths(&mut self, paths: impl IntoIterator<Item = String>) {
        self.alternate_paths.extend(paths);
    }

    /// Names of every species or experiment declared anywhere in the model.
    pub fn micro_species_names(&self) -> &IndexSet<Id> {
        &self.micro_species_names
    }

    pub fn set_micro_species_names(&mut self, names: impl IntoIterator<Item = Id>) {
        self.micro_species_names = names.into_iter().collect();
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Rebuilds the type registry from the current description tree and
    /// re-registers graft aliases.
    pub fn build_types(&mut self) {
        let mut types = TypeRegistry::from_model(self);
        for (alias, grafted) in &self.grafts {
            types.alias(self.description(*grafted).name(), *alias);
        }
        self.types = types;
    }

    /// Grafted sub-models, by alias.
    pub fn grafts(&self) -> impl Iterator<Item = (Id, DescriptionId)> {
        self.grafts.iter().map(|(alias, id)| (*alias, *id))
    }

    /// Splices an already finalized model under this model's root.
    ///
    /// Every description of `other` is copied into this arena with its
    /// parent links, origin and finalized state intact, and stamped with
    /// `alias` as graft provenance. The grafted model's alternate paths are
    /// added to this model's. Returns the id of the grafted model root.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptionError::NotFinalized`] if `other` is not finalized,
    /// and [`DescriptionError::Finalized`] if this model already is.
    pub fn graft(&mut self, alias: Id, other: ModelDescription) -> Result<DescriptionId, DescriptionError> {
        if !other.root_description().is_finalized() {
            return Err(DescriptionError::NotFinalized(other.name()));
        }
        if self.root_description().is_finalized() {
            return Err(DescriptionError::Finalized(self.name()));
        }

        let offset = self.descriptions.len();
        let root = self.root();
        let grafted = DescriptionId::new(offset + other.root().index());
        let other_root = other.root().index();
        for (index, mut description) in other.descriptions.into_iter().enumerate() {
            let new_owner = (index == other_root).then_some(root);
            description.remap(offset, new_owner, alias);
            self.descriptions.push(description);
        }
        self.descriptions[root.index()].push_micro(grafted)?;
        self.alternate_paths.extend(other.alternate_paths);
        self.grafts.insert(alias, grafted);

        debug!(alias = alias.to_string(), grafted:% = grafted; "Grafted sub-model");
        Ok(grafted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builtin,
        description::{Member, MemberRole},
        facet::Facets,
        syntax::ElementKind,
    };

    fn model(name: &str) -> ModelDescription {
        let root = Description::new(
            DescriptionKind::Model,
            ElementKind::Model,
            Id::new(name),
            Facets::new(),
        );
        ModelDescription::new(root, builtin::registry())
    }

    fn species(name: &str) -> Description {
        Description::new(
            DescriptionKind::Species,
            ElementKind::Species,
            Id::new(name),
            Facets::new(),
        )
    }

    #[test]
    fn test_add_description_sets_owner() {
        let mut m = model("m_model");
        let prey = m.add_description(m.root(), species("prey")).unwrap();
        let cell = m.add_description(prey, species("cell")).unwrap();

        assert_eq!(m.description(prey).owner(), Some(m.root()));
        assert_eq!(m.description(cell).owner(), Some(prey));
        assert_eq!(m.root_description().micro(), &[prey]);
        assert_eq!(m.walk(m.root()), vec![m.root(), prey, cell]);
        assert_eq!(m.find("cell"), Some(cell));
    }

    #[test]
    fn test_resolve_parent() {
        let mut m = model("m_model");
        let animal = m.add_description(m.root(), species("animal")).unwrap();
        let sheep = m.add_description(m.root(), species("sheep")).unwrap();
        m.description_mut(animal)
            .set_parent(ParentRef::BuiltIn(Id::new("agent")))
            .unwrap();
        m.description_mut(sheep)
            .set_parent(ParentRef::Declared(animal))
            .unwrap();

        assert_eq!(m.parent_name(sheep), Some(Id::new("animal")));
        assert_eq!(m.parent_name(animal), Some(Id::new("agent")));
        assert!(m.resolve_parent(m.root()).is_none());
    }

    #[test]
    fn test_graft_requires_finalized_model() {
        let mut primary = model("main_model");
        let sub = model("sub_model");

        assert_eq!(
            primary.graft(Id::new("sub"), sub),
            Err(DescriptionError::NotFinalized(Id::new("sub_model")))
        );
    }

    #[test]
    fn test_graft_remaps_indices() {
        let mut primary = model("main_model");
        primary.add_description(primary.root(), species("wolf")).unwrap();

        let mut sub = model("sub_model");
        let base = sub.add_description(sub.root(), species("base")).unwrap();
        let derived = sub.add_description(sub.root(), species("derived")).unwrap();
        sub.description_mut(derived)
            .set_parent(ParentRef::Declared(base))
            .unwrap();
        sub.description_mut(base)
            .add_member(Member::new(MemberRole::Variable, "x"))
            .unwrap();
        sub.add_alternate_paths(["/models/sub".to_owned()]);
        let ids: Vec<DescriptionId> = sub.iter().map(|(id, _)| id).collect();
        for id in ids {
            sub.description_mut(id).close();
        }

        let grafted = primary.graft(Id::new("sub"), sub).unwrap();

        let grafted_root = primary.description(grafted);
        assert_eq!(grafted_root.name(), "sub_model");
        assert_eq!(grafted_root.owner(), Some(primary.root()));
        assert_eq!(grafted_root.grafted_from(), Some(Id::new("sub")));
        let derived = primary.find("derived").unwrap();
        assert_eq!(primary.parent_name(derived), Some(Id::new("base")));
        assert_eq!(primary.description(derived).owner(), Some(grafted));
        assert!(primary.alternate_paths().contains("/models/sub"));

        primary.build_types();
        let aliased = primary.types().get(Id::new("sub")).unwrap();
        assert_eq!(aliased.name, "sub_model");
        assert_eq!(primary.types().get(Id::new("derived")).unwrap().parent, Some(Id::new("base")));
    }

    #[test]
    fn test_own_description_shadows_grafted_one() {
        let mut sub = model("eco_model");
        sub.add_description(sub.root(), species("wolf")).unwrap();
        sub.add_description(sub.root(), species("deer")).unwrap();
        let ids: Vec<DescriptionId> = sub.iter().map(|(id, _)| id).collect();
        for id in ids {
            sub.description_mut(id).close();
        }

        let mut primary = model("main_model");
        primary.graft(Id::new("eco"), sub).unwrap();
        let own = primary.add_description(primary.root(), species("wolf")).unwrap();
        primary.build_types();

        assert_eq!(primary.find("wolf"), Some(own));
        assert_eq!(primary.types().get(Id::new("wolf")).unwrap().description, own);
        let deer = primary.find("deer").unwrap();
        assert_eq!(primary.description(deer).grafted_from(), Some(Id::new("eco")));
    }
}
