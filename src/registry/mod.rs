//! Body registry
//!
//! Both orbit models keep their bodies in a [`Registry`]: an insertion-ordered
//! store with a name index. Drawing order and legend order follow insertion
//! order, so iteration is always deterministic.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::celestial::BodyId;
use crate::{OrreryError, Result};

/// Anything stored in a registry has a unique name
pub trait Named {
    fn name(&self) -> &str;
}

/// Bodies that may orbit another body of the same registry as a moon
pub trait Satellite {
    /// The body this one circles as a moon, if any
    fn primary(&self) -> Option<BodyId>;
}

/// Insertion-ordered collection of named bodies
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<T>,
    by_name: HashMap<String, BodyId>,
}

impl<T: Named> Registry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Add a body, returning its handle
    ///
    /// Fails if a body with the same name is already registered.
    pub fn insert(&mut self, entry: T) -> Result<BodyId> {
        let name = entry.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(OrreryError::DuplicateName(name));
        }

        let id = BodyId(self.entries.len());
        debug!("registered {} as body #{}", name, id.index());
        self.by_name.insert(name, id);
        self.entries.push(entry);
        Ok(id)
    }

    /// Get a body by handle
    pub fn get(&self, id: BodyId) -> Option<&T> {
        self.entries.get(id.0)
    }

    /// Get a mutable body by handle
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut T> {
        self.entries.get_mut(id.0)
    }

    /// Get a body by name
    pub fn get_by_name(&self, name: &str) -> Option<&T> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Handle of the body with the given name
    pub fn id_of(&self, name: &str) -> Option<BodyId> {
        self.by_name.get(name).copied()
    }

    /// Handle of the body with the given name, or an error naming it
    pub fn require(&self, name: &str) -> Result<BodyId> {
        self.id_of(name)
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))
    }

    /// True if the handle points into this registry
    pub fn contains(&self, id: BodyId) -> bool {
        id.0 < self.entries.len()
    }

    /// Bodies with their handles, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (BodyId(index), entry))
    }

    /// Names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Named::name)
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Named + Satellite> Registry<T> {
    /// Handles of every body that at least one satellite orbits, in
    /// insertion order
    pub fn parents_with_satellites(&self) -> Vec<BodyId> {
        let parents: BTreeSet<BodyId> = self
            .entries
            .iter()
            .filter_map(Satellite::primary)
            .filter(|id| self.contains(*id))
            .collect();
        parents.into_iter().collect()
    }

    /// Handles of the satellites of `parent`, in insertion order
    pub fn satellites_of(&self, parent: BodyId) -> Vec<BodyId> {
        self.iter()
            .filter(|(_, entry)| entry.primary() == Some(parent))
            .map(|(id, _)| id)
            .collect()
    }
}

impl<T: Named> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Rock {
        name: &'static str,
        primary: Option<BodyId>,
    }

    impl Named for Rock {
        fn name(&self) -> &str {
            self.name
        }
    }

    impl Satellite for Rock {
        fn primary(&self) -> Option<BodyId> {
            self.primary
        }
    }

    fn rock(name: &'static str, primary: Option<BodyId>) -> Rock {
        Rock { name, primary }
    }

    #[test]
    fn test_insertion_order_and_lookup() {
        let mut registry = Registry::new();
        let sun = registry.insert(rock("Sun", None)).unwrap();
        let mars = registry.insert(rock("Mars", None)).unwrap();
        let earth = registry.insert(rock("Earth", None)).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["Sun", "Mars", "Earth"]);
        assert_eq!(registry.id_of("Earth"), Some(earth));
        assert_eq!(registry.get(mars).unwrap().name, "Mars");
        assert_eq!(registry.get_by_name("Sun").unwrap().name, "Sun");
        assert_eq!(sun.index(), 0);
        assert!(registry.get_by_name("Pluto").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = Registry::new();
        registry.insert(rock("Earth", None)).unwrap();
        let err = registry.insert(rock("Earth", None)).unwrap_err();
        assert!(matches!(err, OrreryError::DuplicateName(ref n) if n == "Earth"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_require_unknown() {
        let registry: Registry<Rock> = Registry::new();
        let err = registry.require("Vulcan").unwrap_err();
        assert!(err.is_configuration());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_parents_with_satellites() {
        let mut registry = Registry::new();
        let sun = registry.insert(rock("Sun", None)).unwrap();
        let earth = registry.insert(rock("Earth", None)).unwrap();
        let mars = registry.insert(rock("Mars", None)).unwrap();
        let _venus = registry.insert(rock("Venus", None)).unwrap();
        let deimos = registry.insert(rock("Deimos", Some(mars))).unwrap();
        let moon = registry.insert(rock("Moon", Some(earth))).unwrap();
        let phobos = registry.insert(rock("Phobos", Some(mars))).unwrap();

        assert_eq!(registry.parents_with_satellites(), vec![earth, mars]);
        assert_eq!(registry.satellites_of(mars), vec![deimos, phobos]);
        assert_eq!(registry.satellites_of(earth), vec![moon]);
        assert!(registry.satellites_of(sun).is_empty());
    }
}
