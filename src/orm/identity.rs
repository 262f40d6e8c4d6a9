use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::entity::{Entity, Shared};
use crate::storage::{Result, StoreError};

/// Maps primary keys to the single live instance a session hands out for
/// that row.
#[derive(Debug)]
pub struct IdentityMap<E> {
    entries: HashMap<i64, Shared<E>>,
}

impl<E> Default for IdentityMap<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E: Entity> IdentityMap<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: i64) -> Option<Shared<E>> {
        self.entries.get(&id).cloned()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> HashSet<i64> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn insert(&mut self, id: i64, instance: Shared<E>) {
        if self.entries.insert(id, instance).is_some() {
            log::debug!("{} {} replaced in identity map", E::NAME, id);
        }
    }

    pub(crate) fn evict(&mut self, id: i64) -> Option<Shared<E>> {
        self.entries.remove(&id)
    }

    /// Merge a freshly read row into the map. Row wins: a cached instance has
    /// every field overwritten from `record` and is returned; otherwise
    /// `record` becomes the cached instance.
    pub(crate) fn reconcile(&mut self, id: i64, record: E) -> Result<Shared<E>> {
        match self.entries.get(&id) {
            Some(cached) => {
                let mut current = cached
                    .try_borrow_mut()
                    .map_err(|_| StoreError::InstanceBusy { entity: E::NAME })?;
                *current = record;
                drop(current);
                Ok(Rc::clone(cached))
            }
            None => {
                let instance = Rc::new(RefCell::new(record));
                self.entries.insert(id, Rc::clone(&instance));
                Ok(instance)
            }
        }
    }

    /// Fails with `InstanceBusy` if any cached instance is borrowed.
    pub(crate) fn ensure_idle(&self) -> Result<()> {
        if self.entries.values().any(|i| i.try_borrow_mut().is_err()) {
            return Err(StoreError::InstanceBusy { entity: E::NAME });
        }
        Ok(())
    }

    /// The current entries, by handle.
    pub(crate) fn snapshot(&self) -> HashMap<i64, Shared<E>> {
        self.entries.clone()
    }

    /// Return to the entries captured by `snapshot`. Instances cached since
    /// then become transient; captured instances get their ids back.
    pub(crate) fn restore(&mut self, snapshot: HashMap<i64, Shared<E>>) {
        for (id, instance) in self.entries.drain() {
            let captured = snapshot
                .get(&id)
                .is_some_and(|before| Rc::ptr_eq(before, &instance));
            if !captured {
                assign_id(&instance, None);
            }
        }
        for (id, instance) in &snapshot {
            assign_id(instance, Some(*id));
        }
        self.entries = snapshot;
    }

    /// Evict everything, marking every instance transient.
    pub(crate) fn invalidate(&mut self) {
        for (_, instance) in self.entries.drain() {
            assign_id(&instance, None);
        }
    }

    /// Evict everything, leaving the instances untouched.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

fn assign_id<E: Entity>(instance: &Shared<E>, id: Option<i64>) {
    match instance.try_borrow_mut() {
        Ok(mut record) if record.id() != id => record.set_id(id),
        Ok(_) => {}
        Err(_) => log::warn!("{} instance is borrowed, id left as is", E::NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Department;

    fn row(id: i64, name: &str, location: &str) -> Department {
        let mut department = Department::new(name, location);
        department.set_id(Some(id));
        department
    }

    #[test]
    fn reconcile_returns_the_same_instance_for_the_same_id() {
        let mut map = IdentityMap::new();

        let first = map.reconcile(1, row(1, "Payroll", "Building A")).unwrap();
        let second = map.reconcile(1, row(1, "Payroll", "Building B")).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn reconcile_overwrites_local_edits_with_row_values() {
        let mut map = IdentityMap::new();
        let cached = map.reconcile(1, row(1, "Payroll", "Building A")).unwrap();
        cached.borrow_mut().location = "edited locally".to_string();

        map.reconcile(1, row(1, "Payroll", "Building C")).unwrap();

        assert_eq!(cached.borrow().location, "Building C");
        assert_eq!(cached.borrow().id(), Some(1));
    }

    #[test]
    fn reconcile_refuses_a_borrowed_instance() {
        let mut map = IdentityMap::new();
        let cached = map.reconcile(1, row(1, "Payroll", "Building A")).unwrap();
        let held = cached.borrow();

        let err = map.reconcile(1, row(1, "Payroll", "Building C")).unwrap_err();

        assert!(matches!(err, StoreError::InstanceBusy { entity: "department" }));
        assert_eq!(held.location, "Building A");
        assert!(map.ensure_idle().is_err());
        drop(held);
        assert!(map.ensure_idle().is_ok());
    }

    #[test]
    fn restore_matches_instances_by_handle_not_id() {
        let mut map = IdentityMap::new();
        let kept = map.reconcile(1, row(1, "Payroll", "A")).unwrap();
        let original = map.reconcile(2, row(2, "Human Resources", "C")).unwrap();
        let before = map.snapshot();

        map.evict(2);
        original.borrow_mut().set_id(None);
        let newcomer = map.reconcile(2, row(2, "Ghost", "Z")).unwrap();
        let added = map.reconcile(3, row(3, "Marketing", "B")).unwrap();

        map.restore(before);

        assert_eq!(map.ids(), HashSet::from([1, 2]));
        assert!(Rc::ptr_eq(&map.get(2).unwrap(), &original));
        assert_eq!(original.borrow().id(), Some(2));
        assert_eq!(kept.borrow().id(), Some(1));
        assert_eq!(newcomer.borrow().id(), None);
        assert_eq!(added.borrow().id(), None);
    }

    #[test]
    fn invalidate_and_clear_empty_the_map() {
        let mut map = IdentityMap::new();
        let a = map.reconcile(1, row(1, "Payroll", "A")).unwrap();
        map.invalidate();
        assert!(map.is_empty());
        assert_eq!(a.borrow().id(), None);

        let b = map.reconcile(2, row(2, "Payroll", "A")).unwrap();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(b.borrow().id(), Some(2));
    }

    #[test]
    fn evict_removes_only_the_given_id() {
        let mut map = IdentityMap::new();
        map.reconcile(1, row(1, "Payroll", "A")).unwrap();
        map.reconcile(2, row(2, "Human Resources", "C")).unwrap();

        assert!(map.evict(1).is_some());
        assert!(map.evict(1).is_none());
        assert_eq!(map.ids(), HashSet::from([2]));
        assert!(map.get(2).is_some());
    }
}
