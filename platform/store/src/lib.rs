//! In-memory storage primitives. The registry lives for one process run.

use std::collections::HashMap;

use entity::{Employee, EmployeeInput};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no employee matches the requested id")]
    NotFound,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed employee collection. Records are indexed by id for lookup and a
/// secondary id list keeps creation order for listing.
#[derive(Debug, Default)]
pub struct Registry {
    records: HashMap<String, Employee>,
    order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All employees in creation order.
    pub fn list(&self) -> Vec<Employee> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect()
    }

    /// Stores a new record under a fresh uuid, ignoring any id the payload
    /// carries, and returns it.
    pub fn create(&mut self, input: EmployeeInput) -> Employee {
        let id = Uuid::new_v4().to_string();
        let employee = Employee {
            id: id.clone(),
            name: input.name,
            position: input.position,
            department: input.department,
        };
        self.records.insert(id.clone(), employee.clone());
        self.order.push(id);
        employee
    }

    pub fn get(&self, id: &str) -> StoreResult<Employee> {
        self.records.get(id).cloned().ok_or(StoreError::NotFound)
    }

    /// Overwrites every field of an existing record with the payload; the
    /// stored id wins over whatever the payload carries. The record keeps
    /// its place in the listing.
    pub fn replace(&mut self, id: &str, input: EmployeeInput) -> StoreResult<Employee> {
        let slot = self.records.get_mut(id).ok_or(StoreError::NotFound)?;
        *slot = Employee {
            id: id.to_string(),
            name: input.name,
            position: input.position,
            department: input.department,
        };
        Ok(slot.clone())
    }

    /// Removes the record with the requested id and returns it.
    pub fn remove(&mut self, id: &str) -> StoreResult<Employee> {
        let removed = self.records.remove(id).ok_or(StoreError::NotFound)?;
        self.order.retain(|stored| stored != id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, department: &str) -> EmployeeInput {
        EmployeeInput {
            id: None,
            name: name.into(),
            position: None,
            department: department.into(),
        }
    }

    #[test]
    fn create_assigns_fresh_unique_ids() {
        let mut registry = Registry::new();
        let first = registry.create(input("Ana", "Sales"));
        let second = registry.create(input("Bo", "Ops"));
        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn create_ignores_client_supplied_id() {
        let mut registry = Registry::new();
        let payload = EmployeeInput {
            id: Some("custom-id".into()),
            ..input("Ana", "Sales")
        };
        let stored = registry.create(payload);
        assert_ne!(stored.id, "custom-id");
        assert!(registry.get("custom-id").is_err());
    }

    #[test]
    fn list_preserves_creation_order() {
        let mut registry = Registry::new();
        assert!(registry.list().is_empty());
        let a = registry.create(input("Ana", "Sales"));
        let b = registry.create(input("Bo", "Ops"));
        let c = registry.create(input("Cy", "Legal"));
        let ids: Vec<_> = registry.list().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a.id.clone(), b.id.clone(), c.id.clone()]);

        registry.remove(&b.id).unwrap();
        let d = registry.create(input("Di", "Sales"));
        let ids: Vec<_> = registry.list().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a.id, c.id, d.id]);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let registry = Registry::new();
        assert_eq!(registry.get("missing"), Err(StoreError::NotFound));
    }

    #[test]
    fn replace_overwrites_every_field_and_keeps_position() {
        let mut registry = Registry::new();
        let first = registry.create(EmployeeInput {
            position: Some("Rep".into()),
            ..input("Ana", "Sales")
        });
        let second = registry.create(input("Bo", "Ops"));

        let updated = registry
            .replace(
                &first.id,
                EmployeeInput {
                    id: Some("payload-id".into()),
                    ..input("Ana B", "Marketing")
                },
            )
            .unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.name, "Ana B");
        assert_eq!(updated.department, "Marketing");
        assert_eq!(updated.position, None);

        let ids: Vec<_> = registry.list().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn replace_unknown_id_leaves_registry_unchanged() {
        let mut registry = Registry::new();
        let existing = registry.create(input("Ana", "Sales"));
        let err = registry.replace("missing", input("Bo", "Ops")).unwrap_err();
        assert_eq!(err, StoreError::NotFound);
        assert_eq!(registry.list(), vec![existing]);
    }

    #[test]
    fn remove_deletes_only_the_requested_record() {
        let mut registry = Registry::new();
        let first = registry.create(input("Ana", "Sales"));
        let second = registry.create(input("Bo", "Ops"));

        assert_eq!(registry.remove("missing"), Err(StoreError::NotFound));
        assert_eq!(registry.len(), 2);

        let removed = registry.remove(&second.id).unwrap();
        assert_eq!(removed.id, second.id);
        assert_eq!(registry.get(&second.id), Err(StoreError::NotFound));
        assert_eq!(registry.get(&first.id).unwrap().id, first.id);
    }

    #[test]
    fn remove_on_empty_registry_is_not_found() {
        let mut registry = Registry::new();
        assert_eq!(registry.remove("anything"), Err(StoreError::NotFound));
    }
}
