//! Class service
//!
//! CRUD for classes with name uniqueness checks and audit logging.

use crate::audit::{generate_diff, EntityType};
use crate::error::{SchoolError, SchoolResult};
use crate::models::{Class, ClassId, ClassInput};
use crate::storage::Storage;

/// Service for class management
pub struct ClassService<'a> {
    storage: &'a Storage,
}

impl<'a> ClassService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a class and return its ID
    pub fn create(&self, input: ClassInput) -> SchoolResult<ClassId> {
        let input = input
            .validate()
            .map_err(|e| SchoolError::Validation(e.to_string()))?;

        let classes = self.storage.classes();
        if classes.name_exists(&input.name, None)? {
            return Err(SchoolError::Validation(format!(
                "A class named '{}' already exists",
                input.name
            )));
        }

        let id = classes.insert(&input)?;
        if let Some(class) = classes.get(id)? {
            self.storage
                .log_create(EntityType::Class, id.to_string(), Some(class.name.clone()), &class)?;
        }

        Ok(id)
    }

    /// Replace a class's fields; false when the class does not exist
    pub fn update(&self, id: ClassId, input: ClassInput) -> SchoolResult<bool> {
        let input = input
            .validate()
            .map_err(|e| SchoolError::Validation(e.to_string()))?;

        let classes = self.storage.classes();
        let Some(before) = classes.get(id)? else {
            return Ok(false);
        };

        if classes.name_exists(&input.name, Some(id))? {
            return Err(SchoolError::Validation(format!(
                "A class named '{}' already exists",
                input.name
            )));
        }

        if !classes.update(id, &input)? {
            return Ok(false);
        }

        if let Some(after) = classes.get(id)? {
            self.storage.log_update(
                EntityType::Class,
                id.to_string(),
                Some(after.name.clone()),
                &before,
                &after,
                generate_diff(&before, &after),
            )?;
        }

        Ok(true)
    }

    /// Delete classes; false when none of them existed
    ///
    /// A class that still has charges referencing it cannot be deleted.
    pub fn delete(&self, ids: &[ClassId]) -> SchoolResult<bool> {
        let classes = self.storage.classes();

        let mut existing = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(class) = classes.get(*id)? {
                existing.push(class);
            }
        }

        let deleted = classes.delete(ids)?;

        for class in &existing {
            self.storage.log_delete(
                EntityType::Class,
                class.id.to_string(),
                Some(class.name.clone()),
                class,
            )?;
        }

        Ok(deleted > 0)
    }

    /// Every class, or only the one with `id`
    pub fn list(&self, id: Option<ClassId>) -> SchoolResult<Vec<Class>> {
        self.storage.classes().list(id)
    }

    pub fn get(&self, id: ClassId) -> SchoolResult<Option<Class>> {
        self.storage.classes().get(id)
    }

    /// Find a class by ID (`cls-3` or `3`) or by exact name
    pub fn find(&self, identifier: &str) -> SchoolResult<Option<Class>> {
        if let Ok(id) = identifier.parse::<ClassId>() {
            if let Some(class) = self.get(id)? {
                return Ok(Some(class));
            }
        }

        Ok(self
            .list(None)?
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier.trim())))
    }
}
