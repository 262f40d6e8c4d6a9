use super::entity::Shared;
use super::identity::IdentityMap;
use super::repository::Repository;
use crate::model::{Department, Employee};
use crate::storage::{Result, SqliteStorage};

/// A unit of work: one connection plus the identity maps of every entity
/// type. Dropping the session discards its caches.
pub struct Session {
    storage: SqliteStorage,
    departments: IdentityMap<Department>,
    employees: IdentityMap<Employee>,
}

impl Session {
    pub fn new(storage: SqliteStorage) -> Self {
        Self {
            storage,
            departments: IdentityMap::new(),
            employees: IdentityMap::new(),
        }
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn into_storage(self) -> SqliteStorage {
        self.storage
    }

    pub fn departments(&mut self) -> Repository<'_, Department> {
        Repository::new(self.storage.conn(), &mut self.departments)
    }

    pub fn employees(&mut self) -> Repository<'_, Employee> {
        Repository::new(self.storage.conn(), &mut self.employees)
    }

    pub fn cached_departments(&self) -> &IdentityMap<Department> {
        &self.departments
    }

    pub fn cached_employees(&self) -> &IdentityMap<Employee> {
        &self.employees
    }

    pub fn create_tables(&mut self) -> Result<()> {
        self.departments().create_table()?;
        self.employees().create_table()
    }

    pub fn drop_tables(&mut self) -> Result<()> {
        self.employees().drop_table()?;
        self.departments().drop_table()
    }

    /// Resolve an employee's department reference. A dangling reference
    /// resolves to `None`.
    pub fn department_of(&mut self, employee: &Employee) -> Result<Option<Shared<Department>>> {
        match employee.department_id {
            Some(id) => self.departments().find_by_id(id),
            None => Ok(None),
        }
    }

    /// Forget every cached instance without touching the database.
    pub fn clear(&mut self) {
        self.departments.clear();
        self.employees.clear();
    }

    /// Run `f` inside one SQLite transaction: commit on `Ok`, roll back on
    /// `Err`. After a rollback the identity maps hold the same instances as
    /// before `f`: instances cached during `f` become transient again and
    /// instances deleted during `f` get their ids back.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        let departments = self.departments.snapshot();
        let employees = self.employees.snapshot();

        self.storage.conn().execute_batch("BEGIN IMMEDIATE")?;
        log::debug!("transaction started");

        let outcome = f(&mut *self).and_then(|value| {
            self.storage.conn().execute_batch("COMMIT")?;
            Ok(value)
        });

        match outcome {
            Ok(value) => {
                log::debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.storage.conn().execute_batch("ROLLBACK") {
                    log::error!("rollback failed: {}", rollback_err);
                }
                self.departments.restore(departments);
                self.employees.restore(employees);
                log::warn!("transaction rolled back: {}", err);
                Err(err)
            }
        }
    }
}
