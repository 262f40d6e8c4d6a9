use rusqlite::types::ToSql;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::cell::RefCell;
use std::rc::Rc;

use super::entity::{self, Entity, Shared};
use super::identity::IdentityMap;
use crate::storage::{Result, StoreError};

/// CRUD for one entity type, bound to a session's connection and identity
/// map. Obtained from `Session::departments` / `Session::employees`.
///
/// Outside `Session::transaction` each statement commits on its own.
pub struct Repository<'s, E: Entity> {
    conn: &'s Connection,
    identity: &'s mut IdentityMap<E>,
}

impl<'s, E: Entity> Repository<'s, E> {
    pub(crate) fn new(conn: &'s Connection, identity: &'s mut IdentityMap<E>) -> Self {
        Self { conn, identity }
    }

    pub fn create_table(&self) -> Result<()> {
        self.conn.execute_batch(&entity::create_table_sql::<E>())?;
        log::info!("ensured table {}", E::TABLE);
        Ok(())
    }

    /// Drop the table. Cached instances of it become transient.
    pub fn drop_table(&mut self) -> Result<()> {
        self.identity.ensure_idle()?;
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {}", E::TABLE))?;
        self.identity.invalidate();
        log::info!("dropped table {}", E::TABLE);
        Ok(())
    }

    /// Persist a transient record and return its live handle.
    pub fn create(&mut self, record: E) -> Result<Shared<E>> {
        let instance = Rc::new(RefCell::new(record));
        self.save(&instance)?;
        Ok(instance)
    }

    /// Insert a row for a transient instance and register it under the
    /// generated id.
    pub fn save(&mut self, instance: &Shared<E>) -> Result<()> {
        let mut record = instance
            .try_borrow_mut()
            .map_err(|_| StoreError::InstanceBusy { entity: E::NAME })?;
        if let Some(id) = record.id() {
            return Err(StoreError::AlreadyPersisted {
                entity: E::NAME,
                id,
            });
        }

        self.conn
            .execute(&entity::insert_sql::<E>(), params_from_iter(record.values()))?;
        let id = self.conn.last_insert_rowid();
        record.set_id(Some(id));
        drop(record);

        self.identity.insert(id, Rc::clone(instance));
        log::debug!("inserted {} {}", E::NAME, id);
        Ok(())
    }

    pub fn update(&mut self, instance: &Shared<E>) -> Result<()> {
        let record = instance
            .try_borrow()
            .map_err(|_| StoreError::InstanceBusy { entity: E::NAME })?;
        let id = record
            .id()
            .ok_or(StoreError::NotPersisted { entity: E::NAME })?;

        let mut values = record.values();
        values.push(id.into());
        let affected = self
            .conn
            .execute(&entity::update_sql::<E>(), params_from_iter(values))?;
        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: E::NAME,
                id,
            });
        }

        log::debug!("updated {} {}", E::NAME, id);
        Ok(())
    }

    /// Delete the row, evict it and clear the instance's id. If a different
    /// handle is cached for the same id, its id is cleared as well.
    ///
    /// When the row is already gone the eviction and reset still happen and
    /// `NotFound` is returned.
    pub fn delete(&mut self, instance: &Shared<E>) -> Result<()> {
        let busy = || StoreError::InstanceBusy { entity: E::NAME };
        let mut record = instance.try_borrow_mut().map_err(|_| busy())?;
        let id = record
            .id()
            .ok_or(StoreError::NotPersisted { entity: E::NAME })?;
        let alias = self
            .identity
            .get(id)
            .filter(|cached| !Rc::ptr_eq(cached, instance));
        let mut alias_record = alias
            .as_ref()
            .map(|cached| cached.try_borrow_mut())
            .transpose()
            .map_err(|_| busy())?;

        let affected = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", E::TABLE),
            [id],
        )?;

        self.identity.evict(id);
        record.set_id(None);
        if let Some(cached) = alias_record.as_mut() {
            cached.set_id(None);
        }

        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: E::NAME,
                id,
            });
        }
        log::debug!("deleted {} {}", E::NAME, id);
        Ok(())
    }

    /// Hydrate a raw row selected as `id` followed by the entity's columns.
    pub fn instance_from_db(&mut self, row: &Row<'_>) -> Result<Shared<E>> {
        let record = E::from_row(row)?;
        self.hydrate(record)
    }

    /// Reconcile a record read from storage with the identity map. Row wins:
    /// if the id is cached, the cached instance takes the record's field
    /// values and is returned.
    pub fn hydrate(&mut self, record: E) -> Result<Shared<E>> {
        let id = record
            .id()
            .ok_or(StoreError::NotPersisted { entity: E::NAME })?;
        self.identity.reconcile(id, record)
    }

    /// Every row, in storage order.
    pub fn get_all(&mut self) -> Result<Vec<Shared<E>>> {
        self.fetch(&entity::select_sql::<E>(), &[])
    }

    pub fn find_by_id(&mut self, id: i64) -> Result<Option<Shared<E>>> {
        let sql = format!("{} WHERE id = ?1", entity::select_sql::<E>());
        self.fetch_one(&sql, &[&id])
    }

    /// First row whose name matches, in storage order.
    pub fn find_by_name(&mut self, name: &str) -> Result<Option<Shared<E>>> {
        let sql = format!("{} WHERE name IS ?1", entity::select_sql::<E>());
        self.fetch_one(&sql, &[&name])
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", E::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    pub fn cached(&self) -> &IdentityMap<E> {
        &*self.identity
    }

    pub(crate) fn fetch(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Shared<E>>> {
        let conn = self.conn;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(self.instance_from_db(row)?);
        }
        Ok(out)
    }

    fn fetch_one(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<Option<Shared<E>>> {
        let record = self
            .conn
            .query_row(sql, params, E::from_row)
            .optional()?;
        record.map(|record| self.hydrate(record)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Department;
    use crate::orm::Session;
    use crate::storage::SqliteStorage;

    fn session() -> Session {
        let mut session = Session::new(SqliteStorage::open_in_memory().unwrap());
        session.departments().create_table().unwrap();
        session
    }

    #[test]
    fn create_assigns_ids_and_caches() {
        let mut session = session();
        let mut departments = session.departments();

        let payroll = departments
            .create(Department::new("Payroll", "Building A, 5th Floor"))
            .unwrap();

        assert_eq!(payroll.borrow().id(), Some(1));
        assert!(departments.cached().contains(1));
        assert_eq!(departments.count().unwrap(), 1);
    }

    #[test]
    fn save_refuses_persistent_instances() {
        let mut session = session();
        let mut departments = session.departments();
        let payroll = departments
            .create(Department::new("Payroll", "Building A"))
            .unwrap();

        let err = departments.save(&payroll).unwrap_err();

        assert!(matches!(
            err,
            StoreError::AlreadyPersisted {
                entity: "department",
                id: 1
            }
        ));
        assert_eq!(departments.count().unwrap(), 1);
    }

    #[test]
    fn update_of_transient_instance_is_rejected() {
        let mut session = session();
        let mut departments = session.departments();
        let transient = Rc::new(RefCell::new(Department::new("Payroll", "A")));

        let err = departments.update(&transient).unwrap_err();
        assert!(matches!(err, StoreError::NotPersisted { .. }));

        let err = departments.delete(&transient).unwrap_err();
        assert!(matches!(err, StoreError::NotPersisted { .. }));
    }

    #[test]
    fn update_reports_missing_rows() {
        let mut session = session();
        let payroll = session
            .departments()
            .create(Department::new("Payroll", "A"))
            .unwrap();
        session
            .storage()
            .conn()
            .execute("DELETE FROM departments", [])
            .unwrap();

        let err = session.departments().update(&payroll).unwrap_err();

        assert!(err.is_not_found(), "{err:?}");
    }

    #[test]
    fn delete_of_missing_row_still_evicts() {
        let mut session = session();
        let payroll = session
            .departments()
            .create(Department::new("Payroll", "A"))
            .unwrap();
        session
            .storage()
            .conn()
            .execute("DELETE FROM departments", [])
            .unwrap();

        let err = session.departments().delete(&payroll).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(payroll.borrow().id(), None);
        assert!(session.cached_departments().is_empty());
    }

    #[test]
    fn hydrate_rejects_records_without_id() {
        let mut session = session();
        let err = session
            .departments()
            .hydrate(Department::new("Payroll", "A"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotPersisted { .. }));
    }

    #[test]
    fn instance_from_db_reuses_cached_instance() {
        let mut session = session();
        let payroll = session
            .departments()
            .create(Department::new("Payroll", "Building A"))
            .unwrap();
        session
            .storage()
            .conn()
            .execute(
                "UPDATE departments SET location = 'Building B' WHERE id = 1",
                [],
            )
            .unwrap();

        let hydrated = session.departments().get_all().unwrap();

        assert_eq!(hydrated.len(), 1);
        assert!(Rc::ptr_eq(&payroll, &hydrated[0]));
        assert_eq!(payroll.borrow().location, "Building B");
    }

    #[test]
    fn query_while_holding_a_borrow_reports_busy_instance() {
        let mut session = session();
        let payroll = session
            .departments()
            .create(Department::new("Payroll", "Building A"))
            .unwrap();

        let held = payroll.borrow();
        let err = session.departments().find_by_name(&held.name).unwrap_err();

        assert!(matches!(err, StoreError::InstanceBusy { entity: "department" }));
        assert_eq!(held.location, "Building A");
        drop(held);
        let found = session.departments().find_by_name("Payroll").unwrap().unwrap();
        assert!(Rc::ptr_eq(&found, &payroll));
    }

    #[test]
    fn writes_refuse_borrowed_instances() {
        let mut session = session();
        let payroll = session
            .departments()
            .create(Department::new("Payroll", "A"))
            .unwrap();
        let transient = Rc::new(RefCell::new(Department::new("Marketing", "B")));

        {
            let _held = transient.borrow();
            let err = session.departments().save(&transient).unwrap_err();
            assert!(matches!(err, StoreError::InstanceBusy { .. }));
        }
        {
            let _held = payroll.borrow_mut();
            let err = session.departments().update(&payroll).unwrap_err();
            assert!(matches!(err, StoreError::InstanceBusy { .. }));
        }
        {
            let _held = payroll.borrow();
            let err = session.departments().delete(&payroll).unwrap_err();
            assert!(matches!(err, StoreError::InstanceBusy { .. }));
            let err = session.departments().drop_table().unwrap_err();
            assert!(matches!(err, StoreError::InstanceBusy { .. }));
        }

        assert_eq!(session.departments().count().unwrap(), 1);
        assert_eq!(payroll.borrow().id(), Some(1));
        assert_eq!(transient.borrow().id(), None);
    }

    #[test]
    fn delete_through_stale_handle_resets_the_cached_one() {
        let mut session = session();
        let stale = session
            .departments()
            .create(Department::new("Payroll", "A"))
            .unwrap();
        session.clear();
        let current = session.departments().find_by_id(1).unwrap().unwrap();
        assert!(!Rc::ptr_eq(&stale, &current));

        session.departments().delete(&stale).unwrap();

        assert_eq!(stale.borrow().id(), None);
        assert_eq!(current.borrow().id(), None);
        assert!(session.cached_departments().is_empty());
        assert!(session.departments().find_by_id(1).unwrap().is_none());
    }

    #[test]
    fn queries_without_table_surface_sqlite_errors() {
        let mut session = Session::new(SqliteStorage::open_in_memory().unwrap());

        let err = session.departments().find_by_id(1).unwrap_err();

        assert!(matches!(err, StoreError::Sqlite(_)), "{err:?}");
    }
}
