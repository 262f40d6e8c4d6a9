use rusqlite::types::Value;
use rusqlite::Row;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A live, session-owned instance. Two handles to the same row compare equal
/// under `Rc::ptr_eq`.
pub type Shared<E> = Rc<RefCell<E>>;

/// A record mapped onto one table with an `INTEGER PRIMARY KEY` named `id`.
pub trait Entity: Sized + Clone + fmt::Debug + fmt::Display {
    /// Singular name used in errors and logs.
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Every column after `id`, as `(name, sql type)`.
    const COLUMNS: &'static [(&'static str, &'static str)];

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    /// Column values in `COLUMNS` order.
    fn values(&self) -> Vec<Value>;

    /// Decode a row selected as `id` followed by `COLUMNS`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

pub(crate) fn column_list<E: Entity>() -> String {
    E::COLUMNS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn create_table_sql<E: Entity>() -> String {
    let columns = E::COLUMNS
        .iter()
        .map(|(name, ty)| format!("{name} {ty}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY, {columns})",
        E::TABLE
    )
}

pub(crate) fn select_sql<E: Entity>() -> String {
    format!("SELECT id, {} FROM {}", column_list::<E>(), E::TABLE)
}

pub(crate) fn insert_sql<E: Entity>() -> String {
    let placeholders = (1..=E::COLUMNS.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        E::TABLE,
        column_list::<E>()
    )
}

/// The id is bound last, after every column.
pub(crate) fn update_sql<E: Entity>() -> String {
    let assignments = E::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{name} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE id = ?{}",
        E::TABLE,
        E::COLUMNS.len() + 1
    )
}
