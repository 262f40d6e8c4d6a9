use rusqlite::types::Value;
use rusqlite::Row;
use serde::Serialize;
use std::fmt;

use crate::orm::entity::select_sql;
use crate::orm::{Entity, Repository, Shared};
use crate::storage::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Employee {
    id: Option<i64>,
    pub name: String,
    pub job_title: String,
    /// Advisory: no foreign key backs this column.
    pub department_id: Option<i64>,
}

impl Employee {
    pub fn new(name: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            job_title: job_title.into(),
            department_id: None,
        }
    }

    pub fn with_department(mut self, department_id: i64) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Employee {}: {}, {}", id, self.name, self.job_title)?,
            None => write!(f, "<Employee None: {}, {}", self.name, self.job_title)?,
        }
        if let Some(department_id) = self.department_id {
            write!(f, ", Department ID: {}", department_id)?;
        }
        write!(f, ">")
    }
}

impl Entity for Employee {
    const NAME: &'static str = "employee";
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("name", "TEXT"),
        ("job_title", "TEXT"),
        ("department_id", "INTEGER"),
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.job_title.clone()),
            self.department_id.map_or(Value::Null, Value::Integer),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            job_title: row.get(2)?,
            department_id: row.get(3)?,
        })
    }
}

impl Repository<'_, Employee> {
    /// Employees referencing `department_id`, in storage order.
    pub fn find_by_department(&mut self, department_id: i64) -> Result<Vec<Shared<Employee>>> {
        let sql = format!("{} WHERE department_id = ?1", select_sql::<Employee>());
        self.fetch(&sql, &[&department_id])
    }
}
