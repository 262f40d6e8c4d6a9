use rusqlite::types::Value;
use rusqlite::Row;
use serde::Serialize;
use std::fmt;

use crate::orm::Entity;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Department {
    id: Option<i64>,
    pub name: String,
    pub location: String,
}

impl Department {
    /// A transient department; `Repository::create` or `save` assigns the id.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Department {}: {}, {}>", id, self.name, self.location),
            None => write!(f, "<Department None: {}, {}>", self.name, self.location),
        }
    }
}

impl Entity for Department {
    const NAME: &'static str = "department";
    const TABLE: &'static str = "departments";
    const COLUMNS: &'static [(&'static str, &'static str)] = &[("name", "TEXT"), ("location", "TEXT")];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.location.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            location: row.get(2)?,
        })
    }
}
