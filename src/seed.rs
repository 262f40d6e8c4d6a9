use serde::Serialize;

use crate::model::{Department, Employee};
use crate::orm::Session;
use crate::storage::{Result, StoreError};

const DEPARTMENTS: &[(&str, &str)] = &[
    ("Payroll", "Building A, 5th Floor"),
    ("Human Resources", "Building C, East Wing"),
];

/// `(name, job title, index into DEPARTMENTS)`
const EMPLOYEES: &[(&str, &str, usize)] = &[
    ("Amir", "Accountant", 0),
    ("Bola", "Manager", 0),
    ("Charlie", "Manager", 1),
    ("Dani", "Benefits Coordinator", 1),
    ("Hao", "New Hires Coordinator", 1),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub departments: usize,
    pub employees: usize,
}

/// Drop and recreate both tables, then insert the sample rows in a single
/// transaction.
pub fn reset_database(session: &mut Session) -> Result<SeedSummary> {
    session.drop_tables()?;
    session.create_tables()?;

    let summary = session.transaction(|s| {
        let mut department_ids = Vec::with_capacity(DEPARTMENTS.len());
        for (name, location) in DEPARTMENTS {
            let department = s.departments().create(Department::new(*name, *location))?;
            let id = department
                .borrow()
                .id()
                .ok_or(StoreError::NotPersisted { entity: "department" })?;
            department_ids.push(id);
        }

        for (name, job_title, department) in EMPLOYEES {
            s.employees()
                .create(Employee::new(*name, *job_title).with_department(department_ids[*department]))?;
        }

        Ok(SeedSummary {
            departments: DEPARTMENTS.len(),
            employees: EMPLOYEES.len(),
        })
    })?;

    log::info!(
        "seeded {} departments and {} employees",
        summary.departments,
        summary.employees
    );
    Ok(summary)
}
