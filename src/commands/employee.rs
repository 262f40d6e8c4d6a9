use anyhow::{anyhow, Context, Result};

use super::{print_instance, print_json, snapshot, CommandRunner, Deleted};
use crate::cli;
use crate::model::Employee;
use crate::orm::{Entity, Session, Shared};
use crate::storage::StoreError;

fn load(session: &mut Session, id: i64) -> Result<Shared<Employee>> {
    session
        .employees()
        .find_by_id(id)
        .context("loading employee")?
        .ok_or_else(|| {
            StoreError::NotFound {
                entity: Employee::NAME,
                id,
            }
            .into()
        })
}

/// References are advisory, so a missing department only warrants a warning.
fn warn_if_dangling(session: &mut Session, department_id: Option<i64>) -> Result<()> {
    if let Some(department_id) = department_id {
        if session.departments().find_by_id(department_id)?.is_none() {
            log::warn!("department {} does not exist", department_id);
        }
    }
    Ok(())
}

impl CommandRunner for cli::EmployeeCmd {
    fn run(&self, session: &mut Session) -> Result<()> {
        match self {
            cli::EmployeeCmd::List { department } => {
                let employees = match department {
                    Some(department_id) => session.employees().find_by_department(*department_id)?,
                    None => session.employees().get_all()?,
                };
                print_json(&snapshot(&employees))
            }
            cli::EmployeeCmd::Show { id } => {
                let employee = load(session, *id)?;
                print_instance(&employee)
            }
            cli::EmployeeCmd::Find { name } => {
                let employee = session
                    .employees()
                    .find_by_name(name)?
                    .ok_or_else(|| anyhow!("employee named {name:?} not found"))?;
                print_instance(&employee)
            }
            cli::EmployeeCmd::Create {
                name,
                job_title,
                department,
            } => {
                warn_if_dangling(session, *department)?;
                let mut record = Employee::new(name.as_str(), job_title.as_str());
                record.department_id = *department;
                let employee = session
                    .employees()
                    .create(record)
                    .context("creating employee")?;
                log::info!("created {}", employee.borrow());
                print_instance(&employee)
            }
            cli::EmployeeCmd::Update {
                id,
                name,
                job_title,
                department,
                clear_department,
            } => {
                warn_if_dangling(session, *department)?;
                let employee = load(session, *id)?;
                {
                    let mut fields = employee.borrow_mut();
                    if let Some(name) = name {
                        fields.name = name.clone();
                    }
                    if let Some(job_title) = job_title {
                        fields.job_title = job_title.clone();
                    }
                    if *clear_department {
                        fields.department_id = None;
                    } else if department.is_some() {
                        fields.department_id = *department;
                    }
                }
                session
                    .employees()
                    .update(&employee)
                    .context("updating employee")?;
                log::info!("updated {}", employee.borrow());
                print_instance(&employee)
            }
            cli::EmployeeCmd::Delete { id } => {
                let employee = load(session, *id)?;
                session
                    .employees()
                    .delete(&employee)
                    .context("deleting employee")?;
                log::info!("deleted employee {}", id);
                print_json(&Deleted {
                    entity: Employee::NAME,
                    id: *id,
                })
            }
        }
    }
}
