use anyhow::{anyhow, Context, Result};

use super::{print_instance, print_json, snapshot, CommandRunner, Deleted};
use crate::cli;
use crate::model::Department;
use crate::orm::{Entity, Session, Shared};
use crate::storage::StoreError;

fn load(session: &mut Session, id: i64) -> Result<Shared<Department>> {
    session
        .departments()
        .find_by_id(id)
        .context("loading department")?
        .ok_or_else(|| {
            StoreError::NotFound {
                entity: Department::NAME,
                id,
            }
            .into()
        })
}

impl CommandRunner for cli::DepartmentCmd {
    fn run(&self, session: &mut Session) -> Result<()> {
        match self {
            cli::DepartmentCmd::List => {
                let all = session.departments().get_all()?;
                print_json(&snapshot(&all))
            }
            cli::DepartmentCmd::Show { id } => {
                let department = load(session, *id)?;
                print_instance(&department)
            }
            cli::DepartmentCmd::Find { name } => {
                let department = session
                    .departments()
                    .find_by_name(name)?
                    .ok_or_else(|| anyhow!("department named {name:?} not found"))?;
                print_instance(&department)
            }
            cli::DepartmentCmd::Create { name, location } => {
                let department = session
                    .departments()
                    .create(Department::new(name.as_str(), location.as_str()))
                    .context("creating department")?;
                log::info!("created {}", department.borrow());
                print_instance(&department)
            }
            cli::DepartmentCmd::Update { id, name, location } => {
                let department = load(session, *id)?;
                {
                    let mut fields = department.borrow_mut();
                    if let Some(name) = name {
                        fields.name = name.clone();
                    }
                    if let Some(location) = location {
                        fields.location = location.clone();
                    }
                }
                session
                    .departments()
                    .update(&department)
                    .context("updating department")?;
                log::info!("updated {}", department.borrow());
                print_instance(&department)
            }
            cli::DepartmentCmd::Delete { id } => {
                let department = load(session, *id)?;
                session
                    .departments()
                    .delete(&department)
                    .context("deleting department")?;
                log::info!("deleted department {}", id);
                print_json(&Deleted {
                    entity: Department::NAME,
                    id: *id,
                })
            }
        }
    }
}
