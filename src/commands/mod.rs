use serde::Serialize;

use crate::cli::Command;
use crate::orm::{Entity, Session, Shared};
use crate::seed;

pub mod department;
pub mod employee;

pub trait CommandRunner {
    fn run(&self, session: &mut Session) -> anyhow::Result<()>;
}

impl Command {
    pub fn run(&self, session: &mut Session) -> anyhow::Result<()> {
        match self {
            Command::Init => {
                session.create_tables()?;
                print_json(&Tables {
                    tables: vec!["departments", "employees"],
                })
            }
            Command::Seed => {
                let summary = seed::reset_database(session)?;
                print_json(&summary)
            }
            Command::Department { cmd } => cmd.run(session),
            Command::Employee { cmd } => cmd.run(session),
        }
    }
}

#[derive(Serialize)]
struct Tables {
    tables: Vec<&'static str>,
}

#[derive(Serialize)]
pub(crate) struct Deleted {
    pub entity: &'static str,
    pub id: i64,
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_instance<E: Entity + Serialize>(instance: &Shared<E>) -> anyhow::Result<()> {
    let record = instance.borrow();
    print_json(&*record)
}

/// Detach the current field values of live handles for printing.
pub(crate) fn snapshot<E: Entity>(instances: &[Shared<E>]) -> Vec<E> {
    instances.iter().map(|i| i.borrow().clone()).collect()
}
