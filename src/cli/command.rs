use clap::Subcommand;

use crate::cli::department_cmd::DepartmentCmd;
use crate::cli::employee_cmd::EmployeeCmd;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Create the departments and employees tables",
        long_about = "Create both tables if they do not exist yet. Existing rows are left untouched."
    )]
    Init,
    #[command(
        about = "Reset the tables and load sample data",
        long_about = "Drop and recreate both tables, then insert two departments and five employees in a single transaction."
    )]
    Seed,
    #[command(about = "Department commands")]
    Department {
        #[command(subcommand)]
        cmd: DepartmentCmd,
    },
    #[command(about = "Employee commands")]
    Employee {
        #[command(subcommand)]
        cmd: EmployeeCmd,
    },
}
