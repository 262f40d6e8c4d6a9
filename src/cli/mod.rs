mod args;
mod command;
mod department_cmd;
mod employee_cmd;

pub use args::Cli;
pub use command::Command;
pub use department_cmd::DepartmentCmd;
pub use employee_cmd::EmployeeCmd;

pub use args::parse;
