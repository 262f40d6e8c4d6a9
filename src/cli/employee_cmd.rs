use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum EmployeeCmd {
    #[command(about = "List employees")]
    List {
        #[arg(
            long,
            value_name = "ID",
            help = "Only employees referencing this department"
        )]
        department: Option<i64>,
    },
    #[command(about = "Show one employee by id")]
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    #[command(about = "Find the first employee with the given name")]
    Find {
        #[arg(value_name = "NAME")]
        name: String,
    },
    #[command(about = "Create an employee")]
    Create {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(value_name = "JOB_TITLE")]
        job_title: String,
        #[arg(long, value_name = "ID", help = "Department the employee belongs to")]
        department: Option<i64>,
    },
    #[command(
        about = "Update an employee",
        long_about = "Overwrite fields of an existing employee. Fields that are not given keep their stored value."
    )]
    Update {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        #[arg(long = "job-title", value_name = "JOB_TITLE")]
        job_title: Option<String>,
        #[arg(long, value_name = "ID", conflicts_with = "clear_department")]
        department: Option<i64>,
        #[arg(
            long = "clear-department",
            default_value_t = false,
            help = "Remove the department reference"
        )]
        clear_department: bool,
    },
    #[command(about = "Delete an employee")]
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}
