use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum DepartmentCmd {
    #[command(about = "List every department")]
    List,
    #[command(about = "Show one department by id")]
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },
    #[command(about = "Find the first department with the given name")]
    Find {
        #[arg(value_name = "NAME")]
        name: String,
    },
    #[command(about = "Create a department")]
    Create {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(value_name = "LOCATION")]
        location: String,
    },
    #[command(
        about = "Update a department",
        long_about = "Overwrite the name and/or location of an existing department. Fields that are not given keep their stored value."
    )]
    Update {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        #[arg(long, value_name = "LOCATION")]
        location: Option<String>,
    },
    #[command(
        about = "Delete a department",
        long_about = "Delete a department row. Employees referencing it are kept and keep their department id."
    )]
    Delete {
        #[arg(value_name = "ID")]
        id: i64,
    },
}
