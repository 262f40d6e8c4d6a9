use crate::configuration::Configuration;

pub struct Context {
    pub config: Configuration,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        let cfg = Configuration {
            db_path: cli.db.clone().into(),
            log_file: cli.log_file.clone().map(Into::into),
            reset: cli.reset,
        };
        Self { config: cfg }
    }
}
