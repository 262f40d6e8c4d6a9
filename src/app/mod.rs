mod wiring;

use crate::{cli, context, orm::Session};
use anyhow::{Context as AnyhowContext, Result};

pub struct App {
    pub ctx: context::Context,
    pub session: Session,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::set_log_file(ctx.config.log_file.as_deref())
            .context("opening log file")?;
        log::info!("🚀 Starting staffdb");
        log::info!("📂 Database: {}", ctx.config.db_path.display());
        if let Some(path) = ctx.config.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.display());
        }

        let session = wiring::init_session(&ctx)?;

        Ok((Self { ctx, session }, cli))
    }
}

pub fn run() -> Result<()> {
    let (mut app, cli) = App::from_cli()?;

    let span = tracing::info_span!("command", reset = app.ctx.config.reset);
    let _entered = span.enter();

    cli.cmd.run(&mut app.session)
}
