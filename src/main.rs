fn main() -> anyhow::Result<()> {
    staffdb::tracing::init();
    staffdb::app::run()
}
