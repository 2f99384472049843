use anyhow::Context;
use bookshelf_app::Application;
use bookshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        "bookshelf bootstrap starting"
    );

    let app = Application::build(&settings)?;
    app.run(&settings).await?;

    tracing::info!("bookshelf shut down");
    Ok(())
}
