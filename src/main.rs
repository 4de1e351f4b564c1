use dotenvy::dotenv;
use menu_buddy::{
    config,
    core::{catalog, storefront::Storefront},
    errors::Result,
    shell::Shell,
};
use tokio::io::{BufReader, stdin, stdout};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load settings and environment overrides
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let dispatch_url = app_config.dispatch_url()?;

    // 4. Load the menu; a broken catalog ends the session
    let menu = catalog::load_catalog(&app_config.catalog_path)
        .await
        .inspect_err(|e| error!("Menu could not be loaded: {}", e))?;

    // 5. Run the interactive shell on stdin/stdout
    let mut shell = Shell::new(Storefront::new(menu, dispatch_url));
    shell.run(BufReader::new(stdin()), stdout()).await?;

    info!("Goodbye.");
    Ok(())
}
