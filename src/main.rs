use clap::Parser;
use swagger_form::cli::{self, Cli};
use swagger_form::config::Settings;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration (CLI > env vars > config file)
    let settings = Settings::new_with_cli(&cli)?;
    info!("Loading {}", cli.document.display());

    let output = cli::run(&cli, &settings)?;
    print!("{}", output);
    Ok(())
}
