use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use snowflake_provisioner::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug prints every statement; stdout only carries confirmations
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.provision_config();
    let authenticator = cli.authenticator()?;

    let session = cli
        .connector()?
        .connect(authenticator)
        .await
        .with_context(|| format!("connecting to Snowflake account {}", cli.account))?;

    snowflake_provisioner::run(session, &config, &mut std::io::stdout()).await?;
    Ok(())
}
