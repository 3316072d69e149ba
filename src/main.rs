use cloud_image_upgrader::{
    config::{parse_flag, Config},
    runner::{RunOutcome, Upgrader},
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cloud-image-upgrader")]
#[command(about = "Bump container image tags in service descriptors and open a pull request")]
struct Cli {
    /// Optional YAML file with defaults; flags and env vars override it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Create the upgrade branch instead of switching to it.
    #[arg(long, env = "NO_UPGRADE_BRANCH", value_parser = parse_flag)]
    create_branch: Option<bool>,

    /// Branch that triggered the run; merge source and pull request base.
    #[arg(long, env = "GITHUB_REF_NAME")]
    trigger_branch: Option<String>,

    /// Directory scanned for descriptor files.
    #[arg(long, env = "WORKSPACE_DIRECTORY", value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Base URL of the registry serving tag listings.
    #[arg(long, value_name = "URL")]
    registry_url: Option<String>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(create_branch) = self.create_branch {
            config.create_branch = create_branch;
        }
        if let Some(trigger_branch) = self.trigger_branch {
            config.trigger_branch = trigger_branch;
        }
        if let Some(workspace) = self.workspace {
            config.workspace = workspace;
        }
        if let Some(registry_url) = self.registry_url {
            config.registry_url = registry_url;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Cli::parse().into_config()?;
    let upgrader = Upgrader::new(config)?;
    match upgrader.run().await? {
        RunOutcome::NoUpdates => info!("Nothing to upgrade"),
        RunOutcome::Published { report, commit, pull_request } => info!(
            "Upgraded {} image(s), {:?}, {:?}",
            report.rows.len(),
            commit,
            pull_request
        ),
    }
    Ok(())
}
