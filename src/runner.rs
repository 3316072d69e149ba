use crate::command::{CommandRunner, SystemCommandRunner};
use crate::config::Config;
use crate::git::Git;
use crate::publisher::{CommitOutcome, PublishOutcome, Publisher};
use crate::registry::{DockerHubRegistry, TagRegistry};
use crate::report::{Report, ReportRow};
use crate::resolver::TagResolver;
use crate::scanner::scan_descriptors;
use crate::updater::apply_update;
use anyhow::Result;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NoUpdates,
    Published {
        report: Report,
        commit: CommitOutcome,
        pull_request: PublishOutcome,
    },
}

pub struct Upgrader<R, C> {
    config: Config,
    resolver: TagResolver<R>,
    commands: C,
}

impl Upgrader<DockerHubRegistry, SystemCommandRunner> {
    pub fn new(config: Config) -> Result<Self> {
        let registry = DockerHubRegistry::new(&config)?;
        Ok(Self::with_parts(config, registry, SystemCommandRunner))
    }
}

impl<R: TagRegistry, C: CommandRunner> Upgrader<R, C> {
    pub fn with_parts(config: Config, registry: R, commands: C) -> Self {
        Self {
            config,
            resolver: TagResolver::new(registry),
            commands,
        }
    }

    pub fn commands(&self) -> &C {
        &self.commands
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let config = &self.config;
        info!(
            "create_branch={} trigger_branch={} workspace={}",
            config.create_branch,
            config.trigger_branch,
            config.workspace.display()
        );

        let git = Git::new(&self.commands);
        git.configure_identity(&config.git_identity).await?;
        git.fetch_all().await?;

        let images = scan_descriptors(&config.workspace, &config.descriptor_file_name)?;
        info!("Found {} image(s) in {}", images.len(), config.workspace.display());

        let updates = self.resolver.find_updates(&images).await?;
        if updates.is_empty() {
            info!("All images are up to date");
            return Ok(RunOutcome::NoUpdates);
        }

        let publisher = Publisher::new(&self.commands, config);
        publisher.prepare_branch().await?;

        let mut report = Report::new(config.pull_request_title.clone());
        for update in &updates {
            if apply_update(update)? == 0 {
                warn!(
                    "'{}' not found verbatim in {}, leaving it out of the report",
                    update.current_value(),
                    update.image.path.display()
                );
                continue;
            }
            report.push(ReportRow::from(update));
        }

        let commit = publisher.commit_and_push(&config.workspace).await?;
        let pull_request = publisher.publish(&report).await?;

        Ok(RunOutcome::Published {
            report,
            commit,
            pull_request,
        })
    }
}
