use crate::command::CommandRunner;
use crate::config::Config;
use crate::git::Git;
use crate::github::GhCli;
use crate::report::Report;
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    CommittedPushed,
    NothingToCommit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Edited { url: String },
    Reopened { url: String },
    Created { url: String },
}

/// Ways of getting the report onto a pull request, tried in order until one
/// succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStrategy {
    /// Update title and body of the open pull request for the upgrade branch.
    EditExisting,
    /// Reopen a closed pull request for the upgrade branch and comment the report.
    ReopenClosed,
    CreateNew,
}

pub const PUBLISH_STRATEGIES: [PublishStrategy; 3] = [
    PublishStrategy::EditExisting,
    PublishStrategy::ReopenClosed,
    PublishStrategy::CreateNew,
];

pub struct Publisher<'a, C: ?Sized> {
    runner: &'a C,
    config: &'a Config,
}

impl<'a, C: CommandRunner + ?Sized> Publisher<'a, C> {
    pub fn new(runner: &'a C, config: &'a Config) -> Self {
        Self { runner, config }
    }

    fn git(&self) -> Git<'a, C> {
        Git::new(self.runner)
    }

    fn gh(&self) -> GhCli<'a, C> {
        GhCli::new(self.runner)
    }

    /// Checks out the upgrade branch and merges the trigger branch into it.
    pub async fn prepare_branch(&self) -> Result<()> {
        let git = self.git();
        let branch = &self.config.upgrade_branch;

        git.switch(branch, self.config.create_branch).await?;
        git.pull_rebase(branch).await?;
        info!("Branch '{}' ready", branch);

        git.merge_theirs(&self.config.trigger_branch, branch).await?;
        info!("Merged '{}' into '{}'", self.config.trigger_branch, branch);
        Ok(())
    }

    pub async fn commit_and_push(&self, path: &Path) -> Result<CommitOutcome> {
        let git = self.git();
        git.add(path).await?;

        if !git.has_changes().await? {
            info!("Nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }

        git.commit(&self.config.commit_message).await?;
        git.push(&self.config.upgrade_branch).await?;
        Ok(CommitOutcome::CommittedPushed)
    }

    pub async fn publish(&self, report: &Report) -> Result<PublishOutcome> {
        let mut last_error = anyhow!("no publish strategy configured");

        for strategy in PUBLISH_STRATEGIES {
            info!("Publishing report: {:?}", strategy);
            match self.attempt(strategy, report).await {
                Ok(outcome) => {
                    info!("Pull request published: {:?}", outcome);
                    return Ok(outcome);
                }
                Err(e) => {
                    warn!("{:?} failed: {:#}", strategy, e);
                    last_error = e;
                }
            }
        }

        Err(last_error.context("Failed to publish pull request"))
    }

    async fn attempt(&self, strategy: PublishStrategy, report: &Report) -> Result<PublishOutcome> {
        let gh = self.gh();
        let branch = self.config.upgrade_branch.as_str();
        let body = report.body();

        match strategy {
            PublishStrategy::EditExisting => {
                let output = gh
                    .edit(branch, &report.title, &body)
                    .await?
                    .into_checked("gh pr edit")?;
                Ok(PublishOutcome::Edited {
                    url: output.stdout.trim().to_string(),
                })
            }
            PublishStrategy::ReopenClosed => {
                let output = gh.reopen(branch).await?.into_checked("gh pr reopen")?;
                let comment = gh.comment(branch, &body).await?;
                if !comment.success {
                    warn!("gh pr comment failed: {}", comment.stderr.trim());
                }
                Ok(PublishOutcome::Reopened {
                    url: output.stdout.trim().to_string(),
                })
            }
            PublishStrategy::CreateNew => {
                let output = gh
                    .create(&self.config.trigger_branch, branch, &report.title, &body)
                    .await?
                    .into_checked("gh pr create")?;
                Ok(PublishOutcome::Created {
                    url: output.stdout.trim().to_string(),
                })
            }
        }
    }
}
