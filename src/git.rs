use crate::command::{CommandOutput, CommandRunner};
use crate::config::GitIdentity;
use anyhow::Result;
use std::path::Path;
use tracing::warn;

pub struct Git<'a, C: ?Sized> {
    runner: &'a C,
}

impl<'a, C: CommandRunner + ?Sized> Git<'a, C> {
    pub fn new(runner: &'a C) -> Self {
        Self { runner }
    }

    async fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        self.runner.run("git", &args).await
    }

    async fn git_checked(&self, args: &[&str]) -> Result<CommandOutput> {
        let description = format!("git {}", args.first().copied().unwrap_or_default());
        self.git(args).await?.into_checked(&description)
    }

    pub async fn configure_identity(&self, identity: &GitIdentity) -> Result<()> {
        self.git_checked(&["config", "user.name", identity.name.as_str()]).await?;
        self.git_checked(&["config", "user.email", identity.email.as_str()]).await?;
        Ok(())
    }

    pub async fn fetch_all(&self) -> Result<()> {
        self.git_checked(&["fetch", "--all"]).await?;
        self.git_checked(&["pull", "--all"]).await?;
        Ok(())
    }

    pub async fn switch(&self, branch: &str, create: bool) -> Result<()> {
        if create {
            self.git_checked(&["switch", "-c", branch]).await?;
        } else {
            self.git_checked(&["switch", branch]).await?;
        }
        Ok(())
    }

    /// Rebases onto the remote branch. The remote branch may not exist yet,
    /// so failure only gets logged.
    pub async fn pull_rebase(&self, branch: &str) -> Result<bool> {
        let output = self.git(&["pull", "origin", branch, "--rebase"]).await?;
        if !output.success {
            warn!("git pull origin {} --rebase failed: {}", branch, output.stderr.trim());
        }
        Ok(output.success)
    }

    /// Merges `origin/<source>` into the current branch, preferring incoming changes.
    pub async fn merge_theirs(&self, source: &str, target: &str) -> Result<()> {
        let remote = format!("origin/{}", source);
        let message = format!("chore: merge '{}' into '{}'", source, target);
        self.git_checked(&["merge", remote.as_str(), "-Xtheirs", "-m", message.as_str(), "--allow-unrelated-histories"])
            .await?;
        Ok(())
    }

    pub async fn add(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy().into_owned();
        self.git_checked(&["add", path.as_str()]).await?;
        Ok(())
    }

    /// Whether the index differs from HEAD.
    pub async fn has_changes(&self) -> Result<bool> {
        let output = self.git(&["diff-index", "--quiet", "HEAD"]).await?;
        Ok(!output.success)
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.git_checked(&["commit", "-m", message]).await?;
        Ok(())
    }

    pub async fn push(&self, branch: &str) -> Result<()> {
        self.git_checked(&["push", "-u", "origin", branch]).await?;
        Ok(())
    }
}
