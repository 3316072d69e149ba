use crate::command::{CommandOutput, CommandRunner};
use anyhow::Result;

/// Pull request commands of the `gh` CLI.
pub struct GhCli<'a, C: ?Sized> {
    runner: &'a C,
}

impl<'a, C: CommandRunner + ?Sized> GhCli<'a, C> {
    pub fn new(runner: &'a C) -> Self {
        Self { runner }
    }

    async fn pr(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut full = vec!["pr".to_string()];
        full.extend(args.iter().map(|arg| arg.to_string()));
        self.runner.run("gh", &full).await
    }

    pub async fn edit(&self, branch: &str, title: &str, body: &str) -> Result<CommandOutput> {
        self.pr(&["edit", branch, "-t", title, "-b", body]).await
    }

    pub async fn reopen(&self, target: &str) -> Result<CommandOutput> {
        self.pr(&["reopen", target]).await
    }

    pub async fn comment(&self, target: &str, body: &str) -> Result<CommandOutput> {
        self.pr(&["comment", target, "--body", body]).await
    }

    pub async fn create(&self, base: &str, head: &str, title: &str, body: &str) -> Result<CommandOutput> {
        self.pr(&["create", "--base", base, "--head", head, "-t", title, "-b", body]).await
    }
}
