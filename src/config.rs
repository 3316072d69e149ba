use serde::Deserialize;
use std::path::{Path, PathBuf};
use anyhow::{bail, Result};

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.hub.docker.com";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        Self {
            name: "github-actions[bot]".to_string(),
            email: "41898282+github-actions[bot]@users.noreply.github.com".to_string(),
        }
    }
}

/// Everything a run needs, passed explicitly into the pipeline.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Create the upgrade branch instead of switching to an existing one.
    pub create_branch: bool,
    /// Branch that triggered the run: merge source and pull request base.
    pub trigger_branch: String,
    /// Directory scanned for descriptors and staged after the update.
    pub workspace: PathBuf,
    pub descriptor_file_name: String,
    pub upgrade_branch: String,
    pub registry_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub git_identity: GitIdentity,
    pub pull_request_title: String,
    pub commit_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_branch: false,
            trigger_branch: String::new(),
            workspace: PathBuf::from("./cloud-repo"),
            descriptor_file_name: "LCP.json".to_string(),
            upgrade_branch: "upgrade-liferay-cloud-images".to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            page_size: 1024,
            request_timeout_secs: 30,
            git_identity: GitIdentity::default(),
            pull_request_title: "[Liferay Cloud Upgrade] New versions for Docker images".to_string(),
            commit_message: "chore: upgrade liferay cloud images".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trigger_branch.trim().is_empty() {
            bail!("trigger branch is not set (use --trigger-branch or GITHUB_REF_NAME)");
        }
        if self.upgrade_branch.trim().is_empty() {
            bail!("upgrade branch must not be empty");
        }
        if self.descriptor_file_name.is_empty() {
            bail!("descriptor file name must not be empty");
        }
        if self.page_size == 0 {
            bail!("page size must be greater than zero");
        }
        Ok(())
    }
}

/// Parses a boolean flag the way CI environments usually spell them.
/// An empty value counts as false.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    match value {
        "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        other => Err(format!("invalid boolean value '{}'", other)),
    }
}
