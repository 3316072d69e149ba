use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use anyhow::{anyhow, bail, Result};

pub const DEFAULT_NAMESPACE: &str = "library";

/// Body of a service descriptor file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Descriptor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub path: PathBuf,
    /// Image name exactly as the descriptor spells it, e.g. `mysql` for `library/mysql`.
    pub declared_name: String,
    pub namespace: String,
    pub repository: String,
    pub current_version: String,
}

impl ImageReference {
    /// Parses `[namespace/]repository:tag`. Official images live under `library`.
    pub fn parse(image: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let (name, tag) = image
            .split_once(':')
            .ok_or_else(|| anyhow!("image '{}' has no tag", image))?;

        let (namespace, repository) = match name.split_once('/') {
            Some((namespace, repository)) => (namespace, repository),
            None => (DEFAULT_NAMESPACE, name),
        };

        if namespace.is_empty() || repository.is_empty() || tag.is_empty() {
            bail!("image '{}' is not of the form [namespace/]repository:tag", image);
        }

        Ok(Self {
            path: path.into(),
            declared_name: name.to_string(),
            namespace: namespace.to_string(),
            repository: repository.to_string(),
            current_version: tag.to_string(),
        })
    }

    /// `namespace/repository`, without a tag.
    pub fn name(&self) -> String {
        format!("{}/{}", self.namespace, self.repository)
    }

    pub fn with_tag(&self, tag: &str) -> String {
        format!("{}:{}", self.name(), tag)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.with_tag(&self.current_version))
    }
}

/// One page of the registry's tag listing.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TagPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<serde_json::Value>,
    #[serde(default)]
    pub results: Vec<RegistryTag>,
}

/// A tag as listed by the registry. Only `name` is compared; the rest is
/// carried along as reported.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RegistryTag {
    pub name: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub creator: Option<u64>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updater_username: Option<String>,
    #[serde(default)]
    pub full_size: Option<u64>,
    #[serde(default)]
    pub tag_status: Option<String>,
    #[serde(default)]
    pub images: Vec<TagImage>,
}

impl RegistryTag {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TagImage {
    #[serde(default)]
    pub architecture: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_pushed: Option<DateTime<Utc>>,
}

/// An image with a newer stable tag available.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub image: ImageReference,
    pub candidate: RegistryTag,
}

impl ResolvedImage {
    /// Image string as it currently appears in the descriptor.
    pub fn current_value(&self) -> String {
        format!("{}:{}", self.image.declared_name, self.image.current_version)
    }

    pub fn new_value(&self) -> String {
        format!("{}:{}", self.image.declared_name, self.candidate.name)
    }
}
