use crate::{
    command::{CommandOutput, CommandRunner},
    config::{parse_flag, Config},
    types::{ImageReference, RegistryTag, TagPage},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::path::Path;
use std::sync::Mutex;


/// Records every command line and answers from a small script of failures
/// and canned stdout, matched by command-line prefix.
#[derive(Default)]
pub(crate) struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    failing: Vec<String>,
    stdout: Vec<(String, String)>,
}

impl RecordingRunner {
    pub(crate) fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    pub(crate) fn with_stdout(mut self, prefix: &str, stdout: &str) -> Self {
        self.stdout.push((prefix.to_string(), stdout.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn invoked(&self, prefix: &str) -> bool {
        self.calls().iter().any(|call| call.starts_with(prefix))
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let line = format!("{} {}", program, args.join(" "));
        self.calls.lock().unwrap().push(line.clone());

        if self.failing.iter().any(|prefix| line.starts_with(prefix.as_str())) {
            return Ok(CommandOutput::failed(format!("{}: exit status 1", line)));
        }

        let stdout = self
            .stdout
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();
        Ok(CommandOutput::ok(stdout))
    }
}

pub(crate) fn test_config(workspace: &Path) -> Config {
    Config {
        trigger_branch: "main".to_string(),
        workspace: workspace.to_path_buf(),
        upgrade_branch: "upgrade-images".to_string(),
        ..Config::default()
    }
}

pub(crate) fn write_descriptor(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

pub(crate) fn tags(names: &[&str]) -> Vec<RegistryTag> {
    names.iter().map(|name| RegistryTag::named(*name)).collect()
}

#[test]
fn test_config_loading() {
    let config_content = r#"
upgrade_branch: bump-images
descriptor_file_name: service.json
page_size: 50
git_identity:
  name: release-bot
"#;

    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("upgrader.yaml");
    std::fs::write(&config_path, config_content).unwrap();

    let config = Config::from_file(config_path).unwrap();

    assert_eq!(config.upgrade_branch, "bump-images");
    assert_eq!(config.descriptor_file_name, "service.json");
    assert_eq!(config.page_size, 50);
    assert_eq!(config.git_identity.name, "release-bot");
    assert_eq!(
        config.git_identity.email,
        "41898282+github-actions[bot]@users.noreply.github.com"
    );
    assert_eq!(config.registry_url, "https://registry.hub.docker.com");
    assert!(!config.create_branch);
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_err());

    config.trigger_branch = "main".to_string();
    assert!(config.validate().is_ok());

    config.page_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_parse_flag() {
    for value in ["1", "t", "T", "true", "TRUE", "True"] {
        assert_eq!(parse_flag(value), Ok(true), "{}", value);
    }
    for value in ["", "0", "f", "F", "false", "FALSE", "False"] {
        assert_eq!(parse_flag(value), Ok(false), "{}", value);
    }
    assert!(parse_flag("yes").is_err());
}

#[test]
fn test_image_reference_without_namespace() {
    let image = ImageReference::parse("mysql:8.0.33", "LCP.json").unwrap();

    assert_eq!(image.namespace, "library");
    assert_eq!(image.repository, "mysql");
    assert_eq!(image.current_version, "8.0.33");
    assert_eq!(image.declared_name, "mysql");
    assert_eq!(image.to_string(), "library/mysql:8.0.33");
}

#[test]
fn test_image_reference_with_namespace() {
    let image = ImageReference::parse("liferaycloud/nginx:5.2.0", "LCP.json").unwrap();

    assert_eq!(image.namespace, "liferaycloud");
    assert_eq!(image.repository, "nginx");
    assert_eq!(image.current_version, "5.2.0");
    assert_eq!(image.name(), "liferaycloud/nginx");
}

#[test]
fn test_image_reference_rejects_malformed() {
    assert!(ImageReference::parse("liferaycloud/nginx", "LCP.json").is_err());
    assert!(ImageReference::parse("nginx:", "LCP.json").is_err());
    assert!(ImageReference::parse(":5.2.0", "LCP.json").is_err());
    assert!(ImageReference::parse("/nginx:5.2.0", "LCP.json").is_err());
}

#[test]
fn test_tag_page_parsing() {
    let json_str = r#"{
        "count": 2,
        "next": "https://registry.hub.docker.com/v2/repositories/liferay/dxp/tags?page=2",
        "previous": null,
        "results": [
            {
                "creator": 7,
                "id": 42,
                "name": "7.4.13-u92",
                "last_updated": "2024-01-01T00:00:00Z",
                "digest": "sha256:abc",
                "images": [{"architecture": "amd64", "os": "linux", "size": 1024}]
            },
            {"name": "7.4.3"}
        ]
    }"#;

    let page: TagPage = serde_json::from_str(json_str).unwrap();

    assert_eq!(page.count, Some(2));
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].id, Some(42));
    assert_eq!(
        page.results[0].last_updated.unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(page.results[0].images[0].architecture.as_deref(), Some("amd64"));
    assert_eq!(page.results[1].name, "7.4.3");
    assert_eq!(page.results[1].digest, None);
}
