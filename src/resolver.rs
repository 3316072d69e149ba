use crate::registry::TagRegistry;
use crate::types::{ImageReference, RegistryTag, ResolvedImage};
use anyhow::Result;
use chrono::Utc;
use chrono_humanize::HumanTime;
use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

lazy_static! {
    // 7.4 / 7.4.3, optionally -jdkN, optionally a trailing -X.Y.Z build triplet.
    static ref STABLE_TAG: Regex =
        Regex::new(r"^(\d+\.\d+\.\d+(-jdk\d+)?|^\d+\.\d+(-jdk\d+)?)(-\d+\.\d+\.\d+)?$").unwrap();
}

/// Repositories whose tags are only followed within the current release line.
const RELEASE_LINE_MARKER: &str = "dxp";

pub fn is_stable_tag(name: &str) -> bool {
    STABLE_TAG.is_match(name)
}

/// Literal comparison of the first three bytes, e.g. `7.4` in `7.4.3`.
pub fn same_release_line(candidate: &str, current: &str) -> bool {
    match (candidate.get(..3), current.get(..3)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// First tag in registry order that qualifies as the latest stable one.
pub fn select_stable_tag<'t>(image: &ImageReference, tags: &'t [RegistryTag]) -> Option<&'t RegistryTag> {
    let pinned_line = image.repository.contains(RELEASE_LINE_MARKER);
    tags.iter().find(|tag| {
        is_stable_tag(&tag.name) && (!pinned_line || same_release_line(&tag.name, &image.current_version))
    })
}

pub struct TagResolver<R> {
    registry: R,
}

impl<R: TagRegistry> TagResolver<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// `None` when the listing holds no qualifying tag.
    pub async fn resolve(&self, image: &ImageReference) -> Result<Option<RegistryTag>> {
        let tags = self.registry.list_tags(&image.namespace, &image.repository).await?;
        Ok(select_stable_tag(image, &tags).cloned())
    }

    /// Resolves every image in order and keeps those with a different stable tag.
    pub async fn find_updates(&self, images: &[ImageReference]) -> Result<Vec<ResolvedImage>> {
        let progress = ProgressBar::new(images.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );

        let mut updates = Vec::new();
        for image in images {
            progress.set_message(image.name());

            match self.resolve(image).await? {
                Some(candidate) => {
                    let pushed = candidate
                        .last_updated
                        .map(|at| format!(", pushed {}", HumanTime::from(at.signed_duration_since(Utc::now()))))
                        .unwrap_or_default();
                    progress.suspend(|| {
                        info!(
                            "Found {} using '{}' in version '{}' (latest is '{}'{})",
                            image.path.display(),
                            image.name(),
                            image.current_version,
                            candidate.name,
                            pushed
                        )
                    });

                    if candidate.name != image.current_version {
                        updates.push(ResolvedImage {
                            image: image.clone(),
                            candidate,
                        });
                    }
                }
                None => progress.suspend(|| warn!("No stable version found for {}", image.name())),
            }

            progress.inc(1);
        }

        progress.finish_and_clear();
        Ok(updates)
    }
}
