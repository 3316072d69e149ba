use crate::types::ResolvedImage;
use anyhow::{Context, Result};
use tracing::info;

/// Rewrites every `namespace/repository:current` in the descriptor to the
/// candidate tag. Returns how many occurrences were replaced.
pub fn apply_update(resolved: &ResolvedImage) -> Result<usize> {
    let path = &resolved.image.path;
    let old_value = resolved.current_value();
    let new_value = resolved.new_value();

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let replaced = contents.matches(old_value.as_str()).count();
    let updated = contents.replace(&old_value, &new_value);

    std::fs::write(path, updated)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Updated {} from '{}' to '{}' ({} occurrence(s))", path.display(), old_value, new_value, replaced);
    Ok(replaced)
}
