use crate::types::ResolvedImage;
use std::fmt::Write;

const HEADING: &str = "# ⛅️ New versions are available for Liferay Cloud Docker images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub image: String,
    pub current_version: String,
    pub latest_version: String,
}

impl From<&ResolvedImage> for ReportRow {
    fn from(resolved: &ResolvedImage) -> Self {
        Self {
            image: resolved.image.name(),
            current_version: resolved.image.current_version.clone(),
            latest_version: resolved.candidate.name.clone(),
        }
    }
}

/// Pull request title and the table of updated images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn body(&self) -> String {
        let mut body = String::new();
        body.push_str(HEADING);
        body.push('\n');
        body.push_str("| Docker Image | Current Version | Latest Version |\n");
        body.push_str("| :--- | :---: | :---: |\n");
        for row in &self.rows {
            // Writing to a String cannot fail.
            let _ = writeln!(
                body,
                "| `{}` | `{}` | `{}` |",
                row.image, row.current_version, row.latest_version
            );
        }
        body
    }
}
