use crate::domain::model::GenerateContentRequest;
use crate::text::placeholders::{replace_placeholders, DEFAULT_REPLACEMENTS};
use crate::utils::error::{ProbeError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::PathBuf;
use tracing::info;

/// 放置 fn-*.json 酬載檔的目錄。每次 select 隨機抽一個檔案。
pub struct PayloadStore {
    dir: PathBuf,
}

/// The payload chosen for a session, after placeholder substitution.
#[derive(Debug)]
pub struct SelectedPayload {
    pub path: PathBuf,
    pub request: GenerateContentRequest,
}

impl PayloadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Every regular `fn-*.json` file in the directory, sorted by name. With a
    /// filter, only filenames containing the substring. Subdirectories are
    /// never entered.
    pub fn candidate_files(&self, filter: Option<&str>) -> Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with("fn-") || !name.ends_with(".json") {
                continue;
            }
            if let Some(filter) = filter {
                if !name.contains(filter) {
                    continue;
                }
            }

            candidates.push(path);
        }

        candidates.sort();

        if candidates.is_empty() {
            let message = match filter {
                Some(filter) => format!(
                    "no fn-*.json payload files matching '{}' in {}",
                    filter,
                    self.dir.display()
                ),
                None => format!("no fn-*.json payload files in {}", self.dir.display()),
            };
            return Err(ProbeError::PayloadError { message });
        }

        Ok(candidates)
    }

    /// Picks a payload uniformly at random, substitutes placeholders in the
    /// raw text, then parses it into a typed request.
    pub fn select(&self, filter: Option<&str>, rng: &mut impl Rng) -> Result<SelectedPayload> {
        let candidates = self.candidate_files(filter)?;

        // candidate_files 保證非空
        let path = candidates
            .choose(rng)
            .cloned()
            .ok_or_else(|| ProbeError::PayloadError {
                message: format!("no payload candidates in {}", self.dir.display()),
            })?;

        info!("📄 Selected payload file: {}", path.display());

        let raw = std::fs::read_to_string(&path)?;
        let substituted = replace_placeholders(&raw, DEFAULT_REPLACEMENTS, rng);

        let request =
            serde_json::from_str(&substituted).map_err(|e| ProbeError::PayloadError {
                message: format!("failed to parse payload {}: {}", path.display(), e),
            })?;

        Ok(SelectedPayload { path, request })
    }
}
