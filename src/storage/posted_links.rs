use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Failure to write the posted-links file.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write temporary file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to replace '{}': {source}", path.display())]
    Rename {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The set of links already announced to the channel.
///
/// Backed by a plain text file with one link per line. Membership means a
/// previous run selected the link and attempted to publish it, not that the
/// publish succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostedLinks {
    links: BTreeSet<String>,
}

impl PostedLinks {
    /// Loads the set from `path`.
    ///
    /// - Missing file → empty set
    /// - Unreadable file (permissions, invalid UTF-8) → empty set, logged as warning
    /// - Blank lines are ignored, surrounding whitespace trimmed
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No posted links file, starting empty");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read posted links file, starting empty"
                );
                return Self::default();
            }
        };

        let links: BTreeSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!(path = %path.display(), count = links.len(), "Loaded posted links");
        Self { links }
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Adds `link`. Returns `true` if it was not already present.
    pub fn record(&mut self, link: &str) -> bool {
        if self.links.contains(link) {
            return false;
        }
        self.links.insert(link.to_string())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    /// Renders the file content: every link on its own line, sorted ascending.
    fn render(&self) -> String {
        let mut out = String::with_capacity(self.links.iter().map(|l| l.len() + 1).sum());
        for link in &self.links {
            out.push_str(link);
            out.push('\n');
        }
        out
    }

    /// Replaces the file at `path` with the current set.
    ///
    /// Writes to a uniquely named sibling, syncs it, then renames it over
    /// `path`, so readers see either the previous content or the new one.
    pub fn persist(&self, path: &Path) -> Result<(), PersistError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let random_suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

        let write_result = (|| {
            let mut temp_file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true) // Fails if the name is taken (prevents symlink race)
                .open(&temp_path)?;
            temp_file.write_all(self.render().as_bytes())?;
            temp_file.sync_all()
        })();

        if let Err(source) = write_result {
            let _ = std::fs::remove_file(&temp_path);
            return Err(PersistError::Write {
                path: temp_path,
                source,
            });
        }

        // On Windows, rename fails if destination exists, so remove it first
        #[cfg(windows)]
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }

        std::fs::rename(&temp_path, path).map_err(|source| {
            let _ = std::fs::remove_file(&temp_path);
            PersistError::Rename {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::info!(path = %path.display(), count = self.links.len(), "Saved posted links");
        Ok(())
    }
}
