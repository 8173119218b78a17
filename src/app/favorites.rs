use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, warn};


pub const FAVORITES_FILE: &str = "favorites.json";

/// Ordered, case-insensitively unique list of favorite city names.
///
/// A store opened on a path loads it once and rewrites the whole list after
/// every change. Write failures are logged and never fail the mutation.
#[derive(Debug, Clone, Default)]
pub struct FavoritesStore {
    entries: Vec<String>,
    path: Option<PathBuf>,
}

impl FavoritesStore {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store backed by `path`; missing or unreadable data starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_favorites(&path);
        Self {
            entries,
            path: Some(path),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn add(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || self.position(name).is_some() {
            return;
        }
        self.entries.push(name.to_string());
        self.persist();
    }

    pub fn remove(&mut self, name: &str) {
        let key = fold(name);
        let before = self.entries.len();
        self.entries.retain(|entry| fold(entry) != key);
        if self.entries.len() != before {
            self.persist();
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        !name.is_empty() && self.position(name).is_some()
    }

    /// Returns whether `name` is a favorite after the toggle.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.contains(name) {
            self.remove(name);
            false
        } else {
            self.add(name);
            self.contains(name)
        }
    }

    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.persist();
    }

    #[must_use]
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = fold(name);
        self.entries.iter().position(|entry| fold(entry) == key)
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(err) = save_favorites(path, &self.entries) {
            warn!(path = %path.display(), error = %err, "failed to save favorites");
        }
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Reads the stored list, dropping non-string, blank and duplicate entries.
pub fn load_favorites(path: &Path) -> Vec<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read favorites");
            return Vec::new();
        }
    };

    let items = match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!(path = %path.display(), "favorites file is not a list, starting empty");
            return Vec::new();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "favorites file is corrupt, starting empty");
            return Vec::new();
        }
    };

    let mut entries: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(name) = item else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || entries.iter().any(|entry| fold(entry) == fold(name)) {
            continue;
        }
        entries.push(name.to_string());
    }
    debug!(count = entries.len(), "favorites loaded");
    entries
}

pub fn save_favorites(path: &Path, entries: &[String]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("creating favorites directory failed")?;
    }
    let payload = serde_json::to_string(entries).context("serializing favorites failed")?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).context("opening favorites file failed")?;
    file.write_all(payload.as_bytes())
        .context("writing favorites file failed")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .context("restricting favorites file permissions failed")?;
    }
    Ok(())
}
