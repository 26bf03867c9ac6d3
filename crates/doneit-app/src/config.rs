use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use doneit_core::{Partition, Priority};
use serde::Deserialize;

const CONFIG_DIR: &str = ".doneit";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_STORE_FILE: &str = "tasks.json";

/// Top-level project configuration loaded from `.doneit/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Who to act for.
    #[serde(default)]
    pub session: SessionConfig,
    /// Where tasks are kept.
    #[serde(default)]
    pub store: StoreConfig,
    /// Initial board selection.
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(skip)]
    workdir: PathBuf,
}

impl ProjectConfig {
    /// Load configuration from the current directory.
    ///
    /// # Errors
    /// Fails when the current directory cannot be resolved or the file is invalid.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        Self::from_workdir(cwd)
    }

    /// Load configuration from a known working directory.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Fails when the file cannot be read, parsed or validated.
    pub fn from_workdir(workdir: impl AsRef<Path>) -> Result<Self> {
        let workdir = workdir.as_ref();
        let config_path = workdir.join(CONFIG_DIR).join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            let config: Self = toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", config_path.display()))?;
            config.validate()?;
            config
        } else {
            Self::default()
        };
        config.workdir = workdir.to_path_buf();
        Ok(config)
    }

    /// Task file to open, relative paths resolved against the working directory.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        match &self.store.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.workdir.join(path),
            None => self.workdir.join(CONFIG_DIR).join(DEFAULT_STORE_FILE),
        }
    }

    fn validate(&self) -> Result<()> {
        self.session.ensure_owner_not_blank()?;
        self.store.ensure_path_not_empty()?;
        self.view.ensure_known_priority()
    }
}

/// `[session]` block.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionConfig {
    /// Owner to act for when `DONEIT_OWNER` is unset.
    #[serde(default)]
    pub owner: Option<String>,
}

impl SessionConfig {
    fn ensure_owner_not_blank(&self) -> Result<()> {
        if self.owner.as_deref().is_some_and(|owner| owner.trim().is_empty()) {
            bail!("session.owner must not be empty");
        }
        Ok(())
    }
}

/// `[store]` block.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    /// JSON task file; defaults to `.doneit/tasks.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    fn ensure_path_not_empty(&self) -> Result<()> {
        if self.path.as_ref().is_some_and(|path| path.as_os_str().is_empty()) {
            bail!("store.path must not be empty");
        }
        Ok(())
    }
}

/// `[view]` block: initial board selection.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ViewConfig {
    /// Partition shown first.
    #[serde(default)]
    pub partition: Partition,
    /// Priority filter applied after the first load.
    #[serde(default)]
    priority: Option<String>,
}

impl ViewConfig {
    /// Configured priority filter, if any.
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_deref().map(Priority::parse)
    }

    fn ensure_known_priority(&self) -> Result<()> {
        match self.priority() {
            Some(priority) if !priority.is_known() => {
                let allowed = Priority::KNOWN
                    .iter()
                    .map(Priority::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                bail!("view.priority '{priority}' is not a known priority. Allowed values: {allowed}.");
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &Path, body: &str) -> Result<()> {
        let cfg_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir)?;
        let mut file = fs::File::create(cfg_dir.join(CONFIG_FILE))?;
        writeln!(file, "{body}")?;
        Ok(())
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = ProjectConfig::from_workdir(dir.path())?;
        assert_eq!(cfg.session.owner, None);
        assert_eq!(cfg.view.partition, Partition::Incomplete);
        assert_eq!(cfg.view.priority(), None);
        assert_eq!(cfg.store_path(), dir.path().join(".doneit").join("tasks.json"));
        Ok(())
    }

    #[test]
    fn load_full_config() -> Result<()> {
        let dir = tempdir()?;
        write_config(
            dir.path(),
            "[session]\nowner = \"alice\"\n\n[store]\npath = \"data/tasks.json\"\n\n[view]\npartition = \"complete\"\npriority = \"High\"",
        )?;

        let cfg = ProjectConfig::from_workdir(dir.path())?;
        assert_eq!(cfg.session.owner.as_deref(), Some("alice"));
        assert_eq!(cfg.store_path(), dir.path().join("data").join("tasks.json"));
        assert_eq!(cfg.view.partition, Partition::Complete);
        assert_eq!(cfg.view.priority(), Some(Priority::High));
        Ok(())
    }

    #[test]
    fn blank_owner_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[session]\nowner = \"  \"")?;
        let err = ProjectConfig::from_workdir(dir.path()).err();
        assert!(err.is_some_and(|err| err.to_string().contains("session.owner")));
        Ok(())
    }

    #[test]
    fn unknown_priority_filter_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[view]\npriority = \"high\"")?;
        let err = ProjectConfig::from_workdir(dir.path()).err();
        assert!(err.is_some_and(|err| err.to_string().contains("Allowed values: High, Medium, Low")));
        Ok(())
    }

    #[test]
    fn malformed_toml_reports_path() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "[view\npartition = ")?;
        let err = ProjectConfig::from_workdir(dir.path()).err();
        assert!(err.is_some_and(|err| err.to_string().contains("failed to parse")));
        Ok(())
    }
}
