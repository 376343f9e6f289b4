//! Layered configuration loading

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
const PROJECT_FILES: [&str; 2] = ["parley.toml", ".parley.toml"];

/// Prefix of environment overrides, e.g. `PARLEY_AGENT__MODEL`.
pub const ENV_PREFIX: &str = "PARLEY_";

/// A TOML file that may contribute to the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub label: &'static str,
    pub path: PathBuf,
}

impl ConfigFile {
    fn new(label: &'static str, path: impl Into<PathBuf>) -> Self {
        Self {
            label,
            path: path.into(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Merge defaults, config files and `PARLEY_<SECTION>__<KEY>` overrides.
    ///
    /// Files from [`ConfigLoader::files`] are layered lowest priority first;
    /// missing files are skipped, except a missing explicit file, which is an error.
    pub fn load(explicit: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = explicit
            && !path.exists()
        {
            let message = format!("config file not found: {}", path.display());
            return Err(Box::new(figment::Error::from(message)));
        }

        let figment = Self::files(explicit)
            .into_iter()
            .filter(ConfigFile::exists)
            .fold(
                Figment::from(Serialized::defaults(FileConfig::default())),
                |figment, file| figment.merge(Toml::file(&file.path)),
            );

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Built-in defaults only (`--no-config`).
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Candidate files, lowest priority first: global, project, explicit.
    pub fn files(explicit: Option<&Path>) -> Vec<ConfigFile> {
        let mut files = Vec::with_capacity(3);
        if let Some(global) = dirs::config_dir() {
            files.push(ConfigFile::new("global", global.join("parley").join("config.toml")));
        }
        let project = PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from(PROJECT_FILES[0]));
        files.push(ConfigFile::new("project", project));
        if let Some(path) = explicit {
            files.push(ConfigFile::new("explicit", path));
        }
        files
    }

    /// Print every source, highest priority first, marking which files exist.
    pub fn print_config_sources(explicit: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV    ] {ENV_PREFIX}<SECTION>__<KEY>");
        for file in Self::files(explicit).iter().rev() {
            let mark = if file.exists() { "FOUND" } else { "" };
            println!("  [{mark:<7}] {:<8} {}", file.label, file.path.display());
        }
        println!("  [       ] defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.agent.answer_marker, "AI:");
        assert_eq!(config.summarization.workers, 10);
    }

    #[test]
    fn test_files_are_ordered_lowest_priority_first() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        let files = ConfigLoader::files(Some(&explicit));

        let labels: Vec<_> = files.iter().map(|f| f.label).collect();
        assert_eq!(labels.last(), Some(&"explicit"));
        assert!(labels.contains(&"project"));
        assert_eq!(files.last().unwrap().path, explicit);
        if let Some(global) = files.iter().find(|f| f.label == "global") {
            assert!(global.path.ends_with("parley/config.toml"));
        }
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let file = write_config(
            "[summarization]\nworkers = 3\nmodel = \"qwen-turbo\"\n\n[agent]\nhistory_limit = 12\n",
        );

        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.summarization.workers, 3);
        assert_eq!(config.summarization.model, "qwen-turbo");
        assert_eq!(config.agent.history_limit, 12);
        assert_eq!(config.agent.answer_marker, "AI:");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = write_config("[summarization]\nworkers = \"many\"\n");
        assert!(ConfigLoader::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
