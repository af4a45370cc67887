//! Settings file and keyword list loading.

use crate::error::{Error, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings file name looked up in the working directory.
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Environment variable marking a container run.
pub const DOCKER_ENV: &str = "IS_DOCKER";

/// Mounted data directory inside the container.
pub const DOCKER_DATA_DIR: &str = "/data";

/// Settings baked into the container image.
pub const DOCKER_APP_SETTINGS: &str = "/app/settings.yaml";

/// Search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory results are written to
    pub output_path: String,
    /// Keyword list file
    pub keyword_path: String,
    /// Show progress bars
    #[serde(deserialize_with = "deserialize_flag")]
    pub progress_display: bool,
    /// Search drawing shapes as well as cells
    #[serde(deserialize_with = "deserialize_flag")]
    pub shape_search: bool,
    /// Registered handler names to run
    pub doc_types: Vec<String>,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    #[serde(skip)]
    docker: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: "output".to_string(),
            keyword_path: "input/keywords.txt".to_string(),
            progress_display: true,
            shape_search: true,
            doc_types: vec!["excel".to_string()],
            log_level: "warn".to_string(),
            docker: false,
        }
    }
}

impl Config {
    /// Load settings for this run.
    ///
    /// `explicit` overrides the default location. Inside a container
    /// (`IS_DOCKER=true`) the default is `/data/settings.yaml`, falling back
    /// to `/app/settings.yaml`, and relative paths resolve under `/data`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let docker = is_docker();
        let file = match explicit {
            Some(path) => path.to_path_buf(),
            None => default_settings_file(docker),
        };
        let mut config = Self::load_from(&file)?;
        config.docker = docker;
        Ok(config)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text. Absent keys keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Whether paths resolve under the container data directory.
    pub fn is_docker(&self) -> bool {
        self.docker
    }

    /// Resolve a configured path for this environment.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if self.docker && path.is_relative() {
            Path::new(DOCKER_DATA_DIR).join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.output_path)
    }

    /// Resolved keyword list file.
    pub fn keyword_file(&self) -> PathBuf {
        self.resolve(&self.keyword_path)
    }
}

fn is_docker() -> bool {
    std::env::var(DOCKER_ENV)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn default_settings_file(docker: bool) -> PathBuf {
    if !docker {
        return PathBuf::from(SETTINGS_FILE);
    }
    let mounted = Path::new(DOCKER_DATA_DIR).join(SETTINGS_FILE);
    if mounted.exists() {
        mounted
    } else {
        PathBuf::from(DOCKER_APP_SETTINGS)
    }
}

/// Only a `false` value (any case) turns a flag off.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a boolean or string flag")
        }

        fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            let off = ["false", "no", "off"]
                .iter()
                .any(|word| value.eq_ignore_ascii_case(word));
            Ok(!off)
        }

        fn visit_i64<E>(self, _value: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(true)
        }

        fn visit_u64<E>(self, _value: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(true)
        }

        fn visit_f64<E>(self, _value: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(true)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(true)
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(true)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Read a keyword list: one keyword per line, trimmed.
///
/// Blank lines and lines starting with `//` are ignored. A missing file
/// yields an empty list.
pub fn load_keywords(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        warn!(path = %path.display(), "keyword list not found");
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(parse_keywords(&content))
}

/// Parse keyword list text.
pub fn parse_keywords(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().trim_start_matches('\u{feff}'))
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .map(str::to_string)
        .collect()
}
