//! Configuration and output layout.
//!
//! Every path is relative to a *document directory*. Without a config file
//! the defaults reproduce the layout the report tooling has always used:
//!
//! ```text
//! <project root>/               = <document dir>/../..
//! <document dir>/methods_steps_and_results.md
//! <document dir>/methods_steps_and_results.html
//! <document dir>/standalone/methods_steps_and_results.html
//! <document dir>/standalone/images/
//! <document dir>/methods_steps_and_results_standalone.zip
//! ```
//!
//! A `mathdoc.toml` in the document directory overrides any of these:
//!
//! ```text
//! project_root = "../.."
//! source = "report.md"
//! output = "report.html"
//! title = "Quarterly Report"
//! image_prefix = "../../"
//!
//! [package]
//! dir = "standalone"
//! archive = "report_standalone.zip"
//! ```

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional config file looked up in the document directory.
pub const CONFIG_FILE: &str = "mathdoc.toml";

/// Name of the image directory inside the standalone directory.
pub const IMAGES_DIR: &str = "images";

/// User-facing configuration, all paths still relative.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub project_root: PathBuf,
    pub source: PathBuf,
    pub output: PathBuf,
    pub title: Option<String>,
    /// Prefix that marks an image path as relative to the document directory.
    pub image_prefix: String,
    pub package_dir: PathBuf,
    pub archive: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("../.."),
            source: PathBuf::from("methods_steps_and_results.md"),
            output: PathBuf::from("methods_steps_and_results.html"),
            title: None,
            image_prefix: "../../".to_string(),
            package_dir: PathBuf::from("standalone"),
            archive: PathBuf::from("methods_steps_and_results_standalone.zip"),
        }
    }
}

/// Raw config file structure for deserialization.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    project_root: Option<PathBuf>,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    title: Option<String>,
    image_prefix: Option<String>,
    #[serde(default)]
    package: RawPackageConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawPackageConfig {
    dir: Option<PathBuf>,
    archive: Option<PathBuf>,
}

impl Config {
    /// Parse a config from TOML text, filling unset keys with defaults.
    pub fn from_toml(input: &str, origin: &Path) -> Result<Self> {
        let raw: RawConfig = toml::from_str(input).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(convert_raw(raw))
    }

    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Load `mathdoc.toml` from `dir` if present, otherwise the defaults.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            log::debug!("using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

fn convert_raw(raw: RawConfig) -> Config {
    let defaults = Config::default();
    Config {
        project_root: raw.project_root.unwrap_or(defaults.project_root),
        source: raw.source.unwrap_or(defaults.source),
        output: raw.output.unwrap_or(defaults.output),
        title: raw.title.or(defaults.title),
        image_prefix: raw.image_prefix.unwrap_or(defaults.image_prefix),
        package_dir: raw.package.dir.unwrap_or(defaults.package_dir),
        archive: raw.package.archive.unwrap_or(defaults.archive),
    }
}

/// Fully resolved paths for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Directory the document lives in; `../` image paths resolve against it.
    pub document_dir: PathBuf,
    /// Absolute project root.
    pub project_root: PathBuf,
    /// Markdown source read by the renderer.
    pub markdown: PathBuf,
    /// Rendered HTML, written by the renderer and read by the packager.
    pub html: PathBuf,
    pub standalone_dir: PathBuf,
    pub images_dir: PathBuf,
    pub standalone_html: PathBuf,
    pub archive: PathBuf,
    pub title: Option<String>,
    pub image_prefix: String,
}

impl Layout {
    /// Resolve `config` against a document directory.
    pub fn from_config(document_dir: &Path, config: &Config) -> Self {
        let document_dir = absolutize(document_dir);
        let project_root = absolutize(&document_dir.join(&config.project_root));
        let html = document_dir.join(&config.output);
        let standalone_dir = document_dir.join(&config.package_dir);
        let html_name = html
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("index.html"));

        Self {
            markdown: document_dir.join(&config.source),
            standalone_html: standalone_dir.join(html_name),
            images_dir: standalone_dir.join(IMAGES_DIR),
            archive: document_dir.join(&config.archive),
            title: config.title.clone(),
            image_prefix: config.image_prefix.clone(),
            document_dir,
            project_root,
            html,
            standalone_dir,
        }
    }
}

/// Canonical path when it exists, otherwise an absolute one.
fn absolutize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
