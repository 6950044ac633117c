//! Loads the project configuration from a `postbake.yaml` file. Every key is
//! optional:
//!
//! ```yaml
//! posts_directory: posts
//! output_directory: static
//! theme:
//!   post_template: [theme/post.html]
//!   index_template: [theme/index.html]
//! generator:
//!   command: [gen-post, --long]
//! ```
//!
//! Relative paths are resolved against the directory containing the project
//! file.

use crate::templates::Templates;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "postbake.yaml";

fn default_posts_directory() -> PathBuf {
    PathBuf::from("posts")
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("static")
}

#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_posts_directory")]
    posts_directory: PathBuf,

    #[serde(default = "default_output_directory")]
    output_directory: PathBuf,

    #[serde(default)]
    theme: Option<Theme>,

    #[serde(default)]
    generator: Option<GeneratorConfig>,
}

/// Template files overriding the embedded templates. Each template may be
/// split across several files.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Theme {
    pub post_template: Vec<PathBuf>,
    pub index_template: Vec<PathBuf>,
}

/// Configuration for the external program that produces new posts.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    pub command: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The directory holding the post sources.
    pub posts_directory: PathBuf,

    /// The directory into which HTML pages are written.
    pub output_directory: PathBuf,

    /// Template overrides; `None` means the embedded templates.
    pub theme: Option<Theme>,

    pub generator: Option<GeneratorConfig>,
}

impl Config {
    /// The configuration used when there's no project file: `posts` and
    /// `static` under `root`, embedded templates, and no generator.
    pub fn with_defaults(root: &Path) -> Config {
        Config {
            posts_directory: root.join(default_posts_directory()),
            output_directory: root.join(default_output_directory()),
            theme: None,
            generator: None,
        }
    }

    /// Searches `dir` and its ancestors for a project file and loads the
    /// first one found. Returns `Ok(None)` if there isn't one.
    pub fn from_directory(dir: &Path) -> Result<Option<Config>> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            match Config::from_project_file(&path) {
                Ok(config) => Ok(Some(config)),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Ok(None),
            }
        }
    }

    /// Loads a configuration from the project file at `path`.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config {
                posts_directory: project_root.join(project.posts_directory),
                output_directory: project_root.join(project.output_directory),
                theme: project.theme.map(|theme| Theme {
                    post_template: resolve_all(project_root, theme.post_template),
                    index_template: resolve_all(project_root, theme.index_template),
                }),
                generator: project.generator,
            }),
        }
    }

    /// Compiles the configured templates: the theme's if there is one,
    /// otherwise the embedded set.
    pub fn templates(&self) -> std::result::Result<Templates, crate::templates::Error> {
        match &self.theme {
            Some(theme) => Templates::from_files(&theme.post_template, &theme.index_template),
            None => Templates::embedded(),
        }
    }
}

fn resolve_all(root: &Path, paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.into_iter().map(|p| root.join(p)).collect()
}
