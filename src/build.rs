//! Exports the functions that stitch the pipeline stages together: loading
//! posts ([`crate::load`]), rendering post and index pages
//! ([`crate::render`]), and saving newly generated posts
//! ([`crate::generate`]). Pages are written one at a time; if one fails, the
//! pages written before it stay on disk.

use crate::config::Config;
use crate::generate::{today, write_generated_post, Error as GenerateError, Generator};
use crate::load::{load_post, load_posts};
use crate::post::{Error as ParseError, Post, MARKDOWN_EXTENSION};
use crate::render::{Error as RenderError, Renderer};
use crate::source::DirSource;
use crate::templates::Error as TemplatesError;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// The file name of the index page within the output directory.
pub const INDEX_FILE: &str = "index.html";

/// Renders every post in the configured posts directory plus the index page.
/// Returns the posts in index order.
pub fn build_site(config: &Config) -> Result<Vec<Post>> {
    let templates = config.templates()?;
    let renderer = Renderer::new(&templates);

    let posts = load_posts(&DirSource::new(&config.posts_directory))?;
    create_dir(&config.output_directory)?;
    for post in &posts {
        write_post_page(&renderer, &config.output_directory, post)?;
    }
    write_index_page(&renderer, &config.output_directory, &posts)?;
    Ok(posts)
}

/// Renders the single post whose source file is called `name`. The index
/// page is left alone.
pub fn render_single(config: &Config, name: &str) -> Result<Post> {
    let templates = config.templates()?;
    let renderer = Renderer::new(&templates);

    let post = load_post(&DirSource::new(&config.posts_directory), name)?;
    create_dir(&config.output_directory)?;
    write_post_page(&renderer, &config.output_directory, &post)?;
    Ok(post)
}

/// Asks `generator` for a new post, saves it into the posts directory dated
/// today, renders its page, and re-renders the index. Returns the new post.
pub fn publish<G: Generator>(config: &Config, generator: &G) -> Result<Post> {
    let templates = config.templates()?;
    let renderer = Renderer::new(&templates);
    let source = DirSource::new(&config.posts_directory);

    create_dir(&config.posts_directory)?;
    let existing = load_posts(&source)?;
    let titles: Vec<&str> = existing.iter().map(|p| p.title.as_str()).collect();
    let text = generator.generate(&titles)?;
    let id = write_generated_post(&config.posts_directory, &text, &today())?;
    info!("saved post `{}`", id);

    let post = load_post(&source, &format!("{}{}", id, MARKDOWN_EXTENSION))?;
    create_dir(&config.output_directory)?;
    write_post_page(&renderer, &config.output_directory, &post)?;

    let posts = load_posts(&source)?;
    write_index_page(&renderer, &config.output_directory, &posts)?;
    Ok(post)
}

fn write_post_page(renderer: &Renderer, output_directory: &Path, post: &Post) -> Result<()> {
    let path = output_directory.join(format!("{}.html", post.id));
    let mut file = create_file(&path)?;
    renderer
        .render_post(&mut file, post)
        .map_err(|err| Error::Render { path: path.clone(), err })?;
    info!("wrote {}", path.display());
    Ok(())
}

fn write_index_page(renderer: &Renderer, output_directory: &Path, posts: &[Post]) -> Result<()> {
    let path = output_directory.join(INDEX_FILE);
    let mut file = create_file(&path)?;
    renderer
        .render_index(&mut file, posts)
        .map_err(|err| Error::Render { path: path.clone(), err })?;
    info!("wrote {} ({} posts)", path.display(), posts.len());
    Ok(())
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|err| Error::Output {
        path: dir.to_owned(),
        err,
    })
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|err| Error::Output {
        path: path.to_owned(),
        err,
    })
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for pipeline runs. Errors can come from parsing posts,
/// compiling templates, rendering pages, generating posts, or creating
/// output files.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading posts.
    Parse(ParseError),

    /// Returned for errors compiling the templates.
    Templates(TemplatesError),

    /// Returned for errors rendering a page.
    Render { path: PathBuf, err: RenderError },

    /// Returned for errors producing or saving a generated post.
    Generate(GenerateError),

    /// Returned for I/O problems creating output directories and files.
    Output { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Templates(err) => err.fmt(f),
            Error::Render { path, err } => {
                write!(f, "Rendering '{}': {}", path.display(), err)
            }
            Error::Generate(err) => err.fmt(f),
            Error::Output { path, err } => {
                write!(f, "Creating '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Templates(err) => Some(err),
            Error::Render { path: _, err } => Some(err),
            Error::Generate(err) => Some(err),
            Error::Output { path: _, err } => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<TemplatesError> for Error {
    fn from(err: TemplatesError) -> Error {
        Error::Templates(err)
    }
}

impl From<GenerateError> for Error {
    fn from(err: GenerateError) -> Error {
        Error::Generate(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::generate::ReaderGenerator;

    fn project() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_defaults(dir.path());
        std::fs::create_dir_all(&config.posts_directory).unwrap();
        (dir, config)
    }

    fn write_source(config: &Config, name: &str, contents: &str) {
        std::fs::write(config.posts_directory.join(name), contents).unwrap();
    }

    fn read_output(config: &Config, name: &str) -> String {
        std::fs::read_to_string(config.output_directory.join(name)).unwrap()
    }

    #[test]
    fn test_build_site() {
        let (_dir, config) = project();
        write_source(&config, "old.md", "Title: Old\nDate: 01-Jan-2024\n---\n# Old news");
        write_source(&config, "new.md", "Title: New\nDate: 15-Jun-2024\n---\nFresh");

        let posts = build_site(&config).unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);

        assert!(read_output(&config, "old.html").contains("<h1 id=\"old-news\">Old news</h1>"));
        assert!(read_output(&config, "new.html").contains("<p>Fresh</p>"));

        let index = read_output(&config, INDEX_FILE);
        let new_at = index.find("new.html").unwrap();
        let old_at = index.find("old.html").unwrap();
        assert!(new_at < old_at, "{}", index);
    }

    #[test]
    fn test_build_site_missing_posts_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_defaults(dir.path());
        assert!(matches!(build_site(&config), Err(Error::Parse(_))));
    }

    #[test]
    fn test_build_site_bad_theme() {
        let (dir, mut config) = project();
        let post = dir.path().join("post.html");
        let index = dir.path().join("index.html");
        std::fs::write(&post, "{{ if .title }}").unwrap();
        std::fs::write(&index, "{{ .seo_title }}").unwrap();
        config.theme = Some(crate::config::Theme {
            post_template: vec![post],
            index_template: vec![index],
        });
        assert!(matches!(build_site(&config), Err(Error::Templates(_))));
    }

    #[test]
    fn test_render_single() {
        let (_dir, config) = project();
        write_source(&config, "one.md", "Title: One\nDate: 01-Jan-2024\n---\nbody");
        write_source(&config, "two.md", "Title: Two\nDate: 02-Jan-2024\n---\nbody");

        let post = render_single(&config, "one.md").unwrap();
        assert_eq!(post.id, "one");
        assert!(config.output_directory.join("one.html").is_file());
        assert!(!config.output_directory.join("two.html").exists());
        assert!(!config.output_directory.join(INDEX_FILE).exists());
    }

    #[test]
    fn test_publish() {
        let (_dir, config) = project();
        write_source(&config, "earlier.md", "Title: Earlier\nDate: 01-Jan-2000\n---\nbody");

        let generator = ReaderGenerator::new("Title: Fresh Take on Go\n---\n## Channels\n\nUse them.".as_bytes());
        let post = publish(&config, &generator).unwrap();
        assert_eq!(post.id, "fresh-take-on-go");
        assert_eq!(post.title, "Fresh Take on Go");
        assert_eq!(post.date, today());
        assert_eq!(post.body, "## Channels\n\nUse them.");

        assert!(read_output(&config, "fresh-take-on-go.html").contains("<h2 id=\"channels\">"));
        let index = read_output(&config, INDEX_FILE);
        assert!(index.find("fresh-take-on-go.html").unwrap() < index.find("earlier.html").unwrap());
    }
}
