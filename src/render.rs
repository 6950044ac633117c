//! Renders posts and the post index into HTML through the compiled
//! [`Templates`]. Each render call builds a fresh view model, executes the
//! template into a buffer, and then writes the buffer to the sink, so a
//! template failure never leaves partial output behind.

use crate::markdown;
use crate::post::Post;
use crate::templates::Templates;
use gtmpl::{Context, Template, Value};
use std::fmt;
use std::io::{self, Write};

/// The page title of the index page.
pub const INDEX_TITLE: &str = "Blog";

/// The data made available to the post template: the post's own fields, its
/// body converted to HTML, and a title for the `<title>` tag.
pub struct PostViewModel<'a> {
    pub post: &'a Post,
    pub html_body: String,
    pub seo_title: String,
}

impl<'a> PostViewModel<'a> {
    pub fn new(post: &'a Post) -> PostViewModel<'a> {
        PostViewModel {
            post,
            html_body: markdown::to_html(&post.body),
            seo_title: post.title.clone(),
        }
    }
}

/// The data made available to the index template. Bodies aren't rendered
/// on the index.
pub struct IndexViewModel<'a> {
    pub posts: &'a [Post],
    pub seo_title: &'static str,
}

impl<'a> IndexViewModel<'a> {
    pub fn new(posts: &'a [Post]) -> IndexViewModel<'a> {
        IndexViewModel {
            posts,
            seo_title: INDEX_TITLE,
        }
    }
}

/// Applies the post and index templates. A renderer holds nothing but a
/// reference to its compiled templates.
pub struct Renderer<'t> {
    templates: &'t Templates,
}

impl<'t> Renderer<'t> {
    pub fn new(templates: &'t Templates) -> Renderer<'t> {
        Renderer { templates }
    }

    /// Renders a single post page into `w`.
    pub fn render_post<W: Write>(&self, w: &mut W, post: &Post) -> Result<()> {
        let vm = PostViewModel::new(post);
        execute(self.templates.post(), Value::from(&vm), w)
    }

    /// Renders the index page listing `posts` (in the order given) into `w`.
    pub fn render_index<W: Write>(&self, w: &mut W, posts: &[Post]) -> Result<()> {
        let vm = IndexViewModel::new(posts);
        execute(self.templates.index(), Value::from(&vm), w)
    }
}

fn execute<W: Write>(template: &Template, value: Value, w: &mut W) -> Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    template.execute(&mut buf, &Context::from(value)?)?;
    w.write_all(&buf)?;
    Ok(())
}

/// The result of a fallible render operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a render operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing to the output sink.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}
