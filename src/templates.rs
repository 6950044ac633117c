//! The compiled template set used by [`crate::render::Renderer`]. Templates
//! are written in Go template syntax (via [`gtmpl`]) and compiled once; a
//! [`Templates`] value is immutable afterwards and can be shared by reference.

use gtmpl::{Template, Value};
use pulldown_cmark_escape::escape_html;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// The name of the single-post template.
pub const POST_TEMPLATE: &str = "post";

/// The name of the index template.
pub const INDEX_TEMPLATE: &str = "index";

const EMBEDDED_POST: &str = include_str!("../templates/post.html");
const EMBEDDED_INDEX: &str = include_str!("../templates/index.html");

/// A compiled post template and index template.
pub struct Templates {
    post: Template,
    index: Template,
}

impl Templates {
    /// Compiles the template set bundled with the binary.
    pub fn embedded() -> Result<Templates> {
        Templates::from_sources(EMBEDDED_POST, EMBEDDED_INDEX)
    }

    /// Compiles a template set from template source text.
    pub fn from_sources(post: &str, index: &str) -> Result<Templates> {
        Ok(Templates {
            post: compile(POST_TEMPLATE, post)?,
            index: compile(INDEX_TEMPLATE, index)?,
        })
    }

    /// Compiles a template set from theme files. Each template may be split
    /// across several files; they're concatenated in order before parsing.
    /// At least one file is required for each template.
    pub fn from_files<P: AsRef<Path>>(post: &[P], index: &[P]) -> Result<Templates> {
        Ok(Templates {
            post: compile(POST_TEMPLATE, &read_template_files(POST_TEMPLATE, post)?)?,
            index: compile(INDEX_TEMPLATE, &read_template_files(INDEX_TEMPLATE, index)?)?,
        })
    }

    pub fn post(&self) -> &Template {
        &self.post
    }

    pub fn index(&self) -> &Template {
        &self.index
    }
}

/// The name of the template function that HTML-escapes its arguments, used
/// as `{{ .title | html }}`.
pub const HTML_FUNC: &str = "html";

fn compile(name: &'static str, source: &str) -> Result<Template> {
    let mut template = Template::default();
    template.add_func(HTML_FUNC, html);
    template
        .parse(source)
        .map_err(|err| Error::ParseTemplate { name, err })?;
    Ok(template)
}

// Escapes the string form of each argument for use in HTML text or a quoted
// attribute. Multiple arguments are joined without a separator.
fn html(args: &[Value]) -> std::result::Result<Value, String> {
    let mut out = String::new();
    for arg in args {
        escape_html(&mut out, &arg.to_string()).map_err(|e| format!("escaping html: {}", e))?;
    }
    Ok(Value::String(out))
}

// Loads the template file contents and appends them into a single source
// string.
fn read_template_files<P: AsRef<Path>>(name: &'static str, files: &[P]) -> Result<String> {
    if files.is_empty() {
        return Err(Error::MissingTemplate(name));
    }

    let mut contents = String::new();
    for template_file in files {
        let template_file = template_file.as_ref();
        File::open(template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }
    Ok(contents)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a [`Templates`] set. All of these are fatal
/// at startup.
#[derive(Debug)]
pub enum Error {
    /// Returned when no source files were given for a required template.
    MissingTemplate(&'static str),

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for syntax errors in template source.
    ParseTemplate { name: &'static str, err: String },

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingTemplate(name) => {
                write!(f, "Missing required template '{}'", name)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { name, err } => {
                write!(f, "Parsing template '{}': {}", name, err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingTemplate(_) => None,
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts [`io::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
