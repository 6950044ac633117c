//! Defines the [`Post`] type and the line-oriented parser that reads one from a
//! source stream. A post source looks like this:
//!
//! ```text
//! Title: Hello, world!
//! Date: 22-Dec-2024
//! ---
//! # Hello
//!
//! World
//! ```
//!
//! The first line is the title, the second is the date, the third line is a
//! separator whose content is ignored, and everything after it is the body.
//! Header parsing is permissive: a line missing its `Title: ` or `Date: `
//! prefix is taken verbatim, and a short stream yields empty fields rather
//! than an error. See [`extract`] and [`HeaderStatus`] for telling the two
//! apart.

use std::fmt;
use std::io::{self, BufRead};

/// The prefix expected on the first line of a post source.
pub const TITLE_PREFIX: &str = "Title: ";

/// The prefix expected on the second line of a post source.
pub const DATE_PREFIX: &str = "Date: ";

/// The extension stripped from source names to form post IDs.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Represents a blog post parsed from a source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// The title of the post, taken from the first line.
    pub title: String,

    /// The date of the post as it appears in the source (e.g., `22-Dec-2024`).
    /// This is kept as the raw text so rendering reproduces it exactly; see
    /// [`crate::sort::parse_date`] for the parsed form.
    pub date: String,

    /// The markdown body of the post with the trailing newline removed.
    pub body: String,

    /// The post's identifier, which is the source file name less the `.md`
    /// extension. It's used as the base name of the output file.
    pub id: String,
}

/// The result of a best-effort header extraction. `value` is the line with
/// the prefix removed, or the whole line if the prefix wasn't there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extracted<'a> {
    pub value: &'a str,

    /// Whether the expected prefix was actually present.
    pub prefixed: bool,
}

/// Strips `prefix` from `line` if present. Never fails; a line without the
/// prefix is returned whole with `prefixed` set to `false`.
pub fn extract<'a>(line: &'a str, prefix: &str) -> Extracted<'a> {
    match line.strip_prefix(prefix) {
        Some(value) => Extracted {
            value,
            prefixed: true,
        },
        None => Extracted {
            value: line,
            prefixed: false,
        },
    }
}

/// Records which header lines carried their expected prefix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderStatus {
    pub title_prefixed: bool,
    pub date_prefixed: bool,
}

impl HeaderStatus {
    /// True if both the title and date lines were well-formed.
    pub fn is_well_formed(&self) -> bool {
        self.title_prefixed && self.date_prefixed
    }
}

/// A [`Post`] along with what the parser observed about its header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parsed {
    pub post: Post,
    pub header: HeaderStatus,
}

impl Post {
    /// Parses a post from `reader`. `name` is the source file name from which
    /// the post ID is derived. Fails only if reading from `reader` fails.
    pub fn from_reader<R: BufRead>(reader: R, name: &str) -> Result<Post> {
        Ok(Post::parse(reader, name)?.post)
    }

    /// Like [`Post::from_reader`], but also reports whether the header lines
    /// had their expected prefixes.
    pub fn parse<R: BufRead>(reader: R, name: &str) -> Result<Parsed> {
        let mut lines = reader.lines();
        let mut next_line = || -> Result<String> {
            match lines.next() {
                Some(line) => Ok(line?),
                None => Ok(String::new()),
            }
        };

        let title_line = next_line()?;
        let date_line = next_line()?;
        let title = extract(&title_line, TITLE_PREFIX);
        let date = extract(&date_line, DATE_PREFIX);
        let header = HeaderStatus {
            title_prefixed: title.prefixed,
            date_prefixed: date.prefixed,
        };
        let title = title.value.to_owned();
        let date = date.value.to_owned();

        // the separator line is skipped whatever it contains
        let _ = next_line()?;

        let mut body = String::new();
        for line in lines {
            body.push_str(&line?);
            body.push('\n');
        }
        if body.ends_with('\n') {
            body.pop();
        }

        Ok(Parsed {
            post: Post {
                title,
                date,
                body,
                id: post_id(name).to_owned(),
            },
            header,
        })
    }
}

/// Derives a post ID from a source file name by removing a trailing `.md`.
pub fn post_id(name: &str) -> &str {
    name.strip_suffix(MARKDOWN_EXTENSION).unwrap_or(name)
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading or parsing a [`Post`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the source stream can't be read (including when it
    /// isn't valid UTF-8).
    Io(io::Error),

    /// Returned when enumerating a source directory fails.
    WalkDir(walkdir::Error),

    /// An error with an annotation, typically the name of the source entry.
    Annotated(String, Box<Error>),
}

impl Error {
    /// Wraps the error with a description of what was being done.
    pub fn annotate(self, annotation: impl Into<String>) -> Error {
        Error::Annotated(annotation.into(), Box::new(self))
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts a [`io::Error`] into an [`Error`]. It allows us to use the
    /// `?` operator for fallible I/O functions.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`].
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}
