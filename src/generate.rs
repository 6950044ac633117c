//! Writes externally generated posts into the posts directory. A
//! [`Generator`] produces post text in the usual source format minus the date
//! line:
//!
//! ```text
//! Title: A concise title
//! ---
//! Body...
//! ```
//!
//! [`write_generated_post`] stamps it with a date and saves it under a file
//! name derived from the title.

use crate::post::{extract, DATE_PREFIX, MARKDOWN_EXTENSION, TITLE_PREFIX};
use crate::sort::DATE_FORMAT;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// The environment variable through which [`CommandGenerator`] passes the
/// titles of existing posts, one per line.
pub const PREVIOUS_TITLES_VAR: &str = "POSTBAKE_PREVIOUS_TITLES";

/// Produces the text of a new post. `previous_titles` lists the titles of
/// posts that already exist so the producer can avoid repeating them.
pub trait Generator {
    fn generate(&self, previous_titles: &[&str]) -> Result<String>;
}

/// Runs an external program and takes the new post from its stdout.
#[derive(Clone, Debug)]
pub struct CommandGenerator {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandGenerator {
    /// Builds a generator from a command line such as `["gen-post", "--pro"]`.
    pub fn from_command(command: &[String]) -> Result<CommandGenerator> {
        match command.split_first() {
            Some((program, args)) => Ok(CommandGenerator {
                program: program.clone(),
                args: args.to_vec(),
            }),
            None => Err(Error::EmptyCommand),
        }
    }
}

impl Generator for CommandGenerator {
    fn generate(&self, previous_titles: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .env(PREVIOUS_TITLES_VAR, previous_titles.join("\n"))
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|err| Error::Spawn {
                program: self.program.clone(),
                err,
            })?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                program: self.program.clone(),
                status: output.status,
            });
        }
        String::from_utf8(output.stdout)
            .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

/// Takes an already-produced post from a reader, e.g. a file or stdin. The
/// previous titles are ignored.
pub struct ReaderGenerator<R> {
    reader: std::cell::RefCell<R>,
}

impl<R: Read> ReaderGenerator<R> {
    pub fn new(reader: R) -> ReaderGenerator<R> {
        ReaderGenerator {
            reader: std::cell::RefCell::new(reader),
        }
    }
}

impl<R: Read> Generator for ReaderGenerator<R> {
    fn generate(&self, _previous_titles: &[&str]) -> Result<String> {
        let mut text = String::new();
        self.reader.borrow_mut().read_to_string(&mut text)?;
        Ok(text)
    }
}

lazy_static! {
    static ref SPECIAL_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Derives a file name (without extension) from a post title: anything other
/// than ASCII letters, digits, and whitespace is dropped, the rest is
/// lower-cased, and whitespace runs become single hyphens.
pub fn sanitize_file_name(title: &str) -> String {
    let stripped = SPECIAL_CHARS.replace_all(title, "");
    let lowered = stripped.trim().to_lowercase();
    WHITESPACE.replace_all(&lowered, "-").into_owned()
}

/// Today's local date in the post date format (e.g. `22-Dec-2024`).
pub fn today() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// A generated post ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Composed {
    pub title: String,
    pub contents: String,
}

/// Turns generated text into post source: the first line is the title
/// (`Title: ` stripped if present), followed by a `Date:` line carrying
/// `date`, followed by every remaining line of `text`.
pub fn compose_post(text: &str, date: &str) -> Result<Composed> {
    let mut lines = text.lines();
    let title = match lines.next() {
        Some(line) if !line.trim().is_empty() => extract(line, TITLE_PREFIX).value.trim(),
        _ => return Err(Error::MissingTitle),
    };

    let mut contents = format!("{}{}\n{}{}\n", TITLE_PREFIX, title, DATE_PREFIX, date);
    for line in lines {
        contents.push_str(line);
        contents.push('\n');
    }
    Ok(Composed {
        title: title.to_owned(),
        contents,
    })
}

/// Saves generated post `text` into `directory` as `<sanitized title>.md`,
/// dated `date`. Returns the new post's ID.
pub fn write_generated_post(directory: &Path, text: &str, date: &str) -> Result<String> {
    let composed = compose_post(text, date)?;
    let id = sanitize_file_name(&composed.title);
    if id.is_empty() {
        return Err(Error::EmptyFileName(composed.title));
    }

    let path = directory.join(format!("{}{}", id, MARKDOWN_EXTENSION));
    File::create(&path)
        .and_then(|mut file| file.write_all(composed.contents.as_bytes()))
        .map_err(|err| Error::Write { path, err })?;
    Ok(id)
}

/// The result of a fallible generation operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error producing or saving a generated post.
#[derive(Debug)]
pub enum Error {
    /// Returned when the generated text has no title line.
    MissingTitle,

    /// Returned when the title has no characters usable in a file name.
    EmptyFileName(String),

    /// Returned when a [`CommandGenerator`] is configured with no program.
    EmptyCommand,

    /// Returned when the generator program can't be started.
    Spawn { program: String, err: io::Error },

    /// Returned when the generator program exits unsuccessfully.
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
    },

    /// Returned when the post file can't be written.
    Write { path: PathBuf, err: io::Error },

    /// Returned for other I/O errors.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingTitle => write!(f, "generated post has no title line"),
            Error::EmptyFileName(title) => {
                write!(f, "can't derive a file name from title `{}`", title)
            }
            Error::EmptyCommand => write!(f, "generator command is empty"),
            Error::Spawn { program, err } => {
                write!(f, "running generator `{}`: {}", program, err)
            }
            Error::CommandFailed { program, status } => {
                write!(f, "generator `{}` failed: {}", program, status)
            }
            Error::Write { path, err } => {
                write!(f, "writing post '{}': {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Spawn { err, .. } => Some(err),
            Error::Write { err, .. } => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::Post;
    use crate::sort::parse_date;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Hello, World!"), "hello-world");
        assert_eq!(
            sanitize_file_name("Go's   context  package\tin depth"),
            "gos-context-package-in-depth"
        );
        assert_eq!(sanitize_file_name("  Padded Title  "), "padded-title");
        assert_eq!(sanitize_file_name("C++ & Rust: 2024"), "c-rust-2024");
    }

    #[test]
    fn test_today_is_parseable() {
        assert!(parse_date(&today()).is_some());
    }

    #[test]
    fn test_compose_post() {
        let composed = compose_post(
            "Title: Understanding Closures\n---\nA closure captures.\n\nDone.",
            "05-May-2024",
        )
        .unwrap();
        assert_eq!(composed.title, "Understanding Closures");
        assert_eq!(
            composed.contents,
            "Title: Understanding Closures\nDate: 05-May-2024\n---\nA closure captures.\n\nDone.\n"
        );
    }

    #[test]
    fn test_compose_post_without_prefix() {
        let composed = compose_post("Bare Title\n---\nbody", "05-May-2024").unwrap();
        assert_eq!(composed.title, "Bare Title");
    }

    #[test]
    fn test_compose_post_requires_title() {
        assert!(matches!(compose_post("", "05-May-2024"), Err(Error::MissingTitle)));
        assert!(matches!(
            compose_post("   \nbody", "05-May-2024"),
            Err(Error::MissingTitle)
        ));
    }

    #[test]
    fn test_write_then_parse_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let body = "# Event Loop\n\nThe event loop runs tasks.\n\n```js\nsetTimeout(f, 0)\n```";
        let text = format!("Title: The JavaScript Event Loop\n---\n{}\n", body);

        let id = write_generated_post(dir.path(), &text, "22-Dec-2024").unwrap();
        assert_eq!(id, "the-javascript-event-loop");

        let file = std::fs::File::open(dir.path().join("the-javascript-event-loop.md")).unwrap();
        let post = Post::from_reader(std::io::BufReader::new(file), "the-javascript-event-loop.md")
            .unwrap();
        assert_eq!(
            post,
            Post {
                title: String::from("The JavaScript Event Loop"),
                date: String::from("22-Dec-2024"),
                body: body.to_owned(),
                id,
            }
        );
    }

    #[test]
    fn test_write_rejects_unusable_title() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_generated_post(dir.path(), "Title: !!!\n---\n", "22-Dec-2024"),
            Err(Error::EmptyFileName(_))
        ));
    }

    #[test]
    fn test_reader_generator() {
        let generator = ReaderGenerator::new("Title: From stdin\n---\nbody".as_bytes());
        assert_eq!(
            generator.generate(&["ignored"]).unwrap(),
            "Title: From stdin\n---\nbody"
        );
    }

    #[test]
    fn test_command_generator_from_empty_command() {
        assert!(matches!(
            CommandGenerator::from_command(&[]),
            Err(Error::EmptyCommand)
        ));
    }
}
