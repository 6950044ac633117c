//! Loads posts from a [`PostSource`]. [`load_posts`] parses every entry and
//! returns the posts newest-first; [`load_post`] parses a single named entry.

use tracing::debug;

use crate::post::{Post, Result};
use crate::sort::sort_posts;
use crate::source::PostSource;

/// Parses every entry in `source` and returns the posts sorted by date (most
/// recent first). The first entry that can't be opened or parsed aborts the
/// whole load and its error is returned; no partial results are kept.
pub fn load_posts<S: PostSource>(source: &S) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    for name in source.names()? {
        posts.push(load_post(source, &name)?);
    }
    sort_posts(&mut posts);
    Ok(posts)
}

/// Parses the single entry called `name` from `source`.
pub fn load_post<S: PostSource>(source: &S, name: &str) -> Result<Post> {
    match parse_entry(source, name) {
        Ok(post) => Ok(post),
        Err(e) => Err(e.annotate(format!("parsing post `{}`", name))),
    }
}

fn parse_entry<S: PostSource>(source: &S, name: &str) -> Result<Post> {
    debug!("loading post `{}`", name);
    let parsed = Post::parse(source.open(name)?, name)?;
    if !parsed.header.is_well_formed() {
        debug!(
            "post `{}` has a degraded header (title prefixed: {}, date prefixed: {})",
            name, parsed.header.title_prefixed, parsed.header.date_prefixed
        );
    }
    Ok(parsed.post)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::Error;
    use crate::source::{DirSource, MemorySource};
    use std::error::Error as _;

    #[test]
    fn test_load_posts() {
        let source = MemorySource::new().with(
            "hello-world.md",
            "Title: My first blog post\nDate: 22-Dec-2024\n---\nHello, this is my first blog post. I hope you enjoy it.",
        );
        let posts = load_posts(&source).unwrap();
        assert_eq!(posts.len(), source.len());
        assert_eq!(
            posts[0],
            Post {
                title: String::from("My first blog post"),
                date: String::from("22-Dec-2024"),
                body: String::from(
                    "Hello, this is my first blog post. I hope you enjoy it."
                ),
                id: String::from("hello-world"),
            }
        );
    }

    #[test]
    fn test_load_posts_newest_first() {
        let source = MemorySource::new()
            .with("a.md", "Title: A\nDate: 01-Jan-2024\n---\na")
            .with("b.md", "Title: B\nDate: 15-Jun-2024\n---\nb");
        let posts = load_posts(&source).unwrap();
        let dates: Vec<&str> = posts.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["15-Jun-2024", "01-Jan-2024"]);
    }

    #[test]
    fn test_load_posts_invalid_date_last() {
        let source = MemorySource::new()
            .with("a.md", "Title: A\nDate: not-a-date\n---\na")
            .with("b.md", "Title: B\nDate: 01-Jan-2024\n---\nb");
        let posts = load_posts(&source).unwrap();
        assert_eq!(posts[0].date, "01-Jan-2024");
        assert_eq!(posts[1].date, "not-a-date");
    }

    #[test]
    fn test_load_empty_source() {
        assert!(load_posts(&MemorySource::new()).unwrap().is_empty());
    }

    #[test]
    fn test_load_post_missing_entry() {
        let source = MemorySource::new();
        let err = load_post(&source, "ghost.md").unwrap_err();
        assert!(err.to_string().contains("ghost.md"));
        assert!(matches!(&err, Error::Annotated(_, inner) if matches!(**inner, Error::Io(_))));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_load_posts_aborts_on_bad_entry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("good.md"),
            "Title: Good\nDate: 01-Jan-2024\n---\nfine",
        )
        .unwrap();
        std::fs::write(dir.path().join("bad.md"), b"Title: \xff\n").unwrap();

        let err = load_posts(&DirSource::new(dir.path())).unwrap_err();
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_load_post_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("only.md"),
            "Title: Only\nDate: 03-Mar-2024\n---\n# Body",
        )
        .unwrap();
        let post = load_post(&DirSource::new(dir.path()), "only.md").unwrap();
        assert_eq!(post.id, "only");
        assert_eq!(post.body, "# Body");
    }
}
