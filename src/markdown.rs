//! Converts post bodies from markdown to HTML. Headings without an explicit
//! `{#id}` get an `id` generated from their text so they can be linked to.
//! The output is not sanitized; post sources are trusted.

use std::collections::HashSet;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// The anchor used for headings whose text slugifies to nothing.
const EMPTY_ANCHOR: &str = "section";

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options.insert(Options::ENABLE_DEFINITION_LIST);
    options
}

/// Converts `markdown` into an HTML fragment. The same input always yields
/// the same output.
pub fn to_html(markdown: &str) -> String {
    let mut events: Vec<Event> = Parser::new_ext(markdown, options()).collect();
    assign_heading_ids(&mut events);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Fills in the `id` of every heading that doesn't already have one. IDs are
/// unique within one document; repeats get a `-1`, `-2`, ... suffix.
/// Explicit `{#id}`s are reserved up front, wherever they appear.
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen: HashSet<String> = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect();

    for i in 0..events.len() {
        let text = match &events[i] {
            Event::Start(Tag::Heading { id: None, .. }) => {
                heading_text(&events[i + 1..])
            }
            _ => continue,
        };

        let anchor = unique_anchor(&mut seen, &text);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor));
        }
    }
}

// Collects the text of a heading from the events following its start tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(s) | Event::Code(s) => text.push_str(s),
            _ => {}
        }
    }
    text
}

fn unique_anchor(seen: &mut HashSet<String>, text: &str) -> String {
    let mut base = slug::slugify(text);
    if base.is_empty() {
        base = EMPTY_ANCHOR.to_owned();
    }

    let mut anchor = base.clone();
    let mut n = 0;
    while seen.contains(&anchor) {
        n += 1;
        anchor = format!("{}-{}", base, n);
    }
    seen.insert(anchor.clone());
    anchor
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_heading_gets_id() {
        let html = to_html("# Hello");
        assert_eq!(html, "<h1 id=\"hello\">Hello</h1>\n");
    }

    #[test]
    fn test_heading_ids_are_slugs() {
        let html = to_html("## Hello, `big` World!");
        assert!(html.starts_with("<h2 id=\"hello-big-world\">"), "{}", html);
    }

    #[test]
    fn test_duplicate_headings() {
        let html = to_html("# Intro\n\n# Intro\n\n## Intro");
        assert!(html.contains("<h1 id=\"intro\">"), "{}", html);
        assert!(html.contains("<h1 id=\"intro-1\">"), "{}", html);
        assert!(html.contains("<h2 id=\"intro-2\">"), "{}", html);
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let html = to_html("# Custom {#mine}\n\n# Mine");
        assert!(html.contains("<h1 id=\"mine\">Custom"), "{}", html);
        assert!(html.contains("<h1 id=\"mine-1\">Mine</h1>"), "{}", html);
    }

    #[test]
    fn test_explicit_heading_id_reserved_before_use() {
        let html = to_html("# Mine\n\n# Custom {#mine}");
        assert!(html.contains("<h1 id=\"mine-1\">Mine</h1>"), "{}", html);
        assert!(html.contains("<h1 id=\"mine\">Custom"), "{}", html);
        assert_eq!(html.matches("id=\"mine\"").count(), 1, "{}", html);
    }

    #[test]
    fn test_empty_heading() {
        let html = to_html("# !!!");
        assert!(html.contains("id=\"section\""), "{}", html);
    }

    #[test]
    fn test_common_extensions() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"), "{}", html);
        assert!(html.contains("<del>gone</del>"), "{}", html);
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = to_html("<div class=\"note\">hi</div>");
        assert!(html.contains("<div class=\"note\">hi</div>"), "{}", html);
    }

    #[test]
    fn test_deterministic() {
        let body = "# One\n\nSome *text*.\n\n# One\n\n```go\nfmt.Println()\n```";
        assert_eq!(to_html(body), to_html(body));
    }
}
