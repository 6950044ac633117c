//! Conversions from posts and view models into template [`Value`]s. Keys are
//! snake_case, so templates refer to e.g. `{{ .html_body }}`.

use crate::post::Post;
use crate::render::{IndexViewModel, PostViewModel};
use gtmpl::Value;
use std::collections::HashMap;

fn string(s: &str) -> Value {
    Value::String(s.to_owned())
}

/// The fields shown for a post in the index: `title`, `date`, and `id`.
pub fn summarize(post: &Post) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), string(&post.title));
    m.insert("date".to_owned(), string(&post.date));
    m.insert("id".to_owned(), string(&post.id));
    Value::Object(m)
}

impl From<&Post> for Value {
    /// Converts a [`Post`] into an object with `title`, `date`, `id`, and the
    /// raw markdown `body`.
    fn from(post: &Post) -> Value {
        let mut value = summarize(post);
        if let Value::Object(m) = &mut value {
            m.insert("body".to_owned(), string(&post.body));
        }
        value
    }
}

impl From<&PostViewModel<'_>> for Value {
    /// Adds `html_body` and `seo_title` to the post's own fields.
    fn from(vm: &PostViewModel<'_>) -> Value {
        let mut value = Value::from(vm.post);
        if let Value::Object(m) = &mut value {
            m.insert("html_body".to_owned(), string(&vm.html_body));
            m.insert("seo_title".to_owned(), string(&vm.seo_title));
        }
        value
    }
}

impl From<&IndexViewModel<'_>> for Value {
    fn from(vm: &IndexViewModel<'_>) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "posts".to_owned(),
            Value::Array(vm.posts.iter().map(summarize).collect()),
        );
        m.insert("seo_title".to_owned(), string(vm.seo_title));
        Value::Object(m)
    }
}
