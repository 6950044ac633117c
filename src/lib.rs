//! The library code for the `postbake` blog generator. A run is a single
//! batch pass through three stages:
//!
//! 1. Loading posts from plain-text source files ([`crate::load`], which
//!    parses each file with [`crate::post`] and orders the results with
//!    [`crate::sort`])
//! 2. Converting each post body from markdown to HTML ([`crate::markdown`])
//! 3. Applying the post and index templates and writing the pages
//!    ([`crate::render`], [`crate::templates`])
//!
//! [`crate::build`] ties the stages together for the command-line tool, and
//! [`crate::generate`] saves posts produced by an external generator so they
//! can go through the same pipeline.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod generate;
pub mod load;
pub mod markdown;
pub mod post;
pub mod render;
pub mod sort;
pub mod source;
pub mod templates;
pub mod value;
