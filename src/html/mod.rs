//! HTML processing: whole-document minification and bundle reference
//! rewriting.

mod minify;
mod rewrite;

pub use minify::{minify_document, minify_tree};
pub use rewrite::{rewrite_document, rewrite_tree};
