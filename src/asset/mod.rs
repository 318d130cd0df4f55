//! Asset transforms: scanning, bundling, minification, static copying.

mod bundle;
mod copy;
mod minify;
mod scan;

pub use bundle::{bundle_css, bundle_js};
pub use copy::copy_static;
pub use scan::{collect_files, collect_with_ext};
