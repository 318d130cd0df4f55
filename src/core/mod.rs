//! Core build primitives: the per-run stamp and the pipeline state machine.

mod phase;
mod stamp;

pub use phase::Phase;
pub use stamp::BuildStamp;
