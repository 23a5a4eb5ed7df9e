//! File scanning: path guard, ignore patterns, and the source walker.

mod guard;
mod ignores;
mod types;
mod walker;

pub use guard::PathGuard;
pub use ignores::IgnorePatterns;
pub use types::{Language, SourceFile, WalkOutcome};
pub use walker::Walker;
