//! # lacc-base
//!
//! Structural atoms shared by every stage of the LA compiler:
//!
//! - [`Arena`] — bump allocation for stable parse-tree references
//! - [`Interner`]/[`Symbol`] — string interning for O(1) identifier equality
//! - [`Span`] — byte-offset source locations with line lookup
//!
//! This crate knows nothing about LA syntax or C output. It provides only
//! the generic infrastructure the language and compile crates build on.

pub mod arena;
pub mod intern;
pub mod span;

pub use arena::Arena;
pub use intern::{Interner, Symbol};
pub use span::Span;
