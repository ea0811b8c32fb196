//! Composite parsers: sequencing, choice, repetition, single-child
//! wrappers, and named rules.

pub mod choice;
pub mod repeat;
pub mod rule;
pub mod seq;
pub mod unary;

pub use rule::rule;
pub use unary::{not, peek};
