//! Password generation.

pub mod policy;

pub use policy::{generate, Complexity, LetterMode, SYMBOLS};
