//! L-system engine: grammar loading, stochastic string rewriting, and turtle
//! geometry of the expanded result.

mod engine;
mod grammar;
mod turtle;

pub use engine::LSystem;
pub use grammar::{DEFAULT_INITIAL_HEADING, DEFAULT_STEP_LENGTH, Grammar, GrammarError, Preset};
pub use turtle::{Bounds, Segment, TurtlePath};
