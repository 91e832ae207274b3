//! Route geometry and instruction compilation.

pub mod compiler;
pub mod direction;
pub mod geo;

pub use compiler::{CompiledRoute, NavigationStep, RouteCompiler, RouteOutcome, compile_instructions};
pub use direction::{Direction, classify_turn};
pub use geo::Coordinates;
