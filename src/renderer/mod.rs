//! Render geometry
//!
//! Turns a `GameState` into screen-space triangles. No GPU code lives here;
//! a presentation layer uploads the vertex list as-is.

pub mod shapes;
pub mod vertex;

pub use shapes::frame;
pub use vertex::{Vertex, colors};
