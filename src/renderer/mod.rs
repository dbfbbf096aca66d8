//! WebGPU rendering module
//!
//! Draws a `Snapshot` as flat-colored circles. Reads state, never changes it.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use shapes::scene;
pub use vertex::Vertex;
