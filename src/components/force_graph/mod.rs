//! Force-directed knowledge graph on a canvas, with the discovered path highlighted.

mod component;
pub mod highlight;
pub mod palette;
mod render;
pub mod scale;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use highlight::HighlightPath;
pub use palette::{ColorBy, Palette};
pub use scale::SurfaceSize;
pub use types::{GraphData, GraphLink, GraphNode};
