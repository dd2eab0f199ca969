//! quizplane-plane: SVG personality-plane renderer.
//!
//! Maps quiz results onto a bounded two-axis plane and renders them as an
//! SVG element tree that can be mounted into a [`svg::Document`] or written
//! out as a standalone file.

pub mod error;
pub mod geometry;
pub mod plane;
pub mod svg;

pub use error::PlaneError;
pub use plane::{draw_plane, draw_plane_at, render_plane, write_svg, PlaneOptions, PlanePoint};
