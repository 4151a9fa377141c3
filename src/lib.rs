//! Radial tree diagrams: a tree model, a radial layout engine and a renderer
//! that draws onto an explicit surface (in-memory scene, SVG, or PNG).

pub mod app;
pub mod export;
pub mod io;
pub mod tree;
pub mod ui;
