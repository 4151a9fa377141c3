use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use tiny_skia::{Pixmap, Transform};

use super::svg::render_document;
use crate::tree::layout::TreeLayout;
use crate::tree::painter::RenderConfig;
use crate::tree::Tree;

/// Rasterise the SVG rendering of `tree` into a pixmap.
///
/// `scale` multiplies the configured surface size.
pub fn render_pixmap(tree: &Tree, config: &RenderConfig, scale: f32) -> Result<(Pixmap, TreeLayout)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(anyhow!("raster scale must be positive, got {scale}"));
    }

    let (document, layout) = render_document(tree, config)?;
    let svg_str = document.to_string();

    let mut opts = usvg::Options::default();
    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();
    debug!("Loaded {} font faces for rasterisation", fontdb.len());
    opts.fontdb = Arc::new(fontdb);

    let rtree = usvg::Tree::from_str(&svg_str, &opts).context("SVG parsing error")?;

    let width = (config.width as f32 * scale).ceil() as u32;
    let height = (config.height as f32 * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("cannot allocate a {width}x{height} pixmap"))?;

    resvg::render(
        &rtree,
        Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    Ok((pixmap, layout))
}

pub fn export_png(tree: &Tree, config: &RenderConfig, path: &Path, scale: f32) -> Result<TreeLayout> {
    let (pixmap, layout) = render_pixmap(tree, config, scale)?;
    pixmap
        .save_png(path)
        .with_context(|| format!("failed to write PNG to {}", path.display()))?;
    info!(
        "Wrote {}x{} PNG to {}",
        pixmap.width(),
        pixmap.height(),
        path.display()
    );
    Ok(layout)
}
