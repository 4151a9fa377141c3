use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use svg::node::element::{Circle, Group, Path as SvgPath, Rectangle, Text};
use svg::{Document, Node};

use crate::tree::layout::TreeLayout;
use crate::tree::painter::{render, RenderConfig};
use crate::tree::scene_graph::{color_opacity, color_to_hex, DrawSurface, ScenePrimitive};
use crate::tree::{RenderResult, Tree};

/// Surface that accumulates primitives into an SVG document centred on the
/// tree root.
pub struct SvgSurface {
    width: f64,
    height: f64,
    view_box: (f64, f64, f64, f64),
    font: String,
    background: Option<String>,
    links: Group,
    nodes: Group,
}

impl SvgSurface {
    pub fn new(config: &RenderConfig) -> Self {
        let painter = &config.painter;
        Self {
            width: config.width,
            height: config.height,
            view_box: config.view_box(),
            font: format!("{}px {}", painter.base_font_size, painter.font_family),
            background: painter.background.map(color_to_hex),
            links: Group::new().set("id", "links"),
            nodes: Group::new().set("id", "nodes"),
        }
    }

    pub fn into_document(self) -> Document {
        let (min_x, min_y, width, height) = self.view_box;
        let mut document = Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", format!("{min_x} {min_y} {width} {height}"))
            .set("style", format!("font: {}", self.font));

        if let Some(fill) = self.background {
            document = document.add(
                Rectangle::new()
                    .set("x", min_x)
                    .set("y", min_y)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", fill),
            );
        }

        document.add(self.links).add(self.nodes)
    }
}

impl DrawSurface for SvgSurface {
    fn draw(&mut self, primitive: ScenePrimitive) {
        match primitive {
            ScenePrimitive::StrokeCurve {
                start,
                control1,
                control2,
                end,
                style,
                ..
            } => {
                let data = format!(
                    "M{},{}C{},{},{},{},{},{}",
                    start.x, start.y, control1.x, control1.y, control2.x, control2.y, end.x, end.y
                );
                self.links.append(
                    SvgPath::new()
                        .set("d", data)
                        .set("fill", "none")
                        .set("stroke", color_to_hex(style.color))
                        .set("stroke-opacity", color_opacity(style.color))
                        .set("stroke-width", style.width),
                );
            }
            ScenePrimitive::FillCircle {
                center,
                radius,
                fill,
                stroke,
                ..
            } => {
                let mut circle = Circle::new()
                    .set("cx", center.x)
                    .set("cy", center.y)
                    .set("r", radius)
                    .set("fill", color_to_hex(fill));
                if let Some(stroke) = stroke {
                    circle = circle
                        .set("stroke", color_to_hex(stroke.color))
                        .set("stroke-width", stroke.width);
                }
                self.nodes.append(circle);
            }
            ScenePrimitive::Text {
                text,
                anchor,
                dx,
                dy_em,
                align,
                size,
                color,
                ..
            } => {
                let label = Text::new("")
                    .set("x", anchor.x + dx)
                    .set("y", anchor.y)
                    .set("dy", format!("{dy_em}em"))
                    .set("text-anchor", align.as_svg())
                    .set("font-size", format!("{size}px"))
                    .set("fill", color_to_hex(color))
                    .add(svg::node::Text::new(text));
                self.nodes.append(label);
            }
        }
    }
}

/// Render `tree` into an in-memory SVG document.
pub fn render_document(tree: &Tree, config: &RenderConfig) -> RenderResult<(Document, TreeLayout)> {
    let mut surface = SvgSurface::new(config);
    let layout = render(tree, config, &mut surface)?;
    Ok((surface.into_document(), layout))
}

pub fn render_svg_string(tree: &Tree, config: &RenderConfig) -> RenderResult<String> {
    let (document, _) = render_document(tree, config)?;
    Ok(document.to_string())
}

/// Export tree to SVG format
pub fn export_svg(tree: &Tree, config: &RenderConfig, path: &Path) -> Result<TreeLayout> {
    let (document, layout) = render_document(tree, config)?;
    svg::save(path, &document)
        .with_context(|| format!("failed to write SVG to {}", path.display()))?;
    info!(
        "Wrote {} nodes to {} ({}x{})",
        layout.nodes.len(),
        path.display(),
        config.width,
        config.height
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builtin::orchestrator_tree;
    use crate::tree::{NodeSpec, RenderError};

    #[test]
    fn document_has_one_element_per_primitive() {
        let tree = orchestrator_tree();
        let svg = render_svg_string(&tree, &RenderConfig::default()).unwrap();

        assert_eq!(svg.matches("<circle").count(), tree.node_count());
        assert_eq!(svg.matches("<text").count(), tree.node_count());
        assert_eq!(svg.matches("<path").count(), tree.node_count() - 1);
        assert!(svg.contains("viewBox=\"-750 -500 1500 1000\""));
        assert!(svg.contains("font: 13px sans-serif"));
        assert!(svg.contains("Monte Carlo Volatility Simulator"));
    }

    #[test]
    fn styling_follows_painter_defaults() {
        let tree = Tree::from_spec(&NodeSpec::branch(
            "root",
            vec![NodeSpec::leaf("east"), NodeSpec::leaf("west")],
        ));
        let svg = render_svg_string(&tree, &RenderConfig::default()).unwrap();

        assert!(svg.contains("fill=\"#69b3a2\""));
        assert!(svg.contains("stroke=\"#cccccc\""));
        assert!(svg.contains("r=\"6\""));
        assert!(svg.contains("text-anchor=\"start\""));
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains("dy=\"0.31em\""));
        assert!(svg.contains("font-size=\"14px\""));
    }

    #[test]
    fn background_is_optional() {
        let tree = Tree::from_spec(&NodeSpec::leaf("solo"));
        let mut config = RenderConfig::default();
        let plain = render_svg_string(&tree, &config).unwrap();
        assert!(!plain.contains("<rect"));

        config.painter.background = Some(tiny_skia::Color::WHITE);
        let filled = render_svg_string(&tree, &config).unwrap();
        assert_eq!(filled.matches("<rect").count(), 1);
        assert!(filled.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.svg");
        let layout = export_svg(&orchestrator_tree(), &RenderConfig::default(), &path).unwrap();
        assert_eq!(layout.nodes.len(), 56);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Main Orchestrator"));
    }

    #[test]
    fn invalid_tree_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.svg");
        let err = export_svg(&Tree::empty(), &RenderConfig::default(), &path).unwrap_err();
        assert_eq!(err.downcast_ref::<RenderError>(), Some(&RenderError::EmptyInput));
        assert!(!path.exists());
    }
}
