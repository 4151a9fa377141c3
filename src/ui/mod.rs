use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use log::info;

use crate::app::ExportFormat;
use crate::export;
use crate::tree::layout::TreeLayout;
use crate::tree::painter::{render, RenderConfig};
use crate::tree::scene_graph::TreeSceneGraph;
use crate::tree::Tree;

/// Text outline of a laid-out tree: a summary line followed by one indented
/// line per node with its polar coordinates.
pub fn outline(tree: &Tree, layout: &TreeLayout) -> String {
    let mut out = String::new();
    let title = tree.label.as_deref().unwrap_or("tree");
    let _ = writeln!(
        out,
        "{}: {} node(s), {} leaf/leaves, depth {}, {:?}",
        title,
        layout.nodes.len(),
        layout.leaf_count,
        layout.max_depth,
        layout.partition
    );

    for positioned in layout.iter() {
        let name = &tree.nodes[positioned.id].name;
        let _ = writeln!(
            out,
            "{:indent$}{} (angle {:.1}°, radius {:.1})",
            "",
            name,
            positioned.angle.to_degrees(),
            positioned.radius,
            indent = positioned.depth * 2
        );
    }
    out
}

/// Render into an in-memory scene and print the outline plus primitive counts.
pub fn render_preview(tree: &Tree, config: &RenderConfig) -> Result<()> {
    let mut scene = TreeSceneGraph::new();
    let layout = render(tree, config, &mut scene)?;
    print!("{}", outline(tree, &layout));
    println!(
        "Scene at {}x{} px: {} marker(s), {} link(s), {} label(s).",
        config.width,
        config.height,
        scene.circles().count(),
        scene.curves().count(),
        scene.labels().count()
    );
    Ok(())
}

pub fn export(
    tree: &Tree,
    config: &RenderConfig,
    format: ExportFormat,
    scale: f32,
    output: &Path,
) -> Result<()> {
    info!(
        "Exporting {} to {} as {} ({}x{})",
        tree.label.as_deref().unwrap_or("tree"),
        output.display(),
        format,
        config.width,
        config.height
    );
    match format {
        ExportFormat::Svg => export::export_svg(tree, config, output)?,
        ExportFormat::Png => export::export_png(tree, config, output, scale)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::layout::LayoutOptions;
    use crate::tree::NodeSpec;

    #[test]
    fn outline_indents_by_depth() {
        let tree = Tree::from_spec(&NodeSpec::branch(
            "root",
            vec![NodeSpec::branch("mid", vec![NodeSpec::leaf("tip")])],
        ));
        let layout = TreeLayout::compute(&tree, &LayoutOptions::default()).unwrap();
        let text = outline(&tree, &layout);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("root: 3 node(s), 1 leaf/leaves, depth 2"));
        assert_eq!(lines[1], "root (angle 0.0°, radius 0.0)");
        assert_eq!(lines[2], "  mid (angle 180.0°, radius 250.0)");
        assert_eq!(lines[3], "    tip (angle 180.0°, radius 500.0)");
    }

    #[test]
    fn export_dispatches_on_format() {
        let dir = tempfile::tempdir().unwrap();
        let tree = Tree::from_spec(&NodeSpec::branch("root", vec![NodeSpec::leaf("a")]));
        let config = RenderConfig::default();

        let svg_path = dir.path().join("out.svg");
        export(&tree, &config, ExportFormat::Svg, 1.0, &svg_path).unwrap();
        assert!(std::fs::read_to_string(&svg_path).unwrap().contains("<svg"));

        let png_path = dir.path().join("out.png");
        export(&tree, &config, ExportFormat::Png, 0.1, &png_path).unwrap();
        let bytes = std::fs::read(&png_path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
