use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use log::debug;
use tiny_skia::Color;

use super::layout::{
    AngularPartition, LayoutOptions, LinkSegment, PositionedNode, RingSpacing, TreeLayout,
};
use super::scene_graph::{DrawSurface, ScenePrimitive, StrokeStyle, TextAlign};
use super::{RenderError, RenderResult, Tree};

pub const DEFAULT_WIDTH: f64 = 1500.0;
pub const DEFAULT_HEIGHT: f64 = 1000.0;
/// The usable radius is `width / RADIUS_DIVISOR - RADIUS_MARGIN` unless set explicitly.
pub const RADIUS_DIVISOR: f64 = 2.5;
pub const RADIUS_MARGIN: f64 = 100.0;

/// Label baseline shift that visually centres text on the node.
const LABEL_BASELINE_EM: f64 = 0.31;

/// Visual style of nodes, links and labels.
#[derive(Clone, Debug, PartialEq)]
pub struct TreePainter {
    pub link_stroke: StrokeStyle,
    pub node_marker_radius: f64,
    pub node_fill: Color,
    pub node_stroke: StrokeStyle,
    pub label_offset: f64,
    pub label_font_size: f64,
    pub label_color: Color,
    pub font_family: String,
    pub base_font_size: f64,
    pub background: Option<Color>,
}

impl Default for TreePainter {
    fn default() -> Self {
        Self {
            link_stroke: StrokeStyle::new(1.5, Color::from_rgba8(0xcc, 0xcc, 0xcc, 255)),
            node_marker_radius: 6.0,
            node_fill: Color::from_rgba8(0x69, 0xb3, 0xa2, 255),
            node_stroke: StrokeStyle::new(1.5, Color::BLACK),
            label_offset: 8.0,
            label_font_size: 14.0,
            label_color: Color::BLACK,
            font_family: "sans-serif".to_string(),
            base_font_size: 13.0,
            background: None,
        }
    }
}

/// Everything needed to turn a tree into a drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    /// Explicit outer radius; derived from `width` when unset.
    pub max_radius: Option<f64>,
    pub partition: AngularPartition,
    pub ring_spacing: RingSpacing,
    pub painter: TreePainter,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_radius: None,
            partition: AngularPartition::default(),
            ring_spacing: RingSpacing::default(),
            painter: TreePainter::default(),
        }
    }
}

impl RenderConfig {
    pub fn max_radius(&self) -> f64 {
        self.max_radius
            .unwrap_or(self.width / RADIUS_DIVISOR - RADIUS_MARGIN)
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            max_radius: self.max_radius(),
            partition: self.partition,
            ring_spacing: self.ring_spacing,
        }
    }

    /// `(min_x, min_y, width, height)` of a viewport centred on the root.
    pub fn view_box(&self) -> (f64, f64, f64, f64) {
        (-self.width / 2.0, -self.height / 2.0, self.width, self.height)
    }

    pub fn validate(&self) -> RenderResult<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RenderError::invalid_config(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        let painter = &self.painter;
        for (name, value) in [
            ("node marker radius", painter.node_marker_radius),
            ("label offset", painter.label_offset),
            ("label font size", painter.label_font_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RenderError::invalid_config(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        self.layout_options().validate()
    }
}

/// Project polar coordinates onto the surface, with angle zero pointing up.
pub fn polar_to_cartesian(angle: f64, radius: f64) -> DVec2 {
    let theta = angle - FRAC_PI_2;
    DVec2::new(radius * theta.cos(), radius * theta.sin())
}

/// Control points of a link curve, interpolated in polar space.
///
/// Both control points sit on the ring halfway between parent and child,
/// one at the parent's angle and one at the child's, so the curve leaves the
/// parent radially and sweeps around before reaching the child.
pub fn radial_link(from: &PositionedNode, to: &PositionedNode) -> [DVec2; 4] {
    let mid_radius = (from.radius + to.radius) * 0.5;
    [
        polar_to_cartesian(from.angle, from.radius),
        polar_to_cartesian(from.angle, mid_radius),
        polar_to_cartesian(to.angle, mid_radius),
        polar_to_cartesian(to.angle, to.radius),
    ]
}

/// Alignment and signed horizontal offset of a node's label.
///
/// Nodes on the right half of the circle (`angle < π`) get start-aligned
/// labels to their right; the rest get end-aligned labels to their left.
pub fn label_placement(angle: f64, offset: f64) -> (TextAlign, f64) {
    if angle < PI {
        (TextAlign::Start, offset)
    } else {
        (TextAlign::End, -offset)
    }
}

impl TreePainter {
    /// Emit links, then markers and labels, for an already computed layout.
    pub fn paint<S>(&self, tree: &Tree, layout: &TreeLayout, surface: &mut S)
    where
        S: DrawSurface + ?Sized,
    {
        for link in &layout.links {
            self.paint_link(layout, link, surface);
        }

        for positioned in layout.iter() {
            let center = polar_to_cartesian(positioned.angle, positioned.radius);
            surface.draw(ScenePrimitive::FillCircle {
                node: positioned.id,
                center,
                radius: self.node_marker_radius,
                fill: self.node_fill,
                stroke: Some(self.node_stroke),
            });

            let (align, dx) = label_placement(positioned.angle, self.label_offset);
            surface.draw(ScenePrimitive::Text {
                node: positioned.id,
                text: tree.nodes[positioned.id].name.clone(),
                anchor: center,
                dx,
                dy_em: LABEL_BASELINE_EM,
                align,
                size: self.label_font_size,
                color: self.label_color,
            });
        }
    }

    fn paint_link<S>(&self, layout: &TreeLayout, link: &LinkSegment, surface: &mut S)
    where
        S: DrawSurface + ?Sized,
    {
        let (from, to) = layout.link_ends(link);
        let [start, control1, control2, end] = radial_link(from, to);
        surface.draw(ScenePrimitive::StrokeCurve {
            link: *link,
            start,
            control1,
            control2,
            end,
            style: self.link_stroke,
        });
    }
}

/// Lay `tree` out and draw it onto `surface`.
///
/// The layout is computed and validated in full before the first primitive
/// is emitted, so a failing render leaves the surface untouched.
pub fn render<S>(tree: &Tree, config: &RenderConfig, surface: &mut S) -> RenderResult<TreeLayout>
where
    S: DrawSurface + ?Sized,
{
    config.validate()?;
    let layout = TreeLayout::compute(tree, &config.layout_options())?;
    debug!(
        "painting {} nodes and {} links (max radius {:.1})",
        layout.nodes.len(),
        layout.links.len(),
        config.max_radius()
    );
    config.painter.paint(tree, &layout, surface);
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::builtin::orchestrator_tree;
    use crate::tree::scene_graph::TreeSceneGraph;
    use crate::tree::{NodeSpec, TreeNode};

    const EPS: f64 = 1e-9;

    fn positioned(angle: f64, radius: f64) -> PositionedNode {
        PositionedNode {
            id: 0,
            parent: None,
            depth: 0,
            angle,
            radius,
            span: crate::tree::layout::AngularSpan::FULL,
        }
    }

    #[test]
    fn default_geometry_matches_reference() {
        let config = RenderConfig::default();
        assert_eq!(config.max_radius(), 500.0);
        assert_eq!(config.painter.node_marker_radius, 6.0);
        assert_eq!(config.painter.label_offset, 8.0);
        assert_eq!(config.view_box(), (-750.0, -500.0, 1500.0, 1000.0));
    }

    #[test]
    fn polar_projection_points_up_at_zero() {
        let up = polar_to_cartesian(0.0, 10.0);
        assert!(up.x.abs() < EPS);
        assert!((up.y + 10.0).abs() < EPS);

        let right = polar_to_cartesian(PI / 2.0, 10.0);
        assert!((right.x - 10.0).abs() < EPS);
        assert!(right.y.abs() < EPS);

        assert_eq!(polar_to_cartesian(1.234, 0.0), DVec2::ZERO);
    }

    #[test]
    fn link_controls_follow_polar_interpolation() {
        let parent = positioned(0.0, 0.0);
        let child = positioned(PI / 2.0, 100.0);
        let [start, c1, c2, end] = radial_link(&parent, &child);
        assert_eq!(start, DVec2::ZERO);
        // First control stays on the parent's bearing at the half-way ring.
        assert!(c1.x.abs() < EPS && (c1.y + 50.0).abs() < EPS);
        // Second control is on the child's bearing, not on the chord.
        assert!((c2.x - 50.0).abs() < EPS && c2.y.abs() < EPS);
        assert!((end.x - 100.0).abs() < EPS && end.y.abs() < EPS);
    }

    #[test]
    fn label_anchor_flips_at_pi() {
        assert_eq!(label_placement(0.0, 8.0), (TextAlign::Start, 8.0));
        assert_eq!(label_placement(PI - 1e-12, 8.0), (TextAlign::Start, 8.0));
        assert_eq!(label_placement(PI, 8.0), (TextAlign::End, -8.0));
        assert_eq!(label_placement(1.9 * PI, 8.0), (TextAlign::End, -8.0));
    }

    #[test]
    fn render_draws_every_node_and_link() {
        let tree = orchestrator_tree();
        let mut scene = TreeSceneGraph::new();
        let layout = render(&tree, &RenderConfig::default(), &mut scene).unwrap();

        assert_eq!(scene.circles().count(), tree.node_count());
        assert_eq!(scene.labels().count(), tree.node_count());
        assert_eq!(scene.curves().count(), tree.node_count() - 1);
        assert_eq!(layout.links.len(), tree.node_count() - 1);

        // Links come first so markers and labels paint over them.
        let first_non_curve = scene
            .primitives
            .iter()
            .position(|p| !matches!(p, ScenePrimitive::StrokeCurve { .. }))
            .unwrap();
        assert_eq!(first_non_curve, tree.node_count() - 1);
    }

    #[test]
    fn labels_use_configured_offset_and_side() {
        let tree = Tree::from_spec(&NodeSpec::branch(
            "root",
            vec![NodeSpec::leaf("east"), NodeSpec::leaf("west")],
        ));
        let mut config = RenderConfig::default();
        config.painter.label_offset = 12.0;
        let mut scene = TreeSceneGraph::new();
        render(&tree, &config, &mut scene).unwrap();

        let labels: Vec<(String, TextAlign, f64)> = scene
            .labels()
            .filter_map(|p| match p {
                ScenePrimitive::Text {
                    text, align, dx, ..
                } => Some((text.clone(), *align, *dx)),
                _ => None,
            })
            .collect();
        assert_eq!(
            labels,
            vec![
                ("root".to_string(), TextAlign::Start, 12.0),
                ("east".to_string(), TextAlign::Start, 12.0),
                ("west".to_string(), TextAlign::End, -12.0),
            ]
        );
    }

    #[test]
    fn markers_use_configured_radius() {
        let tree = Tree::from_spec(&NodeSpec::leaf("solo"));
        let mut config = RenderConfig::default();
        config.painter.node_marker_radius = 3.5;
        let mut scene = TreeSceneGraph::new();
        render(&tree, &config, &mut scene).unwrap();
        match scene.circles().next() {
            Some(ScenePrimitive::FillCircle { radius, center, .. }) => {
                assert_eq!(*radius, 3.5);
                assert_eq!(*center, DVec2::ZERO);
            }
            other => panic!("expected a marker, got {other:?}"),
        }
        assert_eq!(scene.curves().count(), 0);
    }

    #[test]
    fn failed_render_draws_nothing() {
        let mut scene = TreeSceneGraph::new();
        assert_eq!(
            render(&Tree::empty(), &RenderConfig::default(), &mut scene),
            Err(RenderError::EmptyInput)
        );
        assert!(scene.is_empty());

        let mut tree = orchestrator_tree();
        let last = tree.nodes.len() - 1;
        tree.nodes[last].children.push(0);
        let err = render(&tree, &RenderConfig::default(), &mut scene).unwrap_err();
        assert!(matches!(err, RenderError::InvalidTree { .. }));
        assert!(scene.is_empty());

        let bad_size = RenderConfig {
            width: 0.0,
            max_radius: Some(100.0),
            ..RenderConfig::default()
        };
        let tree = Tree::from_parts(None, Some(0), vec![TreeNode::new(0, "x")]);
        assert!(matches!(
            render(&tree, &bad_size, &mut scene),
            Err(RenderError::InvalidConfig { .. })
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn narrow_surface_without_explicit_radius_is_rejected() {
        let config = RenderConfig {
            width: 200.0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RenderError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rendering_twice_is_identical() {
        let tree = orchestrator_tree();
        let config = RenderConfig::default();
        let mut first = TreeSceneGraph::new();
        let mut second = TreeSceneGraph::new();
        let layout_a = render(&tree, &config, &mut first).unwrap();
        let layout_b = render(&tree, &config, &mut second).unwrap();
        assert_eq!(layout_a, layout_b);
        assert_eq!(first.primitives, second.primitives);
    }
}
