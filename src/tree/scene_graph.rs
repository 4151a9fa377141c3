use glam::DVec2;
use tiny_skia::Color;

use super::layout::LinkSegment;
use super::NodeId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: Color,
}

impl StrokeStyle {
    pub fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }
}

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Text starts at the anchor and runs away from it.
    Start,
    /// Text ends at the anchor.
    End,
}

impl TextAlign {
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::End => "end",
        }
    }
}

/// Drawing instruction in surface coordinates (origin at the tree root).
#[derive(Clone, Debug, PartialEq)]
pub enum ScenePrimitive {
    /// Cubic Bézier from `start` to `end`.
    StrokeCurve {
        link: LinkSegment,
        start: DVec2,
        control1: DVec2,
        control2: DVec2,
        end: DVec2,
        style: StrokeStyle,
    },
    FillCircle {
        node: NodeId,
        center: DVec2,
        radius: f64,
        fill: Color,
        stroke: Option<StrokeStyle>,
    },
    Text {
        node: NodeId,
        text: String,
        /// Node centre the label belongs to.
        anchor: DVec2,
        /// Horizontal shift from `anchor`, signed.
        dx: f64,
        /// Baseline shift in em units.
        dy_em: f64,
        align: TextAlign,
        size: f64,
        color: Color,
    },
}

/// Target of a render pass.
///
/// The renderer holds the surface exclusively for the duration of one call
/// and emits primitives in paint order.
pub trait DrawSurface {
    fn draw(&mut self, primitive: ScenePrimitive);
}

/// In-memory surface that records everything drawn onto it.
#[derive(Clone, Debug, Default)]
pub struct TreeSceneGraph {
    pub primitives: Vec<ScenePrimitive>,
}

impl TreeSceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn curves(&self) -> impl Iterator<Item = &ScenePrimitive> + '_ {
        self.primitives
            .iter()
            .filter(|p| matches!(p, ScenePrimitive::StrokeCurve { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &ScenePrimitive> + '_ {
        self.primitives
            .iter()
            .filter(|p| matches!(p, ScenePrimitive::FillCircle { .. }))
    }

    pub fn labels(&self) -> impl Iterator<Item = &ScenePrimitive> + '_ {
        self.primitives
            .iter()
            .filter(|p| matches!(p, ScenePrimitive::Text { .. }))
    }
}

impl DrawSurface for TreeSceneGraph {
    fn draw(&mut self, primitive: ScenePrimitive) {
        self.primitives.push(primitive);
    }
}

/// `#rrggbb` form of an opaque colour.
pub fn color_to_hex(color: Color) -> String {
    let rgba = color.to_color_u8();
    format!("#{:02x}{:02x}{:02x}", rgba.red(), rgba.green(), rgba.blue())
}

pub fn color_opacity(color: Color) -> f32 {
    color.alpha()
}
