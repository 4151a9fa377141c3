use std::f64::consts::TAU;

use super::{NodeId, RenderError, RenderResult, Tree};

mod radial;

/// How a node's angular span is shared among its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngularPartition {
    /// Every child gets the same share regardless of subtree size.
    #[default]
    EvenSplit,
    /// Shares follow descendant leaf counts, so leaves end up evenly spaced.
    LeafWeighted,
}

/// Mapping from depth to ring radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RingSpacing {
    /// The deepest ring sits exactly on the maximum radius.
    #[default]
    Fit,
    /// Fixed distance between rings, shrunk when the deepest ring would
    /// exceed the maximum radius.
    Step(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub max_radius: f64,
    pub partition: AngularPartition,
    pub ring_spacing: RingSpacing,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_radius: 500.0,
            partition: AngularPartition::default(),
            ring_spacing: RingSpacing::default(),
        }
    }
}

impl LayoutOptions {
    pub fn validate(&self) -> RenderResult<()> {
        if !self.max_radius.is_finite() || self.max_radius <= 0.0 {
            return Err(RenderError::invalid_config(format!(
                "max radius must be positive and finite, got {}",
                self.max_radius
            )));
        }
        if let RingSpacing::Step(step) = self.ring_spacing {
            if !step.is_finite() || step <= 0.0 {
                return Err(RenderError::invalid_config(format!(
                    "ring step must be positive and finite, got {step}"
                )));
            }
        }
        Ok(())
    }
}

/// Half-open angular interval `[start, end)` in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularSpan {
    pub start: f64,
    pub end: f64,
}

impl AngularSpan {
    pub const FULL: AngularSpan = AngularSpan {
        start: 0.0,
        end: TAU,
    };

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        self.start + self.width() * 0.5
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }

    pub fn strictly_contains(&self, angle: f64) -> bool {
        angle > self.start && angle < self.end
    }
}

/// A tree node annotated with polar coordinates for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub angle: f64,
    pub radius: f64,
    pub span: AngularSpan,
}

/// Parent-to-child edge between two positioned nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSegment {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    /// Indexed by [`NodeId`].
    pub nodes: Vec<PositionedNode>,
    /// Node ids in pre-order.
    pub order: Vec<NodeId>,
    pub links: Vec<LinkSegment>,
    pub max_depth: usize,
    pub leaf_count: usize,
    pub ring_step: f64,
    pub partition: AngularPartition,
}

impl TreeLayout {
    /// Position every node of `tree`. Fails without partial output when the
    /// tree or the options are unusable.
    pub fn compute(tree: &Tree, options: &LayoutOptions) -> RenderResult<Self> {
        radial::build(tree, options)
    }

    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes.get(id)
    }

    /// Positioned nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &PositionedNode> + '_ {
        self.order.iter().map(move |&id| &self.nodes[id])
    }

    pub fn link_ends(&self, link: &LinkSegment) -> (&PositionedNode, &PositionedNode) {
        (&self.nodes[link.from], &self.nodes[link.to])
    }

    /// Outermost radius actually used.
    pub fn extent(&self) -> f64 {
        self.nodes.iter().map(|n| n.radius).fold(0.0, f64::max)
    }
}
