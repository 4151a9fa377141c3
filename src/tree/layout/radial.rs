use std::f64::consts::TAU;

use log::debug;

use super::{
    AngularPartition, AngularSpan, LayoutOptions, LinkSegment, PositionedNode, RingSpacing,
    TreeLayout,
};
use crate::tree::{RenderError, RenderResult, Tree};

pub(super) fn build(tree: &Tree, options: &LayoutOptions) -> RenderResult<TreeLayout> {
    options.validate()?;
    let order = tree.preorder()?;

    let max_depth = order.iter().map(|visit| visit.depth).max().unwrap_or(0);
    let ring_step = ring_step(options, max_depth);
    let clade_sizes = tree.clade_sizes(&order);

    let node_count = tree.nodes.len();
    let mut spans = vec![AngularSpan::FULL; node_count];
    let mut nodes = Vec::with_capacity(node_count);
    let mut links = Vec::with_capacity(node_count.saturating_sub(1));

    // Pre-order guarantees a parent has handed out its children's spans
    // before any child is visited.
    for visit in &order {
        let node = &tree.nodes[visit.id];
        let span = spans[visit.id];

        let angle = if node.is_root() { 0.0 } else { span.midpoint() };
        nodes.push(PositionedNode {
            id: visit.id,
            parent: node.parent,
            depth: visit.depth,
            angle,
            radius: visit.depth as f64 * ring_step,
            span,
        });

        if node.children.is_empty() {
            continue;
        }

        let weights: Vec<usize> = node
            .children
            .iter()
            .map(|&child| match options.partition {
                AngularPartition::EvenSplit => 1,
                AngularPartition::LeafWeighted => clade_sizes[child].max(1),
            })
            .collect();

        for (&child, child_span) in node.children.iter().zip(partition_span(span, &weights)) {
            if !is_drawable(child_span) {
                return Err(RenderError::invalid_tree(format!(
                    "tree too deep to partition: span of '{}' at depth {} collapsed",
                    tree.nodes[child].name,
                    visit.depth + 1
                )));
            }
            spans[child] = child_span;
            links.push(LinkSegment {
                from: visit.id,
                to: child,
            });
        }
    }

    nodes.sort_by_key(|positioned| positioned.id);

    debug!(
        "radial layout: {} nodes, depth {}, ring step {:.2}, {:?}",
        node_count, max_depth, ring_step, options.partition
    );

    Ok(TreeLayout {
        nodes,
        order: order.iter().map(|visit| visit.id).collect(),
        links,
        max_depth,
        leaf_count: tree.leaf_count(),
        ring_step,
        partition: options.partition,
    })
}

fn ring_step(options: &LayoutOptions, max_depth: usize) -> f64 {
    if max_depth == 0 {
        return 0.0;
    }
    let fit = options.max_radius / max_depth as f64;
    match options.ring_spacing {
        RingSpacing::Fit => fit,
        RingSpacing::Step(step) => step.min(fit),
    }
}

/// A span is usable while float precision still leaves room for a midpoint
/// strictly inside it and below a full turn.
fn is_drawable(span: AngularSpan) -> bool {
    let mid = span.midpoint();
    span.width() > 0.0 && span.strictly_contains(mid) && mid < TAU
}

/// Split `span` into consecutive sub-spans proportional to `weights`.
///
/// The last sub-span ends exactly on `span.end`, so the pieces tile the
/// parent without gaps from rounding.
fn partition_span(span: AngularSpan, weights: &[usize]) -> Vec<AngularSpan> {
    let total = weights.iter().sum::<usize>().max(1) as f64;
    let width = span.width();

    let mut pieces = Vec::with_capacity(weights.len());
    let mut cumulative = 0usize;
    let mut start = span.start;
    for (index, &weight) in weights.iter().enumerate() {
        cumulative += weight;
        let end = if index + 1 == weights.len() {
            span.end
        } else {
            span.start + width * (cumulative as f64 / total)
        };
        pieces.push(AngularSpan { start, end });
        start = end;
    }
    pieces
}
