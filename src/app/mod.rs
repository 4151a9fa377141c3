use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;

use crate::tree::builtin::orchestrator_tree;
use crate::tree::layout::{AngularPartition, RingSpacing};
use crate::tree::painter::{RenderConfig, TreePainter, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::tree::Tree;
use crate::{io, ui};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "radtree",
    about = "Render a hierarchy as a radial tree diagram (SVG or PNG)."
)]
pub struct AppConfig {
    /// Tree file to render (nested JSON or Newick). Defaults to the built-in
    /// orchestrator hierarchy.
    #[arg(value_name = "TREE_FILE")]
    pub tree_path: Option<PathBuf>,

    /// Write the diagram here; without it an outline is printed instead.
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Target export format
    #[arg(long, default_value_t = ExportFormat::Svg)]
    pub export_format: ExportFormat,

    /// Surface width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: f64,

    /// Surface height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: f64,

    /// Outer radius for node placement; defaults to width / 2.5 - 100
    #[arg(long)]
    pub max_radius: Option<f64>,

    /// Radius of each node's marker circle
    #[arg(long, default_value_t = 6.0)]
    pub node_radius: f64,

    /// Horizontal distance between a node and its label
    #[arg(long, default_value_t = 8.0)]
    pub label_offset: f64,

    /// How angular space is shared among siblings
    #[arg(long, value_enum, default_value_t = PartitionMode::Even)]
    pub partition: PartitionMode,

    /// Fixed distance between depth rings instead of fitting the outer radius
    #[arg(long, value_name = "PX")]
    pub ring_step: Option<f64>,

    /// Pixel density multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Svg => write!(f, "svg"),
            ExportFormat::Png => write!(f, "png"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum PartitionMode {
    /// Equal share per child at every level
    Even,
    /// Share proportional to descendant leaf count
    Leaves,
}

impl From<PartitionMode> for AngularPartition {
    fn from(mode: PartitionMode) -> Self {
        match mode {
            PartitionMode::Even => AngularPartition::EvenSplit,
            PartitionMode::Leaves => AngularPartition::LeafWeighted,
        }
    }
}

impl AppConfig {
    pub fn render_config(&self) -> RenderConfig {
        let painter = TreePainter {
            node_marker_radius: self.node_radius,
            label_offset: self.label_offset,
            ..TreePainter::default()
        };
        RenderConfig {
            width: self.width,
            height: self.height,
            max_radius: self.max_radius,
            partition: self.partition.into(),
            ring_spacing: self
                .ring_step
                .map(RingSpacing::Step)
                .unwrap_or(RingSpacing::Fit),
            painter,
        }
    }
}

pub struct RadialTreeApp;

impl RadialTreeApp {
    pub fn run(config: &AppConfig) -> Result<()> {
        let tree = Self::load(config)?;
        let render_config = config.render_config();

        match &config.output {
            Some(dest) => ui::export(
                &tree,
                &render_config,
                config.export_format,
                config.scale,
                dest,
            ),
            None => ui::render_preview(&tree, &render_config),
        }
    }

    fn load(config: &AppConfig) -> Result<Tree> {
        match &config.tree_path {
            Some(path) => {
                info!("Loading tree from {}", path.display());
                io::load_tree(path)
            }
            None => {
                info!("Using built-in orchestrator hierarchy");
                Ok(orchestrator_tree())
            }
        }
    }
}
