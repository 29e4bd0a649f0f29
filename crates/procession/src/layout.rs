//! Sequence layout engine.
//!
//! Layout runs in two passes over the process tree:
//!
//! 1. The lifeline allocator collects every application the tree references
//!    and assigns each a horizontal slot.
//! 2. The walker descends the tree, placing markers and swimlanes on a running
//!    vertical cursor and summing process heights.
//!
//! Once the grand total height is known the lifeline footers are placed and
//! the headers are finalized. Layout never fails: data defects skip the
//! offending item with a warning.

mod items;
mod lifeline;
mod walker;

use log::{debug, info, warn};

use procession_core::model::DiagramInput;

use crate::{
    config::{LayoutConfig, Palette},
    diagram::Diagram,
};

use lifeline::{ApplicationResolver, Lifelines};
use walker::{LayoutSink, WalkContext, Walker};

/// Sequence layout engine.
///
/// The engine holds no per-run state, so one instance can lay out any number
/// of inputs and two passes over the same input produce identical output.
#[derive(Debug, Clone)]
pub struct Engine {
    config: LayoutConfig,
    palette: Palette,
}

impl Engine {
    /// Create a new layout engine
    pub fn new(config: LayoutConfig, palette: Palette) -> Self {
        Self { config, palette }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Calculate the layout of a diagram input
    pub fn calculate(&self, input: &DiagramInput) -> Diagram {
        let options = &input.options;
        let resolver =
            ApplicationResolver::new(&input.applications, &options.current_process_activities);
        let lifelines = Lifelines::allocate(&input.processes, &resolver, &self.config);

        info!(
            roots = input.processes.len(),
            applications = lifelines.len();
            "Calculating sequence layout"
        );

        let mut headers = lifelines.header_nodes();
        let walker = Walker::new(&self.config, &self.palette, options, &resolver, &lifelines);
        let mut ctx = WalkContext::default();
        let mut sink = LayoutSink::default();

        let mut current_y = self.config.sequence_start_y();
        let mut placed_roots = 0;
        for root in &input.processes {
            if !ctx.claim(root.id) {
                warn!(process_id:% = root.id; "Root process repeated, skipping");
                continue;
            }
            if placed_roots > 0 {
                current_y += self.config.root_spacing();
            }
            placed_roots += 1;
            let height = walker.walk(root, current_y, &mut ctx, &mut sink);
            current_y += height + self.config.root_spacing();
        }
        let total_height = current_y;

        let footers = lifelines.finalize(&mut headers, total_height);

        debug!(
            nodes = headers.len() + sink.nodes.len() + footers.len(),
            edges = sink.edges.len(),
            total_height;
            "Sequence layout complete"
        );

        let mut nodes = headers;
        nodes.append(&mut sink.nodes);
        nodes.extend(footers);

        Diagram::new(nodes, sink.edges, options.layout_direction, total_height)
    }
}
