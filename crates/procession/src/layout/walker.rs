//! Hierarchical walk over the process tree.
//!
//! The walker places one marker per interface or activity at a running y
//! cursor, recurses into child processes, and reports back how much vertical
//! space each process consumed. Parents advance their cursor by the child's
//! height, so sibling subtrees never overlap.

use std::collections::HashSet;

use log::{debug, trace, warn};

use procession_core::{
    geometry::{Point, Size},
    identifier::{EdgeId, NodeId, ProcessId},
    model::{BusinessProcess, Interface, InternalActivity, LayoutOptions, ProcessLevel},
};

use crate::{
    config::{LayoutConfig, Palette},
    diagram::{
        ActivityPayload, Boundary, EdgeAnchor, EdgeKind, EdgePayload, EntityRef, InterfacePayload,
        LayoutEdge, LayoutNode, NodeKind, NodePayload, ProcessGroupPayload, SwimlanePayload,
    },
    layout::{
        items::{Item, SequenceCounter, sequenced_items},
        lifeline::{ApplicationResolver, Lifelines},
    },
};

const SWIMLANE_Z_INDEX: i32 = 0;
const PROCESS_GROUP_Z_INDEX: i32 = -5;

/// Traversal state threaded through the recursion.
#[derive(Debug, Default)]
pub(crate) struct WalkContext {
    counter: SequenceCounter,
    /// Processes on the path from the current root to the current process.
    ancestors: Vec<ProcessId>,
    /// Processes on that path that emitted a swimlane.
    lane_owners: Vec<ProcessId>,
    /// Number of level-B processes on that path.
    b_ancestors: usize,
    /// Every process laid out so far, across all roots.
    placed: HashSet<ProcessId>,
}

impl WalkContext {
    /// Records `process` as laid out. Returns `false` if it already was.
    ///
    /// Marker and swimlane ids are keyed by process id, so each process may
    /// appear in the output only once.
    pub(crate) fn claim(&mut self, process: ProcessId) -> bool {
        self.placed.insert(process)
    }
}

/// Nodes and edges emitted by the walk, in emission order.
#[derive(Debug, Default)]
pub(crate) struct LayoutSink {
    pub(crate) nodes: Vec<LayoutNode>,
    pub(crate) edges: Vec<LayoutEdge>,
}

pub(crate) struct Walker<'a> {
    config: &'a LayoutConfig,
    palette: &'a Palette,
    options: &'a LayoutOptions,
    resolver: &'a ApplicationResolver<'a>,
    lifelines: &'a Lifelines<'a>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        config: &'a LayoutConfig,
        palette: &'a Palette,
        options: &'a LayoutOptions,
        resolver: &'a ApplicationResolver<'a>,
        lifelines: &'a Lifelines<'a>,
    ) -> Self {
        Self {
            config,
            palette,
            options,
            resolver,
            lifelines,
        }
    }

    fn lane_width(&self) -> f32 {
        self.lifelines.len() as f32 * self.config.lane_spacing() + self.config.lane_margin()
    }

    /// Lays out `process` starting at `start_y` and returns its height.
    pub(crate) fn walk(
        &self,
        process: &'a BusinessProcess,
        start_y: f32,
        ctx: &mut WalkContext,
        sink: &mut LayoutSink,
    ) -> f32 {
        let is_root = ctx.ancestors.is_empty();
        let inside_b = ctx.b_ancestors > 0;
        let level = process.level.effective();
        if let ProcessLevel::Other(raw) = &process.level {
            debug!(process_id:% = process.id, level = raw.as_str(); "Unknown process level, sizing as C");
        }
        let items = sequenced_items(process, self.options.show_child_processes, &mut ctx.counter);

        let has_lane = match level {
            ProcessLevel::A => true,
            ProcessLevel::B => !items.is_empty() || !process.child_processes.is_empty(),
            _ => false,
        };

        ctx.ancestors.push(process.id);
        if has_lane {
            ctx.lane_owners.push(process.id);
        }
        if level == ProcessLevel::B {
            ctx.b_ancestors += 1;
        }

        let mut cursor = start_y
            + self.config.box_header_height()
            + self.config.box_padding()
            + self.config.first_item_offset();

        for entry in &items {
            match entry.item {
                Item::Activity(activity) => {
                    if self.place_activity(process, activity, entry.sequence_number, cursor, ctx, sink)
                    {
                        cursor += self.config.item_spacing();
                    }
                }
                Item::Interface(interface) => {
                    if self.place_interface(process, interface, entry.sequence_number, cursor, ctx, sink)
                    {
                        cursor += self.config.item_spacing();
                    }
                }
                Item::Child(child) => {
                    if let Some(height) = self.descend(child, cursor + self.config.child_gap(), ctx, sink)
                    {
                        cursor += self.config.child_gap()
                            + height
                            + self.config.box_padding()
                            + self.config.spacing_after_child(&child.level);
                    }
                }
            }
        }

        if level == ProcessLevel::B {
            ctx.b_ancestors -= 1;
        }
        if has_lane {
            ctx.lane_owners.pop();
        }
        ctx.ancestors.pop();

        let content_height = (cursor - start_y) + self.config.box_padding();
        let mut height = content_height.max(self.config.min_heights().for_level(&level));
        if items.is_empty() && !is_root {
            height += self.config.empty_buffer();
        }

        if level == ProcessLevel::C && inside_b {
            sink.nodes
                .push(self.process_group(process, start_y, content_height));
        }

        if has_lane {
            if let Some((lead, tail)) = self.config.lane_clearance(&level) {
                sink.nodes.push(self.swimlane_boundary(
                    process,
                    Boundary::Start,
                    start_y - lead,
                ));
                sink.nodes.push(self.swimlane_boundary(
                    process,
                    Boundary::End,
                    start_y + height + tail,
                ));
            }
        }

        debug!(
            process_id:% = process.id,
            level:% = process.level,
            items = items.len(),
            start_y,
            height;
            "Laid out process"
        );

        height
    }

    /// Recurses into `child` unless doing so would revisit an ancestor, lay
    /// out an already placed process again, or exceed the configured depth.
    fn descend(
        &self,
        child: &'a BusinessProcess,
        start_y: f32,
        ctx: &mut WalkContext,
        sink: &mut LayoutSink,
    ) -> Option<f32> {
        if ctx.ancestors.contains(&child.id) {
            warn!(process_id:% = child.id; "Process already on the current path, skipping");
            return None;
        }
        if ctx.ancestors.len() >= self.config.max_depth() {
            warn!(
                process_id:% = child.id,
                max_depth = self.config.max_depth();
                "Process nesting too deep, skipping"
            );
            return None;
        }
        if !ctx.claim(child.id) {
            warn!(process_id:% = child.id; "Process already laid out elsewhere, skipping");
            return None;
        }
        Some(self.walk(child, start_y, ctx, sink))
    }

    fn place_interface(
        &self,
        process: &BusinessProcess,
        interface: &'a Interface,
        sequence_number: u32,
        y: f32,
        ctx: &WalkContext,
        sink: &mut LayoutSink,
    ) -> bool {
        let (Some(provider), Some(consumer)) = (
            self.resolver.provider(interface),
            self.resolver.consumer(interface),
        ) else {
            warn!(
                process_id:% = process.id,
                interface_id:% = interface.id;
                "Interface endpoint cannot be resolved, skipping"
            );
            return false;
        };
        if self.lifelines.x_of(provider.id).is_none() || self.lifelines.x_of(consumer.id).is_none() {
            warn!(interface_id:% = interface.id; "Interface endpoint has no lifeline, skipping");
            return false;
        }

        let (source, target) = if interface.is_file_transfer() {
            (provider.id, consumer.id)
        } else {
            (consumer.id, provider.id)
        };

        let show_details = self.options.show_interface_details;
        let active = interface.is_active();
        let anchor = EdgeAnchor {
            id: EdgeId::Interface {
                process: process.id,
                interface: interface.id,
            },
            kind: EdgeKind::PointToPoint,
            source: NodeId::LifelineHeader(source),
            target: NodeId::LifelineHeader(target),
            sequence_number,
            swimlane: ctx.lane_owners.last().copied(),
            entity: EntityRef::Interface(interface.id),
            y_position: y,
        };
        let payload = InterfacePayload {
            label: interface.label.clone(),
            interface_type: (show_details && !interface.kind.is_empty())
                .then(|| interface.kind.clone()),
            description: if show_details {
                interface.description.clone()
            } else {
                None
            },
            status: interface.status.clone(),
            active,
            stroke: self.palette.interface(active),
            dashed: interface.is_file_transfer(),
            marker_end: if active {
                "arrowclosed"
            } else {
                "arrowclosed-inactive"
            }
            .to_string(),
            process_level: process.level.clone(),
        };

        trace!(edge:% = anchor.id, y; "Placed interface marker");
        sink.edges
            .push(LayoutEdge::new(anchor, EdgePayload::Interface(payload)));
        true
    }

    fn place_activity(
        &self,
        process: &BusinessProcess,
        activity: &'a InternalActivity,
        sequence_number: u32,
        y: f32,
        ctx: &WalkContext,
        sink: &mut LayoutSink,
    ) -> bool {
        let Some(application) = self.resolver.activity(activity) else {
            warn!(
                process_id:% = process.id,
                activity_id:% = activity.id;
                "Activity application cannot be resolved, skipping"
            );
            return false;
        };
        if self.lifelines.x_of(application.id).is_none() {
            warn!(activity_id:% = activity.id; "Activity application has no lifeline, skipping");
            return false;
        }

        let node = NodeId::LifelineHeader(application.id);
        let anchor = EdgeAnchor {
            id: EdgeId::Activity {
                process: process.id,
                activity: activity.id,
            },
            kind: EdgeKind::SelfLoop,
            source: node,
            target: node,
            sequence_number,
            swimlane: ctx.lane_owners.last().copied(),
            entity: EntityRef::Activity(activity.id),
            y_position: y,
        };
        let payload = ActivityPayload {
            name: activity.name.clone(),
            activity_type: (!activity.kind.is_empty()).then(|| activity.kind.clone()),
            description: if self.options.show_interface_details {
                activity.description.clone()
            } else {
                None
            },
            stroke: self.palette.activity(),
            process_level: process.level.clone(),
        };

        trace!(edge:% = anchor.id, y; "Placed activity marker");
        sink.edges
            .push(LayoutEdge::new(anchor, EdgePayload::Activity(payload)));
        true
    }

    fn swimlane_boundary(&self, process: &BusinessProcess, boundary: Boundary, y: f32) -> LayoutNode {
        let (id, kind, description) = match boundary {
            Boundary::Start => (
                NodeId::SwimlaneStart(process.id),
                NodeKind::SwimlaneStart,
                Some(
                    process
                        .description
                        .clone()
                        .unwrap_or_else(|| format!("Level {} process", process.level)),
                ),
            ),
            Boundary::End => (
                NodeId::SwimlaneEnd(process.id),
                NodeKind::SwimlaneEnd,
                process.description.clone(),
            ),
        };

        LayoutNode::new(
            id,
            kind,
            Point::new(0.0, y),
            NodePayload::Swimlane(SwimlanePayload {
                boundary,
                process_id: process.id,
                process_name: process.name.clone(),
                process_level: process.level.clone(),
                description,
            }),
        )
        .with_size(Size::new(self.lane_width(), 0.0))
        .with_z_index(SWIMLANE_Z_INDEX)
    }

    fn process_group(&self, process: &BusinessProcess, start_y: f32, content_height: f32) -> LayoutNode {
        LayoutNode::new(
            NodeId::ProcessGroup(process.id),
            NodeKind::ProcessGroup,
            Point::new(
                self.config.lane_margin() / 2.0,
                start_y - self.config.group_lead(),
            ),
            NodePayload::ProcessGroup(ProcessGroupPayload {
                process_id: process.id,
                process_name: process.name.clone(),
                interface_count: process.interfaces.len(),
            }),
        )
        .with_size(Size::new(
            self.lifelines.len() as f32 * self.config.lane_spacing(),
            content_height + self.config.group_extra_height(),
        ))
        .with_z_index(PROCESS_GROUP_Z_INDEX)
    }
}
