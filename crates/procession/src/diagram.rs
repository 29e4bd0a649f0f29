//! Positioned output of a layout pass.
//!
//! A [`Diagram`] holds the [`LayoutNode`]s (lifeline anchors, swimlane
//! boundaries, process-group boxes) and [`LayoutEdge`]s (interaction markers)
//! produced by one layout pass. Nodes are immutable. The only mutable value is
//! each edge's `y_position`, which the [`crate::solver`] module updates when a
//! drag gesture commits.
//!
//! Everything here serializes to the camelCase JSON shape graph renderers
//! consume: ids are rendered strings, positions are flattened `x`/`y`.

use serde::Serialize;

use procession_core::{
    color::Color,
    geometry::{Bounds, Interval, Point, Size},
    identifier::{ActivityId, EdgeId, InterfaceId, NodeId, ProcessId},
    model::{Application, LayoutDirection, ProcessLevel},
};

/// Discriminator of a [`LayoutNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    LifelineHeader,
    LifelineFooter,
    SwimlaneStart,
    SwimlaneEnd,
    ProcessGroup,
}

/// Which end of a swimlane a boundary node marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Boundary {
    Start,
    End,
}

/// Renderer metadata for a lifeline header or footer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifelinePayload {
    pub application: Application,
    /// Realized length of the lifeline below its anchor.
    pub lifeline_height: f32,
    pub header_position: Point,
    pub footer_position: Point,
}

/// Renderer metadata for a swimlane boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimlanePayload {
    pub boundary: Boundary,
    pub process_id: ProcessId,
    pub process_name: String,
    pub process_level: ProcessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Renderer metadata for a process-group background box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupPayload {
    pub process_id: ProcessId,
    pub process_name: String,
    pub interface_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodePayload {
    Lifeline(LifelinePayload),
    Swimlane(SwimlanePayload),
    ProcessGroup(ProcessGroupPayload),
}

/// A positioned, immutable diagram node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    id: NodeId,
    kind: NodeKind,
    #[serde(flatten)]
    position: Point,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    size: Option<Size>,
    z_index: i32,
    payload: NodePayload,
}

impl LayoutNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind, position: Point, payload: NodePayload) -> Self {
        Self {
            id,
            kind,
            position,
            size: None,
            z_index: 0,
            payload,
        }
    }

    pub(crate) fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub(crate) fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub(crate) fn payload_mut(&mut self) -> &mut NodePayload {
        &mut self.payload
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x()
    }

    pub fn y(&self) -> f32 {
        self.position.y()
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    /// Bounds of the node, zero-sized for anchors without an extent.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size.unwrap_or_default())
    }
}

/// Discriminator of a [`LayoutEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    PointToPoint,
    SelfLoop,
}

/// The catalog entity a marker was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum EntityRef {
    Interface(InterfaceId),
    Activity(ActivityId),
}

/// Renderer metadata for an interface marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfacePayload {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub active: bool,
    pub stroke: Color,
    /// File transfers are drawn dashed.
    pub dashed: bool,
    pub marker_end: String,
    pub process_level: ProcessLevel,
}

/// Renderer metadata for an internal-activity marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stroke: Color,
    pub process_level: ProcessLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EdgePayload {
    Interface(InterfacePayload),
    Activity(ActivityPayload),
}

/// A positioned interaction marker.
///
/// All fields except `y_position` are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    id: EdgeId,
    kind: EdgeKind,
    source: NodeId,
    target: NodeId,
    sequence_number: u32,
    business_process_id: ProcessId,
    /// Process whose swimlane encloses this marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    swimlane: Option<ProcessId>,
    entity: EntityRef,
    y_position: f32,
    z_index: i32,
    payload: EdgePayload,
}

/// Everything about a marker except its payload.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeAnchor {
    pub(crate) id: EdgeId,
    pub(crate) kind: EdgeKind,
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
    pub(crate) sequence_number: u32,
    pub(crate) swimlane: Option<ProcessId>,
    pub(crate) entity: EntityRef,
    pub(crate) y_position: f32,
}

impl LayoutEdge {
    pub(crate) fn new(anchor: EdgeAnchor, payload: EdgePayload) -> Self {
        let z_index = match anchor.kind {
            EdgeKind::PointToPoint => 1000,
            EdgeKind::SelfLoop => 999,
        };
        Self {
            id: anchor.id,
            kind: anchor.kind,
            source: anchor.source,
            target: anchor.target,
            sequence_number: anchor.sequence_number,
            business_process_id: anchor.id.process(),
            swimlane: anchor.swimlane,
            entity: anchor.entity,
            y_position: anchor.y_position,
            z_index,
            payload,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn business_process_id(&self) -> ProcessId {
        self.business_process_id
    }

    pub fn swimlane(&self) -> Option<ProcessId> {
        self.swimlane
    }

    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    pub fn y_position(&self) -> f32 {
        self.y_position
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn payload(&self) -> &EdgePayload {
        &self.payload
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    direction: LayoutDirection,
    total_height: f32,
}

impl Diagram {
    pub(crate) fn new(
        nodes: Vec<LayoutNode>,
        edges: Vec<LayoutEdge>,
        direction: LayoutDirection,
        total_height: f32,
    ) -> Self {
        Self {
            nodes,
            edges,
            direction,
            total_height,
        }
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Grand total height consumed by all root processes.
    pub fn total_height(&self) -> f32 {
        self.total_height
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&LayoutEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub(crate) fn edge_index(&self, id: EdgeId) -> Option<usize> {
        self.edges.iter().position(|edge| edge.id == id)
    }

    /// Nodes of the given kind, in emission order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    /// Markers owned by `process`, in emission order.
    pub fn edges_of_process(&self, process: ProcessId) -> impl Iterator<Item = &LayoutEdge> {
        self.edges
            .iter()
            .filter(move |edge| edge.business_process_id == process)
    }

    /// Vertical span between the start and end boundary of a process's
    /// swimlane, if the process has one.
    pub fn swimlane(&self, process: ProcessId) -> Option<Interval> {
        let start = self.node(NodeId::SwimlaneStart(process))?;
        let end = self.node(NodeId::SwimlaneEnd(process))?;
        Some(Interval::new(start.y(), end.y()))
    }

    /// Y of the lowest lifeline footer.
    pub fn lifeline_bottom(&self) -> Option<f32> {
        self.nodes_of_kind(NodeKind::LifelineFooter)
            .map(LayoutNode::y)
            .reduce(f32::max)
    }

    /// Bounding box of all nodes.
    pub fn bounds(&self) -> Bounds {
        self.nodes
            .iter()
            .map(LayoutNode::bounds)
            .reduce(|acc, bounds| acc.merge(bounds))
            .unwrap_or_default()
    }

    pub(crate) fn set_y_position(&mut self, index: usize, y: f32) {
        self.edges[index].y_position = y;
    }
}
