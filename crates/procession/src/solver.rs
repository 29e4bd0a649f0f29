//! Positioning constraints for dragged interaction markers.
//!
//! A marker may only move vertically, inside its swimlane (minus padding) and
//! at least `min_gap` away from the neighboring markers of the same process.
//! [`PositionSolver`] computes that allowed interval; [`DragController`] runs
//! the drag gesture state machine on top of it.

mod drag;

use log::trace;
use thiserror::Error;

use procession_core::{geometry::Interval, identifier::EdgeId};

use crate::{
    config::SolverConfig,
    diagram::{Diagram, LayoutEdge},
};

pub use drag::{DragController, PointerCapture};

/// Contract violations of the drag protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("Unknown edge `{0}`")]
    UnknownEdge(EdgeId),

    #[error("No drag in progress")]
    NotDragging,

    #[error("Cannot start dragging `{requested}` while `{active}` is being dragged")]
    AlreadyDragging { active: EdgeId, requested: EdgeId },
}

/// Computes the vertical interval a marker may occupy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionSolver {
    config: SolverConfig,
}

impl PositionSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns the interval `edge` may be placed in given the current
    /// positions of its neighbors.
    ///
    /// The interval is inverted when the constraints cannot all be met.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::UnknownEdge`] if the diagram has no such edge.
    pub fn bounds(&self, diagram: &Diagram, edge: EdgeId) -> Result<Interval, SolverError> {
        let marker = diagram.edge(edge).ok_or(SolverError::UnknownEdge(edge))?;

        let mut bounds = self.lane_bounds(diagram, marker);

        let (preceding, following) = neighbors(diagram, marker);
        if let Some(preceding) = preceding {
            bounds = bounds.raise_min(preceding.y_position() + self.config.min_gap());
        }
        if let Some(following) = following {
            bounds = bounds.lower_max(following.y_position() - self.config.min_gap());
        }

        trace!(
            edge:% = edge,
            min = bounds.min(),
            max = bounds.max();
            "Computed marker bounds"
        );
        Ok(bounds)
    }

    /// Clamps `proposed_y` into the allowed interval of `edge`.
    ///
    /// When the interval is inverted, or `proposed_y` is not a number, the
    /// marker's stored position is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::UnknownEdge`] if the diagram has no such edge.
    pub fn clamp(&self, diagram: &Diagram, edge: EdgeId, proposed_y: f32) -> Result<f32, SolverError> {
        let bounds = self.bounds(diagram, edge)?;
        let stored = diagram
            .edge(edge)
            .map(LayoutEdge::y_position)
            .ok_or(SolverError::UnknownEdge(edge))?;
        Ok(bounds.clamp(proposed_y).unwrap_or(stored))
    }

    fn lane_bounds(&self, diagram: &Diagram, marker: &LayoutEdge) -> Interval {
        let lane = marker
            .swimlane()
            .and_then(|process| diagram.swimlane(process));

        match lane {
            Some(lane) => Interval::new(
                lane.min() + self.config.padding(),
                lane.max() - self.config.padding(),
            ),
            None => {
                let bottom = diagram
                    .lifeline_bottom()
                    .map_or(self.config.fallback_max_y(), |bottom| {
                        bottom.max(self.config.fallback_max_y())
                    });
                Interval::new(self.config.fallback_min_y(), bottom)
            }
        }
    }
}

/// Nearest markers of the same process before and after `marker` in sequence
/// order. Markers sharing a sequence number keep emission order.
fn neighbors<'d>(
    diagram: &'d Diagram,
    marker: &LayoutEdge,
) -> (Option<&'d LayoutEdge>, Option<&'d LayoutEdge>) {
    let mut siblings: Vec<&LayoutEdge> = diagram
        .edges_of_process(marker.business_process_id())
        .collect();
    siblings.sort_by_key(|edge| edge.sequence_number());

    let Some(index) = siblings.iter().position(|edge| edge.id() == marker.id()) else {
        return (None, None);
    };
    let preceding = index.checked_sub(1).and_then(|i| siblings.get(i)).copied();
    let following = siblings.get(index + 1).copied();
    (preceding, following)
}

#[cfg(test)]
pub(crate) mod tests {
    use float_cmp::assert_approx_eq;
    use procession_core::{
        identifier::{ApplicationId, InterfaceId, ProcessId},
        model::{Application, BusinessProcess, DiagramInput, Interface, ProcessLevel},
    };

    use super::*;
    use crate::{
        config::{LayoutConfig, StyleConfig},
        layout::Engine,
    };

    fn interface(id: i64, provider: i64, consumer: i64) -> Interface {
        Interface {
            id: InterfaceId::new(id),
            label: format!("IML-{id}"),
            kind: "online".to_string(),
            provider_application_id: Some(ApplicationId::new(provider)),
            consumer_application_id: Some(ApplicationId::new(consumer)),
            provider: None,
            consumer: None,
            sequence_number: None,
            status: None,
            description: None,
        }
    }

    /// A level-`level` root holding `count` interfaces, laid out with defaults.
    pub(crate) fn diagram_with(level: ProcessLevel, count: i64) -> Diagram {
        let mut root = BusinessProcess::new(ProcessId::new(1), "Root", level);
        for id in 0..count {
            root.interfaces.push(interface(id, 1, 2));
        }
        let input = DiagramInput {
            processes: vec![root],
            applications: vec![
                Application::new(ApplicationId::new(1), "CRM"),
                Application::new(ApplicationId::new(2), "ERP"),
            ],
            ..DiagramInput::default()
        };
        Engine::new(
            LayoutConfig::default(),
            StyleConfig::default().palette().unwrap(),
        )
        .calculate(&input)
    }

    pub(crate) fn edge(id: i64) -> EdgeId {
        EdgeId::Interface {
            process: ProcessId::new(1),
            interface: InterfaceId::new(id),
        }
    }

    #[test]
    fn test_bounds_inside_swimlane_and_neighbors() {
        let diagram = diagram_with(ProcessLevel::A, 3);
        let solver = PositionSolver::default();

        // Markers at 470, 570, 670; swimlane 300..810.
        let first = solver.bounds(&diagram, edge(0)).unwrap();
        assert_approx_eq!(f32, first.min(), 380.0);
        assert_approx_eq!(f32, first.max(), 510.0);

        let middle = solver.bounds(&diagram, edge(1)).unwrap();
        assert_approx_eq!(f32, middle.min(), 530.0);
        assert_approx_eq!(f32, middle.max(), 610.0);

        let last = solver.bounds(&diagram, edge(2)).unwrap();
        assert_approx_eq!(f32, last.min(), 630.0);
        assert_approx_eq!(f32, last.max(), 730.0);
    }

    #[test]
    fn test_clamp_exactly_at_successor_gap() {
        let diagram = diagram_with(ProcessLevel::A, 2);
        let solver = PositionSolver::default();
        let successor = diagram.edge(edge(1)).unwrap().y_position();
        let clamped = solver.clamp(&diagram, edge(0), 10_000.0).unwrap();
        assert_approx_eq!(f32, clamped, successor - 60.0);
    }

    #[test]
    fn test_fallback_bounds_without_swimlane() {
        let diagram = diagram_with(ProcessLevel::C, 1);
        let solver = PositionSolver::default();
        let bounds = solver.bounds(&diagram, edge(0)).unwrap();
        assert_approx_eq!(f32, bounds.min(), 150.0);
        assert_approx_eq!(f32, bounds.max(), 2000.0);
    }

    #[test]
    fn test_fallback_extends_to_lifeline_bottom() {
        let diagram = diagram_with(ProcessLevel::C, 30);
        let bottom = diagram.lifeline_bottom().unwrap();
        assert!(bottom > 2000.0);
        let bounds = PositionSolver::default()
            .bounds(&diagram, edge(29))
            .unwrap();
        assert_approx_eq!(f32, bounds.max(), bottom);
    }

    #[test]
    fn test_inverted_interval_keeps_position() {
        let diagram = diagram_with(ProcessLevel::A, 2);
        let solver = PositionSolver::new(SolverConfig::new(80.0, 250.0, 150.0, 2000.0));
        let stored = diagram.edge(edge(0)).unwrap().y_position();
        assert!(solver.bounds(&diagram, edge(0)).unwrap().is_inverted());
        assert_approx_eq!(f32, solver.clamp(&diagram, edge(0), 400.0).unwrap(), stored);
        assert_approx_eq!(f32, solver.clamp(&diagram, edge(0), f32::NAN).unwrap(), stored);
    }

    #[test]
    fn test_unknown_edge() {
        let diagram = diagram_with(ProcessLevel::A, 1);
        let err = PositionSolver::default()
            .bounds(&diagram, edge(42))
            .unwrap_err();
        assert_eq!(err, SolverError::UnknownEdge(edge(42)));
        assert_eq!(err.to_string(), "Unknown edge `iml-1-42`");
    }
}
