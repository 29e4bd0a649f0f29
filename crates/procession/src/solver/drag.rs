//! Drag gesture state machine.
//!
//! A marker is either idle or being dragged. While dragging, the controller
//! owns the pointer capture guard handed out by a [`PointerCapture`]; the guard
//! is dropped when the drag ends, when the controller is unmounted, or when
//! the controller itself is dropped mid-drag.

use std::mem;

use log::{debug, trace};

use procession_core::identifier::EdgeId;

use crate::{
    diagram::Diagram,
    solver::{PositionSolver, SolverError},
};

/// Source of scoped pointer capture.
///
/// The returned guard holds the capture; dropping it releases the capture.
pub trait PointerCapture {
    type Guard;

    fn capture(&self, edge: EdgeId) -> Self::Guard;
}

/// No-op capture for headless use.
impl PointerCapture for () {
    type Guard = ();

    fn capture(&self, _edge: EdgeId) -> Self::Guard {}
}

#[derive(Debug)]
struct DragSession<G> {
    edge: EdgeId,
    origin_y: f32,
    start_pointer_y: f32,
    visual_y: f32,
    _guard: G,
}

impl<G> DragSession<G> {
    fn proposed_y(&self, pointer_y: f32) -> f32 {
        let delta = pointer_y - self.start_pointer_y;
        if delta.is_finite() {
            self.origin_y + delta
        } else {
            self.origin_y
        }
    }
}

#[derive(Debug)]
enum DragState<G> {
    Idle,
    Dragging(DragSession<G>),
}

/// Runs drag gestures against a [`Diagram`].
///
/// # Examples
///
/// ```
/// # use procession::{DiagramBuilder, solver::DragController};
/// # let json = r#"{"processes": [], "applications": []}"#;
/// let builder = DiagramBuilder::default();
/// let input = builder.parse(json).unwrap();
/// let mut diagram = builder.layout(&input).unwrap();
///
/// let mut controller = builder.controller();
/// assert!(!controller.is_dragging());
/// assert!(controller.unmount(&mut diagram).is_none());
/// ```
#[derive(Debug)]
pub struct DragController<C: PointerCapture = ()> {
    solver: PositionSolver,
    capture: C,
    state: DragState<C::Guard>,
}

impl DragController<()> {
    /// Creates a controller without pointer capture.
    pub fn headless(solver: PositionSolver) -> Self {
        Self::new(solver, ())
    }
}

impl<C: PointerCapture> DragController<C> {
    pub fn new(solver: PositionSolver, capture: C) -> Self {
        Self {
            solver,
            capture,
            state: DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// The edge currently being dragged.
    pub fn active_edge(&self) -> Option<EdgeId> {
        match &self.state {
            DragState::Dragging(session) => Some(session.edge),
            DragState::Idle => None,
        }
    }

    /// The transient position of the dragged marker.
    pub fn visual_y(&self) -> Option<f32> {
        match &self.state {
            DragState::Dragging(session) => Some(session.visual_y),
            DragState::Idle => None,
        }
    }

    /// Starts dragging `edge` with the pointer at `pointer_y`.
    ///
    /// # Errors
    ///
    /// Fails if another drag is in progress or the diagram has no such edge.
    pub fn drag_start(
        &mut self,
        diagram: &Diagram,
        edge: EdgeId,
        pointer_y: f32,
    ) -> Result<(), SolverError> {
        if let DragState::Dragging(session) = &self.state {
            return Err(SolverError::AlreadyDragging {
                active: session.edge,
                requested: edge,
            });
        }
        let origin_y = diagram
            .edge(edge)
            .ok_or(SolverError::UnknownEdge(edge))?
            .y_position();

        debug!(edge:% = edge, origin_y, pointer_y; "Drag started");
        self.state = DragState::Dragging(DragSession {
            edge,
            origin_y,
            start_pointer_y: pointer_y,
            visual_y: origin_y,
            _guard: self.capture.capture(edge),
        });
        Ok(())
    }

    /// Moves the dragged marker with the pointer and returns its clamped
    /// visual position. The stored position is left untouched.
    ///
    /// # Errors
    ///
    /// Fails if no drag is in progress or the dragged edge is gone.
    pub fn drag_move(&mut self, diagram: &Diagram, pointer_y: f32) -> Result<f32, SolverError> {
        let DragState::Dragging(session) = &mut self.state else {
            return Err(SolverError::NotDragging);
        };
        let proposed = session.proposed_y(pointer_y);
        let visual_y = self.solver.clamp(diagram, session.edge, proposed)?;
        session.visual_y = visual_y;

        trace!(edge:% = session.edge, proposed, visual_y; "Drag moved");
        Ok(visual_y)
    }

    /// Ends the drag, committing the clamped position into the diagram and
    /// releasing the pointer capture. Returns the committed position.
    ///
    /// The clamp is recomputed against the diagram as it is now, so neighbors
    /// that moved during the drag are respected.
    ///
    /// # Errors
    ///
    /// Fails if no drag is in progress or the dragged edge is gone. The
    /// controller is idle afterwards in both cases.
    pub fn drag_end(&mut self, diagram: &mut Diagram, pointer_y: f32) -> Result<f32, SolverError> {
        let DragState::Dragging(session) = mem::replace(&mut self.state, DragState::Idle) else {
            return Err(SolverError::NotDragging);
        };
        let committed = self
            .solver
            .clamp(diagram, session.edge, session.proposed_y(pointer_y))?;
        commit(diagram, session.edge, committed)?;

        debug!(edge:% = session.edge, committed; "Drag committed");
        Ok(committed)
    }

    /// Abandons any drag in progress, committing the last visual position so
    /// that the marker does not snap back. Returns the committed position, or
    /// `None` when idle.
    pub fn unmount(&mut self, diagram: &mut Diagram) -> Option<f32> {
        let DragState::Dragging(session) = mem::replace(&mut self.state, DragState::Idle) else {
            return None;
        };
        commit(diagram, session.edge, session.visual_y).ok()?;

        debug!(edge:% = session.edge, committed = session.visual_y; "Drag committed on unmount");
        Some(session.visual_y)
    }
}

fn commit(diagram: &mut Diagram, edge: EdgeId, y: f32) -> Result<(), SolverError> {
    let index = diagram
        .edge_index(edge)
        .ok_or(SolverError::UnknownEdge(edge))?;
    diagram.set_y_position(index, y);
    Ok(())
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;
    use procession_core::model::ProcessLevel;

    use super::*;
    use crate::{diagram::LayoutEdge, solver::tests::diagram_with};

    const EPSILON: f32 = 1e-3;

    fn level_strategy() -> impl Strategy<Value = ProcessLevel> {
        prop_oneof![
            Just(ProcessLevel::A),
            Just(ProcessLevel::B),
            Just(ProcessLevel::C)
        ]
    }

    fn drags_strategy() -> impl Strategy<Value = Vec<(usize, f32)>> {
        prop::collection::vec((0usize..16, -3000.0f32..3000.0), 1..24)
    }

    fn check_ordering_and_containment(
        level: ProcessLevel,
        count: i64,
        drags: &[(usize, f32)],
    ) -> Result<(), TestCaseError> {
        let mut diagram = diagram_with(level, count);
        let solver = PositionSolver::default();
        let padding = solver.config().padding();
        let min_gap = solver.config().min_gap();
        let lane = diagram.edges()[0]
            .swimlane()
            .and_then(|process| diagram.swimlane(process));
        let mut controller = DragController::headless(solver);

        for &(slot, delta) in drags {
            let target = diagram.edges()[slot % diagram.edges().len()].id();
            let before: Vec<_> = diagram.edges().iter().map(LayoutEdge::y_position).collect();

            controller
                .drag_start(&diagram, target, 0.0)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            controller
                .drag_move(&diagram, delta)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            controller
                .drag_end(&mut diagram, delta)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;

            for (edge, old_y) in diagram.edges().iter().zip(&before) {
                prop_assert!(edge.y_position().is_finite());
                if edge.id() != target {
                    prop_assert_eq!(edge.y_position(), *old_y);
                }
            }

            let ys: Vec<_> = diagram.edges().iter().map(LayoutEdge::y_position).collect();
            for pair in ys.windows(2) {
                prop_assert!(
                    pair[1] - pair[0] >= min_gap - EPSILON,
                    "markers too close: {} then {}",
                    pair[0],
                    pair[1]
                );
            }

            if let Some(lane) = lane {
                for y in &ys {
                    prop_assert!(*y >= lane.min() + padding - EPSILON);
                    prop_assert!(*y <= lane.max() - padding + EPSILON);
                }
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_drags_keep_order_and_containment(
            level in level_strategy(),
            count in 1i64..8,
            drags in drags_strategy(),
        ) {
            check_ordering_and_containment(level, count, &drags)?;
        }
    }
}
