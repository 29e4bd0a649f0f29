//! Marker interaction dispatch.
//!
//! Renderers forward pointer gestures on markers to [`Diagram::dispatch`],
//! which resolves the marker and hands a [`MarkerEvent`] to the handler the
//! owning component passes in.

use log::debug;
use serde::Serialize;

use procession_core::identifier::{EdgeId, ProcessId};

use crate::{
    diagram::{Diagram, EntityRef},
    solver::SolverError,
};

/// Pointer gestures a marker responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Gesture {
    Click,
    DoubleClick,
    ContextMenu,
}

/// A gesture on a marker, resolved to the catalog entity behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerEvent {
    pub edge: EdgeId,
    pub entity: EntityRef,
    pub process: ProcessId,
    pub gesture: Gesture,
}

/// Receives marker events.
pub trait InteractionHandler {
    fn on_marker_event(&mut self, event: MarkerEvent);
}

impl<F: FnMut(MarkerEvent)> InteractionHandler for F {
    fn on_marker_event(&mut self, event: MarkerEvent) {
        self(event)
    }
}

impl Diagram {
    /// Delivers `gesture` on `edge` to `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::UnknownEdge`] if the diagram has no such edge;
    /// the handler is not called in that case.
    pub fn dispatch<H: InteractionHandler + ?Sized>(
        &self,
        edge: EdgeId,
        gesture: Gesture,
        handler: &mut H,
    ) -> Result<(), SolverError> {
        let marker = self.edge(edge).ok_or(SolverError::UnknownEdge(edge))?;
        let event = MarkerEvent {
            edge,
            entity: marker.entity(),
            process: marker.business_process_id(),
            gesture,
        };
        debug!(edge:% = edge, gesture:? = gesture; "Dispatching marker event");
        handler.on_marker_event(event);
        Ok(())
    }
}
