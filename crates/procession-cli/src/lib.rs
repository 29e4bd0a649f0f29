//! CLI logic for the Procession layout tool.
//!
//! Reads a JSON diagram input, lays it out, replays any drag gestures given
//! on the command line, and writes the positioned diagram as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, DragSpec};

use std::fs;

use log::{debug, info};

use procession::{DiagramBuilder, ProcessionError, diagram::Diagram, solver::DragController};

/// Run the Procession CLI application
///
/// # Errors
///
/// Returns `ProcessionError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid diagram input
/// - Drag gestures naming unknown markers
pub fn run(args: &Args) -> Result<(), ProcessionError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let input = builder.parse(&source)?;
    let mut diagram = builder.layout(&input)?;

    let mut controller = builder.controller();
    for drag in &args.drags {
        replay_drag(&mut controller, &mut diagram, drag)?;
    }

    let json = builder.to_json(&diagram)?;
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}

/// Replays a drag from pointer y 0 to `drag.delta` through the controller.
fn replay_drag(
    controller: &mut DragController,
    diagram: &mut Diagram,
    drag: &DragSpec,
) -> Result<(), ProcessionError> {
    controller.drag_start(diagram, drag.edge, 0.0)?;
    controller.drag_move(diagram, drag.delta)?;
    let committed = controller.drag_end(diagram, drag.delta)?;

    debug!(edge:% = drag.edge, delta = drag.delta, committed; "Replayed drag");
    Ok(())
}
