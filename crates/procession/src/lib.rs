//! Procession - sequence-interaction layout for business-process trees.
//!
//! Takes a hierarchy of business processes (levels A, B, C) with their
//! interfaces and internal activities, and lays it out as a sequence diagram:
//! one lifeline per application, swimlanes per process, and one marker per
//! interaction. Markers can then be dragged vertically within their swimlane
//! under ordering constraints.

pub mod config;
pub mod diagram;
pub mod interaction;
pub mod layout;
pub mod solver;

mod error;

pub use procession_core::{color, geometry, identifier, model};

pub use error::ProcessionError;

use log::{debug, info, trace};

use config::AppConfig;
use diagram::Diagram;
use layout::Engine;
use model::DiagramInput;
use solver::{DragController, PositionSolver};

/// Builder for parsing, laying out and serializing sequence diagrams.
///
/// # Examples
///
/// ```rust
/// use procession::{DiagramBuilder, config::AppConfig};
///
/// let source = r#"{
///     "processes": [{
///         "id": 1, "name": "Order to Cash", "level": "A",
///         "interfaces": [{
///             "id": 10, "label": "IML-10", "kind": "online",
///             "providerApplicationId": 1, "consumerApplicationId": 2
///         }]
///     }],
///     "applications": [{"id": 1, "name": "ERP"}, {"id": 2, "name": "CRM"}]
/// }"#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let input = builder.parse(source).expect("Failed to parse");
/// let diagram = builder.layout(&input).expect("Failed to lay out");
/// assert_eq!(diagram.edges().len(), 1);
///
/// let json = builder.to_json(&diagram).expect("Failed to serialize");
/// assert!(json.contains("iml-1-10"));
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON diagram input document.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessionError::Input`] carrying the source text when the
    /// document is not valid JSON or does not match the input schema.
    pub fn parse(&self, source: &str) -> Result<DiagramInput, ProcessionError> {
        info!("Parsing diagram input");

        let input: DiagramInput = serde_json::from_str(source)
            .map_err(|err| ProcessionError::new_input_error(err, source))?;

        debug!(processes = input.processes.len(); "Diagram input parsed successfully");
        trace!(input:?; "Parsed diagram input");

        Ok(input)
    }

    /// Lay out a parsed diagram input.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessionError::Style`] if the configured colors are invalid.
    /// Data defects in the input never fail the layout.
    pub fn layout(&self, input: &DiagramInput) -> Result<Diagram, ProcessionError> {
        let palette = self.config.style().palette().map_err(ProcessionError::Style)?;
        let engine = Engine::new(self.config.layout().clone(), palette);

        info!(processes = input.processes.len(); "Laying out diagram");
        let diagram = engine.calculate(input);
        debug!(
            nodes = diagram.nodes().len(),
            edges = diagram.edges().len();
            "Diagram laid out successfully"
        );

        Ok(diagram)
    }

    /// Create a drag controller using the configured solver settings.
    pub fn controller(&self) -> DragController {
        DragController::headless(PositionSolver::new(*self.config.solver()))
    }

    /// Serialize a laid-out diagram to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessionError::Output`] if serialization fails.
    pub fn to_json(&self, diagram: &Diagram) -> Result<String, ProcessionError> {
        info!("Serializing diagram");
        serde_json::to_string_pretty(diagram).map_err(ProcessionError::Output)
    }
}
