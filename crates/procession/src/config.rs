//! Configuration types for Procession layout and interaction.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out, how markers may be dragged, and how they are styled. All
//! types implement [`serde::Deserialize`] and every field has a default, so a
//! configuration file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Lifeline slots and vertical spacing constants.
//! - [`SolverConfig`] - Drag clamping padding, gap and fallback bounds.
//! - [`StyleConfig`] - Marker colors handed to the renderer.
//!
//! # Example
//!
//! ```
//! # use procession::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().item_spacing(), 100.0);
//! assert!(config.style().palette().is_ok());
//! ```

use serde::Deserialize;

use procession_core::{color::Color, model::ProcessLevel};

/// Top-level configuration combining layout, solver and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Constraint solver configuration section.
    #[serde(default)]
    solver: SolverConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its three sections.
    pub fn new(layout: LayoutConfig, solver: SolverConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            solver,
            style,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the solver configuration.
    pub fn solver(&self) -> &SolverConfig {
        &self.solver
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Minimum heights reserved per process level.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelHeights {
    a: f32,
    b: f32,
    c: f32,
}

impl Default for LevelHeights {
    fn default() -> Self {
        Self {
            a: 300.0,
            b: 250.0,
            c: 200.0,
        }
    }
}

impl LevelHeights {
    pub fn new(a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c }
    }

    /// Returns the floor for `level`; unknown levels use the level-C floor.
    pub fn for_level(&self, level: &ProcessLevel) -> f32 {
        match level.effective() {
            ProcessLevel::A => self.a,
            ProcessLevel::B => self.b,
            _ => self.c,
        }
    }
}

/// Geometry constants of the sequence layout.
///
/// Horizontal values place lifelines; vertical values drive the hierarchical
/// walk. See the field docs for where each one applies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// X of the first lifeline slot.
    base_x: f32,
    /// Horizontal distance between lifeline slots.
    lane_spacing: f32,
    /// Extra width of swimlanes beyond the last slot.
    lane_margin: f32,
    /// Y of every lifeline header.
    header_y: f32,
    /// Distance of footers above the grand total height.
    footer_inset: f32,
    /// Y where the first root process starts.
    sequence_start_y: f32,
    /// Vertical distance between consecutive markers.
    item_spacing: f32,
    box_header_height: f32,
    box_padding: f32,
    /// Gap between the process box header and its first marker.
    first_item_offset: f32,
    /// Gap above a nested child process.
    child_gap: f32,
    /// Space reserved below a level-B child.
    level_b_spacing: f32,
    /// Space reserved below any other child.
    child_spacing: f32,
    /// Space between root processes.
    root_spacing: f32,
    /// Extra height for empty non-root processes.
    empty_buffer: f32,
    min_heights: LevelHeights,
    /// How far above its process a level-A swimlane starts.
    lane_lead_a: f32,
    /// How far above its process a level-B swimlane starts.
    lane_lead_b: f32,
    /// How far below its process a level-A swimlane ends.
    lane_tail_a: f32,
    /// How far below its process a level-B swimlane ends.
    lane_tail_b: f32,
    /// How far above its process a process-group box starts.
    group_lead: f32,
    /// Extra height of a process-group box over its content.
    group_extra_height: f32,
    /// Deepest process nesting that is laid out.
    max_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_x: 100.0,
            lane_spacing: 200.0,
            lane_margin: 100.0,
            header_y: 50.0,
            footer_inset: 50.0,
            sequence_start_y: 350.0,
            item_spacing: 100.0,
            box_header_height: 40.0,
            box_padding: 20.0,
            first_item_offset: 60.0,
            child_gap: 50.0,
            level_b_spacing: 150.0,
            child_spacing: 100.0,
            root_spacing: 100.0,
            empty_buffer: 100.0,
            min_heights: LevelHeights::default(),
            lane_lead_a: 50.0,
            lane_lead_b: 80.0,
            lane_tail_a: 20.0,
            lane_tail_b: 50.0,
            group_lead: 30.0,
            group_extra_height: 40.0,
            max_depth: 32,
        }
    }
}

impl LayoutConfig {
    pub fn base_x(&self) -> f32 {
        self.base_x
    }

    pub fn lane_spacing(&self) -> f32 {
        self.lane_spacing
    }

    pub fn lane_margin(&self) -> f32 {
        self.lane_margin
    }

    pub fn header_y(&self) -> f32 {
        self.header_y
    }

    pub fn footer_inset(&self) -> f32 {
        self.footer_inset
    }

    pub fn sequence_start_y(&self) -> f32 {
        self.sequence_start_y
    }

    pub fn item_spacing(&self) -> f32 {
        self.item_spacing
    }

    pub fn box_header_height(&self) -> f32 {
        self.box_header_height
    }

    pub fn box_padding(&self) -> f32 {
        self.box_padding
    }

    pub fn first_item_offset(&self) -> f32 {
        self.first_item_offset
    }

    pub fn child_gap(&self) -> f32 {
        self.child_gap
    }

    /// Space reserved below a child process of the given level.
    pub fn spacing_after_child(&self, level: &ProcessLevel) -> f32 {
        match level.effective() {
            ProcessLevel::B => self.level_b_spacing,
            _ => self.child_spacing,
        }
    }

    pub fn root_spacing(&self) -> f32 {
        self.root_spacing
    }

    pub fn empty_buffer(&self) -> f32 {
        self.empty_buffer
    }

    pub fn min_heights(&self) -> &LevelHeights {
        &self.min_heights
    }

    /// Distance from a process start to its swimlane start (above) and from
    /// its end to its swimlane end (below), or `None` for levels without
    /// swimlanes.
    pub fn lane_clearance(&self, level: &ProcessLevel) -> Option<(f32, f32)> {
        match level.effective() {
            ProcessLevel::A => Some((self.lane_lead_a, self.lane_tail_a)),
            ProcessLevel::B => Some((self.lane_lead_b, self.lane_tail_b)),
            _ => None,
        }
    }

    pub fn group_lead(&self) -> f32 {
        self.group_lead
    }

    pub fn group_extra_height(&self) -> f32 {
        self.group_extra_height
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Set the vertical distance between consecutive markers
    pub fn with_item_spacing(mut self, spacing: f32) -> Self {
        self.item_spacing = spacing;
        self
    }

    /// Set the horizontal distance between lifeline slots
    pub fn with_lane_spacing(mut self, spacing: f32) -> Self {
        self.lane_spacing = spacing;
        self
    }

    /// Set the per-level minimum heights
    pub fn with_min_heights(mut self, min_heights: LevelHeights) -> Self {
        self.min_heights = min_heights;
        self
    }

    /// Set the deepest process nesting that is laid out
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Clamping parameters for dragging interaction markers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Distance a marker keeps from its swimlane boundaries.
    padding: f32,
    /// Minimum distance between neighboring markers of one process.
    min_gap: f32,
    /// Lower bound used when a marker has no enclosing swimlane.
    fallback_min_y: f32,
    /// Upper bound used when a marker has no enclosing swimlane. The lifeline
    /// footer is used instead when it lies further down.
    fallback_max_y: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            padding: 80.0,
            min_gap: 60.0,
            fallback_min_y: 150.0,
            fallback_max_y: 2000.0,
        }
    }
}

impl SolverConfig {
    pub fn new(padding: f32, min_gap: f32, fallback_min_y: f32, fallback_max_y: f32) -> Self {
        Self {
            padding,
            min_gap,
            fallback_min_y,
            fallback_max_y,
        }
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn min_gap(&self) -> f32 {
        self.min_gap
    }

    pub fn fallback_min_y(&self) -> f32 {
        self.fallback_min_y
    }

    pub fn fallback_max_y(&self) -> f32 {
        self.fallback_max_y
    }
}

/// Visual styling configuration for markers.
///
/// Colors are CSS color strings; fields that are not set fall back to the
/// catalog's defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Stroke of interfaces whose status is active.
    #[serde(default)]
    active_interface_color: Option<String>,

    /// Stroke of every other interface.
    #[serde(default)]
    inactive_interface_color: Option<String>,

    /// Stroke of internal-activity self-loops.
    #[serde(default)]
    activity_color: Option<String>,
}

impl StyleConfig {
    pub fn new(
        active_interface_color: Option<String>,
        inactive_interface_color: Option<String>,
        activity_color: Option<String>,
    ) -> Self {
        Self {
            active_interface_color,
            inactive_interface_color,
            activity_color,
        }
    }

    /// Resolves the configured colors into a [`Palette`].
    ///
    /// # Errors
    ///
    /// Returns an error if a configured color string cannot be parsed into a
    /// valid [`Color`].
    pub fn palette(&self) -> Result<Palette, String> {
        let resolve = |value: &Option<String>, default: &str, name: &str| {
            Color::new(value.as_deref().unwrap_or(default))
                .map_err(|err| format!("Invalid {name} in config: {err}"))
        };

        Ok(Palette {
            active_interface: resolve(
                &self.active_interface_color,
                "#10b981",
                "active_interface_color",
            )?,
            inactive_interface: resolve(
                &self.inactive_interface_color,
                "#6b7280",
                "inactive_interface_color",
            )?,
            activity: resolve(&self.activity_color, "#16a34a", "activity_color")?,
        })
    }
}

/// Resolved marker colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    active_interface: Color,
    inactive_interface: Color,
    activity: Color,
}

impl Palette {
    /// Stroke color for an interface with the given status.
    pub fn interface(&self, active: bool) -> Color {
        if active {
            self.active_interface
        } else {
            self.inactive_interface
        }
    }

    pub fn activity(&self) -> Color {
        self.activity
    }
}
