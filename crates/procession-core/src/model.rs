//! The business-process tree consumed by the layout engine.
//!
//! These types mirror the catalog's REST payloads: field names are camelCase
//! and the catalog's historical names (`imlNumber`, `interfaceType`,
//! `activityName`, `businessProcess`, ...) are accepted as aliases. Every
//! collection defaults to empty so partially-populated trees deserialize.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::{ActivityId, ApplicationId, InterfaceId, ProcessId};

/// A diagram participant, drawn as one lifeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Application {
    pub fn new(id: ApplicationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }
}

/// Reads any JSON number as a sequence number.
///
/// Only whole numbers from 1 up to `u32::MAX` order an item. Zero, negative,
/// fractional and out-of-range values read as absent, so the item takes the
/// next generated number instead of failing the whole document.
fn lenient_sequence_number<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|n| n.fract() == 0.0 && (1.0..=f64::from(u32::MAX)).contains(n))
        .map(|n| n as u32))
}

/// A point-to-point interaction between a provider and a consumer application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    pub id: InterfaceId,
    #[serde(alias = "imlNumber", default)]
    pub label: String,
    /// Transport kind, e.g. `"file"`, `"online"`, `"REST"`.
    #[serde(alias = "interfaceType", default)]
    pub kind: String,
    #[serde(default)]
    pub provider_application_id: Option<ApplicationId>,
    #[serde(default)]
    pub consumer_application_id: Option<ApplicationId>,
    #[serde(alias = "providerApp", default)]
    pub provider: Option<Application>,
    #[serde(alias = "consumerApp", default)]
    pub consumer: Option<Application>,
    #[serde(default, deserialize_with = "lenient_sequence_number")]
    pub sequence_number: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Interface {
    /// Returns true for file-transfer interfaces, where the provider pushes
    /// to the consumer.
    pub fn is_file_transfer(&self) -> bool {
        self.kind.eq_ignore_ascii_case("file")
    }

    /// Returns true when the interface status is `"active"`.
    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("active"))
    }
}

/// An application acting on itself (drawn as a self-loop).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalActivity {
    pub id: ActivityId,
    #[serde(alias = "activityName", default)]
    pub name: String,
    #[serde(alias = "activityType", default)]
    pub kind: String,
    #[serde(default)]
    pub application_id: Option<ApplicationId>,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default, deserialize_with = "lenient_sequence_number")]
    pub sequence_number: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Hierarchy level of a business process.
///
/// Levels order the catalog's decomposition (A contains B contains C). A level
/// string the catalog does not know is preserved in [`ProcessLevel::Other`];
/// layout treats it like level C.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProcessLevel {
    A,
    B,
    #[default]
    C,
    Other(String),
}

impl ProcessLevel {
    /// Returns the level used for sizing and styling.
    pub fn effective(&self) -> ProcessLevel {
        match self {
            Self::Other(_) => Self::C,
            level => level.clone(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ProcessLevel {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "A" | "a" => Self::A,
            "B" | "b" => Self::B,
            "C" | "c" => Self::C,
            _ => Self::Other(raw),
        }
    }
}

impl fmt::Display for ProcessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProcessLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProcessLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// A node of the business-process tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProcess {
    pub id: ProcessId,
    #[serde(alias = "businessProcess", default)]
    pub name: String,
    #[serde(default)]
    pub level: ProcessLevel,
    #[serde(default, deserialize_with = "lenient_sequence_number")]
    pub sequence_number: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub internal_activities: Vec<InternalActivity>,
    #[serde(default)]
    pub child_processes: Vec<BusinessProcess>,
}

impl BusinessProcess {
    pub fn new(id: ProcessId, name: impl Into<String>, level: ProcessLevel) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            sequence_number: None,
            description: None,
            interfaces: Vec::new(),
            internal_activities: Vec::new(),
            child_processes: Vec::new(),
        }
    }

    /// Returns true when the process has no direct interfaces, activities or
    /// children.
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
            && self.internal_activities.is_empty()
            && self.child_processes.is_empty()
    }
}

/// Reference to an activity inside an [`ActivityContext`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivityRef {
    pub id: ActivityId,
}

/// An activity of the process being viewed, joined with its application.
///
/// Callers pass these to fill in application data the tree itself lacks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivityContext {
    pub activity: ActivityRef,
    #[serde(default)]
    pub application: Option<Application>,
}

/// Axis along which the renderer should present the sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    Vertical,
    Horizontal,
}

/// Per-render layout options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub show_child_processes: bool,
    pub show_interface_details: bool,
    pub layout_direction: LayoutDirection,
    pub current_process_activities: Vec<ActivityContext>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            show_child_processes: true,
            show_interface_details: true,
            layout_direction: LayoutDirection::default(),
            current_process_activities: Vec::new(),
        }
    }
}

/// A complete layout request: the process roots, render options, and an
/// optional application catalog used to resolve id-only references.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramInput {
    pub processes: Vec<BusinessProcess>,
    #[serde(default)]
    pub options: LayoutOptions,
    #[serde(default)]
    pub applications: Vec<Application>,
}
