//! Typed identifiers for catalog entities and layout elements.
//!
//! Catalog entities (applications, processes, interfaces, activities) are
//! keyed by the numeric ids the catalog assigns them. Layout elements are
//! keyed by [`NodeId`] and [`EdgeId`], which render to the string ids a graph
//! renderer expects:
//!
//! | element | rendered id |
//! |---|---|
//! | lifeline header | `app-{application}` |
//! | lifeline footer | `app-bottom-{application}` |
//! | swimlane start / end | `lane-start-{process}` / `lane-end-{process}` |
//! | process group | `process-group-{process}` |
//! | interface marker | `iml-{process}-{interface}` |
//! | activity marker | `activity-{process}-{activity}` |

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw catalog id.
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw catalog id.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Catalog id of an application (a lifeline participant).
    ApplicationId
);
entity_id!(
    /// Catalog id of a business process.
    ProcessId
);
entity_id!(
    /// Catalog id of an interface.
    InterfaceId
);
entity_id!(
    /// Catalog id of an internal activity.
    ActivityId
);

/// Identifier of a positioned layout node.
///
/// # Examples
///
/// ```
/// use procession_core::identifier::{ApplicationId, NodeId, ProcessId};
///
/// assert_eq!(NodeId::LifelineHeader(ApplicationId::new(7)).to_string(), "app-7");
/// assert_eq!(NodeId::SwimlaneEnd(ProcessId::new(3)).to_string(), "lane-end-3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    LifelineHeader(ApplicationId),
    LifelineFooter(ApplicationId),
    SwimlaneStart(ProcessId),
    SwimlaneEnd(ProcessId),
    ProcessGroup(ProcessId),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LifelineHeader(app) => write!(f, "app-{app}"),
            Self::LifelineFooter(app) => write!(f, "app-bottom-{app}"),
            Self::SwimlaneStart(process) => write!(f, "lane-start-{process}"),
            Self::SwimlaneEnd(process) => write!(f, "lane-end-{process}"),
            Self::ProcessGroup(process) => write!(f, "process-group-{process}"),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identifier of an interaction marker (layout edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeId {
    Interface {
        process: ProcessId,
        interface: InterfaceId,
    },
    Activity {
        process: ProcessId,
        activity: ActivityId,
    },
}

impl EdgeId {
    /// Returns the process that owns the marker.
    pub fn process(self) -> ProcessId {
        match self {
            Self::Interface { process, .. } | Self::Activity { process, .. } => process,
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface { process, interface } => write!(f, "iml-{process}-{interface}"),
            Self::Activity { process, activity } => write!(f, "activity-{process}-{activity}"),
        }
    }
}

impl Serialize for EdgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when a rendered edge id cannot be parsed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEdgeIdError(String);

impl fmt::Display for ParseEdgeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid edge id `{}`", self.0)
    }
}

impl std::error::Error for ParseEdgeIdError {}

impl std::str::FromStr for EdgeId {
    type Err = ParseEdgeIdError;

    /// Parses the rendered form (`iml-{p}-{i}` or `activity-{p}-{a}`).
    ///
    /// # Examples
    ///
    /// ```
    /// use procession_core::identifier::{EdgeId, InterfaceId, ProcessId};
    ///
    /// let id: EdgeId = "iml-4-12".parse().unwrap();
    /// assert_eq!(
    ///     id,
    ///     EdgeId::Interface { process: ProcessId::new(4), interface: InterfaceId::new(12) }
    /// );
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseEdgeIdError(s.to_string());
        let (prefix, rest) = s.split_once('-').ok_or_else(err)?;
        // Ids may be negative, so split on the first separator after a digit.
        let split = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(idx, _)| idx)
            .ok_or_else(err)?;
        let process = rest[..split].parse::<i64>().map_err(|_| err())?;
        let entity = rest[split + 1..].parse::<i64>().map_err(|_| err())?;
        let process = ProcessId::new(process);
        match prefix {
            "iml" => Ok(Self::Interface {
                process,
                interface: InterfaceId::new(entity),
            }),
            "activity" => Ok(Self::Activity {
                process,
                activity: ActivityId::new(entity),
            }),
            _ => Err(err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        let app = ApplicationId::new(5);
        let process = ProcessId::new(9);
        assert_eq!(NodeId::LifelineHeader(app).to_string(), "app-5");
        assert_eq!(NodeId::LifelineFooter(app).to_string(), "app-bottom-5");
        assert_eq!(NodeId::SwimlaneStart(process).to_string(), "lane-start-9");
        assert_eq!(NodeId::SwimlaneEnd(process).to_string(), "lane-end-9");
        assert_eq!(NodeId::ProcessGroup(process).to_string(), "process-group-9");
    }

    #[test]
    fn test_edge_id_display() {
        let process = ProcessId::new(1);
        let iml = EdgeId::Interface {
            process,
            interface: InterfaceId::new(22),
        };
        let activity = EdgeId::Activity {
            process,
            activity: ActivityId::new(3),
        };
        assert_eq!(iml.to_string(), "iml-1-22");
        assert_eq!(activity.to_string(), "activity-1-3");
        assert_eq!(iml.process(), process);
    }

    #[test]
    fn test_edge_id_parse() {
        let parsed: EdgeId = "activity-10-4".parse().unwrap();
        assert_eq!(
            parsed,
            EdgeId::Activity {
                process: ProcessId::new(10),
                activity: ActivityId::new(4),
            }
        );
    }

    #[test]
    fn test_edge_id_parse_negative_ids() {
        let parsed: EdgeId = "iml--1--2".parse().unwrap();
        assert_eq!(
            parsed,
            EdgeId::Interface {
                process: ProcessId::new(-1),
                interface: InterfaceId::new(-2),
            }
        );
    }

    #[test]
    fn test_edge_id_parse_rejects_garbage() {
        assert!("lane-start-3".parse::<EdgeId>().is_err());
        assert!("iml-3".parse::<EdgeId>().is_err());
        assert!("iml-a-b".parse::<EdgeId>().is_err());
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let node = NodeId::SwimlaneStart(ProcessId::new(2));
        assert_eq!(serde_json::to_string(&node).unwrap(), "\"lane-start-2\"");
        assert_eq!(
            serde_json::to_string(&ApplicationId::new(8)).unwrap(),
            "8"
        );
    }
}
