//! End-to-end layout scenarios over JSON inputs.

use float_cmp::assert_approx_eq;
use procession::{
    DiagramBuilder,
    diagram::{Diagram, EdgeKind, NodeKind},
    identifier::{ActivityId, ApplicationId, EdgeId, NodeId, ProcessId},
    interaction::{Gesture, MarkerEvent},
};

const NESTED: &str = r#"{
    "processes": [{
        "id": 1, "name": "Order to Cash", "level": "A",
        "interfaces": [
            {"id": 10, "label": "IML-10", "kind": "online", "sequenceNumber": 1,
             "providerApp": {"id": 1, "name": "ERP"}, "consumerApp": {"id": 2, "name": "CRM"}},
            {"id": 11, "label": "IML-11", "kind": "file", "sequenceNumber": 2,
             "providerApp": {"id": 2, "name": "CRM"}, "consumerApp": {"id": 3, "name": "Billing"}}
        ],
        "childProcesses": [{
            "id": 2, "name": "Invoice", "level": "B", "sequenceNumber": 3,
            "internalActivities": [
                {"id": 20, "name": "Compute tax", "kind": "batch", "sequenceNumber": 4,
                 "application": {"id": 3, "name": "Billing"}}
            ],
            "childProcesses": [{
                "id": 3, "name": "Dunning", "level": "C",
                "internalActivities": [{"id": 30, "name": "Send reminder"}]
            }]
        }]
    }],
    "options": {
        "currentProcessActivities": [
            {"activity": {"id": 30}, "application": {"id": 4, "name": "Mailer"}}
        ]
    }
}"#;

fn lay_out(source: &str) -> Diagram {
    let builder = DiagramBuilder::default();
    let input = builder.parse(source).expect("Failed to parse input");
    builder.layout(&input).expect("Failed to lay out")
}

#[test]
fn test_nested_structure() {
    let diagram = lay_out(NESTED);

    let headers: Vec<_> = diagram
        .nodes_of_kind(NodeKind::LifelineHeader)
        .map(|node| node.id().to_string())
        .collect();
    assert_eq!(headers, ["app-3", "app-2", "app-1", "app-4"]);
    assert_eq!(diagram.nodes_of_kind(NodeKind::LifelineFooter).count(), 4);
    assert_eq!(diagram.nodes_of_kind(NodeKind::SwimlaneStart).count(), 2);
    assert_eq!(diagram.nodes_of_kind(NodeKind::ProcessGroup).count(), 1);

    let self_loops = diagram
        .edges()
        .iter()
        .filter(|edge| edge.kind() == EdgeKind::SelfLoop)
        .count();
    assert_eq!(self_loops, 2);
}

#[test]
fn test_activity_resolved_from_current_process_context() {
    let diagram = lay_out(NESTED);
    let reminder = diagram
        .edge(EdgeId::Activity {
            process: ProcessId::new(3),
            activity: ActivityId::new(30),
        })
        .expect("Reminder activity should be placed");

    let mailer = NodeId::LifelineHeader(ApplicationId::new(4));
    assert_eq!(reminder.source(), mailer);
    assert_eq!(reminder.target(), mailer);
    // The C process has no swimlane of its own.
    assert_eq!(reminder.swimlane(), Some(ProcessId::new(2)));
}

#[test]
fn test_nested_lanes_are_contained() {
    let diagram = lay_out(NESTED);
    let outer = diagram.swimlane(ProcessId::new(1)).unwrap();
    let inner = diagram.swimlane(ProcessId::new(2)).unwrap();
    assert!(outer.min() < inner.min());
    assert!(inner.max() < outer.max());

    let group = diagram.node(NodeId::ProcessGroup(ProcessId::new(3))).unwrap();
    assert!(group.y() > inner.min());
    assert!(group.bounds().max_y() < inner.max());

    let bottom = diagram.lifeline_bottom().unwrap();
    assert_approx_eq!(f32, bottom, diagram.total_height() - 50.0);
    assert!(outer.max() < bottom);
}

#[test]
fn test_markers_in_sequence_order() {
    let diagram = lay_out(NESTED);
    let ys: Vec<_> = diagram.edges().iter().map(|edge| edge.y_position()).collect();
    assert!(ys.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_missing_applications_degrade_gracefully() {
    let diagram = lay_out(
        r#"{"processes": [{"id": 1, "name": "P", "level": "B",
            "interfaces": [{"id": 1, "providerApplicationId": 7}]}]}"#,
    );
    assert!(diagram.edges().is_empty());
    assert_eq!(diagram.nodes_of_kind(NodeKind::LifelineHeader).count(), 0);
    // A B process with an item still draws its swimlane.
    assert!(diagram.swimlane(ProcessId::new(1)).is_some());
}

#[test]
fn test_unknown_level_sized_as_c() {
    let diagram = lay_out(r#"{"processes": [{"id": 1, "name": "P", "level": "Z"}]}"#);
    assert_approx_eq!(f32, diagram.total_height(), 350.0 + 200.0 + 100.0);
}

#[test]
fn test_drag_then_dispatch() {
    let builder = DiagramBuilder::default();
    let input = builder.parse(NESTED).unwrap();
    let mut diagram = builder.layout(&input).unwrap();
    let tax = EdgeId::Activity {
        process: ProcessId::new(2),
        activity: ActivityId::new(20),
    };
    let before = diagram.edge(tax).unwrap().y_position();

    let mut controller = builder.controller();
    controller.drag_start(&diagram, tax, 100.0).unwrap();
    controller.drag_move(&diagram, 60.0).unwrap();
    let committed = controller.drag_end(&mut diagram, -500.0).unwrap();

    let lane = diagram.swimlane(ProcessId::new(2)).unwrap();
    assert!(committed < before);
    assert_approx_eq!(f32, committed, lane.min() + 80.0);

    let mut events = Vec::new();
    let mut handler = |event: MarkerEvent| events.push(event);
    diagram.dispatch(tax, Gesture::Click, &mut handler).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].process, ProcessId::new(2));
}
