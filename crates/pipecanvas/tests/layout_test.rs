//! Integration tests for the layout entry points.

use float_cmp::approx_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

use pipecanvas::{
    CanvasError, compute_layout, compute_layout_value,
    geometry::{Bounds, Point, Size},
    model::{AnchorSide, Direction, Edge, Node, NodeData},
};

fn position_of(nodes: &[Node], id: &str) -> Point {
    nodes
        .iter()
        .find(|n| n.id() == id)
        .map(Node::position)
        .unwrap_or_else(|| panic!("node {id} missing from layout"))
}

fn fan_out() -> (Vec<Node>, Vec<Edge>) {
    let nodes = ["src", "a", "b", "c"]
        .into_iter()
        .map(|id| Node::new(id, "task"))
        .collect();
    let edges = vec![
        Edge::new("src", "a"),
        Edge::new("src", "b"),
        Edge::new("src", "c"),
    ];
    (nodes, edges)
}

#[test]
fn test_one_record_per_node_with_fields_preserved() {
    let nodes = vec![
        Node::new("a", "source")
            .with_dimensions(Size::new(120.0, 60.0))
            .with_data(NodeData::new("Read", "reader")),
        Node::new("b", "sink").with_data(NodeData::new("Write", "writer")),
    ];
    let laid_out = compute_layout(&nodes, &[Edge::new("a", "b")], Direction::LR);

    assert_eq!(laid_out.len(), nodes.len());
    for (before, after) in nodes.iter().zip(&laid_out) {
        assert_eq!(before.id(), after.id());
        assert_eq!(before.kind(), after.kind());
        assert_eq!(before.data(), after.data());
        assert_eq!(before.style(), after.style());
        assert_eq!(before.dimensions(), after.dimensions());
    }
}

#[test]
fn test_anchor_sides_follow_direction() {
    let cases = [
        (Direction::LR, AnchorSide::Right, AnchorSide::Left),
        (Direction::RL, AnchorSide::Left, AnchorSide::Right),
        (Direction::TB, AnchorSide::Bottom, AnchorSide::Top),
        (Direction::BT, AnchorSide::Top, AnchorSide::Bottom),
    ];
    let (nodes, edges) = fan_out();

    for (direction, source, target) in cases {
        for node in compute_layout(&nodes, &edges, direction) {
            assert_eq!(node.anchors().source(), source, "{direction}");
            assert_eq!(node.anchors().target(), target, "{direction}");
        }
    }
}

#[test]
fn test_edges_follow_direction() {
    let (nodes, edges) = fan_out();

    let lr = compute_layout(&nodes, &edges, Direction::LR);
    let rl = compute_layout(&nodes, &edges, Direction::RL);
    let tb = compute_layout(&nodes, &edges, Direction::TB);
    let bt = compute_layout(&nodes, &edges, Direction::BT);

    for target in ["a", "b", "c"] {
        assert!(position_of(&lr, "src").x() < position_of(&lr, target).x());
        assert!(position_of(&rl, "src").x() > position_of(&rl, target).x());
        assert!(position_of(&tb, "src").y() < position_of(&tb, target).y());
        assert!(position_of(&bt, "src").y() > position_of(&bt, target).y());
    }
}

#[test]
fn test_rank_members_do_not_overlap() {
    let (nodes, edges) = fan_out();
    let laid_out = compute_layout(&nodes, &edges, Direction::LR);

    let mut ys: Vec<f32> = ["a", "b", "c"]
        .into_iter()
        .map(|id| position_of(&laid_out, id).y())
        .collect();
    ys.sort_by(f32::total_cmp);

    for pair in ys.windows(2) {
        // default placeholder height
        assert!(pair[1] - pair[0] >= 50.0, "overlapping rank members: {ys:?}");
    }
    let x = position_of(&laid_out, "a").x();
    assert!(approx_eq!(f32, position_of(&laid_out, "c").x(), x));
}

#[test]
fn test_dangling_edges_are_ignored() {
    let (nodes, edges) = fan_out();
    let mut noisy = edges.clone();
    noisy.push(Edge::new("src", "ghost"));
    noisy.push(Edge::new("phantom", "a"));

    assert_eq!(
        compute_layout(&nodes, &edges, Direction::TB),
        compute_layout(&nodes, &noisy, Direction::TB)
    );
}

fn y_of(record: &Value) -> f64 {
    record["position"]["y"].as_f64().expect("laid out records carry a position")
}

#[test]
fn test_value_input() {
    let nodes = json!([
        {"id": "a", "type": "task", "data": {"label": "A", "serviceRef": "svc-a"}},
        {"id": "b", "type": "task"}
    ]);
    let edges = json!([{"id": "e1", "source": "a", "target": "b"}, {"source": "a"}]);

    let laid_out = compute_layout_value(&nodes, &edges, Direction::TB).unwrap();

    assert_eq!(laid_out.len(), 2);
    assert_eq!(laid_out[0]["data"]["serviceRef"], "svc-a");
    assert!(y_of(&laid_out[0]) < y_of(&laid_out[1]));
}

#[test]
fn test_value_input_keeps_unmodelled_fields() {
    let nodes = json!([
        {
            "id": "a",
            "type": "task",
            "selected": true,
            "position": {"x": 400.0, "y": 12.0},
            "style": {"backgroundColor": "#E3F2FD", "width": 180, "height": 60},
            "data": {
                "label": "Extract",
                "prev": [],
                "succ": ["b"],
                "service_id": "extractor",
                "retries": 3
            }
        },
        {"id": "b", "type": "task"}
    ]);
    let edges = json!([{"source": "a", "target": "b"}]);

    let laid_out = compute_layout_value(&nodes, &edges, Direction::LR).unwrap();

    let layout_keys = ["position", "sourcePosition", "targetPosition"];
    for (before, after) in nodes.as_array().unwrap().iter().zip(&laid_out) {
        let before = before.as_object().unwrap();
        let after = after.as_object().unwrap();
        for (key, value) in before.iter().filter(|(key, _)| !layout_keys.contains(&key.as_str())) {
            assert_eq!(after.get(key), Some(value), "field `{key}` changed");
        }
        for key in layout_keys {
            assert!(after.contains_key(key), "missing `{key}`");
        }
        let extra: Vec<_> = after
            .keys()
            .filter(|key| !before.contains_key(*key) && !layout_keys.contains(&key.as_str()))
            .collect();
        assert!(extra.is_empty(), "unexpected keys {extra:?}");
    }
    assert_eq!(laid_out[0]["sourcePosition"], "right");
}

#[test]
fn test_unparseable_style_color_does_not_abort_layout() {
    let nodes = json!([
        {"id": "a", "style": {"backgroundColor": "var(--node-bg)"}},
        {"id": "b"}
    ]);
    let edges = json!([{"source": "a", "target": "b"}]);

    let laid_out = compute_layout_value(&nodes, &edges, Direction::TB).unwrap();

    assert_eq!(laid_out.len(), 2);
    assert_eq!(laid_out[0]["style"]["backgroundColor"], "var(--node-bg)");
    assert!(y_of(&laid_out[0]) < y_of(&laid_out[1]));
}

#[test]
fn test_non_array_nodes_rejected() {
    let result = compute_layout_value(&json!({"id": "a"}), &json!([]), Direction::LR);
    assert!(matches!(result, Err(CanvasError::InvalidInput(_))));
}

#[test]
fn test_non_array_edges_lay_out_unconnected() {
    let nodes = json!([{"id": "a"}, {"id": "b"}]);
    let laid_out = compute_layout_value(&nodes, &json!("a->b"), Direction::LR).unwrap();

    // unconnected nodes share the first rank
    assert_eq!(laid_out[0]["position"]["x"], laid_out[1]["position"]["x"]);
}

#[test]
fn test_serialized_record_shape() {
    let laid_out = compute_layout(&[Node::new("a", "task")], &[], Direction::TB);
    let value = serde_json::to_value(&laid_out[0]).unwrap();

    assert_eq!(value["id"], "a");
    assert_eq!(value["type"], "task");
    assert_eq!(value["sourcePosition"], "bottom");
    assert_eq!(value["targetPosition"], "top");
    assert!(value["position"]["x"].is_number());
}

// ===================
// Strategies
// ===================

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::LR),
        Just(Direction::RL),
        Just(Direction::TB),
        Just(Direction::BT),
    ]
}

/// Acyclic graphs: every edge points from a lower to a higher node index.
fn dag_strategy() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
    (1usize..10).prop_flat_map(|count| {
        let pairs = proptest::collection::vec((0..count, 0..count), 0..count * 2);
        pairs.prop_map(move |pairs| {
            let name = |i: usize| format!("n{i}");
            let nodes = (0..count).map(|i| Node::new(name(i).as_str(), "task")).collect();
            let edges = pairs
                .into_iter()
                .filter(|(a, b)| a < b)
                .map(|(a, b)| Edge::new(name(a).as_str(), name(b).as_str()))
                .collect();
            (nodes, edges)
        })
    })
}

/// Graphs with measured nodes of varied sizes and arbitrary edges,
/// including cycles, self loops and parallel edges.
fn measured_graph_strategy() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
    (1usize..10).prop_flat_map(|count| {
        let sizes = proptest::collection::vec((10.0f32..300.0, 10.0f32..300.0), count);
        let pairs = proptest::collection::vec((0..count, 0..count), 0..count * 2);
        (sizes, pairs).prop_map(|(sizes, pairs)| {
            let name = |i: usize| format!("n{i}");
            let nodes = sizes
                .into_iter()
                .enumerate()
                .map(|(i, (w, h))| {
                    Node::new(name(i).as_str(), "task").with_dimensions(Size::new(w, h))
                })
                .collect();
            let edges = pairs
                .into_iter()
                .map(|(a, b)| Edge::new(name(a).as_str(), name(b).as_str()))
                .collect();
            (nodes, edges)
        })
    })
}

// ===================
// Property Test Functions
// ===================

/// Laying out an already laid out graph changes nothing.
fn check_layout_is_idempotent(
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    direction: Direction,
) -> Result<(), TestCaseError> {
    let once = compute_layout(&nodes, &edges, direction);
    let twice = compute_layout(&once, &edges, direction);
    prop_assert_eq!(once, twice);
    Ok(())
}

/// Every edge of an acyclic graph moves forward along the flow direction.
fn check_edges_move_forward(
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    direction: Direction,
) -> Result<(), TestCaseError> {
    let laid_out = compute_layout(&nodes, &edges, direction);
    prop_assert_eq!(laid_out.len(), nodes.len());

    for edge in &edges {
        let source = position_of(&laid_out, &edge.source().to_string());
        let target = position_of(&laid_out, &edge.target().to_string());
        let forward = match direction {
            Direction::LR => target.x() - source.x(),
            Direction::RL => source.x() - target.x(),
            Direction::TB => target.y() - source.y(),
            Direction::BT => source.y() - target.y(),
        };
        prop_assert!(forward > 0.0, "{edge:?} goes backwards in {direction}");
    }
    Ok(())
}

/// All coordinates are finite and the drawing starts at the origin.
fn check_positions_are_finite(
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    direction: Direction,
) -> Result<(), TestCaseError> {
    let laid_out = compute_layout(&nodes, &edges, direction);

    for node in &laid_out {
        prop_assert!(node.position().is_finite(), "{:?}", node.position());
        prop_assert!(node.position().x() >= 0.0 && node.position().y() >= 0.0);
    }
    Ok(())
}

/// No two laid out nodes overlap, whatever their measured sizes.
fn check_nodes_do_not_overlap(
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    direction: Direction,
) -> Result<(), TestCaseError> {
    let laid_out = compute_layout(&nodes, &edges, direction);
    let boxes: Vec<Bounds> = laid_out
        .iter()
        .map(|node| {
            let size = node.dimensions().expect("every generated node is measured");
            Bounds::new_from_center(node.position(), size)
        })
        .collect();

    for (i, a) in boxes.iter().enumerate() {
        for (j, b) in boxes.iter().enumerate().skip(i + 1) {
            prop_assert!(
                !a.intersects(b),
                "{} and {} overlap in {direction}: {a:?} {b:?}",
                laid_out[i].id(),
                laid_out[j].id()
            );
        }
    }
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn layout_is_idempotent((nodes, edges) in dag_strategy(), direction in direction_strategy()) {
        check_layout_is_idempotent(nodes, edges, direction)?;
    }

    #[test]
    fn edges_move_forward((nodes, edges) in dag_strategy(), direction in direction_strategy()) {
        check_edges_move_forward(nodes, edges, direction)?;
    }

    #[test]
    fn nodes_do_not_overlap((nodes, edges) in measured_graph_strategy(), direction in direction_strategy()) {
        check_nodes_do_not_overlap(nodes, edges, direction)?;
    }

    #[test]
    fn positions_are_finite((nodes, edges) in dag_strategy(), direction in direction_strategy()) {
        check_positions_are_finite(nodes, edges, direction)?;
    }
}
