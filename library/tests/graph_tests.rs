use library::model::graph::{PropertyValue, SourceGraph, SourceNode, SourceSocketId};

#[test]
fn test_graph_serialization_roundtrip() {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(
        SourceNode::new("graph.input")
            .with_output("a", "scalar")
            .with_output("b", "scalar"),
    );
    let add = graph.add_node(
        SourceNode::new("math.add")
            .with_input("a", "scalar")
            .with_input_value("b", "scalar", PropertyValue::from(5.0))
            .with_output("result", "scalar"),
    );
    let output = graph.add_node(SourceNode::new("graph.output").with_input("c", "scalar"));

    graph.add_link(
        graph.output_id(input, "a").unwrap(),
        graph.input_id(add, "a").unwrap(),
    );
    graph.add_link(
        graph.output_id(add, "result").unwrap(),
        graph.input_id(output, "c").unwrap(),
    );

    let json = serde_json::to_string_pretty(&graph).expect("serializes");
    let loaded: SourceGraph = serde_json::from_str(&json).expect("deserializes");

    assert_eq!(graph, loaded, "roundtrip changed the graph");
    assert_eq!(loaded.socket_count(), graph.socket_count());
    assert_eq!(loaded.links.len(), 2);
}

#[test]
fn test_property_value_number_kinds_survive_roundtrip() {
    let float = PropertyValue::from(5.5);
    let integer = PropertyValue::from(5i64);

    let float_json = serde_json::to_string(&float).unwrap();
    let integer_json = serde_json::to_string(&integer).unwrap();

    assert_eq!(
        serde_json::from_str::<PropertyValue>(&float_json).unwrap(),
        float
    );
    assert_eq!(
        serde_json::from_str::<PropertyValue>(&integer_json).unwrap(),
        integer
    );
}

#[test]
fn test_graph_parses_from_hand_written_json() {
    let json = r#"{
        "nodes": [
            {
                "id": "7f1f8ba5-4f3f-4b61-9e12-111111111111",
                "type_id": "graph.input",
                "inputs": [],
                "outputs": [
                    { "id": 0, "name": "value", "kind": "scalar", "direction": "output" }
                ]
            },
            {
                "id": "7f1f8ba5-4f3f-4b61-9e12-222222222222",
                "type_id": "graph.output",
                "inputs": [
                    { "id": 1, "name": "value", "kind": "scalar", "direction": "input" }
                ],
                "outputs": []
            }
        ],
        "links": [ { "from": 0, "to": 1 } ]
    }"#;

    let graph: SourceGraph = serde_json::from_str(json).expect("parses");
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.socket_count(), 2);
    assert!(graph.is_input_linked(SourceSocketId(1)));

    let (node, socket) = graph.socket(SourceSocketId(0)).expect("socket exists");
    assert_eq!(node.type_id, "graph.input");
    assert_eq!(socket.kind, "scalar");
}

#[test]
fn test_socket_config_values_parse() {
    let json = r#"{
        "id": 3,
        "name": "amount",
        "kind": "scalar",
        "direction": "input",
        "value": 2.5
    }"#;

    let socket: library::model::graph::SourceSocket = serde_json::from_str(json).expect("parses");
    assert_eq!(socket.value.as_ref().and_then(|v| v.as_f32()), Some(2.5));
}
