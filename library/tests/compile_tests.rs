use library::compile::{CompilerRegistries, compile};
use library::error::BuildError;
use library::model::graph::{PropertyValue, SourceGraph, SourceNode};
use library::types::{BaseType, DataType};

fn scalar_add_node() -> SourceNode {
    SourceNode::new("math.add")
        .with_input("a", "scalar")
        .with_input("b", "scalar")
        .with_output("result", "scalar")
}

#[test]
fn test_fan_in_is_rejected() {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(
        SourceNode::new("graph.input")
            .with_output("a", "scalar")
            .with_output("b", "scalar"),
    );
    let output = graph.add_node(SourceNode::new("graph.output").with_input("c", "scalar"));

    let to = graph.input_id(output, "c").unwrap();
    graph.add_link(graph.output_id(input, "a").unwrap(), to);
    graph.add_link(graph.output_id(input, "b").unwrap(), to);

    let result = compile(&graph, &CompilerRegistries::with_builtins());
    assert!(matches!(result, Err(BuildError::FanIn { socket }) if socket == to));
}

#[test]
fn test_cyclic_graph_fails_to_build() {
    let mut graph = SourceGraph::new();
    let add1 = graph.add_node(scalar_add_node());
    let add2 = graph.add_node(scalar_add_node());

    graph.add_link(
        graph.output_id(add1, "result").unwrap(),
        graph.input_id(add2, "a").unwrap(),
    );
    graph.add_link(
        graph.output_id(add2, "result").unwrap(),
        graph.input_id(add1, "a").unwrap(),
    );

    let result = compile(&graph, &CompilerRegistries::with_builtins());
    assert!(matches!(result, Err(BuildError::CycleDetected)));
}

#[test]
fn test_non_data_source_into_data_input_fails() {
    let mut graph = SourceGraph::new();
    // "trigger" is not in the socket type table, so this output is
    // structural.
    let custom = graph.add_node(
        SourceNode::new("host.pulse")
            .with_output("fired", "trigger")
            .with_output("count", "integer"),
    );
    let add = graph.add_node(scalar_add_node());

    graph.add_link(
        graph.output_id(custom, "fired").unwrap(),
        graph.input_id(add, "a").unwrap(),
    );

    let result = compile(&graph, &CompilerRegistries::with_builtins());
    assert!(matches!(result, Err(BuildError::NonDataLink { .. })));
}

#[test]
fn test_links_into_structural_sockets_are_ignored() {
    let mut graph = SourceGraph::new();
    let add = graph.add_node(scalar_add_node());
    let custom = graph.add_node(
        SourceNode::new("host.sink")
            .with_input("fired", "trigger")
            .with_input("value", "scalar"),
    );

    graph.add_link(
        graph.output_id(add, "result").unwrap(),
        graph.input_id(custom, "fired").unwrap(),
    );

    let compiled = compile(&graph, &CompilerRegistries::with_builtins()).expect("builds");
    // The structural socket has no network counterpart, the data socket
    // does (the unknown node kind fell back to a placeholder).
    assert!(
        compiled
            .lookup_socket(graph.input_id(custom, "fired").unwrap())
            .is_none()
    );
    assert!(
        compiled
            .lookup_socket(graph.input_id(custom, "value").unwrap())
            .is_some()
    );
}

#[test]
fn test_nodes_without_data_sockets_are_dropped() {
    let mut graph = SourceGraph::new();
    graph.add_node(SourceNode::new("host.pulse").with_output("fired", "trigger"));
    let input = graph.add_node(SourceNode::new("graph.input").with_output("a", "scalar"));

    let compiled = compile(&graph, &CompilerRegistries::with_builtins()).expect("builds");
    assert_eq!(compiled.network().node_count(), 1);
    assert!(
        compiled
            .lookup_socket(graph.output_id(input, "a").unwrap())
            .is_some()
    );
}

#[test]
fn test_missing_default_value_inserter_fails() {
    let mut registries = CompilerRegistries::with_builtins();
    // A data type with no registered default.
    registries
        .socket_types
        .register("temperature", DataType::Single(BaseType::Float));

    let mut graph = SourceGraph::new();
    let probe =
        graph.add_node(SourceNode::new("host.probe").with_input("ambient", "temperature"));

    let result = compile(&graph, &registries);
    let socket = graph.input_id(probe, "ambient").unwrap();
    assert!(matches!(
        result,
        Err(BuildError::MissingDefaultValue { socket: s, .. }) if s == socket
    ));
}

#[test]
fn test_missing_conversion_fails() {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(SourceNode::new("graph.input").with_output("x", "scalar"));
    let output = graph.add_node(SourceNode::new("graph.output").with_input("n", "integer"));

    // scalar -> integer has no registered conversion.
    graph.add_link(
        graph.output_id(input, "x").unwrap(),
        graph.input_id(output, "n").unwrap(),
    );

    let result = compile(&graph, &CompilerRegistries::with_builtins());
    assert!(matches!(
        result,
        Err(BuildError::NoConversion { ref from_kind, ref to_kind, .. })
            if from_kind == "scalar" && to_kind == "integer"
    ));
}

#[test]
fn test_list_node_with_unknown_element_type_fails() {
    let mut graph = SourceGraph::new();
    graph.add_node(
        SourceNode::new("list.append")
            .with_property("element_type", PropertyValue::from("quaternion"))
            .with_input("list", "scalar_list")
            .with_input("value", "scalar")
            .with_output("list", "scalar_list"),
    );

    let result = compile(&graph, &CompilerRegistries::with_builtins());
    assert!(matches!(result, Err(BuildError::NodeConfig { .. })));
}

#[test]
fn test_default_values_complete_the_network() {
    // Nothing is linked; every input gets a default source node.
    let mut graph = SourceGraph::new();
    graph.add_node(scalar_add_node());

    let compiled = compile(&graph, &CompilerRegistries::with_builtins()).expect("builds");
    // add node + two constant sources
    assert_eq!(compiled.network().node_count(), 3);
    assert_eq!(compiled.pool().len(), 3);
    assert!(compiled.pool().labels().any(|label| label == "float socket"));
}
