use std::sync::Arc;

use uuid::Uuid;

use library::compile::{CompilerRegistries, compile};
use library::evaluation::NetworkFunction;
use library::function::{CallContext, EvalTracer, Function, Mask, ParamsBuilder};
use library::model::graph::{PropertyValue, SourceGraph, SourceNode};
use library::types::{BaseType, SingleValue, Vec3};
use library::values::{ArrayBuffer, SingleView, VectorArray};

/// Compile `graph` with the built-in registries and wrap the named
/// boundary sockets into a network function.
fn build_function(
    graph: &SourceGraph,
    inputs: &[(Uuid, &str)],
    outputs: &[(Uuid, &str)],
) -> NetworkFunction {
    let registries = CompilerRegistries::with_builtins();
    let compiled = compile(graph, &registries).expect("graph builds");

    let input_sockets = inputs
        .iter()
        .map(|(node, name)| {
            compiled
                .lookup_socket(graph.output_id(*node, name).expect("output exists"))
                .expect("boundary input is mapped")
        })
        .collect();
    let output_sockets = outputs
        .iter()
        .map(|(node, name)| {
            compiled
                .lookup_socket(graph.input_id(*node, name).expect("input exists"))
                .expect("boundary output is mapped")
        })
        .collect();

    NetworkFunction::new(Arc::clone(compiled.network()), input_sockets, output_sockets)
        .expect("boundary sockets are placeholders")
}

/// `c = a + b` over scalars, with both addends as boundary inputs.
fn add_graph() -> (SourceGraph, Uuid, Uuid) {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(
        SourceNode::new("graph.input")
            .with_output("a", "scalar")
            .with_output("b", "scalar"),
    );
    let add = graph.add_node(
        SourceNode::new("math.add")
            .with_input("a", "scalar")
            .with_input("b", "scalar")
            .with_output("result", "scalar"),
    );
    let output = graph.add_node(SourceNode::new("graph.output").with_input("c", "scalar"));

    graph.add_link(
        graph.output_id(input, "a").unwrap(),
        graph.input_id(add, "a").unwrap(),
    );
    graph.add_link(
        graph.output_id(input, "b").unwrap(),
        graph.input_id(add, "b").unwrap(),
    );
    graph.add_link(
        graph.output_id(add, "result").unwrap(),
        graph.input_id(output, "c").unwrap(),
    );
    (graph, input, output)
}

#[derive(Default)]
struct RecordingTracer {
    entered: Vec<String>,
    exited: Vec<String>,
}

impl EvalTracer for RecordingTracer {
    fn node_enter(&mut self, function_name: &str) {
        self.entered.push(function_name.to_string());
    }

    fn node_exit(&mut self, function_name: &str) {
        self.exited.push(function_name.to_string());
    }
}

#[test]
fn test_only_masked_lanes_are_computed() {
    let (graph, input, output) = add_graph();
    let function = build_function(&graph, &[(input, "a"), (input, "b")], &[(output, "c")]);

    let a = [1.0f32, 2.0, 3.0, 4.0];
    let b = [10.0f32, 20.0, 30.0, 40.0];
    let mut c = ArrayBuffer::zeroed(BaseType::Float, 4);

    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&a[..])
        .add_single_input(&b[..])
        .add_single_output(&mut c)
        .build();
    function.call(Mask::new(&[1, 3]), &mut params, &mut CallContext::new());
    drop(params);

    assert_eq!(c.floats()[1], 22.0);
    assert_eq!(c.floats()[3], 44.0);
}

#[test]
fn test_evaluation_is_deterministic() {
    let (graph, input, output) = add_graph();
    let function = build_function(&graph, &[(input, "a"), (input, "b")], &[(output, "c")]);

    let a = [1.5f32, -2.0, 0.25];
    let b = [4.0f32, 8.0, 16.0];
    let lanes = [0usize, 1, 2];

    let mut first = ArrayBuffer::zeroed(BaseType::Float, 3);
    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&a[..])
        .add_single_input(&b[..])
        .add_single_output(&mut first)
        .build();
    function.call(Mask::new(&lanes), &mut params, &mut CallContext::new());
    drop(params);

    let mut second = ArrayBuffer::zeroed(BaseType::Float, 3);
    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&a[..])
        .add_single_input(&b[..])
        .add_single_output(&mut second)
        .build();
    function.call(Mask::new(&lanes), &mut params, &mut CallContext::new());
    drop(params);

    assert_eq!(first, second);
}

#[test]
fn test_unlinked_input_uses_configured_literal() {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(SourceNode::new("graph.input").with_output("a", "scalar"));
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

    let function = build_function(&graph, &[(input, "a")], &[(output, "c")]);

    let a = [1.0f32, 2.0, 3.0];
    let mut c = ArrayBuffer::zeroed(BaseType::Float, 3);
    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&a[..])
        .add_single_output(&mut c)
        .build();
    function.call(Mask::new(&[0, 1, 2]), &mut params, &mut CallContext::new());
    drop(params);

    assert_eq!(c.floats(), &[6.0, 7.0, 8.0]);
}

#[test]
fn test_integer_output_is_converted_to_float_input() {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(SourceNode::new("graph.input").with_output("v", "integer"));
    let add = graph.add_node(
        SourceNode::new("math.add")
            .with_input("a", "scalar")
            .with_input_value("b", "scalar", PropertyValue::from(2.0))
            .with_output("result", "scalar"),
    );
    let output = graph.add_node(SourceNode::new("graph.output").with_input("c", "scalar"));
    graph.add_link(
        graph.output_id(input, "v").unwrap(),
        graph.input_id(add, "a").unwrap(),
    );
    graph.add_link(
        graph.output_id(add, "result").unwrap(),
        graph.input_id(output, "c").unwrap(),
    );

    let function = build_function(&graph, &[(input, "v")], &[(output, "c")]);

    let v = [7i32, 8];
    let mut c = ArrayBuffer::zeroed(BaseType::Float, 2);
    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&v[..])
        .add_single_output(&mut c)
        .build();
    function.call(Mask::new(&[0, 1]), &mut params, &mut CallContext::new());
    drop(params);

    assert_eq!(c.floats(), &[9.0, 10.0]);
}

#[test]
fn test_mutable_and_readonly_list_consumers_are_isolated() {
    let mut graph = SourceGraph::new();
    let input =
        graph.add_node(SourceNode::new("graph.input").with_output("values", "scalar_list"));
    let append1 = graph.add_node(
        SourceNode::new("list.append")
            .with_property("element_type", PropertyValue::from("float"))
            .with_input("list", "scalar_list")
            .with_input_value("value", "scalar", PropertyValue::from(5.0))
            .with_output("list", "scalar_list"),
    );
    let length = graph.add_node(
        SourceNode::new("list.length")
            .with_property("element_type", PropertyValue::from("float"))
            .with_input("list", "scalar_list")
            .with_output("length", "integer"),
    );
    let append2 = graph.add_node(
        SourceNode::new("list.append")
            .with_property("element_type", PropertyValue::from("float"))
            .with_input("list", "scalar_list")
            .with_input_value("value", "scalar", PropertyValue::from(7.0))
            .with_output("list", "scalar_list"),
    );
    let output = graph.add_node(
        SourceNode::new("graph.output")
            .with_input("count", "integer")
            .with_input("values", "scalar_list"),
    );

    graph.add_link(
        graph.output_id(input, "values").unwrap(),
        graph.input_id(append1, "list").unwrap(),
    );
    // One produced list, two consumers: a read-only one and a mutable one.
    graph.add_link(
        graph.output_id(append1, "list").unwrap(),
        graph.input_id(length, "list").unwrap(),
    );
    graph.add_link(
        graph.output_id(append1, "list").unwrap(),
        graph.input_id(append2, "list").unwrap(),
    );
    graph.add_link(
        graph.output_id(length, "length").unwrap(),
        graph.input_id(output, "count").unwrap(),
    );
    graph.add_link(
        graph.output_id(append2, "list").unwrap(),
        graph.input_id(output, "values").unwrap(),
    );

    let function = build_function(
        &graph,
        &[(input, "values")],
        &[(output, "count"), (output, "values")],
    );

    let lists = vec![vec![1.0f32, 2.0], vec![3.0f32]];
    let mut count = ArrayBuffer::zeroed(BaseType::Int, 2);
    let mut values = VectorArray::new(BaseType::Float, 2);

    let mut params = ParamsBuilder::new(function.signature())
        .add_vector_input(lists.as_slice())
        .add_single_output(&mut count)
        .add_vector_output(&mut values)
        .build();
    function.call(Mask::new(&[0, 1]), &mut params, &mut CallContext::new());
    drop(params);

    // The read-only consumer saw the list after the first append only.
    assert_eq!(count.ints(), &[3, 2]);
    // The mutable consumer appended to its own copy.
    assert_eq!(
        values.float_lanes(),
        &[vec![1.0, 2.0, 5.0, 7.0], vec![3.0, 5.0, 7.0]]
    );
    // The caller's buffer was never touched.
    assert_eq!(lists, vec![vec![1.0, 2.0], vec![3.0]]);
}

#[test]
fn test_building_twice_evaluates_identically() {
    let (graph, input, output) = add_graph();

    let a = [2.0f32, 4.0];
    let b = [1.0f32, 3.0];
    let mut results = Vec::new();

    for _ in 0..2 {
        let function = build_function(&graph, &[(input, "a"), (input, "b")], &[(output, "c")]);
        let mut c = ArrayBuffer::zeroed(BaseType::Float, 2);
        let mut params = ParamsBuilder::new(function.signature())
            .add_single_input(&a[..])
            .add_single_input(&b[..])
            .add_single_output(&mut c)
            .build();
        function.call(Mask::new(&[0, 1]), &mut params, &mut CallContext::new());
        drop(params);
        results.push(c);
    }

    assert_eq!(results[0], results[1]);
}

#[test]
fn test_empty_mask_runs_no_functions() {
    let (graph, input, output) = add_graph();
    let function = build_function(&graph, &[(input, "a"), (input, "b")], &[(output, "c")]);

    let a = [1.0f32];
    let b = [2.0f32];
    let mut c = ArrayBuffer::zeroed(BaseType::Float, 1);
    let mut tracer = RecordingTracer::default();

    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&a[..])
        .add_single_input(&b[..])
        .add_single_output(&mut c)
        .build();
    function.call(
        Mask::new(&[]),
        &mut params,
        &mut CallContext::with_tracer(&mut tracer),
    );
    drop(params);

    assert!(tracer.entered.is_empty());
    assert_eq!(c.floats(), &[0.0]);
}

#[test]
fn test_each_function_node_runs_once_despite_fan_out() {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(
        SourceNode::new("graph.input")
            .with_output("a", "scalar")
            .with_output("b", "scalar"),
    );
    let add = graph.add_node(
        SourceNode::new("math.add")
            .with_input("a", "scalar")
            .with_input("b", "scalar")
            .with_output("result", "scalar"),
    );
    let output = graph.add_node(
        SourceNode::new("graph.output")
            .with_input("first", "scalar")
            .with_input("second", "scalar"),
    );

    graph.add_link(
        graph.output_id(input, "a").unwrap(),
        graph.input_id(add, "a").unwrap(),
    );
    graph.add_link(
        graph.output_id(input, "b").unwrap(),
        graph.input_id(add, "b").unwrap(),
    );
    // One result fans out into both boundary outputs.
    graph.add_link(
        graph.output_id(add, "result").unwrap(),
        graph.input_id(output, "first").unwrap(),
    );
    graph.add_link(
        graph.output_id(add, "result").unwrap(),
        graph.input_id(output, "second").unwrap(),
    );

    let function = build_function(
        &graph,
        &[(input, "a"), (input, "b")],
        &[(output, "first"), (output, "second")],
    );

    let a = [1.0f32, 2.0];
    let b = [10.0f32, 20.0];
    let mut first = ArrayBuffer::zeroed(BaseType::Float, 2);
    let mut second = ArrayBuffer::zeroed(BaseType::Float, 2);
    let mut tracer = RecordingTracer::default();

    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&a[..])
        .add_single_input(&b[..])
        .add_single_output(&mut first)
        .add_single_output(&mut second)
        .build();
    function.call(
        Mask::new(&[0, 1]),
        &mut params,
        &mut CallContext::with_tracer(&mut tracer),
    );
    drop(params);

    assert_eq!(tracer.entered, vec!["add_floats"]);
    assert_eq!(tracer.exited, vec!["add_floats"]);
    assert_eq!(first.floats(), &[11.0, 22.0]);
    assert_eq!(second.floats(), &[11.0, 22.0]);
}

#[test]
fn test_repeated_single_input_broadcasts_to_all_lanes() {
    let (graph, input, output) = add_graph();
    let function = build_function(&graph, &[(input, "a"), (input, "b")], &[(output, "c")]);

    let a = [1.0f32, 2.0, 3.0];
    let mut c = ArrayBuffer::zeroed(BaseType::Float, 3);
    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&a[..])
        .add_single_input(SingleView::repeated(SingleValue::Float(5.0)))
        .add_single_output(&mut c)
        .build();
    function.call(Mask::new(&[0, 1, 2]), &mut params, &mut CallContext::new());
    drop(params);

    assert_eq!(c.floats(), &[6.0, 7.0, 8.0]);
}

#[test]
fn test_vector_add_with_broadcast_offset() {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(
        SourceNode::new("graph.input")
            .with_output("position", "vector")
            .with_output("offset", "vector"),
    );
    let add = graph.add_node(
        SourceNode::new("math.vector_add")
            .with_input("a", "vector")
            .with_input("b", "vector")
            .with_output("result", "vector"),
    );
    let output = graph.add_node(SourceNode::new("graph.output").with_input("position", "vector"));

    graph.add_link(
        graph.output_id(input, "position").unwrap(),
        graph.input_id(add, "a").unwrap(),
    );
    graph.add_link(
        graph.output_id(input, "offset").unwrap(),
        graph.input_id(add, "b").unwrap(),
    );
    graph.add_link(
        graph.output_id(add, "result").unwrap(),
        graph.input_id(output, "position").unwrap(),
    );

    let function = build_function(
        &graph,
        &[(input, "position"), (input, "offset")],
        &[(output, "position")],
    );

    let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
    let mut deformed = ArrayBuffer::zeroed(BaseType::Vec3, 2);
    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&positions[..])
        .add_single_input(SingleView::repeated(SingleValue::Vec3(Vec3::new(
            1.0, 1.0, 1.0,
        ))))
        .add_single_output(&mut deformed)
        .build();
    function.call(Mask::new(&[0, 1]), &mut params, &mut CallContext::new());
    drop(params);

    assert_eq!(
        deformed.vec3s(),
        &[Vec3::new(2.0, 3.0, 4.0), Vec3::new(5.0, 6.0, 7.0)]
    );
}

#[test]
fn test_separate_vector_components_feed_scalar_math() {
    let mut graph = SourceGraph::new();
    let input = graph.add_node(SourceNode::new("graph.input").with_output("position", "vector"));
    let separate = graph.add_node(
        SourceNode::new("vector.separate")
            .with_input("vector", "vector")
            .with_output("x", "scalar")
            .with_output("y", "scalar")
            .with_output("z", "scalar"),
    );
    let add = graph.add_node(
        SourceNode::new("math.add")
            .with_input("a", "scalar")
            .with_input("b", "scalar")
            .with_output("result", "scalar"),
    );
    let output = graph.add_node(SourceNode::new("graph.output").with_input("sum", "scalar"));

    graph.add_link(
        graph.output_id(input, "position").unwrap(),
        graph.input_id(separate, "vector").unwrap(),
    );
    graph.add_link(
        graph.output_id(separate, "x").unwrap(),
        graph.input_id(add, "a").unwrap(),
    );
    graph.add_link(
        graph.output_id(separate, "y").unwrap(),
        graph.input_id(add, "b").unwrap(),
    );
    graph.add_link(
        graph.output_id(add, "result").unwrap(),
        graph.input_id(output, "sum").unwrap(),
    );

    let function = build_function(&graph, &[(input, "position")], &[(output, "sum")]);

    let positions = [Vec3::new(1.0, 2.0, 9.0), Vec3::new(4.0, 5.0, 9.0)];
    let mut sums = ArrayBuffer::zeroed(BaseType::Float, 2);
    let mut params = ParamsBuilder::new(function.signature())
        .add_single_input(&positions[..])
        .add_single_output(&mut sums)
        .build();
    function.call(Mask::new(&[0, 1]), &mut params, &mut CallContext::new());
    drop(params);

    assert_eq!(sums.floats(), &[3.0, 9.0]);
}

#[test]
fn test_empty_list_default_feeds_append_chain() {
    // An unlinked list input defaults to empty lists; appending once gives
    // single-element lanes.
    let mut graph = SourceGraph::new();
    let append = graph.add_node(
        SourceNode::new("list.append")
            .with_property("element_type", PropertyValue::from("float"))
            .with_input("list", "scalar_list")
            .with_input_value("value", "scalar", PropertyValue::from(4.5))
            .with_output("list", "scalar_list"),
    );
    let output =
        graph.add_node(SourceNode::new("graph.output").with_input("values", "scalar_list"));

    graph.add_link(
        graph.output_id(append, "list").unwrap(),
        graph.input_id(output, "values").unwrap(),
    );

    let function = build_function(&graph, &[], &[(output, "values")]);

    let mut values = VectorArray::new(BaseType::Float, 3);
    let mut params = ParamsBuilder::new(function.signature())
        .add_vector_output(&mut values)
        .build();
    function.call(Mask::new(&[0, 2]), &mut params, &mut CallContext::new());
    drop(params);

    assert_eq!(values.float_lanes()[0], vec![4.5]);
    assert_eq!(values.float_lanes()[2], vec![4.5]);
    assert!(values.float_lanes()[1].is_empty());
}
