//! Command-line runner: load a graph from JSON, evaluate it, print the
//! results.
//!
//! The graph must contain one `graph.input` and one `graph.output` node;
//! their sockets become the network boundary. Input lanes are filled with
//! demo data derived from the lane index.

use std::fs;
use std::sync::Arc;

use log::info;

use library::LibraryError;
use library::compile::{CompilerRegistries, compile};
use library::evaluation::NetworkFunction;
use library::function::{CallContext, Function, Mask, ParamsBuilder};
use library::model::graph::SourceGraph;
use library::types::{BaseType, DataType, Vec3};
use library::values::{ArrayBuffer, SingleView, VectorArray, VectorView};

fn main() -> Result<(), LibraryError> {
    env_logger::init();
    run(std::env::args().collect())
}

fn run(args: Vec<String>) -> Result<(), LibraryError> {
    let (path, lane_count) = parse_args(&args)?;

    let json = fs::read_to_string(&path)?;
    let graph: SourceGraph = serde_json::from_str(&json)?;

    let registries = CompilerRegistries::with_builtins();
    let compiled = compile(&graph, &registries)?;
    info!(
        "compiled '{}': {} network nodes",
        path,
        compiled.network().node_count()
    );

    let input_node = find_node(&graph, "graph.input")?;
    let output_node = find_node(&graph, "graph.output")?;

    let inputs: Vec<_> = graph
        .node(input_node)
        .into_iter()
        .flat_map(|node| node.outputs.iter())
        .filter_map(|socket| compiled.lookup_socket(socket.id))
        .collect();
    let outputs: Vec<_> = graph
        .node(output_node)
        .into_iter()
        .flat_map(|node| node.inputs.iter())
        .filter_map(|socket| compiled.lookup_socket(socket.id))
        .collect();

    let function = NetworkFunction::new(Arc::clone(compiled.network()), inputs, outputs)?;

    evaluate_and_print(&function, lane_count);
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(String, usize), LibraryError> {
    let mut path = None;
    let mut lane_count = 8;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lanes" => {
                let value = iter
                    .next()
                    .ok_or_else(|| LibraryError::InvalidArgument("--lanes needs a value".into()))?;
                lane_count = value.parse().map_err(|_| {
                    LibraryError::InvalidArgument(format!("invalid lane count '{}'", value))
                })?;
            }
            other => path = Some(other.to_string()),
        }
    }
    let path = path.ok_or_else(|| {
        LibraryError::InvalidArgument("usage: cli <graph.json> [--lanes N]".into())
    })?;
    Ok((path, lane_count))
}

fn find_node(graph: &SourceGraph, type_id: &str) -> Result<uuid::Uuid, LibraryError> {
    graph
        .nodes
        .iter()
        .find(|node| node.type_id == type_id)
        .map(|node| node.id)
        .ok_or_else(|| LibraryError::InvalidArgument(format!("graph has no '{}' node", type_id)))
}

/// Demo input data: lane-index-derived values for every declared input.
enum DemoInput {
    Float(Vec<f32>),
    Vec3(Vec<Vec3>),
    Int(Vec<i32>),
    FloatList(Vec<Vec<f32>>),
    Vec3List(Vec<Vec<Vec3>>),
    IntList(Vec<Vec<i32>>),
}

fn evaluate_and_print(function: &NetworkFunction, lane_count: usize) {
    let signature = function.signature();
    let input_count = function.boundary_inputs().len();
    let lanes: Vec<usize> = (0..lane_count).collect();

    let demo_inputs: Vec<DemoInput> = signature.params()[..input_count]
        .iter()
        .map(|(_, param_type)| match param_type.data_type() {
            DataType::Single(BaseType::Float) => {
                DemoInput::Float((0..lane_count).map(|i| i as f32).collect())
            }
            DataType::Single(BaseType::Vec3) => DemoInput::Vec3(
                (0..lane_count)
                    .map(|i| Vec3::new(i as f32, i as f32, i as f32))
                    .collect(),
            ),
            DataType::Single(BaseType::Int) => {
                DemoInput::Int((0..lane_count).map(|i| i as i32).collect())
            }
            DataType::Vector(BaseType::Float) => {
                DemoInput::FloatList(vec![Vec::new(); lane_count])
            }
            DataType::Vector(BaseType::Vec3) => DemoInput::Vec3List(vec![Vec::new(); lane_count]),
            DataType::Vector(BaseType::Int) => DemoInput::IntList(vec![Vec::new(); lane_count]),
        })
        .collect();

    let mut single_outputs = Vec::new();
    let mut vector_outputs = Vec::new();
    for (_, param_type) in &signature.params()[input_count..] {
        match param_type.data_type() {
            DataType::Single(base) => {
                single_outputs.push(ArrayBuffer::zeroed(base, lane_count));
            }
            DataType::Vector(base) => {
                vector_outputs.push(VectorArray::new(base, lane_count));
            }
        }
    }

    {
        let mut builder = ParamsBuilder::new(signature);
        for input in &demo_inputs {
            builder = match input {
                DemoInput::Float(values) => {
                    builder.add_single_input(SingleView::from(values.as_slice()))
                }
                DemoInput::Vec3(values) => {
                    builder.add_single_input(SingleView::from(values.as_slice()))
                }
                DemoInput::Int(values) => {
                    builder.add_single_input(SingleView::from(values.as_slice()))
                }
                DemoInput::FloatList(lanes) => {
                    builder.add_vector_input(VectorView::from(lanes.as_slice()))
                }
                DemoInput::Vec3List(lanes) => {
                    builder.add_vector_input(VectorView::from(lanes.as_slice()))
                }
                DemoInput::IntList(lanes) => {
                    builder.add_vector_input(VectorView::from(lanes.as_slice()))
                }
            };
        }
        let mut singles = single_outputs.iter_mut();
        let mut vectors = vector_outputs.iter_mut();
        for (_, param_type) in &signature.params()[input_count..] {
            builder = match param_type.data_type() {
                DataType::Single(_) => {
                    builder.add_single_output(singles.next().expect("one buffer per output"))
                }
                DataType::Vector(_) => {
                    builder.add_vector_output(vectors.next().expect("one buffer per output"))
                }
            };
        }
        let mut params = builder.build();

        function.call(Mask::new(&lanes), &mut params, &mut CallContext::new());
    }

    for (index, buffer) in single_outputs.iter().enumerate() {
        match buffer {
            ArrayBuffer::Float(values) => println!("output {}: {:?}", index, values),
            ArrayBuffer::Vec3(values) => println!("output {}: {:?}", index, values),
            ArrayBuffer::Int(values) => println!("output {}: {:?}", index, values),
        }
    }
    for (index, array) in vector_outputs.iter().enumerate() {
        match array {
            VectorArray::Float(lanes) => {
                println!("list output {}: {:?}", index, lanes)
            }
            VectorArray::Vec3(lanes) => println!("list output {}: {:?}", index, lanes),
            VectorArray::Int(lanes) => println!("list output {}: {:?}", index, lanes),
        }
    }
}
