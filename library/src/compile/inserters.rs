//! Built-in inserter tables: the node, default-value and conversion
//! catalogs the engine ships with.

use std::sync::Arc;

use crate::error::BuildError;
use crate::functions::{
    AddFloats, AddVec3s, AppendToList, CombineVector, ConstantValue, EmptyList, IntToFloat,
    ListLength, SeparateVector,
};
use crate::model::graph::{PropertyValue, SourceNode, SourceSocket};
use crate::network::SocketId;
use crate::types::{BaseType, DataType, SingleValue, Vec3};

use super::pool::ResourcePool;
use super::registry::{
    CompilerRegistries, ConversionRegistry, DefaultValueRegistry, NodeInserterRegistry,
    SocketTypeTable,
};
use super::GraphCompiler;

pub(crate) fn register_builtins(registries: &mut CompilerRegistries) {
    register_socket_types(&mut registries.socket_types);
    register_node_inserters(&mut registries.node_inserters);
    register_default_values(&mut registries.default_values);
    register_conversions(&mut registries.conversions);
}

fn register_socket_types(table: &mut SocketTypeTable) {
    table.register("scalar", DataType::Single(BaseType::Float));
    table.register("vector", DataType::Single(BaseType::Vec3));
    table.register("integer", DataType::Single(BaseType::Int));
    table.register("scalar_list", DataType::Vector(BaseType::Float));
    table.register("vector_list", DataType::Vector(BaseType::Vec3));
    table.register("integer_list", DataType::Vector(BaseType::Int));
}

// ---------------------------------------------------------------------------
// Node inserters
// ---------------------------------------------------------------------------

fn register_node_inserters(registry: &mut NodeInserterRegistry) {
    registry.register("math.add", Box::new(insert_add_floats));
    registry.register("math.vector_add", Box::new(insert_add_vec3s));
    registry.register("vector.combine", Box::new(insert_combine_vector));
    registry.register("vector.separate", Box::new(insert_separate_vector));
    registry.register("list.append", Box::new(insert_append_to_list));
    registry.register("list.length", Box::new(insert_list_length));
}

fn insert_add_floats(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    node: &SourceNode,
) -> Result<(), BuildError> {
    let function = pool.add(Arc::new(AddFloats::new()), "float math function");
    compiler.add_function_for_node(function, &[0, 1], &[2], node);
    Ok(())
}

fn insert_add_vec3s(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    node: &SourceNode,
) -> Result<(), BuildError> {
    let function = pool.add(Arc::new(AddVec3s::new()), "vector math function");
    compiler.add_function_for_node(function, &[0, 1], &[2], node);
    Ok(())
}

fn insert_combine_vector(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    node: &SourceNode,
) -> Result<(), BuildError> {
    let function = pool.add(Arc::new(CombineVector::new()), "combine vector function");
    compiler.add_function_for_node(function, &[0, 1, 2], &[3], node);
    Ok(())
}

fn insert_separate_vector(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    node: &SourceNode,
) -> Result<(), BuildError> {
    let function = pool.add(Arc::new(SeparateVector::new()), "separate vector function");
    compiler.add_function_for_node(function, &[0], &[1, 2, 3], node);
    Ok(())
}

fn insert_append_to_list(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    node: &SourceNode,
) -> Result<(), BuildError> {
    let base = element_type(node)?;
    let function = pool.add(Arc::new(AppendToList::new(base)), "append to list function");
    // The mutable list parameter is both the first input and the only
    // output of the node.
    compiler.add_function_for_node(function, &[0, 1], &[0], node);
    Ok(())
}

fn insert_list_length(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    node: &SourceNode,
) -> Result<(), BuildError> {
    let base = element_type(node)?;
    let function = pool.add(Arc::new(ListLength::new(base)), "list length function");
    compiler.add_function_for_node(function, &[0], &[1], node);
    Ok(())
}

/// Element type a list node was configured with.
fn element_type(node: &SourceNode) -> Result<BaseType, BuildError> {
    let name = node
        .properties
        .get_str("element_type")
        .ok_or_else(|| BuildError::NodeConfig {
            node: node.id,
            message: "missing 'element_type' property".to_string(),
        })?;
    BaseType::from_name(name).ok_or_else(|| BuildError::NodeConfig {
        node: node.id,
        message: format!("unknown element type '{}'", name),
    })
}

// ---------------------------------------------------------------------------
// Default values for unlinked inputs
// ---------------------------------------------------------------------------

fn register_default_values(registry: &mut DefaultValueRegistry) {
    registry.register("scalar", Box::new(insert_float_default));
    registry.register("vector", Box::new(insert_vector_default));
    registry.register("integer", Box::new(insert_integer_default));
    registry.register("scalar_list", Box::new(insert_float_list_default));
    registry.register("vector_list", Box::new(insert_vector_list_default));
    registry.register("integer_list", Box::new(insert_integer_list_default));
}

fn insert_float_default(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    socket: &SourceSocket,
) -> Result<SocketId, BuildError> {
    let value = socket_value(socket, PropertyValue::as_f32).unwrap_or(0.0);
    constant_source(compiler, pool, SingleValue::Float(value), "float socket")
}

fn insert_vector_default(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    socket: &SourceSocket,
) -> Result<SocketId, BuildError> {
    let value = socket_value(socket, PropertyValue::as_vec3).unwrap_or(Vec3::ZERO);
    constant_source(compiler, pool, SingleValue::Vec3(value), "vector socket")
}

fn insert_integer_default(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    socket: &SourceSocket,
) -> Result<SocketId, BuildError> {
    let value = socket_value(socket, PropertyValue::as_i32).unwrap_or(0);
    constant_source(compiler, pool, SingleValue::Int(value), "integer socket")
}

fn insert_float_list_default(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    _socket: &SourceSocket,
) -> Result<SocketId, BuildError> {
    empty_list_source(compiler, pool, BaseType::Float, "empty scalar list")
}

fn insert_vector_list_default(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    _socket: &SourceSocket,
) -> Result<SocketId, BuildError> {
    empty_list_source(compiler, pool, BaseType::Vec3, "empty vector list")
}

fn insert_integer_list_default(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    _socket: &SourceSocket,
) -> Result<SocketId, BuildError> {
    empty_list_source(compiler, pool, BaseType::Int, "empty integer list")
}

fn socket_value<T>(socket: &SourceSocket, get: impl Fn(&PropertyValue) -> Option<T>) -> Option<T> {
    socket.value.as_ref().and_then(get)
}

fn constant_source(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    value: SingleValue,
    label: &str,
) -> Result<SocketId, BuildError> {
    let function = pool.add(Arc::new(ConstantValue::new(value)), label);
    let node = compiler.add_function(function, &[], &[0]);
    Ok(compiler.node_outputs(node)[0])
}

fn empty_list_source(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
    base: BaseType,
    label: &str,
) -> Result<SocketId, BuildError> {
    let function = pool.add(Arc::new(EmptyList::new(base)), label);
    let node = compiler.add_function(function, &[], &[0]);
    Ok(compiler.node_outputs(node)[0])
}

// ---------------------------------------------------------------------------
// Implicit conversions
// ---------------------------------------------------------------------------

fn register_conversions(registry: &mut ConversionRegistry) {
    registry.register("integer", "scalar", Box::new(insert_int_to_float));
}

fn insert_int_to_float(
    compiler: &mut GraphCompiler<'_>,
    pool: &mut ResourcePool,
) -> (SocketId, SocketId) {
    let function = pool.add(Arc::new(IntToFloat::new()), "converter function");
    let node = compiler.add_function(function, &[0], &[1]);
    (compiler.node_inputs(node)[0], compiler.node_outputs(node)[0])
}
