//! Semantic data types flowing through the network.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Primitive element type of a data socket.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    /// Floating point scalar (f32).
    Float,
    /// 3-component float vector.
    Vec3,
    /// 32-bit signed integer.
    Int,
}

impl BaseType {
    /// Parse a base type from its configuration name (e.g. the
    /// `element_type` property of a list node).
    pub fn from_name(name: &str) -> Option<BaseType> {
        match name {
            "float" => Some(BaseType::Float),
            "vec3" => Some(BaseType::Vec3),
            "int" => Some(BaseType::Int),
            _ => None,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BaseType::Float => "float",
            BaseType::Vec3 => "vec3",
            BaseType::Int => "int",
        };
        write!(f, "{}", s)
    }
}

/// 3-component float vector.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, factor: f32) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Shape of the value a data socket carries: one value per lane, or a
/// variable-length list per lane.
///
/// Non-data (structural) sockets have no `DataType` at all; they are
/// represented as `Option<DataType>::None` on the source-graph side and
/// never make it into a compiled network.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Single(BaseType),
    Vector(BaseType),
}

impl DataType {
    pub fn base(self) -> BaseType {
        match self {
            DataType::Single(base) | DataType::Vector(base) => base,
        }
    }

    pub fn is_single(self) -> bool {
        matches!(self, DataType::Single(_))
    }

    pub fn is_vector(self) -> bool {
        matches!(self, DataType::Vector(_))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Single(base) => write!(f, "{}", base),
            DataType::Vector(base) => write!(f, "{} list", base),
        }
    }
}

/// One element of a single-per-lane value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SingleValue {
    Float(f32),
    Vec3(Vec3),
    Int(i32),
}

impl SingleValue {
    pub fn base_type(self) -> BaseType {
        match self {
            SingleValue::Float(_) => BaseType::Float,
            SingleValue::Vec3(_) => BaseType::Vec3,
            SingleValue::Int(_) => BaseType::Int,
        }
    }

    /// The zero value of a base type.
    pub fn zero(base: BaseType) -> SingleValue {
        match base {
            BaseType::Float => SingleValue::Float(0.0),
            BaseType::Vec3 => SingleValue::Vec3(Vec3::ZERO),
            BaseType::Int => SingleValue::Int(0),
        }
    }
}
