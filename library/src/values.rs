//! Runtime value buffers and read-only views.
//!
//! Two value shapes exist: single-per-lane values ([`ArrayBuffer`] /
//! [`SingleView`]) and variable-length-list-per-lane values
//! ([`VectorArray`] / [`VectorView`]). Views are `Copy` and borrow either
//! caller-provided memory or buffers owned by the evaluation storage.
//! A single-per-lane view may also broadcast one repeated value to every
//! lane, so hosts can pass a lone control value without materializing an
//! array.

use crate::types::{BaseType, SingleValue, Vec3};

// ---------------------------------------------------------------------------
// Single-per-lane values
// ---------------------------------------------------------------------------

/// Read-only per-lane float values.
#[derive(Clone, Copy, Debug)]
pub enum FloatView<'a> {
    Slice(&'a [f32]),
    Repeated(f32),
}

impl FloatView<'_> {
    #[inline]
    pub fn get(&self, lane: usize) -> f32 {
        match self {
            FloatView::Slice(values) => values[lane],
            FloatView::Repeated(value) => *value,
        }
    }
}

/// Read-only per-lane 3-vector values.
#[derive(Clone, Copy, Debug)]
pub enum Vec3View<'a> {
    Slice(&'a [Vec3]),
    Repeated(Vec3),
}

impl Vec3View<'_> {
    #[inline]
    pub fn get(&self, lane: usize) -> Vec3 {
        match self {
            Vec3View::Slice(values) => values[lane],
            Vec3View::Repeated(value) => *value,
        }
    }
}

/// Read-only per-lane integer values.
#[derive(Clone, Copy, Debug)]
pub enum IntView<'a> {
    Slice(&'a [i32]),
    Repeated(i32),
}

impl IntView<'_> {
    #[inline]
    pub fn get(&self, lane: usize) -> i32 {
        match self {
            IntView::Slice(values) => values[lane],
            IntView::Repeated(value) => *value,
        }
    }
}

/// Read-only view of a single-per-lane value of any base type.
#[derive(Clone, Copy, Debug)]
pub enum SingleView<'a> {
    Float(FloatView<'a>),
    Vec3(Vec3View<'a>),
    Int(IntView<'a>),
}

impl<'a> SingleView<'a> {
    /// A view broadcasting one value to every lane.
    pub fn repeated(value: SingleValue) -> Self {
        match value {
            SingleValue::Float(v) => SingleView::Float(FloatView::Repeated(v)),
            SingleValue::Vec3(v) => SingleView::Vec3(Vec3View::Repeated(v)),
            SingleValue::Int(v) => SingleView::Int(IntView::Repeated(v)),
        }
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            SingleView::Float(_) => BaseType::Float,
            SingleView::Vec3(_) => BaseType::Vec3,
            SingleView::Int(_) => BaseType::Int,
        }
    }

    pub fn get(&self, lane: usize) -> SingleValue {
        match self {
            SingleView::Float(view) => SingleValue::Float(view.get(lane)),
            SingleView::Vec3(view) => SingleValue::Vec3(view.get(lane)),
            SingleView::Int(view) => SingleValue::Int(view.get(lane)),
        }
    }

    /// The typed float view. Panics on a different base type; signature
    /// checking during the build guarantees the match for network values.
    pub fn float(self) -> FloatView<'a> {
        match self {
            SingleView::Float(view) => view,
            other => panic!("expected float values, got {}", other.base_type()),
        }
    }

    pub fn vec3(self) -> Vec3View<'a> {
        match self {
            SingleView::Vec3(view) => view,
            other => panic!("expected vec3 values, got {}", other.base_type()),
        }
    }

    pub fn int(self) -> IntView<'a> {
        match self {
            SingleView::Int(view) => view,
            other => panic!("expected int values, got {}", other.base_type()),
        }
    }
}

impl<'a> From<&'a [f32]> for SingleView<'a> {
    fn from(values: &'a [f32]) -> Self {
        SingleView::Float(FloatView::Slice(values))
    }
}

impl<'a> From<&'a [Vec3]> for SingleView<'a> {
    fn from(values: &'a [Vec3]) -> Self {
        SingleView::Vec3(Vec3View::Slice(values))
    }
}

impl<'a> From<&'a [i32]> for SingleView<'a> {
    fn from(values: &'a [i32]) -> Self {
        SingleView::Int(IntView::Slice(values))
    }
}

/// Owned single-per-lane values.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayBuffer {
    Float(Vec<f32>),
    Vec3(Vec<Vec3>),
    Int(Vec<i32>),
}

impl ArrayBuffer {
    /// A zero-filled buffer of `len` lanes.
    pub fn zeroed(base: BaseType, len: usize) -> Self {
        match base {
            BaseType::Float => ArrayBuffer::Float(vec![0.0; len]),
            BaseType::Vec3 => ArrayBuffer::Vec3(vec![Vec3::ZERO; len]),
            BaseType::Int => ArrayBuffer::Int(vec![0; len]),
        }
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            ArrayBuffer::Float(_) => BaseType::Float,
            ArrayBuffer::Vec3(_) => BaseType::Vec3,
            ArrayBuffer::Int(_) => BaseType::Int,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayBuffer::Float(values) => values.len(),
            ArrayBuffer::Vec3(values) => values.len(),
            ArrayBuffer::Int(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, lane: usize) -> SingleValue {
        match self {
            ArrayBuffer::Float(values) => SingleValue::Float(values[lane]),
            ArrayBuffer::Vec3(values) => SingleValue::Vec3(values[lane]),
            ArrayBuffer::Int(values) => SingleValue::Int(values[lane]),
        }
    }

    /// Write one lane. Panics if the value's base type differs.
    pub fn set(&mut self, lane: usize, value: SingleValue) {
        match (self, value) {
            (ArrayBuffer::Float(values), SingleValue::Float(v)) => values[lane] = v,
            (ArrayBuffer::Vec3(values), SingleValue::Vec3(v)) => values[lane] = v,
            (ArrayBuffer::Int(values), SingleValue::Int(v)) => values[lane] = v,
            (buffer, value) => panic!(
                "cannot store {} value in {} buffer",
                value.base_type(),
                buffer.base_type()
            ),
        }
    }

    pub fn view(&self) -> SingleView<'_> {
        match self {
            ArrayBuffer::Float(values) => SingleView::Float(FloatView::Slice(values)),
            ArrayBuffer::Vec3(values) => SingleView::Vec3(Vec3View::Slice(values)),
            ArrayBuffer::Int(values) => SingleView::Int(IntView::Slice(values)),
        }
    }

    pub fn floats(&self) -> &[f32] {
        match self {
            ArrayBuffer::Float(values) => values,
            other => panic!("expected float buffer, got {}", other.base_type()),
        }
    }

    pub fn floats_mut(&mut self) -> &mut [f32] {
        match self {
            ArrayBuffer::Float(values) => values,
            other => panic!("expected float buffer, got {}", other.base_type()),
        }
    }

    pub fn vec3s(&self) -> &[Vec3] {
        match self {
            ArrayBuffer::Vec3(values) => values,
            other => panic!("expected vec3 buffer, got {}", other.base_type()),
        }
    }

    pub fn vec3s_mut(&mut self) -> &mut [Vec3] {
        match self {
            ArrayBuffer::Vec3(values) => values,
            other => panic!("expected vec3 buffer, got {}", other.base_type()),
        }
    }

    pub fn ints(&self) -> &[i32] {
        match self {
            ArrayBuffer::Int(values) => values,
            other => panic!("expected int buffer, got {}", other.base_type()),
        }
    }

    pub fn ints_mut(&mut self) -> &mut [i32] {
        match self {
            ArrayBuffer::Int(values) => values,
            other => panic!("expected int buffer, got {}", other.base_type()),
        }
    }
}

// ---------------------------------------------------------------------------
// List-per-lane values
// ---------------------------------------------------------------------------

/// Read-only view of one lane's list.
#[derive(Clone, Copy, Debug)]
pub enum ListView<'a> {
    Float(&'a [f32]),
    Vec3(&'a [Vec3]),
    Int(&'a [i32]),
}

impl ListView<'_> {
    pub fn base_type(&self) -> BaseType {
        match self {
            ListView::Float(_) => BaseType::Float,
            ListView::Vec3(_) => BaseType::Vec3,
            ListView::Int(_) => BaseType::Int,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ListView::Float(values) => values.len(),
            ListView::Vec3(values) => values.len(),
            ListView::Int(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> SingleValue {
        match self {
            ListView::Float(values) => SingleValue::Float(values[index]),
            ListView::Vec3(values) => SingleValue::Vec3(values[index]),
            ListView::Int(values) => SingleValue::Int(values[index]),
        }
    }
}

/// Read-only view of a list-per-lane value.
#[derive(Clone, Copy, Debug)]
pub enum VectorView<'a> {
    Float(&'a [Vec<f32>]),
    Vec3(&'a [Vec<Vec3>]),
    Int(&'a [Vec<i32>]),
}

impl<'a> VectorView<'a> {
    pub fn base_type(&self) -> BaseType {
        match self {
            VectorView::Float(_) => BaseType::Float,
            VectorView::Vec3(_) => BaseType::Vec3,
            VectorView::Int(_) => BaseType::Int,
        }
    }

    pub fn lane_count(&self) -> usize {
        match self {
            VectorView::Float(lanes) => lanes.len(),
            VectorView::Vec3(lanes) => lanes.len(),
            VectorView::Int(lanes) => lanes.len(),
        }
    }

    pub fn lane(&self, lane: usize) -> ListView<'a> {
        match self {
            VectorView::Float(lanes) => ListView::Float(&lanes[lane]),
            VectorView::Vec3(lanes) => ListView::Vec3(&lanes[lane]),
            VectorView::Int(lanes) => ListView::Int(&lanes[lane]),
        }
    }
}

impl<'a> From<&'a [Vec<f32>]> for VectorView<'a> {
    fn from(lanes: &'a [Vec<f32>]) -> Self {
        VectorView::Float(lanes)
    }
}

impl<'a> From<&'a [Vec<Vec3>]> for VectorView<'a> {
    fn from(lanes: &'a [Vec<Vec3>]) -> Self {
        VectorView::Vec3(lanes)
    }
}

impl<'a> From<&'a [Vec<i32>]> for VectorView<'a> {
    fn from(lanes: &'a [Vec<i32>]) -> Self {
        VectorView::Int(lanes)
    }
}

/// Owned list-per-lane values.
#[derive(Clone, Debug, PartialEq)]
pub enum VectorArray {
    Float(Vec<Vec<f32>>),
    Vec3(Vec<Vec<Vec3>>),
    Int(Vec<Vec<i32>>),
}

impl VectorArray {
    /// An array of `lane_count` empty lists.
    pub fn new(base: BaseType, lane_count: usize) -> Self {
        match base {
            BaseType::Float => VectorArray::Float(vec![Vec::new(); lane_count]),
            BaseType::Vec3 => VectorArray::Vec3(vec![Vec::new(); lane_count]),
            BaseType::Int => VectorArray::Int(vec![Vec::new(); lane_count]),
        }
    }

    /// A deep copy of every lane of a view.
    pub fn from_view(view: VectorView<'_>) -> Self {
        match view {
            VectorView::Float(lanes) => VectorArray::Float(lanes.to_vec()),
            VectorView::Vec3(lanes) => VectorArray::Vec3(lanes.to_vec()),
            VectorView::Int(lanes) => VectorArray::Int(lanes.to_vec()),
        }
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            VectorArray::Float(_) => BaseType::Float,
            VectorArray::Vec3(_) => BaseType::Vec3,
            VectorArray::Int(_) => BaseType::Int,
        }
    }

    pub fn lane_count(&self) -> usize {
        match self {
            VectorArray::Float(lanes) => lanes.len(),
            VectorArray::Vec3(lanes) => lanes.len(),
            VectorArray::Int(lanes) => lanes.len(),
        }
    }

    pub fn view(&self) -> VectorView<'_> {
        match self {
            VectorArray::Float(lanes) => VectorView::Float(lanes),
            VectorArray::Vec3(lanes) => VectorView::Vec3(lanes),
            VectorArray::Int(lanes) => VectorView::Int(lanes),
        }
    }

    pub fn lane(&self, lane: usize) -> ListView<'_> {
        self.view().lane(lane)
    }

    /// Append one element to a lane's list. Panics if the element's base
    /// type differs.
    pub fn push(&mut self, lane: usize, value: SingleValue) {
        match (self, value) {
            (VectorArray::Float(lanes), SingleValue::Float(v)) => lanes[lane].push(v),
            (VectorArray::Vec3(lanes), SingleValue::Vec3(v)) => lanes[lane].push(v),
            (VectorArray::Int(lanes), SingleValue::Int(v)) => lanes[lane].push(v),
            (array, value) => panic!(
                "cannot push {} value into {} list",
                value.base_type(),
                array.base_type()
            ),
        }
    }

    /// Append a copy of a whole list to a lane.
    pub fn extend_lane(&mut self, lane: usize, list: ListView<'_>) {
        match (self, list) {
            (VectorArray::Float(lanes), ListView::Float(values)) => {
                lanes[lane].extend_from_slice(values)
            }
            (VectorArray::Vec3(lanes), ListView::Vec3(values)) => {
                lanes[lane].extend_from_slice(values)
            }
            (VectorArray::Int(lanes), ListView::Int(values)) => {
                lanes[lane].extend_from_slice(values)
            }
            (array, list) => panic!(
                "cannot extend {} list with {} values",
                array.base_type(),
                list.base_type()
            ),
        }
    }

    pub fn float_lanes(&self) -> &[Vec<f32>] {
        match self {
            VectorArray::Float(lanes) => lanes,
            other => panic!("expected float lists, got {}", other.base_type()),
        }
    }

    pub fn vec3_lanes(&self) -> &[Vec<Vec3>] {
        match self {
            VectorArray::Vec3(lanes) => lanes,
            other => panic!("expected vec3 lists, got {}", other.base_type()),
        }
    }

    pub fn int_lanes(&self) -> &[Vec<i32>] {
        match self {
            VectorArray::Int(lanes) => lanes,
            other => panic!("expected int lists, got {}", other.base_type()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_view_broadcasts() {
        let view = SingleView::repeated(SingleValue::Float(2.5));
        assert_eq!(view.get(0), SingleValue::Float(2.5));
        assert_eq!(view.get(17), SingleValue::Float(2.5));
    }

    #[test]
    fn vector_array_push_and_view() {
        let mut array = VectorArray::new(BaseType::Float, 2);
        array.push(0, SingleValue::Float(1.0));
        array.push(0, SingleValue::Float(2.0));
        array.push(1, SingleValue::Float(3.0));
        assert_eq!(array.lane(0).len(), 2);
        assert_eq!(array.lane(1).len(), 1);
        assert_eq!(array.lane(1).get(0), SingleValue::Float(3.0));
    }

    #[test]
    fn from_view_is_a_deep_copy() {
        let lanes = vec![vec![1.0f32, 2.0], vec![3.0]];
        let mut copy = VectorArray::from_view(VectorView::from(lanes.as_slice()));
        copy.push(0, SingleValue::Float(9.0));
        assert_eq!(lanes[0].len(), 2);
        assert_eq!(copy.lane(0).len(), 3);
    }
}
