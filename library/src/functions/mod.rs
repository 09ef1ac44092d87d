//! Built-in function catalog.
//!
//! Small, batched callable units the built-in node inserters wire into
//! compiled networks. Hosts can add their own by implementing
//! [`Function`](crate::function::Function) and registering an inserter.

mod constant;
mod convert;
mod list;
mod math;
mod vector;

pub use constant::{ConstantValue, EmptyList};
pub use convert::IntToFloat;
pub use list::{AppendToList, ListLength};
pub use math::{AddFloats, AddVec3s};
pub use vector::{CombineVector, SeparateVector};
