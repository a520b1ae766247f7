//! Scene-support I/O for the ember path tracer.
//!
//! Holds the triangle mesh container and the OBJ text parser. The
//! renderer consumes a [`Mesh`] and turns it into triangle primitives;
//! nothing in here touches the rendering hot path.

mod mesh;
mod obj;

pub use mesh::Mesh;
pub use obj::{load_obj, parse_obj, ObjError};
