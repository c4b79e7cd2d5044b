use std::sync::atomic::{AtomicUsize, Ordering};

use crate::shape::ShapeId;

// Single static counter for all shapes
static NEXT_SHAPE_ID: AtomicUsize = AtomicUsize::new(1);

pub fn generate_shape_id() -> ShapeId {
    ShapeId(NEXT_SHAPE_ID.fetch_add(1, Ordering::SeqCst))
}
