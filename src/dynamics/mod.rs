//! Discrete follow laws
//!
//! Generic over [`Interpolatable`] so the same law can smooth a scalar axis or a full vector.

mod follow;

pub use follow::{FirstOrderFollow, Interpolatable};
