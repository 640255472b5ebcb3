//! Normalized blog entities and the pure functions that produce them.

pub mod entities;
pub mod slug;
pub mod transform;
