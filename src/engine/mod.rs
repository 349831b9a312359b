//! Queue logic that does not belong to any single request handler.

pub mod analytics;
pub mod queue_order;
pub mod wait_time;
