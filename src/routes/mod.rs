//! Routers for host applications to mount.

mod common;
mod model;

pub use common::{common_routes, common_routes_with_ready};
pub use model::{model_routes, MAX_BODY_BYTES};
