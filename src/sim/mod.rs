//! Deterministic simulation module
//!
//! All physics and effect state lives here. Given the same settings, seed and
//! sequence of `dt` values, a run is reproducible:
//! - No clock reads; time only enters through `dt`
//! - Seeded RNG only
//! - Rendering goes through the [`Surface`](crate::renderer::Surface) trait

pub mod arena;
pub mod ball;
pub mod collision;
pub mod trail;

pub use arena::Arena;
pub use ball::Ball;
pub use collision::{CollisionResult, ball_boundary_collision, boundary_normal, reflect_with_losses};
pub use trail::{Impact, TrailBuffer, TrailManager};
