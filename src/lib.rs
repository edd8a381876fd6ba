//! truck-route-planner
//!
//! Single-vehicle delivery routing from a fixed depot: traffic-aware cost
//! matrix, nearest-neighbor ordering, and per-segment route views.

pub mod directions;
pub mod error;
pub mod haversine;
pub mod matrix;
pub mod planner;
pub mod polyline;
pub mod route;
pub mod solver;
pub mod stop;
pub mod traits;
