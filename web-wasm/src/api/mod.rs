pub mod predict;

pub use predict::{predict, resolve_endpoint};
