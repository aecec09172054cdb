pub mod error;
pub mod geometry;
pub mod model;
pub mod occurrence;
pub mod state;
pub mod week;
