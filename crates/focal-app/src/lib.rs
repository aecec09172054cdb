pub mod error;
pub mod fixture;
pub mod render;
pub mod zone;
