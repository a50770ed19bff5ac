pub mod render;
pub mod tracker;
