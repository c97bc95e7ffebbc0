pub mod grid;
pub mod screen;
