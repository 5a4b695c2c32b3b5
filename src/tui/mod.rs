pub mod app;
pub mod items;
mod render;
pub mod widgets;
