pub mod render;

pub use render::ConsoleSink;
