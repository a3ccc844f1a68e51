//! Pixel buffer and line rasterization

pub mod buffer;
pub mod line;

pub use buffer::PixelBuffer;
pub use line::draw_line;
