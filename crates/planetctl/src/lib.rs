pub mod client;
pub mod geometry;
pub mod icon;
pub mod macros;
pub mod protocol;
pub mod svg;
pub mod wm;
