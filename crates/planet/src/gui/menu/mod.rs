pub mod model;
pub mod view;

pub use model::{Highlight, Slot, State};
pub use view::draw;

pub const ICON_SIZE: i32 = 64; // decoded icon resolution, scaled down when drawn
pub const ICON_INACTIVE_ALPHA: f64 = 0.8;
pub const STROKE_WIDTH: f64 = 1.0;
pub const FAN_ICON_SIZE: f64 = 16.0;
pub const LABEL_BOX_OFFSET: f64 = 120.0; // below the center, fan layout only
pub const LABEL_BOX_PADDING: f64 = 8.0;
pub const LABEL_BOX_CORNER: f64 = 4.0;
