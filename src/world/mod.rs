mod camera;
mod layout;
pub mod office;

pub use camera::{Camera, CameraBasis, FollowCamera};
pub use layout::{Axis, LayoutError, LayoutSpec, Placement, generate, raw_axis};
pub use office::{OBSTACLES, OFFICE_LAYOUT, ObstacleDef, Prop, PropKind, build_office};
