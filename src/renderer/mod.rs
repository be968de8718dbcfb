//! Rendering abstraction layer.
//!
//! *The simulation never touches a pixel buffer directly.*
//! It produces a list of [`DrawCall`]s (back-to-front, painter's order) and
//! hands them to a type that implements [`Renderer`].
//!
//! Draw calls live in world units on the XZ plane; the backend owns the
//! mapping to pixels through the [`TopDownView`] it is given each frame.

use glam::{Vec2, Vec3};

use crate::sim::{AgentState, AvatarView, MovementState};
use crate::world::{Prop, PropKind};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

pub const BACKGROUND: Rgba = 0xFF_20_20_20;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCall {
    /// Axis-aligned rectangle, world min/max corners on XZ.
    Rect { min: Vec2, max: Vec2, colour: Rgba },
    Disc { centre: Vec2, radius: f32, colour: Rgba },
    Line { from: Vec2, to: Vec2, colour: Rgba },
}

/// Orthographic camera looking straight down, -Z pointing up the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopDownView {
    pub centre: Vec2,
    pub pixels_per_metre: f32,
}

impl TopDownView {
    #[inline]
    pub fn to_screen(&self, p: Vec2, width: usize, height: usize) -> (i32, i32) {
        let d = (p - self.centre) * self.pixels_per_metre;
        let x = width as f32 * 0.5 + d.x;
        let y = height as f32 * 0.5 + d.y;
        (x.floor() as i32, y.floor() as i32)
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize, view: TopDownView);

    fn draw(&mut self, call: &DrawCall);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        view: TopDownView,
        calls: &[DrawCall],
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height, view);
        for c in calls {
            self.draw(c);
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

/*──────────────────────── scene → draw calls ─────────────────────*/

fn prop_colour(kind: PropKind) -> Rgba {
    match kind {
        PropKind::Ground => 0xFF_3A_3F_44,
        PropKind::Desk => 0xFF_8B_6B_4A,
        PropKind::Monitor => 0xFF_1C_1C_24,
        PropKind::Obstacle => 0xFF_5A_7D_9A,
    }
}

fn agent_colour(movement: MovementState) -> Rgba {
    match movement {
        MovementState::Idle => 0xFF_4C_AF_50,
        MovementState::Running => 0xFF_FF_C1_07,
        MovementState::Airborne => 0xFF_E9_1E_63,
    }
}

const PLACEHOLDER_COLOUR: Rgba = 0xFF_FF_8C_00;
const FACING_COLOUR: Rgba = 0xFF_FF_FF_FF;
const CAMERA_COLOUR: Rgba = 0xFF_00_BC_D4;

#[inline]
fn xz(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Painter's-order calls for the office props, then the agent on top.
///
/// Props are sorted by their top height, so monitors land over desks.
pub fn scene_calls(
    scene: &hecs::World,
    agent: &AgentState,
    radius: f32,
    avatar: AvatarView,
    camera_forward: Vec3,
) -> Vec<DrawCall> {
    let mut props: Vec<Prop> = scene.query::<&Prop>().iter().map(|(_, p)| *p).collect();
    props.sort_by(|a, b| a.top().total_cmp(&b.top()));

    let mut calls: Vec<DrawCall> = props
        .iter()
        .map(|p| {
            let (min, max) = p.footprint();
            DrawCall::Rect {
                min,
                max,
                colour: prop_colour(p.kind),
            }
        })
        .collect();

    let centre = xz(agent.position);
    match avatar {
        AvatarView::Placeholder => calls.push(DrawCall::Disc {
            centre,
            radius,
            colour: PLACEHOLDER_COLOUR,
        }),
        AvatarView::Animated => {
            calls.push(DrawCall::Disc {
                centre,
                radius,
                colour: agent_colour(agent.movement),
            });
            let facing = Vec2::new(agent.yaw.sin(), agent.yaw.cos());
            calls.push(DrawCall::Line {
                from: centre,
                to: centre + facing * radius * 2.0,
                colour: FACING_COLOUR,
            });
        }
    }

    let look = xz(camera_forward).normalize_or_zero();
    calls.push(DrawCall::Line {
        from: centre,
        to: centre + look * radius * 4.0,
        colour: CAMERA_COLOUR,
    });
    calls
}

pub mod software;
pub use software::Software;

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
