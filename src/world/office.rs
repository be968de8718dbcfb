//! The authored office floor: a ground slab, the desk grid produced by
//! [`generate`] and a handful of fixed obstacles.
//!
//! Every prop is spawned twice: once as a fixed collider in the physics
//! world and once as a [`Prop`] entity in the `hecs` scene the renderer
//! walks.  Monitors are visual only.

use glam::{Vec2, Vec3};
use hecs::World;
use log::info;

use super::layout::{LayoutError, LayoutSpec, Placement, generate};
use crate::physics::RapierWorld;

/// The floor plan used by the viewer: 20×12 desks, an aisle every five
/// columns and every four rows.
pub const OFFICE_LAYOUT: LayoutSpec = LayoutSpec {
    columns: 20,
    rows: 12,
    base_spacing_x: 1.2,
    base_spacing_z: 1.4,
    aisle_every_cols: 5,
    aisle_every_rows: 4,
    aisle_width_x: 2.2,
    aisle_width_z: 2.0,
};

/// Full desk size (width, height, depth).
pub const DESK_SIZE: Vec3 = Vec3::new(1.4, 0.75, 0.8);
/// Full monitor size (width, height, depth).
pub const MONITOR_SIZE: Vec3 = Vec3::new(0.9, 0.5, 0.1);
/// Monitor centre above the desk top.
const MONITOR_LIFT: f32 = 0.25;

const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(60.0, 0.1, 60.0);
const GROUND_CENTRE_Y: f32 = -0.05;
/// World height of the walkable ground surface.
pub const GROUND_TOP: f32 = GROUND_CENTRE_Y + GROUND_HALF_EXTENTS.y;

/// An authored fixed-collision box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleDef {
    pub position: Vec3,
    pub half_extents: Vec3,
}

pub const OBSTACLES: [ObstacleDef; 3] = [
    ObstacleDef {
        position: Vec3::new(-6.0, 0.6, 5.0),
        half_extents: Vec3::new(1.0, 0.6, 0.75),
    },
    ObstacleDef {
        position: Vec3::new(4.0, 0.6, -4.0),
        half_extents: Vec3::new(0.75, 0.6, 1.0),
    },
    ObstacleDef {
        position: Vec3::new(0.0, 0.6, 8.0),
        half_extents: Vec3::new(1.5, 0.6, 0.5),
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropKind {
    Ground,
    Desk,
    Monitor,
    Obstacle,
}

/// Axis-aligned box in the scene world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prop {
    pub kind: PropKind,
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Prop {
    #[inline]
    pub fn footprint(&self) -> (Vec2, Vec2) {
        let c = Vec2::new(self.center.x, self.center.z);
        let h = Vec2::new(self.half_extents.x, self.half_extents.z);
        (c - h, c + h)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }
}

/// Where the agent is dropped: centre of the floor, in the middle aisle.
#[inline]
pub fn spawn_point() -> Vec3 {
    Vec3::new(0.0, GROUND_TOP, 0.0)
}

fn desk_props(at: Vec2) -> [Prop; 2] {
    let desk = Prop {
        kind: PropKind::Desk,
        center: Vec3::new(at.x, DESK_SIZE.y * 0.5, at.y),
        half_extents: DESK_SIZE * 0.5,
    };
    let monitor = Prop {
        kind: PropKind::Monitor,
        center: Vec3::new(
            at.x,
            DESK_SIZE.y + MONITOR_LIFT,
            at.y - DESK_SIZE.z * 0.25,
        ),
        half_extents: MONITOR_SIZE * 0.5,
    };
    [desk, monitor]
}

/// Populate `physics` and `scene` with the office described by `layout`.
///
/// The layout is validated before anything is inserted; on error both
/// worlds are left untouched.
pub fn build_office(
    layout: &LayoutSpec,
    physics: &mut RapierWorld,
    scene: &mut World,
) -> Result<Placement, LayoutError> {
    let placement = generate(layout)?;

    let mut props = Vec::with_capacity(1 + OBSTACLES.len() + placement.len() * 2);
    props.push(Prop {
        kind: PropKind::Ground,
        center: Vec3::new(0.0, GROUND_CENTRE_Y, 0.0),
        half_extents: GROUND_HALF_EXTENTS,
    });
    props.extend(OBSTACLES.iter().map(|o| Prop {
        kind: PropKind::Obstacle,
        center: o.position,
        half_extents: o.half_extents,
    }));
    props.extend(placement.points().iter().flat_map(|&p| desk_props(p)));

    for prop in props {
        if prop.kind != PropKind::Monitor {
            physics.add_fixed_box(prop.center, prop.half_extents);
        }
        scene.spawn((prop,));
    }

    let (lo, hi) = placement.bounds();
    info!(
        "office built: {} desks, {} obstacles, desk area ({:.1}, {:.1})..({:.1}, {:.1})",
        placement.len(),
        OBSTACLES.len(),
        lo.x,
        lo.y,
        hi.x,
        hi.y
    );
    Ok(placement)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
