// tr_types.rs — refresh API types shared with the scene builder
//
// These records are produced outside the renderer core (scene/frame builder)
// and consumed read-only here to derive orientations and visibility.

use rq3_common::q_shared::*;

/// refEntityType_t — what kind of drawable an entity is. Only `Model`
/// entities get a per-entity orientation; everything else is drawn in
/// world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefEntityType {
    #[default]
    Model,
    Poly,
    Sprite,
    Beam,
    RailCore,
    RailRings,
    Lightning,
    PortalSurface,
}

/// refEntity_t — description of a drawable instance. Owned by the scene
/// builder; the core only reads origin/axis to build an orientation.
#[derive(Debug, Clone, Copy)]
pub struct RefEntity {
    pub re_type: RefEntityType,
    pub origin: Vec3,
    /// Local basis in world space. Rows are the entity's x/y/z axes;
    /// ideally orthonormal, but may carry a uniform scale when
    /// `non_normalized_axes` is set.
    pub axis: [Vec3; 3],
    /// Axis rows are scaled rather than unit length; view-origin
    /// derivation compensates by the inverse axis length.
    pub non_normalized_axes: bool,
}

impl Default for RefEntity {
    fn default() -> Self {
        Self {
            re_type: RefEntityType::Model,
            origin: VEC3_ORIGIN,
            axis: AXIS_DEFAULT,
            non_normalized_axes: false,
        }
    }
}

/// Identity basis.
pub const AXIS_DEFAULT: [Vec3; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// refdef_t — per-frame camera parameters handed in by the view-setup
/// stage. `vis_bounds` is the axis-aligned box of the potentially visible
/// set, computed by the (external) world-visibility pass.
#[derive(Debug, Clone, Copy)]
pub struct RefDef {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub fov_x: f32,
    pub fov_y: f32,
    pub vieworg: Vec3,
    pub viewangles: Vec3,
    pub vis_bounds: [Vec3; 2],
    pub rdflags: RdFlags,
}

impl Default for RefDef {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 640,
            height: 480,
            fov_x: 90.0,
            fov_y: 90.0,
            vieworg: VEC3_ORIGIN,
            viewangles: VEC3_ORIGIN,
            vis_bounds: [VEC3_ORIGIN, VEC3_ORIGIN],
            rdflags: RdFlags::empty(),
        }
    }
}
