// tr_local.rs — renderer local definitions
//
// Everything here is a plain value type rebuilt per view. Nothing is
// mutated in place during a culling pass; a ViewParms is frozen once
// built and replaced wholesale for recursive portal/mirror views.

use rq3_common::q_shared::*;

/// orientationr_t — a local-to-world basis plus camera-relative metadata
/// for rendering one object (or the camera itself).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationR {
    pub origin: Vec3,
    /// Local x/y/z axes expressed in world space.
    pub axis: [Vec3; 3],
    /// Camera origin re-expressed in this orientation's local space,
    /// used by lighting and fog downstream.
    pub view_origin: Vec3,
    /// Composed local-to-clip-ready matrix.
    pub model_matrix: Mat4,
}

impl Default for OrientationR {
    fn default() -> Self {
        Self {
            origin: VEC3_ORIGIN,
            axis: crate::tr_types::AXIS_DEFAULT,
            view_origin: VEC3_ORIGIN,
            model_matrix: MAT4_IDENTITY,
        }
    }
}

/// viewParms_t — per-view camera state, immutable for the duration of a
/// culling pass. Near/far are explicit distances, never frustum planes:
/// the frustum carries exactly the four side planes.
#[derive(Debug, Clone, Copy)]
pub struct ViewParms {
    /// Camera placement (origin and axis in world space).
    pub or: OrientationR,
    /// World orientation: the viewer transform every non-model entity
    /// and world surface renders with.
    pub world: OrientationR,
    pub projection_matrix: Mat4,
    pub viewport_x: i32,
    pub viewport_y: i32,
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub fov_x: f32,
    pub fov_y: f32,
    /// AABB of the potentially visible set; drives the dynamic far clip.
    pub vis_bounds: [Vec3; 2],
    pub z_far: f32,
    /// Left, right, bottom, top.
    pub frustum: [CPlane; 4],
}

impl Default for ViewParms {
    fn default() -> Self {
        Self {
            or: OrientationR::default(),
            world: OrientationR::default(),
            projection_matrix: MAT4_IDENTITY,
            viewport_x: 0,
            viewport_y: 0,
            viewport_width: 0,
            viewport_height: 0,
            fov_x: 0.0,
            fov_y: 0.0,
            vis_bounds: [VEC3_ORIGIN, VEC3_ORIGIN],
            z_far: 0.0,
            frustum: [CPlane::default(); 4],
        }
    }
}

/// Three-state visibility classification against the view frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullResult {
    /// Completely inside; no clip plane can touch it.
    In,
    /// Partially inside; draw with clipping.
    Clip,
    /// Completely outside; skip.
    Out,
}

/// surfaceType_t — per-kind surface geometry, as handed over by the
/// asset/scene system. Only the data the plane derivation needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Placeholder for surfaces the core cannot derive a plane from.
    Bad,
    /// Flat face with a precomputed plane.
    Face { plane: CPlane },
    /// Indexed triangle soup.
    Triangles { verts: Vec<Vec3>, indexes: Vec<u32> },
    /// Polygon fan in winding order.
    Poly { verts: Vec<Vec3> },
}

/// Read-only render configuration threaded into the per-frame entry
/// points (the cvar values the reference engine reads globally).
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Disable frustum culling: every classification reports Clip so
    /// nothing is ever wrongly skipped.
    pub nocull: bool,
    /// Near clip plane distance.
    pub znear: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            nocull: false,
            znear: 4.0,
        }
    }
}
