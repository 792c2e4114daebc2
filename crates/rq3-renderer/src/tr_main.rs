// tr_main.rs — view setup, coordinate transforms, and frustum culling
//
// Every function here is pure: per-view state is threaded in as values
// and new orientations are returned rather than written into frame
// globals. Culling of independent objects against a frozen ViewParms is
// safe to run from any number of threads.

use log::debug;
use rayon::prelude::*;
use rq3_common::q_shared::*;

use crate::tr_local::{CullResult, OrientationR, RenderOptions, Surface, ViewParms};
use crate::tr_types::{RefDef, RefEntity, RefEntityType};

/// Far clip distance used when no world model is present (menus, icons).
pub const NOWORLD_ZFAR: f32 = 2048.0;

/// Convert from the engine's coordinate system (looking down +X) to the
/// graphics API's (looking down -Z). Process-wide constant.
pub const FLIP_MATRIX: Mat4 = [
    0.0, 0.0, -1.0, 0.0,
    -1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

// ============================================================
// Local <-> world transforms
// ============================================================

/// Basis transform plus translation: local point into world space.
pub fn local_point_to_world(local: &Vec3, or: &OrientationR) -> Vec3 {
    let mut world = or.origin;
    world = vector_ma(&world, local[0], &or.axis[0]);
    world = vector_ma(&world, local[1], &or.axis[1]);
    world = vector_ma(&world, local[2], &or.axis[2]);
    world
}

/// Direction-only transform: local normal into world space, no translation.
pub fn local_normal_to_world(local: &Vec3, or: &OrientationR) -> Vec3 {
    let mut world = vector_scale(&or.axis[0], local[0]);
    world = vector_ma(&world, local[1], &or.axis[1]);
    world = vector_ma(&world, local[2], &or.axis[2]);
    world
}

/// Inverse of the rotation via dot products against each axis row. Only
/// valid when the axis is orthonormal; non-normalized axes are compensated
/// by the caller, never here.
pub fn world_to_local(world: &Vec3, or: &OrientationR) -> Vec3 {
    let delta = vector_subtract(world, &or.origin);
    [
        dot_product(&delta, &or.axis[0]),
        dot_product(&delta, &or.axis[1]),
        dot_product(&delta, &or.axis[2]),
    ]
}

// ============================================================
// Orientation engine
// ============================================================

/// Generates an orientation for an entity. The view origin is set for
/// lighting/fog in the entity's local space.
pub fn rotate_for_entity(ent: &RefEntity, view_parms: &ViewParms) -> OrientationR {
    if ent.re_type != RefEntityType::Model {
        // sprites, beams, etc. are drawn in world space
        return view_parms.world;
    }

    let mut or = OrientationR {
        origin: ent.origin,
        axis: ent.axis,
        ..Default::default()
    };

    let mut gl_matrix = MAT4_ZERO;
    gl_matrix[0] = or.axis[0][0];
    gl_matrix[4] = or.axis[1][0];
    gl_matrix[8] = or.axis[2][0];
    gl_matrix[12] = or.origin[0];

    gl_matrix[1] = or.axis[0][1];
    gl_matrix[5] = or.axis[1][1];
    gl_matrix[9] = or.axis[2][1];
    gl_matrix[13] = or.origin[1];

    gl_matrix[2] = or.axis[0][2];
    gl_matrix[6] = or.axis[1][2];
    gl_matrix[10] = or.axis[2][2];
    gl_matrix[14] = or.origin[2];

    gl_matrix[15] = 1.0;

    // entity transform first, then world/view
    or.model_matrix = matrix_multiply(&gl_matrix, &view_parms.world.model_matrix);

    // calculate the viewer origin in the model's space
    let delta = vector_subtract(&view_parms.or.origin, &or.origin);

    // compensate for scale in the axes if necessary
    let axis_length = if ent.non_normalized_axes {
        let length = vector_length(&ent.axis[0]);
        if length == 0.0 {
            0.0
        } else {
            1.0 / length
        }
    } else {
        1.0
    };

    or.view_origin = [
        dot_product(&delta, &or.axis[0]) * axis_length,
        dot_product(&delta, &or.axis[1]) * axis_length,
        dot_product(&delta, &or.axis[2]) * axis_length,
    ];
    or
}

/// Sets up the world orientation for the camera placement: identity axis
/// in camera space, world-to-camera matrix from the camera basis with a
/// per-row `-dot(origin, axis)` translation, flipped into the graphics
/// API's forward convention.
pub fn rotate_for_viewer(origin: &Vec3, axis: &[Vec3; 3]) -> OrientationR {
    let mut viewer_matrix = MAT4_ZERO;

    viewer_matrix[0] = axis[0][0];
    viewer_matrix[4] = axis[0][1];
    viewer_matrix[8] = axis[0][2];
    viewer_matrix[12] = -origin[0] * viewer_matrix[0]
        + -origin[1] * viewer_matrix[4]
        + -origin[2] * viewer_matrix[8];

    viewer_matrix[1] = axis[1][0];
    viewer_matrix[5] = axis[1][1];
    viewer_matrix[9] = axis[1][2];
    viewer_matrix[13] = -origin[0] * viewer_matrix[1]
        + -origin[1] * viewer_matrix[5]
        + -origin[2] * viewer_matrix[9];

    viewer_matrix[2] = axis[2][0];
    viewer_matrix[6] = axis[2][1];
    viewer_matrix[10] = axis[2][2];
    viewer_matrix[14] = -origin[0] * viewer_matrix[2]
        + -origin[1] * viewer_matrix[6]
        + -origin[2] * viewer_matrix[10];

    viewer_matrix[15] = 1.0;

    OrientationR {
        origin: VEC3_ORIGIN,
        axis: crate::tr_types::AXIS_DEFAULT,
        view_origin: *origin,
        model_matrix: matrix_multiply(&viewer_matrix, &FLIP_MATRIX),
    }
}

// ============================================================
// Projection setup
// ============================================================

/// Dynamic far clip: the distance to the farthest corner of the
/// visibility bounds. Squared comparison per corner, one sqrt at the end.
pub fn set_far_clip(rdflags: RdFlags, vis_bounds: &[Vec3; 2], origin: &Vec3) -> f32 {
    // if not rendering the world (icons, menus, etc), set a 2k far clip
    if rdflags.contains(RdFlags::NOWORLDMODEL) {
        return NOWORLD_ZFAR;
    }

    let mut farthest_corner_distance = 0.0f32;
    for i in 0..8 {
        let v = [
            if i & 1 != 0 { vis_bounds[0][0] } else { vis_bounds[1][0] },
            if i & 2 != 0 { vis_bounds[0][1] } else { vis_bounds[1][1] },
            if i & 4 != 0 { vis_bounds[0][2] } else { vis_bounds[1][2] },
        ];
        let vec_to = vector_subtract(&v, origin);
        let distance = vector_length_squared(&vec_to);
        if distance > farthest_corner_distance {
            farthest_corner_distance = distance;
        }
    }
    farthest_corner_distance.sqrt()
}

/// Off-center perspective projection from the view's half-angle tangents.
/// Returns the matrix and the computed far clip distance. znear and the
/// FOV ranges are caller-guaranteed preconditions, not validated here.
pub fn setup_projection(znear: f32, rdflags: RdFlags, view: &ViewParms) -> (Mat4, f32) {
    let z_far = set_far_clip(rdflags, &view.vis_bounds, &view.or.origin);

    let ymax = znear * (view.fov_y * std::f32::consts::PI / 360.0).tan();
    let ymin = -ymax;
    let xmax = znear * (view.fov_x * std::f32::consts::PI / 360.0).tan();
    let xmin = -xmax;

    let width = xmax - xmin;
    let height = ymax - ymin;
    let depth = z_far - znear;

    let mut m = MAT4_ZERO;
    m[0] = 2.0 * znear / width;
    m[8] = (xmax + xmin) / width; // normally 0
    m[5] = 2.0 * znear / height;
    m[9] = (ymax + ymin) / height; // normally 0
    m[10] = -(z_far + znear) / depth;
    m[14] = -2.0 * z_far * znear / depth;
    m[11] = -1.0;
    (m, z_far)
}

/// Derives the four side planes from the camera basis and field of view.
/// Near/far rejection happens via explicit depth comparison elsewhere.
pub fn setup_frustum(view: &ViewParms) -> [CPlane; 4] {
    let mut normals = [VEC3_ORIGIN; 4];

    let ang = view.fov_x.to_radians() * 0.5;
    let xs = ang.sin();
    let xc = ang.cos();
    normals[0] = vector_ma(&vector_scale(&view.or.axis[0], xs), xc, &view.or.axis[1]);
    normals[1] = vector_ma(&vector_scale(&view.or.axis[0], xs), -xc, &view.or.axis[1]);

    let ang = view.fov_y.to_radians() * 0.5;
    let ys = ang.sin();
    let yc = ang.cos();
    normals[2] = vector_ma(&vector_scale(&view.or.axis[0], ys), yc, &view.or.axis[2]);
    normals[3] = vector_ma(&vector_scale(&view.or.axis[0], ys), -yc, &view.or.axis[2]);

    let mut frustum = [CPlane::default(); 4];
    for i in 0..4 {
        frustum[i].normal = normals[i];
        frustum[i].plane_type = PLANE_NON_AXIAL;
        frustum[i].dist = dot_product(&view.or.origin, &normals[i]);
        frustum[i].signbits = signbits_for_plane(&frustum[i]);
    }
    frustum
}

// ============================================================
// Culling
// ============================================================

/// Classifies an oriented local bounding box against the frustum. With
/// `nocull` set nothing is ever rejected; everything reports Clip.
pub fn cull_local_box(
    bounds: &[Vec3; 2],
    or: &OrientationR,
    frustum: &[CPlane; 4],
    nocull: bool,
) -> CullResult {
    if nocull {
        return CullResult::Clip;
    }

    // transform into world space
    let mut transformed = [VEC3_ORIGIN; 8];
    for i in 0..8 {
        let v = [
            bounds[i & 1][0],
            bounds[(i >> 1) & 1][1],
            bounds[(i >> 2) & 1][2],
        ];
        let mut t = or.origin;
        t = vector_ma(&t, v[0], &or.axis[0]);
        t = vector_ma(&t, v[1], &or.axis[1]);
        t = vector_ma(&t, v[2], &or.axis[2]);
        transformed[i] = t;
    }

    // check against frustum planes
    let mut any_back = false;
    for frust in frustum {
        let mut front = false;
        let mut back = false;
        for point in &transformed {
            if dot_product(point, &frust.normal) > frust.dist {
                front = true;
                if back {
                    break; // this plane is already known to clip
                }
            } else {
                back = true;
            }
        }
        if !front {
            // all points were behind one of the planes
            return CullResult::Out;
        }
        any_back |= back;
    }

    if !any_back {
        return CullResult::In; // completely inside frustum
    }
    CullResult::Clip // partially clipped
}

/// Classifies a world-space bounding sphere against the frustum.
pub fn cull_point_and_radius(
    point: &Vec3,
    radius: f32,
    frustum: &[CPlane; 4],
    nocull: bool,
) -> CullResult {
    if nocull {
        return CullResult::Clip;
    }

    let mut might_be_clipped = false;
    for frust in frustum {
        let dist = dot_product(point, &frust.normal) - frust.dist;
        if dist < -radius {
            return CullResult::Out;
        } else if dist <= radius {
            might_be_clipped = true;
        }
    }

    if might_be_clipped {
        return CullResult::Clip;
    }
    CullResult::In // completely inside frustum
}

/// Sphere culling for a center given in an orientation's local space.
pub fn cull_local_point_and_radius(
    point: &Vec3,
    radius: f32,
    or: &OrientationR,
    frustum: &[CPlane; 4],
    nocull: bool,
) -> CullResult {
    let transformed = local_point_to_world(point, or);
    cull_point_and_radius(&transformed, radius, frustum, nocull)
}

/// Classifies a world-axis-aligned box using the signbits fast path.
pub fn cull_box(mins: &Vec3, maxs: &Vec3, frustum: &[CPlane; 4], nocull: bool) -> CullResult {
    if nocull {
        return CullResult::Clip;
    }

    let mut any_crossing = false;
    for frust in frustum {
        match box_on_plane_side(mins, maxs, frust) {
            2 => return CullResult::Out,
            3 => any_crossing = true,
            _ => {}
        }
    }

    if any_crossing {
        return CullResult::Clip;
    }
    CullResult::In
}

/// Classifies a batch of world-space bounds against one frozen frustum.
/// Each test is independent, so the batch is partitioned across the
/// rayon pool.
pub fn cull_bounds_list(
    bounds_list: &[[Vec3; 2]],
    frustum: &[CPlane; 4],
    nocull: bool,
) -> Vec<CullResult> {
    bounds_list
        .par_iter()
        .map(|b| cull_box(&b[0], &b[1], frustum, nocull))
        .collect()
}

// ============================================================
// Surface planes (portal/mirror orientation derivation)
// ============================================================

const X_AXIS_PLANE: CPlane = CPlane {
    normal: [1.0, 0.0, 0.0],
    dist: 0.0,
    plane_type: PLANE_X,
    signbits: 0,
};

/// Derives a plane from a surface's geometry: faces carry one, triangle
/// and polygon surfaces take it from the first three vertices in winding
/// order. Unplanable surfaces get the +X fallback.
pub fn plane_for_surface(surface: &Surface) -> CPlane {
    match surface {
        Surface::Face { plane } => *plane,
        Surface::Triangles { verts, indexes } => {
            let v1 = &verts[indexes[0] as usize];
            let v2 = &verts[indexes[1] as usize];
            let v3 = &verts[indexes[2] as usize];
            plane_from_points(v1, v2, v3).unwrap_or(X_AXIS_PLANE)
        }
        Surface::Poly { verts } => {
            plane_from_points(&verts[0], &verts[1], &verts[2]).unwrap_or(X_AXIS_PLANE)
        }
        Surface::Bad => X_AXIS_PLANE,
    }
}

/// Planes for portal/mirror matching: the entity-local plane with its
/// distance pushed to the entity origin, and the same plane rotated into
/// world space. World surfaces (`entity_or == None`) use the surface
/// plane unchanged for both.
pub fn portal_plane_for_surface(
    surface: &Surface,
    entity_or: Option<&OrientationR>,
) -> (CPlane, CPlane) {
    let original = plane_for_surface(surface);
    match entity_or {
        None => (original, original),
        Some(or) => {
            // rotate the plane, but keep the non-rotated version for
            // matching against the portal surface entities
            let normal = local_normal_to_world(&original.normal, or);
            let world = CPlane::new(normal, original.dist + dot_product(&normal, &or.origin));

            // translate the original plane
            let original = CPlane {
                dist: original.dist + dot_product(&original.normal, &or.origin),
                ..original
            };
            (original, world)
        }
    }
}

/// Front/back test: does the surface plane face toward the point?
pub fn surface_in_front_of_point(plane: &CPlane, point: &Vec3) -> bool {
    dot_product(point, &plane.normal) - plane.dist > 0.0
}

// ============================================================
// Clip / window transforms
// ============================================================

/// Homogeneous point through model then projection. The eye-space result
/// is returned as well for depth-dependent effects.
pub fn transform_model_to_clip(
    src: &Vec3,
    model_matrix: &Mat4,
    projection_matrix: &Mat4,
) -> (Vec4, Vec4) {
    let mut eye = [0.0f32; 4];
    for i in 0..4 {
        eye[i] = src[0] * model_matrix[i]
            + src[1] * model_matrix[4 + i]
            + src[2] * model_matrix[8 + i]
            + model_matrix[12 + i];
    }

    let mut dst = [0.0f32; 4];
    for i in 0..4 {
        dst[i] = eye[0] * projection_matrix[i]
            + eye[1] * projection_matrix[4 + i]
            + eye[2] * projection_matrix[8 + i]
            + eye[3] * projection_matrix[12 + i];
    }
    (eye, dst)
}

/// Perspective divide and viewport mapping. `clip.w == 0` is a caller
/// precondition violation; near-plane points must be excluded upstream.
pub fn transform_clip_to_window(clip: &Vec4, view: &ViewParms) -> (Vec4, Vec4) {
    let normalized = [
        clip[0] / clip[3],
        clip[1] / clip[3],
        (clip[2] + clip[3]) / (2.0 * clip[3]),
        0.0,
    ];

    let window = [
        (0.5 * (1.0 + normalized[0]) * view.viewport_width as f32 + 0.5).floor(),
        (0.5 * (1.0 + normalized[1]) * view.viewport_height as f32 + 0.5).floor(),
        normalized[2],
        0.0,
    ];
    (normalized, window)
}

// ============================================================
// Per-view setup
// ============================================================

/// Builds the frozen per-view state from the scene's camera parameters:
/// camera basis from the view angles, viewer/world orientation,
/// projection matrix with dynamic far clip, and the four-plane frustum.
pub fn setup_frame(refdef: &RefDef, options: &RenderOptions) -> ViewParms {
    let axis = angles_to_axis(&refdef.viewangles);

    let mut view = ViewParms {
        or: OrientationR {
            origin: refdef.vieworg,
            axis,
            view_origin: refdef.vieworg,
            model_matrix: MAT4_IDENTITY,
        },
        viewport_x: refdef.x,
        viewport_y: refdef.y,
        viewport_width: refdef.width,
        viewport_height: refdef.height,
        fov_x: refdef.fov_x,
        fov_y: refdef.fov_y,
        vis_bounds: refdef.vis_bounds,
        ..Default::default()
    };

    view.world = rotate_for_viewer(&refdef.vieworg, &axis);
    let (projection, z_far) = setup_projection(options.znear, refdef.rdflags, &view);
    view.projection_matrix = projection;
    view.z_far = z_far;
    view.frustum = setup_frustum(&view);

    debug!(
        "view at ({:.1} {:.1} {:.1}), fov {}x{}, zFar {:.1}",
        refdef.vieworg[0], refdef.vieworg[1], refdef.vieworg[2],
        view.fov_x, view.fov_y, view.z_far
    );
    view
}

// ============================================================
// Tests
// ============================================================
