// q_shared.rs — foundational math types and functions shared by all modules

// ============================================================
// Basic types
// ============================================================

pub type Vec3 = [f32; 3];
pub type Vec4 = [f32; 4];

/// 4x4 matrix, 16 floats in the fixed layout used by the whole pipeline:
/// element (row i, col j) lives at index i*4 + j, and points transform as
/// row vectors. Construction and multiplication sites must agree on this.
pub type Mat4 = [f32; 16];

pub const VEC3_ORIGIN: Vec3 = [0.0, 0.0, 0.0];

pub const MAT4_IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

pub const MAT4_ZERO: Mat4 = [0.0; 16];

// Angle indexes
pub const PITCH: usize = 0; // up / down
pub const YAW: usize = 1; // left / right
pub const ROLL: usize = 2; // fall over

// ============================================================
// Refdef flags
// ============================================================

bitflags::bitflags! {
    /// rdflags — per-view render flags from the scene builder.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RdFlags: u32 {
        /// Used for player configuration screens: no world model is
        /// present, so visibility bounds are meaningless.
        const NOWORLDMODEL = 0x01;
        /// Teleportation effect in progress.
        const HYPERSPACE = 0x04;
    }
}

// ============================================================
// MATHLIB — Vector operations
// ============================================================

#[inline]
pub fn dot_product(a: &Vec3, b: &Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn vector_subtract(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn vector_add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn vector_scale(v: &Vec3, scale: f32) -> Vec3 {
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

/// veca + scale * vecb
#[inline]
pub fn vector_ma(veca: &Vec3, scale: f32, vecb: &Vec3) -> Vec3 {
    [
        veca[0] + scale * vecb[0],
        veca[1] + scale * vecb[1],
        veca[2] + scale * vecb[2],
    ]
}

#[inline]
pub fn vector_length_squared(v: &Vec3) -> f32 {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}

#[inline]
pub fn vector_length(v: &Vec3) -> f32 {
    vector_length_squared(v).sqrt()
}

pub fn vector_compare(v1: &Vec3, v2: &Vec3) -> bool {
    v1[0] == v2[0] && v1[1] == v2[1] && v1[2] == v2[2]
}

/// Normalize in place, returns original length.
pub fn vector_normalize(v: &mut Vec3) -> f32 {
    let length = vector_length(v);
    if length != 0.0 {
        let ilength = 1.0 / length;
        v[0] *= ilength;
        v[1] *= ilength;
        v[2] *= ilength;
    }
    length
}

pub fn cross_product(v1: &Vec3, v2: &Vec3) -> Vec3 {
    [
        v1[1] * v2[2] - v1[2] * v2[1],
        v1[2] * v2[0] - v1[0] * v2[2],
        v1[0] * v2[1] - v1[1] * v2[0],
    ]
}

// ============================================================
// Matrix operations
// ============================================================

/// out = a * b, both in the pipeline's row-major i*4+j layout.
pub fn matrix_multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = MAT4_ZERO;
    for i in 0..4 {
        for j in 0..4 {
            out[i * 4 + j] = a[i * 4] * b[j]
                + a[i * 4 + 1] * b[4 + j]
                + a[i * 4 + 2] * b[8 + j]
                + a[i * 4 + 3] * b[12 + j];
        }
    }
    out
}

// ============================================================
// Angle functions
// ============================================================

/// Derive the forward/right/up basis from Euler view angles (degrees).
pub fn angle_vectors(angles: &Vec3) -> (Vec3, Vec3, Vec3) {
    let angle_yaw = angles[YAW].to_radians();
    let sy = angle_yaw.sin();
    let cy = angle_yaw.cos();

    let angle_pitch = angles[PITCH].to_radians();
    let sp = angle_pitch.sin();
    let cp = angle_pitch.cos();

    let angle_roll = angles[ROLL].to_radians();
    let sr = angle_roll.sin();
    let cr = angle_roll.cos();

    let forward = [cp * cy, cp * sy, -sp];
    let right = [
        -sr * sp * cy + -cr * -sy,
        -sr * sp * sy + -cr * cy,
        -sr * cp,
    ];
    let up = [
        cr * sp * cy + -sr * -sy,
        cr * sp * sy + -sr * cy,
        cr * cp,
    ];
    (forward, right, up)
}

/// Euler angles to a local basis. Row 1 is the *left* vector, not right:
/// the whole pipeline treats axis rows as a right-handed x/y/z basis.
pub fn angles_to_axis(angles: &Vec3) -> [Vec3; 3] {
    let (forward, right, up) = angle_vectors(angles);
    [forward, vector_subtract(&VEC3_ORIGIN, &right), up]
}

// ============================================================
// Plane
// ============================================================

pub const PLANE_X: u8 = 0;
pub const PLANE_Y: u8 = 1;
pub const PLANE_Z: u8 = 2;
pub const PLANE_NON_AXIAL: u8 = 3;

/// cplane_t — plane in normal/distance form. For any point P on the plane,
/// dot(normal, P) == dist. `plane_type` enables the axial fast path in
/// box_on_plane_side; `signbits` selects the nearest/farthest box corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CPlane {
    pub normal: Vec3,
    pub dist: f32,
    pub plane_type: u8,
    pub signbits: u8,
}

impl Default for CPlane {
    fn default() -> Self {
        Self {
            normal: VEC3_ORIGIN,
            dist: 0.0,
            plane_type: PLANE_X,
            signbits: 0,
        }
    }
}

impl CPlane {
    /// Build a plane from normal and distance, classifying type and signbits.
    pub fn new(normal: Vec3, dist: f32) -> Self {
        let mut plane = Self {
            normal,
            dist,
            plane_type: plane_type_for_normal(&normal),
            signbits: 0,
        };
        plane.signbits = signbits_for_plane(&plane);
        plane
    }
}

pub fn plane_type_for_normal(normal: &Vec3) -> u8 {
    if normal[0] == 1.0 {
        PLANE_X
    } else if normal[1] == 1.0 {
        PLANE_Y
    } else if normal[2] == 1.0 {
        PLANE_Z
    } else {
        PLANE_NON_AXIAL
    }
}

pub fn signbits_for_plane(plane: &CPlane) -> u8 {
    let mut bits = 0u8;
    for j in 0..3 {
        if plane.normal[j] < 0.0 {
            bits |= 1 << j;
        }
    }
    bits
}

/// Plane through three points in winding order. Returns `None` when the
/// points are collinear (zero-length cross product).
pub fn plane_from_points(a: &Vec3, b: &Vec3, c: &Vec3) -> Option<CPlane> {
    let d1 = vector_subtract(b, a);
    let d2 = vector_subtract(c, a);
    let mut normal = cross_product(&d2, &d1);
    if vector_normalize(&mut normal) == 0.0 {
        return None;
    }
    let dist = dot_product(a, &normal);
    Some(CPlane::new(normal, dist))
}

/// Returns 1 (front), 2 (back), or 3 (crossing) for a box vs. plane test.
pub fn box_on_plane_side(emins: &Vec3, emaxs: &Vec3, p: &CPlane) -> i32 {
    // fast axial cases
    if (p.plane_type as usize) < 3 {
        let t = p.plane_type as usize;
        if p.dist <= emins[t] {
            return 1;
        }
        if p.dist >= emaxs[t] {
            return 2;
        }
        return 3;
    }

    // general case: signbits pick the corner nearest/farthest along the normal
    let (dist1, dist2) = match p.signbits {
        0 => (
            p.normal[0] * emaxs[0] + p.normal[1] * emaxs[1] + p.normal[2] * emaxs[2],
            p.normal[0] * emins[0] + p.normal[1] * emins[1] + p.normal[2] * emins[2],
        ),
        1 => (
            p.normal[0] * emins[0] + p.normal[1] * emaxs[1] + p.normal[2] * emaxs[2],
            p.normal[0] * emaxs[0] + p.normal[1] * emins[1] + p.normal[2] * emins[2],
        ),
        2 => (
            p.normal[0] * emaxs[0] + p.normal[1] * emins[1] + p.normal[2] * emaxs[2],
            p.normal[0] * emins[0] + p.normal[1] * emaxs[1] + p.normal[2] * emins[2],
        ),
        3 => (
            p.normal[0] * emins[0] + p.normal[1] * emins[1] + p.normal[2] * emaxs[2],
            p.normal[0] * emaxs[0] + p.normal[1] * emaxs[1] + p.normal[2] * emins[2],
        ),
        4 => (
            p.normal[0] * emaxs[0] + p.normal[1] * emaxs[1] + p.normal[2] * emins[2],
            p.normal[0] * emins[0] + p.normal[1] * emins[1] + p.normal[2] * emaxs[2],
        ),
        5 => (
            p.normal[0] * emins[0] + p.normal[1] * emaxs[1] + p.normal[2] * emins[2],
            p.normal[0] * emaxs[0] + p.normal[1] * emins[1] + p.normal[2] * emaxs[2],
        ),
        6 => (
            p.normal[0] * emaxs[0] + p.normal[1] * emins[1] + p.normal[2] * emins[2],
            p.normal[0] * emins[0] + p.normal[1] * emaxs[1] + p.normal[2] * emaxs[2],
        ),
        7 => (
            p.normal[0] * emins[0] + p.normal[1] * emins[1] + p.normal[2] * emins[2],
            p.normal[0] * emaxs[0] + p.normal[1] * emaxs[1] + p.normal[2] * emaxs[2],
        ),
        _ => (0.0, 0.0),
    };

    let mut sides = 0;
    if dist1 >= p.dist {
        sides = 1;
    }
    if dist2 < p.dist {
        sides |= 2;
    }
    sides
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert_eq!(dot_product(&a, &b), 32.0);
    }

    #[test]
    fn test_vector_add_subtract() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert!(vector_compare(&vector_add(&a, &b), &[5.0, 7.0, 9.0]));
        assert!(vector_compare(&vector_subtract(&b, &a), &[3.0, 3.0, 3.0]));
    }

    #[test]
    fn test_vector_ma() {
        let a = [1.0, 1.0, 1.0];
        let b = [2.0, 0.0, -2.0];
        assert_eq!(vector_ma(&a, 0.5, &b), [2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_vector_normalize() {
        let mut v = [3.0, 0.0, 4.0];
        let len = vector_normalize(&mut v);
        assert!((len - 5.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[2] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_vector_normalize_zero() {
        let mut v = [0.0, 0.0, 0.0];
        assert_eq!(vector_normalize(&mut v), 0.0);
        assert_eq!(v, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cross_product() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        assert_eq!(cross_product(&a, &b), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_matrix_multiply_identity() {
        let m = [
            1.0, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
            9.0, 10.0, 11.0, 12.0,
            13.0, 14.0, 15.0, 16.0,
        ];
        assert_eq!(matrix_multiply(&m, &MAT4_IDENTITY), m);
        assert_eq!(matrix_multiply(&MAT4_IDENTITY, &m), m);
    }

    #[test]
    fn test_matrix_multiply_translation_order() {
        // translate by (1,0,0) then scale x by 2
        let t = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            1.0, 0.0, 0.0, 1.0,
        ];
        let s = [
            2.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let m = matrix_multiply(&t, &s);
        // row vector (0,0,0,1) * m = (2,0,0,1)
        assert_eq!(m[12], 2.0);
    }

    #[test]
    fn test_angle_vectors_yaw() {
        let (forward, right, up) = angle_vectors(&[0.0, 90.0, 0.0]);
        assert!((forward[0]).abs() < 1e-6);
        assert!((forward[1] - 1.0).abs() < 1e-6);
        assert!((right[0] - 1.0).abs() < 1e-6);
        assert!((up[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_plane_type_classification() {
        assert_eq!(plane_type_for_normal(&[1.0, 0.0, 0.0]), PLANE_X);
        assert_eq!(plane_type_for_normal(&[0.0, 0.0, 1.0]), PLANE_Z);
        assert_eq!(plane_type_for_normal(&[0.7, 0.7, 0.0]), PLANE_NON_AXIAL);
        // negative axial normals are not fast-path planes
        assert_eq!(plane_type_for_normal(&[-1.0, 0.0, 0.0]), PLANE_NON_AXIAL);
    }

    #[test]
    fn test_signbits() {
        let plane = CPlane::new([-0.5, 0.5, -0.5], 0.0);
        assert_eq!(plane.signbits, 0b101);
    }

    #[test]
    fn test_plane_from_points() {
        // clockwise winding viewed from above, normal faces +z
        let plane = plane_from_points(&[0.0, 0.0, 5.0], &[0.0, 1.0, 5.0], &[1.0, 0.0, 5.0])
            .unwrap();
        assert!((plane.normal[2] - 1.0).abs() < 1e-6);
        assert!((plane.dist - 5.0).abs() < 1e-6);
        assert_eq!(plane.plane_type, PLANE_Z);
    }

    #[test]
    fn test_plane_from_points_degenerate() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 1.0, 1.0];
        let c = [2.0, 2.0, 2.0];
        assert!(plane_from_points(&a, &b, &c).is_none());
    }

    #[test]
    fn test_box_on_plane_side_axial() {
        let mins = [-1.0, -1.0, -1.0];
        let maxs = [1.0, 1.0, 1.0];
        let behind = CPlane::new([1.0, 0.0, 0.0], 5.0);
        assert_eq!(box_on_plane_side(&mins, &maxs, &behind), 2);
        let front = CPlane::new([1.0, 0.0, 0.0], -5.0);
        assert_eq!(box_on_plane_side(&mins, &maxs, &front), 1);
        let crossing = CPlane::new([1.0, 0.0, 0.0], 0.0);
        assert_eq!(box_on_plane_side(&mins, &maxs, &crossing), 3);
    }

    #[test]
    fn test_box_on_plane_side_non_axial() {
        let mins = [-1.0, -1.0, -1.0];
        let maxs = [1.0, 1.0, 1.0];
        let mut n = [1.0, 1.0, 1.0];
        vector_normalize(&mut n);
        assert_eq!(box_on_plane_side(&mins, &maxs, &CPlane::new(n, 10.0)), 2);
        assert_eq!(box_on_plane_side(&mins, &maxs, &CPlane::new(n, -10.0)), 1);
        assert_eq!(box_on_plane_side(&mins, &maxs, &CPlane::new(n, 0.0)), 3);
        // negative normal exercises the mirrored signbits rows
        let mut neg = [-1.0, -1.0, -1.0];
        vector_normalize(&mut neg);
        assert_eq!(box_on_plane_side(&mins, &maxs, &CPlane::new(neg, 10.0)), 2);
    }
}
