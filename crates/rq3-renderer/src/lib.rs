#![allow(clippy::needless_range_loop)]

pub mod tr_local;
pub mod tr_main;
pub mod tr_types;

pub use tr_local::{CullResult, OrientationR, RenderOptions, Surface, ViewParms};
pub use tr_types::{RefDef, RefEntity, RefEntityType};
