//! Embedded WGSL sources.
//!
//! Each source holds both a `vs_main` and an `fs_main` entry point; the
//! material builders compile one module per stage so each stage handle
//! can be released independently.

/// Unlit: texture times base color.
pub const BASIC: &str = include_str!("shaders/basic.wgsl");

/// Blinn-Phong: ambient plus per-light diffuse and specular.
pub const PHONG: &str = include_str!("shaders/phong.wgsl");

/// Screen-space quads, pixel coordinates to NDC.
pub const OVERLAY: &str = include_str!("shaders/overlay.wgsl");
