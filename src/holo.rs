//! CPU mirror of the holographic fragment program.
//!
//! Every function here matches one line of `shader::HOLO_FRAGMENT`; `shade`
//! composes them exactly as the GPU does for a single pixel.

use glam::{Vec2, Vec3, Vec4};

/// Neutral card color the hologram is blended over.
pub const BASE_COLOR: Vec3 = Vec3::new(0.95, 0.96, 1.0);

/// Blend floor: hologram share far away from the pointer.
pub const BLEND_FLOOR: f32 = 0.3;
/// Extra hologram share right under the pointer.
pub const BLEND_BOOST: f32 = 0.4;

/// Splits `0xRRGGBB` into RGB components in `[0,1]`.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// The three colors mixed into the holographic field.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HoloPalette {
    pub color_a: Vec3,
    pub color_b: Vec3,
    pub color_c: Vec3,
}

impl Default for HoloPalette {
    fn default() -> Self {
        Self {
            color_a: rgb_hex(0x3b82f6), // blue
            color_b: rgb_hex(0x8b5cf6), // purple
            color_c: rgb_hex(0x06b6d4), // cyan
        }
    }
}

pub fn wave1(uv: Vec2, t: f32) -> f32 {
    (uv.x * 10.0 + t * 2.0).sin() * 0.5 + 0.5
}

pub fn wave2(uv: Vec2, t: f32) -> f32 {
    (uv.y * 8.0 + t * 1.5).sin() * 0.5 + 0.5
}

/// Maps a pointer in `[0,1]^2` to `[-1,1]^2`.
pub fn mouse_influence(pointer: Vec2) -> Vec2 {
    (pointer - 0.5) * 2.0
}

/// Radial falloff around the pointer's projected location, in `[0,1]`.
pub fn mouse_effect(pointer: Vec2, uv: Vec2) -> f32 {
    let dist = (mouse_influence(pointer) - uv).length() * 2.0;
    1.0 - dist.clamp(0.0, 1.0)
}

/// Hologram share of the final color; always within `[0.3, 0.7]`.
pub fn blend_weight(effect: f32) -> f32 {
    BLEND_FLOOR + effect * BLEND_BOOST
}

/// Multiplicative metallic grain in `[0.8, 1.0]`.
pub fn shimmer(uv: Vec2, t: f32) -> f32 {
    (uv.x * 20.0 + uv.y * 15.0 + t * 3.0).sin() * 0.1 + 0.9
}

pub fn hologram(uv: Vec2, t: f32, palette: &HoloPalette) -> Vec3 {
    let h = palette.color_a.lerp(palette.color_b, wave1(uv, t));
    h.lerp(palette.color_c, wave2(uv, t))
}

/// Opaque color of the surface point `uv` at time `t`.
pub fn shade(uv: Vec2, t: f32, pointer: Vec2, palette: &HoloPalette) -> Vec4 {
    let weight = blend_weight(mouse_effect(pointer, uv));
    let color = BASE_COLOR.lerp(hologram(uv, t, palette), weight) * shimmer(uv, t);
    color.extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_decode() {
        assert_eq!(rgb_hex(0xff0000), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(rgb_hex(0x000000), Vec3::ZERO);
        let c = rgb_hex(0x3b82f6);
        assert!((c.x - 59.0 / 255.0).abs() < 1e-6);
        assert!((c.y - 130.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 246.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn waves_stay_in_unit_range() {
        for i in 0..=20 {
            for step in 0..50 {
                let uv = Vec2::splat(i as f32 / 20.0);
                let t = step as f32 * 0.37;
                assert!((0.0..=1.0).contains(&wave1(uv, t)));
                assert!((0.0..=1.0).contains(&wave2(uv, t)));
            }
        }
    }

    #[test]
    fn shaded_output_is_opaque() {
        let c = shade(Vec2::new(0.3, 0.7), 4.2, Vec2::new(0.1, 0.9), &HoloPalette::default());
        assert_eq!(c.w, 1.0);
    }
}
