//! GPU-independent half of a card render surface.
//!
//! [`CardModel`] owns everything a frame needs except the WebGL objects:
//! clock, pointer and rotation state, scene matrices, and the uniform
//! values to upload. The browser surface drives it once per animation frame.

use glam::Vec2;

use crate::clock::FrameClock;
use crate::config::SurfaceConfig;
use crate::error::{ProgramError, SurfaceError};
use crate::pointer;
use crate::scene::Scene;
use crate::shader::{self, ProgramDescriptor, UniformValue, Uniforms};

/// Per-instance render state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderState {
    pub elapsed_time: f64,
    /// Normalized pointer, `y` up. `(0,0)` until the first pointer sample.
    pub pointer: Vec2,
    /// Backing-store size in device pixels.
    pub viewport: (u32, u32),
    /// Plane rotation about X and Y, radians.
    pub rotation: Vec2,
}

#[derive(Debug, Clone)]
pub struct CardModel {
    state: RenderState,
    clock: FrameClock,
    scene: Scene,
    program: ProgramDescriptor,
    uniforms: Uniforms,
    tilt_gain: f32,
}

impl CardModel {
    pub fn new(config: &SurfaceConfig, width: u32, height: u32) -> Result<Self, SurfaceError> {
        config.validate()?;
        let program = ProgramDescriptor::holographic(&config.palette, width, height);
        program.validate()?;
        let uniforms = Uniforms::from_descriptor(&program);

        let mut model = Self {
            state: RenderState {
                elapsed_time: 0.0,
                pointer: Vec2::ZERO,
                viewport: (width, height),
                rotation: Vec2::ZERO,
            },
            clock: FrameClock::new(config.time_step),
            scene: Scene::card(config.fov_degrees, config.camera_distance, width, height),
            program,
            uniforms,
            tilt_gain: config.tilt_gain,
        };
        model.sync_mvp()?;
        Ok(model)
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn program(&self) -> &ProgramDescriptor {
        &self.program
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    /// Applies a pointer sample: feeds the `mouse` uniform and snaps the
    /// card rotation toward it.
    pub fn apply_pointer(&mut self, p: Vec2) -> Result<(), ProgramError> {
        self.state.pointer = p;
        self.state.rotation = pointer::tilt(p, self.tilt_gain);
        self.scene.card.rotation = self.state.rotation;
        self.uniforms.set(shader::U_MOUSE, UniformValue::Vec2(p))?;
        self.sync_mvp()
    }

    /// Updates viewport, camera aspect and `resolution` together.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ProgramError> {
        self.state.viewport = (width, height);
        self.scene.set_viewport(width, height);
        self.uniforms.set(
            shader::U_RESOLUTION,
            UniformValue::Vec2(Vec2::new(width as f32, height as f32)),
        )?;
        self.sync_mvp()
    }

    /// One animation frame: advances time and applies the latest pointer
    /// sample, if one arrived since the previous frame.
    pub fn step(&mut self, now_ms: f64, sample: Option<Vec2>) -> Result<(), ProgramError> {
        if let Some(p) = sample {
            self.apply_pointer(p)?;
        }
        self.state.elapsed_time = self.clock.tick(now_ms);
        self.uniforms
            .set(shader::U_TIME, UniformValue::Float(self.state.elapsed_time as f32))
    }

    pub fn frame_index(&self) -> u64 {
        self.clock.frame_index()
    }

    fn sync_mvp(&mut self) -> Result<(), ProgramError> {
        let mvp = self.scene.model_view_projection();
        self.uniforms.set(shader::U_MVP, UniformValue::Mat4(mvp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> CardModel {
        CardModel::new(&SurfaceConfig::default(), 500, 700).unwrap()
    }

    #[test]
    fn starts_untilted_with_pointer_at_origin() {
        let m = model();
        assert_eq!(m.state().pointer, Vec2::ZERO);
        assert_eq!(m.state().rotation, Vec2::ZERO);
        assert_eq!(m.uniforms().get(shader::U_MOUSE), Some(UniformValue::Vec2(Vec2::ZERO)));
    }

    #[test]
    fn pointer_sample_updates_uniform_rotation_and_mvp() {
        let mut m = model();
        let before = m.uniforms().get(shader::U_MVP);
        m.step(16.0, Some(Vec2::new(1.0, 0.5))).unwrap();
        assert_eq!(m.state().rotation, Vec2::new(0.0, 0.15));
        assert_eq!(m.scene().card.rotation, Vec2::new(0.0, 0.15));
        assert_eq!(m.uniforms().get(shader::U_MOUSE), Some(UniformValue::Vec2(Vec2::new(1.0, 0.5))));
        assert_ne!(m.uniforms().get(shader::U_MVP), before);
    }

    #[test]
    fn rotation_persists_without_new_samples() {
        let mut m = model();
        m.step(0.0, Some(Vec2::new(0.0, 1.0))).unwrap();
        m.step(16.0, None).unwrap();
        assert_eq!(m.state().pointer, Vec2::new(0.0, 1.0));
        assert!((m.state().rotation - Vec2::new(0.15, -0.15)).length() < 1e-6);
    }

    #[test]
    fn resize_updates_everything_together() {
        let mut m = model();
        m.resize(800, 400).unwrap();
        assert_eq!(m.state().viewport, (800, 400));
        assert_eq!(m.scene().camera.aspect, 2.0);
        assert_eq!(
            m.uniforms().get(shader::U_RESOLUTION),
            Some(UniformValue::Vec2(Vec2::new(800.0, 400.0)))
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = SurfaceConfig::default().with_pixel_ratio_cap(-1.0);
        assert!(matches!(
            CardModel::new(&cfg, 10, 10),
            Err(SurfaceError::Config(_))
        ));
    }
}
