use crate::clock::TimeStep;
use crate::error::ConfigError;
use crate::holo::HoloPalette;
use crate::pointer::TILT_GAIN;

/// Construction parameters for a card render surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub palette: HoloPalette,
    /// Upper bound on device pixel ratio used for the backing store.
    pub pixel_ratio_cap: f64,
    pub time_step: TimeStep,
    pub tilt_gain: f32,
    pub fov_degrees: f32,
    pub camera_distance: f32,
    /// Re-derive canvas size, camera aspect and `resolution` on window resize.
    pub track_resize: bool,
    /// RGBA clear color; transparent so the page shows around the card.
    pub clear_color: [f32; 4],
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            palette: HoloPalette::default(),
            pixel_ratio_cap: 2.0,
            time_step: TimeStep::default(),
            tilt_gain: TILT_GAIN,
            fov_degrees: 75.0,
            camera_distance: 3.0,
            track_resize: true,
            clear_color: [0.0; 4],
        }
    }
}

impl SurfaceConfig {
    pub fn with_palette(mut self, palette: HoloPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_pixel_ratio_cap(mut self, cap: f64) -> Self {
        self.pixel_ratio_cap = cap;
        self
    }

    pub fn with_time_step(mut self, step: TimeStep) -> Self {
        self.time_step = step;
        self
    }

    pub fn with_tilt_gain(mut self, gain: f32) -> Self {
        self.tilt_gain = gain;
        self
    }

    pub fn with_track_resize(mut self, track: bool) -> Self {
        self.track_resize = track;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pixel_ratio_cap.is_finite() && self.pixel_ratio_cap > 0.0) {
            return Err(ConfigError::PixelRatioCap(self.pixel_ratio_cap));
        }
        let step = match self.time_step {
            TimeStep::Fixed(step) => step,
            TimeStep::Scaled { rate } => rate,
        };
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigError::TimeStep(step));
        }
        if !self.tilt_gain.is_finite() {
            return Err(ConfigError::TiltGain(self.tilt_gain));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_degrees));
        }
        if !(self.camera_distance.is_finite() && self.camera_distance > 0.0) {
            return Err(ConfigError::CameraDistance(self.camera_distance));
        }
        Ok(())
    }

    /// Device pixel ratio after applying the cap.
    pub fn effective_pixel_ratio(&self, device_ratio: f64) -> f64 {
        device_ratio.min(self.pixel_ratio_cap)
    }

    /// Backing-store size for a host of `css_width` x `css_height` pixels.
    pub fn backing_size(&self, css_width: u32, css_height: u32, device_ratio: f64) -> (u32, u32) {
        let ratio = self.effective_pixel_ratio(device_ratio);
        (
            (css_width as f64 * ratio).round() as u32,
            (css_height as f64 * ratio).round() as u32,
        )
    }
}
