//! Scene graph for a single card: camera, plane mesh, lights.

use glam::{EulerRot, Mat4, Vec2, Vec3};

/// Card proportions (playing-card like, 5:7).
pub const CARD_WIDTH: f32 = 2.5;
pub const CARD_HEIGHT: f32 = 3.5;

/// Floats per interleaved vertex: position xyz + uv.
pub const VERTEX_STRIDE: usize = 5;

/// Two counter-clockwise triangles over the four plane corners.
pub const INDICES: [u16; 6] = [0, 2, 1, 2, 3, 1];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Camera {
    pub fn perspective(fov_y_degrees: f32, aspect: f32, distance: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, distance),
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    /// Aspect ratio of a `width` x `height` viewport; 1.0 for degenerate sizes.
    pub fn aspect_of(width: u32, height: u32) -> f32 {
        if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }
}

/// The card plane, centered on the origin in the XY plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CardMesh {
    pub width: f32,
    pub height: f32,
    /// Rotation about X and Y, radians.
    pub rotation: Vec2,
}

impl Default for CardMesh {
    fn default() -> Self {
        Self {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            rotation: Vec2::ZERO,
        }
    }
}

impl CardMesh {
    pub fn model(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    /// Interleaved `[x, y, z, u, v]` corners: top-left, top-right,
    /// bottom-left, bottom-right. UV (0,0) is the bottom-left corner.
    pub fn vertices(&self) -> [f32; 4 * VERTEX_STRIDE] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        #[rustfmt::skip]
        let v = [
            -hw,  hh, 0.0, 0.0, 1.0,
             hw,  hh, 0.0, 1.0, 1.0,
            -hw, -hh, 0.0, 0.0, 0.0,
             hw, -hh, 0.0, 1.0, 0.0,
        ];
        v
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Light {
    Ambient { color: Vec3, intensity: f32 },
    Directional { color: Vec3, intensity: f32, position: Vec3 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub card: CardMesh,
    /// The holographic program is unlit; lights are carried for materials
    /// that read them.
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn card(fov_y_degrees: f32, camera_distance: f32, width: u32, height: u32) -> Self {
        Self {
            camera: Camera::perspective(fov_y_degrees, Camera::aspect_of(width, height), camera_distance),
            card: CardMesh::default(),
            lights: vec![
                Light::Ambient {
                    color: Vec3::ONE,
                    intensity: 0.6,
                },
                Light::Directional {
                    color: Vec3::ONE,
                    intensity: 0.4,
                    position: Vec3::new(5.0, 5.0, 5.0),
                },
            ],
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.aspect = Camera::aspect_of(width, height);
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.camera.projection() * self.camera.view() * self.card.model()
    }
}
