use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

/// Radians of tilt per unit of pointer offset from the center.
pub const TILT_GAIN: f32 = 0.3;

/// Bounding box of the host element in client coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Normalizes a client-space pointer position into the rect, with `y`
/// flipped so 0 is the bottom edge. Not clamped.
pub fn normalize(client_x: f64, client_y: f64, rect: &ClientRect) -> Vec2 {
    let x = (client_x - rect.left) / rect.width;
    let y = 1.0 - (client_y - rect.top) / rect.height;
    Vec2::new(x as f32, y as f32)
}

/// Plane rotation `(x, y)` in radians for a normalized pointer.
pub fn tilt(pointer: Vec2, gain: f32) -> Vec2 {
    Vec2::new((pointer.y - 0.5) * gain, (pointer.x - 0.5) * gain)
}

/// Single-slot mailbox between the pointer handler and the render step.
///
/// Writes overwrite any sample not yet taken; only the latest position
/// matters.
#[derive(Debug, Clone, Default)]
pub struct PointerCell {
    slot: Rc<Cell<Option<Vec2>>>,
}

impl PointerCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, pointer: Vec2) {
        self.slot.set(Some(pointer));
    }

    pub fn take(&self) -> Option<Vec2> {
        self.slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let cell = PointerCell::new();
        let writer = cell.clone();
        assert_eq!(cell.take(), None);

        writer.push(Vec2::new(0.1, 0.2));
        writer.push(Vec2::new(0.7, 0.4));
        assert_eq!(cell.take(), Some(Vec2::new(0.7, 0.4)));
        assert_eq!(cell.take(), None);
    }

    #[test]
    fn normalize_flips_y() {
        let rect = ClientRect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 400.0,
        };
        assert_eq!(normalize(100.0, 50.0, &rect), Vec2::new(0.0, 1.0));
        assert_eq!(normalize(300.0, 450.0, &rect), Vec2::new(1.0, 0.0));
        assert_eq!(normalize(200.0, 350.0, &rect), Vec2::new(0.5, 0.25));
    }
}
