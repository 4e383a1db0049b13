use glam::Vec2;
use holocard::clock::{FrameClock, TimeStep};
use holocard::holo::{self, HoloPalette};
use holocard::pointer::{tilt, TILT_GAIN};
use holocard::{CardModel, SurfaceConfig};

fn approx_eq2(a: Vec2, b: Vec2, eps: f32) -> bool {
    (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
}

fn grid(n: usize) -> impl Iterator<Item = Vec2> {
    (0..=n).flat_map(move |i| (0..=n).map(move |j| Vec2::new(i as f32 / n as f32, j as f32 / n as f32)))
}

#[test]
fn rotation_follows_pointer_and_stays_bounded() {
    for p in grid(20) {
        let r = tilt(p, TILT_GAIN);
        assert!(approx_eq2(r, Vec2::new(0.3 * (p.y - 0.5), 0.3 * (p.x - 0.5)), 1e-6));
        assert!(r.x.abs() <= 0.15 + 1e-6 && r.y.abs() <= 0.15 + 1e-6, "r={r:?} p={p:?}");
    }
}

#[test]
fn centered_pointer_gives_no_tilt_and_full_effect() {
    // the shader maps the pointer to [-1,1]^2, so the pixel under a
    // centered pointer is uv (0,0)
    let p = Vec2::new(0.5, 0.5);
    assert_eq!(tilt(p, TILT_GAIN), Vec2::ZERO);
    assert_eq!(holo::mouse_influence(p), Vec2::ZERO);
    assert_eq!(holo::mouse_effect(p, holo::mouse_influence(p)), 1.0);
}

#[test]
fn corner_pointer_tilts_fully_and_far_corner_gets_no_effect() {
    let p = Vec2::ZERO;
    assert!(approx_eq2(tilt(p, TILT_GAIN), Vec2::new(-0.15, -0.15), 1e-6));
    assert_eq!(holo::mouse_effect(p, Vec2::ONE), 0.0);
}

#[test]
fn mouse_effect_falls_off_with_distance() {
    let pointer = Vec2::new(0.7, 0.6);
    let center = holo::mouse_influence(pointer);
    let dir = Vec2::new(-0.6, -0.8);
    let mut prev = f32::INFINITY;
    for step in 0..=60 {
        let uv = center + dir * (step as f32 * 0.02);
        let e = holo::mouse_effect(pointer, uv);
        assert!((0.0..=1.0).contains(&e));
        assert!(e <= prev, "effect rose at step {step}: {e} > {prev}");
        prev = e;
    }
    assert_eq!(prev, 0.0);
}

#[test]
fn blend_weight_stays_between_floor_and_ceiling() {
    for p in grid(10) {
        for uv in grid(10) {
            let w = holo::blend_weight(holo::mouse_effect(p, uv));
            assert!((0.3 - 1e-6..=0.7 + 1e-6).contains(&w), "w={w}");
        }
    }
}

#[test]
fn shimmer_stays_in_band() {
    for uv in grid(25) {
        for k in 0..40 {
            let s = holo::shimmer(uv, k as f32 * 0.13);
            assert!((0.8 - 1e-6..=1.0 + 1e-6).contains(&s), "s={s}");
        }
    }
}

#[test]
fn fixed_step_ignores_wall_clock() {
    let mut clock = FrameClock::new(TimeStep::Fixed(0.01));
    let stamps = [0.0, 16.6, 17.0, 500.0, 500.0, 10_000.0];
    let mut prev = clock.elapsed();
    for (i, now) in stamps.into_iter().enumerate() {
        let t = clock.tick(now);
        assert!(t > prev);
        assert!((t - prev - 0.01).abs() < 1e-6, "frame {i}: dt={}", t - prev);
        prev = t;
    }
}

#[test]
fn still_pointer_frames_keep_changing_color() {
    let palette = HoloPalette::default();
    let pointer = Vec2::new(0.4, 0.4);
    let uv = Vec2::new(0.25, 0.75);

    let mut model = CardModel::new(&SurfaceConfig::default(), 500, 700).unwrap();
    model.step(0.0, Some(pointer)).unwrap();
    let c1 = holo::shade(uv, model.state().elapsed_time as f32, pointer, &palette);
    model.step(16.0, None).unwrap();
    let c2 = holo::shade(uv, model.state().elapsed_time as f32, pointer, &palette);

    assert_ne!(c1, c2);
    assert_eq!(c2.w, 1.0);
    assert_eq!(model.state().pointer, pointer);
}
