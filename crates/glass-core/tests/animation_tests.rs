// Host-side tests for keyframe envelopes.

use glam::{Vec2, Vec3};
use glass_core::animation::{gradient_color, iridescent_gradient, shimmer_frequency};
use glass_core::KeyframeLoop;

#[test]
fn values_at_keyframe_times_and_midpoints() {
    let anim = KeyframeLoop::new(4.0, vec![0.0f32, 10.0, 0.0]);
    assert_eq!(anim.value_at(0.0), Some(0.0));
    assert_eq!(anim.value_at(2.0), Some(10.0));
    assert_eq!(anim.value_at(1.0), Some(5.0));
    assert_eq!(anim.value_at(3.0), Some(5.0));
}

#[test]
fn loops_forever() {
    let anim = KeyframeLoop::new(4.0, vec![0.0f32, 10.0, 0.0]);
    assert_eq!(anim.value_at(4.0), Some(0.0));
    assert_eq!(anim.value_at(9.0), Some(5.0));
    assert_eq!(anim.value_at(402.0), Some(10.0));
}

#[test]
fn bad_times_read_as_zero() {
    let anim = KeyframeLoop::new(4.0, vec![1.0f32, 3.0]);
    assert_eq!(anim.value_at(f32::NAN), Some(1.0));
    assert_eq!(anim.value_at(-5.0), Some(1.0));
    assert_eq!(anim.value_at(f32::INFINITY), Some(1.0));
}

#[test]
fn degenerate_loops() {
    let empty: KeyframeLoop<f32> = KeyframeLoop::new(1.0, vec![]);
    assert_eq!(empty.value_at(0.5), None);
    let single = KeyframeLoop::new(1.0, vec![Vec2::ONE]);
    assert_eq!(single.value_at(0.5), Some(Vec2::ONE));
    let frozen = KeyframeLoop::new(0.0, vec![2.0f32, 4.0]);
    assert_eq!(frozen.value_at(0.5), Some(2.0));
}

#[test]
fn shimmer_frequency_peaks_half_way() {
    let anim = shimmer_frequency();
    assert_eq!(anim.period_sec, 20.0);
    let mid = anim.value_at(10.0).unwrap();
    assert!((mid - Vec2::new(0.04, 0.2)).length() < 1e-6);
    let quarter = anim.value_at(5.0).unwrap();
    assert!((quarter - Vec2::new(0.03, 0.15)).length() < 1e-6);
}

#[test]
fn iridescent_stops_cycle_the_palette() {
    let stops = iridescent_gradient();
    assert_eq!(stops.len(), 3);
    let offsets: Vec<f32> = stops.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    let opacities: Vec<f32> = stops.iter().map(|s| s.opacity).collect();
    assert_eq!(opacities, vec![0.2, 0.1, 0.2]);

    let magenta = Vec3::new(1.0, 0.0, 1.0);
    let cyan = Vec3::new(0.0, 1.0, 1.0);
    let yellow = Vec3::new(1.0, 1.0, 0.0);
    assert_eq!(stops[0].colors.values, vec![magenta, cyan, yellow, magenta]);
    assert_eq!(stops[1].colors.values, vec![cyan, yellow, magenta, cyan]);
    assert_eq!(stops[2].colors.values, vec![yellow, magenta, cyan, yellow]);
    assert_eq!(stops[0].colors.period_sec, 10.0);
}

#[test]
fn gradient_colour_interpolates_between_stops() {
    let stops = iridescent_gradient();
    let (c, o) = gradient_color(&stops, 0.0, 0.0).unwrap();
    assert_eq!(c, Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(o, 0.2);
    let (c, o) = gradient_color(&stops, 0.25, 0.0).unwrap();
    assert!((c - Vec3::new(0.5, 0.5, 1.0)).length() < 1e-6);
    assert!((o - 0.15).abs() < 1e-6);
    assert!(gradient_color(&[], 0.5, 0.0).is_none());
}
