// Host-side tests for the procedural displacement texture.

use glass_core::texture::{generate, generate_with_size};
use glass_core::GlassError;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn default_texture_is_512_square_and_opaque() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..3 {
        let tex = generate(&mut rng);
        assert_eq!(tex.width(), 512);
        assert_eq!(tex.height(), 512);
        assert_eq!(tex.as_rgba8().len(), 512 * 512 * 4);
        assert!(tex.pixels().iter().all(|p| p[3] == 255));
    }
}

#[test]
fn channels_are_grey() {
    let tex = generate_with_size(32, &mut StdRng::seed_from_u64(3)).unwrap();
    for p in tex.pixels() {
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
    }
}

#[test]
fn zero_size_is_rejected() {
    let err = generate_with_size(0, &mut StdRng::seed_from_u64(0)).unwrap_err();
    assert_eq!(err, GlassError::EmptyTexture);
}

#[test]
fn corners_are_darkened_by_the_gradient() {
    // Flat index 0 has organic = 128 so noise tops out at 128; the gradient
    // contributes black at the edge, halving it.
    let tex = generate_with_size(64, &mut StdRng::seed_from_u64(9)).unwrap();
    let corner = tex.pixel(0, 0).unwrap();
    assert!(corner[0] <= 64, "corner too bright: {corner:?}");
}

#[test]
fn centre_is_lifted_by_the_gradient() {
    // Near the centre the white stop adds close to 127 whatever the noise.
    let tex = generate_with_size(64, &mut StdRng::seed_from_u64(11)).unwrap();
    let centre = tex.pixel(32, 32).unwrap();
    assert!(centre[0] >= 120, "centre too dark: {centre:?}");
}

#[test]
fn pixel_outside_bounds_is_none() {
    let tex = generate_with_size(8, &mut StdRng::seed_from_u64(2)).unwrap();
    assert!(tex.pixel(8, 0).is_none());
    assert!(tex.pixel(0, 8).is_none());
    assert!(tex.pixel(7, 7).is_some());
}

#[test]
fn same_seed_same_texture() {
    let a = generate_with_size(16, &mut StdRng::seed_from_u64(5)).unwrap();
    let b = generate_with_size(16, &mut StdRng::seed_from_u64(5)).unwrap();
    let c = generate_with_size(16, &mut StdRng::seed_from_u64(6)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn shared_texture_is_generated_once() {
    let a = glass_core::texture::shared();
    let b = glass_core::texture::shared();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(a.width(), 512);
}
