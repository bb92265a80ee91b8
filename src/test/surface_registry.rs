use crate::surface::{Surface, SurfaceId, SurfaceRegistry};
use image::Rgba;

const BG: [u8; 4] = [255, 255, 255, 255];
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[test]
fn create_is_idempotent_per_name() {
    let mut reg = SurfaceRegistry::new(16, BG);
    let a = reg.create("f_1");
    let b = reg.create("g");
    let again = reg.create("f_1");

    assert_eq!(a, SurfaceId(0));
    assert_eq!(b, SurfaceId(1));
    assert_eq!(again, a);
    assert_eq!(reg.len(), 2);
}

#[test]
fn get_missing_name_is_absent() {
    let reg = SurfaceRegistry::new(16, BG);
    assert!(reg.get("nope").is_none());
    assert!(reg.lookup("nope").is_none());
    assert!(reg.is_empty());
}

#[test]
fn surfaces_are_square_and_iterate_in_creation_order() {
    let mut reg = SurfaceRegistry::new(24, BG);
    for name in ["c", "a", "b"] {
        reg.create(name);
    }
    let names = reg.iter().map(Surface::name).collect::<Vec<_>>();
    assert_eq!(names, vec!["c", "a", "b"]);
    for s in reg.iter() {
        assert_eq!(s.pixels().dimensions(), (24, 24));
        assert!(s.is_blank());
    }
}

#[test]
fn surfaces_do_not_share_pixels() {
    let mut reg = SurfaceRegistry::new(8, BG);
    reg.create("a");
    reg.create("b");

    reg.lookup_mut("a").expect("a").fill_rect(0, 0, 2, 2, INK);
    assert!(!reg.lookup("a").expect("a").is_blank());
    assert!(reg.lookup("b").expect("b").is_blank());
}

#[test]
fn clear_all_and_teardown() {
    let mut reg = SurfaceRegistry::new(8, BG);
    let id = reg.create("a");
    reg.surface_mut(id).expect("a").fill_rect(1, 1, 1, 1, INK);

    reg.clear_all();
    assert!(reg.surface(id).expect("a").is_blank());

    reg.teardown();
    assert!(reg.is_empty());
    assert!(reg.get("a").is_none());
    assert_eq!(reg.create("b"), SurfaceId(0));
}

#[test]
fn drawing_is_clipped_to_the_canvas() {
    let mut s = Surface::new("a", 4, BG);
    s.fill_rect(-2, -2, 3, 3, INK);
    assert_eq!(s.pixel(0, 0), Some(INK));
    assert_eq!(s.pixel(1, 1), Some(Rgba(BG)));

    s.fill_rect(3, 3, 100, 100, INK);
    assert_eq!(s.pixel(3, 3), Some(INK));
    assert_eq!(s.pixel(4, 4), None);

    s.fill_rect(10, 10, 2, 2, INK);
    s.fill_rect(0, 0, -3, 2, INK);
    s.stroke_rect(-10, -10, -5, -5, INK);
}

#[test]
fn stroke_rect_draws_inclusive_outline() {
    let mut s = Surface::new("a", 8, BG);
    s.stroke_rect(1, 1, 4, 3, INK);
    for (x, y) in [(1, 1), (4, 1), (1, 3), (4, 3), (2, 1), (1, 2), (4, 2), (3, 3)] {
        assert_eq!(s.pixel(x, y), Some(INK), "({x},{y}) should be on the outline");
    }
    assert_eq!(s.pixel(2, 2), Some(Rgba(BG)));
    assert_eq!(s.pixel(5, 1), Some(Rgba(BG)));
}
