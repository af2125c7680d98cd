//! Property tests for footprint geometry

use grid_model::{clamp_minimum, overlaps, WidgetFootprint};
use proptest::prelude::*;

fn footprint() -> impl Strategy<Value = WidgetFootprint> {
    (0u32..20, 0u32..20, 0u32..10, 0u32..10).prop_map(|(x, y, w, h)| WidgetFootprint::new(x, y, w, h))
}

/// Reference overlap: some integer cell is covered by both footprints
fn share_a_cell(a: &WidgetFootprint, b: &WidgetFootprint) -> bool {
    (a.y..a.bottom()).any(|y| (a.x..a.right()).any(|x| b.contains_cell(x, y)))
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in footprint(), b in footprint()) {
        prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }

    #[test]
    fn overlap_matches_cell_coverage(a in footprint(), b in footprint()) {
        prop_assert_eq!(overlaps(&a, &b), share_a_cell(&a, &b));
    }

    #[test]
    fn clamp_enforces_floor(f in footprint(), min_w in 0u32..8, min_h in 0u32..8) {
        let clamped = clamp_minimum(f, min_w, min_h);
        prop_assert!(clamped.w >= min_w && clamped.h >= min_h);
        prop_assert_eq!(clamped.position(), f.position());
        prop_assert!(clamped.w >= f.w && clamped.h >= f.h);
    }

    #[test]
    fn default_floor_is_four_by_three(f in footprint()) {
        let clamped = clamp_minimum(f, 4, 3);
        prop_assert!(clamped.w >= 4 && clamped.h >= 3);
    }
}
