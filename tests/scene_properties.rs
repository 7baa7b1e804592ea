//! Property tests for scene editing invariants.
//!
//! Verifies:
//! 1. Grid invariant: x, y, w, h and height stay on grid multiples after any
//!    sequence of moves, scales, height changes, mirrors and alignments
//! 2. Align is idempotent: a second identical align changes nothing
//! 3. Move by zero and scale by one are no-ops
//! 4. Distribute with equal gaps settles after one pass

use graybox::geometry::{self, AlignMode, DistributeMode, HeightChange, MirrorPivot, ScaleAxis};
use graybox::scene::{Axis, NewObject};
use graybox::{Effect, EngineConfig, Label, SceneStore};
use proptest::prelude::*;

const LABELS: [&str; 3] = ["A", "B", "C"];

fn label(s: &str) -> Label {
    Label::new(s).unwrap()
}

fn labels() -> Vec<Label> {
    LABELS.iter().map(|l| label(l)).collect()
}

// ── Strategy helpers ──────────────────────────────────────────────────

/// Coordinate on the half-unit grid inside a 40x30 canvas
fn arb_coord() -> impl Strategy<Value = f64> {
    (1i32..58).prop_map(|i| i as f64 * 0.5)
}

fn arb_size() -> impl Strategy<Value = f64> {
    (1i32..10).prop_map(|i| i as f64 * 0.5)
}

fn arb_block() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (arb_coord(), arb_coord(), arb_size(), arb_size())
}

#[derive(Debug, Clone)]
enum Op {
    Move(usize, f64, f64),
    Scale(usize, ScaleAxis, f64),
    Height(usize, f64),
    Mirror(usize, Axis),
    AlignLefts,
    AlignCentersY,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, -7.3f64..7.3, -7.3f64..7.3).prop_map(|(i, dx, dy)| Op::Move(i, dx, dy)),
        (
            0usize..3,
            prop_oneof![Just(ScaleAxis::X), Just(ScaleAxis::Y), Just(ScaleAxis::Both)],
            0.1f64..3.7
        )
            .prop_map(|(i, axis, f)| Op::Scale(i, axis, f)),
        (0usize..3, 0.2f64..2.9).prop_map(|(i, f)| Op::Height(i, f)),
        (0usize..3, prop_oneof![Just(Axis::X), Just(Axis::Y)]).prop_map(|(i, a)| Op::Mirror(i, a)),
        Just(Op::AlignLefts),
        Just(Op::AlignCentersY),
    ]
}

fn store_with(blocks: &[(f64, f64, f64, f64)]) -> SceneStore {
    let mut store = SceneStore::new(EngineConfig::default());
    for (name, (x, y, w, h)) in LABELS.iter().zip(blocks) {
        store
            .add(NewObject::new(label(name)).at(*x, *y).sized(*w, *h))
            .unwrap();
    }
    store
}

fn apply(store: &mut SceneStore, op: &Op) -> Effect {
    let all = labels();
    match op {
        Op::Move(i, dx, dy) => geometry::move_object(store, &all[*i], *dx, *dy),
        Op::Scale(i, axis, f) => geometry::scale(store, &all[*i], *axis, *f),
        Op::Height(i, f) => geometry::set_height(store, &all[*i], HeightChange::Factor(*f)),
        Op::Mirror(i, axis) => {
            geometry::mirror(store, &all[*i..=*i], *axis, MirrorPivot::GridCenter)
        }
        Op::AlignLefts => geometry::align(store, &all, Axis::X, AlignMode::Lefts),
        Op::AlignCentersY => geometry::align(store, &all, Axis::Y, AlignMode::Centers),
    }
    .unwrap()
}

proptest! {
    #[test]
    fn grid_invariant_holds(
        blocks in prop::collection::vec(arb_block(), 3),
        ops in prop::collection::vec(arb_op(), 1..20),
    ) {
        let mut store = store_with(&blocks);
        let grid = store.grid();
        for op in &ops {
            apply(&mut store, op);
            for object in store.scene().objects.values() {
                prop_assert!(grid.is_aligned(object.x), "x {} after {:?}", object.x, op);
                prop_assert!(grid.is_aligned(object.y), "y {} after {:?}", object.y, op);
                prop_assert!(grid.is_aligned(object.w), "w {} after {:?}", object.w, op);
                prop_assert!(grid.is_aligned(object.h), "h {} after {:?}", object.h, op);
                prop_assert!(grid.is_aligned(object.height));
                prop_assert!(object.w >= grid.step() && object.h >= grid.step());
            }
        }
    }

    #[test]
    fn align_is_idempotent(
        blocks in prop::collection::vec(arb_block(), 3),
        mode in prop_oneof![Just(AlignMode::Lefts), Just(AlignMode::Rights), Just(AlignMode::Centers)],
    ) {
        let mut store = store_with(&blocks);
        geometry::align(&mut store, &labels(), Axis::X, mode).unwrap();
        let once = store.scene().clone();
        let effect = geometry::align(&mut store, &labels(), Axis::X, mode).unwrap();
        prop_assert_eq!(effect, Effect::Unchanged);
        prop_assert_eq!(store.scene(), &once);
    }

    #[test]
    fn neutral_edits_are_noops(blocks in prop::collection::vec(arb_block(), 3)) {
        let mut store = store_with(&blocks);
        let before = store.scene().clone();
        let a = label("A");
        prop_assert_eq!(geometry::move_object(&mut store, &a, 0.0, 0.0).unwrap(), Effect::Unchanged);
        prop_assert_eq!(geometry::scale(&mut store, &a, ScaleAxis::Both, 1.0).unwrap(), Effect::Unchanged);
        prop_assert_eq!(store.scene(), &before);
    }
}

#[test]
fn test_equal_gaps_settle() {
    let mut store = store_with(&[(0.5, 5.0, 1.0, 1.0), (2.0, 5.0, 1.0, 1.0), (9.5, 5.0, 1.0, 1.0)]);
    let effect = geometry::distribute(&mut store, &labels(), Axis::X, DistributeMode::EqualGaps)
        .unwrap();
    assert_eq!(effect, Effect::Changed);
    // Span 0..10 holds three unit blocks: two gaps of 3.5
    let b = store.get(&label("B")).unwrap();
    assert_eq!(b.left(), 4.5);
    let again = geometry::distribute(&mut store, &labels(), Axis::X, DistributeMode::EqualGaps)
        .unwrap();
    assert_eq!(again, Effect::Unchanged);
}

#[test]
fn test_move_twice_is_additive_not_drifting() {
    let mut store = store_with(&[(5.0, 5.0, 1.0, 1.0), (10.0, 5.0, 1.0, 1.0), (15.0, 5.0, 1.0, 1.0)]);
    let a = label("A");
    geometry::move_object(&mut store, &a, 1.0, -0.5).unwrap();
    geometry::move_object(&mut store, &a, 1.0, -0.5).unwrap();
    let moved = store.get(&a).unwrap();
    assert_eq!((moved.x, moved.y), (7.0, 4.0));
}
