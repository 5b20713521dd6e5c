use super::*;
use crate::foundation::core::{Canvas, Rgba8};

fn tagged(tag: u8) -> Raster {
    Raster::filled(Canvas::new(2, 2).unwrap(), Rgba8::opaque(tag, tag, tag))
}

fn tags(h: &SnapshotHistory) -> Vec<u8> {
    h.iter().map(|r| r.data[0]).collect()
}

#[test]
fn undo_restores_previous_checkpoint() {
    let mut h = SnapshotHistory::new(tagged(0));
    h.push(tagged(1));
    h.push(tagged(2));
    assert_eq!(h.undo(), UndoOutcome::Restored(&tagged(1)));
    assert_eq!(h.undo(), UndoOutcome::Restored(&tagged(0)));
    assert_eq!(h.len(), 1);
}

#[test]
fn undo_with_single_checkpoint_is_a_no_op() {
    let mut h = SnapshotHistory::new(tagged(7));
    assert!(!h.can_undo());
    assert_eq!(h.undo(), UndoOutcome::NothingToUndo);
    assert_eq!(h.len(), 1);
    assert_eq!(h.top(), Some(&tagged(7)));
}

#[test]
fn pushing_past_capacity_evicts_exactly_the_oldest() {
    let mut h = SnapshotHistory::new(tagged(0));
    for t in 1..MAX_SNAPSHOTS as u8 {
        h.push(tagged(t));
    }
    assert_eq!(h.len(), MAX_SNAPSHOTS);

    h.push(tagged(200));
    assert_eq!(h.len(), MAX_SNAPSHOTS);
    let expected: Vec<u8> = (1..MAX_SNAPSHOTS as u8)
        .chain(std::iter::once(200))
        .collect();
    assert_eq!(tags(&h), expected);
}

#[test]
fn history_never_drops_below_one_entry() {
    let mut h = SnapshotHistory::with_capacity(tagged(0), 3);
    for t in 1..10 {
        h.push(tagged(t));
    }
    for _ in 0..10 {
        h.undo();
    }
    assert_eq!(h.len(), 1);
    assert!(!h.is_empty());
    assert_eq!(tags(&h), vec![7]);
}

#[test]
fn zero_capacity_is_clamped() {
    let mut h = SnapshotHistory::with_capacity(tagged(0), 0);
    h.push(tagged(1));
    assert_eq!(tags(&h), vec![1]);
}

#[test]
fn checkpoints_can_carry_more_than_pixels() {
    let mut h = SnapshotHistory::new((tagged(0), 0usize));
    h.push((tagged(1), 1));
    match h.undo() {
        UndoOutcome::Restored((raster, n)) => {
            assert_eq!(raster, &tagged(0));
            assert_eq!(*n, 0);
        }
        UndoOutcome::NothingToUndo => panic!("expected a restore"),
    }
}
