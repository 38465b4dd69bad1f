//! Error kinds and the no-partial-effect guarantee.

use crate::common::{fresh, reopen, seed};
use entrystore::Error;

#[test]
fn swap_compact_on_empty_is_empty_store() {
    let (_dir, db) = fresh();
    assert!(matches!(db.remove_swap_compact(0), Err(Error::EmptyStore)));

    seed(&db, &[5]);
    assert!(matches!(
        db.remove_swap_compact(1),
        Err(Error::InvalidIndex { index: 1, len: 1 })
    ));
}

#[test]
fn other_removals_on_empty_are_invalid_index() {
    let (_dir, db) = fresh();
    assert!(matches!(
        db.remove_shift_compact(0),
        Err(Error::InvalidIndex { index: 0, len: 0 })
    ));
    assert!(matches!(
        db.remove_leaving_gaps(0),
        Err(Error::InvalidIndex { index: 0, len: 0 })
    ));
}

#[test]
fn read_past_end_is_out_of_bounds() {
    let (_dir, db) = fresh();
    assert!(matches!(
        db.read_at(0),
        Err(Error::OutOfBounds { index: 0, len: 0 })
    ));

    seed(&db, &[1, 2]);
    assert!(matches!(
        db.read_at(2),
        Err(Error::OutOfBounds { index: 2, len: 2 })
    ));
    assert!(matches!(db.read_at(u64::MAX), Err(Error::OutOfBounds { .. })));
}

#[test]
fn rejected_calls_change_nothing_on_disk() {
    let (dir, db) = fresh();
    seed(&db, &[1, 2, 3]);
    let before = db.info();

    for idx in [3, 4, u64::MAX] {
        assert!(db.remove_leaving_gaps(idx).is_err());
        assert!(db.remove_shift_compact(idx).is_err());
        assert!(db.remove_swap_compact(idx).is_err());
    }
    assert_eq!(db.info(), before);

    let db = reopen(&dir, db);
    assert_eq!(db.read_all(), vec![1, 2, 3]);
    assert_eq!(db.info().seq, before.seq);
}

#[test]
fn errors_are_rejections() {
    let (_dir, db) = fresh();
    let err = db.remove_swap_compact(0).unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.to_string(), "no entries");

    let err = db.remove_shift_compact(9).unwrap_err();
    assert!(err.is_rejection());
    assert!(err.to_string().starts_with("invalid index"));
}
