//! The three removal policies, scenario by scenario.

use crate::common::{fresh, reopen, seed};

#[test]
fn shift_compact_preserves_order() {
    let (dir, db) = fresh();
    seed(&db, &[10, 20, 30, 40]);
    db.remove_shift_compact(1).unwrap();
    assert_eq!(db.read_all(), vec![10, 30, 40]);

    let db = reopen(&dir, db);
    assert_eq!(db.read_all(), vec![10, 30, 40]);
}

#[test]
fn swap_compact_moves_last_into_hole() {
    let (dir, db) = fresh();
    seed(&db, &[10, 20, 30, 40]);
    db.remove_swap_compact(1).unwrap();

    let all = db.read_all();
    assert_eq!(all.len(), 3);
    assert!(!all.contains(&20));
    for v in [10, 30, 40] {
        assert!(all.contains(&v));
    }
    assert_eq!(all, vec![10, 40, 30]);

    let db = reopen(&dir, db);
    assert_eq!(db.read_all(), vec![10, 40, 30]);
}

#[test]
fn swap_compact_of_last_just_shrinks() {
    let (dir, db) = fresh();
    seed(&db, &[10, 20, 30]);
    db.remove_swap_compact(2).unwrap();
    assert_eq!(db.read_all(), vec![10, 20]);

    let db = reopen(&dir, db);
    assert_eq!(db.read_all(), vec![10, 20]);
}

#[test]
fn leave_gap_zeroes_in_place() {
    let (dir, db) = fresh();
    seed(&db, &[10, 20, 30]);
    db.remove_leaving_gaps(1).unwrap();
    assert_eq!(db.len(), 3);
    assert_eq!(db.read_at(1).unwrap(), 0);
    assert_eq!(db.read_all(), vec![10, 0, 30]);

    // A gap can be removed again and reads the same as a stored zero
    db.remove_leaving_gaps(1).unwrap();
    db.append(0).unwrap();
    assert_eq!(db.read_at(1).unwrap(), db.read_at(3).unwrap());

    let db = reopen(&dir, db);
    assert_eq!(db.read_all(), vec![10, 0, 30, 0]);
}

#[test]
fn single_entry_each_policy() {
    let (_dir, db) = fresh();

    seed(&db, &[7]);
    db.remove_leaving_gaps(0).unwrap();
    assert_eq!(db.read_all(), vec![0]);

    db.remove_shift_compact(0).unwrap();
    assert!(db.is_empty());

    seed(&db, &[7]);
    db.remove_swap_compact(0).unwrap();
    assert!(db.is_empty());
}

#[test]
fn append_accepts_extremes() {
    let (dir, db) = fresh();
    seed(&db, &[0, u64::MAX, 1]);
    assert_eq!(db.read_all(), vec![0, u64::MAX, 1]);

    let db = reopen(&dir, db);
    assert_eq!(db.read_at(1).unwrap(), u64::MAX);
}
