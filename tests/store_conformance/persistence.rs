//! Model-based check through the durable path.
//!
//! Random operation sequences are applied to a database and to a plain
//! `Vec`; after every step the two must agree, and after a reopen the
//! recovered database must match the model too.

use crate::common::{open, reopen};
use entrystore::{Database, Error, RemovalPolicy};
use proptest::prelude::*;
use tempfile::TempDir;

#[derive(Debug, Clone)]
enum Op {
    Append(u64),
    Remove(RemovalPolicy, u64),
    Checkpoint,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u64..1000).prop_map(Op::Append),
        1 => (0u64..12).prop_map(|i| Op::Remove(RemovalPolicy::LeaveGap, i)),
        1 => (0u64..12).prop_map(|i| Op::Remove(RemovalPolicy::ShiftCompact, i)),
        1 => (0u64..12).prop_map(|i| Op::Remove(RemovalPolicy::SwapCompact, i)),
        1 => Just(Op::Checkpoint),
    ]
}

fn apply_model(model: &mut Vec<u64>, op: &Op) -> Result<(), &'static str> {
    match *op {
        Op::Append(v) => model.push(v),
        Op::Remove(RemovalPolicy::SwapCompact, _) if model.is_empty() => return Err("empty"),
        Op::Remove(_, i) if i as usize >= model.len() => return Err("invalid"),
        Op::Remove(RemovalPolicy::LeaveGap, i) => model[i as usize] = 0,
        Op::Remove(RemovalPolicy::ShiftCompact, i) => {
            model.remove(i as usize);
        }
        Op::Remove(RemovalPolicy::SwapCompact, i) => {
            let last = model.len() - 1;
            model[i as usize] = model[last];
            model.pop();
        }
        Op::Checkpoint => {}
    }
    Ok(())
}

fn apply_db(db: &Database, op: &Op) -> Result<(), &'static str> {
    let result = match *op {
        Op::Append(v) => db.append(v),
        Op::Remove(policy, i) => db.remove(policy, i),
        Op::Checkpoint => db.checkpoint(),
    };
    match result {
        Ok(()) => Ok(()),
        Err(Error::EmptyStore) => Err("empty"),
        Err(Error::InvalidIndex { .. }) => Err("invalid"),
        Err(e) => panic!("unexpected error: {}", e),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn durable_store_matches_model(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let dir = TempDir::new().unwrap();
        let db = open(dir.path());
        let mut model = Vec::new();

        for op in &ops {
            prop_assert_eq!(apply_db(&db, op), apply_model(&mut model, op));
            prop_assert_eq!(db.read_all(), model.clone());
        }

        let db = reopen(&dir, db);
        prop_assert_eq!(db.read_all(), model.clone());
        for (i, v) in model.iter().enumerate() {
            prop_assert_eq!(db.read_at(i as u64).unwrap(), *v);
        }
    }
}
