//! Shared fixtures for domain tests

use proptest::prelude::*;
use proptest::sample::Index;

use super::{SkillId, SkillSeed, SkillStatus};

pub fn id(s: &str) -> SkillId {
    SkillId::new(s).unwrap()
}

pub fn seed(name: &str, cost: u64, deps: &[&str]) -> SkillSeed {
    deps.iter()
        .fold(SkillSeed::new(id(name), cost), |s, dep| s.depends_on(id(dep)))
}

fn arb_status() -> impl Strategy<Value = SkillStatus> {
    prop_oneof![
        6 => Just(SkillStatus::Locked),
        1 => Just(SkillStatus::Available),
        2 => Just(SkillStatus::Mastered),
    ]
}

/// Random acyclic seeds: node `n{i}` may only depend on nodes before it
pub fn arb_seeds() -> impl Strategy<Value = Vec<SkillSeed>> {
    prop::collection::vec(
        (
            0u64..50,
            prop::collection::vec(any::<Index>(), 0..3),
            arb_status(),
        ),
        1..25,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (cost, deps, status))| {
                let mut s = SkillSeed::new(id(&format!("n{}", i)), cost).with_status(status);
                if i > 0 {
                    for dep in deps {
                        s = s.depends_on(id(&format!("n{}", dep.index(i))));
                    }
                }
                s
            })
            .collect()
    })
}
