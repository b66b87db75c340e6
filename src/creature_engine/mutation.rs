/*
 * Dragonbreed - Mutation
 * 开发心理过程:
 * 1. 每条遗传下去的等位基因独立判定是否突变
 * 2. 突变把值平移 ±1（方向等概率），再夹回基因的合法范围
 * 3. 被夹回原值的平移不算突变
 */

use crate::catalog::GeneDefinition;
use crate::utils::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    pub original: u8,
    pub value: u8,
}

impl MutationOutcome {
    pub fn mutated(&self) -> bool {
        self.value != self.original
    }
}

pub fn mutate_allele<R: RandomSource>(
    gene: &GeneDefinition,
    original: u8,
    rate: f64,
    rng: &mut R,
) -> MutationOutcome {
    if !rng.chance(rate) {
        return MutationOutcome {
            original,
            value: original,
        };
    }

    let delta: i16 = if rng.chance(0.5) { 1 } else { -1 };
    MutationOutcome {
        original,
        value: gene.clamp(original as i16 + delta),
    }
}
