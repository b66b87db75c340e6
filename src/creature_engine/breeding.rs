/*
 * Dragonbreed - Breeding Engine
 * 开发心理过程:
 * 1. 按基因独立分配：每个亲本随机交出两条等位基因中的一条
 * 2. 交出的等位基因各自独立判定突变
 * 3. 位置 0 永远来自亲本 A，位置 1 永远来自亲本 B，突变后也不变
 * 4. 窝数在配置的闭区间内均匀抽取，每个后代独立生成
 */

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::genotype::{AlleleOrigin, AlleleOrigins, AllelePair, GeneticCode};
use super::mutation::mutate_allele;
use crate::catalog::TraitCatalog;
use crate::core::config::BreedingConfig;
use crate::core::error::{GeneticsError, GeneticsResult};
use crate::utils::random::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offspring {
    pub genotype: GeneticCode,
    /// 本次繁殖中真正发生突变的基因
    pub mutations: BTreeSet<String>,
    pub allele_origins: AlleleOrigins,
}

#[derive(Debug, Clone)]
pub struct BreedingEngine {
    catalog: Arc<TraitCatalog>,
    config: BreedingConfig,
}

impl BreedingEngine {
    pub fn new(catalog: Arc<TraitCatalog>, config: BreedingConfig) -> GeneticsResult<Self> {
        if config.clutch_min == 0 || config.clutch_min > config.clutch_max {
            return Err(GeneticsError::ConfigError(format!(
                "invalid clutch range [{}, {}]",
                config.clutch_min, config.clutch_max
            )));
        }
        Ok(Self { catalog, config })
    }

    pub fn config(&self) -> &BreedingConfig {
        &self.config
    }

    /// 两个亲本产下一窝后代
    pub fn breed<R: RandomSource>(
        &self,
        parent_a: &GeneticCode,
        parent_b: &GeneticCode,
        rng: &mut R,
    ) -> GeneticsResult<Vec<Offspring>> {
        parent_a.validate_against(&self.catalog, "parent A")?;
        parent_b.validate_against(&self.catalog, "parent B")?;

        let clutch_size = rng.range_inclusive(self.config.clutch_min, self.config.clutch_max);
        let clutch: Vec<Offspring> = (0..clutch_size)
            .map(|_| self.conceive(parent_a, parent_b, rng))
            .collect::<GeneticsResult<_>>()?;

        debug!(
            "繁殖完成: 窝数 {}, 突变基因 {}",
            clutch.len(),
            clutch.iter().map(|o| o.mutations.len()).sum::<usize>()
        );
        Ok(clutch)
    }

    /// 生成单个后代
    pub fn conceive<R: RandomSource>(
        &self,
        parent_a: &GeneticCode,
        parent_b: &GeneticCode,
        rng: &mut R,
    ) -> GeneticsResult<Offspring> {
        let mut genotype = GeneticCode::new();
        let mut mutations = BTreeSet::new();
        let mut allele_origins = AlleleOrigins::new();

        for (name, gene) in &self.catalog.genes {
            let from_a = pick_allele(parent_a.require(name, "parent A")?, rng);
            let from_b = pick_allele(parent_b.require(name, "parent B")?, rng);

            let rate = self.config.mutation_rate;
            let allele_a = mutate_allele(gene, from_a, rate, rng);
            let allele_b = mutate_allele(gene, from_b, rate, rng);

            if allele_a.mutated() || allele_b.mutated() {
                trace!("基因 {} 突变: {:?} / {:?}", name, allele_a, allele_b);
                mutations.insert(name.clone());
            }

            genotype.insert(name, [allele_a.value, allele_b.value]);
            allele_origins.insert(name.clone(), [AlleleOrigin::A, AlleleOrigin::B]);
        }

        Ok(Offspring {
            genotype,
            mutations,
            allele_origins,
        })
    }
}

/// 等概率选出亲本的一条等位基因
fn pick_allele<R: RandomSource>(pair: AllelePair, rng: &mut R) -> u8 {
    if rng.chance(0.5) {
        pair[0]
    } else {
        pair[1]
    }
}
