/*
 * Dragonbreed - Creature Engine Module
 * 开发心理过程:
 * 1. 遗传核心: 生成器、繁殖引擎、表型解析器共享同一份只读基因目录
 * 2. 所有随机性通过显式传入的随机源注入，便于种子化测试
 * 3. 引擎本身无可变状态，可在线程间自由克隆共享
 * 4. 个体身份与暗能量一次性判定由孵化室负责
 */

use log::info;
use std::sync::Arc;

pub mod breath;
pub mod breeding;
pub mod color;
pub mod finish;
pub mod generator;
pub mod genotype;
pub mod individual;
pub mod mutation;
pub mod phenotype;
pub mod rarity_system;
pub mod resolver;
pub mod trait_path;

pub use breeding::{BreedingEngine, Offspring};
pub use generator::{GenotypeGenerator, TierPlan};
pub use genotype::{AlleleOrigin, AlleleOrigins, AllelePair, GeneticCode};
pub use individual::{
    Creature, CreatureId, IdIssuer, Nursery, SequentialIdIssuer, Sex, UuidIdIssuer,
};
pub use mutation::{mutate_allele, MutationOutcome};
pub use phenotype::{
    Phenotype, ResolvedBreathElement, ResolvedColor, ResolvedFinish, ResolvedTrait,
    TriangleResult,
};
pub use rarity_system::{Rarity, RarityReport};
pub use resolver::{PhenotypeResolver, HIGH_THRESHOLD, UNKNOWN_NAME, VOID_KEY};
pub use trait_path::{TraitPath, TraitPredicate};

use crate::catalog::TraitCatalog;
use crate::core::config::EngineConfig;
use crate::core::error::GeneticsResult;
use crate::utils::random::RandomSource;

/// 遗传核心的组合入口
#[derive(Debug, Clone)]
pub struct CreatureEngine {
    catalog: Arc<TraitCatalog>,
    config: EngineConfig,
    generator: GenotypeGenerator,
    breeding: BreedingEngine,
    resolver: PhenotypeResolver,
}

impl CreatureEngine {
    pub fn new(catalog: Arc<TraitCatalog>, config: EngineConfig) -> GeneticsResult<Self> {
        config.validate()?;

        let generator = GenotypeGenerator::new(catalog.clone());
        let breeding = BreedingEngine::new(catalog.clone(), config.breeding.clone())?;
        let resolver = PhenotypeResolver::new(catalog.clone(), config.resolver.clone());

        info!(
            "遗传引擎就绪: {} 个基因, 窝数 {}-{}, 突变率 {}",
            catalog.gene_count(),
            config.breeding.clutch_min,
            config.breeding.clutch_max,
            config.breeding.mutation_rate
        );

        Ok(Self {
            catalog,
            config,
            generator,
            breeding,
            resolver,
        })
    }

    /// 内置目录 + 默认配置
    pub fn with_defaults() -> GeneticsResult<Self> {
        Self::new(Arc::new(TraitCatalog::builtin()?), EngineConfig::default())
    }

    pub fn catalog(&self) -> &Arc<TraitCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn generator(&self) -> &GenotypeGenerator {
        &self.generator
    }

    pub fn breeding(&self) -> &BreedingEngine {
        &self.breeding
    }

    pub fn resolver(&self) -> &PhenotypeResolver {
        &self.resolver
    }

    pub fn generate<R: RandomSource>(&self, rng: &mut R) -> GeneticsResult<GeneticCode> {
        self.generator.generate(rng)
    }

    pub fn breed<R: RandomSource>(
        &self,
        parent_a: &GeneticCode,
        parent_b: &GeneticCode,
        rng: &mut R,
    ) -> GeneticsResult<Vec<Offspring>> {
        self.breeding.breed(parent_a, parent_b, rng)
    }

    pub fn resolve(&self, code: &GeneticCode, dark_energy: bool) -> GeneticsResult<Phenotype> {
        self.resolver.resolve(code, dark_energy)
    }

    pub fn roll_dark_energy<R: RandomSource>(
        &self,
        code: &GeneticCode,
        rng: &mut R,
    ) -> GeneticsResult<bool> {
        self.resolver.roll_dark_energy(code, rng)
    }

    pub fn nursery<I: IdIssuer>(&self, issuer: I) -> Nursery<I> {
        Nursery::new(self.clone(), issuer)
    }
}
