/*
 * Dragonbreed - Individuals
 * 开发心理过程:
 * 1. 个体 = 身份 + 基因型 + 创建时掷出的暗能量标志 + 繁殖记录
 * 2. 身份由注入的发号器提供（顺序计数或 UUID），引擎本身不持有全局计数器
 * 3. 孵化室负责野生捕获和孵化两种创建方式，两者都只掷一次暗能量
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use super::genotype::{AlleleOrigins, GeneticCode};
use super::phenotype::Phenotype;
use super::resolver::PhenotypeResolver;
use super::CreatureEngine;
use crate::core::error::GeneticsResult;
use crate::utils::random::RandomSource;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatureId(String);

impl CreatureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 发号器
pub trait IdIssuer {
    fn issue(&mut self) -> CreatureId;
}

/// 显式计数器: "<prefix>-1", "<prefix>-2", ...
#[derive(Debug, Clone)]
pub struct SequentialIdIssuer {
    prefix: String,
    next: u64,
}

impl SequentialIdIssuer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// 从存档恢复时接着上次的编号继续
    pub fn starting_at(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
        }
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl IdIssuer for SequentialIdIssuer {
    fn issue(&mut self) -> CreatureId {
        let id = CreatureId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdIssuer;

impl IdIssuer for UuidIdIssuer {
    fn issue(&mut self) -> CreatureId {
        CreatureId(Uuid::new_v4().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn roll<R: RandomSource>(rng: &mut R) -> Self {
        if rng.chance(0.5) {
            Sex::Female
        } else {
            Sex::Male
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub id: CreatureId,
    pub sex: Sex,
    /// 野生个体为 0
    pub generation: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<[CreatureId; 2]>,
    pub genotype: GeneticCode,
    /// 创建时掷出的暗能量结果，之后永不重掷；反序列化时必须显式给出
    pub dark_energy: bool,
    #[serde(default)]
    pub mutations: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allele_origins: Option<AlleleOrigins>,
}

impl Creature {
    pub fn is_wild(&self) -> bool {
        self.parents.is_none()
    }

    pub fn phenotype(&self, resolver: &PhenotypeResolver) -> GeneticsResult<Phenotype> {
        resolver.resolve(&self.genotype, self.dark_energy)
    }
}

/// 个体创建入口
#[derive(Debug, Clone)]
pub struct Nursery<I: IdIssuer> {
    engine: CreatureEngine,
    issuer: I,
}

impl<I: IdIssuer> Nursery<I> {
    pub fn new(engine: CreatureEngine, issuer: I) -> Self {
        Self { engine, issuer }
    }

    pub fn engine(&self) -> &CreatureEngine {
        &self.engine
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    /// 捕获一只野生个体
    pub fn wild<R: RandomSource>(&mut self, rng: &mut R) -> GeneticsResult<Creature> {
        let genotype = self.engine.generate(rng)?;
        let sex = Sex::roll(rng);
        let dark_energy = self.engine.roll_dark_energy(&genotype, rng)?;

        let creature = Creature {
            id: self.issuer.issue(),
            sex,
            generation: 0,
            parents: None,
            genotype,
            dark_energy,
            mutations: BTreeSet::new(),
            allele_origins: None,
        };
        debug!("野生个体 {} ({:?})", creature.id, creature.sex);
        Ok(creature)
    }

    /// 两个亲本孵化一窝；亲本顺序决定 A/B 来源标记
    pub fn hatch<R: RandomSource>(
        &mut self,
        parent_a: &Creature,
        parent_b: &Creature,
        rng: &mut R,
    ) -> GeneticsResult<Vec<Creature>> {
        let clutch = self
            .engine
            .breed(&parent_a.genotype, &parent_b.genotype, rng)?;
        let generation = parent_a.generation.max(parent_b.generation) + 1;

        let mut hatched = Vec::with_capacity(clutch.len());
        for offspring in clutch {
            let sex = Sex::roll(rng);
            let dark_energy = self.engine.roll_dark_energy(&offspring.genotype, rng)?;
            hatched.push(Creature {
                id: self.issuer.issue(),
                sex,
                generation,
                parents: Some([parent_a.id.clone(), parent_b.id.clone()]),
                genotype: offspring.genotype,
                dark_energy,
                mutations: offspring.mutations,
                allele_origins: Some(offspring.allele_origins),
            });
        }

        info!(
            "{} x {} 孵化 {} 只第 {} 代个体",
            parent_a.id,
            parent_b.id,
            hatched.len(),
            generation
        );
        Ok(hatched)
    }
}
