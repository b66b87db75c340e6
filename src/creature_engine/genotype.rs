/*
 * Dragonbreed - Genetic Code
 * 开发心理过程:
 * 1. 基因型是 基因名 -> 两条等位基因 的扁平映射，创建后不可变
 * 2. 位置 0/1 只在记录亲本来源时有意义
 * 3. 对照目录检查完整性与取值范围
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::TraitCatalog;
use crate::core::error::{GeneticsError, GeneticsResult};

/// 一对等位基因
pub type AllelePair = [u8; 2];

/// 等位基因来自哪个亲本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlleleOrigin {
    A,
    B,
}

/// 繁殖产生的来源记录；野生个体没有
pub type AlleleOrigins = BTreeMap<String, [AlleleOrigin; 2]>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneticCode {
    genes: BTreeMap<String, AllelePair>,
}

impl GeneticCode {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, gene: &str, pair: AllelePair) {
        self.genes.insert(gene.to_string(), pair);
    }

    pub fn get(&self, gene: &str) -> Option<AllelePair> {
        self.genes.get(gene).copied()
    }

    /// 取出基因对，缺失即结构不匹配
    pub fn require(&self, gene: &str, context: &str) -> GeneticsResult<AllelePair> {
        self.get(gene)
            .ok_or_else(|| GeneticsError::missing_gene(gene, context))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AllelePair)> {
        self.genes.iter().map(|(gene, pair)| (gene.as_str(), *pair))
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// 每个目录基因恰好一对，且等位基因都在合法范围内
    pub fn validate_against(&self, catalog: &TraitCatalog, context: &str) -> GeneticsResult<()> {
        for (name, definition) in &catalog.genes {
            let pair = self.require(name, context)?;
            for value in pair {
                if !definition.contains(value) {
                    return Err(GeneticsError::AlleleOutOfRange {
                        gene: name.clone(),
                        value,
                        min: definition.min_allele,
                        max: definition.max_allele,
                    });
                }
            }
        }

        if let Some(unknown) = self.genes.keys().find(|gene| !catalog.genes.contains_key(*gene)) {
            return Err(GeneticsError::UnknownGene(unknown.clone()));
        }
        Ok(())
    }
}

impl FromIterator<(String, AllelePair)> for GeneticCode {
    fn from_iter<T: IntoIterator<Item = (String, AllelePair)>>(iter: T) -> Self {
        Self {
            genes: iter.into_iter().collect(),
        }
    }
}
