/*
 * Dragonbreed - Rarity System
 * 开发心理过程:
 * 1. 稀有度由三个三轴系统的高低键决定: 高轴越多越稀有
 * 2. 生成器的档位权重让全高组合很少出现，稀有度直接反映这一点
 * 3. 暗能量变体至少为 Epic
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::phenotype::Phenotype;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "Common"),
            Rarity::Uncommon => write!(f, "Uncommon"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Epic => write!(f, "Epic"),
            Rarity::Legendary => write!(f, "Legendary"),
        }
    }
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// 三个系统合计的高轴数量 (0..=9)
    pub fn from_high_count(high_count: usize) -> Self {
        match high_count {
            0..=1 => Rarity::Common,
            2..=3 => Rarity::Uncommon,
            4..=5 => Rarity::Rare,
            6..=7 => Rarity::Epic,
            _ => Rarity::Legendary,
        }
    }

    pub fn of(phenotype: &Phenotype) -> Self {
        let high_count = phenotype.color.triangle.high_count()
            + phenotype.finish.triangle.high_count()
            + phenotype.breath_element.triangle.high_count();
        let rarity = Self::from_high_count(high_count);
        if phenotype.breath_element.dark_energy {
            rarity.max(Rarity::Epic)
        } else {
            rarity
        }
    }
}

/// 一批表型的稀有度统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RarityReport {
    pub samples: usize,
    pub rarities: BTreeMap<Rarity, usize>,
    /// 每个系统的高低键出现次数，例如 "color" -> {"HLL": 120}
    pub keys: BTreeMap<String, BTreeMap<String, usize>>,
    /// 每个系统的档位键出现次数，例如 "finish" -> {"031": 7}
    pub tier_keys: BTreeMap<String, BTreeMap<String, usize>>,
}

impl RarityReport {
    pub fn record(&mut self, phenotype: &Phenotype) {
        self.samples += 1;
        *self.rarities.entry(Rarity::of(phenotype)).or_default() += 1;

        let systems = [
            ("color", &phenotype.color.triangle),
            ("finish", &phenotype.finish.triangle),
            ("breath_element", &phenotype.breath_element.triangle),
        ];
        for (system, triangle) in systems {
            count(&mut self.keys, system, &triangle.key);
            count(&mut self.tier_keys, system, &triangle.tier_key);
        }
    }

    pub fn share(&self, rarity: Rarity) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.rarities.get(&rarity).copied().unwrap_or(0) as f64 / self.samples as f64
    }
}

fn count(table: &mut BTreeMap<String, BTreeMap<String, usize>>, system: &str, key: &str) {
    *table
        .entry(system.to_string())
        .or_default()
        .entry(key.to_string())
        .or_default() += 1;
}
