/*
 * Dragonbreed - Trait Catalog
 * 开发心理过程:
 * 1. 目录是只读的静态配置：基因定义、三轴系统、权重表、名称表
 * 2. 启动时加载一次，加载即验证，之后可在线程间自由共享
 * 3. 内置默认目录来自 data/catalog.json
 */

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::catalog_error;
use crate::core::error::{GeneticsError, GeneticsResult};

pub mod gene;
pub mod triangle;
pub mod weights;

pub use gene::{GeneDefinition, GeneSystem, InheritanceType};
pub use triangle::{
    is_high_low_key, is_tier_key, ModifierPrefix, SpecialtyName, TriangleSystem,
    TriangleSystemDefinition, TriangleSystems,
};
pub use weights::{AlleleBias, TierWeights, WeightTables};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// 三轴基因的固定取值范围，与 1.5 阈值和 3 的最大差值配套
pub const TRIANGLE_MIN_ALLELE: u8 = 0;
pub const TRIANGLE_MAX_ALLELE: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitCatalog {
    pub genes: IndexMap<String, GeneDefinition>,
    pub triangle_systems: TriangleSystems,
    pub weights: WeightTables,
    #[serde(default)]
    pub specialty_names: Vec<SpecialtyName>,
    #[serde(default)]
    pub modifier_prefixes: Vec<ModifierPrefix>,
}

impl TraitCatalog {
    /// 内置的默认目录
    pub fn builtin() -> GeneticsResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(content: &str) -> GeneticsResult<Self> {
        let catalog: TraitCatalog = serde_json::from_str(content)?;
        catalog.validate()?;
        debug!(
            "加载基因目录: {} 个基因, {} 个特殊名称, {} 个修饰前缀",
            catalog.genes.len(),
            catalog.specialty_names.len(),
            catalog.modifier_prefixes.len()
        );
        Ok(catalog)
    }

    pub fn load(path: &Path) -> GeneticsResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn gene(&self, name: &str) -> GeneticsResult<&GeneDefinition> {
        self.genes
            .get(name)
            .ok_or_else(|| GeneticsError::UnknownGene(name.to_string()))
    }

    pub fn gene_names(&self) -> impl Iterator<Item = &str> {
        self.genes.keys().map(String::as_str)
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn system(&self, system: TriangleSystem) -> &TriangleSystemDefinition {
        self.triangle_systems.get(system)
    }

    /// 基因所属的三轴系统
    pub fn system_of(&self, gene: &str) -> Option<TriangleSystem> {
        self.triangle_systems
            .iter()
            .find(|(_, definition)| definition.axis_index(gene).is_some())
            .map(|(system, _)| system)
    }

    /// 非三轴基因，按目录声明顺序
    pub fn trait_genes(&self) -> impl Iterator<Item = (&str, &GeneDefinition)> {
        self.genes
            .iter()
            .filter(|(_, gene)| !gene.is_triangle())
            .map(|(name, gene)| (name.as_str(), gene))
    }

    pub fn specialty_name(&self, color_key: &str, finish_key: &str) -> Option<&str> {
        self.specialty_names
            .iter()
            .find(|entry| entry.color == color_key && entry.finish == finish_key)
            .map(|entry| entry.name.as_str())
    }

    pub fn modifier_prefix(&self, finish_key: &str, element_key: &str) -> Option<&str> {
        self.modifier_prefixes
            .iter()
            .find(|entry| entry.finish == finish_key && entry.element == element_key)
            .map(|entry| entry.prefix.as_str())
    }

    pub fn validate(&self) -> GeneticsResult<()> {
        for (name, gene) in &self.genes {
            self.validate_gene(name, gene)?;
        }
        self.validate_triangle_systems()?;
        self.validate_weights()?;

        for entry in &self.specialty_names {
            if !is_high_low_key(&entry.color) || !is_high_low_key(&entry.finish) {
                return Err(catalog_error!(
                    "specialty name '{}' uses malformed keys ({}, {})",
                    entry.name,
                    entry.color,
                    entry.finish
                ));
            }
        }
        for entry in &self.modifier_prefixes {
            if !is_high_low_key(&entry.finish) || !is_high_low_key(&entry.element) {
                return Err(catalog_error!(
                    "modifier prefix '{}' uses malformed keys ({}, {})",
                    entry.prefix,
                    entry.finish,
                    entry.element
                ));
            }
        }
        Ok(())
    }

    fn validate_gene(&self, name: &str, gene: &GeneDefinition) -> GeneticsResult<()> {
        if gene.min_allele > gene.max_allele {
            return Err(catalog_error!(
                "gene '{}' has min_allele {} > max_allele {}",
                name,
                gene.min_allele,
                gene.max_allele
            ));
        }

        if gene.is_triangle() {
            if gene.min_allele != TRIANGLE_MIN_ALLELE || gene.max_allele != TRIANGLE_MAX_ALLELE {
                return Err(catalog_error!(
                    "triangle gene '{}' must span {}..={}",
                    name,
                    TRIANGLE_MIN_ALLELE,
                    TRIANGLE_MAX_ALLELE
                ));
            }
            if gene.phenotype_map.is_some() {
                return Err(catalog_error!(
                    "triangle gene '{}' must not carry a phenotype map",
                    name
                ));
            }
            return Ok(());
        }

        // 线性平均四舍五入与类别取最大都落在 [min, max] 内
        for value in gene.values() {
            if gene.phenotype_name(value).is_none() {
                return Err(catalog_error!(
                    "gene '{}' has no phenotype entry for value {}",
                    name,
                    value
                ));
            }
        }
        Ok(())
    }

    fn validate_triangle_systems(&self) -> GeneticsResult<()> {
        let mut claimed = HashSet::new();
        for (system, definition) in self.triangle_systems.iter() {
            for axis in &definition.axes {
                let gene = self.genes.get(axis).ok_or_else(|| {
                    catalog_error!("{} axis '{}' is not a catalog gene", system, axis)
                })?;
                if !gene.is_triangle() {
                    return Err(catalog_error!(
                        "{} axis '{}' is not flagged as a triangle gene",
                        system,
                        axis
                    ));
                }
                if !claimed.insert(axis.as_str()) {
                    return Err(catalog_error!(
                        "gene '{}' is used by more than one triangle axis",
                        axis
                    ));
                }
            }
            if let Some(key) = definition.names.keys().find(|key| !is_tier_key(key)) {
                return Err(catalog_error!("{} name table has malformed key '{}'", system, key));
            }
        }

        if let Some((name, _)) = self
            .genes
            .iter()
            .find(|(name, gene)| gene.is_triangle() && !claimed.contains(name.as_str()))
        {
            return Err(catalog_error!(
                "triangle gene '{}' does not belong to any triangle system",
                name
            ));
        }
        Ok(())
    }

    fn validate_weights(&self) -> GeneticsResult<()> {
        let weights = &self.weights;
        for system in TriangleSystem::ALL {
            let tiers = weights.triangle_tiers.get(system);
            if tiers.len() != 4 || !weights::is_usable(tiers) {
                return Err(catalog_error!(
                    "{} tier weights must have 4 non-negative entries with a positive sum",
                    system
                ));
            }
        }

        let triangle_values = (TRIANGLE_MAX_ALLELE - TRIANGLE_MIN_ALLELE) as usize + 1;
        for (label, table) in [("low_allele", &weights.low_allele), ("high_allele", &weights.high_allele)] {
            if table.len() != triangle_values || !weights::is_usable(table) {
                return Err(catalog_error!(
                    "{} weights must have {} usable entries",
                    label,
                    triangle_values
                ));
            }
        }

        for (name, table) in &weights.genes {
            let gene = self.gene(name)?;
            if gene.is_triangle() {
                return Err(catalog_error!(
                    "triangle gene '{}' cannot have override weights",
                    name
                ));
            }
            if table.len() != gene.value_count() || !weights::is_usable(table) {
                return Err(catalog_error!(
                    "override weights for '{}' must have {} usable entries",
                    name,
                    gene.value_count()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = TraitCatalog::builtin().unwrap();
        assert_eq!(catalog.gene_count(), 23);
        assert_eq!(catalog.trait_genes().count(), 14);

        for (_, definition) in catalog.triangle_systems.iter() {
            assert!(definition.names.len() <= 64);
            assert!(definition.names.len() >= 63);
        }
        assert_eq!(catalog.system(TriangleSystem::BreathElement).name_for("000"), Some("Void"));
    }

    #[test]
    fn test_system_lookup() {
        let catalog = TraitCatalog::builtin().unwrap();
        assert_eq!(catalog.system_of("color_magenta"), Some(TriangleSystem::Color));
        assert_eq!(catalog.system_of("breath_ice"), Some(TriangleSystem::BreathElement));
        assert_eq!(catalog.system_of("body_size"), None);
        assert!(matches!(
            catalog.gene("tail_fins"),
            Err(GeneticsError::UnknownGene(_))
        ));
    }

    #[test]
    fn test_cross_system_tables() {
        let catalog = TraitCatalog::builtin().unwrap();
        assert_eq!(catalog.specialty_name("LLL", "HHH"), Some("Moonpearl"));
        assert_eq!(catalog.modifier_prefix("LLL", "LLL"), Some("Hollow"));
        assert_eq!(catalog.specialty_name("HLH", "LLL"), None);
    }

    #[test]
    fn test_missing_phenotype_entry_rejected() {
        let mut catalog = TraitCatalog::builtin().unwrap();
        if let Some(map) = catalog.genes["frame"].phenotype_map.as_mut() {
            map.remove(&1);
        }
        assert!(matches!(catalog.validate(), Err(GeneticsError::InvalidCatalog(_))));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut catalog = TraitCatalog::builtin().unwrap();
        catalog.genes["leg_length"].min_allele = 3;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_axis_must_be_triangle_gene() {
        let mut catalog = TraitCatalog::builtin().unwrap();
        catalog.triangle_systems.finish.axes[0] = "body_size".to_string();
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_weight_shapes_checked() {
        let mut catalog = TraitCatalog::builtin().unwrap();
        catalog.weights.triangle_tiers.color = vec![1.0, 1.0, 1.0];
        assert!(catalog.validate().is_err());

        let mut catalog = TraitCatalog::builtin().unwrap();
        catalog.weights.genes.insert("frame".to_string(), vec![1.0, 1.0]);
        assert!(catalog.validate().is_err());

        let mut catalog = TraitCatalog::builtin().unwrap();
        catalog.weights.high_allele = vec![0.0; 4];
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_malformed_name_key_rejected() {
        let mut catalog = TraitCatalog::builtin().unwrap();
        catalog
            .triangle_systems
            .color
            .names
            .insert("HHH".to_string(), "Oops".to_string());
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_gene_order() {
        let catalog = TraitCatalog::builtin().unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let reloaded = TraitCatalog::from_json_str(&json).unwrap();
        let original: Vec<&str> = catalog.gene_names().collect();
        let restored: Vec<&str> = reloaded.gene_names().collect();
        assert_eq!(original, restored);
    }
}
