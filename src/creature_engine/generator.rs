/*
 * Dragonbreed - Genotype Generator
 * 开发心理过程:
 * 1. 野生个体的基因型分两步生成：先决定每个三轴系统有几个轴偏高，再抽取等位基因
 * 2. "几个轴偏高" 由目录的档位权重控制，是主要的稀有度杠杆
 * 3. 偏高/偏低的轴分别使用高/低等位基因权重，两条等位基因独立抽取
 * 4. 其余基因使用各自的覆盖权重，没有则均匀分布
 */

use log::{debug, trace};
use std::sync::Arc;

use super::genotype::{AllelePair, GeneticCode};
use crate::catalog::{AlleleBias, GeneDefinition, TraitCatalog, TriangleSystem};
use crate::catalog_error;
use crate::core::error::GeneticsResult;
use crate::utils::random::RandomSource;

/// 一个三轴系统的偏置方案：哪些轴偏高
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPlan {
    pub high_axes: [bool; 3],
}

impl TierPlan {
    pub fn high_count(&self) -> usize {
        self.high_axes.iter().filter(|high| **high).count()
    }

    pub fn bias(&self, axis: usize) -> AlleleBias {
        if self.high_axes[axis] {
            AlleleBias::High
        } else {
            AlleleBias::Low
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenotypeGenerator {
    catalog: Arc<TraitCatalog>,
}

impl GenotypeGenerator {
    pub fn new(catalog: Arc<TraitCatalog>) -> Self {
        Self { catalog }
    }

    /// 生成一个野生基因型；目录在构造之后被改坏时返回 InvalidCatalog / UnknownGene
    pub fn generate<R: RandomSource>(&self, rng: &mut R) -> GeneticsResult<GeneticCode> {
        let mut code = GeneticCode::new();

        for (system, definition) in self.catalog.triangle_systems.iter() {
            let plan = self.plan_tiers(system, rng)?;
            trace!("{} 偏高轴: {:?}", system, plan.high_axes);

            for (axis, gene_name) in definition.axes.iter().enumerate() {
                let gene = self.catalog.gene(gene_name)?;
                let weights = self.catalog.weights.allele_weights(plan.bias(axis));
                code.insert(gene_name, draw_pair(gene_name, gene, Some(weights), rng)?);
            }
        }

        for (name, gene) in self.catalog.trait_genes() {
            let weights = self.catalog.weights.gene_override(name);
            code.insert(name, draw_pair(name, gene, weights, rng)?);
        }

        debug!("生成野生基因型: {} 个基因", code.len());
        Ok(code)
    }

    /// 按档位权重决定偏高轴的个数，再均匀地决定是哪几个轴
    pub fn plan_tiers<R: RandomSource>(
        &self,
        system: TriangleSystem,
        rng: &mut R,
    ) -> GeneticsResult<TierPlan> {
        let tier_weights = self.catalog.weights.triangle_tiers.get(system);
        let high_count = rng
            .weighted_index(tier_weights)
            .ok_or_else(|| catalog_error!("{} tier weights have no positive entry", system))?;
        if high_count > 3 {
            return Err(catalog_error!(
                "{} tier weights select {} high axes out of 3",
                system,
                high_count
            ));
        }

        let mut axes = [0usize, 1, 2];
        rng.shuffle(&mut axes);

        let mut high_axes = [false; 3];
        for axis in axes.iter().take(high_count) {
            high_axes[*axis] = true;
        }
        Ok(TierPlan { high_axes })
    }
}

fn draw_pair<R: RandomSource>(
    name: &str,
    gene: &GeneDefinition,
    weights: Option<&[f64]>,
    rng: &mut R,
) -> GeneticsResult<AllelePair> {
    Ok([
        draw_allele(name, gene, weights, rng)?,
        draw_allele(name, gene, weights, rng)?,
    ])
}

/// 权重下标对应 min_allele 起的偏移
fn draw_allele<R: RandomSource>(
    name: &str,
    gene: &GeneDefinition,
    weights: Option<&[f64]>,
    rng: &mut R,
) -> GeneticsResult<u8> {
    match weights {
        Some(weights) => {
            let offset = rng
                .weighted_index(weights)
                .ok_or_else(|| catalog_error!("allele weights for '{}' have no positive entry", name))?;
            Ok(gene.clamp(gene.min_allele as i16 + offset as i16))
        }
        None => Ok(rng.range_inclusive(gene.min_allele as u32, gene.max_allele as u32) as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GeneticsError;
    use crate::utils::random::{RandomGenerator, SequenceRandom};

    fn generator() -> GenotypeGenerator {
        GenotypeGenerator::new(Arc::new(TraitCatalog::builtin().unwrap()))
    }

    #[test]
    fn test_generated_codes_are_complete_and_in_range() {
        let generator = generator();
        let mut rng = RandomGenerator::with_seed(2024);
        for _ in 0..500 {
            let code = generator.generate(&mut rng).unwrap();
            assert_eq!(code.len(), generator.catalog.gene_count());
            assert!(code.validate_against(&generator.catalog, "generated").is_ok());
        }
    }

    #[test]
    fn test_same_seed_same_genotype() {
        let generator = generator();
        let a = generator.generate(&mut RandomGenerator::with_seed(99)).unwrap();
        let b = generator.generate(&mut RandomGenerator::with_seed(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_high_plan_rate_follows_tier_weights() {
        let mut catalog = TraitCatalog::builtin().unwrap();
        catalog.weights.triangle_tiers.color = vec![50.0, 30.0, 15.0, 5.0];
        let generator = GenotypeGenerator::new(Arc::new(catalog));
        let mut rng = RandomGenerator::with_seed(1234);

        let samples = 10_000;
        let all_high = (0..samples)
            .filter(|_| generator.plan_tiers(TriangleSystem::Color, &mut rng).unwrap().high_count() == 3)
            .count();
        let rate = all_high as f64 / samples as f64;
        // 期望约 5%，而不是 1/64 或 1/8
        assert!(rate > 0.04 && rate < 0.06, "all-high rate {}", rate);
    }

    #[test]
    fn test_plan_picks_axes_uniformly() {
        let generator = generator();
        let mut rng = RandomGenerator::with_seed(77);
        let mut per_axis = [0usize; 3];
        let mut single = 0;
        for _ in 0..9000 {
            let plan = generator.plan_tiers(TriangleSystem::Finish, &mut rng).unwrap();
            if plan.high_count() == 1 {
                single += 1;
                for (axis, high) in plan.high_axes.iter().enumerate() {
                    if *high {
                        per_axis[axis] += 1;
                    }
                }
            }
        }
        for count in per_axis {
            let share = count as f64 / single as f64;
            assert!(share > 0.28 && share < 0.39, "axis share {}", share);
        }
    }

    #[test]
    fn test_weight_offsets_start_at_min_allele() {
        let gene = GeneDefinition {
            min_allele: 2,
            max_allele: 4,
            inheritance: crate::catalog::InheritanceType::Linear,
            phenotype_map: None,
            system: None,
        };
        let mut rng = SequenceRandom::constant(0.0);
        assert_eq!(draw_allele("test", &gene, Some(&[0.0, 0.0, 1.0]), &mut rng).unwrap(), 4);
        assert_eq!(draw_allele("test", &gene, None, &mut rng).unwrap(), 2);
    }

    #[test]
    fn test_corrupted_catalog_fails_instead_of_skipping() {
        let mut rng = RandomGenerator::with_seed(8);

        let mut renamed = TraitCatalog::builtin().unwrap();
        renamed.triangle_systems.color.axes[0] = "color_missing".to_string();
        let generator = GenotypeGenerator::new(Arc::new(renamed));
        assert!(matches!(
            generator.generate(&mut rng),
            Err(GeneticsError::UnknownGene(gene)) if gene == "color_missing"
        ));

        let mut no_tiers = TraitCatalog::builtin().unwrap();
        no_tiers.weights.triangle_tiers.finish = vec![0.0, 0.0, 0.0, 0.0];
        let generator = GenotypeGenerator::new(Arc::new(no_tiers));
        assert!(matches!(
            generator.generate(&mut rng),
            Err(GeneticsError::InvalidCatalog(_))
        ));

        let mut too_many = TraitCatalog::builtin().unwrap();
        too_many.weights.triangle_tiers.color = vec![0.0, 0.0, 0.0, 0.0, 1.0];
        let generator = GenotypeGenerator::new(Arc::new(too_many));
        assert!(matches!(
            generator.plan_tiers(TriangleSystem::Color, &mut rng),
            Err(GeneticsError::InvalidCatalog(_))
        ));

        let mut no_alleles = TraitCatalog::builtin().unwrap();
        no_alleles.weights.high_allele = vec![0.0; 4];
        no_alleles.weights.triangle_tiers.breath_element = vec![0.0, 0.0, 0.0, 1.0];
        let generator = GenotypeGenerator::new(Arc::new(no_alleles));
        assert!(matches!(
            generator.generate(&mut rng),
            Err(GeneticsError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_end_to_end_all_high_color_rate() {
        let mut catalog = TraitCatalog::builtin().unwrap();
        catalog.weights.triangle_tiers.color = vec![50.0, 30.0, 15.0, 5.0];
        catalog.weights.low_allele = vec![1.0, 0.0, 0.0, 0.0];
        catalog.weights.high_allele = vec![0.0, 0.0, 0.0, 1.0];
        let catalog = Arc::new(catalog);
        let generator = GenotypeGenerator::new(catalog.clone());
        let mut rng = RandomGenerator::with_seed(5150);

        let samples = 10_000;
        let mut all_high = 0;
        for _ in 0..samples {
            let code = generator.generate(&mut rng).unwrap();
            let axes = &catalog.triangle_systems.color.axes;
            if axes.iter().all(|axis| code.get(axis) == Some([3, 3])) {
                all_high += 1;
            }
        }
        let rate = all_high as f64 / samples as f64;
        assert!(rate > 0.04 && rate < 0.06, "all-high rate {}", rate);
    }
}
