/*
 * Dragonbreed - Phenotype Resolver
 * 开发心理过程:
 * 1. 非三轴基因: 线性取平均后四舍五入查表，类别取较大值查表
 * 2. 三轴系统: 每轴算连续水平（标准平均或隐性极值拉拽），再分类 H/L 与档位
 * 3. 颜色、质感、吐息各自从连续水平生成展示名
 * 4. 暗能量只在创建个体时掷一次，解析时使用存储的结果，绝不重掷
 */

use log::{debug, trace, warn};
use std::sync::Arc;

use super::breath;
use super::color;
use super::finish;
use super::genotype::{AllelePair, GeneticCode};
use super::phenotype::{
    Phenotype, ResolvedBreathElement, ResolvedColor, ResolvedFinish, ResolvedTrait,
    TriangleResult,
};
use crate::catalog::{GeneDefinition, InheritanceType, TraitCatalog, TriangleSystem};
use crate::core::config::ResolverConfig;
use crate::core::error::{GeneticsError, GeneticsResult};
use crate::utils::random::RandomSource;

/// 连续水平不低于此值即为 High
pub const HIGH_THRESHOLD: f64 = 1.5;
/// 三轴全低的分类键；吐息系统中即为虚空
pub const VOID_KEY: &str = "LLL";
/// 64 项名称表中未分配组合的名称
pub const UNKNOWN_NAME: &str = "???";

const MAX_SPREAD: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct PhenotypeResolver {
    catalog: Arc<TraitCatalog>,
    config: ResolverConfig,
}

impl PhenotypeResolver {
    pub fn new(catalog: Arc<TraitCatalog>, config: ResolverConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &TraitCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// 解析完整表型。`dark_energy` 是个体创建时掷出并存储的标志，
    /// 只有吐息分类为虚空时才生效。
    pub fn resolve(&self, code: &GeneticCode, dark_energy: bool) -> GeneticsResult<Phenotype> {
        code.validate_against(&self.catalog, "resolve")?;

        let traits = self
            .catalog
            .trait_genes()
            .map(|(name, gene)| {
                let resolved = self.resolve_trait(name, gene, code.require(name, "resolve")?)?;
                Ok::<_, GeneticsError>((name.to_string(), resolved))
            })
            .collect::<GeneticsResult<_>>()?;

        let color_tri = self.resolve_triangle(TriangleSystem::Color, code)?;
        let finish_tri = self.resolve_triangle(TriangleSystem::Finish, code)?;
        let breath_tri = self.resolve_triangle(TriangleSystem::BreathElement, code)?;

        let specialty_name = self
            .catalog
            .specialty_name(&color_tri.key, &finish_tri.key)
            .map(str::to_string);
        let modifier_prefix = self
            .catalog
            .modifier_prefix(&finish_tri.key, &breath_tri.key)
            .map(str::to_string);

        let rgb = color::cmy_to_rgb(color_tri.levels);
        let color = ResolvedColor {
            rgb,
            hex: color::to_hex(rgb),
            display_name: color::display_name(rgb),
            specialty_name,
            modifier_prefix,
            triangle: color_tri,
        };

        let finish = ResolvedFinish {
            display_name: finish::display_name(finish_tri.levels),
            breakdown: finish::breakdown(finish_tri.levels),
            triangle: finish_tri,
        };

        let breath_element = self.resolve_breath(breath_tri, dark_energy);

        debug!(
            "解析表型: 颜色 {} ({}), 质感 {}, 吐息 {}{}",
            color.display_name,
            color.triangle.key,
            finish.display_name,
            breath_element.display_name,
            if breath_element.dark_energy { " [暗能量]" } else { "" }
        );

        Ok(Phenotype {
            traits,
            color,
            finish,
            breath_element,
        })
    }

    /// 为新个体掷一次暗能量。吐息不是虚空时直接返回 false，且不消耗随机数。
    pub fn roll_dark_energy<R: RandomSource>(
        &self,
        code: &GeneticCode,
        rng: &mut R,
    ) -> GeneticsResult<bool> {
        let breath_tri = self.resolve_triangle(TriangleSystem::BreathElement, code)?;
        if !breath_tri.is_void() {
            return Ok(false);
        }
        let rolled = rng.chance(self.config.dark_energy_chance);
        if rolled {
            debug!("虚空吐息掷出暗能量变体");
        }
        Ok(rolled)
    }

    pub fn resolve_trait(
        &self,
        name: &str,
        gene: &GeneDefinition,
        pair: AllelePair,
    ) -> GeneticsResult<ResolvedTrait> {
        let [first, second] = pair;
        let (level, value, rounded) = match gene.inheritance {
            InheritanceType::Linear => {
                // 半数向上取整: (a + b + 1) / 2
                let value = ((first as u16 + second as u16 + 1) / 2) as u8;
                ((first as f64 + second as f64) / 2.0, value, Some(value))
            }
            InheritanceType::Categorical => {
                let value = first.max(second);
                (value as f64, value, None)
            }
        };

        let name_text = gene
            .phenotype_name(value)
            .ok_or_else(|| GeneticsError::UnresolvableValue {
                gene: name.to_string(),
                value,
            })?;

        trace!("性状 {}: {:?} -> {}", name, pair, name_text);
        Ok(ResolvedTrait {
            level,
            rounded,
            name: name_text.to_string(),
        })
    }

    pub fn resolve_triangle(
        &self,
        system: TriangleSystem,
        code: &GeneticCode,
    ) -> GeneticsResult<TriangleResult> {
        let definition = self.catalog.system(system);
        let mut levels = [0.0; 3];
        for (slot, axis) in levels.iter_mut().zip(definition.axes.iter()) {
            let pair = code.require(axis, system.as_str())?;
            *slot = axis_level(
                pair,
                definition.recessive_extremes,
                self.config.pull_strength,
            );
        }

        let key: String = levels.iter().map(|level| classify(*level)).collect();
        let tier_key: String = levels
            .iter()
            .map(|level| char::from(b'0' + tier_of(*level)))
            .collect();

        let name = match definition.name_for(&tier_key) {
            Some(name) => name.to_string(),
            None => {
                warn!("{} 名称表没有档位 {} 的条目", system, tier_key);
                UNKNOWN_NAME.to_string()
            }
        };

        Ok(TriangleResult {
            levels,
            key,
            tier_key,
            name,
        })
    }

    fn resolve_breath(&self, triangle: TriangleResult, dark_energy: bool) -> ResolvedBreathElement {
        let levels = triangle.levels;
        let applied = if dark_energy && !triangle.is_void() {
            warn!(
                "忽略暗能量标志: 吐息分类为 {} 而不是 {}",
                triangle.key, VOID_KEY
            );
            false
        } else {
            dark_energy
        };

        let (display_name, description) = if applied {
            (
                breath::DARK_ENERGY_NAME.to_string(),
                breath::DARK_ENERGY_DESCRIPTION.to_string(),
            )
        } else {
            (breath::display_name(levels), breath::description(levels))
        };

        ResolvedBreathElement {
            display_name,
            description,
            breakdown: breath::breakdown(levels),
            dark_energy: applied,
            triangle,
        }
    }
}

/// 单轴连续水平
pub fn axis_level(pair: AllelePair, recessive_extremes: bool, pull_strength: f64) -> f64 {
    let [first, second] = pair.map(f64::from);
    let mean = (first + second) / 2.0;
    if !recessive_extremes {
        return mean;
    }
    let spread = (first - second).abs() / MAX_SPREAD;
    mean + (HIGH_THRESHOLD - mean) * spread * pull_strength
}

pub fn classify(level: f64) -> char {
    if level >= HIGH_THRESHOLD {
        'H'
    } else {
        'L'
    }
}

/// 连续水平对应的档位 0..=3，半数向上取整
pub fn tier_of(level: f64) -> u8 {
    (level + 0.5).floor().clamp(0.0, 3.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature_engine::generator::GenotypeGenerator;
    use crate::utils::random::{RandomGenerator, SequenceRandom};

    fn resolver() -> PhenotypeResolver {
        let catalog = Arc::new(TraitCatalog::builtin().unwrap());
        PhenotypeResolver::new(catalog, ResolverConfig::default())
    }

    /// 所有基因都取最小值，再覆盖指定的三轴系统
    fn uniform_code(
        catalog: &TraitCatalog,
        overrides: &[(TriangleSystem, [AllelePair; 3])],
    ) -> GeneticCode {
        let mut code: GeneticCode = catalog
            .genes
            .iter()
            .map(|(name, gene)| (name.clone(), [gene.min_allele, gene.min_allele]))
            .collect();
        for (system, pairs) in overrides {
            for (axis, pair) in catalog.system(*system).axes.iter().zip(pairs) {
                code.insert(axis, *pair);
            }
        }
        code
    }

    #[test]
    fn test_classification_boundary() {
        assert_eq!(classify(1.5), 'H');
        assert_eq!(classify(1.49999), 'L');
        assert_eq!(classify(0.0), 'L');
        assert_eq!(classify(3.0), 'H');
    }

    #[test]
    fn test_tier_rounding() {
        assert_eq!(tier_of(0.0), 0);
        assert_eq!(tier_of(0.49), 0);
        assert_eq!(tier_of(0.5), 1);
        assert_eq!(tier_of(1.5), 2);
        assert_eq!(tier_of(2.5), 3);
        assert_eq!(tier_of(3.0), 3);
    }

    #[test]
    fn test_recessive_pull() {
        for pull in [0.0, 0.3, 0.8, 1.0] {
            assert!((axis_level([0, 3], true, pull) - 1.5).abs() < 1e-12);
            assert!((axis_level([0, 0], true, pull) - 0.0).abs() < 1e-12);
            assert!((axis_level([3, 3], true, pull) - 3.0).abs() < 1e-12);
        }
        // [2, 3]: 均值 2.5, 差 1/3, 拉拽 0.8 -> 2.5 - 1.0 * (1/3) * 0.8
        let level = axis_level([2, 3], true, 0.8);
        assert!((level - (2.5 - 0.8 / 3.0)).abs() < 1e-12);
        assert_eq!(axis_level([2, 3], false, 0.8), 2.5);
    }

    #[test]
    fn test_linear_and_categorical_traits() {
        let resolver = resolver();
        let catalog = resolver.catalog();

        let size = catalog.gene("body_size").unwrap();
        let resolved = resolver.resolve_trait("body_size", size, [1, 2]).unwrap();
        assert_eq!(resolved.level, 1.5);
        assert_eq!(resolved.rounded, Some(2));
        assert_eq!(resolved.name, "Medium");

        let wings = catalog.gene("wing_type").unwrap();
        let resolved = resolver.resolve_trait("wing_type", wings, [0, 3]).unwrap();
        assert_eq!(resolved.level, 3.0);
        assert_eq!(resolved.rounded, None);
        assert_eq!(resolved.name, "Crystalline");
    }

    #[test]
    fn test_missing_phenotype_entry_is_unresolvable() {
        let mut catalog = TraitCatalog::builtin().unwrap();
        if let Some(map) = catalog
            .genes
            .get_mut("body_size")
            .and_then(|gene| gene.phenotype_map.as_mut())
        {
            map.remove(&4);
        }
        let resolver = PhenotypeResolver::new(Arc::new(catalog), ResolverConfig::default());
        let gene = resolver.catalog().gene("body_size").unwrap().clone();

        match resolver.resolve_trait("body_size", &gene, [4, 4]) {
            Err(GeneticsError::UnresolvableValue { gene, value }) => {
                assert_eq!(gene, "body_size");
                assert_eq!(value, 4);
            }
            other => panic!("Expected UnresolvableValue, got {:?}", other),
        }
    }

    #[test]
    fn test_unassigned_tier_falls_back_to_unknown() {
        let resolver = resolver();
        let code = uniform_code(
            resolver.catalog(),
            &[
                (TriangleSystem::Finish, [[3, 3], [0, 0], [3, 3]]),
                (TriangleSystem::BreathElement, [[3, 3], [3, 3], [0, 0]]),
            ],
        );
        let phenotype = resolver.resolve(&code, false).unwrap();
        assert_eq!(phenotype.finish.triangle.tier_key, "303");
        assert_eq!(phenotype.finish.triangle.name, UNKNOWN_NAME);
        assert_eq!(phenotype.breath_element.triangle.tier_key, "330");
        assert_eq!(phenotype.breath_element.triangle.name, UNKNOWN_NAME);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = resolver();
        let generator = GenotypeGenerator::new(Arc::new(resolver.catalog().clone()));
        let mut rng = RandomGenerator::with_seed(5);
        for _ in 0..200 {
            let code = generator.generate(&mut rng).unwrap();
            let first = resolver.resolve(&code, false).unwrap();
            let second = resolver.resolve(&code, false).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.traits.len(), 14);
        }
    }

    #[test]
    fn test_void_breath_name_tracks_void_key() {
        let resolver = resolver();
        let generator = GenotypeGenerator::new(Arc::new(resolver.catalog().clone()));
        let mut rng = RandomGenerator::with_seed(17);
        for _ in 0..1_000 {
            let code = generator.generate(&mut rng).unwrap();
            let breath = resolver.resolve(&code, false).unwrap().breath_element;
            assert_eq!(
                breath.display_name == "Void",
                breath.triangle.key == VOID_KEY,
                "{} named {}",
                breath.triangle.key,
                breath.display_name
            );
        }
    }

    #[test]
    fn test_structural_mismatch_on_missing_gene() {
        let resolver = resolver();
        let code: GeneticCode = uniform_code(resolver.catalog(), &[])
            .iter()
            .filter(|(gene, _)| *gene != "color_cyan")
            .map(|(gene, pair)| (gene.to_string(), pair))
            .collect();
        assert!(matches!(
            resolver.resolve(&code, false),
            Err(GeneticsError::StructuralMismatch { .. })
        ));
    }

    #[test]
    fn test_specialty_and_modifier_lookup() {
        let resolver = resolver();
        // 颜色 HLL + 质感 LHH -> Abyssal Opal；质感 LHH + 吐息 HLL -> Molten
        let code = uniform_code(
            resolver.catalog(),
            &[
                (TriangleSystem::Color, [[3, 3], [0, 0], [0, 0]]),
                (TriangleSystem::Finish, [[0, 0], [3, 3], [3, 3]]),
                (TriangleSystem::BreathElement, [[3, 3], [0, 0], [0, 0]]),
            ],
        );
        let phenotype = resolver.resolve(&code, false).unwrap();
        assert_eq!(phenotype.color.triangle.key, "HLL");
        assert_eq!(phenotype.color.specialty_name.as_deref(), Some("Abyssal Opal"));
        assert_eq!(phenotype.color.modifier_prefix.as_deref(), Some("Molten"));
        assert_eq!(phenotype.title(), "Molten Abyssal Opal");
        assert_eq!(phenotype.color.hex, "#00FFFF");
    }

    #[test]
    fn test_dark_energy_roll_only_for_void() {
        let resolver = resolver();
        let void = uniform_code(resolver.catalog(), &[]);
        let fiery = uniform_code(
            resolver.catalog(),
            &[(TriangleSystem::BreathElement, [[3, 3], [0, 0], [0, 0]])],
        );

        let mut always = SequenceRandom::constant(0.0);
        assert!(resolver.roll_dark_energy(&void, &mut always).unwrap());
        assert!(!resolver.roll_dark_energy(&fiery, &mut always).unwrap());

        let mut never = SequenceRandom::constant(0.99);
        assert!(!resolver.roll_dark_energy(&void, &mut never).unwrap());
    }

    #[test]
    fn test_stored_dark_energy_persists_across_resolutions() {
        let resolver = resolver();
        let code = uniform_code(resolver.catalog(), &[]);
        let mut rng = SequenceRandom::constant(0.0);
        let flag = resolver.roll_dark_energy(&code, &mut rng).unwrap();
        assert!(flag);

        for _ in 0..50 {
            let phenotype = resolver.resolve(&code, flag).unwrap();
            assert_eq!(phenotype.breath_element.triangle.key, VOID_KEY);
            assert!(phenotype.breath_element.dark_energy);
            assert_eq!(phenotype.breath_element.display_name, breath::DARK_ENERGY_NAME);
        }

        let plain = resolver.resolve(&code, false).unwrap();
        assert!(!plain.breath_element.dark_energy);
        assert_eq!(plain.breath_element.display_name, "Void");
    }

    #[test]
    fn test_dark_energy_flag_ignored_without_void() {
        let resolver = resolver();
        let code = uniform_code(
            resolver.catalog(),
            &[(TriangleSystem::BreathElement, [[0, 0], [3, 3], [0, 0]])],
        );
        let phenotype = resolver.resolve(&code, true).unwrap();
        assert!(!phenotype.breath_element.dark_energy);
        assert_eq!(phenotype.breath_element.display_name, "Raging Frost Breath");
    }
}
