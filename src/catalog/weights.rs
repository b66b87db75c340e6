use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::triangle::TriangleSystem;

/// 每个三轴系统"有几个轴偏高"的权重，下标 0..=3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierWeights {
    pub color: Vec<f64>,
    pub finish: Vec<f64>,
    pub breath_element: Vec<f64>,
}

impl TierWeights {
    pub fn get(&self, system: TriangleSystem) -> &[f64] {
        match system {
            TriangleSystem::Color => &self.color,
            TriangleSystem::Finish => &self.finish,
            TriangleSystem::BreathElement => &self.breath_element,
        }
    }
}

/// 三轴等位基因的偏置方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlleleBias {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTables {
    pub triangle_tiers: TierWeights,
    /// 偏低轴的等位基因权重，覆盖三轴基因的完整取值范围
    pub low_allele: Vec<f64>,
    /// 偏高轴的等位基因权重
    pub high_allele: Vec<f64>,
    /// 非三轴基因的单独权重；缺省时均匀分布
    #[serde(default)]
    pub genes: BTreeMap<String, Vec<f64>>,
}

impl WeightTables {
    pub fn allele_weights(&self, bias: AlleleBias) -> &[f64] {
        match bias {
            AlleleBias::Low => &self.low_allele,
            AlleleBias::High => &self.high_allele,
        }
    }

    pub fn gene_override(&self, gene: &str) -> Option<&[f64]> {
        self.genes.get(gene).map(Vec::as_slice)
    }
}

/// 权重表必须非负且总和为正
pub fn is_usable(weights: &[f64]) -> bool {
    weights.iter().all(|w| w.is_finite() && *w >= 0.0) && weights.iter().sum::<f64>() > 0.0
}
