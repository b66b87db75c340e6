use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 遗传方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceType {
    /// 两条等位基因取平均，四舍五入后查表
    Linear,
    /// 较高的等位基因直接胜出
    Categorical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneSystem {
    Triangle,
}

/// 目录中的单个基因定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneDefinition {
    pub min_allele: u8,
    pub max_allele: u8,
    pub inheritance: InheritanceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenotype_map: Option<BTreeMap<u8, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<GeneSystem>,
}

impl GeneDefinition {
    pub fn contains(&self, value: u8) -> bool {
        (self.min_allele..=self.max_allele).contains(&value)
    }

    /// 合法取值个数
    pub fn value_count(&self) -> usize {
        (self.max_allele as usize + 1).saturating_sub(self.min_allele as usize)
    }

    pub fn values(&self) -> impl Iterator<Item = u8> {
        self.min_allele..=self.max_allele
    }

    pub fn is_triangle(&self) -> bool {
        self.system == Some(GeneSystem::Triangle)
    }

    /// 突变后的值夹在合法范围内
    pub fn clamp(&self, value: i16) -> u8 {
        value.clamp(self.min_allele as i16, self.max_allele as i16) as u8
    }

    pub fn phenotype_name(&self, value: u8) -> Option<&str> {
        self.phenotype_map
            .as_ref()
            .and_then(|map| map.get(&value))
            .map(String::as_str)
    }
}
