// 表型数据结构：由基因型解析得到的、可展示的性状集合
// 字段名按 camelCase 序列化，与下游按路径读取的名称一致

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::resolver::VOID_KEY;

/// 非三轴基因的解析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrait {
    /// 线性基因为两条等位基因的平均值，类别基因为较大值
    pub level: f64,
    /// 线性基因四舍五入后用于查表的值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounded: Option<u8>,
    pub name: String,
}

/// 三轴系统的公共解析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriangleResult {
    pub levels: [f64; 3],
    /// 高低分类键，例如 "HLH"
    pub key: String,
    /// 64 项名称表的三位档位键，例如 "302"
    pub tier_key: String,
    pub name: String,
}

impl TriangleResult {
    pub fn high_count(&self) -> usize {
        self.key.chars().filter(|c| *c == 'H').count()
    }

    pub fn is_void(&self) -> bool {
        self.key == VOID_KEY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColor {
    #[serde(flatten)]
    pub triangle: TriangleResult,
    pub rgb: [u8; 3],
    pub hex: String,
    pub display_name: String,
    pub specialty_name: Option<String>,
    pub modifier_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFinish {
    #[serde(flatten)]
    pub triangle: TriangleResult,
    pub display_name: String,
    pub breakdown: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBreathElement {
    #[serde(flatten)]
    pub triangle: TriangleResult,
    pub display_name: String,
    pub description: String,
    pub breakdown: Vec<String>,
    pub dark_energy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phenotype {
    pub traits: IndexMap<String, ResolvedTrait>,
    pub color: ResolvedColor,
    pub finish: ResolvedFinish,
    pub breath_element: ResolvedBreathElement,
}

impl Phenotype {
    pub fn trait_name(&self, gene: &str) -> Option<&str> {
        self.traits.get(gene).map(|resolved| resolved.name.as_str())
    }

    /// 完整展示名，例如 "Molten Abyssal Opal"
    pub fn title(&self) -> String {
        let color = self
            .color
            .specialty_name
            .as_deref()
            .unwrap_or(&self.color.display_name);
        match &self.color.modifier_prefix {
            Some(prefix) => format!("{} {}", prefix, color),
            None => color.to_string(),
        }
    }
}
