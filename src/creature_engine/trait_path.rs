// 表型字段的类型化路径：任务、成就等下游规则按稳定的点分路径读取表型
// 取代按字符串动态访问字段

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::phenotype::Phenotype;
use crate::core::error::GeneticsError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TraitPath {
    /// `traits.<gene>.name`
    Trait(String),
    ColorDisplayName,
    FinishDisplayName,
    BreathElementDisplayName,
    ColorSpecialtyName,
    ColorModifierPrefix,
    /// 64 项名称表给出的基础名称
    ColorName,
    FinishName,
    BreathElementName,
    DarkEnergy,
}

const FIXED_PATHS: [(&str, TraitPath); 9] = [
    ("color.displayName", TraitPath::ColorDisplayName),
    ("finish.displayName", TraitPath::FinishDisplayName),
    ("breathElement.displayName", TraitPath::BreathElementDisplayName),
    ("color.specialtyName", TraitPath::ColorSpecialtyName),
    ("color.modifierPrefix", TraitPath::ColorModifierPrefix),
    ("color.name", TraitPath::ColorName),
    ("finish.name", TraitPath::FinishName),
    ("breathElement.name", TraitPath::BreathElementName),
    ("breathElement.darkEnergy", TraitPath::DarkEnergy),
];

impl FromStr for TraitPath {
    type Err = GeneticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("traits.") {
            return match rest.strip_suffix(".name") {
                Some(gene) if !gene.is_empty() && !gene.contains('.') => {
                    Ok(TraitPath::Trait(gene.to_string()))
                }
                _ => Err(GeneticsError::InvalidPath(s.to_string())),
            };
        }

        FIXED_PATHS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, path)| path.clone())
            .ok_or_else(|| GeneticsError::InvalidPath(s.to_string()))
    }
}

impl fmt::Display for TraitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let TraitPath::Trait(gene) = self {
            return write!(f, "traits.{}.name", gene);
        }
        let name = FIXED_PATHS
            .iter()
            .find(|(_, path)| path == self)
            .map(|(name, _)| *name)
            .unwrap_or_default();
        f.write_str(name)
    }
}

impl Serialize for TraitPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TraitPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Phenotype {
    /// 按路径读取字段；可选字段缺失或基因不存在时返回 None
    pub fn value_at(&self, path: &TraitPath) -> Option<String> {
        match path {
            TraitPath::Trait(gene) => self.trait_name(gene).map(str::to_string),
            TraitPath::ColorDisplayName => Some(self.color.display_name.clone()),
            TraitPath::FinishDisplayName => Some(self.finish.display_name.clone()),
            TraitPath::BreathElementDisplayName => Some(self.breath_element.display_name.clone()),
            TraitPath::ColorSpecialtyName => self.color.specialty_name.clone(),
            TraitPath::ColorModifierPrefix => self.color.modifier_prefix.clone(),
            TraitPath::ColorName => Some(self.color.triangle.name.clone()),
            TraitPath::FinishName => Some(self.finish.triangle.name.clone()),
            TraitPath::BreathElementName => Some(self.breath_element.triangle.name.clone()),
            TraitPath::DarkEnergy => Some(self.breath_element.dark_energy.to_string()),
        }
    }
}

/// "路径上的值等于 Y" 形式的规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitPredicate {
    pub path: TraitPath,
    pub equals: String,
}

impl TraitPredicate {
    pub fn new(path: TraitPath, equals: impl Into<String>) -> Self {
        Self {
            path,
            equals: equals.into(),
        }
    }

    pub fn matches(&self, phenotype: &Phenotype) -> bool {
        phenotype
            .value_at(&self.path)
            .is_some_and(|value| value == self.equals)
    }
}
