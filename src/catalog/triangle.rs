use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 三轴系统：每个系统由恰好三个基因组成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleSystem {
    Color,
    Finish,
    BreathElement,
}

impl TriangleSystem {
    pub const ALL: [TriangleSystem; 3] = [
        TriangleSystem::Color,
        TriangleSystem::Finish,
        TriangleSystem::BreathElement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriangleSystem::Color => "color",
            TriangleSystem::Finish => "finish",
            TriangleSystem::BreathElement => "breath_element",
        }
    }
}

impl fmt::Display for TriangleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleSystemDefinition {
    /// 轴的顺序决定三位键的字符顺序
    pub axes: [String; 3],
    #[serde(default)]
    pub recessive_extremes: bool,
    /// 64 项名称表，键为三位档位数字 "000".."333"
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

impl TriangleSystemDefinition {
    pub fn name_for(&self, tier_key: &str) -> Option<&str> {
        self.names.get(tier_key).map(String::as_str)
    }

    pub fn axis_index(&self, gene: &str) -> Option<usize> {
        self.axes.iter().position(|axis| axis == gene)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleSystems {
    pub color: TriangleSystemDefinition,
    pub finish: TriangleSystemDefinition,
    pub breath_element: TriangleSystemDefinition,
}

impl TriangleSystems {
    pub fn get(&self, system: TriangleSystem) -> &TriangleSystemDefinition {
        match system {
            TriangleSystem::Color => &self.color,
            TriangleSystem::Finish => &self.finish,
            TriangleSystem::BreathElement => &self.breath_element,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TriangleSystem, &TriangleSystemDefinition)> {
        TriangleSystem::ALL
            .into_iter()
            .map(move |system| (system, self.get(system)))
    }
}

/// (颜色键, 质感键) 触发的特殊名称
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyName {
    pub color: String,
    pub finish: String,
    pub name: String,
}

/// (质感键, 元素键) 触发的修饰前缀
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierPrefix {
    pub finish: String,
    pub element: String,
    pub prefix: String,
}

/// 三位档位键：每位为 0..=3
pub fn is_tier_key(key: &str) -> bool {
    key.len() == 3 && key.bytes().all(|b| (b'0'..=b'3').contains(&b))
}

/// 三位高低键：每位为 H 或 L
pub fn is_high_low_key(key: &str) -> bool {
    key.len() == 3 && key.bytes().all(|b| b == b'H' || b == b'L')
}
