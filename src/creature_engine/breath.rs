/*
 * Dragonbreed - Breath Element Naming
 * 开发心理过程:
 * 1. 火/冰/雷三个连续水平决定主元素、混合元素与强度
 * 2. 生成展示名、描述文本和百分比构成
 * 3. 暗能量变体覆盖虚空吐息的展示名与描述
 */

use super::resolver::HIGH_THRESHOLD;

pub const DARK_ENERGY_NAME: &str = "Dark Energy";
pub const DARK_ENERGY_DESCRIPTION: &str =
    "A silent breath of living darkness that swallows the light around it.";

const VOID_NAME: &str = "Void";
const VOID_DESCRIPTION: &str = "An empty, soundless exhalation with no element at all.";
// 次要元素达到主元素此比例时形成混合元素
const BLEND_RATIO: f64 = 0.75;

const ELEMENTS: [&str; 3] = ["Fire", "Ice", "Lightning"];
const SINGLE_NAMES: [&str; 3] = ["Fire", "Frost", "Lightning"];

fn blend_name(first: usize, second: usize) -> &'static str {
    match (first.min(second), first.max(second)) {
        (0, 1) => "Steam",
        (0, 2) => "Plasma",
        _ => "Storm",
    }
}

fn intensity(max_level: f64) -> (&'static str, &'static str) {
    match max_level {
        l if l < 2.0 => ("", "steady"),
        l if l < 2.75 => ("Fierce ", "fierce"),
        _ => ("Raging ", "raging"),
    }
}

/// 按水平从高到低排列的轴下标；相等时保持轴顺序
fn ranked(levels: [f64; 3]) -> [usize; 3] {
    let mut order = [0usize, 1, 2];
    order.sort_by(|a, b| levels[*b].total_cmp(&levels[*a]));
    order
}

/// 返回 (展示名形容词, 描述用强度词, 元素核心名)
/// 没有任何轴达到高位（键为 LLL）时为 None，与虚空键保持一致
fn element_core(levels: [f64; 3]) -> Option<(&'static str, &'static str, &'static str)> {
    let [first, second, third] = ranked(levels);
    let top = levels[first];
    if top < HIGH_THRESHOLD {
        return None;
    }

    let (adjective, word) = intensity(top);
    let core = if levels[third] >= HIGH_THRESHOLD && levels[third] >= top * BLEND_RATIO {
        "Prismatic"
    } else if levels[second] >= top * BLEND_RATIO {
        blend_name(first, second)
    } else {
        SINGLE_NAMES[first]
    };
    Some((adjective, word, core))
}

/// levels 顺序: [火, 冰, 雷]
pub fn display_name(levels: [f64; 3]) -> String {
    match element_core(levels) {
        Some((adjective, _, core)) => format!("{}{} Breath", adjective, core),
        None => VOID_NAME.to_string(),
    }
}

pub fn breakdown(levels: [f64; 3]) -> Vec<String> {
    let clamped = levels.map(|level| level.max(0.0));
    let total: f64 = clamped.iter().sum();
    ELEMENTS
        .iter()
        .zip(clamped)
        .map(|(element, level)| {
            let share = if total > 0.0 { level / total * 100.0 } else { 0.0 };
            format!("{} {:.0}%", element, share)
        })
        .collect()
}

pub fn description(levels: [f64; 3]) -> String {
    match element_core(levels) {
        None => VOID_DESCRIPTION.to_string(),
        Some((_, word, core)) => format!(
            "A {} {} breath: {}.",
            word,
            core.to_lowercase(),
            breakdown(levels).join(", ")
        ),
    }
}
