// 鳞片质感的描述性命名：由不透明度/光泽/虹彩三个连续水平直接生成
// 比 64 项档位名称更平滑多样

/// 连续水平分为四个描述档
pub fn descriptor_band(level: f64) -> usize {
    match level {
        l if l < 0.75 => 0,
        l if l < 1.5 => 1,
        l if l < 2.25 => 2,
        _ => 3,
    }
}

const OPACITY: [&str; 4] = ["Sheer", "Veiled", "Clouded", "Solid"];
const OPACITY_NOUN: [&str; 4] = ["Glasscale", "Veilscale", "Cloudscale", "Stonescale"];
const SHINE: [&str; 4] = ["Matte", "Satin", "Glossy", "Mirrored"];
const IRIDESCENCE: [&str; 4] = ["Plain", "Shimmering", "Iridescent", "Opalescent"];

/// levels 顺序: [不透明度, 光泽, 虹彩]
pub fn display_name(levels: [f64; 3]) -> String {
    let [opacity, shine, iridescence] = levels.map(descriptor_band);

    let mut parts = Vec::with_capacity(3);
    if iridescence > 0 {
        parts.push(IRIDESCENCE[iridescence]);
    }
    parts.push(SHINE[shine]);
    parts.push(OPACITY_NOUN[opacity]);
    parts.join(" ")
}

pub fn breakdown(levels: [f64; 3]) -> Vec<String> {
    let [opacity, shine, iridescence] = levels;
    vec![
        format!("Opacity: {} ({:.2})", OPACITY[descriptor_band(opacity)], opacity),
        format!("Shine: {} ({:.2})", SHINE[descriptor_band(shine)], shine),
        format!(
            "Iridescence: {} ({:.2})",
            IRIDESCENCE[descriptor_band(iridescence)],
            iridescence
        ),
    ]
}
