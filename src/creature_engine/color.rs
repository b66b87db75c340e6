/*
 * Dragonbreed - Color Rendering
 * 开发心理过程:
 * 1. 青/品红/黄三轴按减色法换算为 RGB：每个轴吃掉一个通道
 * 2. 展示名直接分析 RGB 的色相与明度，保证名称与色块一致
 */

/// 三轴连续水平 (0..=3) 换算为 RGB
pub fn cmy_to_rgb(levels: [f64; 3]) -> [u8; 3] {
    levels.map(|level| {
        let ink = (level / 3.0).clamp(0.0, 1.0);
        (255.0 * (1.0 - ink)).round() as u8
    })
}

pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

/// 返回 (色相角度, 饱和度, 明度)
pub fn rgb_to_hsl(rgb: [u8; 3]) -> (f64, f64, f64) {
    let [r, g, b] = rgb.map(|c| c as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;

    if delta.abs() < f64::EPSILON {
        return (0.0, 0.0, lightness);
    }

    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
    let hue = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    (hue, saturation, lightness)
}

// 色相上界 -> 名称
const HUE_NAMES: [(f64, &str); 13] = [
    (15.0, "Red"),
    (40.0, "Orange"),
    (65.0, "Gold"),
    (90.0, "Lime"),
    (150.0, "Green"),
    (175.0, "Teal"),
    (195.0, "Cyan"),
    (225.0, "Azure"),
    (255.0, "Blue"),
    (280.0, "Violet"),
    (310.0, "Purple"),
    (335.0, "Magenta"),
    (360.0, "Rose"),
];

pub fn display_name(rgb: [u8; 3]) -> String {
    let (hue, saturation, lightness) = rgb_to_hsl(rgb);

    if saturation < 0.12 {
        let grey = match lightness {
            l if l >= 0.9 => "White",
            l if l >= 0.7 => "Silver",
            l if l >= 0.45 => "Grey",
            l if l >= 0.2 => "Charcoal",
            _ => "Black",
        };
        return grey.to_string();
    }

    let hue_name = HUE_NAMES
        .iter()
        .find(|(limit, _)| hue < *limit)
        .map(|(_, name)| *name)
        .unwrap_or("Red");

    if lightness >= 0.75 {
        format!("Pale {}", hue_name)
    } else if lightness < 0.3 {
        format!("Deep {}", hue_name)
    } else if saturation < 0.35 {
        format!("Dusky {}", hue_name)
    } else {
        hue_name.to_string()
    }
}
