/*
* 开发心理过程：
* 1. 引擎的可调参数：窝数范围、突变概率、隐性拉拽强度、暗能量概率
* 2. 使用TOML文件加载、保存与验证
* 3. 配置文件不存在时写出默认配置
*/

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, info};

use crate::core::error::{GeneticsError, GeneticsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub breeding: BreedingConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConfig {
    /// 每窝最少后代数（含）
    pub clutch_min: u32,
    /// 每窝最多后代数（含）
    pub clutch_max: u32,
    /// 每条等位基因的突变概率
    pub mutation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// 隐性极值模式下杂合对向中点 1.5 的拉拽强度
    pub pull_strength: f64,
    /// 虚空吐息出现暗能量变体的概率
    pub dark_energy_chance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breeding: BreedingConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            clutch_min: 1,
            clutch_max: 3,
            mutation_rate: 0.03,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            pull_strength: 0.8,
            dark_energy_chance: 0.05,
        }
    }
}

impl EngineConfig {
    /// 从文件加载；文件不存在时写出默认配置
    pub fn load(path: &Path) -> GeneticsResult<Self> {
        if !path.exists() {
            info!("配置文件不存在，创建默认配置: {:?}", path);
            let config = EngineConfig::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("成功加载配置文件: {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> GeneticsResult<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> GeneticsResult<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        debug!("配置已保存到: {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> GeneticsResult<()> {
        let breeding = &self.breeding;
        if breeding.clutch_min == 0 {
            return Err(GeneticsError::ConfigError(
                "clutch_min must be at least 1".to_string(),
            ));
        }
        if breeding.clutch_min > breeding.clutch_max {
            return Err(GeneticsError::ConfigError(format!(
                "clutch range [{}, {}] is empty",
                breeding.clutch_min, breeding.clutch_max
            )));
        }
        check_probability("mutation_rate", breeding.mutation_rate)?;
        check_probability("pull_strength", self.resolver.pull_strength)?;
        check_probability("dark_energy_chance", self.resolver.dark_energy_chance)?;
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> GeneticsResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GeneticsError::ConfigError(format!(
            "{} must be within 0.0-1.0, got {}",
            name, value
        )));
    }
    Ok(())
}
