// 核心模块：错误类型与引擎配置

pub mod config;
pub mod error;

pub use config::{BreedingConfig, EngineConfig, ResolverConfig};
pub use error::{GeneticsError, GeneticsResult};
