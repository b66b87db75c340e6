// 错误处理系统
// 开发心理：遗传核心只有两类失败 —— 目录配置错误与基因型结构不匹配
// 所有错误在发现处立即返回，不做静默降级

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneticsError {
    #[error("Structural mismatch: genotype is missing gene '{gene}' ({context})")]
    StructuralMismatch { gene: String, context: String },
    #[error("Unknown gene '{0}' is not defined in the trait catalog")]
    UnknownGene(String),
    #[error("Allele {value} for gene '{gene}' is outside [{min}, {max}]")]
    AlleleOutOfRange { gene: String, value: u8, min: u8, max: u8 },
    #[error("Unresolvable value {value} for gene '{gene}': no phenotype entry in catalog")]
    UnresolvableValue { gene: String, value: u8 },
    #[error("Invalid trait catalog: {0}")]
    InvalidCatalog(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid trait path: {0}")]
    InvalidPath(String),
    #[error("Save error: {0}")]
    SaveError(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type GeneticsResult<T> = Result<T, GeneticsError>;

impl GeneticsError {
    pub fn missing_gene(gene: &str, context: &str) -> Self {
        GeneticsError::StructuralMismatch {
            gene: gene.to_string(),
            context: context.to_string(),
        }
    }

    /// 目录或配置本身有缺陷，属于编程错误而非输入错误
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GeneticsError::UnresolvableValue { .. }
                | GeneticsError::InvalidCatalog(_)
                | GeneticsError::ConfigError(_)
        )
    }
}

// 错误创建辅助宏
#[macro_export]
macro_rules! catalog_error {
    ($msg:literal $(,)?) => {
        $crate::core::error::GeneticsError::InvalidCatalog($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::GeneticsError::InvalidCatalog(format!($fmt, $($arg)*))
    };
}
