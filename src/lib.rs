// 龙类遗传核心库入口
// 开发心理：基因型生成、繁殖、表型解析都是无隐藏状态的纯函数库
// 架构：目录只读共享，随机源与身份发号器显式注入

pub mod catalog;
pub mod core;
pub mod creature_engine;
pub mod save;
pub mod utils;

// 重新导出核心类型
pub use crate::catalog::{TraitCatalog, TriangleSystem};
pub use crate::core::{
    BreedingConfig, EngineConfig, GeneticsError, GeneticsResult, ResolverConfig,
};
pub use crate::creature_engine::{
    Creature, CreatureEngine, CreatureId, GeneticCode, IdIssuer, Nursery, Offspring, Phenotype,
    PhenotypeResolver, Rarity, SequentialIdIssuer, TraitPath, TraitPredicate, UuidIdIssuer,
};
pub use crate::utils::random::{RandomGenerator, RandomSource};

// 版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "dragonbreed";

// 便利函数：初始化日志，未设置 RUST_LOG 时默认 info
pub fn init() -> GeneticsResult<()> {
    let initialised =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("dragonbreed=info"))
            .try_init()
            .is_ok();

    if initialised {
        log::info!("{} v{} 初始化完成", NAME, VERSION);
    }
    Ok(())
}
