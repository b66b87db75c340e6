// 工具模块

/// 固定序列随机源只在本 crate 的测试中编译，不属于公开接口：
///
/// ```compile_fail
/// use dragonbreed::utils::random::SequenceRandom;
/// ```
pub mod random;

pub use random::{RandomGenerator, RandomSource, SourceRng};

#[cfg(test)]
pub use random::SequenceRandom;
