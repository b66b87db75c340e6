/*
* 开发心理过程：
* 1. 随机源作为显式能力对象传入，只暴露 next_float
* 2. 权重选择、洗牌、区间整数等都建立在 next_float 之上
* 3. 可设种子的 ChaCha 生成器用于可复现的统计测试
* 4. 洗牌交给 rand 的 SliceRandom，通过 RngCore 适配器驱动
* 5. 固定序列随机源只用于精确控制分支的单元测试
*/

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 随机数能力：返回 [0, 1) 区间的浮点数
pub trait RandomSource {
    fn next_float(&mut self) -> f64;

    /// 基于概率检查
    fn chance(&mut self, probability: f64) -> bool {
        self.next_float() < probability.clamp(0.0, 1.0)
    }

    /// 生成指定范围的整数 [min, max] (包含max)
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.next_float() * span).floor() as u32;
        (min + offset).min(max)
    }

    /// 基于权重选择下标；权重为零的项永远不会被选中
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let target = self.next_float() * total;
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            if target < cumulative {
                return Some(index);
            }
        }

        // 浮点误差: 返回最后一个正权重项
        weights.iter().rposition(|w| *w > 0.0)
    }

    /// 均匀洗牌
    fn shuffle<T>(&mut self, items: &mut [T]) {
        SliceRandom::shuffle(items, &mut SourceRng(self));
    }
}

/// 把 RandomSource 包装成 rand::RngCore，供 rand 的算法使用
pub struct SourceRng<'a, R: RandomSource + ?Sized>(pub &'a mut R);

impl<R: RandomSource + ?Sized> RngCore for SourceRng<'_, R> {
    fn next_u32(&mut self) -> u32 {
        // next_float < 1，乘积不会溢出 u32
        (self.0.next_float() * 4_294_967_296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }
}

/// 可设种子的随机数生成器
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomGenerator {
    /// 使用随机种子创建
    pub fn new() -> Self {
        Self::with_seed(rand::random::<u64>())
    }

    /// 使用指定种子创建
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for RandomGenerator {
    fn next_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// 循环回放固定数值的随机源
/// 注意：rand 的区间采样会拒绝部分取值，恒定接近 1 的序列不能用来洗牌
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// 永远返回同一个值
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

#[cfg(test)]
impl RandomSource for SequenceRandom {
    fn next_float(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
