//! 粒子、固定容量粒子池与发射累加器

use glam::{Vec3, Vec4};

// ============================================================================
// 粒子
// ============================================================================

/// 单个粒子槽
///
/// 存活时满足 `0 < life <= max_life` 且 `size > 0`；死亡槽的其余字段无意义。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// 位置
    pub position: Vec3,
    /// 速度
    pub velocity: Vec3,
    /// 剩余寿命（秒）
    pub life: f32,
    /// 初始寿命（秒）
    pub max_life: f32,
    /// 大小
    pub size: f32,
    /// RGBA 颜色，各分量位于 [0, 1]
    pub color: Vec4,
    /// 存活标记
    pub alive: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            life: 0.0,
            max_life: 1.0,
            size: 4.0,
            color: Vec4::ONE,
            alive: false,
        }
    }
}

impl Particle {
    /// 创建一个存活粒子，`life` 与 `max_life` 相同
    pub fn spawn(position: Vec3, velocity: Vec3, life: f32, size: f32, color: Vec4) -> Self {
        Self {
            position,
            velocity,
            life,
            max_life: life,
            size,
            color,
            alive: true,
        }
    }

    /// 剩余寿命比例（0-1）
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    /// 扣除寿命，耗尽时标记死亡；返回是否仍然存活
    #[inline]
    pub fn consume_life(&mut self, dt: f32) -> bool {
        self.life -= dt;
        if self.life <= 0.0 {
            self.alive = false;
        }
        self.alive
    }
}

// ============================================================================
// 粒子池
// ============================================================================

/// 固定容量粒子池
///
/// 初始化后不再重新分配；发射时线性扫描第一个死亡槽。
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 第一个可复用的槽
    pub fn first_free(&mut self) -> Option<&mut Particle> {
        self.slots.iter_mut().find(|p| !p.alive)
    }

    /// 写入第一个空闲槽；池满时丢弃并返回 `false`
    pub fn emit(&mut self, particle: Particle) -> bool {
        match self.first_free() {
            Some(slot) => {
                *slot = particle;
                true
            }
            None => false,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.slots.iter().filter(|p| p.alive).count()
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.alive)
    }

    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.slots.iter_mut().filter(|p| p.alive)
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    /// 将所有槽标记为死亡
    pub fn clear(&mut self) {
        for p in &mut self.slots {
            p.alive = false;
        }
    }
}

// ============================================================================
// 发射累加器
// ============================================================================

/// 保留 `rate · dt` 的小数部分，使长期发射数保持精确
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmissionAccumulator {
    remainder: f32,
}

impl EmissionAccumulator {
    /// 累加本帧发射量并取出整数部分
    pub fn accumulate(&mut self, rate: f32, delta_time: f32) -> u32 {
        self.remainder += rate.max(0.0) * delta_time.max(0.0);
        let count = self.remainder.floor();
        self.remainder -= count;
        count as u32
    }

    pub fn remainder(&self) -> f32 {
        self.remainder
    }

    pub fn reset(&mut self) {
        self.remainder = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_reuses_first_dead_slot() {
        let mut pool = ParticlePool::new(3);
        let p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, 1.0, 0.1, Vec4::ONE);
        assert!(pool.emit(p));
        assert!(pool.emit(p));
        assert_eq!(pool.alive_count(), 2);

        pool.slots[0].alive = false;
        let q = Particle::spawn(Vec3::X, Vec3::ZERO, 1.0, 0.1, Vec4::ONE);
        assert!(pool.emit(q));
        assert_eq!(pool.slots()[0].position, Vec3::X);
    }

    #[test]
    fn test_pool_full_drops_silently() {
        let mut pool = ParticlePool::new(2);
        let p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, 1.0, 0.1, Vec4::ONE);
        assert!(pool.emit(p));
        assert!(pool.emit(p));
        assert!(!pool.emit(p));
        assert_eq!(pool.alive_count(), 2);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_pool_clear() {
        let mut pool = ParticlePool::new(4);
        let p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, 1.0, 0.1, Vec4::ONE);
        for _ in 0..4 {
            pool.emit(p);
        }
        pool.clear();
        assert_eq!(pool.alive_count(), 0);
        assert_eq!(pool.capacity(), 4);
    }

    #[test]
    fn test_consume_life() {
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, 0.15, 0.1, Vec4::ONE);
        assert!(p.consume_life(0.1));
        assert!(!p.consume_life(0.1));
        assert!(!p.alive);
    }

    #[test]
    fn test_life_ratio() {
        let mut p = Particle::spawn(Vec3::ZERO, Vec3::ZERO, 2.0, 0.1, Vec4::ONE);
        assert_eq!(p.life_ratio(), 1.0);
        p.consume_life(0.5);
        assert!((p.life_ratio() - 0.75).abs() < 1e-6);

        p.life = 3.0;
        assert_eq!(p.life_ratio(), 1.0);
        p.max_life = 0.0;
        assert_eq!(p.life_ratio(), 0.0);
    }

    #[test]
    fn test_accumulator_keeps_fraction() {
        let mut acc = EmissionAccumulator::default();
        // 每帧 1.5 个
        let counts: Vec<u32> = (0..4).map(|_| acc.accumulate(6.0, 0.25)).collect();
        assert_eq!(counts, vec![1, 2, 1, 2]);
        assert_eq!(acc.remainder(), 0.0);
    }

    #[test]
    fn test_accumulator_single_frame() {
        let mut acc = EmissionAccumulator::default();
        assert_eq!(acc.accumulate(100.0, 0.125), 12);
        assert_eq!(acc.accumulate(-5.0, 0.125), 0);
        assert_eq!(acc.remainder(), 0.5);
    }
}
