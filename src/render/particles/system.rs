//! 熔岩与烟雾粒子系统
//!
//! 两个独立的固定容量池：熔岩做弹道运动并与地面碰撞，
//! 碰撞时在烟雾池中生成一团烟；烟雾受浮力上升、水平阻尼、逐渐变淡变大。

use super::emitter::{EmissionAccumulator, Particle, ParticlePool};
use super::stream::ParticleStream;
use crate::config::simulation::{
    MAX_EMIT_RATE, MAX_ERUPTION_POWER, MAX_LAVA, MAX_SMOKE, MIN_ERUPTION_POWER,
};
use crate::config::ParticleConfig;
use glam::{Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// 熔岩重力加速度（风格化取值）
pub const LAVA_GRAVITY: f32 = -8.0;
/// 烟雾浮力加速度
pub const SMOKE_BUOYANCY: f32 = 0.5;
/// 烟雾水平阻尼系数
pub const SMOKE_DRAG: f32 = 0.5;
/// 烟雾尺寸增长率
pub const SMOKE_GROWTH: f32 = 0.1;
/// 烟雾最大不透明度
pub const SMOKE_MAX_ALPHA: f32 = 0.4;
/// 火山口烟雾基础速率（粒子/秒，乘以喷发强度）
pub const CRATER_SMOKE_RATE: f32 = 100.0;
/// 触地后的竖直反弹系数
pub const BOUNCE: f32 = -0.2;
/// 触地后的水平速度保留比例
pub const IMPACT_FRICTION: f32 = 0.3;

pub const LAVA_COLOR: Vec4 = Vec4::new(1.0, 0.3, 0.0, 1.0);
pub const SMOKE_COLOR: Vec4 = Vec4::new(0.3, 0.3, 0.3, 0.6);
pub const PUFF_COLOR: Vec4 = Vec4::new(0.2, 0.2, 0.2, 0.4);

/// 粒子系统统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleStats {
    /// 存活熔岩数
    pub alive_lava: usize,
    /// 存活烟雾数
    pub alive_smoke: usize,
    /// 累计发射数
    pub total_emitted: u64,
    /// 因池满而丢弃的发射数
    pub dropped: u64,
    /// 累计触地次数
    pub impacts: u64,
}

/// CPU 粒子系统
pub struct ParticleSystem {
    lava: ParticlePool,
    smoke: ParticlePool,
    lava_acc: EmissionAccumulator,
    smoke_acc: EmissionAccumulator,
    rng: StdRng,
    emitting: bool,
    base_emit_rate: u32,
    eruption_power: f32,
    global_size_mul: f32,
    crater: Vec3,
    ground: f32,
    total_emitted: u64,
    dropped: u64,
    impacts: u64,
}

impl ParticleSystem {
    /// 按配置创建；配置未指定火山口时使用 `default_crater`
    pub fn new(config: &ParticleConfig, default_crater: Vec3) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            lava: ParticlePool::new(MAX_LAVA),
            smoke: ParticlePool::new(MAX_SMOKE),
            lava_acc: EmissionAccumulator::default(),
            smoke_acc: EmissionAccumulator::default(),
            rng,
            emitting: config.emitting,
            base_emit_rate: config.base_emit_rate.min(MAX_EMIT_RATE),
            eruption_power: config
                .eruption_power
                .clamp(MIN_ERUPTION_POWER, MAX_ERUPTION_POWER),
            global_size_mul: config.global_size_mul,
            crater: config.crater.map(Vec3::from).unwrap_or(default_crater),
            ground: config.ground_level,
            total_emitted: 0,
            dropped: 0,
            impacts: 0,
        }
    }

    /// 推进一帧：先发射，再更新烟雾，最后更新熔岩
    ///
    /// 熔岩触地生成的烟团在本帧保持在触地点。
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        if self.emitting {
            let power = self.eruption_power;
            let lava_count = self
                .lava_acc
                .accumulate(self.base_emit_rate as f32 * power, dt);
            for _ in 0..lava_count {
                self.emit_lava();
            }
            let smoke_count = self.smoke_acc.accumulate(CRATER_SMOKE_RATE * power, dt);
            for _ in 0..smoke_count {
                self.emit_smoke();
            }
        }

        self.update_smoke(dt);
        self.update_lava(dt);
    }

    fn emit_lava(&mut self) {
        let theta = self.rng.gen_range(0.0_f32..TAU);
        let radius = self.rng.gen_range(0.0_f32..=0.2);
        let position = self.crater + Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin());

        let speed = self.rng.gen_range(3.0_f32..=8.0) * self.eruption_power;
        let phi = self.rng.gen_range(0.1 * PI..=0.4 * PI);
        let velocity = Vec3::new(
            theta.cos() * phi.sin() * speed,
            phi.cos() * speed,
            theta.sin() * phi.sin() * speed,
        );

        let life = self.rng.gen_range(2.0_f32..=4.0);
        let size = self.rng.gen_range(0.1_f32..=0.3) * self.global_size_mul;
        let particle = Particle::spawn(position, velocity, life, size, LAVA_COLOR);
        let emitted = self.lava.emit(particle);
        self.record(emitted);
    }

    fn emit_smoke(&mut self) {
        let theta = self.rng.gen_range(0.0_f32..TAU);
        let radius = self.rng.gen_range(0.0_f32..=0.3);
        let position = self.crater
            + Vec3::new(radius * theta.cos(), 0.1, radius * theta.sin());

        let power = self.eruption_power;
        let velocity = Vec3::new(
            self.rng.gen_range(-0.2_f32..=0.2),
            self.rng.gen_range(1.0_f32..=3.0) + power,
            self.rng.gen_range(-0.2_f32..=0.2),
        );

        let life = self.rng.gen_range(3.0_f32..=6.0);
        let size = self.rng.gen_range(0.2_f32..=0.5) * (0.8 + 0.2 * power);
        let particle = Particle::spawn(position, velocity, life, size, SMOKE_COLOR);
        let emitted = self.smoke.emit(particle);
        self.record(emitted);
    }

    fn record(&mut self, emitted: bool) {
        if emitted {
            self.total_emitted += 1;
        } else {
            self.dropped += 1;
        }
    }

    fn update_smoke(&mut self, dt: f32) {
        let drag = 1.0 - SMOKE_DRAG * dt;
        let growth = 1.0 + SMOKE_GROWTH * dt;
        for p in self.smoke.iter_alive_mut() {
            if !p.consume_life(dt) {
                continue;
            }
            p.velocity.y += SMOKE_BUOYANCY * dt;
            p.position += p.velocity * dt;
            p.velocity.x *= drag;
            p.velocity.z *= drag;
            p.color.w = SMOKE_MAX_ALPHA * p.life_ratio();
            p.size *= growth;
        }
    }

    fn update_lava(&mut self, dt: f32) {
        let ground = self.ground;
        let Self {
            lava,
            smoke,
            rng,
            total_emitted,
            dropped,
            impacts,
            ..
        } = self;

        for p in lava.iter_alive_mut() {
            if !p.consume_life(dt) {
                continue;
            }
            p.velocity.y += LAVA_GRAVITY * dt;
            p.position += p.velocity * dt;

            if p.position.y < ground {
                p.position.y = ground;
                p.velocity.y *= BOUNCE;
                p.velocity.x *= IMPACT_FRICTION;
                p.velocity.z *= IMPACT_FRICTION;
                p.consume_life(dt);
                *impacts += 1;

                let velocity = Vec3::new(
                    rng.gen_range(-0.2_f32..=0.2),
                    rng.gen_range(0.5_f32..=1.5),
                    rng.gen_range(-0.2_f32..=0.2),
                );
                let life = rng.gen_range(1.0_f32..=2.0);
                let size = rng.gen_range(0.1_f32..=0.3);
                let puff = Particle::spawn(p.position, velocity, life, size, PUFF_COLOR);
                if smoke.emit(puff) {
                    *total_emitted += 1;
                } else {
                    *dropped += 1;
                }
            }
        }
    }

    /// 直接放入一个熔岩粒子（池满时丢弃）
    pub fn spawn_lava(&mut self, particle: Particle) -> bool {
        let emitted = self.lava.emit(particle);
        self.record(emitted);
        emitted
    }

    /// 直接放入一个烟雾粒子（池满时丢弃）
    pub fn spawn_smoke(&mut self, particle: Particle) -> bool {
        let emitted = self.smoke.emit(particle);
        self.record(emitted);
        emitted
    }

    /// 杀死所有粒子并清空发射累加器
    pub fn clear(&mut self) {
        self.lava.clear();
        self.smoke.clear();
        self.lava_acc.reset();
        self.smoke_acc.reset();
        tracing::info!(target: "particles", "Particles cleared");
    }

    pub fn toggle_emitting(&mut self) -> bool {
        self.set_emitting(!self.emitting);
        self.emitting
    }

    pub fn set_emitting(&mut self, emitting: bool) {
        self.emitting = emitting;
        tracing::info!(
            target: "particles",
            "Emission {}",
            if emitting { "started" } else { "stopped" }
        );
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// 调整基础发射速率，结果限制在 [0, 5000]
    pub fn adjust_emit_rate(&mut self, delta: i32) -> u32 {
        let rate = (self.base_emit_rate as i64 + delta as i64).clamp(0, MAX_EMIT_RATE as i64);
        self.base_emit_rate = rate as u32;
        tracing::info!(target: "particles", "Emit rate: {}", self.base_emit_rate);
        self.base_emit_rate
    }

    /// 调整喷发强度，结果限制在 [0.1, 5.0]
    pub fn adjust_eruption_power(&mut self, delta: f32) -> f32 {
        self.eruption_power =
            (self.eruption_power + delta).clamp(MIN_ERUPTION_POWER, MAX_ERUPTION_POWER);
        tracing::info!(target: "particles", "Eruption power: {:.1}", self.eruption_power);
        self.eruption_power
    }

    pub fn base_emit_rate(&self) -> u32 {
        self.base_emit_rate
    }

    pub fn eruption_power(&self) -> f32 {
        self.eruption_power
    }

    pub fn crater(&self) -> Vec3 {
        self.crater
    }

    pub fn ground(&self) -> f32 {
        self.ground
    }

    pub fn lava(&self) -> &ParticlePool {
        &self.lava
    }

    pub fn smoke(&self) -> &ParticlePool {
        &self.smoke
    }

    pub fn alive_lava(&self) -> usize {
        self.lava.alive_count()
    }

    pub fn alive_smoke(&self) -> usize {
        self.smoke.alive_count()
    }

    pub fn alive_total(&self) -> usize {
        self.alive_lava() + self.alive_smoke()
    }

    pub fn stats(&self) -> ParticleStats {
        ParticleStats {
            alive_lava: self.alive_lava(),
            alive_smoke: self.alive_smoke(),
            total_emitted: self.total_emitted,
            dropped: self.dropped,
            impacts: self.impacts,
        }
    }

    /// 重建粒子流：先熔岩后烟雾
    pub fn write_stream(&self, stream: &mut ParticleStream) {
        stream.clear();
        for p in self.lava.iter_alive().chain(self.smoke.iter_alive()) {
            stream.push(p);
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn simulation_invariants(
            seed in any::<u64>(),
            power in 0.1f32..5.0,
            steps in prop::collection::vec(0.001f32..0.1, 1..60),
        ) {
            let config = ParticleConfig {
                seed: Some(seed),
                eruption_power: power,
                base_emit_rate: 2000,
                ..ParticleConfig::default()
            };
            let mut ps = ParticleSystem::new(&config, Vec3::new(0.0, 2.5, 0.0));

            for dt in steps {
                let before: Vec<(usize, f32)> = ps
                    .lava()
                    .slots()
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.alive)
                    .map(|(i, p)| (i, p.life))
                    .collect();

                ps.update(dt);

                prop_assert!(ps.alive_lava() <= MAX_LAVA);
                prop_assert!(ps.alive_smoke() <= MAX_SMOKE);
                for p in ps.lava().iter_alive() {
                    prop_assert!(p.position.y >= ps.ground());
                    prop_assert!(p.life > 0.0 && p.life <= p.max_life);
                }
                for p in ps.smoke().iter_alive() {
                    prop_assert!((0.0..=1.0).contains(&p.color.w));
                }
                for (i, life) in before {
                    let p = &ps.lava().slots()[i];
                    if p.alive {
                        prop_assert!(p.life < life);
                    }
                }
            }
        }

        #[test]
        fn emission_rate_accuracy(rate in 1u32..2000, frames in 1usize..240) {
            let mut acc = EmissionAccumulator::default();
            let dt = 1.0 / 60.0;
            let total: u64 = (0..frames).map(|_| acc.accumulate(rate as f32, dt) as u64).sum();
            let expected = (rate as f64 * frames as f64 / 60.0).floor() as i64;
            prop_assert!((total as i64 - expected).abs() <= 1);
        }
    }
}
