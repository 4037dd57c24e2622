//! CPU 粒子系统模块
//!
//! 火山喷发效果：熔岩与烟雾两个固定容量粒子池，每帧在 CPU 上积分，
//! 再打包成顶点流上传到 GPU。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Particle System                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Emission                                             │
//! │     - 累加器把 rate·dt 转成整数发射数                      │
//! │     - 线性扫描第一个死亡槽，池满则丢弃                      │
//! │                                                          │
//! │  2. Simulation                                           │
//! │     - 烟雾：浮力、水平阻尼、淡出、变大                      │
//! │     - 熔岩：重力、地面碰撞、触地生成烟团                    │
//! │                                                          │
//! │  3. Stream                                               │
//! │     - [x, y, z, size, r, g, b, a]，先熔岩后烟雾            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut particles = ParticleSystem::new(&ParticleConfig::default(), crater);
//! let mut stream = ParticleStream::with_capacity(MAX_LAVA + MAX_SMOKE);
//!
//! particles.update(dt);
//! particles.write_stream(&mut stream);
//! ```

pub mod emitter;
pub mod stream;
pub mod system;

pub use crate::config::simulation::{MAX_LAVA, MAX_SMOKE};
pub use emitter::{EmissionAccumulator, Particle, ParticlePool};
pub use stream::{ParticleStream, ParticleVertex, FLOATS_PER_PARTICLE};
pub use system::{ParticleStats, ParticleSystem};

/// 粒子流的总容量
pub const STREAM_CAPACITY: usize = MAX_LAVA + MAX_SMOKE;
