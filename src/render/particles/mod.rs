//! 粒子模拟模块
//!
//! 固定容量、每帧零分配的 2D 粒子模拟核心。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Particle System                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Emission (调度)                                      │
//! │     - 速率累积器，单帧可生成多个粒子                       │
//! │     - 发射器寿命倒计时，耗尽自动停止                       │
//! │                                                          │
//! │  2. Initialization (出生采样)                            │
//! │     - 寿命/方向/速度/加速度按区间采样                      │
//! │     - 出生位置按 None/Uniform/Normal 散布                 │
//! │                                                          │
//! │  3. Simulation (积分)                                    │
//! │     - 径向 + 切向 + 线性加速度                            │
//! │     - 自旋插值，大小/颜色关键帧曲线                        │
//! │                                                          │
//! │  4. Draw order (链表)                                    │
//! │     - 槽池内嵌双向链表，Top/Bottom/Random 插入            │
//! │     - 渲染器沿 head -> tail 只读遍历                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut system = ParticleSystem::new(1000)?;
//! system.set_config(EffectPreset::Fire.config())?;
//! system.start();
//!
//! // 每帧
//! system.update(dt);
//! for particle in system.iter() {
//!     draw(particle.position, particle.angle, particle.size, particle.color);
//! }
//! ```

pub mod curve;
pub mod emitter;
pub mod pool;
pub mod presets;
pub mod sampler;
pub mod system;

pub use emitter::{EmitterConfig, SpreadDistribution};
pub use pool::{ActiveParticles, InsertMode, Particle, ParticlePool, MAX_PARTICLES};
pub use presets::EffectPreset;
pub use sampler::Sampler;
pub use system::{particle_update_system, ParticleSystem, TextureSize};
