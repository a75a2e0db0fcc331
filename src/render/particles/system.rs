//! 粒子系统
//!
//! 把槽池、采样源和发射器配置装配成一个可更新的整体。每帧调用一次
//! [`ParticleSystem::update`]：先跑发射调度（速率累积器 + 发射器寿命
//! 倒计时），再对每个活跃粒子做运动积分（径向/切向/线性加速度、
//! 自旋插值、大小与颜色关键帧曲线）。
//!
//! 严格单线程、同步执行：没有挂起点、没有回调、没有 I/O。渲染器在
//! 每次 `update` 之后用 [`ParticleSystem::iter`] 按绘制顺序只读遍历，
//! 快照在下一次 `update` 前有效，不得跨帧保留粒子引用。

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::core::error::{ParticleError, ParticleResult};
use crate::ecs::Time;

use super::curve;
use super::emitter::{EmitterConfig, SpreadDistribution};
use super::pool::{ActiveParticles, InsertMode, ParticlePool};
use super::sampler::Sampler;

/// 纹理尺寸能力
///
/// 只在构造时查询一次像素尺寸，用于推导默认渲染锚点偏移（纹理中心）。
pub trait TextureSize {
    /// 像素尺寸（宽, 高）
    fn pixel_size(&self) -> (u32, u32);
}

/// 发射器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitterState {
    /// 运行中，调度器持续发射
    Active,
    /// 暂停，保留剩余发射器寿命
    Paused,
    /// 停止，剩余寿命已回满
    Stopped,
}

/// 粒子系统
///
/// 独占持有粒子池；克隆只复制配置，不复制活跃粒子群（见 [`Clone`]
/// 实现）。
#[derive(Component)]
pub struct ParticleSystem {
    pool: ParticlePool,
    sampler: Sampler,
    config: EmitterConfig,

    /// 发射器当前位置
    position: Vec2,
    /// 上一帧结束时的位置，帧内生成的粒子在两者之间插值出生点
    prev_position: Vec2,

    state: EmitterState,
    /// 剩余发射器寿命（秒）
    life: f32,
    /// 发射时间累积器
    emit_counter: f32,
}

impl ParticleSystem {
    /// 创建粒子系统
    ///
    /// `buffer_size` 必须在 `1..=MAX_PARTICLES`。新系统处于停止态，
    /// 不会自行发射。
    pub fn new(buffer_size: u32) -> ParticleResult<Self> {
        let pool = ParticlePool::with_capacity(buffer_size)?;
        let config = EmitterConfig::default();
        tracing::debug!(target: "particles", buffer_size, "particle system created");

        Ok(Self {
            life: config.emitter_lifetime,
            pool,
            sampler: Sampler::new(),
            config,
            position: Vec2::ZERO,
            prev_position: Vec2::ZERO,
            state: EmitterState::Stopped,
            emit_counter: 0.0,
        })
    }

    /// 创建粒子系统并用纹理中心作为默认渲染锚点偏移
    pub fn with_texture<T: TextureSize>(texture: &T, buffer_size: u32) -> ParticleResult<Self> {
        let mut system = Self::new(buffer_size)?;
        let (w, h) = texture.pixel_size();
        system.config.offset = Vec2::new(w as f32, h as f32) * 0.5;
        Ok(system)
    }

    /// 替换随机采样源
    ///
    /// 注入固定种子的采样源可以让整条粒子轨迹可复现。
    pub fn set_sampler(&mut self, sampler: Sampler) {
        self.sampler = sampler;
    }

    // ========================================================================
    // 缓冲区
    // ========================================================================

    /// 重建粒子缓冲区（破坏性）
    ///
    /// 丢弃所有活跃粒子，发射器回到"全新停止"态：停止、剩余寿命回满、
    /// 累积器清零。校验或分配失败时返回错误并保留旧缓冲区不动。
    pub fn set_buffer_size(&mut self, buffer_size: u32) -> ParticleResult<()> {
        self.pool = ParticlePool::with_capacity(buffer_size)?;
        self.state = EmitterState::Stopped;
        self.life = self.config.emitter_lifetime;
        self.emit_counter = 0.0;
        tracing::debug!(target: "particles", buffer_size, "particle buffer rebuilt");
        Ok(())
    }

    /// 缓冲区容量
    pub fn buffer_size(&self) -> u32 {
        self.pool.capacity()
    }

    // ========================================================================
    // 生命周期控制
    // ========================================================================

    /// 开始发射（任意状态）
    pub fn start(&mut self) {
        self.state = EmitterState::Active;
    }

    /// 暂停发射，保留剩余发射器寿命
    pub fn pause(&mut self) {
        if self.state == EmitterState::Active {
            self.state = EmitterState::Paused;
        }
    }

    /// 停止发射，剩余发射器寿命回满，累积器清零
    pub fn stop(&mut self) {
        self.state = EmitterState::Stopped;
        self.life = self.config.emitter_lifetime;
        self.emit_counter = 0.0;
        tracing::trace!(target: "particles", "emitter stopped");
    }

    /// 清空粒子群并回到停止态，配置不变
    pub fn reset(&mut self) {
        self.pool.clear();
        self.state = EmitterState::Stopped;
        self.life = self.config.emitter_lifetime;
        self.emit_counter = 0.0;
    }

    /// 立即发射 `count` 个粒子（绕过速率累积器）
    ///
    /// 发射数被钳制到剩余容量。发射器不在运行态时是空操作。
    pub fn emit(&mut self, count: u32) {
        if self.state != EmitterState::Active {
            return;
        }
        let count = count.min(self.pool.capacity() - self.pool.len());
        for _ in 0..count {
            self.spawn(1.0);
        }
    }

    /// 是否在运行态
    pub fn is_active(&self) -> bool {
        self.state == EmitterState::Active
    }

    /// 是否处于暂停态
    pub fn is_paused(&self) -> bool {
        self.state == EmitterState::Paused
    }

    /// 是否处于停止态（新建、`stop`、`reset` 或发射器寿命耗尽之后）
    pub fn is_stopped(&self) -> bool {
        self.state == EmitterState::Stopped
    }

    // ========================================================================
    // 每帧更新
    // ========================================================================

    /// 推进一个模拟步
    ///
    /// `dt == 0` 时是空操作。先跑发射调度，再对所有活跃粒子积分；
    /// 寿命耗尽的粒子在积分前被释放。
    pub fn update(&mut self, dt: f32) {
        if dt == 0.0 {
            return;
        }

        // 发射调度
        if self.state == EmitterState::Active {
            // 速率为 0 时 rate 为 +inf，累积器永远不会触发
            let rate = 1.0 / self.config.emission_rate;
            self.emit_counter += dt;
            while self.emit_counter >= rate {
                self.emit_counter -= rate;
                let t = 1.0 - self.emit_counter / dt;
                self.spawn(t);
            }

            // 发射器寿命倒计时（-1 表示无限）
            if self.config.emitter_lifetime != -1.0 {
                self.life -= dt;
                if self.life < 0.0 {
                    self.stop();
                }
            }
        }

        // 运动积分。释放会把最后一个活跃槽位换进当前位置，
        // 此时不前进游标，下一轮处理换进来的粒子。
        let mut i = 0;
        while i < self.pool.len() {
            let Some(p) = self.pool.get_mut(i) else {
                break;
            };

            p.life -= dt;
            if p.life <= 0.0 {
                self.pool.free(i);
                continue;
            }

            let radial_dir = (p.position - p.origin).normalize_or_zero();
            let radial = radial_dir * p.radial_acceleration;
            let tangential = Vec2::new(-radial_dir.y, radial_dir.x) * p.tangential_acceleration;

            p.velocity += (radial + tangential + p.linear_acceleration) * dt;
            p.position += p.velocity * dt;

            // 归一化寿命：出生 0 -> 死亡 1
            let t = 1.0 - p.life / p.lifetime;

            p.rotation += (p.spin_start + (p.spin_end - p.spin_start) * t) * dt;
            p.angle = p.rotation;
            if self.config.relative_rotation {
                p.angle += p.velocity.y.atan2(p.velocity.x);
            }

            let s = p.size_offset + t * p.size_interval;
            p.size = curve::sample(&self.config.sizes, s);
            p.color = curve::sample(&self.config.colors, t);

            i += 1;
        }

        self.prev_position = self.position;
    }

    /// 生成一个粒子并接入绘制顺序
    ///
    /// `t` 是本帧内的生成时刻（0 = 帧首，1 = 帧尾），用于在上一帧
    /// 位置和当前位置之间插值出生点。池满时静默丢弃。
    fn spawn(&mut self, t: f32) {
        let Some(index) = self.pool.allocate() else {
            return;
        };

        match self.config.insert_mode {
            InsertMode::Top => self.pool.insert_top(index),
            InsertMode::Bottom => self.pool.insert_bottom(index),
            InsertMode::Random => {
                let pos = self.sampler.pick(index);
                self.pool.insert_random(index, pos);
            }
        }

        let spawn_pos = self.prev_position.lerp(self.position, t);
        if let Some(p) = self.pool.get_mut(index) {
            self.config.init_particle(p, spawn_pos, &mut self.sampler);
        }
    }

    // ========================================================================
    // 渲染接口
    // ========================================================================

    /// 当前活跃粒子数
    pub fn count(&self) -> u32 {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pool.is_full()
    }

    /// 按绘制顺序只读遍历活跃粒子
    ///
    /// 恰好产出 [`count`](Self::count) 个粒子。快照在下一次
    /// [`update`](Self::update) 前有效。
    pub fn iter(&self) -> ActiveParticles<'_> {
        self.pool.iter()
    }

    // ========================================================================
    // 配置访问器
    // ========================================================================

    /// 当前配置
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// 整体替换配置（校验后生效），剩余发射器寿命按新配置回满
    pub fn set_config(&mut self, config: EmitterConfig) -> ParticleResult<()> {
        config.validate()?;
        self.life = config.emitter_lifetime;
        self.config = config;
        Ok(())
    }

    /// 设置发射速率（每秒粒子数），负值被拒绝
    pub fn set_emission_rate(&mut self, rate: f32) -> ParticleResult<()> {
        if rate < 0.0 {
            return Err(ParticleError::InvalidArgument(format!(
                "emission rate must be non-negative, got {}",
                rate
            )));
        }
        self.config.emission_rate = rate;
        Ok(())
    }

    pub fn emission_rate(&self) -> f32 {
        self.config.emission_rate
    }

    /// 设置发射器寿命（秒，-1 表示无限），剩余寿命同步回满
    pub fn set_emitter_lifetime(&mut self, lifetime: f32) {
        self.config.emitter_lifetime = lifetime;
        self.life = lifetime;
    }

    pub fn emitter_lifetime(&self) -> f32 {
        self.config.emitter_lifetime
    }

    /// 设置粒子寿命范围（秒）
    pub fn set_particle_lifetime(&mut self, min: f32, max: f32) {
        self.config.particle_life_min = min;
        self.config.particle_life_max = max;
    }

    pub fn particle_lifetime(&self) -> (f32, f32) {
        (self.config.particle_life_min, self.config.particle_life_max)
    }

    /// 设置发射器位置（瞬移，不做帧内插值）
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.prev_position = position;
    }

    /// 平滑移动发射器：本帧生成的粒子沿移动路径插值出生点
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// 设置出生散布分布及每轴参数
    pub fn set_area_spread(&mut self, distribution: SpreadDistribution, spread: Vec2) {
        self.config.spread_distribution = distribution;
        self.config.area_spread = spread;
    }

    pub fn area_spread(&self) -> (SpreadDistribution, Vec2) {
        (self.config.spread_distribution, self.config.area_spread)
    }

    pub fn set_direction(&mut self, direction: f32) {
        self.config.direction = direction;
    }

    pub fn direction(&self) -> f32 {
        self.config.direction
    }

    pub fn set_spread(&mut self, spread: f32) {
        self.config.spread = spread;
    }

    pub fn spread(&self) -> f32 {
        self.config.spread
    }

    pub fn set_speed(&mut self, min: f32, max: f32) {
        self.config.speed_min = min;
        self.config.speed_max = max;
    }

    pub fn speed(&self) -> (f32, f32) {
        (self.config.speed_min, self.config.speed_max)
    }

    pub fn set_linear_acceleration(&mut self, min: Vec2, max: Vec2) {
        self.config.linear_acceleration_min = min;
        self.config.linear_acceleration_max = max;
    }

    pub fn linear_acceleration(&self) -> (Vec2, Vec2) {
        (
            self.config.linear_acceleration_min,
            self.config.linear_acceleration_max,
        )
    }

    pub fn set_radial_acceleration(&mut self, min: f32, max: f32) {
        self.config.radial_acceleration_min = min;
        self.config.radial_acceleration_max = max;
    }

    pub fn radial_acceleration(&self) -> (f32, f32) {
        (
            self.config.radial_acceleration_min,
            self.config.radial_acceleration_max,
        )
    }

    pub fn set_tangential_acceleration(&mut self, min: f32, max: f32) {
        self.config.tangential_acceleration_min = min;
        self.config.tangential_acceleration_max = max;
    }

    pub fn tangential_acceleration(&self) -> (f32, f32) {
        (
            self.config.tangential_acceleration_min,
            self.config.tangential_acceleration_max,
        )
    }

    /// 设置大小关键帧，空列表被拒绝
    pub fn set_sizes(&mut self, sizes: Vec<f32>) -> ParticleResult<()> {
        if sizes.is_empty() {
            return Err(ParticleError::InvalidArgument(
                "size keyframe list must not be empty".to_string(),
            ));
        }
        self.config.sizes = sizes;
        Ok(())
    }

    pub fn sizes(&self) -> &[f32] {
        &self.config.sizes
    }

    pub fn set_size_variation(&mut self, variation: f32) {
        self.config.size_variation = variation;
    }

    pub fn size_variation(&self) -> f32 {
        self.config.size_variation
    }

    /// 设置颜色关键帧，空列表被拒绝
    pub fn set_colors(&mut self, colors: Vec<glam::Vec4>) -> ParticleResult<()> {
        if colors.is_empty() {
            return Err(ParticleError::InvalidArgument(
                "color keyframe list must not be empty".to_string(),
            ));
        }
        self.config.colors = colors;
        Ok(())
    }

    pub fn colors(&self) -> &[glam::Vec4] {
        &self.config.colors
    }

    pub fn set_rotation(&mut self, min: f32, max: f32) {
        self.config.rotation_min = min;
        self.config.rotation_max = max;
    }

    pub fn rotation(&self) -> (f32, f32) {
        (self.config.rotation_min, self.config.rotation_max)
    }

    pub fn set_spin(&mut self, start: f32, end: f32) {
        self.config.spin_start = start;
        self.config.spin_end = end;
    }

    pub fn spin(&self) -> (f32, f32) {
        (self.config.spin_start, self.config.spin_end)
    }

    pub fn set_spin_variation(&mut self, variation: f32) {
        self.config.spin_variation = variation;
    }

    pub fn spin_variation(&self) -> f32 {
        self.config.spin_variation
    }

    pub fn set_insert_mode(&mut self, mode: InsertMode) {
        self.config.insert_mode = mode;
    }

    pub fn insert_mode(&self) -> InsertMode {
        self.config.insert_mode
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.config.offset = offset;
    }

    pub fn offset(&self) -> Vec2 {
        self.config.offset
    }

    pub fn set_relative_rotation(&mut self, enabled: bool) {
        self.config.relative_rotation = enabled;
    }

    pub fn relative_rotation(&self) -> bool {
        self.config.relative_rotation
    }
}

impl Clone for ParticleSystem {
    /// 复制配置而不是粒子群
    ///
    /// 克隆体的池容量相同但没有活跃粒子，剩余发射器寿命回满；采样源
    /// 状态被复制，种子化的系统克隆后仍然可复现。
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.fresh(),
            sampler: self.sampler.clone(),
            config: self.config.clone(),
            position: self.position,
            prev_position: self.prev_position,
            state: self.state,
            life: self.config.emitter_lifetime,
            emit_counter: 0.0,
        }
    }
}

// ============================================================================
// ECS 系统
// ============================================================================

/// 驱动所有粒子系统组件的 ECS 系统
///
/// 放在单线程调度里，每帧恰好执行一次。
pub fn particle_update_system(time: Res<Time>, mut systems: Query<&mut ParticleSystem>) {
    let dt = time.delta_seconds;
    for mut system in systems.iter_mut() {
        system.update(dt);
    }
}

// ============================================================================
// 测试
// ============================================================================
