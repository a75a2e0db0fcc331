//! 发射器配置与出生采样
//!
//! [`EmitterConfig`] 描述"怎样生成粒子"的全部参数：发射速率、寿命
//! 范围、出生散布、初速度与加速度范围、大小/颜色关键帧、旋转与自旋。
//! 运行态（发射器位置、剩余寿命、累积器）在
//! [`super::ParticleSystem`] 上。
//!
//! 配置可以用 serde 序列化，配合 [`crate::config`] 做 TOML 读写。

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::core::error::{ParticleError, ParticleResult};

use super::pool::{InsertMode, Particle};
use super::sampler::Sampler;

/// 出生位置散布分布
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadDistribution {
    /// 不散布，粒子出生在发射器位置
    #[default]
    None,
    /// 每轴均匀散布 `±area_spread`
    Uniform,
    /// 每轴正态散布，标准差为 `area_spread`
    Normal,
}

/// 发射器配置
///
/// 序列化时缺省字段取默认值，配置文件只需要写被改动的参数。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// 插入策略（决定绘制顺序）
    pub insert_mode: InsertMode,
    /// 每秒发射数量，0 表示不做连续发射（只响应 `emit`）
    pub emission_rate: f32,
    /// 发射器寿命（秒），-1 表示无限
    pub emitter_lifetime: f32,

    /// 粒子寿命下限（秒）
    pub particle_life_min: f32,
    /// 粒子寿命上限（秒）
    pub particle_life_max: f32,

    /// 出生位置散布分布
    pub spread_distribution: SpreadDistribution,
    /// 每轴散布参数：均匀分布的半宽 / 正态分布的标准差
    pub area_spread: Vec2,

    /// 发射方向（弧度）
    pub direction: f32,
    /// 方向散布角（弧度，以 `direction` 为中心的扇形）
    pub spread: f32,

    /// 初速度大小下限
    pub speed_min: f32,
    /// 初速度大小上限
    pub speed_max: f32,

    /// 线性加速度每轴下限
    pub linear_acceleration_min: Vec2,
    /// 线性加速度每轴上限
    pub linear_acceleration_max: Vec2,
    /// 径向加速度范围（相对出生点，负值为吸向出生点）
    pub radial_acceleration_min: f32,
    pub radial_acceleration_max: f32,
    /// 切向加速度范围
    pub tangential_acceleration_min: f32,
    pub tangential_acceleration_max: f32,

    /// 大小关键帧，沿寿命分段线性插值，至少一帧
    pub sizes: Vec<f32>,
    /// 大小变化量 `[0, 1]`，决定每个粒子在大小曲线上的随机窗口
    pub size_variation: f32,

    /// 颜色关键帧（RGBA），沿寿命分段线性插值，至少一帧
    pub colors: Vec<Vec4>,

    /// 初始朝向下限（弧度）
    pub rotation_min: f32,
    /// 初始朝向上限（弧度）
    pub rotation_max: f32,

    /// 出生时刻角速度
    pub spin_start: f32,
    /// 死亡时刻角速度
    pub spin_end: f32,
    /// 角速度变化量 `[0, 1]`
    pub spin_variation: f32,

    /// 渲染锚点偏移（像素）
    pub offset: Vec2,
    /// 渲染朝向是否叠加速度方向
    pub relative_rotation: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            insert_mode: InsertMode::Top,
            emission_rate: 0.0,
            emitter_lifetime: -1.0,
            particle_life_min: 0.0,
            particle_life_max: 0.0,
            spread_distribution: SpreadDistribution::None,
            area_spread: Vec2::ZERO,
            direction: 0.0,
            spread: 0.0,
            speed_min: 0.0,
            speed_max: 0.0,
            linear_acceleration_min: Vec2::ZERO,
            linear_acceleration_max: Vec2::ZERO,
            radial_acceleration_min: 0.0,
            radial_acceleration_max: 0.0,
            tangential_acceleration_min: 0.0,
            tangential_acceleration_max: 0.0,
            sizes: vec![1.0],
            size_variation: 0.0,
            colors: vec![Vec4::ONE],
            rotation_min: 0.0,
            rotation_max: 0.0,
            spin_start: 0.0,
            spin_end: 0.0,
            spin_variation: 0.0,
            offset: Vec2::ZERO,
            relative_rotation: false,
        }
    }
}

impl EmitterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置发射速率
    pub fn with_emission_rate(mut self, rate: f32) -> Self {
        self.emission_rate = rate;
        self
    }

    /// 设置发射器寿命（-1 表示无限）
    pub fn with_emitter_lifetime(mut self, lifetime: f32) -> Self {
        self.emitter_lifetime = lifetime;
        self
    }

    /// 设置粒子寿命范围
    pub fn with_particle_lifetime(mut self, min: f32, max: f32) -> Self {
        self.particle_life_min = min;
        self.particle_life_max = max;
        self
    }

    /// 设置发射方向与散布角
    pub fn with_direction(mut self, direction: f32, spread: f32) -> Self {
        self.direction = direction;
        self.spread = spread;
        self
    }

    /// 设置初速度范围
    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed_min = min;
        self.speed_max = max;
        self
    }

    /// 设置线性加速度范围
    pub fn with_linear_acceleration(mut self, min: Vec2, max: Vec2) -> Self {
        self.linear_acceleration_min = min;
        self.linear_acceleration_max = max;
        self
    }

    /// 设置径向加速度范围
    pub fn with_radial_acceleration(mut self, min: f32, max: f32) -> Self {
        self.radial_acceleration_min = min;
        self.radial_acceleration_max = max;
        self
    }

    /// 设置切向加速度范围
    pub fn with_tangential_acceleration(mut self, min: f32, max: f32) -> Self {
        self.tangential_acceleration_min = min;
        self.tangential_acceleration_max = max;
        self
    }

    /// 设置出生散布
    pub fn with_area_spread(mut self, distribution: SpreadDistribution, spread: Vec2) -> Self {
        self.spread_distribution = distribution;
        self.area_spread = spread;
        self
    }

    /// 设置大小关键帧
    pub fn with_sizes(mut self, sizes: Vec<f32>) -> Self {
        self.sizes = sizes;
        self
    }

    /// 设置大小变化量
    pub fn with_size_variation(mut self, variation: f32) -> Self {
        self.size_variation = variation;
        self
    }

    /// 设置颜色关键帧
    pub fn with_colors(mut self, colors: Vec<Vec4>) -> Self {
        self.colors = colors;
        self
    }

    /// 设置初始朝向范围
    pub fn with_rotation(mut self, min: f32, max: f32) -> Self {
        self.rotation_min = min;
        self.rotation_max = max;
        self
    }

    /// 设置角速度端点与变化量
    pub fn with_spin(mut self, start: f32, end: f32, variation: f32) -> Self {
        self.spin_start = start;
        self.spin_end = end;
        self.spin_variation = variation;
        self
    }

    /// 设置插入策略
    pub fn with_insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    /// 校验配置
    ///
    /// 发射速率不能为负，大小/颜色关键帧列表不能为空。
    pub fn validate(&self) -> ParticleResult<()> {
        if self.emission_rate < 0.0 {
            return Err(ParticleError::InvalidArgument(format!(
                "emission rate must be non-negative, got {}",
                self.emission_rate
            )));
        }
        if self.sizes.is_empty() {
            return Err(ParticleError::InvalidArgument(
                "size keyframe list must not be empty".to_string(),
            ));
        }
        if self.colors.is_empty() {
            return Err(ParticleError::InvalidArgument(
                "color keyframe list must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// 对一个新分配的槽位做出生采样
    ///
    /// `spawn_pos` 是已经按帧内时刻插值过的发射器位置。`origin` 固定
    /// 为出生位置，之后发射器移动也不再更新。
    pub(crate) fn init_particle(&self, p: &mut Particle, spawn_pos: Vec2, sampler: &mut Sampler) {
        debug_assert!(!self.sizes.is_empty() && !self.colors.is_empty());

        p.life = sampler.range(self.particle_life_min, self.particle_life_max);
        p.lifetime = p.life;

        let mut pos = spawn_pos;
        match self.spread_distribution {
            SpreadDistribution::Uniform => {
                pos.x += sampler.range(-self.area_spread.x, self.area_spread.x);
                pos.y += sampler.range(-self.area_spread.y, self.area_spread.y);
            }
            SpreadDistribution::Normal => {
                pos.x += sampler.normal(self.area_spread.x);
                pos.y += sampler.normal(self.area_spread.y);
            }
            SpreadDistribution::None => {}
        }
        p.position = pos;
        p.origin = pos;

        p.direction = sampler.range(
            self.direction - self.spread / 2.0,
            self.direction + self.spread / 2.0,
        );
        let speed = sampler.range(self.speed_min, self.speed_max);
        p.velocity = Vec2::new(p.direction.cos(), p.direction.sin()) * speed;

        p.linear_acceleration.x = sampler.range(
            self.linear_acceleration_min.x,
            self.linear_acceleration_max.x,
        );
        p.linear_acceleration.y = sampler.range(
            self.linear_acceleration_min.y,
            self.linear_acceleration_max.y,
        );
        p.radial_acceleration = sampler.range(
            self.radial_acceleration_min,
            self.radial_acceleration_max,
        );
        p.tangential_acceleration = sampler.range(
            self.tangential_acceleration_min,
            self.tangential_acceleration_max,
        );

        // 每个粒子在大小曲线上占一个随机窗口：起点偏移 + 区间长度
        p.size_offset = sampler.uniform() * self.size_variation;
        p.size_interval = (1.0 - sampler.uniform() * self.size_variation) - p.size_offset;
        p.size = self.sizes[0];

        p.spin_start = variation_lerp(self.spin_start, self.spin_end, self.spin_variation, sampler);
        p.spin_end = variation_lerp(self.spin_end, self.spin_start, self.spin_variation, sampler);
        p.rotation = sampler.range(self.rotation_min, self.rotation_max);
        p.angle = p.rotation;
        if self.relative_rotation {
            p.angle += p.velocity.y.atan2(p.velocity.x);
        }

        p.color = self.colors[0];
    }
}

/// 在以 `primary` 为中心、半宽 `(secondary / 2) * variation` 的带内均匀采样
fn variation_lerp(primary: f32, secondary: f32, variation: f32, sampler: &mut Sampler) -> f32 {
    let low = primary - (secondary / 2.0) * variation;
    let high = primary + (secondary / 2.0) * variation;
    let r = sampler.uniform();
    low * (1.0 - r) + high * r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EmitterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.emitter_lifetime, -1.0);
        assert_eq!(config.sizes, vec![1.0]);
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let config = EmitterConfig::default().with_emission_rate(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ParticleError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_keyframes() {
        let config = EmitterConfig::default().with_sizes(vec![]);
        assert!(config.validate().is_err());

        let config = EmitterConfig::default().with_colors(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = EmitterConfig::default()
            .with_emission_rate(12.0)
            .with_insert_mode(InsertMode::Random)
            .with_sizes(vec![1.0, 0.5]);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: EmitterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.emission_rate, 12.0);
        assert_eq!(parsed.insert_mode, InsertMode::Random);
        assert_eq!(parsed.sizes, vec![1.0, 0.5]);
    }

    #[test]
    fn test_init_particle_basics() {
        let config = EmitterConfig::default()
            .with_particle_lifetime(2.0, 2.0)
            .with_speed(10.0, 10.0)
            .with_direction(0.0, 0.0)
            .with_colors(vec![Vec4::new(1.0, 0.5, 0.0, 1.0), Vec4::ZERO])
            .with_sizes(vec![3.0, 1.0]);
        let mut sampler = Sampler::from_seed(42);
        let mut p = Particle::default();

        config.init_particle(&mut p, Vec2::new(5.0, 7.0), &mut sampler);

        assert_eq!(p.life, 2.0);
        assert_eq!(p.lifetime, 2.0);
        // 无散布：出生在发射器位置，origin 固定在出生点
        assert_eq!(p.position, Vec2::new(5.0, 7.0));
        assert_eq!(p.origin, p.position);
        // 方向 0、速度 10：速度矢量沿 +x
        assert!((p.velocity.x - 10.0).abs() < 1e-5);
        assert!(p.velocity.y.abs() < 1e-5);
        // 初始大小取第一帧，颜色取第一帧
        assert_eq!(p.size, 3.0);
        assert_eq!(p.color, Vec4::new(1.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn test_init_particle_direction_window() {
        let config = EmitterConfig::default()
            .with_speed(1.0, 1.0)
            .with_direction(std::f32::consts::FRAC_PI_2, 1.0);
        let mut sampler = Sampler::from_seed(7);

        for _ in 0..128 {
            let mut p = Particle::default();
            config.init_particle(&mut p, Vec2::ZERO, &mut sampler);
            let lo = std::f32::consts::FRAC_PI_2 - 0.5;
            let hi = std::f32::consts::FRAC_PI_2 + 0.5;
            assert!(p.direction >= lo && p.direction <= hi);
        }
    }

    #[test]
    fn test_init_particle_uniform_spread_window() {
        let config = EmitterConfig::default()
            .with_area_spread(SpreadDistribution::Uniform, Vec2::new(4.0, 2.0));
        let mut sampler = Sampler::from_seed(11);

        for _ in 0..128 {
            let mut p = Particle::default();
            config.init_particle(&mut p, Vec2::new(100.0, 200.0), &mut sampler);
            assert!((p.position.x - 100.0).abs() <= 4.0);
            assert!((p.position.y - 200.0).abs() <= 2.0);
        }
    }

    #[test]
    fn test_size_window_without_variation() {
        let config = EmitterConfig::default().with_sizes(vec![1.0, 2.0]);
        let mut sampler = Sampler::from_seed(3);
        let mut p = Particle::default();
        config.init_particle(&mut p, Vec2::ZERO, &mut sampler);

        // 变化量为 0 时窗口覆盖整条曲线
        assert_eq!(p.size_offset, 0.0);
        assert_eq!(p.size_interval, 1.0);
    }

    #[test]
    fn test_variation_lerp_band() {
        let mut sampler = Sampler::from_seed(21);
        for _ in 0..128 {
            let v = variation_lerp(10.0, 4.0, 1.0, &mut sampler);
            assert!((8.0..=12.0).contains(&v));
        }
        // 变化量 0 时总是返回主值
        assert_eq!(variation_lerp(10.0, 4.0, 0.0, &mut sampler), 10.0);
    }

    #[test]
    fn test_relative_rotation_angle() {
        let config = EmitterConfig::default()
            .with_speed(5.0, 5.0)
            .with_direction(std::f32::consts::FRAC_PI_2, 0.0);
        let mut p = Particle::default();
        let mut sampler = Sampler::from_seed(1);

        let mut relative = config.clone();
        relative.relative_rotation = true;
        relative.init_particle(&mut p, Vec2::ZERO, &mut sampler);
        // 朝向叠加速度方向（竖直向下发射 => pi/2）
        assert!((p.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        let mut q = Particle::default();
        config.init_particle(&mut q, Vec2::ZERO, &mut Sampler::from_seed(1));
        assert_eq!(q.angle, 0.0);
    }
}
