//! 粒子效果预设
//!
//! 内置的一组发射器配置，可直接使用或作为调参起点。坐标系是屏幕
//! 坐标（y 轴向下），"向上"的效果使用负 y 方向。

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec4};

use super::emitter::{EmitterConfig, SpreadDistribution};
use super::pool::InsertMode;

/// 内置粒子效果预设
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPreset {
    Fire,
    Smoke,
    Explosion,
    Spark,
    Snow,
}

impl EffectPreset {
    pub fn name(&self) -> &'static str {
        match self {
            EffectPreset::Fire => "Fire",
            EffectPreset::Smoke => "Smoke",
            EffectPreset::Explosion => "Explosion",
            EffectPreset::Spark => "Spark",
            EffectPreset::Snow => "Snow",
        }
    }

    /// 生成对应的发射器配置
    pub fn config(&self) -> EmitterConfig {
        match self {
            EffectPreset::Fire => EmitterConfig::new()
                .with_emission_rate(60.0)
                .with_particle_lifetime(0.6, 1.4)
                .with_direction(-FRAC_PI_2, 0.6)
                .with_speed(30.0, 70.0)
                .with_linear_acceleration(Vec2::new(-5.0, -40.0), Vec2::new(5.0, -80.0))
                .with_sizes(vec![1.0, 1.4, 0.3])
                .with_size_variation(0.4)
                .with_colors(vec![
                    Vec4::new(1.0, 0.85, 0.25, 1.0),
                    Vec4::new(1.0, 0.4, 0.1, 0.9),
                    Vec4::new(0.35, 0.08, 0.02, 0.0),
                ]),

            EffectPreset::Smoke => EmitterConfig::new()
                .with_emission_rate(18.0)
                .with_particle_lifetime(2.0, 4.0)
                .with_direction(-FRAC_PI_2, 0.4)
                .with_speed(10.0, 25.0)
                .with_area_spread(SpreadDistribution::Normal, Vec2::new(6.0, 2.0))
                .with_spin(-0.5, 0.5, 1.0)
                .with_sizes(vec![0.6, 1.5, 2.5])
                .with_size_variation(0.3)
                .with_colors(vec![
                    Vec4::new(0.5, 0.5, 0.5, 0.6),
                    Vec4::new(0.7, 0.7, 0.7, 0.25),
                    Vec4::new(0.8, 0.8, 0.8, 0.0),
                ])
                .with_insert_mode(InsertMode::Bottom),

            // 爆发型：速率为 0，由 `emit` 一次性喷出
            EffectPreset::Explosion => EmitterConfig::new()
                .with_particle_lifetime(0.3, 0.9)
                .with_direction(0.0, TAU)
                .with_speed(120.0, 260.0)
                .with_tangential_acceleration(-20.0, 20.0)
                .with_sizes(vec![1.2, 0.4])
                .with_size_variation(0.5)
                .with_colors(vec![
                    Vec4::new(1.0, 0.95, 0.6, 1.0),
                    Vec4::new(1.0, 0.45, 0.1, 0.8),
                    Vec4::new(0.2, 0.2, 0.2, 0.0),
                ])
                .with_insert_mode(InsertMode::Random),

            EffectPreset::Spark => EmitterConfig::new()
                .with_emission_rate(120.0)
                .with_particle_lifetime(0.2, 0.6)
                .with_direction(-FRAC_PI_2, 0.25)
                .with_speed(150.0, 300.0)
                .with_linear_acceleration(Vec2::new(0.0, 300.0), Vec2::new(0.0, 500.0))
                .with_sizes(vec![0.5, 0.1])
                .with_colors(vec![
                    Vec4::new(1.0, 1.0, 0.8, 1.0),
                    Vec4::new(1.0, 0.8, 0.3, 0.0),
                ]),

            EffectPreset::Snow => EmitterConfig::new()
                .with_emission_rate(12.0)
                .with_particle_lifetime(4.0, 8.0)
                .with_direction(FRAC_PI_2, 0.3)
                .with_speed(15.0, 40.0)
                .with_area_spread(SpreadDistribution::Uniform, Vec2::new(160.0, 0.0))
                .with_rotation(0.0, PI)
                .with_spin(-0.8, 0.8, 1.0)
                .with_sizes(vec![0.7, 1.0])
                .with_size_variation(0.6)
                .with_colors(vec![
                    Vec4::new(1.0, 1.0, 1.0, 0.9),
                    Vec4::new(1.0, 1.0, 1.0, 0.0),
                ])
                .with_insert_mode(InsertMode::Bottom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::particles::sampler::Sampler;
    use crate::render::particles::system::ParticleSystem;

    #[test]
    fn test_all_presets_validate() {
        for preset in [
            EffectPreset::Fire,
            EffectPreset::Smoke,
            EffectPreset::Explosion,
            EffectPreset::Spark,
            EffectPreset::Snow,
        ] {
            assert!(preset.config().validate().is_ok(), "{}", preset.name());
        }
    }

    #[test]
    fn test_explosion_is_burst_only() {
        let mut system = ParticleSystem::new(256).unwrap();
        system.set_sampler(Sampler::from_seed(8));
        system.set_config(EffectPreset::Explosion.config()).unwrap();
        system.start();

        // 连续更新不产生粒子
        system.update(1.0);
        assert_eq!(system.count(), 0);

        // 一次爆发
        system.emit(128);
        assert_eq!(system.count(), 128);
    }

    #[test]
    fn test_fire_runs_and_decays() {
        let mut system = ParticleSystem::new(512).unwrap();
        system.set_sampler(Sampler::from_seed(8));
        system.set_config(EffectPreset::Fire.config()).unwrap();
        system.start();

        for _ in 0..60 {
            system.update(1.0 / 60.0);
        }
        assert!(system.count() > 0);

        system.stop();
        for _ in 0..120 {
            system.update(1.0 / 60.0);
        }
        assert_eq!(system.count(), 0);
    }
}
