//! ECS 集成模块
//!
//! 粒子系统以 `bevy_ecs` 组件的形式挂在实体上，由单线程调度中的
//! [`particle_update_system`] 每帧驱动一次。宿主在每帧开始时写入
//! [`Time`] 资源。
//!
//! [`particle_update_system`]: crate::render::particles::particle_update_system

use bevy_ecs::prelude::*;

/// 帧时间资源
#[derive(Resource)]
pub struct Time {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            delta_seconds: 0.0,
            elapsed_seconds: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_default() {
        let time = Time::default();
        assert_eq!(time.delta_seconds, 0.0);
        assert_eq!(time.elapsed_seconds, 0.0);
    }
}
