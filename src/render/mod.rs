//! 渲染子系统
//!
//! 当前包含粒子模拟核心。顶点生成、纹理绑定与 GPU 提交由宿主渲染器
//! 负责：渲染器在每次更新后按绘制顺序只读遍历粒子，把
//! `position`/`angle`/`size`/`color` 当作本帧快照使用。

pub mod particles;

pub use particles::{EffectPreset, EmitterConfig, InsertMode, ParticleSystem};
