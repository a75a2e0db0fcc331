//! 关键帧插值曲线
//!
//! 粒子的大小与颜色沿归一化寿命 `t ∈ [0, 1]` 在关键帧列表上做分段
//! 线性插值。与按时间戳查找停止点的渐变不同，这里把归一化位置直接
//! 缩放成小数帧索引：整数部分选出相邻的两帧，小数部分作插值系数。
//!
//! ```text
//! i = 0       1       2      3          n-1
//!     |-------|-------|------|--- ... ---|
//! s = 0.0                               1.0
//! ```

use glam::Vec4;

/// 可以作为关键帧插值的值类型
pub trait Keyframe: Copy {
    /// 在两帧之间线性插值
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Keyframe for f32 {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Keyframe for Vec4 {
    #[inline]
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec4::lerp(self, other, t)
    }
}

/// 按归一化位置在关键帧列表上采样
///
/// `fraction` 是 `[0, 1]` 的归一化位置。列表不能为空；单帧列表总是
/// 返回那一帧。
#[inline]
pub fn sample<K: Keyframe>(frames: &[K], fraction: f32) -> K {
    debug_assert!(!frames.is_empty(), "keyframe list must not be empty");

    let last = frames.len() - 1;
    if last == 0 {
        return frames[0];
    }

    let s = fraction * last as f32;
    let i = (s as usize).min(last);
    let k = if i == last { i } else { i + 1 };
    let f = s - i as f32;
    frames[i].lerp(frames[k], f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_boundaries() {
        let sizes = [1.0f32, 2.0, 3.0];
        assert_eq!(sample(&sizes, 0.0), 1.0);
        assert_eq!(sample(&sizes, 0.5), 2.0);
        assert_eq!(sample(&sizes, 1.0), 3.0);
    }

    #[test]
    fn test_scalar_between_frames() {
        let sizes = [1.0f32, 2.0, 3.0];
        // s = 0.25 * 2 = 0.5，落在第 0、1 帧之间
        assert!((sample(&sizes, 0.25) - 1.5).abs() < 1e-6);
        assert!((sample(&sizes, 0.75) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_single_frame() {
        let sizes = [4.0f32];
        assert_eq!(sample(&sizes, 0.0), 4.0);
        assert_eq!(sample(&sizes, 0.7), 4.0);
        assert_eq!(sample(&sizes, 1.0), 4.0);
    }

    #[test]
    fn test_color_midpoint() {
        let colors = [
            Vec4::new(1.0, 1.0, 1.0, 1.0),
            Vec4::new(1.0, 1.0, 1.0, 0.0),
        ];
        let mid = sample(&colors, 0.5);
        assert!((mid.w - 0.5).abs() < 1e-6);
        assert!((mid.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_two_frames_are_plain_lerp() {
        let sizes = [0.0f32, 10.0];
        assert!((sample(&sizes, 0.3) - 3.0).abs() < 1e-5);
    }
}
