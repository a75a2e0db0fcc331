//! 粒子槽池与绘制顺序链表
//!
//! 固定容量的粒子存储：所有槽位在创建时一次性预分配，热路径上零分配。
//! 活跃槽位始终紧凑地占据 `[0, active)`，释放用"末位换入"实现 O(1)
//! 删除。绘制顺序由穿在粒子记录里的双向链表维护，链接是槽位索引
//! （`Option<u32>`）而不是地址，紧凑化搬移后只需修补两个索引字段。
//!
//! ## 不变量
//!
//! - `active <= capacity`，槽位 `[0, active)` 全部存活
//! - 从 `head` 沿 `next` 走恰好经过 `active` 个粒子并停在 `tail`；
//!   从 `tail` 沿 `prev` 走是严格的逆序

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::core::error::{ParticleError, ParticleResult};

/// 最大粒子数
///
/// 每个粒子四个顶点，顶点索引必须落在 32 位有符号范围内。
pub const MAX_PARTICLES: u32 = (i32::MAX / 4) as u32;

// ============================================================================
// 插入策略
// ============================================================================

/// 新粒子在绘制顺序中的插入策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// 追加到表尾，新粒子画在旧粒子上面
    #[default]
    Top,
    /// 插到表头，新粒子画在旧粒子下面
    Bottom,
    /// 随机挑一个已有粒子，插到它后面
    Random,
}

// ============================================================================
// 粒子记录
// ============================================================================

/// 单个粒子
///
/// 值类型，生命周期绑定在一个池槽位上。`prev`/`next` 是绘制顺序
/// 链接，由池独占维护。
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// 剩余寿命（秒）
    pub life: f32,
    /// 总寿命（秒）
    pub lifetime: f32,

    /// 当前位置
    pub position: Vec2,
    /// 出生点，径向力始终指向/背离这里，出生后不再变化
    pub origin: Vec2,
    /// 当前速度
    pub velocity: Vec2,
    /// 出生方向（弧度），仅在出生采样时使用
    pub direction: f32,

    /// 线性加速度
    pub linear_acceleration: Vec2,
    /// 径向加速度
    pub radial_acceleration: f32,
    /// 切向加速度
    pub tangential_acceleration: f32,

    /// 当前大小
    pub size: f32,
    /// 大小曲线起点偏移
    pub size_offset: f32,
    /// 大小曲线区间长度
    pub size_interval: f32,

    /// 当前朝向（弧度）
    pub rotation: f32,
    /// 渲染朝向：`rotation`，开启相对旋转时再叠加速度方向
    pub angle: f32,
    /// 出生时刻角速度
    pub spin_start: f32,
    /// 死亡时刻角速度
    pub spin_end: f32,

    /// 当前颜色（RGBA，0..1）
    pub color: Vec4,

    prev: Option<u32>,
    next: Option<u32>,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            life: 0.0,
            lifetime: 0.0,
            position: Vec2::ZERO,
            origin: Vec2::ZERO,
            velocity: Vec2::ZERO,
            direction: 0.0,
            linear_acceleration: Vec2::ZERO,
            radial_acceleration: 0.0,
            tangential_acceleration: 0.0,
            size: 1.0,
            size_offset: 0.0,
            size_interval: 1.0,
            rotation: 0.0,
            angle: 0.0,
            spin_start: 0.0,
            spin_end: 0.0,
            color: Vec4::ONE,
            prev: None,
            next: None,
        }
    }
}

// ============================================================================
// 粒子池
// ============================================================================

/// 固定容量粒子池
pub struct ParticlePool {
    /// 预分配的槽位数组，长度即容量
    slots: Vec<Particle>,
    /// 活跃粒子数，同时是下一个未用槽位的游标
    active: u32,
    /// 绘制顺序表头（最先画）
    head: Option<u32>,
    /// 绘制顺序表尾（最后画）
    tail: Option<u32>,
}

impl ParticlePool {
    /// 创建给定容量的粒子池
    ///
    /// 容量必须在 `1..=MAX_PARTICLES`，否则返回
    /// [`ParticleError::InvalidArgument`]；分配失败返回
    /// [`ParticleError::OutOfMemory`]，不会留下部分分配的缓冲区。
    pub fn with_capacity(capacity: u32) -> ParticleResult<Self> {
        if capacity == 0 || capacity > MAX_PARTICLES {
            return Err(ParticleError::InvalidArgument(format!(
                "buffer size must be in 1..={}, got {}",
                MAX_PARTICLES, capacity
            )));
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity as usize)
            .map_err(|_| ParticleError::OutOfMemory(capacity))?;
        slots.resize(capacity as usize, Particle::default());

        Ok(Self {
            slots,
            active: 0,
            head: None,
            tail: None,
        })
    }

    /// 创建一个容量相同的空池（克隆配置时使用）
    pub(crate) fn fresh(&self) -> Self {
        Self {
            slots: vec![Particle::default(); self.slots.len()],
            active: 0,
            head: None,
            tail: None,
        }
    }

    /// 池容量
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// 当前活跃粒子数
    #[inline]
    pub fn len(&self) -> u32 {
        self.active
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.active == self.capacity()
    }

    /// 丢弃所有活跃粒子
    pub fn clear(&mut self) {
        self.active = 0;
        self.head = None;
        self.tail = None;
    }

    /// 取粒子引用，`index` 越界时返回 `None`
    #[inline]
    pub fn get(&self, index: u32) -> Option<&Particle> {
        if index < self.active {
            self.slots.get(index as usize)
        } else {
            None
        }
    }

    /// 取粒子可变引用，`index` 越界时返回 `None`
    #[inline]
    pub fn get_mut(&mut self, index: u32) -> Option<&mut Particle> {
        if index < self.active {
            self.slots.get_mut(index as usize)
        } else {
            None
        }
    }

    /// 绘制顺序表头
    #[inline]
    pub fn head(&self) -> Option<u32> {
        self.head
    }

    /// 绘制顺序表尾
    #[inline]
    pub fn tail(&self) -> Option<u32> {
        self.tail
    }

    // ========================================================================
    // 分配与释放
    // ========================================================================

    /// 分配一个新槽位
    ///
    /// 池满时返回 `None`（不是错误，调用方静默丢弃本次生成）。返回的
    /// 槽位尚未接入绘制顺序，必须紧接着用一个 `insert_*` 方法链接。
    pub fn allocate(&mut self) -> Option<u32> {
        if self.is_full() {
            return None;
        }
        let index = self.active;
        self.active += 1;
        let slot = &mut self.slots[index as usize];
        slot.prev = None;
        slot.next = None;
        Some(index)
    }

    /// 释放槽位 `index`，O(1)
    ///
    /// 先从绘制顺序上摘除，然后把最后一个活跃槽位搬进来补位，并把
    /// 被搬移粒子的两条邻居链接修补到新槽位。对"最后活跃槽位"持有的
    /// 外部索引在释放后失效。
    pub fn free(&mut self, index: u32) {
        debug_assert!(index < self.active, "free on inactive slot {}", index);

        self.detach(index);

        let last = self.active - 1;
        if index != last {
            self.slots[index as usize] = self.slots[last as usize];
            self.relink(index);
        }
        self.active = last;
    }

    /// 把 `index` 从绘制顺序上摘除
    fn detach(&mut self, index: u32) {
        let Particle { prev, next, .. } = self.slots[index as usize];
        match prev {
            Some(p) => self.slots[p as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n as usize].prev = prev,
            None => self.tail = prev,
        }
    }

    /// 搬移补位后，把新落在 `index` 的粒子的邻居链接指回 `index`
    fn relink(&mut self, index: u32) {
        let Particle { prev, next, .. } = self.slots[index as usize];
        match prev {
            Some(p) => self.slots[p as usize].next = Some(index),
            None => self.head = Some(index),
        }
        match next {
            Some(n) => self.slots[n as usize].prev = Some(index),
            None => self.tail = Some(index),
        }
    }

    // ========================================================================
    // 插入策略
    // ========================================================================

    /// 追加到表尾（Top 策略）
    pub fn insert_top(&mut self, index: u32) {
        debug_assert!(index < self.active);

        match self.tail {
            Some(t) => {
                self.slots[t as usize].next = Some(index);
                self.slots[index as usize].prev = Some(t);
            }
            None => {
                self.head = Some(index);
                self.slots[index as usize].prev = None;
            }
        }
        self.slots[index as usize].next = None;
        self.tail = Some(index);
    }

    /// 插到表头（Bottom 策略）
    pub fn insert_bottom(&mut self, index: u32) {
        debug_assert!(index < self.active);

        match self.head {
            Some(h) => {
                self.slots[h as usize].prev = Some(index);
                self.slots[index as usize].next = Some(h);
            }
            None => {
                self.tail = Some(index);
                self.slots[index as usize].next = None;
            }
        }
        self.slots[index as usize].prev = None;
        self.head = Some(index);
    }

    /// 随机插入（Random 策略）
    ///
    /// `pos` 是 `[0, 插入前活跃数]` 的均匀样本；`index` 必须是刚分配的
    /// 槽位，此时插入前活跃数恰好等于 `index`。`pos == index` 时插到
    /// 表头，否则插到槽位 `pos` 之后。锚点按**槽位顺序**取，不是
    /// 按链表顺序，这是对真实表位置的近似。
    pub fn insert_random(&mut self, index: u32, pos: u32) {
        debug_assert!(index < self.active);
        debug_assert!(pos <= index, "anchor {} out of range for slot {}", pos, index);

        if pos == index {
            self.insert_bottom(index);
            return;
        }

        let next = self.slots[pos as usize].next;
        self.slots[pos as usize].next = Some(index);
        match next {
            Some(n) => self.slots[n as usize].prev = Some(index),
            None => self.tail = Some(index),
        }
        self.slots[index as usize].prev = Some(pos);
        self.slots[index as usize].next = next;
    }

    // ========================================================================
    // 遍历
    // ========================================================================

    /// 按绘制顺序（head -> tail）遍历活跃粒子
    pub fn iter(&self) -> ActiveParticles<'_> {
        ActiveParticles {
            pool: self,
            cursor: self.head,
        }
    }
}

/// 绘制顺序遍历器
pub struct ActiveParticles<'a> {
    pool: &'a ParticlePool,
    cursor: Option<u32>,
}

impl<'a> Iterator for ActiveParticles<'a> {
    type Item = &'a Particle;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let particle = &self.pool.slots[index as usize];
        self.cursor = particle.next;
        Some(particle)
    }
}

// ============================================================================
// 测试
// ============================================================================
