//! 腿与关节标识
//!
//! 提供编译期安全的腿/关节索引，替代字符串键（"FL"、"T"）查表。
//!
//! # 设计目标
//!
//! - **编译期安全**: 使用枚举防止无效的腿或关节
//! - **零开销**: `LegArray` / `AxisArray` 编译后等价于定长数组
//! - **配置友好**: 同时支持短代码（`FL`、`H`）和配置键（`front_left`、`hip`）
//!
//! # 示例
//!
//! ```rust
//! use quad_model::types::{JointAxis, JointId, JointTable, Leg, LegArray, AxisArray};
//!
//! let table: JointTable<f64> = LegArray::splat(AxisArray::splat(90.0));
//! let id = JointId::new(Leg::FrontLeft, JointAxis::Tibia);
//! assert_eq!(table[id], 90.0);
//! assert_eq!(id.to_string(), "FL.T");
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// 腿位置
///
/// 视角：站在机器人**后方**，面向头部。左右均以此视角为准。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Leg {
    /// 左前
    FrontLeft = 0,
    /// 右前
    FrontRight = 1,
    /// 左后
    BackLeft = 2,
    /// 右后
    BackRight = 3,
}

/// 机身侧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Leg {
    /// 所有腿（解剖顺序）
    pub const ALL: [Leg; 4] = [Leg::FrontLeft, Leg::FrontRight, Leg::BackLeft, Leg::BackRight];

    /// 获取腿索引（0-3）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 从索引创建腿（范围检查）
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 短代码（FL / FR / BL / BR）
    pub const fn code(self) -> &'static str {
        match self {
            Leg::FrontLeft => "FL",
            Leg::FrontRight => "FR",
            Leg::BackLeft => "BL",
            Leg::BackRight => "BR",
        }
    }

    /// 配置文件中使用的键
    pub const fn key(self) -> &'static str {
        match self {
            Leg::FrontLeft => "front_left",
            Leg::FrontRight => "front_right",
            Leg::BackLeft => "back_left",
            Leg::BackRight => "back_right",
        }
    }

    pub const fn side(self) -> Side {
        match self {
            Leg::FrontLeft | Leg::BackLeft => Side::Left,
            Leg::FrontRight | Leg::BackRight => Side::Right,
        }
    }

    pub const fn is_front(self) -> bool {
        matches!(self, Leg::FrontLeft | Leg::FrontRight)
    }

    /// 对角线上的另一条腿（小跑步态中同组摆动）
    pub const fn diagonal(self) -> Leg {
        match self {
            Leg::FrontLeft => Leg::BackRight,
            Leg::FrontRight => Leg::BackLeft,
            Leg::BackLeft => Leg::FrontRight,
            Leg::BackRight => Leg::FrontLeft,
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 解析失败：未知的腿或关节名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown name '{}'", self.0)
    }
}

impl std::error::Error for UnknownName {}

impl FromStr for Leg {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Leg::ALL
            .into_iter()
            .find(|leg| {
                lowered == leg.key()
                    || lowered.eq_ignore_ascii_case(leg.code())
                    || lowered == leg.key().replace('_', "-")
            })
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// 关节轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JointAxis {
    /// 髋关节（机身处的偏航）
    Hip = 0,
    /// 大腿
    Femur = 1,
    /// 小腿（膝关节伸展）
    Tibia = 2,
}

impl JointAxis {
    /// 所有关节轴
    pub const ALL: [JointAxis; 3] = [JointAxis::Hip, JointAxis::Femur, JointAxis::Tibia];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn code(self) -> &'static str {
        match self {
            JointAxis::Hip => "H",
            JointAxis::Femur => "F",
            JointAxis::Tibia => "T",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            JointAxis::Hip => "hip",
            JointAxis::Femur => "femur",
            JointAxis::Tibia => "tibia",
        }
    }
}

impl fmt::Display for JointAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for JointAxis {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        JointAxis::ALL
            .into_iter()
            .find(|axis| lowered == axis.key() || lowered.eq_ignore_ascii_case(axis.code()))
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// 关节全局标识（腿 + 轴）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId {
    pub leg: Leg,
    pub axis: JointAxis,
}

impl JointId {
    #[inline]
    pub const fn new(leg: Leg, axis: JointAxis) -> Self {
        Self { leg, axis }
    }

    /// 所有 12 个关节（按腿、再按轴排序）
    pub fn all() -> impl Iterator<Item = JointId> {
        Leg::ALL
            .into_iter()
            .flat_map(|leg| JointAxis::ALL.into_iter().map(move |axis| JointId::new(leg, axis)))
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.leg, self.axis)
    }
}

/// 按腿索引的数组
#[derive(Debug, Clone, PartialEq)]
pub struct LegArray<T> {
    data: [T; 4],
}

impl<T: Copy> Copy for LegArray<T> {}

impl<T> LegArray<T> {
    #[inline]
    pub const fn new(data: [T; 4]) -> Self {
        LegArray { data }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// 带腿标识的迭代器
    pub fn iter_legs(&self) -> impl Iterator<Item = (Leg, &T)> {
        Leg::ALL.into_iter().zip(self.data.iter())
    }

    /// 映射转换
    pub fn map<U, F>(self, mut f: F) -> LegArray<U>
    where
        F: FnMut(T) -> U,
    {
        let [a, b, c, d] = self.data;
        LegArray::new([f(a), f(b), f(c), f(d)])
    }

    /// 带腿标识的映射转换
    pub fn map_with_leg<U, F>(self, mut f: F) -> LegArray<U>
    where
        F: FnMut(Leg, T) -> U,
    {
        let [a, b, c, d] = self.data;
        LegArray::new([
            f(Leg::FrontLeft, a),
            f(Leg::FrontRight, b),
            f(Leg::BackLeft, c),
            f(Leg::BackRight, d),
        ])
    }

    /// 由闭包逐腿生成
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Leg) -> T,
    {
        LegArray::new(Leg::ALL.map(&mut f))
    }

    /// 逐腿生成，任意一条失败即返回错误
    pub fn try_from_fn<E, F>(mut f: F) -> Result<Self, E>
    where
        F: FnMut(Leg) -> Result<T, E>,
    {
        Ok(LegArray::new([
            f(Leg::FrontLeft)?,
            f(Leg::FrontRight)?,
            f(Leg::BackLeft)?,
            f(Leg::BackRight)?,
        ]))
    }
}

impl<T: Copy> LegArray<T> {
    /// 创建所有元素相同的数组
    #[inline]
    pub const fn splat(value: T) -> Self {
        LegArray::new([value; 4])
    }
}

impl<T> Index<Leg> for LegArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, leg: Leg) -> &T {
        &self.data[leg.index()]
    }
}

impl<T> IndexMut<Leg> for LegArray<T> {
    #[inline]
    fn index_mut(&mut self, leg: Leg) -> &mut T {
        &mut self.data[leg.index()]
    }
}

/// 按关节轴索引的数组（单条腿的三个关节）
#[derive(Debug, Clone, PartialEq)]
pub struct AxisArray<T> {
    data: [T; 3],
}

impl<T: Copy> Copy for AxisArray<T> {}

impl<T> AxisArray<T> {
    #[inline]
    pub const fn new(data: [T; 3]) -> Self {
        AxisArray { data }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_axes(&self) -> impl Iterator<Item = (JointAxis, &T)> {
        JointAxis::ALL.into_iter().zip(self.data.iter())
    }

    pub fn map<U, F>(self, mut f: F) -> AxisArray<U>
    where
        F: FnMut(T) -> U,
    {
        let [a, b, c] = self.data;
        AxisArray::new([f(a), f(b), f(c)])
    }

    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(JointAxis) -> T,
    {
        AxisArray::new(JointAxis::ALL.map(&mut f))
    }

    pub fn try_from_fn<E, F>(mut f: F) -> Result<Self, E>
    where
        F: FnMut(JointAxis) -> Result<T, E>,
    {
        Ok(AxisArray::new([
            f(JointAxis::Hip)?,
            f(JointAxis::Femur)?,
            f(JointAxis::Tibia)?,
        ]))
    }
}

impl<T: Copy> AxisArray<T> {
    #[inline]
    pub const fn splat(value: T) -> Self {
        AxisArray::new([value; 3])
    }
}

impl<T> Index<JointAxis> for AxisArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, axis: JointAxis) -> &T {
        &self.data[axis.index()]
    }
}

impl<T> IndexMut<JointAxis> for AxisArray<T> {
    #[inline]
    fn index_mut(&mut self, axis: JointAxis) -> &mut T {
        &mut self.data[axis.index()]
    }
}

/// 全身关节表（4 条腿 × 3 个关节）
pub type JointTable<T> = LegArray<AxisArray<T>>;

impl<T> Index<JointId> for LegArray<AxisArray<T>> {
    type Output = T;

    #[inline]
    fn index(&self, id: JointId) -> &T {
        &self[id.leg][id.axis]
    }
}

impl<T> IndexMut<JointId> for LegArray<AxisArray<T>> {
    #[inline]
    fn index_mut(&mut self, id: JointId) -> &mut T {
        &mut self[id.leg][id.axis]
    }
}

/// 腿集合（位集）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LegSet(u8);

impl LegSet {
    pub const EMPTY: LegSet = LegSet(0);
    pub const ALL: LegSet = LegSet(0b1111);

    pub fn of(legs: &[Leg]) -> Self {
        legs.iter().fold(Self::EMPTY, |set, &leg| set.with(leg))
    }

    #[must_use]
    pub const fn with(self, leg: Leg) -> Self {
        LegSet(self.0 | (1 << leg.index()))
    }

    pub const fn contains(self, leg: Leg) -> bool {
        self.0 & (1 << leg.index()) != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 补集（不在本集合中的腿）
    #[must_use]
    pub const fn complement(self) -> Self {
        LegSet(!self.0 & Self::ALL.0)
    }

    /// 按 `Leg::ALL` 顺序迭代
    pub fn iter(self) -> impl Iterator<Item = Leg> {
        Leg::ALL.into_iter().filter(move |&leg| self.contains(leg))
    }
}

impl FromIterator<Leg> for LegSet {
    fn from_iter<I: IntoIterator<Item = Leg>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, LegSet::with)
    }
}

impl fmt::Display for LegSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, leg) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", leg)?;
        }
        f.write_str("}")
    }
}
