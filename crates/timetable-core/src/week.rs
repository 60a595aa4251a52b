//! 周次集合

use serde::{Deserialize, Serialize};

use crate::{Result, TimetableError};

/// 支援的最大周次（位元集合上限）
pub const MAX_WEEK: u16 = 63;

/// 周次集合
///
/// 以 64 位元位圖表示，第 n 位代表第 n 周，重疊判斷為 O(1)。
/// 序列化時為遞增的周次列表。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<u16>", try_from = "Vec<u16>")]
pub struct WeekSet(u64);

impl WeekSet {
    /// 空集合
    pub const fn empty() -> Self {
        Self(0)
    }

    /// 從明確的周次列表創建
    pub fn from_weeks<I: IntoIterator<Item = u16>>(weeks: I) -> Result<Self> {
        let mut set = Self::empty();
        for week in weeks {
            set.insert(week)?;
        }
        Ok(set)
    }

    /// 從可能為緊湊表示的周次列表創建
    ///
    /// 兩個元素且前小於後時視為 `[start, end]` 閉區間並展開，
    /// 其餘情況按明確列表處理。
    pub fn from_compact(weeks: &[u16]) -> Result<Self> {
        match weeks {
            [start, end] if start < end => Self::range(*start, *end),
            _ => Self::from_weeks(weeks.iter().copied()),
        }
    }

    /// 閉區間 `[start, end]` 的所有周次
    pub fn range(start: u16, end: u16) -> Result<Self> {
        if start > end {
            return Err(TimetableError::InvalidWeekRange { start, end });
        }
        Self::from_weeks(start..=end)
    }

    /// 加入一個周次
    pub fn insert(&mut self, week: u16) -> Result<()> {
        if week == 0 || week > MAX_WEEK {
            return Err(TimetableError::WeekOutOfRange { week });
        }
        self.0 |= 1u64 << week;
        Ok(())
    }

    pub fn contains(&self, week: u16) -> bool {
        week <= MAX_WEEK && self.0 & (1u64 << week) != 0
    }

    /// 是否有共同周次（空集合永不重疊）
    pub fn overlaps(&self, other: &WeekSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// 遞增迭代所有周次
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        (1..=MAX_WEEK).filter(move |w| self.contains(*w))
    }

    pub fn first(&self) -> Option<u16> {
        (!self.is_empty()).then(|| self.0.trailing_zeros() as u16)
    }

    pub fn last(&self) -> Option<u16> {
        (!self.is_empty()).then(|| 63 - self.0.leading_zeros() as u16)
    }

    /// 只保留單周
    pub fn odd_weeks(&self) -> Self {
        Self(self.0 & ODD_MASK)
    }

    /// 只保留雙周
    pub fn even_weeks(&self) -> Self {
        Self(self.0 & !ODD_MASK)
    }

    /// 非空且全為單周
    pub fn is_all_odd(&self) -> bool {
        !self.is_empty() && self.0 & !ODD_MASK == 0
    }

    /// 非空且全為雙周
    pub fn is_all_even(&self) -> bool {
        !self.is_empty() && self.0 & ODD_MASK == 0
    }

    pub fn is_disjoint(&self, other: &WeekSet) -> bool {
        !self.overlaps(other)
    }

    pub fn union(&self, other: &WeekSet) -> Self {
        Self(self.0 | other.0)
    }
}

/// 所有奇數位（第 1、3、5... 周）
const ODD_MASK: u64 = 0xAAAA_AAAA_AAAA_AAAA;

impl From<WeekSet> for Vec<u16> {
    fn from(set: WeekSet) -> Self {
        set.iter().collect()
    }
}

impl TryFrom<Vec<u16>> for WeekSet {
    type Error = TimetableError;

    fn try_from(weeks: Vec<u16>) -> Result<Self> {
        Self::from_weeks(weeks)
    }
}
