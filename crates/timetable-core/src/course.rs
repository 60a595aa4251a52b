//! 課程模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, TimetableError, WeekSet};

/// 周次範圍（閉區間）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: u16,
    pub end: u16,
}

impl WeekRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// 檢查範圍是否有效
    pub fn validate(&self) -> Result<()> {
        if self.start == 0 || self.start > self.end {
            return Err(TimetableError::InvalidWeekRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// 跨度（周數 - 1）
    pub fn span(&self) -> u16 {
        self.end.saturating_sub(self.start)
    }

    /// 與另一範圍取交集，無交集時返回 `None`
    pub fn clamp_to(&self, other: &WeekRange) -> Option<WeekRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(WeekRange { start, end })
    }

    /// 展開為周次集合
    pub fn to_week_set(&self) -> Result<WeekSet> {
        WeekSet::range(self.start, self.end)
    }
}

/// 課時計劃（由周學時推導）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LoadPlan {
    /// 單節課：整個學期只在最後一周上一次
    SinglePeriod,

    /// 每周相同節數
    Uniform {
        #[serde(rename = "periodsPerWeek")]
        periods_per_week: u32,
    },

    /// 單雙周節數不同
    Alternate {
        #[serde(rename = "oddWeek")]
        odd_week: u32,
        #[serde(rename = "evenWeek")]
        even_week: u32,
    },
}

impl LoadPlan {
    /// 指定周次的節數
    pub fn sessions_for_week(&self, week: u16) -> u32 {
        match *self {
            LoadPlan::SinglePeriod => 1,
            LoadPlan::Uniform { periods_per_week } => periods_per_week,
            LoadPlan::Alternate { odd_week, even_week } => {
                if week % 2 == 1 {
                    odd_week
                } else {
                    even_week
                }
            }
        }
    }

    /// 需要的不同時間槽數量上限
    pub fn max_sessions_per_week(&self) -> u32 {
        match *self {
            LoadPlan::SinglePeriod => 1,
            LoadPlan::Uniform { periods_per_week } => periods_per_week,
            LoadPlan::Alternate { odd_week, even_week } => odd_week.max(even_week),
        }
    }

    pub fn is_alternate(&self) -> bool {
        matches!(self, LoadPlan::Alternate { .. })
    }
}

/// 課程
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// 課程ID
    pub id: String,

    /// 課程名稱
    pub name: String,

    /// 周學時（可為小數，例如 3 學時 = 每周 1.5 節）
    pub hours: Decimal,

    /// 上課周次
    pub weeks: WeekRange,

    /// 授課教師
    pub teacher_id: Option<String>,

    /// 上課班級（一門課可同時服務多個班級）
    pub class_ids: Vec<String>,

    /// 學期標記
    pub semester: Option<String>,

    /// 是否允許相鄰兩天重複上課
    pub adjacent_day_exempt: bool,
}

impl Course {
    /// 創建新的課程
    pub fn new(id: String, name: String, hours: Decimal, weeks: WeekRange) -> Self {
        Self {
            id,
            name,
            hours,
            weeks,
            teacher_id: None,
            class_ids: Vec::new(),
            semester: None,
            adjacent_day_exempt: false,
        }
    }

    /// 建構器模式：設置教師
    pub fn with_teacher(mut self, teacher_id: String) -> Self {
        self.teacher_id = Some(teacher_id);
        self
    }

    /// 建構器模式：添加班級
    pub fn with_class(mut self, class_id: String) -> Self {
        self.class_ids.push(class_id);
        self
    }

    /// 建構器模式：設置學期
    pub fn with_semester(mut self, semester: String) -> Self {
        self.semester = Some(semester);
        self
    }

    /// 建構器模式：允許相鄰兩天上課
    pub fn with_adjacent_day_exempt(mut self, exempt: bool) -> Self {
        self.adjacent_day_exempt = exempt;
        self
    }

    /// 檢查課程資料完整性
    pub fn validate(&self) -> Result<()> {
        match &self.teacher_id {
            Some(t) if !t.trim().is_empty() => {}
            _ => return Err(TimetableError::MissingTeacher(self.id.clone())),
        }

        if self.class_ids.is_empty() || self.class_ids.iter().any(|c| c.trim().is_empty()) {
            return Err(TimetableError::MissingClass(self.id.clone()));
        }

        if self.hours <= Decimal::ZERO {
            return Err(TimetableError::InvalidHours(format!(
                "{}: {}",
                self.id, self.hours
            )));
        }

        self.weeks.validate()
    }

    /// 班級數量
    pub fn class_count(&self) -> usize {
        self.class_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course() -> Course {
        Course::new(
            "MATH-101".to_string(),
            "高等數學".to_string(),
            Decimal::from(4),
            WeekRange::new(1, 16),
        )
        .with_teacher("T-001".to_string())
        .with_class("C-01".to_string())
    }

    #[test]
    fn test_create_course() {
        let course = sample_course();
        assert_eq!(course.class_count(), 1);
        assert!(!course.adjacent_day_exempt);
        assert!(course.validate().is_ok());
    }

    #[test]
    fn test_course_validation() {
        let mut course = sample_course();
        course.teacher_id = None;
        assert!(matches!(course.validate(), Err(TimetableError::MissingTeacher(_))));

        let mut course = sample_course();
        course.class_ids.clear();
        assert!(matches!(course.validate(), Err(TimetableError::MissingClass(_))));

        let mut course = sample_course();
        course.weeks = WeekRange::new(10, 3);
        assert!(matches!(
            course.validate(),
            Err(TimetableError::InvalidWeekRange { start: 10, end: 3 })
        ));

        let mut course = sample_course();
        course.hours = Decimal::ZERO;
        assert!(matches!(course.validate(), Err(TimetableError::InvalidHours(_))));
    }

    #[test]
    fn test_week_range_clamp() {
        let course_weeks = WeekRange::new(3, 18);
        let term = WeekRange::new(1, 16);
        assert_eq!(course_weeks.clamp_to(&term), Some(WeekRange::new(3, 16)));
        assert_eq!(WeekRange::new(17, 20).clamp_to(&term), None);
        assert_eq!(WeekRange::new(1, 16).span(), 15);
    }

    #[test]
    fn test_load_plan_sessions() {
        let plan = LoadPlan::Alternate {
            odd_week: 2,
            even_week: 1,
        };
        assert_eq!(plan.sessions_for_week(1), 2);
        assert_eq!(plan.sessions_for_week(2), 1);
        assert_eq!(plan.max_sessions_per_week(), 2);
        assert!(plan.is_alternate());
        assert!(!LoadPlan::SinglePeriod.is_alternate());
    }
}
