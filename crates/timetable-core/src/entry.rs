//! 排課結果模型

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::WeekSet;

/// 排課記錄ID（單次運行內穩定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u32);

/// 排課記錄（排課的最小提交單位）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 記錄ID
    pub id: EntryId,

    /// 課程ID
    pub course_id: String,

    /// 班級ID
    pub class_id: String,

    /// 教師ID
    pub teacher_id: String,

    /// 節次ID
    pub period_id: String,

    /// 星期
    pub day: Weekday,

    /// 上課周次（權威的上課集合，不一定連續）
    pub weeks: WeekSet,

    /// 教室（可選，盡力分配）
    pub classroom_id: Option<String>,
}

impl ScheduleEntry {
    /// 創建新的排課記錄
    pub fn new(
        id: EntryId,
        course_id: String,
        class_id: String,
        teacher_id: String,
        period_id: String,
        day: Weekday,
        weeks: WeekSet,
    ) -> Self {
        Self {
            id,
            course_id,
            class_id,
            teacher_id,
            period_id,
            day,
            weeks,
            classroom_id: None,
        }
    }

    /// 建構器模式：設置教室
    pub fn with_classroom(mut self, classroom_id: String) -> Self {
        self.classroom_id = Some(classroom_id);
        self
    }

    /// 是否位於同一時間格（星期 + 節次）
    pub fn same_cell(&self, other: &ScheduleEntry) -> bool {
        self.day == other.day && self.period_id == other.period_id
    }

    /// 移到另一時間格後的副本（ID 不變）
    pub fn moved_to(&self, day: Weekday, period_id: &str) -> ScheduleEntry {
        ScheduleEntry {
            day,
            period_id: period_id.to_string(),
            ..self.clone()
        }
    }

    /// 是否屬於同一 (教師, 課程, 班級) 組
    pub fn same_offering(&self, other: &ScheduleEntry) -> bool {
        self.teacher_id == other.teacher_id
            && self.course_id == other.course_id
            && self.class_id == other.class_id
    }
}
