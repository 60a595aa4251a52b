//! # Timetable Core
//!
//! 排課核心資料模型與類型定義

pub mod config;
pub mod course;
pub mod entry;
pub mod period;
pub mod resource;
pub mod week;

// Re-export 主要類型
pub use config::{OptimizeConfig, RunConfig, TieBreak};
pub use course::{Course, LoadPlan, WeekRange};
pub use entry::{EntryId, ScheduleEntry};
pub use period::{day_index, days_adjacent, Period, PeriodGroup, PeriodTemplate, TEACHING_DAYS};
pub use resource::{ClassGroup, Classroom, SlotRef, Teacher};
pub use week::{WeekSet, MAX_WEEK};

/// 排課錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    #[error("無效的周次範圍: {start}-{end}")]
    InvalidWeekRange { start: u16, end: u16 },

    #[error("周次超出範圍 (1-{max}): {week}", max = MAX_WEEK)]
    WeekOutOfRange { week: u16 },

    #[error("課程 {0} 未指定教師")]
    MissingTeacher(String),

    #[error("課程 {0} 未指定班級")]
    MissingClass(String),

    #[error("重複的ID: {0}")]
    DuplicateId(String),

    #[error("找不到引用: {0}")]
    UnknownReference(String),

    #[error("無效的周學時: {0}")]
    InvalidHours(String),

    #[error("無效的排課配置: {0}")]
    InvalidConfig(String),

    #[error("學時模板解析錯誤: {0}")]
    TemplateParse(#[from] serde_json::Error),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
