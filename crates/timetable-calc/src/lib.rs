//! # Timetable Calculation Engine
//!
//! 核心排課計算引擎：節次目錄、課時計劃、衝突檢測、貪心分配、單雙周合併

pub mod allocator;
pub mod catalog;
pub mod committed;
pub mod conflict;
pub mod load_plan;
pub mod merger;
pub mod rooms;
pub mod scheduler;
pub mod validation;

// Re-export 主要類型
pub use allocator::{AllocationStats, GreedyAllocator};
pub use catalog::{PeriodCatalog, Slot};
pub use committed::CommittedSchedule;
pub use conflict::ConflictDetector;
pub use load_plan::LoadPlanner;
pub use merger::{AlternateWeekMerger, MergeReport};
pub use rooms::RoomAssigner;
pub use scheduler::Scheduler;
pub use validation::CourseValidator;

use serde::{Deserialize, Serialize};
use timetable_core::{ClassGroup, Classroom, Course, ScheduleEntry, Teacher};
use uuid::Uuid;

/// 排課輸入
///
/// 教師、班級清單為空時不檢查引用；非空時課程引用的ID必須存在。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub courses: Vec<Course>,
    pub teachers: Vec<Teacher>,
    pub classes: Vec<ClassGroup>,
    pub classrooms: Vec<Classroom>,
}

impl ScheduleInput {
    /// 創建只含課程的輸入
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            ..Self::default()
        }
    }

    /// 建構器模式：設置教師
    pub fn with_teachers(mut self, teachers: Vec<Teacher>) -> Self {
        self.teachers = teachers;
        self
    }

    /// 建構器模式：設置班級
    pub fn with_classes(mut self, classes: Vec<ClassGroup>) -> Self {
        self.classes = classes;
        self
    }

    /// 建構器模式：設置教室
    pub fn with_classrooms(mut self, classrooms: Vec<Classroom>) -> Self {
        self.classrooms = classrooms;
        self
    }
}

/// 排課計算結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResult {
    /// 運行ID
    pub run_id: Uuid,

    /// 排課記錄
    pub entries: Vec<ScheduleEntry>,

    /// 排課失敗（部分或全部）的課程
    pub failures: Vec<PlacementFailure>,

    /// 警告信息
    pub warnings: Vec<ScheduleWarning>,

    /// 單雙周合併的記錄數
    pub merged_pairs: usize,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl AllocationResult {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            entries: Vec::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
            merged_pairs: 0,
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ScheduleWarning) {
        self.warnings.push(warning);
    }

    /// 添加失敗記錄
    pub fn add_failure(&mut self, failure: PlacementFailure) {
        self.failures.push(failure);
    }

    /// 是否所有課程都完整排入
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// 指定課程的排課記錄
    pub fn entries_for_course<'a>(
        &'a self,
        course_id: &'a str,
    ) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
        self.entries.iter().filter(move |e| e.course_id == course_id)
    }
}

/// 失敗類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// 輸入資料無效，整門課被拒絕
    InvalidInput,
    /// 找不到足夠的無衝突時間槽
    Infeasible,
}

/// 排課失敗記錄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementFailure {
    pub course_id: String,
    /// 針對單一班級的失敗；整門課被拒絕時為 `None`
    pub class_id: Option<String>,
    pub kind: FailureKind,
    /// 需要的時間槽數
    pub requested: u32,
    /// 實際排入的時間槽數
    pub placed: u32,
    pub reason: String,
}

impl PlacementFailure {
    pub fn invalid(course_id: String, reason: String) -> Self {
        Self {
            course_id,
            class_id: None,
            kind: FailureKind::InvalidInput,
            requested: 0,
            placed: 0,
            reason,
        }
    }

    pub fn infeasible(
        course_id: String,
        class_id: String,
        requested: u32,
        placed: u32,
        reason: String,
    ) -> Self {
        Self {
            course_id,
            class_id: Some(class_id),
            kind: FailureKind::Infeasible,
            requested,
            placed,
            reason,
        }
    }

    /// 是否部分排入
    pub fn is_partial(&self) -> bool {
        self.placed > 0 && self.placed < self.requested
    }
}

/// 排課警告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleWarning {
    /// 相關的課程或班級ID（全域警告為空字串）
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl ScheduleWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }

    pub fn error(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
