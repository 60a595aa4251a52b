//! # Timetable
//!
//! 課程排課引擎：節次目錄、課時計劃、衝突檢測、貪心分配、單雙周合併與均衡優化
//!
//! ```no_run
//! use timetable::{RunConfig, ScheduleInput, Scheduler, PeriodTemplate};
//!
//! # fn main() -> timetable::Result<()> {
//! let template = PeriodTemplate::from_json(r#"{"name":"標準","periods":{"morning":[],"afternoon":[],"evening":[]}}"#)?;
//! let config = RunConfig::new(1, 16).with_allowed_periods(["P1", "P2"]);
//! let result = Scheduler::new(template, config).run(&ScheduleInput::default())?;
//! println!("排入 {} 筆記錄", result.entries.len());
//! # Ok(())
//! # }
//! ```

pub use timetable_calc::{
    AllocationResult, AllocationStats, AlternateWeekMerger, CommittedSchedule, ConflictDetector,
    CourseValidator, FailureKind, GreedyAllocator, LoadPlanner, MergeReport, PeriodCatalog,
    PlacementFailure, RoomAssigner, ScheduleInput, ScheduleWarning, Scheduler, Slot,
    WarningSeverity,
};
pub use timetable_core::{
    ClassGroup, Classroom, Course, EntryId, LoadPlan, OptimizeConfig, Period, PeriodGroup,
    PeriodTemplate, Result, RunConfig, ScheduleEntry, SlotRef, Teacher, TieBreak, TimetableError,
    WeekRange, WeekSet,
};
pub use timetable_optimizer::{
    BalanceOptimizer, BalanceScore, OptimizationReport, OptimizationResult,
};
