//! 輸入驗證
//!
//! 在分配前檢查課程資料，無效課程整門拒絕，不影響其他課程：
//! - 缺少教師或班級
//! - 周學時不為正數
//! - 周次範圍無效，或與運行周次沒有交集
//! - 引用不存在的教師/班級（清單非空時）
//! - 課程ID重複

use std::collections::HashSet;

use timetable_core::{ClassGroup, Course, Teacher, TimetableError, WeekRange};

/// 課程驗證器
pub struct CourseValidator<'a> {
    run_weeks: WeekRange,
    teachers: HashSet<&'a str>,
    classes: HashSet<&'a str>,
    seen: HashSet<String>,
}

impl<'a> CourseValidator<'a> {
    /// 創建驗證器
    pub fn new(run_weeks: WeekRange, teachers: &'a [Teacher], classes: &'a [ClassGroup]) -> Self {
        Self {
            run_weeks,
            teachers: teachers.iter().map(|t| t.id.as_str()).collect(),
            classes: classes.iter().map(|c| c.id.as_str()).collect(),
            seen: HashSet::new(),
        }
    }

    /// 檢查課程，返回裁切到運行周次後的上課範圍
    ///
    /// 同一ID第二次出現時返回 `DuplicateId`。
    pub fn check(&mut self, course: &Course) -> timetable_core::Result<WeekRange> {
        if !self.seen.insert(course.id.clone()) {
            return Err(TimetableError::DuplicateId(course.id.clone()));
        }

        course.validate()?;

        if let Some(teacher_id) = &course.teacher_id {
            if !self.teachers.is_empty() && !self.teachers.contains(teacher_id.as_str()) {
                return Err(TimetableError::UnknownReference(format!(
                    "課程 {} 的教師 {}",
                    course.id, teacher_id
                )));
            }
        }

        if !self.classes.is_empty() {
            if let Some(missing) = course
                .class_ids
                .iter()
                .find(|c| !self.classes.contains(c.as_str()))
            {
                return Err(TimetableError::UnknownReference(format!(
                    "課程 {} 的班級 {}",
                    course.id, missing
                )));
            }
        }

        course
            .weeks
            .clamp_to(&self.run_weeks)
            .ok_or(TimetableError::InvalidWeekRange {
                start: course.weeks.start,
                end: course.weeks.end,
            })
    }
}
