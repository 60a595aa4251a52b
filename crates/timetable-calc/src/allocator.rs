//! 貪心分配器
//!
//! 按優先順序逐門課、逐班級放置，每次放置都先經衝突檢測與分布規則檢查，
//! 成功即提交，之後不再回溯。

use std::collections::HashMap;

use chrono::Weekday;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use timetable_core::{
    ClassGroup, Course, EntryId, LoadPlan, RunConfig, ScheduleEntry, Teacher, TieBreak, WeekRange,
    WeekSet, TEACHING_DAYS,
};

use crate::{
    AllocationResult, CommittedSchedule, CourseValidator, LoadPlanner, PeriodCatalog,
    PlacementFailure, RoomAssigner, ScheduleInput, ScheduleWarning, Slot,
};

/// 分配統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationStats {
    /// 提交的記錄數
    pub placed_entries: usize,
    /// 使用單雙周計劃的課程數
    pub alternate_courses: usize,
    /// 因學期不符略過的課程數
    pub skipped_courses: usize,
}

/// 單一 (課程, 班級) 的放置上下文
struct Offering<'c> {
    course: &'c Course,
    class_id: &'c str,
    teacher_id: &'c str,
    student_count: u32,
    slots: Vec<Slot>,
    adjacent_exempt: bool,
    rooms: &'c RoomAssigner<'c>,
}

/// 貪心分配器
pub struct GreedyAllocator<'a> {
    catalog: &'a PeriodCatalog,
    config: &'a RunConfig,
}

impl<'a> GreedyAllocator<'a> {
    pub fn new(catalog: &'a PeriodCatalog, config: &'a RunConfig) -> Self {
        Self { catalog, config }
    }

    /// 課程處理順序：學時多、班級多、周次跨度大的優先，其餘保持輸入順序
    pub fn order_courses(courses: &[Course]) -> Vec<&Course> {
        let mut ordered: Vec<&Course> = courses.iter().collect();
        ordered.sort_by(|a, b| {
            b.hours
                .cmp(&a.hours)
                .then_with(|| b.class_count().cmp(&a.class_count()))
                .then_with(|| b.weeks.span().cmp(&a.weeks.span()))
        });
        ordered
    }

    /// 分配所有課程
    ///
    /// 記錄提交到 `schedule`，失敗與警告寫入 `result`。
    pub fn allocate(
        &self,
        input: &ScheduleInput,
        schedule: &mut CommittedSchedule,
        result: &mut AllocationResult,
    ) -> timetable_core::Result<AllocationStats> {
        tracing::info!(
            "開始分配：課程 {} 門，可用時間槽 {} 個",
            input.courses.len(),
            self.catalog.len()
        );

        let teachers: HashMap<&str, &Teacher> =
            input.teachers.iter().map(|t| (t.id.as_str(), t)).collect();
        let classes: HashMap<&str, &ClassGroup> =
            input.classes.iter().map(|c| (c.id.as_str(), c)).collect();
        let rooms = RoomAssigner::new(&input.classrooms);
        let mut validator =
            CourseValidator::new(self.config.week_range(), &input.teachers, &input.classes);
        let mut rng = match self.config.tie_break {
            TieBreak::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
            TieBreak::InOrder => None,
        };

        let mut stats = AllocationStats::default();
        let entries_before = schedule.len();

        for course in Self::order_courses(&input.courses) {
            if let (Some(wanted), Some(actual)) = (&self.config.semester, &course.semester) {
                if wanted != actual {
                    result.add_warning(ScheduleWarning::info(
                        course.id.clone(),
                        format!("課程學期 {} 不屬於本次排課學期 {}，已略過", actual, wanted),
                    ));
                    stats.skipped_courses += 1;
                    continue;
                }
            }

            let weeks = match validator.check(course) {
                Ok(weeks) => weeks,
                Err(e) => {
                    tracing::warn!("課程 {} 驗證失敗: {}", course.id, e);
                    result.add_failure(PlacementFailure::invalid(course.id.clone(), e.to_string()));
                    continue;
                }
            };

            let Some(teacher_id) = course.teacher_id.as_deref() else {
                continue;
            };

            let plan = LoadPlanner::plan(
                course.hours,
                self.config.credit_unit,
                self.config.allow_alternate_weeks,
            );
            if plan.is_alternate() {
                stats.alternate_courses += 1;
            }
            tracing::debug!(
                "課程 {}：學時 {}，周次 {}-{}，計劃 {:?}",
                course.id,
                course.hours,
                weeks.start,
                weeks.end,
                plan
            );

            for class_id in &course.class_ids {
                let class = classes.get(class_id.as_str()).copied();
                let mut slots = self
                    .catalog
                    .available_for(teachers.get(teacher_id).copied(), class);
                if let Some(rng) = rng.as_mut() {
                    Self::shuffle_days(&mut slots, rng);
                }

                let offering = Offering {
                    course,
                    class_id: class_id.as_str(),
                    teacher_id,
                    student_count: class.map_or(0, |c| c.student_count),
                    slots,
                    adjacent_exempt: course.adjacent_day_exempt
                        || self.config.allow_adjacent_day_repeat,
                    rooms: &rooms,
                };

                let (requested, placed) =
                    self.place_offering(&offering, plan, &weeks, schedule, result)?;

                if placed < requested {
                    let reason = if self.catalog.is_empty() {
                        "沒有可排課的時間槽".to_string()
                    } else if offering.slots.is_empty() {
                        "教師與班級沒有共同的可用時間".to_string()
                    } else {
                        format!("只排入 {}/{} 節，找不到無衝突的時間槽", placed, requested)
                    };
                    tracing::warn!("課程 {} 班級 {}: {}", course.id, class_id, reason);
                    result.add_failure(PlacementFailure::infeasible(
                        course.id.clone(),
                        class_id.clone(),
                        requested,
                        placed,
                        reason,
                    ));
                }
            }
        }

        stats.placed_entries = schedule.len() - entries_before;
        tracing::info!(
            "分配完成：提交 {} 筆記錄，失敗 {} 項",
            stats.placed_entries,
            result.failures.len()
        );

        Ok(stats)
    }

    /// 按課時計劃放置，返回 (需要節數, 實際節數)
    fn place_offering(
        &self,
        offering: &Offering<'_>,
        plan: LoadPlan,
        weeks: &WeekRange,
        schedule: &mut CommittedSchedule,
        result: &mut AllocationResult,
    ) -> timetable_core::Result<(u32, u32)> {
        match plan {
            LoadPlan::SinglePeriod => {
                let single = LoadPlanner::single_week(weeks)?;
                let placed = self.place_sessions(offering, single, 1, schedule, result)?;
                Ok((1, placed.len() as u32))
            }
            LoadPlan::Uniform { periods_per_week } => {
                let all = LoadPlanner::all_weeks(weeks)?;
                let placed =
                    self.place_sessions(offering, all, periods_per_week, schedule, result)?;
                Ok((periods_per_week, placed.len() as u32))
            }
            LoadPlan::Alternate {
                odd_week,
                even_week,
            } => {
                let odd_set = LoadPlanner::odd_weeks(weeks)?;
                let even_set = LoadPlanner::even_weeks(weeks)?;
                let odd_needed = if odd_set.is_empty() { 0 } else { odd_week };
                let even_needed = if even_set.is_empty() { 0 } else { even_week };

                let odd_ids =
                    self.place_sessions(offering, odd_set, odd_needed, schedule, result)?;

                // 雙周先沿用單周的時間格
                let mut even_placed = 0;
                for id in &odd_ids {
                    if even_placed >= even_needed {
                        break;
                    }
                    let Some((day, period_id)) =
                        schedule.get(*id).map(|e| (e.day, e.period_id.clone()))
                    else {
                        continue;
                    };
                    if self
                        .try_commit(offering, day, &period_id, even_set, schedule, result)?
                        .is_some()
                    {
                        even_placed += 1;
                    }
                }

                let rest = self.place_sessions(
                    offering,
                    even_set,
                    even_needed - even_placed,
                    schedule,
                    result,
                )?;
                even_placed += rest.len() as u32;

                Ok((odd_needed + even_needed, odd_ids.len() as u32 + even_placed))
            }
        }
    }

    /// 按目錄順序找出最多 `count` 個可用時間槽並提交
    fn place_sessions(
        &self,
        offering: &Offering<'_>,
        weeks: WeekSet,
        count: u32,
        schedule: &mut CommittedSchedule,
        result: &mut AllocationResult,
    ) -> timetable_core::Result<Vec<EntryId>> {
        let mut placed = Vec::new();
        if count == 0 || weeks.is_empty() {
            return Ok(placed);
        }

        for slot in &offering.slots {
            if placed.len() as u32 >= count {
                break;
            }
            let period_id = self.catalog.period_id(slot);
            if let Some(id) = self.try_commit(offering, slot.day, period_id, weeks, schedule, result)? {
                placed.push(id);
            }
        }

        Ok(placed)
    }

    /// 檢查並提交一筆記錄，不可放置時返回 `Ok(None)`
    fn try_commit(
        &self,
        offering: &Offering<'_>,
        day: Weekday,
        period_id: &str,
        weeks: WeekSet,
        schedule: &mut CommittedSchedule,
        result: &mut AllocationResult,
    ) -> timetable_core::Result<Option<EntryId>> {
        let course_id = offering.course.id.as_str();
        let candidate = ScheduleEntry::new(
            schedule.next_id(),
            course_id.to_string(),
            offering.class_id.to_string(),
            offering.teacher_id.to_string(),
            period_id.to_string(),
            day,
            weeks,
        );

        if schedule.conflicts(&candidate) {
            return Ok(None);
        }

        let daily = schedule.class_daily_count(offering.class_id, day, &weeks, &[]);
        if daily >= self.config.max_daily_sessions as usize {
            return Ok(None);
        }

        if !offering.adjacent_exempt
            && schedule.has_nearby_session(course_id, offering.class_id, day, &weeks, &[])
        {
            return Ok(None);
        }

        let candidate = if self.config.assign_classrooms && !offering.rooms.is_empty() {
            match offering
                .rooms
                .pick(schedule, &candidate, offering.student_count)
            {
                Some(room) => candidate.with_classroom(room.id.clone()),
                None => {
                    result.add_warning(ScheduleWarning::warning(
                        course_id.to_string(),
                        format!(
                            "班級 {} 於 {:?} {} 找不到合適教室",
                            offering.class_id, day, period_id
                        ),
                    ));
                    candidate
                }
            }
        } else {
            candidate
        };

        schedule.insert(candidate).map(Some)
    }

    /// 以隨機星期順序重排時間槽（同一天內保持節次順序）
    fn shuffle_days(slots: &mut [Slot], rng: &mut StdRng) {
        let mut days = TEACHING_DAYS;
        days.shuffle(rng);
        slots.sort_by_key(|slot| {
            days.iter()
                .position(|d| *d == slot.day)
                .unwrap_or(usize::MAX)
        });
    }
}
