//! 排課主流程

use std::collections::BTreeMap;

use timetable_core::{day_index, PeriodTemplate, RunConfig, ScheduleEntry, TEACHING_DAYS};

use crate::{
    AllocationResult, AlternateWeekMerger, CommittedSchedule, GreedyAllocator, PeriodCatalog,
    ScheduleInput, ScheduleWarning,
};

/// 排課器
pub struct Scheduler {
    /// 學時模板
    template: PeriodTemplate,

    /// 運行配置
    config: RunConfig,
}

impl Scheduler {
    /// 創建新的排課器
    pub fn new(template: PeriodTemplate, config: RunConfig) -> Self {
        Self { template, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// 主排課入口
    ///
    /// 配置無效時返回錯誤；單門課的問題只記錄為失敗或警告，不中斷整體排課。
    pub fn run(&self, input: &ScheduleInput) -> timetable_core::Result<AllocationResult> {
        tracing::info!(
            "開始排課：課程 {} 門，教師 {} 位，班級 {} 個，教室 {} 間",
            input.courses.len(),
            input.teachers.len(),
            input.classes.len(),
            input.classrooms.len()
        );

        let start_time = std::time::Instant::now();
        let mut result = AllocationResult::empty();

        // Step 1: 檢查配置
        tracing::debug!("Step 1: 檢查配置");
        self.config.validate()?;

        // Step 2: 建立節次目錄
        tracing::debug!("Step 2: 建立節次目錄");
        let catalog = PeriodCatalog::from_config(&self.template, &self.config);
        tracing::debug!(
            "可用節次 {} 個，時間槽 {} 個",
            catalog.periods().len(),
            catalog.len()
        );
        if catalog.is_empty() {
            result.add_warning(ScheduleWarning::warning(
                String::new(),
                "允許的節次為空，沒有可排課容量".to_string(),
            ));
        }
        if self.config.assign_classrooms && input.classrooms.is_empty() {
            result.add_warning(ScheduleWarning::warning(
                String::new(),
                "已啟用教室分配但未提供教室".to_string(),
            ));
        }

        // Step 3: 貪心分配
        tracing::debug!("Step 3: 貪心分配");
        let mut schedule = CommittedSchedule::new();
        let stats = GreedyAllocator::new(&catalog, &self.config).allocate(
            input,
            &mut schedule,
            &mut result,
        )?;

        // Step 4: 單雙周合併
        tracing::debug!("Step 4: 單雙周合併");
        let merge = AlternateWeekMerger::merge(&mut schedule, self.config.max_daily_sessions);
        result.merged_pairs = merge.merged_pairs;

        // Step 5: 分布檢查
        tracing::debug!("Step 5: 分布檢查");
        if stats.alternate_courses > 0 && self.config.start_week % 2 == 0 {
            result.add_warning(ScheduleWarning::warning(
                String::new(),
                format!(
                    "起始周 {} 為雙周，單雙周按絕對周次判斷，第一周上課的是雙周節數",
                    self.config.start_week
                ),
            ));
        }
        for warning in Self::min_daily_warnings(schedule.entries(), self.config.min_daily_sessions) {
            result.add_warning(warning);
        }

        result.entries = schedule.into_entries();

        let elapsed = start_time.elapsed();
        result.calculation_time_ms = Some(elapsed.as_millis());

        tracing::info!(
            "排課完成：記錄 {} 筆，失敗 {} 項，警告 {} 項，合併 {} 對，耗時 {:?}",
            result.entries.len(),
            result.failures.len(),
            result.warnings.len(),
            result.merged_pairs,
            elapsed
        );

        Ok(result)
    }

    /// 有課但節數低於下限的 (班級, 星期)
    fn min_daily_warnings(entries: &[ScheduleEntry], min_daily: u32) -> Vec<ScheduleWarning> {
        if min_daily == 0 {
            return Vec::new();
        }

        let mut counts: BTreeMap<&str, [u32; 5]> = BTreeMap::new();
        for entry in entries {
            let idx = day_index(entry.day);
            if let Some(slot) = counts.entry(entry.class_id.as_str()).or_default().get_mut(idx) {
                *slot += 1;
            }
        }

        counts
            .into_iter()
            .flat_map(|(class_id, per_day)| {
                TEACHING_DAYS
                    .iter()
                    .zip(per_day)
                    .filter(move |(_, count)| *count > 0 && *count < min_daily)
                    .map(move |(day, count)| {
                        ScheduleWarning::info(
                            class_id.to_string(),
                            format!("{:?} 只有 {} 節課，低於每天最少 {} 節", day, count, min_daily),
                        )
                    })
            })
            .collect()
    }
}
