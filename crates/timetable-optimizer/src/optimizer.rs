//! 均衡優化器
//!
//! 每輪取最忙與最空的一天，依序嘗試把最忙那天的記錄移到最空那天的同一節次。
//! 只接受不產生衝突、不違反分布規則、且嚴格降低分數的移動。

use chrono::Weekday;
use timetable_calc::CommittedSchedule;
use timetable_core::{day_index, EntryId, OptimizeConfig, ScheduleEntry, TEACHING_DAYS};

use crate::{BalanceScore, OptimizationReport, OptimizationResult};

/// 分數比較容差
const SCORE_EPSILON: f64 = 1e-9;

/// 均衡優化器
pub struct BalanceOptimizer;

impl BalanceOptimizer {
    /// 優化課表
    ///
    /// `max_iterations` 為 0 時原樣返回。輸入中已有的衝突不會被修復，
    /// 但優化過程不會產生新的衝突。
    pub fn optimize(
        entries: Vec<ScheduleEntry>,
        config: &OptimizeConfig,
    ) -> timetable_core::Result<OptimizationResult> {
        config.validate()?;

        tracing::info!(
            "開始均衡優化：記錄 {} 筆，最大迭代 {} 次",
            entries.len(),
            config.max_iterations
        );
        let start_time = std::time::Instant::now();

        let mut schedule = CommittedSchedule::from_entries(entries)?;
        let before = BalanceScore::evaluate(schedule.entries(), config);
        let mut current = before;
        let mut iterations = 0;
        let mut improvements = 0;

        while iterations < config.max_iterations {
            if current.total <= config.target_balance_score {
                tracing::debug!("已達目標均衡度 {:.4}", current.total);
                break;
            }

            let Some((busiest, lightest)) = Self::extreme_days(schedule.entries()) else {
                break;
            };

            iterations += 1;
            match Self::try_rebalance(&mut schedule, busiest, lightest, &current, config) {
                Some(score) => {
                    tracing::debug!(
                        "第 {} 輪移動：{:?} → {:?}，分數 {:.4} → {:.4}",
                        iterations,
                        busiest,
                        lightest,
                        current.total,
                        score.total
                    );
                    current = score;
                    improvements += 1;
                }
                None => {
                    tracing::debug!("第 {} 輪找不到可改善的移動", iterations);
                    break;
                }
            }
        }

        tracing::info!(
            "均衡優化完成：{} 輪，移動 {} 次，分數 {:.4} → {:.4}，耗時 {:?}",
            iterations,
            improvements,
            before.total,
            current.total,
            start_time.elapsed()
        );

        Ok(OptimizationResult {
            entries: schedule.into_entries(),
            report: OptimizationReport {
                iterations,
                improvements,
                before_score: before,
                after_score: current,
            },
        })
    }

    /// 最忙與最空的一天（節數相同時不需移動）
    fn extreme_days(entries: &[ScheduleEntry]) -> Option<(Weekday, Weekday)> {
        let mut counts = [0usize; TEACHING_DAYS.len()];
        for entry in entries {
            if let Some(count) = counts.get_mut(day_index(entry.day)) {
                *count += 1;
            }
        }

        let busiest = (0..counts.len()).max_by_key(|&i| (counts[i], std::cmp::Reverse(i)))?;
        let lightest = (0..counts.len()).min_by_key(|&i| (counts[i], i))?;
        (counts[busiest] > counts[lightest]).then_some((TEACHING_DAYS[busiest], TEACHING_DAYS[lightest]))
    }

    /// 嘗試移動一筆記錄（連同同日的單雙周配對），成功時返回新分數
    fn try_rebalance(
        schedule: &mut CommittedSchedule,
        from: Weekday,
        to: Weekday,
        current: &BalanceScore,
        config: &OptimizeConfig,
    ) -> Option<BalanceScore> {
        let candidates: Vec<EntryId> = schedule
            .entries()
            .iter()
            .filter(|e| e.day == from)
            .map(|e| e.id)
            .collect();

        for id in candidates {
            let group = Self::move_group(schedule, id);
            if !Self::can_move(schedule, &group, to, config) {
                continue;
            }

            for entry in &group {
                schedule.relocate(entry.id, to, &entry.period_id);
            }

            let score = BalanceScore::evaluate(schedule.entries(), config);
            if score.total < current.total - SCORE_EPSILON {
                return Some(score);
            }

            for entry in &group {
                schedule.relocate(entry.id, entry.day, &entry.period_id);
            }
        }

        None
    }

    /// 要一起移動的記錄：本身，以及同一天的單雙周配對
    fn move_group(schedule: &CommittedSchedule, id: EntryId) -> Vec<ScheduleEntry> {
        let Some(entry) = schedule.get(id) else {
            return Vec::new();
        };

        let mut group = vec![entry.clone()];
        let partner = schedule.entries().iter().find(|other| {
            other.id != entry.id
                && other.same_offering(entry)
                && other.day == entry.day
                && other.weeks.is_disjoint(&entry.weeks)
                && ((entry.weeks.is_all_odd() && other.weeks.is_all_even())
                    || (entry.weeks.is_all_even() && other.weeks.is_all_odd()))
        });
        if let Some(partner) = partner {
            group.push(partner.clone());
        }
        group
    }

    /// 整組移到目標日後是否仍合法
    fn can_move(
        schedule: &CommittedSchedule,
        group: &[ScheduleEntry],
        to: Weekday,
        config: &OptimizeConfig,
    ) -> bool {
        if group.is_empty() {
            return false;
        }
        let exclude: Vec<EntryId> = group.iter().map(|e| e.id).collect();

        group.iter().all(|entry| {
            let moved = entry.moved_to(to, &entry.period_id);
            if schedule.conflicts_excluding(&moved, &exclude) {
                return false;
            }

            let daily = schedule.class_daily_count(&entry.class_id, to, &entry.weeks, &exclude);
            if daily >= config.max_daily_sessions as usize {
                return false;
            }

            config.is_adjacent_exempt(&entry.course_id)
                || !schedule.has_nearby_session(
                    &entry.course_id,
                    &entry.class_id,
                    to,
                    &entry.weeks,
                    &exclude,
                )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetable_calc::ConflictDetector;
    use timetable_core::WeekSet;

    fn entry(id: u32, course: &str, class: &str, teacher: &str, day: Weekday, period: &str) -> ScheduleEntry {
        ScheduleEntry::new(
            EntryId(id),
            course.to_string(),
            class.to_string(),
            teacher.to_string(),
            period.to_string(),
            day,
            WeekSet::range(1, 16).unwrap(),
        )
    }

    fn stacked_monday() -> Vec<ScheduleEntry> {
        (0..4)
            .map(|i| {
                entry(
                    i,
                    &format!("COURSE-{}", i),
                    &format!("C-{}", i),
                    &format!("T-{}", i),
                    Weekday::Mon,
                    &format!("P{}", i + 1),
                )
            })
            .collect()
    }

    #[test]
    fn test_zero_iterations_unchanged() {
        let entries = stacked_monday();
        let config = OptimizeConfig::default().with_max_iterations(0);
        let result = BalanceOptimizer::optimize(entries.clone(), &config).unwrap();

        assert_eq!(result.entries, entries);
        assert_eq!(result.report.iterations, 0);
        assert_eq!(result.report.before_score, result.report.after_score);
        assert_eq!(result.report.improvements, 0);
    }

    #[test]
    fn test_spreads_stacked_day() {
        let entries = stacked_monday();
        let config = OptimizeConfig::default().with_target_balance_score(0.0);
        let result = BalanceOptimizer::optimize(entries, &config).unwrap();

        assert!(result.report.improvements > 0);
        assert!(result.report.after_score.total < result.report.before_score.total);
        assert!(result.report.iterations >= result.report.improvements);
        assert!(ConflictDetector::find_all(&result.entries).is_empty());

        let days: std::collections::BTreeSet<_> = result.entries.iter().map(|e| day_index(e.day)).collect();
        assert_eq!(days.len(), 4);
    }

    #[test]
    fn test_ids_and_weeks_preserved() {
        let entries = stacked_monday();
        let result = BalanceOptimizer::optimize(entries.clone(), &OptimizeConfig::default()).unwrap();

        for (before, after) in entries.iter().zip(&result.entries) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.weeks, after.weeks);
            assert_eq!(before.period_id, after.period_id);
        }
    }

    #[test]
    fn test_respects_adjacent_day_rule() {
        // 同課程同班級：週一兩節、週三一節
        let entries = vec![
            entry(0, "MATH", "C1", "T1", Weekday::Mon, "P1"),
            entry(1, "MATH", "C1", "T1", Weekday::Mon, "P2"),
            entry(2, "MATH", "C1", "T1", Weekday::Wed, "P1"),
        ];
        let config = OptimizeConfig::default().with_target_balance_score(0.0);
        let result = BalanceOptimizer::optimize(entries, &config).unwrap();

        let mut days: Vec<_> = result.entries.iter().map(|e| e.day).collect();
        days.sort_by_key(|d| day_index(*d));
        for pair in days.windows(2) {
            assert!(day_index(pair[1]) - day_index(pair[0]) >= 2 || pair[0] == pair[1]);
        }
    }

    #[test]
    fn test_moves_alternate_pair_together() {
        let term = WeekSet::range(1, 16).unwrap();
        let mut odd = entry(0, "CHEM", "C1", "T1", Weekday::Mon, "P1");
        odd.weeks = term.odd_weeks();
        let mut even = entry(1, "CHEM", "C1", "T1", Weekday::Mon, "P1");
        even.weeks = term.even_weeks();
        let entries = vec![odd, even, entry(2, "BIO", "C2", "T2", Weekday::Mon, "P2")];

        let config = OptimizeConfig::default().with_target_balance_score(0.0);
        let result = BalanceOptimizer::optimize(entries, &config).unwrap();

        let chem: Vec<_> = result.entries.iter().filter(|e| e.course_id == "CHEM").collect();
        assert_eq!(chem[0].day, chem[1].day);
        assert!(ConflictDetector::find_all(&result.entries).is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let config = OptimizeConfig::default().with_max_daily_sessions(0);
        assert!(BalanceOptimizer::optimize(Vec::new(), &config).is_err());
    }

    /// 週一三節、其餘每天一節，全部屬於班級 C1
    fn crowded_class_week() -> Vec<ScheduleEntry> {
        let mut entries: Vec<_> = (0..3)
            .map(|i| {
                entry(
                    i,
                    &format!("MON-{}", i),
                    "C1",
                    &format!("T-{}", i),
                    Weekday::Mon,
                    &format!("P{}", i + 1),
                )
            })
            .collect();
        for (i, day) in [Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
            .into_iter()
            .enumerate()
        {
            let id = 3 + i as u32;
            entries.push(entry(id, &format!("REST-{}", id), "C1", &format!("T-{}", id), day, "P4"));
        }
        entries
    }

    #[test]
    fn test_daily_cap_blocks_move() {
        let entries = crowded_class_week();

        let capped = OptimizeConfig::default()
            .with_target_balance_score(0.0)
            .with_max_daily_sessions(1);
        let result = BalanceOptimizer::optimize(entries.clone(), &capped).unwrap();
        assert_eq!(result.report.improvements, 0);
        assert_eq!(result.report.iterations, 1);
        assert_eq!(result.entries, entries);

        let relaxed = OptimizeConfig::default()
            .with_target_balance_score(0.0)
            .with_max_daily_sessions(2);
        let result = BalanceOptimizer::optimize(entries, &relaxed).unwrap();
        assert!(result.report.improvements > 0);
        for day in TEACHING_DAYS.iter().skip(1) {
            let count = result.entries.iter().filter(|e| e.day == *day).count();
            assert!(count <= 2, "{:?} 有 {} 節", day, count);
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let entries = vec![
            entry(0, "MATH", "C1", "T1", Weekday::Mon, "P1"),
            entry(0, "PHYS", "C2", "T2", Weekday::Mon, "P2"),
        ];
        assert!(BalanceOptimizer::optimize(entries, &OptimizeConfig::default()).is_err());
    }
}
