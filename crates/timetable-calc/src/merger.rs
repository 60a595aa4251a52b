//! 單雙周合併
//!
//! 同一 (教師, 課程, 班級) 恰好有一筆單周記錄和一筆雙周記錄、且位於不同時間格時，
//! 把雙周記錄移到單周記錄的時間格，讓學生每周在同一時間上課。
//! 移動前重新檢查衝突與班級每日節數上限。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use timetable_core::EntryId;

use crate::CommittedSchedule;

/// 合併報告
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// 符合條件的記錄對
    pub candidate_pairs: usize,
    /// 實際合併的記錄對
    pub merged_pairs: usize,
}

/// 單雙周合併器
pub struct AlternateWeekMerger;

impl AlternateWeekMerger {
    /// 執行合併（重複執行結果不變）
    ///
    /// 一次移動可能騰出另一組的目標時間格，因此重複掃描直到沒有新的合併。
    /// 移動後班級當天節數會超過 `max_daily_sessions` 的記錄對保持原位。
    pub fn merge(schedule: &mut CommittedSchedule, max_daily_sessions: u32) -> MergeReport {
        let pairs = Self::find_pairs(schedule);
        let mut report = MergeReport {
            candidate_pairs: pairs.len(),
            merged_pairs: 0,
        };

        loop {
            let mut merged = 0;
            for &(odd_id, even_id) in &pairs {
                if Self::merge_pair(schedule, odd_id, even_id, max_daily_sessions) {
                    merged += 1;
                }
            }
            if merged == 0 {
                break;
            }
            report.merged_pairs += merged;
        }

        tracing::info!(
            "單雙周合併：候選 {} 對，合併 {} 對",
            report.candidate_pairs,
            report.merged_pairs
        );
        report
    }

    /// 按 (教師, 課程, 班級) 分組，找出恰好兩筆且為單雙周組合的記錄對
    fn find_pairs(schedule: &CommittedSchedule) -> Vec<(EntryId, EntryId)> {
        let mut groups: BTreeMap<(&str, &str, &str), Vec<EntryId>> = BTreeMap::new();
        for entry in schedule.entries() {
            groups
                .entry((&entry.teacher_id, &entry.course_id, &entry.class_id))
                .or_default()
                .push(entry.id);
        }

        groups
            .into_values()
            .filter_map(|ids| match ids.as_slice() {
                [a, b] => Self::odd_even_pair(schedule, *a, *b),
                _ => None,
            })
            .collect()
    }

    /// 把雙周記錄移到單周記錄的時間格，已在同格、會衝突或超過每日上限時返回 `false`
    fn merge_pair(
        schedule: &mut CommittedSchedule,
        odd_id: EntryId,
        even_id: EntryId,
        max_daily_sessions: u32,
    ) -> bool {
        let (Some(odd), Some(even)) = (schedule.get(odd_id), schedule.get(even_id)) else {
            return false;
        };
        if odd.same_cell(even) {
            return false;
        }

        let moved = even.moved_to(odd.day, &odd.period_id);
        if schedule.conflicts(&moved) {
            tracing::debug!(
                "課程 {} 班級 {} 的雙周記錄無法移到 {:?} {}",
                moved.course_id,
                moved.class_id,
                moved.day,
                moved.period_id
            );
            return false;
        }

        let daily =
            schedule.class_daily_count(&moved.class_id, moved.day, &moved.weeks, &[even_id]);
        if daily >= max_daily_sessions as usize {
            tracing::debug!(
                "班級 {} 在 {:?} 已有 {} 節，課程 {} 的雙周記錄不合併",
                moved.class_id,
                moved.day,
                daily,
                moved.course_id
            );
            return false;
        }

        schedule.relocate(even_id, moved.day, &moved.period_id)
    }

    /// 兩筆記錄是否為周次不相交的單周/雙周組合，返回 (單周ID, 雙周ID)
    fn odd_even_pair(
        schedule: &CommittedSchedule,
        a: EntryId,
        b: EntryId,
    ) -> Option<(EntryId, EntryId)> {
        let first = schedule.get(a)?;
        let second = schedule.get(b)?;
        if !first.weeks.is_disjoint(&second.weeks) {
            return None;
        }

        if first.weeks.is_all_odd() && second.weeks.is_all_even() {
            Some((a, b))
        } else if first.weeks.is_all_even() && second.weeks.is_all_odd() {
            Some((b, a))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use timetable_core::{ScheduleEntry, WeekSet};

    fn entry(id: u32, course: &str, teacher: &str, day: Weekday, period: &str, weeks: WeekSet) -> ScheduleEntry {
        ScheduleEntry::new(
            EntryId(id),
            course.to_string(),
            "C1".to_string(),
            teacher.to_string(),
            period.to_string(),
            day,
            weeks,
        )
    }

    const MAX_DAILY: u32 = 4;

    fn term() -> WeekSet {
        WeekSet::range(1, 16).unwrap()
    }

    #[test]
    fn test_merge_moves_even_entry() {
        let mut schedule = CommittedSchedule::from_entries(vec![
            entry(0, "CHEM", "T1", Weekday::Mon, "P1", term().odd_weeks()),
            entry(1, "CHEM", "T1", Weekday::Thu, "P3", term().even_weeks()),
        ])
        .unwrap();

        let report = AlternateWeekMerger::merge(&mut schedule, MAX_DAILY);
        assert_eq!(report.merged_pairs, 1);

        let even = schedule.get(EntryId(1)).unwrap();
        assert_eq!((even.day, even.period_id.as_str()), (Weekday::Mon, "P1"));
        assert_eq!(even.weeks, term().even_weeks());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut schedule = CommittedSchedule::from_entries(vec![
            entry(0, "CHEM", "T1", Weekday::Mon, "P1", term().odd_weeks()),
            entry(1, "CHEM", "T1", Weekday::Thu, "P3", term().even_weeks()),
        ])
        .unwrap();

        AlternateWeekMerger::merge(&mut schedule, MAX_DAILY);
        let once = schedule.entries().to_vec();
        let report = AlternateWeekMerger::merge(&mut schedule, MAX_DAILY);

        assert_eq!(report.merged_pairs, 0);
        assert_eq!(schedule.entries(), once.as_slice());
    }

    #[test]
    fn test_merge_blocked_by_conflict() {
        let mut schedule = CommittedSchedule::from_entries(vec![
            entry(0, "CHEM", "T1", Weekday::Mon, "P1", term().odd_weeks()),
            entry(1, "CHEM", "T1", Weekday::Thu, "P3", term().even_weeks()),
            // 同班級在雙周佔用目標時間格
            entry(2, "BIO", "T2", Weekday::Mon, "P1", term().even_weeks()),
        ])
        .unwrap();

        let report = AlternateWeekMerger::merge(&mut schedule, MAX_DAILY);
        assert_eq!(report.candidate_pairs, 1);
        assert_eq!(report.merged_pairs, 0);
        assert_eq!(schedule.get(EntryId(1)).unwrap().day, Weekday::Thu);
    }

    #[test]
    fn test_ignores_non_pairs() {
        let mut schedule = CommittedSchedule::from_entries(vec![
            // 周次不是純單周/雙周
            entry(0, "MATH", "T1", Weekday::Mon, "P1", WeekSet::range(1, 8).unwrap()),
            entry(1, "MATH", "T1", Weekday::Wed, "P1", WeekSet::range(9, 16).unwrap()),
            // 三筆記錄
            entry(2, "CHEM", "T2", Weekday::Mon, "P2", term().odd_weeks()),
            entry(3, "CHEM", "T2", Weekday::Wed, "P2", term().odd_weeks()),
            entry(4, "CHEM", "T2", Weekday::Fri, "P2", term().even_weeks()),
        ])
        .unwrap();
        let before = schedule.entries().to_vec();

        let report = AlternateWeekMerger::merge(&mut schedule, MAX_DAILY);
        assert_eq!(report.candidate_pairs, 0);
        assert_eq!(schedule.entries(), before.as_slice());
    }

    #[test]
    fn test_merge_respects_daily_cap() {
        // 班級 C1 第 16 周週一已有一節，上限 1 節時雙周記錄不能移到週一
        let entries = vec![
            entry(0, "CHEM", "T1", Weekday::Mon, "P1", term().odd_weeks()),
            entry(1, "CHEM", "T1", Weekday::Tue, "P1", term().even_weeks()),
            entry(2, "BIO", "T2", Weekday::Mon, "P2", WeekSet::from_weeks([16]).unwrap()),
        ];

        let mut capped = CommittedSchedule::from_entries(entries.clone()).unwrap();
        let report = AlternateWeekMerger::merge(&mut capped, 1);
        assert_eq!(report.candidate_pairs, 1);
        assert_eq!(report.merged_pairs, 0);
        assert_eq!(capped.get(EntryId(1)).unwrap().day, Weekday::Tue);
        assert_eq!(
            capped.class_daily_count("C1", Weekday::Mon, &WeekSet::from_weeks([16]).unwrap(), &[]),
            1
        );

        let mut relaxed = CommittedSchedule::from_entries(entries).unwrap();
        let report = AlternateWeekMerger::merge(&mut relaxed, 2);
        assert_eq!(report.merged_pairs, 1);
        assert_eq!(relaxed.get(EntryId(1)).unwrap().day, Weekday::Mon);
    }
}
