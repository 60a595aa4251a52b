//! 均衡度評分
//!
//! 分數越低越均衡：
//! `總分 = 日權重 × Var(每日節數) + 教師權重 × 平均(各教師每日節數的 Var) + 時段權重 × 平均(各節次每日節數的 Var)`

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use timetable_core::{day_index, OptimizeConfig, ScheduleEntry, TEACHING_DAYS};

const DAYS: usize = TEACHING_DAYS.len();

/// 均衡度分數
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceScore {
    /// 加權總分
    pub total: f64,

    /// 每日節數的變異數
    pub day_balance: f64,

    /// 教師分布變異數的平均
    pub teacher_balance: f64,

    /// 節次分布變異數的平均
    pub period_balance: f64,
}

impl BalanceScore {
    /// 計算課表的均衡度
    pub fn evaluate(entries: &[ScheduleEntry], config: &OptimizeConfig) -> Self {
        let mut per_day = [0.0; DAYS];
        let mut per_teacher: HashMap<&str, [f64; DAYS]> = HashMap::new();
        let mut per_period: HashMap<&str, [f64; DAYS]> = HashMap::new();

        for entry in entries {
            let idx = day_index(entry.day);
            if idx >= DAYS {
                continue;
            }
            per_day[idx] += 1.0;
            per_teacher.entry(entry.teacher_id.as_str()).or_default()[idx] += 1.0;
            per_period.entry(entry.period_id.as_str()).or_default()[idx] += 1.0;
        }

        let day_balance = variance(&per_day);
        let teacher_balance = mean_variance(per_teacher.values());
        let period_balance = mean_variance(per_period.values());

        Self {
            total: config.weight_day_balance * day_balance
                + config.weight_teacher_balance * teacher_balance
                + config.weight_period_balance * period_balance,
            day_balance,
            teacher_balance,
            period_balance,
        }
    }
}

/// 母體變異數（空序列為 0）
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn mean_variance<'a, I>(groups: I) -> f64
where
    I: ExactSizeIterator<Item = &'a [f64; DAYS]>,
{
    let n = groups.len();
    if n == 0 {
        return 0.0;
    }
    groups.map(|g| variance(g)).sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use rstest::rstest;
    use timetable_core::{EntryId, WeekSet};

    fn entry(id: u32, teacher: &str, day: Weekday, period: &str) -> ScheduleEntry {
        ScheduleEntry::new(
            EntryId(id),
            format!("COURSE-{}", id),
            format!("C-{}", id),
            teacher.to_string(),
            period.to_string(),
            day,
            WeekSet::range(1, 16).unwrap(),
        )
    }

    #[rstest]
    #[case(&[], 0.0)]
    #[case(&[2.0, 2.0, 2.0], 0.0)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 1.25)]
    #[case(&[5.0, 0.0, 0.0, 0.0, 0.0], 4.0)]
    fn test_variance(#[case] values: &[f64], #[case] expected: f64) {
        assert!((variance(values) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_schedule_scores_zero() {
        let score = BalanceScore::evaluate(&[], &OptimizeConfig::default());
        assert_eq!(score, BalanceScore::default());
    }

    #[test]
    fn test_even_spread_beats_stacked_day() {
        let config = OptimizeConfig::default();
        let spread: Vec<_> = TEACHING_DAYS
            .iter()
            .enumerate()
            .map(|(i, &day)| entry(i as u32, "T1", day, "P1"))
            .collect();
        let stacked: Vec<_> = (0..5).map(|i| entry(i, "T1", Weekday::Mon, "P1")).collect();

        let spread_score = BalanceScore::evaluate(&spread, &config);
        let stacked_score = BalanceScore::evaluate(&stacked, &config);

        assert_eq!(spread_score.total, 0.0);
        assert!(stacked_score.total > spread_score.total);
        // [5, 0, 0, 0, 0] 的變異數
        assert!((stacked_score.day_balance - 4.0).abs() < 1e-12);
        assert!((stacked_score.teacher_balance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_apply() {
        let entries = vec![entry(0, "T1", Weekday::Mon, "P1")];
        let score = BalanceScore::evaluate(&entries, &OptimizeConfig::default().with_weights(1.0, 0.0, 0.0));
        assert!((score.total - score.day_balance).abs() < 1e-12);
    }
}
