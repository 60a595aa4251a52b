//! 排課與優化配置

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, TimetableError, WeekRange, MAX_WEEK};

/// 候選時間槽的決勝方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// 按目錄順序（完全確定）
    InOrder,
    /// 以種子打亂每門課的星期搜索順序（同種子結果可重現）
    Seeded(u64),
}

/// 排課運行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// 開始周次
    pub start_week: u16,

    /// 結束周次
    pub end_week: u16,

    /// 每班每天最少節數（只產生提示，不阻止排課）
    pub min_daily_sessions: u32,

    /// 每班每天最多節數
    pub max_daily_sessions: u32,

    /// 是否允許單雙周排課（處理 1.5 節這類情況）
    pub allow_alternate_weeks: bool,

    /// 是否允許同一課程相鄰兩天上課
    pub allow_adjacent_day_repeat: bool,

    /// 允許的節次ID
    pub allowed_period_ids: BTreeSet<String>,

    /// 避開的節次ID
    pub avoided_period_ids: BTreeSet<String>,

    /// 每節課折算的學時
    pub credit_unit: Decimal,

    /// 決勝方式
    pub tie_break: TieBreak,

    /// 只排指定學期的課程
    pub semester: Option<String>,

    /// 是否盡力分配教室
    pub assign_classrooms: bool,
}

impl RunConfig {
    /// 創建新的排課配置
    pub fn new(start_week: u16, end_week: u16) -> Self {
        Self {
            start_week,
            end_week,
            min_daily_sessions: 0,
            max_daily_sessions: 4,
            allow_alternate_weeks: false,
            allow_adjacent_day_repeat: false,
            allowed_period_ids: BTreeSet::new(),
            avoided_period_ids: BTreeSet::new(),
            credit_unit: Decimal::TWO,
            tie_break: TieBreak::InOrder,
            semester: None,
            assign_classrooms: false,
        }
    }

    /// 建構器模式：設置允許的節次
    pub fn with_allowed_periods<I, S>(mut self, period_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_period_ids = period_ids.into_iter().map(Into::into).collect();
        self
    }

    /// 建構器模式：設置避開的節次
    pub fn with_avoided_periods<I, S>(mut self, period_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avoided_period_ids = period_ids.into_iter().map(Into::into).collect();
        self
    }

    /// 建構器模式：設置每天節數上下限
    pub fn with_daily_sessions(mut self, min: u32, max: u32) -> Self {
        self.min_daily_sessions = min;
        self.max_daily_sessions = max;
        self
    }

    /// 建構器模式：設置是否允許單雙周
    pub fn with_alternate_weeks(mut self, allow: bool) -> Self {
        self.allow_alternate_weeks = allow;
        self
    }

    /// 建構器模式：設置是否允許相鄰兩天上課
    pub fn with_adjacent_day_repeat(mut self, allow: bool) -> Self {
        self.allow_adjacent_day_repeat = allow;
        self
    }

    /// 建構器模式：設置每節課折算學時
    pub fn with_credit_unit(mut self, unit: Decimal) -> Self {
        self.credit_unit = unit;
        self
    }

    /// 建構器模式：設置決勝方式
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// 建構器模式：設置學期
    pub fn with_semester(mut self, semester: String) -> Self {
        self.semester = Some(semester);
        self
    }

    /// 建構器模式：設置是否分配教室
    pub fn with_classroom_assignment(mut self, enabled: bool) -> Self {
        self.assign_classrooms = enabled;
        self
    }

    /// 排課周次範圍
    pub fn week_range(&self) -> WeekRange {
        WeekRange::new(self.start_week, self.end_week)
    }

    /// 節次是否可用（在允許清單內且不在避開清單內）
    pub fn is_period_usable(&self, period_id: &str) -> bool {
        self.allowed_period_ids.contains(period_id) && !self.avoided_period_ids.contains(period_id)
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        self.week_range().validate()?;

        if self.end_week > MAX_WEEK {
            return Err(TimetableError::WeekOutOfRange {
                week: self.end_week,
            });
        }

        if self.max_daily_sessions == 0 {
            return Err(TimetableError::InvalidConfig(
                "每天最多節數必須大於 0".to_string(),
            ));
        }

        if self.min_daily_sessions > self.max_daily_sessions {
            return Err(TimetableError::InvalidConfig(format!(
                "每天最少節數 {} 大於最多節數 {}",
                self.min_daily_sessions, self.max_daily_sessions
            )));
        }

        if self.credit_unit <= Decimal::ZERO {
            return Err(TimetableError::InvalidConfig(format!(
                "每節課折算學時必須為正數: {}",
                self.credit_unit
            )));
        }

        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// 課表優化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeConfig {
    /// 最大迭代次數
    pub max_iterations: u32,

    /// 目標均衡度（達到即停止）
    pub target_balance_score: f64,

    /// 日均衡權重
    pub weight_day_balance: f64,

    /// 教師均衡權重
    pub weight_teacher_balance: f64,

    /// 時段均衡權重
    pub weight_period_balance: f64,

    /// 每班每天最多節數
    pub max_daily_sessions: u32,

    /// 是否允許同一課程相鄰兩天上課
    pub allow_adjacent_day_repeat: bool,

    /// 允許相鄰兩天上課的課程
    pub exempt_course_ids: BTreeSet<String>,
}

impl OptimizeConfig {
    /// 建構器模式：設置最大迭代次數
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// 建構器模式：設置目標均衡度
    pub fn with_target_balance_score(mut self, target: f64) -> Self {
        self.target_balance_score = target;
        self
    }

    /// 建構器模式：設置三項權重
    pub fn with_weights(mut self, day: f64, teacher: f64, period: f64) -> Self {
        self.weight_day_balance = day;
        self.weight_teacher_balance = teacher;
        self.weight_period_balance = period;
        self
    }

    /// 建構器模式：設置每天最多節數
    pub fn with_max_daily_sessions(mut self, max: u32) -> Self {
        self.max_daily_sessions = max;
        self
    }

    /// 建構器模式：設置是否允許相鄰兩天上課
    pub fn with_adjacent_day_repeat(mut self, allow: bool) -> Self {
        self.allow_adjacent_day_repeat = allow;
        self
    }

    /// 建構器模式：添加豁免課程
    pub fn with_exempt_course(mut self, course_id: String) -> Self {
        self.exempt_course_ids.insert(course_id);
        self
    }

    /// 課程是否豁免相鄰日限制
    pub fn is_adjacent_exempt(&self, course_id: &str) -> bool {
        self.allow_adjacent_day_repeat || self.exempt_course_ids.contains(course_id)
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.weight_day_balance,
            self.weight_teacher_balance,
            self.weight_period_balance,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(TimetableError::InvalidConfig(format!(
                "權重必須為非負數: {:?}",
                weights
            )));
        }

        if self.max_daily_sessions == 0 {
            return Err(TimetableError::InvalidConfig(
                "每天最多節數必須大於 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            target_balance_score: 0.1,
            weight_day_balance: 0.4,
            weight_teacher_balance: 0.3,
            weight_period_balance: 0.3,
            max_daily_sessions: 8,
            allow_adjacent_day_repeat: false,
            exempt_course_ids: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_config() {
        let config = RunConfig::default();
        assert_eq!(config.week_range(), WeekRange::new(1, 20));
        assert_eq!(config.max_daily_sessions, 4);
        assert_eq!(config.credit_unit, Decimal::TWO);
        assert_eq!(config.tie_break, TieBreak::InOrder);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_run_config_builder() {
        let config = RunConfig::new(1, 16)
            .with_allowed_periods(["P1", "P2", "P3"])
            .with_avoided_periods(["P3"])
            .with_alternate_weeks(true)
            .with_daily_sessions(1, 6)
            .with_tie_break(TieBreak::Seeded(7));

        assert!(config.is_period_usable("P1"));
        assert!(!config.is_period_usable("P3"));
        assert!(!config.is_period_usable("P9"));
        assert!(config.allow_alternate_weeks);
        assert_eq!(config.tie_break, TieBreak::Seeded(7));
    }

    #[test]
    fn test_run_config_validation() {
        assert!(RunConfig::new(10, 2).validate().is_err());
        assert!(RunConfig::new(1, MAX_WEEK + 1).validate().is_err());
        assert!(RunConfig::new(1, 16)
            .with_daily_sessions(5, 4)
            .validate()
            .is_err());
        assert!(RunConfig::new(1, 16)
            .with_daily_sessions(0, 0)
            .validate()
            .is_err());
        assert!(RunConfig::new(1, 16)
            .with_credit_unit(Decimal::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_optimize_config() {
        let config = OptimizeConfig::default()
            .with_max_iterations(50)
            .with_exempt_course("PE-101".to_string());

        assert_eq!(config.max_iterations, 50);
        assert!(config.is_adjacent_exempt("PE-101"));
        assert!(!config.is_adjacent_exempt("MATH-101"));
        assert!(config.validate().is_ok());

        let bad = OptimizeConfig::default().with_weights(0.4, -1.0, 0.3);
        assert!(bad.validate().is_err());
    }
}
