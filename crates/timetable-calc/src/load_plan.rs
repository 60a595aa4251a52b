//! 課時計劃：把周學時換算為每周節數

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use timetable_core::{LoadPlan, WeekRange, WeekSet};

/// 課時計劃計算器
pub struct LoadPlanner;

impl LoadPlanner {
    /// 計算課時計劃
    ///
    /// - 1 學時：單節課，只在最後一周上
    /// - 不允許單雙周：`ceil(學時 / 每節學時)`
    /// - 允許單雙周且學時為 3 的倍數：單周 `ceil`、雙周 `floor`
    /// - 其他情況：`ceil`
    pub fn plan(hours: Decimal, credit_unit: Decimal, allow_alternate_weeks: bool) -> LoadPlan {
        if hours == Decimal::ONE {
            return LoadPlan::SinglePeriod;
        }

        let per_week = hours / credit_unit;
        let uniform = LoadPlan::Uniform {
            periods_per_week: Self::to_count(per_week.ceil()),
        };

        if !allow_alternate_weeks {
            return uniform;
        }

        if hours % Decimal::from(3) == Decimal::ZERO {
            return LoadPlan::Alternate {
                odd_week: Self::to_count(per_week.ceil()),
                even_week: Self::to_count(per_week.floor()),
            };
        }

        uniform
    }

    /// 單節課的上課周次：只有最後一周
    pub fn single_week(range: &WeekRange) -> timetable_core::Result<WeekSet> {
        WeekSet::from_weeks([range.end])
    }

    /// 每周上課的周次
    pub fn all_weeks(range: &WeekRange) -> timetable_core::Result<WeekSet> {
        range.to_week_set()
    }

    /// 單周上課的周次
    pub fn odd_weeks(range: &WeekRange) -> timetable_core::Result<WeekSet> {
        Ok(range.to_week_set()?.odd_weeks())
    }

    /// 雙周上課的周次
    pub fn even_weeks(range: &WeekRange) -> timetable_core::Result<WeekSet> {
        Ok(range.to_week_set()?.even_weeks())
    }

    fn to_count(value: Decimal) -> u32 {
        value.to_u32().unwrap_or(0)
    }
}
