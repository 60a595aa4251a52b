//! 節次與學時模板模型

use chrono::{NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 可排課的教學日（週一到週五）
pub const TEACHING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// 教學日索引（週一 = 0）
pub fn day_index(day: Weekday) -> usize {
    day.num_days_from_monday() as usize
}

/// 同一天或相鄰兩天
pub fn days_adjacent(a: Weekday, b: Weekday) -> bool {
    a.num_days_from_monday().abs_diff(b.num_days_from_monday()) <= 1
}

/// 節次所屬時段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGroup {
    /// 上午
    Morning,
    /// 下午
    Afternoon,
    /// 晚上
    Evening,
}

/// 節次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// 節次ID
    pub id: String,

    /// 顯示名稱（如「第一節」）
    pub name: String,

    /// 開始時間
    #[serde(rename = "startTime", with = "hhmm")]
    pub start_time: NaiveTime,

    /// 結束時間
    #[serde(rename = "endTime", with = "hhmm")]
    pub end_time: NaiveTime,

    /// 學時權重
    #[serde(rename = "creditHours")]
    pub credit_hours: Decimal,
}

impl Period {
    /// 創建新的節次（預設學時權重為 2）
    pub fn new(id: String, name: String, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id,
            name,
            start_time,
            end_time,
            credit_hours: Decimal::TWO,
        }
    }

    /// 建構器模式：設置學時權重
    pub fn with_credit_hours(mut self, credit_hours: Decimal) -> Self {
        self.credit_hours = credit_hours;
        self
    }

    /// 節次長度（分鐘）
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// 各時段的節次列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatePeriods {
    #[serde(default)]
    pub morning: Vec<Period>,
    #[serde(default)]
    pub afternoon: Vec<Period>,
    #[serde(default)]
    pub evening: Vec<Period>,
}

/// 學時模板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTemplate {
    /// 模板名稱
    pub name: String,

    /// 按時段分組的節次
    pub periods: TemplatePeriods,
}

impl PeriodTemplate {
    /// 創建空模板
    pub fn new(name: String) -> Self {
        Self {
            name,
            periods: TemplatePeriods::default(),
        }
    }

    /// 從 JSON 文件載入模板
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 建構器模式：在指定時段追加節次
    pub fn with_period(mut self, group: PeriodGroup, period: Period) -> Self {
        match group {
            PeriodGroup::Morning => self.periods.morning.push(period),
            PeriodGroup::Afternoon => self.periods.afternoon.push(period),
            PeriodGroup::Evening => self.periods.evening.push(period),
        }
        self
    }

    /// 按「上午 → 下午 → 晚上」順序迭代所有節次
    pub fn ordered_periods(&self) -> impl Iterator<Item = (PeriodGroup, &Period)> {
        let morning = self.periods.morning.iter().map(|p| (PeriodGroup::Morning, p));
        let afternoon = self
            .periods
            .afternoon
            .iter()
            .map(|p| (PeriodGroup::Afternoon, p));
        let evening = self.periods.evening.iter().map(|p| (PeriodGroup::Evening, p));
        morning.chain(afternoon).chain(evening)
    }

    /// 節次總數（單日）
    pub fn period_count(&self) -> usize {
        self.periods.morning.len() + self.periods.afternoon.len() + self.periods.evening.len()
    }

    /// 按ID查找節次
    pub fn find_period(&self, period_id: &str) -> Option<&Period> {
        self.ordered_periods()
            .map(|(_, p)| p)
            .find(|p| p.id == period_id)
    }
}

/// `HH:MM` 時間格式
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
