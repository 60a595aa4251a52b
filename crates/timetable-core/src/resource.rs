//! 教師、班級與教室模型

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// 時間槽引用（星期 + 節次ID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub day: Weekday,
    pub period_id: String,
}

impl SlotRef {
    pub fn new(day: Weekday, period_id: impl Into<String>) -> Self {
        Self {
            day,
            period_id: period_id.into(),
        }
    }
}

/// 檢查可用時間（`None` 表示不限制）
fn slot_allowed(availability: &Option<Vec<SlotRef>>, day: Weekday, period_id: &str) -> bool {
    match availability {
        None => true,
        Some(slots) => slots
            .iter()
            .any(|s| s.day == day && s.period_id == period_id),
    }
}

/// 教師
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// 教師ID
    pub id: String,

    /// 姓名
    pub name: String,

    /// 可用時間
    pub availability: Option<Vec<SlotRef>>,
}

impl Teacher {
    /// 創建新的教師（不限可用時間）
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            availability: None,
        }
    }

    /// 建構器模式：設置可用時間
    pub fn with_availability(mut self, slots: Vec<SlotRef>) -> Self {
        self.availability = Some(slots);
        self
    }

    /// 檢查某個時間槽是否可用
    pub fn is_available(&self, day: Weekday, period_id: &str) -> bool {
        slot_allowed(&self.availability, day, period_id)
    }
}

/// 班級
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassGroup {
    /// 班級ID
    pub id: String,

    /// 班級名稱
    pub name: String,

    /// 學生人數
    pub student_count: u32,

    /// 可用時間
    pub availability: Option<Vec<SlotRef>>,
}

impl ClassGroup {
    /// 創建新的班級
    pub fn new(id: String, name: String, student_count: u32) -> Self {
        Self {
            id,
            name,
            student_count,
            availability: None,
        }
    }

    /// 建構器模式：設置可用時間
    pub fn with_availability(mut self, slots: Vec<SlotRef>) -> Self {
        self.availability = Some(slots);
        self
    }

    /// 檢查某個時間槽是否可用
    pub fn is_available(&self, day: Weekday, period_id: &str) -> bool {
        slot_allowed(&self.availability, day, period_id)
    }
}

/// 教室
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// 教室ID
    pub id: String,

    /// 教學樓 + 房號
    pub name: String,

    /// 容量
    pub capacity: u32,
}

impl Classroom {
    pub fn new(id: String, name: String, capacity: u32) -> Self {
        Self { id, name, capacity }
    }

    /// 是否容得下指定人數
    pub fn fits(&self, student_count: u32) -> bool {
        self.capacity >= student_count
    }
}
