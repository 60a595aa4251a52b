//! # Timetable Optimizer
//!
//! 課表均衡優化：在不產生衝突的前提下，把課從最忙的一天移到最空的一天

pub mod balance;
pub mod optimizer;

// Re-export 主要類型
pub use balance::{variance, BalanceScore};
pub use optimizer::BalanceOptimizer;

use serde::{Deserialize, Serialize};
use timetable_core::ScheduleEntry;

/// 優化報告
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// 迭代次數（每輪嘗試計一次，包括最後一輪找不到改善的嘗試）
    pub iterations: u32,

    /// 接受的改進次數
    pub improvements: u32,

    /// 優化前分數明細
    pub before_score: BalanceScore,

    /// 優化後分數明細
    pub after_score: BalanceScore,
}

impl OptimizationReport {
    /// 分數改善量
    pub fn gain(&self) -> f64 {
        self.before_score.total - self.after_score.total
    }
}

/// 優化結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// 優化後的排課記錄（ID 與周次不變）
    pub entries: Vec<ScheduleEntry>,

    /// 優化報告
    pub report: OptimizationReport,
}
