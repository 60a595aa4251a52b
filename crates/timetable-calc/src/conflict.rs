//! 衝突檢測
//!
//! 排課合法性的唯一判斷來源，分配器、合併器與優化器都必須透過這裡判斷。

use timetable_core::{EntryId, ScheduleEntry};

/// 衝突檢測器
pub struct ConflictDetector;

impl ConflictDetector {
    /// 兩筆記錄是否衝突
    ///
    /// 共用教師、班級或教室，位於同一時間格，且周次有重疊。
    /// 空周次集合代表沒有上課，永不衝突。
    pub fn clashes(a: &ScheduleEntry, b: &ScheduleEntry) -> bool {
        let shares_room = matches!(
            (&a.classroom_id, &b.classroom_id),
            (Some(x), Some(y)) if x == y
        );
        let shares_resource = a.teacher_id == b.teacher_id || a.class_id == b.class_id || shares_room;

        shares_resource && a.same_cell(b) && a.weeks.overlaps(&b.weeks)
    }

    /// 候選記錄是否與任一已提交記錄衝突（同ID的記錄視為自身，略過）
    pub fn conflicts<'a, I>(candidate: &ScheduleEntry, committed: I) -> bool
    where
        I: IntoIterator<Item = &'a ScheduleEntry>,
    {
        committed
            .into_iter()
            .any(|existing| existing.id != candidate.id && Self::clashes(candidate, existing))
    }

    /// 所有互相衝突的記錄對
    pub fn find_all(entries: &[ScheduleEntry]) -> Vec<(EntryId, EntryId)> {
        let mut pairs = Vec::new();
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if a.id != b.id && Self::clashes(a, b) {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }
}
