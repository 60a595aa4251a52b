//! 已提交課表（按時間格與班級日索引）

use std::collections::HashMap;

use chrono::Weekday;
use timetable_core::{
    day_index, days_adjacent, EntryId, ScheduleEntry, TimetableError, WeekSet, TEACHING_DAYS,
};

use crate::ConflictDetector;

/// 時間格鍵（星期索引, 節次鍵）
type CellKey = (usize, u16);

/// 班級日鍵（班級鍵, 星期索引）
type ClassDayKey = (u16, usize);

/// 已提交課表
///
/// 記錄按提交順序保存，另以 (星期, 節次) 與 (班級, 星期) 建立索引：
/// 衝突檢查只比對同一時間格內的記錄，每日節數與相鄰日檢查只比對該班級當天的記錄。
/// 節次ID與班級ID在內部轉為 `u16` 鍵。
#[derive(Debug, Clone, Default)]
pub struct CommittedSchedule {
    entries: Vec<ScheduleEntry>,
    positions: HashMap<EntryId, usize>,
    period_keys: HashMap<String, u16>,
    class_keys: HashMap<String, u16>,
    cells: HashMap<CellKey, Vec<usize>>,
    class_days: HashMap<ClassDayKey, Vec<usize>>,
    next_id: u32,
}

impl CommittedSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從既有記錄建立（保留原有ID，ID重複時返回錯誤）
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> timetable_core::Result<Self> {
        let mut schedule = Self::new();
        for entry in entries {
            schedule.insert(entry)?;
        }
        Ok(schedule)
    }

    /// 下一筆提交記錄應使用的ID
    pub fn next_id(&self) -> EntryId {
        EntryId(self.next_id)
    }

    /// 提交記錄
    pub fn insert(&mut self, entry: ScheduleEntry) -> timetable_core::Result<EntryId> {
        let id = entry.id;
        if self.positions.contains_key(&id) {
            return Err(TimetableError::DuplicateId(format!("排課記錄 {}", id.0)));
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));

        let pos = self.entries.len();
        let cell = self.intern_cell(entry.day, &entry.period_id);
        self.cells.entry(cell).or_default().push(pos);
        let class_day = self.intern_class_day(&entry.class_id, entry.day);
        self.class_days.entry(class_day).or_default().push(pos);

        self.positions.insert(id, pos);
        self.entries.push(entry);
        Ok(id)
    }

    pub fn get(&self, id: EntryId) -> Option<&ScheduleEntry> {
        self.positions.get(&id).map(|&pos| &self.entries[pos])
    }

    /// 某個時間格內的記錄
    pub fn cell_entries<'a>(
        &'a self,
        day: Weekday,
        period_id: &str,
    ) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
        let positions = self
            .cell_key(day, period_id)
            .and_then(|key| self.cells.get(&key))
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        positions.iter().map(move |&pos| &self.entries[pos])
    }

    /// 某班級某天的記錄
    pub fn class_day_entries<'a>(
        &'a self,
        class_id: &str,
        day: Weekday,
    ) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
        let positions = self
            .class_keys
            .get(class_id)
            .and_then(|&key| self.class_days.get(&(key, day_index(day))))
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        positions.iter().map(move |&pos| &self.entries[pos])
    }

    /// 候選記錄是否與已提交記錄衝突
    pub fn conflicts(&self, candidate: &ScheduleEntry) -> bool {
        self.conflicts_excluding(candidate, &[])
    }

    /// 衝突檢查，忽略指定記錄（用於成對移動）
    pub fn conflicts_excluding(&self, candidate: &ScheduleEntry, exclude: &[EntryId]) -> bool {
        ConflictDetector::conflicts(
            candidate,
            self.cell_entries(candidate.day, &candidate.period_id)
                .filter(|e| !exclude.contains(&e.id)),
        )
    }

    /// 移動記錄到新的時間格
    ///
    /// 只更新位置，合法性由調用方先行檢查。記錄不存在時返回 `false`。
    pub fn relocate(&mut self, id: EntryId, day: Weekday, period_id: &str) -> bool {
        let Some(&pos) = self.positions.get(&id) else {
            return false;
        };

        let old = &self.entries[pos];
        let old_cell = self.cell_key(old.day, &old.period_id);
        let old_class_day = self
            .class_keys
            .get(&old.class_id)
            .map(|&key| (key, day_index(old.day)));
        if let Some(cell) = old_cell.and_then(|key| self.cells.get_mut(&key)) {
            cell.retain(|&p| p != pos);
        }
        if let Some(bucket) = old_class_day.and_then(|key| self.class_days.get_mut(&key)) {
            bucket.retain(|&p| p != pos);
        }

        let new_cell = self.intern_cell(day, period_id);
        self.cells.entry(new_cell).or_default().push(pos);
        let class_id = self.entries[pos].class_id.clone();
        let new_class_day = self.intern_class_day(&class_id, day);
        self.class_days.entry(new_class_day).or_default().push(pos);

        let entry = &mut self.entries[pos];
        entry.day = day;
        entry.period_id = period_id.to_string();
        true
    }

    /// 班級在某天的節數（只計周次重疊的記錄）
    pub fn class_daily_count(
        &self,
        class_id: &str,
        day: Weekday,
        weeks: &WeekSet,
        exclude: &[EntryId],
    ) -> usize {
        self.class_day_entries(class_id, day)
            .filter(|e| e.weeks.overlaps(weeks) && !exclude.contains(&e.id))
            .count()
    }

    /// 同課程同班級在同一天或相鄰一天是否已有課（只計周次重疊的記錄）
    pub fn has_nearby_session(
        &self,
        course_id: &str,
        class_id: &str,
        day: Weekday,
        weeks: &WeekSet,
        exclude: &[EntryId],
    ) -> bool {
        TEACHING_DAYS
            .iter()
            .filter(|&&d| days_adjacent(d, day))
            .flat_map(|&d| self.class_day_entries(class_id, d))
            .any(|e| {
                e.course_id == course_id && e.weeks.overlaps(weeks) && !exclude.contains(&e.id)
            })
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ScheduleEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn cell_key(&self, day: Weekday, period_id: &str) -> Option<CellKey> {
        self.period_keys
            .get(period_id)
            .map(|&key| (day_index(day), key))
    }

    fn intern_cell(&mut self, day: Weekday, period_id: &str) -> CellKey {
        (day_index(day), Self::intern(&mut self.period_keys, period_id))
    }

    fn intern_class_day(&mut self, class_id: &str, day: Weekday) -> ClassDayKey {
        (Self::intern(&mut self.class_keys, class_id), day_index(day))
    }

    fn intern(keys: &mut HashMap<String, u16>, id: &str) -> u16 {
        if let Some(&key) = keys.get(id) {
            return key;
        }
        let key = keys.len() as u16;
        keys.insert(id.to_string(), key);
        key
    }
}
