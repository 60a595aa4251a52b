//! 節次目錄：把學時模板展開為可排課的時間槽

use std::collections::{BTreeSet, HashSet};

use chrono::Weekday;
use timetable_core::{ClassGroup, Period, PeriodTemplate, RunConfig, Teacher, TEACHING_DAYS};

/// 時間槽（星期 + 節次索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub day: Weekday,
    /// `PeriodCatalog::periods` 中的索引
    pub period: u16,
}

/// 節次目錄
///
/// 週一到週五依序展開，每天內保持「上午 → 下午 → 晚上」及模板內順序。
/// 允許清單為空時目錄為空，代表沒有可排課容量，不是錯誤。
#[derive(Debug, Clone)]
pub struct PeriodCatalog {
    periods: Vec<Period>,
    slots: Vec<Slot>,
}

impl PeriodCatalog {
    /// 從模板與允許/避開清單建立目錄
    pub fn build(
        template: &PeriodTemplate,
        allowed: &BTreeSet<String>,
        avoided: &BTreeSet<String>,
    ) -> Self {
        let mut seen = HashSet::new();
        let periods: Vec<Period> = template
            .ordered_periods()
            .map(|(_, p)| p)
            .filter(|p| allowed.contains(&p.id) && !avoided.contains(&p.id))
            .filter(|p| seen.insert(p.id.clone()))
            .cloned()
            .collect();

        let slots = TEACHING_DAYS
            .iter()
            .flat_map(|&day| {
                (0..periods.len()).map(move |idx| Slot {
                    day,
                    period: idx as u16,
                })
            })
            .collect();

        Self { periods, slots }
    }

    /// 按運行配置建立目錄
    pub fn from_config(template: &PeriodTemplate, config: &RunConfig) -> Self {
        Self::build(
            template,
            &config.allowed_period_ids,
            &config.avoided_period_ids,
        )
    }

    /// 所有時間槽（有序）
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// 目錄中的節次（單日順序）
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn period(&self, slot: &Slot) -> &Period {
        &self.periods[slot.period as usize]
    }

    pub fn period_id(&self, slot: &Slot) -> &str {
        &self.period(slot).id
    }

    /// 節次ID在單日順序中的索引
    pub fn position_of(&self, period_id: &str) -> Option<u16> {
        self.periods
            .iter()
            .position(|p| p.id == period_id)
            .map(|idx| idx as u16)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 與教師、班級可用時間取交集後的時間槽（保持目錄順序）
    pub fn available_for(&self, teacher: Option<&Teacher>, class: Option<&ClassGroup>) -> Vec<Slot> {
        self.slots
            .iter()
            .filter(|slot| {
                let period_id = self.period_id(slot);
                teacher.map_or(true, |t| t.is_available(slot.day, period_id))
                    && class.map_or(true, |c| c.is_available(slot.day, period_id))
            })
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use timetable_core::{PeriodGroup, SlotRef};

    fn period(id: &str, h: u32) -> Period {
        Period::new(
            id.to_string(),
            id.to_string(),
            NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(h + 1, 30, 0).unwrap(),
        )
    }

    fn template() -> PeriodTemplate {
        PeriodTemplate::new("TEST".to_string())
            .with_period(PeriodGroup::Afternoon, period("A1", 14))
            .with_period(PeriodGroup::Morning, period("M1", 8))
            .with_period(PeriodGroup::Morning, period("M2", 10))
            .with_period(PeriodGroup::Evening, period("E1", 19))
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_catalog_order() {
        let catalog = PeriodCatalog::build(&template(), &set(&["M1", "M2", "A1", "E1"]), &set(&[]));

        assert_eq!(catalog.len(), 20);
        let monday: Vec<_> = catalog
            .slots()
            .iter()
            .take(4)
            .map(|s| (s.day, catalog.period_id(s)))
            .collect();
        assert_eq!(
            monday,
            vec![
                (Weekday::Mon, "M1"),
                (Weekday::Mon, "M2"),
                (Weekday::Mon, "A1"),
                (Weekday::Mon, "E1"),
            ]
        );
        assert_eq!(catalog.slots()[4].day, Weekday::Tue);
        assert_eq!(catalog.slots().last().unwrap().day, Weekday::Fri);
    }

    #[test]
    fn test_catalog_filters() {
        let catalog = PeriodCatalog::build(&template(), &set(&["M1", "A1", "E1"]), &set(&["E1"]));

        let ids: Vec<_> = catalog.periods().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["M1", "A1"]);
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.position_of("A1"), Some(1));
        assert_eq!(catalog.position_of("E1"), None);
    }

    #[test]
    fn test_empty_allow_list() {
        let catalog = PeriodCatalog::build(&template(), &set(&[]), &set(&[]));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_available_for_intersects_windows() {
        let catalog = PeriodCatalog::build(&template(), &set(&["M1", "M2"]), &set(&[]));
        let teacher = Teacher::new("T-1".to_string(), "李老師".to_string()).with_availability(vec![
            SlotRef::new(Weekday::Mon, "M1"),
            SlotRef::new(Weekday::Tue, "M2"),
            SlotRef::new(Weekday::Wed, "M1"),
        ]);
        let class = ClassGroup::new("C-1".to_string(), "一班".to_string(), 30).with_availability(vec![
            SlotRef::new(Weekday::Tue, "M2"),
            SlotRef::new(Weekday::Wed, "M1"),
        ]);

        let slots = catalog.available_for(Some(&teacher), Some(&class));
        let cells: Vec<_> = slots.iter().map(|s| (s.day, catalog.period_id(s))).collect();
        assert_eq!(cells, vec![(Weekday::Tue, "M2"), (Weekday::Wed, "M1")]);

        assert_eq!(catalog.available_for(None, None).len(), catalog.len());
    }
}
