//! 教室分配（盡力而為）

use timetable_core::{Classroom, ScheduleEntry};

use crate::CommittedSchedule;

/// 教室分配器
///
/// 按容量由小到大選擇第一間容得下且該時間格空閒的教室。
pub struct RoomAssigner<'a> {
    rooms: Vec<&'a Classroom>,
}

impl<'a> RoomAssigner<'a> {
    pub fn new(rooms: &'a [Classroom]) -> Self {
        let mut rooms: Vec<&Classroom> = rooms.iter().collect();
        rooms.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.id.cmp(&b.id)));
        Self { rooms }
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// 為候選記錄挑選教室
    pub fn pick(
        &self,
        schedule: &CommittedSchedule,
        candidate: &ScheduleEntry,
        student_count: u32,
    ) -> Option<&'a Classroom> {
        self.rooms
            .iter()
            .filter(|room| room.fits(student_count))
            .find(|room| {
                let with_room = candidate.clone().with_classroom(room.id.clone());
                !schedule.conflicts(&with_room)
            })
            .copied()
    }
}
