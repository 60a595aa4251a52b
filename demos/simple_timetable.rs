//! 簡單排課示例

use anyhow::Context;
use chrono::{NaiveTime, Weekday};
use rust_decimal::Decimal;
use timetable::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== 簡單排課示例 ===\n");

    // 學時模板
    let hm = |h: u32, m: u32| NaiveTime::from_hms_opt(h, m, 0).context("無效時間");
    let template = PeriodTemplate::new("標準作息".to_string())
        .with_period(
            PeriodGroup::Morning,
            Period::new("P1".to_string(), "第一大節".to_string(), hm(8, 0)?, hm(9, 40)?),
        )
        .with_period(
            PeriodGroup::Morning,
            Period::new("P2".to_string(), "第二大節".to_string(), hm(10, 0)?, hm(11, 40)?),
        )
        .with_period(
            PeriodGroup::Afternoon,
            Period::new("P3".to_string(), "第三大節".to_string(), hm(14, 0)?, hm(15, 40)?),
        );

    // 教師、班級、教室
    let teachers = vec![
        Teacher::new("T-001".to_string(), "王老師".to_string()),
        Teacher::new("T-002".to_string(), "李老師".to_string()).with_availability(vec![
            SlotRef::new(Weekday::Tue, "P1"),
            SlotRef::new(Weekday::Thu, "P1"),
        ]),
    ];
    let classes = vec![
        ClassGroup::new("C-01".to_string(), "計算機一班".to_string(), 45),
        ClassGroup::new("C-02".to_string(), "計算機二班".to_string(), 38),
    ];
    let classrooms = vec![
        Classroom::new("R-101".to_string(), "一號樓101".to_string(), 40),
        Classroom::new("R-201".to_string(), "二號樓201".to_string(), 80),
    ];

    // 課程
    let courses = vec![
        Course::new(
            "MATH-101".to_string(),
            "高等數學".to_string(),
            Decimal::from(4),
            WeekRange::new(1, 16),
        )
        .with_teacher("T-001".to_string())
        .with_class("C-01".to_string())
        .with_class("C-02".to_string()),
        Course::new(
            "PHYS-101".to_string(),
            "大學物理".to_string(),
            Decimal::from(3),
            WeekRange::new(1, 16),
        )
        .with_teacher("T-002".to_string())
        .with_class("C-01".to_string()),
        Course::new(
            "ETHICS".to_string(),
            "職業道德".to_string(),
            Decimal::ONE,
            WeekRange::new(1, 16),
        )
        .with_teacher("T-001".to_string())
        .with_class("C-02".to_string()),
    ];

    let config = RunConfig::new(1, 16)
        .with_allowed_periods(["P1", "P2", "P3"])
        .with_alternate_weeks(true)
        .with_classroom_assignment(true);

    let input = ScheduleInput::new(courses)
        .with_teachers(teachers)
        .with_classes(classes)
        .with_classrooms(classrooms);

    let result = Scheduler::new(template, config)
        .run(&input)
        .context("排課失敗")?;

    println!("\n排課結果（運行 {}）:", result.run_id);
    for entry in &result.entries {
        println!(
            "  - {} / {} / {}: {:?} {} 周次 {:?} 教室 {}",
            entry.course_id,
            entry.class_id,
            entry.teacher_id,
            entry.day,
            entry.period_id,
            entry.weeks.iter().collect::<Vec<_>>(),
            entry.classroom_id.as_deref().unwrap_or("-")
        );
    }

    for failure in &result.failures {
        println!("  ! {}: {}", failure.course_id, failure.reason);
    }
    for warning in &result.warnings {
        println!("  [{:?}] {}: {}", warning.severity, warning.subject, warning.message);
    }

    let optimized = BalanceOptimizer::optimize(result.entries, &OptimizeConfig::default())?;
    println!(
        "\n均衡優化：{} 輪，移動 {} 次，分數 {:.3} → {:.3}",
        optimized.report.iterations,
        optimized.report.improvements,
        optimized.report.before_score.total,
        optimized.report.after_score.total
    );

    Ok(())
}
