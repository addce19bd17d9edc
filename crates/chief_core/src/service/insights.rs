//! Weekly insights: chart slices and the status report text.

use crate::policy::allocation::TimeAllocation;
use crate::repo::goal_registry::GoalRegistry;

const OVERHEAD_LABEL: &str = "Overhead";
const OVERHEAD_COLOR: &str = "#94a3b8";

/// One slice of the time-distribution chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlice {
    pub label: String,
    pub color: String,
    pub minutes: i64,
    pub percent: u8,
}

/// Goal slices in registry order followed by the overhead slice. Empty
/// slices are left out.
pub fn chart_slices(allocation: &TimeAllocation, registry: &GoalRegistry) -> Vec<ChartSlice> {
    let mut slices: Vec<ChartSlice> = allocation
        .goals
        .iter()
        .filter(|row| row.minutes > 0)
        .filter_map(|row| {
            registry.get(&row.goal_id).map(|goal| ChartSlice {
                label: goal.title.clone(),
                color: goal.color.clone(),
                minutes: row.minutes,
                percent: row.percent,
            })
        })
        .collect();

    if allocation.overhead_minutes > 0 {
        slices.push(ChartSlice {
            label: OVERHEAD_LABEL.to_string(),
            color: OVERHEAD_COLOR.to_string(),
            minutes: allocation.overhead_minutes,
            percent: allocation.overhead_percent(),
        });
    }
    slices
}

/// Plain-text weekly status report.
pub fn weekly_report(
    allocation: &TimeAllocation,
    registry: &GoalRegistry,
    avoided_minutes: i64,
) -> String {
    let mut lines = vec![format!(
        "Weekly status report: {} scheduled.",
        format_hours(allocation.total_minutes)
    )];

    for row in &allocation.goals {
        let Some(goal) = registry.get(&row.goal_id) else {
            continue;
        };
        let marker = if row.deficit() > 0 { "behind" } else { "on track" };
        lines.push(format!(
            "- {}: {} ({}% of scheduled time, target {}%, {marker})",
            goal.title,
            format_hours(row.minutes),
            row.percent,
            row.target
        ));
    }

    lines.push(format!(
        "- {OVERHEAD_LABEL}: {} ({}%)",
        format_hours(allocation.overhead_minutes),
        allocation.overhead_percent()
    ));
    if avoided_minutes > 0 {
        lines.push(format!(
            "{} of conflicting meetings avoided.",
            format_hours(avoided_minutes)
        ));
    }
    lines.join("\n")
}

fn format_hours(minutes: i64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h{rest:02}m")
    }
}
