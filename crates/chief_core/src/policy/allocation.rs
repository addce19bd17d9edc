//! Per-goal time allocation over one week.
//!
//! # Invariants
//! - Only events starting inside the week are counted.
//! - Percentages are relative to total scheduled minutes and rounded down.
//! - Goal rows follow registry order.

use crate::model::event::CalendarEvent;
use crate::model::goal::GoalId;
use crate::policy::classifier::Classification;
use crate::policy::week::WorkWeek;
use crate::repo::goal_registry::GoalRegistry;

/// Scheduled time for one goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalAllocation {
    pub goal_id: GoalId,
    pub minutes: i64,
    pub percent: u8,
    pub target: u8,
}

impl GoalAllocation {
    /// Percent points missing to reach the target; zero when met.
    pub fn deficit(&self) -> u8 {
        self.target.saturating_sub(self.percent)
    }
}

/// Goal whose allocation is below target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnderServedGoal {
    pub goal_id: GoalId,
    pub deficit: u8,
}

/// Weekly time distribution across goals and overhead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAllocation {
    pub goals: Vec<GoalAllocation>,
    /// Minutes in yellow and red events.
    pub overhead_minutes: i64,
    pub total_minutes: i64,
}

impl TimeAllocation {
    pub fn compute<'e>(
        classified: impl IntoIterator<Item = (&'e CalendarEvent, &'e Classification)>,
        registry: &GoalRegistry,
        week: &WorkWeek,
    ) -> Self {
        let mut per_goal = vec![0_i64; registry.len()];
        let mut overhead_minutes = 0_i64;
        let mut total_minutes = 0_i64;

        for (event, classification) in classified {
            if !week.contains(event.start) {
                continue;
            }
            let minutes = event.duration_minutes();
            total_minutes += minutes;
            match classification
                .goal_id()
                .and_then(|goal_id| registry.position(goal_id))
            {
                Some(index) => per_goal[index] += minutes,
                None => overhead_minutes += minutes,
            }
        }

        let goals = registry
            .list()
            .iter()
            .zip(per_goal)
            .map(|(goal, minutes)| GoalAllocation {
                goal_id: goal.id.clone(),
                minutes,
                percent: percent_of(minutes, total_minutes),
                target: goal.target_allocation,
            })
            .collect();

        Self {
            goals,
            overhead_minutes,
            total_minutes,
        }
    }

    pub fn get(&self, goal_id: &GoalId) -> Option<&GoalAllocation> {
        self.goals.iter().find(|row| &row.goal_id == goal_id)
    }

    pub fn overhead_percent(&self) -> u8 {
        percent_of(self.overhead_minutes, self.total_minutes)
    }

    /// Goals below target, largest deficit first; ties keep registry order.
    pub fn under_served(&self) -> Vec<UnderServedGoal> {
        let mut rows: Vec<UnderServedGoal> = self
            .goals
            .iter()
            .filter(|row| row.deficit() > 0)
            .map(|row| UnderServedGoal {
                goal_id: row.goal_id.clone(),
                deficit: row.deficit(),
            })
            .collect();
        rows.sort_by(|a, b| b.deficit.cmp(&a.deficit));
        rows
    }
}

fn percent_of(part: i64, total: i64) -> u8 {
    if total <= 0 {
        return 0;
    }
    let percent = (part.max(0) * 100) / total;
    u8::try_from(percent.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::percent_of;

    #[test]
    fn percent_of_handles_empty_total() {
        assert_eq!(percent_of(30, 0), 0);
    }

    #[test]
    fn percent_of_rounds_down() {
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(3, 3), 100);
    }
}
