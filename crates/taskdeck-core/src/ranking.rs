//! Smart score: a composite priority number used by the `smart` sort.
//!
//! The score is the sum of four independent components:
//!
//! | Component | Values |
//! |-----------|--------|
//! | Deadline proximity (whole days, rounded up) | overdue +1000, ≤1 +800, ≤3 +600, ≤7 +400, ≤14 +200, ≤30 +100 |
//! | Priority | urgent +300, high +250, medium +150, low +50 |
//! | Status | In Progress +200, Not Started +100, On Hold +50, Completed −1000 |
//! | Linked to a project | +50 |
//!
//! Rows without a priority fall back to their stored urgency.

use chrono::{DateTime, Utc};

use crate::models::{Priority, Task, TaskStatus, Urgency};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Whole days until `deadline`, rounded up. Negative once it has passed.
pub fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (deadline - now).num_milliseconds() as f64;
    (ms / MS_PER_DAY).ceil() as i64
}

fn deadline_points(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let Some(deadline) = deadline else {
        return 0;
    };
    match days_until(deadline, now) {
        d if d < 0 => 1000,
        d if d <= 1 => 800,
        d if d <= 3 => 600,
        d if d <= 7 => 400,
        d if d <= 14 => 200,
        d if d <= 30 => 100,
        _ => 0,
    }
}

fn priority_points(priority: Option<Priority>, urgency: Option<Urgency>) -> i64 {
    match (priority, urgency) {
        (Some(Priority::Urgent), _) => 300,
        (Some(Priority::High), _) | (None, Some(Urgency::High)) => 250,
        (Some(Priority::Medium), _) | (None, Some(Urgency::Medium)) => 150,
        (Some(Priority::Low), _) | (None, Some(Urgency::Low)) => 50,
        (None, None) => 0,
    }
}

fn status_points(status: TaskStatus) -> i64 {
    match status {
        TaskStatus::InProgress => 200,
        TaskStatus::NotStarted => 100,
        TaskStatus::OnHold => 50,
        TaskStatus::Completed => -1000,
    }
}

/// Score a task at instant `now`. Pure: same inputs, same score.
pub fn smart_score(task: &Task, now: DateTime<Utc>) -> i64 {
    let project = if task.project_id.is_some() { 50 } else { 0 };
    deadline_points(task.deadline, now)
        + priority_points(task.priority, task.urgency)
        + status_points(task.status)
        + project
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskContext;
    use chrono::Duration;
    use uuid::Uuid;

    fn task(priority: Option<Priority>, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            project_id: None,
            title: "t".to_string(),
            description: String::new(),
            tags: vec![],
            deadline: None,
            priority,
            urgency: priority.map(Priority::urgency),
            status,
            assignee: String::new(),
            context: TaskContext::Other,
            order: 0,
            completed_at: None,
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    #[test]
    fn test_urgent_due_tomorrow_scores_at_least_1200() {
        let now = Utc::now();
        let mut t = task(Some(Priority::Urgent), TaskStatus::NotStarted);
        t.deadline = Some(now + Duration::days(1));
        assert!(smart_score(&t, now) >= 1200);
        assert_eq!(smart_score(&t, now), 1200);
    }

    #[test]
    fn test_overdue_dominates() {
        let now = Utc::now();
        let mut t = task(Some(Priority::Low), TaskStatus::OnHold);
        t.deadline = Some(now - Duration::days(2));
        assert_eq!(smart_score(&t, now), 1000 + 50 + 50);
    }

    #[test]
    fn test_deadline_bands() {
        let now = Utc::now();
        let cases = [(2, 600), (3, 600), (5, 400), (10, 200), (20, 100), (45, 0)];
        for (days, points) in cases {
            assert_eq!(
                deadline_points(Some(now + Duration::days(days)), now),
                points,
                "{} days",
                days
            );
        }
        assert_eq!(deadline_points(None, now), 0);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let now = Utc::now();
        assert_eq!(days_until(now + Duration::hours(30), now), 2);
        assert_eq!(deadline_points(Some(now + Duration::hours(30)), now), 600);
    }

    #[test]
    fn test_completed_is_penalized() {
        let now = Utc::now();
        let t = task(Some(Priority::Urgent), TaskStatus::Completed);
        assert_eq!(smart_score(&t, now), 300 - 1000);
    }

    #[test]
    fn test_legacy_row_uses_urgency() {
        let now = Utc::now();
        let mut t = task(None, TaskStatus::NotStarted);
        t.urgency = Some(Urgency::High);
        assert_eq!(smart_score(&t, now), 250 + 100);
        t.urgency = None;
        assert_eq!(smart_score(&t, now), 100);
    }

    #[test]
    fn test_project_link_adds_bonus() {
        let now = Utc::now();
        let mut t = task(Some(Priority::Medium), TaskStatus::InProgress);
        let base = smart_score(&t, now);
        t.project_id = Some(Uuid::now_v7());
        assert_eq!(smart_score(&t, now), base + 50);
    }

    #[test]
    fn test_score_is_pure() {
        let now = Utc::now();
        let mut t = task(Some(Priority::High), TaskStatus::InProgress);
        t.deadline = Some(now + Duration::days(6));
        assert_eq!(smart_score(&t, now), smart_score(&t, now));
    }
}
