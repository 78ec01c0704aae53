//! Sort methods for task and project listings.
//!
//! Every comparator is used with a stable sort, so equal keys keep the order
//! rows arrived in from storage (ascending id, which for UUIDv7 is creation
//! order).

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::{Project, Task, Urgency};
use crate::ranking::smart_score;

/// Sort methods available on task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSortMethod {
    Smart,
    Order,
    DeadlineAsc,
    DeadlineDesc,
    UrgencyDesc,
    UrgencyAsc,
    Status,
    Title,
    Project,
    #[default]
    IdAsc,
    IdDesc,
}

impl TaskSortMethod {
    /// Resolve a client-supplied name. Unknown names fall back to `IdAsc`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "smart" | "smart_sort" | "intelligent" => Self::Smart,
            "order" => Self::Order,
            "deadline" | "deadline_asc" => Self::DeadlineAsc,
            "deadline_desc" => Self::DeadlineDesc,
            "urgency" | "urgency_desc" => Self::UrgencyDesc,
            "urgency_asc" => Self::UrgencyAsc,
            "status" => Self::Status,
            "title" | "name" => Self::Title,
            "project" | "projectid" => Self::Project,
            "id_desc" => Self::IdDesc,
            _ => Self::IdAsc,
        }
    }
}

/// Sort methods available on project listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectSortMethod {
    #[default]
    IdAsc,
    IdDesc,
    DeadlineAsc,
    DeadlineDesc,
    UrgencyDesc,
    UrgencyAsc,
    Status,
    Name,
}

impl ProjectSortMethod {
    /// Resolve a client-supplied name. Unknown names fall back to `IdAsc`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "id_desc" => Self::IdDesc,
            "deadline" | "deadline_asc" => Self::DeadlineAsc,
            "deadline_desc" => Self::DeadlineDesc,
            "urgency" | "urgency_desc" => Self::UrgencyDesc,
            "urgency_asc" => Self::UrgencyAsc,
            "status" => Self::Status,
            "name" | "title" => Self::Name,
            _ => Self::IdAsc,
        }
    }
}

fn urgency_rank(urgency: Option<Urgency>) -> u8 {
    urgency.map(Urgency::rank).unwrap_or(0)
}

fn task_urgency(task: &Task) -> Option<Urgency> {
    task.urgency.or(task.priority.map(|p| p.urgency()))
}

fn deadline_key(deadline: Option<DateTime<Utc>>) -> DateTime<Utc> {
    deadline.unwrap_or(DateTime::UNIX_EPOCH)
}

fn project_key(task: &Task) -> String {
    task.project_id.map(|id| id.to_string()).unwrap_or_default()
}

fn compare_tasks(method: TaskSortMethod, a: &Task, b: &Task) -> Ordering {
    match method {
        // Smart is handled by `sort_tasks` with precomputed scores.
        TaskSortMethod::Smart => Ordering::Equal,
        TaskSortMethod::Order => a.order.cmp(&b.order),
        TaskSortMethod::DeadlineAsc => deadline_key(a.deadline).cmp(&deadline_key(b.deadline)),
        TaskSortMethod::DeadlineDesc => deadline_key(b.deadline).cmp(&deadline_key(a.deadline)),
        TaskSortMethod::UrgencyDesc => {
            urgency_rank(task_urgency(b)).cmp(&urgency_rank(task_urgency(a)))
        }
        TaskSortMethod::UrgencyAsc => {
            urgency_rank(task_urgency(a)).cmp(&urgency_rank(task_urgency(b)))
        }
        TaskSortMethod::Status => a.status.as_str().cmp(b.status.as_str()),
        TaskSortMethod::Title => a.title.cmp(&b.title),
        TaskSortMethod::Project => project_key(a).cmp(&project_key(b)),
        TaskSortMethod::IdAsc => a.id.cmp(&b.id),
        TaskSortMethod::IdDesc => b.id.cmp(&a.id),
    }
}

/// Stable-sort `tasks` in place by `method`.
///
/// The smart score is computed once per task, not once per comparison.
pub fn sort_tasks(tasks: &mut Vec<Task>, method: TaskSortMethod, now: DateTime<Utc>) {
    if method == TaskSortMethod::Smart {
        let mut scored: Vec<(i64, Task)> = tasks
            .drain(..)
            .map(|task| (smart_score(&task, now), task))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        tasks.extend(scored.into_iter().map(|(_, task)| task));
    } else {
        tasks.sort_by(|a, b| compare_tasks(method, a, b));
    }
}

/// Order a filtered task set for display: active tasks first, then
/// completed ones, each part sorted by `method`.
pub fn arrange_tasks(tasks: Vec<Task>, method: TaskSortMethod, now: DateTime<Utc>) -> Vec<Task> {
    let (mut active, mut completed): (Vec<Task>, Vec<Task>) =
        tasks.into_iter().partition(|t| !t.status.is_completed());
    sort_tasks(&mut active, method, now);
    sort_tasks(&mut completed, method, now);
    active.append(&mut completed);
    active
}

fn compare_projects(method: ProjectSortMethod, a: &Project, b: &Project) -> Ordering {
    match method {
        ProjectSortMethod::IdAsc => a.id.cmp(&b.id),
        ProjectSortMethod::IdDesc => b.id.cmp(&a.id),
        ProjectSortMethod::DeadlineAsc => a.deadline.cmp(&b.deadline),
        ProjectSortMethod::DeadlineDesc => b.deadline.cmp(&a.deadline),
        ProjectSortMethod::UrgencyDesc => b.urgency.rank().cmp(&a.urgency.rank()),
        ProjectSortMethod::UrgencyAsc => a.urgency.rank().cmp(&b.urgency.rank()),
        ProjectSortMethod::Status => a.status.as_str().cmp(b.status.as_str()),
        ProjectSortMethod::Name => a.name.cmp(&b.name),
    }
}

/// Stable-sort projects in place by `method`.
pub fn sort_projects(projects: &mut [Project], method: ProjectSortMethod) {
    projects.sort_by(|a, b| compare_projects(method, a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, ProjectStatus, TaskContext, TaskStatus};
    use chrono::Duration;
    use uuid::Uuid;

    fn task(title: &str, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            project_id: None,
            title: title.to_string(),
            description: String::new(),
            tags: vec![],
            deadline: None,
            priority: Some(Priority::Medium),
            urgency: Some(Urgency::Medium),
            status,
            assignee: String::new(),
            context: TaskContext::Other,
            order: 0,
            completed_at: None,
            created_at_utc: now,
            updated_at_utc: now,
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    const ALL_METHODS: [TaskSortMethod; 11] = [
        TaskSortMethod::Smart,
        TaskSortMethod::Order,
        TaskSortMethod::DeadlineAsc,
        TaskSortMethod::DeadlineDesc,
        TaskSortMethod::UrgencyDesc,
        TaskSortMethod::UrgencyAsc,
        TaskSortMethod::Status,
        TaskSortMethod::Title,
        TaskSortMethod::Project,
        TaskSortMethod::IdAsc,
        TaskSortMethod::IdDesc,
    ];

    #[test]
    fn test_parse_aliases() {
        assert_eq!(TaskSortMethod::parse("SMART"), TaskSortMethod::Smart);
        assert_eq!(TaskSortMethod::parse("intelligent"), TaskSortMethod::Smart);
        assert_eq!(TaskSortMethod::parse("name"), TaskSortMethod::Title);
        assert_eq!(TaskSortMethod::parse("projectid"), TaskSortMethod::Project);
        assert_eq!(TaskSortMethod::parse("urgency"), TaskSortMethod::UrgencyDesc);
        assert_eq!(TaskSortMethod::parse("deadline"), TaskSortMethod::DeadlineAsc);
    }

    #[test]
    fn test_unknown_method_falls_back_to_id() {
        assert_eq!(TaskSortMethod::parse("bogus"), TaskSortMethod::IdAsc);
        assert_eq!(TaskSortMethod::parse(""), TaskSortMethod::IdAsc);
        assert_eq!(ProjectSortMethod::parse("smart"), ProjectSortMethod::IdAsc);
    }

    #[test]
    fn test_order_sort_follows_manual_positions() {
        let mut a = task("A", TaskStatus::NotStarted);
        let mut b = task("B", TaskStatus::NotStarted);
        let mut c = task("C", TaskStatus::NotStarted);
        c.order = 0;
        a.order = 1;
        b.order = 2;
        let arranged = arrange_tasks(vec![a, b, c], TaskSortMethod::Order, Utc::now());
        assert_eq!(titles(&arranged), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_completed_tasks_last_for_every_method() {
        let now = Utc::now();
        let mut done = task("done", TaskStatus::Completed);
        done.priority = Some(Priority::Urgent);
        done.urgency = Some(Urgency::High);
        done.deadline = Some(now - Duration::days(3));
        done.order = -5;
        let active_a = task("a", TaskStatus::OnHold);
        let active_b = task("b", TaskStatus::InProgress);

        for method in ALL_METHODS {
            let arranged = arrange_tasks(
                vec![done.clone(), active_a.clone(), active_b.clone()],
                method,
                now,
            );
            assert_eq!(arranged.len(), 3);
            assert_eq!(arranged[2].title, "done", "{:?}", method);
        }
    }

    #[test]
    fn test_smart_sort_descending_by_score() {
        let now = Utc::now();
        let low = task("low", TaskStatus::OnHold);
        let mut urgent = task("urgent", TaskStatus::NotStarted);
        urgent.priority = Some(Priority::Urgent);
        urgent.deadline = Some(now + Duration::days(1));
        let mid = task("mid", TaskStatus::InProgress);

        let arranged = arrange_tasks(vec![low, urgent, mid], TaskSortMethod::Smart, now);
        assert_eq!(titles(&arranged), vec!["urgent", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let first = task("same", TaskStatus::NotStarted);
        let second = task("same", TaskStatus::NotStarted);
        let (first_id, second_id) = (first.id, second.id);
        let arranged = arrange_tasks(vec![first, second], TaskSortMethod::Title, Utc::now());
        assert_eq!(arranged[0].id, first_id);
        assert_eq!(arranged[1].id, second_id);
    }

    #[test]
    fn test_missing_deadline_sorts_first_ascending() {
        let now = Utc::now();
        let mut dated = task("dated", TaskStatus::NotStarted);
        dated.deadline = Some(now);
        let undated = task("undated", TaskStatus::NotStarted);
        let arranged = arrange_tasks(vec![dated, undated], TaskSortMethod::DeadlineAsc, now);
        assert_eq!(titles(&arranged), vec!["undated", "dated"]);
    }

    #[test]
    fn test_urgency_desc_ranks_unknown_last() {
        let mut high = task("high", TaskStatus::NotStarted);
        high.urgency = Some(Urgency::High);
        let mut unknown = task("unknown", TaskStatus::NotStarted);
        unknown.urgency = None;
        unknown.priority = None;
        let low = {
            let mut t = task("low", TaskStatus::NotStarted);
            t.urgency = Some(Urgency::Low);
            t
        };
        let arranged = arrange_tasks(
            vec![unknown, low, high],
            TaskSortMethod::UrgencyDesc,
            Utc::now(),
        );
        assert_eq!(titles(&arranged), vec!["high", "low", "unknown"]);
    }

    #[test]
    fn test_project_sort_puts_unassigned_first() {
        let mut linked = task("linked", TaskStatus::NotStarted);
        linked.project_id = Some(Uuid::now_v7());
        let loose = task("loose", TaskStatus::NotStarted);
        let arranged = arrange_tasks(vec![linked, loose], TaskSortMethod::Project, Utc::now());
        assert_eq!(titles(&arranged), vec!["loose", "linked"]);
    }

    #[test]
    fn test_id_desc_reverses_creation_order() {
        let mut older = task("older", TaskStatus::NotStarted);
        older.id = Uuid::from_u128(1);
        let mut newer = task("newer", TaskStatus::NotStarted);
        newer.id = Uuid::from_u128(2);
        let arranged = arrange_tasks(vec![older, newer], TaskSortMethod::IdDesc, Utc::now());
        assert_eq!(titles(&arranged), vec!["newer", "older"]);
    }

    #[test]
    fn test_project_sorts() {
        let now = Utc::now();
        let project = |name: &str, days: i64, urgency: Urgency| Project {
            id: Uuid::now_v7(),
            owner_id: Uuid::nil(),
            name: name.to_string(),
            description: String::new(),
            tags: vec![],
            deadline: now + Duration::days(days),
            urgency,
            status: ProjectStatus::Planning,
            created_at_utc: now,
            updated_at_utc: now,
        };
        let mut projects = vec![
            project("b", 5, Urgency::Low),
            project("a", 1, Urgency::High),
            project("c", 3, Urgency::Medium),
        ];

        sort_projects(&mut projects, ProjectSortMethod::DeadlineAsc);
        assert_eq!(projects[0].name, "a");

        sort_projects(&mut projects, ProjectSortMethod::UrgencyAsc);
        assert_eq!(projects[0].name, "b");

        sort_projects(&mut projects, ProjectSortMethod::Name);
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
