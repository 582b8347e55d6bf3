//! Enhancement pipeline.
//!
//! Decorates a bare remote [`Task`] with the board-facing fields the API
//! does not provide. Shapes are fixed, contents are drawn at random from
//! fixed pools, so the same task enhanced twice comes out different: call
//! [`Enhancer::enhance`] once per remotely-sourced task.
//!
//! The random source is an owned [`StdRng`]; [`Enhancer::seeded`] makes the
//! pipeline reproducible.

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::fields::Status;
use crate::task::{Checklist, EnhancedTask, Task, TaskId};

/// Owner recorded on tasks built on this client.
pub const LOCAL_OWNER_ID: u64 = 5;

const DESCRIPTIONS: [&str; 10] = [
    "Review and update documentation for the new features",
    "Coordinate with team members on project deliverables",
    "Analyze current processes and identify improvements",
    "Prepare materials for upcoming presentation",
    "Conduct thorough review of submitted reports",
    "Schedule and facilitate training sessions",
    "Develop and roll out new procedures",
    "Ensure all records are up to date and accurate",
    "Plan and coordinate upcoming team activities",
    "Revise policies to reflect recent changes",
];

/// Days of May 2024 the date pool draws from.
const POOL_DAYS: [u32; 7] = [26, 28, 18, 8, 25, 24, 10];

const AVATARS: [u8; 3] = [1, 2, 3];

/// Caller-supplied fields of a task built on this client.
#[derive(Debug, Clone)]
pub struct LocalDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Randomised decoration with an owned, optionally seeded, random source.
pub struct Enhancer {
    rng: StdRng,
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl Enhancer {
    pub fn from_os_rng() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Wrap a remote task. An existing status is kept; everything else is
    /// drawn fresh.
    pub fn enhance(&mut self, task: Task) -> EnhancedTask {
        let rng = &mut self.rng;
        let status = match task.status {
            Some(status) => status,
            None => infer_status(task.completed, rng),
        };
        EnhancedTask {
            id: task.id,
            title: task.title,
            completed: task.completed,
            user_id: task.user_id,
            status,
            description: pick_description(rng).to_string(),
            start_date: pick_date(rng),
            end_date: pick_date(rng),
            comments: rng.random_range(1..=25),
            attachments: rng.random_range(1..=15),
            checklist: random_checklist(rng),
            avatars: random_avatars(rng),
        }
    }

    /// Build a not-yet-synced task for the column `draft.status`.
    pub fn draft_local(&mut self, draft: LocalDraft, id: TaskId) -> EnhancedTask {
        let rng = &mut self.rng;
        EnhancedTask {
            id,
            title: draft.title,
            completed: false,
            user_id: LOCAL_OWNER_ID,
            status: draft.status,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            comments: rng.random_range(1..=25),
            attachments: rng.random_range(1..=15),
            checklist: random_checklist(rng),
            avatars: random_avatars(rng),
        }
    }
}

/// Id for a task built now: the current Unix time in milliseconds.
pub fn local_id_now() -> TaskId {
    TaskId::try_from(Utc::now().timestamp_millis()).unwrap_or(1)
}

/// Completed tasks land in DONE 70% of the time, otherwise NEEDS_REVIEW;
/// open tasks land in TODO 60% of the time, otherwise IN_PROGRESS.
pub fn infer_status<R: Rng + ?Sized>(completed: bool, rng: &mut R) -> Status {
    if completed {
        if rng.random_bool(0.7) {
            Status::Done
        } else {
            Status::NeedsReview
        }
    } else if rng.random_bool(0.6) {
        Status::Todo
    } else {
        Status::InProgress
    }
}

fn pick_description<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    DESCRIPTIONS[rng.random_range(0..DESCRIPTIONS.len())]
}

fn pick_date<R: Rng + ?Sized>(rng: &mut R) -> NaiveDate {
    let day = POOL_DAYS[rng.random_range(0..POOL_DAYS.len())];
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap_or_default()
}

fn random_checklist<R: Rng + ?Sized>(rng: &mut R) -> Option<Checklist> {
    if !rng.random_bool(0.6) {
        return None;
    }
    let total = rng.random_range(3..=10);
    let done = rng.random_range(1..=total);
    Some(Checklist { done, total })
}

/// One to three distinct avatars in shuffled order.
fn random_avatars<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    let count = rng.random_range(1..=AVATARS.len());
    let mut avatars = AVATARS.to_vec();
    avatars.shuffle(rng);
    avatars.truncate(count);
    avatars
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn remote(id: TaskId, completed: bool, status: Option<Status>) -> Task {
        Task { id, title: format!("Todo {id}"), completed, user_id: 1, status }
    }

    fn any_status() -> impl Strategy<Value = Status> {
        prop_oneof![
            Just(Status::Todo),
            Just(Status::InProgress),
            Just(Status::NeedsReview),
            Just(Status::Done),
        ]
    }

    proptest! {
        #[test]
        fn prop_enhanced_shape(seed in any::<u64>(), id in 1u64..100_000, completed in any::<bool>()) {
            let out = Enhancer::seeded(seed).enhance(remote(id, completed, None));
            prop_assert_eq!(out.id, id);
            prop_assert!(!out.description.is_empty());
            prop_assert!((1..=25).contains(&out.comments));
            prop_assert!((1..=15).contains(&out.attachments));
            prop_assert!((1..=3).contains(&out.avatars.len()));
            prop_assert!(out.avatars.iter().all(|a| (1..=3).contains(a)));
            let distinct: HashSet<_> = out.avatars.iter().collect();
            prop_assert_eq!(distinct.len(), out.avatars.len());
        }

        #[test]
        fn prop_status_follows_completion(seed in any::<u64>(), completed in any::<bool>()) {
            let status = Enhancer::seeded(seed).enhance(remote(1, completed, None)).status;
            if completed {
                prop_assert!(matches!(status, Status::Done | Status::NeedsReview));
            } else {
                prop_assert!(matches!(status, Status::Todo | Status::InProgress));
            }
        }

        #[test]
        fn prop_existing_status_kept(seed in any::<u64>(), completed in any::<bool>(), status in any_status()) {
            let out = Enhancer::seeded(seed).enhance(remote(1, completed, Some(status)));
            prop_assert_eq!(out.status, status);
        }

        #[test]
        fn prop_checklist_bounds(seed in any::<u64>()) {
            let mut enhancer = Enhancer::seeded(seed);
            for id in 1..20 {
                if let Some(c) = enhancer.enhance(remote(id, false, None)).checklist {
                    prop_assert!(c.done >= 1 && c.done <= c.total);
                    prop_assert!((3..=10).contains(&c.total));
                }
            }
        }
    }

    #[test]
    fn test_seeded_enhancer_is_reproducible() {
        let a = Enhancer::seeded(42).enhance(remote(3, true, None));
        let b = Enhancer::seeded(42).enhance(remote(3, true, None));
        assert_eq!(a, b);
    }

    #[test]
    fn test_dates_come_from_pool() {
        let mut enhancer = Enhancer::seeded(7);
        for id in 1..50 {
            let out = enhancer.enhance(remote(id, false, None));
            for date in [out.start_date, out.end_date] {
                assert_eq!(date.format("%Y-%m").to_string(), "2024-05");
                assert!(POOL_DAYS.contains(&chrono::Datelike::day(&date)));
            }
        }
    }

    #[test]
    fn test_draft_local_keeps_caller_fields() {
        let draft = LocalDraft {
            title: "Draft policy".into(),
            description: "Write it".into(),
            status: Status::NeedsReview,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
        };
        let task = Enhancer::seeded(1).draft_local(draft, 1_717_000_000_000);
        assert_eq!(task.id, 1_717_000_000_000);
        assert_eq!(task.status, Status::NeedsReview);
        assert_eq!(task.user_id, LOCAL_OWNER_ID);
        assert!(!task.completed);
        assert_eq!(task.description, "Write it");
        if let Some(c) = task.checklist {
            assert!(c.done <= c.total);
        }
    }

    #[test]
    fn test_local_id_is_positive() {
        assert!(local_id_now() > 1_600_000_000_000);
    }
}
