// ABOUTME: Picks the application process whose logs best represent a deployment.
// ABOUTME: Running first, then newest, then by name for a stable choice.

use crate::model::Process;
use std::cmp::Ordering;

/// Ordering of processes by how useful their logs are.
///
/// 1. Running < Unknown < Pending < Succeeded < Failed
/// 2. newer < older < no creation time
/// 3. lexical name order
pub fn by_logging(a: &Process, b: &Process) -> Ordering {
    a.phase
        .log_rank()
        .cmp(&b.phase.log_rank())
        .then_with(|| match (a.created, b.created) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.name.cmp(&b.name))
}

/// The best candidate for log viewing, if there is any.
pub fn best_for_logging(mut candidates: Vec<Process>) -> Option<Process> {
    candidates.sort_by(by_logging);
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProcessPhase;
    use chrono::{TimeZone, Utc};

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn names(mut processes: Vec<Process>) -> Vec<String> {
        processes.sort_by(by_logging);
        processes.into_iter().map(|p| p.name.into_inner()).collect()
    }

    #[test]
    fn running_beats_newer_non_running() {
        let old_running = Process::new("a-old", ProcessPhase::Running).created_at(at(0));
        let new_pending = Process::new("b-new", ProcessPhase::Pending).created_at(at(100));
        assert_eq!(names(vec![new_pending, old_running]), ["a-old", "b-new"]);
    }

    #[test]
    fn newer_wins_within_a_phase() {
        let older = Process::new("x", ProcessPhase::Running).created_at(at(0));
        let newer = Process::new("y", ProcessPhase::Running).created_at(at(10));
        assert_eq!(names(vec![older, newer]), ["y", "x"]);
    }

    #[test]
    fn missing_creation_time_sorts_last_within_a_phase() {
        let unknown_age = Process::new("a", ProcessPhase::Running);
        let dated = Process::new("b", ProcessPhase::Running).created_at(at(0));
        assert_eq!(names(vec![unknown_age, dated]), ["b", "a"]);
    }

    #[test]
    fn ties_break_by_name() {
        let b = Process::new("web-b", ProcessPhase::Running).created_at(at(5));
        let a = Process::new("web-a", ProcessPhase::Running).created_at(at(5));
        let c = Process::new("web-c", ProcessPhase::Running).created_at(at(5));
        assert_eq!(names(vec![b, c, a]), ["web-a", "web-b", "web-c"]);
    }

    #[test]
    fn selection_is_independent_of_input_order() {
        let make = || {
            vec![
                Process::new("p1", ProcessPhase::Succeeded).created_at(at(50)),
                Process::new("p2", ProcessPhase::Running).created_at(at(10)),
                Process::new("p3", ProcessPhase::Running).created_at(at(10)),
                Process::new("p4", ProcessPhase::Failed).created_at(at(90)),
            ]
        };
        let forward = best_for_logging(make()).unwrap();
        let mut reversed = make();
        reversed.reverse();
        let backward = best_for_logging(reversed).unwrap();
        assert_eq!(forward.name, backward.name);
        assert_eq!(forward.name.as_str(), "p2");
    }

    #[test]
    fn no_candidates_yields_none() {
        assert!(best_for_logging(Vec::new()).is_none());
    }
}
