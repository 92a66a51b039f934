//! Candidate selection (SELECT step).

use std::cmp::Ordering;

use super::evaluate::Candidate;

/// Highest-utility candidate.
///
/// Ties go to the lower movement cost, then to the earlier enumeration order.
pub fn select_best(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(current) if !is_better(candidate, current) => Some(current),
        _ => Some(candidate),
    })
}

fn is_better(a: &Candidate, b: &Candidate) -> bool {
    let by_utility = a.utility.total_cmp(&b.utility);
    let by_cost = b.cost.cost().total_cmp(&a.cost.cost());
    let by_order = b.order.cmp(&a.order);
    by_utility.then(by_cost).then(by_order) == Ordering::Greater
}
