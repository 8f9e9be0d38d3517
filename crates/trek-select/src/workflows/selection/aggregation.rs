use std::collections::{BTreeMap, HashMap, HashSet};

use super::domain::{AggregationMethod, Program, ProgramId, ProgramScore};

/// Fold a non-empty list of raw interest scores into one representative
/// value. Returns `None` for an empty slice so callers can skip programs
/// nobody has scored rather than inventing a zero.
pub fn aggregate(scores: &[i32], method: AggregationMethod) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }

    let value = match method {
        AggregationMethod::Total => scores.iter().copied().map(f64::from).sum(),
        AggregationMethod::Average => {
            let total: f64 = scores.iter().copied().map(f64::from).sum();
            total / scores.len() as f64
        }
        AggregationMethod::Median => median(scores),
        AggregationMethod::Mode => mode(scores),
    };

    Some(value)
}

fn median(scores: &[i32]) -> f64 {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    if n % 2 == 0 {
        f64::from(sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        f64::from(sorted[n / 2])
    }
}

/// Most frequent value. Ties break toward the value encountered first, so
/// the result is deterministic for a fixed row order.
fn mode(scores: &[i32]) -> f64 {
    let mut counts: HashMap<i32, u32> = HashMap::new();
    for &score in scores {
        *counts.entry(score).or_insert(0) += 1;
    }

    let mut best_value = scores[0];
    let mut best_count = 0;
    for &score in scores {
        let count = counts[&score];
        if count > best_count {
            best_count = count;
            best_value = score;
        }
    }

    f64::from(best_value)
}

/// Join a crew's score facts against the program catalog and aggregate each
/// program's scores with the requested method.
///
/// Facts referencing programs absent from the catalog are silently dropped
/// (inner-join semantics), and programs nobody scored produce no entry. Row
/// order within each program group is preserved, which pins down the `Mode`
/// tie-break.
pub fn program_score_table(
    facts: &[ProgramScore],
    catalog: &[Program],
    method: AggregationMethod,
) -> BTreeMap<ProgramId, f64> {
    let known: HashSet<ProgramId> = catalog.iter().map(|program| program.id).collect();

    let mut grouped: BTreeMap<ProgramId, Vec<i32>> = BTreeMap::new();
    for fact in facts {
        if known.contains(&fact.program_id) {
            grouped.entry(fact.program_id).or_default().push(fact.score);
        }
    }

    grouped
        .into_iter()
        .filter_map(|(program_id, scores)| {
            aggregate(&scores, method).map(|value| (program_id, value))
        })
        .collect()
}
