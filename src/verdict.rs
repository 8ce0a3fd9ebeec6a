//! Result aggregation
//!
//! A judging's final verdict is determined from its ordered testcase run
//! results through a configurable priority table: the result with the
//! numerically highest priority wins, and at equal priority the first
//! occurring result (lowest testcase rank) wins.
//!
//! The priority convention is deliberately inverted relative to intuition:
//! error classes (`timelimit`, `run-error`, ...) carry high priorities and
//! `correct` carries the lowest. A result of maximal priority can never be
//! displaced by later testcases, so under lazy evaluation judging stops
//! there; `correct` can only be the final verdict once every testcase has
//! run and nothing outranked it.

use std::collections::HashMap;

use crate::error::{AppError, AppResult};

/// Apply the configured result remap (e.g. disabling `no-output` as a
/// distinct verdict by mapping it to `wrong-answer`).
pub fn remap_result<'a>(result: &'a str, remap: &'a HashMap<String, String>) -> &'a str {
    remap.get(result).map(String::as_str).unwrap_or(result)
}

/// The maximal priority configured in the table
pub fn max_priority(priorities: &HashMap<String, i32>) -> i32 {
    priorities.values().copied().max().unwrap_or(0)
}

/// Determine the final result for a judging given the ordered run results
/// of all its testcases, `None` standing for a testcase that has not run.
///
/// Returns `Ok(None)` while no verdict can be determined yet: some
/// testcase is unreported and nothing of maximal priority occurred.
/// An unknown result string is a contract violation.
pub fn final_result(
    run_results: &[Option<String>],
    priorities: &HashMap<String, i32>,
) -> AppResult<Option<String>> {
    let mut have_unreported = false;
    let mut best: Option<&str> = None;
    let mut best_priority = i32::MIN;

    for run_result in run_results {
        match run_result {
            None => {
                have_unreported = true;
                break;
            }
            Some(result) => {
                let priority = *priorities.get(result.as_str()).ok_or_else(|| {
                    AppError::InvalidInput(format!("unknown run result '{}'", result))
                })?;
                // strictly greater: equal priority keeps the earlier testcase
                if priority > best_priority {
                    best = Some(result);
                    best_priority = priority;
                }
            }
        }
    }

    if have_unreported && best_priority < max_priority(priorities) {
        return Ok(None);
    }

    Ok(best.map(String::from))
}

/// Whether judging may finalize now: either every testcase has run, or
/// lazy evaluation is enabled and the verdict is already determined.
pub fn may_finalize(reported: usize, total: usize, lazy_eval: bool) -> bool {
    reported == total || lazy_eval
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::results::*;

    fn prio(pairs: &[(&str, i32)]) -> HashMap<String, i32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn runs(results: &[Option<&str>]) -> Vec<Option<String>> {
        results.iter().map(|r| r.map(String::from)).collect()
    }

    #[test]
    fn all_correct_yields_correct() {
        let p = prio(&[(WRONG_ANSWER, 30), (CORRECT, 1)]);
        let result = final_result(&runs(&[Some(CORRECT), Some(CORRECT)]), &p).unwrap();
        assert_eq!(result.as_deref(), Some(CORRECT));
    }

    #[test]
    fn correct_needs_every_testcase() {
        let p = prio(&[(WRONG_ANSWER, 30), (CORRECT, 1)]);
        // one testcase unreported: correct is not maximal priority, so no
        // verdict yet even though everything so far passed
        let result = final_result(&runs(&[Some(CORRECT), None, Some(CORRECT)]), &p).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn maximal_priority_short_circuits() {
        let p = prio(&[(WRONG_ANSWER, 30), (CORRECT, 1)]);
        // wrong-answer is the maximal priority here, so the verdict is
        // final with testcases 2 and 3 never executed
        let result = final_result(&runs(&[Some(WRONG_ANSWER), None, None]), &p).unwrap();
        assert_eq!(result.as_deref(), Some(WRONG_ANSWER));
    }

    #[test]
    fn non_maximal_error_does_not_short_circuit() {
        let p = prio(&[(TIMELIMIT, 99), (WRONG_ANSWER, 30), (CORRECT, 1)]);
        let result = final_result(&runs(&[Some(WRONG_ANSWER), None]), &p).unwrap();
        assert_eq!(result, None);

        // ... but it wins once all testcases have run
        let result = final_result(&runs(&[Some(WRONG_ANSWER), Some(CORRECT)]), &p).unwrap();
        assert_eq!(result.as_deref(), Some(WRONG_ANSWER));
    }

    #[test]
    fn equal_priority_keeps_first_occurrence() {
        let p = prio(&[(TIMELIMIT, 99), (RUN_ERROR, 99), (CORRECT, 1)]);
        let result =
            final_result(&runs(&[Some(RUN_ERROR), Some(TIMELIMIT)]), &p).unwrap();
        assert_eq!(result.as_deref(), Some(RUN_ERROR));
    }

    #[test]
    fn aggregation_is_deterministic() {
        let p = prio(&[(TIMELIMIT, 99), (WRONG_ANSWER, 30), (CORRECT, 1)]);
        let sequence = runs(&[Some(CORRECT), Some(WRONG_ANSWER), Some(CORRECT)]);
        let first = final_result(&sequence, &p).unwrap();
        for _ in 0..10 {
            assert_eq!(final_result(&sequence, &p).unwrap(), first);
        }
    }

    #[test]
    fn unknown_result_is_rejected() {
        let p = prio(&[(CORRECT, 1)]);
        assert!(final_result(&runs(&[Some("segfault")]), &p).is_err());
    }

    #[test]
    fn remap_passes_through_unmapped_results() {
        let mut remap = HashMap::new();
        remap.insert(NO_OUTPUT.to_string(), WRONG_ANSWER.to_string());
        assert_eq!(remap_result(NO_OUTPUT, &remap), WRONG_ANSWER);
        assert_eq!(remap_result(TIMELIMIT, &remap), TIMELIMIT);
    }

    #[test]
    fn may_finalize_rules() {
        assert!(may_finalize(3, 3, false));
        assert!(may_finalize(1, 3, true));
        assert!(!may_finalize(1, 3, false));
    }
}
