use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::confirm::{self, check_register, DomainError, Outcome};
use crate::mod_arith::MODULUS;

/// Fixed inputs for one exhaustive search over the third register.
#[derive(Copy, Clone, Debug)]
pub struct SearchParams {
    pub a0: u16,
    pub b0: u16,
    pub target: u16,
    /// Exclusive upper bound on the candidate range `1..upper_bound`.
    pub upper_bound: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams { a0: 4, b0: 1, target: 6, upper_bound: MODULUS }
    }
}

/// A candidate whose evaluation hit the target in the first register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub c: u16,
    pub outcome: Outcome,
}

/// Candidates between progress lines.
const PROGRESS_INTERVAL: u16 = 1024;

/// Walks every candidate in `1..upper_bound`, evaluating
/// `(a0, b0, candidate)` with a fresh memo table each time, and reports
/// every match. The whole range is always covered: uniqueness of a solution
/// is not assumed, so the search never stops at the first hit.
///
/// `on_match` is called as each match is found; all matches are also
/// returned at the end. Setting `cancelled` stops the search at the next
/// candidate boundary and returns the matches found so far. Finding no
/// match is a normal `Ok` outcome.
///
/// A bad `a0`, `b0` or `target` is a configuration error and fails the
/// whole search up front; there are no per-candidate failures.
pub fn search<F>(
    params: &SearchParams,
    cancelled: &AtomicBool,
    mut on_match: F,
) -> Result<Vec<Match>, DomainError>
where
    F: FnMut(&Match),
{
    check_register("a0", params.a0)?;
    check_register("b0", params.b0)?;
    check_register("target", params.target)?;
    if params.upper_bound > MODULUS {
        return Err(DomainError { register: "upper_bound", value: params.upper_bound });
    }

    let mut matches = Vec::new();
    for c in 1..params.upper_bound {
        if cancelled.load(Ordering::Relaxed) {
            debug!("cancelled before candidate {}", c);
            break;
        }
        let c = c as u16;
        let outcome = confirm::evaluate(params.a0, params.b0, c)?;
        if outcome.a == params.target {
            let m = Match { c, outcome };
            on_match(&m);
            matches.push(m);
        }
        if c % PROGRESS_INTERVAL == 0 {
            debug!("{} candidates tried, {} match(es)", c, matches.len());
        }
    }
    Ok(matches)
}
