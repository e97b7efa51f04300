//! Reduction of per-backend outcomes into one caller-facing status.
//!
//! A 503 outcome means the backend could not be reached and is not
//! treated as a caller-visible error. Any other outcome of 400 or above
//! overrides the status, and when several do, the highest code wins.
//! The result is independent of the order outcomes are scanned in.

use hyper::StatusCode;

use super::dispatch::Outcome;
use crate::config::model::Baseline;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedResult {
    pub status: StatusCode,
    /// One entry per backend, in backend-set order.
    pub outcomes: Vec<Outcome>,
}

impl AggregatedResult {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.as_u16() >= 400
    }
}

#[must_use]
pub fn aggregate(outcomes: Vec<Outcome>, baseline: Baseline) -> AggregatedResult {
    AggregatedResult {
        status: reduce_status(&outcomes, baseline),
        outcomes,
    }
}

fn overrides(status: StatusCode) -> bool {
    status.as_u16() >= 400 && status.as_u16() != StatusCode::SERVICE_UNAVAILABLE.as_u16()
}

#[must_use]
pub fn reduce_status(outcomes: &[Outcome], baseline: Baseline) -> StatusCode {
    let worst = outcomes
        .iter()
        .map(|o| o.status)
        .filter(|s| overrides(*s))
        .max_by_key(StatusCode::as_u16);
    if let Some(status) = worst {
        return status;
    }

    match baseline {
        Baseline::Success => StatusCode::OK,
        Baseline::Failure => {
            let answered = outcomes
                .iter()
                .any(|o| o.status != StatusCode::SERVICE_UNAVAILABLE);
            if answered {
                StatusCode::OK
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(backend: &str, code: u16) -> Outcome {
        Outcome::answered(backend.into(), StatusCode::from_u16(code).unwrap())
    }

    fn outcomes(codes: &[u16]) -> Vec<Outcome> {
        codes
            .iter()
            .enumerate()
            .map(|(i, c)| outcome(&format!("b{i}:80"), *c))
            .collect()
    }

    fn permutations(items: &[Outcome]) -> Vec<Vec<Outcome>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut result = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head.clone());
                result.push(tail);
            }
        }
        result
    }

    #[test]
    fn all_success_is_ok() {
        for n in 1..=5 {
            let set = outcomes(&vec![200; n]);
            assert_eq!(reduce_status(&set, Baseline::Success), StatusCode::OK);
            assert_eq!(reduce_status(&set, Baseline::Failure), StatusCode::OK);
        }
    }

    #[test]
    fn unreachable_backend_is_transparent() {
        let set = outcomes(&[200, 503]);
        assert_eq!(reduce_status(&set, Baseline::Success), StatusCode::OK);
        assert_eq!(reduce_status(&set, Baseline::Failure), StatusCode::OK);
    }

    #[test]
    fn client_error_overrides_success() {
        let set = outcomes(&[404, 200]);
        assert_eq!(reduce_status(&set, Baseline::Success), StatusCode::NOT_FOUND);
    }

    #[test]
    fn highest_error_wins_in_every_order() {
        let set = outcomes(&[404, 200, 502, 503, 500, 504]);
        for perm in permutations(&set) {
            assert_eq!(
                reduce_status(&perm, Baseline::Success),
                StatusCode::GATEWAY_TIMEOUT
            );
        }
    }

    #[test]
    fn unreachable_never_overrides_other_errors() {
        let set = outcomes(&[503, 409, 503]);
        for perm in permutations(&set) {
            assert_eq!(reduce_status(&perm, Baseline::Failure), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn all_unreachable_follows_baseline() {
        let set = outcomes(&[503, 503]);
        assert_eq!(reduce_status(&set, Baseline::Success), StatusCode::OK);
        assert_eq!(
            reduce_status(&set, Baseline::Failure),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn redirects_and_informational_do_not_override() {
        let set = outcomes(&[301, 204, 399]);
        assert_eq!(reduce_status(&set, Baseline::Success), StatusCode::OK);
    }

    #[test]
    fn nonstandard_codes_are_compared_numerically() {
        let set = outcomes(&[599, 451, 200]);
        assert_eq!(reduce_status(&set, Baseline::Success).as_u16(), 599);
    }

    #[test]
    fn aggregate_keeps_outcome_order() {
        let set = outcomes(&[200, 404, 503]);
        let result = aggregate(set.clone(), Baseline::Success);
        assert_eq!(result.outcomes, set);
        assert!(result.is_error());
    }
}
