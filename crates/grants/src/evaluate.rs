//! Grant evaluation.

use crate::{AccessLevel, PathGrant};
use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a grant path is matched against a requested path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixMatch {
    /// Plain string prefix. `/hr` matches `/hrs/x`.
    #[default]
    Literal,
    /// Prefix that must end on a path segment boundary. `/hr` matches `/hr`
    /// and `/hr/x` but not `/hrs/x`.
    Segment,
}

impl PrefixMatch {
    /// Whether `grant_path` matches `path` under this mode.
    pub fn matches(self, grant_path: &str, path: &str) -> bool {
        let Some(rest) = path.strip_prefix(grant_path) else {
            return false;
        };
        match self {
            PrefixMatch::Literal => true,
            PrefixMatch::Segment => {
                rest.is_empty() || grant_path.ends_with('/') || rest.starts_with('/')
            }
        }
    }
}

/// Why a request was denied. Only used for logging; callers always see the
/// same response regardless of the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No grant path matches the requested path.
    NoMatchingGrant,
    /// Some grant path matches, but none carries enough access.
    InsufficientAccess,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NoMatchingGrant => f.write_str("no matching grant"),
            DenyReason::InsufficientAccess => f.write_str("insufficient access"),
        }
    }
}

/// Result of evaluating a request against a grant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: DenyReason },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Grant evaluator with an explicit prefix matching policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    prefix_match: PrefixMatch,
}

impl Evaluator {
    pub fn new(prefix_match: PrefixMatch) -> Self {
        Self { prefix_match }
    }

    pub fn prefix_match(&self) -> PrefixMatch {
        self.prefix_match
    }

    /// Decide whether `grants` permit `method` on `path`.
    ///
    /// Allowed if at least one grant covers the request. There is no
    /// precedence between overlapping grants.
    pub fn evaluate(&self, path: &str, method: &Method, grants: &[PathGrant]) -> Decision {
        let required = AccessLevel::required_for(method);
        let mut path_matched = false;

        for grant in grants {
            if !self.prefix_match.matches(&grant.path, path) {
                continue;
            }
            if grant.access.satisfies(required) {
                return Decision::Allow;
            }
            path_matched = true;
        }

        Decision::Deny {
            reason: if path_matched {
                DenyReason::InsufficientAccess
            } else {
                DenyReason::NoMatchingGrant
            },
        }
    }
}

/// Evaluate with literal prefix matching.
pub fn evaluate(path: &str, method: &Method, grants: &[PathGrant]) -> Decision {
    Evaluator::default().evaluate(path, method, grants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipping_manager() -> Vec<PathGrant> {
        vec![
            PathGrant::read("/managers/"),
            PathGrant::read_write("/hr/shipping/"),
        ]
    }

    #[test]
    fn test_shipping_manager_scenario() {
        let grants = shipping_manager();

        assert!(evaluate("/managers/instructions.pdf", &Method::GET, &grants).is_allowed());
        assert_eq!(
            evaluate("/managers/instructions.pdf", &Method::POST, &grants),
            Decision::Deny {
                reason: DenyReason::InsufficientAccess
            }
        );
        assert!(evaluate("/hr/shipping/x", &Method::GET, &grants).is_allowed());
        assert!(evaluate("/hr/shipping/x", &Method::DELETE, &grants).is_allowed());
        assert_eq!(
            evaluate("/admin/x", &Method::GET, &grants),
            Decision::Deny {
                reason: DenyReason::NoMatchingGrant
            }
        );
    }

    #[test]
    fn test_read_only_worker() {
        let grants = vec![PathGrant::read("/hr/shipping/")];

        assert!(evaluate("/hr/shipping/x", &Method::GET, &grants).is_allowed());
        assert!(!evaluate("/hr/shipping/x", &Method::POST, &grants).is_allowed());
        assert!(!evaluate("/managers/x", &Method::GET, &grants).is_allowed());
    }

    #[test]
    fn test_empty_grants_deny_everything() {
        for method in [Method::GET, Method::HEAD, Method::POST, Method::DELETE] {
            for path in ["/", "", "/hr/shipping/x"] {
                assert!(!evaluate(path, &method, &[]).is_allowed());
            }
        }
    }

    #[test]
    fn test_read_write_covers_all_methods() {
        let grants = vec![PathGrant::read_write("/data/")];
        for method in [
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ] {
            assert!(evaluate("/data/a/b", &method, &grants).is_allowed());
        }
    }

    #[test]
    fn test_unrelated_write_grant_does_not_widen_read_grant() {
        let grants = vec![PathGrant::read("/docs/"), PathGrant::read_write("/tmp/")];
        assert!(!evaluate("/docs/a", &Method::PUT, &grants).is_allowed());
        assert!(evaluate("/tmp/a", &Method::PUT, &grants).is_allowed());
    }

    #[test]
    fn test_overlapping_grants_any_match_wins() {
        // Order of grants does not matter.
        let narrow_first = vec![PathGrant::read("/a/b/"), PathGrant::read_write("/a/")];
        let wide_first = vec![PathGrant::read_write("/a/"), PathGrant::read("/a/b/")];
        for grants in [narrow_first, wide_first] {
            assert!(evaluate("/a/b/c", &Method::POST, &grants).is_allowed());
        }
    }

    #[test]
    fn test_exact_path_matches() {
        let grants = vec![PathGrant::read("/hr/shipping/")];
        assert!(evaluate("/hr/shipping/", &Method::GET, &grants).is_allowed());
        assert!(!evaluate("/hr/shipping", &Method::GET, &grants).is_allowed());
    }

    #[test]
    fn test_literal_prefix_ignores_segment_boundary() {
        let grants = vec![PathGrant::read("/hr")];
        assert!(evaluate("/hrs/payroll", &Method::GET, &grants).is_allowed());
    }

    #[test]
    fn test_segment_prefix_respects_boundary() {
        let evaluator = Evaluator::new(PrefixMatch::Segment);
        let grants = vec![PathGrant::read("/hr")];

        assert!(evaluator.evaluate("/hr", &Method::GET, &grants).is_allowed());
        assert!(evaluator.evaluate("/hr/payroll", &Method::GET, &grants).is_allowed());
        assert!(!evaluator.evaluate("/hrs/payroll", &Method::GET, &grants).is_allowed());
    }

    #[test]
    fn test_segment_prefix_with_trailing_slash_grant() {
        let evaluator = Evaluator::new(PrefixMatch::Segment);
        let grants = vec![PathGrant::read_write("/hr/shipping/")];

        assert!(evaluator.evaluate("/hr/shipping/x", &Method::PUT, &grants).is_allowed());
        assert!(!evaluator.evaluate("/hr/shippingx", &Method::GET, &grants).is_allowed());
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let grants = shipping_manager();
        let first = evaluate("/managers/a", &Method::PATCH, &grants);
        for _ in 0..10 {
            assert_eq!(evaluate("/managers/a", &Method::PATCH, &grants), first);
        }
    }
}
