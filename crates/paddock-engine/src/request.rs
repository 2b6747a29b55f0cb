//! Checkout request validation.
//!
//! A wire request is a JSON object mapping pool tokens to requested
//! counts. Counts arrive as JSON strings on the original wire format;
//! plain numbers are accepted too. Validation is all-or-nothing: if any
//! token fails to resolve the whole request is rejected before the
//! inventory store is touched.

use serde_json::{Map, Value};

use paddock_core::error::AppError;
use paddock_core::result::AppResult;
use paddock_core::types::checkout::{CheckoutPlan, PlanEntry};

use crate::catalog::PoolCatalog;

/// Validate a wire request against the catalog and produce an ordered plan.
///
/// Entries keep the caller's key order (the JSON map preserves insertion
/// order) and carry the original token alongside the canonical pool name.
pub fn build_plan(catalog: &PoolCatalog, request: &Map<String, Value>) -> AppResult<CheckoutPlan> {
    if request.is_empty() {
        return Err(AppError::validation("Checkout request names no pools"));
    }

    let mut entries = Vec::with_capacity(request.len());
    let mut unknown = Vec::new();

    for (token, value) in request {
        if token.is_empty() {
            return Err(AppError::validation("Empty pool token"));
        }
        let count = parse_count(token, value)?;

        match catalog.resolve(token) {
            Some(pool) => entries.push(PlanEntry {
                token: token.clone(),
                pool: pool.to_string(),
                count,
            }),
            None => unknown.push(token.as_str()),
        }
    }

    if !unknown.is_empty() {
        return Err(AppError::not_found(format!(
            "Unknown pool token(s): {}",
            unknown.join(", ")
        )));
    }

    Ok(CheckoutPlan { entries })
}

/// Validate a `+`-joined path request (`pool1+pool2`), one machine each.
///
/// A token repeated in the path requests one more machine from that pool.
pub fn build_plan_from_path(catalog: &PoolCatalog, path: &str) -> AppResult<CheckoutPlan> {
    let mut request = Map::new();
    for token in path.split('+') {
        let count = request
            .get(token)
            .and_then(Value::as_u64)
            .unwrap_or(0)
            .saturating_add(1);
        request.insert(token.to_string(), Value::from(count));
    }
    build_plan(catalog, &request)
}

fn parse_count(token: &str, value: &Value) -> AppResult<u32> {
    let count = match value {
        Value::String(s) => s.parse::<u32>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };

    match count {
        Some(count) if count >= 1 => Ok(count),
        _ => Err(AppError::validation(format!(
            "Invalid count for pool token '{token}': expected an integer >= 1"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::config::AppConfig;
    use paddock_core::config::pools::PoolDefinition;
    use paddock_core::error::ErrorKind;

    fn catalog() -> PoolCatalog {
        let config = AppConfig {
            pools: vec![
                PoolDefinition {
                    name: "pool1".to_string(),
                    size: 5,
                },
                PoolDefinition {
                    name: "pool2".to_string(),
                    size: 10,
                },
            ],
            aliases: std::collections::HashMap::from([(
                "poolone".to_string(),
                "pool1".to_string(),
            )]),
            ..AppConfig::default()
        };
        PoolCatalog::from_config(&config)
    }

    fn request(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_plan_resolves_aliases_and_keeps_tokens() {
        let req = request(&[
            ("poolone", Value::from("1")),
            ("pool2", Value::from("2")),
        ]);
        let plan = build_plan(&catalog(), &req).expect("plan");

        assert_eq!(
            plan.entries,
            vec![
                PlanEntry {
                    token: "poolone".to_string(),
                    pool: "pool1".to_string(),
                    count: 1,
                },
                PlanEntry {
                    token: "pool2".to_string(),
                    pool: "pool2".to_string(),
                    count: 2,
                },
            ]
        );
    }

    #[test]
    fn test_any_unknown_token_rejects_whole_request() {
        let req = request(&[
            ("pool1", Value::from("1")),
            ("poolpoolpool", Value::from("1")),
        ]);
        let err = build_plan(&catalog(), &req).expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("poolpoolpool"));
    }

    #[test]
    fn test_numeric_counts_accepted() {
        let req = request(&[("pool1", Value::from(3))]);
        let plan = build_plan(&catalog(), &req).expect("plan");
        assert_eq!(plan.entries[0].count, 3);
    }

    #[test]
    fn test_zero_and_garbage_counts_rejected() {
        for bad in [Value::from("0"), Value::from("lots"), Value::Null] {
            let req = request(&[("pool1", bad)]);
            let err = build_plan(&catalog(), &req).expect_err("must fail");
            assert_eq!(err.kind, ErrorKind::Validation);
        }
    }

    #[test]
    fn test_empty_request_rejected() {
        let err = build_plan(&catalog(), &Map::new()).expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_path_form_aggregates_repeats() {
        let plan = build_plan_from_path(&catalog(), "pool1+pool2+pool1").expect("plan");
        assert_eq!(plan.entries.len(), 2);
        assert_eq!(plan.entries[0].pool, "pool1");
        assert_eq!(plan.entries[0].count, 2);
        assert_eq!(plan.entries[1].pool, "pool2");
        assert_eq!(plan.entries[1].count, 1);
    }

    #[test]
    fn test_path_form_unknown_token() {
        let err = build_plan_from_path(&catalog(), "pool1+nope").expect_err("must fail");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
