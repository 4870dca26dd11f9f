use divergen::config::AgentConfig;
use divergen::llm::{Role, ScriptedClient};
use divergen::types::{Bounds, DiversityRequest, PoolSummary};
use divergen::{DiversityAgent, DiversityOutcome};
use ndarray::{arr1, arr2, Array2};
use serde_json::json;

const POOL_SIZE: usize = 3;
const N_VARS: usize = 2;

/// Request with a 3x2 pool and a minimal summary bundle
fn create_test_request() -> DiversityRequest {
    DiversityRequest {
        parent_pool: arr2(&[[0.1, 0.9], [0.4, 0.5], [0.8, 0.2]]),
        parent_objectives: arr2(&[[1.2], [0.8], [1.5]]),
        history: None,
        bounds: Some(Bounds::unit()),
        summary: PoolSummary {
            param_param_corr: arr2(&[[1.0, -0.2], [-0.2, 1.0]]),
            param_obj_corr: arr2(&[[0.3], [-0.6]]),
            pca_loadings: arr2(&[[0.7, 0.7], [0.7, -0.7]]),
            pca_explained_variance: arr1(&[0.7, 0.3]),
        },
    }
}

fn create_test_config(max_retries: usize) -> AgentConfig {
    AgentConfig {
        max_retries,
        ..AgentConfig::default()
    }
}

/// Well-formed reply covering the whole pool
fn valid_reply() -> String {
    json!([
        {"values": [0.15, 0.85], "rationale": "spread sigma_0"},
        {"values": [0.45, 0.55], "rationale": "hold the middle"},
        {"values": [0.75, 0.25], "rationale": "stabilize sigma_1"},
    ])
    .to_string()
}

#[test]
fn test_valid_reply_replaces_pool() {
    let client = ScriptedClient::repeating(valid_reply());
    let agent = DiversityAgent::new(&client, create_test_config(10));
    let request = create_test_request();

    let outcome = agent.propose(&request).expect("request is well-formed");

    match &outcome {
        DiversityOutcome::Replaced { pool, rationales } => {
            assert_eq!(pool.dim(), (POOL_SIZE, N_VARS));
            assert_eq!(*pool, arr2(&[[0.15, 0.85], [0.45, 0.55], [0.75, 0.25]]));
            assert_eq!(rationales.len(), POOL_SIZE);
            assert_eq!(rationales[0], "spread sigma_0");
        }
        DiversityOutcome::Unchanged { .. } => panic!("valid reply must be accepted"),
    }

    assert_eq!(client.calls(), 1, "a valid first reply needs one call");
    println!("✓ Valid reply accepted on the first attempt");
}

#[test]
fn test_garbage_replies_fall_back_to_parent_pool() {
    let client = ScriptedClient::repeating("I cannot produce JSON today.");
    let agent = DiversityAgent::new(&client, create_test_config(4));
    let request = create_test_request();

    let outcome = agent.propose(&request).expect("request is well-formed");

    match &outcome {
        DiversityOutcome::Unchanged { pool, last_response } => {
            assert_eq!(*pool, request.parent_pool, "fallback pool must be untouched");
            assert_eq!(last_response, "I cannot produce JSON today.");
        }
        DiversityOutcome::Replaced { .. } => panic!("garbage must never be accepted"),
    }

    assert!(outcome.rationales().is_empty());
    assert_eq!(client.calls(), 4, "exactly max_retries calls on exhaustion");
    println!("✓ Exhaustion returns the parent pool after 4 calls");
}

#[test]
fn test_call_count_is_bounded() {
    for (replies, max_retries, expected_calls) in [
        (vec![valid_reply()], 10, 1),
        (vec!["nope".to_string(), valid_reply()], 10, 2),
        (vec!["nope".to_string()], 7, 7),
    ] {
        let client = ScriptedClient::new(replies);
        let agent = DiversityAgent::new(&client, create_test_config(max_retries));

        agent
            .propose(&create_test_request())
            .expect("request is well-formed");

        assert_eq!(client.calls(), expected_calls);
        assert!(client.calls() >= 1 && client.calls() <= max_retries);
    }
    println!("✓ Call count stays within [1, max_retries]");
}

#[test]
fn test_wrong_list_length_is_rejected_then_recovered() {
    // Two candidates instead of three
    let short_reply = json!([
        {"values": [0.1, 0.2], "rationale": "a"},
        {"values": [0.3, 0.4], "rationale": "b"},
    ])
    .to_string();

    let client = ScriptedClient::new(vec![short_reply, valid_reply()]);
    let agent = DiversityAgent::new(&client, create_test_config(10));

    let outcome = agent
        .propose(&create_test_request())
        .expect("request is well-formed");

    assert!(outcome.is_replaced(), "second reply is valid");
    assert_eq!(client.calls(), 2);
    println!("✓ Short candidate list rejected, retry recovered");
}

#[test]
fn test_retry_appends_corrective_warning() {
    let client = ScriptedClient::new(vec!["not json".to_string(), valid_reply()]);
    let agent = DiversityAgent::new(&client, create_test_config(10));

    agent
        .propose(&create_test_request())
        .expect("request is well-formed");

    let requests = client.requests();
    assert_eq!(requests.len(), 2);

    let first_system = &requests[0][0];
    let second_system = &requests[1][0];
    assert_eq!(first_system.role, Role::System);

    // Second instruction is a strict superset of the first
    assert!(second_system.content.starts_with(&first_system.content));
    assert!(second_system.content.len() > first_system.content.len());
    assert!(second_system.content.contains("WARNING"));
    assert!(second_system.content.contains("3 objects"));
    assert!(second_system.content.contains("length 2"));

    // The context never changes between attempts
    assert_eq!(requests[0][1].content, requests[1][1].content);
    println!("✓ Each retry extends the instruction and keeps the context");
}

#[test]
fn test_warning_accumulates_per_rejection() {
    let client = ScriptedClient::new(vec![
        "junk one".to_string(),
        "junk two".to_string(),
        valid_reply(),
    ]);
    let agent = DiversityAgent::new(&client, create_test_config(10));

    agent
        .propose(&create_test_request())
        .expect("request is well-formed");

    let requests = client.requests();
    assert_eq!(requests.len(), 3);

    let warnings_in = |s: &str| s.matches("WARNING").count();
    assert_eq!(warnings_in(&requests[0][0].content), 0);
    assert_eq!(warnings_in(&requests[1][0].content), 1);
    assert_eq!(warnings_in(&requests[2][0].content), 2);
    println!("✓ One warning accumulates per rejected attempt");
}

#[test]
fn test_clamp_to_bounds_is_opt_in() {
    let out_of_bounds = json!([
        {"values": [-0.5, 0.5], "rationale": "a"},
        {"values": [0.5, 1.5], "rationale": "b"},
        {"values": [0.5, 0.5], "rationale": "c"},
    ])
    .to_string();

    // Default: the reply is trusted as-is
    let client = ScriptedClient::repeating(out_of_bounds.clone());
    let agent = DiversityAgent::new(&client, create_test_config(10));
    let outcome = agent.propose(&create_test_request()).unwrap();
    assert_eq!(outcome.pool()[[0, 0]], -0.5);

    // Opt-in: values are clamped into bounds
    let client = ScriptedClient::repeating(out_of_bounds);
    let config = AgentConfig {
        clamp_to_bounds: true,
        ..create_test_config(10)
    };
    let agent = DiversityAgent::new(&client, config);
    let outcome = agent.propose(&create_test_request()).unwrap();
    assert_eq!(outcome.pool()[[0, 0]], 0.0);
    assert_eq!(outcome.pool()[[1, 1]], 1.0);
    println!("✓ Bounds stay advisory unless clamping is enabled");
}

#[test]
fn test_mismatched_request_is_rejected() {
    let mut request = create_test_request();
    request.parent_objectives = Array2::zeros((5, 1));

    let client = ScriptedClient::repeating(valid_reply());
    let agent = DiversityAgent::new(&client, create_test_config(10));

    assert!(agent.propose(&request).is_err());
    assert_eq!(client.calls(), 0, "a bad request must not reach the model");
    println!("✓ Mismatched shapes fail before any model call");
}
