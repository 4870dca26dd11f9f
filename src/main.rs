use anyhow::Result;
use divergen::config::{AgentConfig, AppConfig, ConfigManager};
use divergen::llm::{AnthropicClient, LlmClient, ScriptedClient};
use divergen::types::{Bounds, DiversityRequest, PoolSummary};
use divergen::utils::array_format::vector_to_str;
use divergen::{DiversityAgent, DiversityOutcome};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::path::Path;

const POOL_SIZE: usize = 8;
const N_VARS: usize = 4;
const N_OBJS: usize = 2;

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config();
    let request = synthetic_request(&mut StdRng::seed_from_u64(42));

    // Prefer the real endpoint when a key is available, otherwise replay a
    // canned reply so the demo runs offline.
    let outcome = match AnthropicClient::from_env(config.llm.clone()) {
        Ok(client) => run(&client, &config.agent, &request)?,
        Err(_) => {
            log::info!("{} not set; using the scripted client", config.llm.api_key_env);
            let client = ScriptedClient::repeating(canned_reply(&request, 7));
            run(&client, &config.agent, &request)?
        }
    };

    match &outcome {
        DiversityOutcome::Replaced { pool, rationales } => {
            println!("Replacement pool ({} candidates):", pool.nrows());
            for (row, rationale) in pool.axis_iter(Axis(0)).zip(rationales) {
                println!("  {}  {}", vector_to_str(&row, 3), rationale);
            }
        }
        DiversityOutcome::Unchanged { pool, last_response } => {
            println!("No valid reply; keeping the parent pool ({} candidates).", pool.nrows());
            println!("Last raw reply:\n{}", last_response);
        }
    }

    Ok(())
}

fn run(
    client: &dyn LlmClient,
    agent_config: &AgentConfig,
    request: &DiversityRequest,
) -> Result<DiversityOutcome> {
    let agent = DiversityAgent::new(client, agent_config.clone());
    Ok(agent.propose(request)?)
}

fn load_config() -> AppConfig {
    let manager = ConfigManager::new();
    let path = Path::new("divergen.toml");
    if path.exists() {
        if let Err(e) = manager.load_from_file(path) {
            log::warn!("Ignoring {}: {}", path.display(), e);
        }
    }
    manager.get()
}

/// Seeded sample problem: a small pool plus a fabricated summary bundle
fn synthetic_request(rng: &mut StdRng) -> DiversityRequest {
    let parent_pool = random_matrix(rng, POOL_SIZE, N_VARS, 0.0..1.0);
    let parent_objectives = random_matrix(rng, POOL_SIZE, N_OBJS, 0.1..2.0);
    let history = random_matrix(rng, 40, N_VARS, 0.0..1.0);

    let summary = PoolSummary {
        param_param_corr: random_matrix(rng, N_VARS, N_VARS, -1.0..1.0),
        param_obj_corr: random_matrix(rng, N_VARS, N_OBJS, -1.0..1.0),
        pca_loadings: random_matrix(rng, N_VARS, N_VARS, -1.0..1.0),
        pca_explained_variance: Array1::from_vec(vec![0.5, 0.3, 0.15, 0.05]),
    };

    DiversityRequest {
        parent_pool,
        parent_objectives,
        history: Some(history),
        bounds: Some(Bounds::unit()),
        summary,
    }
}

fn random_matrix(
    rng: &mut StdRng,
    rows: usize,
    cols: usize,
    range: std::ops::Range<f64>,
) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(range.clone()))
}

/// Valid reply for the scripted client: the parent pool, lightly perturbed
fn canned_reply(request: &DiversityRequest, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let proposals: Vec<serde_json::Value> = request
        .parent_pool
        .axis_iter(Axis(0))
        .map(|row| {
            let values: Vec<f64> = row
                .iter()
                .map(|v| (v + rng.gen_range(-0.05..0.05)).clamp(0.0, 1.0))
                .collect();
            json!({"values": values, "rationale": "nudge toward an unexplored region"})
        })
        .collect();

    serde_json::Value::Array(proposals).to_string()
}
