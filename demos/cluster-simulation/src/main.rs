//! End-to-end walkthrough of the SDK against an in-process simulated chain.
//!
//! Runs the full workflow — node, model, cluster plan (agent, task, tool),
//! execute, poll — without a live network. The simulated chain emits event
//! payloads with the same quirks the real node shows (single quotes, raw
//! newlines) and advances the execution object IDLE → RUNNING → SUCCESS
//! across polls.

use anyhow::Result;
use async_trait::async_trait;
use nexus_sdk::args::{MoveCall, ObjectId};
use nexus_sdk::client::{CreateModelArgs, NexusClient};
use nexus_sdk::config::SdkConfig;
use nexus_sdk::error::TransportError;
use nexus_sdk::plan::{AgentSpec, ClusterPlan, TaskSpec, ToolSpec};
use nexus_sdk::rpc::{
    ChainClient, ExecutionStatus, ObjectContent, RawEvent, TransactionResponse,
};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// An in-process chain that answers every move call with plausible effects.
struct SimulatedChain {
    next_id: AtomicU64,
    execution_polls: AtomicU64,
}

impl SimulatedChain {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0x100),
            execution_polls: AtomicU64::new(0),
        }
    }

    fn fresh_id(&self) -> String {
        format!("0x{:x}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn ok(events: Vec<RawEvent>, created: Vec<ObjectId>) -> TransactionResponse {
        TransactionResponse {
            digest: "SIMULATED".to_string(),
            status: ExecutionStatus::Success,
            events,
            created,
        }
    }
}

#[async_trait]
impl ChainClient for SimulatedChain {
    async fn execute_move_call(
        &self,
        call: &MoveCall,
        _gas_budget: u64,
    ) -> Result<TransactionResponse, TransportError> {
        let response = match (call.module.as_str(), call.function.as_str()) {
            ("cluster", "create") => {
                // Single-quoted payload, as seen from the live node.
                let payload = format!(
                    "{{'cluster': '{}', 'owner_cap': '{}'}}",
                    self.fresh_id(),
                    self.fresh_id()
                );
                Self::ok(
                    vec![RawEvent {
                        event_type: "sim::cluster::ClusterCreated".to_string(),
                        payload,
                    }],
                    vec![],
                )
            }
            ("cluster", "execute") => {
                // The execute call can emit the id under either key; the
                // simulation uses the fallback one.
                let payload = format!("{{'cluster_execution': '{}'}}", self.fresh_id());
                Self::ok(
                    vec![RawEvent {
                        event_type: "sim::cluster::ExecutionStarted".to_string(),
                        payload,
                    }],
                    vec![],
                )
            }
            ("model", "create") => {
                let payload = format!(
                    "{{'model': '{}', 'owner_cap': '{}'}}",
                    self.fresh_id(),
                    self.fresh_id()
                );
                Self::ok(
                    vec![RawEvent {
                        event_type: "sim::model::ModelCreated".to_string(),
                        payload,
                    }],
                    vec![],
                )
            }
            ("node", "create") => Self::ok(vec![], vec![ObjectId::new(self.fresh_id())]),
            _ => Self::ok(vec![], vec![]),
        };
        Ok(response)
    }

    async fn get_object_content(
        &self,
        _id: &ObjectId,
    ) -> Result<ObjectContent, TransportError> {
        let polls = self.execution_polls.fetch_add(1, Ordering::SeqCst);
        let fields = match polls {
            0 => json!({ "status": "IDLE" }),
            1 | 2 => json!({ "status": "RUNNING" }),
            _ => json!({
                "status": "SUCCESS",
                // Responses carry raw newlines through the event pipeline.
                "cluster_response": "The capital of France is Paris.\nSource: simulated model."
            }),
        };
        Ok(ObjectContent {
            fields: fields.as_object().cloned().unwrap_or_default(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    nexus_logger::init(&nexus_logger::LogConfig::default())?;

    let mut config = SdkConfig::default();
    // Tighten the poll loop so the demo finishes quickly.
    config.polling.check_interval_secs = 1;
    config.polling.max_wait_secs = 30;

    let chain = Arc::new(SimulatedChain::new());
    let client = NexusClient::new(chain, ObjectId::new("0xnexus"), config);

    // Infrastructure: a node hosting a model.
    let node = client.create_node("sim-node", "gpu", 24_576, None).await?;
    let model = client
        .create_model(
            CreateModelArgs {
                node,
                name: "sim-llama".to_string(),
                model_hash: vec![0xde, 0xad, 0xbe, 0xef],
                url: "http://localhost:8000/sim-llama".to_string(),
                token_price: 100,
                capacity: 10_000,
                num_params: 7_000_000_000,
                description: "Simulated 7B chat model".to_string(),
                max_context_length: 8_192,
                is_fine_tuned: false,
                family: "llama".to_string(),
                vendor: "simulation".to_string(),
                is_open_source: true,
                datasets: vec!["sim-corpus".to_string()],
            },
            None,
        )
        .await?;

    // A single-agent cluster answering one prompt, with a search tool.
    let plan = ClusterPlan::new("Prompt Cluster", "A cluster for answering one prompt")
        .agent(AgentSpec {
            name: "prompt_runner".to_string(),
            role: "Prompt Runner".to_string(),
            goal: "Answer the given prompt".to_string(),
            backstory: "An AI agent specialized in answering prompts.".to_string(),
        })
        .task(TaskSpec {
            name: "answer_prompt".to_string(),
            agent: "prompt_runner".to_string(),
            description: "Answer the user's question".to_string(),
            expected_output: "A short factual answer".to_string(),
            prompt: "What is the capital of France?".to_string(),
            context: String::new(),
        })
        .tool(ToolSpec {
            task: "answer_prompt".to_string(),
            name: "web_search".to_string(),
            args: vec!["capital of France".to_string()],
        });

    let cluster = plan.submit(&client, &model).await?;
    info!(cluster = %cluster.cluster, "cluster assembled");

    let execution = client
        .execute_cluster(&cluster.cluster, "What is the capital of France?", None)
        .await?;
    let response = client.execution_response(&execution).await?;

    info!(%execution, "execution finished");
    println!("--- cluster response ---");
    println!("{response}");

    Ok(())
}
