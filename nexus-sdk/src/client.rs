//! High-level SDK operations over the Nexus package entry points.
//!
//! Every state-changing operation follows the same submit-parse sequence:
//! build a typed call descriptor, submit it with a gas budget, check the
//! reported effects, and decode the first emitted event where the operation
//! yields identifiers. Operations are strictly sequential; the only shared
//! resource is the RPC handle.

use crate::args::{CallArg, MoveCall, ObjectId};
use crate::config::SdkConfig;
use crate::error::SdkError;
use crate::events::{self, Literal};
use crate::execution;
use crate::rpc::{ChainClient, ExecutionStatus, TransactionResponse};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The identifier pair returned by `cluster::create`.
///
/// The owner capability proves the right to mutate the cluster and is
/// required by every subsequent cluster mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRef {
    pub cluster: ObjectId,
    pub owner_cap: ObjectId,
}

/// The identifier pair returned by `model::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub model: ObjectId,
    pub owner_cap: ObjectId,
}

/// Arguments for `model::create`, in entry-point order.
#[derive(Debug, Clone)]
pub struct CreateModelArgs {
    /// The node object where the model is stored.
    pub node: ObjectId,
    pub name: String,
    /// Hash of the model file.
    pub model_hash: Vec<u8>,
    /// URL where the model can be downloaded.
    pub url: String,
    /// Price per token, in base units.
    pub token_price: u64,
    /// Number of predictions the model can serve.
    pub capacity: u64,
    pub num_params: u64,
    pub description: String,
    pub max_context_length: u64,
    pub is_fine_tuned: bool,
    /// Model family, e.g. `llama`.
    pub family: String,
    pub vendor: String,
    pub is_open_source: bool,
    /// Datasets the model was trained on.
    pub datasets: Vec<String>,
}

/// A client for a deployed Nexus package.
///
/// Generic over [`ChainClient`] so the same call paths run against the live
/// JSON-RPC transport and against in-process mock chains in tests.
pub struct NexusClient<C: ChainClient + ?Sized> {
    chain: Arc<C>,
    package: ObjectId,
    config: SdkConfig,
}

impl<C: ChainClient + ?Sized> NexusClient<C> {
    /// Creates a new client for the package deployed at `package`.
    pub fn new(chain: Arc<C>, package: ObjectId, config: SdkConfig) -> Self {
        Self {
            chain,
            package,
            config,
        }
    }

    pub fn package(&self) -> &ObjectId {
        &self.package
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    fn call(&self, module: &str, function: &str, args: Vec<CallArg>) -> MoveCall {
        MoveCall::new(self.package.clone(), module, function, args)
    }

    /// Submits a call and verifies the chain reported success.
    async fn submit(
        &self,
        call: MoveCall,
        gas_budget: u64,
    ) -> Result<TransactionResponse, SdkError> {
        debug!(call = %call.target(), gas_budget, "submitting move call");
        let response = self.chain.execute_move_call(&call, gas_budget).await?;
        if let ExecutionStatus::Failure { error } = &response.status {
            warn!(call = %call.target(), %error, "transaction failed on chain");
            return Err(SdkError::Execution(error.clone()));
        }
        Ok(response)
    }

    /// Submits a call and decodes the payload of its first emitted event.
    async fn submit_and_decode(
        &self,
        call: MoveCall,
        gas_budget: u64,
    ) -> Result<Literal, SdkError> {
        let target = call.target();
        let response = self.submit(call, gas_budget).await?;
        let event = response
            .events
            .first()
            .ok_or(SdkError::MissingEvent(target))?;
        Ok(events::decode_event_payload(&event.payload)?)
    }

    // --- Cluster operations ---

    /// Creates an empty cluster to which agents and tasks can be added.
    ///
    /// Returns the cluster id and the cluster owner capability id, decoded
    /// from the creation event.
    pub async fn create_cluster(
        &self,
        name: &str,
        description: &str,
        gas_budget: Option<u64>,
    ) -> Result<ClusterRef, SdkError> {
        let call = self.call(
            "cluster",
            "create",
            vec![
                CallArg::String(name.to_owned()),
                CallArg::String(description.to_owned()),
            ],
        );
        let gas = gas_budget.unwrap_or(self.config.gas.cluster_budget);
        let event = self.submit_and_decode(call, gas).await?;
        let cluster = event
            .get_str("cluster")
            .ok_or(SdkError::MissingField("cluster"))?;
        let owner_cap = event
            .get_str("owner_cap")
            .ok_or(SdkError::MissingField("owner_cap"))?;
        info!(%cluster, %owner_cap, "cluster created");
        Ok(ClusterRef {
            cluster: ObjectId::new(cluster),
            owner_cap: ObjectId::new(owner_cap),
        })
    }

    /// Adds an agent to the cluster.
    ///
    /// The agent lives inside the cluster object; other clusters cannot
    /// reference it.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_agent(
        &self,
        cluster: &ClusterRef,
        model: &ModelRef,
        name: &str,
        role: &str,
        goal: &str,
        backstory: &str,
        gas_budget: Option<u64>,
    ) -> Result<(), SdkError> {
        let call = self.call(
            "cluster",
            "add_agent_entry",
            vec![
                CallArg::ObjectRef(cluster.cluster.clone()),
                CallArg::ObjectRef(cluster.owner_cap.clone()),
                CallArg::ObjectRef(model.model.clone()),
                CallArg::ObjectRef(model.owner_cap.clone()),
                CallArg::String(name.to_owned()),
                CallArg::String(role.to_owned()),
                CallArg::String(goal.to_owned()),
                CallArg::String(backstory.to_owned()),
            ],
        );
        let gas = gas_budget.unwrap_or(self.config.gas.cluster_budget);
        self.submit(call, gas).await?;
        info!(agent = name, cluster = %cluster.cluster, "agent added");
        Ok(())
    }

    /// Adds a task to the cluster. Each task must name an agent of the same
    /// cluster as its executor; the chain is the source of truth for that
    /// reference (see [`crate::plan`] for the client-side pre-check).
    #[allow(clippy::too_many_arguments)]
    pub async fn create_task(
        &self,
        cluster: &ClusterRef,
        name: &str,
        agent_name: &str,
        description: &str,
        expected_output: &str,
        prompt: &str,
        context: &str,
        gas_budget: Option<u64>,
    ) -> Result<(), SdkError> {
        let call = self.call(
            "cluster",
            "add_task_entry",
            vec![
                CallArg::ObjectRef(cluster.cluster.clone()),
                CallArg::ObjectRef(cluster.owner_cap.clone()),
                CallArg::String(name.to_owned()),
                CallArg::String(agent_name.to_owned()),
                CallArg::String(description.to_owned()),
                CallArg::String(expected_output.to_owned()),
                CallArg::String(prompt.to_owned()),
                CallArg::String(context.to_owned()),
            ],
        );
        let gas = gas_budget.unwrap_or(self.config.gas.cluster_budget);
        self.submit(call, gas).await?;
        info!(task = name, agent = agent_name, "task added");
        Ok(())
    }

    /// Attaches a tool to a task in the cluster.
    ///
    /// Argument order on the wire is fixed: task name, tool name, tool
    /// arguments (as an array of strings).
    pub async fn attach_tool_to_task(
        &self,
        cluster: &ClusterRef,
        task_name: &str,
        tool_name: &str,
        tool_args: &[String],
        gas_budget: Option<u64>,
    ) -> Result<(), SdkError> {
        let call = self.call(
            "cluster",
            "attach_tool_to_task_entry",
            vec![
                CallArg::ObjectRef(cluster.cluster.clone()),
                CallArg::ObjectRef(cluster.owner_cap.clone()),
                CallArg::String(task_name.to_owned()),
                CallArg::String(tool_name.to_owned()),
                CallArg::StringArray(tool_args.to_vec()),
            ],
        );
        let gas = gas_budget.unwrap_or(self.config.gas.utility_budget);
        self.submit(call, gas).await?;
        info!(task = task_name, tool = tool_name, "tool attached");
        Ok(())
    }

    /// Begins execution of a cluster and returns the execution object id.
    ///
    /// Use [`NexusClient::execution_response`] to block until the
    /// execution completes.
    pub async fn execute_cluster(
        &self,
        cluster_id: &ObjectId,
        input: &str,
        gas_budget: Option<u64>,
    ) -> Result<ObjectId, SdkError> {
        let call = self.call(
            "cluster",
            "execute",
            vec![
                CallArg::ObjectRef(cluster_id.clone()),
                CallArg::String(input.to_owned()),
            ],
        );
        let gas = gas_budget.unwrap_or(self.config.gas.cluster_budget);
        let event = self.submit_and_decode(call, gas).await?;
        let id = events::execution_id(&event).ok_or(SdkError::MissingField("execution"))?;
        info!(execution = id, cluster = %cluster_id, "cluster execution started");
        Ok(ObjectId::new(id))
    }

    /// Blocks until the execution reaches a terminal status or the
    /// configured deadline elapses. See [`crate::execution`].
    pub async fn execution_response(&self, execution: &ObjectId) -> Result<String, SdkError> {
        execution::wait_for_execution(self.chain.as_ref(), execution, &self.config.polling).await
    }

    // --- Model and node operations ---

    /// Creates an on-chain model object and returns its id together with
    /// the model owner capability id.
    pub async fn create_model(
        &self,
        args: CreateModelArgs,
        gas_budget: Option<u64>,
    ) -> Result<ModelRef, SdkError> {
        let call = self.call(
            "model",
            "create",
            vec![
                CallArg::ObjectRef(args.node),
                CallArg::String(args.name),
                CallArg::ByteArray(args.model_hash),
                CallArg::String(args.url),
                CallArg::U64(args.token_price),
                CallArg::U64(args.capacity),
                CallArg::U64(args.num_params),
                CallArg::String(args.description),
                CallArg::U64(args.max_context_length),
                CallArg::Bool(args.is_fine_tuned),
                CallArg::String(args.family),
                CallArg::String(args.vendor),
                CallArg::Bool(args.is_open_source),
                CallArg::StringArray(args.datasets),
            ],
        );
        let gas = gas_budget.unwrap_or(self.config.gas.utility_budget);
        let event = self.submit_and_decode(call, gas).await?;
        let model = event
            .get_str("model")
            .ok_or(SdkError::MissingField("model"))?;
        let owner_cap = event
            .get_str("owner_cap")
            .ok_or(SdkError::MissingField("owner_cap"))?;
        info!(%model, %owner_cap, "model created");
        Ok(ModelRef {
            model: ObjectId::new(model),
            owner_cap: ObjectId::new(owner_cap),
        })
    }

    /// Creates a node object and returns its id.
    ///
    /// `node::create` emits no event; the id is taken from the first
    /// created object in the effects. The entry point takes two trailing
    /// reserved arguments whose wire shape is preserved as-is.
    pub async fn create_node(
        &self,
        name: &str,
        node_type: &str,
        gpu_memory: u64,
        gas_budget: Option<u64>,
    ) -> Result<ObjectId, SdkError> {
        let call = self.call(
            "node",
            "create",
            vec![
                CallArg::String(name.to_owned()),
                CallArg::String(node_type.to_owned()),
                CallArg::U64(gpu_memory),
                CallArg::String("c".to_owned()),
                CallArg::StringArray(Vec::new()),
            ],
        );
        let gas = gas_budget.unwrap_or(self.config.gas.utility_budget);
        let response = self.submit(call, gas).await?;
        let node = response
            .created
            .first()
            .cloned()
            .ok_or(SdkError::MissingField("created"))?;
        info!(%node, "node created");
        Ok(node)
    }
}
