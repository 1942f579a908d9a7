//! Pre-submission validation of cluster composition.
//!
//! The chain is the source of truth for agent/task/tool wiring, but a
//! dangling reference only surfaces there as an execution failure after
//! several transactions have already been paid for. [`ClusterPlan`] checks
//! the wiring client-side before anything is submitted, then assembles the
//! cluster one transaction at a time.

use crate::client::{ClusterRef, ModelRef, NexusClient};
use crate::error::SdkError;
use crate::rpc::ChainClient;
use std::collections::HashSet;
use thiserror::Error;

/// A violation of the client-side composition invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("duplicate agent name `{0}`")]
    DuplicateAgent(String),

    #[error("duplicate task name `{0}`")]
    DuplicateTask(String),

    #[error("task `{task}` references unknown agent `{agent}`")]
    UnknownAgent { task: String, agent: String },

    #[error("tool `{tool}` references unknown task `{task}`")]
    UnknownTask { tool: String, task: String },
}

/// An agent to be added to the cluster.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

/// A task to be added to the cluster. `agent` must name an agent of the
/// same plan.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: String,
    pub agent: String,
    pub description: String,
    pub expected_output: String,
    pub prompt: String,
    pub context: String,
}

/// A tool to be attached to a task of the same plan.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub task: String,
    pub name: String,
    pub args: Vec<String>,
}

/// An in-memory description of a cluster to be assembled on-chain.
#[derive(Debug, Clone, Default)]
pub struct ClusterPlan {
    name: String,
    description: String,
    agents: Vec<AgentSpec>,
    tasks: Vec<TaskSpec>,
    tools: Vec<ToolSpec>,
}

impl ClusterPlan {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn agent(mut self, spec: AgentSpec) -> Self {
        self.agents.push(spec);
        self
    }

    pub fn task(mut self, spec: TaskSpec) -> Self {
        self.tasks.push(spec);
        self
    }

    pub fn tool(mut self, spec: ToolSpec) -> Self {
        self.tools.push(spec);
        self
    }

    /// Checks name uniqueness and reference integrity: agent and task names
    /// must be unique, every task must reference a known agent, and every
    /// tool must reference a known task.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut agents = HashSet::new();
        for agent in &self.agents {
            if !agents.insert(agent.name.as_str()) {
                return Err(PlanError::DuplicateAgent(agent.name.clone()));
            }
        }

        let mut tasks = HashSet::new();
        for task in &self.tasks {
            if !tasks.insert(task.name.as_str()) {
                return Err(PlanError::DuplicateTask(task.name.clone()));
            }
            if !agents.contains(task.agent.as_str()) {
                return Err(PlanError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                });
            }
        }

        for tool in &self.tools {
            if !tasks.contains(tool.task.as_str()) {
                return Err(PlanError::UnknownTask {
                    tool: tool.name.clone(),
                    task: tool.task.clone(),
                });
            }
        }

        Ok(())
    }

    /// Validates the plan, then assembles the cluster on-chain: create the
    /// cluster, add every agent, add every task, attach every tool — one
    /// transaction at a time, in plan order.
    pub async fn submit<C: ChainClient + ?Sized>(
        &self,
        client: &NexusClient<C>,
        model: &ModelRef,
    ) -> Result<ClusterRef, SdkError> {
        self.validate()?;

        let cluster = client
            .create_cluster(&self.name, &self.description, None)
            .await?;
        for agent in &self.agents {
            client
                .create_agent(
                    &cluster,
                    model,
                    &agent.name,
                    &agent.role,
                    &agent.goal,
                    &agent.backstory,
                    None,
                )
                .await?;
        }
        for task in &self.tasks {
            client
                .create_task(
                    &cluster,
                    &task.name,
                    &task.agent,
                    &task.description,
                    &task.expected_output,
                    &task.prompt,
                    &task.context,
                    None,
                )
                .await?;
        }
        for tool in &self.tools {
            client
                .attach_tool_to_task(&cluster, &tool.task, &tool.name, &tool.args, None)
                .await?;
        }

        Ok(cluster)
    }
}
