//! A Rust SDK for the Nexus on-chain agent-orchestration package.
//!
//! Nexus groups AI agents, their tasks, and task tools into on-chain
//! "cluster" objects and runs them through a single `execute` entry point.
//! This crate wraps the package's entry points behind a typed, asynchronous
//! API: it builds `move_call` descriptors, submits them with a gas budget,
//! decodes the emitted events, and polls execution objects until they reach
//! a terminal status.
//!
//! # Key Components
//!
//! *   [`client::NexusClient`]: typed wrappers for every package entry point.
//! *   [`rpc::ChainClient`]: the transport seam. [`rpc::JsonRpcClient`] talks
//!     to a live node over HTTP JSON-RPC; integration tests and simulations
//!     provide in-process implementations.
//! *   [`events`]: decoding of the chain's not-quite-JSON event payloads.
//! *   [`execution`]: the blocking poll loop for cluster execution objects.
//! *   [`plan::ClusterPlan`]: client-side validation of agent/task/tool
//!     wiring before any transaction is paid for.

/// Typed call arguments and descriptors for package entry points.
pub mod args;
/// High-level operations over the deployed Nexus package.
pub mod client;
/// Configuration structures and file/environment loading.
pub mod config;
/// The error taxonomy shared by all SDK operations.
pub mod error;
/// Decoding of pseudo-JSON event payloads.
pub mod events;
/// The poll loop for cluster execution objects.
pub mod execution;
/// Pre-submission validation of cluster composition.
pub mod plan;
/// The chain transport trait and the live JSON-RPC client.
pub mod rpc;
