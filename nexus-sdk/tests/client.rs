use async_trait::async_trait;
use nexus_sdk::args::{CallArg, MoveCall, ObjectId};
use nexus_sdk::client::{ClusterRef, CreateModelArgs, ModelRef, NexusClient};
use nexus_sdk::config::SdkConfig;
use nexus_sdk::error::{SdkError, TransportError};
use nexus_sdk::plan::{AgentSpec, ClusterPlan, TaskSpec, ToolSpec};
use nexus_sdk::rpc::{
    ChainClient, ExecutionStatus, ObjectContent, RawEvent, TransactionResponse,
};
use std::sync::{Arc, Mutex};

/// A mock chain that records every submitted call and answers with a
/// scripted response.
struct MockChain {
    calls: Mutex<Vec<(String, Vec<CallArg>, u64)>>,
    response: MockResponse,
}

enum MockResponse {
    /// Success with a single event carrying this payload.
    Event(String),
    /// Success with these created object ids and no events.
    Created(Vec<ObjectId>),
    /// Chain-side execution failure with this error text.
    Failure(String),
}

impl MockChain {
    fn with_event(payload: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: MockResponse::Event(payload.to_string()),
        }
    }

    fn with_created(ids: Vec<ObjectId>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: MockResponse::Created(ids),
        }
    }

    fn with_failure(error: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: MockResponse::Failure(error.to_string()),
        }
    }

    fn calls(&self) -> Vec<(String, Vec<CallArg>, u64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn execute_move_call(
        &self,
        call: &MoveCall,
        gas_budget: u64,
    ) -> Result<TransactionResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((call.target(), call.args.clone(), gas_budget));

        let response = match &self.response {
            MockResponse::Event(payload) => TransactionResponse {
                digest: "MOCK".to_string(),
                status: ExecutionStatus::Success,
                events: vec![RawEvent {
                    event_type: "mock::event".to_string(),
                    payload: payload.clone(),
                }],
                created: vec![],
            },
            MockResponse::Created(ids) => TransactionResponse {
                digest: "MOCK".to_string(),
                status: ExecutionStatus::Success,
                events: vec![],
                created: ids.clone(),
            },
            MockResponse::Failure(error) => TransactionResponse {
                digest: "MOCK".to_string(),
                status: ExecutionStatus::Failure {
                    error: error.clone(),
                },
                events: vec![],
                created: vec![],
            },
        };
        Ok(response)
    }

    async fn get_object_content(
        &self,
        _id: &ObjectId,
    ) -> Result<ObjectContent, TransportError> {
        unimplemented!("not used by these tests")
    }
}

fn client(chain: Arc<MockChain>) -> NexusClient<MockChain> {
    NexusClient::new(chain, ObjectId::new("0xpkg"), SdkConfig::default())
}

fn cluster_ref() -> ClusterRef {
    ClusterRef {
        cluster: ObjectId::new("0xC"),
        owner_cap: ObjectId::new("0xCAP"),
    }
}

#[tokio::test]
async fn create_cluster_decodes_ids_from_event() {
    let chain = Arc::new(MockChain::with_event(
        r#"{"cluster": "0xA", "owner_cap": "0xB"}"#,
    ));
    let client = client(chain.clone());

    let cluster = client
        .create_cluster("Example Cluster", "desc", None)
        .await
        .unwrap();
    assert_eq!(cluster.cluster, ObjectId::new("0xA"));
    assert_eq!(cluster.owner_cap, ObjectId::new("0xB"));

    let calls = chain.calls();
    assert_eq!(calls.len(), 1);
    let (target, args, gas) = &calls[0];
    assert_eq!(target, "0xpkg::cluster::create");
    assert_eq!(
        args,
        &vec![
            CallArg::String("Example Cluster".to_string()),
            CallArg::String("desc".to_string()),
        ]
    );
    assert_eq!(*gas, 1_000_000_000);
}

#[tokio::test]
async fn create_cluster_chain_failure_is_execution_error() {
    let chain = Arc::new(MockChain::with_failure("InsufficientGas"));
    let client = client(chain);

    let err = client
        .create_cluster("Example Cluster", "desc", None)
        .await
        .unwrap_err();
    match err {
        SdkError::Execution(message) => assert_eq!(message, "InsufficientGas"),
        other => panic!("expected execution error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_cluster_missing_field_is_reported() {
    let chain = Arc::new(MockChain::with_event(r#"{"cluster": "0xA"}"#));
    let client = client(chain);

    let err = client.create_cluster("c", "d", None).await.unwrap_err();
    assert!(matches!(err, SdkError::MissingField("owner_cap")));
}

#[tokio::test]
async fn attach_tool_descriptor_order_and_types() {
    let chain = Arc::new(MockChain::with_event("{}"));
    let client = client(chain.clone());
    let tool_args = vec!["http://example.com".to_string(), "42".to_string()];

    client
        .attach_tool_to_task(&cluster_ref(), "scrape", "browser", &tool_args, None)
        .await
        .unwrap();

    let calls = chain.calls();
    let (target, args, gas) = &calls[0];
    assert_eq!(target, "0xpkg::cluster::attach_tool_to_task_entry");
    assert_eq!(
        args,
        &vec![
            CallArg::ObjectRef(ObjectId::new("0xC")),
            CallArg::ObjectRef(ObjectId::new("0xCAP")),
            CallArg::String("scrape".to_string()),
            CallArg::String("browser".to_string()),
            CallArg::StringArray(tool_args),
        ]
    );
    // Tool attachment draws from the utility budget, not the cluster one.
    assert_eq!(*gas, 10_000_000);
}

#[tokio::test]
async fn per_call_gas_override_wins() {
    let chain = Arc::new(MockChain::with_event(
        r#"{"cluster": "0xA", "owner_cap": "0xB"}"#,
    ));
    let client = client(chain.clone());

    client
        .create_cluster("c", "d", Some(123_456))
        .await
        .unwrap();
    assert_eq!(chain.calls()[0].2, 123_456);
}

#[tokio::test]
async fn execute_cluster_prefers_execution_key() {
    let chain = Arc::new(MockChain::with_event(
        r#"{"execution": "0x1", "cluster_execution": "0x2"}"#,
    ));
    let client = client(chain);

    let execution = client
        .execute_cluster(&ObjectId::new("0xC"), "input", None)
        .await
        .unwrap();
    assert_eq!(execution, ObjectId::new("0x1"));
}

#[tokio::test]
async fn execute_cluster_falls_back_to_cluster_execution_key() {
    let chain = Arc::new(MockChain::with_event(r#"{"cluster_execution": "0x2"}"#));
    let client = client(chain);

    let execution = client
        .execute_cluster(&ObjectId::new("0xC"), "input", None)
        .await
        .unwrap();
    assert_eq!(execution, ObjectId::new("0x2"));
}

#[tokio::test]
async fn execute_cluster_without_either_key_is_missing_field() {
    let chain = Arc::new(MockChain::with_event(r#"{"unrelated": "0x9"}"#));
    let client = client(chain);

    let err = client
        .execute_cluster(&ObjectId::new("0xC"), "input", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::MissingField("execution")));
}

#[tokio::test]
async fn single_quoted_payload_with_newlines_decodes() {
    // The exact serialization quirk observed from the node: single quotes
    // and a raw newline inside a string value.
    let chain = Arc::new(MockChain::with_event(
        "{'cluster': '0xA', 'owner_cap': '0xB', 'note': 'line one\nline two'}",
    ));
    let client = client(chain);

    let cluster = client.create_cluster("c", "d", None).await.unwrap();
    assert_eq!(cluster.cluster, ObjectId::new("0xA"));
}

#[tokio::test]
async fn create_model_decodes_ids_and_arg_shape() {
    let chain = Arc::new(MockChain::with_event(
        r#"{"model": "0xM", "owner_cap": "0xMC"}"#,
    ));
    let client = client(chain.clone());

    let model = client
        .create_model(
            CreateModelArgs {
                node: ObjectId::new("0xN"),
                name: "llama".to_string(),
                model_hash: vec![1, 2, 3],
                url: "http://models".to_string(),
                token_price: 10,
                capacity: 100,
                num_params: 7_000_000_000,
                description: "d".to_string(),
                max_context_length: 4096,
                is_fine_tuned: true,
                family: "llama".to_string(),
                vendor: "meta".to_string(),
                is_open_source: true,
                datasets: vec!["ds1".to_string()],
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(model.model, ObjectId::new("0xM"));
    assert_eq!(model.owner_cap, ObjectId::new("0xMC"));

    let (target, args, gas) = &chain.calls()[0];
    assert_eq!(target, "0xpkg::model::create");
    assert_eq!(args.len(), 14);
    assert_eq!(args[0], CallArg::ObjectRef(ObjectId::new("0xN")));
    assert_eq!(args[2], CallArg::ByteArray(vec![1, 2, 3]));
    assert_eq!(args[9], CallArg::Bool(true));
    assert_eq!(args[13], CallArg::StringArray(vec!["ds1".to_string()]));
    assert_eq!(*gas, 10_000_000);
}

#[tokio::test]
async fn create_node_returns_first_created_object() {
    let chain = Arc::new(MockChain::with_created(vec![
        ObjectId::new("0xNODE"),
        ObjectId::new("0xOTHER"),
    ]));
    let client = client(chain.clone());

    let node = client.create_node("n", "gpu", 1024, None).await.unwrap();
    assert_eq!(node, ObjectId::new("0xNODE"));

    let (target, args, _) = &chain.calls()[0];
    assert_eq!(target, "0xpkg::node::create");
    // Trailing reserved arguments keep the deployed wire shape.
    assert_eq!(args[3], CallArg::String("c".to_string()));
    assert_eq!(args[4], CallArg::StringArray(vec![]));
}

#[tokio::test]
async fn create_node_without_created_objects_fails() {
    let chain = Arc::new(MockChain::with_created(vec![]));
    let client = client(chain);

    let err = client.create_node("n", "gpu", 1024, None).await.unwrap_err();
    assert!(matches!(err, SdkError::MissingField("created")));
}

#[tokio::test]
async fn plan_submits_in_order() {
    // A single scripted event response works for every call in the
    // sequence: it carries the fields create_cluster needs and the
    // remaining operations ignore events.
    let chain = Arc::new(MockChain::with_event(
        r#"{"cluster": "0xA", "owner_cap": "0xB"}"#,
    ));
    let client = client(chain.clone());
    let model = ModelRef {
        model: ObjectId::new("0xM"),
        owner_cap: ObjectId::new("0xMC"),
    };

    let plan = ClusterPlan::new("c", "d")
        .agent(AgentSpec {
            name: "a".to_string(),
            role: "r".to_string(),
            goal: "g".to_string(),
            backstory: "b".to_string(),
        })
        .task(TaskSpec {
            name: "t".to_string(),
            agent: "a".to_string(),
            description: "d".to_string(),
            expected_output: "o".to_string(),
            prompt: "p".to_string(),
            context: "ctx".to_string(),
        })
        .tool(ToolSpec {
            task: "t".to_string(),
            name: "browser".to_string(),
            args: vec![],
        });

    let cluster = plan.submit(&client, &model).await.unwrap();
    assert_eq!(cluster.cluster, ObjectId::new("0xA"));

    let targets: Vec<String> = chain.calls().into_iter().map(|(t, _, _)| t).collect();
    assert_eq!(
        targets,
        vec![
            "0xpkg::cluster::create",
            "0xpkg::cluster::add_agent_entry",
            "0xpkg::cluster::add_task_entry",
            "0xpkg::cluster::attach_tool_to_task_entry",
        ]
    );
}

#[tokio::test]
async fn invalid_plan_submits_nothing() {
    let chain = Arc::new(MockChain::with_event("{}"));
    let client = client(chain.clone());
    let model = ModelRef {
        model: ObjectId::new("0xM"),
        owner_cap: ObjectId::new("0xMC"),
    };

    let plan = ClusterPlan::new("c", "d").task(TaskSpec {
        name: "t".to_string(),
        agent: "ghost".to_string(),
        description: String::new(),
        expected_output: String::new(),
        prompt: String::new(),
        context: String::new(),
    });

    let err = plan.submit(&client, &model).await.unwrap_err();
    assert!(matches!(err, SdkError::Plan(_)));
    assert!(chain.calls().is_empty());
}
