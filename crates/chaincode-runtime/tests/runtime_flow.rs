//! # Runtime Flow Tests
//!
//! Drive the line-delimited JSON loop end to end, the way the binary does.

use chaincode_runtime::{
    serve, ChaincodeRuntime, FileBackedWorldState, InvocationResponse, MemoryWorldState,
    WorldState, STATUS_BAD_REQUEST, STATUS_ERROR, STATUS_OK,
};
use medicine_contract::ContractConfig;
use std::future::pending;

async fn run_lines<S: WorldState>(runtime: &mut ChaincodeRuntime<S>, input: &str) -> Vec<InvocationResponse> {
    run_bytes(runtime, input.as_bytes()).await
}

async fn run_bytes<S: WorldState>(runtime: &mut ChaincodeRuntime<S>, input: &[u8]) -> Vec<InvocationResponse> {
    let mut output = Vec::new();
    serve(runtime, input, &mut output, pending::<()>())
        .await
        .expect("serve should finish at EOF");

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_full_session_over_memory_state() {
    let mut runtime = ChaincodeRuntime::new(MemoryWorldState::new(), ContractConfig::default());
    let input = concat!(
        r#"{"function":"InitLedger"}"#, "\n",
        r#"{"function":"CreateMedicine","args":["MEDICINE2","Metformina","850mg","Tableta","30/11/2025","60","2718281"]}"#, "\n",
        "\n",
        r#"{"function":"ChangeMedicineQuantity","args":["MEDICINE0","50"]}"#, "\n",
        r#"{"function":"QueryMedicine","args":["MEDICINE0"]}"#, "\n",
        r#"{"function":"QueryAllMedicines","args":[]}"#, "\n",
    );

    let responses = run_lines(&mut runtime, input).await;

    assert_eq!(responses.len(), 5);
    assert!(responses.iter().all(|response| response.status == STATUS_OK));

    let medicine = responses[3].payload.as_ref().unwrap();
    assert_eq!(medicine["name"], "Amoxicilina");
    assert_eq!(medicine["quantity"], "50");

    let all = responses[4].payload.as_ref().unwrap().as_array().unwrap();
    let keys: Vec<&str> = all.iter().map(|entry| entry["Key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["MEDICINE0", "MEDICINE1", "MEDICINE2"]);

    // Every transaction gets its own id.
    assert_ne!(responses[0].tx_id, responses[1].tx_id);
}

#[tokio::test]
async fn test_errors_are_reported_per_line() {
    let mut runtime = ChaincodeRuntime::new(MemoryWorldState::new(), ContractConfig::default());
    let input = concat!(
        "this is not json\n",
        r#"{"function":"QueryMedicine","args":["MEDICINE9"]}"#, "\n",
        r#"{"function":"DeleteMedicine","args":["MEDICINE9"]}"#, "\n",
        r#"{"function":"QueryAllMedicines"}"#, "\n",
    );

    let responses = run_lines(&mut runtime, input).await;

    assert_eq!(responses[0].status, STATUS_BAD_REQUEST);
    assert_eq!(responses[1].status, STATUS_ERROR);
    assert_eq!(responses[1].message.as_deref(), Some("MEDICINE9 does not exist"));
    assert_eq!(responses[2].status, STATUS_ERROR);
    assert_eq!(
        responses[2].message.as_deref(),
        Some("unknown function: DeleteMedicine")
    );
    assert_eq!(responses[3].status, STATUS_OK);
    assert_eq!(responses[3].payload, Some(serde_json::json!([])));

    assert_eq!(runtime.stats().transactions, 4);
    assert_eq!(runtime.stats().failed, 3);
}

#[tokio::test]
async fn test_invalid_utf8_line_does_not_stop_serving() {
    let mut runtime = ChaincodeRuntime::new(MemoryWorldState::new(), ContractConfig::default());
    let input: &[u8] = b"{\"function\":\"QueryAllMedicines\"}\n\
{\"function\":\"Query\xff\"}\n\
{\"function\":\"InitLedger\"}\r\n";

    let responses = run_bytes(&mut runtime, input).await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].status, STATUS_OK);
    assert_eq!(responses[1].status, STATUS_BAD_REQUEST);
    assert_eq!(responses[2].status, STATUS_OK);
    assert_eq!(runtime.state().len(), 2);
}

#[tokio::test]
async fn test_file_state_persists_across_runtimes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world_state.db");

    {
        let state = FileBackedWorldState::open(&path).unwrap();
        let mut runtime = ChaincodeRuntime::new(state, ContractConfig::default());
        let responses = run_lines(&mut runtime, "{\"function\":\"InitLedger\"}\n").await;
        assert_eq!(responses[0].status, STATUS_OK);
    }

    let state = FileBackedWorldState::open(&path).unwrap();
    assert_eq!(state.len(), 2);

    let mut runtime = ChaincodeRuntime::new(state, ContractConfig::default());
    let responses = run_lines(
        &mut runtime,
        "{\"function\":\"QueryMedicine\",\"args\":[\"MEDICINE1\"]}\n",
    )
    .await;
    assert_eq!(responses[0].payload.as_ref().unwrap()["name"], "Ibuprofeno");
}

#[tokio::test]
async fn test_shutdown_stops_serving() {
    let mut runtime = ChaincodeRuntime::new(MemoryWorldState::new(), ContractConfig::default());
    let (reader, _writer_half) = tokio::io::duplex(64);
    let mut output = Vec::new();

    serve(
        &mut runtime,
        tokio::io::BufReader::new(reader),
        &mut output,
        std::future::ready(()),
    )
    .await
    .unwrap();

    assert!(output.is_empty());
    assert_eq!(runtime.stats().transactions, 0);
}
