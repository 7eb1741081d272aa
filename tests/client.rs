//! End-to-end client scenarios over the in-process transport.

use futures::prelude::*;

use mqrpc::transport::local::{LocalCall, LocalServerHandle};
use mqrpc::{args, CallResult, Client};

/// Spawn a server loop that answers `Echo` and `Sum` calls the way a real
/// in-process registry would.
fn spawn_server() -> LocalServerHandle {
    let (handle, mut calls) = LocalServerHandle::channel();
    async_std::task::spawn(async move {
        while let Some(LocalCall { envelope, reply }) = calls.next().await {
            let response = match envelope.function.as_str() {
                "Echo" => CallResult::ok(
                    envelope.cid.clone(),
                    envelope
                        .args
                        .first()
                        .cloned()
                        .unwrap_or(serde_json::Value::Null),
                ),
                "Sum" => {
                    let int_tags = envelope
                        .args_type
                        .as_ref()
                        .map(|tags| tags.iter().all(|tag| tag == "int"))
                        .unwrap_or(false);
                    if int_tags {
                        let sum = envelope
                            .args
                            .iter()
                            .filter_map(|value| value.as_i64())
                            .sum::<i64>();
                        CallResult::ok(envelope.cid.clone(), serde_json::json!(sum))
                    } else {
                        CallResult::err(envelope.cid.clone(), "Sum expects int arguments")
                    }
                }
                other => CallResult::err(envelope.cid.clone(), format!("no such function {}", other)),
            };
            if let Some(reply) = reply {
                let _ = reply.send(response);
            }
        }
    });
    handle
}

#[async_std::test]
async fn echo_round_trip() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();
    let mut client = Client::new();
    client.attach_local(&spawn_server());

    let result = client.call("Echo", args!["hello"]).await?;
    assert_eq!(result.result, serde_json::json!("hello"));
    assert_eq!(result.error, "");
    Ok(())
}

#[async_std::test]
async fn sum_sees_int_tags() -> anyhow::Result<()> {
    let mut client = Client::new();
    client.attach_local(&spawn_server());

    let result = client.call("Sum", args![1i32, 2i32]).await?;
    assert_eq!(result.result, serde_json::json!(3));
    assert_eq!(result.error, "");
    Ok(())
}

#[async_std::test]
async fn unknown_function_reports_a_plain_text_error() {
    let mut client = Client::new();
    client.attach_local(&spawn_server());

    let result = client.call("Missing", args![]).await.unwrap();
    assert!(!result.is_ok());
    assert_eq!(result.error, "no such function Missing");
}

#[async_std::test]
async fn notify_carries_base64_bytes() {
    let (handle, mut calls) = LocalServerHandle::channel();
    let mut client = Client::new();
    client.attach_local(&handle);

    client
        .call_nr("Notify", args![vec![0x01u8, 0x02]])
        .await
        .unwrap();

    let call = calls.next().await.unwrap();
    assert!(call.reply.is_none());
    assert!(!call.envelope.reply);
    assert_eq!(call.envelope.args_type, Some(vec!["bytes".to_string()]));
    assert_eq!(call.envelope.args[0], serde_json::json!("AQI="));
}

#[async_std::test]
async fn concurrent_calls_resolve_independently_with_distinct_cids() {
    let mut client = Client::new();
    client.attach_local(&spawn_server());
    let client = std::sync::Arc::new(client);

    let calls = (0..64).map(|i| {
        let client = std::sync::Arc::clone(&client);
        async_std::task::spawn(async move {
            client
                .call("Echo", args![format!("message-{}", i)])
                .await
                .unwrap()
        })
    });
    let results = future::join_all(calls).await;

    let cids = results
        .iter()
        .map(|result| result.cid.clone())
        .collect::<std::collections::HashSet<_>>();
    assert_eq!(cids.len(), 64);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.result, serde_json::json!(format!("message-{}", i)));
    }
}

#[async_std::test]
async fn shutting_down_ends_the_server_stream_and_in_flight_calls() {
    let (handle, mut calls) = LocalServerHandle::channel();
    let mut client = Client::new();
    client.attach_local(&handle);

    client.call_nr("Notify", args![]).await.unwrap();
    client.done().await.unwrap();

    // The queued call is still delivered, then the stream ends.
    assert!(calls.next().await.is_some());
    assert!(calls.next().await.is_none());

    // A drained client behaves as never connected.
    let error = client.call("Echo", args![]).await.unwrap_err();
    assert_eq!(error.to_string(), "rpc service connection failed");
}

#[async_std::test]
async fn server_teardown_mid_flight_closes_the_call() {
    let (handle, mut calls) = LocalServerHandle::channel();
    let mut client = Client::new();
    client.attach_local(&handle);

    let pending = async_std::task::spawn(async move {
        let client = client;
        client.call("Echo", args!["hello"]).await
    });

    // Drop the reply sender without answering.
    let call = calls.next().await.unwrap();
    drop(call.reply);

    let error = pending.await.unwrap_err();
    assert_eq!(error.to_string(), "client closed");
}
