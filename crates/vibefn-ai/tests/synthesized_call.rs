//! End-to-end: a `#[vibefn]` function served by a stubbed OpenAI-compatible
//! backend. No hand-written body anywhere; the wire format, the engine call
//! path, and the macro-generated wrapper are all exercised together.

use serde_json::json;
use vibefn_macros::vibefn;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[vibefn(save_money = false, model = "gpt-4.1-mini")]
/// Sort the list in ascending order and print the sorted list.
fn sort(a: Vec<i64>) -> Vec<i64> {
    unimplemented!()
}

#[test]
fn test_synthesized_sort_round_trip() {
    // The decorated function blocks on its own runtime, so the mock backend
    // runs on a separate one that stays alive for the whole test.
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "a.sort();\nprint(a);\na"}}
                ]
            })))
            .mount(&server)
            .await;
        server
    });

    std::env::set_var("VIBEFN_API_KEY", "test-key");
    std::env::set_var(
        "VIBEFN_ENDPOINT",
        format!("{}/v1/chat/completions", server.uri()),
    );

    let sorted = sort(vec![1, 222, 3333, 4, 45634, 1314235, 233]);
    assert_eq!(sorted, vec![1, 4, 222, 233, 3333, 45634, 1314235]);

    // Caching is disabled, so a second call generates again.
    let sorted = sort(vec![3, 2, 1]);
    assert_eq!(sorted, vec![1, 2, 3]);

    let requests = rt
        .block_on(server.received_requests())
        .expect("request recording enabled");
    assert_eq!(requests.len(), 2);
}
