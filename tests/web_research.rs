//! End-to-end run of the web research agent against mocked providers.

use agentica::agent::{Agent, AgentOptions, WEB_RESEARCH_SYSTEM_PROMPT};
use agentica::environment::SearchEnvironment;
use agentica::llm::ProviderClient;
use agentica::types::{ModelConfig, TaskStatus};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tool_use(name: &str, input: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "tool_use", "id": "toolu_1", "name": name, "input": input}],
        "stop_reason": "tool_use"
    }))
}

async fn mount_turn(server: &MockServer, schema: &str, input: Value, times: Option<u64>) {
    let mock = Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"tool_choice": {"name": schema}})))
        .respond_with(tool_use(schema, input));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

/// User messages sent to the model for one schema, in order.
async fn prompts(server: &MockServer, schema: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
        .filter(|body| body["tool_choice"]["name"] == schema)
        .filter_map(|body| body["messages"][0]["content"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn searches_visits_and_finishes() {
    let web = MockServer::start().await;
    let model = MockServer::start().await;
    let page_url = format!("{}/events", web.uri());

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "events Austin today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {
                    "title": "Austin Events Today",
                    "link": page_url,
                    "snippet": "Live music tonight."
                },
                {
                    "title": "Austin Calendar",
                    "link": "https://calendar.example/austin",
                    "snippet": "All events."
                }
            ]
        })))
        .expect(1)
        .mount(&web)
        .await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Tonight in Austin</title></head>\
             <body><h2>Music</h2><p>Blues at Antone's.</p></body></html>",
        ))
        .expect(1)
        .mount(&web)
        .await;

    let search = json!({"action": "search", "query": "events Austin today"});
    mount_turn(&model, "SearchAction", search, Some(1)).await;
    let visit = json!({"action": "visit_url", "url": page_url});
    mount_turn(&model, "SearchAction", visit, None).await;

    let read_first = json!({"status": "running", "message": "Read the first result"});
    mount_turn(&model, "TaskOutcome", read_first, Some(1)).await;
    let have_page = json!({"status": "running", "notes": "have page"});
    mount_turn(&model, "TaskOutcome", have_page, Some(1)).await;
    let done = json!({"status": "done", "message": "Blues at Antone's tonight."});
    mount_turn(&model, "TaskOutcome", done, None).await;

    let client = ProviderClient::new(ModelConfig::default())
        .with_api_key("model-key")
        .with_base_url(model.uri());
    let environment = SearchEnvironment::with_api_key("serp-key")
        .expect("environment")
        .with_search_endpoint(format!("{}/search.json", web.uri()));
    let mut agent = Agent::with_model(WEB_RESEARCH_SYSTEM_PROMPT, Arc::new(client), environment)
        .with_options(AgentOptions {
            verbose: false,
            max_turns: Some(10),
        });

    let outcome = agent
        .run("Can you find me events in Austin today?")
        .await
        .expect("run completes");

    assert_eq!(outcome.status, TaskStatus::Done);
    assert_eq!(outcome.message.as_deref(), Some("Blues at Antone's tonight."));

    let env = agent.environment();
    assert_eq!(env.search_history().len(), 1);
    assert_eq!(env.search_history()[0].len(), 2);
    assert_eq!(env.visited_urls().len(), 1);

    let actions = prompts(&model, "SearchAction").await;
    assert_eq!(actions.len(), 3);
    assert!(actions[0].starts_with("Message:\n Can you find me events in Austin today?"));
    assert!(actions[0].ends_with("Search Results: []\nVisited URLs: []"));
    assert!(actions[1].starts_with("Message:\n Read the first result\nprevious task outcome: [{"));
    assert!(actions[1].contains("Austin Calendar"));
    assert!(actions[2].contains("Tonight in Austin"));

    let judgments = prompts(&model, "TaskOutcome").await;
    assert_eq!(judgments.len(), 3);
    assert!(judgments[0].contains("\"status\":\"Search Executed\""));
    assert!(judgments[1].contains("\"status\":\"URL Visited\""));
    assert!(judgments[2].contains("You have already visited this URL."));
}

#[tokio::test]
async fn missing_model_key_aborts_the_run() {
    std::env::remove_var("TOGETHER_API_KEY");
    let model = MockServer::start().await;
    let client = ProviderClient::new(ModelConfig {
        provider: "together".to_string(),
        ..ModelConfig::default()
    })
    .with_api_key("")
    .with_base_url(model.uri());
    let environment = SearchEnvironment::with_api_key("serp-key").expect("environment");
    let mut agent = Agent::with_model(WEB_RESEARCH_SYSTEM_PROMPT, Arc::new(client), environment);

    let err = agent.run("anything").await.expect_err("no key");
    assert_eq!(
        err.to_string(),
        "No API key for together: set `TOGETHER_API_KEY` or pass one explicitly"
    );
    assert!(model.received_requests().await.unwrap_or_default().is_empty());
}
