// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};
use sp_rest_server::{Server, ServerConfig};
use tokio::task::JoinHandle;

const OWNER: &str = "user-1";

struct TestServer {
    base: String,
    client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ServerConfig {
            bind_addr: addr,
            seed_file: Some(
                PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/repositories.toml"),
            ),
            ..Default::default()
        };

        let server = Server::new(config).await.expect("server");
        let handle = tokio::spawn(async move {
            server.run().await.expect("server run");
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("client");
        let server = Self {
            base: format!("http://{}/api/v1", addr),
            client,
            _handle: handle,
        };
        server.wait_for_health().await;
        server
    }

    async fn wait_for_health(&self) {
        for _ in 0..50 {
            if let Ok(response) = self.client.get(self.url("/healthz")).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("server did not become healthy");
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn as_role(&self, method: reqwest::Method, path: &str, user: &str, role: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("x-user-key", user)
            .header("x-repository-role", role)
    }

    fn as_owner(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.as_role(method, path, OWNER, "owner")
    }

    async fn file(&self, path: &str) -> reqwest::Response {
        self.as_owner(reqwest::Method::GET, "/repos/acme/sapphire/branches/develop/file")
            .query(&[("path", path)])
            .send()
            .await
            .expect("file request")
    }
}

#[tokio::test]
async fn rename_redirects_to_new_settings_page_and_rejects_taken_names() {
    let server = TestServer::spawn().await;

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/rename")
        .json(&json!({"name": "Sapphire Two"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["redirect_url"], "/acme/sapphire-two/settings");

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/emerald/rename")
        .json(&json!({"name": "sapphire-two"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem: Value = response.json().await.unwrap();
    assert_eq!(problem["errors"]["name"][0], "Name already exists on this account");

    // The old name no longer resolves
    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/rename")
        .json(&json!({"name": "other"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_validates_name_length() {
    let server = TestServer::spawn().await;

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/rename")
        .json(&json!({"name": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem: Value = response.json().await.unwrap();
    assert_eq!(problem["errors"]["name"][0], "Name must be 1 to 100 characters");
}

#[tokio::test]
async fn rename_refuses_names_without_letters_or_digits() {
    let server = TestServer::spawn().await;

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/rename")
        .json(&json!({"name": "***"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let problem: Value = response.json().await.unwrap();
    assert_eq!(problem["errors"]["name"][0], "Name must contain letters or digits");

    // The repository keeps its name
    assert_eq!(server.file("src/lib.rs").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn default_branch_switch_navigates_to_settings() {
    let server = TestServer::spawn().await;

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/default-branch")
        .json(&json!({"name": "develop"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["redirect_url"], "/acme/sapphire/settings");

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/default-branch")
        .json(&json!({"name": "release"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn branch_analysis_accepts_start_and_stop_only() {
    let server = TestServer::spawn().await;

    for action in ["start", "Stop"] {
        let response = server
            .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/branches/develop/analysis")
            .json(&json!({ "action": action }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "action {action}");
    }

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/branches/develop/analysis")
        .json(&json!({"action": "pause"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let problem: Value = response.json().await.unwrap();
    assert_eq!(problem["title"], "Unsupported Action");

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/branches/missing/analysis")
        .json(&json!({"action": "start"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn exclude_patterns_change_reports_the_new_set_once() {
    let server = TestServer::spawn().await;
    let path = "/repos/acme/sapphire/exclude-patterns";

    let response = server
        .as_owner(reqwest::Method::PUT, path)
        .json(&json!({"patterns": ["target/**", "src/main.rs"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["patterns"], json!(["src/main.rs", "target/**"]));

    let response = server
        .as_owner(reqwest::Method::PUT, path)
        .json(&json!({"patterns": ["src/main.rs", "target/**"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server
        .as_owner(reqwest::Method::PUT, path)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The new pattern was propagated to the files
    let response = server.file("src/main.rs").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-sapphire-view"], "ignored-code-file");
}

#[tokio::test]
async fn ignoring_a_file_hides_it_and_redirects_to_files() {
    let server = TestServer::spawn().await;

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/branches/develop/ignore")
        .json(&json!({"path": "src/main.rs"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        "/acme/sapphire/tree/develop/files"
    );

    assert_eq!(server.file("src/main.rs").await.status(), StatusCode::NOT_FOUND);

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/branches/develop/ignore")
        .json(&json!({"path": "src/missing.rs"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn code_file_page_reflects_exclusion_state() {
    let server = TestServer::spawn().await;

    let response = server.file("src/lib.rs").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-sapphire-view"], "code-file");
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["detail"]["line_count"], 5);
    assert_eq!(page["ignore_file_button_visible"], true);
    assert_eq!(page["header"]["active_url"], "/acme/sapphire/tree/develop/files");

    let response = server.file("target/debug/build.log").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-sapphire-view"], "ignored-code-file");
    let page: Value = response.json().await.unwrap();
    assert_eq!(
        page["edit_exclude_patterns_link"],
        "/acme/sapphire/settings#exclude-patterns"
    );

    let response = server
        .as_role(
            reqwest::Method::GET,
            "/repos/acme/sapphire/branches/develop/file",
            "user-9",
            "viewer",
        )
        .query(&[("path", "src/lib.rs")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["ignore_file_button_visible"], false);
}

#[tokio::test]
async fn view_more_returns_the_requested_lines() {
    let server = TestServer::spawn().await;
    let path = "/repos/acme/sapphire/branches/develop/view-more";

    let response = server
        .as_owner(reqwest::Method::GET, path)
        .query(&[("path", "src/lib.rs"), ("start_line", "2"), ("end_line", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["lines"], json!(["line 2", "line 3"]));

    let response = server
        .as_owner(reqwest::Method::GET, path)
        .query(&[("path", "src/lib.rs"), ("start_line", "4"), ("end_line", "40")])
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["lines"], json!(["line 4", "line 5"]));
    assert_eq!(body["end_line"], 5);

    let response = server
        .as_owner(reqwest::Method::GET, path)
        .query(&[("path", "src/lib.rs"), ("start_line", "9"), ("end_line", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .as_owner(reqwest::Method::GET, path)
        .query(&[("path", "nope.rs"), ("start_line", "1"), ("end_line", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_requires_ownership() {
    let server = TestServer::spawn().await;

    let response = server
        .as_role(reqwest::Method::DELETE, "/repos/acme/sapphire", "user-2", "owner")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = server
        .as_owner(reqwest::Method::DELETE, "/repos/acme/sapphire")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["redirect_url"], "/dashboard");

    assert_eq!(server.file("src/lib.rs").await.status(), StatusCode::NOT_FOUND);

    let ready: Value = server
        .client
        .get(server.url("/readyz"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ready["store"]["repositories"], 1);
}

#[tokio::test]
async fn refresh_provider_needs_identity_and_a_linked_repository() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .post(server.url("/repos/acme/sapphire/refresh-provider"))
        .header("x-repository-role", "owner")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/sapphire/refresh-provider")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["branches"], 2);

    let response = server
        .as_owner(reqwest::Method::POST, "/repos/acme/emerald/refresh-provider")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn viewers_cannot_change_settings() {
    let server = TestServer::spawn().await;

    let response = server
        .as_role(
            reqwest::Method::PUT,
            "/repos/acme/sapphire/exclude-patterns",
            "user-9",
            "viewer",
        )
        .json(&json!({"patterns": ["*.md"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = server
        .client
        .post(server.url("/repos/acme/sapphire/default-branch"))
        .json(&json!({"name": "develop"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = server
        .as_role(
            reqwest::Method::POST,
            "/repos/acme/sapphire/rename",
            OWNER,
            "superuser",
        )
        .json(&json!({"name": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
