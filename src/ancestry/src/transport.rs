// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Implements the [stub] traits over HTTP and JSON.

use crate::model::{Bucket, Folder, GetAncestryResponse};
use crate::stub;
use gax::options::RequestOptions;
use gax::response::Response;
use gaxi::http::{NoBody, ReqwestClient};
use gaxi::options::ClientConfig;

/// The default endpoint for the Cloud Resource Manager service.
pub const DEFAULT_RESOURCE_MANAGER_ENDPOINT: &str = "https://cloudresourcemanager.googleapis.com";
/// The default endpoint for the Cloud Storage service.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

const DEFAULT_USER_AGENT: &str = concat!("google-cloud-ancestry/", env!("CARGO_PKG_VERSION"));

/// Percent encode a path segment.
///
/// Encode the following characters when they appear in a path segment:
///     !, #, $, &, ', (, ), *, +, ,, /, :, ;, =, ?, @, [, ], and space characters.
const ENCODED_CHARS: percent_encoding::AsciiSet = percent_encoding::CONTROLS
    .add(b'!')
    .add(b'#')
    .add(b'$')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b' ');

pub(crate) fn enc(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, &ENCODED_CHARS).to_string()
}

/// The user agent sent with every request, after any application prefix.
pub(crate) fn user_agent(prefix: Option<&str>) -> String {
    match prefix {
        Some(p) => format!("{p} {DEFAULT_USER_AGENT}"),
        None => DEFAULT_USER_AGENT.to_string(),
    }
}

/// The options for each request.
///
/// All the requests only read the hierarchy, so they are always safe to retry.
fn request_options(user_agent: &str) -> RequestOptions {
    let mut options = RequestOptions::default();
    options.set_idempotency(true);
    options.set_user_agent(user_agent);
    options
}

/// Implements [stub::ResourceManager] using the Cloud Resource Manager
/// v1 and v3 REST APIs.
#[derive(Clone, Debug)]
pub struct ResourceManagerClient {
    inner: ReqwestClient,
    user_agent: String,
}

impl ResourceManagerClient {
    pub(crate) async fn new(
        config: ClientConfig,
        user_agent: String,
    ) -> gax::client_builder::Result<Self> {
        let inner = ReqwestClient::new(config, DEFAULT_RESOURCE_MANAGER_ENDPOINT).await?;
        Ok(Self { inner, user_agent })
    }
}

#[async_trait::async_trait]
impl stub::ResourceManager for ResourceManagerClient {
    async fn get_ancestry(&self, project_id: String) -> gax::Result<GetAncestryResponse> {
        let path = format!("/v1/projects/{}:getAncestry", enc(&project_id));
        tracing::debug!(path, "sending getAncestry request");
        let builder = self.inner.builder(reqwest::Method::POST, path);
        self.inner
            .execute(
                builder,
                Some(serde_json::json!({})),
                request_options(&self.user_agent),
            )
            .await
            .map(Response::into_body)
    }

    async fn get_folder(&self, name: String) -> gax::Result<Folder> {
        let name = name.split('/').map(enc).collect::<Vec<_>>().join("/");
        let path = format!("/v3/{name}");
        tracing::debug!(path, "sending get request");
        let builder = self.inner.builder(reqwest::Method::GET, path);
        self.inner
            .execute(builder, None::<NoBody>, request_options(&self.user_agent))
            .await
            .map(Response::into_body)
    }
}

/// Implements [stub::Storage] using the Cloud Storage JSON API.
#[derive(Clone, Debug)]
pub struct StorageClient {
    inner: ReqwestClient,
    user_agent: String,
}

impl StorageClient {
    pub(crate) async fn new(
        config: ClientConfig,
        user_agent: String,
    ) -> gax::client_builder::Result<Self> {
        let inner = ReqwestClient::new(config, DEFAULT_STORAGE_ENDPOINT).await?;
        Ok(Self { inner, user_agent })
    }
}

#[async_trait::async_trait]
impl stub::Storage for StorageClient {
    async fn get_bucket(&self, bucket: String) -> gax::Result<Bucket> {
        let path = format!("/storage/v1/b/{}", enc(&bucket));
        tracing::debug!(path, "sending buckets.get request");
        let builder = self.inner.builder(reqwest::Method::GET, path);
        self.inner
            .execute(builder, None::<NoBody>, request_options(&self.user_agent))
            .await
            .map(Response::into_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{ResourceManager, Storage};
    use gax::exponential_backoff::ExponentialBackoffBuilder;
    use gax::retry_policy::{Aip194Strict, RetryPolicyExt};
    use google_cloud_auth::credentials::anonymous::Builder as Anonymous;
    use httptest::cycle;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    fn test_config(server: &Server) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.endpoint = Some(format!("http://{}", server.addr()));
        config.cred = Some(Anonymous::new().build());
        config.retry_policy = Some(Arc::new(
            Aip194Strict.with_time_limit(Duration::from_secs(5)),
        ));
        config.backoff_policy = Some(Arc::new(
            ExponentialBackoffBuilder::new()
                .with_initial_delay(Duration::from_millis(1))
                .with_maximum_delay(Duration::from_millis(1))
                .clamp(),
        ));
        config
    }

    async fn resource_manager(server: &Server) -> anyhow::Result<ResourceManagerClient> {
        Ok(ResourceManagerClient::new(test_config(server), user_agent(None)).await?)
    }

    async fn storage(server: &Server, prefix: Option<&str>) -> anyhow::Result<StorageClient> {
        Ok(StorageClient::new(test_config(server), user_agent(prefix)).await?)
    }

    fn unavailable() -> impl Responder {
        status_code(503).body(
            json!({"error": {"code": 503, "status": "UNAVAILABLE", "message": "try again"}})
                .to_string(),
        )
    }

    #[test_case("my-project", "my-project")]
    #[test_case("a b", "a%20b")]
    #[test_case("a/b", "a%2Fb")]
    #[test_case("a:b", "a%3Ab")]
    fn encode(input: &str, want: &str) {
        assert_eq!(enc(input), want);
    }

    #[test_case(None, DEFAULT_USER_AGENT)]
    #[test_case(Some("my-app/1.0"), concat!("my-app/1.0 ", "google-cloud-ancestry/", env!("CARGO_PKG_VERSION")))]
    fn user_agent_prefix(prefix: Option<&str>, want: &str) {
        assert_eq!(user_agent(prefix), want);
    }

    #[test]
    fn options() {
        let options = request_options("test/1.0");
        assert_eq!(options.idempotent(), Some(true));
        assert_eq!(options.user_agent().as_deref(), Some("test/1.0"));
    }

    #[tokio::test]
    async fn get_ancestry() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/v1/projects/my-project:getAncestry"),
                request::headers(contains(("user-agent", matches("^google-cloud-ancestry/")))),
            ])
            .respond_with(json_encoded(json!({
                "ancestor": [
                    {"resourceId": {"type": "project", "id": "my-project"}},
                    {"resourceId": {"type": "organization", "id": "123"}},
                ]
            }))),
        );

        let client = resource_manager(&server).await?;
        let response = client.get_ancestry("my-project".to_string()).await?;
        let keys = response
            .ancestor
            .iter()
            .map(|a| a.key())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["projects/my-project", "organizations/123"]);
        Ok(())
    }

    #[tokio::test]
    async fn get_folder() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/v3/folders/123")).respond_with(
                json_encoded(json!({"name": "folders/123", "parent": "organizations/456"})),
            ),
        );

        let client = resource_manager(&server).await?;
        let folder = client.get_folder("folders/123".to_string()).await?;
        assert_eq!(folder.name, "folders/123");
        assert_eq!(folder.parent, "organizations/456");
        Ok(())
    }

    #[tokio::test]
    async fn get_bucket() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/storage/v1/b/my-bucket"),
                request::headers(contains(("user-agent", matches("^test-prefix/1.0 ")))),
            ])
            .respond_with(json_encoded(
                json!({"name": "my-bucket", "projectNumber": "123456"}),
            )),
        );

        let client = storage(&server, Some("test-prefix/1.0")).await?;
        let bucket = client.get_bucket("my-bucket".to_string()).await?;
        assert_eq!(bucket.project_number, Some(123456));
        Ok(())
    }

    #[tokio::test]
    async fn error_with_status() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/v3/folders/123")).respond_with(
                status_code(404).body(
                    json!({"error": {"code": 404, "message": "folder not found", "status": "NOT_FOUND"}})
                        .to_string(),
                ),
            ),
        );

        let client = resource_manager(&server).await?;
        let err = client
            .get_folder("folders/123".to_string())
            .await
            .expect_err("a 404 should fail");
        assert_eq!(err.http_status_code(), Some(404), "{err:?}");
        assert_eq!(
            err.status().map(|s| s.message.as_str()),
            Some("folder not found"),
            "{err:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn error_without_status() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/storage/v1/b/b"))
                .respond_with(status_code(400).body("not json")),
        );

        let client = storage(&server, None).await?;
        let err = client
            .get_bucket("b".to_string())
            .await
            .expect_err("a 400 should fail");
        assert_eq!(err.http_status_code(), Some(400), "{err:?}");
        assert_eq!(
            err.http_payload(),
            Some(&bytes::Bytes::from_static(b"not json"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn retry_unavailable() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/v3/folders/123"))
                .times(2)
                .respond_with(cycle![
                    unavailable(),
                    json_encoded(json!({"name": "folders/123", "parent": "organizations/456"})),
                ]),
        );

        let client = resource_manager(&server).await?;
        let folder = client.get_folder("folders/123".to_string()).await?;
        assert_eq!(folder.parent, "organizations/456");
        Ok(())
    }

    #[tokio::test]
    async fn retry_get_ancestry() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/v1/projects/p:getAncestry"))
                .times(3)
                .respond_with(cycle![
                    unavailable(),
                    unavailable(),
                    json_encoded(json!({"ancestor": [{"resourceId": {"type": "project", "id": "p"}}]})),
                ]),
        );

        let client = resource_manager(&server).await?;
        let response = client.get_ancestry("p".to_string()).await?;
        assert_eq!(response.ancestor.len(), 1, "{response:?}");
        Ok(())
    }

    #[tokio::test]
    async fn no_retry_on_forbidden() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/v1/projects/p:getAncestry"))
                .times(1)
                .respond_with(status_code(403).body(
                    json!({"error": {"code": 403, "status": "PERMISSION_DENIED", "message": "denied"}})
                        .to_string(),
                )),
        );

        let client = resource_manager(&server).await?;
        let err = client
            .get_ancestry("p".to_string())
            .await
            .expect_err("a 403 should fail");
        assert_eq!(err.http_status_code(), Some(403), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn bad_response() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/storage/v1/b/b"))
                .respond_with(status_code(200).body("not json")),
        );

        let client = storage(&server, None).await?;
        let err = client
            .get_bucket("b".to_string())
            .await
            .expect_err("invalid JSON should fail");
        assert!(err.is_deserialization(), "{err:?}");
        Ok(())
    }
}
