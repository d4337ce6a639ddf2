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

use crate::manager::AncestryManager;
use crate::transport::{ResourceManagerClient, StorageClient, user_agent};
use crate::{Error, Result, stub};
use gax::backoff_policy::{BackoffPolicy, BackoffPolicyArg};
use gax::retry_policy::{Aip194Strict, RetryPolicy, RetryPolicyArg, RetryPolicyExt};
use gaxi::options::ClientConfig;
use google_cloud_auth::credentials::Credentials;
use std::sync::Arc;
use std::time::Duration;

/// The default limit for retrying a single request.
pub const DEFAULT_RETRY_TIME_LIMIT: Duration = Duration::from_secs(120);

/// A builder for [AncestryManager].
///
/// ```
/// # use google_cloud_ancestry::manager::AncestryManager;
/// # tokio_test::block_on(async {
/// let manager = AncestryManager::builder()
///     .with_offline(true)
///     .with_entries([("my-project", "organizations/123/folders/456")])
///     .build()
///     .await?;
/// assert!(manager.is_offline());
/// # google_cloud_ancestry::Result::<()>::Ok(()) });
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    offline: bool,
    entries: Vec<(String, String)>,
    default_project: Option<String>,
    resource_manager_endpoint: Option<String>,
    storage_endpoint: Option<String>,
    credentials: Option<Credentials>,
    user_agent: Option<String>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    backoff_policy: Option<Arc<dyn BackoffPolicy>>,
    resource_manager: Option<Arc<dyn stub::ResourceManager>>,
    storage: Option<Arc<dyn stub::Storage>>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates a new manager.
    ///
    /// Fails if the static entries are malformed, or if the clients for
    /// Cloud Resource Manager and Cloud Storage cannot be created.
    pub async fn build(self) -> Result<AncestryManager> {
        let (resource_manager, storage) = if self.offline {
            (None, None)
        } else {
            let (rm, s) = self.clients().await?;
            (Some(rm), Some(s))
        };
        let manager = AncestryManager::new(resource_manager, storage, self.default_project);
        manager.init_ancestry_cache(self.entries)?;
        Ok(manager)
    }

    /// Returns the injected stubs, creating real clients for any missing.
    ///
    /// Credentials are only created if at least one real client is needed.
    async fn clients(
        &self,
    ) -> Result<(Arc<dyn stub::ResourceManager>, Arc<dyn stub::Storage>)> {
        if let (Some(rm), Some(s)) = (&self.resource_manager, &self.storage) {
            return Ok((rm.clone(), s.clone()));
        }
        let cred = match &self.credentials {
            Some(c) => c.clone(),
            None => google_cloud_auth::credentials::Builder::default()
                .build()
                .map_err(Error::client)?,
        };
        let user_agent = user_agent(self.user_agent.as_deref());
        let resource_manager: Arc<dyn stub::ResourceManager> = match &self.resource_manager {
            Some(rm) => rm.clone(),
            None => {
                let config = self.client_config(&cred, self.resource_manager_endpoint.as_deref());
                let client = ResourceManagerClient::new(config, user_agent.clone())
                    .await
                    .map_err(Error::client)?;
                Arc::new(client)
            }
        };
        let storage: Arc<dyn stub::Storage> = match &self.storage {
            Some(s) => s.clone(),
            None => {
                let config = self.client_config(&cred, self.storage_endpoint.as_deref());
                let client = StorageClient::new(config, user_agent)
                    .await
                    .map_err(Error::client)?;
                Arc::new(client)
            }
        };
        Ok((resource_manager, storage))
    }

    fn client_config(&self, cred: &Credentials, endpoint: Option<&str>) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.endpoint = endpoint.map(|e| e.trim_end_matches('/').to_string());
        config.cred = Some(cred.clone());
        config.retry_policy = Some(self.retry_policy.clone().unwrap_or_else(|| {
            Arc::new(Aip194Strict.with_time_limit(DEFAULT_RETRY_TIME_LIMIT))
        }));
        config.backoff_policy = self.backoff_policy.clone();
        config
    }

    /// Disables all lookups in Cloud Resource Manager and Cloud Storage.
    ///
    /// An offline manager resolves ancestry only from resource fields and the
    /// static entries. Any stubs configured with
    /// [with_resource_manager][Builder::with_resource_manager] or
    /// [with_storage][Builder::with_storage] are ignored.
    pub fn with_offline(mut self, v: bool) -> Self {
        self.offline = v;
        self
    }

    /// Adds static ancestry entries.
    ///
    /// Each entry maps a resource to its ancestry path, root first. The
    /// resource is a project id, or a key such as `folders/123`. The path is a
    /// sequence of keys such as `organizations/123/folders/456`.
    pub fn with_entries<I, K, V>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(v.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the project used for resources that do not name one.
    pub fn with_default_project<V: Into<String>>(mut self, v: V) -> Self {
        self.default_project = Some(v.into());
        self
    }

    /// Sets the Cloud Resource Manager endpoint.
    ///
    /// Same as [with_resource_manager_endpoint][Builder::with_resource_manager_endpoint].
    pub fn with_endpoint<V: Into<String>>(self, v: V) -> Self {
        self.with_resource_manager_endpoint(v)
    }

    /// Sets the Cloud Resource Manager endpoint.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_ancestry::manager::AncestryManager;
    /// # async fn sample() -> anyhow::Result<()> {
    /// let manager = AncestryManager::builder()
    ///     .with_resource_manager_endpoint("https://private.googleapis.com")
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_resource_manager_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.resource_manager_endpoint = Some(v.into());
        self
    }

    /// Sets the Cloud Storage endpoint.
    pub fn with_storage_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.storage_endpoint = Some(v.into());
        self
    }

    /// Configures the authentication credentials.
    ///
    /// The default credentials are used if this is not called. More
    /// information about valid credentials types can be found in the
    /// [google-cloud-auth] crate documentation.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_ancestry::manager::AncestryManager;
    /// # async fn sample() -> anyhow::Result<()> {
    /// use google_cloud_auth::credentials::anonymous;
    /// let manager = AncestryManager::builder()
    ///     .with_credentials(anonymous::Builder::new().build())
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    ///
    /// [google-cloud-auth]: https://docs.rs/google-cloud-auth
    pub fn with_credentials<V: Into<Credentials>>(mut self, v: V) -> Self {
        self.credentials = Some(v.into());
        self
    }

    /// Prepends a prefix to the `user-agent` header.
    pub fn with_user_agent<V: Into<String>>(mut self, v: V) -> Self {
        self.user_agent = Some(v.into());
        self
    }

    /// Configures the retry policy for requests to Cloud Resource Manager and
    /// Cloud Storage.
    ///
    /// The default policy retries `UNAVAILABLE` errors and I/O errors for up
    /// to [DEFAULT_RETRY_TIME_LIMIT]. A `403` is never retried by the default
    /// policy.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_ancestry::manager::AncestryManager;
    /// # async fn sample() -> anyhow::Result<()> {
    /// use gax::retry_policy::{Aip194Strict, RetryPolicyExt};
    /// use std::time::Duration;
    /// let manager = AncestryManager::builder()
    ///     .with_retry_policy(
    ///         Aip194Strict
    ///             .with_attempt_limit(5)
    ///             .with_time_limit(Duration::from_secs(30)),
    ///     )
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_retry_policy<V: Into<RetryPolicyArg>>(mut self, v: V) -> Self {
        let policy: Arc<dyn RetryPolicy> = v.into().into();
        self.retry_policy = Some(policy);
        self
    }

    /// Configures the backoff between retry attempts.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_ancestry::manager::AncestryManager;
    /// # async fn sample() -> anyhow::Result<()> {
    /// use gax::exponential_backoff::ExponentialBackoffBuilder;
    /// use std::time::Duration;
    /// let manager = AncestryManager::builder()
    ///     .with_backoff_policy(
    ///         ExponentialBackoffBuilder::new()
    ///             .with_maximum_delay(Duration::from_secs(5))
    ///             .clamp(),
    ///     )
    ///     .build()
    ///     .await?;
    /// # Ok(()) }
    /// ```
    pub fn with_backoff_policy<V: Into<BackoffPolicyArg>>(mut self, v: V) -> Self {
        let policy: Arc<dyn BackoffPolicy> = v.into().into();
        self.backoff_policy = Some(policy);
        self
    }

    /// Reads the resource hierarchy from `v` instead of Cloud Resource Manager.
    ///
    /// Unless [with_storage][Builder::with_storage] is also called, the
    /// manager still creates a Cloud Storage client, and thus needs
    /// credentials. Use [with_credentials][Builder::with_credentials] to avoid
    /// loading the default credentials, e.g., in tests.
    pub fn with_resource_manager<T: stub::ResourceManager + 'static>(mut self, v: T) -> Self {
        self.resource_manager = Some(Arc::new(v));
        self
    }

    /// Reads bucket metadata from `v` instead of Cloud Storage.
    ///
    /// Unless [with_resource_manager][Builder::with_resource_manager] is also
    /// called, the manager still creates a Cloud Resource Manager client, and
    /// thus needs credentials. Use [with_credentials][Builder::with_credentials]
    /// to avoid loading the default credentials, e.g., in tests.
    pub fn with_storage<T: stub::Storage + 'static>(mut self, v: T) -> Self {
        self.storage = Some(Arc::new(v));
        self
    }
}
