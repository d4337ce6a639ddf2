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

//! Resolves the ancestry of Cloud Asset Inventory assets.

use crate::asset::{self, Asset, AssetResource, asset_parent};
use crate::builder::Builder;
use crate::cache::AncestryCache;
use crate::key::{
    FOLDERS, ORGANIZATIONS, ORGANIZATIONS_PREFIX, PROJECTS, PROJECTS_PREFIX, UNKNOWN_ORG,
    ensure_prefix, parse_ancestry_key, parse_ancestry_path,
};
use crate::model::Ancestor;
use crate::resource::{
    self, ResourceData, folder_from_resource, get_ok, organization_from_resource,
    project_from_fields,
};
use crate::{Error, Result, stub};
use std::sync::Arc;

/// Computes the ancestry of assets.
///
/// Conversions receive an implementation of this trait, typically an
/// [AncestryManager]. Use [NoopAncestryManager] when the conversion should not
/// consult the resource hierarchy.
#[async_trait::async_trait]
pub trait Ancestors: std::fmt::Debug + Send + Sync {
    /// Returns the ancestry chain of an asset, nearest first, and the full
    /// resource name of its parent.
    async fn ancestors(
        &self,
        data: &dyn ResourceData,
        asset: &Asset,
    ) -> Result<(Vec<String>, String)>;

    /// Computes the ancestry of `asset` and records it in the asset.
    ///
    /// Sets [Asset::ancestors] and, if the asset has a resource,
    /// [AssetResource::parent].
    async fn set_ancestors(&self, data: &dyn ResourceData, asset: &mut Asset) -> Result<()> {
        let (ancestors, parent) = self
            .ancestors(data, asset)
            .await
            .map_err(Error::set_ancestors)?;
        if let Some(resource) = asset.resource.as_mut() {
            resource.parent = parent;
        }
        asset.ancestors = ancestors;
        Ok(())
    }
}

/// Resolves ancestry from resource fields, static entries, and the Cloud
/// Resource Manager API.
///
/// The manager caches every chain it discovers, including the chains of all
/// the ancestors in the chain. The cache is never invalidated, ancestry is
/// assumed to be stable for the lifetime of the manager.
///
/// # Example
/// ```no_run
/// # tokio_test::block_on(async {
/// use google_cloud_ancestry::asset::{Asset, FOLDER};
/// use google_cloud_ancestry::manager::{AncestryManager, Ancestors};
/// use google_cloud_ancestry::resource::ResourceFields;
///
/// let manager = AncestryManager::builder().build().await?;
/// let data = ResourceFields::new().set_field("folder_id", "123");
/// let asset = Asset::new().set_asset_type(FOLDER);
/// let (ancestors, parent) = manager.ancestors(&data, &asset).await?;
/// println!("{ancestors:?} {parent}");
/// # google_cloud_ancestry::Result::<()>::Ok(()) });
/// ```
#[derive(Debug)]
pub struct AncestryManager {
    resource_manager: Option<Arc<dyn stub::ResourceManager>>,
    storage: Option<Arc<dyn stub::Storage>>,
    default_project: Option<String>,
    cache: AncestryCache,
}

impl AncestryManager {
    /// Returns a builder for [AncestryManager].
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn new(
        resource_manager: Option<Arc<dyn stub::ResourceManager>>,
        storage: Option<Arc<dyn stub::Storage>>,
        default_project: Option<String>,
    ) -> Self {
        Self {
            resource_manager,
            storage,
            default_project,
            cache: AncestryCache::new(),
        }
    }

    /// The ancestry cache.
    pub fn cache(&self) -> &AncestryCache {
        &self.cache
    }

    /// Returns true if the manager never calls the Cloud Resource Manager API.
    pub fn is_offline(&self) -> bool {
        self.resource_manager.is_none()
    }

    /// Loads static entries into the cache.
    ///
    /// Each entry maps a resource (a project id, or a `<collection>/<id>` key)
    /// to its root-first ancestry path. Entries with an empty resource or
    /// path are ignored.
    pub(crate) fn init_ancestry_cache<I, K, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (item, path) in entries {
            let (item, path) = (item.as_ref(), path.as_ref());
            if item.is_empty() || path.is_empty() {
                continue;
            }
            let mut ancestors = parse_ancestry_path(path)?;
            let key = parse_ancestry_key(item)?;
            // A project id may map to an ancestry starting with the project
            // number. Assets use the number, so keep it as the first element.
            let include_key = match ancestors.first() {
                Some(first) => {
                    first != &key
                        && !(key.starts_with(PROJECTS_PREFIX)
                            && first.starts_with(PROJECTS_PREFIX))
                }
                None => true,
            };
            if include_key {
                ancestors.insert(0, key.clone());
            }
            tracing::debug!("static ancestry for {key}: {ancestors:?}");
            self.cache.store(&key, &ancestors);
        }
        Ok(())
    }

    async fn fetch_ancestors(
        &self,
        data: &dyn ResourceData,
        asset: &Asset,
    ) -> Result<Vec<String>> {
        tracing::info!(
            "Retrieving ancestry from resource (type={})",
            asset.asset_type
        );
        let org_key =
            organization_from_resource(data).map(|o| ensure_prefix(o, ORGANIZATIONS));
        let folder_key = folder_from_resource(data).map(|f| ensure_prefix(f, FOLDERS));
        let project_key = self
            .project_from_resource(data, asset)
            .await
            .map(|p| ensure_prefix(&p, PROJECTS));

        let key = match asset.asset_type.as_str() {
            asset::FOLDER => folder_key.or(org_key),
            asset::ORGANIZATION => match org_key {
                Some(k) => Some(k),
                None => return Err(Error::missing_field("organization id")),
            },
            asset::ROLE => org_key.or(project_key),
            asset::PROJECT | asset::PROJECT_BILLING_INFO => {
                return self.project_ancestors(project_key, org_key, folder_key).await;
            }
            // The `org_id` of an Apigee instance is an Apigee organization.
            asset::APIGEE_INSTANCE => project_key,
            _ => project_key,
        };
        match key {
            Some(k) => self.ancestors_with_cache(&k).await,
            None => Ok(vec![UNKNOWN_ORG.to_string()]),
        }
    }

    /// Resolves the ancestry of a project, or of a project's billing info.
    ///
    /// The project ancestry is always fetched first, using only project level
    /// permissions. A folder walk is needed only when the folder in the
    /// resource differs from the cached ancestry, e.g., after a project moves.
    async fn project_ancestors(
        &self,
        project_key: Option<String>,
        org_key: Option<String>,
        folder_key: Option<String>,
    ) -> Result<Vec<String>> {
        let Some(project_key) = project_key else {
            return match (org_key, folder_key) {
                (Some(org), _) => Ok(vec![org]),
                (None, Some(folder)) => self.ancestors_with_cache(&folder).await,
                (None, None) => Ok(vec![UNKNOWN_ORG.to_string()]),
            };
        };
        let project = self.ancestors_with_cache(&project_key).await;
        if let Err(e) = &project {
            tracing::debug!("cannot fetch the ancestry of {project_key}: {e}");
        }
        let mut ancestors = vec![project_key];
        if let Some(org) = org_key {
            ancestors.push(org);
            return Ok(ancestors);
        }
        if let Some(folder) = folder_key {
            ancestors.extend(self.ancestors_with_cache(&folder).await?);
            return Ok(ancestors);
        }
        project
    }

    /// Returns the project of a resource, if any.
    async fn project_from_resource(
        &self,
        data: &dyn ResourceData,
        asset: &Asset,
    ) -> Option<String> {
        match asset.asset_type.as_str() {
            asset::PROJECT | asset::PROJECT_BILLING_INFO => {
                let project = get_ok(data, resource::NUMBER)
                    .or_else(|| get_ok(data, resource::PROJECT_ID));
                if let Some(p) = project {
                    return Some(p.to_string());
                }
                tracing::warn!(
                    "Failed to retrieve project_id for {} from resource",
                    asset.name
                );
            }
            asset::BUCKET => {
                if let Some(p) = asset.resource.as_ref().and_then(AssetResource::data_project) {
                    return Some(p);
                }
                tracing::warn!(
                    "Failed to retrieve project_id for {} from cai resource",
                    asset.name
                );
                if let Some(p) = self.bucket_project(data).await {
                    return Some(p);
                }
            }
            _ => {}
        }
        project_from_fields(data)
            .map(str::to_string)
            .or_else(|| self.default_project.clone())
    }

    /// Returns the number of the project owning the bucket in `data`.
    async fn bucket_project(&self, data: &dyn ResourceData) -> Option<String> {
        let Some(bucket) = get_ok(data, resource::BUCKET) else {
            tracing::warn!("Failed to retrieve bucket field from tf data");
            return None;
        };
        let storage = self.storage.as_ref()?;
        match storage.get_bucket(bucket.to_string()).await {
            Ok(b) => match b.project_number {
                Some(n) => Some(n.to_string()),
                None => {
                    tracing::warn!("Bucket {bucket} has no project number");
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to get bucket {bucket}: {e}");
                None
            }
        }
    }

    /// Returns the ancestry of `key`, walking the hierarchy as needed.
    ///
    /// Organizations are their own root. Projects use the v1 `getAncestry`
    /// RPC, which needs only project level permissions. Folders are walked
    /// one parent at a time with the v3 API. The walk stops at the first
    /// cached resource.
    pub(crate) async fn ancestors_with_cache(&self, key: &str) -> Result<Vec<String>> {
        let mut ancestors = Vec::new();
        let mut cur = key.to_string();
        while !cur.is_empty() {
            if let Some(cached) = self.cache.get(&cur) {
                tracing::debug!("cache hit for {cur}");
                ancestors.extend(cached);
                break;
            }
            if cur.starts_with(ORGANIZATIONS_PREFIX) {
                ancestors.push(cur);
                break;
            }
            let Some(resource_manager) = &self.resource_manager else {
                return Err(Error::offline(cur));
            };
            if let Some(project_id) = cur.strip_prefix(PROJECTS_PREFIX) {
                tracing::debug!("fetching the ancestry of {cur}");
                let response = resource_manager
                    .get_ancestry(project_id.to_string())
                    .await
                    .map_err(|e| handle_crm_error(&cur, e))?;
                if response.ancestor.is_empty() {
                    return Err(Error::invalid_response(format!(
                        "the ancestry of {cur} is empty"
                    )));
                }
                ancestors.extend(response.ancestor.iter().map(Ancestor::key));
                break;
            }
            tracing::debug!("fetching {cur}");
            let folder = resource_manager
                .get_folder(cur.clone())
                .await
                .map_err(|e| handle_crm_error(&cur, e))?;
            if !folder.parent.is_empty() && ancestors.contains(&folder.parent) {
                return Err(Error::invalid_response(format!(
                    "the ancestry of {key} contains a cycle at {}",
                    folder.parent
                )));
            }
            ancestors.push(if folder.name.is_empty() {
                cur
            } else {
                folder.name
            });
            cur = folder.parent;
        }
        self.cache.store(key, &ancestors);
        Ok(ancestors)
    }
}

#[async_trait::async_trait]
impl Ancestors for AncestryManager {
    async fn ancestors(
        &self,
        data: &dyn ResourceData,
        asset: &Asset,
    ) -> Result<(Vec<String>, String)> {
        let ancestors = self.fetch_ancestors(data, asset).await?;
        let parent = asset_parent(&asset.asset_type, &ancestors)?;
        Ok((ancestors, parent))
    }
}

/// Rewrites permission errors to name the resource and a troubleshooting guide.
fn handle_crm_error(resource: &str, error: gax::error::Error) -> Error {
    if error.http_status_code() == Some(403) {
        return Error::permission_denied(resource, error);
    }
    Error::from(error)
}

/// An [Ancestors] implementation that never computes any ancestry.
///
/// # Example
/// ```
/// # tokio_test::block_on(async {
/// use google_cloud_ancestry::asset::Asset;
/// use google_cloud_ancestry::manager::{Ancestors, NoopAncestryManager};
/// use google_cloud_ancestry::resource::ResourceFields;
/// let (ancestors, parent) = NoopAncestryManager
///     .ancestors(&ResourceFields::new(), &Asset::new())
///     .await?;
/// assert!(ancestors.is_empty());
/// assert!(parent.is_empty());
/// # google_cloud_ancestry::Result::<()>::Ok(()) });
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAncestryManager;

#[async_trait::async_trait]
impl Ancestors for NoopAncestryManager {
    async fn ancestors(
        &self,
        _data: &dyn ResourceData,
        _asset: &Asset,
    ) -> Result<(Vec<String>, String)> {
        Ok((Vec::new(), String::new()))
    }
}
