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

//! Resource keys and ancestry paths.
//!
//! A resource key is a string of the form `<collection>/<id>`, where the
//! collection is one of `projects`, `folders`, or `organizations`. An ancestry
//! path is a root-first sequence of keys joined by `/`, for example
//! `organizations/123/folders/456/projects/my-project`. Singular collection
//! names are accepted on input and always normalized to the plural form.

use crate::{Error, Result};

/// The collection id for projects.
pub const PROJECTS: &str = "projects";
/// The collection id for folders.
pub const FOLDERS: &str = "folders";
/// The collection id for organizations.
pub const ORGANIZATIONS: &str = "organizations";

/// The key used when the organization of a resource cannot be determined.
pub const UNKNOWN_ORG: &str = "organizations/unknown";

pub(crate) const PROJECTS_PREFIX: &str = "projects/";
pub(crate) const FOLDERS_PREFIX: &str = "folders/";
pub(crate) const ORGANIZATIONS_PREFIX: &str = "organizations/";

/// The kind of resource named by a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Folder,
    Organization,
}

impl ResourceKind {
    /// The collection id, e.g. `folders`.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Project => PROJECTS,
            Self::Folder => FOLDERS,
            Self::Organization => ORGANIZATIONS,
        }
    }

    /// Returns the kind for a plural collection id.
    pub fn from_collection(collection: &str) -> Option<Self> {
        match collection {
            PROJECTS => Some(Self::Project),
            FOLDERS => Some(Self::Folder),
            ORGANIZATIONS => Some(Self::Organization),
            _ => None,
        }
    }

    /// Returns the kind of an already normalized key.
    pub fn of_key(key: &str) -> Option<Self> {
        key.split_once('/')
            .and_then(|(collection, _)| Self::from_collection(collection))
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

/// Replaces singular collection names with their plural form.
///
/// # Example
/// ```
/// # use google_cloud_ancestry::key::normalize_ancestry;
/// assert_eq!(
///     normalize_ancestry("organization/1/folder/2/project/3"),
///     "organizations/1/folders/2/projects/3"
/// );
/// ```
pub fn normalize_ancestry(value: &str) -> String {
    value
        .split('/')
        .map(|segment| match segment {
            "organization" => ORGANIZATIONS,
            "folder" => FOLDERS,
            "project" => PROJECTS,
            s => s,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Parses a static entry key into a resource key.
///
/// A value without `/` is a project id. Otherwise everything before the last
/// `/` must be a (possibly singular) collection id.
///
/// # Example
/// ```
/// # use google_cloud_ancestry::key::parse_ancestry_key;
/// assert_eq!(parse_ancestry_key("my-project")?, "projects/my-project");
/// assert_eq!(parse_ancestry_key("folder/1")?, "folders/1");
/// assert!(parse_ancestry_key("org/1").is_err());
/// # google_cloud_ancestry::Result::<()>::Ok(())
/// ```
pub fn parse_ancestry_key(value: &str) -> Result<String> {
    let key = normalize_ancestry(value);
    let Some((collection, _)) = key.rsplit_once('/') else {
        return Ok(format!("{PROJECTS_PREFIX}{key}"));
    };
    if ResourceKind::from_collection(collection).is_none() {
        return Err(Error::configuration(format!(
            "invalid key format {value}, the key should be in one of the formats: \
             projects/<project>, folders/<folder>, organizations/<organization>, or <project>"
        )));
    }
    Ok(key)
}

/// Returns `value` prefixed with `<collection>/`, unless it already is.
pub fn ensure_prefix(value: &str, collection: &str) -> String {
    match value.strip_prefix(collection) {
        Some(rest) if rest.starts_with('/') => value.to_string(),
        _ => format!("{collection}/{value}"),
    }
}

/// Parses an ancestry path into a nearest-first chain of resource keys.
///
/// # Example
/// ```
/// # use google_cloud_ancestry::key::parse_ancestry_path;
/// let chain = parse_ancestry_path("organization/1/folder/2")?;
/// assert_eq!(chain, vec!["folders/2", "organizations/1"]);
/// # google_cloud_ancestry::Result::<()>::Ok(())
/// ```
pub fn parse_ancestry_path(path: &str) -> Result<Vec<String>> {
    let normalized = normalize_ancestry(path);
    let segments = normalized.split('/').collect::<Vec<_>>();
    if segments.len() % 2 != 0 {
        return Err(Error::configuration(format!(
            "unexpected format of ancestry path {path}"
        )));
    }
    let mut chain = segments
        .chunks_exact(2)
        .map(|pair| match ResourceKind::from_collection(pair[0]) {
            Some(_) => Ok(format!("{}/{}", pair[0], pair[1])),
            None => Err(Error::configuration(format!(
                "invalid ancestry path {path} with {}",
                pair[0]
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    chain.reverse();
    Ok(chain)
}

/// Converts a nearest-first chain into a root-first ancestry path.
///
/// # Example
/// ```
/// # use google_cloud_ancestry::key::to_ancestry_path;
/// let chain = ["projects/3", "folders/2", "organizations/1"];
/// assert_eq!(to_ancestry_path(&chain), "organizations/1/folders/2/projects/3");
/// ```
pub fn to_ancestry_path<S: AsRef<str>>(chain: &[S]) -> String {
    chain
        .iter()
        .rev()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("organization/1", "organizations/1")]
    #[test_case("organizations/1", "organizations/1")]
    #[test_case("folder/1/project/p", "folders/1/projects/p")]
    #[test_case("projects/folder", "projects/folder"; "collection ids are only replaced as whole segments")]
    #[test_case("my-project", "my-project")]
    fn normalize(input: &str, want: &str) {
        assert_eq!(normalize_ancestry(input), want);
    }

    #[test_case("my-project", "projects/my-project")]
    #[test_case("project/my-project", "projects/my-project")]
    #[test_case("projects/my-project", "projects/my-project")]
    #[test_case("folder/1", "folders/1")]
    #[test_case("folders/1", "folders/1")]
    #[test_case("organization/1", "organizations/1")]
    #[test_case("organizations/1", "organizations/1")]
    fn parse_key(input: &str, want: &str) -> anyhow::Result<()> {
        assert_eq!(parse_ancestry_key(input)?, want);
        Ok(())
    }

    #[test_case("org/1")]
    #[test_case("folders/1/folders/2")]
    #[test_case("unknown/1")]
    fn parse_key_error(input: &str) {
        let got = parse_ancestry_key(input);
        assert!(
            got.as_ref().is_err_and(Error::is_configuration),
            "{got:?}"
        );
    }

    #[test]
    fn parse_key_normalization_invariance() -> anyhow::Result<()> {
        assert_eq!(parse_ancestry_key("folder/1")?, parse_ancestry_key("folders/1")?);
        assert_eq!(parse_ancestry_key("folders/1")?, "folders/1");
        Ok(())
    }

    #[test_case("123", PROJECTS, "projects/123")]
    #[test_case("projects/123", PROJECTS, "projects/123")]
    #[test_case("456", ORGANIZATIONS, "organizations/456")]
    #[test_case("organizations/456", ORGANIZATIONS, "organizations/456")]
    #[test_case("projectsfoo", PROJECTS, "projects/projectsfoo")]
    fn prefix(value: &str, collection: &str, want: &str) {
        assert_eq!(ensure_prefix(value, collection), want);
    }

    #[test_case("organizations/1", &["organizations/1"])]
    #[test_case("organization/1/folder/2", &["folders/2", "organizations/1"])]
    #[test_case(
        "organizations/1/folders/2/folders/3/projects/4",
        &["projects/4", "folders/3", "folders/2", "organizations/1"]
    )]
    fn parse_path(path: &str, want: &[&str]) -> anyhow::Result<()> {
        assert_eq!(parse_ancestry_path(path)?, want);
        Ok(())
    }

    #[test_case("organizations/1/folders"; "odd segment count")]
    #[test_case("organizations"; "single segment")]
    #[test_case("org/1/folders/2"; "unknown collection")]
    #[test_case("organizations/1/buckets/2"; "unknown trailing collection")]
    fn parse_path_error(path: &str) {
        let got = parse_ancestry_path(path);
        assert!(
            got.as_ref().is_err_and(Error::is_configuration),
            "{got:?}"
        );
    }

    #[test_case("organizations/1")]
    #[test_case("organizations/1/folders/2")]
    #[test_case("organizations/1/folders/2/projects/3")]
    #[test_case("organizations/1/folders/2/folders/3/folders/4/projects/5")]
    fn path_round_trip(path: &str) -> anyhow::Result<()> {
        assert_eq!(to_ancestry_path(&parse_ancestry_path(path)?), path);
        Ok(())
    }

    #[test]
    fn kind() {
        assert_eq!(ResourceKind::of_key("projects/p"), Some(ResourceKind::Project));
        assert_eq!(ResourceKind::of_key("folders/1"), Some(ResourceKind::Folder));
        assert_eq!(
            ResourceKind::of_key("organizations/1"),
            Some(ResourceKind::Organization)
        );
        assert_eq!(ResourceKind::of_key("buckets/b"), None);
        assert_eq!(ResourceKind::of_key("projects"), None);
        assert_eq!(ResourceKind::Folder.to_string(), "folders");
    }
}
