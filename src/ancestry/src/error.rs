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

//! The error type returned by ancestry lookups.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Where to send users that lack permissions on the resource hierarchy.
pub const TROUBLESHOOTING_URL: &str = "https://cloud.google.com/docs/terraform/policy-validation/troubleshooting#ProjectCallerForbidden";

/// The error type for ancestry lookups.
///
/// The library reports errors from multiple sources: invalid static
/// configuration, resources missing the fields needed to place them in the
/// hierarchy, permission problems, and failures talking to the Cloud Resource
/// Manager or Cloud Storage services. This type offers a series of predicates
/// to determine the error kind.
///
/// Errors from the services are reported as a [gax::error::Error], available
/// via [service_error][Error::service_error].
///
/// # Example
/// ```
/// use google_cloud_ancestry::Error;
/// let error = Error::missing_field("organization id");
/// assert!(error.is_missing_field());
/// assert!(!error.is_permission_denied());
/// assert!(error.service_error().is_none());
/// ```
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// The static ancestry entries, or a key derived from them, are malformed.
    ///
    /// These errors are never retried, they indicate a problem in the
    /// application configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self.0, ErrorKind::Configuration(_))
    }

    /// The resource lacks a field required to place it in the hierarchy.
    pub fn is_missing_field(&self) -> bool {
        matches!(self.0, ErrorKind::MissingField(_))
    }

    /// The caller lacks permissions to read the resource hierarchy.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.0, ErrorKind::PermissionDenied { .. })
    }

    /// The ancestry is not cached and online lookups are disabled.
    pub fn is_offline(&self) -> bool {
        matches!(self.0, ErrorKind::Offline(_))
    }

    /// A request to Cloud Resource Manager or Cloud Storage failed, or
    /// returned an invalid response.
    pub fn is_service(&self) -> bool {
        matches!(self.0, ErrorKind::Service(_))
    }

    /// The Cloud Resource Manager or Cloud Storage clients could not be
    /// created.
    pub fn is_client(&self) -> bool {
        matches!(self.0, ErrorKind::Client(_))
    }

    /// The error returned by the service, if any.
    ///
    /// This includes the error rewritten into a
    /// [permission denied][Error::is_permission_denied] error.
    pub fn service_error(&self) -> Option<&gax::error::Error> {
        match &self.0 {
            ErrorKind::Service(e) => Some(e),
            ErrorKind::PermissionDenied { source, .. } => Some(source),
            ErrorKind::SetAncestors(e) => e.service_error(),
            _ => None,
        }
    }

    /// The HTTP status code, if the error was returned by the service.
    pub fn http_status_code(&self) -> Option<u16> {
        self.service_error()
            .and_then(gax::error::Error::http_status_code)
    }

    /// Creates an error representing invalid static configuration.
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self(ErrorKind::Configuration(message.into()))
    }

    /// Creates an error representing a missing resource field.
    pub fn missing_field(field: &'static str) -> Self {
        Self(ErrorKind::MissingField(field))
    }

    /// Creates an error for a `403` received while reading `resource`.
    pub fn permission_denied<R>(resource: R, source: gax::error::Error) -> Self
    where
        R: Into<String>,
    {
        Self(ErrorKind::PermissionDenied {
            resource: resource.into(),
            source,
        })
    }

    /// Creates an error for a lookup of `resource` while offline.
    pub fn offline<T: Into<String>>(resource: T) -> Self {
        Self(ErrorKind::Offline(resource.into()))
    }

    /// Creates an error for a service response that cannot describe a valid
    /// hierarchy.
    pub(crate) fn invalid_response<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Service(gax::error::Error::deser(source)))
    }

    /// Creates an error representing a failure to create the clients.
    pub fn client<T: Into<BoxError>>(source: T) -> Self {
        Self(ErrorKind::Client(source.into()))
    }

    /// Wraps an error from a [set_ancestors][crate::manager::Ancestors::set_ancestors] call.
    pub(crate) fn set_ancestors(source: Error) -> Self {
        Self(ErrorKind::SetAncestors(Box::new(source)))
    }

    /// The inner error of errors that wrap another ancestry error.
    pub fn inner(&self) -> Option<&Error> {
        match &self.0 {
            ErrorKind::SetAncestors(e) => Some(e),
            _ => None,
        }
    }
}

impl From<gax::error::Error> for Error {
    fn from(value: gax::error::Error) -> Self {
        Self(ErrorKind::Service(value))
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("invalid ancestry configuration: {0}")]
    Configuration(String),
    #[error("{0} not found in terraform data")]
    MissingField(&'static str),
    #[error("user does not have the correct permissions for {resource}. For more info: {url}", url = TROUBLESHOOTING_URL)]
    PermissionDenied {
        resource: String,
        #[source]
        source: gax::error::Error,
    },
    #[error("resource manager required to fetch ancestry for {0} from the API")]
    Offline(String),
    #[error(transparent)]
    Service(gax::error::Error),
    #[error("cannot create the Cloud Resource Manager or Cloud Storage clients")]
    Client(#[source] BoxError),
    #[error("getting resource ancestry or parent failed: {0}")]
    SetAncestors(#[source] Box<Error>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn forbidden() -> gax::error::Error {
        gax::error::Error::http(403, http::HeaderMap::new(), bytes::Bytes::new())
    }

    #[test]
    fn constructors() {
        let error = Error::configuration("bad key");
        assert!(error.is_configuration(), "{error:?}");
        assert!(error.to_string().contains("bad key"), "{error}");

        let error = Error::missing_field("organization id");
        assert!(error.is_missing_field(), "{error:?}");
        assert_eq!(
            error.to_string(),
            "organization id not found in terraform data"
        );

        let error = Error::offline("projects/p");
        assert!(error.is_offline(), "{error:?}");
        assert!(error.to_string().contains("projects/p"), "{error}");

        let error = Error::client("simulated");
        assert!(error.is_client(), "{error:?}");
        assert!(error.source().is_some(), "{error:?}");
        assert!(error.service_error().is_none(), "{error:?}");
    }

    #[test]
    fn permission_denied() {
        let error = Error::permission_denied("projects/p", forbidden());
        assert!(error.is_permission_denied(), "{error:?}");
        let msg = error.to_string();
        assert!(msg.contains("projects/p"), "{msg}");
        assert!(msg.contains(TROUBLESHOOTING_URL), "{msg}");
        assert!(error.source().is_some(), "{error:?}");
        assert_eq!(error.http_status_code(), Some(403));
    }

    #[test]
    fn service() {
        let payload = bytes::Bytes::from_static(b"uh-oh");
        let error = Error::from(gax::error::Error::http(
            404,
            http::HeaderMap::new(),
            payload.clone(),
        ));
        assert!(error.is_service(), "{error:?}");
        assert_eq!(error.http_status_code(), Some(404));
        assert_eq!(
            error.service_error().and_then(|e| e.http_payload()),
            Some(&payload)
        );
    }

    #[test]
    fn invalid_response() {
        let error = Error::invalid_response("the ancestry of projects/p is empty");
        assert!(error.is_service(), "{error:?}");
        assert!(!error.is_configuration(), "{error:?}");
        assert!(
            error
                .service_error()
                .is_some_and(gax::error::Error::is_deserialization),
            "{error:?}"
        );
        assert_eq!(error.http_status_code(), None);
    }

    #[test]
    fn set_ancestors() {
        let error = Error::set_ancestors(Error::permission_denied("folders/1", forbidden()));
        assert!(error.inner().is_some_and(Error::is_permission_denied), "{error:?}");
        assert_eq!(error.http_status_code(), Some(403));
        assert!(
            error.to_string().starts_with("getting resource ancestry or parent failed"),
            "{error}"
        );
    }
}
