//! S3 implementation of the bucket API.
//!
//! Maps HeadBucket / ListObjectsV2 responses onto existence answers and
//! [`ProbeError`] variants. The SDK error is first flattened into a
//! [`RemoteFailure`] so the classification rules are plain functions.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use sx_error::ProbeError;
use sx_traits::BucketApi;
use sx_types::ExistenceResult;
use tracing::{debug, trace, warn};

/// Error codes that mean the caller's credentials were rejected.
const AUTH_ERROR_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
    "TokenRefreshRequired",
    "InvalidClientTokenId",
];

/// Error codes the service uses to ask for a lower request rate.
const THROTTLE_ERROR_CODES: &[&str] = &[
    "SlowDown",
    "Throttling",
    "ThrottlingException",
    "TooManyRequests",
    "RequestLimitExceeded",
];

/// Error codes for transient server-side failures.
const TRANSIENT_ERROR_CODES: &[&str] = &["InternalError", "RequestTimeout"];

/// Header S3 attaches to redirects and HEAD responses naming the bucket's region.
const BUCKET_REGION_HEADER: &str = "x-amz-bucket-region";

/// How an SDK call failed, before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    /// The service answered with an error response
    Service,
    /// The SDK gave up waiting
    Timeout,
    /// The request never reached the service (connection, DNS, IO)
    Dispatch,
    /// The response could not be read or parsed
    Response,
    /// The request could not be built (signing, credentials)
    Construction,
}

/// Flattened view of an SDK error.
#[derive(Debug, Clone)]
pub(crate) struct RemoteFailure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub region_hint: Option<String>,
    pub summary: String,
}

impl RemoteFailure {
    fn from_sdk<E>(err: &SdkError<E, HttpResponse>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        let summary = DisplayErrorContext(err).to_string();
        let mut failure = Self {
            kind: FailureKind::Response,
            status: None,
            code: None,
            message: None,
            region_hint: None,
            summary,
        };

        match err {
            SdkError::ServiceError(service) => {
                let raw = service.raw();
                failure.kind = FailureKind::Service;
                failure.status = Some(raw.status().as_u16());
                failure.code = service.err().code().map(str::to_string);
                failure.message = service.err().message().map(str::to_string);
                failure.region_hint = raw
                    .headers()
                    .get(BUCKET_REGION_HEADER)
                    .map(str::to_string);
            }
            SdkError::TimeoutError(_) => failure.kind = FailureKind::Timeout,
            SdkError::DispatchFailure(dispatch) => {
                failure.kind = if dispatch.is_timeout() {
                    FailureKind::Timeout
                } else {
                    FailureKind::Dispatch
                };
            }
            SdkError::ConstructionFailure(_) => failure.kind = FailureKind::Construction,
            _ => failure.kind = FailureKind::Response,
        }

        failure
    }

    fn has_code(&self, codes: &[&str]) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| codes.contains(&code))
    }

    /// A service error with a status and nothing else to go on.
    fn is_bare_status(&self, status: u16) -> bool {
        self.kind == FailureKind::Service && self.status == Some(status) && self.code.is_none()
    }

    fn mentions_credentials(&self) -> bool {
        self.summary.to_lowercase().contains("credential")
    }

    fn code_and_message(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => match self.status {
                Some(status) => format!("HTTP {status}"),
                None => self.summary.clone(),
            },
        }
    }
}

/// Definitive existence answer carried by a failed HeadBucket, if any.
///
/// HeadBucket has no response body, so 403 and 404 usually arrive without
/// an error code and the status is what distinguishes them.
pub(crate) fn head_answer(failure: &RemoteFailure) -> Option<ExistenceResult> {
    if failure.kind != FailureKind::Service || failure.has_code(AUTH_ERROR_CODES) {
        return None;
    }

    if failure.has_code(&["NoSuchBucket", "NotFound"]) {
        return Some(ExistenceResult::NotFound);
    }

    match failure.status {
        Some(403) => Some(ExistenceResult::Forbidden),
        Some(404) => Some(ExistenceResult::NotFound),
        _ => None,
    }
}

/// Classify a failure that carried no existence answer.
pub(crate) fn classify_failure(failure: &RemoteFailure) -> ProbeError {
    match failure.kind {
        FailureKind::Timeout => ProbeError::Transport(format!("timeout: {}", failure.summary)),
        FailureKind::Dispatch | FailureKind::Construction if failure.mentions_credentials() => {
            ProbeError::Auth(failure.summary.clone())
        }
        FailureKind::Dispatch | FailureKind::Response => {
            ProbeError::Transport(failure.summary.clone())
        }
        FailureKind::Construction => {
            ProbeError::service("RequestConstruction", failure.summary.clone())
        }
        FailureKind::Service => classify_service_failure(failure),
    }
}

fn classify_service_failure(failure: &RemoteFailure) -> ProbeError {
    if failure.has_code(AUTH_ERROR_CODES) {
        return ProbeError::Auth(failure.code_and_message());
    }

    if failure.has_code(THROTTLE_ERROR_CODES) || matches!(failure.status, Some(429 | 503)) {
        return ProbeError::Throttled(failure.code_and_message());
    }

    if failure.has_code(TRANSIENT_ERROR_CODES) || matches!(failure.status, Some(500 | 502 | 504))
    {
        return ProbeError::Transport(failure.code_and_message());
    }

    let code = failure
        .code
        .clone()
        .or_else(|| match failure.status {
            Some(301) => Some("PermanentRedirect".to_string()),
            Some(status) => Some(format!("HTTP {status}")),
            None => None,
        })
        .unwrap_or_else(|| "Unknown".to_string());

    let mut message = failure
        .message
        .clone()
        .unwrap_or_else(|| failure.summary.clone());
    if let Some(region) = &failure.region_hint {
        message.push_str(&format!(" (bucket region: {region})"));
    }

    ProbeError::Service { code, message }
}

/// Bucket API backed by the AWS S3 SDK.
#[derive(Debug, Clone)]
pub struct S3BucketApi {
    client: Client,
}

impl S3BucketApi {
    /// Wrap a configured S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Ask the service whether it accepts the caller's credentials.
    ///
    /// HeadBucket errors carry no body, so a rejected key and a bucket owned
    /// by someone else both look like a bare 403. ListBuckets answers with an
    /// XML error document, which names the rejection. Only a rejection is
    /// returned; `AccessDenied` means the signature was accepted.
    pub async fn verify_credentials(&self) -> Result<(), ProbeError> {
        let err = match self.client.list_buckets().send().await {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };

        let failure = RemoteFailure::from_sdk(&err);
        match classify_failure(&failure) {
            rejected @ ProbeError::Auth(_) => Err(rejected),
            _ if failure.has_code(&["AccessDenied"]) => {
                debug!("Credentials accepted, ListBuckets not permitted");
                Ok(())
            }
            other => {
                warn!(error = %other, "Could not verify credentials with the service");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl BucketApi for S3BucketApi {
    async fn head_bucket(&self, bucket: &str) -> Result<ExistenceResult, ProbeError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(ExistenceResult::Accessible),
            Err(err) => {
                let failure = RemoteFailure::from_sdk(&err);
                trace!(bucket, ?failure, "HeadBucket failed");
                if let Some(answer) = head_answer(&failure) {
                    return Ok(answer);
                }
                // Expired or malformed session tokens surface as a bare 400
                if failure.is_bare_status(400) {
                    self.verify_credentials().await?;
                }
                Err(classify_failure(&failure))
            }
        }
    }

    async fn list_objects(&self, bucket: &str, max_keys: usize) -> Result<Vec<String>, ProbeError> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(i32::try_from(max_keys).unwrap_or(i32::MAX))
            .send()
            .await
            .map_err(|err| {
                let failure = RemoteFailure::from_sdk(&err);
                trace!(bucket, ?failure, "ListObjectsV2 failed");
                classify_failure(&failure)
            })?;

        Ok(resp
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(str::to_string))
            .take(max_keys)
            .collect())
    }
}
