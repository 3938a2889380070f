//! LocalStack test context and utilities.

use aws_sdk_s3::Client as S3Client;

/// Credentials LocalStack accepts by default.
pub const LOCALSTACK_KEY: &str = "test";

/// LocalStack test context providing an S3 client.
pub struct LocalStackTestContext {
    pub s3: S3Client,
    pub endpoint: String,
    pub region: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());
        let region = "us-east-1".to_string();

        let credentials = aws_sdk_s3::config::Credentials::new(
            LOCALSTACK_KEY,
            LOCALSTACK_KEY,
            None,
            None,
            "localstack",
        );
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.clone()))
            .endpoint_url(&endpoint)
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Self {
            s3: S3Client::from_conf(s3_config),
            endpoint,
            region,
        }
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Create an S3 bucket for testing if it does not exist yet.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        let buckets = self.s3.list_buckets().send().await?;
        let exists = buckets
            .buckets()
            .iter()
            .any(|b| b.name().unwrap_or_default() == name);

        if !exists {
            self.s3.create_bucket().bucket(name).send().await?;
        }
        Ok(())
    }

    /// Upload `count` small objects under `prefix`.
    pub async fn upload_objects(
        &self,
        bucket: &str,
        prefix: &str,
        count: usize,
    ) -> Result<(), aws_sdk_s3::Error> {
        for i in 0..count {
            self.s3
                .put_object()
                .bucket(bucket)
                .key(format!("{prefix}object-{i:03}.txt"))
                .body(format!("object {i}").into_bytes().into())
                .send()
                .await?;
        }
        Ok(())
    }
}
