/// S3 connection settings shared by storage clients
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region
    pub region: String,
    /// Custom endpoint for S3-compatible storage (MinIO, LocalStack)
    pub endpoint: Option<String>,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            path_style: false,
        }
    }
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint: std::env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),
            path_style: std::env::var("S3_FORCE_PATH_STYLE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }

    /// Build the URL of an object in the given bucket
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
            }
            None if self.path_style => {
                format!("https://s3.{}.amazonaws.com/{}/{}", self.region, bucket, key)
            }
            None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, self.region, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_virtual_hosted_style() {
        let config = S3Config::default();

        let url = config.object_url("photos-in-output", "user123.png.icons.zip");
        assert_eq!(
            url,
            "https://photos-in-output.s3.us-east-1.amazonaws.com/user123.png.icons.zip"
        );
    }

    #[test]
    fn test_object_url_path_style() {
        let config = S3Config {
            region: "eu-west-1".to_string(),
            endpoint: None,
            path_style: true,
        };

        let url = config.object_url("out", "a/b.zip");
        assert_eq!(url, "https://s3.eu-west-1.amazonaws.com/out/a/b.zip");
    }

    #[test]
    fn test_object_url_custom_endpoint() {
        let config = S3Config {
            region: "us-east-1".to_string(),
            endpoint: Some("http://localhost:4566/".to_string()),
            path_style: true,
        };

        let url = config.object_url("out", "k.zip");
        assert_eq!(url, "http://localhost:4566/out/k.zip");
    }
}
