//! Aliyun gateway error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AliyunError {
    #[error("aliyun CLI not found. Install: https://github.com/aliyun/aliyun-cli")]
    CliNotFound,

    #[error("aliyun command failed: {0}")]
    CommandFailed(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cloud error: {0}")]
    Cloud(#[from] ecsflow_cloud::CloudError),
}

impl From<AliyunError> for ecsflow_cloud::CloudError {
    fn from(e: AliyunError) -> Self {
        match e {
            AliyunError::CommandFailed(msg) => ecsflow_cloud::CloudError::CommandFailed(msg),
            AliyunError::Json(e) => ecsflow_cloud::CloudError::Json(e),
            AliyunError::Io(e) => ecsflow_cloud::CloudError::Io(e),
            AliyunError::Cloud(e) => e,
            e @ AliyunError::CliNotFound => ecsflow_cloud::CloudError::ApiError(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AliyunError>;
