//! Spreadsheet upload collaborator
//!
//! Accepts a file and an endpoint tag and hands it to the ETL pipeline.
//! CV files never go through here; they take the document-extraction path.

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Which ETL pipeline the spreadsheet feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EtlEndpoint {
    /// Project Request workbook (headcount, hires, costs).
    Pr,
    /// Job-opening and candidate inventory workbook.
    Vagas,
}

impl EtlEndpoint {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "pr" => Ok(EtlEndpoint::Pr),
            "vagas" => Ok(EtlEndpoint::Vagas),
            other => Err(ScreenerError::InvalidInput(format!(
                "unknown ETL endpoint '{}', expected pr or vagas",
                other
            ))),
        }
    }

    fn accepted_extensions(&self) -> &'static [&'static str] {
        match self {
            EtlEndpoint::Pr => &["xlsm"],
            EtlEndpoint::Vagas => &["xlsx"],
        }
    }
}

impl fmt::Display for EtlEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtlEndpoint::Pr => write!(f, "pr"),
            EtlEndpoint::Vagas => write!(f, "vagas"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub job_id: String,
    pub file_name: String,
    pub status: String,
}

pub trait EtlUploader {
    fn upload(
        &self,
        file: &Path,
        endpoint: EtlEndpoint,
    ) -> impl std::future::Future<Output = Result<UploadResponse>> + Send;
}

/// Local stand-in for the ETL service: validates the workbook extension and
/// acknowledges with a deterministic job id.
#[derive(Debug, Default)]
pub struct LocalEtlUploader;

impl EtlUploader for LocalEtlUploader {
    async fn upload(&self, file: &Path, endpoint: EtlEndpoint) -> Result<UploadResponse> {
        if !file.exists() {
            return Err(ScreenerError::Upload(format!(
                "file does not exist: {}",
                file.display()
            )));
        }
        let extension = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !endpoint.accepted_extensions().contains(&extension.as_str()) {
            return Err(ScreenerError::Upload(format!(
                "endpoint '{}' accepts {:?}, got '.{}'",
                endpoint,
                endpoint.accepted_extensions(),
                extension
            )));
        }

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = file
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(UploadResponse {
            job_id: format!("etl-{}-{}", endpoint, stem),
            file_name,
            status: "processing_started".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn pr_endpoint_accepts_xlsm_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headcount.xlsx");
        writeln!(std::fs::File::create(&path).unwrap(), "stub").unwrap();

        let uploader = LocalEtlUploader;
        assert!(uploader.upload(&path, EtlEndpoint::Pr).await.is_err());
        let response = uploader.upload(&path, EtlEndpoint::Vagas).await.unwrap();
        assert_eq!(response.job_id, "etl-vagas-headcount");
        assert_eq!(response.status, "processing_started");
    }

    #[tokio::test]
    async fn missing_file_is_an_upload_error() {
        let uploader = LocalEtlUploader;
        let result = uploader
            .upload(Path::new("does-not-exist.xlsm"), EtlEndpoint::Pr)
            .await;
        assert!(matches!(result, Err(ScreenerError::Upload(_))));
    }

    #[test]
    fn endpoint_parsing() {
        assert_eq!(EtlEndpoint::parse("PR").unwrap(), EtlEndpoint::Pr);
        assert_eq!(EtlEndpoint::parse("vagas").unwrap(), EtlEndpoint::Vagas);
        assert!(EtlEndpoint::parse("cv").is_err());
    }
}
