//! Multipart upload to `POST {api_url}/videos/create`.

use async_trait::async_trait;
use curl::easy::Form;
use std::path::Path;

use super::{UploadResponse, UploadSource, VideoUpload};
use crate::source::{decode_json, http_error, perform, run_blocking, HttpConfig, SourceError, UPLOAD_FAILED};

#[derive(Debug, Clone)]
pub struct HttpUploadSource {
    http: HttpConfig,
}

impl HttpUploadSource {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }

    /// Blocking upload; call from `spawn_blocking` if used from async code.
    pub fn upload_blocking(&self, upload: &VideoUpload) -> Result<UploadResponse, SourceError> {
        check_file(&upload.video_path, "video")?;
        check_file(&upload.thumbnail_path, "thumbnail")?;
        let data = serde_json::to_string(&upload.metadata).map_err(SourceError::Decode)?;

        let mut form = Form::new();
        form.part("video").file(&upload.video_path).add()?;
        form.part("thumbnail").file(&upload.thumbnail_path).add()?;
        form.part("data").contents(data.as_bytes()).add()?;

        let url = self.http.endpoint(&["videos", "create"])?;
        // Empty `Expect:` stops curl from waiting on 100-continue before the body.
        let mut easy = self.http.easy(&url, self.http.upload_timeout, &["Expect:"])?;
        easy.httppost(form)?;

        tracing::info!(
            title = %upload.metadata.title,
            video = %upload.video_path.display(),
            "uploading video"
        );
        let (code, body) = perform(&mut easy)?;
        if !(200..300).contains(&code) {
            return Err(http_error(code, &body, &["message", "detail"], UPLOAD_FAILED));
        }
        let response: UploadResponse = decode_json(&body)?;
        tracing::info!(job_id = %response.id, "upload accepted");
        Ok(response)
    }
}

fn check_file(path: &Path, what: &str) -> Result<(), SourceError> {
    let meta = std::fs::metadata(path)
        .map_err(|e| SourceError::io(format!("{what} file {}", path.display()), e))?;
    if !meta.is_file() {
        return Err(SourceError::io(
            format!("{what} file {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    Ok(())
}

#[async_trait]
impl UploadSource for HttpUploadSource {
    async fn upload(&self, upload: &VideoUpload) -> Result<UploadResponse, SourceError> {
        let source = self.clone();
        let upload = upload.clone();
        run_blocking(move || source.upload_blocking(&upload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::VideoMetadata;

    #[test]
    fn missing_video_file_is_reported_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let thumb = dir.path().join("thumb.jpg");
        std::fs::write(&thumb, b"jpg").unwrap();
        let source = HttpUploadSource::new(HttpConfig::new("http://127.0.0.1:9").unwrap());
        let upload = VideoUpload {
            metadata: VideoMetadata::default(),
            video_path: dir.path().join("missing.mp4"),
            thumbnail_path: thumb,
        };
        let err = source.upload_blocking(&upload).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("video file"));
    }

    #[test]
    fn directory_is_not_accepted_as_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("v.mp4");
        std::fs::write(&video, b"mp4").unwrap();
        let source = HttpUploadSource::new(HttpConfig::new("http://127.0.0.1:9").unwrap());
        let upload = VideoUpload {
            metadata: VideoMetadata::default(),
            video_path: video,
            thumbnail_path: dir.path().to_path_buf(),
        };
        let err = source.upload_blocking(&upload).unwrap_err();
        assert!(err.to_string().contains("thumbnail file"));
    }
}
