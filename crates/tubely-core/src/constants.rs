/// The only container accepted by the upload endpoint.
pub const ACCEPTED_VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Multipart field carrying the video body.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Suffix appended to a staged upload for the remuxed artifact.
pub const PROCESSED_FILE_SUFFIX: &str = ".processing";

/// Prefix for staged upload files in the scratch directory.
pub const SCRATCH_FILE_PREFIX: &str = "tubely-upload-";

/// Extension used when a content type has no usable subtype.
pub const FALLBACK_EXTENSION: &str = "bin";

/// Normalize a content type: drop parameters, trim and lowercase.
///
/// `"Video/MP4; codecs=avc1"` becomes `"video/mp4"`.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}
