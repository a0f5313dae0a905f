/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Public API version reported by the root and health endpoints
pub const API_VERSION: &str = "1.0.0";

/// Prefix shared by all versioned routes
pub const API_V1_PREFIX: &str = "/api/v1";

/// Window used by the "recent uploads" statistic
pub const RECENT_UPLOAD_WINDOW_HOURS: i64 = 24;

/// MIME type used when the extension is unknown
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Extra body allowance on top of MAX_FILE_SIZE for multipart framing
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
