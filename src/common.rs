// Link-management service segments, selected by environment
pub static PRODUCTION_LINK_SERVICE: &str = "prdplg-linkmanagementservice";
pub static PROVING_LINK_SERVICE: &str = "ppdplg-linkmanagementservice";
pub static LINK_SERVICE_MARKER: &str = "linkmanagementservice";

// Header names
pub static API_VERSION_HEADER: &str = "x-api-version";
pub static TRANSACTION_ID_HEADER: &str = "x-transaction-id";

// Media types
pub static JSON_MEDIA_TYPE: &str = "application/json";
pub static LINK_MANAGEMENT_MEDIA_TYPE: &str = "application/app.v3+json";
pub static OCTET_STREAM_MEDIA_TYPE: &str = "application/octet-stream";

pub static LINK_MANAGEMENT_API_VERSION: &str = "3";

// Token lifecycle
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;
pub const TOKEN_EXPIRY_SAFETY_MARGIN_SECONDS: i64 = 30;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
