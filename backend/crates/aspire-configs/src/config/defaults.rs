// Default value functions for serde and `ServerConfig::default()`.

pub fn default_true() -> bool {
    true
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_workers() -> usize {
    0 // 0 = one worker per CPU
}

pub fn default_environment() -> String {
    "production".to_string()
}

pub fn default_domain_name() -> String {
    "http://127.0.0.1:8080".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_oidc_redirect_path() -> String {
    "/lti/oidc/response".to_string()
}

pub fn default_tool_title() -> String {
    "Aspire".to_string()
}

pub fn default_tool_description() -> String {
    "Aspire adaptive quizzing".to_string()
}

pub fn default_simulator_client_id() -> String {
    "aspire-dev".to_string()
}

pub fn default_simulator_login_hint() -> String {
    "dev-user".to_string()
}

pub fn default_nonce_ttl_seconds() -> u64 {
    120 // a launch completes in seconds; abandoned handshakes age out quickly
}

pub fn default_session_idle_seconds() -> u64 {
    8 * 60 * 60 // 8 hours
}

pub fn default_reaper_interval_seconds() -> u64 {
    60
}

pub fn default_cookie_name() -> String {
    "lti-session-id".to_string()
}

pub fn default_header_name() -> String {
    "x-session-cookie".to_string()
}

pub fn default_role_source() -> String {
    "custom".to_string()
}

pub fn default_roles_claim_key() -> String {
    "roles".to_string()
}

pub fn default_leeway_seconds() -> u64 {
    60
}

pub fn default_cors_methods() -> Vec<String> {
    vec![
        "GET".to_string(),
        "POST".to_string(),
        "PUT".to_string(),
        "DELETE".to_string(),
        "OPTIONS".to_string(),
    ]
}

pub fn default_cors_headers() -> Vec<String> {
    vec![
        "Content-Type".to_string(),
        "Accept".to_string(),
        "Origin".to_string(),
        "X-Requested-With".to_string(),
        default_header_name(),
    ]
}

pub fn default_cors_expose_headers() -> Vec<String> {
    vec![default_header_name()]
}

pub fn default_cors_max_age() -> u64 {
    3600 // 1 hour
}
