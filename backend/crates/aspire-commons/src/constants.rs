// Claim names and transport defaults defined by LTI 1.3 and the tool.

/// Custom-claims sub-map carrying course/user context.
pub const LTI_CUSTOM_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/custom";

/// Standard LTI roles claim (array of role URIs).
pub const LTI_ROLES_CLAIM: &str = "https://purl.imsglobal.org/spec/lti/claim/roles";

/// Key inside the custom-claims map holding the comma-delimited role list.
pub const DEFAULT_ROLES_KEY: &str = "roles";

/// Key inside the custom-claims map holding the course identifier.
pub const COURSE_ID_KEY: &str = "course_id";

/// Cookie used to carry the session identifier.
pub const SESSION_COOKIE_NAME: &str = "lti-session-id";

/// Header used when third-party cookies are blocked.
pub const SESSION_HEADER_NAME: &str = "x-session-cookie";
