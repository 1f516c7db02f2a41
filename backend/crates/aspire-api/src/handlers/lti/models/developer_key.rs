//! Developer key document pasted into the platform's tool registration

use serde::{Deserialize, Serialize};

use crate::context::ToolContext;

const CANVAS_PLATFORM: &str = "canvas.instructure.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperKey {
    pub title: String,
    pub description: String,
    pub oidc_initiation_url: String,
    pub target_link_uri: String,
    pub public_jwk_url: String,
    pub redirect_uris: Vec<String>,
    pub extensions: Vec<PlatformExtension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformExtension {
    pub domain: String,
    pub platform: String,
    pub privacy_level: String,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub text: String,
    pub placement: String,
    pub message_type: String,
    pub target_link_uri: String,
}

/// Host part of an absolute URL.
fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

impl DeveloperKey {
    pub fn for_tool(tool: &ToolContext) -> Self {
        Self {
            title: tool.title.clone(),
            description: tool.description.clone(),
            oidc_initiation_url: tool.url("/lti/oidc/init"),
            target_link_uri: tool.launch_uri.clone(),
            public_jwk_url: tool.url("/lti/public_jwk"),
            redirect_uris: vec![tool.redirect_uri.clone()],
            extensions: vec![PlatformExtension {
                domain: host_of(&tool.tool_domain).to_string(),
                platform: CANVAS_PLATFORM.to_string(),
                privacy_level: "public".to_string(),
                placements: vec![Placement {
                    text: tool.title.clone(),
                    placement: "course_navigation".to_string(),
                    message_type: "LtiResourceLinkRequest".to_string(),
                    target_link_uri: tool.launch_uri.clone(),
                }],
            }],
        }
    }
}
