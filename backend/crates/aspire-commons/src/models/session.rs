use super::{ClientCredentials, IdToken};
use crate::roles::RoleProvider;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An authenticated client, created only after a successful launch.
///
/// Equality and hashing use `session_id` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub id_token: IdToken,
    pub csrf_token: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_credentials: Option<ClientCredentials>,

    // Per-session work cache for an in-progress quiz interaction
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub concepts_to_be_tested: Vec<String>,
    #[serde(default)]
    pub question_ids: Vec<i64>,
    #[serde(default)]
    pub knowledge_state: BTreeMap<String, f64>,
}

/// A single-field update applied to a cached session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    ClientId(Option<String>),
    ClientCredentials(Option<ClientCredentials>),
    Params(Map<String, Value>),
    ConceptsToBeTested(Vec<String>),
    QuestionIds(Vec<i64>),
    KnowledgeState(BTreeMap<String, f64>),
}

impl SessionUpdate {
    /// Name of the session field this update writes.
    pub fn field_name(&self) -> &'static str {
        match self {
            SessionUpdate::ClientId(_) => "client_id",
            SessionUpdate::ClientCredentials(_) => "client_credentials",
            SessionUpdate::Params(_) => "params",
            SessionUpdate::ConceptsToBeTested(_) => "concepts_to_be_tested",
            SessionUpdate::QuestionIds(_) => "question_ids",
            SessionUpdate::KnowledgeState(_) => "knowledge_state",
        }
    }
}

impl Session {
    pub fn new(
        session_id: impl Into<String>,
        id_token: IdToken,
        csrf_token: impl Into<String>,
        client_id: Option<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            id_token,
            csrf_token: csrf_token.into(),
            client_id,
            client_credentials: None,
            params: Map::new(),
            concepts_to_be_tested: Vec::new(),
            question_ids: Vec::new(),
            knowledge_state: BTreeMap::new(),
        }
    }

    /// Apply one field update in place.
    pub fn apply(&mut self, update: SessionUpdate) {
        match update {
            SessionUpdate::ClientId(value) => self.client_id = value,
            SessionUpdate::ClientCredentials(value) => self.client_credentials = value,
            SessionUpdate::Params(value) => self.params = value,
            SessionUpdate::ConceptsToBeTested(value) => self.concepts_to_be_tested = value,
            SessionUpdate::QuestionIds(value) => self.question_ids = value,
            SessionUpdate::KnowledgeState(value) => self.knowledge_state = value,
        }
    }

    /// Roles of the session's user as derived by the deployment's provider.
    pub fn roles(&self, provider: &dyn RoleProvider) -> HashSet<String> {
        provider.roles(&self.id_token)
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.session_id == other.session_id
    }
}

impl Eq for Session {}

impl Hash for Session {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.session_id.hash(state);
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LTI_CUSTOM_CLAIM;
    use crate::roles::CustomClaimRoles;
    use serde_json::json;

    fn claims() -> IdToken {
        let value = json!({
            "iss": "https://lms.example.edu",
            LTI_CUSTOM_CLAIM: { "roles": "TeacherEnrollment,DesignerEnrollment" }
        });
        match value {
            Value::Object(map) => IdToken::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_equality_uses_session_id_only() {
        let a = Session::new("s1", claims(), "csrf-a", None);
        let mut b = Session::new("s1", IdToken::default(), "csrf-b", Some("c".into()));
        b.apply(SessionUpdate::QuestionIds(vec![1, 2]));
        assert_eq!(a, b);

        let c = Session::new("s2", claims(), "csrf-a", None);
        assert_ne!(a, c);

        let set: HashSet<Session> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_apply_updates_single_field() {
        let mut session = Session::new("s1", claims(), "csrf", None);
        session.apply(SessionUpdate::ConceptsToBeTested(vec!["Recursion".into()]));
        session.apply(SessionUpdate::KnowledgeState(BTreeMap::from([(
            "Recursion".to_string(),
            0.5,
        )])));

        assert_eq!(session.concepts_to_be_tested, vec!["Recursion".to_string()]);
        assert_eq!(session.knowledge_state.get("Recursion"), Some(&0.5));
        assert!(session.question_ids.is_empty());
        assert_eq!(session.csrf_token, "csrf");
    }

    #[test]
    fn test_roles_use_provider() {
        let session = Session::new("s1", claims(), "csrf", None);
        let roles = session.roles(&CustomClaimRoles::default());
        assert!(roles.contains("TeacherEnrollment"));
        assert!(roles.contains("DesignerEnrollment"));
        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(SessionUpdate::QuestionIds(vec![]).field_name(), "question_ids");
        assert_eq!(SessionUpdate::ClientId(None).field_name(), "client_id");
    }
}
