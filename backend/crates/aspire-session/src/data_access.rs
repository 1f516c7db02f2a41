//! Access certificates and compliance policies.
//!
//! A session carries [`AccessCertificate`]s per [`DataTarget`], describing
//! which entity ids it may touch and with which rights. A data service states
//! what it is about to return as a [`CompliancePolicy`] and asks
//! [`DataAccess::has_access`] whether the policy is covered.
//!
//! When it is not, the caller picks the failure behavior:
//! - [`FailureMode::Deadly`] rejects the request outright
//! - [`FailureMode::Safe`] narrows the policy to the ids a certificate with
//!   exactly the requested rights allows

use aspire_commons::ids::fingerprint;
use aspire_commons::Session;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRight {
    Read,
    Write,
    Delete,
}

impl AccessRight {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessRight::Read => "read",
            AccessRight::Write => "write",
            AccessRight::Delete => "delete",
        }
    }
}

impl fmt::Display for AccessRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity ids covered by a certificate or policy.
///
/// Serialized as the string `"all"` or an array of integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryIds {
    All,
    Ids(BTreeSet<i64>),
}

impl EntryIds {
    pub fn ids<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        EntryIds::Ids(ids.into_iter().collect())
    }

    pub fn none() -> Self {
        EntryIds::Ids(BTreeSet::new())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, EntryIds::All)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EntryIds::Ids(ids) if ids.is_empty())
    }

    pub fn contains(&self, id: i64) -> bool {
        match self {
            EntryIds::All => true,
            EntryIds::Ids(ids) => ids.contains(&id),
        }
    }

    /// `All` is only a subset of `All`.
    pub fn is_subset(&self, other: &EntryIds) -> bool {
        match (self, other) {
            (_, EntryIds::All) => true,
            (EntryIds::All, EntryIds::Ids(_)) => false,
            (EntryIds::Ids(a), EntryIds::Ids(b)) => a.is_subset(b),
        }
    }

    pub fn intersection(&self, other: &EntryIds) -> EntryIds {
        match (self, other) {
            (EntryIds::All, EntryIds::All) => EntryIds::All,
            (EntryIds::All, EntryIds::Ids(ids)) | (EntryIds::Ids(ids), EntryIds::All) => {
                EntryIds::Ids(ids.clone())
            }
            (EntryIds::Ids(a), EntryIds::Ids(b)) => EntryIds::Ids(a.intersection(b).copied().collect()),
        }
    }
}

impl fmt::Display for EntryIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryIds::All => f.write_str("all"),
            EntryIds::Ids(ids) => {
                let ids: Vec<String> = ids.iter().map(i64::to_string).collect();
                write!(f, "{{{}}}", ids.join(", "))
            }
        }
    }
}

impl Serialize for EntryIds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntryIds::All => serializer.serialize_str("all"),
            EntryIds::Ids(ids) => ids.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryIdsRepr {
    Keyword(String),
    Ids(BTreeSet<i64>),
}

impl<'de> Deserialize<'de> for EntryIds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match EntryIdsRepr::deserialize(deserializer)? {
            EntryIdsRepr::Keyword(keyword) if keyword == "all" => Ok(EntryIds::All),
            EntryIdsRepr::Keyword(other) => Err(D::Error::custom(format!(
                "expected \"all\" or an array of ids, got \"{}\"",
                other
            ))),
            EntryIdsRepr::Ids(ids) => Ok(EntryIds::Ids(ids)),
        }
    }
}

fn format_rights(rights: &BTreeSet<AccessRight>) -> String {
    let rights: Vec<&str> = rights.iter().map(AccessRight::as_str).collect();
    format!("{{{}}}", rights.join(", "))
}

/// What a session is allowed to do with a set of entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCertificate {
    pub entry_ids: EntryIds,
    pub access_rights: BTreeSet<AccessRight>,
}

impl AccessCertificate {
    pub fn new<R: IntoIterator<Item = AccessRight>>(entry_ids: EntryIds, rights: R) -> Self {
        Self {
            entry_ids,
            access_rights: rights.into_iter().collect(),
        }
    }

    /// Whether this certificate alone covers `policy`.
    pub fn grants(&self, policy: &CompliancePolicy) -> bool {
        policy.access_rights.is_subset(&self.access_rights)
            && policy.entry_ids.is_subset(&self.entry_ids)
    }
}

/// What a data service is about to do; same shape as a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    pub entry_ids: EntryIds,
    pub access_rights: BTreeSet<AccessRight>,
}

impl CompliancePolicy {
    pub fn new<R: IntoIterator<Item = AccessRight>>(entry_ids: EntryIds, rights: R) -> Self {
        Self {
            entry_ids,
            access_rights: rights.into_iter().collect(),
        }
    }

    /// Policy granting nothing: no ids and no rights.
    pub fn empty() -> Self {
        Self {
            entry_ids: EntryIds::none(),
            access_rights: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry_ids.is_empty() && self.access_rights.is_empty()
    }

    /// Whether `id` may be returned under this policy.
    pub fn allows(&self, id: i64) -> bool {
        !self.access_rights.is_empty() && self.entry_ids.contains(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTarget {
    ModuleAccess,
    CourseAccess,
    StudentAccess,
}

impl DataTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataTarget::ModuleAccess => "module_access",
            DataTarget::CourseAccess => "course_access",
            DataTarget::StudentAccess => "student_access",
        }
    }
}

impl fmt::Display for DataTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Narrow the policy to what a matching certificate allows
    #[default]
    Safe,
    /// Reject the request
    Deadly,
}

/// Raised in [`FailureMode::Deadly`] when no certificate covers the policy.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "Unauthorized Access - Target resource(s) {} requires {target} and {} rights.",
    .policy.entry_ids,
    format_rights(&.policy.access_rights)
)]
pub struct DataAccessError {
    pub target: DataTarget,
    pub policy: CompliancePolicy,
}

impl DataAccessError {
    pub fn status(&self) -> u16 {
        403
    }

    pub fn error_type(&self) -> &'static str {
        "DataAccessError"
    }
}

/// Certificates held by one guarded session.
#[derive(Debug, Clone)]
pub struct DataAccess {
    session: Session,
    certificates: HashMap<DataTarget, Vec<AccessCertificate>>,
}

impl DataAccess {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            certificates: HashMap::new(),
        }
    }

    pub fn with_certificates(mut self, target: DataTarget, certificates: Vec<AccessCertificate>) -> Self {
        self.certificates.insert(target, certificates);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn certificates(&self, target: DataTarget) -> Option<&[AccessCertificate]> {
        self.certificates.get(&target).map(Vec::as_slice)
    }

    /// Check `policy` against the certificates for `target`.
    ///
    /// Returns `(true, policy)` unchanged when any certificate covers it.
    /// Otherwise `Deadly` fails with [`DataAccessError`] and `Safe` returns
    /// `false` with the narrowed (possibly empty) policy.
    pub fn has_access(
        &self,
        target: DataTarget,
        policy: CompliancePolicy,
        failure_mode: FailureMode,
    ) -> Result<(bool, CompliancePolicy), DataAccessError> {
        let certificates = self.certificates(target).unwrap_or_default();

        if certificates.iter().any(|cert| cert.grants(&policy)) {
            return Ok((true, policy));
        }

        log::debug!(
            "Session {} not granted {} on {} ({:?} mode)",
            fingerprint(&self.session.session_id),
            format_rights(&policy.access_rights),
            target,
            failure_mode
        );

        match failure_mode {
            FailureMode::Deadly => Err(DataAccessError { target, policy }),
            FailureMode::Safe => Ok(Self::narrow(certificates, policy)),
        }
    }

    fn narrow(certificates: &[AccessCertificate], policy: CompliancePolicy) -> (bool, CompliancePolicy) {
        let matching = certificates
            .iter()
            .find(|cert| cert.access_rights == policy.access_rights);

        match matching {
            Some(cert) if cert.entry_ids.is_all() => (true, policy),
            Some(cert) => {
                let entry_ids = cert.entry_ids.intersection(&policy.entry_ids);
                (false, CompliancePolicy { entry_ids, access_rights: policy.access_rights })
            }
            None => (false, CompliancePolicy::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspire_commons::IdToken;
    use AccessRight::*;

    fn access(target: DataTarget, certs: Vec<AccessCertificate>) -> DataAccess {
        DataAccess::new(Session::new("s1", IdToken::default(), "csrf", None))
            .with_certificates(target, certs)
    }

    #[test]
    fn test_subset_grants_access() {
        let access = access(
            DataTarget::ModuleAccess,
            vec![AccessCertificate::new(EntryIds::ids([1, 2, 3]), [Read, Write])],
        );
        let policy = CompliancePolicy::new(EntryIds::ids([1, 3]), [Read]);

        let (granted, returned) = access
            .has_access(DataTarget::ModuleAccess, policy.clone(), FailureMode::Deadly)
            .unwrap();
        assert!(granted);
        assert_eq!(returned, policy);
    }

    #[test]
    fn test_all_certificate_grants_explicit_request() {
        let access = access(
            DataTarget::ModuleAccess,
            vec![AccessCertificate::new(EntryIds::All, [Read, Write])],
        );
        let policy = CompliancePolicy::new(EntryIds::ids([5]), [Read]);

        let (granted, returned) = access
            .has_access(DataTarget::ModuleAccess, policy.clone(), FailureMode::Safe)
            .unwrap();
        assert!(granted);
        assert_eq!(returned, policy);
    }

    #[test]
    fn test_safe_mode_narrows_to_intersection() {
        let access = access(
            DataTarget::ModuleAccess,
            vec![AccessCertificate::new(EntryIds::ids([1, 2, 3]), [Read])],
        );
        let policy = CompliancePolicy::new(EntryIds::ids([2, 3, 4]), [Read]);

        let (granted, returned) = access
            .has_access(DataTarget::ModuleAccess, policy, FailureMode::Safe)
            .unwrap();
        assert!(!granted);
        assert_eq!(returned, CompliancePolicy::new(EntryIds::ids([2, 3]), [Read]));
        assert!(returned.allows(2));
        assert!(!returned.allows(4));
    }

    #[test]
    fn test_deadly_mode_never_narrows() {
        let access = access(
            DataTarget::ModuleAccess,
            vec![AccessCertificate::new(EntryIds::ids([1, 2, 3]), [Read])],
        );
        let policy = CompliancePolicy::new(EntryIds::ids([2, 3, 4]), [Read]);

        let err = access
            .has_access(DataTarget::ModuleAccess, policy.clone(), FailureMode::Deadly)
            .unwrap_err();
        assert_eq!(err.target, DataTarget::ModuleAccess);
        assert_eq!(err.policy, policy);
        assert_eq!(err.status(), 403);
        assert_eq!(
            err.to_string(),
            "Unauthorized Access - Target resource(s) {2, 3, 4} requires module_access and {read} rights."
        );
    }

    #[test]
    fn test_safe_mode_requires_exact_rights() {
        let access = access(
            DataTarget::ModuleAccess,
            vec![AccessCertificate::new(EntryIds::ids([1, 2]), [Read, Write])],
        );
        // rights are a subset but ids are not, and no cert has exactly {read}
        let policy = CompliancePolicy::new(EntryIds::ids([2, 9]), [Read]);

        let (granted, returned) = access
            .has_access(DataTarget::ModuleAccess, policy, FailureMode::Safe)
            .unwrap();
        assert!(!granted);
        assert_eq!(returned, CompliancePolicy::empty());
        assert!(returned.is_empty());
    }

    #[test]
    fn test_safe_mode_uses_first_exact_match() {
        let access = access(
            DataTarget::ModuleAccess,
            vec![
                AccessCertificate::new(EntryIds::ids([1]), [Write]),
                AccessCertificate::new(EntryIds::ids([7, 8]), [Write]),
            ],
        );
        let policy = CompliancePolicy::new(EntryIds::ids([1, 8]), [Write]);

        let (_, returned) = access
            .has_access(DataTarget::ModuleAccess, policy, FailureMode::Safe)
            .unwrap();
        assert_eq!(returned.entry_ids, EntryIds::ids([1]));
    }

    #[test]
    fn test_all_certificate_with_other_rights_is_no_match() {
        let access = access(
            DataTarget::ModuleAccess,
            vec![AccessCertificate::new(EntryIds::All, [Read])],
        );
        let policy = CompliancePolicy::new(EntryIds::ids([1]), [Read, Write]);

        let (granted, returned) = access
            .has_access(DataTarget::ModuleAccess, policy, FailureMode::Safe)
            .unwrap();
        assert!(!granted);
        assert_eq!(returned, CompliancePolicy::empty());
    }

    #[test]
    fn test_requested_all_needs_all_certificate() {
        let explicit = access(
            DataTarget::CourseAccess,
            vec![AccessCertificate::new(EntryIds::ids([1, 2]), [Read])],
        );
        let policy = CompliancePolicy::new(EntryIds::All, [Read]);

        let (granted, returned) = explicit
            .has_access(DataTarget::CourseAccess, policy.clone(), FailureMode::Safe)
            .unwrap();
        assert!(!granted);
        assert_eq!(returned.entry_ids, EntryIds::ids([1, 2]));

        let all = access(
            DataTarget::CourseAccess,
            vec![AccessCertificate::new(EntryIds::All, [Read])],
        );
        let (granted, _) = all
            .has_access(DataTarget::CourseAccess, policy, FailureMode::Deadly)
            .unwrap();
        assert!(granted);
    }

    #[test]
    fn test_missing_target_certificates() {
        let access = access(
            DataTarget::ModuleAccess,
            vec![AccessCertificate::new(EntryIds::All, [Read])],
        );
        let policy = CompliancePolicy::new(EntryIds::ids([1]), [Read]);

        let (granted, returned) = access
            .has_access(DataTarget::StudentAccess, policy.clone(), FailureMode::Safe)
            .unwrap();
        assert!(!granted);
        assert!(returned.is_empty());

        assert!(access
            .has_access(DataTarget::StudentAccess, policy, FailureMode::Deadly)
            .is_err());
    }

    #[test]
    fn test_entry_ids_serde() {
        assert_eq!(serde_json::to_string(&EntryIds::All).unwrap(), "\"all\"");
        assert_eq!(
            serde_json::to_string(&EntryIds::ids([3, 1])).unwrap(),
            "[1,3]"
        );

        let all: EntryIds = serde_json::from_str("\"all\"").unwrap();
        assert!(all.is_all());
        let ids: EntryIds = serde_json::from_str("[2,2,5]").unwrap();
        assert_eq!(ids, EntryIds::ids([2, 5]));

        assert!(serde_json::from_str::<EntryIds>("\"some\"").is_err());
        assert!(serde_json::from_str::<EntryIds>("[1,\"all\"]").is_err());
    }

    #[test]
    fn test_policy_serde_shape() {
        let policy: CompliancePolicy =
            serde_json::from_str(r#"{"entry_ids":"all","access_rights":["read","delete"]}"#)
                .unwrap();
        assert!(policy.entry_ids.is_all());
        assert!(policy.access_rights.contains(&Delete));
        assert!(serde_json::from_str::<CompliancePolicy>(
            r#"{"entry_ids":[1],"access_rights":["execute"]}"#
        )
        .is_err());
    }
}
