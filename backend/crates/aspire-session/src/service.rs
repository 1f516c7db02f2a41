//! Builds the [`DataAccess`] certificates for a guarded session.

use crate::data_access::{AccessCertificate, AccessRight, DataAccess, DataTarget, EntryIds};
use async_trait::async_trait;
use aspire_commons::ids::fingerprint;
use aspire_commons::{RoleProvider, Session};
use std::sync::Arc;

pub const DESIGNER_ENROLLMENT: &str = "DesignerEnrollment";
pub const TEACHER_ENROLLMENT: &str = "TeacherEnrollment";

#[derive(Debug, Clone, thiserror::Error)]
#[error("Entity lookup failed: {0}")]
pub struct EntityLookupError(pub String);

/// Business services that know which entities a session can reach.
#[async_trait]
pub trait AccessibleEntities: Send + Sync {
    /// Module ids belonging to a course.
    async fn course_modules(&self, course_id: i64) -> Result<Vec<i64>, EntityLookupError>;

    /// Course ids visible to the session's user.
    async fn course_ids(&self, session: &Session) -> Result<Vec<i64>, EntityLookupError>;

    /// Student ids visible to the session's user.
    async fn student_ids(&self, session: &Session) -> Result<Vec<i64>, EntityLookupError>;
}

pub struct DataAccessService {
    entities: Arc<dyn AccessibleEntities>,
    role_provider: Arc<dyn RoleProvider>,
}

impl DataAccessService {
    pub fn new(entities: Arc<dyn AccessibleEntities>, role_provider: Arc<dyn RoleProvider>) -> Self {
        Self {
            entities,
            role_provider,
        }
    }

    /// Certificates for each of `targets`, derived from the session's roles
    /// and launch context.
    pub async fn for_session(
        &self,
        session: Session,
        targets: &[DataTarget],
    ) -> Result<DataAccess, EntityLookupError> {
        let mut certificates = Vec::with_capacity(targets.len());
        for target in targets {
            let certs = match target {
                DataTarget::ModuleAccess => self.module_certificates(&session).await?,
                DataTarget::CourseAccess => {
                    read_only(self.entities.course_ids(&session).await?)
                }
                DataTarget::StudentAccess => {
                    read_only(self.entities.student_ids(&session).await?)
                }
            };
            certificates.push((*target, certs));
        }

        log::debug!(
            "Issued data access for session {} on {:?}",
            fingerprint(&session.session_id),
            targets
        );

        Ok(certificates
            .into_iter()
            .fold(DataAccess::new(session), |access, (target, certs)| {
                access.with_certificates(target, certs)
            }))
    }

    async fn module_certificates(
        &self,
        session: &Session,
    ) -> Result<Vec<AccessCertificate>, EntityLookupError> {
        let modules = match session.id_token.course_id() {
            Some(course_id) => self.entities.course_modules(course_id).await?,
            None => Vec::new(),
        };
        let modules = EntryIds::ids(modules);

        if self.is_course_editor(session) {
            Ok(vec![
                AccessCertificate::new(EntryIds::All, [AccessRight::Read]),
                AccessCertificate::new(
                    modules,
                    [AccessRight::Read, AccessRight::Write, AccessRight::Delete],
                ),
            ])
        } else {
            Ok(vec![AccessCertificate::new(modules, [AccessRight::Read])])
        }
    }

    /// Every role held is a designer or teacher enrollment.
    fn is_course_editor(&self, session: &Session) -> bool {
        let roles = session.roles(self.role_provider.as_ref());
        !roles.is_empty()
            && roles
                .iter()
                .all(|role| role == DESIGNER_ENROLLMENT || role == TEACHER_ENROLLMENT)
    }
}

fn read_only(ids: Vec<i64>) -> Vec<AccessCertificate> {
    vec![AccessCertificate::new(EntryIds::ids(ids), [AccessRight::Read])]
}
