// Aspire Session Library
// Fine-grained data access for guarded sessions

pub mod data_access;
pub mod service;

pub use data_access::{
    AccessCertificate, AccessRight, CompliancePolicy, DataAccess, DataAccessError, DataTarget,
    EntryIds, FailureMode,
};
pub use service::{AccessibleEntities, DataAccessService, EntityLookupError};
