//! Category suggestions and bulk organization of existing documents.

pub mod service;

pub use service::{
    AppliedCategory, AssignedDocument, AutoAssignment, BulkCategorization, CategorizeService,
    PendingCategory, PendingFolder,
};
