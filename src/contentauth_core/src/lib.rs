pub mod domain;
pub mod hooks;
pub mod http_abstraction;
pub mod ports;
pub mod schema;

// Re-export commonly used types for convenience
pub use domain::{
    hook_user::HookUser,
    invitation::{InvitationLinkData, invitation_link},
    normalized_email::{NormalizedEmail, is_gmail_address, normalize_email},
};

pub use hooks::{
    AfterHook, AfterHookContext, BeforeHook, BeforeHookContext, HookAugmentation, HookOutcome,
    HookRejection,
};

pub use ports::{
    repositories::{NormalizedEmailStore, NormalizedEmailStoreError},
    services::{ChallengeVerdict, ChallengeVerifier, ChallengeVerifierError},
};

pub use schema::{
    ColumnDef, ColumnType, FieldAttribute, ForeignKey, Model, ModelBinding, ResolvedSchema,
    SchemaError, SchemaMapping, SchemaRemapper, TableDef, TableMapping, UserTableBinding,
};

pub use http_abstraction::{HookRequest, HookResponseBuilder, client_ip};
