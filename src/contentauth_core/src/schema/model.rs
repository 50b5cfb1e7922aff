use std::fmt;

use serde::{Deserialize, Serialize};

use super::definition::ColumnType;

/// Logical models persisted by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    User,
    Organization,
    Session,
    Account,
    Verification,
    Member,
    Invitation,
}

/// Default shape of one column of a logical model.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: &'static str,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    /// Model whose primary key this column references.
    pub references: Option<Model>,
}

const fn id() -> FieldSpec {
    FieldSpec {
        field: "id",
        column_type: ColumnType::Text,
        not_null: true,
        unique: false,
        primary_key: true,
        references: None,
    }
}

const fn column(field: &'static str, column_type: ColumnType, not_null: bool) -> FieldSpec {
    FieldSpec {
        field,
        column_type,
        not_null,
        unique: false,
        primary_key: false,
        references: None,
    }
}

const fn unique(field: &'static str, column_type: ColumnType, not_null: bool) -> FieldSpec {
    FieldSpec {
        unique: true,
        ..column(field, column_type, not_null)
    }
}

const fn reference(field: &'static str, target: Model) -> FieldSpec {
    FieldSpec {
        references: Some(target),
        ..column(field, ColumnType::Text, true)
    }
}

use ColumnType::{Boolean, Text, Timestamp};

const USER_FIELDS: &[FieldSpec] = &[
    id(),
    column("name", Text, true),
    unique("email", Text, true),
    column("emailVerified", Boolean, true),
    column("image", Text, false),
    column("createdAt", Timestamp, true),
    column("updatedAt", Timestamp, true),
];

const SESSION_FIELDS: &[FieldSpec] = &[
    id(),
    column("expiresAt", Timestamp, true),
    unique("token", Text, true),
    column("createdAt", Timestamp, true),
    column("updatedAt", Timestamp, true),
    column("ipAddress", Text, false),
    column("userAgent", Text, false),
    reference("userId", Model::User),
    column("activeOrganizationId", Text, false),
];

const ACCOUNT_FIELDS: &[FieldSpec] = &[
    id(),
    column("accountId", Text, true),
    column("providerId", Text, true),
    reference("userId", Model::User),
    column("accessToken", Text, false),
    column("refreshToken", Text, false),
    column("idToken", Text, false),
    column("accessTokenExpiresAt", Timestamp, false),
    column("refreshTokenExpiresAt", Timestamp, false),
    column("scope", Text, false),
    column("password", Text, false),
    column("createdAt", Timestamp, true),
    column("updatedAt", Timestamp, true),
];

const VERIFICATION_FIELDS: &[FieldSpec] = &[
    id(),
    column("identifier", Text, true),
    column("value", Text, true),
    column("expiresAt", Timestamp, true),
    column("createdAt", Timestamp, false),
    column("updatedAt", Timestamp, false),
];

const ORGANIZATION_FIELDS: &[FieldSpec] = &[
    id(),
    column("name", Text, true),
    unique("slug", Text, false),
    column("logo", Text, false),
    column("createdAt", Timestamp, true),
    column("metadata", Text, false),
];

const MEMBER_FIELDS: &[FieldSpec] = &[
    id(),
    reference("organizationId", Model::Organization),
    reference("userId", Model::User),
    column("role", Text, true),
    column("createdAt", Timestamp, true),
];

const INVITATION_FIELDS: &[FieldSpec] = &[
    id(),
    reference("organizationId", Model::Organization),
    column("email", Text, true),
    column("role", Text, false),
    column("status", Text, true),
    column("expiresAt", Timestamp, true),
    reference("inviterId", Model::User),
    column("createdAt", Timestamp, true),
];

impl Model {
    /// Every model, referenced tables before the tables referencing them.
    pub const ALL: [Model; 7] = [
        Model::User,
        Model::Organization,
        Model::Session,
        Model::Account,
        Model::Verification,
        Model::Member,
        Model::Invitation,
    ];

    /// Index into [`Model::ALL`].
    pub fn position(self) -> usize {
        match self {
            Model::User => 0,
            Model::Organization => 1,
            Model::Session => 2,
            Model::Account => 3,
            Model::Verification => 4,
            Model::Member => 5,
            Model::Invitation => 6,
        }
    }

    pub fn default_table_name(self) -> &'static str {
        match self {
            Model::User => "users",
            Model::Organization => "organizations",
            Model::Session => "sessions",
            Model::Account => "accounts",
            Model::Verification => "verifications",
            Model::Member => "members",
            Model::Invitation => "invitations",
        }
    }

    /// Name the host's model registry uses when the table is not renamed.
    pub fn default_key(self) -> &'static str {
        match self {
            Model::User => "user",
            Model::Organization => "organization",
            Model::Session => "session",
            Model::Account => "account",
            Model::Verification => "verification",
            Model::Member => "member",
            Model::Invitation => "invitation",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Model::User => USER_FIELDS,
            Model::Organization => ORGANIZATION_FIELDS,
            Model::Session => SESSION_FIELDS,
            Model::Account => ACCOUNT_FIELDS,
            Model::Verification => VERIFICATION_FIELDS,
            Model::Member => MEMBER_FIELDS,
            Model::Invitation => INVITATION_FIELDS,
        }
    }

    pub fn has_field(self, field: &str) -> bool {
        self.fields().iter().any(|spec| spec.field == field)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_key())
    }
}
