use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definition::ColumnType;
use super::model::Model;

/// Declared type of an additional field.
///
/// A list declares an enumeration of string literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldTypeDecl {
    Single(String),
    Many(Vec<String>),
}

impl FieldTypeDecl {
    /// Unknown and array types are stored as text.
    pub fn column_type(&self) -> ColumnType {
        match self {
            FieldTypeDecl::Single(name) => match name.as_str() {
                "number" => ColumnType::Number,
                "boolean" => ColumnType::Boolean,
                "date" | "timestamp" => ColumnType::Timestamp,
                _ => ColumnType::Text,
            },
            FieldTypeDecl::Many(_) => ColumnType::Text,
        }
    }
}

/// An extra column on a mapped table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAttribute {
    #[serde(rename = "type")]
    pub field_type: FieldTypeDecl,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<bool>,
}

impl FieldAttribute {
    pub fn new(field_type: &str) -> Self {
        Self {
            field_type: FieldTypeDecl::Single(field_type.to_string()),
            required: false,
            default_value: None,
            input: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Mapping configuration for a single model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableMapping {
    /// Custom table name; also becomes the model's registry key.
    pub table_name: Option<String>,
    /// Field name to column name.
    pub fields: BTreeMap<String, String>,
    pub additional_fields: BTreeMap<String, FieldAttribute>,
}

impl TableMapping {
    pub fn with_table_name(mut self, table_name: &str) -> Self {
        self.table_name = Some(table_name.to_string());
        self
    }

    pub fn with_field(mut self, field: &str, column: &str) -> Self {
        self.fields.insert(field.to_string(), column.to_string());
        self
    }

    pub fn with_additional_field(mut self, name: &str, attribute: FieldAttribute) -> Self {
        self.additional_fields.insert(name.to_string(), attribute);
        self
    }
}

/// Maps the default table and column names onto an existing schema.
///
/// ```json
/// {
///   "user": {
///     "tableName": "tenant_admins",
///     "fields": { "id": "firebase_uid", "createdAt": "created_at" },
///     "additionalFields": { "role": { "type": "string" } }
///   },
///   "organization": { "tableName": "tenants", "fields": { "id": "tenant_id" } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaMapping {
    pub user: Option<TableMapping>,
    pub session: Option<TableMapping>,
    pub account: Option<TableMapping>,
    pub verification: Option<TableMapping>,
    pub organization: Option<TableMapping>,
    pub member: Option<TableMapping>,
    pub invitation: Option<TableMapping>,
}

impl SchemaMapping {
    pub fn get(&self, model: Model) -> Option<&TableMapping> {
        match model {
            Model::User => self.user.as_ref(),
            Model::Organization => self.organization.as_ref(),
            Model::Session => self.session.as_ref(),
            Model::Account => self.account.as_ref(),
            Model::Verification => self.verification.as_ref(),
            Model::Member => self.member.as_ref(),
            Model::Invitation => self.invitation.as_ref(),
        }
    }

    pub fn set(&mut self, model: Model, mapping: TableMapping) {
        let slot = match model {
            Model::User => &mut self.user,
            Model::Organization => &mut self.organization,
            Model::Session => &mut self.session,
            Model::Account => &mut self.account,
            Model::Verification => &mut self.verification,
            Model::Member => &mut self.member,
            Model::Invitation => &mut self.invitation,
        };
        *slot = Some(mapping);
    }

    pub fn with(mut self, model: Model, mapping: TableMapping) -> Self {
        self.set(model, mapping);
        self
    }
}
