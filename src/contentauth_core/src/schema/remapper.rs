use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;

use super::definition::{ColumnDef, ColumnType, ForeignKey, OnDelete, TableDef};
use super::mapping::{FieldAttribute, SchemaMapping, TableMapping};
use super::model::{FieldSpec, Model};
use super::sql::{is_valid_identifier, quote_identifier};

/// Logical field name of the normalized-email column on the user table.
pub const NORMALIZED_EMAIL_FIELD: &str = "normalizedEmail";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid identifier `{name}` in {model} mapping")]
    InvalidIdentifier { model: Model, name: String },
    #[error("Unknown field `{field}` in {model} field mapping")]
    UnknownField { model: Model, field: String },
    #[error("Column `{column}` appears more than once in table `{table}`")]
    DuplicateColumn { table: String, column: String },
    #[error("Table `{table}` is mapped by both {first} and {second}")]
    DuplicateTableName {
        table: String,
        first: Model,
        second: Model,
    },
    #[error("Model key `{key}` is used by both {first} and {second}")]
    DuplicateModelKey {
        key: String,
        first: Model,
        second: Model,
    },
    #[error("Foreign key {model}.{field} references {target}.{target_field}, which does not exist")]
    UnresolvedForeignKey {
        model: Model,
        field: String,
        target: Model,
        target_field: String,
    },
}

/// How the host framework addresses one logical model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBinding {
    pub model: Model,
    /// Registry key; the custom table name when one is configured.
    pub model_name: String,
    pub fields: BTreeMap<String, String>,
    pub additional_fields: BTreeMap<String, FieldAttribute>,
}

impl ModelBinding {
    /// Whether the host needs any override for this model.
    pub fn is_customized(&self) -> bool {
        self.model_name != self.model.default_key()
            || !self.fields.is_empty()
            || !self.additional_fields.is_empty()
    }
}

/// Physical names the email hooks query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTableBinding {
    pub table: String,
    pub id_column: String,
    pub normalized_email_column: String,
}

/// Output of [`SchemaRemapper::remap`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    tables: Vec<TableDef>,
    bindings: Vec<ModelBinding>,
    normalized_email_column: Option<String>,
}

impl ResolvedSchema {
    /// Tables in dependency order.
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    pub fn table(&self, model: Model) -> &TableDef {
        &self.tables[model.position()]
    }

    pub fn binding(&self, model: Model) -> &ModelBinding {
        &self.bindings[model.position()]
    }

    pub fn bindings(&self) -> &[ModelBinding] {
        &self.bindings
    }

    pub fn model_key(&self, model: Model) -> &str {
        &self.table(model).key
    }

    /// Registry key to table, as handed to the ORM adapter.
    pub fn registry(&self) -> BTreeMap<&str, &TableDef> {
        self.tables
            .iter()
            .map(|table| (table.key.as_str(), table))
            .collect()
    }

    pub fn model_for_key(&self, key: &str) -> Option<Model> {
        self.tables
            .iter()
            .find(|table| table.key == key)
            .map(|table| table.model)
    }

    /// Present when a normalized-email column was configured.
    pub fn user_table_binding(&self) -> Option<UserTableBinding> {
        let normalized_email_column = self.normalized_email_column.clone()?;
        let users = self.table(Model::User);
        let id_column = users.primary_key()?.name.clone();

        Some(UserTableBinding {
            table: users.name.clone(),
            id_column,
            normalized_email_column,
        })
    }

    /// `CREATE TABLE IF NOT EXISTS` statements in dependency order, followed by
    /// the normalized-email index when that column is configured.
    pub fn create_table_statements(&self) -> Vec<String> {
        let mut statements: Vec<String> = self
            .tables
            .iter()
            .map(TableDef::create_table_sql)
            .collect();

        if let Some(binding) = self.user_table_binding() {
            statements.push(format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quote_identifier(&format!(
                    "{}_{}_idx",
                    binding.table, binding.normalized_email_column
                )),
                quote_identifier(&binding.table),
                quote_identifier(&binding.normalized_email_column)
            ));
        }

        statements
    }
}

/// Turns a [`SchemaMapping`] into a [`ResolvedSchema`].
///
/// Pure and evaluated once at start-up; every configuration problem is
/// reported here rather than when the database later rejects a query.
pub struct SchemaRemapper<'a> {
    mapping: &'a SchemaMapping,
    normalized_email_column: Option<String>,
}

impl<'a> SchemaRemapper<'a> {
    pub fn new(mapping: &'a SchemaMapping) -> Self {
        Self {
            mapping,
            normalized_email_column: None,
        }
    }

    /// Adds a nullable normalized-email column to the user table, unless an
    /// additional field of the user mapping already declares a column with
    /// that name. Built-in user columns are never reused.
    pub fn with_normalized_email_column(mut self, column: impl Into<String>) -> Self {
        self.normalized_email_column = Some(column.into());
        self
    }

    pub fn remap(self) -> Result<ResolvedSchema, SchemaError> {
        let empty = TableMapping::default();
        let mut tables: Vec<TableDef> = Vec::with_capacity(Model::ALL.len());
        let mut bindings = Vec::with_capacity(Model::ALL.len());
        let mut table_owners: HashMap<String, Model> = HashMap::new();
        let mut key_owners: HashMap<String, Model> = HashMap::new();

        for model in Model::ALL {
            let mapping = self.mapping.get(model).unwrap_or(&empty);

            let name = mapping
                .table_name
                .clone()
                .unwrap_or_else(|| model.default_table_name().to_string());
            ensure_identifier(model, &name)?;

            if let Some(first) = table_owners.insert(name.clone(), model) {
                return Err(SchemaError::DuplicateTableName {
                    table: name,
                    first,
                    second: model,
                });
            }

            let mut table = build_table(model, name, mapping, &tables)?;

            if let Some(first) = key_owners.insert(table.key.clone(), model) {
                return Err(SchemaError::DuplicateModelKey {
                    key: table.key,
                    first,
                    second: model,
                });
            }

            if let (Model::User, Some(column)) = (model, &self.normalized_email_column) {
                ensure_identifier(model, column)?;
                let builtin = table
                    .column_by_name(column)
                    .map(|existing| model.has_field(&existing.field));
                match builtin {
                    None => table.columns.push(normalized_email_column(column)),
                    Some(false) => {}
                    Some(true) => {
                        return Err(SchemaError::DuplicateColumn {
                            table: table.name,
                            column: column.clone(),
                        });
                    }
                }
            }

            ensure_unique_columns(&table)?;

            bindings.push(ModelBinding {
                model,
                model_name: table.key.clone(),
                fields: mapping.fields.clone(),
                additional_fields: mapping.additional_fields.clone(),
            });
            tables.push(table);
        }

        Ok(ResolvedSchema {
            tables,
            bindings,
            normalized_email_column: self.normalized_email_column,
        })
    }
}

fn build_table(
    model: Model,
    name: String,
    mapping: &TableMapping,
    resolved: &[TableDef],
) -> Result<TableDef, SchemaError> {
    for (field, column) in &mapping.fields {
        if !model.has_field(field) && !mapping.additional_fields.contains_key(field) {
            return Err(SchemaError::UnknownField {
                model,
                field: field.clone(),
            });
        }
        ensure_identifier(model, column)?;
    }

    let column_name = |field: &str| {
        mapping
            .fields
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.to_string())
    };

    let mut columns = Vec::with_capacity(model.fields().len() + mapping.additional_fields.len());

    for spec in model.fields() {
        let references = spec
            .references
            .map(|target| resolve_reference(model, spec, target, resolved))
            .transpose()?;

        columns.push(ColumnDef {
            field: spec.field.to_string(),
            name: column_name(spec.field),
            column_type: spec.column_type,
            not_null: spec.not_null,
            unique: spec.unique,
            primary_key: spec.primary_key,
            default: None,
            references,
        });
    }

    for (field, attribute) in &mapping.additional_fields {
        let name = column_name(field);
        ensure_identifier(model, &name)?;

        columns.push(ColumnDef {
            field: field.clone(),
            name,
            column_type: attribute.field_type.column_type(),
            not_null: attribute.required,
            unique: false,
            primary_key: false,
            default: attribute.default_value.clone(),
            references: None,
        });
    }

    let key = mapping
        .table_name
        .clone()
        .unwrap_or_else(|| model.default_key().to_string());

    Ok(TableDef {
        model,
        key,
        name,
        columns,
    })
}

/// Points a reference column at the target's primary key as it was renamed.
fn resolve_reference(
    model: Model,
    spec: &FieldSpec,
    target: Model,
    resolved: &[TableDef],
) -> Result<ForeignKey, SchemaError> {
    let unresolved = || SchemaError::UnresolvedForeignKey {
        model,
        field: spec.field.to_string(),
        target,
        target_field: "id".to_string(),
    };

    let target_table = resolved
        .iter()
        .find(|table| table.model == target)
        .ok_or_else(unresolved)?;
    let target_column = target_table
        .column("id")
        .filter(|column| column.primary_key)
        .ok_or_else(unresolved)?;

    Ok(ForeignKey {
        model: target,
        table: target_table.name.clone(),
        column: target_column.name.clone(),
        on_delete: OnDelete::Cascade,
    })
}

fn normalized_email_column(name: &str) -> ColumnDef {
    ColumnDef {
        field: NORMALIZED_EMAIL_FIELD.to_string(),
        name: name.to_string(),
        column_type: ColumnType::Text,
        not_null: false,
        unique: false,
        primary_key: false,
        default: None,
        references: None,
    }
}

fn ensure_identifier(model: Model, name: &str) -> Result<(), SchemaError> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier {
            model,
            name: name.to_string(),
        })
    }
}

fn ensure_unique_columns(table: &TableDef) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for column in &table.columns {
        if !seen.insert(column.name.as_str()) {
            return Err(SchemaError::DuplicateColumn {
                table: table.name.clone(),
                column: column.name.clone(),
            });
        }
    }
    Ok(())
}
