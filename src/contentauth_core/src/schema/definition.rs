use serde_json::Value;

use super::model::Model;
use super::sql::{quote_identifier, quote_literal};

/// Coarse column type, rendered for Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    Timestamp,
}

impl ColumnType {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Number => "BIGINT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Timestamp => "TIMESTAMPTZ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
}

impl OnDelete {
    fn sql(self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
        }
    }
}

/// Physical target of a reference column, after renaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub model: Model,
    pub table: String,
    pub column: String,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Field name the host framework uses.
    pub field: String,
    /// Column name in the database.
    pub name: String,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub default: Option<Value>,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    fn sql(&self) -> String {
        let mut sql = format!(
            "{} {}",
            quote_identifier(&self.name),
            self.column_type.sql_type()
        );

        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(default) = self.default.as_ref().and_then(default_literal) {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default);
        }
        if let Some(fk) = &self.references {
            sql.push_str(&format!(
                " REFERENCES {} ({}) ON DELETE {}",
                quote_identifier(&fk.table),
                quote_identifier(&fk.column),
                fk.on_delete.sql()
            ));
        }

        sql
    }
}

// Only scalar defaults have a portable literal form.
fn default_literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(quote_literal(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string().to_uppercase()),
        _ => None,
    }
}

/// A physical table for one logical model.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    pub model: Model,
    /// Name the host's model registry addresses this table by.
    pub key: String,
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    /// Column backing a logical field.
    pub fn column(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.field == field)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.primary_key)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (&ColumnDef, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|column| column.references.as_ref().map(|fk| (column, fk)))
    }

    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|column| format!("    {}", column.sql()))
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            quote_identifier(&self.name),
            columns
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(field: &str, name: &str) -> ColumnDef {
        ColumnDef {
            field: field.to_string(),
            name: name.to_string(),
            column_type: ColumnType::Text,
            not_null: false,
            unique: false,
            primary_key: false,
            default: None,
            references: None,
        }
    }

    #[test]
    fn test_create_table_sql() {
        let table = TableDef {
            model: Model::Session,
            key: "session".to_string(),
            name: "sessions".to_string(),
            columns: vec![
                ColumnDef {
                    primary_key: true,
                    not_null: true,
                    ..text("id", "id")
                },
                ColumnDef {
                    not_null: true,
                    references: Some(ForeignKey {
                        model: Model::User,
                        table: "members".to_string(),
                        column: "uid".to_string(),
                        on_delete: OnDelete::Cascade,
                    }),
                    ..text("userId", "user_id")
                },
                ColumnDef {
                    column_type: ColumnType::Boolean,
                    default: Some(json!(false)),
                    ..text("active", "active")
                },
                ColumnDef {
                    default: Some(json!("it's")),
                    ..text("note", "note")
                },
            ],
        };

        assert_eq!(
            table.create_table_sql(),
            "CREATE TABLE IF NOT EXISTS \"sessions\" (\n\
             \x20   \"id\" TEXT PRIMARY KEY,\n\
             \x20   \"user_id\" TEXT NOT NULL REFERENCES \"members\" (\"uid\") ON DELETE CASCADE,\n\
             \x20   \"active\" BOOLEAN DEFAULT FALSE,\n\
             \x20   \"note\" TEXT DEFAULT 'it''s'\n\
             )"
        );
    }

    #[test]
    fn test_column_lookups() {
        let table = TableDef {
            model: Model::User,
            key: "user".to_string(),
            name: "users".to_string(),
            columns: vec![
                ColumnDef {
                    primary_key: true,
                    ..text("id", "uid")
                },
                text("email", "mail"),
            ],
        };

        assert_eq!(table.column("email").map(|c| c.name.as_str()), Some("mail"));
        assert_eq!(table.column_by_name("uid").map(|c| c.field.as_str()), Some("id"));
        assert_eq!(table.primary_key().map(|c| c.name.as_str()), Some("uid"));
        assert_eq!(table.foreign_keys().count(), 0);
    }
}
