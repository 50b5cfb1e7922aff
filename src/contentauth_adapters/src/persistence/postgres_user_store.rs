use contentauth_core::schema::sql::quote_identifier;
use contentauth_core::{
    NormalizedEmail, NormalizedEmailStore, NormalizedEmailStoreError, ResolvedSchema,
    UserTableBinding,
};
use sqlx::{PgPool, Pool, Postgres, Row};

/// Normalized-email access to whichever table the user model is mapped to.
///
/// Table and column names come from the remapped schema and are validated
/// there; both statements are built once here.
pub struct PostgresNormalizedEmailStore {
    pool: PgPool,
    select_sql: String,
    update_sql: String,
}

impl PostgresNormalizedEmailStore {
    pub fn new(pool: Pool<Postgres>, binding: &UserTableBinding) -> Self {
        let table = quote_identifier(&binding.table);
        let id = quote_identifier(&binding.id_column);
        let column = quote_identifier(&binding.normalized_email_column);

        PostgresNormalizedEmailStore {
            pool,
            select_sql: format!("SELECT {id} FROM {table} WHERE {column} = $1 LIMIT 1"),
            update_sql: format!(
                "UPDATE {table} SET {column} = $1 WHERE {id} = $2 AND ({column} IS NULL OR {column} <> $1)"
            ),
        }
    }
}

#[async_trait::async_trait]
impl NormalizedEmailStore for PostgresNormalizedEmailStore {
    #[tracing::instrument(name = "Looking up normalized email in PostgreSQL", skip_all)]
    async fn find_user_by_normalized_email(
        &self,
        normalized: &NormalizedEmail,
    ) -> Result<Option<String>, NormalizedEmailStoreError> {
        let row = sqlx::query(&self.select_sql)
            .bind(normalized.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| NormalizedEmailStoreError::DatabaseError(e.to_string()))?;

        row.map(|row| row.try_get::<String, _>(0))
            .transpose()
            .map_err(|e| NormalizedEmailStoreError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Storing normalized email in PostgreSQL", skip_all)]
    async fn set_normalized_email(
        &self,
        user_id: &str,
        normalized: &NormalizedEmail,
    ) -> Result<bool, NormalizedEmailStoreError> {
        let result = sqlx::query(&self.update_sql)
            .bind(normalized.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| NormalizedEmailStoreError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Creates the mapped tables that do not exist yet, referenced tables first.
#[tracing::instrument(name = "Applying remapped schema", skip_all)]
pub async fn apply_schema(pool: &PgPool, schema: &ResolvedSchema) -> Result<(), sqlx::Error> {
    for statement in schema.create_table_statements() {
        sqlx::query(&statement).execute(pool).await?;
    }
    Ok(())
}
