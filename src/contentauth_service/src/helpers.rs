use contentauth_adapters::config::Settings;
use contentauth_core::{ResolvedSchema, SchemaRemapper};
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::error::AuthServiceError;

/// Configure and return a PostgreSQL connection pool
///
/// # Arguments
/// * `settings` - Loaded settings; `postgres.url` and `postgres.max_connections` are used
///
/// # Returns
/// A configured PgPool ready for use
pub async fn configure_postgresql(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    get_postgres_pool(
        settings.postgres.url.expose_secret(),
        settings.postgres.max_connections,
    )
    .await
}

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `url` - Database connection URL
/// * `max_connections` - Upper bound of the pool
///
/// # Returns
/// Result containing the PgPool or an error
pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// Remap the configured schema, adding the normalized-email column when
/// normalization is enabled
pub fn resolve_schema(settings: &Settings) -> Result<ResolvedSchema, AuthServiceError> {
    let mapping = settings.schema_mapping()?;

    let mut remapper = SchemaRemapper::new(&mapping);
    if settings.normalization.enabled {
        remapper = remapper.with_normalized_email_column(settings.normalization.column.clone());
    }

    Ok(remapper.remap()?)
}
