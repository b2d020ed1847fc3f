//! Selection inspection commands.
//!
//! Support tooling for debugging a merchant report: print the persisted
//! selection record for a shop without going through the HTTP API.

use secrecy::SecretString;

use pagetest_core::ShopDomain;
use pagetest_server::db::{RepositoryError, SelectionStore, ShopRepository, create_pool};

/// Errors from inspection commands.
#[derive(Debug, thiserror::Error)]
pub enum SelectionsError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The given shop domain is not valid.
    #[error("Invalid shop domain: {0}")]
    InvalidDomain(#[from] pagetest_core::DomainError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The record could not be serialized for printing.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Print the selection record for a shop as JSON.
///
/// # Errors
///
/// Returns `SelectionsError` if the domain is invalid or the database is
/// unreachable.
#[allow(clippy::print_stdout)]
pub async fn show(raw_domain: &str) -> Result<(), SelectionsError> {
    dotenvy::dotenv().ok();

    let domain = ShopDomain::parse(raw_domain)?;

    let database_url = std::env::var("PAGETEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| SelectionsError::MissingEnvVar("PAGETEST_DATABASE_URL"))?;

    let pool = create_pool(&database_url).await?;
    let repository = ShopRepository::new(&pool);

    match repository.find(&domain).await? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("No record for {domain}"),
    }

    Ok(())
}
