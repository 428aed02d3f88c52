use crate::config::Config;
use anyhow::{Context, Result};
use sqlx::PgPool;

pub struct ValidationReport {
    pub environment: bool,
    pub database: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.environment && self.database
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Database Connectivity: {}", status(self.database));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(config: &Config, pool: &PgPool) -> ValidationReport {
    let mut report = ValidationReport {
        environment: true,
        database: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {:#}", e));
    }

    if let Err(e) = validate_database(pool).await {
        report.database = false;
        report.errors.push(format!("Database: {:#}", e));
    }

    report
}

pub fn validate_env_vars(config: &Config) -> Result<()> {
    if config.database_url.is_empty() {
        anyhow::bail!("DATABASE_URL is empty");
    }
    if config.payment_server_key.trim().is_empty() {
        anyhow::bail!("PAYMENT_SERVER_KEY is empty");
    }
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }

    let url = url::Url::parse(&config.database_url).context("DATABASE_URL is not a valid URL")?;
    if !matches!(url.scheme(), "postgres" | "postgresql") {
        anyhow::bail!("DATABASE_URL must use the postgres scheme");
    }

    if let Some(origins) = &config.cors_allowed_origins {
        for origin in origins {
            url::Url::parse(origin)
                .with_context(|| format!("CORS origin '{}' is not a valid URL", origin))?;
        }
    }

    Ok(())
}

async fn validate_database(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Failed to connect to database")?;

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .context("Failed to check migrations table")?;

    if applied == 0 {
        anyhow::bail!("No migrations applied");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    fn config() -> Config {
        Config {
            server_port: 3000,
            database_url: "postgres://localhost:5432/shop".to_string(),
            payment_server_key: "server-key".to_string(),
            cors_allowed_origins: None,
            log_format: LogFormat::Text,
            log_request_body: false,
        }
    }

    #[test]
    fn test_validate_env_vars_ok() {
        assert!(validate_env_vars(&config()).is_ok());
    }

    #[test]
    fn test_validate_env_vars_empty_database_url() {
        let config = Config {
            database_url: String::new(),
            ..config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[test]
    fn test_validate_env_vars_blank_server_key() {
        let config = Config {
            payment_server_key: "  ".to_string(),
            ..config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[test]
    fn test_validate_env_vars_wrong_scheme() {
        let config = Config {
            database_url: "mysql://localhost/shop".to_string(),
            ..config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[test]
    fn test_validate_env_vars_bad_origin() {
        let config = Config {
            cors_allowed_origins: Some(vec!["not a url".to_string()]),
            ..config()
        };

        assert!(validate_env_vars(&config).is_err());
    }
}
