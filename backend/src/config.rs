//! Server configuration.
//!
//! Every option can come from the command line or from the environment
//! variable named next to it.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `HOST` | 0.0.0.0 |
//! | `PORT` | 8000 |
//! | `LOG_LEVEL` | info |
//! | `POSTGRES_HOST` | required |
//! | `POSTGRES_PORT` | 5432 |
//! | `POSTGRES_USER` | required |
//! | `POSTGRES_PASSWORD` | required |
//! | `POSTGRES_DATABASE` | required |
//! | `POSTGRES_SCHEMA` | rst |
//! | `POSTGRES_MAX_CONNECTIONS` | 10 |
//! | `RST_STORAGE_CLOUDFRONT_URL` | required |

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "recreation-search-server")]
#[command(about = "Public recreation resource search API")]
pub struct ServerConfig {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Log level or full `tracing` filter directive.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "POSTGRES_HOST", default_value = "")]
    pub postgres_host: String,

    #[arg(long, env = "POSTGRES_PORT", default_value = "5432")]
    pub postgres_port: u16,

    #[arg(long, env = "POSTGRES_USER", default_value = "")]
    pub postgres_user: String,

    #[arg(long, env = "POSTGRES_PASSWORD", default_value = "", hide_env_values = true)]
    pub postgres_password: String,

    #[arg(long, env = "POSTGRES_DATABASE", default_value = "")]
    pub postgres_database: String,

    #[arg(long, env = "POSTGRES_SCHEMA", default_value = "rst")]
    pub postgres_schema: String,

    #[arg(long, env = "POSTGRES_MAX_CONNECTIONS", default_value = "10")]
    pub postgres_max_connections: usize,

    /// Base URL that image paths are appended to.
    #[arg(long, env = "RST_STORAGE_CLOUDFRONT_URL", default_value = "")]
    pub rst_storage_cloudfront_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            postgres_host: String::new(),
            postgres_port: 5432,
            postgres_user: String::new(),
            postgres_password: String::new(),
            postgres_database: String::new(),
            postgres_schema: "rst".to_string(),
            postgres_max_connections: 10,
            rst_storage_cloudfront_url: String::new(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns every configuration problem at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let required = [
            ("POSTGRES_HOST", &self.postgres_host),
            ("POSTGRES_USER", &self.postgres_user),
            ("POSTGRES_PASSWORD", &self.postgres_password),
            ("POSTGRES_DATABASE", &self.postgres_database),
            ("RST_STORAGE_CLOUDFRONT_URL", &self.rst_storage_cloudfront_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                errors.push(format!("{name} must be set"));
            }
        }
        if self.postgres_schema.is_empty()
            || !self.postgres_schema.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            errors.push(format!("POSTGRES_SCHEMA is not a valid schema name: {:?}", self.postgres_schema));
        }
        if self.postgres_max_connections == 0 {
            errors.push("POSTGRES_MAX_CONNECTIONS must be greater than 0".to_string());
        }
        if !self.rst_storage_cloudfront_url.is_empty()
            && !self.rst_storage_cloudfront_url.starts_with("http://")
            && !self.rst_storage_cloudfront_url.starts_with("https://")
        {
            errors.push("RST_STORAGE_CLOUDFRONT_URL must be an http(s) URL".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ServerConfig {
        ServerConfig {
            postgres_host: "localhost".into(),
            postgres_user: "testuser".into(),
            postgres_password: "testpass".into(),
            postgres_database: "testdb".into(),
            rst_storage_cloudfront_url: "https://cdn.example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn complete_config_is_valid() {
        assert_eq!(valid_config().validate(), Ok(()));
    }

    #[test]
    fn missing_values_are_all_reported() {
        let config = ServerConfig { postgres_host: String::new(), postgres_user: String::new(), ..valid_config() };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors, vec!["POSTGRES_HOST must be set", "POSTGRES_USER must be set"]);
    }

    #[test]
    fn schema_name_must_be_an_identifier() {
        let config = ServerConfig { postgres_schema: "rst; drop".into(), ..valid_config() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn command_line_overrides_defaults() {
        let config = ServerConfig::try_parse_from([
            "recreation-search-server",
            "--host",
            "127.0.0.1",
            "--port",
            "3000",
            "--postgres-schema",
            "public_rst",
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.postgres_schema, "public_rst");
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
    }
}
