//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    config.validate().map_err(ClientError::Config)?;

    let google = config.google.to_google_config().map_err(ClientError::Config)?;
    if google.credentials_file.exists() {
        meetlink_google::OAuthCredentials::from_file(&google.credentials_file)?
            .validate()
            .map_err(|e| ClientError::Config(format!("invalid Google credentials: {}", e)))?;
        println!("Google credentials are valid.");
    } else {
        println!(
            "Google credentials file not found at {} (needed for login and refresh).",
            google.credentials_file.display()
        );
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoogleSettings;

    #[test]
    fn validate_reads_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let creds = dir.path().join("credentials.json");
        std::fs::write(&creds, r#"{"installed": {"client_id": "id", "client_secret": ""}}"#).unwrap();

        let config = ClientConfig {
            google: GoogleSettings {
                credentials_file: Some(creds),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn validate_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            google: GoogleSettings {
                credentials_file: Some(dir.path().join("absent.json")),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate(&config).is_ok());
    }
}
