//! Authentication command.

use meetlink_google::{CredentialProvider, GoogleConfig, TokenInfo};
use tracing::info;

use crate::error::ClientResult;

/// Ensures a usable Google token exists, logging in through the browser if
/// needed. With `force`, the stored token is discarded first.
pub async fn google(config: GoogleConfig, force: bool) -> ClientResult<()> {
    let provider = CredentialProvider::new(config.with_interactive(true));

    if force {
        println!("Starting Google Calendar authentication...");
        println!();
        println!("A browser window will open for you to authorize access.");
        println!("If the browser doesn't open, check the terminal for a URL to copy.");
        println!();
    }

    let token = provider.authenticate(force).await?;
    info!("Google authentication successful");

    println!("Authenticated with Google Calendar.");
    println!("{}", describe(&token));
    println!("Token stored at {}", provider.storage().path().display());
    Ok(())
}

fn describe(token: &TokenInfo) -> String {
    let refresh = if token.refresh_token.is_some() {
        "refreshable"
    } else {
        "not refreshable"
    };
    match token.expires_at {
        Some(at) => format!("Access token valid until {} ({})", at.to_rfc3339(), refresh),
        None => format!("Access token has no expiry ({})", refresh),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_token() {
        let token = TokenInfo::new("a", Some("r".to_string()), None, vec![]);
        assert_eq!(describe(&token), "Access token has no expiry (refreshable)");

        let token = TokenInfo::new("a", None, Some(3600), vec![]);
        let text = describe(&token);
        assert!(text.starts_with("Access token valid until "));
        assert!(text.ends_with("(not refreshable)"));
    }

    #[tokio::test]
    async fn valid_stored_token_needs_no_login() {
        let dir = tempfile::tempdir().unwrap();
        let config = GoogleConfig::new().with_token_path(dir.path().join("token.json"));
        meetlink_google::TokenStorage::new(&config.token_path)
            .save(&TokenInfo::new(
                "stored",
                None,
                Some(3600),
                vec![GoogleConfig::DEFAULT_SCOPE.to_string()],
            ))
            .unwrap();

        google(config, false).await.unwrap();
    }
}
