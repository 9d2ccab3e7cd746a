pub mod oauth;
pub mod token_store;

use anyhow::{Result, anyhow};

use crate::config::Config;
use oauth::ClientCredentials;

/// Builds the client-credentials triple, falling back to the keyring when
/// no secret was configured.
pub fn credentials_from_config(cfg: &Config) -> Result<ClientCredentials> {
    let client_secret = match &cfg.client_secret {
        Some(secret) => secret.clone(),
        None => token_store::load_client_secret(&cfg.client_id)?.ok_or_else(|| {
            anyhow!(
                "CLIENT_SECRET not set and no secret stored in keyring for client_id {}",
                cfg.client_id
            )
        })?,
    };

    Ok(ClientCredentials {
        client_id: cfg.client_id.clone(),
        client_secret,
        authority: cfg.authority.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    #[test]
    fn configured_secret_wins_and_fields_pass_through() {
        let file = FileConfig {
            client_id: Some("app-id".into()),
            client_secret: Some("from-config".into()),
            authority: Some("https://login.microsoftonline.com/contoso".into()),
            user_email: Some("me@contoso.com".into()),
            ..Default::default()
        };
        let cfg = Config::resolve(file, |_| None).unwrap();

        // No keyring backend is needed when a secret is configured.
        let creds = credentials_from_config(&cfg).unwrap();
        assert_eq!(creds.client_secret, "from-config");
        assert_eq!(creds.client_id, "app-id");
        assert_eq!(creds.authority, "https://login.microsoftonline.com/contoso");
        assert_eq!(
            creds.token_url(),
            "https://login.microsoftonline.com/contoso/oauth2/v2.0/token"
        );
    }
}
