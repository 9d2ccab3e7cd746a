use anyhow::{Context, Result, bail};
use keyring::{Entry, Error as KeyringError};

const SERVICE: &str = "graph_mail_client";

fn entry(client_id: &str) -> Result<Entry> {
    Entry::new(SERVICE, client_id)
        .with_context(|| format!("opening keyring entry for client_id {client_id}"))
}

/// Store the app registration's secret, keyed by client_id.
pub fn save_client_secret(client_id: &str, client_secret: &str) -> Result<()> {
    if client_secret.is_empty() {
        bail!("refusing to store an empty client secret");
    }
    entry(client_id)?
        .set_password(client_secret)
        .with_context(|| format!("saving client secret for client_id {client_id}"))
}

/// `Ok(None)` when nothing has been stored for this client_id.
pub fn load_client_secret(client_id: &str) -> Result<Option<String>> {
    match entry(client_id)?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => {
            Err(e).with_context(|| format!("reading client secret for client_id {client_id}"))
        }
    }
}
