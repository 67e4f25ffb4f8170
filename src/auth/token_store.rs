use anyhow::{Result, anyhow};
use keyring::{Entry, Error as KeyringError};

const SERVICE: &str = "pm_referral_bot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SecretKind {
    /// OAuth client secret, keyed by client id
    ClientSecret,
    /// Account password, keyed by reddit username
    Password,
}

impl SecretKind {
    fn entry_user(self, key: &str) -> String {
        match self {
            SecretKind::ClientSecret => format!("client:{key}"),
            SecretKind::Password => format!("user:{key}"),
        }
    }
}

/// Save a secret into the OS keyring
pub fn save_secret(kind: SecretKind, key: &str, secret: &str) -> Result<()> {
    Entry::new(SERVICE, &kind.entry_user(key))?
        .set_password(secret)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

/// Load a secret from the keyring; `None` if nothing was stored
pub fn load_secret(kind: SecretKind, key: &str) -> Result<Option<String>> {
    match Entry::new(SERVICE, &kind.entry_user(key))?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}
