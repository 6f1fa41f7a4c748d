use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use async_trait::async_trait;
use google_gmail1::Gmail;
use google_gmail1::oauth2::authenticator_delegate::InstalledFlowDelegate;
use google_gmail1::oauth2::storage::{TokenInfo, TokenStorage};
use google_gmail1::oauth2::{
    InstalledFlowAuthenticator, InstalledFlowReturnMethod, read_application_secret,
};
use keyring::Entry;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "deskbot";
const TOKEN_KEY: &str = "gmail_token";

/// Full mailbox access: list, read, send, label and trash.
pub const SCOPES: &[&str] = &["https://mail.google.com/"];

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenData {
    tokens: Vec<TokenInfo>,
}

/// OAuth token storage backed by the OS keyring.
pub struct RingStorage;

#[async_trait]
impl TokenStorage for RingStorage {
    async fn set(&self, _scopes: &[&str], token: TokenInfo) -> Result<()> {
        let entry =
            Entry::new(APP_NAME, TOKEN_KEY).map_err(|e| anyhow::anyhow!("Keyring error: {}", e))?;

        let mut data = self.get_all().await.unwrap_or_default();
        data.tokens.clear();
        data.tokens.push(token);

        let serialized = serde_json::to_string(&data).context("Failed to serialize tokens")?;

        entry
            .set_password(&serialized)
            .map_err(|e| anyhow::anyhow!("Keyring error: {}", e))?;

        Ok(())
    }

    async fn get(&self, _scopes: &[&str]) -> Option<TokenInfo> {
        self.get_all()
            .await
            .ok()
            .and_then(|data| data.tokens.first().cloned())
    }
}

impl RingStorage {
    async fn get_all(&self) -> Result<TokenData> {
        let entry =
            Entry::new(APP_NAME, TOKEN_KEY).map_err(|e| anyhow::anyhow!("Keyring error: {}", e))?;

        match entry.get_password() {
            Ok(serialized) => {
                serde_json::from_str(&serialized).context("Failed to deserialize tokens")
            }
            Err(keyring::Error::NoEntry) => Ok(TokenData::default()),
            Err(e) => Err(anyhow::anyhow!("Keyring error: {}", e)),
        }
    }

    pub async fn clear_token(&self) -> Result<()> {
        let entry =
            Entry::new(APP_NAME, TOKEN_KEY).map_err(|e| anyhow::anyhow!("Keyring error: {}", e))?;
        match entry.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(anyhow::anyhow!("Keyring error: {}", e)),
        }
    }
}

/// Opens the consent URL in the user's browser, falling back to printing
/// it when no browser can be launched.
struct BrowserDelegate;

impl InstalledFlowDelegate for BrowserDelegate {
    fn present_user_url<'a>(
        &'a self,
        url: &'a str,
        need_code: bool,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        Box::pin(async move {
            if open::that(url).is_err() {
                println!("Open this URL in your browser to authorize:\n{url}");
            }
            if need_code {
                Err("out-of-band code entry is not supported".to_string())
            } else {
                Ok(String::new())
            }
        })
    }
}

/// Run the installed OAuth flow and build an authenticated Gmail hub.
pub async fn build_hub(
    credentials_path: &str,
) -> Result<Gmail<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>> {
    let secret = read_application_secret(credentials_path)
        .await
        .context("Failed to read application secret")?;

    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
        .with_storage(Box::new(RingStorage))
        .flow_delegate(Box::new(BrowserDelegate))
        .build()
        .await
        .context("Failed to build authenticator")?;

    auth.token(SCOPES)
        .await
        .context("Failed to obtain access token")?;

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .context("Failed to load native TLS roots")?
        .https_only()
        .enable_http1()
        .build();

    Ok(Gmail::new(hyper::Client::builder().build(connector), auth))
}
