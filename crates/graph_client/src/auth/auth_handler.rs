use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use crate::auth::token_cache::{
    CachedAccessToken, CachedAccount, CachedRefreshToken, TokenCache,
};
use crate::config::GraphConfig;
use crate::error::AuthError;

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_FLOW_EXPIRY_SECS: u64 = 900;
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;
// Cap on provider-supplied lifetimes; chrono's duration arithmetic is
// bounded, so an absurd `expires_in` must not reach it unclamped.
const MAX_TOKEN_LIFETIME_SECS: u64 = 86_400 * 365;
const SLOW_DOWN_BACKOFF_SECS: u64 = 5;

// Wire models for the identity endpoints. Everything is optional so an error
// payload deserializes instead of failing; validation happens afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DeviceCodeResponse {
    pub device_code: Option<String>,
    pub user_code: Option<String>,
    pub verification_uri: Option<String>,
    pub expires_in: Option<u64>,
    pub interval: Option<u64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub client_info: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// A started device flow: the operator-facing code plus what the poll loop
/// needs. This is the explicit awaiting-user-authentication state.
#[derive(Debug, Clone)]
pub struct DeviceCodeFlow {
    pub user_code: String,
    pub verification_uri: String,
    pub message: Option<String>,
    device_code: String,
    expires_in: u64,
    interval: u64,
}

/// Which path produced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Unexpired access token straight from the cache.
    Cache,
    /// Redeemed a cached refresh token, no user interaction.
    Refresh,
    /// Interactive device-code flow.
    DeviceCode,
}

/// Short-lived bearer credential plus metadata. Never persisted directly;
/// only the cache blob is.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub secret: String,
    pub expires_on: DateTime<Utc>,
    pub scopes: Vec<String>,
    pub source: TokenSource,
}

/// Token provider for a public client: silent acquisition from the on-disk
/// cache first, interactive device-code flow as the fallback.
#[derive(Debug, Clone)]
pub struct GraphAuthHandler {
    client: Client,
    config: GraphConfig,
}

impl GraphAuthHandler {
    pub fn new(client: Client, config: GraphConfig) -> Self {
        GraphAuthHandler { client, config }
    }

    /// Produce an access token for the configured scopes.
    ///
    /// Loads the cache, tries the silent paths for the first cached account,
    /// falls back to the device-code flow, and rewrites the cache file only
    /// if its state changed along the way. `cancel` aborts the wait for the
    /// operator; everything else either completes or fails fatally.
    pub async fn acquire_token(
        &self,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, AuthError> {
        let mut cache = TokenCache::load(&self.config.cache_path)?;
        let result = self.acquire_with_cache(&mut cache, cancel).await;
        // The cache may hold a usable refresh token even when the final
        // exchange failed; persist whatever changed before propagating.
        cache.save_if_changed(&self.config.cache_path)?;
        result
    }

    async fn acquire_with_cache(
        &self,
        cache: &mut TokenCache,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, AuthError> {
        if let Some(account) = cache.first_account().cloned() {
            if let Some(hit) =
                cache.valid_access_token(&account.home_account_id, &self.config.scopes, Utc::now())
            {
                info!("using cached access token for {}", account.username);
                return Ok(AccessToken {
                    secret: hit.secret.clone(),
                    expires_on: hit.expires_on,
                    scopes: hit.scopes.clone(),
                    source: TokenSource::Cache,
                });
            }

            if let Some(refresh) = cache.refresh_token(&account.home_account_id).cloned() {
                match self.redeem_refresh_token(&refresh.secret).await {
                    Ok(exchange) if exchange.parsed.access_token.is_some() => {
                        info!("silent refresh succeeded for {}", account.username);
                        return self.commit(cache, exchange, TokenSource::Refresh);
                    }
                    Ok(exchange) => {
                        warn!(
                            "silent refresh for {} rejected, falling back to device flow: {}",
                            account.username,
                            exchange
                                .parsed
                                .error_description
                                .as_deref()
                                .unwrap_or(&exchange.raw)
                        );
                    }
                    Err(err) => {
                        warn!(
                            "silent refresh for {} failed, falling back to device flow: {err}",
                            account.username
                        );
                    }
                }
            }
        }

        let flow = self.start_device_flow().await?;
        self.present_device_code(&flow);
        let exchange = self.poll_device_flow(&flow, cancel).await?;
        self.commit(cache, exchange, TokenSource::DeviceCode)
    }

    /// Request a device code/user code pair for the configured scopes.
    pub(crate) async fn start_device_flow(&self) -> Result<DeviceCodeFlow, AuthError> {
        let scope = self.config.scope_param();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("scope", scope.as_str()),
        ];
        let response = self
            .client
            .post(self.device_code_url())
            .form(&params)
            .send()
            .await?;
        let raw = response.text().await?;
        let parsed: DeviceCodeResponse = serde_json::from_str(&raw).unwrap_or_default();

        let (Some(device_code), Some(user_code)) = (parsed.device_code, parsed.user_code) else {
            warn!("device flow initiation returned no user code: {raw}");
            return Err(AuthError::FlowStartFailed);
        };

        Ok(DeviceCodeFlow {
            device_code,
            user_code,
            verification_uri: parsed
                .verification_uri
                .unwrap_or_else(|| "https://microsoft.com/devicelogin".to_string()),
            message: parsed.message,
            expires_in: parsed.expires_in.unwrap_or(DEFAULT_FLOW_EXPIRY_SECS),
            interval: parsed.interval.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        })
    }

    /// The only interactive step: surface the verification URL and user code,
    /// then block on the operator completing sign-in out of band.
    fn present_device_code(&self, flow: &DeviceCodeFlow) {
        let prompt = match &flow.message {
            Some(message) => message.clone(),
            None => format!(
                "To sign in, go to {} and enter the code {}",
                flow.verification_uri, flow.user_code
            ),
        };
        println!("{prompt}");
        info!("{prompt}");
    }

    /// Poll the token endpoint until the operator finishes, the flow expires,
    /// or `cancel` fires.
    pub(crate) async fn poll_device_flow(
        &self,
        flow: &DeviceCodeFlow,
        cancel: &CancellationToken,
    ) -> Result<TokenExchange, AuthError> {
        let deadline = Instant::now() + Duration::from_secs(flow.expires_in);
        let mut interval = Duration::from_secs(flow.interval.max(1));
        let params = [
            ("grant_type", DEVICE_CODE_GRANT),
            ("client_id", self.config.client_id.as_str()),
            ("device_code", flow.device_code.as_str()),
            ("client_info", "1"),
        ];

        loop {
            if Instant::now() + interval >= deadline {
                return Err(AuthError::FlowExpired);
            }
            tokio::select! {
                _ = cancel.cancelled() => return Err(AuthError::Cancelled),
                _ = sleep(interval) => {}
            }

            let response = self
                .client
                .post(self.token_url())
                .form(&params)
                .send()
                .await?;
            let raw = response.text().await?;
            let parsed: TokenResponse = serde_json::from_str(&raw).unwrap_or_default();

            if parsed.access_token.is_some() {
                return Ok(TokenExchange { parsed, raw });
            }
            match parsed.error.as_deref() {
                Some("authorization_pending") => {}
                Some("slow_down") => {
                    interval += Duration::from_secs(SLOW_DOWN_BACKOFF_SECS);
                }
                Some("expired_token") => return Err(AuthError::FlowExpired),
                _ => return Err(AuthError::TokenAcquisition { response: raw }),
            }
        }
    }

    async fn redeem_refresh_token(&self, secret: &str) -> Result<TokenExchange, AuthError> {
        let scope = self.config.scope_param();
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("refresh_token", secret),
            ("scope", scope.as_str()),
            ("client_info", "1"),
        ];
        let response = self
            .client
            .post(self.token_url())
            .form(&params)
            .send()
            .await?;
        let raw = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&raw).unwrap_or_default();
        Ok(TokenExchange { parsed, raw })
    }

    /// Record a successful exchange in the cache and turn it into the caller's
    /// access token. A payload without an access token is the terminal
    /// acquisition failure, raw provider body attached.
    fn commit(
        &self,
        cache: &mut TokenCache,
        exchange: TokenExchange,
        source: TokenSource,
    ) -> Result<AccessToken, AuthError> {
        let TokenExchange { parsed, raw } = exchange;
        let Some(secret) = parsed.access_token else {
            return Err(AuthError::TokenAcquisition { response: raw });
        };

        let account = account_from_response(
            parsed.client_info.as_deref(),
            parsed.id_token.as_deref(),
        );
        let expires_on = Utc::now() + token_lifetime(parsed.expires_in);
        let scopes = match parsed.scope.as_deref() {
            Some(granted) => granted.split_whitespace().map(str::to_string).collect(),
            None => self.config.scopes.clone(),
        };

        cache.upsert_account(account.clone());
        if let Some(refresh) = parsed.refresh_token {
            cache.store_refresh_token(CachedRefreshToken {
                home_account_id: account.home_account_id.clone(),
                secret: refresh,
            });
        }
        cache.store_access_token(CachedAccessToken {
            home_account_id: account.home_account_id,
            scopes: scopes.clone(),
            secret: secret.clone(),
            expires_on,
        });

        Ok(AccessToken {
            secret,
            expires_on,
            scopes,
            source,
        })
    }

    fn device_code_url(&self) -> String {
        format!(
            "{}/oauth2/v2.0/devicecode",
            self.config.authority.trim_end_matches('/')
        )
    }

    fn token_url(&self) -> String {
        format!(
            "{}/oauth2/v2.0/token",
            self.config.authority.trim_end_matches('/')
        )
    }
}

/// A token-endpoint reply paired with its raw body, kept so acquisition
/// failures can carry the provider's exact response.
#[derive(Debug)]
pub(crate) struct TokenExchange {
    pub parsed: TokenResponse,
    pub raw: String,
}

/// Derive the cached account identity from a token response. Prefers the
/// `client_info` blob (base64url `{"uid":..,"utid":..}`), falls back to the
/// id-token claims, and finally to a fixed placeholder so a response without
/// either still caches under a stable key.
fn account_from_response(client_info: Option<&str>, id_token: Option<&str>) -> CachedAccount {
    let username = id_token
        .and_then(id_token_username)
        .unwrap_or_else(|| "unknown".to_string());
    let home_account_id = client_info
        .and_then(decode_client_info)
        .map(|(uid, utid)| format!("{uid}.{utid}"))
        .unwrap_or_else(|| format!("local.{username}"));
    CachedAccount {
        home_account_id,
        username,
    }
}

fn token_lifetime(expires_in: Option<u64>) -> chrono::Duration {
    chrono::Duration::seconds(
        expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
            .min(MAX_TOKEN_LIFETIME_SECS) as i64,
    )
}

fn decode_client_info(raw: &str) -> Option<(String, String)> {
    let bytes = URL_SAFE_NO_PAD.decode(raw.trim_end_matches('=')).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    Some((
        value.get("uid")?.as_str()?.to_string(),
        value.get("utid")?.as_str()?.to_string(),
    ))
}

fn id_token_username(raw: &str) -> Option<String> {
    let payload = raw.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims
        .get("preferred_username")
        .or_else(|| claims.get("upn"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
