//! HTTP client for the remote account authority
//!
//! Blocking reqwest client with a configurable timeout. Any transport error
//! or non-`success` response surfaces as [`CardBankError::RemoteFailure`];
//! callers treat both identically as soft failures.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::settings::ServerSettings;
use crate::crypto::SystemKey;
use crate::error::{CardBankError, CardBankResult};
use crate::models::{Account, AccountId};

use super::protocol::{
    request_timestamp, AccountsResponse, AmountRequest, ApiResponse, CheckResponse, RemoteAccount,
    SyncRequest, TransferRequest, STATUS_SUPPORT,
};

/// Point-to-point operations against the remote account authority
pub trait RemoteClient {
    /// Lightweight capability probe; decides the run mode once per process
    fn check(&self) -> bool;

    /// Register a newly created account (balance only)
    fn create_account(&self, account: &Account) -> CardBankResult<()>;

    /// Mirror a deposit
    fn deposit(&self, id: &AccountId, amount: u64) -> CardBankResult<()>;

    /// Mirror a withdrawal
    fn withdraw(&self, id: &AccountId, amount: u64) -> CardBankResult<()>;

    /// Mirror a transfer between two accounts
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u64) -> CardBankResult<()>;

    /// Mirror an account deletion
    fn delete_account(&self, id: &AccountId) -> CardBankResult<()>;

    /// Push a full-overwrite of one account's balance
    fn sync_account(&self, account: &Account) -> CardBankResult<()>;

    /// Fetch the authority's identifier+balance set, bounded by `max`
    fn fetch_all(&self, max: usize) -> CardBankResult<Vec<RemoteAccount>>;
}

/// reqwest-backed [`RemoteClient`]
pub struct HttpRemoteClient {
    http: reqwest::blocking::Client,
    base_url: String,
    client_id: String,
}

impl HttpRemoteClient {
    /// Build a client from settings, deriving the client id from the system key
    pub fn new(settings: &ServerSettings, key: &SystemKey) -> CardBankResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(!settings.verify_cert)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            client_id: key.client_id(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> CardBankResult<T> {
        debug!(endpoint, "GET");
        let response = self
            .http
            .get(self.url(endpoint))
            .header("X-Client-Key", &self.client_id)
            .header("X-Request-Time", request_timestamp().to_string())
            .send()?;
        Ok(response.json()?)
    }

    fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> CardBankResult<ApiResponse> {
        debug!(endpoint, "POST");
        let response = self
            .http
            .post(self.url(endpoint))
            .header("X-Client-Key", &self.client_id)
            .header("X-Request-Time", request_timestamp().to_string())
            .json(body)
            .send()?;
        Ok(response.json()?)
    }

    fn expect_success(&self, endpoint: &str, response: ApiResponse) -> CardBankResult<()> {
        if response.success {
            Ok(())
        } else {
            Err(CardBankError::RemoteFailure(format!(
                "{}: {}",
                endpoint,
                response.failure_reason()
            )))
        }
    }
}

impl RemoteClient for HttpRemoteClient {
    fn check(&self) -> bool {
        match self.get::<CheckResponse>("/api/check") {
            Ok(resp) => resp.status == STATUS_SUPPORT,
            Err(e) => {
                debug!(error = %e, "capability probe failed");
                false
            }
        }
    }

    fn create_account(&self, account: &Account) -> CardBankResult<()> {
        let body = SyncRequest {
            uuid: account.id.to_string(),
            balance: account.balance,
            timestamp: request_timestamp(),
        };
        let resp = self.post("/api/account/create", &body)?;
        self.expect_success("/api/account/create", resp)
    }

    fn deposit(&self, id: &AccountId, amount: u64) -> CardBankResult<()> {
        let body = AmountRequest {
            uuid: id.to_string(),
            amount,
            timestamp: request_timestamp(),
        };
        let resp = self.post("/api/account/deposit", &body)?;
        self.expect_success("/api/account/deposit", resp)
    }

    fn withdraw(&self, id: &AccountId, amount: u64) -> CardBankResult<()> {
        let body = AmountRequest {
            uuid: id.to_string(),
            amount,
            timestamp: request_timestamp(),
        };
        let resp = self.post("/api/account/withdraw", &body)?;
        self.expect_success("/api/account/withdraw", resp)
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u64) -> CardBankResult<()> {
        let body = TransferRequest {
            uuid_from: from.to_string(),
            uuid_to: to.to_string(),
            amount,
            timestamp: request_timestamp(),
        };
        let resp = self.post("/api/account/transfer", &body)?;
        self.expect_success("/api/account/transfer", resp)
    }

    fn delete_account(&self, id: &AccountId) -> CardBankResult<()> {
        let endpoint = format!("/api/account/{}", id);
        debug!(endpoint = %endpoint, "DELETE");
        let response: ApiResponse = self
            .http
            .delete(self.url(&endpoint))
            .header("X-Client-Key", &self.client_id)
            .header("X-Request-Time", request_timestamp().to_string())
            .send()?
            .json()?;
        self.expect_success(&endpoint, response)
    }

    fn sync_account(&self, account: &Account) -> CardBankResult<()> {
        let body = SyncRequest {
            uuid: account.id.to_string(),
            balance: account.balance,
            timestamp: request_timestamp(),
        };
        let resp = self.post("/api/account/sync", &body)?;
        self.expect_success("/api/account/sync", resp)
    }

    fn fetch_all(&self, max: usize) -> CardBankResult<Vec<RemoteAccount>> {
        let resp: AccountsResponse = self.get("/api/accounts")?;
        if !resp.success {
            return Err(CardBankError::RemoteFailure(
                "/api/accounts: server rejected request".to_string(),
            ));
        }
        let mut accounts = resp.accounts;
        if accounts.len() > max {
            warn!(
                total = accounts.len(),
                max, "remote account set exceeds pull bound, truncating"
            );
            accounts.truncate(max);
        }
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> HttpRemoteClient {
        let settings = ServerSettings {
            url: "https://bank.example.com/".into(),
            timeout_secs: 5,
            verify_cert: true,
            max_pull_batch: 100,
        };
        HttpRemoteClient::new(&settings, &SystemKey::from_bytes([1u8; 16])).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = test_client();
        assert_eq!(
            client.url("/api/check"),
            "https://bank.example.com/api/check"
        );
    }

    #[test]
    fn test_client_id_derived_from_key() {
        let client = test_client();
        assert_eq!(
            client.client_id,
            SystemKey::from_bytes([1u8; 16]).client_id()
        );
    }

    #[test]
    fn test_expect_success_maps_failure() {
        let client = test_client();
        let resp: ApiResponse =
            serde_json::from_str(r#"{"success":false,"error":"insufficient funds"}"#).unwrap();
        let err = client.expect_success("/api/account/withdraw", resp).unwrap_err();
        assert!(err.is_remote());
        assert!(err.to_string().contains("insufficient funds"));
    }
}
