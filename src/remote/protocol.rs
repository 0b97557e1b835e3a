//! Wire types for the remote account authority
//!
//! Request bodies carry `{uuid, balance, timestamp}` or
//! `{uuid_from, uuid_to, amount, timestamp}` shapes; every response carries at
//! least `{success: bool}` plus operation-specific fields.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Status string the authority returns when it speaks this protocol
pub const STATUS_SUPPORT: &str = "Support";

/// Unix timestamp attached to every mutating request
pub fn request_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Body for create and sync calls (full balance overwrite)
#[derive(Debug, Clone, Serialize)]
pub struct SyncRequest {
    pub uuid: String,
    pub balance: u64,
    pub timestamp: i64,
}

/// Body for deposit and withdraw calls
#[derive(Debug, Clone, Serialize)]
pub struct AmountRequest {
    pub uuid: String,
    pub amount: u64,
    pub timestamp: i64,
}

/// Body for transfer calls
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub uuid_from: String,
    pub uuid_to: String,
    pub amount: u64,
    pub timestamp: i64,
}

/// Generic operation response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub balance: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Best human-readable failure description the server offered
    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "server rejected request".to_string())
    }
}

/// One account record as the authority reports it (no password)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteAccount {
    pub uuid: String,
    pub balance: u64,
}

/// Response to the full account listing
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub accounts: Vec<RemoteAccount>,
}

/// Response to the capability probe
#[derive(Debug, Clone, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_request_shape() {
        let req = SyncRequest {
            uuid: "11111111-1111-4111-8111-111111111111".into(),
            balance: 500,
            timestamp: 1700000000,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["uuid"], "11111111-1111-4111-8111-111111111111");
        assert_eq!(json["balance"], 500);
        assert_eq!(json["timestamp"], 1700000000);
        // Passwords are never part of any request shape.
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_response_defaults_to_failure() {
        let resp: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.success);
        assert_eq!(resp.failure_reason(), "server rejected request");
    }

    #[test]
    fn test_failure_reason_prefers_error_field() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"success":false,"error":"no such account","message":"x"}"#)
                .unwrap();
        assert_eq!(resp.failure_reason(), "no such account");
    }

    #[test]
    fn test_accounts_response_parses_records() {
        let raw = r#"{"success":true,"accounts":[{"uuid":"a","balance":900},{"uuid":"b","balance":0}]}"#;
        let resp: AccountsResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.success);
        assert_eq!(resp.accounts.len(), 2);
        assert_eq!(resp.accounts[0].balance, 900);
    }

    #[test]
    fn test_check_response() {
        let resp: CheckResponse = serde_json::from_str(r#"{"status":"Support"}"#).unwrap();
        assert_eq!(resp.status, STATUS_SUPPORT);
    }
}
