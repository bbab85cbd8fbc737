//! Entity records returned by the BasaltPass S2S API.
//!
//! Each type mirrors one API resource as a flat, immutable snapshot. Fields
//! the server may omit are `Option`; absence of an optional field is not an
//! error, but a record missing a required field fails decoding as a whole:
//! the client never returns a partially-populated entity.
//!
//! Timestamps are carried as the server's string representation and are not
//! interpreted by this crate.

use serde::{Deserialize, Serialize};

/// API resource primary key type.
pub type Id = i64;

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub email_verified: Option<bool>,
    pub phone: Option<String>,
    pub phone_verified: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// A role attached to a user.
///
/// `code` is the stable identifier; the permissions endpoint returns bare
/// role codes instead of full `Role` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: Id,
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A single wallet ledger entry.
///
/// `amount` is a signed integer in the currency's minor unit. The API never
/// uses floating point for money and neither does this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: Id,
    pub wallet_id: Id,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: i64,
    pub status: String,
    pub reference: String,
    pub created_at: String,
}

/// One wallet view per (user, currency) query.
///
/// `balance` is the authoritative top-level figure, not derived from the
/// transaction list. `transactions` is bounded by the caller-supplied limit
/// and defaults to empty when the server omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWallet {
    pub currency: String,
    pub balance: i64,
    pub wallet_id: Id,
    #[serde(default)]
    pub transactions: Vec<WalletTransaction>,
}

/// An in-app message delivered to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    pub app_id: Id,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub sender_id: Option<Id>,
    pub sender_name: String,
    pub receiver_id: Id,
    pub is_read: bool,
    pub read_at: Option<String>,
    pub created_at: String,
}

/// One page of a user's messages.
///
/// Messages are the only paginated resource. Missing pagination metadata
/// defaults to `total = 0`, `page = 1`, `page_size = 20`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub total: i64,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

/// A product from the entitlement catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub effective_at: Option<String>,
    pub deprecated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_decodes_with_missing_optional_fields() {
        let user: User = serde_json::from_value(serde_json::json!({ "id": 7 })).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.email, None);
        assert_eq!(user.email_verified, None);
    }

    #[test]
    fn user_decode_fails_without_id() {
        let result = serde_json::from_value::<User>(serde_json::json!({ "email": "a@b.c" }));
        assert!(result.is_err());
    }

    #[test]
    fn wallet_transaction_maps_type_field() {
        let tx: WalletTransaction = serde_json::from_value(serde_json::json!({
            "id": 1,
            "wallet_id": 2,
            "type": "debit",
            "amount": -150,
            "status": "settled",
            "reference": "ord-9",
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(tx.transaction_type, "debit");
        assert_eq!(tx.amount, -150);
    }

    #[test]
    fn wallet_transaction_rejects_missing_amount() {
        let result = serde_json::from_value::<WalletTransaction>(serde_json::json!({
            "id": 1,
            "wallet_id": 2,
            "type": "debit",
            "status": "settled",
            "reference": "ord-9",
            "created_at": "2025-01-01T00:00:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn message_page_defaults_pagination_metadata() {
        let page: MessagePage = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(page.messages.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn message_decodes_with_null_sender() {
        let message: Message = serde_json::from_value(serde_json::json!({
            "id": 3,
            "app_id": 1,
            "title": "hello",
            "content": "body",
            "type": "system",
            "sender_id": null,
            "sender_name": "system",
            "receiver_id": 9,
            "is_read": false,
            "read_at": null,
            "created_at": "2025-02-02T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(message.sender_id, None);
        assert_eq!(message.message_type, "system");
    }
}
