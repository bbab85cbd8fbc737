//! Server-to-server client SDK for the BasaltPass identity/wallet API.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

mod http;

pub use crate::client::S2sClient;
pub use crate::config::ClientConfig;
pub use crate::error::{ApiError, ClientError};
pub use crate::models::{Id, Message, MessagePage, Product, Role, User, UserWallet, WalletTransaction};
