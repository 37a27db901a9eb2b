//! Authenticated requests against Meridian account servers.
//!
//! The account engine owns OAuth-style access tokens for one or more
//! account servers, issues HTTP requests against them only when a valid
//! token is present, correlates completions back to caller-supplied
//! callbacks, and persists tokens across restarts through the client
//! settings store.
//!
//! # Architecture
//!
//! ```text
//! caller -> AccountManager -> Transport (reqwest task per request)
//!               |       ^                     |
//!          TokenStore   |              TransportEvent
//!       CallbackRegistry|                     |
//!               host event loop  <-- mpsc ----+
//! ```
//!
//! All account state lives on one logical owner: the host drains the
//! transport's event channel and feeds each completion into
//! [`AccountManager::handle_transport_event`].

mod callback;
mod error;
mod manager;
mod token;
mod token_store;
mod transport;

#[cfg(test)]
mod tests;

pub use callback::{CallbackRegistry, Callbacks, ErrorCallback, SuccessCallback};
pub use error::{AccountError, AccountResult};
pub use manager::{root_address, AccountEvent, AccountManager};
pub use token::{AccessToken, AccountInfo};
pub use token_store::{escape_root_address, unescape_root_address, TokenStore, ACCOUNTS_GROUP};
pub use transport::{
    HttpTransport, Operation, OutboundRequest, RequestId, Transport, TransportError,
    TransportEvent, TransportOutcome,
};
