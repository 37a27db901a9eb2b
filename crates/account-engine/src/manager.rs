//! The account manager façade.

use crate::callback::{CallbackRegistry, Callbacks};
use crate::token::AccountInfo;
use crate::token_store::TokenStore;
use crate::transport::{
    Operation, OutboundRequest, RequestId, Transport, TransportEvent, TransportOutcome,
};
use crate::AccountResult;
use client_settings::SettingsStore;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::form_urlencoded;
use url::Url;

/// Path of the password-grant token endpoint on every account server.
const OAUTH_TOKEN_PATH: &str = "/oauth/token";

/// Content type for form-encoded request bodies.
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Capacity of the account event channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Notifications published by the account manager.
#[derive(Debug, Clone)]
pub enum AccountEvent {
    /// A request needed a valid access token and none was available.
    /// Whoever holds credentials should call
    /// [`AccountManager::request_access_token`].
    AuthenticationRequired,

    /// A token grant succeeded for the given account-server root.
    AccessTokenReceived { root_url: Url },
}

/// Owns access tokens and in-flight request state for the account servers
/// this client talks to.
///
/// One instance per process, owned by the host's event-driving task. No
/// internal locking: every operation takes `&mut self`, and transport
/// completions must be funneled back through
/// [`AccountManager::handle_transport_event`] from that same owner.
pub struct AccountManager {
    root_url: Url,
    username: Option<String>,
    token_store: TokenStore,
    callbacks: CallbackRegistry,
    pending_grants: HashSet<RequestId>,
    transport: Arc<dyn Transport>,
    events: broadcast::Sender<AccountEvent>,
}

impl AccountManager {
    /// Create a manager pointed at `root_url`, loading every persisted
    /// account from the settings store.
    pub fn new(
        root_url: Url,
        transport: Arc<dyn Transport>,
        settings: Arc<dyn SettingsStore>,
    ) -> AccountResult<Self> {
        let token_store = TokenStore::load(settings)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        info!(
            root = %root_url,
            accounts = token_store.len(),
            "Account manager ready"
        );

        Ok(Self {
            root_url,
            username: None,
            token_store,
            callbacks: CallbackRegistry::new(),
            pending_grants: HashSet::new(),
            transport,
            events,
        })
    }

    /// Subscribe to account notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<AccountEvent> {
        self.events.subscribe()
    }

    /// The account server currently targeted.
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// Point at a different account server.
    ///
    /// Clears the cached username, since profile data belongs to the old
    /// server. The old server's token stays in the store for later reuse.
    pub fn set_root_url(&mut self, root_url: Url) {
        if self.root_url != root_url {
            self.root_url = root_url;
            self.username = None;

            info!(root = %self.root_url, "Account server changed, authentication flow reset");
        }
    }

    /// The username associated with the current account, if known.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Record the username for the current account.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    /// Whether a non-empty, unexpired token is stored for the current
    /// account server.
    pub fn has_valid_access_token(&self) -> bool {
        let root = root_address(&self.root_url);
        if self.token_store.is_valid(&root) {
            true
        } else {
            debug!(root = %root, "An access token is required for requests to this account server");
            false
        }
    }

    /// Like [`Self::has_valid_access_token`], but emits
    /// [`AccountEvent::AuthenticationRequired`] when no usable token is
    /// present, so a credential holder can step in.
    pub fn check_and_signal_access_token(&self) -> bool {
        let has_token = self.has_valid_access_token();
        if !has_token {
            let _ = self.events.send(AccountEvent::AuthenticationRequired);
        }
        has_token
    }

    /// Issue an authenticated request against the current account server.
    ///
    /// Without a valid token this is a no-op beyond raising the
    /// authentication-required signal. Only `Get` and `Post` are
    /// supported; `Post` bodies are sent form-encoded. Outcomes are
    /// observable only through `callbacks` and account events.
    pub fn authenticated_request(
        &mut self,
        path: &str,
        operation: Operation,
        callbacks: Callbacks,
        body: Option<Vec<u8>>,
    ) {
        if !self.check_and_signal_access_token() {
            return;
        }

        let (content_type, body) = match operation {
            Operation::Get => (None, None),
            Operation::Post => (Some(FORM_URLENCODED.to_string()), body),
            other => {
                warn!(?other, path, "Unsupported operation for an authenticated request");
                return;
            }
        };

        let token = self
            .token_store
            .get(&root_address(&self.root_url))
            .access_token
            .token;

        let mut url = self.root_url.clone();
        url.set_path(path);
        url.set_query(None);
        url.query_pairs_mut().append_pair("access_token", &token);

        debug!(url = %url, "Making an authenticated request");

        let request = OutboundRequest {
            url,
            operation,
            content_type,
            body,
        };

        if let Some(request_id) = self.transport.submit(request) {
            self.callbacks.register(request_id, callbacks);
        }
    }

    /// Exchange credentials for an access token (password grant).
    ///
    /// The outcome arrives later through [`Self::handle_transport_event`]:
    /// on success the token is stored and
    /// [`AccountEvent::AccessTokenReceived`] fires; failures are logged
    /// and leave every account unchanged.
    pub fn request_access_token(&mut self, login: &str, password: &str) {
        let mut grant_url = self.root_url.clone();
        grant_url.set_path(OAUTH_TOKEN_PATH);
        grant_url.set_query(None);

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "password")
            .append_pair("username", login)
            .append_pair("password", password)
            .finish();

        debug!(url = %grant_url, login, "Requesting an access token");

        let request = OutboundRequest {
            url: grant_url,
            operation: Operation::Post,
            content_type: Some(FORM_URLENCODED.to_string()),
            body: Some(body.into_bytes()),
        };

        if let Some(request_id) = self.transport.submit(request) {
            self.pending_grants.insert(request_id);
        }
    }

    /// Route a transport completion back to whoever is waiting on it:
    /// token grants are handled internally, everything else goes to the
    /// callback registry.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        if self.pending_grants.remove(&event.request_id) {
            match event.outcome {
                TransportOutcome::Success { url, body } => {
                    self.handle_grant_response(url, &body);
                }
                TransportOutcome::Error { error, message } => {
                    warn!(%error, %message, "Access token request failed at the transport level");
                }
            }
            return;
        }

        match event.outcome {
            TransportOutcome::Success { body, .. } => {
                self.callbacks.resolve_success(event.request_id, &body);
            }
            TransportOutcome::Error { error, message } => {
                self.callbacks
                    .resolve_error(event.request_id, error, &message);
            }
        }
    }

    fn handle_grant_response(&mut self, response_url: Url, body: &[u8]) {
        let document: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "Password grant response was not valid JSON");
                return;
            }
        };

        let Some(object) = document.as_object() else {
            warn!("Password grant response was not a JSON object");
            return;
        };

        if let Some(error) = object.get("error") {
            let description = object
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            warn!(error = %error, description, "Account server rejected the password grant");
            return;
        }

        let Some(info) = AccountInfo::from_grant_response(object) else {
            warn!("Password grant response is missing one or more expected values");
            return;
        };

        // Key the fresh token under the *response* URL's root: after a
        // redirect this can differ from the configured root URL.
        let root = root_address(&response_url);

        info!(root = %root, "Storing an account with a fresh access token");

        if let Some(username) = info.username() {
            self.username = Some(username.to_string());
        }

        if let Err(err) = self.token_store.put(&root, info) {
            warn!(%err, root = %root, "Failed to persist the fresh access token");
        }

        match Url::parse(&root) {
            Ok(root_url) => {
                let _ = self
                    .events
                    .send(AccountEvent::AccessTokenReceived { root_url });
            }
            Err(err) => {
                warn!(%err, root = %root, "Granted root address did not parse as a URL");
            }
        }
    }
}

/// The scheme+host+port of a URL: the key its tokens are stored under.
pub fn root_address(url: &Url) -> String {
    url.origin().ascii_serialization()
}
