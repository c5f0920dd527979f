// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas Core - Session store
//
// Holds the current user and the loading flag for the initial profile
// fetch. The store trusts the backend to reject expired tokens via HTTP
// status; there is no refresh-token handling and no expiry inspection.

use crate::client::ApiClient;
use crate::token::TokenStore;
use crate::types::{AppError, AuthResponse, Role, User};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory session state shared with the token store
pub struct SessionStore {
    user: RwLock<Option<User>>,
    loading: AtomicBool,
    tokens: Arc<TokenStore>,
}

impl SessionStore {
    /// Create a session store over an existing token store
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        Self {
            user: RwLock::new(None),
            loading: AtomicBool::new(true),
            tokens,
        }
    }

    /// Restore the session on startup.
    ///
    /// If a token is stored, validate it by fetching the current profile.
    /// Any failure degrades silently to a logged-out state: the token and
    /// user are cleared and a warning is logged.
    pub async fn initialize(&self, client: &ApiClient) {
        let profile = if self.tokens.has_token() {
            Some(client.me().await)
        } else {
            None
        };
        self.finish_init(profile);
    }

    fn finish_init(&self, profile: Option<Result<User, AppError>>) {
        match profile {
            Some(Ok(user)) => {
                tracing::info!("Session restored for {}", user.email);
                *self.user.write().unwrap() = Some(user);
            }
            Some(Err(e)) => {
                tracing::warn!("Failed to initialize session: {}", e);
                self.tokens.clear();
                *self.user.write().unwrap() = None;
            }
            None => {}
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Install a fresh login: token first, then the user
    pub fn login(&self, auth: AuthResponse) -> Result<(), AppError> {
        self.tokens.save(auth.token)?;
        *self.user.write().unwrap() = Some(auth.user);
        self.loading.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Clear both the in-memory user and the stored token
    pub fn logout(&self) {
        self.tokens.clear();
        *self.user.write().unwrap() = None;
    }

    /// Replace the in-memory user (e.g. after a profile edit)
    pub fn update_user(&self, user: User) {
        *self.user.write().unwrap() = Some(user);
    }

    /// Get the current user, if any
    pub fn current_user(&self) -> Option<User> {
        self.user.read().unwrap().clone()
    }

    /// True while the initial profile fetch has not yet resolved
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// A user object OR a stored token counts as authenticated, so callers
    /// can render optimistically before the profile fetch resolves.
    pub fn is_authenticated(&self) -> bool {
        self.user.read().unwrap().is_some() || self.tokens.has_token()
    }

    /// Role of the current user, if any
    pub fn role(&self) -> Option<Role> {
        self.user.read().unwrap().as_ref().map(|u| u.role)
    }

    /// Exact match against the user's single role field
    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store() -> (SessionStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let tokens = Arc::new(TokenStore::with_path(dir.path().join("auth.json")));
        (SessionStore::new(tokens), dir)
    }

    fn user(role: Role) -> User {
        User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn auth(role: Role) -> AuthResponse {
        AuthResponse {
            user: user(role),
            token: "tok-123".to_string(),
        }
    }

    #[test]
    fn test_login_sets_user_and_token() {
        let (session, _dir) = store();
        assert!(!session.is_authenticated());

        session.login(auth(Role::Merchant)).unwrap();
        assert!(session.is_authenticated());
        assert!(session.has_role(Role::Merchant));
        assert!(!session.has_role(Role::Administrator));
        assert_eq!(
            session.current_user().map(|u| u.email),
            Some("ana@example.com".to_string())
        );
    }

    #[test]
    fn test_logout_clears_user_and_token() {
        let (session, _dir) = store();
        session.login(auth(Role::User)).unwrap();

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn test_stored_token_counts_as_authenticated_before_profile_fetch() {
        let (session, _dir) = store();
        session.tokens.save("persisted".to_string()).unwrap();

        assert!(session.current_user().is_none());
        assert!(session.is_authenticated());
        assert!(session.is_loading());
    }

    #[test]
    fn test_failed_initialization_degrades_to_logged_out() {
        let (session, _dir) = store();
        session.tokens.save("stale".to_string()).unwrap();

        session.finish_init(Some(Err(AppError::Api {
            status: 401,
            message: "token expired".to_string(),
        })));

        assert!(!session.is_authenticated());
        assert!(!session.tokens.has_token());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_successful_initialization_installs_user() {
        let (session, _dir) = store();
        session.tokens.save("fresh".to_string()).unwrap();

        session.finish_init(Some(Ok(user(Role::Administrator))));

        assert!(session.is_authenticated());
        assert!(session.has_role(Role::Administrator));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_initialization_without_token_stays_logged_out() {
        let (session, _dir) = store();
        session.finish_init(None);

        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
    }
}
