//! Session identity: who the coordinator acts for.

use std::env;
use std::sync::{Arc, PoisonError, RwLock};

use doneit_core::OwnerId;

use crate::config::SessionConfig;

/// Environment variable checked first for the session owner.
pub const ENV_OWNER: &str = "DONEIT_OWNER";

/// Source of the authenticated owner identity.
pub trait SessionProvider: Send + Sync {
    /// Current owner, `None` when signed out.
    fn current_owner_id(&self) -> Option<OwnerId>;
}

impl<P: SessionProvider + ?Sized> SessionProvider for Arc<P> {
    fn current_owner_id(&self) -> Option<OwnerId> {
        (**self).current_owner_id()
    }
}

/// Session fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    owner: Option<OwnerId>,
}

impl StaticSession {
    /// Session signed in as `owner`.
    #[must_use]
    pub const fn signed_in(owner: OwnerId) -> Self {
        Self { owner: Some(owner) }
    }

    /// Session with nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { owner: None }
    }
}

impl SessionProvider for StaticSession {
    fn current_owner_id(&self) -> Option<OwnerId> {
        self.owner.clone()
    }
}

/// Session that can be signed in and out at runtime; clones share state.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    owner: Arc<RwLock<Option<OwnerId>>>,
}

impl SharedSession {
    /// Start signed out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the session to `owner`.
    pub fn sign_in(&self, owner: OwnerId) {
        *self.owner.write().unwrap_or_else(PoisonError::into_inner) = Some(owner);
    }

    /// Clear the session.
    pub fn sign_out(&self) {
        *self.owner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SessionProvider for SharedSession {
    fn current_owner_id(&self) -> Option<OwnerId> {
        self.owner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Resolve the owner from [`ENV_OWNER`] alone.
#[must_use]
pub fn owner_from_env() -> Option<OwnerId> {
    let mut fetch = |key: &'static str| env::var(key).ok();
    owner_from_env_with(&mut fetch)
}

/// Resolve the owner using the standard fallback order (env → config).
#[must_use]
pub fn resolve_owner(config: &SessionConfig) -> Option<OwnerId> {
    let mut fetch = |key: &'static str| env::var(key).ok();
    resolve_owner_with(config, &mut fetch)
}

fn resolve_owner_with(
    config: &SessionConfig,
    fetch: &mut impl FnMut(&'static str) -> Option<String>,
) -> Option<OwnerId> {
    owner_from_env_with(fetch).or_else(|| config.owner.as_deref().and_then(non_blank_owner))
}

fn owner_from_env_with(fetch: &mut impl FnMut(&'static str) -> Option<String>) -> Option<OwnerId> {
    fetch(ENV_OWNER).as_deref().and_then(non_blank_owner)
}

fn non_blank_owner(raw: &str) -> Option<OwnerId> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| OwnerId::new(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fetch_from(map: HashMap<&'static str, &'static str>) -> impl FnMut(&'static str) -> Option<String> {
        move |key| map.get(key).map(|value| (*value).to_owned())
    }

    #[test]
    fn env_owner_wins_over_config() {
        let config = SessionConfig {
            owner: Some("from-config".into()),
        };
        let mut fetch = fetch_from(HashMap::from([(ENV_OWNER, "from-env")]));
        assert_eq!(
            resolve_owner_with(&config, &mut fetch),
            Some(OwnerId::new("from-env"))
        );
    }

    #[test]
    fn blank_env_falls_back_to_config() {
        let config = SessionConfig {
            owner: Some(" alice ".into()),
        };
        let mut fetch = fetch_from(HashMap::from([(ENV_OWNER, "  ")]));
        assert_eq!(
            resolve_owner_with(&config, &mut fetch),
            Some(OwnerId::new("alice"))
        );
    }

    #[test]
    fn nothing_configured_means_signed_out() {
        let mut fetch = fetch_from(HashMap::new());
        assert_eq!(resolve_owner_with(&SessionConfig::default(), &mut fetch), None);
    }

    #[test]
    fn shared_session_tracks_sign_in_and_out() {
        let session = SharedSession::new();
        let observer = session.clone();
        assert_eq!(observer.current_owner_id(), None);

        session.sign_in(OwnerId::new("alice"));
        assert_eq!(observer.current_owner_id(), Some(OwnerId::new("alice")));

        session.sign_out();
        assert_eq!(observer.current_owner_id(), None);
    }

    #[test]
    fn static_sessions() {
        assert_eq!(StaticSession::anonymous().current_owner_id(), None);
        assert_eq!(
            StaticSession::signed_in(OwnerId::new("bob")).current_owner_id(),
            Some(OwnerId::new("bob"))
        );
    }
}
