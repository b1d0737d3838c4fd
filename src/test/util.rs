use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use futures_core::future::BoxFuture;
use futures_util::FutureExt;

use crate::{
    connector::{BuildInfo, Connector, SessionId},
    error::{Error, Result},
    options::Credential,
};

pub(crate) const DATABASE_NAME: &str = "dbAuthTests";
pub(crate) const AUTHENTICATION_DATABASE_NAME: &str = "admin";

pub(crate) fn credentials() -> Credential {
    Credential::new("admin", "admin")
}

/// An in-memory `Connector` that records what it is asked to do.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeConnector {
    state: Arc<FakeState>,
}

#[derive(Debug, Default)]
struct FakeState {
    version: Mutex<String>,
    auth_delay: Mutex<Duration>,
    unreachable: AtomicBool,
    users: Mutex<HashMap<String, HashMap<String, String>>>,
    already_authenticated: Mutex<HashSet<(String, String)>>,
    auth_attempts: Mutex<Vec<String>>,
    open_sessions: Mutex<HashSet<SessionId>>,
    sessions_started: AtomicUsize,
    dropped: Mutex<Vec<String>>,
    shut_down: AtomicBool,
}

impl FakeConnector {
    pub(crate) fn new() -> Self {
        let connector = Self::default();
        connector.set_version("3.6.8");
        connector
    }

    /// Makes every authentication round-trip take `delay`, so that concurrent callers overlap.
    pub(crate) fn with_auth_delay(self, delay: Duration) -> Self {
        *self.state.auth_delay.lock().unwrap() = delay;
        self
    }

    pub(crate) fn set_version(&self, version: &str) {
        *self.state.version.lock().unwrap() = version.to_string();
    }

    pub(crate) fn set_unreachable(&self, unreachable: bool) {
        self.state.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub(crate) fn add_user(&self, db: &str, username: &str, password: &str) {
        self.state
            .users
            .lock()
            .unwrap()
            .entry(db.to_string())
            .or_default()
            .insert(username.to_string(), password.to_string());
    }

    /// Reports `username` as already authenticated against `db` without a round-trip.
    pub(crate) fn mark_authenticated(&self, db: &str, username: &str) {
        self.state
            .already_authenticated
            .lock()
            .unwrap()
            .insert((db.to_string(), username.to_string()));
    }

    pub(crate) fn auth_attempts(&self) -> usize {
        self.state.auth_attempts.lock().unwrap().len()
    }

    pub(crate) fn auth_attempts_against(&self, db: &str) -> usize {
        self.state
            .auth_attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|attempt| attempt.as_str() == db)
            .count()
    }

    pub(crate) fn sessions_started(&self) -> usize {
        self.state.sessions_started.load(Ordering::SeqCst)
    }

    pub(crate) fn open_sessions(&self) -> usize {
        self.state.open_sessions.lock().unwrap().len()
    }

    pub(crate) fn dropped_databases(&self) -> Vec<String> {
        self.state.dropped.lock().unwrap().clone()
    }

    /// How many clones of this connector are alive, this one included.
    pub(crate) fn handle_count(&self) -> usize {
        Arc::strong_count(&self.state)
    }

    pub(crate) fn is_shut_down(&self) -> bool {
        self.state.shut_down.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<()> {
        if self.state.unreachable.load(Ordering::SeqCst) {
            return Err(Error::connectivity_error("connection refused"));
        }
        Ok(())
    }
}

impl Connector for FakeConnector {
    fn authenticate<'a>(
        &'a self,
        db: &'a str,
        credential: &'a Credential,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            self.state.auth_attempts.lock().unwrap().push(db.to_string());
            let delay = *self.state.auth_delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.check_reachable()?;

            let username = credential.username.as_deref().unwrap_or_default();
            let valid = self
                .state
                .users
                .lock()
                .unwrap()
                .get(db)
                .and_then(|users| users.get(username))
                .map(|password| Some(password) == credential.password.as_ref())
                .unwrap_or(false);

            if valid {
                Ok(())
            } else {
                Err(Error::authentication_error(username, "invalid credentials"))
            }
        }
        .boxed()
    }

    fn is_authenticated<'a>(
        &'a self,
        db: &'a str,
        credential: &'a Credential,
    ) -> BoxFuture<'a, Result<bool>> {
        async move {
            self.check_reachable()?;
            let key = (
                db.to_string(),
                credential.username.clone().unwrap_or_default(),
            );
            Ok(self.state.already_authenticated.lock().unwrap().contains(&key))
        }
        .boxed()
    }

    fn build_info(&self) -> BoxFuture<'_, Result<BuildInfo>> {
        async move {
            self.check_reachable()?;
            Ok(BuildInfo::new(self.state.version.lock().unwrap().clone()))
        }
        .boxed()
    }

    fn create_user<'a>(
        &'a self,
        db: &'a str,
        username: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            self.check_reachable()?;
            self.add_user(db, username, password);
            Ok(())
        }
        .boxed()
    }

    fn drop_database<'a>(&'a self, db: &'a str) -> BoxFuture<'a, Result<()>> {
        async move {
            self.check_reachable()?;
            self.state.users.lock().unwrap().remove(db);
            self.state.dropped.lock().unwrap().push(db.to_string());
            Ok(())
        }
        .boxed()
    }

    fn start_session(&self) -> BoxFuture<'_, Result<SessionId>> {
        async move {
            self.check_reachable()?;
            let id = SessionId::next();
            self.state.sessions_started.fetch_add(1, Ordering::SeqCst);
            self.state.open_sessions.lock().unwrap().insert(id);
            Ok(id)
        }
        .boxed()
    }

    fn end_session(&self, session: SessionId) {
        self.state.open_sessions.lock().unwrap().remove(&session);
    }

    fn shutdown(&self) -> BoxFuture<'_, ()> {
        async move {
            self.state.shut_down.store(true, Ordering::SeqCst);
        }
        .boxed()
    }
}
