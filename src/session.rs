//! Authentication and session tracking for one client instance.
//!
//! The session has exactly two states: anonymous and authenticated. A
//! successful login moves it to authenticated; logout or connection loss
//! moves it back. No process-wide mutable state is involved — credentials
//! and session identity live on the client value that owns the connection.

/// Login status, username, and envelope-protocol session identity.
///
/// Invariant: `logged_in()` implies `username()` is non-empty. The converse
/// need not hold immediately after a failed login.
#[derive(Debug, Default)]
pub struct SessionState {
    username: Option<String>,
    logged_in: bool,
    session_id: Option<String>,
    request_seq: u64,
}

impl SessionState {
    /// Create an anonymous session.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Whether a login has been acknowledged and not since cleared.
    #[must_use]
    pub fn logged_in(&self) -> bool { self.logged_in }

    /// Username recorded by the last successful login.
    #[must_use]
    pub fn username(&self) -> Option<&str> { self.username.as_deref() }

    /// Opaque session token issued by the server (envelope protocol only).
    #[must_use]
    pub fn session_id(&self) -> Option<&str> { self.session_id.as_deref() }

    /// Record a server-acknowledged login.
    pub(crate) fn record_login(&mut self, username: &str, session_id: Option<String>) {
        self.username = Some(username.to_owned());
        self.logged_in = true;
        self.session_id = session_id;
    }

    /// Reset to anonymous. Called on logout and on connection loss; never
    /// conditional on the server's reply.
    pub(crate) fn clear(&mut self) {
        self.username = None;
        self.logged_in = false;
        self.session_id = None;
    }

    /// Next value of the monotonically increasing request counter.
    ///
    /// Used for request logging only; exchanges are strictly serialized, so
    /// no response matching is performed with it.
    pub(crate) fn next_request_seq(&mut self) -> u64 {
        self.request_seq += 1;
        self.request_seq
    }
}
