//! Server-side session store, cookie plumbing, and the middleware that binds a
//! session to every request.
//!
//! Each client is identified by an opaque token in the [`SESSION_COOKIE`]
//! cookie. A session is created on first contact (anonymous), gains an
//! identity on login, and disappears on logout or once its fixed lifetime
//! (counted from creation) has elapsed. Expiry is checked lazily whenever a
//! session is looked up.

use std::{collections::HashMap, fmt, sync::Arc};

use axum::{
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, HeaderValue, header, request::Parts},
  middleware::Next,
  response::Response,
};
use chrono::{DateTime, TimeDelta, Utc};
use rand_core::{OsRng, RngCore as _};
use tokio::sync::RwLock;

use crate::error::Error;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "syllabus.sid";

const TOKEN_BYTES: usize = 32;

// ─── Session id ──────────────────────────────────────────────────────────────

/// Opaque session token: 32 random bytes, hex-encoded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
  fn generate() -> Self {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Self(hex::encode(bytes))
  }

  /// Accept a client-supplied token only if it has the shape we issue.
  pub fn parse(raw: &str) -> Option<Self> {
    let ok = raw.len() == TOKEN_BYTES * 2
      && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    ok.then(|| Self(raw.to_owned()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Only a prefix is ever printed, so tokens don't end up in logs.
impl fmt::Debug for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SessionId({}…)", &self.0[..8.min(self.0.len())])
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Session {
  pub id:         SessionId,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
  /// `Some` once the client has logged in.
  pub identity:   Option<String>,
}

impl Session {
  fn anonymous(ttl: TimeDelta, now: DateTime<Utc>) -> Self {
    Self {
      id:         SessionId::generate(),
      created_at: now,
      expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
      identity:   None,
    }
  }

  pub fn is_authenticated(&self) -> bool {
    self.identity.is_some()
  }

  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at
  }

  /// What the request log records about this session.
  pub fn snapshot(&self) -> SessionSnapshot {
    SessionSnapshot {
      id:            self.id.clone(),
      authenticated: self.is_authenticated(),
      identity:      self.identity.clone(),
      expires_at:    self.expires_at,
    }
  }
}

/// Loggable view of a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
  pub id:            SessionId,
  pub authenticated: bool,
  pub identity:      Option<String>,
  pub expires_at:    DateTime<Utc>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Process-local mapping from session token to session state.
pub struct SessionStore {
  sessions:      RwLock<HashMap<SessionId, Session>>,
  ttl:           TimeDelta,
  secure_cookie: bool,
}

impl SessionStore {
  pub fn new(ttl: TimeDelta) -> Self {
    Self {
      sessions: RwLock::new(HashMap::new()),
      ttl,
      secure_cookie: false,
    }
  }

  /// Mark issued cookies `Secure`.
  pub fn with_secure_cookie(mut self, secure: bool) -> Self {
    self.secure_cookie = secure;
    self
  }

  /// Start a new anonymous session. Expired sessions are swept first.
  pub async fn create(&self) -> Session {
    let now = Utc::now();
    let session = Session::anonymous(self.ttl, now);
    let mut map = self.sessions.write().await;
    let before = map.len();
    map.retain(|_, s| !s.is_expired_at(now));
    if map.len() < before {
      tracing::debug!(swept = before - map.len(), "expired sessions removed");
    }
    map.insert(session.id.clone(), session.clone());
    tracing::debug!(session = ?session.id, "session created");
    session
  }

  /// Look up a live session. An expired one is removed and reported absent.
  pub async fn get(&self, id: &SessionId) -> Option<Session> {
    let now = Utc::now();
    {
      let map = self.sessions.read().await;
      match map.get(id) {
        None => return None,
        Some(s) if !s.is_expired_at(now) => return Some(s.clone()),
        Some(_) => {}
      }
    }
    self.sessions.write().await.remove(id);
    tracing::debug!(session = ?id, "session expired");
    None
  }

  /// The live session named by the client's cookie, or a fresh one. The flag
  /// is `true` when the session was created by this call.
  pub async fn resolve(&self, id: Option<&SessionId>) -> (Session, bool) {
    if let Some(id) = id
      && let Some(session) = self.get(id).await
    {
      return (session, false);
    }
    (self.create().await, true)
  }

  /// Bind `identity` to session `id`. If that session has meanwhile expired
  /// a new one is started in its place, so the returned session's id may
  /// differ from `id`.
  pub async fn authenticate(&self, id: &SessionId, identity: String) -> Session {
    let now = Utc::now();
    {
      let mut map = self.sessions.write().await;
      if let Some(session) = map.get_mut(id)
        && !session.is_expired_at(now)
      {
        session.identity = Some(identity);
        return session.clone();
      }
    }
    let mut session = self.create().await;
    session.identity = Some(identity);
    self
      .sessions
      .write()
      .await
      .insert(session.id.clone(), session.clone());
    session
  }

  /// Drop session `id`. Returns whether it existed.
  pub async fn destroy(&self, id: &SessionId) -> bool {
    self.sessions.write().await.remove(id).is_some()
  }

  /// Whether `id` names a live session with an identity bound.
  pub async fn is_authenticated(&self, id: &SessionId) -> bool {
    self.get(id).await.is_some_and(|s| s.is_authenticated())
  }

  pub async fn session_count(&self) -> usize {
    self.sessions.read().await.len()
  }

  // ── Cookies ─────────────────────────────────────────────────────────────

  /// `Set-Cookie` value carrying `session`'s token until it expires.
  pub fn set_cookie(&self, session: &Session) -> Option<HeaderValue> {
    let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
    let value = format!(
      "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}{}",
      session.id.as_str(),
      if self.secure_cookie { "; Secure" } else { "" },
    );
    HeaderValue::from_str(&value)
      .inspect_err(|e| tracing::warn!("cannot encode session cookie: {e}"))
      .ok()
  }

  /// `Set-Cookie` value that makes the client discard its token.
  pub fn clear_cookie(&self) -> HeaderValue {
    if self.secure_cookie {
      HeaderValue::from_static(
        "syllabus.sid=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure",
      )
    } else {
      HeaderValue::from_static("syllabus.sid=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
  }
}

/// The session token in the request's `Cookie` header(s), if well-formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|s| s.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .and_then(|(_, value)| SessionId::parse(value))
}

// ─── Middleware and extractor ────────────────────────────────────────────────

/// The session bound to the current request, as it stood when the request
/// arrived.
#[derive(Debug, Clone)]
pub struct CurrentSession {
  pub session: Session,
  /// Created by this request; the client does not hold its cookie yet.
  pub fresh:   bool,
}

/// Resolve (or start) the caller's session, expose it to handlers as
/// [`CurrentSession`], and hand a new client its cookie unless a handler
/// already set one.
pub async fn attach_session(
  State(store): State<Arc<SessionStore>>,
  mut req: Request,
  next: Next,
) -> Response {
  let cookie_id = session_id_from_headers(req.headers());
  let (session, fresh) = store.resolve(cookie_id.as_ref()).await;
  req
    .extensions_mut()
    .insert(CurrentSession { session: session.clone(), fresh });

  let mut resp = next.run(req).await;
  if fresh
    && !resp.headers().contains_key(header::SET_COOKIE)
    && let Some(cookie) = store.set_cookie(&session)
  {
    resp.headers_mut().insert(header::SET_COOKIE, cookie);
  }
  resp
}

impl<S> FromRequestParts<S> for CurrentSession
where
  S: Send + Sync,
{
  type Rejection = Error;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<CurrentSession>()
      .cloned()
      .ok_or(Error::SessionMissing)
  }
}
