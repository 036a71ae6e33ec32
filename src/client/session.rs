use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::repo_types::PublicUser;
use crate::comprobantes::totals::FALLBACK_TIPO_CAMBIO;

/// Exchange-rate snapshots are reused for this long.
pub const RATE_TTL: Duration = Duration::hours(1);

/// Last exchange-rate snapshot and when it was fetched.
#[derive(Debug, Clone, Default)]
pub struct RateCache {
    snapshot: Option<(Value, OffsetDateTime)>,
}

impl RateCache {
    pub fn store(&mut self, snapshot: Value, fetched_at: OffsetDateTime) {
        self.snapshot = Some((snapshot, fetched_at));
    }

    pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
        matches!(&self.snapshot, Some((_, at)) if now - *at < RATE_TTL)
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(OffsetDateTime::now_utc())
    }

    pub fn snapshot(&self) -> Option<&Value> {
        self.snapshot.as_ref().map(|(v, _)| v)
    }

    /// `sell_price` from the snapshot. Upstream sends it either as a number
    /// or as a numeric string.
    pub fn sell_price(&self) -> Option<f64> {
        let raw = self.snapshot()?.get("sell_price")?;
        let price = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        (price.is_finite() && price > 0.0).then_some(price)
    }
}

/// Client application state shared by every view.
#[derive(Debug, Clone)]
pub struct Session {
    loading: bool,
    token: Option<String>,
    user: Option<PublicUser>,
    rate: RateCache,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Starts in the loading state until a stored session is restored or
    /// [`Session::finish_loading`] is called.
    pub fn new() -> Self {
        Self {
            loading: true,
            token: None,
            user: None,
            rate: RateCache::default(),
        }
    }

    pub fn restore(token: String, user: PublicUser) -> Self {
        let mut session = Self::new();
        session.login(token, user);
        session
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    pub fn login(&mut self, token: String, user: PublicUser) {
        debug!(user_id = user.id, "session started");
        self.token = Some(token);
        self.user = Some(user);
        self.loading = false;
    }

    pub fn logout(&mut self) {
        if let Some(user) = &self.user {
            debug!(user_id = user.id, "session closed");
        }
        self.token = None;
        self.user = None;
    }

    pub fn set_rate(&mut self, snapshot: Value) {
        self.rate.store(snapshot, OffsetDateTime::now_utc());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.user.as_ref()
    }

    pub fn rate(&self) -> &RateCache {
        &self.rate
    }

    /// USD sell rate, or the fallback when nothing usable is cached.
    pub fn tipo_cambio(&self) -> f64 {
        self.rate.sell_price().unwrap_or(FALLBACK_TIPO_CAMBIO)
    }
}
