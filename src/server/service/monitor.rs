//! Subscription handles returned when a service starts watching a guild.

use serenity::all::GuildId;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::task::AbortHandle;

/// Shared liveness flag between a service's guild registration and its handle.
#[derive(Clone, Debug)]
pub struct Subscription {
    active: Arc<AtomicBool>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Handle for a guild subscription of the role decay or join-to-create services.
///
/// Events for the guild are routed to the service until [`MonitorHandle::unsubscribe`] is
/// called. Dropping the handle leaves the subscription running. Unsubscribing aborts any
/// timer owned by the subscription; requests already sent to Discord still complete.
#[derive(Debug)]
pub struct MonitorHandle {
    guild_id: GuildId,
    subscription: Subscription,
    timer: Option<AbortHandle>,
}

impl MonitorHandle {
    pub fn new(guild_id: GuildId, subscription: Subscription, timer: Option<AbortHandle>) -> Self {
        Self {
            guild_id,
            subscription,
            timer,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn unsubscribe(self) {
        tracing::debug!("Unsubscribing monitor for guild {}", self.guild_id);
        self.subscription.cancel();
        if let Some(timer) = self.timer {
            timer.abort();
        }
    }
}
