/// Cooperative scheduler for the single UI thread.
///
/// Components subscribe to a channel and keep the returned handle.
/// Teardown is explicit: hand the handle back via `unsubscribe`.
/// The host loop asks `frame_due` once per iteration and only dispatches
/// to subscriptions that are still live.

use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Channel {
    /// Once per display frame.
    Frame,
    /// Viewport size changed.
    Resize,
    /// A key event arrived.
    Key,
}

/// Handle to a live subscription. Deliberately not `Clone`:
/// releasing it consumes the only copy.
#[derive(PartialEq, Eq, Debug)]
pub struct Subscription {
    id: u64,
    channel: Channel,
}

impl Subscription {
    #[cfg(test)]
    pub fn channel(&self) -> Channel {
        self.channel
    }
}

pub struct Scheduler {
    frame_interval: Duration,
    next_frame: Instant,
    live: Vec<(u64, Channel)>,
    next_id: u64,
}

impl Scheduler {
    pub fn new(frame_interval: Duration, now: Instant) -> Self {
        Scheduler {
            frame_interval,
            next_frame: now,
            live: Vec::with_capacity(4),
            next_id: 1,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn subscribe(&mut self, channel: Channel) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.live.push((id, channel));
        Subscription { id, channel }
    }

    /// Release a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.live.len();
        self.live.retain(|&(id, _)| id != sub.id);
        let released = self.live.len() != before;
        debug!(id = sub.id, channel = ?sub.channel, released, "unsubscribe");
        released
    }

    pub fn is_live(&self, sub: &Subscription) -> bool {
        self.live.iter().any(|&(id, _)| id == sub.id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[cfg(test)]
    pub fn live_on(&self, channel: Channel) -> usize {
        self.live.iter().filter(|&&(_, c)| c == channel).count()
    }

    /// True when the next frame is due. Advances the schedule by one
    /// interval; if the host fell behind by more than one interval the
    /// schedule re-anchors at `now` so frames never pile up.
    pub fn frame_due(&mut self, now: Instant) -> bool {
        if now < self.next_frame {
            return false;
        }
        self.next_frame += self.frame_interval;
        if self.next_frame <= now {
            self.next_frame = now + self.frame_interval;
        }
        true
    }

    pub fn until_next_frame(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }
}
