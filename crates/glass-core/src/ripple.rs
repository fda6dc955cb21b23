//! Short-lived click ripples.

use crate::constants::{RIPPLE_END_DIAMETER, RIPPLE_LIFETIME, RIPPLE_START_DIAMETER};
use glam::Vec2;
use instant::Instant;
use smallvec::SmallVec;
use std::time::Duration;

pub type RippleId = u64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub id: RippleId,
    pub x: f32,
    pub y: f32,
    pub created_at: Instant,
}

/// How a ripple looks at one instant: an expanding, fading circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleAppearance {
    pub id: RippleId,
    pub center: Vec2,
    pub diameter: f32,
    pub opacity: f32,
}

impl Ripple {
    pub fn expires_at(&self, lifetime: Duration) -> Instant {
        self.created_at + lifetime
    }

    /// Alive for the closed interval `created_at..=created_at + lifetime`.
    pub fn is_alive(&self, now: Instant, lifetime: Duration) -> bool {
        now <= self.expires_at(lifetime)
    }

    pub fn appearance(&self, now: Instant, lifetime: Duration) -> RippleAppearance {
        let elapsed = if now > self.created_at {
            (now - self.created_at).as_secs_f32()
        } else {
            0.0
        };
        let progress = if lifetime.is_zero() {
            1.0
        } else {
            (elapsed / lifetime.as_secs_f32()).clamp(0.0, 1.0)
        };
        RippleAppearance {
            id: self.id,
            center: Vec2::new(self.x, self.y),
            diameter: RIPPLE_START_DIAMETER + (RIPPLE_END_DIAMETER - RIPPLE_START_DIAMETER) * progress,
            opacity: 1.0 - progress,
        }
    }
}

/// Ripples in creation order. Entries are only ever appended or removed by
/// id, so a late removal can never clobber a newer ripple.
#[derive(Clone, Debug)]
pub struct RippleSet {
    entries: SmallVec<[Ripple; 4]>,
    next_id: RippleId,
    lifetime: Duration,
}

impl Default for RippleSet {
    fn default() -> Self {
        Self::with_lifetime(RIPPLE_LIFETIME)
    }
}

impl RippleSet {
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            entries: SmallVec::new(),
            next_id: 0,
            lifetime,
        }
    }

    pub fn spawn(&mut self, position: Vec2, now: Instant) -> RippleId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Ripple {
            id,
            x: position.x,
            y: position.y,
            created_at: now,
        });
        id
    }

    pub fn remove(&mut self, id: RippleId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() != before
    }

    /// Drop every ripple whose lifetime has elapsed; returns how many went.
    pub fn expire(&mut self, now: Instant) -> usize {
        let lifetime = self.lifetime;
        let before = self.entries.len();
        self.entries.retain(|r| r.is_alive(now, lifetime));
        before - self.entries.len()
    }

    /// Live ripples at `now`, even when `expire` has not run yet.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Ripple> + '_ {
        let lifetime = self.lifetime;
        self.entries.iter().filter(move |r| r.is_alive(now, lifetime))
    }

    pub fn appearances(&self, now: Instant) -> Vec<RippleAppearance> {
        self.active(now)
            .map(|r| r.appearance(now, self.lifetime))
            .collect()
    }

    pub fn contains(&self, id: RippleId) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
