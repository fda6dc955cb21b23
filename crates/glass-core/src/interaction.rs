//! Pointer tracking, magnetic pull and click ripples.
//!
//! The state transition ([`transition`]) is a pure function so it can be
//! tested without any rendering surface; [`InteractionController`] wraps it
//! with hover, external overrides and the ripple collection.

use crate::constants::{DEFAULT_GLASS_HEIGHT, DEFAULT_GLASS_WIDTH, MAGNETIC_RADIUS, MAGNETIC_STRENGTH};
use crate::ripple::{RippleId, RippleSet};
use glam::Vec2;
use instant::Instant;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }
}

/// Measured panel size; glow and shadow layers follow it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassSize {
    pub width: f32,
    pub height: f32,
}

impl Default for GlassSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_GLASS_WIDTH,
            height: DEFAULT_GLASS_HEIGHT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub global_position: Vec2,
    /// Signed offset from the container centre, in percent of its size.
    pub offset_from_center: Vec2,
    pub magnetic_offset: Vec2,
    pub distance_from_center: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// `bounds` is `None` when the tracked container is not mounted.
    Move { position: Vec2, bounds: Option<Rect> },
    Leave,
    Rebind,
}

/// Up to 10% of the raw delta, scaled by a linear falloff that is 1 at the
/// centre and 0 at the radius. Zero at and beyond the radius.
pub fn magnetic_offset(delta: Vec2, distance: f32, enabled: bool) -> Vec2 {
    if !enabled || !(distance < MAGNETIC_RADIUS) {
        return Vec2::ZERO;
    }
    let pull = (MAGNETIC_RADIUS - distance) / MAGNETIC_RADIUS;
    delta * pull * MAGNETIC_STRENGTH
}

pub fn transition(state: PointerState, event: &PointerEvent, magnetic_pull: bool) -> PointerState {
    match *event {
        PointerEvent::Move {
            bounds: None, ..
        } => state,
        PointerEvent::Move {
            position,
            bounds: Some(rect),
        } => {
            let delta = position - rect.center();
            let distance = delta.length();
            let percent = |d: f32, size: f32| if size > 0.0 { d / size * 100.0 } else { 0.0 };
            PointerState {
                global_position: position,
                offset_from_center: Vec2::new(
                    percent(delta.x, rect.width),
                    percent(delta.y, rect.height),
                ),
                magnetic_offset: magnetic_offset(delta, distance, magnetic_pull),
                distance_from_center: distance,
            }
        }
        PointerEvent::Leave | PointerEvent::Rebind => PointerState::default(),
    }
}

/// Values injected by a caller; each one, when present, wins over tracking.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerOverrides {
    pub global_position: Option<Vec2>,
    pub mouse_offset: Option<Vec2>,
}

/// Effective pointer values for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSnapshot {
    pub global_position: Vec2,
    pub mouse_offset: Vec2,
    pub magnetic_offset: Vec2,
    pub distance_from_center: f32,
    pub hovered: bool,
}

#[derive(Clone, Debug)]
pub struct InteractionController {
    state: PointerState,
    hovered: bool,
    magnetic_pull: bool,
    overrides: PointerOverrides,
    ripples: RippleSet,
    size: GlassSize,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InteractionController {
    pub fn new(magnetic_pull: bool) -> Self {
        Self {
            state: PointerState::default(),
            hovered: false,
            magnetic_pull,
            overrides: PointerOverrides::default(),
            ripples: RippleSet::default(),
            size: GlassSize::default(),
        }
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_magnetic_pull(&mut self, enabled: bool) {
        self.magnetic_pull = enabled;
        if !enabled {
            self.state.magnetic_offset = Vec2::ZERO;
        }
    }

    /// Apply one pointer sample. Returns `false` (and changes nothing) when
    /// the container is unbound.
    pub fn on_pointer_move(&mut self, position: Vec2, bounds: Option<Rect>) -> bool {
        if bounds.is_none() {
            return false;
        }
        self.state = transition(
            self.state,
            &PointerEvent::Move { position, bounds },
            self.magnetic_pull,
        );
        true
    }

    pub fn on_pointer_enter(&mut self) {
        self.hovered = true;
    }

    pub fn on_pointer_leave(&mut self) {
        self.hovered = false;
        self.state = transition(self.state, &PointerEvent::Leave, self.magnetic_pull);
    }

    /// A new container is being tracked; forget the old one's state.
    pub fn bind_container(&mut self) {
        self.state = transition(self.state, &PointerEvent::Rebind, self.magnetic_pull);
    }

    pub fn on_click(&mut self, position: Vec2, now: Instant) -> RippleId {
        let id = self.ripples.spawn(position, now);
        log::debug!("[ripple] spawn {id} at ({:.1}, {:.1})", position.x, position.y);
        id
    }

    pub fn remove_ripple(&mut self, id: RippleId) -> bool {
        self.ripples.remove(id)
    }

    pub fn expire(&mut self, now: Instant) -> usize {
        self.ripples.expire(now)
    }

    pub fn ripples(&self) -> &RippleSet {
        &self.ripples
    }

    pub fn set_overrides(&mut self, overrides: PointerOverrides) {
        self.overrides = overrides;
    }

    pub fn overrides(&self) -> PointerOverrides {
        self.overrides
    }

    pub fn set_size(&mut self, size: GlassSize) {
        self.size = size;
    }

    pub fn size(&self) -> GlassSize {
        self.size
    }

    pub fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot {
            global_position: self
                .overrides
                .global_position
                .unwrap_or(self.state.global_position),
            mouse_offset: self
                .overrides
                .mouse_offset
                .unwrap_or(self.state.offset_from_center),
            magnetic_offset: self.state.magnetic_offset,
            distance_from_center: self.state.distance_from_center,
            hovered: self.hovered,
        }
    }

    /// Drop tracked state and pending ripples, as on unmount.
    pub fn reset(&mut self) {
        self.state = PointerState::default();
        self.hovered = false;
        self.ripples.clear();
    }
}
