// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;

use impel_geom::ColliderPair;

/// Receives contact transitions during [`crate::World::step`].
///
/// Callbacks run inline, on the stepping thread, before `step` returns. Each
/// transition is reported once: an enter is followed by exactly one exit
/// before the same pair can enter again. No ordering between different pairs
/// is promised.
///
/// Every method defaults to doing nothing.
pub trait ContactListener {
    /// A trigger pair started overlapping.
    fn on_trigger_enter(&mut self, pair: ColliderPair) {
        let _ = pair;
    }
    /// A trigger pair stopped overlapping.
    fn on_trigger_exit(&mut self, pair: ColliderPair) {
        let _ = pair;
    }
    /// A solid pair started touching.
    fn on_collision_enter(&mut self, pair: ColliderPair) {
        let _ = pair;
    }
    /// A solid pair stopped touching.
    fn on_collision_exit(&mut self, pair: ColliderPair) {
        let _ = pair;
    }
}

/// Ignores everything.
impl ContactListener for () {}

impl<L: ContactListener + ?Sized> ContactListener for &mut L {
    fn on_trigger_enter(&mut self, pair: ColliderPair) {
        (**self).on_trigger_enter(pair);
    }
    fn on_trigger_exit(&mut self, pair: ColliderPair) {
        (**self).on_trigger_exit(pair);
    }
    fn on_collision_enter(&mut self, pair: ColliderPair) {
        (**self).on_collision_enter(pair);
    }
    fn on_collision_exit(&mut self, pair: ColliderPair) {
        (**self).on_collision_exit(pair);
    }
}

/// One recorded transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ContactEvent {
    /// See [`ContactListener::on_trigger_enter`].
    TriggerEnter(ColliderPair),
    /// See [`ContactListener::on_trigger_exit`].
    TriggerExit(ColliderPair),
    /// See [`ContactListener::on_collision_enter`].
    CollisionEnter(ColliderPair),
    /// See [`ContactListener::on_collision_exit`].
    CollisionExit(ColliderPair),
}

impl ContactEvent {
    /// Pair the event is about.
    #[must_use]
    pub const fn pair(&self) -> ColliderPair {
        match *self {
            Self::TriggerEnter(p) | Self::TriggerExit(p) | Self::CollisionEnter(p) | Self::CollisionExit(p) => p,
        }
    }

    /// `true` for either enter variant.
    #[must_use]
    pub const fn is_enter(&self) -> bool {
        matches!(self, Self::TriggerEnter(_) | Self::CollisionEnter(_))
    }

    /// `true` for trigger events.
    #[must_use]
    pub const fn is_trigger(&self) -> bool {
        matches!(self, Self::TriggerEnter(_) | Self::TriggerExit(_))
    }
}

impl fmt::Display for ContactEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TriggerEnter(_) => "trigger-enter",
            Self::TriggerExit(_) => "trigger-exit",
            Self::CollisionEnter(_) => "collision-enter",
            Self::CollisionExit(_) => "collision-exit",
        };
        write!(f, "{label} {}", self.pair())
    }
}

/// Listener that records every event in call order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<ContactEvent>,
}

impl EventLog {
    /// Empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Events so far.
    #[must_use]
    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<ContactEvent> {
        core::mem::take(&mut self.events)
    }

    /// Events about `pair`, in order.
    pub fn for_pair(&self, pair: ColliderPair) -> impl Iterator<Item = &ContactEvent> + '_ {
        self.events.iter().filter(move |e| e.pair() == pair)
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl ContactListener for EventLog {
    fn on_trigger_enter(&mut self, pair: ColliderPair) {
        self.events.push(ContactEvent::TriggerEnter(pair));
    }
    fn on_trigger_exit(&mut self, pair: ColliderPair) {
        self.events.push(ContactEvent::TriggerExit(pair));
    }
    fn on_collision_enter(&mut self, pair: ColliderPair) {
        self.events.push(ContactEvent::CollisionEnter(pair));
    }
    fn on_collision_exit(&mut self, pair: ColliderPair) {
        self.events.push(ContactEvent::CollisionExit(pair));
    }
}
