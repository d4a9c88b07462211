//! Input plumbing between an input backend and the character.
//!
//! The backend owns an [`InputBus`] and publishes into it; each character holds a
//! [`Subscription`] and drains it once per tick. Dropping the subscription is the
//! only way to unsubscribe, so a destroyed character can never receive events.

use std::sync::{Arc, Weak};

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use crate::math::Vec2;

/// Raw 2D move axis as read from the input device. Components are in [-1, 1].
///
/// Not normalized: diagonal keyboard input may have magnitude above 1, analog
/// sticks may sit below 1. Clamping the resulting direction is the basis' job.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent(Vec2);

impl MoveIntent {
    pub fn new(x: f32, y: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self(Vec2::new(sanitize(x), sanitize(y)))
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Strafe component (+X = right).
    #[inline]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    /// Forward component (+Y = forward).
    #[inline]
    pub fn y(&self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        self.0
    }
}

impl From<Vec2> for MoveIntent {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Discrete action notifications, one per physical trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Jump,
    Attack,
    SprintStarted,
    SprintCanceled,
    CrouchToggled,
}

/// Source of movement input for a character.
pub trait InputSource {
    /// Current move axis (continuous poll).
    fn move_axis(&self) -> MoveIntent;

    /// Register for discrete events. Events published afterwards are queued on the
    /// returned handle until drained; dropping the handle unregisters it.
    fn subscribe(&self) -> Subscription;
}

struct Subscriber {
    id: u64,
    sender: Sender<InputEvent>,
}

#[derive(Default)]
struct BusState {
    move_axis: MoveIntent,
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Shared input hub. Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct InputBus {
    state: Arc<Mutex<BusState>>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_move_axis(&self, axis: MoveIntent) {
        self.state.lock().move_axis = axis;
    }

    /// Deliver `event` to every live subscription.
    pub fn publish(&self, event: InputEvent) {
        let state = self.state.lock();
        for subscriber in &state.subscribers {
            // The receiver lives inside the subscription, which unregisters on drop,
            // so a send can only fail mid-drop. Nothing to deliver in that case.
            let _ = subscriber.sender.send(event);
        }
        log::trace!(
            "published {event:?} to {} subscriber(s)",
            state.subscribers.len()
        );
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }
}

impl InputSource for InputBus {
    fn move_axis(&self) -> MoveIntent {
        self.state.lock().move_axis
    }

    fn subscribe(&self) -> Subscription {
        let (sender, receiver) = unbounded();
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.push(Subscriber { id, sender });

        Subscription {
            id,
            bus: Arc::downgrade(&self.state),
            receiver,
        }
    }
}

/// Scoped registration on an [`InputBus`].
pub struct Subscription {
    id: u64,
    bus: Weak<Mutex<BusState>>,
    receiver: Receiver<InputEvent>,
}

impl Subscription {
    /// Take every event queued since the last drain, in publish order.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The bus may already be gone; then there is nothing to unregister from.
        if let Some(bus) = self.bus.upgrade() {
            bus.lock().subscribers.retain(|s| s.id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pending", &self.receiver.len())
            .finish()
    }
}
