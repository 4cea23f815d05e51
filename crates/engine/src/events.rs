// LDB - Levels Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Session events and their subscribers.
//!
//! Delivery is synchronous and happens on the thread that mutates the
//! session. Subscribers of one event kind are called in subscription order.

use std::{collections::HashMap, fmt};

use ldb_common::types::{CallStackEntry, Position, VariableTableEntry};
use serde::{Deserialize, Serialize};

/// Coarse execution status, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// No debuggee attached.
    Stopped,
    /// The debuggee is executing, or the session is stepping on its own.
    Running,
    /// Paused, waiting for the next command.
    Waiting,
    /// Replay reached the last recorded state.
    EndOfTape,
}

/// A status together with whether it was reached during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// The status itself.
    pub status: Status,
    /// Whether the session is replaying.
    pub replay: bool,
}

impl StatusUpdate {
    /// Status update, flagged as replay or live.
    pub const fn new(status: Status, replay: bool) -> Self {
        Self { status, replay }
    }

    /// Stepping commands are refused while the status is blocking.
    pub const fn is_blocking(&self) -> bool {
        matches!(self.status, Status::Running)
    }
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self.status {
            Status::Stopped => "Stopped",
            Status::Running => "Running",
            Status::Waiting => "Waiting",
            Status::EndOfTape => "End of tape",
        };
        if self.replay {
            write!(f, "Replay: {text}")
        } else {
            f.write_str(text)
        }
    }
}

/// Something observable happened in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session went live.
    Ready,
    /// The session returned to idle.
    Stopped,
    /// The live position changed.
    PositionUpdated(Position),
    /// A run command started stepping on its own.
    AutoSteppingEnabled,
    /// Auto-stepping ended.
    AutoSteppingDisabled,
    /// Snapshot of the current variable table.
    TableUpdated(Vec<VariableTableEntry>),
    /// Snapshot of the current call stack, innermost first.
    CallStackUpdated(Vec<CallStackEntry>),
    /// Replay started, or jumped to another call.
    ReplayStarted,
    /// Replay ended and the live state is back.
    ReplayStopped,
    /// Replay moved to a recorded state at this position.
    ReplayState(Position),
    /// Replay tried to move past the last recorded state.
    EndOfReplayTape,
    /// The position marker should be shown again.
    EnablePositionMarker,
    /// The position marker should be hidden while stepping on.
    DisablePositionMarker,
    /// The user-facing status changed.
    StatusUpdated(StatusUpdate),
    /// A step request went out to the debuggee.
    StepSignalSent,
}

/// Discriminant of a [`SessionEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    /// [`SessionEvent::Ready`]
    Ready,
    /// [`SessionEvent::Stopped`]
    Stopped,
    /// [`SessionEvent::PositionUpdated`]
    PositionUpdated,
    /// [`SessionEvent::AutoSteppingEnabled`]
    AutoSteppingEnabled,
    /// [`SessionEvent::AutoSteppingDisabled`]
    AutoSteppingDisabled,
    /// [`SessionEvent::TableUpdated`]
    TableUpdated,
    /// [`SessionEvent::CallStackUpdated`]
    CallStackUpdated,
    /// [`SessionEvent::ReplayStarted`]
    ReplayStarted,
    /// [`SessionEvent::ReplayStopped`]
    ReplayStopped,
    /// [`SessionEvent::ReplayState`]
    ReplayState,
    /// [`SessionEvent::EndOfReplayTape`]
    EndOfReplayTape,
    /// [`SessionEvent::EnablePositionMarker`]
    EnablePositionMarker,
    /// [`SessionEvent::DisablePositionMarker`]
    DisablePositionMarker,
    /// [`SessionEvent::StatusUpdated`]
    StatusUpdated,
    /// [`SessionEvent::StepSignalSent`]
    StepSignalSent,
}

impl SessionEventKind {
    /// Every event kind.
    pub const ALL: [Self; 15] = [
        Self::Ready,
        Self::Stopped,
        Self::PositionUpdated,
        Self::AutoSteppingEnabled,
        Self::AutoSteppingDisabled,
        Self::TableUpdated,
        Self::CallStackUpdated,
        Self::ReplayStarted,
        Self::ReplayStopped,
        Self::ReplayState,
        Self::EndOfReplayTape,
        Self::EnablePositionMarker,
        Self::DisablePositionMarker,
        Self::StatusUpdated,
        Self::StepSignalSent,
    ];
}

impl SessionEvent {
    /// Subscription key of this event.
    pub fn kind(&self) -> SessionEventKind {
        match self {
            Self::Ready => SessionEventKind::Ready,
            Self::Stopped => SessionEventKind::Stopped,
            Self::PositionUpdated(_) => SessionEventKind::PositionUpdated,
            Self::AutoSteppingEnabled => SessionEventKind::AutoSteppingEnabled,
            Self::AutoSteppingDisabled => SessionEventKind::AutoSteppingDisabled,
            Self::TableUpdated(_) => SessionEventKind::TableUpdated,
            Self::CallStackUpdated(_) => SessionEventKind::CallStackUpdated,
            Self::ReplayStarted => SessionEventKind::ReplayStarted,
            Self::ReplayStopped => SessionEventKind::ReplayStopped,
            Self::ReplayState(_) => SessionEventKind::ReplayState,
            Self::EndOfReplayTape => SessionEventKind::EndOfReplayTape,
            Self::EnablePositionMarker => SessionEventKind::EnablePositionMarker,
            Self::DisablePositionMarker => SessionEventKind::DisablePositionMarker,
            Self::StatusUpdated(_) => SessionEventKind::StatusUpdated,
            Self::StepSignalSent => SessionEventKind::StepSignalSent,
        }
    }
}

/// Handle returned by [`EventEmitter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked for every event of the kind it was subscribed to.
pub type EventCallback = Box<dyn FnMut(&SessionEvent) + Send>;

/// Per-kind registry of event callbacks.
#[derive(Default)]
pub struct EventEmitter {
    next_id: u64,
    handlers: HashMap<SessionEventKind, Vec<(SubscriptionId, EventCallback)>>,
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self.handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("EventEmitter").field("handlers", &counts).finish()
    }
}

impl EventEmitter {
    /// Emitter without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for events of `kind`.
    pub fn subscribe<F>(&mut self, kind: SessionEventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.entry(kind).or_default().push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for handlers in self.handlers.values_mut() {
            if let Some(index) = handlers.iter().position(|(handler_id, _)| *handler_id == id) {
                handlers.remove(index);
                return true;
            }
        }
        false
    }

    /// Deliver `event` to the subscribers of its kind.
    pub fn emit(&mut self, event: &SessionEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for (_, callback) in handlers.iter_mut() {
                callback(event);
            }
        }
    }

    /// Number of subscribers for `kind`.
    pub fn subscriber_count(&self, kind: SessionEventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_delivery_in_subscription_order() {
        let mut emitter = EventEmitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            emitter.subscribe(SessionEventKind::Ready, move |_| seen.lock().push(tag));
        }
        let other = Arc::clone(&seen);
        emitter.subscribe(SessionEventKind::Stopped, move |_| other.lock().push("stopped"));

        emitter.emit(&SessionEvent::Ready);
        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut emitter = EventEmitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = emitter.subscribe(SessionEventKind::PositionUpdated, move |event| {
            if let SessionEvent::PositionUpdated(position) = event {
                sink.lock().push(*position);
            }
        });
        assert_eq!(emitter.subscriber_count(SessionEventKind::PositionUpdated), 1);

        emitter.emit(&SessionEvent::PositionUpdated(Position::new(2, 1)));
        assert!(emitter.unsubscribe(id));
        assert!(!emitter.unsubscribe(id));
        emitter.emit(&SessionEvent::PositionUpdated(Position::new(3, 1)));

        assert_eq!(*seen.lock(), vec![Position::new(2, 1)]);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(StatusUpdate::new(Status::Waiting, false).to_string(), "Waiting");
        assert_eq!(StatusUpdate::new(Status::EndOfTape, true).to_string(), "Replay: End of tape");
        assert!(StatusUpdate::new(Status::Running, true).is_blocking());
        assert!(!StatusUpdate::new(Status::Stopped, false).is_blocking());
    }

    #[test]
    fn test_every_kind_is_listed() {
        for kind in SessionEventKind::ALL {
            assert_eq!(SessionEventKind::ALL.iter().filter(|k| **k == kind).count(), 1);
        }
    }
}
