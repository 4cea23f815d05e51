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


//! The debugging session.
//!
//! A [`Debugger`] models exactly one debuggee. It consumes decoded protocol
//! messages, keeps the live [`DebuggerState`] up to date, records every live
//! position onto a [`Recorder`] tape and can walk that tape again in replay
//! mode. Everything observable is reported through [`SessionEvent`]s.
//!
//! # Modes
//!
//! - `Idle`: no debuggee attached. Entered on construction and by [`Debugger::stop`].
//! - `Live`: driving the real debuggee. "Run" commands are simulated by
//!   auto-stepping, i.e. sending one more step after every position update
//!   until a stopping condition is met.
//! - `Replaying`: the working state comes from the tape. Nothing is recorded
//!   and the live state is restored by [`Debugger::stop_replay`]. Debuggee
//!   messages that arrive meanwhile are held back and applied to the live
//!   state when replay stops.

use std::{
    mem,
    sync::Arc,
    time::{Duration, Instant},
};

use ldb_common::{
    protocol::{IncomingMessage, OutgoingMessage, WireFormat},
    types::{CallId, CallStackEntry, Position, VariableTableEntry, DEFAULT_CHANGE_HIGHLIGHT},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    breakpoint::BreakpointManager,
    channel::{ChannelError, DebuggeeChannel},
    events::{EventEmitter, SessionEvent, SessionEventKind, Status, StatusUpdate, SubscriptionId},
    marker::{Marker, MarkerProvider},
    recorder::{Recorder, ReplayError},
    state::DebuggerState,
    variable_table::VariableTablePolicy,
};

/// Tunables of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delimiters of the line protocol.
    pub wire: WireFormat,
    /// How long a changed variable stays highlighted.
    pub highlight_window: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { wire: WireFormat::default(), highlight_window: DEFAULT_CHANGE_HIGHLIGHT }
    }
}

/// Lifecycle mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// No debuggee attached.
    Idle,
    /// Driving the debuggee.
    Live,
    /// Walking the tape.
    Replaying,
}

/// Errors returned by session commands.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session is idle.
    #[error("the debugger is not running")]
    NotRunning,
    /// `start` on a session that is already live.
    #[error("the debugger is already running")]
    AlreadyRunning,
    /// A run command is still auto-stepping.
    #[error("the debugger is stepping on its own")]
    AutoStepping,
    /// A step was sent and the debuggee has not reported back yet.
    #[error("waiting for the debuggee to reach the next position")]
    AwaitingDebuggee,
    /// The command only applies to the live debuggee.
    #[error("command is not available during replay")]
    Replaying,
    /// The command only applies during replay.
    #[error("no replay is in progress")]
    NotReplaying,
    /// There is no method to run to the end of.
    #[error("the call stack is empty")]
    EmptyCallStack,
    /// The tape has nothing to replay for the requested call.
    #[error(transparent)]
    Replay(#[from] ReplayError),
    /// Sending to the debuggee failed; the session was stopped.
    #[error("debuggee channel failed: {0}")]
    Channel(#[from] ChannelError),
}

/// A record-and-replay debugging session for one debuggee.
pub struct Debugger {
    config: SessionConfig,
    channel: Box<dyn DebuggeeChannel>,
    markers: Arc<dyn MarkerProvider>,
    breakpoints: BreakpointManager,
    table_policy: VariableTablePolicy,

    mode: SessionMode,
    state: DebuggerState,
    recorder: Recorder,
    /// Live state put aside while replaying.
    live_snapshot: Option<DebuggerState>,
    /// Debuggee messages that arrived during replay, applied on `stop_replay`.
    deferred: Vec<IncomingMessage>,
    next_call_id: CallId,

    position_marker: Option<Box<dyn Marker>>,
    status: StatusUpdate,
    status_before_replay: Option<StatusUpdate>,
    /// Table and call stack changes withheld while auto-stepping.
    table_dirty: bool,
    call_stack_dirty: bool,
    events: EventEmitter,
}

impl Debugger {
    /// Create an idle session.
    pub fn new(
        channel: Box<dyn DebuggeeChannel>,
        markers: Arc<dyn MarkerProvider>,
        config: SessionConfig,
    ) -> Self {
        Self {
            breakpoints: BreakpointManager::new(Arc::clone(&markers)),
            table_policy: VariableTablePolicy::new(config.highlight_window),
            config,
            channel,
            markers,
            mode: SessionMode::Idle,
            state: DebuggerState::default(),
            recorder: Recorder::new(),
            live_snapshot: None,
            deferred: Vec::new(),
            next_call_id: CallId(0),
            position_marker: None,
            status: StatusUpdate::new(Status::Stopped, false),
            status_before_replay: None,
            table_dirty: false,
            call_stack_dirty: false,
            events: EventEmitter::new(),
        }
    }

    // ----- lifecycle -----

    /// Connect to the debuggee and go live.
    ///
    /// Every existing breakpoint is announced to the debuggee right away.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.mode != SessionMode::Idle {
            return Err(SessionError::AlreadyRunning);
        }
        self.channel.connect()?;
        self.mode = SessionMode::Live;
        info!(breakpoints = self.breakpoints.len(), "Debugger session started");

        self.emit(SessionEvent::Ready);
        self.set_status(Status::Running);
        for position in self.breakpoints.positions() {
            self.send(OutgoingMessage::AddBreakpoint(position))?;
        }
        Ok(())
    }

    /// Tear the session down and return to idle.
    ///
    /// The state, the shadow tables, the tape and any deferred message are
    /// discarded. Breakpoints survive, and call identities keep counting up.
    pub fn stop(&mut self) {
        if self.mode == SessionMode::Idle {
            debug!("Session is already stopped");
            return;
        }

        self.state = DebuggerState::default();
        self.recorder = Recorder::new();
        self.live_snapshot = None;
        self.deferred.clear();
        self.status_before_replay = None;
        self.table_dirty = false;
        self.call_stack_dirty = false;
        self.table_policy.reset_sort_mode();
        self.breakpoints.restore_hidden_breakpoint();
        self.destroy_position_marker();
        self.channel.disconnect();
        self.mode = SessionMode::Idle;
        info!("Debugger session stopped");

        self.emit(SessionEvent::Stopped);
        self.set_status(Status::Stopped);
    }

    /// Report a transport failure. The session is torn down.
    pub fn handle_channel_error(&mut self, error: &ChannelError) {
        warn!(%error, "Debuggee channel failed, stopping session");
        self.stop();
    }

    // ----- inbound messages -----

    /// Route a decoded message to the matching operation.
    ///
    /// Messages arriving while idle are dropped. Messages arriving during
    /// replay belong to the live debuggee: they are kept aside and applied to
    /// the live state once replay stops. Call identities for pushed frames are
    /// assigned here.
    pub fn handle_message(&mut self, message: IncomingMessage) -> Result<(), SessionError> {
        match self.mode {
            SessionMode::Idle => {
                debug!(category = %message.category(), "Dropping message, session is not running");
                return Ok(());
            }
            SessionMode::Replaying => {
                debug!(category = %message.category(), "Deferring live message until replay stops");
                self.deferred.push(message);
                return Ok(());
            }
            SessionMode::Live => {}
        }

        match message {
            IncomingMessage::UpdatePosition(position) => self.update_position(position)?,
            IncomingMessage::UpdateTable(msg) => self.update_variable_table(msg.to_entry()),
            IncomingMessage::PushOntoCallStack(msg) => {
                let call_id = self.next_call_id;
                self.next_call_id = call_id.next();
                self.push_onto_call_stack(msg.into_entry(call_id));
            }
            IncomingMessage::PopFromCallStack => self.pop_from_call_stack(),
            IncomingMessage::CheckValue(msg) => self.check_variable_value(&msg.name, &msg.value),
        }
        Ok(())
    }

    /// The debuggee reached `position`.
    ///
    /// Outside of replay the new state is recorded onto the tape. While
    /// auto-stepping, the session either stops on an enabled breakpoint or
    /// requests the next step.
    pub fn update_position(&mut self, position: Position) -> Result<(), SessionError> {
        self.state.set_position(position);
        if !self.is_replaying() {
            self.recorder.record_state(self.state.clone());
        }

        self.handle_auto_stepping(position)?;
        self.position_reached(position);
        if !self.state.is_auto_step() {
            self.set_status(Status::Waiting);
        }
        Ok(())
    }

    /// Insert or replace a variable of the current scope.
    ///
    /// An entry with the same name is replaced in place, a new one is
    /// prepended. The table is then re-sorted and entries that differ from the
    /// previous table are highlighted. The new value also reaches every
    /// enclosing scope that holds the same address.
    pub fn update_variable_table(&mut self, entry: VariableTableEntry) {
        let address = entry.address().to_string();
        let value = entry.value().to_string();

        let old = self.state.variable_table().to_vec();
        let mut table = old.clone();
        match table.iter().position(|existing| existing.name() == entry.name()) {
            Some(index) => table[index] = entry,
            None => table.insert(0, entry),
        }
        self.table_policy.sort(&mut table);
        self.table_policy.mark_changed_entries(&mut table, &old);
        self.state.set_variable_table(table);

        self.propagate_to_shadow_tables(&address, &value);
        self.table_changed();
    }

    /// The debuggee reports the current value of `name`.
    ///
    /// Unknown names and unchanged values are ignored.
    pub fn check_variable_value(&mut self, name: &str, value: &str) {
        let window = self.table_policy.highlight_window();
        let Some(entry) = self.state.variable_table_mut().iter_mut().find(|e| e.name() == name)
        else {
            return;
        };
        if entry.value() == value {
            return;
        }

        let mut updated = entry.with_value(value);
        updated.mark_changed(window);
        let address = updated.address().to_string();
        *entry = updated;

        self.propagate_to_shadow_tables(&address, value);
        self.table_changed();
    }

    /// A method call started.
    ///
    /// The frame is marked if a step over was requested, which starts
    /// auto-stepping through the call. The current table is shadowed and the
    /// new scope starts empty.
    pub fn push_onto_call_stack(&mut self, mut frame: CallStackEntry) {
        frame.set_marked(self.state.is_step_over_next_call());
        self.state.set_step_over_next_call(false);

        let call_id = frame.call_id();
        let marked = frame.is_marked();
        debug!(%call_id, signature = %frame.signature(), marked, "Entered call");
        self.state.enter_call(frame);
        if marked {
            self.enable_auto_stepping();
        }

        if !self.is_replaying() {
            self.recorder.record_entry_point(call_id);
        }

        self.call_stack_changed();
        self.table_changed();
    }

    /// The innermost call returned. Does nothing on an empty call stack.
    pub fn pop_from_call_stack(&mut self) {
        let Some(frame) = self.state.leave_call() else {
            debug!("Ignoring pop on an empty call stack");
            return;
        };
        debug!(call_id = %frame.call_id(), "Left call");

        self.call_stack_changed();
        self.table_changed();
        if frame.is_marked() {
            self.emit(SessionEvent::EnablePositionMarker);
            self.disable_auto_stepping();
        }
    }

    // ----- stepping -----

    /// Single step. During replay this walks one state along the tape.
    pub fn step(&mut self) -> Result<(), SessionError> {
        self.ensure_can_step()?;
        if self.is_replaying() {
            return self.replay_step();
        }
        self.set_status(Status::Running);
        self.send_step()
    }

    /// Run over the next call instead of stepping into it.
    pub fn step_over(&mut self) -> Result<(), SessionError> {
        self.ensure_can_step_live()?;
        self.state.set_step_over_next_call(true);
        self.run()
    }

    /// Run until the innermost call returns.
    pub fn run_to_end_of_method(&mut self) -> Result<(), SessionError> {
        self.ensure_can_step_live()?;
        let frame = self.state.top_frame_mut().ok_or(SessionError::EmptyCallStack)?;
        frame.set_marked(true);
        self.call_stack_changed();
        self.run()
    }

    /// Run until an enabled breakpoint is reached.
    pub fn run_to_next_breakpoint(&mut self) -> Result<(), SessionError> {
        self.ensure_can_step()?;
        if self.is_replaying() {
            return self.replay_run_to_next_breakpoint();
        }
        self.run()
    }

    // ----- breakpoints -----

    /// Toggle the breakpoint on the line of `position`.
    ///
    /// A breakpoint created while a debuggee is attached is announced to it.
    /// Returns `true` if a breakpoint was created.
    pub fn toggle_breakpoint(&mut self, position: Position) -> Result<bool, SessionError> {
        let created = self.breakpoints.toggle(position);
        if created && self.mode != SessionMode::Idle {
            self.send(OutgoingMessage::AddBreakpoint(position))?;
        }
        Ok(created)
    }

    /// Remove every breakpoint and its marker.
    pub fn remove_all_breakpoints(&mut self) {
        self.breakpoints.remove_all();
    }

    /// Flip the global breakpoint toggle. Returns whether breakpoints are now enabled.
    pub fn enable_disable_all_breakpoints(&mut self) -> bool {
        self.breakpoints.flip()
    }

    // ----- replay -----

    /// Enter replay at the first recorded state of `call_id`.
    ///
    /// Entering replay again while replaying jumps to the other call and keeps
    /// the live state that was put aside the first time. Replay cannot start
    /// while a step request is still unanswered.
    pub fn start_replay(&mut self, call_id: CallId) -> Result<(), SessionError> {
        self.ensure_can_step()?;
        if self.status.is_blocking() {
            return Err(SessionError::AwaitingDebuggee);
        }
        let replayed = self.recorder.start_replay(call_id)?.clone();

        if !self.is_replaying() {
            self.live_snapshot = Some(self.state.clone());
            self.status_before_replay = Some(self.status);
            self.mode = SessionMode::Replaying;
        }
        info!(%call_id, offset = self.recorder.cursor(), "Replay started");

        self.emit(SessionEvent::ReplayStarted);
        self.load_recorded_state(replayed);
        self.set_status(Status::Waiting);
        Ok(())
    }

    /// Leave replay and restore the live state exactly as it was, then apply
    /// the debuggee messages that arrived in the meantime.
    pub fn stop_replay(&mut self) -> Result<(), SessionError> {
        let snapshot = self.live_snapshot.take().ok_or(SessionError::NotReplaying)?;
        self.state = snapshot;
        self.mode = SessionMode::Live;
        info!("Replay stopped");

        self.emit(SessionEvent::ReplayStopped);
        self.call_stack_changed();
        self.table_changed();
        let position = self.state.position();
        self.position_reached(position);

        let status =
            self.status_before_replay.take().unwrap_or(StatusUpdate::new(Status::Waiting, false));
        self.status = status;
        self.emit(SessionEvent::StatusUpdated(status));

        for message in mem::take(&mut self.deferred) {
            self.handle_message(message)?;
        }
        Ok(())
    }

    /// Move one recorded state forward.
    pub fn replay_step(&mut self) -> Result<(), SessionError> {
        if !self.is_replaying() {
            return Err(SessionError::NotReplaying);
        }
        match self.recorder.replay_step() {
            Some(state) => {
                let state = state.clone();
                self.load_recorded_state(state);
                self.set_status(Status::Waiting);
            }
            None => self.end_of_replay_tape(),
        }
        Ok(())
    }

    /// Walk the tape until a state sits on an enabled breakpoint.
    ///
    /// Without such a state the replay stops on the last recorded state.
    pub fn replay_run_to_next_breakpoint(&mut self) -> Result<(), SessionError> {
        if !self.is_replaying() {
            return Err(SessionError::NotReplaying);
        }

        let mut moved = false;
        while let Some(state) = self.recorder.replay_step() {
            moved = true;
            if self.breakpoints.is_breakpoint(state.position()) {
                let state = state.clone();
                self.load_recorded_state(state);
                self.set_status(Status::Waiting);
                return Ok(());
            }
        }

        if moved {
            if let Some(state) = self.recorder.current().cloned() {
                self.load_recorded_state(state);
            }
        }
        self.end_of_replay_tape();
        Ok(())
    }

    // ----- variable table ordering -----

    /// Reverse the sort direction and re-sort the current table.
    pub fn flip_and_sort_variable_table(&mut self) {
        self.table_policy.flip_sort_mode();
        self.table_policy.sort(self.state.variable_table_mut());
        self.table_changed();
    }

    /// Back to ascending order; the table is re-sorted on its next update.
    pub fn reset_sort_mode_variable_table(&mut self) {
        self.table_policy.reset_sort_mode();
    }

    // ----- events -----

    /// Register `callback` for events of `kind`.
    pub fn subscribe<F>(&mut self, kind: SessionEventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        self.events.subscribe(kind, callback)
    }

    /// Drop a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ----- accessors -----

    /// Current lifecycle mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Whether a debuggee is attached, live or replaying.
    pub fn is_running(&self) -> bool {
        self.mode != SessionMode::Idle
    }

    /// Whether the working state comes from the tape.
    pub fn is_replaying(&self) -> bool {
        self.mode == SessionMode::Replaying
    }

    /// Whether a run command is stepping on its own.
    pub fn is_auto_stepping(&self) -> bool {
        self.state.is_auto_step()
    }

    /// The working state: live, or the replayed one while replaying.
    pub fn state(&self) -> &DebuggerState {
        &self.state
    }

    /// Position of the working state.
    pub fn position(&self) -> Position {
        self.state.position()
    }

    /// Call stack of the working state, innermost first.
    pub fn call_stack(&self) -> &[CallStackEntry] {
        self.state.call_stack()
    }

    /// Variables of the innermost scope of the working state.
    pub fn variable_table(&self) -> &[VariableTableEntry] {
        self.state.variable_table()
    }

    /// Variable tables of the enclosing frames, innermost last.
    ///
    /// During replay these are the tables recorded with the replayed state.
    pub fn shadow_tables(&self) -> &[Vec<VariableTableEntry>] {
        self.state.shadow_tables()
    }

    /// Debuggee messages waiting for replay to stop.
    pub fn deferred_messages(&self) -> &[IncomingMessage] {
        &self.deferred
    }

    /// The recording tape.
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// The breakpoint set.
    pub fn breakpoints(&self) -> &BreakpointManager {
        &self.breakpoints
    }

    /// Sort order and highlight window of variable tables.
    pub fn table_policy(&self) -> &VariableTablePolicy {
        &self.table_policy
    }

    /// Last status reported.
    pub fn status(&self) -> StatusUpdate {
        self.status
    }

    /// Identity the next pushed call will get.
    pub fn next_call_id(&self) -> CallId {
        self.next_call_id
    }

    /// Settings the session was created with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ----- internals -----

    fn ensure_can_step(&self) -> Result<(), SessionError> {
        match self.mode {
            SessionMode::Idle => Err(SessionError::NotRunning),
            _ if self.state.is_auto_step() => Err(SessionError::AutoStepping),
            _ => Ok(()),
        }
    }

    fn ensure_can_step_live(&self) -> Result<(), SessionError> {
        self.ensure_can_step()?;
        if self.is_replaying() {
            return Err(SessionError::Replaying);
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), SessionError> {
        self.enable_auto_stepping();
        self.set_status(Status::Running);
        self.send_step()
    }

    fn handle_auto_stepping(&mut self, position: Position) -> Result<(), SessionError> {
        if !self.state.is_auto_step() {
            return Ok(());
        }
        if self.breakpoints.is_breakpoint(position) {
            debug!(%position, "Breakpoint reached");
            self.disable_auto_stepping();
            self.emit(SessionEvent::EnablePositionMarker);
        } else {
            self.send_step()?;
            self.emit(SessionEvent::DisablePositionMarker);
        }
        Ok(())
    }

    /// Marker bookkeeping shared by live and replayed positions.
    fn position_reached(&mut self, position: Position) {
        self.breakpoints.restore_hidden_breakpoint();
        self.breakpoints.hide_breakpoint(position);

        if !self.state.is_auto_step() {
            self.destroy_position_marker();
            self.position_marker = Some(self.markers.add_position_marker(position));
        }

        if self.is_replaying() {
            self.emit(SessionEvent::ReplayState(position));
        } else {
            self.emit(SessionEvent::PositionUpdated(position));
        }
    }

    fn load_recorded_state(&mut self, mut state: DebuggerState) {
        // Replay is walked by hand, whatever the session was doing while recording.
        state.set_auto_step(false);
        let position = state.position();
        self.state = state;

        self.call_stack_changed();
        self.table_changed();
        self.position_reached(position);
    }

    fn end_of_replay_tape(&mut self) {
        debug!(cursor = self.recorder.cursor(), "End of replay tape");
        self.emit(SessionEvent::EndOfReplayTape);
        self.set_status(Status::EndOfTape);
    }

    /// Write `value` into the first entry at `address` of every enclosing scope.
    fn propagate_to_shadow_tables(&mut self, address: &str, value: &str) {
        // Entries without an address never alias.
        if address.is_empty() {
            return;
        }
        let window = self.table_policy.highlight_window();
        let now = Instant::now();
        for table in self.state.shadow_tables_mut() {
            let Some(entry) = table.iter_mut().find(|entry| entry.address() == address) else {
                continue;
            };
            if entry.value() != value {
                let mut updated = entry.with_value(value);
                updated.mark_changed_at(now, window);
                *entry = updated;
            }
        }
    }

    fn enable_auto_stepping(&mut self) {
        if self.state.is_auto_step() {
            return;
        }
        self.state.set_auto_step(true);
        debug!("Auto-stepping enabled");
        self.emit(SessionEvent::AutoSteppingEnabled);
    }

    /// Stop auto-stepping and publish whatever was withheld meanwhile.
    fn disable_auto_stepping(&mut self) {
        if !self.state.is_auto_step() {
            return;
        }
        self.state.set_auto_step(false);
        debug!("Auto-stepping disabled");
        self.emit(SessionEvent::AutoSteppingDisabled);

        if self.call_stack_dirty {
            self.call_stack_changed();
        }
        if self.table_dirty {
            self.table_changed();
        }
    }

    fn table_changed(&mut self) {
        if self.state.is_auto_step() {
            self.table_dirty = true;
            return;
        }
        self.table_dirty = false;
        let table = self.state.variable_table().to_vec();
        self.emit(SessionEvent::TableUpdated(table));
    }

    fn call_stack_changed(&mut self) {
        if self.state.is_auto_step() {
            self.call_stack_dirty = true;
            return;
        }
        self.call_stack_dirty = false;
        let call_stack = self.state.call_stack().to_vec();
        self.emit(SessionEvent::CallStackUpdated(call_stack));
    }

    fn set_status(&mut self, status: Status) {
        let update = StatusUpdate::new(status, self.is_replaying());
        self.status = update;
        self.emit(SessionEvent::StatusUpdated(update));
    }

    fn destroy_position_marker(&mut self) {
        if let Some(mut marker) = self.position_marker.take() {
            marker.destroy();
        }
    }

    fn send_step(&mut self) -> Result<(), SessionError> {
        self.send(OutgoingMessage::Step)?;
        self.emit(SessionEvent::StepSignalSent);
        Ok(())
    }

    fn send(&mut self, message: OutgoingMessage) -> Result<(), SessionError> {
        let encoded = self.config.wire.encode_outgoing(&message);
        if let Err(error) = self.channel.send_message(&encoded) {
            self.handle_channel_error(&error);
            return Err(error.into());
        }
        debug!(message = encoded.trim_end(), "Sent message to debuggee");
        Ok(())
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.emit(&event);
    }
}
