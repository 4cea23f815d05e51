#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use ldb_common::types::Position;
use ldb_engine::{
    test_utils::{RecordingChannel, RecordingMarkers},
    Debugger, MessageDispatcher, SessionConfig, SessionEvent, SessionEventKind,
};
use parking_lot::Mutex;

/// A live session wired to recording collaborators.
pub struct Harness {
    pub debugger: Debugger,
    pub channel: RecordingChannel,
    pub markers: RecordingMarkers,
    pub dispatcher: MessageDispatcher,
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl Harness {
    /// Idle session. Highlights last long enough to never expire during a test.
    pub fn idle() -> Self {
        ldb_common::logging::ensure_test_logging(None);

        let channel = RecordingChannel::default();
        let markers = RecordingMarkers::default();
        let config = SessionConfig { highlight_window: Duration::from_secs(600), ..Default::default() };
        let mut debugger =
            Debugger::new(Box::new(channel.clone()), Arc::new(markers.clone()), config);

        let events = Arc::new(Mutex::new(Vec::new()));
        for kind in SessionEventKind::ALL {
            let events = Arc::clone(&events);
            debugger.subscribe(kind, move |event| events.lock().push(event.clone()));
        }

        Self { debugger, channel, markers, dispatcher: MessageDispatcher::default(), events }
    }

    /// Started session with empty recordings.
    pub fn live() -> Self {
        let mut harness = Self::idle();
        harness.debugger.start().unwrap();
        harness.clear();
        harness
    }

    /// Feed raw protocol text through the dispatcher.
    pub fn feed(&mut self, text: &str) {
        self.dispatcher.dispatch(text, &mut self.debugger);
    }

    pub fn at(&mut self, line: usize) {
        self.debugger.update_position(Position::new(line, 1)).unwrap();
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    pub fn has_event(&self, event: &SessionEvent) -> bool {
        self.events.lock().contains(event)
    }

    /// Number of step signals sent to the debuggee.
    pub fn steps_sent(&self) -> usize {
        self.channel.sent().iter().filter(|m| m.as_str() == "STEP\n").count()
    }

    /// Forget recorded events and outbound messages.
    pub fn clear(&self) {
        self.events.lock().clear();
        self.channel.clear();
    }
}
