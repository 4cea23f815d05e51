mod common;

use common::Harness;
use ldb_common::types::{CallId, Position};
use ldb_engine::{ReplayError, SessionError, SessionEvent, SessionMode, Status, StatusUpdate};

/// Positions 1 and 2, then call #0 entered, then positions 3 and 4.
fn recorded_session() -> Harness {
    let mut h = Harness::live();
    h.feed("UPDATEPOSITION|1|1\nUPDATEPOSITION|2|1\n");
    h.feed("PUSHONTOCALLSTACK|foo|bar\n");
    h.feed("UPDATETABLE|x|1|0x1\nUPDATEPOSITION|3|1\n");
    h.feed("UPDATETABLE|x|2|0x1\nUPDATEPOSITION|4|1\n");
    h.clear();
    h
}

#[test]
fn test_replay_scenario() {
    let mut h = recorded_session();
    assert_eq!(h.debugger.recorder().len(), 4);
    assert_eq!(h.debugger.recorder().entry_point(CallId(0)), Some(2));

    h.debugger.start_replay(CallId(0)).unwrap();
    assert_eq!(h.debugger.mode(), SessionMode::Replaying);
    assert_eq!(h.debugger.position(), Position::new(3, 1));
    assert_eq!(h.debugger.variable_table()[0].value(), "1");
    assert!(!h.debugger.recorder().end_of_tape());

    h.debugger.replay_step().unwrap();
    assert_eq!(h.debugger.position(), Position::new(4, 1));
    assert_eq!(h.debugger.variable_table()[0].value(), "2");
    assert!(h.debugger.recorder().end_of_tape());

    let events = h.events();
    assert_eq!(events[0], SessionEvent::ReplayStarted);
    assert!(events.contains(&SessionEvent::ReplayState(Position::new(3, 1))));
    assert!(events.contains(&SessionEvent::ReplayState(Position::new(4, 1))));
    assert_eq!(h.debugger.status(), StatusUpdate::new(Status::Waiting, true));
}

#[test]
fn test_replay_step_stops_at_end_of_tape() {
    let mut h = recorded_session();
    h.debugger.start_replay(CallId(0)).unwrap();
    h.debugger.step().unwrap();
    let cursor = h.debugger.recorder().cursor();
    assert_eq!(cursor + 1, h.debugger.recorder().len());
    h.clear();

    h.debugger.step().unwrap();

    assert_eq!(h.debugger.recorder().cursor(), cursor);
    assert_eq!(h.debugger.position(), Position::new(4, 1));
    assert!(h.has_event(&SessionEvent::EndOfReplayTape));
    assert_eq!(h.debugger.status(), StatusUpdate::new(Status::EndOfTape, true));
    // Replay never talks to the debuggee.
    assert!(h.channel.sent().is_empty());
}

#[test]
fn test_stop_replay_restores_live_state() {
    let mut h = recorded_session();
    let live = h.debugger.state().clone();
    let shadow = h.debugger.shadow_tables().to_vec();
    let tape = h.debugger.recorder().len();

    h.debugger.start_replay(CallId(0)).unwrap();
    h.debugger.replay_step().unwrap();
    // Positions reported during replay are not recorded.
    h.at(9);
    assert_eq!(h.debugger.recorder().len(), tape);
    h.clear();

    h.debugger.stop_replay().unwrap();

    assert_eq!(h.debugger.mode(), SessionMode::Live);
    assert_eq!(h.debugger.state(), &live);
    assert_eq!(h.debugger.shadow_tables(), shadow.as_slice());
    assert_eq!(h.events()[0], SessionEvent::ReplayStopped);
    assert!(h.has_event(&SessionEvent::PositionUpdated(Position::new(4, 1))));
    assert_eq!(h.debugger.status(), StatusUpdate::new(Status::Waiting, false));
    assert!(matches!(h.debugger.stop_replay(), Err(SessionError::NotReplaying)));
}

#[test]
fn test_reentering_replay_keeps_original_snapshot() {
    let mut h = recorded_session();
    h.feed("PUSHONTOCALLSTACK|bar\nUPDATEPOSITION|7|1\nUPDATEPOSITION|8|1\n");
    let live = h.debugger.state().clone();

    h.debugger.start_replay(CallId(1)).unwrap();
    assert_eq!(h.debugger.position(), Position::new(7, 1));
    h.debugger.start_replay(CallId(0)).unwrap();
    assert_eq!(h.debugger.position(), Position::new(3, 1));

    h.debugger.stop_replay().unwrap();
    assert_eq!(h.debugger.state(), &live);
}

#[test]
fn test_start_replay_errors() {
    let mut h = recorded_session();

    let err = h.debugger.start_replay(CallId(42)).unwrap_err();
    assert!(matches!(err, SessionError::Replay(ReplayError::UnknownCall(CallId(42)))));
    assert_eq!(h.debugger.mode(), SessionMode::Live);

    // Entered, but no position recorded inside the call yet.
    h.feed("PUSHONTOCALLSTACK|empty\n");
    let err = h.debugger.start_replay(CallId(1)).unwrap_err();
    assert!(matches!(err, SessionError::Replay(ReplayError::NothingRecorded(CallId(1)))));
    assert_eq!(h.debugger.mode(), SessionMode::Live);
}

#[test]
fn test_entry_points_are_ordered() {
    let mut h = Harness::live();
    let mut line = 1;
    for _ in 0..4 {
        h.feed(&format!("UPDATEPOSITION|{line}|1\nPUSHONTOCALLSTACK|f\n"));
        line += 1;
        h.feed(&format!("UPDATEPOSITION|{line}|1\n"));
        line += 1;
    }

    let mut previous = None;
    for id in 0..4 {
        h.debugger.start_replay(CallId(id)).unwrap();
        let cursor = h.debugger.recorder().cursor();
        assert_eq!(Some(cursor), h.debugger.recorder().entry_point(CallId(id)));
        if let Some(previous) = previous {
            assert!(cursor > previous);
        }
        previous = Some(cursor);
    }
}

#[test]
fn test_replay_run_to_next_breakpoint() {
    let mut h = Harness::live();
    h.feed("UPDATEPOSITION|1|1\nPUSHONTOCALLSTACK|f\n");
    for line in [2, 3, 5, 6] {
        h.feed(&format!("UPDATEPOSITION|{line}|1\n"));
    }
    h.debugger.toggle_breakpoint(Position::new(5, 1)).unwrap();
    h.debugger.start_replay(CallId(0)).unwrap();
    assert_eq!(h.debugger.position(), Position::new(2, 1));
    h.clear();

    h.debugger.run_to_next_breakpoint().unwrap();
    assert_eq!(h.debugger.position(), Position::new(5, 1));
    assert!(!h.has_event(&SessionEvent::EndOfReplayTape));
    assert!(h.channel.sent().is_empty());

    // No further breakpoint: stops on the last recorded state.
    h.debugger.replay_run_to_next_breakpoint().unwrap();
    assert_eq!(h.debugger.position(), Position::new(6, 1));
    assert!(h.has_event(&SessionEvent::EndOfReplayTape));
    assert!(h.debugger.recorder().end_of_tape());
}

#[test]
fn test_replay_commands_outside_replay() {
    let mut h = recorded_session();
    assert!(matches!(h.debugger.replay_step(), Err(SessionError::NotReplaying)));
    assert!(matches!(
        h.debugger.replay_run_to_next_breakpoint(),
        Err(SessionError::NotReplaying)
    ));

    h.debugger.start_replay(CallId(0)).unwrap();
    assert!(matches!(h.debugger.step_over(), Err(SessionError::Replaying)));
    assert!(matches!(h.debugger.run_to_end_of_method(), Err(SessionError::Replaying)));
}

#[test]
fn test_replayed_auto_step_state_is_ignored() {
    let mut h = Harness::live();
    h.feed("UPDATEPOSITION|1|1\nPUSHONTOCALLSTACK|f\nUPDATEPOSITION|2|1\n");
    h.debugger.run_to_next_breakpoint().unwrap();
    // Recorded while auto-stepping.
    h.feed("UPDATEPOSITION|3|1\n");
    h.debugger.toggle_breakpoint(Position::new(4, 1)).unwrap();
    h.feed("UPDATEPOSITION|4|1\n");
    assert!(!h.debugger.is_auto_stepping());
    assert!(h.debugger.recorder().states()[2].is_auto_step());

    h.debugger.start_replay(CallId(0)).unwrap();
    h.debugger.replay_step().unwrap();
    assert_eq!(h.debugger.position(), Position::new(3, 1));
    assert!(!h.debugger.is_auto_stepping());
    assert_eq!(h.markers.live_position_markers(), vec![Position::new(3, 1)]);
}

#[test]
fn test_stop_discards_replay() {
    let mut h = recorded_session();
    h.debugger.start_replay(CallId(0)).unwrap();
    h.feed("UPDATEPOSITION|5|1\n");
    assert_eq!(h.debugger.deferred_messages().len(), 1);

    h.debugger.stop();
    assert_eq!(h.debugger.mode(), SessionMode::Idle);
    assert!(h.debugger.recorder().is_empty());
    assert!(h.debugger.deferred_messages().is_empty());
    assert!(matches!(h.debugger.stop_replay(), Err(SessionError::NotReplaying)));
}

#[test]
fn test_replay_refused_while_step_is_pending() {
    let mut h = Harness::live();
    h.feed("UPDATEPOSITION|1|1\nPUSHONTOCALLSTACK|foo\nUPDATEPOSITION|2|1\n");
    h.debugger.step().unwrap();

    assert!(matches!(h.debugger.start_replay(CallId(0)), Err(SessionError::AwaitingDebuggee)));
    assert_eq!(h.debugger.mode(), SessionMode::Live);

    // The answer to the step lands in the live state and on the tape.
    h.feed("UPDATETABLE|x|9|0x9\nUPDATEPOSITION|3|1\n");
    assert_eq!(h.debugger.position(), Position::new(3, 1));
    assert_eq!(h.debugger.recorder().len(), 3);

    h.debugger.start_replay(CallId(0)).unwrap();
    h.debugger.stop_replay().unwrap();
    assert_eq!(h.debugger.position(), Position::new(3, 1));
    assert_eq!(h.debugger.variable_table()[0].value(), "9");
}

#[test]
fn test_live_messages_during_replay_apply_after_stop() {
    let mut h = Harness::live();
    h.feed("UPDATEPOSITION|1|1\nPUSHONTOCALLSTACK|foo\nUPDATEPOSITION|2|1\n");
    h.debugger.start_replay(CallId(0)).unwrap();

    h.feed("UPDATETABLE|x|9|0x9\nUPDATEPOSITION|3|1\n");
    // The replayed state is untouched.
    assert_eq!(h.debugger.position(), Position::new(2, 1));
    assert!(h.debugger.variable_table().is_empty());
    assert_eq!(h.debugger.recorder().len(), 2);
    assert_eq!(h.debugger.deferred_messages().len(), 2);
    h.clear();

    h.debugger.stop_replay().unwrap();

    assert_eq!(h.debugger.mode(), SessionMode::Live);
    assert_eq!(h.debugger.position(), Position::new(3, 1));
    assert_eq!(h.debugger.variable_table()[0].value(), "9");
    assert_eq!(h.debugger.recorder().len(), 3);
    assert!(h.debugger.deferred_messages().is_empty());
    assert!(h.has_event(&SessionEvent::PositionUpdated(Position::new(3, 1))));
    assert_eq!(h.debugger.status(), StatusUpdate::new(Status::Waiting, false));
}

#[test]
fn test_replayed_shadow_tables_match_call_stack() {
    let mut h = Harness::live();
    h.feed("UPDATETABLE|a|1|0xa\nUPDATEPOSITION|1|1\n");
    h.feed("PUSHONTOCALLSTACK|foo\nUPDATETABLE|b|2|0xb\nUPDATEPOSITION|2|1\n");
    h.feed("PUSHONTOCALLSTACK|bar\nUPDATEPOSITION|3|1\n");
    h.feed("POPFROMCALLSTACK\nUPDATEPOSITION|4|1\n");
    h.feed("POPFROMCALLSTACK\nUPDATEPOSITION|5|1\n");
    assert!(h.debugger.shadow_tables().is_empty());

    h.debugger.start_replay(CallId(0)).unwrap();
    let mut depths = Vec::new();
    loop {
        let depth = h.debugger.call_stack().len();
        assert_eq!(h.debugger.shadow_tables().len(), depth, "at {}", h.debugger.position());
        depths.push(depth);
        if h.debugger.recorder().end_of_tape() {
            break;
        }
        h.debugger.replay_step().unwrap();
    }
    assert_eq!(depths, vec![1, 2, 1, 0]);

    h.debugger.start_replay(CallId(1)).unwrap();
    assert_eq!(h.debugger.position(), Position::new(3, 1));
    let shadow = h.debugger.shadow_tables();
    assert_eq!(shadow[0][0].name(), "a");
    assert_eq!(shadow[1][0].name(), "b");

    h.debugger.stop_replay().unwrap();
    assert!(h.debugger.shadow_tables().is_empty());
}
