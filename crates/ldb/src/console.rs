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


//! Line-oriented command console
//!
//! Each line read from stdin is parsed into a [`ConsoleCommand`] and executed
//! against the session. Session events are rendered back as plain text.

use std::fmt::Write as _;

use eyre::{bail, Result, WrapErr};
use ldb_common::types::{CallId, CallStackEntry, Position, VariableTableEntry};
use ldb_engine::{Debugger, SessionEvent};

/// Text printed by `help`.
pub const HELP: &str = "\
Commands:
  start              start the session (done automatically when a debuggee connects)
  stop               stop the session
  step | s           step to the next position (or the next recorded state in replay)
  over | n           step over the next method call
  finish | f         run to the end of the current method
  run | c            run to the next breakpoint
  break L[:C] | b    toggle a breakpoint at line L, column C (default 1)
  clear              remove all breakpoints
  toggle-all         enable or disable all breakpoints
  replay ID          replay the method call with the given id (see `status`)
  replay-stop        leave replay and return to the live session
  sort               flip the sort order of the variable table
  status             show position, call stack and variables
  help               show this text
  quit | q           leave LDB";

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `start`
    Start,
    /// `stop`
    Stop,
    /// `step`, `s`
    Step,
    /// `over`, `n`
    StepOver,
    /// `finish`, `f`
    RunToEndOfMethod,
    /// `run`, `c`
    RunToNextBreakpoint,
    /// `break L[:C]`, `b`
    ToggleBreakpoint(Position),
    /// `clear`
    RemoveAllBreakpoints,
    /// `toggle-all`
    EnableDisableAllBreakpoints,
    /// `replay ID`
    StartReplay(CallId),
    /// `replay-stop`
    StopReplay,
    /// `sort`
    FlipSort,
    /// `status`
    Status,
    /// `help`, `?`
    Help,
    /// `quit`, `q`, `exit`
    Quit,
}

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();
    if words.next().is_some() {
        bail!("Too many arguments for `{word}`");
    }

    let command = match (word.to_ascii_lowercase().as_str(), argument) {
        ("start", None) => ConsoleCommand::Start,
        ("stop", None) => ConsoleCommand::Stop,
        ("step" | "s", None) => ConsoleCommand::Step,
        ("over" | "n", None) => ConsoleCommand::StepOver,
        ("finish" | "f", None) => ConsoleCommand::RunToEndOfMethod,
        ("run" | "c", None) => ConsoleCommand::RunToNextBreakpoint,
        ("break" | "b", Some(position)) => ConsoleCommand::ToggleBreakpoint(parse_position(position)?),
        ("break" | "b", None) => bail!("Usage: break LINE[:COLUMN]"),
        ("clear", None) => ConsoleCommand::RemoveAllBreakpoints,
        ("toggle-all", None) => ConsoleCommand::EnableDisableAllBreakpoints,
        ("replay", Some(id)) => ConsoleCommand::StartReplay(
            id.parse().wrap_err_with(|| format!("Invalid call id `{id}`"))?,
        ),
        ("replay", None) => bail!("Usage: replay CALL_ID"),
        ("replay-stop", None) => ConsoleCommand::StopReplay,
        ("sort", None) => ConsoleCommand::FlipSort,
        ("status", None) => ConsoleCommand::Status,
        ("help" | "?", None) => ConsoleCommand::Help,
        ("quit" | "q" | "exit", None) => ConsoleCommand::Quit,
        (_, Some(_)) if is_known(word) => bail!("`{word}` takes no argument"),
        _ => bail!("Unknown command `{word}`, type `help` for a list"),
    };
    Ok(Some(command))
}

fn is_known(word: &str) -> bool {
    parse_command(word).is_ok()
}

/// Parse `LINE` or `LINE:COLUMN`, both 1-based.
pub fn parse_position(text: &str) -> Result<Position> {
    let (line, column) = match text.split_once(':') {
        Some((line, column)) => (line, Some(column)),
        None => (text, None),
    };
    let line: usize = line.parse().wrap_err_with(|| format!("Invalid line `{line}`"))?;
    let column: usize = match column {
        Some(column) => column.parse().wrap_err_with(|| format!("Invalid column `{column}`"))?,
        None => 1,
    };
    if line == 0 || column == 0 {
        bail!("Lines and columns start at 1");
    }
    Ok(Position::new(line, column))
}

/// Run a command against the session, returning text to show the user.
///
/// `Quit` is handled by the caller.
pub fn execute(command: ConsoleCommand, debugger: &mut Debugger) -> Result<Option<String>> {
    let output = match command {
        ConsoleCommand::Start => {
            debugger.start()?;
            None
        }
        ConsoleCommand::Stop => {
            debugger.stop();
            None
        }
        ConsoleCommand::Step => {
            debugger.step()?;
            None
        }
        ConsoleCommand::StepOver => {
            debugger.step_over()?;
            None
        }
        ConsoleCommand::RunToEndOfMethod => {
            debugger.run_to_end_of_method()?;
            None
        }
        ConsoleCommand::RunToNextBreakpoint => {
            debugger.run_to_next_breakpoint()?;
            None
        }
        ConsoleCommand::ToggleBreakpoint(position) => {
            let created = debugger.toggle_breakpoint(position)?;
            Some(format!("Breakpoint {} at {position}", if created { "set" } else { "removed" }))
        }
        ConsoleCommand::RemoveAllBreakpoints => {
            debugger.remove_all_breakpoints();
            Some("All breakpoints removed".to_string())
        }
        ConsoleCommand::EnableDisableAllBreakpoints => {
            let enabled = debugger.enable_disable_all_breakpoints();
            Some(format!("Breakpoints {}", if enabled { "enabled" } else { "disabled" }))
        }
        ConsoleCommand::StartReplay(call_id) => {
            debugger.start_replay(call_id)?;
            None
        }
        ConsoleCommand::StopReplay => {
            debugger.stop_replay()?;
            None
        }
        ConsoleCommand::FlipSort => {
            debugger.flip_and_sort_variable_table();
            None
        }
        ConsoleCommand::Status => Some(render_status(debugger)),
        ConsoleCommand::Help => Some(HELP.to_string()),
        ConsoleCommand::Quit => None,
    };
    Ok(output)
}

/// Text for a session event, if it is worth showing.
pub fn render_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::Ready => Some("Debugger ready".to_string()),
        SessionEvent::Stopped => Some("Debugger stopped".to_string()),
        SessionEvent::PositionUpdated(position) => Some(format!("At {position}")),
        SessionEvent::ReplayState(position) => Some(format!("Replay at {position}")),
        SessionEvent::TableUpdated(entries) => Some(render_table(entries)),
        SessionEvent::CallStackUpdated(frames) => Some(render_call_stack(frames)),
        SessionEvent::ReplayStarted => Some("Replay started".to_string()),
        SessionEvent::ReplayStopped => Some("Replay stopped".to_string()),
        SessionEvent::EndOfReplayTape => Some("End of replay tape".to_string()),
        SessionEvent::StatusUpdated(status) => Some(format!("[{status}]")),
        _ => None,
    }
}

/// Variables, changed ones prefixed with `*`.
pub fn render_table(entries: &[VariableTableEntry]) -> String {
    if entries.is_empty() {
        return "Variables: (none)".to_string();
    }
    let mut text = String::from("Variables:");
    for entry in entries {
        let flag = if entry.is_changed() { '*' } else { ' ' };
        let _ = write!(text, "\n {flag} {} = {}  @{}", entry.name(), entry.value(), entry.address());
    }
    text
}

/// Call stack, innermost first, with the ids `replay` accepts.
pub fn render_call_stack(frames: &[CallStackEntry]) -> String {
    if frames.is_empty() {
        return "Call stack: (empty)".to_string();
    }
    let mut text = String::from("Call stack:");
    for frame in frames {
        let _ = write!(text, "\n  {} {}", frame.call_id(), frame.signature());
    }
    text
}

fn render_status(debugger: &Debugger) -> String {
    let mut text = format!(
        "[{}] {:?} at {}, {} breakpoint(s){}",
        debugger.status(),
        debugger.mode(),
        debugger.position(),
        debugger.breakpoints().len(),
        if debugger.breakpoints().are_breakpoints_enabled() { "" } else { " (disabled)" },
    );
    text.push('\n');
    text.push_str(&render_call_stack(debugger.call_stack()));
    text.push('\n');
    text.push_str(&render_table(debugger.variable_table()));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldb_engine::{
        test_utils::{RecordingChannel, RecordingMarkers},
        SessionConfig,
    };
    use std::sync::Arc;

    fn debugger() -> (Debugger, RecordingChannel) {
        let channel = RecordingChannel::default();
        let debugger = Debugger::new(
            Box::new(channel.clone()),
            Arc::new(RecordingMarkers::default()),
            SessionConfig::default(),
        );
        (debugger, channel)
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("step").unwrap(), Some(ConsoleCommand::Step));
        assert_eq!(parse_command("  n ").unwrap(), Some(ConsoleCommand::StepOver));
        assert_eq!(parse_command("FINISH").unwrap(), Some(ConsoleCommand::RunToEndOfMethod));
        assert_eq!(parse_command("c").unwrap(), Some(ConsoleCommand::RunToNextBreakpoint));
        assert_eq!(parse_command("quit").unwrap(), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            parse_command("break 12").unwrap(),
            Some(ConsoleCommand::ToggleBreakpoint(Position::new(12, 1)))
        );
        assert_eq!(
            parse_command("b 12:4").unwrap(),
            Some(ConsoleCommand::ToggleBreakpoint(Position::new(12, 4)))
        );
        assert_eq!(parse_command("replay #3").unwrap(), Some(ConsoleCommand::StartReplay(CallId(3))));
        assert_eq!(parse_command("replay 3").unwrap(), Some(ConsoleCommand::StartReplay(CallId(3))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("jump").is_err());
        assert!(parse_command("break").is_err());
        assert!(parse_command("break 0").is_err());
        assert!(parse_command("break x:1").is_err());
        assert!(parse_command("replay abc").is_err());
        assert!(parse_command("step 2").is_err());
        assert!(parse_command("break 1 2").is_err());
    }

    #[test]
    fn test_execute_breakpoints() {
        let (mut debugger, channel) = debugger();

        let output = execute(ConsoleCommand::ToggleBreakpoint(Position::new(4, 1)), &mut debugger)
            .unwrap()
            .unwrap();
        assert_eq!(output, "Breakpoint set at 4:1");
        // Not announced while idle.
        assert!(channel.sent().is_empty());

        let output = execute(ConsoleCommand::EnableDisableAllBreakpoints, &mut debugger)
            .unwrap()
            .unwrap();
        assert_eq!(output, "Breakpoints disabled");

        let output = execute(ConsoleCommand::ToggleBreakpoint(Position::new(4, 1)), &mut debugger)
            .unwrap()
            .unwrap();
        assert_eq!(output, "Breakpoint removed at 4:1");
    }

    #[test]
    fn test_execute_reports_session_errors() {
        let (mut debugger, _channel) = debugger();
        assert!(execute(ConsoleCommand::Step, &mut debugger).is_err());
        assert!(execute(ConsoleCommand::StopReplay, &mut debugger).is_err());

        execute(ConsoleCommand::Start, &mut debugger).unwrap();
        assert!(execute(ConsoleCommand::Start, &mut debugger).is_err());
        assert!(execute(ConsoleCommand::RunToEndOfMethod, &mut debugger).is_err());
    }

    #[test]
    fn test_status_and_render() {
        let (mut debugger, _channel) = debugger();
        let status = execute(ConsoleCommand::Status, &mut debugger).unwrap().unwrap();
        assert!(status.starts_with("[Stopped] Idle at 1:1"));
        assert!(status.contains("Call stack: (empty)"));

        let frame = CallStackEntry::new(CallId(2), "foo", vec!["a".into(), "b".into()], None, None);
        assert_eq!(render_call_stack(&[frame]), "Call stack:\n  #2 foo(a, b)");

        let entry = VariableTableEntry::new("x", "5", "0x1");
        assert_eq!(render_table(&[entry]), "Variables:\n   x = 5  @0x1");

        assert_eq!(render_event(&SessionEvent::StepSignalSent), None);
        assert_eq!(
            render_event(&SessionEvent::PositionUpdated(Position::new(3, 2))).as_deref(),
            Some("At 3:2")
        );
    }
}
