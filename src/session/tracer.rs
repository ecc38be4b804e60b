use super::Session;
use crate::engine::{LineEvent, TraceHooks};
use crate::error::DebugResult;
use crate::transport::Transport;

/// Line hook installed into the engine for the lifetime of a session.
///
/// Breaks once per distinct consecutive line of the target file: a line
/// reported again with no other line in between is suppressed, while a return
/// to an earlier line after moving elsewhere breaks again.
pub struct ExecutionTracer<'s, T> {
    session: &'s mut Session<T>,
}

impl<'s, T: Transport> ExecutionTracer<'s, T> {
    pub fn new(session: &'s mut Session<T>) -> Self {
        Self { session }
    }
}

impl<T: Transport> TraceHooks for ExecutionTracer<'_, T> {
    fn on_line(&mut self, event: &LineEvent) -> DebugResult<()> {
        if !event.is_target_file {
            return Ok(());
        }

        let line = event.location.line;
        if self.session.last_line == Some(line) {
            tracing::trace!(line, "suppressed repeated line");
            return Ok(());
        }

        self.session.last_line = Some(line);
        self.session.breaks += 1;
        self.session
            .controller
            .suspend(&mut self.session.transport, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SourceLocation;
    use crate::session::breaker::BreakController;
    use crate::transport::LoopbackTransport;
    use std::path::PathBuf;

    fn session() -> Session<LoopbackTransport<Vec<u8>>> {
        Session::new(
            PathBuf::from("/tmp/main.sh"),
            LoopbackTransport::new(Vec::new()),
            BreakController::new(None),
        )
    }

    fn feed(session: &mut Session<LoopbackTransport<Vec<u8>>>, events: &[(u32, bool)]) {
        let mut tracer = ExecutionTracer::new(session);
        for &(line, is_target_file) in events {
            tracer
                .on_line(&LineEvent::new("/tmp/main.sh", line, is_target_file))
                .unwrap();
        }
    }

    fn reported(session: Session<LoopbackTransport<Vec<u8>>>) -> Vec<u32> {
        let out = String::from_utf8(session.into_transport().into_inner()).unwrap();
        out.lines()
            .map(|l| match crate::protocol::decode(l).unwrap() {
                crate::protocol::Message::Break { linenumber } => linenumber,
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn breaks_on_each_distinct_line() {
        let mut s = session();
        feed(&mut s, &[(1, true), (2, true), (3, true)]);
        assert_eq!(s.breaks(), 3);
        assert_eq!(reported(s), vec![1, 2, 3]);
    }

    #[test]
    fn suppresses_consecutive_repeats() {
        let mut s = session();
        feed(&mut s, &[(4, true); 5]);
        assert_eq!(reported(s), vec![4]);
    }

    #[test]
    fn returning_to_an_earlier_line_breaks_again() {
        let mut s = session();
        feed(&mut s, &[(1, true), (2, true), (1, true), (1, true), (2, true)]);
        assert_eq!(reported(s), vec![1, 2, 1, 2]);
    }

    #[test]
    fn ignores_events_outside_target_file() {
        let mut s = session();
        feed(&mut s, &[(1, true), (10, false), (11, false), (2, true)]);
        assert_eq!(reported(s), vec![1, 2]);
    }

    #[test]
    fn foreign_events_do_not_reset_suppression() {
        let mut s = session();
        feed(&mut s, &[(3, true), (99, false), (3, true)]);
        assert_eq!(reported(s), vec![3]);
    }

    #[test]
    fn call_return_and_exception_are_ignored() {
        let mut s = session();
        {
            let mut tracer = ExecutionTracer::new(&mut s);
            let location = SourceLocation {
                path: PathBuf::from("/tmp/main.sh"),
                line: 1,
            };
            tracer.on_call(&location).unwrap();
            tracer.on_return(&location).unwrap();
            tracer.on_exception(&location, "boom").unwrap();
        }
        assert_eq!(s.breaks(), 0);
        assert!(reported(s).is_empty());
    }
}
