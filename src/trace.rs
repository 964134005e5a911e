/*!
# Trace Sink

An optional observer the matchers push progress events to. Visualization
front-ends implement [`TraceSink`] to animate a run; headless callers pass
[`NoTrace`].

Every event is optional from the algorithm's perspective: a no-op sink must
never change behavior, and all events within one run are totally ordered and
commit at step boundaries. [`TraceSink::commit`] marks a displayable frame
boundary and must be idempotent.
*/

use crate::{edge::EdgeIdx, node::Node};

/// Receiver for progress events emitted by a matcher run.
///
/// All methods default to no-ops, so implementors only override what they
/// display. The sink is owned exclusively by a single run.
pub trait TraceSink {
    /// One unit of visible progress, tagged with the phase it belongs to.
    fn step(&mut self, _name: &str) {}

    /// A free-form progress message.
    fn message(&mut self, _text: &str) {}

    /// A named payload, e.g. intermediate scores.
    fn data(&mut self, _name: &str, _payload: &str) {}

    /// The node the algorithm currently works on.
    fn current_node(&mut self, _v: Node) {}

    /// The edge the algorithm currently works on.
    fn current_edge(&mut self, _e: EdgeIdx) {}

    /// Highlights a node with a display color.
    fn pick_node(&mut self, _v: Node, _color: &str) {}

    /// Highlights an edge with a display color.
    fn pick_edge(&mut self, _e: EdgeIdx, _color: &str) {}

    /// Drops all highlighting applied so far.
    fn remove_highlighting(&mut self) {}

    /// Declares a color legend for the following frames.
    fn add_legend(&mut self, _entries: &[(&str, &str)]) {}

    /// Marks a displayable frame boundary. Must be idempotent.
    fn commit(&mut self) {}
}

/// The default sink: ignores every event.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {}

/// An owned copy of a trace event, as recorded by [`RecordingTrace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Step(String),
    Message(String),
    Data(String, String),
    CurrentNode(Node),
    CurrentEdge(EdgeIdx),
    PickNode(Node, String),
    PickEdge(EdgeIdx, String),
    RemoveHighlighting,
    AddLegend(Vec<(String, String)>),
    Commit,
}

/// A sink that records all events in order; used by tests and by callers
/// that replay a run after the fact.
#[derive(Debug, Clone, Default)]
pub struct RecordingTrace {
    pub events: Vec<TraceEvent>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed frames so far.
    pub fn frames(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Commit))
            .count()
    }
}

impl TraceSink for RecordingTrace {
    fn step(&mut self, name: &str) {
        self.events.push(TraceEvent::Step(name.to_string()));
    }

    fn message(&mut self, text: &str) {
        self.events.push(TraceEvent::Message(text.to_string()));
    }

    fn data(&mut self, name: &str, payload: &str) {
        self.events
            .push(TraceEvent::Data(name.to_string(), payload.to_string()));
    }

    fn current_node(&mut self, v: Node) {
        self.events.push(TraceEvent::CurrentNode(v));
    }

    fn current_edge(&mut self, e: EdgeIdx) {
        self.events.push(TraceEvent::CurrentEdge(e));
    }

    fn pick_node(&mut self, v: Node, color: &str) {
        self.events.push(TraceEvent::PickNode(v, color.to_string()));
    }

    fn pick_edge(&mut self, e: EdgeIdx, color: &str) {
        self.events.push(TraceEvent::PickEdge(e, color.to_string()));
    }

    fn remove_highlighting(&mut self) {
        self.events.push(TraceEvent::RemoveHighlighting);
    }

    fn add_legend(&mut self, entries: &[(&str, &str)]) {
        self.events.push(TraceEvent::AddLegend(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
    }

    fn commit(&mut self) {
        self.events.push(TraceEvent::Commit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let mut sink = RecordingTrace::new();
        sink.current_node(3);
        sink.pick_edge(1, "red");
        sink.commit();
        sink.commit();

        assert_eq!(
            sink.events,
            vec![
                TraceEvent::CurrentNode(3),
                TraceEvent::PickEdge(1, "red".to_string()),
                TraceEvent::Commit,
                TraceEvent::Commit,
            ]
        );
        assert_eq!(sink.frames(), 2);
    }
}
