//! Analytics event bus - a synchronous, fire-and-forget publish/subscribe
//! sink. The session never depends on subscriber presence or return values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// The analytics events a session can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    SessionStarted,
    CardViewed,
    CardSkipped,
    CardFavorited,
    PhaseChanged,
    SessionCompleted,
}

impl EventName {
    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::SessionStarted => "session_started",
            EventName::CardViewed => "card_viewed",
            EventName::CardSkipped => "card_skipped",
            EventName::CardFavorited => "card_favorited",
            EventName::PhaseChanged => "phase_changed",
            EventName::SessionCompleted => "session_completed",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One emitted analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: EventName,
    pub payload: Value,
    pub timestamp_ms: u64,
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Box<dyn Fn(&AnalyticsEvent)>;

/// In-memory event bus. Emission is synchronous and never fails; handler
/// panics are the handler's problem.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<HandlerId, Handler>,
    history: Vec<AnalyticsEvent>,
    next_handler_id: u64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and notify all subscribers.
    pub fn emit(&mut self, name: EventName, payload: Value) {
        let event = AnalyticsEvent {
            name,
            payload,
            timestamp_ms: now_ms(),
        };
        for handler in self.handlers.values() {
            handler(&event);
        }
        self.history.push(event);
    }

    /// Register a handler for all future events.
    pub fn subscribe(&mut self, handler: impl Fn(&AnalyticsEvent) + 'static) -> HandlerId {
        let id = HandlerId(self.next_handler_id);
        self.next_handler_id += 1;
        self.handlers.insert(id, Box::new(handler));
        id
    }

    /// Remove a handler. Returns false when the id is unknown.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        self.handlers.remove(&id).is_some()
    }

    /// All events emitted so far, in order.
    pub fn history(&self) -> &[AnalyticsEvent] {
        &self.history
    }

    /// Drop the recorded history. Subscribers stay registered.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_history_records_in_order() {
        let mut bus = EventBus::new();
        bus.emit(EventName::SessionStarted, json!({ "mood": "FUN" }));
        bus.emit(EventName::CardViewed, json!({ "questionId": "q1" }));

        let history = bus.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].name, EventName::SessionStarted);
        assert_eq!(history[1].name, EventName::CardViewed);
        assert_eq!(history[1].payload["questionId"], "q1");
    }

    #[test]
    fn test_subscribers_are_notified() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        bus.subscribe(move |event| sink.borrow_mut().push(event.name));

        bus.emit(EventName::CardSkipped, json!({}));
        bus.emit(EventName::CardFavorited, json!({}));

        assert_eq!(
            *seen.borrow(),
            vec![EventName::CardSkipped, EventName::CardFavorited]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0u32));

        let sink = Rc::clone(&seen);
        let id = bus.subscribe(move |_| *sink.borrow_mut() += 1);

        bus.emit(EventName::CardViewed, json!({}));
        assert!(bus.unsubscribe(id));
        bus.emit(EventName::CardViewed, json!({}));

        assert_eq!(*seen.borrow(), 1);
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_clear_keeps_subscribers() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0u32));

        let sink = Rc::clone(&seen);
        bus.subscribe(move |_| *sink.borrow_mut() += 1);

        bus.emit(EventName::CardViewed, json!({}));
        bus.clear();
        assert!(bus.history().is_empty());

        bus.emit(EventName::CardViewed, json!({}));
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn test_event_name_wire_format() {
        assert_eq!(EventName::SessionStarted.as_str(), "session_started");
        assert_eq!(
            serde_json::to_string(&EventName::PhaseChanged).unwrap(),
            "\"phase_changed\""
        );
    }
}
