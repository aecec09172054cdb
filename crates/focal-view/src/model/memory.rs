//! In-memory calendars backed by reference-counted event handles.

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

use chrono::TimeDelta;
use focal_core::types::Rgba;
use focal_rfc::ical::core::EventTime;

use super::{Calendar, Component};

/// Plain event data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
    pub summary: String,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub duration: Option<TimeDelta>,
    pub rrule: Option<String>,
    pub tzid: Option<String>,
}

impl Event {
    #[must_use]
    pub fn new(summary: impl Into<String>, start: EventTime) -> Self {
        Self {
            summary: summary.into(),
            start: Some(start),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_end(mut self, end: EventTime) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: TimeDelta) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_rrule(mut self, rrule: impl Into<String>) -> Self {
        self.rrule = Some(rrule.into());
        self
    }

    #[must_use]
    pub fn with_tzid(mut self, tzid: impl Into<String>) -> Self {
        self.tzid = Some(tzid.into());
        self
    }
}

impl Component for Event {
    fn dtstart(&self) -> Option<&EventTime> {
        self.start.as_ref()
    }

    fn dtend(&self) -> Option<&EventTime> {
        self.end.as_ref()
    }

    fn duration(&self) -> Option<TimeDelta> {
        self.duration
    }

    fn rrule(&self) -> Option<&str> {
        self.rrule.as_deref()
    }

    fn summary(&self) -> &str {
        &self.summary
    }

    fn tzid(&self) -> Option<&str> {
        self.tzid.as_deref()
    }
}

/// Shared handle to an [`Event`]. Two handles are equal only if they point
/// at the same allocation, so identical copies of an event stay distinct.
#[derive(Debug, Clone)]
pub struct EventRef(Rc<Event>);

impl EventRef {
    #[must_use]
    pub fn new(event: Event) -> Self {
        Self(Rc::new(event))
    }
}

impl PartialEq for EventRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EventRef {}

impl Deref for EventRef {
    type Target = Event;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Component for EventRef {
    fn dtstart(&self) -> Option<&EventTime> {
        self.0.dtstart()
    }

    fn dtend(&self) -> Option<&EventTime> {
        self.0.dtend()
    }

    fn duration(&self) -> Option<TimeDelta> {
        self.0.duration
    }

    fn rrule(&self) -> Option<&str> {
        self.0.rrule()
    }

    fn summary(&self) -> &str {
        &self.0.summary
    }

    fn tzid(&self) -> Option<&str> {
        self.0.tzid()
    }
}

#[derive(Debug)]
struct CalendarData {
    name: String,
    color: Rgba,
    events: RefCell<Vec<EventRef>>,
}

/// A calendar holding its events in memory. Cloning yields another handle
/// to the same calendar.
#[derive(Debug, Clone)]
pub struct MemoryCalendar(Rc<CalendarData>);

impl MemoryCalendar {
    #[must_use]
    pub fn new(name: impl Into<String>, color: Rgba) -> Self {
        Self(Rc::new(CalendarData {
            name: name.into(),
            color,
            events: RefCell::new(Vec::new()),
        }))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Stores `event` and returns the handle the view will see.
    pub fn insert(&self, event: Event) -> EventRef {
        let handle = EventRef::new(event);
        self.0.events.borrow_mut().push(handle.clone());
        handle
    }

    /// Returns true if the handle belonged to this calendar.
    pub fn remove(&self, event: &EventRef) -> bool {
        let mut events = self.0.events.borrow_mut();
        let before = events.len();
        events.retain(|candidate| candidate != event);
        events.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.events.borrow().is_empty()
    }
}

impl PartialEq for MemoryCalendar {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MemoryCalendar {}

impl Calendar for MemoryCalendar {
    type Event = EventRef;

    fn color(&self) -> Rgba {
        self.0.color
    }

    fn for_each_event(&self, visitor: &mut dyn FnMut(&Self::Event)) {
        // Snapshot so the visitor may insert or remove events
        let events = self.0.events.borrow().clone();
        for event in &events {
            visitor(event);
        }
    }
}
