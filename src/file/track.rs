use std::collections::BTreeMap;

use crate::file::Event;

#[doc = r#"
An ordered association from absolute tick to [`Event`], owned by a
[`MidiFile`](crate::file::MidiFile).

At most one event is kept per tick: inserting at an occupied tick replaces
the earlier event. This lossy policy matches the wire decoder's behavior;
callers that need simultaneous events must place them on separate tracks.
Iteration ascends by tick, which is the order the writer emits.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    events: BTreeMap<u64, Event>,
}

impl Track {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event at an absolute tick, returning the event it
    /// displaced if the tick was already occupied.
    pub fn insert(&mut self, tick: u64, event: Event) -> Option<Event> {
        self.events.insert(tick, event)
    }

    /// The event at an exact tick, if any.
    pub fn get(&self, tick: u64) -> Option<&Event> {
        self.events.get(&tick)
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The greatest occupied tick, if any event is stored.
    pub fn last_tick(&self) -> Option<u64> {
        self.events.keys().next_back().copied()
    }

    /// Iterate `(tick, event)` pairs in ascending tick order.
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &Event)> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = (&'a u64, &'a Event);
    type IntoIter = std::collections::btree_map::Iter<'a, u64, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
