/// Governing tempo when a [`TempoMap`] has no applicable entry: 2.0
/// beats per second (120 BPM).
///
/// Both the reader (implicit tempo before any tempo meta event) and the
/// writer (a file whose map has no tick-0 entry) rely on this exact value.
/// The quantizer carries its own, separately named fallback
/// ([`FALLBACK_SOURCE_BPM`](crate::quantize::FALLBACK_SOURCE_BPM)); the two
/// are numerically equal but are distinct constants on purpose.
pub const DEFAULT_TEMPO_BPS: f64 = 2.0;

/// One tick-anchored tempo value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEntry {
    tick: u64,
    beats_per_second: f64,
}

impl TempoEntry {
    /// The absolute tick this tempo takes effect at.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The tempo in beats per second.
    pub const fn beats_per_second(&self) -> f64 {
        self.beats_per_second
    }
}

#[doc = r#"
An ordered association from absolute tick to governing tempo, owned by a
[`MidiFile`](crate::file::MidiFile).

Entries are kept strictly increasing by tick, at most one per tick;
re-inserting at an existing tick replaces that entry. Tempi are stored in
beats per second (the set-tempo meta payload is microseconds per quarter
note; the reader converts on decode).
"#]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempoMap {
    entries: Vec<TempoEntry>,
}

impl TempoMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no tempo has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in ascending tick order.
    pub fn iter(&self) -> impl Iterator<Item = &TempoEntry> {
        self.entries.iter()
    }

    /// Insert a tempo (beats per second) at an absolute tick, keeping the
    /// entries sorted. An entry already at that tick is replaced.
    pub fn insert(&mut self, tick: u64, beats_per_second: f64) {
        let entry = TempoEntry {
            tick,
            beats_per_second,
        };
        let idx = self.entries.partition_point(|e| e.tick < tick);
        if idx < self.entries.len() && self.entries[idx].tick == tick {
            self.entries[idx] = entry;
        } else {
            self.entries.insert(idx, entry);
        }
    }

    /// The tempo recorded exactly at `tick`, if any.
    pub fn at(&self, tick: u64) -> Option<f64> {
        let idx = self.entries.partition_point(|e| e.tick < tick);
        match self.entries.get(idx) {
            Some(e) if e.tick == tick => Some(e.beats_per_second),
            _ => None,
        }
    }

    /// The tempo governing `tick`, in beats per second.
    ///
    /// An empty map yields [`DEFAULT_TEMPO_BPS`]. A tick past the last
    /// entry yields the last entry's tempo. A tick strictly before the
    /// first entry yields [`DEFAULT_TEMPO_BPS`]; any other tick between
    /// entries yields the *next* entry's tempo, not the preceding one's.
    /// That asymmetry is inherited behavior that downstream output depends
    /// on; do not straighten it out here.
    pub fn tempo_at(&self, tick: u64) -> f64 {
        if self.entries.is_empty() {
            return DEFAULT_TEMPO_BPS;
        }
        let idx = self.entries.partition_point(|e| e.tick < tick);
        if idx == self.entries.len() {
            return self.entries[idx - 1].beats_per_second;
        }
        if self.entries[idx].tick == tick {
            return self.entries[idx].beats_per_second;
        }
        if idx == 0 {
            return DEFAULT_TEMPO_BPS;
        }
        self.entries[idx].beats_per_second
    }

    /// Project a wall-clock time onto a tick position.
    ///
    /// Walks the entries in tick order, accumulating the elapsed time of
    /// each tempo segment, and stops at the first entry whose cumulative
    /// time would pass `target_time`; the remaining partial segment is
    /// interpolated linearly at the tempo active there. `tempo_scale` is a
    /// relative-tempo multiplier (1.0 for none). The scan is linear because
    /// segment times only exist as a running sum.
    pub fn project_time_to_tick(&self, target_time: f64, tempo_scale: f64, division: u16) -> u64 {
        let tempo_div = division as f64 * tempo_scale;
        let mut time = 0.0;
        let mut tick = 0u64;
        let mut tempo = DEFAULT_TEMPO_BPS;
        for entry in &self.entries {
            let delta = entry.tick - tick;
            let segment_end = time + delta as f64 / (tempo_div * tempo);
            if segment_end > target_time {
                break;
            }
            tick = entry.tick;
            tempo = entry.beats_per_second;
            time = segment_end;
        }
        tick + ((target_time - time) * tempo_div * tempo) as u64
    }
}
