#![doc = r#"
The in-memory representation of a MIDI file.
"#]

mod event;
pub use event::*;

mod format;
pub use format::*;

mod tempo;
pub use tempo::*;

mod track;
pub use track::*;

use std::{fs, path::Path};

use log::debug;

use crate::{
    reader::{self, ReadResult, Reader, ReaderError},
    writer::{self, WriterError},
};

#[doc = r#"
A decoded MIDI file: format, division, tracks, and one tempo map shared by
every track.

A `MidiFile` is built empty, filled in by one reader pass (or one
quantizer pass), and then either dropped or serialized; nothing about it is
shared between operations.

```
use tactus::prelude::*;

let mut file = MidiFile::new(Format::SingleMultiChannel, 480);
file.tempo_map_mut().insert(0, 2.0);

let mut track = Track::new();
track.insert(0, Event::note_on(0, 60, 100));
track.insert(480, Event::note_off(0, 60, 0));
file.push_track(track);

let bytes = file.to_bytes();
let reread = MidiFile::parse(&bytes).unwrap();
assert_eq!(reread.tracks()[0].len(), 2);
```
"#]
#[derive(Debug, Clone, PartialEq)]
pub struct MidiFile {
    format: Format,
    division: u16,
    tracks: Vec<Track>,
    tempo_map: TempoMap,
}

impl MidiFile {
    /// Create an empty file with a format and a division (ticks per
    /// quarter note; must be positive, without the SMPTE top bit).
    pub fn new(format: Format, division: u16) -> Self {
        Self {
            format,
            division,
            tracks: Vec::new(),
            tempo_map: TempoMap::new(),
        }
    }

    /// Parse a byte slice into a file.
    ///
    /// Fails fast on the first structural violation; there is no partial
    /// recovery.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let header = reader::read_header(&mut reader)?;
        let mut file = Self::new(header.format, header.division);
        let total = header.format.tracks_to_read(header.track_count);
        for n in 0..total {
            debug!(
                "reading track {} of {total} at offset {:#x}",
                n + 1,
                reader.buffer_position()
            );
            let track = reader::read_track(&mut reader, &mut file.tempo_map)?;
            file.tracks.push(track);
        }
        Ok(file)
    }

    /// Read and parse a file from disk.
    pub fn open(path: impl AsRef<Path>) -> ReadResult<Self> {
        let bytes = fs::read(path).map_err(|e| ReaderError::new(0, e.into()))?;
        Self::parse(&bytes)
    }

    /// The file format.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Ticks per quarter note.
    pub const fn division(&self) -> u16 {
        self.division
    }

    /// The tracks, in file order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Append a track.
    pub fn push_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// The tempo map shared by every track.
    pub fn tempo_map(&self) -> &TempoMap {
        &self.tempo_map
    }

    /// Mutable access to the tempo map.
    pub fn tempo_map_mut(&mut self) -> &mut TempoMap {
        &mut self.tempo_map
    }

    /// Serialize to bytes.
    ///
    /// Only the tempo map's tick-0 entry is written; see the
    /// [writer](crate::writer) docs for the single-tempo limitation.
    pub fn to_bytes(&self) -> Vec<u8> {
        writer::encode_file(self)
    }

    /// Serialize and write to disk in a single write; a failed write
    /// removes the output file rather than leaving a truncated body.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WriterError> {
        writer::save(self, path.as_ref())
    }
}
