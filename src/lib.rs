#![doc = r#"
A Standard MIDI File codec with tempo maps and grid quantization.

The crate has three layers:

- a binary codec for the SMF container (formats 0 and 1): [`MidiFile::parse`]
  and [`MidiFile::to_bytes`](file::MidiFile::to_bytes), covering the header
  chunk, track chunks, variable-length delta times, running status, and the
  tempo / end-of-track meta events;
- a [`TempoMap`](file::TempoMap) associating absolute tick positions with a
  governing tempo, with point lookup and a time-to-tick projection;
- a [quantizer](quantize) that re-times a decoded note stream onto a steady
  subdivision grid at a chosen tempo, exposed both as an in-memory pass
  ([`align_ticks`](quantize::align_ticks)) and as the file-to-file
  [`quantize`](quantize::quantize) operation.

SMPTE time-code division and format 2 are out of scope and are rejected
with typed errors rather than misread. Everything is synchronous and
single-owner: a decode, a quantize, or an encode runs to completion or
fails with an error carrying the byte offset it failed at.

```
use tactus::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, // header chunk
    0, 0, // format 0
    0, 1, // one track
    0x01, 0xE0, // 480 ticks per quarter note
    b'M', b'T', b'r', b'k', 0, 0, 0, 4, // track chunk
    0x00, 0xFF, 0x2F, 0x00, // end of track
];
let file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.division(), 480);
assert_eq!(file.tracks().len(), 1);
```

[`MidiFile::parse`]: file::MidiFile::parse
"#]

pub mod file;
pub mod quantize;
pub mod reader;
pub mod writer;

mod error;
pub use error::*;

#[doc = r#"
Common re-exports.
"#]
pub mod prelude {
    pub use crate::{
        FormatError, Unsupported,
        file::{
            ChannelEvent, DEFAULT_TEMPO_BPS, Event, EventKind, Format, META_END_OF_TRACK,
            META_TEMPO, MetaEvent, MidiFile, TempoEntry, TempoMap, Track,
        },
        quantize::{FALLBACK_SOURCE_BPM, GridUnits, QuantizeError, align_ticks, quantize},
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        writer::WriterError,
    };
}
