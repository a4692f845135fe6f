#![doc = r#"
Encoding back to the MIDI wire format.

Serialization happens entirely in memory: the whole file is laid out in a
`Vec<u8>` (track lengths are backpatched in the buffer once each body is
finished) and hits the filesystem in a single write. A failed write
discards the output file, so no path is ever left holding a correct-looking
header with a truncated body.

A written file carries a single tempo: the writer emits one leading
set-tempo meta event per track, taken from the tempo map's tick-0 entry
(or the 2 beats/sec default when there is none), and ignores any later
entries.
"#]

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use thiserror::Error;

use crate::file::{
    DEFAULT_TEMPO_BPS, Event, EventKind, META_END_OF_TRACK, META_TEMPO, MetaEvent, MidiFile,
    TempoMap, Track,
};

/// A failure to put encoded bytes on disk.
#[derive(Debug, Error)]
#[error("writing `{}`, i/o, {source}", .path.display())]
pub struct WriterError {
    path: PathBuf,
    source: io::Error,
}

impl WriterError {
    /// The output path the write was aimed at.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize a whole file.
pub(crate) fn encode_file(file: &MidiFile) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&u16::from(file.format()).to_be_bytes());
    buf.extend_from_slice(&(file.tracks().len() as u16).to_be_bytes());
    buf.extend_from_slice(&file.division().to_be_bytes());
    for track in file.tracks() {
        encode_track(&mut buf, track, file.tempo_map());
    }
    buf
}

/// Encode one `MTrk` chunk, backpatching its length once the body size is
/// known.
fn encode_track(buf: &mut Vec<u8>, track: &Track, tempo_map: &TempoMap) {
    buf.extend_from_slice(b"MTrk");
    let length_idx = buf.len();
    buf.extend_from_slice(&0u32.to_be_bytes());
    let body_start = buf.len();

    let mut encoder = TrackEncoder {
        buf: &mut *buf,
        running_status: None,
    };

    // One leading tempo event at delta 0. Only a tick-0 map entry is
    // honored; a multi-entry map still writes as a single-tempo file.
    let bps = tempo_map.at(0).unwrap_or(DEFAULT_TEMPO_BPS);
    let micros = (1_000_000.0 / bps) as u32;
    debug!("writing tempo {bps} beats/sec as {micros} µs per quarter note");
    encoder.put_var_len(0);
    encoder.put_event(&Event::Meta(MetaEvent::new(
        META_TEMPO,
        vec![(micros >> 16) as u8, (micros >> 8) as u8, micros as u8],
    )));

    let mut tick = 0u64;
    for (&next_tick, event) in track {
        encoder.put_var_len(next_tick - tick);
        encoder.put_event(event);
        tick = next_tick;
    }

    encoder.put_var_len(1);
    encoder.put_event(&Event::Meta(MetaEvent::new(META_END_OF_TRACK, Vec::new())));

    let length = (buf.len() - body_start) as u32;
    buf[length_idx..body_start].copy_from_slice(&length.to_be_bytes());
}

/// Encode and write in one pass; on failure the output file is removed.
pub(crate) fn save(file: &MidiFile, path: &Path) -> Result<(), WriterError> {
    let bytes = encode_file(file);
    debug!("writing {} byte(s) to {}", bytes.len(), path.display());
    if let Err(source) = fs::write(path, &bytes) {
        let _ = fs::remove_file(path);
        return Err(WriterError {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// Encode a variable-length quantity: most-significant 7-bit group first,
/// continuation bit on every byte but the last, zero as a single `0x00`.
pub(crate) fn put_var_len(buf: &mut Vec<u8>, value: u64) {
    if value == 0 {
        buf.push(0);
        return;
    }
    let mut groups = [0u8; 10];
    let mut count = 0;
    let mut v = value;
    while v > 0 {
        groups[count] = (v & 0x7F) as u8;
        v >>= 7;
        count += 1;
    }
    for i in (0..count).rev() {
        let mut byte = groups[i];
        if i != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
    }
}

/// Per-track write session carrying the running-status state.
struct TrackEncoder<'a> {
    buf: &'a mut Vec<u8>,
    running_status: Option<u8>,
}

impl TrackEncoder<'_> {
    fn put_var_len(&mut self, value: u64) {
        put_var_len(self.buf, value);
    }

    fn put_event(&mut self, event: &Event) {
        match event {
            Event::Channel(ev) => {
                self.put_status(ev.kind(), ev.channel());
                self.buf.push(ev.data_a() & 0x7F);
                if ev.kind().data_len() == 2 {
                    self.buf.push(ev.data_b() & 0x7F);
                }
            }
            Event::Meta(meta) => {
                // Meta events are never subject to running status.
                self.running_status = None;
                self.buf.push(u8::from(EventKind::Meta));
                self.buf.push(meta.meta_type());
                put_var_len(self.buf, meta.data().len() as u64);
                self.buf.extend_from_slice(meta.data());
            }
        }
    }

    /// Write the status byte unless it matches the running status.
    fn put_status(&mut self, kind: EventKind, channel: u8) {
        let status = u8::from(kind) | (channel & 0x0F);
        if status & 0xF0 != 0xF0 && self.running_status != Some(status) {
            self.running_status = Some(status);
            self.buf.push(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::Format;
    use crate::reader::Reader;

    #[test]
    fn var_len_encodes_reference_values() {
        let cases: [(u64, &[u8]); 6] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7F]),
            (128, &[0x81, 0x00]),
            (16384, &[0x81, 0x80, 0x00]),
            (0x0FFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
        ];
        for (value, expected) in cases {
            let mut buf = Vec::new();
            put_var_len(&mut buf, value);
            assert_eq!(buf, expected, "value {value}");
        }
    }

    #[test]
    fn var_len_round_trips() {
        for value in [0u64, 1, 127, 128, 16383, 16384, 2_097_151, 268_435_455] {
            let mut buf = Vec::new();
            put_var_len(&mut buf, value);
            let mut reader = Reader::from_byte_slice(&buf);
            assert_eq!(u64::from(reader.read_var_len().unwrap()), value);
            assert_eq!(reader.buffer_position(), buf.len());
        }
    }

    #[test]
    fn running_status_suppresses_repeat_status_bytes() {
        let mut buf = Vec::new();
        let mut encoder = TrackEncoder {
            buf: &mut buf,
            running_status: None,
        };
        encoder.put_event(&Event::note_on(0, 60, 100));
        encoder.put_event(&Event::note_on(0, 62, 100));
        encoder.put_event(&Event::note_on(1, 64, 100));
        assert_eq!(
            buf,
            vec![0x90, 60, 100, 62, 100, 0x91, 64, 100]
        );
    }

    #[test]
    fn meta_event_resets_running_status() {
        let mut buf = Vec::new();
        let mut encoder = TrackEncoder {
            buf: &mut buf,
            running_status: None,
        };
        encoder.put_event(&Event::note_on(0, 60, 100));
        encoder.put_event(&Event::Meta(MetaEvent::new(0x01, vec![b'x'])));
        encoder.put_event(&Event::note_on(0, 62, 100));
        assert_eq!(
            buf,
            vec![0x90, 60, 100, 0xFF, 0x01, 0x01, b'x', 0x90, 62, 100]
        );
    }

    #[test]
    fn tempo_of_two_beats_per_second_encodes_as_500000_micros() {
        let mut file = MidiFile::new(Format::SingleMultiChannel, 480);
        file.tempo_map_mut().insert(0, 2.0);
        file.push_track(Track::new());
        let bytes = encode_file(&file);
        // Track body starts after MThd (14 bytes) + MTrk magic/length (8).
        assert_eq!(&bytes[22..29], &[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    }

    #[test]
    fn track_length_is_backpatched() {
        let mut file = MidiFile::new(Format::SingleMultiChannel, 480);
        file.push_track(Track::new());
        let bytes = encode_file(&file);
        let declared = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]);
        assert_eq!(declared as usize, bytes.len() - 22);
        // Tempo meta (7) + end-of-track (4).
        assert_eq!(declared, 11);
    }
}
