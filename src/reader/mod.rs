#![doc = r#"
Decoding of the MIDI wire format.

[`Reader`] is an explicit byte cursor: it owns a position into a borrowed
byte slice and every read is bounds-checked against it, so a failed read
can always say where it was attempted and how many bytes were missing.
Track decoding threads its own state (running status, sticky status, tick
accumulator) through a per-track decoder value; nothing about a parse is
ambient, and any number of decodes can run without interference.
"#]

mod error;
pub use error::*;

use log::trace;

use crate::{
    FormatError, Unsupported,
    file::{
        ChannelEvent, Event, EventKind, Format, META_END_OF_TRACK, META_TEMPO, TempoMap, Track,
    },
};

/// A byte cursor over an in-memory MIDI file.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Borrow a byte slice for reading.
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// The current byte offset into the buffer.
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Read exactly `n` bytes, advancing the cursor.
    pub fn read_exact(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        let available = self.bytes.len() - self.position;
        if available < n {
            return Err(ReaderError::new(
                self.position,
                ReaderErrorKind::Truncated {
                    missing: n - available,
                },
            ));
        }
        let slice = &self.bytes[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        Ok(self.read_exact(1)?[0])
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Advance the cursor over `n` bytes without interpreting them.
    pub fn skip(&mut self, n: usize) -> ReadResult<()> {
        self.read_exact(n).map(|_| ())
    }

    /// Read a variable-length quantity: big-endian 7-bit groups, the high
    /// bit flagging continuation, at most 4 encoded bytes.
    pub fn read_var_len(&mut self) -> ReadResult<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            let byte = self.read_u8()?;
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(self.format_err(FormatError::VarLenTooLong))
    }

    pub(crate) fn format_err(&self, error: FormatError) -> ReaderError {
        ReaderError::new(self.position, error.into())
    }

    pub(crate) fn unsupported(&self, error: Unsupported) -> ReaderError {
        ReaderError::new(self.position, error.into())
    }
}

/// The fixed fields of a decoded `MThd` chunk.
#[derive(Debug)]
pub(crate) struct RawHeader {
    pub format: Format,
    pub track_count: u16,
    pub division: u16,
}

/// Decode the header chunk. Any declared bytes beyond the fixed 6 are
/// skipped verbatim.
pub(crate) fn read_header(reader: &mut Reader) -> ReadResult<RawHeader> {
    let magic = reader.read_exact(4)?;
    if magic != b"MThd" {
        return Err(reader.format_err(FormatError::NoHeaderMagic));
    }
    let length = reader.read_u32()?;
    if length < 6 {
        return Err(reader.format_err(FormatError::HeaderTooShort(length)));
    }
    let raw_format = reader.read_u16()?;
    let format = Format::try_from(raw_format)
        .map_err(|_| reader.unsupported(Unsupported::Format(raw_format)))?;
    let track_count = reader.read_u16()?;
    let division = reader.read_u16()?;
    if division & 0x8000 != 0 {
        return Err(reader.unsupported(Unsupported::SmpteDivision(division)));
    }
    if division == 0 {
        return Err(reader.format_err(FormatError::ZeroDivision));
    }
    reader.skip(length as usize - 6)?;
    Ok(RawHeader {
        format,
        track_count,
        division,
    })
}

/// Decode one `MTrk` chunk into a [`Track`], recording tempo meta events
/// into `tempo_map` at their absolute ticks.
pub(crate) fn read_track(reader: &mut Reader, tempo_map: &mut TempoMap) -> ReadResult<Track> {
    let magic = reader.read_exact(4)?;
    if magic != b"MTrk" {
        return Err(reader.format_err(FormatError::NoTrackMagic));
    }
    let length = reader.read_u32()? as usize;
    let end = reader.buffer_position() + length;

    let mut decoder = TrackDecoder::default();
    let mut track = Track::new();
    while reader.buffer_position() < end {
        match decoder.read_event(reader, tempo_map)? {
            TrackStep::Event(event) => {
                track.insert(decoder.tick, event);
            }
            TrackStep::Skipped => {}
            TrackStep::EndOfTrack => break,
        }
    }

    // Tolerate trailing padding between the end-of-track event and the
    // declared chunk extent.
    let position = reader.buffer_position();
    if position < end {
        trace!("skipping {} padding byte(s) after end of track", end - position);
        reader.skip(end - position)?;
    }
    Ok(track)
}

/// One step of track decoding.
#[derive(Debug)]
enum TrackStep {
    /// A channel event to store at the accumulated tick.
    Event(Event),
    /// Something was consumed but nothing is stored (sysex, non-terminal
    /// meta, transport bytes, or a status-less data byte).
    Skipped,
    /// The end-of-track meta event.
    EndOfTrack,
}

/// Per-track decoder state.
#[derive(Debug, Default)]
struct TrackDecoder {
    /// Active running status; cleared by sysex and meta events.
    status: Option<u8>,
    /// Running status that survives sysex and meta events, so a channel
    /// message after one can still omit its status byte.
    sticky: Option<u8>,
    /// Absolute-tick accumulator.
    tick: u64,
}

impl TrackDecoder {
    fn read_event(&mut self, reader: &mut Reader, tempo_map: &mut TempoMap) -> ReadResult<TrackStep> {
        let delta = reader.read_var_len()?;
        self.tick += u64::from(delta);

        // Transport and undefined system bytes (0xF1–0xFE except 0xF7) sit
        // between the delta time and the status byte; step over them.
        let mut byte = reader.read_u8()?;
        while (0xF1..=0xFE).contains(&byte) && byte != 0xF7 {
            if let Ok(kind) = EventKind::try_from(byte) {
                trace!("skipping transport byte {kind:?}");
            }
            byte = reader.read_u8()?;
        }

        if byte == 0xF0 || byte == 0xF7 {
            // SysEx: length-prefixed payload, not retained.
            self.status = None;
            let length = reader.read_var_len()?;
            reader.skip(length as usize)?;
            return Ok(TrackStep::Skipped);
        }

        if byte == 0xFF {
            self.status = None;
            let meta_type = reader.read_u8()?;
            let length = reader.read_var_len()? as usize;
            let payload = reader.read_exact(length)?;
            if meta_type == META_TEMPO && length >= 3 {
                // 3-byte big-endian microseconds per quarter note.
                let micros =
                    u32::from(payload[0]) << 16 | u32::from(payload[1]) << 8 | u32::from(payload[2]);
                tempo_map.insert(self.tick, 1_000_000.0 / f64::from(micros));
            }
            if meta_type == META_END_OF_TRACK {
                return Ok(TrackStep::EndOfTrack);
            }
            return Ok(TrackStep::Skipped);
        }

        self.read_channel_event(reader, byte)
    }

    fn read_channel_event(&mut self, reader: &mut Reader, first: u8) -> ReadResult<TrackStep> {
        let mut byte = first;
        loop {
            let status;
            let data_a;
            if byte & 0x80 != 0 {
                status = byte;
                self.status = Some(byte);
                self.sticky = Some(byte);
                data_a = reader.read_u8()?;
            } else {
                // Data byte first: running status. The sticky status covers
                // the case where a sysex or meta event cleared the active
                // one. With no status ever established the byte is dropped
                // as a no-op.
                let Some(running) = self.status.or(self.sticky) else {
                    return Ok(TrackStep::Skipped);
                };
                status = running;
                self.status = Some(running);
                data_a = byte;
            }

            let kind = EventKind::try_from(status & 0xF0)
                .ok()
                .filter(|kind| kind.is_channel_voice())
                .ok_or_else(|| reader.unsupported(Unsupported::UnknownStatus(status)))?;
            let channel = status & 0x0F;
            let data_b = if kind.data_len() == 2 {
                reader.read_u8()?
            } else {
                0
            };

            // A status bit inside a data byte means the stream lost sync.
            // In the second data byte, the byte is reinterpreted as a new
            // status and the decode retried; in the first it is fatal.
            if data_b & 0x80 != 0 {
                byte = data_b;
                continue;
            }
            if data_a & 0x80 != 0 {
                return Err(reader.format_err(FormatError::StatusBitInData(data_a)));
            }

            return Ok(TrackStep::Event(Event::Channel(ChannelEvent::new(
                kind, channel, data_a, data_b,
            ))));
        }
    }
}
