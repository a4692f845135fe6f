use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Meta-type byte of the set-tempo meta event.
pub const META_TEMPO: u8 = 0x51;
/// Meta-type byte of the end-of-track meta event.
pub const META_END_OF_TRACK: u8 = 0x2F;

#[doc = r#"
The event kinds this codec recognizes, tagged with their wire byte values.

Channel-voice kinds (`0x80`–`0xE0`) carry the value of the status byte's
high nibble. The transport kinds ([`Clock`](EventKind::Clock),
[`Start`](EventKind::Start), [`Continue`](EventKind::Continue),
[`Stop`](EventKind::Stop), [`SongPosition`](EventKind::SongPosition)) are
recognized while decoding a track body but are never stored as events.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum EventKind {
    /// Note off
    NoteOff = 0x80,
    /// Note on
    NoteOn = 0x90,
    /// Polyphonic aftertouch
    PolyAftertouch = 0xA0,
    /// Control change
    Controller = 0xB0,
    /// Program change
    ProgramChange = 0xC0,
    /// Channel aftertouch
    ChannelAftertouch = 0xD0,
    /// Pitch bend
    PitchBend = 0xE0,
    /// System exclusive
    SysEx = 0xF0,
    /// Song position pointer (transport)
    SongPosition = 0xF2,
    /// Timing clock (transport)
    Clock = 0xF8,
    /// Start (transport)
    Start = 0xFA,
    /// Continue (transport)
    Continue = 0xFB,
    /// Stop (transport)
    Stop = 0xFC,
    /// Meta event
    Meta = 0xFF,
}

impl EventKind {
    /// Number of data bytes that follow a status byte of this kind.
    ///
    /// Zero for the kinds that never appear as stored channel events.
    pub const fn data_len(self) -> usize {
        use EventKind::*;
        match self {
            NoteOff | NoteOn | PolyAftertouch | Controller | PitchBend => 2,
            ProgramChange | ChannelAftertouch => 1,
            SysEx | SongPosition | Clock | Start | Continue | Stop | Meta => 0,
        }
    }

    /// True for the kinds encoded as a channel status byte (`0x8n`–`0xEn`).
    pub const fn is_channel_voice(self) -> bool {
        (self as u8) < 0xF0
    }
}

#[doc = r#"
A channel-voice event: kind, channel, and one or two data bytes.

`data_a` and `data_b` are 7-bit values in a well-formed file; `data_b` is
zero for the single-data-byte kinds ([`ProgramChange`](EventKind::ProgramChange),
[`ChannelAftertouch`](EventKind::ChannelAftertouch)).
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEvent {
    kind: EventKind,
    channel: u8,
    data_a: u8,
    data_b: u8,
}

impl ChannelEvent {
    /// Create a channel event. `channel` is 0–15, data bytes 0–127.
    pub const fn new(kind: EventKind, channel: u8, data_a: u8, data_b: u8) -> Self {
        Self {
            kind,
            channel,
            data_a,
            data_b,
        }
    }

    /// The event kind.
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The channel, 0–15.
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// First data byte (key, controller number, program, ...).
    pub const fn data_a(&self) -> u8 {
        self.data_a
    }

    /// Second data byte (velocity, controller value, ...).
    pub const fn data_b(&self) -> u8 {
        self.data_b
    }

    /// The status byte this event encodes to, ignoring running status.
    pub const fn status(&self) -> u8 {
        (self.kind as u8) | (self.channel & 0x0F)
    }
}

/// A meta event: a meta-type byte and its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEvent {
    meta_type: u8,
    data: Vec<u8>,
}

impl MetaEvent {
    /// Create a meta event from its type byte and payload.
    pub const fn new(meta_type: u8, data: Vec<u8>) -> Self {
        Self { meta_type, data }
    }

    /// The meta-type byte.
    pub const fn meta_type(&self) -> u8 {
        self.meta_type
    }

    /// The payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[doc = r#"
One stored MIDI event.

Tracks hold channel-voice events decoded from the wire and, for files built
programmatically, meta events. SysEx payloads and transport bytes are
recognized by the reader but never stored.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A channel-voice event
    Channel(ChannelEvent),
    /// A meta event
    Meta(MetaEvent),
}

impl Event {
    /// A note-on event.
    pub const fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
        Self::Channel(ChannelEvent::new(EventKind::NoteOn, channel, key, velocity))
    }

    /// A note-off event.
    pub const fn note_off(channel: u8, key: u8, velocity: u8) -> Self {
        Self::Channel(ChannelEvent::new(
            EventKind::NoteOff,
            channel,
            key,
            velocity,
        ))
    }

    /// Returns the channel event, if that is what this is.
    pub const fn as_channel(&self) -> Option<&ChannelEvent> {
        match self {
            Self::Channel(ev) => Some(ev),
            Self::Meta(_) => None,
        }
    }
}

impl From<ChannelEvent> for Event {
    fn from(value: ChannelEvent) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaEvent> for Event {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}
