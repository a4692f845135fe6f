use thiserror::Error;

/// A structural violation discovered while decoding a MIDI file.
///
/// These cover everything that makes a byte stream *not* a well-formed
/// Standard MIDI File without running out of bytes; short reads are
/// reported separately as [`ReaderErrorKind::Truncated`](crate::reader::ReaderErrorKind).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The file does not begin with the `MThd` chunk magic.
    #[error("expected `MThd` at start of file")]
    NoHeaderMagic,
    /// The header chunk declares fewer than the 6 required bytes.
    #[error("header chunk length {0} is shorter than 6")]
    HeaderTooShort(u32),
    /// The header declares zero ticks per quarter note.
    #[error("division of zero ticks per quarter note")]
    ZeroDivision,
    /// A track chunk does not begin with the `MTrk` magic.
    #[error("expected `MTrk` at start of track chunk")]
    NoTrackMagic,
    /// A variable-length quantity kept its continuation bit set past the
    /// fourth byte.
    #[error("variable-length quantity spans more than 4 bytes")]
    VarLenTooLong,
    /// The first data byte of a channel event has its status bit set.
    ///
    /// A set status bit in the *second* data byte is recoverable (the byte
    /// is reinterpreted as a new status); in the first it is not.
    #[error("data byte {0:#04x} has its status bit set")]
    StatusBitInData(u8),
}

/// A feature of the input this codec deliberately does not handle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// Only formats 0 and 1 are readable; format 2 and anything beyond is
    /// rejected rather than guessed at.
    #[error("file format {0}, only formats 0 and 1 are supported")]
    Format(u16),
    /// A division value with the top bit set encodes SMPTE time code,
    /// which this codec refuses instead of silently misinterpreting.
    #[error("SMPTE time-code division {0:#06x}")]
    SmpteDivision(u16),
    /// A status byte whose high nibble maps to no known event kind.
    #[error("status byte {0:#04x} maps to no known event kind")]
    UnknownStatus(u8),
}
