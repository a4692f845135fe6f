use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The file formats this codec reads and writes.

Format 2 (sequentially independent tracks) exists in the SMF specification
but is not supported here; the reader rejects it with
[`Unsupported::Format`](crate::Unsupported::Format) rather than guessing at
its track semantics.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum Format {
    /// Format 0: one track carrying every channel.
    SingleMultiChannel = 0,
    /// Format 1: simultaneous tracks sharing one tempo map.
    Simultaneous = 1,
}

impl Format {
    /// How many track chunks to decode for this format.
    ///
    /// Format 0 always reads exactly one, whatever the header's declared
    /// track count says.
    pub const fn tracks_to_read(&self, declared: u16) -> u16 {
        match self {
            Self::SingleMultiChannel => 1,
            Self::Simultaneous => declared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values() {
        assert_eq!(Format::try_from(0u16).unwrap(), Format::SingleMultiChannel);
        assert_eq!(Format::try_from(1u16).unwrap(), Format::Simultaneous);
        assert!(Format::try_from(2u16).is_err());
        assert_eq!(u16::from(Format::Simultaneous), 1);
    }

    #[test]
    fn format_zero_reads_one_track() {
        assert_eq!(Format::SingleMultiChannel.tracks_to_read(4), 1);
        assert_eq!(Format::Simultaneous.tracks_to_read(4), 4);
    }
}
