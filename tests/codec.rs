use pretty_assertions::assert_eq;
use tactus::prelude::*;

/// A format-0 file with one track, assembled byte by byte.
fn single_track_file(division: u16, track_body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(track_body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(track_body);
    bytes
}

#[test]
fn minimal_file_parses() {
    let bytes = single_track_file(480, &[0x00, 0xFF, 0x2F, 0x00]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.format(), Format::SingleMultiChannel);
    assert_eq!(file.division(), 480);
    assert_eq!(file.tracks().len(), 1);
    assert!(file.tracks()[0].is_empty());
    assert!(file.tempo_map().is_empty());
}

#[test]
fn running_status_decodes_two_distinct_events() {
    let body = [
        0x00, 0x90, 60, 100, // NoteOn channel 0
        0x01, 62, 100, // status byte omitted
        0x01, 0xFF, 0x2F, 0x00,
    ];
    let file = MidiFile::parse(&single_track_file(480, &body)).unwrap();
    let track = &file.tracks()[0];
    assert_eq!(track.len(), 2);

    let first = track.get(0).unwrap().as_channel().unwrap();
    let second = track.get(1).unwrap().as_channel().unwrap();
    assert_eq!(first.kind(), EventKind::NoteOn);
    assert_eq!(second.kind(), EventKind::NoteOn);
    assert_eq!(first.channel(), second.channel());
    assert_eq!(first.data_a(), 60);
    assert_eq!(second.data_a(), 62);
}

#[test]
fn tempo_payload_decodes_to_two_beats_per_second() {
    let body = [
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 500000 µs per quarter
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let file = MidiFile::parse(&single_track_file(480, &body)).unwrap();
    assert_eq!(file.tempo_map().len(), 1);
    assert_eq!(file.tempo_map().at(0), Some(2.0));

    // And the writer turns 2.0 beats/sec back into the same three bytes.
    let rewritten = file.to_bytes();
    let tempo_meta = [0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20];
    assert!(
        rewritten
            .windows(tempo_meta.len())
            .any(|window| window == tempo_meta)
    );
}

#[test]
fn mid_track_tempo_lands_at_its_absolute_tick() {
    let body = [
        0x00, 0x90, 60, 100, // NoteOn at tick 0
        0x81, 0x40, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40, // tempo at tick 192
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let file = MidiFile::parse(&single_track_file(480, &body)).unwrap();
    // 1_000_000 µs per quarter note = 1 beat per second.
    assert_eq!(file.tempo_map().at(192), Some(1.0));
}

#[test]
fn read_write_read_round_trip_preserves_events() {
    let mut original = MidiFile::new(Format::Simultaneous, 480);
    original.tempo_map_mut().insert(0, 2.0);

    let mut melody = Track::new();
    melody.insert(0, Event::note_on(0, 60, 100));
    melody.insert(480, Event::note_off(0, 60, 0));
    melody.insert(960, Event::note_on(3, 72, 90));
    melody.insert(1440, Event::note_off(3, 72, 0));
    original.push_track(melody);

    let mut control = Track::new();
    control.insert(
        0,
        ChannelEvent::new(EventKind::ProgramChange, 1, 24, 0).into(),
    );
    control.insert(10, ChannelEvent::new(EventKind::Controller, 1, 7, 99).into());
    control.insert(
        700,
        ChannelEvent::new(EventKind::PitchBend, 1, 0x00, 0x50).into(),
    );
    control.insert(
        900,
        ChannelEvent::new(EventKind::ChannelAftertouch, 1, 55, 0).into(),
    );
    original.push_track(control);

    let first_pass = MidiFile::parse(&original.to_bytes()).unwrap();
    let second_pass = MidiFile::parse(&first_pass.to_bytes()).unwrap();

    assert_eq!(first_pass.tracks(), original.tracks());
    assert_eq!(second_pass.tracks(), first_pass.tracks());
    assert_eq!(second_pass.format(), original.format());
    assert_eq!(second_pass.division(), original.division());
    // The tempo map survives as the single tick-0 entry, by design.
    assert_eq!(second_pass.tempo_map().at(0), Some(2.0));
    assert_eq!(second_pass.tempo_map().len(), 1);
}

#[test]
fn truncated_track_reports_the_truncation_point() {
    let body = [
        0x00, 0x90, 60, 100, // NoteOn
        0x01, 0xFF, 0x2F, 0x00, // end of track
    ];
    let bytes = single_track_file(480, &body);
    let cut = &bytes[..bytes.len() - 2];
    let err = MidiFile::parse(cut).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), cut.len());
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Truncated { missing: 1 }
    ));
}

#[test]
fn wrong_header_magic_is_a_format_error() {
    let mut bytes = single_track_file(480, &[0x00, 0xFF, 0x2F, 0x00]);
    bytes[0] = b'X';
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Format(FormatError::NoHeaderMagic)
    ));
    assert_eq!(err.position(), 4);
}

#[test]
fn smpte_division_is_rejected_at_the_header() {
    let mut bytes = single_track_file(480, &[0x00, 0xFF, 0x2F, 0x00]);
    // Division 0xE250: -30 fps, 80 ticks per frame.
    bytes[12] = 0xE2;
    bytes[13] = 0x50;
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Unsupported(Unsupported::SmpteDivision(0xE250))
    ));
}

#[test]
fn declared_format_two_is_rejected() {
    let mut bytes = single_track_file(480, &[0x00, 0xFF, 0x2F, 0x00]);
    bytes[9] = 2;
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Unsupported(Unsupported::Format(2))
    ));
}

#[test]
fn trailing_padding_after_end_of_track_is_tolerated() {
    let body = [
        0x00, 0x90, 60, 100, //
        0x00, 0xFF, 0x2F, 0x00, // end of track
        0x00, 0x00, 0x00, // padding inside the declared extent
    ];
    let file = MidiFile::parse(&single_track_file(480, &body)).unwrap();
    assert_eq!(file.tracks()[0].len(), 1);
}

#[test]
fn sysex_and_unknown_meta_are_consumed_but_not_stored() {
    let body = [
        0x00, 0xF0, 0x03, 0x7D, 0x01, 0xF7, // sysex, 3-byte payload
        0x00, 0xFF, 0x03, 0x04, b'l', b'e', b'a', b'd', // track-name meta
        0x00, 0x90, 60, 100, // the only stored event
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let file = MidiFile::parse(&single_track_file(480, &body)).unwrap();
    assert_eq!(file.tracks()[0].len(), 1);
    assert!(file.tracks()[0].get(0).unwrap().as_channel().is_some());
}

#[test]
fn same_tick_collision_keeps_the_later_event() {
    let body = [
        0x00, 0x90, 60, 100, //
        0x00, 62, 100, // same tick, running status
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let file = MidiFile::parse(&single_track_file(480, &body)).unwrap();
    let track = &file.tracks()[0];
    assert_eq!(track.len(), 1);
    assert_eq!(track.get(0).unwrap().as_channel().unwrap().data_a(), 62);
}

#[test]
fn format_one_reads_all_declared_tracks() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&2u16.to_be_bytes());
    bytes.extend_from_slice(&480u16.to_be_bytes());
    for key in [60u8, 64] {
        let body = [0x00, 0x90, key, 100, 0x01, 0xFF, 0x2F, 0x00];
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&body);
    }
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks().len(), 2);
    assert_eq!(
        file.tracks()[1].get(0).unwrap().as_channel().unwrap().data_a(),
        64
    );
}
