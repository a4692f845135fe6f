#![doc = r#"
Re-timing of a note stream onto a steady musical grid.

Each event's absolute tick is sampled against the source file's tempo map
to recover its wall-clock position, that position is rounded to the nearest
multiple of two candidate grid units (a sixteenth-like unit and a
triplet-eighth-like unit), and the winner is re-expressed as ticks at the
target tempo. The output file keeps the source's format and division and
collapses its tempo map to a single tick-0 entry holding the target tempo.
"#]

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use log::{debug, info};
use thiserror::Error;

use crate::{
    Unsupported,
    file::{MidiFile, Track},
    reader::ReaderError,
    writer::WriterError,
};

/// Source tempo assumed for an event when the source file defines no tempo
/// at all: 120 beats per minute.
///
/// Deliberately a separate constant from
/// [`DEFAULT_TEMPO_BPS`](crate::file::DEFAULT_TEMPO_BPS) even though the
/// two agree numerically; they fall back at different layers and diverging
/// them would be an observable behavior change.
pub const FALLBACK_SOURCE_BPM: f64 = 120.0;

/// Any failure of a quantization pass. All variants are terminal; nothing
/// is retried and no partial output is produced.
#[derive(Debug, Error)]
pub enum QuantizeError {
    /// Reading or parsing the source file failed
    #[error("reading source, {0}")]
    Read(#[from] ReaderError),
    /// Writing the aligned file failed
    #[error("writing aligned output, {0}")]
    Write(#[from] WriterError),
    /// The source declares a feature the quantizer refuses
    #[error("{0}")]
    Unsupported(#[from] Unsupported),
    /// A grid unit was zero, negative, or not a number
    #[error("grid unit {0} is not strictly positive")]
    GridUnit(f64),
}

#[doc = r#"
The two candidate snap durations, in seconds.

How the units are derived is the caller's policy; the quantizer only
requires both to be strictly positive. [`GridUnits::for_tempo`] supplies
the stock derivation used by [`quantize`].
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridUnits {
    sixteenth: f64,
    triplet_eighth: f64,
}

impl GridUnits {
    /// Build a grid from explicit unit durations in seconds.
    pub fn new(sixteenth: f64, triplet_eighth: f64) -> Result<Self, QuantizeError> {
        for unit in [sixteenth, triplet_eighth] {
            if !(unit > 0.0) {
                return Err(QuantizeError::GridUnit(unit));
            }
        }
        Ok(Self {
            sixteenth,
            triplet_eighth,
        })
    }

    /// The stock derivation for a target tempo: `bpm / 240` for the
    /// sixteenth-like unit and `bpm / 180` for the triplet-eighth-like
    /// unit.
    pub fn for_tempo(bpm: f64) -> Result<Self, QuantizeError> {
        Self::new(bpm / 240.0, bpm / 180.0)
    }

    /// The sixteenth-like unit, in seconds.
    pub const fn sixteenth(&self) -> f64 {
        self.sixteenth
    }

    /// The triplet-eighth-like unit, in seconds.
    pub const fn triplet_eighth(&self) -> f64 {
        self.triplet_eighth
    }

    /// Round to the nearest multiple of each unit independently and keep
    /// whichever lands closer to the input; ties go to the sixteenth.
    fn snap(&self, seconds: f64) -> f64 {
        let on_sixteenth = (seconds / self.sixteenth).round() * self.sixteenth;
        let on_triplet = (seconds / self.triplet_eighth).round() * self.triplet_eighth;
        if (seconds - on_sixteenth).abs() <= (seconds - on_triplet).abs() {
            on_sixteenth
        } else {
            on_triplet
        }
    }
}

/// Align every track of `source` to the grid at `target_bpm`.
///
/// The returned file has the same format and division, one track per
/// source track, and a tempo map holding the single target-tempo entry.
/// A source with an SMPTE-style division is rejected before any per-event
/// work.
pub fn align_ticks(
    source: &MidiFile,
    target_bpm: f64,
    grid: GridUnits,
) -> Result<MidiFile, QuantizeError> {
    let division = source.division();
    if division & 0x8000 != 0 {
        return Err(Unsupported::SmpteDivision(division).into());
    }

    let mut aligned = MidiFile::new(source.format(), division);
    aligned.tempo_map_mut().insert(0, target_bpm / 60.0);

    for source_track in source.tracks() {
        let mut track = Track::new();
        let mut out_tick = 0u64;
        for (&tick, event) in source_track {
            // With any entries at all, tempo_at covers every tick; only a
            // file with no tempo whatsoever uses the quantizer's own
            // fallback.
            let source_bpm = if source.tempo_map().is_empty() {
                FALLBACK_SOURCE_BPM
            } else {
                source.tempo_map().tempo_at(tick) * 60.0
            };
            let seconds = tick as f64 / f64::from(division) / source_bpm * 60.0;
            let snapped = grid.snap(seconds);
            let delta = (snapped / 60.0 * target_bpm * f64::from(division)).round() as u64;
            out_tick += delta;
            debug!("tick {tick} ({seconds:.4}s) -> tick {out_tick} ({snapped:.4}s)");
            track.insert(out_tick, event.clone());
        }
        aligned.push_track(track);
    }
    Ok(aligned)
}

/// Read a MIDI file, align it to the grid at `target_bpm`, and write the
/// result next to the input as `<stem>_aligned.mid`, returning that path.
///
/// Fails atomically: an error on any stage leaves no readable partial
/// output behind.
pub fn quantize(input: impl AsRef<Path>, target_bpm: f64) -> Result<PathBuf, QuantizeError> {
    let input = input.as_ref();
    let grid = GridUnits::for_tempo(target_bpm)?;
    let source = MidiFile::open(input)?;
    let aligned = align_ticks(&source, target_bpm, grid)?;
    let output = aligned_path(input);
    aligned.save(&output)?;
    info!(
        "aligned {} to {target_bpm} BPM at {}",
        input.display(),
        output.display()
    );
    Ok(output)
}

fn aligned_path(input: &Path) -> PathBuf {
    let stem = match input.file_stem() {
        Some(stem) => stem.to_string_lossy(),
        None => Cow::Borrowed("output"),
    };
    input.with_file_name(format!("{stem}_aligned.mid"))
}
