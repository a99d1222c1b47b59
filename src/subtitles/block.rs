use super::tracks::TrackRegistry;
use super::types::{ScriptFields, SubtitleCue};
use crate::ebml::{Element, ElementId};
use crate::errors::{MatroskaResult, SubtitleError};
use log::debug;
use std::borrow::Cow;

/// Positional fields preceding the dialogue text: ReadOrder, Layer, Style,
/// Name, MarginL, MarginR, MarginV, Effect.
const SCRIPT_FIELD_COUNT: usize = 8;

/// Decode one BlockGroup into a cue for its track.
///
/// Groups without exactly one Block, or whose block belongs to a track that is
/// not a registered subtitle track, yield `Ok(None)`. A payload that fails to
/// inflate is an error.
pub fn decode_block_group(
    group: &Element,
    tracks: &TrackRegistry,
    cluster_timecode: u64,
    timecode_scale: f64,
) -> MatroskaResult<Option<(u64, SubtitleCue)>> {
    let mut blocks = group.children_with(ElementId::Block);
    let (Some(block), None) = (blocks.next(), blocks.next()) else {
        return Ok(None);
    };
    let Some(block) = block.as_block() else {
        return Ok(None);
    };
    let Some(track) = tracks.get(block.track) else {
        return Ok(None);
    };

    // NaN when absent, callers see the gap instead of a made-up zero
    let block_duration = group
        .child_float(ElementId::BlockDuration)
        .unwrap_or(f64::NAN);

    let payload = if track.compressed {
        Cow::Owned(inflate(&block.payload, track.number)?)
    } else {
        Cow::Borrowed(block.payload.as_slice())
    };
    let text = String::from_utf8_lossy(&payload).into_owned();

    let time = (f64::from(block.timecode) + cluster_timecode as f64) * timecode_scale;
    let duration = block_duration * timecode_scale;

    let cue = if track.is_script() {
        let (fields, dialogue) = split_script_fields(&track.kind, &text);
        SubtitleCue {
            text: dialogue,
            time,
            duration,
            fields: Some(fields),
        }
    } else {
        SubtitleCue {
            text,
            time,
            duration,
            fields: None,
        }
    };

    debug!("Cue on track {} at {:.3}ms", track.number, time);
    Ok(Some((track.number, cue)))
}

/// Split a Matroska SSA/ASS block line into its fields and the dialogue text.
///
/// The read order is always dropped and, for `ssa`, so is the layer. Everything
/// after the eighth comma is the dialogue, commas included.
pub fn split_script_fields(kind: &str, line: &str) -> (ScriptFields, String) {
    let first_kept = if kind == "ssa" { 2 } else { 1 };

    let mut values = line.splitn(SCRIPT_FIELD_COUNT + 1, ',');
    let mut positional: [Option<&str>; SCRIPT_FIELD_COUNT] = [None; SCRIPT_FIELD_COUNT];
    for slot in positional.iter_mut() {
        *slot = values.next();
    }
    let dialogue = values.next().unwrap_or_default().to_string();

    let keep = |index: usize| {
        if index >= first_kept {
            positional[index].map(str::to_string)
        } else {
            None
        }
    };

    let fields = ScriptFields {
        layer: keep(1),
        style: keep(2),
        name: keep(3),
        margin_l: keep(4),
        margin_r: keep(5),
        margin_v: keep(6),
        effect: keep(7),
    };
    (fields, dialogue)
}

fn inflate(payload: &[u8], track: u64) -> MatroskaResult<Vec<u8>> {
    miniz_oxide::inflate::decompress_to_vec_zlib(payload).map_err(|err| {
        SubtitleError::new(format!(
            "zlib decompression failed for track {}: {:?}",
            track, err
        ))
        .into()
    })
}
