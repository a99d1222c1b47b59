use super::types::SubtitleCue;

/// Format a time in milliseconds as an SRT timestamp
pub fn format_timestamp(millis: f64) -> String {
    if millis.is_nan() || millis.is_infinite() || millis < 0.0 {
        return "00:00:00,000".to_string();
    }

    let total_millis = millis as u64;
    let millis = total_millis % 1000;
    let total_seconds = total_millis / 1000;
    let secs = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// End of a cue in milliseconds; cues without a duration end where they start
pub fn cue_end(cue: &SubtitleCue) -> f64 {
    if cue.duration.is_nan() {
        cue.time
    } else {
        cue.time + cue.duration
    }
}

/// Render cues as an SRT document, numbered from 1 in the given order
pub fn to_srt<'a, I>(cues: I) -> String
where
    I: IntoIterator<Item = &'a SubtitleCue>,
{
    let mut out = String::new();
    for (index, cue) in cues.into_iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_timestamp(cue.time),
            format_timestamp(cue_end(cue)),
            cue.text
        ));
    }
    out
}
