use crate::subtitles::{
    cue_end, format_timestamp, to_srt, Attachment, ParserEvent, ScriptFields, SubtitleCue,
};
use regex::Regex;

#[cfg(test)]
mod test_helpers {
    use super::*;

    pub fn cue(text: &str, time: f64, duration: f64) -> SubtitleCue {
        SubtitleCue {
            text: text.to_string(),
            time,
            duration,
            fields: None,
        }
    }
}

#[test]
fn test_format_timestamp_is_srt() {
    let pattern = Regex::new(r"^\d{2}:\d{2}:\d{2},\d{3}$").unwrap();
    for millis in [0.0, 999.9, 61_001.0, 3_723_004.0, 359_999_000.0] {
        let formatted = format_timestamp(millis);
        assert!(pattern.is_match(&formatted), "{}", formatted);
    }
    assert_eq!(format_timestamp(3_723_004.0), "01:02:03,004");
    assert_eq!(format_timestamp(f64::NAN), "00:00:00,000");
    assert_eq!(format_timestamp(-5.0), "00:00:00,000");
}

#[test]
fn test_srt_rendering_handles_missing_duration() {
    use test_helpers::*;
    let cues = vec![cue("Hello", 1000.0, 1500.0), cue("World", 4000.0, f64::NAN)];
    assert_eq!(cue_end(&cues[1]), 4000.0);
    assert_eq!(
        to_srt(&cues),
        "1\n00:00:01,000 --> 00:00:02,500\nHello\n\n2\n00:00:04,000 --> 00:00:04,000\nWorld\n\n"
    );
}

#[test]
fn test_subtitle_event_serializes_flat_script_fields() {
    let event = ParserEvent::Subtitle {
        track: 4,
        cue: SubtitleCue {
            text: "Hi".to_string(),
            time: 10.0,
            duration: 20.0,
            fields: Some(ScriptFields {
                layer: Some("0".to_string()),
                style: Some("Default".to_string()),
                margin_l: Some("0".to_string()),
                ..ScriptFields::default()
            }),
        },
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.starts_with("{\"event\":\"subtitle\""), "{}", json);
    assert!(json.contains("\"style\":\"Default\""), "{}", json);
    assert!(json.contains("\"marginL\":\"0\""), "{}", json);
    assert!(!json.contains("\"fields\""), "{}", json);
}

#[test]
fn test_attachment_data_serializes_as_base64() {
    let event = ParserEvent::Attachments(vec![Attachment {
        filename: Some("font.ttf".to_string()),
        mimetype: None,
        data: b"font".to_vec(),
    }]);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "attachments");
    assert_eq!(json["data"][0]["data"], "Zm9udA==");
    assert_eq!(json["data"][0]["mimetype"], serde_json::Value::Null);
}
