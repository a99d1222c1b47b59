use matroska_subtitles::subtitles::{format_timestamp, to_srt};
use matroska_subtitles::{extract_local_subtitles, Extraction};
use std::env;

fn main() {
    println!("🎬 Matroska Subtitle Dump");
    println!("=========================");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: mkv_subtitle_dump <file.mkv> [--srt]");
        println!("Example: mkv_subtitle_dump tests/testdata/sample.mkv --srt");
        return;
    }
    let file_path = &args[1];
    let as_srt = args.iter().skip(2).any(|arg| arg == "--srt");

    match extract_local_subtitles(file_path) {
        Ok(extraction) => {
            if as_srt {
                print_srt(&extraction);
            } else {
                print_summary(file_path, &extraction);
            }
            println!("\n✅ Dump completed successfully");
        }
        Err(e) => println!("\n❌ Dump failed: {}", e),
    }
}

fn print_summary(path: &str, extraction: &Extraction) {
    println!("📄 File: {}", path);
    println!("📝 Subtitle tracks: {}", extraction.tracks.len());
    println!();

    for track in &extraction.tracks {
        let cues = extraction
            .subtitles
            .get(&track.number)
            .map_or(0, Vec::len);
        println!(
            "  🔤 Track #{} [{}] language: {}, name: {}, cues: {}{}",
            track.number,
            track.kind,
            track.language.as_deref().unwrap_or("und"),
            track.name.as_deref().unwrap_or("-"),
            cues,
            if track.compressed { ", zlib" } else { "" }
        );
        if let Some(first) = extraction
            .subtitles
            .get(&track.number)
            .and_then(|cues| cues.first())
        {
            println!(
                "     {} {:?}",
                format_timestamp(first.time),
                first.text.lines().next().unwrap_or_default()
            );
        }
    }

    if !extraction.chapters.is_empty() {
        println!();
        println!("📚 Chapters: {}", extraction.chapters.len());
        for chapter in &extraction.chapters {
            println!(
                "  {} - {}  {}",
                format_timestamp(chapter.start),
                chapter
                    .end
                    .map_or_else(|| "?".to_string(), format_timestamp),
                chapter.text.as_deref().unwrap_or("")
            );
        }
    }

    if !extraction.attachments.is_empty() {
        println!();
        println!("📎 Attachments: {}", extraction.attachments.len());
        for attachment in &extraction.attachments {
            println!(
                "  {} ({}, {} bytes)",
                attachment.filename.as_deref().unwrap_or("<unnamed>"),
                attachment.mimetype.as_deref().unwrap_or("unknown type"),
                attachment.data.len()
            );
        }
    }
}

fn print_srt(extraction: &Extraction) {
    for (number, cues) in &extraction.subtitles {
        println!("# Track {}", number);
        print!("{}", to_srt(cues));
    }
}
