//! The date a photo was taken, as `YYYY-MM-DD`
//!
//! Tried in order: the EXIF `DateTimeOriginal` field, the file's
//! modification time, today. Every step that fails is skipped quietly, so
//! a date always comes back.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};

/// How EXIF stores timestamps
const EXIF_DATETIME: &str = "%Y:%m:%d %H:%M:%S";
/// How the watermark shows dates
const DISPLAY_DATE: &str = "%Y-%m-%d";

/// Capture date of the image at `path`
pub fn capture_date(path: &Path) -> String {
    if let Some(date) = exif_date(path) {
        return date.format(DISPLAY_DATE).to_string();
    }
    if let Some(date) = modified_date(path) {
        log::debug!("{}: no EXIF date, using modification time", path.display());
        return date.format(DISPLAY_DATE).to_string();
    }
    log::debug!("{}: no date available, using today", path.display());
    Local::now().format(DISPLAY_DATE).to_string()
}

/// Original capture time from the primary image's EXIF block
pub fn exif_date(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    let field = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)?;

    match field.value {
        exif::Value::Ascii(ref parts) => {
            let raw = parts.first()?;
            parse_exif_datetime(&String::from_utf8_lossy(raw))
        },
        _ => None,
    }
}

/// Parses `"YYYY:MM:DD HH:MM:SS"`, tolerating padding NULs and spaces
pub fn parse_exif_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATETIME).ok()
}

fn modified_date(path: &Path) -> Option<DateTime<Local>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified))
}
