const FALLBACK_STEM: &str = "deadline";

/// Longest stem in bytes; keeps `<stem>.jpg` under the common 255-byte name limit.
pub const MAX_STEM_BYTES: usize = 200;

/// Download name for an exported countdown.
///
/// Every run of whitespace becomes a single `_`, path separators and other
/// characters most filesystems reject become `_`, and an empty result falls
/// back to `deadline`. The stem is cut to [`MAX_STEM_BYTES`] on a char
/// boundary.
pub fn export_filename(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || ch.is_control() {
            stem.push('_');
        } else {
            stem.push(ch);
        }
    }

    if stem.len() > MAX_STEM_BYTES {
        let mut end = MAX_STEM_BYTES;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
    }

    if stem.is_empty() {
        stem.push_str(FALLBACK_STEM);
    }
    format!("{stem}.jpg")
}
