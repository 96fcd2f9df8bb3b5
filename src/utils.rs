use sail_search::scoring::{fold_char, normalize};

/// Mark every occurrence of `needle` in `haystack`, translating hits back to
/// original character positions through `positions`.
fn mark_occurrences(
    haystack: &[char],
    positions: &[usize],
    needle: &[char],
    marked: &mut [bool],
) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    let mut found = false;
    for start in 0..=(haystack.len() - needle.len()) {
        if haystack[start..start + needle.len()] == *needle {
            for &pos in &positions[start..start + needle.len()] {
                marked[pos] = true;
            }
            found = true;
        }
    }
    found
}

/// Split `text` into `(segment, is_match)` pairs, marking what each token of
/// `term` matched the same way the scorer does.
///
/// Case and diacritics are ignored. Tokens are looked up in the letters and
/// digits of `text` with separators skipped, so "j24" marks "J" and "24" of
/// "J/24". A token found nowhere else falls back to word initials
/// ("ip" marks "I" and "P" of "Island Packet 35"). Touching matches merge.
/// Segments concatenate back to `text` exactly.
pub fn highlight_segments(text: &str, term: &str) -> Vec<(String, bool)> {
    let normalized = normalize(term);
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() || text.is_empty() {
        return vec![(text.to_string(), false)];
    }

    // Work on chars so case folding can't shift byte offsets.
    let chars: Vec<char> = text.chars().collect();

    // Letters and digits only, plus where each one sits in `chars`.
    let mut joined = Vec::new();
    let mut joined_pos = Vec::new();
    // First letter or digit of each word.
    let mut initials = Vec::new();
    let mut initials_pos = Vec::new();

    let mut prev_alnum = false;
    for (pos, c) in chars.iter().enumerate() {
        let alnum = c.is_alphanumeric();
        if alnum {
            let folded = fold_char(*c);
            joined.push(folded);
            joined_pos.push(pos);
            if !prev_alnum {
                initials.push(folded);
                initials_pos.push(pos);
            }
        }
        prev_alnum = alnum;
    }

    let mut marked = vec![false; chars.len()];
    for token in tokens {
        let needle: Vec<char> = token.chars().collect();
        if !mark_occurrences(&joined, &joined_pos, &needle, &mut marked) && needle.len() > 1 {
            mark_occurrences(&initials, &initials_pos, &needle, &mut marked);
        }
    }

    let mut segments: Vec<(String, bool)> = Vec::new();
    for (c, is_match) in chars.into_iter().zip(marked) {
        match segments.last_mut() {
            Some((segment, last)) if *last == is_match => segment.push(c),
            _ => segments.push((c.to_string(), is_match)),
        }
    }
    segments
}

/// Length overall for display, e.g. "24.0 ft".
pub fn format_length_ft(loa_ft: Option<f32>) -> String {
    match loa_ft {
        Some(ft) => format!("{:.1} ft", ft),
        None => "—".to_string(),
    }
}

pub fn format_year(year: Option<u16>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "—".to_string())
}

/// Turn a score (0 best, 1 worst) into a match percentage.
pub fn format_score(score: f64) -> String {
    format!("{:.1}% match", (1.0 - score.clamp(0.0, 1.0)) * 100.0)
}

/// "No sailboats match", "1 sailboat", "12 sailboats".
pub fn result_count_label(count: usize) -> String {
    match count {
        0 => "No sailboats match".to_string(),
        1 => "1 sailboat".to_string(),
        n => format!("{} sailboats", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[(String, bool)]) -> String {
        segments.iter().map(|(s, _)| s.as_str()).collect()
    }

    #[test]
    fn highlights_each_token() {
        let segments = highlight_segments("Santa Cruz 27", "cruz 27");
        assert_eq!(
            segments,
            vec![
                ("Santa ".to_string(), false),
                ("Cruz".to_string(), true),
                (" ".to_string(), false),
                ("27".to_string(), true),
            ]
        );
    }

    #[test]
    fn merges_overlapping_matches() {
        let segments = highlight_segments("Hallberg-Rassy", "hall allb");
        assert_eq!(segments[0], ("Hallb".to_string(), true));
        assert_eq!(joined(&segments), "Hallberg-Rassy");
    }

    #[test]
    fn punctuation_in_term_is_ignored() {
        let segments = highlight_segments("J/24", "j/24");
        assert_eq!(
            segments,
            vec![
                ("J".to_string(), true),
                ("/".to_string(), false),
                ("24".to_string(), true),
            ]
        );
    }

    #[test]
    fn highlights_across_separators() {
        assert_eq!(
            highlight_segments("J/24", "j24"),
            vec![
                ("J".to_string(), true),
                ("/".to_string(), false),
                ("24".to_string(), true),
            ]
        );
    }

    #[test]
    fn highlights_acronym_initials() {
        assert_eq!(
            highlight_segments("Island Packet 35", "ip"),
            vec![
                ("I".to_string(), true),
                ("sland ".to_string(), false),
                ("P".to_string(), true),
                ("acket 35".to_string(), false),
            ]
        );
    }

    #[test]
    fn plain_spelling_highlights_accented_text() {
        let segments = highlight_segments("Tord Sundén", "sunden");
        assert_eq!(
            segments,
            vec![
                ("Tord ".to_string(), false),
                ("Sundén".to_string(), true),
            ]
        );
    }

    #[test]
    fn blank_term_is_one_plain_segment() {
        assert_eq!(
            highlight_segments("Laser", "  "),
            vec![("Laser".to_string(), false)]
        );
    }

    #[test]
    fn keeps_non_ascii_text_intact() {
        let segments = highlight_segments("Per Brohäll", "häll");
        assert_eq!(joined(&segments), "Per Brohäll");
        assert_eq!(segments.last(), Some(&("häll".to_string(), true)));
    }

    #[test]
    fn formats_fields() {
        assert_eq!(format_length_ft(Some(24.0)), "24.0 ft");
        assert_eq!(format_length_ft(None), "—");
        assert_eq!(format_year(Some(1977)), "1977");
        assert_eq!(format_year(None), "—");
        assert_eq!(format_score(0.0), "100.0% match");
        assert_eq!(format_score(0.25), "75.0% match");
        assert_eq!(result_count_label(0), "No sailboats match");
        assert_eq!(result_count_label(1), "1 sailboat");
        assert_eq!(result_count_label(12), "12 sailboats");
    }
}
