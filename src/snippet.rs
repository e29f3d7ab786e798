use crate::song::Song;
use rand::Rng;

/// Bounds for how much of a song one round asks the player to type.
#[derive(Clone, Copy, Debug)]
pub struct SnippetOptions {
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            min_words: 25,
            max_words: 55,
        }
    }
}

/// The lyric fragment presented for a single session. `text` is the exact
/// character sequence the player has to reproduce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    pub word_count: usize,
    pub source_title: String,
    pub source_artist: String,
}

/// Extract a playable fragment using the thread RNG.
pub fn extract_snippet(song: &Song, opts: SnippetOptions) -> Snippet {
    extract_snippet_with(song, opts, &mut rand::thread_rng())
}

/// Extract a playable fragment of `song`.
///
/// Short songs are returned whole. Longer songs start from a random line,
/// preferring repeated ("hook") lines half the time, and accumulate
/// consecutive lines until the word budget is met, wrapping around to the top
/// of the lyrics when the starting line sits near the end.
pub fn extract_snippet_with<R: Rng + ?Sized>(
    song: &Song,
    opts: SnippetOptions,
    rng: &mut R,
) -> Snippet {
    let lines = normalized_lines(&song.lyrics);

    let total_words: usize = lines.iter().map(|l| word_count(l)).sum();

    // Short song: the whole thing fits in one round
    if total_words <= opts.max_words {
        let text = lines.join(" ");
        return Snippet {
            word_count: word_count(&text),
            text,
            source_title: song.title.clone(),
            source_artist: song.artist.clone(),
        };
    }

    let hooks = hook_line_indices(&lines);
    let start = if !hooks.is_empty() && rng.gen_bool(0.5) {
        hooks[rng.gen_range(0..hooks.len())]
    } else {
        rng.gen_range(0..lines.len())
    };

    let (text, count) = accumulate_from(&lines, start, opts.min_words);

    if count > opts.max_words {
        let truncated = text
            .split_whitespace()
            .take(opts.max_words)
            .collect::<Vec<_>>()
            .join(" ");
        return Snippet {
            text: truncated,
            word_count: opts.max_words,
            source_title: song.title.clone(),
            source_artist: song.artist.clone(),
        };
    }

    Snippet {
        text,
        word_count: count,
        source_title: song.title.clone(),
        source_artist: song.artist.clone(),
    }
}

/// Non-empty lines with outer whitespace stripped and inner runs collapsed,
/// so the target text never contains doubled spaces or tabs.
fn normalized_lines(lyrics: &str) -> Vec<String> {
    lyrics
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect()
}

fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}

/// Indices of lines whose trimmed, case-folded text repeats elsewhere in the
/// song. Repetition is the proxy for chorus/refrain lines.
fn hook_line_indices(lines: &[String]) -> Vec<usize> {
    use std::collections::HashMap;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for line in lines {
        *counts.entry(line.to_lowercase()).or_insert(0) += 1;
    }

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| counts[&line.to_lowercase()] >= 2)
        .map(|(i, _)| i)
        .collect()
}

/// Accumulate consecutive lines from `start` until `min_words` is reached,
/// wrapping around to the top of the song (stopping before `start`) if the
/// tail alone comes up short.
fn accumulate_from(lines: &[String], start: usize, min_words: usize) -> (String, usize) {
    let mut picked: Vec<&str> = Vec::new();
    let mut count = 0;

    for line in &lines[start..] {
        if count >= min_words {
            break;
        }
        picked.push(line);
        count += word_count(line);
    }

    if count < min_words && start > 0 {
        for line in &lines[..start] {
            if count >= min_words {
                break;
            }
            picked.push(line);
            count += word_count(line);
        }
    }

    (picked.join(" "), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn song(lyrics: &str) -> Song {
        Song {
            title: "Title".into(),
            artist: "Artist".into(),
            lyrics: lyrics.into(),
            filename: None,
        }
    }

    #[test]
    fn test_short_song_returned_whole() {
        let s = song("one two three\n\nfour five six");
        let mut rng = StdRng::seed_from_u64(1);
        let snippet = extract_snippet_with(&s, SnippetOptions::default(), &mut rng);

        assert_eq!(snippet.text, "one two three four five six");
        assert_eq!(snippet.word_count, 6);
        assert_eq!(snippet.source_title, "Title");
        assert_eq!(snippet.source_artist, "Artist");
    }

    #[test]
    fn test_empty_lyrics_yield_empty_snippet() {
        let s = song("");
        let mut rng = StdRng::seed_from_u64(1);
        let snippet = extract_snippet_with(&s, SnippetOptions::default(), &mut rng);

        assert_eq!(snippet.text, "");
        assert_eq!(snippet.word_count, 0);
    }

    #[test]
    fn test_whitespace_only_lyrics_yield_empty_snippet() {
        let s = song("   \n\t\n  ");
        let mut rng = StdRng::seed_from_u64(7);
        let snippet = extract_snippet_with(&s, SnippetOptions::default(), &mut rng);

        assert_eq!(snippet.text, "");
        assert_eq!(snippet.word_count, 0);
    }

    #[test]
    fn test_normalization_collapses_inner_whitespace() {
        let s = song("hello   world\r\n\r\n  spaced\tout  ");
        let mut rng = StdRng::seed_from_u64(3);
        let snippet = extract_snippet_with(&s, SnippetOptions::default(), &mut rng);

        assert_eq!(snippet.text, "hello world spaced out");
        assert_eq!(snippet.word_count, 4);
    }

    #[test]
    fn test_hook_detection_case_and_trim_insensitive() {
        let lines = normalized_lines("La la la\nverse one here\nLA LA LA   \nbridge text");
        let hooks = hook_line_indices(&lines);

        assert_eq!(hooks, vec![0, 2]);
    }

    #[test]
    fn test_no_hooks_in_unique_lines() {
        let lines = normalized_lines("alpha beta\ngamma delta\nepsilon zeta");
        assert!(hook_line_indices(&lines).is_empty());
    }

    #[test]
    fn test_accumulate_reaches_min_words() {
        let lines = normalized_lines("one two\nthree four\nfive six\nseven eight");
        let (text, count) = accumulate_from(&lines, 1, 5);

        assert_eq!(text, "three four five six seven eight");
        assert_eq!(count, 6);
    }

    #[test]
    fn test_accumulate_wraps_around_without_repeating_start() {
        let lines = normalized_lines("a b\nc d\ne f\ng h");
        // Starting at the last line only yields 2 words; wrap picks up from
        // the top but must stop before the start line.
        let (text, count) = accumulate_from(&lines, 3, 7);

        assert_eq!(text, "g h a b c d e f");
        assert_eq!(count, 8);
    }

    #[test]
    fn test_accumulate_exhausts_without_wrap_from_first_line() {
        let lines = normalized_lines("a b\nc d");
        let (text, count) = accumulate_from(&lines, 0, 100);

        assert_eq!(text, "a b c d");
        assert_eq!(count, 4);
    }

    #[test]
    fn test_long_single_line_truncated_at_word_boundary() {
        let words: Vec<String> = (0..200).map(|i| format!("w{i}")).collect();
        let s = song(&words.join(" "));
        let opts = SnippetOptions {
            min_words: 25,
            max_words: 55,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let snippet = extract_snippet_with(&s, opts, &mut rng);

        assert_eq!(snippet.word_count, 55);
        assert_eq!(snippet.text.split_whitespace().count(), 55);
        // Exact word boundary, no trailing partial word or space
        assert!(!snippet.text.ends_with(' '));
    }

    #[test]
    fn test_extraction_is_deterministic_for_a_seed() {
        let verse = "down by the river we sang all night\nthe moon was high and the water bright";
        let chorus = "sing it again sing it again\nsing it again sing it again";
        let lyrics = format!("{verse}\n{chorus}\n{verse}\n{chorus}");
        let s = song(&lyrics);

        let a = extract_snippet_with(&s, SnippetOptions::default(), &mut StdRng::seed_from_u64(42));
        let b = extract_snippet_with(&s, SnippetOptions::default(), &mut StdRng::seed_from_u64(42));

        assert_eq!(a, b);
    }

    #[test]
    fn test_extraction_respects_word_bounds() {
        let words: Vec<String> = (0..500).map(|i| format!("word{i}")).collect();
        let lyrics = words
            .chunks(6)
            .map(|c| c.join(" "))
            .collect::<Vec<_>>()
            .join("\n");
        let s = song(&lyrics);
        let opts = SnippetOptions {
            min_words: 25,
            max_words: 55,
        };

        for seed in 0..50 {
            let snippet = extract_snippet_with(&s, opts, &mut StdRng::seed_from_u64(seed));
            assert!(snippet.word_count >= opts.min_words, "seed {seed} too short");
            assert!(snippet.word_count <= opts.max_words, "seed {seed} too long");
            assert_eq!(snippet.text.split_whitespace().count(), snippet.word_count);
        }
    }
}
