/// Standard typing convention: one word is five characters, spaces included.
const CHARS_PER_WORD: f64 = 5.0;

/// Final (or in-flight) performance numbers for a typing run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypingStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub correct: usize,
    pub errors: usize,
    pub total_typed: usize,
    pub elapsed_ms: u64,
}

/// Words-per-minute from correctly typed characters only.
/// Zero elapsed time yields zero rather than a division blowup.
pub fn calculate_wpm(correct_chars: usize, elapsed_ms: u64) -> u32 {
    if elapsed_ms == 0 {
        return 0;
    }

    let minutes = elapsed_ms as f64 / 60_000.0;
    let words = correct_chars as f64 / CHARS_PER_WORD;

    (words / minutes).round() as u32
}

/// Accuracy as a whole percentage; an empty buffer is vacuously 100%.
pub fn calculate_accuracy(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Compares the typed buffer position-by-position against the target and
/// derives the run's stats. Pure: the caller supplies elapsed time.
pub fn compute_stats(typed: &[char], target: &str, elapsed_ms: u64) -> TypingStats {
    let target_chars: Vec<char> = target.chars().collect();

    let mut correct = 0;
    let mut errors = 0;

    for (i, &c) in typed.iter().enumerate() {
        if target_chars.get(i) == Some(&c) {
            correct += 1;
        } else {
            errors += 1;
        }
    }

    TypingStats {
        wpm: calculate_wpm(correct, elapsed_ms),
        accuracy: calculate_accuracy(correct, typed.len()),
        correct,
        errors,
        total_typed: typed.len(),
        elapsed_ms,
    }
}
