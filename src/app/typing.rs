// app/typing.rs
// Scripted typist: turns a text into timestamped press/release events so a
// headless session exercises the motion and acoustic paths the way live
// input would.

use crossbeam::channel::Sender;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Five characters per word, the usual wpm convention.
const CHARS_PER_WORD: f32 = 5.0;
/// Hard floor on the gap between strokes in seconds.
const MIN_GAP_SECS: f32 = 0.02;
/// Hard floor on how long a key stays down in seconds.
const MIN_HOLD_SECS: f32 = 0.012;
/// Quiet lead-in before the first stroke.
const WARMUP_SECS: f32 = 0.4;
/// Pause between repetitions of the script.
const SCRIPT_PAUSE_SECS: f32 = 0.9;

/// One normalized input event, stamped with the session time it fires at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyEvent {
    pub key: &'static str,
    pub pressed: bool,
    /// Session clock time in seconds.
    pub at: f32,
}

/// Board identity for a script character. Characters without a key on the
/// sixty percent board are skipped by the typist.
pub fn key_for_char(c: char) -> Option<&'static str> {
    const LETTERS: [&str; 26] = [
        "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
        "s", "t", "u", "v", "w", "x", "y", "z",
    ];
    const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

    match c {
        'a'..='z' => Some(LETTERS[(c as u8 - b'a') as usize]),
        'A'..='Z' => Some(LETTERS[(c as u8 - b'A') as usize]),
        '0'..='9' => Some(DIGITS[(c as u8 - b'0') as usize]),
        ' ' => Some("space"),
        '\n' => Some("enter"),
        '.' => Some("period"),
        ',' => Some("comma"),
        ';' => Some("semicolon"),
        '\'' => Some("quote"),
        '-' => Some("minus"),
        '/' => Some("slash"),
        _ => None,
    }
}

/// Cadence setup for one scripted run.
#[derive(Clone, Debug)]
pub struct TypistPlan {
    pub script: String,
    pub words_per_minute: f32,
    /// Interval spread as a fraction of the mean interval.
    pub cadence_jitter: f32,
    pub hold_secs: f32,
    pub seed: u64,
    /// No stroke starts past this session time.
    pub duration_secs: f32,
}

fn sample_or(dist: Option<&Normal<f32>>, fallback: f32, rng: &mut StdRng) -> f32 {
    dist.map(|d| d.sample(rng)).unwrap_or(fallback)
}

/// Queues the whole script as timestamped events, repeating it until the
/// session duration is covered. Events go out in keystroke order; the
/// receiver applies each one when its session clock reaches the stamp.
/// Returns the number of strokes queued.
pub fn run_typist(tx: Sender<KeyEvent>, plan: TypistPlan) -> usize {
    let mut rng = StdRng::seed_from_u64(plan.seed);

    let mean_gap = 60.0 / (plan.words_per_minute.max(1.0) * CHARS_PER_WORD);
    let gap_spread = Normal::new(mean_gap, mean_gap * plan.cadence_jitter.max(0.0)).ok();
    let hold_spread = Normal::new(plan.hold_secs, plan.hold_secs * 0.25).ok();

    let mut clock = WARMUP_SECS;
    let mut strokes = 0usize;

    'session: loop {
        let mut typed_any = false;
        for c in plan.script.chars() {
            let Some(key) = key_for_char(c) else { continue };
            typed_any = true;

            clock += sample_or(gap_spread.as_ref(), mean_gap, &mut rng).max(MIN_GAP_SECS);
            if clock >= plan.duration_secs {
                break 'session;
            }
            let hold = sample_or(hold_spread.as_ref(), plan.hold_secs, &mut rng).max(MIN_HOLD_SECS);

            if tx
                .send(KeyEvent {
                    key,
                    pressed: true,
                    at: clock,
                })
                .is_err()
            {
                break 'session;
            }
            if tx
                .send(KeyEvent {
                    key,
                    pressed: false,
                    at: clock + hold,
                })
                .is_err()
            {
                break 'session;
            }
            strokes += 1;
        }

        // A script with no typeable characters would spin forever.
        if !typed_any {
            break;
        }
        clock += SCRIPT_PAUSE_SECS;
    }

    tracing::debug!(strokes, "typist done");
    strokes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel;

    fn collect(plan: TypistPlan) -> (usize, Vec<KeyEvent>) {
        let (tx, rx) = channel::unbounded();
        let strokes = run_typist(tx, plan);
        (strokes, rx.iter().collect())
    }

    fn short_plan() -> TypistPlan {
        TypistPlan {
            script: "hi there 42".into(),
            words_per_minute: 90.0,
            cadence_jitter: 0.3,
            hold_secs: 0.05,
            seed: 11,
            duration_secs: 6.0,
        }
    }

    #[test]
    fn strokes_come_out_paired_and_in_order() {
        let (strokes, events) = collect(short_plan());
        assert!(strokes > 0);
        assert_eq!(events.len(), strokes * 2);

        let mut last_press_at = 0.0f32;
        for pair in events.chunks(2) {
            let [press, release] = pair else {
                panic!("events must pair up")
            };
            assert_eq!(press.key, release.key);
            assert!(press.pressed);
            assert!(!release.pressed);
            assert!(release.at > press.at);
            assert!(press.at >= last_press_at);
            assert!(press.at < 6.0);
            last_press_at = press.at;
        }
    }

    #[test]
    fn a_fixed_seed_reproduces_the_exact_event_stream() {
        let (_, first) = collect(short_plan());
        let (_, second) = collect(short_plan());
        assert_eq!(first, second);
    }

    #[test]
    fn untypeable_characters_are_skipped() {
        let plan = TypistPlan {
            script: "a!?b".into(),
            duration_secs: 2.0,
            ..short_plan()
        };
        let (_, events) = collect(plan);
        let keys: Vec<&str> = events.iter().map(|e| e.key).collect();
        assert!(keys.iter().all(|k| *k == "a" || *k == "b"));
        assert!(keys.contains(&"a") && keys.contains(&"b"));
    }

    #[test]
    fn an_untypeable_script_terminates() {
        let plan = TypistPlan {
            script: "!!!".into(),
            ..short_plan()
        };
        let (strokes, events) = collect(plan);
        assert_eq!(strokes, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn the_script_repeats_until_the_duration_is_covered() {
        let plan = TypistPlan {
            script: "ab".into(),
            words_per_minute: 300.0,
            duration_secs: 5.0,
            ..short_plan()
        };
        let (strokes, events) = collect(plan);
        // 2 typeable characters per pass, so more strokes than one pass means it looped.
        assert!(strokes > 2);
        let last_press = events
            .iter()
            .filter(|e| e.pressed)
            .map(|e| e.at)
            .fold(0.0f32, f32::max);
        assert!(last_press < 5.0);
    }

    #[test]
    fn shift_case_and_symbols_map_onto_board_ids() {
        assert_eq!(key_for_char('A'), Some("a"));
        assert_eq!(key_for_char('z'), Some("z"));
        assert_eq!(key_for_char('0'), Some("0"));
        assert_eq!(key_for_char(' '), Some("space"));
        assert_eq!(key_for_char('\n'), Some("enter"));
        assert_eq!(key_for_char('-'), Some("minus"));
        assert_eq!(key_for_char('é'), None);
        assert_eq!(key_for_char('!'), None);
    }
}
