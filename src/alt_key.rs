//! Alt-chord detection for terminals that cannot report Alt directly.
//!
//! A chord fires on any of:
//! - Alt + letter, when the terminal sets the modifier bit
//! - Esc followed by the bare letter within the window (how most terminals
//!   encode Meta)
//! - the pre-composed character some layouts emit for Option + letter
//!   (`µ` for m, `ƒ` for f on macOS)

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chord {
    OpenMenu,
    OpenForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordBinding {
    pub chord: Chord,
    pub letter: char,
    pub composed: Vec<char>,
}

impl ChordBinding {
    pub fn new(chord: Chord, letter: char, composed: &[char]) -> Self {
        Self {
            chord,
            letter,
            composed: composed.to_vec(),
        }
    }

    fn is_letter(&self, ch: char) -> bool {
        ch.to_lowercase().eq(self.letter.to_lowercase())
    }
}

pub fn default_bindings() -> Vec<ChordBinding> {
    vec![
        ChordBinding::new(Chord::OpenForm, 'f', &['\u{0192}']),
        ChordBinding::new(Chord::OpenMenu, 'm', &['\u{00B5}']),
    ]
}

#[derive(Debug, Clone)]
struct ChordState {
    binding: ChordBinding,
    pending_escape: Option<Instant>,
}

/// Per-chord Escape timestamps plus the matching rules above.
#[derive(Debug, Clone)]
pub struct AltKeyDisambiguator {
    window: Duration,
    chords: Vec<ChordState>,
}

impl AltKeyDisambiguator {
    pub fn new(window: Duration) -> Self {
        Self::with_bindings(window, default_bindings())
    }

    pub fn with_bindings(window: Duration, bindings: Vec<ChordBinding>) -> Self {
        Self {
            window,
            chords: bindings
                .into_iter()
                .map(|binding| ChordState {
                    binding,
                    pending_escape: None,
                })
                .collect(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm every chord on a bare Escape. The key itself is not consumed.
    pub fn note_key(&mut self, key: &KeyEvent, now: Instant) {
        if key.code == KeyCode::Esc {
            for state in &mut self.chords {
                state.pending_escape = Some(now);
            }
        }
    }

    pub fn pending_escape(&self, chord: Chord) -> Option<Instant> {
        self.chords
            .iter()
            .find(|state| state.binding.chord == chord)
            .and_then(|state| state.pending_escape)
    }

    /// True when `key` completes `chord`; the pending Escape is then cleared.
    pub fn take(&mut self, chord: Chord, key: &KeyEvent, now: Instant) -> bool {
        let window = self.window;
        let Some(state) = self.chords.iter_mut().find(|s| s.binding.chord == chord) else {
            return false;
        };
        let KeyCode::Char(ch) = key.code else {
            return false;
        };

        if state.binding.composed.contains(&ch) {
            state.pending_escape = None;
            return true;
        }
        if !state.binding.is_letter(ch) {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            state.pending_escape = None;
            return true;
        }
        let blocking = KeyModifiers::CONTROL | KeyModifiers::SUPER;
        if key.modifiers.intersects(blocking) {
            return false;
        }
        let armed = state
            .pending_escape
            .is_some_and(|at| now.saturating_duration_since(at) < window);
        if armed {
            state.pending_escape = None;
        }
        armed
    }
}
