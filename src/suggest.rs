//! Suggestion debouncer for live prompt assistance.
//!
//! A time-windowed, cancel-on-change state machine over a single text
//! input. It owns no timers and issues no requests itself: the interactive
//! caller feeds it input changes and the current time (from the `Clock`
//! port), asks it when a fetch is due, performs the producer call, and
//! hands back the result. A generation counter ties results to the input
//! they were requested for, so a later input change invalidates a
//! still-pending earlier request — its result is ignored on arrival.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Inputs shorter than this never leave [`SuggestState::Idle`].
pub const MIN_INPUT_LEN: usize = 10;

/// Default debounce window in milliseconds.
pub const DEBOUNCE_MS: i64 = 600;

/// A fetched completion for the current input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Text that would complete the input.
    pub completion: String,
}

/// Observable debouncer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestState {
    /// Input is below the minimum length; nothing pending.
    Idle,
    /// The debounce window is running (show a loading indicator).
    Pending,
    /// A suggestion is available for the current input.
    Fetched(Suggestion),
}

/// Permission to perform one fetch for a settled input. Stale tickets
/// (issued before a later input change) are ignored by
/// [`SuggestionDebouncer::on_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// The settled input text to request a completion for.
    pub text: String,
    generation: u64,
}

/// Debouncing state machine for one live text input.
pub struct SuggestionDebouncer {
    state: SuggestState,
    input: String,
    generation: u64,
    deadline: Option<DateTime<Utc>>,
    ticket_issued: bool,
    suppress_for: Option<String>,
    window: Duration,
    min_len: usize,
}

impl SuggestionDebouncer {
    /// Creates a debouncer with the default window and minimum length.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(Duration::milliseconds(DEBOUNCE_MS), MIN_INPUT_LEN)
    }

    /// Creates a debouncer with a custom window and minimum input length.
    #[must_use]
    pub fn with_window(window: Duration, min_len: usize) -> Self {
        Self {
            state: SuggestState::Idle,
            input: String::new(),
            generation: 0,
            deadline: None,
            ticket_issued: false,
            suppress_for: None,
            window,
            min_len,
        }
    }

    /// The current observable state.
    #[must_use]
    pub fn state(&self) -> &SuggestState {
        &self.state
    }

    /// Records an input change at `now`.
    ///
    /// Any existing suggestion is cleared and any pending fetch is
    /// invalidated (its result will be ignored). Long-enough input restarts
    /// the debounce window; short input returns to idle. If the change is
    /// the one produced by consuming the previous suggestion, exactly this
    /// one re-fetch is suppressed.
    pub fn on_input(&mut self, text: &str, now: DateTime<Utc>) {
        if text == self.input {
            return;
        }
        self.generation += 1;
        self.ticket_issued = false;
        self.input = text.to_string();

        if self.suppress_for.take().is_some_and(|applied| applied == text) {
            self.state = SuggestState::Idle;
            self.deadline = None;
            return;
        }

        if text.chars().count() < self.min_len {
            self.state = SuggestState::Idle;
            self.deadline = None;
        } else {
            self.state = SuggestState::Pending;
            self.deadline = Some(now + self.window);
        }
    }

    /// Returns a fetch ticket when the window has elapsed for the settled
    /// input — at most once per settled input.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<FetchTicket> {
        if self.state != SuggestState::Pending || self.ticket_issued {
            return None;
        }
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.ticket_issued = true;
        Some(FetchTicket { text: self.input.clone(), generation: self.generation })
    }

    /// Delivers the fetched suggestion for `ticket`. Results for a stale
    /// ticket — the input changed after the fetch started — are ignored.
    pub fn on_result(&mut self, ticket: &FetchTicket, suggestion: Suggestion) {
        if ticket.generation != self.generation || self.state != SuggestState::Pending {
            return;
        }
        self.state = SuggestState::Fetched(suggestion);
        self.deadline = None;
    }

    /// Consumes the available suggestion for applying to the input.
    ///
    /// The caller is expected to append the completion to the input; that
    /// resulting text is remembered and the single `on_input` it triggers
    /// will not start a re-fetch.
    pub fn consume(&mut self) -> Option<Suggestion> {
        match std::mem::replace(&mut self.state, SuggestState::Idle) {
            SuggestState::Fetched(suggestion) => {
                self.suppress_for = Some(format!("{}{}", self.input, suggestion.completion));
                Some(suggestion)
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}

impl Default for SuggestionDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::milliseconds(ms)
    }

    fn suggestion(text: &str) -> Suggestion {
        Suggestion { completion: text.into() }
    }

    #[test]
    fn short_input_never_leaves_idle() {
        let mut debouncer = SuggestionDebouncer::new();
        debouncer.on_input("short", t(0));
        assert_eq!(debouncer.state(), &SuggestState::Idle);
        assert_eq!(debouncer.poll(t(10_000)), None);
    }

    #[test]
    fn settled_input_goes_idle_pending_fetched_exactly_once() {
        let mut debouncer = SuggestionDebouncer::new();
        assert_eq!(debouncer.state(), &SuggestState::Idle);

        debouncer.on_input("a lesson about rivers", t(0));
        assert_eq!(debouncer.state(), &SuggestState::Pending);

        // Window not yet elapsed.
        assert_eq!(debouncer.poll(t(DEBOUNCE_MS - 1)), None);

        let ticket = debouncer.poll(t(DEBOUNCE_MS)).expect("fetch due");
        assert_eq!(ticket.text, "a lesson about rivers");
        // Only one ticket per settled input.
        assert_eq!(debouncer.poll(t(DEBOUNCE_MS + 50)), None);

        debouncer.on_result(&ticket, suggestion(" and their deltas"));
        assert_eq!(debouncer.state(), &SuggestState::Fetched(suggestion(" and their deltas")));
    }

    #[test]
    fn keystroke_before_window_elapses_cancels_and_restarts_the_timer() {
        let mut debouncer = SuggestionDebouncer::new();
        debouncer.on_input("a lesson about rivers", t(0));
        debouncer.on_input("a lesson about rivers!", t(300));

        // Old deadline has passed, new one has not.
        assert_eq!(debouncer.poll(t(DEBOUNCE_MS)), None);
        let ticket = debouncer.poll(t(300 + DEBOUNCE_MS)).expect("restarted window elapsed");
        assert_eq!(ticket.text, "a lesson about rivers!");
    }

    #[test]
    fn late_result_for_an_invalidated_ticket_is_ignored() {
        let mut debouncer = SuggestionDebouncer::new();
        debouncer.on_input("a lesson about rivers", t(0));
        let stale = debouncer.poll(t(DEBOUNCE_MS)).unwrap();

        // Input changes while the fetch is in flight.
        debouncer.on_input("a lesson about mountains", t(DEBOUNCE_MS + 10));
        debouncer.on_result(&stale, suggestion("rivers tail"));

        // Still pending for the new input; the stale result was dropped.
        assert_eq!(debouncer.state(), &SuggestState::Pending);
        let fresh = debouncer.poll(t(DEBOUNCE_MS + 10 + DEBOUNCE_MS)).unwrap();
        assert_eq!(fresh.text, "a lesson about mountains");
    }

    #[test]
    fn input_change_clears_an_existing_suggestion() {
        let mut debouncer = SuggestionDebouncer::new();
        debouncer.on_input("a lesson about rivers", t(0));
        let ticket = debouncer.poll(t(DEBOUNCE_MS)).unwrap();
        debouncer.on_result(&ticket, suggestion(" tail"));
        assert!(matches!(debouncer.state(), SuggestState::Fetched(_)));

        debouncer.on_input("a lesson about rivers and", t(2_000));
        assert_eq!(debouncer.state(), &SuggestState::Pending);
    }

    #[test]
    fn consuming_a_suggestion_suppresses_exactly_one_refetch() {
        let mut debouncer = SuggestionDebouncer::new();
        debouncer.on_input("a lesson about rivers", t(0));
        let ticket = debouncer.poll(t(DEBOUNCE_MS)).unwrap();
        debouncer.on_result(&ticket, suggestion(" and deltas"));

        let applied = debouncer.consume().unwrap();
        let resulting = format!("a lesson about rivers{}", applied.completion);

        // The input change caused by applying the suggestion: no re-fetch.
        debouncer.on_input(&resulting, t(DEBOUNCE_MS + 100));
        assert_eq!(debouncer.state(), &SuggestState::Idle);
        assert_eq!(debouncer.poll(t(DEBOUNCE_MS * 10)), None);

        // But only that one: a further keystroke debounces normally.
        debouncer.on_input(&format!("{resulting}."), t(DEBOUNCE_MS * 10));
        assert_eq!(debouncer.state(), &SuggestState::Pending);
    }

    #[test]
    fn suppression_does_not_apply_to_a_different_edit() {
        let mut debouncer = SuggestionDebouncer::new();
        debouncer.on_input("a lesson about rivers", t(0));
        let ticket = debouncer.poll(t(DEBOUNCE_MS)).unwrap();
        debouncer.on_result(&ticket, suggestion(" and deltas"));
        let _ = debouncer.consume().unwrap();

        // The user typed something other than the applied completion.
        debouncer.on_input("a lesson about oceans", t(DEBOUNCE_MS + 100));
        assert_eq!(debouncer.state(), &SuggestState::Pending);
    }

    #[test]
    fn consume_on_idle_returns_none() {
        let mut debouncer = SuggestionDebouncer::new();
        assert_eq!(debouncer.consume(), None);
    }
}
