use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use desk_core::ConversationTurn;
use parking_lot::RwLock;

const DEFAULT_TURN_CAP: usize = 20;
const DEFAULT_SESSION_CAP: usize = 1024;

#[derive(Debug)]
struct SessionBuffer {
    touched: u64,
    turns: VecDeque<ConversationTurn>,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<String, SessionBuffer>,
    clock: u64,
}

/// Per-session bounded turn buffer handed to the knowledge collaborator as
/// conversational context. In-process only; sessions never share turns.
/// Both dimensions are capped: turns per session, and live sessions, with
/// the least recently touched session evicted at the session cap.
#[derive(Clone)]
pub struct ConversationMemory {
    inner: Arc<RwLock<Inner>>,
    turn_cap: usize,
    session_cap: usize,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::with_caps(DEFAULT_TURN_CAP, DEFAULT_SESSION_CAP)
    }

    pub fn with_turn_cap(turn_cap: usize) -> Self {
        Self::with_caps(turn_cap, DEFAULT_SESSION_CAP)
    }

    pub fn with_caps(turn_cap: usize, session_cap: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            turn_cap: turn_cap.max(1),
            session_cap: session_cap.max(1),
        }
    }

    pub fn recall(&self, session_id: &str) -> Vec<ConversationTurn> {
        self.inner
            .read()
            .sessions
            .get(session_id)
            .map(|buffer| buffer.turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn record(&self, session_id: &str, turn: ConversationTurn) {
        let mut guard = self.inner.write();
        guard.clock += 1;
        let clock = guard.clock;

        let buffer = guard
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionBuffer {
                touched: clock,
                turns: VecDeque::new(),
            });
        buffer.touched = clock;
        buffer.turns.push_back(turn);
        while buffer.turns.len() > self.turn_cap {
            buffer.turns.pop_front();
        }

        while guard.sessions.len() > self.session_cap {
            let Some(stalest) = guard
                .sessions
                .iter()
                .min_by_key(|(_, buffer)| buffer.touched)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            guard.sessions.remove(&stalest);
        }
    }

    pub fn session_count(&self) -> usize {
        self.inner.read().sessions.len()
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use desk_core::Intent;

    fn turn(user_text: &str) -> ConversationTurn {
        ConversationTurn {
            at: Utc::now(),
            user_text: user_text.to_string(),
            assistant_text: "ok".to_string(),
            intent: Intent::Faq,
        }
    }

    #[test]
    fn recall_is_scoped_per_session() {
        let memory = ConversationMemory::new();
        memory.record("a", turn("hola"));

        assert_eq!(memory.recall("a").len(), 1);
        assert!(memory.recall("b").is_empty());
    }

    #[test]
    fn old_turns_are_trimmed_at_the_cap() {
        let memory = ConversationMemory::with_turn_cap(3);
        for index in 0..5 {
            memory.record("a", turn(&format!("mensaje {index}")));
        }

        let turns = memory.recall("a");
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].user_text, "mensaje 2");
    }

    #[test]
    fn stalest_session_is_evicted_at_the_session_cap() {
        let memory = ConversationMemory::with_caps(5, 2);
        memory.record("a", turn("uno"));
        memory.record("b", turn("dos"));
        memory.record("a", turn("tres"));
        memory.record("c", turn("cuatro"));

        assert_eq!(memory.session_count(), 2);
        assert!(memory.recall("b").is_empty());
        assert_eq!(memory.recall("a").len(), 2);
        assert_eq!(memory.recall("c").len(), 1);
    }
}
