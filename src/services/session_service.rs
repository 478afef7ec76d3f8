//! Interactive walkthrough of a single [`QuizDocument`].
//!
//! A session moves through `AwaitingAnswer(i)` and `Answered(i)` for each
//! question index and ends in `Completed` once the last answered question
//! is advanced past. Only the current question's selection is kept; the
//! running score is credited at most once per question.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::quiz::{PromptParts, QuizDocument, QuizQuestion};

/// Presentation flags that distinguish the interactive and published
/// flavours of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub show_immediate_feedback: bool,
    pub allow_publish: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            show_immediate_feedback: true,
            allow_publish: true,
        }
    }
}

impl SessionOptions {
    /// Replay of an already published quiz.
    pub fn published() -> Self {
        Self {
            show_immediate_feedback: true,
            allow_publish: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    AwaitingAnswer,
    Answered,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub score: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Recorded { correct: bool },
    /// The current question was already answered, or the session is over.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved { index: usize },
    Completed(FinalScore),
    NotAnswered,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    document: QuizDocument,
    options: SessionOptions,
    current_index: usize,
    selected_answer: Option<String>,
    credited: BTreeSet<usize>,
    completed: bool,
}

impl QuizSession {
    pub fn new(document: QuizDocument, options: SessionOptions) -> Self {
        Self {
            document,
            options,
            current_index: 0,
            selected_answer: None,
            credited: BTreeSet::new(),
            completed: false,
        }
    }

    pub fn document(&self) -> &QuizDocument {
        &self.document
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    pub fn is_answered(&self) -> bool {
        self.selected_answer.is_some()
    }

    pub fn score(&self) -> usize {
        self.credited.len()
    }

    pub fn total(&self) -> usize {
        self.document.len()
    }

    pub fn status(&self) -> SessionStatus {
        if self.completed {
            SessionStatus::Completed
        } else if self.is_answered() {
            SessionStatus::Answered
        } else {
            SessionStatus::AwaitingAnswer
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.total()
    }

    pub fn current_question(&self) -> &QuizQuestion {
        // current_index < len holds for every reachable state and the
        // document is never empty.
        &self.document.questions()[self.current_index]
    }

    pub fn select_answer(&mut self, answer: &str) -> SelectOutcome {
        if self.status() != SessionStatus::AwaitingAnswer {
            return SelectOutcome::Ignored;
        }

        let correct = self.current_question().is_correct(answer);
        self.selected_answer = Some(answer.to_string());
        if correct {
            self.credited.insert(self.current_index);
        }
        SelectOutcome::Recorded { correct }
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        match self.status() {
            SessionStatus::AwaitingAnswer => AdvanceOutcome::NotAnswered,
            SessionStatus::Completed => AdvanceOutcome::Completed(self.final_tally()),
            SessionStatus::Answered if self.is_last_question() => {
                self.completed = true;
                AdvanceOutcome::Completed(self.final_tally())
            }
            SessionStatus::Answered => {
                self.current_index += 1;
                self.selected_answer = None;
                AdvanceOutcome::Moved {
                    index: self.current_index,
                }
            }
        }
    }

    /// Steps back one question. The revisited question is shown unanswered;
    /// returns false when there is nowhere to go.
    pub fn retreat(&mut self) -> bool {
        if self.completed || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        self.selected_answer = None;
        true
    }

    pub fn complete(&self) -> Option<FinalScore> {
        self.completed.then(|| self.final_tally())
    }

    pub fn can_publish(&self) -> bool {
        self.completed && self.options.allow_publish
    }

    fn final_tally(&self) -> FinalScore {
        FinalScore {
            score: self.score(),
            total: self.total(),
        }
    }

    pub fn view(&self) -> SessionView {
        let question = self.current_question();
        let reveal = self.is_answered() && self.options.show_immediate_feedback;

        SessionView {
            status: self.status(),
            current_index: self.current_index,
            question_number: self.current_index + 1,
            total_questions: self.total(),
            prompt: question.prompt_parts(),
            options: question.options.clone(),
            selected_answer: self.selected_answer.clone(),
            is_answered: self.is_answered(),
            is_last_question: self.is_last_question(),
            score: self.score(),
            feedback: reveal.then(|| AnswerFeedback {
                correct_answer: question.correct_answer.clone(),
                explanation: question.explanation.clone(),
                is_correct: self
                    .selected_answer
                    .as_deref()
                    .is_some_and(|a| question.is_correct(a)),
            }),
            final_score: self.complete(),
            can_publish: self.can_publish(),
            options_flags: self.options,
        }
    }
}

/// Snapshot of a session as the client renders it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub current_index: usize,
    pub question_number: usize,
    pub total_questions: usize,
    pub prompt: PromptParts,
    pub options: Vec<String>,
    pub selected_answer: Option<String>,
    pub is_answered: bool,
    pub is_last_question: bool,
    pub score: usize,
    pub feedback: Option<AnswerFeedback>,
    pub final_score: Option<FinalScore>,
    pub can_publish: bool,
    #[serde(rename = "session_options")]
    pub options_flags: SessionOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerFeedback {
    pub correct_answer: String,
    pub explanation: String,
    pub is_correct: bool,
}
