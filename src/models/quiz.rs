use serde::{Deserialize, Serialize};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;

const CODE_FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// A question prompt split into prose and an optional fenced code excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptParts {
    pub text: String,
    pub code: Option<CodeExcerpt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeExcerpt {
    pub language: Option<String>,
    pub source: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// Splits out the first fenced code block. Any later fenced block is
    /// left in `text` as written.
    pub fn prompt_parts(&self) -> PromptParts {
        let mut segments = self.question.splitn(3, CODE_FENCE);
        let before = segments.next().unwrap_or_default();

        let Some(fenced) = segments.next() else {
            return PromptParts {
                text: self.question.trim().to_string(),
                code: None,
            };
        };

        let after = segments.next().unwrap_or_default();
        let text = [before.trim(), after.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n\n");

        PromptParts {
            text,
            code: Some(CodeExcerpt::parse(fenced)),
        }
    }
}

impl CodeExcerpt {
    fn parse(fenced: &str) -> Self {
        // The fence info string sits on the opening line, e.g. "```rust\n...".
        match fenced.split_once('\n') {
            Some((info, body)) => {
                let info = info.trim();
                let language = (!info.is_empty() && !info.contains(char::is_whitespace))
                    .then(|| info.to_string());
                if language.is_some() || info.is_empty() {
                    return Self {
                        language,
                        source: body.trim_end().to_string(),
                    };
                }
                Self {
                    language: None,
                    source: fenced.trim().to_string(),
                }
            }
            None => Self {
                language: None,
                source: fenced.trim().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("quiz must contain at least one question")]
    Empty,

    #[error("question {index} has an empty prompt")]
    EmptyPrompt { index: usize },

    #[error("question {index} has {count} options, at least {min} are required", min = MIN_OPTIONS)]
    TooFewOptions { index: usize, count: usize },

    #[error("question {index} has {count} options, at most {max} are allowed", max = MAX_OPTIONS)]
    TooManyOptions { index: usize, count: usize },

    #[error("question {index} repeats the option '{option}'")]
    DuplicateOption { index: usize, option: String },

    #[error("question {index} names '{answer}' as correct, which is not one of its options")]
    CorrectAnswerNotAnOption { index: usize, answer: String },
}

/// An ordered, non-empty set of questions whose correct answers are all
/// among their options. Only constructible through [`QuizDocument::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuizDocument")]
pub struct QuizDocument {
    #[serde(rename = "quiz")]
    questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct RawQuizDocument {
    #[serde(rename = "quiz", alias = "questions")]
    pub questions: Vec<QuizQuestion>,
}

impl TryFrom<RawQuizDocument> for QuizDocument {
    type Error = DocumentError;

    fn try_from(raw: RawQuizDocument) -> Result<Self, Self::Error> {
        QuizDocument::new(raw.questions)
    }
}

impl QuizDocument {
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, DocumentError> {
        if questions.is_empty() {
            return Err(DocumentError::Empty);
        }

        for (index, q) in questions.iter().enumerate() {
            if q.question.trim().is_empty() {
                return Err(DocumentError::EmptyPrompt { index });
            }
            let count = q.options.len();
            if count < MIN_OPTIONS {
                return Err(DocumentError::TooFewOptions { index, count });
            }
            if count > MAX_OPTIONS {
                return Err(DocumentError::TooManyOptions { index, count });
            }
            for (i, option) in q.options.iter().enumerate() {
                if q.options[..i].contains(option) {
                    return Err(DocumentError::DuplicateOption {
                        index,
                        option: option.clone(),
                    });
                }
            }
            if !q.options.contains(&q.correct_answer) {
                return Err(DocumentError::CorrectAnswerNotAnOption {
                    index,
                    answer: q.correct_answer.clone(),
                });
            }
        }

        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn into_questions(self) -> Vec<QuizQuestion> {
        self.questions
    }
}
