use serde::{Deserialize, Serialize};
use std::fmt;

/// process-image エンドポイントのレスポンス
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PassageAnalysis {
    #[serde(default)]
    pub complete_passage: String,
    #[serde(default)]
    pub vietnamese_translation: String,
    #[serde(default)]
    pub new_words: Vec<NewWord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWord {
    pub word: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl fmt::Display for PassageAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Answers")?;
        writeln!(f, "{}", self.complete_passage)?;
        for answer in &self.answers {
            write!(f, "- {}: {}", answer.question, answer.answer)?;
            if !answer.explanation.is_empty() {
                write!(f, " ({})", answer.explanation)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "Vietnamese Translation")?;
        writeln!(f, "{}", self.vietnamese_translation)?;
        writeln!(f)?;
        writeln!(f, "New Words")?;
        for word in &self.new_words {
            writeln!(f, "{} ({}) - {}", word.word, word.part_of_speech, word.meaning)?;
        }
        Ok(())
    }
}
