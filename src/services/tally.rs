use std::collections::HashMap;

use crate::db::models::AnswerKeyEntry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Tally {
    pub(crate) total_questions: i32,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) unanswered: i32,
}

impl Tally {
    /// Percentage of correct answers; an empty key scores zero.
    pub(crate) fn score(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.correct_answers) * 100.0 / f64::from(self.total_questions)
    }
}

/// Classifies every key question against the finalized answers. Answers to
/// questions outside the key are ignored; a missing or empty choice counts
/// as unanswered.
pub(crate) fn tally(key: &[AnswerKeyEntry], answers: &HashMap<String, String>) -> Tally {
    let mut result =
        Tally { total_questions: 0, correct_answers: 0, wrong_answers: 0, unanswered: 0 };

    for entry in key {
        result.total_questions += 1;
        match answers.get(&entry.question_id).map(String::as_str) {
            None | Some("") => result.unanswered += 1,
            Some(choice) if choice == entry.correct_answer => result.correct_answers += 1,
            Some(_) => result.wrong_answers += 1,
        }
    }

    result
}
