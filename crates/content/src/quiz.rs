//! Quiz-taking session.
//!
//! Each question goes through select, submit and next. After the last question the
//! session is finished and reports the score until it is retried.

use crate::model::QuizQuestion;

/// Result of submitting an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: usize,
    /// The resolved correct index, which may match no option.
    pub correct_index: i64,
    pub is_correct: bool,
}

#[derive(Clone, Debug)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<usize>,
    answered: bool,
    score: usize,
    finished: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let finished = questions.is_empty();
        Self {
            questions,
            current: 0,
            selected: None,
            answered: false,
            score: 0,
            finished,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question being asked, or `None` once finished.
    pub fn current(&self) -> Option<&QuizQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.current)
    }

    /// 1-based position of the current question.
    pub fn position(&self) -> usize {
        if self.questions.is_empty() {
            0
        } else {
            self.current + 1
        }
    }

    /// Progress through the quiz as a percentage, counting the current question.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.position() as f64 / self.questions.len() as f64 * 100.0
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Choose an option for the current question. Ignored once the answer is submitted.
    pub fn select(&mut self, index: usize) {
        if !self.answered && !self.finished {
            self.selected = Some(index);
        }
    }

    /// Lock in the selected option and score it.
    ///
    /// Returns `None` without a selection, after the answer was already submitted, or
    /// when the session is finished.
    pub fn submit(&mut self) -> Option<AnswerOutcome> {
        if self.answered || self.finished {
            return None;
        }
        let selected = self.selected?;
        let question = self.questions.get(self.current)?;
        let is_correct = question.is_correct(selected);

        self.answered = true;
        if is_correct {
            self.score += 1;
        }

        Some(AnswerOutcome {
            selected,
            correct_index: question.correct_answer_index,
            is_correct,
        })
    }

    /// Move on to the next question, or finish after the last one.
    pub fn next(&mut self) {
        if self.finished {
            return;
        }
        self.selected = None;
        self.answered = false;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.finished = true;
        }
    }

    /// Start over from the first question with a zero score.
    pub fn retry(&mut self) {
        self.current = 0;
        self.selected = None;
        self.answered = false;
        self.score = 0;
        self.finished = self.questions.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: &str, correct: i64) -> QuizQuestion {
        QuizQuestion {
            id: id.into(),
            text: format!("Question {id}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: correct,
        }
    }

    #[test]
    fn scores_correct_answers_across_questions() {
        let mut session = QuizSession::new(vec![q("1", 1), q("2", 3)]);
        assert_eq!(session.position(), 1);
        assert_eq!(session.progress(), 50.0);

        session.select(1);
        let outcome = session.submit().expect("answered");
        assert!(outcome.is_correct);
        session.next();

        assert_eq!(session.current().map(|q| q.id.as_str()), Some("2"));
        session.select(0);
        let outcome = session.submit().expect("answered");
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct_index, 3);
        session.next();

        assert!(session.is_finished());
        assert!(session.current().is_none());
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn submit_requires_selection_and_counts_once() {
        let mut session = QuizSession::new(vec![q("1", 0)]);
        assert!(session.submit().is_none());

        session.select(0);
        assert!(session.submit().is_some());
        assert!(session.submit().is_none());
        session.select(2);
        assert_eq!(session.selected(), Some(0));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn next_clears_selection() {
        let mut session = QuizSession::new(vec![q("1", 0), q("2", 0)]);
        session.select(3);
        session.next();
        assert_eq!(session.selected(), None);
        assert!(!session.is_answered());
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn out_of_range_answer_can_never_be_scored() {
        let mut session = QuizSession::new(vec![q("1", 4)]);
        for choice in 0..4 {
            session.select(choice);
        }
        assert!(!session.submit().expect("answered").is_correct);
    }

    #[test]
    fn retry_resets_progress_and_score() {
        let mut session = QuizSession::new(vec![q("1", 2)]);
        session.select(2);
        session.submit();
        session.next();
        assert!(session.is_finished());

        session.retry();
        assert!(!session.is_finished());
        assert_eq!(session.score(), 0);
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn empty_quiz_is_finished_immediately() {
        let mut session = QuizSession::new(Vec::new());
        assert!(session.is_finished());
        assert_eq!(session.progress(), 0.0);
        session.select(0);
        assert!(session.submit().is_none());
        session.retry();
        assert!(session.is_finished());
    }
}
