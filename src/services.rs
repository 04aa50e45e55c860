pub mod areas;
pub mod employees;

/// Result of a delete that goes through a confirmation prompt
#[derive(Debug, PartialEq)]
pub enum Deletion<T> {
    Deleted(T),
    Cancelled,
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::prompt::{Confirm, PromptError};

    /// Answers every question with a fixed reply and remembers what was asked.
    pub struct ScriptedConfirm {
        pub answer: bool,
        pub questions: Vec<String>,
    }

    impl ScriptedConfirm {
        pub fn answering(answer: bool) -> Self {
            Self {
                answer,
                questions: vec![],
            }
        }
    }

    impl Confirm for ScriptedConfirm {
        fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
            self.questions.push(question.to_string());
            Ok(self.answer)
        }
    }
}
