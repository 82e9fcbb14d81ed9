//! Interactive answering of clarification questions
//!
//! Input per question is either option numbers (`2`, `1,3`) or free text.
//! Free text selects the question's free-form option when it has one.

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use swarm_domain::{ClarificationAnswers, ClarificationRequest, Question};

/// What the user typed for one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Option ids, in the order typed
    Options(Vec<String>),
    /// Text for the free-form slot
    Freeform { option_id: String, text: String },
}

/// Interpret one line of input for `question`.
pub fn parse_selection(input: &str, question: &Question) -> Result<Selection, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("no answer given".to_string());
    }

    let numbers: Option<Vec<usize>> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<usize>().ok())
        .collect();

    if let Some(numbers) = numbers {
        if numbers.is_empty() {
            return Err("no answer given".to_string());
        }
        if !question.allows_multiple && numbers.len() > 1 {
            return Err("choose a single option".to_string());
        }
        let mut ids = Vec::with_capacity(numbers.len());
        for n in numbers {
            let option = n
                .checked_sub(1)
                .and_then(|i| question.options.get(i))
                .ok_or_else(|| format!("no option {}", n))?;
            if !ids.contains(&option.id) {
                ids.push(option.id.clone());
            }
        }
        return Ok(Selection::Options(ids));
    }

    match question.options.iter().find(|o| o.is_freeform_slot) {
        Some(slot) => Ok(Selection::Freeform {
            option_id: slot.id.clone(),
            text: input.to_string(),
        }),
        None => Err("answer with option numbers".to_string()),
    }
}

/// Walks the user through every question of a request.
///
/// `read_line` returns `None` when the user aborts (Ctrl+C, Ctrl+D).
pub struct ClarificationPrompt<F>
where
    F: FnMut(&str) -> Option<String>,
{
    read_line: F,
}

impl<F> ClarificationPrompt<F>
where
    F: FnMut(&str) -> Option<String>,
{
    pub fn new(read_line: F) -> Self {
        Self { read_line }
    }

    pub fn collect(&mut self, request: &ClarificationRequest) -> Option<ClarificationAnswers> {
        println!("{}", ConsoleFormatter::format_clarification(request));

        let mut answers = ClarificationAnswers::new();
        for (index, question) in request.questions.iter().enumerate() {
            self.answer_question(index + 1, question, &mut answers)?;
        }
        Some(answers)
    }

    fn answer_question(
        &mut self,
        number: usize,
        question: &Question,
        answers: &mut ClarificationAnswers,
    ) -> Option<()> {
        loop {
            let line = (self.read_line)(&format!("{}> ", number))?;
            match parse_selection(&line, question) {
                Ok(Selection::Options(ids)) => {
                    for id in &ids {
                        // ids come from the question, so selection cannot fail
                        let _ = answers.select(question, id);
                    }
                    let slot = ids
                        .iter()
                        .filter_map(|id| question.option(id))
                        .find(|o| o.is_freeform_slot);
                    if let Some(slot) = slot {
                        let text = (self.read_line)(&format!("{}: ", slot.text))?;
                        answers.set_freeform(question.id.clone(), text);
                    }
                    return Some(());
                }
                Ok(Selection::Freeform { option_id, text }) => {
                    let _ = answers.select(question, &option_id);
                    answers.set_freeform(question.id.clone(), text);
                    return Some(());
                }
                Err(message) => println!("  {}", message.yellow()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use swarm_domain::QuestionOption;

    fn single() -> Question {
        Question::single("period", "Which period?")
            .with_option(QuestionOption::new("fy22", "Fiscal 2022"))
            .with_option(QuestionOption::new("fy23", "Fiscal 2023"))
    }

    fn multiple() -> Question {
        Question::multiple("scope", "Which sections?")
            .with_option(QuestionOption::new("fin", "Financials"))
            .with_option(QuestionOption::new("risk", "Risk factors"))
            .with_option(QuestionOption::freeform("other", "Something else"))
    }

    fn scripted(lines: &[&str]) -> impl FnMut(&str) -> Option<String> {
        let mut lines: VecDeque<String> = lines.iter().map(|l| l.to_string()).collect();
        move |_| lines.pop_front()
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(
            parse_selection("2", &single()).unwrap(),
            Selection::Options(vec!["fy23".into()])
        );
        assert_eq!(
            parse_selection("1, 2 1", &multiple()).unwrap(),
            Selection::Options(vec!["fin".into(), "risk".into()])
        );
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        assert!(parse_selection("3", &single()).is_err());
        assert!(parse_selection("0", &single()).is_err());
        assert!(parse_selection("1,2", &single()).is_err());
        assert!(parse_selection("   ", &single()).is_err());
    }

    #[test]
    fn test_free_text_fills_freeform_slot() {
        assert_eq!(
            parse_selection("the ESG appendix", &multiple()).unwrap(),
            Selection::Freeform {
                option_id: "other".into(),
                text: "the ESG appendix".into()
            }
        );
        // No slot to put the text in
        assert!(parse_selection("last year", &single()).is_err());
    }

    #[test]
    fn test_collect_retries_until_valid() {
        let request = ClarificationRequest::with_questions(vec![single(), multiple()]);
        let mut prompt = ClarificationPrompt::new(scripted(&["7", "2", "1,3", "governance"]));

        let answers = prompt.collect(&request).unwrap();
        assert_eq!(answers.selected("period"), ["fy23".to_string()]);
        assert_eq!(
            answers.selected("scope"),
            ["fin".to_string(), "other".to_string()]
        );
        assert_eq!(answers.freeform_text("scope"), Some("governance"));
        assert!(answers.validate(&request).is_ok());
    }

    #[test]
    fn test_abort_returns_none() {
        let request = ClarificationRequest::with_questions(vec![single()]);
        let mut prompt = ClarificationPrompt::new(scripted(&[]));
        assert!(prompt.collect(&request).is_none());
    }
}
