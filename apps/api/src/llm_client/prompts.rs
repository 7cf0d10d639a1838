// Reviewer instructions sent as the `instructions` field of the review call.
// Every rubric variant currently shares this text; see review::rubric.

/// Questions the review must answer, in order.
pub const REVIEW_QUESTIONS: [&str; 18] = [
    "What is the main goal of the project?",
    "What are the main claims?",
    "What are the experiments?",
    "What is the evaluation protocol?",
    "What is the data?",
    "What is the task?",
    "How do the experiments support the goal/claims of the paper?",
    "Are any of the limitations discussed in the paper?",
    "What are the strengths of the paper?",
    "What are the weaknesses of the paper?",
    "Provide a suggestion for improving the paper.",
    "What is the relevant related work?",
    "Is the paper reproducible?",
    "Can you rerun the experiments?",
    "Can you reproduce the results in the paper?",
    "Are all the plots in the paper clearly interpretable with well-defined and explained axes, \
     with the methodology clearly explained in the paper text?",
    "Is the English in the paper correct and clear?",
    "Do you have any feedback on any TODOs that the authors have left at this stage?",
];

const REVIEW_PREAMBLE: &str =
    "You are a peer reviewer for a paper. The review should answer these questions about the paper:";

const REVIEW_FORMAT: &str = "\
You should format the response as follows:
For each question, list the question in bold. Then, write a well written paragraph answering the question.
Leave a one line gap between the answer and the next question.";

/// Builds the full reviewer instruction block.
pub fn reviewer_instructions() -> String {
    let questions: Vec<String> = REVIEW_QUESTIONS
        .iter()
        .map(|q| format!("- {q}"))
        .collect();
    format!("{REVIEW_PREAMBLE}\n{}\n{REVIEW_FORMAT}\n", questions.join("\n"))
}
