//! Prompt text and fixed generation parameters.

/// Default chat-completion model.
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.3-70b-versatile";
/// Default speech-to-text model.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3";
/// Language hint sent with every transcription.
pub const TRANSCRIPTION_LANGUAGE: &str = "en";

pub const QUESTION_TEMPERATURE: f64 = 0.7;
pub const QUESTION_MAX_TOKENS: u32 = 200;
pub const EVALUATION_TEMPERATURE: f64 = 0.0;
pub const EVALUATION_MAX_TOKENS: u32 = 400;

pub const INTERVIEWER_SYSTEM_PROMPT: &str =
    "You are an interviewer AI for HR and technical rounds.";

pub const OPENING_QUESTION_PROMPT: &str = "Start a new interview. \
Ask the candidate a relevant opening question such as \
'Tell me about yourself' or a simple technical question. \
Keep it short and conversational.";

pub const EVALUATOR_SYSTEM_PROMPT: &str = "You are an expert interviewer evaluator. \
Carefully evaluate the following candidate answer and return ONLY a valid JSON \
object with the following fields:\n\
{\n  \
'score': (float, 0–10),\n  \
'strengths': [list of strings],\n  \
'weaknesses': [list of strings],\n  \
'suggestions': [list of strings]\n\
}\n\
Do not include any text before or after the JSON.";

/// User prompt for the next interview question.
///
/// A blank previous answer opens a new interview.
pub fn question_prompt(previous_answer: &str) -> String {
    if previous_answer.trim().is_empty() {
        OPENING_QUESTION_PROMPT.to_string()
    } else {
        format!(
            "Candidate's previous answer: {previous_answer}\n\
             Ask a concise and relevant follow-up HR or technical question."
        )
    }
}

/// User prompt carrying the answer to evaluate.
pub fn evaluation_prompt(answer: &str) -> String {
    format!("Candidate answer:\n{answer}")
}
