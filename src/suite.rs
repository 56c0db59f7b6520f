//! Fixed nutrition question set and its console report

use std::io::Write;
use log::{debug, error};
use crate::client::GraniteClient;
use crate::error::Error;

pub const SYSTEM_PROMPT: &str = "\
You are an expert AI Nutrition Assistant. Your role is to provide personalized, science-based nutrition guidance. \n\
\n\
Key responsibilities:
- Create personalized meal plans based on health goals, dietary restrictions, and preferences
- Explain nutritional benefits and reasoning behind recommendations
- Suggest healthy food swaps and alternatives
- Consider cultural preferences, allergies, and medical conditions
- Provide portion sizes and calorie estimates when relevant
- Always recommend consulting healthcare professionals for serious medical conditions

Response style:
- Be friendly, encouraging, and supportive
- Use simple, easy-to-understand language
- Provide actionable, practical advice
- Include variety and balance in recommendations
- Focus on sustainable, long-term healthy habits";

pub const TEST_QUESTIONS: [&str; 4] = [
  "Create a healthy breakfast meal plan for someone with diabetes who wants to lose weight"
, "I'm vegetarian and need high-protein lunch ideas. I'm also allergic to nuts."
, "What are some healthy snacks under 200 calories?"
, "Suggest a weekly meal prep plan for a busy professional who wants to build muscle"
];

const SEPARATOR_WIDTH: usize = 50;

/// Tally of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteReport
{   pub replies: usize
  , pub failures: usize
}

impl SuiteReport
{   pub fn total(&self) -> usize
    {   self.replies + self.failures
    }
}

fn emit(out: &mut impl Write, text: &str) -> Result<(), Error>
{   writeln!(out, "{}", text)
      .map_err(|e| Error::from(format!("write failed: {}", e)))
}

/// Ask each question in order, printing every outcome.
///
/// Stops at the first fatal error; recoverable chat failures are
/// printed and the next question still runs.
pub async fn run_suite(
  client: &mut GraniteClient
, questions: &[&str]
, out: &mut impl Write
) -> Result<SuiteReport, Error>
{   let rule = "=".repeat(SEPARATOR_WIDTH);
    let dash = "-".repeat(SEPARATOR_WIDTH);
    let mut report = SuiteReport::default();

    emit(out, "🥗 Testing IBM Granite Nutrition Assistant...")?;
    emit(out, &rule)?;

    for (i, question) in questions.iter().enumerate()
    {   let index = i + 1;
        debug!("Running test {}", index);
        emit(out, &format!("\n🔸 Test {}: {}", index, question))?;
        emit(out, &dash)?;

        let outcome = client.ask(SYSTEM_PROMPT, question).await
          .map_err(|e| {
            error!("Test {} aborted the run: {}", index, e);
            e
          })?;

        if outcome.is_reply()
        {   report.replies += 1;
        } else
        {   report.failures += 1;
        }

        emit(out, &outcome.to_string())?;
        emit(out, &format!("\n{}", rule))?;
    }

    emit(out, "\n✅ Testing completed!")?;
    emit(out,
      "\nIf you see good nutrition responses above, your setup is working perfectly!"
    )?;
    out.flush()
      .map_err(|e| Error::from(format!("flush failed: {}", e)))?;
    Ok(report)
}
