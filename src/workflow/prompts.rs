//! 提示词模板

use crate::models::Difficulty;

pub const FACT_SYSTEM: &str = "Extract literal factual statements only.";
pub const MCQ_SYSTEM: &str = "Generate MCQs strictly from the facts.";

pub fn translation_system(language: &str) -> String {
    format!("Translate perfectly to {}.", language)
}

/// 第一步：事实抽取
pub fn fact_prompt(content: &str) -> String {
    format!(
        r#"
Extract ONLY literal factual statements from the text below.

Rules:
- No paraphrasing.
- No outside knowledge.
- Between 30 and 80 atomic facts.
- One simple sentence per fact.

TEXT:
"""{content}""""#
    )
}

/// 第二步：按事实生成英文选择题（两段式格式）
pub fn mcq_prompt(facts: &str, count: u32, difficulty: Difficulty) -> String {
    let instruction = difficulty.instruction();
    format!(
        r#"
Using ONLY the factual statements below, write {count} multiple-choice questions (MCQs) in ENGLISH.

Difficulty rule:
{instruction}

STRICT FORMAT:

### FIRST BLOCK (FOR USER)
1) [question]
A) [answer]
B) [answer]
C) [answer]
D) [answer]

...
{count}) [question]
A) ...
B) ...
C) ...
D) ...

### SECOND BLOCK (HIDDEN ANSWER KEY)
List {count} answers in order:

1) A
2) C
...
{count}) D

Rules:
- Exactly {count} MCQs.
- Exactly four options per question and only ONE correct option.
- No external information; use only the given facts.
- Keep the formatting EXACT.
- Difficulty level: {difficulty}.

FACTS:
"""{facts}""""#
    )
}

/// 第三步：整体翻译
pub fn translation_prompt(english_mcqs: &str, language: &str) -> String {
    format!(
        r#"
Translate EVERYTHING below into fluent {language}.

STRICT RULES:
- Keep numbering EXACT.
- Keep A/B/C/D EXACT.
- Do NOT change formatting.

TEXT:
"""{english_mcqs}""""#
    )
}
