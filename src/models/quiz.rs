//! 测验结构化解析
//!
//! 把清洗后的两段式文本拆成题目列表，答案区的 `N) X` 回填到对应题目。

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\)\s+(.*)").unwrap());
static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-D])\)\s+(.*)").unwrap());
static KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\)\s+([A-D])$").unwrap());

/// 单道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    /// 正确选项下标（0 = A），答案区缺失时为 None
    pub correct_index: Option<usize>,
}

/// 解析测验文本
pub fn parse_quiz(raw_text: &str) -> Vec<QuizItem> {
    let mut quiz: Vec<QuizItem> = Vec::new();
    let mut current: Option<QuizItem> = None;

    for line in raw_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        // 答案区：先收尾当前题目再回填
        if let Some(caps) = KEY_RE.captures(line) {
            if let Some(done) = current.take() {
                quiz.push(done);
            }
            let number: usize = caps[1].parse().unwrap_or(0);
            let idx = caps[2].bytes().next().map_or(0, |b| (b - b'A') as usize);
            if let Some(item) = number.checked_sub(1).and_then(|i| quiz.get_mut(i)) {
                item.correct_index = Some(idx);
            }
            continue;
        }

        if let Some(caps) = QUESTION_RE.captures(line) {
            if let Some(done) = current.take() {
                quiz.push(done);
            }
            current = Some(QuizItem {
                question: caps[2].to_string(),
                options: Vec::new(),
                correct_index: None,
            });
            continue;
        }

        if let Some(caps) = OPTION_RE.captures(line) {
            if let Some(item) = current.as_mut() {
                item.options.push(caps[2].to_string());
            }
        }
    }

    if let Some(done) = current {
        quiz.push(done);
    }

    quiz
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "### PIRMAS BLOKAS (VARTOTOJUI)
1) Kokia yra Lietuvos sostinė?
A) Kaunas
B) Vilnius
C) Klaipėda
D) Šiauliai

2) Kiek dienų turi savaitė?
A) Penkias
B) Šešias
C) Septynias
D) Aštuonias

### ANTRAS BLOKAS
1) B
2) C
";

    #[test]
    fn test_parse_questions_and_key() {
        let items = parse_quiz(SAMPLE);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question, "Kokia yra Lietuvos sostinė?");
        assert_eq!(items[0].options.len(), 4);
        assert_eq!(items[0].options[1], "Vilnius");
        assert_eq!(items[0].correct_index, Some(1));
        assert_eq!(items[1].correct_index, Some(2));
    }

    #[test]
    fn test_missing_key_leaves_none() {
        let items = parse_quiz("1) Klausimas?\nA) a\nB) b\nC) c\nD) d\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].correct_index, None);
    }

    #[test]
    fn test_key_out_of_range_ignored() {
        let items = parse_quiz("1) Q?\nA) a\nB) b\nC) c\nD) d\n### ANTRAS BLOKAS\n7) D\n");
        assert_eq!(items[0].correct_index, None);
    }

    #[test]
    fn test_question_starting_with_option_letter() {
        let items = parse_quiz("1) Ar Vilnius yra sostinė?\nA) Taip\nB) Ne\nC) Galbūt\nD) Nežinoma\n1) A\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "Ar Vilnius yra sostinė?");
        assert_eq!(items[0].correct_index, Some(0));
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_quiz("").is_empty());
    }
}
