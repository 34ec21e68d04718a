use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 难度 → 出题要求
static INSTRUCTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "easy" => "Write simple recall questions with very clear correct answers.",
    "medium" => "Write moderately challenging comprehension questions.",
    "hard" => "Write difficult inference-based, analytical questions requiring deeper understanding.",
};

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// 宽松解析：未知值一律视为 medium，不报错
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    /// 写入提示词的难度说明
    pub fn instruction(self) -> &'static str {
        INSTRUCTIONS
            .get(self.name())
            .copied()
            .unwrap_or("Write moderately challenging comprehension questions.")
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
