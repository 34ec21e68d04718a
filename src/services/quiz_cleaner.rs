//! 输出清洗
//!
//! 去掉模型常见的三引号包裹，把块标题的各种写法统一成标准标题。
//! 只做精确子串替换，块内内容原样保留。

/// 第一块（用户可见题目）标准标题
pub const FIRST_BLOCK_HEADER: &str = "### PIRMAS BLOKAS";
/// 第二块（隐藏答案）标准标题
pub const SECOND_BLOCK_HEADER: &str = "### ANTRAS BLOKAS";

// 顺序有意义：先处理英文写法，再处理立陶宛语变体
const SECOND_BLOCK_VARIANTS: [&str; 4] = [
    "### SECOND BLOCK",
    "### SECOND  BLOCK",
    "### ANTRASIS BLOKAS",
    "### ANTRAS BLOKAS (SLĖPTAS ATSAKYMŲ RAKTAS)",
];

const FIRST_BLOCK_VARIANT: &str = "### FIRST BLOCK";

/// 清洗模型输出
pub fn clean_output(text: &str) -> String {
    let mut text = text.trim();

    if text.starts_with(r#"""""#) && text.ends_with(r#"""""#) {
        // 不足 6 个字符时首尾引号重叠，剥掉后为空
        text = text.get(3..text.len() - 3).unwrap_or_default().trim();
    }

    let mut text = text.to_string();
    for variant in SECOND_BLOCK_VARIANTS {
        text = text.replace(variant, SECOND_BLOCK_HEADER);
    }

    if text.contains(FIRST_BLOCK_VARIANT) {
        text = text.replace(FIRST_BLOCK_VARIANT, FIRST_BLOCK_HEADER);
    }

    text
}
