//! The conventional category lists. Categories are stored as free strings;
//! these lists drive the AI prompt and the fallback used when the model
//! invents a category of its own.

pub const EXPENSE_CATEGORIES: [&str; 9] = [
    "餐饮", "交通", "购物", "娱乐", "居住", "医疗", "教育", "人情", "其他",
];

pub const INCOME_CATEGORIES: [&str; 6] = ["工资", "奖金", "理财", "兼职", "礼金", "其他"];

pub const DEFAULT_CATEGORY: &str = "其他";

pub fn is_known(category: &str) -> bool {
    EXPENSE_CATEGORIES.contains(&category) || INCOME_CATEGORIES.contains(&category)
}

/// Comma-separated list of every category, for prompt interpolation.
pub fn prompt_list() -> String {
    let mut categories: Vec<&str> = EXPENSE_CATEGORIES.to_vec();
    for category in INCOME_CATEGORIES {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories.join(", ")
}
