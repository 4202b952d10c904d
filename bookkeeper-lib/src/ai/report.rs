//! Date-range bucketing and aggregation behind the natural-language report.

use bookkeeper_repo::transaction_repo::{Transaction, TransactionType};
use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

pub const SYSTEM_PROMPT: &str = "你是一位专业的理财顾问。请始终使用简体中文回答。";

pub const EMPTY_PERIOD_REPORT: &str = "该时间段内没有记账记录，无法生成报告。请先记几笔账吧！";

#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Weekly,
    Monthly,
}

#[derive(Deserialize, Debug)]
pub struct ReportRequest {
    #[serde(rename = "type")]
    pub period: ReportPeriod,
    pub date: NaiveDate,
}

/// The calendar period containing `date`: Monday-start week, or the full
/// month. Both bounds are inclusive.
pub fn date_range(period: ReportPeriod, date: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        ReportPeriod::Weekly => {
            let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
            (start, start + Duration::days(6))
        }
        ReportPeriod::Monthly => {
            let start = date.with_day(1).expect("day 1 is valid in every month");
            (start, start + Months::new(1) - Duration::days(1))
        }
    }
}

pub struct PeriodSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub transaction_count: usize,
    /// Expense categories by descending spend, at most five.
    pub top_expense_categories: Vec<(String, Decimal)>,
}

impl PeriodSummary {
    pub fn balance(&self) -> Decimal {
        self.total_income - self.total_expense
    }
}

pub fn summarize(transactions: &[Transaction]) -> PeriodSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut by_category: HashMap<&str, Decimal> = HashMap::new();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => {
                total_expense += transaction.amount;
                *by_category.entry(transaction.category.as_str()).or_default() +=
                    transaction.amount;
            }
        }
    }

    let mut top_expense_categories: Vec<(String, Decimal)> = by_category
        .into_iter()
        .map(|(category, amount)| (category.to_owned(), amount))
        .collect();
    top_expense_categories.sort_by(|a, b| b.1.cmp(&a.1));
    top_expense_categories.truncate(5);

    PeriodSummary {
        total_income,
        total_expense,
        transaction_count: transactions.len(),
        top_expense_categories,
    }
}

pub fn build_prompt(
    period: ReportPeriod,
    start: NaiveDate,
    end: NaiveDate,
    summary: &PeriodSummary,
) -> String {
    let period_label = match period {
        ReportPeriod::Weekly => "周",
        ReportPeriod::Monthly => "月",
    };
    let top_categories = if summary.top_expense_categories.is_empty() {
        "无".to_owned()
    } else {
        summary
            .top_expense_categories
            .iter()
            .map(|(category, amount)| format!("{}: {:.2}", category, amount))
            .collect::<Vec<String>>()
            .join(", ")
    };

    format!(
        "角色: 专业的理财顾问 (AI 记账助手)。\n\
         任务: 为用户生成一份{}度财务报告。\n\
         语言: 必须使用简体中文 (Simplified Chinese)。\n\
         语调: 专业、鼓励、乐于助人，带一点幽默感。\n\
         \n\
         数据:\n\
         - 时间段: {} 至 {}\n\
         - 总收入: {:.2}\n\
         - 总支出: {:.2}\n\
         - 净结余: {:.2}\n\
         - 支出最高的类别: {}\n\
         - 交易笔数: {}\n\
         \n\
         要求:\n\
         1. **总览**: 简要总结财务状况。\n\
         2. **分析**: 分析消费习惯。用户是否在某些类别上花费过多？\n\
         3. **建议**: 基于数据给出3条具体、可执行的省钱或理财建议。\n\
         4. **格式**: 使用 Markdown (加粗, 列表) 以提高可读性。不要输出 JSON。直接输出 Markdown 文本。",
        period_label,
        start,
        end,
        summary.total_income,
        summary.total_expense,
        summary.balance(),
        top_categories,
        summary.transaction_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    #[test]
    fn weekly_range_starts_monday() {
        // 2024-05-01 is a Wednesday
        let (start, end) = date_range(ReportPeriod::Weekly, date("2024-05-01"));
        assert_eq!(start, date("2024-04-29"));
        assert_eq!(end, date("2024-05-05"));
    }

    #[test]
    fn weekly_range_sunday_belongs_to_preceding_monday() {
        // 2024-05-05 is a Sunday
        let (start, end) = date_range(ReportPeriod::Weekly, date("2024-05-05"));
        assert_eq!(start, date("2024-04-29"));
        assert_eq!(end, date("2024-05-05"));
    }

    #[test]
    fn weekly_range_monday_is_its_own_start() {
        let (start, _) = date_range(ReportPeriod::Weekly, date("2024-04-29"));
        assert_eq!(start, date("2024-04-29"));
    }

    #[test]
    fn monthly_range_covers_whole_month() {
        let (start, end) = date_range(ReportPeriod::Monthly, date("2024-05-17"));
        assert_eq!(start, date("2024-05-01"));
        assert_eq!(end, date("2024-05-31"));
    }

    #[test]
    fn monthly_range_handles_leap_february() {
        let (start, end) = date_range(ReportPeriod::Monthly, date("2024-02-10"));
        assert_eq!(start, date("2024-02-01"));
        assert_eq!(end, date("2024-02-29"));

        let (_, end) = date_range(ReportPeriod::Monthly, date("2023-02-10"));
        assert_eq!(end, date("2023-02-28"));
    }

    fn transaction(transaction_type: TransactionType, category: &str, amount: i64) -> Transaction {
        Transaction::new(
            0,
            transaction_type,
            category.to_owned(),
            String::new(),
            date("2024-05-01"),
            Decimal::from(amount),
            Utc::now(),
        )
    }

    #[test]
    fn summarize_totals_and_top_categories() {
        let transactions = vec![
            transaction(TransactionType::Income, "工资", 8000),
            transaction(TransactionType::Expense, "餐饮", 300),
            transaction(TransactionType::Expense, "餐饮", 200),
            transaction(TransactionType::Expense, "交通", 80),
            transaction(TransactionType::Expense, "购物", 700),
            transaction(TransactionType::Expense, "娱乐", 150),
            transaction(TransactionType::Expense, "居住", 2000),
            transaction(TransactionType::Expense, "医疗", 60),
        ];

        let summary = summarize(&transactions);
        assert_eq!(summary.total_income, Decimal::from(8000));
        assert_eq!(summary.total_expense, Decimal::from(3490));
        assert_eq!(summary.balance(), Decimal::from(4510));
        assert_eq!(summary.transaction_count, 8);
        assert_eq!(summary.top_expense_categories.len(), 5);
        assert_eq!(summary.top_expense_categories[0].0, "居住");
        assert_eq!(summary.top_expense_categories[1].0, "购物");
        assert_eq!(summary.top_expense_categories[2].0, "餐饮");
        assert_eq!(summary.top_expense_categories[2].1, Decimal::from(500));
    }

    #[test]
    fn prompt_mentions_range_and_totals() {
        let summary = summarize(&[transaction(TransactionType::Expense, "餐饮", 100)]);
        let prompt = build_prompt(
            ReportPeriod::Weekly,
            date("2024-04-29"),
            date("2024-05-05"),
            &summary,
        );
        assert!(prompt.contains("周度财务报告"));
        assert!(prompt.contains("2024-04-29 至 2024-05-05"));
        assert!(prompt.contains("餐饮: 100.00"));
    }
}
