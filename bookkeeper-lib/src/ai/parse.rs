//! Prompt construction and reply cleanup for free-text and receipt-image
//! transaction extraction.

use bookkeeper_repo::transaction_repo::TransactionType;
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ai::client::{
    strip_code_fences, AiError, ChatContent, ChatMessage, ContentPart, ImageUrl,
};
use crate::categories;

#[derive(Deserialize, Debug)]
pub struct ParseRequest {
    pub input: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

impl ParseRequest {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.image.is_none()
    }

    /// The vision path needs both the image and its declared mime type; an
    /// image without one is ignored and the text input is used instead.
    pub fn wants_vision(&self) -> bool {
        self.image.is_some() && self.mime_type.is_some()
    }
}

/// A candidate transaction extracted by the model. Not yet persisted; the
/// client reviews these before posting them as real transactions.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ParsedTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

pub fn build_messages(request: &ParseRequest, today: NaiveDate) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt(today))];

    if request.wants_vision() {
        let image = request.image.as_deref().unwrap_or_default();
        // tolerate both raw base64 and data: URLs
        let data = image
            .split_once(',')
            .map(|(_, data)| data)
            .unwrap_or(image);
        messages.push(ChatMessage::user(ChatContent::Parts(vec![
            ContentPart::Text {
                text: "Analyze this receipt image and extract transaction details.".to_owned(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: data.to_owned(),
                },
            },
        ])));
    } else if let Some(input) = &request.input {
        messages.push(ChatMessage::user(ChatContent::Text(input.clone())));
    }

    messages
}

fn system_prompt(today: NaiveDate) -> String {
    format!(
        "Current Date: {} ({}).\n\
         \n\
         Task: Extract transaction details.\n\
         1. Default to current date if not specified.\n\
         2. Calculate exact YYYY-MM-DD for relative dates like \"yesterday\".\n\
         3. Infer amounts logically.\n\
         4. Category MUST be one of: {}.\n\
         \n\
         Please return the result in JSON format directly. Example: \
         [{{\"type\": \"EXPENSE\", \"amount\": 45.00, \"category\": \"餐饮\", \
         \"date\": \"2025-12-03\", \"description\": \"Lunch\"}}]",
        today,
        chinese_weekday(today.weekday()),
        categories::prompt_list()
    )
}

fn chinese_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

/// Parses the model reply into candidate transactions. A single bare object
/// is accepted and wrapped; amounts are folded to magnitudes and categories
/// outside the conventional lists fall back to 其他.
pub fn parse_reply(content: &str) -> Result<Vec<ParsedTransaction>, AiError> {
    let cleaned = strip_code_fences(content);
    let parsed: Vec<ParsedTransaction> = match serde_json::from_str(&cleaned) {
        Ok(list) => list,
        Err(_) => {
            let single: ParsedTransaction = serde_json::from_str(&cleaned)?;
            vec![single]
        }
    };
    Ok(parsed.into_iter().map(normalize).collect())
}

fn normalize(mut transaction: ParsedTransaction) -> ParsedTransaction {
    transaction.amount = transaction.amount.abs();
    if !categories::is_known(&transaction.category) {
        transaction.category = categories::DEFAULT_CATEGORY.to_owned();
    }
    transaction
}
