use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

use crate::{
    error::AppError,
    transactions::repo_types::{NewTransaction, TransactionKind, TransactionPatch},
};

/// Body of `POST /transaction/create`; also the shape of the partial update.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionRequest {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn parse_title(raw: String) -> Result<String, AppError> {
    let title = raw.trim().to_string();
    if title.is_empty() {
        return Err(AppError::validation("title must not be empty"));
    }
    Ok(title)
}

fn parse_category(raw: String) -> Result<String, AppError> {
    let category = raw.trim().to_string();
    if category.is_empty() {
        return Err(AppError::validation("category must not be empty"));
    }
    Ok(category)
}

// Zero is treated like a missing amount.
fn parse_amount(raw: f64) -> Result<f64, AppError> {
    if !raw.is_finite() || raw == 0.0 {
        return Err(AppError::validation("amount must be a non-zero number"));
    }
    Ok(raw)
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_date(raw: &str) -> Result<OffsetDateTime, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| AppError::validation("date must be YYYY-MM-DD or an RFC 3339 timestamp"))
}

fn parse_kind(raw: &str) -> Result<TransactionKind, AppError> {
    match raw.trim() {
        "income" => Ok(TransactionKind::Income),
        "expense" => Ok(TransactionKind::Expense),
        _ => Err(AppError::validation("type must be either income or expense")),
    }
}

impl TransactionRequest {
    pub fn into_new(self) -> Result<NewTransaction, AppError> {
        let (Some(title), Some(amount), Some(date), Some(category), Some(kind)) =
            (self.title, self.amount, self.date, self.category, self.kind)
        else {
            return Err(AppError::validation("all fields are required"));
        };

        Ok(NewTransaction {
            title: parse_title(title)?,
            amount: parse_amount(amount)?,
            date: parse_date(&date)?,
            category: parse_category(category)?,
            kind: parse_kind(&kind)?,
        })
    }

    pub fn into_patch(self) -> Result<TransactionPatch, AppError> {
        Ok(TransactionPatch {
            title: self.title.map(parse_title).transpose()?,
            amount: self.amount.map(parse_amount).transpose()?,
            date: self.date.as_deref().map(parse_date).transpose()?,
            category: self.category.map(parse_category).transpose()?,
            kind: self.kind.as_deref().map(parse_kind).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn request(v: serde_json::Value) -> TransactionRequest {
        serde_json::from_value(v).expect("deserialize")
    }

    #[test]
    fn complete_request_validates() {
        let new = request(json!({
            "title": "  Groceries ",
            "amount": 42.5,
            "date": "2025-05-21",
            "category": "Food",
            "type": "expense"
        }))
        .into_new()
        .expect("valid");
        assert_eq!(new.title, "Groceries");
        assert_eq!(new.kind, TransactionKind::Expense);
        assert_eq!(new.date, datetime!(2025-05-21 0:00 UTC));
    }

    #[test]
    fn missing_field_is_rejected() {
        let err = request(json!({
            "title": "Salary",
            "amount": 5000,
            "date": "2025-05-01",
            "type": "income"
        }))
        .into_new()
        .unwrap_err();
        assert_eq!(err.to_string(), "all fields are required");
    }

    #[test]
    fn blank_title_and_unknown_type_are_rejected() {
        let base = || {
            json!({
                "title": "Salary",
                "amount": 5000,
                "date": "2025-05-01",
                "category": "Work",
                "type": "income"
            })
        };

        let mut v = base();
        v["title"] = json!("   ");
        assert!(request(v).into_new().is_err());

        let mut v = base();
        v["type"] = json!("transfer");
        assert_eq!(
            request(v).into_new().unwrap_err().to_string(),
            "type must be either income or expense"
        );

        let mut v = base();
        v["amount"] = json!(0);
        assert!(request(v).into_new().is_err());
    }

    #[test]
    fn dates_accept_rfc3339_and_plain_days() {
        assert_eq!(
            parse_date("2025-05-20T08:30:00.000Z").unwrap(),
            datetime!(2025-05-20 8:30 UTC)
        );
        assert_eq!(
            parse_date("2025-05-20T10:30:00+02:00").unwrap(),
            datetime!(2025-05-20 8:30 UTC)
        );
        assert!(parse_date("20/05/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn patch_only_carries_present_fields() {
        let patch = request(json!({ "amount": 12.0 })).into_patch().expect("valid");
        assert_eq!(
            patch,
            TransactionPatch {
                amount: Some(12.0),
                ..Default::default()
            }
        );
        assert!(request(json!({ "category": "" })).into_patch().is_err());
        assert_eq!(
            request(json!({})).into_patch().unwrap(),
            TransactionPatch::default()
        );
    }
}
