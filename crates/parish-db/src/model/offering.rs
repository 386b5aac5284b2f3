use chrono::{NaiveDate, NaiveDateTime};
use parish_core::error::{CoreError, CoreResult};
use parish_core::validate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::result::{FromRow, Row};
use crate::error::DbResult;
use crate::model::{default_true, record};

/// Sums come back from SQLite as doubles; money is reported to the cent.
fn money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

fn positive_amount(field: &str, amount: Decimal) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::ValidationError(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

record! {
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct OfferingType {
        pub id: i64,
        pub name: String,
        pub description: Option<String>,
        pub is_active: bool,
        pub created_at: Option<NaiveDateTime>,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewOfferingType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewOfferingType {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for an empty or overlong name.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("name", &self.name, 1, Some(50))
    }
}

record! {
    /// One gift, with the giver's name and the recorder's username joined in.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Offering {
        pub id: i64,
        pub member_id: i64,
        pub offering_date: NaiveDate,
        pub offering_type: String,
        pub amount: Decimal,
        pub memo: Option<String>,
        pub created_by: i64,
        pub created_at: Option<NaiveDateTime>,
        pub updated_at: Option<NaiveDateTime>,
        pub member_name: Option<String>,
        pub created_by_username: Option<String>,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewOffering {
    pub member_id: i64,
    pub offering_date: NaiveDate,
    pub offering_type: String,
    pub amount: Decimal,
    #[serde(default)]
    pub memo: Option<String>,
    pub created_by: i64,
}

impl NewOffering {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for a bad type name or a non-positive amount.
    pub fn validate(&self) -> CoreResult<()> {
        validate::text_len("offering_type", &self.offering_type, 1, Some(50))?;
        positive_amount("amount", self.amount)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfferingChanges {
    #[serde(default)]
    pub member_id: Option<i64>,
    #[serde(default)]
    pub offering_date: Option<NaiveDate>,
    #[serde(default)]
    pub offering_type: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl OfferingChanges {
    /// ## Errors
    /// Returns `CoreError::ValidationError` for a bad type name or a non-positive amount.
    pub fn validate(&self) -> CoreResult<()> {
        validate::opt_text_len("offering_type", self.offering_type.as_deref(), 1, Some(50))?;
        self.amount
            .map_or(Ok(()), |amount| positive_amount("amount", amount))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferingFilter {
    pub member_id: Option<i64>,
    pub offering_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl OfferingFilter {
    /// ## Errors
    /// Returns `CoreError::PreconditionFailed` for an inverted date or amount range and
    /// `CoreError::ValidationError` for a non-positive amount bound.
    pub fn validate(&self) -> CoreResult<()> {
        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            validate::ordered_range(start, end)?;
        }
        if let Some(min) = self.min_amount {
            positive_amount("min_amount", min)?;
        }
        if let Some(max) = self.max_amount {
            positive_amount("max_amount", max)?;
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount)
            && min > max
        {
            return Err(CoreError::PreconditionFailed(
                "min_amount must not exceed max_amount".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sum and count over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferingTotal {
    /// `None` when the range holds no offerings.
    pub total_amount: Option<Decimal>,
    pub total_count: i64,
}

impl FromRow for OfferingTotal {
    fn from_row(row: &Row<'_>) -> DbResult<Self> {
        Ok(Self {
            total_amount: row.get::<Option<Decimal>>("total_amount")?.map(money),
            total_count: row.get("total_count")?,
        })
    }
}

/// Sum and count for one offering type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferingTypeTotal {
    pub offering_type: String,
    pub amount: Decimal,
    pub count: i64,
}

impl FromRow for OfferingTypeTotal {
    fn from_row(row: &Row<'_>) -> DbResult<Self> {
        Ok(Self {
            offering_type: row.get("offering_type")?,
            amount: money(row.get("amount")?),
            count: row.get("count")?,
        })
    }
}

/// Sum and count for one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub amount: Decimal,
    pub count: i64,
}

impl FromRow for MonthlyTotal {
    fn from_row(row: &Row<'_>) -> DbResult<Self> {
        Ok(Self {
            month: row.get("month")?,
            amount: money(row.get("amount")?),
            count: row.get("count")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferingStatistics {
    pub total: OfferingTotal,
    pub by_type: Vec<OfferingTypeTotal>,
    pub monthly: Vec<MonthlyTotal>,
}

/// One member's giving for one offering type within a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberOfferingSummary {
    pub offering_type: String,
    pub total_amount: Decimal,
    pub count: i64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl FromRow for MemberOfferingSummary {
    fn from_row(row: &Row<'_>) -> DbResult<Self> {
        Ok(Self {
            offering_type: row.get("offering_type")?,
            total_amount: money(row.get("total_amount")?),
            count: row.get("count")?,
            first_date: row.get("first_date")?,
            last_date: row.get("last_date")?,
        })
    }
}
