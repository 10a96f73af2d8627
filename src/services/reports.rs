use crate::{
    db::DbPool,
    entities::case::{self, Entity as CaseEntity},
    entities::dentist::Entity as DentistEntity,
    entities::invoice::{self, Entity as InvoiceEntity},
    errors::ServiceError,
    services::invoices::effective_status,
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_WINDOW_MONTHS: u32 = 6;
const MAX_WINDOW_MONTHS: u32 = 36;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusTotals {
    pub count: u64,
    pub total: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinancialReport {
    pub window_months: u32,
    /// Effective status -> count and billed total
    pub by_status: BTreeMap<String, StatusTotals>,
    /// "YYYY-MM" -> revenue collected (paid invoices by paid date)
    pub monthly_revenue: BTreeMap<String, Decimal>,
    pub top_dentists: Vec<DentistRevenue>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DentistRevenue {
    pub dentist_id: Uuid,
    pub dentist_name: String,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseReport {
    pub window_months: u32,
    pub by_status: BTreeMap<String, u64>,
    pub by_priority: BTreeMap<String, u64>,
    /// "YYYY-MM" -> cases opened
    pub monthly_volume: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DentistActivity {
    pub dentist_id: Uuid,
    pub dentist_name: String,
    pub case_count: u64,
    pub billed_revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DentistReport {
    pub window_months: u32,
    pub dentists: Vec<DentistActivity>,
}

/// Read-only aggregations over cases and invoices. Everything here is
/// computed on demand; nothing is cached or materialized.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn financial_report(
        &self,
        months: Option<u32>,
    ) -> Result<FinancialReport, ServiceError> {
        let window_months = clamp_window(months);
        let since = window_start(window_months);
        let today = Utc::now().date_naive();
        let db = &*self.db_pool;

        let invoices = InvoiceEntity::find()
            .filter(invoice::Column::IssueDate.gte(since))
            .all(db)
            .await?;

        let mut by_status: BTreeMap<String, StatusTotals> = BTreeMap::new();
        let mut monthly_revenue: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut revenue_by_dentist: HashMap<Uuid, Decimal> = HashMap::new();

        for inv in &invoices {
            let status = effective_status(&inv.status, inv.due_date, today);
            let entry = by_status.entry(status.clone()).or_insert(StatusTotals {
                count: 0,
                total: Decimal::ZERO,
            });
            entry.count += 1;
            entry.total += inv.total;

            if status == "paid" {
                let month = inv
                    .paid_date
                    .map(month_key)
                    .unwrap_or_else(|| month_key(inv.issue_date));
                *monthly_revenue.entry(month).or_insert(Decimal::ZERO) += inv.total;
                *revenue_by_dentist
                    .entry(inv.dentist_id)
                    .or_insert(Decimal::ZERO) += inv.total;
            }
        }

        let names = self.dentist_names().await?;
        let mut top_dentists: Vec<DentistRevenue> = revenue_by_dentist
            .into_iter()
            .map(|(dentist_id, revenue)| DentistRevenue {
                dentist_id,
                dentist_name: names
                    .get(&dentist_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                revenue,
            })
            .collect();
        top_dentists.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        top_dentists.truncate(5);

        Ok(FinancialReport {
            window_months,
            by_status,
            monthly_revenue,
            top_dentists,
        })
    }

    #[instrument(skip(self))]
    pub async fn case_report(&self, months: Option<u32>) -> Result<CaseReport, ServiceError> {
        let window_months = clamp_window(months);
        let since = window_start(window_months);
        let db = &*self.db_pool;

        let cases = CaseEntity::find()
            .filter(case::Column::CreatedAt.gte(since.and_time(chrono::NaiveTime::MIN).and_utc()))
            .all(db)
            .await?;

        let mut by_status: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_priority: BTreeMap<String, u64> = BTreeMap::new();
        let mut monthly_volume: BTreeMap<String, u64> = BTreeMap::new();

        for c in &cases {
            *by_status.entry(c.status.clone()).or_insert(0) += 1;
            *by_priority.entry(c.priority.clone()).or_insert(0) += 1;
            *monthly_volume
                .entry(month_key(c.created_at.date_naive()))
                .or_insert(0) += 1;
        }

        Ok(CaseReport {
            window_months,
            by_status,
            by_priority,
            monthly_volume,
        })
    }

    #[instrument(skip(self))]
    pub async fn dentist_report(&self, months: Option<u32>) -> Result<DentistReport, ServiceError> {
        let window_months = clamp_window(months);
        let since = window_start(window_months);
        let db = &*self.db_pool;

        let cases = CaseEntity::find()
            .filter(case::Column::CreatedAt.gte(since.and_time(chrono::NaiveTime::MIN).and_utc()))
            .all(db)
            .await?;
        let invoices = InvoiceEntity::find()
            .filter(invoice::Column::IssueDate.gte(since))
            .all(db)
            .await?;

        let mut case_counts: HashMap<Uuid, u64> = HashMap::new();
        for c in &cases {
            *case_counts.entry(c.dentist_id).or_insert(0) += 1;
        }

        let mut billed: HashMap<Uuid, Decimal> = HashMap::new();
        for inv in &invoices {
            *billed.entry(inv.dentist_id).or_insert(Decimal::ZERO) += inv.total;
        }

        let names = self.dentist_names().await?;
        let mut dentist_ids: Vec<Uuid> = case_counts
            .keys()
            .chain(billed.keys())
            .copied()
            .collect();
        dentist_ids.sort();
        dentist_ids.dedup();

        let mut dentists: Vec<DentistActivity> = dentist_ids
            .into_iter()
            .map(|dentist_id| DentistActivity {
                dentist_id,
                dentist_name: names
                    .get(&dentist_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                case_count: case_counts.get(&dentist_id).copied().unwrap_or(0),
                billed_revenue: billed.get(&dentist_id).copied().unwrap_or(Decimal::ZERO),
            })
            .collect();
        dentists.sort_by(|a, b| b.billed_revenue.cmp(&a.billed_revenue));

        Ok(DentistReport {
            window_months,
            dentists,
        })
    }

    async fn dentist_names(&self) -> Result<HashMap<Uuid, String>, ServiceError> {
        let db = &*self.db_pool;
        let dentists = DentistEntity::find().all(db).await?;
        Ok(dentists
            .into_iter()
            .map(|d| (d.id, format!("{} {}", d.first_name, d.last_name)))
            .collect())
    }
}

fn clamp_window(months: Option<u32>) -> u32 {
    months
        .unwrap_or(DEFAULT_WINDOW_MONTHS)
        .clamp(1, MAX_WINDOW_MONTHS)
}

fn window_start(months: u32) -> NaiveDate {
    // Approximate months as 31 days so a full calendar month is always covered
    Utc::now().date_naive() - Duration::days(i64::from(months) * 31)
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_is_sortable() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let dec = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(month_key(jan), "2026-01");
        assert_eq!(month_key(dec), "2025-12");
        assert!(month_key(dec) < month_key(jan));
    }

    #[test]
    fn window_defaults_and_clamps() {
        assert_eq!(clamp_window(None), DEFAULT_WINDOW_MONTHS);
        assert_eq!(clamp_window(Some(0)), 1);
        assert_eq!(clamp_window(Some(120)), MAX_WINDOW_MONTHS);
        assert_eq!(clamp_window(Some(12)), 12);
    }
}
