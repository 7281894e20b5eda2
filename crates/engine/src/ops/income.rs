use api_types::income::{IncomeNew, IncomeUpdate};
use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    IncomeEntry, ResultEngine, User, income,
    util::{normalize_optional_text, validate_amount, validate_date, validate_time},
};

use super::{Engine, EntryFilter, access::require_admin, with_tx};

impl Engine {
    /// Record an income/OTP movement.
    ///
    /// The entry belongs to the caller unless an admin names another owner.
    pub async fn create_income(
        &self,
        caller: &User,
        input: &IncomeNew,
    ) -> ResultEngine<IncomeEntry> {
        let date = validate_date(&input.date, "date")?;
        let time = validate_time(&input.time)?;
        let amount = validate_amount(input.amount)?;
        let now = Utc::now();

        let (user_id, user_name) = self
            .resolve_owner(&self.database, caller, input.user_id)
            .await?;

        let model = income::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            user_name: ActiveValue::Set(user_name),
            date: ActiveValue::Set(date),
            time: ActiveValue::Set(time),
            category: ActiveValue::Set(input.category.as_str().to_string()),
            amount: ActiveValue::Set(amount),
            description: ActiveValue::Set(input.description.trim().to_string()),
            recipient: ActiveValue::Set(normalize_optional_text(input.recipient.as_deref())),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(&self.database)
        .await?;

        IncomeEntry::try_from(model)
    }

    /// List entries, newest first. Staff only ever see their own.
    pub async fn list_income(
        &self,
        caller: &User,
        filter: &EntryFilter,
    ) -> ResultEngine<Vec<IncomeEntry>> {
        let owner = Self::owner_scope(caller, filter.user_id);
        self.query_income(owner, filter).await
    }

    /// The caller's own entries, whatever their role.
    pub async fn my_income(
        &self,
        caller: &User,
        filter: &EntryFilter,
    ) -> ResultEngine<Vec<IncomeEntry>> {
        self.query_income(Some(caller.id), filter).await
    }

    /// Entries across every user (admin only).
    pub async fn all_income(
        &self,
        caller: &User,
        filter: &EntryFilter,
    ) -> ResultEngine<Vec<IncomeEntry>> {
        require_admin(caller)?;
        self.query_income(filter.user_id, filter).await
    }

    async fn query_income(
        &self,
        owner: Option<i32>,
        filter: &EntryFilter,
    ) -> ResultEngine<Vec<IncomeEntry>> {
        let (start, end) = filter.date_range()?;

        let mut query = income::Entity::find();
        if let Some(owner) = owner {
            query = query.filter(income::Column::UserId.eq(owner));
        }
        if let Some(start) = start {
            query = query.filter(income::Column::Date.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(income::Column::Date.lte(end));
        }

        query
            .order_by_desc(income::Column::Date)
            .order_by_desc(income::Column::Time)
            .order_by_desc(income::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(IncomeEntry::try_from)
            .collect()
    }

    /// Apply the fields present in `patch`.
    ///
    /// An empty `recipient` clears it.
    pub async fn update_income(
        &self,
        caller: &User,
        id: i32,
        patch: &IncomeUpdate,
    ) -> ResultEngine<IncomeEntry> {
        with_tx!(self, |db_tx| {
            let model = self.scoped_income(&db_tx, caller, id).await?;
            let mut active: income::ActiveModel = model.into();

            if let Some(date) = patch.date.as_deref() {
                active.date = ActiveValue::Set(validate_date(date, "date")?);
            }
            if let Some(time) = patch.time.as_deref() {
                active.time = ActiveValue::Set(validate_time(time)?);
            }
            if let Some(category) = patch.category {
                active.category = ActiveValue::Set(category.as_str().to_string());
            }
            if let Some(amount) = patch.amount {
                active.amount = ActiveValue::Set(validate_amount(amount)?);
            }
            if let Some(description) = patch.description.as_deref() {
                active.description = ActiveValue::Set(description.trim().to_string());
            }
            if patch.recipient.is_some() {
                active.recipient =
                    ActiveValue::Set(normalize_optional_text(patch.recipient.as_deref()));
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            IncomeEntry::try_from(active.update(&db_tx).await?)
        })
    }

    pub async fn delete_income(&self, caller: &User, id: i32) -> ResultEngine<()> {
        self.delete_scoped_income(&self.database, caller, id).await?;
        tracing::info!("{} deleted income entry {id}", caller.username);
        Ok(())
    }
}
