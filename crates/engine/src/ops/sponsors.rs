use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Sponsor, SponsorNew, SponsorUpdate, receipts, sponsors,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

pub(super) async fn require_sponsor<C: ConnectionTrait>(
    db: &C,
    sponsor_id: Uuid,
) -> ResultEngine<sponsors::Model> {
    sponsors::Entity::find_by_id(sponsor_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("sponsor not exists".to_string()))
}

async fn ensure_unique_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    name_norm: &str,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = sponsors::Entity::find().filter(sponsors::Column::NameNorm.eq(name_norm));
    if let Some(id) = except {
        query = query.filter(sponsors::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}

impl Engine {
    pub async fn create_sponsor(&self, cmd: SponsorNew) -> ResultEngine<Sponsor> {
        let (name, name_norm) = normalize_required_name(&cmd.name, "sponsor")?;
        with_tx!(self, |db_tx| {
            ensure_unique_name(&db_tx, &name, &name_norm, None).await?;

            let model = sponsors::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                name_norm: ActiveValue::Set(name_norm),
                contact: ActiveValue::Set(normalize_optional_text(cmd.contact.as_deref())),
                note: ActiveValue::Set(normalize_optional_text(cmd.note.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = model.insert(&db_tx).await?;
            Ok(Sponsor::from(model))
        })
    }

    pub async fn sponsor(&self, sponsor_id: Uuid) -> ResultEngine<Sponsor> {
        require_sponsor(&self.database, sponsor_id)
            .await
            .map(Sponsor::from)
    }

    /// All sponsors, ordered by name.
    pub async fn list_sponsors(&self) -> ResultEngine<Vec<Sponsor>> {
        let sponsors = sponsors::Entity::find()
            .order_by_asc(sponsors::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Sponsor::from)
            .collect();
        Ok(sponsors)
    }

    pub async fn update_sponsor(
        &self,
        sponsor_id: Uuid,
        cmd: SponsorUpdate,
    ) -> ResultEngine<Sponsor> {
        with_tx!(self, |db_tx| {
            let model = require_sponsor(&db_tx, sponsor_id).await?;
            let mut active: sponsors::ActiveModel = model.into();

            if let Some(name) = cmd.name.as_deref() {
                let (name, name_norm) = normalize_required_name(name, "sponsor")?;
                ensure_unique_name(&db_tx, &name, &name_norm, Some(sponsor_id)).await?;
                active.name = ActiveValue::Set(name);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(contact) = cmd.contact.as_deref() {
                active.contact = ActiveValue::Set(normalize_optional_text(Some(contact)));
            }
            if let Some(note) = cmd.note.as_deref() {
                active.note = ActiveValue::Set(normalize_optional_text(Some(note)));
            }

            let model = active.update(&db_tx).await?;
            Ok(Sponsor::from(model))
        })
    }

    /// Delete a sponsor that no receipt refers to.
    pub async fn delete_sponsor(&self, sponsor_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_sponsor(&db_tx, sponsor_id).await?;
            let receipts = receipts::Entity::find()
                .filter(receipts::Column::SponsorId.eq(sponsor_id))
                .count(&db_tx)
                .await?;
            if receipts > 0 {
                return Err(EngineError::InUse(model.name));
            }

            sponsors::Entity::delete_by_id(sponsor_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
