use super::error::Error;
use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, Set};

pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {user_model:?}");

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        google_id: Set(user_model.google_id),
        email: Set(user_model.email.to_lowercase()),
        name: Set(user_model.name),
        avatar: Set(user_model.avatar),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::record_not_found)
}

pub async fn find_by_google_id(
    db: &impl ConnectionTrait,
    google_id: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::GoogleId.eq(google_id))
        .one(db)
        .await?)
}

/// Refreshes the profile fields Google reported on the latest sign in.
/// A missing avatar leaves the stored one in place.
pub async fn update_profile(
    db: &impl ConnectionTrait,
    user: Model,
    email: String,
    name: String,
    avatar: Option<String>,
) -> Result<Model, Error> {
    debug!("Updating profile of user {}", user.id);

    let active_model = ActiveModel {
        id: Unchanged(user.id),
        google_id: Unchanged(user.google_id),
        email: Set(email.to_lowercase()),
        name: Set(name),
        avatar: Set(avatar.or(user.avatar)),
        created_at: Unchanged(user.created_at),
        updated_at: Set(Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}
