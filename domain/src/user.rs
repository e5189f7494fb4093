use crate::error::Error;
use crate::gateway::google_oauth::GoogleUserInfo;
use crate::users;
use chrono::Utc;
use entity_api::user;
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::user::find_by_id;

/// Finds the account behind a Google profile, refreshing its profile fields, or creates it
/// on first sign in.
pub async fn upsert_from_google(
    db: &DatabaseConnection,
    profile: &GoogleUserInfo,
) -> Result<users::Model, Error> {
    let google_id = profile
        .google_id()
        .ok_or_else(|| Error::input("Google profile has no account id"))?;
    let email = profile
        .email
        .clone()
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| Error::input("Google profile has no email"))?;
    let name = profile.name.clone().unwrap_or_else(|| email.clone());

    match user::find_by_google_id(db, google_id).await? {
        Some(existing) => {
            debug!("Existing user {} signed in with Google", existing.id);
            Ok(user::update_profile(db, existing, email, name, profile.picture.clone()).await?)
        }
        None => {
            info!("Creating user for Google account {google_id}");
            let now = Utc::now();
            Ok(user::create(
                db,
                users::Model {
                    id: Default::default(),
                    google_id: google_id.to_string(),
                    email,
                    name,
                    avatar: profile.picture.clone(),
                    created_at: now.into(),
                    updated_at: now.into(),
                },
            )
            .await?)
        }
    }
}
