//! Participant directory: CRUD for [`UserRecord`] rows.

use chrono::Utc;
use rusqlite::params;

use murmur_shared::{ImageRef, Preferences, UserId, UserRecord};

use crate::database::{format_ts, parse_id, Database};
use crate::error::{Result, StoreError};

impl Database {
    /// Insert a user, or refresh the tag and preferences of an existing one.
    pub fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        let image = user.preferences.profile_image.as_ref();
        self.conn().execute(
            "INSERT INTO users (id, account_tag, display_name, profile_image_id, profile_image_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                account_tag = excluded.account_tag,
                display_name = excluded.display_name,
                profile_image_id = excluded.profile_image_id,
                profile_image_url = excluded.profile_image_url",
            params![
                user.id.to_string(),
                user.account_tag,
                user.preferences.display_name,
                image.map(|i| i.id.as_str()),
                image.map(|i| i.url.as_str()),
                format_ts(&Utc::now()),
            ],
        )?;
        Ok(())
    }

    pub fn get_user(&self, id: UserId) -> Result<UserRecord> {
        self.conn()
            .query_row(
                "SELECT id, account_tag, display_name, profile_image_id, profile_image_url
                 FROM users WHERE id = ?1",
                params![id.to_string()],
                |row| row_to_user(row, 0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }
}

/// Map five user columns starting at `first` to a [`UserRecord`].
pub(crate) fn row_to_user(row: &rusqlite::Row<'_>, first: usize) -> rusqlite::Result<UserRecord> {
    let id_str: String = row.get(first)?;
    let account_tag: String = row.get(first + 1)?;
    let display_name: Option<String> = row.get(first + 2)?;
    let image_id: Option<String> = row.get(first + 3)?;
    let image_url: Option<String> = row.get(first + 4)?;

    let profile_image = match (image_id, image_url) {
        (Some(id), Some(url)) => Some(ImageRef {
            id,
            url,
            alt: String::new(),
        }),
        _ => None,
    };

    Ok(UserRecord {
        id: parse_id(first, &id_str)?,
        account_tag,
        preferences: Preferences {
            display_name,
            profile_image,
        },
    })
}
