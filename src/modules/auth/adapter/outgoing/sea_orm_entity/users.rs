use chrono::Utc;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::modules::auth::application::domain::entities::{Role, User};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_domain(self) -> Result<User, String> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| format!("Unknown role '{}' for user {}", self.role, self.id))?;
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            role,
            bio: self.bio,
            first_name: self.first_name,
            last_name: self.last_name,
            is_superuser: self.is_superuser,
            is_staff: self.is_staff,
            created_at: self.created_at.with_timezone(&Utc),
        })
    }
}
