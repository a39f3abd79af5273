use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::application::domain::entities::User;
use crate::modules::auth::application::ports::outgoing::{
    NewUser, UserPatch, UserRepository, UserRepositoryError,
};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel,
};

#[derive(Clone, Debug)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn map_insert_err(e: sea_orm::DbErr) -> UserRepositoryError {
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("23505")
        || err_str.contains("duplicate key")
        || err_str.contains("unique constraint")
    {
        return UserRepositoryError::UserAlreadyExists;
    }
    UserRepositoryError::DatabaseError(e.to_string())
}

fn into_domain(model: UserModel) -> Result<User, UserRepositoryError> {
    model.into_domain().map_err(UserRepositoryError::DatabaseError)
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    async fn create_user(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let active_user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username),
            email: Set(user.email),
            role: Set(user.role.as_str().to_string()),
            bio: Set(user.bio),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            is_superuser: Set(false),
            is_staff: Set(false),
            created_at: NotSet,
        };

        let inserted = active_user.insert(&*self.db).await.map_err(map_insert_err)?;

        into_domain(inserted)
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        patch: UserPatch,
    ) -> Result<User, UserRepositoryError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(UserRepositoryError::UserNotFound)?;

        let mut active_user: UserActiveModel = user.into();
        if let Some(username) = patch.username {
            active_user.username = Set(username);
        }
        if let Some(email) = patch.email {
            active_user.email = Set(email);
        }
        if let Some(role) = patch.role {
            active_user.role = Set(role.as_str().to_string());
        }
        if let Some(bio) = patch.bio {
            active_user.bio = Set(Some(bio));
        }
        if let Some(first_name) = patch.first_name {
            active_user.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = patch.last_name {
            active_user.last_name = Set(Some(last_name));
        }

        // Username/email changes can still trip the unique indexes.
        let updated = active_user.update(&*self.db).await.map_err(map_insert_err)?;

        into_domain(updated)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), UserRepositoryError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(UserRepositoryError::UserNotFound)?;

        user.delete(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
