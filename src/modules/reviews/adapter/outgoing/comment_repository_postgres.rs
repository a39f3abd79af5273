use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::adapter::outgoing::sea_orm_entity::users;
use crate::modules::reviews::application::domain::entities::Comment;
use crate::modules::reviews::application::ports::outgoing::{
    CommentPatch, CommentRepository, CommentRepositoryError, NewComment,
};
use crate::shared::pagination::{Page, PageRequest};

use super::sea_orm_entity::comments::{
    ActiveModel as CommentActiveModel, Column, Entity as CommentEntity, Model as CommentModel,
};

#[derive(Clone)]
pub struct CommentRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

fn map_db_err(e: sea_orm::DbErr) -> CommentRepositoryError {
    CommentRepositoryError::DatabaseError(e.to_string())
}

fn map_insert_err(e: sea_orm::DbErr) -> CommentRepositoryError {
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("23503") || err_str.contains("foreign key") {
        return CommentRepositoryError::ReviewNotFound;
    }
    CommentRepositoryError::DatabaseError(e.to_string())
}

fn to_domain(model: CommentModel, author_username: String) -> Comment {
    Comment {
        id: model.id,
        review_id: model.review_id,
        author_id: model.author_id,
        author_username,
        text: model.text,
        pub_date: model.pub_date.with_timezone(&Utc),
    }
}

impl CommentRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn username_of(&self, author_id: Uuid) -> Result<String, CommentRepositoryError> {
        let user = users::Entity::find_by_id(author_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;
        Ok(user.map(|u| u.username).unwrap_or_default())
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryPostgres {
    async fn list(
        &self,
        review_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, CommentRepositoryError> {
        // The pub_date index keeps this ordering cheap.
        let query = CommentEntity::find()
            .filter(Column::ReviewId.eq(review_id))
            .order_by_asc(Column::PubDate);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;
        let models = query
            .offset(page.offset)
            .limit(page.limit)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        let author_ids: Vec<Uuid> = models.iter().map(|m| m.author_id).collect();
        let usernames: HashMap<Uuid, String> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            users::Entity::find()
                .filter(users::Column::Id.is_in(author_ids))
                .all(&*self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|u| (u.id, u.username))
                .collect()
        };

        let items = models
            .into_iter()
            .map(|m| {
                let username = usernames.get(&m.author_id).cloned().unwrap_or_default();
                to_domain(m, username)
            })
            .collect();

        Ok(Page { items, total })
    }

    async fn find_scoped(
        &self,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let model = CommentEntity::find_by_id(comment_id)
            .filter(Column::ReviewId.eq(review_id))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let username = self.username_of(model.author_id).await?;
        Ok(Some(to_domain(model, username)))
    }

    async fn create(&self, new: NewComment) -> Result<Comment, CommentRepositoryError> {
        let active = CommentActiveModel {
            id: Set(Uuid::new_v4()),
            review_id: Set(new.review_id),
            author_id: Set(new.author_id),
            text: Set(new.text),
            pub_date: NotSet,
        };

        let inserted = active.insert(&*self.db).await.map_err(map_insert_err)?;

        let username = self.username_of(inserted.author_id).await?;
        Ok(to_domain(inserted, username))
    }

    async fn update(
        &self,
        comment_id: Uuid,
        patch: CommentPatch,
    ) -> Result<Comment, CommentRepositoryError> {
        let model = CommentEntity::find_by_id(comment_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(CommentRepositoryError::CommentNotFound)?;

        let mut active: CommentActiveModel = model.into();
        if let Some(text) = patch.text {
            active.text = Set(text);
        }

        let updated = active.update(&*self.db).await.map_err(map_db_err)?;

        let username = self.username_of(updated.author_id).await?;
        Ok(to_domain(updated, username))
    }

    async fn delete(&self, comment_id: Uuid) -> Result<(), CommentRepositoryError> {
        let model = CommentEntity::find_by_id(comment_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(CommentRepositoryError::CommentNotFound)?;

        model.delete(&*self.db).await.map_err(map_db_err)?;
        Ok(())
    }
}
