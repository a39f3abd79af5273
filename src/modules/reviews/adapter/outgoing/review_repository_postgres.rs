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
use crate::modules::reviews::application::domain::entities::Review;
use crate::modules::reviews::application::ports::outgoing::{
    NewReview, ReviewPatch, ReviewRepository, ReviewRepositoryError,
};
use crate::shared::pagination::{Page, PageRequest};

use super::sea_orm_entity::reviews::{
    ActiveModel as ReviewActiveModel, Column, Entity as ReviewEntity, Model as ReviewModel,
};

#[derive(Clone)]
pub struct ReviewRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

fn map_db_err(e: sea_orm::DbErr) -> ReviewRepositoryError {
    ReviewRepositoryError::DatabaseError(e.to_string())
}

fn map_insert_err(e: sea_orm::DbErr) -> ReviewRepositoryError {
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("23505")
        || err_str.contains("duplicate key")
        || err_str.contains("unique constraint")
    {
        return ReviewRepositoryError::DuplicateReview;
    }
    if err_str.contains("23503") || err_str.contains("foreign key") {
        // The title (or author) disappeared between resolution and insert.
        return ReviewRepositoryError::TitleNotFound;
    }
    ReviewRepositoryError::DatabaseError(e.to_string())
}

fn to_domain(model: ReviewModel, author_username: String) -> Review {
    Review {
        id: model.id,
        title_id: model.title_id,
        author_id: model.author_id,
        author_username,
        text: model.text,
        score: model.score,
        pub_date: model.pub_date.with_timezone(&Utc),
    }
}

impl ReviewRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn username_of(&self, author_id: Uuid) -> Result<String, ReviewRepositoryError> {
        let user = users::Entity::find_by_id(author_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;
        Ok(user.map(|u| u.username).unwrap_or_default())
    }

    async fn usernames_of(
        &self,
        author_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, String>, ReviewRepositoryError> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let authors = users::Entity::find()
            .filter(users::Column::Id.is_in(author_ids))
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;
        Ok(authors.into_iter().map(|u| (u.id, u.username)).collect())
    }
}

#[async_trait]
impl ReviewRepository for ReviewRepositoryPostgres {
    async fn list(
        &self,
        title_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Review>, ReviewRepositoryError> {
        let query = ReviewEntity::find()
            .filter(Column::TitleId.eq(title_id))
            .order_by_asc(Column::PubDate);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;
        let models = query
            .offset(page.offset)
            .limit(page.limit)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        let author_ids: Vec<Uuid> = models.iter().map(|m| m.author_id).collect();
        let usernames = self.usernames_of(author_ids).await?;

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
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let model = ReviewEntity::find_by_id(review_id)
            .filter(Column::TitleId.eq(title_id))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let username = self.username_of(model.author_id).await?;
        Ok(Some(to_domain(model, username)))
    }

    async fn create(&self, new: NewReview) -> Result<Review, ReviewRepositoryError> {
        let active = ReviewActiveModel {
            id: Set(Uuid::new_v4()),
            title_id: Set(new.title_id),
            author_id: Set(new.author_id),
            text: Set(new.text),
            score: Set(new.score),
            pub_date: NotSet,
        };

        // Single atomic insert; the unique (author_id, title_id) index is
        // what decides the concurrent-duplicate race.
        let inserted = active.insert(&*self.db).await.map_err(map_insert_err)?;

        let username = self.username_of(inserted.author_id).await?;
        Ok(to_domain(inserted, username))
    }

    async fn update(
        &self,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Review, ReviewRepositoryError> {
        let model = ReviewEntity::find_by_id(review_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(ReviewRepositoryError::ReviewNotFound)?;

        let mut active: ReviewActiveModel = model.into();
        if let Some(text) = patch.text {
            active.text = Set(text);
        }
        if let Some(score) = patch.score {
            active.score = Set(score);
        }

        let updated = active.update(&*self.db).await.map_err(map_db_err)?;

        let username = self.username_of(updated.author_id).await?;
        Ok(to_domain(updated, username))
    }

    async fn delete(&self, review_id: Uuid) -> Result<(), ReviewRepositoryError> {
        let model = ReviewEntity::find_by_id(review_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(ReviewRepositoryError::ReviewNotFound)?;

        // Comments go with it via FK cascade.
        model.delete(&*self.db).await.map_err(map_db_err)?;
        Ok(())
    }
}
