use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::catalog::application::domain::entities::Classifier;
use crate::modules::catalog::application::ports::outgoing::{
    ClassifierRepository, ClassifierRepositoryError, NewClassifier,
};
use crate::shared::pagination::{Page, PageRequest};

use super::sea_orm_entity::{categories, genres};

fn map_insert_err(e: sea_orm::DbErr) -> ClassifierRepositoryError {
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("23505")
        || err_str.contains("duplicate key")
        || err_str.contains("unique constraint")
    {
        return ClassifierRepositoryError::AlreadyExists;
    }
    ClassifierRepositoryError::DatabaseError(e.to_string())
}

fn map_db_err(e: sea_orm::DbErr) -> ClassifierRepositoryError {
    ClassifierRepositoryError::DatabaseError(e.to_string())
}

/// Category store. `ON DELETE SET NULL` on `titles.category_id` keeps
/// referencing titles alive when a category is removed.
#[derive(Clone)]
pub struct CategoryRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClassifierRepository for CategoryRepositoryPostgres {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ClassifierRepositoryError> {
        let mut query = categories::Entity::find();

        if let Some(search) = search {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(Expr::col(categories::Column::Name).ilike(&pattern));
        }

        query = query.order_by_asc(categories::Column::Name);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;
        let models = query
            .offset(page.offset)
            .limit(page.limit)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: models.into_iter().map(Classifier::from).collect(),
            total,
        })
    }

    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Classifier>, ClassifierRepositoryError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Classifier::from))
    }

    async fn create(&self, new: NewClassifier) -> Result<Classifier, ClassifierRepositoryError> {
        let active = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            slug: Set(new.slug),
        };

        let inserted = active.insert(&*self.db).await.map_err(map_insert_err)?;
        Ok(Classifier::from(inserted))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), ClassifierRepositoryError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(ClassifierRepositoryError::NotFound)?;

        model.delete(&*self.db).await.map_err(map_db_err)?;
        Ok(())
    }
}

/// Genre store. Deleting a genre nulls the genre side of its join rows.
#[derive(Clone)]
pub struct GenreRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl GenreRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClassifierRepository for GenreRepositoryPostgres {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ClassifierRepositoryError> {
        let mut query = genres::Entity::find();

        if let Some(search) = search {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(Expr::col(genres::Column::Name).ilike(&pattern));
        }

        query = query.order_by_asc(genres::Column::Name);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;
        let models = query
            .offset(page.offset)
            .limit(page.limit)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: models.into_iter().map(Classifier::from).collect(),
            total,
        })
    }

    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Classifier>, ClassifierRepositoryError> {
        let model = genres::Entity::find()
            .filter(genres::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;
        Ok(model.map(Classifier::from))
    }

    async fn create(&self, new: NewClassifier) -> Result<Classifier, ClassifierRepositoryError> {
        let active = genres::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            slug: Set(new.slug),
        };

        let inserted = active.insert(&*self.db).await.map_err(map_insert_err)?;
        Ok(Classifier::from(inserted))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), ClassifierRepositoryError> {
        let model = genres::Entity::find()
            .filter(genres::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(ClassifierRepositoryError::NotFound)?;

        model.delete(&*self.db).await.map_err(map_db_err)?;
        Ok(())
    }
}
