use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::catalog::application::domain::entities::{Classifier, Title};
use crate::modules::catalog::application::ports::outgoing::{
    NewTitle, TitleFilter, TitlePatch, TitleRepository, TitleRepositoryError,
};
use crate::modules::reviews::adapter::outgoing::sea_orm_entity::reviews;
use crate::shared::pagination::{Page, PageRequest};

use super::sea_orm_entity::{categories, genre_titles, genres, titles};

#[derive(Clone)]
pub struct TitleRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

fn map_db_err(e: sea_orm::DbErr) -> TitleRepositoryError {
    TitleRepositoryError::DatabaseError(e.to_string())
}

/// Mean score per title. Titles with no reviews stay absent from the map,
/// which is what makes their rating null.
fn average_scores(pairs: &[(Uuid, i32)]) -> HashMap<Uuid, f64> {
    let mut sums: HashMap<Uuid, (i64, u32)> = HashMap::new();
    for (title_id, score) in pairs {
        let entry = sums.entry(*title_id).or_insert((0, 0));
        entry.0 += *score as i64;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(title_id, (sum, count))| (title_id, sum as f64 / count as f64))
        .collect()
}

impl TitleRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn resolve_category(&self, slug: &str) -> Result<categories::Model, TitleRepositoryError> {
        categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| TitleRepositoryError::UnknownCategory(slug.to_string()))
    }

    async fn resolve_genres(
        &self,
        slugs: &[String],
    ) -> Result<Vec<genres::Model>, TitleRepositoryError> {
        let mut resolved = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let genre = genres::Entity::find()
                .filter(genres::Column::Slug.eq(slug))
                .one(&*self.db)
                .await
                .map_err(map_db_err)?
                .ok_or_else(|| TitleRepositoryError::UnknownGenre(slug.to_string()))?;
            resolved.push(genre);
        }
        Ok(resolved)
    }

    async fn replace_genre_links(
        &self,
        title_id: Uuid,
        genre_ids: &[Uuid],
    ) -> Result<(), TitleRepositoryError> {
        genre_titles::Entity::delete_many()
            .filter(genre_titles::Column::TitleId.eq(title_id))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        for genre_id in genre_ids {
            let link = genre_titles::ActiveModel {
                id: Set(Uuid::new_v4()),
                genre_id: Set(Some(*genre_id)),
                title_id: Set(Some(title_id)),
            };
            link.insert(&*self.db).await.map_err(map_db_err)?;
        }
        Ok(())
    }

    /// Turn a page of rows into the read model: resolve category and genre
    /// references and compute each title's rating from its review scores.
    async fn assemble(
        &self,
        models: Vec<titles::Model>,
    ) -> Result<Vec<Title>, TitleRepositoryError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let title_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

        let category_ids: Vec<Uuid> = models.iter().filter_map(|m| m.category_id).collect();
        let categories_by_id: HashMap<Uuid, Classifier> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            categories::Entity::find()
                .filter(categories::Column::Id.is_in(category_ids))
                .all(&*self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|m| (m.id, Classifier::from(m)))
                .collect()
        };

        let links = genre_titles::Entity::find()
            .filter(genre_titles::Column::TitleId.is_in(title_ids.clone()))
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        let genre_ids: Vec<Uuid> = links.iter().filter_map(|l| l.genre_id).collect();
        let genres_by_id: HashMap<Uuid, Classifier> = if genre_ids.is_empty() {
            HashMap::new()
        } else {
            genres::Entity::find()
                .filter(genres::Column::Id.is_in(genre_ids))
                .all(&*self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|m| (m.id, Classifier::from(m)))
                .collect()
        };

        let score_pairs: Vec<(Uuid, i32)> = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::TitleId)
            .column(reviews::Column::Score)
            .filter(reviews::Column::TitleId.is_in(title_ids))
            .into_tuple()
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;
        let ratings = average_scores(&score_pairs);

        Ok(models
            .into_iter()
            .map(|model| {
                let genres: Vec<Classifier> = links
                    .iter()
                    .filter(|l| l.title_id == Some(model.id))
                    .filter_map(|l| l.genre_id)
                    .filter_map(|id| genres_by_id.get(&id).cloned())
                    .collect();

                Title {
                    id: model.id,
                    rating: ratings.get(&model.id).copied(),
                    category: model
                        .category_id
                        .and_then(|id| categories_by_id.get(&id).cloned()),
                    genres,
                    name: model.name,
                    year: model.year,
                    description: model.description,
                }
            })
            .collect())
    }
}

#[async_trait]
impl TitleRepository for TitleRepositoryPostgres {
    async fn find_by_id(&self, title_id: Uuid) -> Result<Option<Title>, TitleRepositoryError> {
        let model = titles::Entity::find_by_id(title_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let mut assembled = self.assemble(vec![model]).await?;
        Ok(assembled.pop())
    }

    async fn list(
        &self,
        filter: TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, TitleRepositoryError> {
        let mut query = titles::Entity::find();

        if let Some(slug) = &filter.category_slug {
            let category = categories::Entity::find()
                .filter(categories::Column::Slug.eq(slug))
                .one(&*self.db)
                .await
                .map_err(map_db_err)?;
            match category {
                Some(category) => {
                    query = query.filter(titles::Column::CategoryId.eq(category.id));
                }
                // Unknown slug filters everything out.
                None => {
                    return Ok(Page {
                        items: Vec::new(),
                        total: 0,
                    })
                }
            }
        }

        if let Some(slug) = &filter.genre_slug {
            let genre = genres::Entity::find()
                .filter(genres::Column::Slug.eq(slug))
                .one(&*self.db)
                .await
                .map_err(map_db_err)?;
            match genre {
                Some(genre) => {
                    let linked_title_ids: Vec<Uuid> = genre_titles::Entity::find()
                        .filter(genre_titles::Column::GenreId.eq(genre.id))
                        .select_only()
                        .column(genre_titles::Column::TitleId)
                        .into_tuple::<Option<Uuid>>()
                        .all(&*self.db)
                        .await
                        .map_err(map_db_err)?
                        .into_iter()
                        .flatten()
                        .collect();
                    query = query.filter(titles::Column::Id.is_in(linked_title_ids));
                }
                None => {
                    return Ok(Page {
                        items: Vec::new(),
                        total: 0,
                    })
                }
            }
        }

        if let Some(name) = &filter.name {
            let pattern = format!("%{}%", name.trim());
            query = query.filter(Expr::col(titles::Column::Name).ilike(&pattern));
        }

        if let Some(year) = filter.year {
            query = query.filter(titles::Column::Year.eq(year));
        }

        query = query.order_by_asc(titles::Column::Name);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;
        let models = query
            .offset(page.offset)
            .limit(page.limit)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: self.assemble(models).await?,
            total,
        })
    }

    async fn create(&self, new: NewTitle) -> Result<Title, TitleRepositoryError> {
        let category_id = match &new.category_slug {
            Some(slug) => Some(self.resolve_category(slug).await?.id),
            None => None,
        };
        let genre_ids: Vec<Uuid> = self
            .resolve_genres(&new.genre_slugs)
            .await?
            .into_iter()
            .map(|g| g.id)
            .collect();

        let active = titles::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            year: Set(new.year),
            description: Set(new.description),
            category_id: Set(category_id),
        };
        let inserted = active.insert(&*self.db).await.map_err(map_db_err)?;

        self.replace_genre_links(inserted.id, &genre_ids).await?;

        self.find_by_id(inserted.id)
            .await?
            .ok_or_else(|| TitleRepositoryError::DatabaseError("title vanished after insert".into()))
    }

    async fn update(
        &self,
        title_id: Uuid,
        patch: TitlePatch,
    ) -> Result<Title, TitleRepositoryError> {
        let model = titles::Entity::find_by_id(title_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(TitleRepositoryError::NotFound)?;

        let new_genre_ids = match &patch.genre_slugs {
            Some(slugs) => Some(
                self.resolve_genres(slugs)
                    .await?
                    .into_iter()
                    .map(|g| g.id)
                    .collect::<Vec<Uuid>>(),
            ),
            None => None,
        };

        let mut active: titles::ActiveModel = model.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(year) = patch.year {
            active.year = Set(year);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(slug) = &patch.category_slug {
            active.category_id = Set(Some(self.resolve_category(slug).await?.id));
        }

        let updated = active.update(&*self.db).await.map_err(map_db_err)?;

        if let Some(genre_ids) = new_genre_ids {
            self.replace_genre_links(updated.id, &genre_ids).await?;
        }

        self.find_by_id(updated.id)
            .await?
            .ok_or_else(|| TitleRepositoryError::DatabaseError("title vanished after update".into()))
    }

    async fn delete(&self, title_id: Uuid) -> Result<(), TitleRepositoryError> {
        let model = titles::Entity::find_by_id(title_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(TitleRepositoryError::NotFound)?;

        // Reviews and their comments go with it via FK cascade.
        model.delete(&*self.db).await.map_err(map_db_err)?;
        Ok(())
    }
}
