use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::application::domain::entities::User;
use crate::modules::auth::application::ports::outgoing::{UserQuery, UserQueryError};
use crate::shared::pagination::{Page, PageRequest};

use super::sea_orm_entity::users::{Column, Entity, Model};

#[derive(Clone)]
pub struct UserQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn map_db_err(e: sea_orm::DbErr) -> UserQueryError {
    UserQueryError::DatabaseError(e.to_string())
}

fn into_domain(model: Model) -> Result<User, UserQueryError> {
    model.into_domain().map_err(UserQueryError::DatabaseError)
}

#[async_trait]
impl UserQuery for UserQueryPostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserQueryError> {
        Entity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .map(into_domain)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserQueryError> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .map(into_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserQueryError> {
        Entity::find()
            .filter(Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
            .map(into_domain)
            .transpose()
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, UserQueryError> {
        let mut query = Entity::find();

        if let Some(search) = search {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(Expr::col(Column::Username).ilike(&pattern));
        }

        query = query.order_by_asc(Column::Username);

        let total = query.clone().count(&*self.db).await.map_err(map_db_err)?;

        let models = query
            .offset(page.offset)
            .limit(page.limit)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        let items: Result<Vec<User>, UserQueryError> =
            models.into_iter().map(into_domain).collect();

        Ok(Page {
            items: items?,
            total,
        })
    }
}
