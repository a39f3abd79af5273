use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::modules::catalog::application::domain::entities::Classifier;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Classifier {
    fn from(model: Model) -> Self {
        Classifier {
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    }
}
