use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::access::{MethodClass, Policy};
use crate::modules::auth::application::domain::entities::User;
use crate::modules::catalog::application::domain::entities::{
    validate_title_name, validate_year, Title,
};
use crate::modules::catalog::application::ports::outgoing::{
    NewTitle, TitleFilter, TitlePatch, TitleRepository, TitleRepositoryError,
};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Clone, thiserror::Error)]
pub enum TitleError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Caller is not allowed to modify the catalog")]
    Forbidden,

    #[error("{0}")]
    InvalidName(String),

    #[error("{0}")]
    InvalidYear(String),

    #[error("Title not found")]
    NotFound,

    #[error("Unknown category slug: {0}")]
    UnknownCategory(String),

    #[error("Unknown genre slug: {0}")]
    UnknownGenre(String),

    #[error("Repository error: {0}")]
    RepositoryError(TitleRepositoryError),
}

impl From<TitleRepositoryError> for TitleError {
    fn from(e: TitleRepositoryError) -> Self {
        match e {
            TitleRepositoryError::NotFound => TitleError::NotFound,
            TitleRepositoryError::UnknownCategory(slug) => TitleError::UnknownCategory(slug),
            TitleRepositoryError::UnknownGenre(slug) => TitleError::UnknownGenre(slug),
            other => TitleError::RepositoryError(other),
        }
    }
}

#[async_trait]
pub trait ITitleUseCase: Send + Sync {
    /// Public read; every returned title carries its rating computed from
    /// the reviews as they are at this moment.
    async fn list(&self, filter: TitleFilter, page: PageRequest)
        -> Result<Page<Title>, TitleError>;

    async fn get(&self, title_id: Uuid) -> Result<Title, TitleError>;

    async fn create(&self, caller: Option<&User>, input: NewTitle) -> Result<Title, TitleError>;

    async fn update(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        patch: TitlePatch,
    ) -> Result<Title, TitleError>;

    async fn delete(&self, caller: Option<&User>, title_id: Uuid) -> Result<(), TitleError>;
}

pub struct TitleUseCase<R>
where
    R: TitleRepository,
{
    repository: R,
}

impl<R> TitleUseCase<R>
where
    R: TitleRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    fn authorize(caller: Option<&User>, method: MethodClass) -> Result<(), TitleError> {
        if Policy::AdminOrReadOnly.allows(caller, method, None) {
            Ok(())
        } else if caller.is_none() {
            Err(TitleError::Unauthenticated)
        } else {
            Err(TitleError::Forbidden)
        }
    }
}

#[async_trait]
impl<R> ITitleUseCase for TitleUseCase<R>
where
    R: TitleRepository,
{
    async fn list(
        &self,
        filter: TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, TitleError> {
        Ok(self.repository.list(filter, page).await?)
    }

    async fn get(&self, title_id: Uuid) -> Result<Title, TitleError> {
        self.repository
            .find_by_id(title_id)
            .await?
            .ok_or(TitleError::NotFound)
    }

    async fn create(&self, caller: Option<&User>, input: NewTitle) -> Result<Title, TitleError> {
        Self::authorize(caller, MethodClass::Unsafe)?;

        validate_title_name(&input.name).map_err(TitleError::InvalidName)?;
        validate_year(input.year).map_err(TitleError::InvalidYear)?;

        Ok(self.repository.create(input).await?)
    }

    async fn update(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        patch: TitlePatch,
    ) -> Result<Title, TitleError> {
        Self::authorize(caller, MethodClass::Unsafe)?;

        if let Some(name) = &patch.name {
            validate_title_name(name).map_err(TitleError::InvalidName)?;
        }
        if let Some(year) = patch.year {
            validate_year(year).map_err(TitleError::InvalidYear)?;
        }

        Ok(self.repository.update(title_id, patch).await?)
    }

    async fn delete(&self, caller: Option<&User>, title_id: Uuid) -> Result<(), TitleError> {
        Self::authorize(caller, MethodClass::Unsafe)?;

        Ok(self.repository.delete(title_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::application::domain::entities::Role;
    use crate::modules::catalog::application::domain::entities::Classifier;
    use chrono::Utc;
    use std::sync::Mutex;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: "caller".to_string(),
            email: "caller@example.com".to_string(),
            role,
            bio: None,
            first_name: None,
            last_name: None,
            is_superuser: false,
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    /// Store with a fixed category/genre vocabulary.
    struct InMemoryTitles {
        titles: Mutex<Vec<Title>>,
        categories: Vec<Classifier>,
        genres: Vec<Classifier>,
    }

    impl InMemoryTitles {
        fn new() -> Self {
            Self {
                titles: Mutex::new(Vec::new()),
                categories: vec![Classifier {
                    id: Uuid::new_v4(),
                    name: "Films".to_string(),
                    slug: "films".to_string(),
                }],
                genres: vec![Classifier {
                    id: Uuid::new_v4(),
                    name: "Drama".to_string(),
                    slug: "drama".to_string(),
                }],
            }
        }
    }

    #[async_trait]
    impl TitleRepository for &InMemoryTitles {
        async fn find_by_id(
            &self,
            title_id: Uuid,
        ) -> Result<Option<Title>, TitleRepositoryError> {
            Ok(self
                .titles
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == title_id)
                .cloned())
        }

        async fn list(
            &self,
            filter: TitleFilter,
            _page: PageRequest,
        ) -> Result<Page<Title>, TitleRepositoryError> {
            let items: Vec<Title> = self
                .titles
                .lock()
                .unwrap()
                .iter()
                .filter(|t| {
                    filter
                        .year
                        .map_or(true, |y| t.year == y)
                        && filter.name.as_deref().map_or(true, |n| {
                            t.name.to_lowercase().contains(&n.to_lowercase())
                        })
                        && filter.category_slug.as_deref().map_or(true, |slug| {
                            t.category.as_ref().is_some_and(|c| c.slug == slug)
                        })
                        && filter.genre_slug.as_deref().map_or(true, |slug| {
                            t.genres.iter().any(|g| g.slug == slug)
                        })
                })
                .cloned()
                .collect();
            let total = items.len() as u64;
            Ok(Page { items, total })
        }

        async fn create(&self, new: NewTitle) -> Result<Title, TitleRepositoryError> {
            let category = match &new.category_slug {
                Some(slug) => Some(
                    self.categories
                        .iter()
                        .find(|c| &c.slug == slug)
                        .cloned()
                        .ok_or_else(|| TitleRepositoryError::UnknownCategory(slug.clone()))?,
                ),
                None => None,
            };
            let mut genres = Vec::new();
            for slug in &new.genre_slugs {
                genres.push(
                    self.genres
                        .iter()
                        .find(|g| &g.slug == slug)
                        .cloned()
                        .ok_or_else(|| TitleRepositoryError::UnknownGenre(slug.clone()))?,
                );
            }
            let created = Title {
                id: Uuid::new_v4(),
                name: new.name,
                year: new.year,
                description: new.description,
                category,
                genres,
                rating: None,
            };
            self.titles.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(
            &self,
            title_id: Uuid,
            patch: TitlePatch,
        ) -> Result<Title, TitleRepositoryError> {
            let mut titles = self.titles.lock().unwrap();
            let title = titles
                .iter_mut()
                .find(|t| t.id == title_id)
                .ok_or(TitleRepositoryError::NotFound)?;
            if let Some(name) = patch.name {
                title.name = name;
            }
            if let Some(year) = patch.year {
                title.year = year;
            }
            Ok(title.clone())
        }

        async fn delete(&self, title_id: Uuid) -> Result<(), TitleRepositoryError> {
            let mut titles = self.titles.lock().unwrap();
            let before = titles.len();
            titles.retain(|t| t.id != title_id);
            if titles.len() == before {
                return Err(TitleRepositoryError::NotFound);
            }
            Ok(())
        }
    }

    fn new_title(name: &str, year: i32) -> NewTitle {
        NewTitle {
            name: name.to_string(),
            year,
            description: None,
            category_slug: Some("films".to_string()),
            genre_slugs: vec!["drama".to_string()],
        }
    }

    #[tokio::test]
    async fn admin_creates_title_with_references() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let admin = user(Role::Admin);

        let title = uc
            .create(Some(&admin), new_title("Solaris", 1972))
            .await
            .unwrap();

        assert_eq!(title.name, "Solaris");
        assert_eq!(title.category.as_ref().unwrap().slug, "films");
        assert_eq!(title.genres.len(), 1);
        assert!(title.rating.is_none());
    }

    #[tokio::test]
    async fn future_year_is_rejected() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let admin = user(Role::Admin);

        let result = uc.create(Some(&admin), new_title("Solaris", 3000)).await;
        assert!(matches!(result, Err(TitleError::InvalidYear(_))));

        // Nothing was persisted.
        assert_eq!(
            uc.list(TitleFilter::default(), PageRequest::default())
                .await
                .unwrap()
                .total,
            0
        );
    }

    #[tokio::test]
    async fn past_year_is_accepted() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let admin = user(Role::Admin);

        assert!(uc.create(Some(&admin), new_title("Solaris", 2020)).await.is_ok());
    }

    #[tokio::test]
    async fn zero_year_is_rejected() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let admin = user(Role::Admin);

        let result = uc.create(Some(&admin), new_title("Prehistory", 0)).await;
        assert!(matches!(result, Err(TitleError::InvalidYear(_))));
    }

    #[tokio::test]
    async fn unknown_category_slug_is_surfaced() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let admin = user(Role::Admin);

        let mut input = new_title("Solaris", 1972);
        input.category_slug = Some("ghost".to_string());

        let result = uc.create(Some(&admin), input).await;
        assert!(matches!(result, Err(TitleError::UnknownCategory(_))));
    }

    #[tokio::test]
    async fn anonymous_write_is_unauthenticated_read_is_open() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);

        let result = uc.create(None, new_title("Solaris", 1972)).await;
        assert!(matches!(result, Err(TitleError::Unauthenticated)));

        assert!(uc
            .list(TitleFilter::default(), PageRequest::default())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn plain_user_write_is_forbidden() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let caller = user(Role::User);

        let result = uc.create(Some(&caller), new_title("Solaris", 1972)).await;
        assert!(matches!(result, Err(TitleError::Forbidden)));
    }

    #[tokio::test]
    async fn list_filters_compose() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let admin = user(Role::Admin);

        uc.create(Some(&admin), new_title("Solaris", 1972))
            .await
            .unwrap();
        let mut no_genre = new_title("Stalker", 1979);
        no_genre.genre_slugs.clear();
        no_genre.category_slug = None;
        uc.create(Some(&admin), no_genre).await.unwrap();

        let page = uc
            .list(
                TitleFilter {
                    genre_slug: Some("drama".to_string()),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Solaris");

        let page = uc
            .list(
                TitleFilter {
                    name: Some("stalk".to_string()),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Stalker");

        let page = uc
            .list(
                TitleFilter {
                    year: Some(1972),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn update_patches_only_given_fields() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let admin = user(Role::Admin);

        let title = uc
            .create(Some(&admin), new_title("Solaris", 1972))
            .await
            .unwrap();

        let updated = uc
            .update(
                Some(&admin),
                title.id,
                TitlePatch {
                    year: Some(1973),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.year, 1973);
        assert_eq!(updated.name, "Solaris");
    }

    #[tokio::test]
    async fn delete_missing_title_is_not_found() {
        let store = InMemoryTitles::new();
        let uc = TitleUseCase::new(&store);
        let admin = user(Role::Admin);

        let result = uc.delete(Some(&admin), Uuid::new_v4()).await;
        assert!(matches!(result, Err(TitleError::NotFound)));
    }
}
