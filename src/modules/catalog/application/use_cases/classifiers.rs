use async_trait::async_trait;

use crate::modules::access::{MethodClass, Policy};
use crate::modules::auth::application::domain::entities::User;
use crate::modules::catalog::application::domain::entities::{
    validate_classifier_name, validate_slug, Classifier,
};
use crate::modules::catalog::application::ports::outgoing::{
    ClassifierRepository, ClassifierRepositoryError, NewClassifier,
};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Caller is not allowed to modify the catalog")]
    Forbidden,

    #[error("{0}")]
    InvalidName(String),

    #[error("{0}")]
    InvalidSlug(String),

    #[error("Name or slug already exists")]
    Conflict,

    #[error("Not found")]
    NotFound,

    #[error("Repository error: {0}")]
    RepositoryError(ClassifierRepositoryError),
}

impl From<ClassifierRepositoryError> for ClassifierError {
    fn from(e: ClassifierRepositoryError) -> Self {
        match e {
            ClassifierRepositoryError::AlreadyExists => ClassifierError::Conflict,
            ClassifierRepositoryError::NotFound => ClassifierError::NotFound,
            other => ClassifierError::RepositoryError(other),
        }
    }
}

/// List / create / delete for a classifier resource (the restricted verb
/// set: no item reads, no updates).
#[async_trait]
pub trait IClassifierUseCase: Send + Sync {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ClassifierError>;

    async fn create(
        &self,
        caller: Option<&User>,
        input: NewClassifier,
    ) -> Result<Classifier, ClassifierError>;

    async fn delete(&self, caller: Option<&User>, slug: &str) -> Result<(), ClassifierError>;
}

pub struct ClassifierUseCase<R>
where
    R: ClassifierRepository,
{
    repository: R,
}

impl<R> ClassifierUseCase<R>
where
    R: ClassifierRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    fn authorize(caller: Option<&User>, method: MethodClass) -> Result<(), ClassifierError> {
        if Policy::AdminOrReadOnly.allows(caller, method, None) {
            Ok(())
        } else if caller.is_none() {
            Err(ClassifierError::Unauthenticated)
        } else {
            Err(ClassifierError::Forbidden)
        }
    }
}

#[async_trait]
impl<R> IClassifierUseCase for ClassifierUseCase<R>
where
    R: ClassifierRepository,
{
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ClassifierError> {
        Ok(self.repository.list(search, page).await?)
    }

    async fn create(
        &self,
        caller: Option<&User>,
        input: NewClassifier,
    ) -> Result<Classifier, ClassifierError> {
        Self::authorize(caller, MethodClass::Unsafe)?;

        validate_classifier_name(&input.name).map_err(ClassifierError::InvalidName)?;
        validate_slug(&input.slug).map_err(ClassifierError::InvalidSlug)?;

        Ok(self.repository.create(input).await?)
    }

    async fn delete(&self, caller: Option<&User>, slug: &str) -> Result<(), ClassifierError> {
        Self::authorize(caller, MethodClass::Unsafe)?;

        Ok(self.repository.delete_by_slug(slug).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::application::domain::entities::Role;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

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

    #[derive(Default)]
    struct InMemoryClassifiers {
        items: Mutex<Vec<Classifier>>,
    }

    #[async_trait]
    impl ClassifierRepository for &InMemoryClassifiers {
        async fn list(
            &self,
            search: Option<&str>,
            _page: PageRequest,
        ) -> Result<Page<Classifier>, ClassifierRepositoryError> {
            let items: Vec<Classifier> = self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|c| search.map_or(true, |s| c.name.contains(s)))
                .cloned()
                .collect();
            let total = items.len() as u64;
            Ok(Page { items, total })
        }

        async fn find_by_slug(
            &self,
            slug: &str,
        ) -> Result<Option<Classifier>, ClassifierRepositoryError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.slug == slug)
                .cloned())
        }

        async fn create(
            &self,
            new: NewClassifier,
        ) -> Result<Classifier, ClassifierRepositoryError> {
            let mut items = self.items.lock().unwrap();
            if items.iter().any(|c| c.slug == new.slug || c.name == new.name) {
                return Err(ClassifierRepositoryError::AlreadyExists);
            }
            let created = Classifier {
                id: Uuid::new_v4(),
                name: new.name,
                slug: new.slug,
            };
            items.push(created.clone());
            Ok(created)
        }

        async fn delete_by_slug(&self, slug: &str) -> Result<(), ClassifierRepositoryError> {
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|c| c.slug != slug);
            if items.len() == before {
                return Err(ClassifierRepositoryError::NotFound);
            }
            Ok(())
        }
    }

    fn new_classifier(name: &str, slug: &str) -> NewClassifier {
        NewClassifier {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn anyone_can_list() {
        let store = InMemoryClassifiers::default();
        let uc = ClassifierUseCase::new(&store);

        let page = uc.list(None, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn admin_can_create_and_delete() {
        let store = InMemoryClassifiers::default();
        let uc = ClassifierUseCase::new(&store);
        let admin = user(Role::Admin);

        let created = uc
            .create(Some(&admin), new_classifier("Films", "films"))
            .await
            .unwrap();
        assert_eq!(created.slug, "films");

        uc.delete(Some(&admin), "films").await.unwrap();
        assert_eq!(uc.list(None, PageRequest::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn anonymous_write_is_unauthenticated() {
        let store = InMemoryClassifiers::default();
        let uc = ClassifierUseCase::new(&store);

        let result = uc.create(None, new_classifier("Films", "films")).await;
        assert!(matches!(result, Err(ClassifierError::Unauthenticated)));
    }

    #[tokio::test]
    async fn plain_user_write_is_forbidden() {
        let store = InMemoryClassifiers::default();
        let uc = ClassifierUseCase::new(&store);
        let caller = user(Role::User);

        let result = uc
            .create(Some(&caller), new_classifier("Films", "films"))
            .await;
        assert!(matches!(result, Err(ClassifierError::Forbidden)));

        let result = uc.delete(Some(&caller), "films").await;
        assert!(matches!(result, Err(ClassifierError::Forbidden)));
    }

    #[tokio::test]
    async fn moderator_cannot_modify_catalog() {
        let store = InMemoryClassifiers::default();
        let uc = ClassifierUseCase::new(&store);
        let moderator = user(Role::Moderator);

        let result = uc
            .create(Some(&moderator), new_classifier("Films", "films"))
            .await;
        assert!(matches!(result, Err(ClassifierError::Forbidden)));
    }

    #[tokio::test]
    async fn invalid_slug_is_rejected_before_persisting() {
        let store = InMemoryClassifiers::default();
        let uc = ClassifierUseCase::new(&store);
        let admin = user(Role::Admin);

        let result = uc
            .create(Some(&admin), new_classifier("Films", "no slashes/"))
            .await;
        assert!(matches!(result, Err(ClassifierError::InvalidSlug(_))));
        assert_eq!(uc.list(None, PageRequest::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn duplicate_slug_conflicts() {
        let store = InMemoryClassifiers::default();
        let uc = ClassifierUseCase::new(&store);
        let admin = user(Role::Admin);

        uc.create(Some(&admin), new_classifier("Films", "films"))
            .await
            .unwrap();
        let result = uc
            .create(Some(&admin), new_classifier("Movies", "films"))
            .await;
        assert!(matches!(result, Err(ClassifierError::Conflict)));
    }

    #[tokio::test]
    async fn deleting_missing_slug_is_not_found() {
        let store = InMemoryClassifiers::default();
        let uc = ClassifierUseCase::new(&store);
        let admin = user(Role::Admin);

        let result = uc.delete(Some(&admin), "ghost").await;
        assert!(matches!(result, Err(ClassifierError::NotFound)));
    }
}
