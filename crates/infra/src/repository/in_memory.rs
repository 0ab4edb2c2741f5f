use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use courselib_auth::{User, UserRepository};
use courselib_core::{Entity, Repository, RepositoryError};

/// In-memory repository keyed by entity id.
///
/// Intended for tests/dev. `list` is ordered because the map is.
#[derive(Debug)]
pub struct InMemoryRepository<E: Entity> {
    entries: RwLock<BTreeMap<E::Id, E>>,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Entity + Clone + Send + Sync + 'static,
{
    async fn find(&self, id: &E::Id) -> Result<Option<E>, RepositoryError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, RepositoryError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.values().cloned().collect())
    }

    async fn save(&self, entity: E) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(entity.id().clone(), entity);
        Ok(())
    }

    async fn delete(&self, id: &E::Id) -> Result<bool, RepositoryError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        Ok(entries.remove(id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: User) -> Result<(), RepositoryError> {
        // Check and insert under one write lock so concurrent sign-ups cannot both win.
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if entries.contains_key(&user.id) {
            return Err(RepositoryError::Conflict(format!("user id '{}' already exists", user.id)));
        }
        if entries.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!("email '{}' is already registered", user.email)));
        }
        entries.insert(user.id, user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courselib_auth::{PasswordHash, Role, RoleSet};
    use courselib_core::{Course, CourseDetails, CourseId, UserId};

    fn course(title: &str) -> Course {
        let details = CourseDetails {
            title: title.to_string(),
            description: String::new(),
            author: "Ada".to_string(),
        };
        Course::create(CourseId::new(), details, Utc::now()).unwrap()
    }

    fn user(email: &str) -> User {
        User::register(
            UserId::new(),
            email,
            PasswordHash::from_encoded("pbkdf2-sha256$1$AAAA$AAAA"),
            RoleSet::single(Role::User),
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_find_delete() {
        let repo = InMemoryRepository::<Course>::new();
        let c = course("Rust");
        let id = c.id;

        repo.save(c.clone()).await.unwrap();
        assert_eq!(repo.find(&id).await.unwrap(), Some(c));

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
        assert_eq!(repo.find(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let repo = InMemoryRepository::<Course>::new();
        for title in ["a", "b", "c"] {
            repo.save(course(title)).await.unwrap();
        }
        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn insert_rejects_taken_email() {
        let repo = InMemoryRepository::<User>::new();
        repo.insert(user("alice@example.com")).await.unwrap();

        let err = repo.insert(user("ALICE@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn find_by_email_matches_normalized_address() {
        let repo = InMemoryRepository::<User>::new();
        let alice = user("alice@example.com");
        repo.insert(alice.clone()).await.unwrap();

        assert_eq!(repo.find_by_email("alice@example.com").await.unwrap(), Some(alice));
        assert_eq!(repo.find_by_email("bob@example.com").await.unwrap(), None);
    }
}
