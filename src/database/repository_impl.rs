use tokio::sync::RwLock;

use crate::database::repository_traits::{EntityWithId, Mutation};
use crate::middleware::error::{AppError, AppResult};

/// Ordered in-memory table. Records keep insertion order.
#[derive(Debug)]
pub struct Repository<E> {
    pub table_name: &'static str,
    records: RwLock<Vec<E>>,
}

impl<E> Repository<E>
where
    E: EntityWithId + Clone + Send + Sync,
{
    pub fn new(table_name: &'static str) -> Self {
        Repository {
            table_name,
            records: RwLock::new(vec![]),
        }
    }

    fn not_found(&self, id: &str) -> AppError {
        AppError::EntityFailIdNotFound {
            ident: format!("{}:{}", self.table_name, id),
        }
    }

    pub async fn create_entity(&self, entity: E) -> AppResult<E> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id_str() == entity.id_str()) {
            return Err(AppError::Generic {
                description: format!("{}:{} already exists", self.table_name, entity.id_str()),
            });
        }
        records.push(entity.clone());
        Ok(entity)
    }

    pub async fn select_by_id(&self, id: &str) -> AppResult<E> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id_str() == id)
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn find<P>(&self, predicate: P) -> Option<E>
    where
        P: Fn(&E) -> bool,
    {
        self.records.read().await.iter().find(|r| predicate(r)).cloned()
    }

    pub async fn filter<P>(&self, predicate: P) -> Vec<E>
    where
        P: Fn(&E) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    pub async fn count<P>(&self, predicate: P) -> usize
    where
        P: Fn(&E) -> bool,
    {
        self.records.read().await.iter().filter(|r| predicate(r)).count()
    }

    pub async fn update_entity(&self, id: &str, mutation: Mutation<E>) -> AppResult<E> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id_str() == id)
            .ok_or_else(|| self.not_found(id))?;
        let mut updated = record.clone();
        mutation(&mut updated)?;
        *record = updated.clone();
        Ok(updated)
    }

    /// Applies `f` to every record matching `predicate`, returns how many changed.
    pub async fn update_where<P, F>(&self, predicate: P, mut f: F) -> usize
    where
        P: Fn(&E) -> bool,
        F: FnMut(&mut E),
    {
        let mut records = self.records.write().await;
        let mut changed = 0;
        for record in records.iter_mut().filter(|r| predicate(r)) {
            f(record);
            changed += 1;
        }
        changed
    }

    pub async fn replace_all(&self, entities: Vec<E>) {
        *self.records.write().await = entities;
    }
}
