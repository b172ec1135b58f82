use std::sync::Arc;

use domains::{DomainError, Entity, Item, ItemRepository, NewItem, Result};
use tracing::{info, instrument};
use uuid::Uuid;

const MAX_TITLE_LEN: usize = 200;

/// Reporting and lookup of items. Claims need an item to point at; listing
/// and search live outside this backend.
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self { items }
    }

    #[instrument(skip(self, new), fields(owner_id = %new.owner_id))]
    pub async fn report_item(&self, mut new: NewItem) -> Result<Item> {
        new.title = new.title.trim().to_string();
        if new.title.is_empty() {
            return Err(DomainError::Validation("title is required".into()));
        }
        if new.title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "title exceeds {MAX_TITLE_LEN} characters"
            )));
        }

        let item = Item::from_new(new);
        self.items.create(&item).await?;
        info!(item_id = %item.id, status = %item.status, "item reported");
        Ok(item)
    }

    pub async fn get_item(&self, id: Uuid) -> Result<Item> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found(Entity::Item, id))
    }
}
