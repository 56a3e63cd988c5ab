use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};

use crate::{Category, CreateCategoryCmd, ResultLedger, categories};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a category. A parent, if given, must already exist and belong
    /// to the same user.
    pub async fn create_category(&self, cmd: CreateCategoryCmd) -> ResultLedger<Category> {
        let category = Category::new(cmd.user_id, cmd.name, cmd.kind, cmd.color, cmd.parent_id)?;
        with_tx!(self, |db_tx| {
            if let Some(parent_id) = category.parent_id {
                self.require_category(&db_tx, &category.user_id, parent_id)
                    .await?;
            }
            categories::ActiveModel::from(&category).insert(&db_tx).await?;
            Ok(category)
        })
    }

    /// Lists a user's categories by name.
    pub async fn list_categories(&self, user_id: &str) -> ResultLedger<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }
}
