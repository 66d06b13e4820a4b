use std::collections::HashMap;

use diesel::dsl::{count_star, exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use crate::domain::category::{
    Category as DomainCategory, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory,
};
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, RepositoryError, RepositoryResult,
};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: &str) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id))
            .select(DbCategory::as_select())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        match category {
            Some(category) => {
                let product_count = count_products_in(&mut conn, id)?;
                Ok(Some(category.into_domain(product_count)?))
            }
            None => Ok(None),
        }
    }

    fn list_categories(&self) -> RepositoryResult<Vec<DomainCategory>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let rows = categories::table
            .order(categories::created_at.desc())
            .select(DbCategory::as_select())
            .load::<DbCategory>(&mut conn)?;

        let counts: HashMap<String, i64> = products::table
            .filter(products::category_id.is_not_null())
            .group_by(products::category_id)
            .select((products::category_id, count_star()))
            .load::<(Option<String>, i64)>(&mut conn)?
            .into_iter()
            .filter_map(|(category_id, count)| category_id.map(|id| (id, count)))
            .collect();

        rows.into_iter()
            .map(|row| {
                let product_count = counts.get(&row.id).copied().unwrap_or(0);
                row.into_domain(product_count).map_err(RepositoryError::from)
            })
            .collect()
    }

    fn count_category_products(&self, id: &str) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;
        count_products_in(&mut conn, id)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, new_category: &DomainNewCategory) -> RepositoryResult<String> {
        use crate::schema::categories;

        require_text(&new_category.name, "category name is required")?;
        require_text(&new_category.description, "category description is required")?;
        if new_category
            .description_points
            .iter()
            .all(|point| point.trim().is_empty())
        {
            return Err(RepositoryError::Validation(
                "at least one description point is required".to_string(),
            ));
        }

        let mut conn = self.conn()?;

        let id = Uuid::new_v4().to_string();
        let insertable = DbNewCategory::from_domain(&id, new_category)?;

        diesel::insert_into(categories::table)
            .values(&insertable)
            .execute(&mut conn)?;

        Ok(id)
    }

    fn update_category(&self, id: &str, updates: &DomainUpdateCategory) -> RepositoryResult<()> {
        use crate::schema::categories;

        if let Some(name) = &updates.name {
            require_text(name, "category name cannot be empty")?;
        }
        if let Some(description) = &updates.description {
            require_text(description, "category description cannot be empty")?;
        }

        let mut conn = self.conn()?;

        ensure_category_exists(&mut conn, id)?;

        if updates.is_empty() {
            return Ok(());
        }

        let changeset = UpdateCategory::try_from(updates)?;

        diesel::update(categories::table.filter(categories::id.eq(id)))
            .set(&changeset)
            .execute(&mut conn)?;

        Ok(())
    }

    fn delete_category(&self, id: &str) -> RepositoryResult<()> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let product_count = count_products_in(&mut conn, id)?;
        if product_count > 0 {
            return Err(RepositoryError::CategoryInUse(product_count));
        }

        let deleted = diesel::delete(categories::table.filter(categories::id.eq(id)))
            .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Fail with [`RepositoryError::NotFound`] unless the category exists.
pub(crate) fn ensure_category_exists(
    conn: &mut SqliteConnection,
    category_id: &str,
) -> RepositoryResult<()> {
    use crate::schema::categories;

    let exists = select(exists(
        categories::table.filter(categories::id.eq(category_id)),
    ))
    .get_result::<bool>(conn)?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

fn count_products_in(conn: &mut SqliteConnection, category_id: &str) -> RepositoryResult<i64> {
    use crate::schema::products;

    let count = products::table
        .filter(products::category_id.eq(category_id))
        .count()
        .get_result::<i64>(conn)?;

    Ok(count)
}

fn require_text(value: &str, message: &str) -> RepositoryResult<()> {
    if value.trim().is_empty() {
        Err(RepositoryError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}
