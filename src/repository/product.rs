use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductLink, ProductListQuery,
    ProductSummary as DomainProductSummary, UpdateProduct as DomainUpdateProduct,
    generate_link, is_partial_id, product_id_from_slug,
};
use crate::models::product::{
    CategoryCopy, NewProduct as DbNewProduct, Product as DbProduct,
    ProductSummary as DbProductSummary, UpdateProduct,
};
use crate::repository::category::ensure_category_exists;
use crate::repository::{
    DieselRepository, ProductReader, ProductWriter, RepositoryError, RepositoryResult,
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: &str) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        if let Some(product) = load_product(&mut conn, id)? {
            return Ok(Some(product));
        }

        if !is_partial_id(id) {
            return Ok(None);
        }

        // Shortened ids resolve against the tail of stored ids; newest wins.
        let resolved = products::table
            .filter(products::id.like(format!("%{id}")))
            .order(products::created_at.desc())
            .select(products::id)
            .first::<String>(&mut conn)
            .optional()?;

        match resolved {
            Some(full_id) => load_product(&mut conn, &full_id),
            None => Ok(None),
        }
    }

    fn get_product_by_slug(&self, slug: &str) -> RepositoryResult<Option<DomainProduct>> {
        self.get_product_by_id(&product_id_from_slug(slug))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<Vec<DomainProductSummary>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;

        let rows = products::table
            .left_join(categories::table)
            .select((
                products::id,
                products::old_name,
                products::new_name,
                products::created_at,
                products::generated_link,
                products::total_clicks,
                products::domain,
                categories::name.nullable(),
            ))
            .order(products::created_at.desc())
            .limit(query.limit)
            .offset(query.offset)
            .load::<DbProductSummary>(&mut conn)?;

        Ok(rows.into_iter().map(DomainProductSummary::from).collect())
    }

    fn count_products(&self) -> RepositoryResult<i64> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let total = products::table.count().get_result::<i64>(&mut conn)?;

        Ok(total)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<ProductLink> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        validate_category(&mut conn, &new_product.category_id)?;

        let id = Uuid::new_v4().to_string();
        let generated_link = generate_link(&self.link_base, &new_product.old_name, &id);
        let insertable = DbNewProduct::from_domain(&id, &generated_link, new_product)?;

        diesel::insert_into(products::table)
            .values(&insertable)
            .execute(&mut conn)?;

        Ok(ProductLink { id, generated_link })
    }

    fn update_product(
        &self,
        id: &str,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<ProductLink> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let exists = select(exists(products::table.filter(products::id.eq(id))))
            .get_result::<bool>(&mut conn)?;
        if !exists {
            return Err(RepositoryError::NotFound);
        }

        if let Some(category_id) = &updates.category_id {
            validate_category(&mut conn, category_id)?;
        }

        if !updates.is_empty() {
            let generated_link = updates
                .old_name
                .as_deref()
                .map(|old_name| generate_link(&self.link_base, old_name, id));
            let changeset = UpdateProduct::from_domain(updates, generated_link.as_deref())?;

            diesel::update(products::table.filter(products::id.eq(id)))
                .set(&changeset)
                .execute(&mut conn)?;
        }

        let generated_link = products::table
            .filter(products::id.eq(id))
            .select(products::generated_link)
            .first::<String>(&mut conn)?;

        Ok(ProductLink {
            id: id.to_string(),
            generated_link,
        })
    }

    fn delete_product(&self, id: &str) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(products::table.filter(products::id.eq(id)))
            .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn load_product(conn: &mut SqliteConnection, id: &str) -> RepositoryResult<Option<DomainProduct>> {
    use crate::schema::{categories, products};

    let row = products::table
        .left_join(categories::table)
        .filter(products::id.eq(id))
        .select((
            DbProduct::as_select(),
            categories::name.nullable(),
            categories::description.nullable(),
            categories::description_points.nullable(),
        ))
        .first::<(DbProduct, Option<String>, Option<String>, Option<String>)>(conn)
        .optional()?;

    match row {
        Some((product, name, description, description_points)) => {
            let category = CategoryCopy {
                name,
                description,
                description_points,
            };
            Ok(Some(product.into_domain(category)?))
        }
        None => Ok(None),
    }
}

/// Products may only point at categories that exist right now.
fn validate_category(conn: &mut SqliteConnection, category_id: &str) -> RepositoryResult<()> {
    match ensure_category_exists(conn, category_id) {
        Err(RepositoryError::NotFound) => Err(RepositoryError::InvalidCategory),
        other => other,
    }
}
