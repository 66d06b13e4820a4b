use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductLink, ProductListQuery, ProductSummary};
use crate::forms::products::{ProductForm, ProductFormError, ProductUploads};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::errors::log_repository_error;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::{ImageStore, StorageError};

/// Query parameters accepted by the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One page of the product listing together with the overall count.
#[derive(Debug, Serialize)]
pub struct ProductsPage {
    pub total: i64,
    pub products: Vec<ProductSummary>,
}

/// Loads a page of products, newest first.
pub fn load_products<R>(repo: &R, query: ProductsQuery) -> ServiceResult<ProductsPage>
where
    R: ProductReader + ?Sized,
{
    let defaults = ProductListQuery::new();
    let list_query = defaults.paginate(
        query.limit.unwrap_or(defaults.limit),
        query.offset.unwrap_or(defaults.offset),
    );

    let total = repo
        .count_products()
        .map_err(|err| log_repository_error("Failed to count products", err))?;
    let products = repo
        .list_products(list_query)
        .map_err(|err| log_repository_error("Failed to list products", err))?;

    Ok(ProductsPage { total, products })
}

/// Loads a product by full or shortened id.
pub fn load_product<R>(repo: &R, product_id: &str) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)
        .map_err(|err| log_repository_error("Failed to load product", err))?
        .ok_or(ServiceError::NotFound)
}

/// Stores the uploaded images and creates the product they belong to.
pub fn create_product<R>(
    repo: &R,
    store: &ImageStore,
    form: ProductForm,
    uploads: ProductUploads,
) -> ServiceResult<ProductLink>
where
    R: ProductWriter + ?Sized,
{
    let images = uploads.store(store).map_err(form_error)?;
    let new_product = form.into_new_product(images).map_err(form_error)?;

    let link = repo
        .create_product(&new_product)
        .map_err(|err| log_repository_error("Failed to create product", err))?;

    log::info!(
        "Created product {} `{}` -> `{}`",
        link.id,
        new_product.old_name,
        new_product.new_name
    );

    Ok(link)
}

/// Applies a partial update, merging kept and newly uploaded images.
pub fn modify_product<R>(
    repo: &R,
    store: &ImageStore,
    product_id: &str,
    form: ProductForm,
    uploads: ProductUploads,
) -> ServiceResult<ProductLink>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let current = load_product(repo, product_id)?;

    let images = uploads.store(store).map_err(form_error)?;
    let update = form
        .into_update_product(images, &current)
        .map_err(form_error)?;

    repo.update_product(&current.id, &update)
        .map_err(|err| log_repository_error("Failed to update product", err))
}

/// Deletes a product together with its visit records.
pub fn remove_product<R>(repo: &R, product_id: &str) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    repo.delete_product(product_id)
        .map_err(|err| log_repository_error("Failed to delete product", err))?;

    log::info!("Deleted product {product_id}");

    Ok(())
}

fn form_error(err: ProductFormError) -> ServiceError {
    match err {
        ProductFormError::Storage(StorageError::Io(io)) => {
            log::error!("Failed to store product image: {io}");
            ServiceError::Internal
        }
        other => ServiceError::Form(other.to_string()),
    }
}
