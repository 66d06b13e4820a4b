use crate::domain::category::Category;
use crate::forms::categories::{AddCategoryForm, EditCategoryForm};
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::errors::log_repository_error;
use crate::services::{ServiceError, ServiceResult};

/// Lists every category, newest first, with its product count.
pub fn load_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    repo.list_categories()
        .map_err(|err| log_repository_error("Failed to list categories", err))
}

/// Loads a single category.
pub fn load_category<R>(repo: &R, category_id: &str) -> ServiceResult<Category>
where
    R: CategoryReader + ?Sized,
{
    repo.get_category_by_id(category_id)
        .map_err(|err| log_repository_error("Failed to load category", err))?
        .ok_or(ServiceError::NotFound)
}

/// Creates a category and returns its id.
pub fn create_category<R>(repo: &R, form: AddCategoryForm) -> ServiceResult<String>
where
    R: CategoryWriter + ?Sized,
{
    let new_category = form
        .into_new_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let id = repo
        .create_category(&new_category)
        .map_err(|err| log_repository_error("Failed to create category", err))?;

    log::info!("Created category {id} `{}`", new_category.name);

    Ok(id)
}

/// Applies a partial update to an existing category.
pub fn modify_category<R>(repo: &R, category_id: &str, form: EditCategoryForm) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    let update = form
        .into_update_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_category(category_id, &update)
        .map_err(|err| log_repository_error("Failed to update category", err))
}

/// Deletes a category that no product references.
pub fn remove_category<R>(repo: &R, category_id: &str) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    repo.delete_category(category_id)
        .map_err(|err| log_repository_error("Failed to delete category", err))?;

    log::info!("Deleted category {category_id}");

    Ok(())
}
