use pushkind_rebrand::domain::category::{NewCategory, UpdateCategory};
use pushkind_rebrand::repository::{
    CategoryReader, CategoryWriter, ProductWriter, RepositoryError,
};

mod common;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn test_category_lifecycle() {
    let test_db = common::TestDb::new("test_category_lifecycle.db");
    let repo = test_db.repo();

    let id = repo
        .create_category(&NewCategory::new("Supplements", "d", strings(&["p1", "p2"])))
        .expect("create category");

    let category = repo
        .get_category_by_id(&id)
        .expect("get category")
        .expect("category exists");
    assert_eq!(category.name, "Supplements");
    assert_eq!(category.description_points, strings(&["p1", "p2"]));
    assert_eq!(category.product_count, 0);

    repo.delete_category(&id).expect("delete unused category");
    assert!(repo.get_category_by_id(&id).expect("get").is_none());
}

#[test]
fn test_category_keeps_first_four_points_in_order() {
    let test_db = common::TestDb::new("test_category_keeps_first_four_points_in_order.db");
    let repo = test_db.repo();

    let id = repo
        .create_category(&NewCategory::new(
            "Vitamins",
            "d",
            strings(&["c", "a", "b", "e", "d", "f"]),
        ))
        .expect("create category");

    let category = repo.get_category_by_id(&id).expect("get").expect("exists");
    assert_eq!(category.description_points, strings(&["c", "a", "b", "e"]));
}

#[test]
fn test_category_create_keeps_blank_points() {
    let test_db = common::TestDb::new("test_category_create_keeps_blank_points.db");
    let repo = test_db.repo();

    let id = repo
        .create_category(&NewCategory::new(
            "Vitamins",
            "d",
            strings(&["a", "", "b", "c", "d"]),
        ))
        .expect("create category");

    let category = repo.get_category_by_id(&id).expect("get").expect("exists");
    assert_eq!(category.description_points, strings(&["a", "", "b", "c"]));
}

#[test]
fn test_duplicate_category_name_is_rejected() {
    let test_db = common::TestDb::new("test_duplicate_category_name_is_rejected.db");
    let repo = test_db.repo();

    common::seed_category(&repo, "Foo");
    let duplicate = repo.create_category(&NewCategory::new("Foo", "d", strings(&["p"])));

    assert!(matches!(duplicate, Err(RepositoryError::DuplicateName)));
    assert_eq!(repo.list_categories().expect("list").len(), 1);
}

#[test]
fn test_create_category_requires_points() {
    let test_db = common::TestDb::new("test_create_category_requires_points.db");
    let repo = test_db.repo();

    let result = repo.create_category(&NewCategory::new("Foo", "d", strings(&[" "])));

    assert!(matches!(result, Err(RepositoryError::Validation(_))));
}

#[test]
fn test_category_in_use_cannot_be_deleted() {
    let test_db = common::TestDb::new("test_category_in_use_cannot_be_deleted.db");
    let repo = test_db.repo();

    let category_id = common::seed_category(&repo, "Supplements");
    let product_id = common::seed_product(&repo, "Vita Max", &category_id);
    common::seed_product(&repo, "Vita Mini", &category_id);

    assert!(matches!(
        repo.delete_category(&category_id),
        Err(RepositoryError::CategoryInUse(2))
    ));
    assert_eq!(repo.count_category_products(&category_id).expect("count"), 2);

    let listed = repo.list_categories().expect("list");
    assert_eq!(listed[0].product_count, 2);

    repo.delete_product(&product_id).expect("delete product");
    assert!(matches!(
        repo.delete_category(&category_id),
        Err(RepositoryError::CategoryInUse(1))
    ));
}

#[test]
fn test_delete_missing_category_is_not_found() {
    let test_db = common::TestDb::new("test_delete_missing_category_is_not_found.db");
    let repo = test_db.repo();

    assert!(matches!(
        repo.delete_category("missing"),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_update_category_changes_only_given_fields() {
    let test_db = common::TestDb::new("test_update_category_changes_only_given_fields.db");
    let repo = test_db.repo();

    let id = common::seed_category(&repo, "Supplements");
    repo.update_category(
        &id,
        &UpdateCategory::new()
            .name("Vitamins")
            .description_points(strings(&["1", "2", "3", "4", "5"])),
    )
    .expect("update category");

    let category = repo.get_category_by_id(&id).expect("get").expect("exists");
    assert_eq!(category.name, "Vitamins");
    assert_eq!(category.description, "Supplements description");
    assert_eq!(category.description_points, strings(&["1", "2", "3", "4"]));
}

#[test]
fn test_update_category_errors() {
    let test_db = common::TestDb::new("test_update_category_errors.db");
    let repo = test_db.repo();

    let first = common::seed_category(&repo, "First");
    common::seed_category(&repo, "Second");

    assert!(matches!(
        repo.update_category(&first, &UpdateCategory::new().name("Second")),
        Err(RepositoryError::DuplicateName)
    ));
    assert!(matches!(
        repo.update_category("missing", &UpdateCategory::new().name("Third")),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_categories_listed_newest_first() {
    let test_db = common::TestDb::new("test_categories_listed_newest_first.db");
    let repo = test_db.repo();

    common::seed_category(&repo, "Older");
    std::thread::sleep(std::time::Duration::from_millis(5));
    common::seed_category(&repo, "Newer");

    let names: Vec<String> = repo
        .list_categories()
        .expect("list")
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["Newer".to_string(), "Older".to_string()]);
}
