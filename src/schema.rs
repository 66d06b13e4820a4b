// Kept in sync by hand with the statements in `schema_init`.

diesel::table! {
    categories (id) {
        id -> Text,
        name -> Text,
        description -> Text,
        description_points -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    products (id) {
        id -> Text,
        old_name -> Text,
        new_name -> Text,
        category_id -> Nullable<Text>,
        old_images -> Text,
        new_images -> Text,
        badge_image_url -> Nullable<Text>,
        extra_badge_1 -> Nullable<Text>,
        extra_badge_2 -> Nullable<Text>,
        next_redirect_url -> Text,
        redirect_timer -> Integer,
        theme -> Text,
        generated_link -> Text,
        meta_description -> Nullable<Text>,
        seo_title -> Nullable<Text>,
        domain -> Nullable<Text>,
        total_clicks -> Integer,
        created_at -> Timestamp,
    }
}

diesel::table! {
    visit_stats (id) {
        id -> Integer,
        product_id -> Text,
        ip_address -> Text,
        country -> Text,
        visit_date -> Timestamp,
    }
}

diesel::joinable!(products -> categories (category_id));
diesel::joinable!(visit_stats -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(categories, products, visit_stats,);
