// Diesel table definitions matching the schema created by DbContext::init_schema.

diesel::table! {
    blogs (id) {
        id -> Text,
        blog_name -> Text,
        author_name -> Nullable<Text>,
        url -> Text,
        post_count -> BigInt,
        status -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    posts (id) {
        id -> Text,
        blog_id -> Text,
        title -> Nullable<Text>,
        content -> Nullable<Text>,
        category -> Nullable<Text>,
        post_url -> Nullable<Text>,
        post_date -> Nullable<Text>,
        comment_count -> BigInt,
        sympathy_count -> BigInt,
        crawl_status -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    reactions (id) {
        id -> Integer,
        post_id -> Text,
        reaction_type -> Text,
        count -> BigInt,
    }
}

diesel::table! {
    comments (id) {
        id -> Text,
        post_id -> Text,
        parent_id -> Nullable<Text>,
        author -> Nullable<Text>,
        content -> Nullable<Text>,
        like_count -> BigInt,
        written_at -> Nullable<Text>,
        is_reply -> Integer,
    }
}

diesel::table! {
    progress (id) {
        id -> Integer,
        blog_id -> Text,
        current_post_index -> BigInt,
        total_posts -> BigInt,
        current_step -> Text,
        last_updated -> Text,
    }
}

diesel::joinable!(posts -> blogs (blog_id));
diesel::joinable!(reactions -> posts (post_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(progress -> blogs (blog_id));

diesel::allow_tables_to_appear_in_same_query!(blogs, posts, reactions, comments, progress,);
