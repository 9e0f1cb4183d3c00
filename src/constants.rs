pub mod forms {

    pub const REVIEW_MIN_LEN: usize = 10;

    pub const REPORT_MIN_LEN: usize = 10;

    pub const PASSWORD_MIN_LEN: usize = 6;

    pub const USERNAME_MIN_LEN: usize = 3;

    pub const RATING_MIN: f64 = 0.0;

    pub const RATING_MAX: f64 = 10.0;
}

pub mod limits {

    /// Reviews shown in each home/game page feed.
    pub const FEED_SIZE: u32 = 6;

    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub const PREVIEW_CHARS: usize = 150;
}

pub mod includes {

    pub const GAME_PAGE: &[&str] = &["platforms", "genres", "companies"];

    pub const GAME_REVIEWS: &[&str] = &["platform", "user", "comments", "likes"];

    pub const POPULAR_REVIEWS: &[&str] = &["user", "user_game", "likes", "game"];
}
