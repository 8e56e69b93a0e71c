use crate::server::{
    pages::{Banner, escape, escape_multiline, format_date, group_thousands, layout},
    routes::posts::CreatePostPath,
};
use axum_extra::routing::TypedPath;
use noticeboard_common::{
    model::post::{POST_CONTENT_MAX_LEN, POST_TITLE_MAX_LEN, Post},
    stats::ListStats,
};
use time::{UtcDateTime, format_description::BorrowedFormatItem, macros::format_description};

const POST_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[month repr:long] [day padding:none], [year] at [hour repr:12 padding:none]:[minute] [period]"
);
const LATEST_POST_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day padding:none]");

/// Renders the blog page. `posts` must already be newest first.
#[must_use]
pub fn render(posts: &[Post], banners: &[Banner], now: UtcDateTime) -> String {
    let stats = ListStats::compute(
        posts
            .iter()
            .map(|post| (post.created_at, post.content.word_count())),
        now,
    );

    let mut main = String::from("<main>\n");
    main.push_str(&render_header(&stats));
    main.push_str(&render_form());

    main.push_str(
        "<section class=\"posts\">\n<h2>Recent Posts</h2>\n<div id=\"posts-container\">\n",
    );
    if posts.is_empty() {
        main.push_str(
            "<div class=\"empty-state\">
<h3>No posts yet!</h3>
<p>Be the first to share something amazing with the world.</p>
<p>Use the form above to create your first post.</p>
</div>
",
        );
    }
    for post in posts {
        main.push_str(&render_post(post));
    }
    main.push_str("</div>\n");
    if stats.total > 0 {
        main.push_str(&render_stats(&stats));
    }
    main.push_str("</section>\n</main>\n");

    layout("Simple Blog - Share Your Thoughts", banners, &main)
}

fn render_header(stats: &ListStats) -> String {
    let recent = if stats.recent > 0 {
        format!(
            "<span class=\"stat-item\">{} New (24h)</span>",
            stats.recent
        )
    } else {
        String::new()
    };

    format!(
        "<header>
<h1>My Simple Blog</h1>
<p class=\"header-stats\"><span class=\"stat-item\">{} Posts</span>{recent}</p>
</header>
",
        stats.total
    )
}

fn render_form() -> String {
    format!(
        "<section class=\"create-post\">
<h2>Create New Post</h2>
<form id=\"post-form\" action=\"{action}\" method=\"post\">
<label for=\"title\">Post Title</label>
<input type=\"text\" id=\"title\" name=\"title\" maxlength=\"{POST_TITLE_MAX_LEN}\" required>
<label for=\"content\">Post Content</label>
<textarea id=\"content\" name=\"content\" rows=\"8\" maxlength=\"{POST_CONTENT_MAX_LEN}\" required></textarea>
<button type=\"submit\">Publish Post</button>
</form>
</section>
",
        action = CreatePostPath::PATH,
    )
}

fn render_body(post: &Post) -> String {
    let full = escape_multiline(post.content.get());

    match post.content.preview() {
        Some(preview) => format!(
            "<div class=\"post-preview\">{}...</div>
<details class=\"post-full\">
<summary class=\"read-more-btn\">Read More</summary>
<div>{full}</div>
</details>
",
            escape_multiline(preview)
        ),
        None => format!("{full}\n"),
    }
}

fn render_post(post: &Post) -> String {
    format!(
        "<article class=\"post\" data-post-id=\"{id}\">
<header class=\"post-header\">
<h3>{title}</h3>
<div class=\"post-meta\">
<span class=\"post-id\">Post #{id}</span>
<span class=\"post-date\">{date}</span>
<span class=\"reading-time\">{minutes} min read</span>
</div>
</header>
<div class=\"post-content\">
{body}</div>
<footer class=\"post-footer\">
<span class=\"word-count\">{words} words</span>
<span class=\"char-count\">{chars} characters</span>
</footer>
</article>
",
        id = post.id,
        title = escape(post.title.get()),
        date = format_date(post.created_at, POST_DATE_FORMAT),
        minutes = post.content.reading_time_minutes(),
        body = render_body(post),
        words = post.content.word_count(),
        chars = post.content.char_count(),
    )
}

fn render_stats(stats: &ListStats) -> String {
    let latest = stats.latest.map_or_else(
        || "N/A".to_owned(),
        |latest| format_date(latest, LATEST_POST_FORMAT),
    );

    format!(
        "<div class=\"post-stats\">
<div class=\"stat-card\"><div class=\"stat-number\">{total}</div><div class=\"stat-label\">Total Posts</div></div>
<div class=\"stat-card\"><div class=\"stat-number\">{recent}</div><div class=\"stat-label\">Last 24h</div></div>
<div class=\"stat-card\"><div class=\"stat-number\">{words}</div><div class=\"stat-label\">Total Words</div></div>
<div class=\"stat-card\"><div class=\"stat-number\">{latest}</div><div class=\"stat-label\">Latest Post</div></div>
</div>
",
        total = stats.total,
        recent = stats.recent,
        words = group_thousands(stats.total_words),
    )
}
