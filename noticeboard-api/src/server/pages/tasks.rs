use crate::server::{
    pages::{Banner, escape, format_date, layout},
    routes::tasks::{AddTaskPath, DeleteTaskPath, DeleteTaskQuery},
};
use axum_extra::routing::TypedPath;
use noticeboard_common::{model::task::Task, stats::ListStats};
use time::{UtcDateTime, format_description::BorrowedFormatItem, macros::format_description};

const TASK_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[month repr:short] [day padding:none], [year] [hour repr:12 padding:none]:[minute] [period]"
);

/// Renders the to-do list page. `tasks` must already be newest first.
#[must_use]
pub fn render(tasks: &[Task], banners: &[Banner], now: UtcDateTime) -> String {
    let stats = ListStats::compute(tasks.iter().map(|task| (task.created_at, 0)), now);

    let mut main = String::from("<main>\n");
    main.push_str(&render_header(&stats));
    main.push_str(&format!(
        "<div class=\"add-task-form\">
<form action=\"{action}\" method=\"post\">
<input type=\"text\" name=\"task\" placeholder=\"Enter a new task...\" required>
<button type=\"submit\">Add Task</button>
</form>
</div>
",
        action = AddTaskPath::PATH,
    ));

    main.push_str("<section class=\"tasks-container\">\n<h2>Your Tasks</h2>\n");
    if tasks.is_empty() {
        main.push_str(
            "<div class=\"no-tasks\">\n<p>No tasks yet! Add your first task above.</p>\n</div>\n",
        );
    } else {
        main.push_str("<ul class=\"task-list\">\n");
        for task in tasks {
            main.push_str(&render_task(task));
        }
        main.push_str("</ul>\n");
    }
    main.push_str("</section>\n</main>\n");

    layout("To-Do List", banners, &main)
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
<h1>To-Do List</h1>
<p class=\"header-stats\"><span class=\"stat-item\">{} Tasks</span>{recent}</p>
</header>
",
        stats.total
    )
}

fn render_task(task: &Task) -> String {
    let delete_uri = DeleteTaskPath
        .with_query_params(DeleteTaskQuery {
            id: Some(task.id.to_string()),
        })
        .to_uri();

    format!(
        "<li class=\"task-item\" data-task-id=\"{id}\">
<div class=\"task-content\">
<span class=\"task-text\">{text}</span>
<small class=\"task-date\">Added: {date}</small>
</div>
<div class=\"task-actions\"><a href=\"{delete}\" class=\"delete-btn\">Delete</a></div>
</li>
",
        id = task.id,
        text = escape(task.text.get()),
        date = format_date(task.created_at, TASK_DATE_FORMAT),
        delete = escape(&delete_uri.to_string()),
    )
}
