//! Response rendering
//!
//! Builds the complete HTML page for the task list, plus the short
//! redirect and plain-text responses used for everything else.

use chrono::NaiveDate;
use std::borrow::Cow;
use std::fmt::Write as _;

use planner_core::{Task, TaskStore};

/// A response ready to be written to the socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub reason: &'static str,
    pub content_type: Option<&'static str>,
    pub location: Option<String>,
    pub body: String,
}

impl Response {
    fn new(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            content_type: None,
            location: None,
            body: String::new(),
        }
    }

    fn text(status: u16, reason: &'static str, body: impl Into<String>) -> Self {
        Self {
            content_type: Some("text/plain"),
            body: body.into(),
            ..Self::new(status, reason)
        }
    }

    /// Serialize status line, headers and body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason);
        if let Some(content_type) = self.content_type {
            let _ = write!(head, "Content-Type: {}\r\n", content_type);
        }
        if let Some(location) = &self.location {
            let _ = write!(head, "Location: {}\r\n", location);
        }
        let _ = write!(
            head,
            "Content-Length: {}\r\nConnection: close\r\n\r\n",
            self.body.len()
        );

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

/// 303 See Other pointing at `location`
pub fn redirect(location: &str) -> Response {
    Response {
        location: Some(location.to_string()),
        ..Response::new(303, "See Other")
    }
}

/// 404 for any unknown method/path combination
pub fn not_found() -> Response {
    Response::text(404, "Not Found", "Page not found")
}

/// 400 for a request whose form fields cannot be used
pub fn bad_request(message: &str) -> Response {
    Response::text(400, "Bad Request", message)
}

/// 500 when the server could not finish a request it accepted
pub fn server_error(message: &str) -> Response {
    Response::text(500, "Internal Server Error", message)
}

/// 200 with the full task page
pub fn page(store: &TaskStore, today: NaiveDate) -> Response {
    Response {
        content_type: Some("text/html"),
        body: render_page(store, today),
        ..Response::new(200, "OK")
    }
}

const STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 0; padding: 20px; background-color: #f5f5f5; }
        h1 { color: #333; text-align: center; }
        .container { max-width: 800px; margin: 0 auto; background-color: white; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .task { border: 1px solid #ddd; margin: 10px 0; padding: 10px; border-radius: 4px; }
        .task.completed { background-color: #e8f5e9; }
        .task.due-soon { border-left: 4px solid #f44336; }
        .task-header, .task-footer { display: flex; justify-content: space-between; }
        .task-title { font-weight: bold; }
        .task-category, .task-footer { color: #666; font-size: 0.9em; }
        .actions { display: flex; gap: 5px; }
        .actions form { margin: 0; }
        .reminder { background-color: #fff3e0; border-left: 4px solid #ff9800; padding: 10px; margin-bottom: 20px; }
        label { display: block; margin-top: 10px; }
        input[type=\"text\"], textarea { width: 100%; padding: 8px; box-sizing: border-box; }
        button { background-color: #4caf50; color: white; padding: 8px 12px; border: none; border-radius: 4px; cursor: pointer; margin-top: 10px; }
        .btn-complete { background-color: #2196f3; }
        .btn-delete { background-color: #f44336; }
";

/// Build the HTML document: reminder banner, new-task form and task list
pub fn render_page(store: &TaskStore, today: NaiveDate) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("    <title>Planner</title>\n    <style>\n");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n    <div class=\"container\">\n");
    html.push_str("        <h1>Planner</h1>\n");

    render_reminder(&mut html, &store.due_soon(today));
    render_form(&mut html);

    html.push_str("        <h2>Tasks</h2>\n");
    if store.is_empty() {
        html.push_str("        <p>No tasks yet. Add one above.</p>\n");
    } else {
        for task in store.display_order() {
            render_task(&mut html, task, today);
        }
    }

    html.push_str("    </div>\n</body>\n</html>\n");
    html
}

fn render_reminder(html: &mut String, due: &[&Task]) {
    if due.is_empty() {
        return;
    }

    html.push_str("        <div class=\"reminder\">\n");
    html.push_str("            <strong>Reminder!</strong> These tasks are due soon:\n");
    html.push_str("            <ul>\n");
    for task in due {
        let _ = writeln!(
            html,
            "                <li>{} (due: {})</li>",
            escape_html(&task.title),
            escape_html(&task.due_date)
        );
    }
    html.push_str("            </ul>\n        </div>\n");
}

fn render_form(html: &mut String) {
    html.push_str(
        "        <form action=\"/add\" method=\"post\">
            <h2>New task</h2>
            <label for=\"title\">Title:</label>
            <input type=\"text\" id=\"title\" name=\"title\" required>
            <label for=\"description\">Description:</label>
            <textarea id=\"description\" name=\"description\" rows=\"3\"></textarea>
            <label for=\"dueDate\">Due date:</label>
            <input type=\"date\" id=\"dueDate\" name=\"dueDate\">
            <button type=\"submit\">Add task</button>
        </form>
",
    );
}

fn render_task(html: &mut String, task: &Task, today: NaiveDate) {
    let class = if task.completed {
        "task completed"
    } else if task.needs_reminder(today) {
        "task due-soon"
    } else {
        "task"
    };
    let due = if task.due_date.is_empty() {
        Cow::Borrowed("Not set")
    } else {
        escape_html(&task.due_date)
    };
    let toggle_label = if task.completed { "Undo" } else { "Done" };

    let _ = write!(
        html,
        "        <div class=\"{class}\">
            <div class=\"task-header\">
                <div class=\"task-title\">{title}</div>
                <div class=\"task-category\">Category: {category}</div>
            </div>
            <div class=\"task-description\">{description}</div>
            <div class=\"task-footer\">
                <div>Due: {due}</div>
                <div class=\"actions\">
                    <form action=\"/complete\" method=\"post\">
                        <input type=\"hidden\" name=\"id\" value=\"{id}\">
                        <button type=\"submit\" class=\"btn-complete\">{toggle_label}</button>
                    </form>
                    <form action=\"/delete\" method=\"post\">
                        <input type=\"hidden\" name=\"id\" value=\"{id}\">
                        <button type=\"submit\" class=\"btn-delete\">Delete</button>
                    </form>
                </div>
            </div>
        </div>
",
        class = class,
        title = escape_html(&task.title),
        category = escape_html(&task.category),
        description = escape_html(&task.description),
        due = due,
        id = task.id,
        toggle_label = toggle_label,
    );
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_redirect_bytes() {
        let bytes = redirect("/").to_bytes();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("HTTP/1.1 303 See Other\r\n"));
        assert!(text.contains("Location: /\r\n"));
        assert!(text.ends_with("Content-Length: 0\r\nConnection: close\r\n\r\n"));
    }

    #[test]
    fn test_not_found_bytes() {
        let text = String::from_utf8(not_found().to_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.ends_with("\r\n\r\nPage not found"));
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let response = bad_request("задача");
        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.contains("Content-Length: 12\r\n"));
    }

    #[test]
    fn test_empty_page() {
        let html = render_page(&TaskStore::new(), today());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("No tasks yet"));
        assert!(html.contains("action=\"/add\""));
        assert!(!html.contains("class=\"reminder\""));
    }

    #[test]
    fn test_page_lists_incomplete_first() {
        let mut store = TaskStore::new();
        store.add("First", "", "").unwrap();
        store.add("Second", "", "").unwrap();
        store.toggle_completed(1);

        let html = render_page(&store, today());
        let first = html.find("First").unwrap();
        let second = html.find("Second").unwrap();
        assert!(second < first);
        assert!(html.contains("<div class=\"task completed\">"));
        assert!(html.contains(">Undo</button>"));
        assert!(html.contains(">Done</button>"));
    }

    #[test]
    fn test_reminder_banner() {
        let mut store = TaskStore::new();
        store.add("Pay rent", "", "2024-05-12").unwrap();
        store.add("Far away", "", "2024-05-30").unwrap();
        store.add("Already paid", "", "2024-05-11").unwrap();
        store.toggle_completed(3);

        let html = render_page(&store, today());
        assert!(html.contains("<li>Pay rent (due: 2024-05-12)</li>"));
        assert!(!html.contains("<li>Far away"));
        assert!(!html.contains("<li>Already paid"));
        assert!(html.contains("<div class=\"task due-soon\">"));
    }

    #[test]
    fn test_missing_due_date_label() {
        let mut store = TaskStore::new();
        store.add("Someday", "", "").unwrap();

        let html = render_page(&store, today());
        assert!(html.contains("Due: Not set"));
        assert!(html.contains("name=\"id\" value=\"1\""));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut store = TaskStore::new();
        store.add("<script>alert('x')</script>", "a & b", "").unwrap();

        let html = render_page(&store, today());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn test_escape_html_borrows_clean_text() {
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
    }
}
