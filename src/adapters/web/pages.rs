//! Server-rendered HTML pages.
//!
//! Plain `format!` templates around one shared layout. Every value that
//! came from a user goes through `escape` first.

use std::fmt::Write as _;

use crate::domain::form::StudentForm;
use crate::domain::stats::StudentStats;
use crate::domain::student::{Student, StudentId};

use super::notice::Notice;

const STYLE: &str = "\
body{font-family:sans-serif;margin:2rem auto;max-width:960px;color:#222}\
nav a{margin-right:1rem}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:.4rem;text-align:left}\
.notice{padding:.6rem;margin:1rem 0;border-radius:4px}\
.success{background:#e3f6e3;border:1px solid #7c7}\
.error{background:#fbe4e4;border:1px solid #d77}\
label{display:block;margin-top:.6rem}\
input[type=text],input[type=email],input[type=number],textarea{width:100%;padding:.3rem}";

/// Escape text for HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, notice: Option<&Notice>, body: &str) -> String {
    let notice = notice.map_or_else(String::new, |n| {
        format!(
            r#"<div class="notice {}">{}</div>"#,
            n.level.css_class(),
            escape(&n.message)
        )
    });
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Student Records</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
<a href="/">Home</a>
<a href="/view_students">Students</a>
<a href="/add_student">Add Student</a>
</nav>
<h1>{title}</h1>
{notice}
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

fn search_box(query: &str) -> String {
    format!(
        r#"<form action="/search" method="get">
<input type="text" name="q" value="{}" placeholder="Search by name, roll no, course or email">
<button type="submit">Search</button>
</form>"#,
        escape(query)
    )
}

/// Landing page with a small dashboard.
pub fn index(stats: &StudentStats, notice: Option<&Notice>) -> String {
    let body = format!(
        r#"<p>Manage student records: add, edit, search and remove.</p>
<ul>
<li>Total students: <strong>{}</strong></li>
<li>Courses: <strong>{}</strong></li>
<li>Fees paid: <strong>{}</strong></li>
</ul>
{}"#,
        stats.total_students,
        stats.total_courses,
        stats.active_students,
        search_box("")
    );
    layout("Student Records", notice, &body)
}

/// Student table, optionally for a search result.
pub fn student_list(students: &[Student], query: Option<&str>, notice: Option<&Notice>) -> String {
    let mut body = search_box(query.unwrap_or_default());

    if let Some(q) = query {
        let _ = write!(
            body,
            r#"<p>{} result(s) for "{}". <a href="/view_students">Show all</a></p>"#,
            students.len(),
            escape(q)
        );
    }

    if students.is_empty() {
        body.push_str("<p>No students found.</p>");
        return layout("Students", notice, &body);
    }

    body.push_str(
        "<table>\n<tr><th>Roll No</th><th>Name</th><th>Email</th><th>Course</th>\
         <th>Year</th><th>Grade</th><th>Attendance</th><th>Fees</th><th></th></tr>\n",
    );
    for s in students {
        let _ = writeln!(
            body,
            r#"<tr><td>{roll}</td><td>{name}</td><td>{email}</td><td>{course}</td><td>{year}</td><td>{grade}</td><td>{att}</td><td>{fees}</td><td><a href="/view_student/{id}">View</a> <a href="/edit_student/{id}">Edit</a> <a href="/student/delete/{id}" onclick="return confirm('Delete this student?')">Delete</a></td></tr>"#,
            id = s.id,
            roll = escape(&s.roll_no),
            name = escape(&s.name),
            email = escape(&s.email),
            course = escape(&s.course),
            year = escape(&s.year),
            grade = escape(&s.grade),
            att = escape(&s.attendance_percent),
            fees = if s.fees_paid { "Paid" } else { "Due" },
        );
    }
    body.push_str("</table>");

    layout("Students", notice, &body)
}

/// Detail page for one student.
pub fn student_detail(s: &Student, notice: Option<&Notice>) -> String {
    let rows = [
        ("ID", s.id.to_string()),
        ("Roll No", s.roll_no.clone()),
        ("Name", s.name.clone()),
        ("Email", s.email.clone()),
        ("Phone", s.phone.clone()),
        ("Course", s.course.clone()),
        ("Year", s.year.clone()),
        ("Grade", s.grade.clone()),
        ("Attendance", s.attendance_percent.clone()),
        ("Fees Paid", if s.fees_paid { "Yes" } else { "No" }.to_string()),
        ("Address", s.address.clone()),
        ("Created", s.created_at.clone()),
        ("Updated", s.updated_at.clone()),
    ];

    let mut body = String::from("<table>\n");
    for (label, value) in rows {
        let _ = writeln!(body, "<tr><th>{label}</th><td>{}</td></tr>", escape(&value));
    }
    let _ = write!(
        body,
        r#"</table>
<p><a href="/edit_student/{id}">Edit</a> <a href="/student/delete/{id}" onclick="return confirm('Delete this student?')">Delete</a></p>"#,
        id = s.id
    );

    layout(&s.name, notice, &body)
}

/// Which form is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(StudentId),
}

fn text_input(label: &str, name: &str, kind: &str, value: Option<&String>) -> String {
    format!(
        r#"<label>{label}<input type="{kind}" name="{name}" value="{}"></label>"#,
        escape(value.map_or("", String::as_str))
    )
}

/// Create or edit form, prefilled with `values`.
pub fn student_form(mode: FormMode, values: &StudentForm, notice: Option<&Notice>) -> String {
    let (title, action) = match mode {
        FormMode::Add => ("Add Student".to_string(), "/add_student".to_string()),
        FormMode::Edit(id) => ("Edit Student".to_string(), format!("/edit_student/{id}")),
    };

    let mut body = format!(r#"<form action="{action}" method="post">"#);
    for (label, name, kind, value) in [
        ("Roll No *", "roll_no", "text", values.roll_no.as_ref()),
        ("Name *", "name", "text", values.name.as_ref()),
        ("Email *", "email", "email", values.email.as_ref()),
        ("Phone *", "phone", "text", values.phone.as_ref()),
        ("Course *", "course", "text", values.course.as_ref()),
        ("Year *", "year", "text", values.year.as_ref()),
        ("Grade *", "grade", "text", values.grade.as_ref()),
        ("Attendance % *", "attendance", "number", values.attendance.as_ref()),
    ] {
        body.push_str(&text_input(label, name, kind, value));
        body.push('\n');
    }
    let _ = write!(
        body,
        r#"<label><input type="checkbox" name="fees_paid" value="true"{}> Fees paid</label>
<label>Address<textarea name="address">{}</textarea></label>
<p><button type="submit">Save</button> <a href="/view_students">Cancel</a></p>
</form>"#,
        if values.fees_paid() { " checked" } else { "" },
        escape(values.address.as_deref().unwrap_or_default()),
    );

    layout(&title, notice, &body)
}

/// Generic failure page.
pub fn error_page(message: &str) -> String {
    layout(
        "Something went wrong",
        Some(&Notice::error(message)),
        r#"<p><a href="/view_students">Back to students</a></p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_form_keeps_submitted_values() {
        let values = StudentForm {
            name: Some("<Alice>".into()),
            fees_paid: Some("true".into()),
            ..StudentForm::default()
        };
        let html = student_form(FormMode::Edit(7), &values, Some(&Notice::error("bad")));
        assert!(html.contains(r#"action="/edit_student/7""#));
        assert!(html.contains("&lt;Alice&gt;"));
        assert!(html.contains(" checked"));
        assert!(html.contains(r#"<div class="notice error">bad</div>"#));
    }

    #[test]
    fn test_empty_list() {
        let html = student_list(&[], Some("zzz"), None);
        assert!(html.contains("No students found."));
        assert!(html.contains("0 result(s)"));
    }
}
