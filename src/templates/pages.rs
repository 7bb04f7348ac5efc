use maud::{DOCTYPE, Markup, html};

use super::{FormData, TemplateData, human_date};

pub(super) fn layout(title: &str, main: Markup, data: &TemplateData) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " - Snipit" }
                link rel="stylesheet" href="/static/css/main.css";
                link rel="shortcut icon" href="/static/img/favicon.ico" type="image/x-icon";
                link rel="stylesheet" href="https://fonts.googleapis.com/css?family=Ubuntu+Mono:400,700";
            }
            body {
                header { h1 { a href="/" { "Snipit" } } }
                (nav(data))
                main {
                    @if let Some(flash) = &data.flash {
                        div.flash { (flash) }
                    }
                    (main)
                }
                footer {
                    "Powered by " a href="https://www.rust-lang.org/" { "Rust" } " in " (data.current_year)
                }
                script src="/static/js/main.js" type="text/javascript" {}
            }
        }
    }
}

fn nav(data: &TemplateData) -> Markup {
    html! {
        nav {
            div {
                a href="/" { "Home" }
                a href="/about" { "About" }
                @if data.is_authenticated {
                    a href="/snippet/create" { "Create snippet" }
                }
            }
            div {
                @if data.is_authenticated {
                    a href="/account/view" { "Account" }
                    form action="/user/logout" method="POST" {
                        (csrf_input(data))
                        button { "Logout" }
                    }
                } @else {
                    a href="/user/signup" { "Signup" }
                    a href="/user/login" { "Login" }
                }
            }
        }
    }
}

fn csrf_input(data: &TemplateData) -> Markup {
    html! {
        input type="hidden" name="csrf_token" value=(data.csrf_token);
    }
}

fn field_error(form: &FormData, field: &str) -> Markup {
    html! {
        @if let Some(msg) = form.error(field) {
            label.error { (msg) }
        }
    }
}

fn non_field_errors(form: &FormData) -> Markup {
    html! {
        @for msg in form.non_field_errors() {
            div.error { (msg) }
        }
    }
}

fn form_or_default(data: &TemplateData) -> FormData {
    data.form.clone().unwrap_or_default()
}

pub(super) fn home_title(_: &TemplateData) -> String {
    "Home".to_string()
}

pub(super) fn home(data: &TemplateData) -> Markup {
    html! {
        h2 { "Latest Snippets" }
        @if data.snippets.is_empty() {
            p { "There's nothing to see here... yet!" }
        } @else {
            table {
                tr {
                    th { "Title" }
                    th { "Created" }
                    th { "ID" }
                }
                @for snippet in &data.snippets {
                    tr {
                        td { a href={ "/snippet/view/" (snippet.id) } { (snippet.title) } }
                        td { (human_date(&snippet.created)) }
                        td { "#" (snippet.id) }
                    }
                }
            }
        }
    }
}

pub(super) fn view_title(data: &TemplateData) -> String {
    data.snippet
        .as_ref()
        .map(|s| format!("Snippet #{}", s.id))
        .unwrap_or_else(|| "Snippet".to_string())
}

pub(super) fn view(data: &TemplateData) -> Markup {
    html! {
        @if let Some(snippet) = &data.snippet {
            div.snippet {
                div.metadata {
                    strong { (snippet.title) }
                    span { "#" (snippet.id) }
                }
                pre { code { (snippet.content) } }
                div.metadata {
                    time { "Created: " (human_date(&snippet.created)) }
                    time { "Expires: " (human_date(&snippet.expires)) }
                }
            }
        }
    }
}

pub(super) fn create_title(_: &TemplateData) -> String {
    "Create a New Snippet".to_string()
}

pub(super) fn create(data: &TemplateData) -> Markup {
    let form = form_or_default(data);
    let expires = form.value("expires");

    html! {
        form action="/snippet/create" method="POST" {
            (csrf_input(data))
            div {
                label { "Title:" }
                (field_error(&form, "title"))
                input type="text" name="title" value=(form.value("title"));
            }
            div {
                label { "Content:" }
                (field_error(&form, "content"))
                textarea name="content" { (form.value("content")) }
            }
            div {
                label { "Delete in:" }
                (field_error(&form, "expires"))
                @for (days, label) in [("365", "One Year"), ("7", "One Week"), ("1", "One Day")] {
                    input type="radio" name="expires" value=(days) checked[expires == days];
                    " " (label)
                }
            }
            div {
                input type="submit" value="Publish snippet";
            }
        }
    }
}

pub(super) fn signup_title(_: &TemplateData) -> String {
    "Signup".to_string()
}

pub(super) fn signup(data: &TemplateData) -> Markup {
    let form = form_or_default(data);

    html! {
        form action="/user/signup" method="POST" novalidate {
            (csrf_input(data))
            div {
                label { "Name:" }
                (field_error(&form, "name"))
                input type="text" name="name" value=(form.value("name"));
            }
            div {
                label { "Email:" }
                (field_error(&form, "email"))
                input type="email" name="email" value=(form.value("email"));
            }
            div {
                label { "Password:" }
                (field_error(&form, "password"))
                input type="password" name="password";
            }
            div {
                input type="submit" value="Signup";
            }
        }
    }
}

pub(super) fn login_title(_: &TemplateData) -> String {
    "Login".to_string()
}

pub(super) fn login(data: &TemplateData) -> Markup {
    let form = form_or_default(data);

    html! {
        form action="/user/login" method="POST" novalidate {
            (csrf_input(data))
            (non_field_errors(&form))
            div {
                label { "Email:" }
                (field_error(&form, "email"))
                input type="email" name="email" value=(form.value("email"));
            }
            div {
                label { "Password:" }
                (field_error(&form, "password"))
                input type="password" name="password";
            }
            div {
                input type="submit" value="Login";
            }
        }
    }
}

pub(super) fn account_title(_: &TemplateData) -> String {
    "Your Account".to_string()
}

pub(super) fn account(data: &TemplateData) -> Markup {
    html! {
        @if let Some(user) = &data.user {
            h2 { "Your Account" }
            table {
                tr { th { "Name" } td { (user.name) } }
                tr { th { "Email" } td { (user.email) } }
                tr { th { "Joined" } td { (human_date(&user.created)) } }
                tr {
                    th { "Password" }
                    td { a href="/account/password/update" { "Change password" } }
                }
            }
        }
    }
}

pub(super) fn password_title(_: &TemplateData) -> String {
    "Change Password".to_string()
}

pub(super) fn password(data: &TemplateData) -> Markup {
    let form = form_or_default(data);

    html! {
        h2 { "Change Password" }
        form action="/account/password/update" method="POST" novalidate {
            (csrf_input(data))
            (non_field_errors(&form))
            div {
                label { "Current password:" }
                (field_error(&form, "current_password"))
                input type="password" name="current_password";
            }
            div {
                label { "New password:" }
                (field_error(&form, "new_password"))
                input type="password" name="new_password";
            }
            div {
                label { "Confirm new password:" }
                (field_error(&form, "new_password_confirmation"))
                input type="password" name="new_password_confirmation";
            }
            div {
                input type="submit" value="Change password";
            }
        }
    }
}

pub(super) fn about_title(_: &TemplateData) -> String {
    "About".to_string()
}

pub(super) fn about(_: &TemplateData) -> Markup {
    html! {
        h2 { "About" }
        p {
            "Snipit is a place to paste and share short snippets of text or code. "
            "Snippets expire automatically after a day, a week or a year."
        }
    }
}
