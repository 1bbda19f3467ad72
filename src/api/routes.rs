//! Route handlers

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use minijinja::context;
use serde::Deserialize;

use super::server::{AppState, SharedState};
use crate::auth::middleware::{clear_cookie, session_cookie};
use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::auth::{authorize, Access, Claims, SCHEDULE_EDITORS};
use crate::error::{Error, Result};
use crate::schedule::{ClassFilter, NewClass};

#[derive(Debug, Deserialize)]
pub struct DeleteClassRequest {
    pub class_id: u64,
}

fn can_edit(user: Option<&Claims>) -> bool {
    user.is_some_and(|claims| authorize(claims, SCHEDULE_EDITORS) == Access::Allowed)
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "success": true, "data": "healthy" }))
}

// Pages

pub async fn index(State(state): State<SharedState>, headers: HeaderMap) -> Result<Html<String>> {
    let user = state.identity(&headers).into_claims();
    state.pages.render("index.html", context! { user => user })
}

pub async fn login_form(State(state): State<SharedState>) -> Result<Html<String>> {
    state.pages.render("login.html", context! {})
}

pub async fn login(
    State(state): State<SharedState>,
    Form(req): Form<LoginRequest>,
) -> Result<Response> {
    let Some(principal) = state.users.authenticate(&req.login, &req.password).await? else {
        tracing::warn!("Failed login for '{}'", req.login);
        let page = state.pages.render(
            "login.html",
            context! { error => "Invalid login or password" },
        )?;
        return Ok(page.into_response());
    };

    let token = state.gate.issue(&principal, AppState::now());
    tracing::info!("{} logged in as {}", principal.login, principal.role);

    let cookie = session_cookie(&state.config.auth.cookie_name, &token)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

pub async fn register_form(State(state): State<SharedState>) -> Result<Html<String>> {
    state
        .pages
        .render("register.html", context! { roles => &state.config.auth.roles })
}

pub async fn register(
    State(state): State<SharedState>,
    Form(req): Form<RegisterRequest>,
) -> Result<Response> {
    let outcome = if state.config.auth.is_known_role(&req.role) {
        state.users.register(req).await
    } else {
        Err(Error::UnknownRole(req.role))
    };

    match outcome {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(e @ (Error::LoginExists(_) | Error::UnknownRole(_))) => {
            let page = state.pages.render(
                "register.html",
                context! { error => e.to_string(), roles => &state.config.auth.roles },
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

/// Tells the client to drop its token; the token itself stays valid until expiry
pub async fn logout(State(state): State<SharedState>) -> Result<Response> {
    let cookie = clear_cookie(&state.config.auth.cookie_name)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

// Schedule

pub async fn add_class_form(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    let user = state.identity(&headers).into_claims();
    state
        .pages
        .render("add_class.html", context! { user => user, message => "" })
}

pub async fn add_class(
    State(state): State<SharedState>,
    headers: HeaderMap,
    form: std::result::Result<Form<NewClass>, FormRejection>,
) -> Result<Response> {
    // The role gate answers before the body is looked at
    let user = state.require(&headers, SCHEDULE_EDITORS)?;
    let Form(req) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let class = state.schedule.write().await.add(req);
    tracing::info!("{} added class {} for {}", user.sub, class.id, class.group_name);

    let page = state.pages.render(
        "add_class.html",
        context! { user => user, message => "Class added successfully!" },
    )?;
    Ok(page.into_response())
}

pub async fn view_schedule(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    let user = state.identity(&headers).into_claims();
    let schedule = state.schedule.read().await;

    state.pages.render(
        "view_schedule.html",
        context! {
            classes => schedule.list(),
            can_edit => can_edit(user.as_ref()),
            user => user,
        },
    )
}

pub async fn search_class_form(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    let user = state.identity(&headers).into_claims();
    state
        .pages
        .render("search_class.html", context! { user => user, message => "" })
}

pub async fn search_class(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(filter): Form<ClassFilter>,
) -> Result<Html<String>> {
    let user = state.identity(&headers).into_claims();
    let classes = state.schedule.read().await.search(&filter);
    let message = if classes.is_empty() {
        "No classes found"
    } else {
        "Classes found!"
    };

    state.pages.render(
        "search_class.html",
        context! {
            classes => classes,
            message => message,
            can_edit => can_edit(user.as_ref()),
            user => user,
        },
    )
}

pub async fn delete_class(
    State(state): State<SharedState>,
    headers: HeaderMap,
    form: std::result::Result<Form<DeleteClassRequest>, FormRejection>,
) -> Result<Response> {
    let user = state.require(&headers, SCHEDULE_EDITORS)?;
    let Form(req) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    match state.schedule.write().await.delete(req.class_id) {
        Some(class) => tracing::info!("{} deleted class {}", user.sub, class.id),
        None => tracing::debug!("Class {} already gone", req.class_id),
    }

    Ok(Redirect::to("/view_schedule").into_response())
}

pub async fn statistics(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    let user = state.identity(&headers).into_claims();
    let stats = state.schedule.read().await.statistics();
    state
        .pages
        .render("statistics.html", context! { stats => stats, user => user })
}
