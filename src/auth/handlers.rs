use axum::{
    extract::{FromRef, State},
    http::header,
    response::{IntoResponse, Redirect},
    routing::get,
    Form, Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest},
        extractors::SessionUser,
        repo_types::User,
        services::{
            hash_password, is_valid_username, verify_password, SessionKeys, MIN_PASSWORD_LEN,
        },
    },
    dto::PageView,
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub async fn login_page() -> Json<PageView> {
    Json(PageView { page: "login" })
}

pub async fn register_page() -> Json<PageView> {
    Json(PageView { page: "register" })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Form(payload): Form<RegisterRequest>,
) -> Result<Redirect, AppError> {
    let username = payload.username.trim();

    if !is_valid_username(username) {
        warn!(%username, "invalid username");
        return Err(AppError::BadRequest(
            "Username must be 3-80 letters, digits, '.', '_' or '-'".into(),
        ));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::BadRequest("Password too short".into()));
    }

    if User::find_by_username(&state.db, username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let hash = hash_password(&payload.password)?;

    // The unique index still wins if two registrations race past the check above.
    let Some(user) = User::create(&state.db, username, &hash).await? else {
        warn!(%username, "username taken concurrently");
        return Err(AppError::Conflict("Username already exists".into()));
    };

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Redirect::to("/login"))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Form(payload): Form<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = payload.username.trim();
    let invalid = || AppError::Unauthorized("Invalid username or password".into());

    let Some(user) = User::find_by_username(&state.db, username).await? else {
        warn!(%username, "login unknown username");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((
        [(header::SET_COOKIE, keys.session_cookie(&token))],
        Redirect::to("/"),
    ))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> impl IntoResponse {
    let keys = SessionKeys::from_ref(&state);
    info!(%user_id, "user logged out");
    (
        [(header::SET_COOKIE, keys.cleared_cookie())],
        Redirect::to("/"),
    )
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    Ok(Json(PublicUser {
        id: user.id,
        username: user.username,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use sqlx::PgPool;
    use uuid::Uuid;

    #[test]
    fn public_user_serialization() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            username: "chef".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("chef"));
        assert!(json.contains("id"));
        assert!(!json.contains("password"));
    }

    #[tokio::test]
    async fn register_rejects_bad_username_before_touching_db() {
        let state = AppState::fake();
        let err = register(
            State(state),
            Form(RegisterRequest {
                username: "  a ".into(),
                password: "long-enough-password".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let state = AppState::fake();
        let err = register(
            State(state),
            Form(RegisterRequest {
                username: "chef_anna".into(),
                password: "short".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Password too short");
    }

    #[tokio::test]
    async fn logout_clears_cookie_and_redirects_home() {
        let state = AppState::fake();
        let res = logout(State(state), SessionUser(Uuid::new_v4()))
            .await
            .into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");
        let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }

    fn chef_form(password: &str) -> Form<RegisterRequest> {
        Form(RegisterRequest {
            username: "chef_anna".into(),
            password: password.into(),
        })
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn registering_a_taken_username_conflicts(pool: PgPool) {
        let state = AppState::fake_with_db(pool.clone());

        let res = register(State(state.clone()), chef_form("long-enough-password"))
            .await
            .unwrap()
            .into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/login");

        let err = register(State(state), chef_form("another-password"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Username already exists");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind("chef_anna")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_reports_taken_username_as_none(pool: PgPool) {
        assert!(User::create(&pool, "chef_anna", "hash-a").await.unwrap().is_some());
        assert!(User::create(&pool, "chef_anna", "hash-b").await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn login_sets_session_cookie_only_for_right_password(pool: PgPool) {
        let state = AppState::fake_with_db(pool);
        register(State(state.clone()), chef_form("long-enough-password"))
            .await
            .unwrap();

        let err = login(
            State(state.clone()),
            Form(LoginRequest {
                username: "chef_anna".into(),
                password: "wrong-password".into(),
            }),
        )
        .await
        .err()
        .expect("wrong password rejected");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let res = login(
            State(state),
            Form(LoginRequest {
                username: "chef_anna".into(),
                password: "long-enough-password".into(),
            }),
        )
        .await
        .ok()
        .expect("login succeeds")
        .into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");
        let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("recipe_box_session="));
    }

    #[tokio::test]
    async fn form_pages_name_themselves() {
        assert_eq!(login_page().await.0.page, "login");
        assert_eq!(register_page().await.0.page, "register");
    }
}
