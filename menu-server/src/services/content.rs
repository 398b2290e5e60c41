//! Content section business rules

use shared::models::{ContentCreate, ContentFilter, ContentSection, ContentUpdate};
use shared::{AppError, ErrorCode, PageRequest, Pagination};

use crate::db;
use crate::db::content::NewContent;
use crate::error::ServiceResult;
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ContentNotFound).with_detail("id", id)
}

fn section_taken(section_name: &str) -> AppError {
    AppError::new(ErrorCode::ContentSectionExists).with_detail("section_name", section_name)
}

pub async fn list(
    state: &AppState,
    filter: &ContentFilter,
) -> ServiceResult<(Vec<ContentSection>, Pagination)> {
    let page = PageRequest::new(filter.page, filter.limit);
    let (rows, total) = db::content::list(&state.pool, filter, page).await?;
    Ok((rows, page.paginate(total)))
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<ContentSection> {
    Ok(db::content::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

pub async fn get_by_section(state: &AppState, section_name: &str) -> ServiceResult<ContentSection> {
    let key = section_name.trim();
    Ok(db::content::find_by_section(&state.pool, key)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ContentNotFound).with_detail("section_name", key))?)
}

pub async fn create(state: &AppState, mut payload: ContentCreate) -> ServiceResult<ContentSection> {
    payload.validate()?;
    if db::content::section_exists(&state.pool, &payload.section_name, None).await? {
        return Err(section_taken(&payload.section_name).into());
    }

    let new = NewContent {
        section_name: payload.section_name,
        title: payload.title.unwrap_or_default(),
        content: payload.content.unwrap_or_default(),
        metadata: payload.metadata.unwrap_or_else(|| serde_json::json!({})),
        image_url: payload.image_url.unwrap_or_default(),
        active: payload.active.unwrap_or(true),
    };
    let section = db::content::insert(&state.pool, &new).await?;

    tracing::info!(id = section.id, section = %section.section_name, "Content section created");
    Ok(section)
}

pub async fn update(
    state: &AppState,
    id: i64,
    mut payload: ContentUpdate,
) -> ServiceResult<ContentSection> {
    payload.validate()?;
    let current = get(state, id).await?;

    if let Some(name) = payload.section_name.as_deref()
        && name != current.section_name
        && db::content::section_exists(&state.pool, name, Some(id)).await?
    {
        return Err(section_taken(name).into());
    }

    Ok(db::content::update(&state.pool, id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?)
}

pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    if !db::content::soft_delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    tracing::info!(id, "Content section deleted");
    Ok(())
}

pub async fn toggle(state: &AppState, id: i64) -> ServiceResult<ContentSection> {
    Ok(db::content::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}
