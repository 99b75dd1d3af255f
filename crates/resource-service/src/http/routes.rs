//! Route set shared by every resource kind.
//!
//! | Operation | Method & Path |
//! |---|---|
//! | list | `GET /api/<collection>/all` |
//! | get | `GET /api/<collection>?id=<id>` |
//! | create | `POST /api/<collection>/post?<field>=...` |
//! | update | `PUT /api/<collection>?id=<id>` with a JSON body |
//! | delete | `DELETE /api/<collection>?id=<id>` |
//!
//! Every route authorizes before it looks at the query string or body, so a caller without
//! the role gets 403 even when its input is malformed.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use resource_framework::{Message, Operation, Record, RecordId, Resource, ResourceHandler};
use serde::Deserialize;

use super::auth::Caller;
use super::error::ApiResult;
use crate::resources::{Book, BookHandler, BookRecord};

#[derive(Debug, Deserialize)]
pub struct IdParam {
    pub id: RecordId,
}

#[derive(Debug, Deserialize)]
pub struct GenreParam {
    pub genre: String,
}

/// The five CRUD routes for `R`, bound to its handler.
pub fn resource_routes<R: Resource>(handler: ResourceHandler<R>) -> Router {
    let base = format!("/api/{}", R::COLLECTION);
    Router::new()
        .route(&format!("{base}/all"), get(list::<R>))
        .route(&format!("{base}/post"), post(create::<R>))
        .route(
            &base,
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
        .with_state(handler)
}

/// Book-only lookup by genre: `GET /api/books/genre?genre=<g>`.
pub fn book_routes(handler: BookHandler) -> Router {
    Router::new()
        .route("/api/books/genre", get(books_by_genre))
        .with_state(handler)
}

async fn list<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    caller: Caller,
) -> ApiResult<Json<Vec<Record<R>>>> {
    Ok(Json(handler.list(&caller.roles).await?))
}

async fn get_one<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    caller: Caller,
    query: Result<Query<IdParam>, QueryRejection>,
) -> ApiResult<Json<Record<R>>> {
    handler.authorize(Operation::Get, &caller.roles)?;
    let Query(IdParam { id }) = query?;
    Ok(Json(handler.get(&caller.roles, id).await?))
}

/// Fields arrive as individual query parameters, e.g. `?manufacturer=Trek&numGears=22`.
async fn create<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    caller: Caller,
    query: Result<Query<R>, QueryRejection>,
) -> ApiResult<Json<Record<R>>> {
    handler.authorize(Operation::Create, &caller.roles)?;
    let Query(fields) = query?;
    Ok(Json(handler.create(&caller.roles, fields).await?))
}

/// The body is a full record; an `id` inside it is ignored in favour of the query id.
async fn update<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    caller: Caller,
    query: Result<Query<IdParam>, QueryRejection>,
    body: Result<Json<R>, JsonRejection>,
) -> ApiResult<Json<Record<R>>> {
    handler.authorize(Operation::Update, &caller.roles)?;
    let Query(IdParam { id }) = query?;
    let Json(incoming) = body?;
    Ok(Json(handler.update(&caller.roles, id, incoming).await?))
}

async fn delete<R: Resource>(
    State(handler): State<ResourceHandler<R>>,
    caller: Caller,
    query: Result<Query<IdParam>, QueryRejection>,
) -> ApiResult<Json<Message>> {
    handler.authorize(Operation::Delete, &caller.roles)?;
    let Query(IdParam { id }) = query?;
    Ok(Json(handler.delete(&caller.roles, id).await?))
}

async fn books_by_genre(
    State(handler): State<BookHandler>,
    caller: Caller,
    query: Result<Query<GenreParam>, QueryRejection>,
) -> ApiResult<Json<Vec<BookRecord>>> {
    handler.authorize(Operation::List, &caller.roles)?;
    let Query(GenreParam { genre }) = query?;
    let books = handler
        .list_where(&caller.roles, Box::new(move |book: &Book| book.genre == genre))
        .await?;
    Ok(Json(books))
}
