//! Board, topic and post pages.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::render;
use crate::web::error::PageError;
use crate::web::forms::{FormErrors, NewTopicForm, PageQuery, PostForm};
use crate::web::middleware::{CurrentUser, OptionalUser};
use crate::web::state::AppState;
use crate::web::templates::{
    page_links, EditPostTemplate, HomeTemplate, Layout, NewTopicTemplate, PostView,
    ReplyTopicTemplate, TopicPostsTemplate, TopicsTemplate,
};
use crate::web::urls;
use crate::BoardsError;

/// Cookie listing the topics this client has already been counted for.
pub const VIEWED_TOPICS_COOKIE: &str = "viewed_topics";

/// Most topic IDs kept in the viewed-topics cookie.
const MAX_TRACKED_VIEWS: usize = 100;

/// Posts shown under the reply form.
const RECENT_POSTS_ON_REPLY: i64 = 10;

/// Home page: all boards.
pub async fn home(
    State(state): State<AppState>,
    viewer: OptionalUser,
) -> Result<Html<String>, PageError> {
    let boards = state.boards().list_boards().await?;
    render(&HomeTemplate {
        layout: Layout::new(&state, viewer.user()),
        boards,
    })
}

/// Topics of a board, most recently active first.
pub async fn board_topics(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(board_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    let service = state.boards();
    let board = service.get_board(board_id).await?;
    let page = service
        .list_topics(
            board.id,
            query.page.as_deref(),
            state.config.pagination.topics_per_page.into(),
        )
        .await?;

    render(&TopicsTemplate {
        layout: Layout::new(&state, viewer.user()),
        links: page_links(&page.pagination),
        board,
        topics: page.items,
        pagination: page.pagination,
    })
}

/// New topic form.
pub async fn new_topic_page(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(board_id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let board = state.boards().get_board(board_id).await?;
    render(&NewTopicTemplate {
        layout: Layout::new(&state, Some(&current.user)),
        board,
        form: NewTopicForm::default(),
        errors: FormErrors::new(),
    })
}

/// Start a topic with its first post.
pub async fn new_topic(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(board_id): Path<i64>,
    Form(form): Form<NewTopicForm>,
) -> Result<Response, PageError> {
    let service = state.boards();
    let board = service.get_board(board_id).await?;

    let mut errors = FormErrors::validate(&form);
    if errors.is_empty() {
        match service
            .start_topic(board.id, current.user.id, &form.subject, &form.message)
            .await
        {
            Ok((topic, _)) => return Ok(urls::found(&urls::topic_posts(board.id, topic.id))),
            Err(BoardsError::Validation(message)) => errors.add_non_field(message),
            Err(e) => return Err(e.into()),
        }
    }

    let page = render(&NewTopicTemplate {
        layout: Layout::new(&state, Some(&current.user)),
        board,
        form,
        errors,
    })?;
    Ok(page.into_response())
}

/// Topic IDs stored in the viewed-topics cookie.
fn viewed_topics(jar: &CookieJar) -> Vec<i64> {
    jar.get(VIEWED_TOPICS_COOKIE)
        .map(|c| {
            c.value()
                .split('-')
                .filter_map(|id| id.parse().ok())
                .collect()
        })
        .unwrap_or_default()
}

fn viewed_topics_cookie(ids: &[i64]) -> Cookie<'static> {
    let value = ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("-");
    Cookie::build((VIEWED_TOPICS_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Posts of a topic, oldest first.
///
/// The first visit from a client counts as one view of the topic.
pub async fn topic_posts(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path((board_id, topic_id)): Path<(i64, i64)>,
    Query(query): Query<PageQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), PageError> {
    let service = state.boards();
    let board = service.get_board(board_id).await?;
    let mut topic = service.get_topic(board.id, topic_id).await?;

    let mut viewed = viewed_topics(&jar);
    let jar = if viewed.contains(&topic.id) {
        jar
    } else {
        service.record_view(topic.id).await?;
        topic.views += 1;
        viewed.push(topic.id);
        if viewed.len() > MAX_TRACKED_VIEWS {
            viewed.drain(..viewed.len() - MAX_TRACKED_VIEWS);
        }
        jar.add(viewed_topics_cookie(&viewed))
    };

    let page = service
        .list_posts(
            topic.id,
            query.page.as_deref(),
            state.config.pagination.posts_per_page.into(),
        )
        .await?;
    let posts = page
        .items
        .into_iter()
        .map(|post| PostView::new(post, board.id, viewer.user()))
        .collect();

    let html = render(&TopicPostsTemplate {
        layout: Layout::new(&state, viewer.user()),
        links: page_links(&page.pagination),
        board,
        topic,
        posts,
        pagination: page.pagination,
    })?;
    Ok((jar, html))
}

async fn render_reply(
    state: &AppState,
    current: &CurrentUser,
    board_id: i64,
    topic_id: i64,
    form: PostForm,
    errors: FormErrors,
) -> Result<Html<String>, PageError> {
    let service = state.boards();
    let board = service.get_board(board_id).await?;
    let topic = service.get_topic(board.id, topic_id).await?;
    let recent = service
        .recent_posts(topic.id, RECENT_POSTS_ON_REPLY)
        .await?
        .into_iter()
        .map(|post| PostView::new(post, board.id, Some(&current.user)))
        .collect();

    render(&ReplyTopicTemplate {
        layout: Layout::new(state, Some(&current.user)),
        board,
        topic,
        form,
        errors,
        recent,
    })
}

/// Reply form.
pub async fn reply_topic_page(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((board_id, topic_id)): Path<(i64, i64)>,
) -> Result<Html<String>, PageError> {
    render_reply(
        &state,
        &current,
        board_id,
        topic_id,
        PostForm::default(),
        FormErrors::new(),
    )
    .await
}

/// Post a reply.
pub async fn reply_topic(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((board_id, topic_id)): Path<(i64, i64)>,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let mut errors = FormErrors::validate(&form);
    if errors.is_empty() {
        match state
            .boards()
            .reply(board_id, topic_id, current.user.id, &form.message)
            .await
        {
            Ok(_) => return Ok(urls::found(&urls::topic_posts(board_id, topic_id))),
            Err(BoardsError::Validation(message)) => errors.add_non_field(message),
            Err(e) => return Err(e.into()),
        }
    }

    let page = render_reply(&state, &current, board_id, topic_id, form, errors).await?;
    Ok(page.into_response())
}

/// Edit form for a post.
///
/// Only the author sees it; for anyone else the post does not exist.
pub async fn edit_post_page(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((board_id, topic_id, post_id)): Path<(i64, i64, i64)>,
) -> Result<Html<String>, PageError> {
    let service = state.boards();
    let post = service
        .get_post_for_edit(board_id, topic_id, post_id, current.user.id)
        .await?;
    let board = service.get_board(board_id).await?;
    let topic = service.get_topic(board_id, topic_id).await?;

    render(&EditPostTemplate {
        layout: Layout::new(&state, Some(&current.user)),
        form: PostForm {
            message: post.message.clone(),
        },
        board,
        topic,
        post,
        errors: FormErrors::new(),
    })
}

/// Save an edited post.
pub async fn edit_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((board_id, topic_id, post_id)): Path<(i64, i64, i64)>,
    Form(form): Form<PostForm>,
) -> Result<Response, PageError> {
    let service = state.boards();
    let post = service
        .get_post_for_edit(board_id, topic_id, post_id, current.user.id)
        .await?;

    let mut errors = FormErrors::validate(&form);
    if errors.is_empty() {
        match service
            .edit_post(board_id, topic_id, post.id, current.user.id, &form.message)
            .await
        {
            Ok(_) => return Ok(urls::found(&urls::topic_posts(board_id, topic_id))),
            Err(BoardsError::Validation(message)) => errors.add_non_field(message),
            Err(e) => return Err(e.into()),
        }
    }

    let board = service.get_board(board_id).await?;
    let topic = service.get_topic(board_id, topic_id).await?;
    let page = render(&EditPostTemplate {
        layout: Layout::new(&state, Some(&current.user)),
        board,
        topic,
        post,
        form,
        errors,
    })?;
    Ok(page.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

    fn jar_with(value: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{VIEWED_TOPICS_COOKIE}={value}")).unwrap(),
        );
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_viewed_topics_parsing() {
        assert_eq!(viewed_topics(&jar_with("1-2-3")), vec![1, 2, 3]);
        assert_eq!(viewed_topics(&jar_with("1-x-3")), vec![1, 3]);
        assert!(viewed_topics(&CookieJar::new()).is_empty());
    }

    #[test]
    fn test_viewed_topics_cookie() {
        let cookie = viewed_topics_cookie(&[4, 5]);
        assert_eq!(cookie.name(), VIEWED_TOPICS_COOKIE);
        assert_eq!(cookie.value(), "4-5");
    }
}
