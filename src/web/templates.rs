//! Page templates.
//!
//! Each page is an askama template under `templates/`. Pages extending
//! `base.html` carry a [`Layout`] with the site name and the logged-in user.

use askama::Template;

use crate::board::{Board, BoardSummary, Pagination, Post, PostWithAuthor, Topic, TopicSummary};
use crate::db::User;
use crate::markdown;
use crate::web::forms::{
    AccountForm, FormErrors, NewTopicForm, PostForm, SignUpForm,
};
use crate::web::state::AppState;
use crate::web::urls;

/// Pages shown on each side of the current one in a pager.
const PAGER_WINDOW: i64 = 3;

/// Data shared by every page.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Site name for titles and the navigation bar.
    pub site_name: String,
    /// Logged-in user, if any.
    pub user: Option<User>,
}

impl Layout {
    pub fn new(state: &AppState, user: Option<&User>) -> Self {
        Self {
            site_name: state.config.site.name.clone(),
            user: user.cloned(),
        }
    }
}

/// One entry of a pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: i64,
    pub current: bool,
}

/// Pager entries around the current page.
pub fn page_links(pagination: &Pagination) -> Vec<PageLink> {
    let first = (pagination.number - PAGER_WINDOW).max(1);
    let last = (pagination.number + PAGER_WINDOW).min(pagination.num_pages);
    (first..=last)
        .map(|number| PageLink {
            number,
            current: number == pagination.number,
        })
        .collect()
}

/// A post prepared for display.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i64,
    pub author: String,
    pub author_post_count: i64,
    pub created_at: String,
    pub updated_at: Option<String>,
    /// Message rendered from Markdown.
    pub html: String,
    /// Edit link, present when the viewer wrote the post.
    pub edit_url: Option<String>,
}

impl PostView {
    pub fn new(post: PostWithAuthor, board_id: i64, viewer: Option<&User>) -> Self {
        let edit_url = viewer
            .filter(|user| user.id == post.created_by)
            .map(|_| urls::edit_post(board_id, post.topic_id, post.id));
        Self {
            id: post.id,
            author: post.author_username,
            author_post_count: post.author_post_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
            html: markdown::render(&post.message),
            edit_url,
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub boards: Vec<BoardSummary>,
}

#[derive(Template)]
#[template(path = "topics.html")]
pub struct TopicsTemplate {
    pub layout: Layout,
    pub board: Board,
    pub topics: Vec<TopicSummary>,
    pub pagination: Pagination,
    pub links: Vec<PageLink>,
}

#[derive(Template)]
#[template(path = "new_topic.html")]
pub struct NewTopicTemplate {
    pub layout: Layout,
    pub board: Board,
    pub form: NewTopicForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "topic_posts.html")]
pub struct TopicPostsTemplate {
    pub layout: Layout,
    pub board: Board,
    pub topic: Topic,
    pub posts: Vec<PostView>,
    pub pagination: Pagination,
    pub links: Vec<PageLink>,
}

#[derive(Template)]
#[template(path = "reply_topic.html")]
pub struct ReplyTopicTemplate {
    pub layout: Layout,
    pub board: Board,
    pub topic: Topic,
    pub form: PostForm,
    pub errors: FormErrors,
    /// Latest posts, newest first.
    pub recent: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "edit_post.html")]
pub struct EditPostTemplate {
    pub layout: Layout,
    pub board: Board,
    pub topic: Topic,
    pub post: Post,
    pub form: PostForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignUpTemplate {
    pub layout: Layout,
    pub form: SignUpForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub username: String,
    pub next: String,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "my_account.html")]
pub struct MyAccountTemplate {
    pub layout: Layout,
    pub form: AccountForm,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "password_change.html")]
pub struct PasswordChangeTemplate {
    pub layout: Layout,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "password_change_done.html")]
pub struct PasswordChangeDoneTemplate {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "password_reset.html")]
pub struct PasswordResetTemplate {
    pub layout: Layout,
    pub email: String,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "password_reset_done.html")]
pub struct PasswordResetDoneTemplate {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "password_reset_confirm.html")]
pub struct PasswordResetConfirmTemplate {
    pub layout: Layout,
    pub valid_link: bool,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "password_reset_complete.html")]
pub struct PasswordResetCompleteTemplate {
    pub layout: Layout,
}

/// Plain-text body of the password reset e-mail.
#[derive(Template)]
#[template(path = "password_reset_email.txt")]
pub struct PasswordResetEmail<'a> {
    pub site_name: &'a str,
    pub username: &'a str,
    pub reset_url: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_links_window() {
        let links = page_links(&Pagination::new(Some("5"), 100, 10));
        let numbers: Vec<i64> = links.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5, 6, 7, 8]);
        assert!(links.iter().find(|l| l.current).is_some_and(|l| l.number == 5));
    }

    #[test]
    fn test_page_links_clamped_to_range() {
        let numbers: Vec<i64> = page_links(&Pagination::new(None, 15, 10))
            .iter()
            .map(|l| l.number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_reset_email_body() {
        let body = PasswordResetEmail {
            site_name: "Boards",
            username: "john",
            reset_url: "http://testserver/reset/MQ/abc/",
        }
        .render()
        .unwrap();
        assert!(body.contains("http://testserver/reset/MQ/abc/"));
        assert!(body.contains("john"));
    }

    #[test]
    fn test_post_view_edit_link_for_author_only() {
        let post = PostWithAuthor {
            id: 3,
            message: "**hi**".to_string(),
            topic_id: 2,
            created_by: 9,
            author_username: "john".to_string(),
            author_post_count: 1,
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: None,
        };

        let mut author = User {
            id: 9,
            username: "john".to_string(),
            password: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            date_joined: String::new(),
            last_login: None,
        };
        let view = PostView::new(post.clone(), 1, Some(&author));
        assert_eq!(view.edit_url.as_deref(), Some("/boards/1/topics/2/posts/3/edit/"));
        assert!(view.html.contains("<strong>hi</strong>"));

        author.id = 10;
        assert!(PostView::new(post.clone(), 1, Some(&author)).edit_url.is_none());
        assert!(PostView::new(post, 1, None).edit_url.is_none());
    }
}
