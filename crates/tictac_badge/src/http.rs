//! Accent-color web page.
//!
//! Handlers never touch game state. Each request is forwarded to the control
//! loop as a [`PageRequest`] and the handler waits for the loop's reply.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use derive_more::{Display, Error};
use std::collections::HashMap;
use tictac_core::{Rgb, Score};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};

const INDEX_TEMPLATE: &str = include_str!("../static/index.html");

/// Query parameter carrying the color.
pub const COLOR_PARAM: &str = "neopixel_color";

/// A page request handed to the control loop.
#[derive(Debug)]
pub struct PageRequest {
    /// Parsed color, if the request carried a valid one.
    pub color: Option<Rgb>,
    /// Where the loop sends the page data.
    pub reply: oneshot::Sender<PageView>,
}

/// What the loop reports back for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    /// All-time score at the time of the request.
    pub all_time: Score,
}

/// Sending half held by the router.
pub type PageSender = mpsc::Sender<PageRequest>;

/// Failures talking to the control loop.
#[derive(Debug, Clone, Copy, Display, Error)]
pub enum PageError {
    /// The loop has shut down.
    #[display("Badge control loop is not running")]
    LoopGone,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response()
    }
}

/// Builds the router serving `/` for GET and POST.
pub fn router(pages: PageSender) -> Router {
    Router::new()
        .route("/", get(index_get).post(index_post))
        .with_state(pages)
}

/// Reads the color parameter; malformed values count as absent.
pub fn parse_color(params: &HashMap<String, String>) -> Option<Rgb> {
    let raw = params.get(COLOR_PARAM)?;
    match raw.parse::<Rgb>() {
        Ok(color) => Some(color),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed color");
            None
        }
    }
}

/// Fills the page template.
pub fn render_index(color: Option<Rgb>, all_time: Score) -> String {
    let color = color.map(|c| c.to_string()).unwrap_or_default();
    INDEX_TEMPLATE
        .replace("{color}", &color)
        .replace("{score_x}", &all_time.x.to_string())
        .replace("{score_o}", &all_time.o.to_string())
}

#[instrument(skip(pages))]
async fn ask_loop(pages: &PageSender, color: Option<Rgb>) -> Result<PageView, PageError> {
    let (reply, response) = oneshot::channel();
    pages
        .send(PageRequest { color, reply })
        .await
        .map_err(|_| PageError::LoopGone)?;
    let view = response.await.map_err(|_| PageError::LoopGone)?;
    debug!(?view, "Loop answered page request");
    Ok(view)
}

async fn index_get(
    State(pages): State<PageSender>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, PageError> {
    let color = parse_color(&params);
    let view = ask_loop(&pages, color).await?;
    Ok(Html(render_index(color, view.all_time)))
}

async fn index_post(State(pages): State<PageSender>) -> Result<Html<String>, PageError> {
    let view = ask_loop(&pages, None).await?;
    Ok(Html(render_index(None, view.all_time)))
}
