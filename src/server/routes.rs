use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use tracing::{debug, info};

use crate::feed::{self, FeedInfo};
use crate::params::FeedParams;
use crate::source;
use crate::state::State as AppState;

use super::responses::FeedError;

const CONTENT_TYPE_XML: &str = "text/xml; charset=utf-8";

pub async fn get_feed(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, FeedError> {
    let Query(pairs) = query.map_err(|e| {
        debug!("Could not decode the query string: {e}");

        FeedError::MalformedParameters
    })?;
    let params = FeedParams::from_pairs(&pairs)?;

    let root = state.fetcher.fetch_json(&params.url).await?;
    let records = source::resolve_records(root, params.data_path.as_ref())?;
    let count = records.len();

    let channel = feed::build_channel(
        FeedInfo {
            url: &params.url,
            title: &params.title,
            description: &params.description,
        },
        &params.mapping,
        &records,
    );

    info!("Generated a feed of {count} items from `{}`", params.url);

    Ok((
        [(header::CONTENT_TYPE, CONTENT_TYPE_XML)],
        channel.to_string(),
    ))
}
