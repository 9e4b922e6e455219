use sqlx::sqlite::SqliteConnection;

use crate::db;
use crate::envelope::{ApiRequest, ApiResponse, HttpMethod};
use crate::error::ApiError;
use crate::models::{DeleteResponse, MatchInput, MatchResponse, MatchesResponse};
use super::Resource;

/// The match calendar.
pub struct Fixtures;

impl Resource for Fixtures {
    const NAME: &'static str = "fixtures";
    const METHODS: &'static [HttpMethod] = &[
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    // GET /api/fixtures - Latest kickoff first, with both team names
    async fn list(conn: &mut SqliteConnection, _request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let matches = db::get_all_fixtures(conn).await?;

        ApiResponse::ok(&MatchesResponse { matches })
    }

    // POST /api/fixtures - Schedule a match
    async fn create(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let input: MatchInput = request.json_body();
        let created = db::insert_match(conn, &input.into_new_match()).await?;

        tracing::info!(
            "Created match {} ({:?} vs {:?})",
            created.id, created.home_team_id, created.away_team_id
        );
        ApiResponse::created(&MatchResponse { r#match: Some(created) })
    }

    // PUT /api/fixtures - Replace a match row by id
    async fn replace(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let input: MatchInput = request.json_body();
        let updated = db::update_match(conn, &input).await?;

        if updated.is_none() {
            tracing::warn!("No match with id {:?} to update", input.id);
        }
        ApiResponse::ok(&MatchResponse { r#match: updated })
    }

    // DELETE /api/fixtures?id=N - Remove a match
    async fn remove(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let match_id = request.query_id("id");
        let removed = db::delete_match(conn, match_id).await?;

        tracing::info!("Deleted match {:?} ({} row(s))", match_id, removed);
        ApiResponse::ok(&DeleteResponse { success: true })
    }
}
