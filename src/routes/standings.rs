use sqlx::sqlite::SqliteConnection;

use crate::db;
use crate::envelope::{ApiRequest, ApiResponse, HttpMethod};
use crate::error::ApiError;
use crate::models::{DeleteResponse, TeamInput, TeamResponse, TeamsResponse};
use super::Resource;

/// The league table: one row per team, ordered by the position the client
/// assigned.
pub struct Standings;

impl Resource for Standings {
    const NAME: &'static str = "standings";
    const ALLOW_HEADERS: &'static str = "Content-Type, X-User-Id";
    const METHODS: &'static [HttpMethod] = &[
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    // GET /api/standings - Whole table by position
    async fn list(conn: &mut SqliteConnection, _request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let teams = db::get_all_teams(conn).await?;

        ApiResponse::ok(&TeamsResponse { teams })
    }

    // POST /api/standings - Add a team, missing fields defaulted
    async fn create(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let input: TeamInput = request.json_body();
        let team = db::insert_team(conn, &input.into_new_team()).await?;

        tracing::info!("Created team {} ({:?})", team.id, team.name);
        ApiResponse::created(&TeamResponse { team: Some(team) })
    }

    // PUT /api/standings - Replace a team row by id
    async fn replace(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let input: TeamInput = request.json_body();
        let team = db::update_team(conn, &input).await?;

        if team.is_none() {
            tracing::warn!("No team with id {:?} to update", input.id);
        }
        ApiResponse::ok(&TeamResponse { team })
    }

    // DELETE /api/standings?id=N - Remove a team
    async fn remove(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let team_id = request.query_id("id");
        let removed = db::delete_team(conn, team_id).await?;

        tracing::info!("Deleted team {:?} ({} row(s))", team_id, removed);
        ApiResponse::ok(&DeleteResponse { success: true })
    }
}
