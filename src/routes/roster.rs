use sqlx::sqlite::SqliteConnection;

use crate::db;
use crate::envelope::{ApiRequest, ApiResponse, HttpMethod};
use crate::error::ApiError;
use crate::models::{DeleteResponse, PlayerInput, PlayerResponse, PlayersResponse};
use super::Resource;

/// Team rosters. Players are created and removed, never edited in place.
pub struct Roster;

impl Resource for Roster {
    const NAME: &'static str = "roster";
    const METHODS: &'static [HttpMethod] = &[HttpMethod::Get, HttpMethod::Post, HttpMethod::Delete];

    // GET /api/roster?team_id=N - One team by shirt number, or everyone by team then number
    async fn list(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let players = match request.query_id("team_id") {
            Some(team_id) => db::get_team_players(conn, team_id).await?,
            None => db::get_all_players(conn).await?,
        };

        ApiResponse::ok(&PlayersResponse { players })
    }

    // POST /api/roster - Add a player, missing fields defaulted
    async fn create(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let input: PlayerInput = request.json_body();
        let player = db::insert_player(conn, &input.into_new_player()).await?;

        tracing::info!("Created player {} for team {:?}", player.id, player.team_id);
        ApiResponse::created(&PlayerResponse { player: Some(player) })
    }

    // DELETE /api/roster?id=N - Remove a player
    async fn remove(conn: &mut SqliteConnection, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let player_id = request.query_id("id");
        let removed = db::delete_player(conn, player_id).await?;

        tracing::info!("Deleted player {:?} ({} row(s))", player_id, removed);
        ApiResponse::ok(&DeleteResponse { success: true })
    }
}
